//! Wiring and tuning constants.

pub mod robotmap {
    //! CAN ids and pneumatic channels as wired on the robot.

    /// Intake motor controllers.
    pub mod intake {
        use charged_up_devices::{CanId, motor::MotorType};

        /// Controller of the arm that flips the intake between stowed and deployed.
        pub const ROTATE_MOTOR_ID: CanId = CanId::new_clamped(11);
        /// Controller of the roller that pulls game pieces in.
        pub const ROLLER_MOTOR_ID: CanId = CanId::new_clamped(12);
        /// Both intake motors are NEOs.
        pub const MOTOR_TYPE: MotorType = MotorType::Brushless;
    }

    /// Pneumatic hub and valves.
    pub mod pneumatics {
        use charged_up_devices::{
            CanId,
            pneumatics::{PneumaticsModuleType, SolenoidChannels},
        };

        /// The pneumatic hub.
        pub const HUB_ID: CanId = CanId::new_clamped(10);
        /// The hub is a REV Pneumatic Hub.
        pub const MODULE_TYPE: PneumaticsModuleType = PneumaticsModuleType::RevPh;
        /// Double solenoid driven by [`Intake::toggle`](crate::subsystems::Intake::toggle).
        pub const INTAKE_SOLENOID: SolenoidChannels = SolenoidChannels {
            forward: 0,
            reverse: 1,
        };
    }
}

pub mod intake {
    //! Intake setpoints and defaults.

    use charged_up_devices::closed_loop::{OutputRange, PidGains, SmartMotionConfig};

    /// Roller duty cycle while pulling pieces in.
    pub const ROLLER_IN_OUTPUT: f64 = 0.4;
    /// Roller duty cycle while spitting pieces out.
    pub const ROLLER_OUT_OUTPUT: f64 = -1.0;

    /// One NEO rotation is 18 degrees of arm rotation.
    pub const DEGREES_PER_ROTATION: f64 = 18.0;

    /// Arm angle when stowed, in degrees.
    pub const STOWED_ANGLE: f64 = 0.0;
    /// Arm angle when deployed, in degrees.
    pub const DEPLOYED_ANGLE: f64 = 90.0;

    /// Arm position gains.
    pub const ROTATE_GAINS: PidGains = PidGains::new(0.001, 0.001, 0.001)
        .with_i_zone(0.0)
        .with_ff(0.0);
    /// Arm output clamp.
    pub const ROTATE_OUTPUT_RANGE: OutputRange = OutputRange::new(-0.2, 0.2);
    /// Arm motion profile limits (rpm, rpm/s).
    pub const ROTATE_SMART_MOTION: SmartMotionConfig = SmartMotionConfig {
        max_velocity: 100.0,
        min_output_velocity: 0.0,
        max_acceleration: 50.0,
        allowed_error: 0.0,
    };
}
