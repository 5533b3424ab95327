//! Ground intake.
//!
//! The intake is a roller on an arm. The arm is rotated by a NEO running position control on its
//! motor controller, the roller by a second NEO in open loop. A double solenoid and the robot's
//! compressor also belong to this subsystem.
//!
//! Commands never fail from the caller's point of view. A device that does not answer is logged
//! at `error` level and the command moves on, and the subsystem's flags still record what was
//! commanded.

mod config;

use alloc::boxed::Box;

use charged_up_devices::{
    closed_loop::{ClosedLoopController, ClosedLoopSlot, ControlType, OutputRange, PidGains},
    dashboard::Dashboard,
    encoder::RelativeEncoder,
    motor::{MotorController, MotorError},
    pneumatics::{Compressor, DoubleSolenoid, SolenoidValue},
};
pub use config::{ConfigError, IntakeConfig};
use log::{debug, error, info, warn};

use crate::subsystem::Subsystem;

/// Dashboard keys the rotation gains are published under.
pub mod keys {
    /// Proportional gain.
    pub const P_GAIN: &str = "P Gain";
    /// Integral gain.
    pub const I_GAIN: &str = "I Gain";
    /// Derivative gain.
    pub const D_GAIN: &str = "D Gain";
    /// Integral zone.
    pub const I_ZONE: &str = "I Zone";
    /// Feed-forward gain.
    pub const FEED_FORWARD: &str = "Feed Forward";
    /// Upper bound of the output clamp.
    pub const MAX_OUTPUT: &str = "Max Output";
    /// Lower bound of the output clamp.
    pub const MIN_OUTPUT: &str = "Min Output";
}

/// The devices an [`Intake`] takes ownership of.
///
/// The three rotation handles are views onto the same physical motor controller.
pub struct IntakeHardware {
    /// Arm motor, open loop.
    pub rotate_motor: Box<dyn MotorController>,
    /// Integrated encoder of the arm motor.
    pub rotate_encoder: Box<dyn RelativeEncoder>,
    /// Onboard PID of the arm motor.
    pub rotate_pid: Box<dyn ClosedLoopController>,
    /// Roller motor.
    pub roller_motor: Box<dyn MotorController>,
    /// Double solenoid on the intake.
    pub solenoid: Box<dyn DoubleSolenoid>,
    /// The robot's compressor.
    pub compressor: Box<dyn Compressor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Gain {
    P,
    I,
    D,
    IZone,
    FeedForward,
}

impl Gain {
    const ALL: [Self; 5] = [Self::P, Self::I, Self::D, Self::IZone, Self::FeedForward];

    const fn key(self) -> &'static str {
        match self {
            Self::P => keys::P_GAIN,
            Self::I => keys::I_GAIN,
            Self::D => keys::D_GAIN,
            Self::IZone => keys::I_ZONE,
            Self::FeedForward => keys::FEED_FORWARD,
        }
    }

    const fn get(self, gains: &PidGains) -> f64 {
        match self {
            Self::P => gains.p,
            Self::I => gains.i,
            Self::D => gains.d,
            Self::IZone => gains.i_zone,
            Self::FeedForward => gains.ff,
        }
    }

    const fn set(self, gains: &mut PidGains, value: f64) {
        match self {
            Self::P => gains.p = value,
            Self::I => gains.i = value,
            Self::D => gains.d = value,
            Self::IZone => gains.i_zone = value,
            Self::FeedForward => gains.ff = value,
        }
    }

    fn upload(
        self,
        pid: &mut dyn ClosedLoopController,
        slot: ClosedLoopSlot,
        value: f64,
    ) -> Result<(), MotorError> {
        match self {
            Self::P => pid.set_p(slot, value),
            Self::I => pid.set_i(slot, value),
            Self::D => pid.set_d(slot, value),
            Self::IZone => pid.set_i_zone(slot, value),
            Self::FeedForward => pid.set_ff(slot, value),
        }
    }
}

/// Intake subsystem.
pub struct Intake {
    hardware: IntakeHardware,
    dashboard: Box<dyn Dashboard>,
    config: IntakeConfig,
    initial_position: f64,
    extended: bool,
    compressor_enabled: bool,
    flipped: bool,
}

impl Intake {
    /// Takes ownership of the intake hardware and initializes it.
    ///
    /// The arm encoder is zeroed, both motor controllers are restored to factory defaults, the
    /// solenoid is driven forward, the compressor is enabled and the rotation gains are uploaded
    /// to the controller and published to `dashboard`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid. Nothing is sent to the hardware in that
    /// case. Device failures during initialization are logged, not returned.
    pub fn new(
        mut hardware: IntakeHardware,
        config: IntakeConfig,
        dashboard: Box<dyn Dashboard>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        hardware
            .rotate_encoder
            .set_position(0.0)
            .unwrap_or_else(|e| error!("couldn't zero intake rotation encoder: {e}"));
        let initial_position = hardware.rotate_encoder.position().unwrap_or_else(|e| {
            error!("couldn't read intake rotation encoder: {e}");
            0.0
        });

        hardware
            .rotate_motor
            .restore_factory_defaults()
            .unwrap_or_else(|e| error!("couldn't reset intake rotation motor: {e}"));
        hardware
            .roller_motor
            .restore_factory_defaults()
            .unwrap_or_else(|e| error!("couldn't reset intake roller motor: {e}"));

        hardware
            .solenoid
            .set(SolenoidValue::Forward)
            .unwrap_or_else(|e| error!("couldn't set intake solenoid forward: {e}"));

        hardware
            .rotate_encoder
            .set_position_conversion_factor(config.degrees_per_rotation)
            .unwrap_or_else(|e| error!("couldn't set intake rotation conversion factor: {e}"));

        hardware
            .compressor
            .enable_digital()
            .unwrap_or_else(|e| error!("couldn't enable compressor: {e}"));

        let mut intake = Self {
            hardware,
            dashboard,
            config,
            initial_position,
            extended: false,
            compressor_enabled: true,
            flipped: false,
        };
        intake.upload_rotation_config();
        intake.publish_gains();

        info!(
            "intake initialized, rotation encoder at {}",
            intake.initial_position
        );
        Ok(intake)
    }

    fn upload_rotation_config(&mut self) {
        let IntakeConfig {
            gains,
            output_range,
            smart_motion,
            slot,
            ..
        } = self.config;
        let pid = &mut self.hardware.rotate_pid;

        pid.set_smart_motion(slot, smart_motion)
            .unwrap_or_else(|e| error!("couldn't upload intake smart motion limits: {e}"));
        pid.set_gains(slot, gains)
            .unwrap_or_else(|e| error!("couldn't upload intake rotation gains: {e}"));
        pid.set_output_range(slot, output_range)
            .unwrap_or_else(|e| error!("couldn't upload intake rotation output range: {e}"));
    }

    fn publish_gains(&mut self) {
        for gain in Gain::ALL {
            self.dashboard
                .put_number(gain.key(), gain.get(&self.config.gains));
        }
        self.dashboard
            .put_number(keys::MAX_OUTPUT, self.config.output_range.max);
        self.dashboard
            .put_number(keys::MIN_OUTPUT, self.config.output_range.min);
    }

    /// Spins the roller inward.
    pub fn run_intake_in(&mut self) {
        self.hardware
            .roller_motor
            .set(self.config.roller_in_output)
            .unwrap_or_else(|e| error!("couldn't run intake in: {e}"));
    }

    /// Spins the roller outward at full power.
    pub fn run_intake_out(&mut self) {
        self.hardware
            .roller_motor
            .set(self.config.roller_out_output)
            .unwrap_or_else(|e| error!("couldn't run intake out: {e}"));
    }

    /// Switches between stowed and deployed.
    ///
    /// Only the flag changes here. The arm moves on the next cycle, and only when
    /// [`IntakeConfig::drive_rotation`] is on.
    pub fn flip_intake(&mut self) {
        self.flipped = !self.flipped;
        debug!("intake flipped: {}", self.flipped);
    }

    /// Turns the compressor off if it is on, and on if it is off.
    pub fn toggle_compressor(&mut self) {
        let compressor = &mut self.hardware.compressor;
        if self.compressor_enabled {
            compressor
                .disable()
                .unwrap_or_else(|e| error!("couldn't disable compressor: {e}"));
        } else {
            compressor
                .enable_digital()
                .unwrap_or_else(|e| error!("couldn't enable compressor: {e}"));
        }
        self.compressor_enabled = !self.compressor_enabled;
    }

    /// Switches the solenoid to its other position.
    pub fn toggle(&mut self) {
        self.hardware
            .solenoid
            .toggle()
            .unwrap_or_else(|e| error!("couldn't toggle intake solenoid: {e}"));
        self.extended = !self.extended;
    }

    /// Returns `true` if the intake was last commanded to deploy.
    #[must_use]
    pub const fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Returns `true` after an odd number of [`Intake::toggle`] calls.
    #[must_use]
    pub const fn is_extended(&self) -> bool {
        self.extended
    }

    /// Returns `true` if the compressor was last commanded on.
    #[must_use]
    pub const fn is_compressor_enabled(&self) -> bool {
        self.compressor_enabled
    }

    /// Encoder reading taken right after zeroing it during construction.
    #[must_use]
    pub const fn initial_position(&self) -> f64 {
        self.initial_position
    }

    /// The configuration in effect, including any gains changed by live tuning.
    #[must_use]
    pub const fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Current arm angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error if the rotation controller is not responding.
    pub fn rotation_position(&self) -> Result<f64, MotorError> {
        self.hardware.rotate_encoder.position()
    }

    /// The dashboard gains are published to.
    #[must_use]
    pub fn dashboard(&self) -> &dyn Dashboard {
        self.dashboard.as_ref()
    }

    /// Mutable access to the dashboard, for entries edited from the driver station.
    pub fn dashboard_mut(&mut self) -> &mut dyn Dashboard {
        self.dashboard.as_mut()
    }

    /// Pushes every gain the drive team changed on the dashboard to the rotation controller.
    fn apply_dashboard_gains(&mut self) {
        let slot = self.config.slot;

        for gain in Gain::ALL {
            let current = gain.get(&self.config.gains);
            let value = self.dashboard.get_number(gain.key(), current);
            if !value.is_finite() {
                warn!("ignoring non-finite dashboard value for `{}`", gain.key());
                continue;
            }
            if value != current {
                gain.upload(self.hardware.rotate_pid.as_mut(), slot, value)
                    .unwrap_or_else(|e| error!("couldn't update `{}`: {e}", gain.key()));
                gain.set(&mut self.config.gains, value);
                info!("intake `{}` set to {value}", gain.key());
            }
        }

        let current = self.config.output_range;
        let range = OutputRange::new(
            self.dashboard.get_number(keys::MIN_OUTPUT, current.min),
            self.dashboard.get_number(keys::MAX_OUTPUT, current.max),
        );
        if !range.min.is_finite() || !range.max.is_finite() {
            warn!("ignoring non-finite dashboard output range");
            return;
        }
        if !range.is_valid() {
            warn!(
                "ignoring dashboard output range [{}, {}], it must satisfy -1 <= min <= max <= 1",
                range.min, range.max
            );
            return;
        }
        if range != current {
            self.hardware
                .rotate_pid
                .set_output_range(slot, range)
                .unwrap_or_else(|e| error!("couldn't update intake output range: {e}"));
            self.config.output_range = range;
            info!(
                "intake output range set to [{}, {}]",
                range.min, range.max
            );
        }
    }

    fn drive_rotation(&mut self) {
        let angle = if self.flipped {
            self.config.deployed_angle
        } else {
            self.config.stowed_angle
        };

        self.hardware
            .rotate_pid
            .set_reference(angle, ControlType::Position)
            .unwrap_or_else(|e| error!("couldn't move intake to {angle} degrees: {e}"));
    }
}

impl Subsystem for Intake {
    fn name(&self) -> &str {
        "intake"
    }

    /// Applies live tuning and arm positioning when enabled, logs the arm angle and stops the
    /// roller.
    ///
    /// The roller stop is the last write of the cycle, so a roller command issued before this
    /// hook does not outlive it.
    fn periodic(&mut self) {
        if self.config.live_tuning {
            self.apply_dashboard_gains();
        }

        if self.config.drive_rotation {
            self.drive_rotation();
        }

        match self.hardware.rotate_encoder.position() {
            Ok(position) => debug!("intake rotation position: {position}"),
            Err(e) => error!("couldn't read intake rotation position: {e}"),
        }

        self.hardware
            .roller_motor
            .stop()
            .unwrap_or_else(|e| error!("couldn't stop intake roller: {e}"));
    }
}

#[cfg(test)]
mod tests;
