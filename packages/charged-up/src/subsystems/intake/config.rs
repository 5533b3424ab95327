use charged_up_devices::closed_loop::{ClosedLoopSlot, OutputRange, PidGains, SmartMotionConfig};
use snafu::{Snafu, ensure};

use crate::constants::intake::{
    DEGREES_PER_ROTATION, DEPLOYED_ANGLE, ROLLER_IN_OUTPUT, ROLLER_OUT_OUTPUT, ROTATE_GAINS,
    ROTATE_OUTPUT_RANGE, ROTATE_SMART_MOTION, STOWED_ANGLE,
};

/// Tuning and behavior of an [`Intake`](super::Intake).
///
/// The default matches the competition robot. Live tuning and arm positioning are both off by
/// default; with them off, flipping the intake only changes [`Intake::is_flipped`] and the gains
/// never change after construction.
///
/// [`Intake::is_flipped`]: super::Intake::is_flipped
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntakeConfig {
    /// Gains uploaded to the rotation controller.
    pub gains: PidGains,

    /// Clamp on the rotation controller's output.
    pub output_range: OutputRange,

    /// Motion profile limits of the rotation controller.
    pub smart_motion: SmartMotionConfig,

    /// Parameter slot the gains and limits are stored in.
    pub slot: ClosedLoopSlot,

    /// Roller duty cycle for [`Intake::run_intake_in`](super::Intake::run_intake_in).
    pub roller_in_output: f64,

    /// Roller duty cycle for [`Intake::run_intake_out`](super::Intake::run_intake_out).
    pub roller_out_output: f64,

    /// Degrees of arm rotation per motor rotation.
    pub degrees_per_rotation: f64,

    /// Arm setpoint while not flipped, in degrees.
    pub stowed_angle: f64,

    /// Arm setpoint while flipped, in degrees.
    pub deployed_angle: f64,

    /// Read gains back from the dashboard every cycle and push changes to the controller.
    pub live_tuning: bool,

    /// Send the stowed or deployed setpoint to the rotation controller every cycle.
    pub drive_rotation: bool,
}

impl IntakeConfig {
    /// Replaces the rotation gains.
    #[must_use]
    pub const fn with_gains(mut self, gains: PidGains) -> Self {
        self.gains = gains;
        self
    }

    /// Replaces the rotation output clamp.
    #[must_use]
    pub const fn with_output_range(mut self, output_range: OutputRange) -> Self {
        self.output_range = output_range;
        self
    }

    /// Replaces the motion profile limits.
    #[must_use]
    pub const fn with_smart_motion(mut self, smart_motion: SmartMotionConfig) -> Self {
        self.smart_motion = smart_motion;
        self
    }

    /// Turns live gain tuning from the dashboard on or off.
    #[must_use]
    pub const fn with_live_tuning(mut self, enabled: bool) -> Self {
        self.live_tuning = enabled;
        self
    }

    /// Turns arm positioning on or off.
    #[must_use]
    pub const fn with_drive_rotation(mut self, enabled: bool) -> Self {
        self.drive_rotation = enabled;
        self
    }

    /// Checks that every value can be sent to hardware.
    ///
    /// # Errors
    ///
    /// Returns the first problem found, see [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        let PidGains { p, i, d, i_zone, ff } = self.gains;
        for (name, value) in [("p", p), ("i", i), ("d", d), ("i_zone", i_zone), ("ff", ff)] {
            ensure!(value.is_finite(), NonFiniteGainSnafu { name, value });
        }

        let OutputRange { min, max } = self.output_range;
        ensure!(
            self.output_range.is_valid(),
            InvalidOutputRangeSnafu { min, max }
        );

        for output in [self.roller_in_output, self.roller_out_output] {
            ensure!(
                output.is_finite() && (-1.0..=1.0).contains(&output),
                RollerOutputSnafu { output }
            );
        }

        ensure!(
            self.degrees_per_rotation.is_finite() && self.degrees_per_rotation != 0.0,
            ConversionFactorSnafu {
                factor: self.degrees_per_rotation
            }
        );

        for angle in [self.stowed_angle, self.deployed_angle] {
            ensure!(angle.is_finite(), NonFiniteAngleSnafu { angle });
        }

        Ok(())
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            gains: ROTATE_GAINS,
            output_range: ROTATE_OUTPUT_RANGE,
            smart_motion: ROTATE_SMART_MOTION,
            slot: ClosedLoopSlot::PRIMARY,
            roller_in_output: ROLLER_IN_OUTPUT,
            roller_out_output: ROLLER_OUT_OUTPUT,
            degrees_per_rotation: DEGREES_PER_ROTATION,
            stowed_angle: STOWED_ANGLE,
            deployed_angle: DEPLOYED_ANGLE,
            live_tuning: false,
            drive_rotation: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Snafu)]
/// Errors found while validating an [`IntakeConfig`].
pub enum ConfigError {
    /// A gain is NaN or infinite.
    #[snafu(display("gain `{name}` must be finite, got {value}"))]
    NonFiniteGain {
        /// Which gain.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The output clamp is inverted or exceeds full output.
    #[snafu(display("output range [{min}, {max}] is not a valid duty cycle range"))]
    InvalidOutputRange {
        /// Requested minimum.
        min: f64,
        /// Requested maximum.
        max: f64,
    },

    /// A roller duty cycle lies outside of `[-1.0, 1.0]`.
    #[snafu(display("roller output {output} is outside of [-1.0, 1.0]"))]
    RollerOutput {
        /// The rejected duty cycle.
        output: f64,
    },

    /// The encoder conversion factor is zero or not finite.
    #[snafu(display("degrees per rotation must be finite and non-zero, got {factor}"))]
    ConversionFactor {
        /// The rejected factor.
        factor: f64,
    },

    /// An arm setpoint is NaN or infinite.
    #[snafu(display("arm angle must be finite, got {angle}"))]
    NonFiniteAngle {
        /// The rejected angle.
        angle: f64,
    },
}
