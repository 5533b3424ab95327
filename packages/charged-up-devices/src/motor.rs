//! Motor controllers.
//!
//! A [`MotorController`] drives a single motor with an open-loop duty cycle in the range
//! `[-1.0, 1.0]`, where positive values spin the motor forward. Closed-loop control is a
//! separate capability, see [`crate::closed_loop`].

use snafu::Snafu;

use crate::{CanError, CanId};

/// The kind of motor wired to a controller.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum MotorType {
    /// A brushed DC motor.
    Brushed,

    /// A brushless motor with hall-effect commutation.
    Brushless,
}

impl MotorType {
    /// Returns `true` if the motor is [`Brushless`](MotorType::Brushless).
    #[must_use]
    pub const fn is_brushless(&self) -> bool {
        match self {
            Self::Brushed => false,
            Self::Brushless => true,
        }
    }
}

/// Open-loop access to a CAN motor controller.
pub trait MotorController {
    /// Returns the CAN id the controller is configured with.
    fn can_id(&self) -> CanId;

    /// Sets the duty cycle output of the motor.
    ///
    /// Values outside of `[-1.0, 1.0]` are clamped.
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::NonFiniteOutput`] for NaN or infinite values, or a CAN error if the
    /// controller is not responding.
    fn set(&mut self, output: f64) -> Result<(), MotorError>;

    /// Returns the duty cycle most recently commanded with [`MotorController::set`].
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn get(&self) -> Result<f64, MotorError>;

    /// Restores every configuration parameter of the controller to its factory default.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn restore_factory_defaults(&mut self) -> Result<(), MotorError>;

    /// Sets the output to zero.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn stop(&mut self) -> Result<(), MotorError> {
        self.set(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Snafu)]
#[snafu(visibility(pub(crate)))]
/// Errors that can occur when using a motor controller.
pub enum MotorError {
    /// A NaN or infinite output was requested.
    #[snafu(display("refusing to command a non-finite output ({output})"))]
    NonFiniteOutput {
        /// The rejected output.
        output: f64,
    },

    /// An output range with a minimum above its maximum was requested.
    #[snafu(display("output range minimum {min} is greater than maximum {max}"))]
    InvalidOutputRange {
        /// Requested minimum.
        min: f64,
        /// Requested maximum.
        max: f64,
    },

    /// Generic CAN related error.
    #[snafu(display("{source}"), context(false))]
    Can {
        /// The source of the error.
        source: CanError,
    },
}

/// Clamps a requested output into the range a controller accepts.
///
/// # Errors
///
/// Returns [`MotorError::NonFiniteOutput`] when `output` is NaN or infinite.
pub fn clamp_output(output: f64) -> Result<f64, MotorError> {
    snafu::ensure!(output.is_finite(), NonFiniteOutputSnafu { output });
    Ok(output.clamp(-1.0, 1.0))
}
