//! Relative encoders.
//!
//! The integrated encoder of a brushless motor counts motor rotations from an arbitrary zero.
//! A position conversion factor scales rotations into mechanism units (for example degrees of an
//! arm), and every reading and setpoint is then expressed in those units.

use crate::motor::MotorError;

/// Read and re-zero access to a motor's integrated relative encoder.
pub trait RelativeEncoder {
    /// Returns the current position in mechanism units.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn position(&self) -> Result<f64, MotorError>;

    /// Redefines the current position without moving the motor.
    ///
    /// Setting `0.0` tares the encoder to the current mechanism position.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_position(&mut self, position: f64) -> Result<(), MotorError>;

    /// Sets how many mechanism units one motor rotation corresponds to.
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::NonFiniteOutput`] for non-finite factors, or a CAN error if the
    /// controller is not responding.
    fn set_position_conversion_factor(&mut self, factor: f64) -> Result<(), MotorError>;

    /// Returns the current position conversion factor.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn position_conversion_factor(&self) -> Result<f64, MotorError>;
}
