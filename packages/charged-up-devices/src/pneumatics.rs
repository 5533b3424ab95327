//! Pneumatic valves and compressors.
//!
//! Pneumatics hang off a control module on the CAN bus, either a CTRE Pneumatics Control Module or
//! a REV Pneumatic Hub. The module switches solenoid channels and runs the compressor until its
//! pressure switch reports that the tanks are full.
//!
//! A double-acting solenoid has two coils. Energizing the forward coil extends the cylinder,
//! energizing the reverse coil retracts it, and with neither energized the valve holds whatever
//! state it was last in.

use snafu::Snafu;

use crate::{CanError, CanId};

/// The kind of pneumatics control module a valve or compressor is attached to.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PneumaticsModuleType {
    /// CTRE Pneumatics Control Module.
    CtrePcm,

    /// REV Pneumatic Hub.
    RevPh,
}

impl PneumaticsModuleType {
    /// Number of solenoid channels on this module.
    #[must_use]
    pub const fn channel_count(&self) -> u8 {
        match self {
            Self::CtrePcm => 8,
            Self::RevPh => 16,
        }
    }
}

/// Commanded state of a double-acting solenoid.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum SolenoidValue {
    /// Neither coil is energized.
    #[default]
    Off,

    /// The forward coil is energized.
    Forward,

    /// The reverse coil is energized.
    Reverse,
}

impl SolenoidValue {
    /// Returns `true` if the value is [`Forward`](SolenoidValue::Forward).
    #[must_use]
    pub const fn is_forward(&self) -> bool {
        matches!(self, Self::Forward)
    }

    /// Returns `true` if the value is [`Reverse`](SolenoidValue::Reverse).
    #[must_use]
    pub const fn is_reverse(&self) -> bool {
        matches!(self, Self::Reverse)
    }
}

/// Swaps `Forward` and `Reverse`. `Off` stays `Off`.
impl core::ops::Not for SolenoidValue {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Off => Self::Off,
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// A pair of channels driving one double-acting solenoid.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct SolenoidChannels {
    /// Channel of the forward coil.
    pub forward: u8,

    /// Channel of the reverse coil.
    pub reverse: u8,
}

impl SolenoidChannels {
    /// Checks that both channels exist on `module` and are distinct.
    ///
    /// # Errors
    ///
    /// Returns [`SolenoidError::InvalidChannel`] or [`SolenoidError::SharedChannel`].
    pub fn validate(&self, module: PneumaticsModuleType) -> Result<(), SolenoidError> {
        let count = module.channel_count();
        for channel in [self.forward, self.reverse] {
            snafu::ensure!(channel < count, InvalidChannelSnafu { channel, count });
        }
        snafu::ensure!(
            self.forward != self.reverse,
            SharedChannelSnafu {
                channel: self.forward
            }
        );
        Ok(())
    }
}

/// A double-acting pneumatic solenoid valve.
pub trait DoubleSolenoid {
    /// Returns the id of the module the valve is wired to.
    fn module_id(&self) -> CanId;

    /// Energizes the coil matching `value`.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the module is not responding.
    fn set(&mut self, value: SolenoidValue) -> Result<(), SolenoidError>;

    /// Returns the most recently commanded value.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the module is not responding.
    fn get(&self) -> Result<SolenoidValue, SolenoidError>;

    /// Switches between [`Forward`](SolenoidValue::Forward) and
    /// [`Reverse`](SolenoidValue::Reverse).
    ///
    /// A valve that is [`Off`](SolenoidValue::Off) is left off.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the module is not responding.
    fn toggle(&mut self) -> Result<(), SolenoidError> {
        let value = self.get()?;
        if value == SolenoidValue::Off {
            return Ok(());
        }
        self.set(!value)
    }
}

/// The compressor attached to a pneumatics module.
pub trait Compressor {
    /// Returns the id of the module the compressor is wired to.
    fn module_id(&self) -> CanId;

    /// Runs the compressor in closed-loop mode, controlled by the digital pressure switch.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the module is not responding.
    fn enable_digital(&mut self) -> Result<(), PneumaticsError>;

    /// Stops the compressor regardless of pressure.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the module is not responding.
    fn disable(&mut self) -> Result<(), PneumaticsError>;

    /// Returns `true` if closed-loop control is enabled.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the module is not responding.
    fn is_enabled(&self) -> Result<bool, PneumaticsError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
/// Errors that can occur when using a solenoid.
pub enum SolenoidError {
    /// The channel does not exist on the module.
    #[snafu(display("solenoid channel {channel} does not exist on a module with {count} channels"))]
    InvalidChannel {
        /// The rejected channel.
        channel: u8,
        /// Channels available on the module.
        count: u8,
    },

    /// Both coils were assigned the same channel.
    #[snafu(display("forward and reverse coils both use channel {channel}"))]
    SharedChannel {
        /// The duplicated channel.
        channel: u8,
    },

    /// Generic CAN related error.
    #[snafu(display("{source}"), context(false))]
    Can {
        /// The source of the error.
        source: CanError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
/// Errors that can occur when using a compressor.
pub enum PneumaticsError {
    /// Generic CAN related error.
    #[snafu(display("{source}"), context(false))]
    Can {
        /// The source of the error.
        source: CanError,
    },
}
