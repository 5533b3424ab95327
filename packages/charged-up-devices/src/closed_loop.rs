//! Onboard closed-loop control.
//!
//! Smart motor controllers run their own PID loop against the integrated encoder. Subsystems do
//! not implement the control law themselves; they upload gains and limits into one of the
//! controller's parameter slots and then hand it setpoints. Keeping this behind the
//! [`ClosedLoopController`] trait lets the control law be swapped out or simulated.

use crate::motor::MotorError;

/// What a setpoint passed to [`ClosedLoopController::set_reference`] means.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ControlType {
    /// Open-loop duty cycle in `[-1.0, 1.0]`.
    DutyCycle,

    /// Position in mechanism units, held with the PID loop.
    Position,

    /// Velocity in mechanism units per minute, held with the PID loop.
    Velocity,

    /// Position reached with a trapezoidal motion profile bounded by the slot's
    /// [`SmartMotionConfig`].
    SmartMotion,
}

/// One of the parameter slots a controller stores gains in.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ClosedLoopSlot(u8);

impl ClosedLoopSlot {
    /// Number of slots available on a controller.
    pub const COUNT: u8 = 4;

    /// Slot 0, used when nothing else is requested.
    pub const PRIMARY: Self = Self(0);

    /// Creates a slot handle, or [`None`] if `index` is out of range.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Returns the slot index.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// PID and feed-forward constants of a single slot.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct PidGains {
    /// The proportional constant.
    pub p: f64,

    /// The integral constant.
    pub i: f64,

    /// The derivative constant.
    pub d: f64,

    /// The error band outside of which the integrator is reset.
    ///
    /// Zero disables the zone.
    pub i_zone: f64,

    /// The feed-forward constant.
    pub ff: f64,
}

impl PidGains {
    /// Creates gains with no integral zone and no feed-forward.
    #[must_use]
    pub const fn new(p: f64, i: f64, d: f64) -> Self {
        Self {
            p,
            i,
            d,
            i_zone: 0.0,
            ff: 0.0,
        }
    }

    /// Sets the integral zone.
    #[must_use]
    pub const fn with_i_zone(mut self, i_zone: f64) -> Self {
        self.i_zone = i_zone;
        self
    }

    /// Sets the feed-forward constant.
    #[must_use]
    pub const fn with_ff(mut self, ff: f64) -> Self {
        self.ff = ff;
        self
    }
}

/// Clamp applied to the output of the PID loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputRange {
    /// Most negative duty cycle the loop may command.
    pub min: f64,

    /// Most positive duty cycle the loop may command.
    pub max: f64,
}

impl OutputRange {
    /// The full `[-1.0, 1.0]` range.
    pub const FULL: Self = Self::new(-1.0, 1.0);

    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `min <= max` and both bounds lie in `[-1.0, 1.0]`.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min <= self.max && self.min >= -1.0 && self.max <= 1.0
    }
}

impl Default for OutputRange {
    fn default() -> Self {
        Self::FULL
    }
}

/// Motion profile limits used by [`ControlType::SmartMotion`].
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SmartMotionConfig {
    /// Cruise velocity in rpm.
    pub max_velocity: f64,

    /// Smallest velocity the profile will command, in rpm.
    pub min_output_velocity: f64,

    /// Acceleration limit in rpm per second.
    pub max_acceleration: f64,

    /// Error band in which the profile counts as finished, in mechanism units.
    pub allowed_error: f64,
}

/// Injected closed-loop control capability of a motor controller.
pub trait ClosedLoopController {
    /// Uploads all gains of a slot at once.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_gains(&mut self, slot: ClosedLoopSlot, gains: PidGains) -> Result<(), MotorError>;

    /// Returns the gains currently stored in a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn gains(&self, slot: ClosedLoopSlot) -> Result<PidGains, MotorError>;

    /// Sets the clamp applied to the loop's output.
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::InvalidOutputRange`] for an inverted or out of bounds range, or a
    /// CAN error if the controller is not responding.
    fn set_output_range(
        &mut self,
        slot: ClosedLoopSlot,
        range: OutputRange,
    ) -> Result<(), MotorError>;

    /// Returns the output clamp of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn output_range(&self, slot: ClosedLoopSlot) -> Result<OutputRange, MotorError>;

    /// Uploads the motion profile limits of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_smart_motion(
        &mut self,
        slot: ClosedLoopSlot,
        config: SmartMotionConfig,
    ) -> Result<(), MotorError>;

    /// Hands the controller a new setpoint.
    ///
    /// # Errors
    ///
    /// Returns [`MotorError::NonFiniteOutput`] for non-finite setpoints, or a CAN error if the
    /// controller is not responding.
    fn set_reference(&mut self, value: f64, control: ControlType) -> Result<(), MotorError>;

    /// Sets only the proportional constant of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_p(&mut self, slot: ClosedLoopSlot, p: f64) -> Result<(), MotorError> {
        let gains = self.gains(slot)?;
        self.set_gains(slot, PidGains { p, ..gains })
    }

    /// Sets only the integral constant of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_i(&mut self, slot: ClosedLoopSlot, i: f64) -> Result<(), MotorError> {
        let gains = self.gains(slot)?;
        self.set_gains(slot, PidGains { i, ..gains })
    }

    /// Sets only the derivative constant of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_d(&mut self, slot: ClosedLoopSlot, d: f64) -> Result<(), MotorError> {
        let gains = self.gains(slot)?;
        self.set_gains(slot, PidGains { d, ..gains })
    }

    /// Sets only the integral zone of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_i_zone(&mut self, slot: ClosedLoopSlot, i_zone: f64) -> Result<(), MotorError> {
        let gains = self.gains(slot)?;
        self.set_gains(slot, PidGains { i_zone, ..gains })
    }

    /// Sets only the feed-forward constant of a slot.
    ///
    /// # Errors
    ///
    /// Returns a CAN error if the controller is not responding.
    fn set_ff(&mut self, slot: ClosedLoopSlot, ff: f64) -> Result<(), MotorError> {
        let gains = self.gains(slot)?;
        self.set_gains(slot, PidGains { ff, ..gains })
    }
}
