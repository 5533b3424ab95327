use alloc::{rc::Rc, vec::Vec};
use core::cell::{Ref, RefCell};

use snafu::ensure;

use crate::{
    CanError, CanId,
    closed_loop::{
        ClosedLoopController, ClosedLoopSlot, ControlType, OutputRange, PidGains,
        SmartMotionConfig,
    },
    encoder::RelativeEncoder,
    motor::{self, InvalidOutputRangeSnafu, MotorController, MotorError, MotorType},
};

const SLOTS: usize = ClosedLoopSlot::COUNT as usize;

/// Everything a [`SimSparkMax`] has been told.
#[derive(Debug, Clone, PartialEq)]
pub struct SparkMaxState {
    /// Whether the controller answers on the bus.
    pub connected: bool,

    /// Current duty cycle.
    pub output: f64,

    /// Every duty cycle accepted by [`MotorController::set`], oldest first.
    pub output_history: Vec<f64>,

    /// How many times factory defaults were restored.
    pub factory_resets: usize,

    /// Encoder position in motor rotations.
    pub rotations: f64,

    /// Mechanism units per motor rotation.
    pub conversion_factor: f64,

    /// Gains per slot.
    pub gains: [PidGains; SLOTS],

    /// Output clamp per slot.
    pub output_ranges: [OutputRange; SLOTS],

    /// Motion profile limits per slot.
    pub smart_motion: [SmartMotionConfig; SLOTS],

    /// Every setpoint accepted by [`ClosedLoopController::set_reference`], oldest first.
    pub references: Vec<(f64, ControlType)>,
}

impl SparkMaxState {
    const DEFAULT_CONVERSION_FACTOR: f64 = 1.0;

    fn restore_defaults(&mut self) {
        self.output = 0.0;
        self.conversion_factor = Self::DEFAULT_CONVERSION_FACTOR;
        self.gains = [PidGains::default(); SLOTS];
        self.output_ranges = [OutputRange::FULL; SLOTS];
        self.smart_motion = [SmartMotionConfig::default(); SLOTS];
    }
}

impl Default for SparkMaxState {
    fn default() -> Self {
        Self {
            connected: true,
            output: 0.0,
            output_history: Vec::new(),
            factory_resets: 0,
            rotations: 0.0,
            conversion_factor: Self::DEFAULT_CONVERSION_FACTOR,
            gains: [PidGains::default(); SLOTS],
            output_ranges: [OutputRange::FULL; SLOTS],
            smart_motion: [SmartMotionConfig::default(); SLOTS],
            references: Vec::new(),
        }
    }
}

/// Simulated CAN motor controller with an integrated encoder and onboard PID.
///
/// Implements [`MotorController`], [`RelativeEncoder`] and [`ClosedLoopController`] over the same
/// state, mirroring how a single physical controller exposes all three.
#[derive(Debug, Clone)]
pub struct SimSparkMax {
    id: CanId,
    motor_type: MotorType,
    state: Rc<RefCell<SparkMaxState>>,
}

impl SimSparkMax {
    /// Creates a connected controller with factory default configuration.
    #[must_use]
    pub fn new(id: CanId, motor_type: MotorType) -> Self {
        Self {
            id,
            motor_type,
            state: Rc::new(RefCell::new(SparkMaxState::default())),
        }
    }

    /// Returns the configured motor type.
    #[must_use]
    pub const fn motor_type(&self) -> MotorType {
        self.motor_type
    }

    /// Borrows the shared state.
    ///
    /// # Panics
    ///
    /// Panics if another handle is mutating the state at the same time.
    #[must_use]
    pub fn state(&self) -> Ref<'_, SparkMaxState> {
        self.state.borrow()
    }

    /// Makes every subsequent call fail as if the controller dropped off the bus.
    pub fn disconnect(&self) {
        self.state.borrow_mut().connected = false;
    }

    /// Brings the controller back onto the bus.
    pub fn reconnect(&self) {
        self.state.borrow_mut().connected = true;
    }

    /// Moves the simulated mechanism to `rotations` motor rotations.
    pub fn set_rotations(&self, rotations: f64) {
        self.state.borrow_mut().rotations = rotations;
    }

    /// Returns the most recent setpoint, if any.
    #[must_use]
    pub fn last_reference(&self) -> Option<(f64, ControlType)> {
        self.state.borrow().references.last().copied()
    }

    fn check_connected(&self) -> Result<(), CanError> {
        ensure!(
            self.state.borrow().connected,
            crate::DisconnectedSnafu { id: self.id.get() }
        );
        Ok(())
    }
}

impl MotorController for SimSparkMax {
    fn can_id(&self) -> CanId {
        self.id
    }

    fn set(&mut self, output: f64) -> Result<(), MotorError> {
        self.check_connected()?;
        let output = motor::clamp_output(output)?;

        let mut state = self.state.borrow_mut();
        state.output = output;
        state.output_history.push(output);
        Ok(())
    }

    fn get(&self) -> Result<f64, MotorError> {
        self.check_connected()?;
        Ok(self.state.borrow().output)
    }

    fn restore_factory_defaults(&mut self) -> Result<(), MotorError> {
        self.check_connected()?;

        let mut state = self.state.borrow_mut();
        state.restore_defaults();
        state.factory_resets += 1;
        Ok(())
    }
}

impl RelativeEncoder for SimSparkMax {
    fn position(&self) -> Result<f64, MotorError> {
        self.check_connected()?;
        let state = self.state.borrow();
        Ok(state.rotations * state.conversion_factor)
    }

    fn set_position(&mut self, position: f64) -> Result<(), MotorError> {
        self.check_connected()?;
        ensure!(
            position.is_finite(),
            motor::NonFiniteOutputSnafu { output: position }
        );

        let mut state = self.state.borrow_mut();
        state.rotations = if state.conversion_factor == 0.0 {
            0.0
        } else {
            position / state.conversion_factor
        };
        Ok(())
    }

    fn set_position_conversion_factor(&mut self, factor: f64) -> Result<(), MotorError> {
        self.check_connected()?;
        ensure!(
            factor.is_finite(),
            motor::NonFiniteOutputSnafu { output: factor }
        );

        self.state.borrow_mut().conversion_factor = factor;
        Ok(())
    }

    fn position_conversion_factor(&self) -> Result<f64, MotorError> {
        self.check_connected()?;
        Ok(self.state.borrow().conversion_factor)
    }
}

impl ClosedLoopController for SimSparkMax {
    fn set_gains(&mut self, slot: ClosedLoopSlot, gains: PidGains) -> Result<(), MotorError> {
        self.check_connected()?;
        self.state.borrow_mut().gains[slot.index()] = gains;
        Ok(())
    }

    fn gains(&self, slot: ClosedLoopSlot) -> Result<PidGains, MotorError> {
        self.check_connected()?;
        Ok(self.state.borrow().gains[slot.index()])
    }

    fn set_output_range(
        &mut self,
        slot: ClosedLoopSlot,
        range: OutputRange,
    ) -> Result<(), MotorError> {
        self.check_connected()?;
        ensure!(
            range.is_valid(),
            InvalidOutputRangeSnafu {
                min: range.min,
                max: range.max,
            }
        );

        self.state.borrow_mut().output_ranges[slot.index()] = range;
        Ok(())
    }

    fn output_range(&self, slot: ClosedLoopSlot) -> Result<OutputRange, MotorError> {
        self.check_connected()?;
        Ok(self.state.borrow().output_ranges[slot.index()])
    }

    fn set_smart_motion(
        &mut self,
        slot: ClosedLoopSlot,
        config: SmartMotionConfig,
    ) -> Result<(), MotorError> {
        self.check_connected()?;
        self.state.borrow_mut().smart_motion[slot.index()] = config;
        Ok(())
    }

    fn set_reference(&mut self, value: f64, control: ControlType) -> Result<(), MotorError> {
        self.check_connected()?;
        ensure!(
            value.is_finite(),
            motor::NonFiniteOutputSnafu { output: value }
        );

        self.state.borrow_mut().references.push((value, control));
        Ok(())
    }
}
