use alloc::{rc::Rc, vec::Vec};
use core::cell::{Ref, RefCell};

use snafu::ensure;

use crate::{
    CanError, CanId, DisconnectedSnafu,
    pneumatics::{
        Compressor, DoubleSolenoid, PneumaticsError, PneumaticsModuleType, SolenoidChannels,
        SolenoidError, SolenoidValue,
    },
};

/// Everything a [`SimDoubleSolenoid`] has been told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolenoidState {
    /// Whether the module answers on the bus.
    pub connected: bool,

    /// Currently energized coil.
    pub value: SolenoidValue,

    /// Every value accepted by [`DoubleSolenoid::set`], oldest first.
    pub history: Vec<SolenoidValue>,
}

impl Default for SolenoidState {
    fn default() -> Self {
        Self {
            connected: true,
            value: SolenoidValue::Off,
            history: Vec::new(),
        }
    }
}

/// Simulated double-acting solenoid on a pneumatics module.
#[derive(Debug, Clone)]
pub struct SimDoubleSolenoid {
    module: CanId,
    module_type: PneumaticsModuleType,
    channels: SolenoidChannels,
    state: Rc<RefCell<SolenoidState>>,
}

impl SimDoubleSolenoid {
    /// Creates a solenoid with both coils off.
    ///
    /// # Errors
    ///
    /// Returns an error if either channel is missing from `module_type` or both coils share a
    /// channel.
    pub fn new(
        module: CanId,
        module_type: PneumaticsModuleType,
        channels: SolenoidChannels,
    ) -> Result<Self, SolenoidError> {
        channels.validate(module_type)?;

        Ok(Self {
            module,
            module_type,
            channels,
            state: Rc::new(RefCell::new(SolenoidState::default())),
        })
    }

    /// Returns the module type the solenoid is wired to.
    #[must_use]
    pub const fn module_type(&self) -> PneumaticsModuleType {
        self.module_type
    }

    /// Returns the coil channels.
    #[must_use]
    pub const fn channels(&self) -> SolenoidChannels {
        self.channels
    }

    /// Borrows the shared state.
    #[must_use]
    pub fn state(&self) -> Ref<'_, SolenoidState> {
        self.state.borrow()
    }

    /// Makes every subsequent call fail as if the module dropped off the bus.
    pub fn disconnect(&self) {
        self.state.borrow_mut().connected = false;
    }

    /// Brings the module back onto the bus.
    pub fn reconnect(&self) {
        self.state.borrow_mut().connected = true;
    }

    fn check_connected(&self) -> Result<(), CanError> {
        ensure!(
            self.state.borrow().connected,
            DisconnectedSnafu {
                id: self.module.get()
            }
        );
        Ok(())
    }
}

impl DoubleSolenoid for SimDoubleSolenoid {
    fn module_id(&self) -> CanId {
        self.module
    }

    fn set(&mut self, value: SolenoidValue) -> Result<(), SolenoidError> {
        self.check_connected()?;

        let mut state = self.state.borrow_mut();
        state.value = value;
        state.history.push(value);
        Ok(())
    }

    fn get(&self) -> Result<SolenoidValue, SolenoidError> {
        self.check_connected()?;
        Ok(self.state.borrow().value)
    }
}

/// Everything a [`SimCompressor`] has been told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressorState {
    /// Whether the module answers on the bus.
    pub connected: bool,

    /// Whether closed-loop control is running.
    pub enabled: bool,

    /// Every accepted enable (`true`) or disable (`false`) command, oldest first.
    pub history: Vec<bool>,
}

impl Default for CompressorState {
    fn default() -> Self {
        Self {
            connected: true,
            enabled: false,
            history: Vec::new(),
        }
    }
}

/// Simulated compressor on a pneumatics module.
#[derive(Debug, Clone)]
pub struct SimCompressor {
    module: CanId,
    module_type: PneumaticsModuleType,
    state: Rc<RefCell<CompressorState>>,
}

impl SimCompressor {
    /// Creates a disabled compressor.
    #[must_use]
    pub fn new(module: CanId, module_type: PneumaticsModuleType) -> Self {
        Self {
            module,
            module_type,
            state: Rc::new(RefCell::new(CompressorState::default())),
        }
    }

    /// Returns the module type the compressor is wired to.
    #[must_use]
    pub const fn module_type(&self) -> PneumaticsModuleType {
        self.module_type
    }

    /// Borrows the shared state.
    #[must_use]
    pub fn state(&self) -> Ref<'_, CompressorState> {
        self.state.borrow()
    }

    /// Makes every subsequent call fail as if the module dropped off the bus.
    pub fn disconnect(&self) {
        self.state.borrow_mut().connected = false;
    }

    /// Brings the module back onto the bus.
    pub fn reconnect(&self) {
        self.state.borrow_mut().connected = true;
    }

    fn command(&self, enabled: bool) -> Result<(), PneumaticsError> {
        ensure!(
            self.state.borrow().connected,
            DisconnectedSnafu {
                id: self.module.get()
            }
        );

        let mut state = self.state.borrow_mut();
        state.enabled = enabled;
        state.history.push(enabled);
        Ok(())
    }
}

impl Compressor for SimCompressor {
    fn module_id(&self) -> CanId {
        self.module
    }

    fn enable_digital(&mut self) -> Result<(), PneumaticsError> {
        self.command(true)
    }

    fn disable(&mut self) -> Result<(), PneumaticsError> {
        self.command(false)
    }

    fn is_enabled(&self) -> Result<bool, PneumaticsError> {
        ensure!(
            self.state.borrow().connected,
            DisconnectedSnafu {
                id: self.module.get()
            }
        );
        Ok(self.state.borrow().enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> CanId {
        CanId::new(10).unwrap()
    }

    fn solenoid() -> SimDoubleSolenoid {
        SimDoubleSolenoid::new(
            hub(),
            PneumaticsModuleType::RevPh,
            SolenoidChannels {
                forward: 0,
                reverse: 1,
            },
        )
        .unwrap()
    }

    #[test]
    fn toggle_alternates_between_positions() {
        let mut valve = solenoid();
        valve.set(SolenoidValue::Forward).unwrap();
        valve.toggle().unwrap();
        valve.toggle().unwrap();
        valve.toggle().unwrap();
        assert_eq!(
            valve.state().history,
            [
                SolenoidValue::Forward,
                SolenoidValue::Reverse,
                SolenoidValue::Forward,
                SolenoidValue::Reverse,
            ]
        );
    }

    #[test]
    fn toggle_leaves_off_valve_alone() {
        let mut valve = solenoid();
        valve.toggle().unwrap();
        assert_eq!(valve.state().value, SolenoidValue::Off);
        assert!(valve.state().history.is_empty());
    }

    #[test]
    fn rejects_invalid_channels() {
        let result = SimDoubleSolenoid::new(
            hub(),
            PneumaticsModuleType::CtrePcm,
            SolenoidChannels {
                forward: 0,
                reverse: 12,
            },
        );
        assert!(matches!(result, Err(SolenoidError::InvalidChannel { .. })));
    }

    #[test]
    fn compressor_follows_commands() {
        let probe = SimCompressor::new(hub(), PneumaticsModuleType::RevPh);
        let mut compressor = probe.clone();
        compressor.enable_digital().unwrap();
        assert!(compressor.is_enabled().unwrap());
        compressor.disable().unwrap();
        assert!(!probe.state().enabled);
        assert_eq!(probe.state().history, [true, false]);
    }

    #[test]
    fn disconnected_module_errors() {
        let mut compressor = SimCompressor::new(hub(), PneumaticsModuleType::RevPh);
        compressor.disconnect();
        assert_eq!(
            compressor.enable_digital(),
            Err(PneumaticsError::Can {
                source: CanError::Disconnected { id: 10 }
            })
        );
    }
}
