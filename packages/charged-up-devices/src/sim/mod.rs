//! Simulated devices.
//!
//! Every simulated device keeps its state behind an `Rc<RefCell<_>>`. Cloning a device yields a
//! second handle onto the same state, so a test can move one handle into a subsystem and keep the
//! other to inspect what the subsystem commanded:
//!
//! ```
//! use charged_up_devices::{CanId, motor::{MotorController, MotorType}, sim::SimSparkMax};
//!
//! let motor = SimSparkMax::new(CanId::new(3).unwrap(), MotorType::Brushless);
//! let mut handle = motor.clone();
//!
//! handle.set(0.4).unwrap();
//! assert_eq!(motor.state().output, 0.4);
//! ```
//!
//! Devices can be [disconnected](SimSparkMax::disconnect) to make every call fail with
//! [`CanError::Disconnected`](crate::CanError::Disconnected).

mod pneumatics;
mod spark_max;

pub use pneumatics::{CompressorState, SimCompressor, SimDoubleSolenoid, SolenoidState};
pub use spark_max::{SimSparkMax, SparkMaxState};
