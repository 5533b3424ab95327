//! Mechanism subsystems.
//!
//! Each subsystem owns the devices of one mechanism and implements
//! [`Subsystem`](crate::subsystem::Subsystem) so the scheduler can tick it.

pub mod intake;

pub use intake::{Intake, IntakeConfig, IntakeHardware};
