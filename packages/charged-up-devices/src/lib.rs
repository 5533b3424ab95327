//! Hardware capability traits for robot subsystems.
//!
//! # Overview
//!
//! This crate describes the devices a subsystem talks to as traits rather than concrete vendor
//! drivers. A motor controller, its relative encoder and its onboard closed-loop controller are
//! three separate capabilities, as are the double-acting solenoid, the compressor and the
//! driver-station dashboard. Subsystems take ownership of boxed implementations at construction
//! and never reach into a global registry.
//!
//! Devices on the CAN bus are addressed with a [`CanId`]:
//!
//! ```
//! use charged_up_devices::CanId;
//!
//! let hub = CanId::new(10).unwrap();
//! assert_eq!(hub.get(), 10);
//! assert!(CanId::new(63).is_err());
//! ```
//!
//! With the `sim` feature enabled, the [`sim`] module provides in-memory devices that record
//! every command they receive, which is how subsystems are exercised off-robot.

#![no_std]

extern crate alloc;

pub mod can;
pub mod closed_loop;
pub mod dashboard;
pub mod encoder;
pub mod motor;
pub mod pneumatics;
#[cfg(feature = "sim")]
pub mod sim;

pub use can::CanId;
use snafu::Snafu;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Snafu)]
/// Generic errors that can take place when talking to a device on the CAN bus.
pub enum CanError {
    /// The requested id is outside of the addressable range.
    #[snafu(display("CAN id {id} is outside of the valid range 0..={}", CanId::MAX))]
    InvalidId {
        /// The id that was rejected.
        id: u8,
    },

    /// No device answered at the given id.
    #[snafu(display("no device is responding at CAN id {id}"))]
    Disconnected {
        /// The id of the device that stopped responding.
        id: u8,
    },
}
