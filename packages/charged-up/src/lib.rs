//! Robot program for the Charged Up competition robot.
//!
//! # Overview
//!
//! Mechanisms are modelled as [subsystems](subsystem::Subsystem) that own their hardware
//! outright. Hardware is handed in as boxed capability traits from [`charged_up_devices`], so the
//! same subsystem code runs against the robot's motor controllers or against simulated devices.
//!
//! ```
//! use charged_up::{
//!     subsystem::Scheduler,
//!     subsystems::{Intake, IntakeConfig, IntakeHardware},
//! };
//! # use charged_up::constants::robotmap::{intake, pneumatics};
//! # use charged_up_devices::{dashboard::MemoryDashboard, sim::*};
//! # let rotate = SimSparkMax::new(intake::ROTATE_MOTOR_ID, intake::MOTOR_TYPE);
//! # let hardware = IntakeHardware {
//! #     rotate_motor: Box::new(rotate.clone()),
//! #     rotate_encoder: Box::new(rotate.clone()),
//! #     rotate_pid: Box::new(rotate),
//! #     roller_motor: Box::new(SimSparkMax::new(intake::ROLLER_MOTOR_ID, intake::MOTOR_TYPE)),
//! #     solenoid: Box::new(
//! #         SimDoubleSolenoid::new(
//! #             pneumatics::HUB_ID,
//! #             pneumatics::MODULE_TYPE,
//! #             pneumatics::INTAKE_SOLENOID,
//! #         )
//! #         .unwrap(),
//! #     ),
//! #     compressor: Box::new(SimCompressor::new(pneumatics::HUB_ID, pneumatics::MODULE_TYPE)),
//! # };
//! # use std::{cell::RefCell, rc::Rc};
//! let config = IntakeConfig::default();
//! let intake = Rc::new(RefCell::new(Intake::new(
//!     hardware,
//!     config,
//!     Box::new(MemoryDashboard::new()),
//! )?));
//!
//! let mut scheduler = Scheduler::new();
//! scheduler.register(intake.clone());
//!
//! // Operator input between cycles.
//! intake.borrow_mut().run_intake_in();
//! scheduler.run();
//! # Ok::<(), charged_up::subsystems::intake::ConfigError>(())
//! ```

#![no_std]

extern crate alloc;

pub mod constants;
pub mod subsystem;
pub mod subsystems;

pub use charged_up_devices as devices;
