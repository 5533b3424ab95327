//! Subsystems and the periodic scheduler.
//!
//! The robot framework drives all mechanism code from one fixed-rate loop. Once per control cycle
//! every registered [`Subsystem`] gets its [`periodic`](Subsystem::periodic) hook called, in the
//! order the subsystems were registered. Commands triggered by operator input call subsystem
//! methods directly between cycles, on the same thread, through their own handle to the shared
//! subsystem.

use alloc::{rc::Rc, vec::Vec};
use core::{cell::RefCell, time::Duration};

/// A mechanism that owns its hardware and is ticked once per control cycle.
pub trait Subsystem {
    /// Human-readable name used in log output.
    fn name(&self) -> &str;

    /// Runs once every control cycle.
    fn periodic(&mut self) {}
}

/// Runs the periodic hooks of the robot's subsystems.
///
/// The scheduler does not sleep between cycles. The caller paces [`Scheduler::run`] at
/// [`Scheduler::PERIOD`].
#[derive(Default)]
pub struct Scheduler {
    subsystems: Vec<Rc<RefCell<dyn Subsystem>>>,
    cycles: u64,
}

impl Scheduler {
    /// Nominal time between two control cycles.
    pub const PERIOD: Duration = Duration::from_millis(20);

    /// Creates a scheduler with no subsystems.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            subsystems: Vec::new(),
            cycles: 0,
        }
    }

    /// Adds a subsystem. It is ticked after every subsystem registered before it.
    pub fn register(&mut self, subsystem: Rc<RefCell<dyn Subsystem>>) {
        log::debug!("registered subsystem `{}`", subsystem.borrow().name());
        self.subsystems.push(subsystem);
    }

    /// Runs one control cycle.
    ///
    /// # Panics
    ///
    /// Panics if a subsystem is already borrowed, which happens when `run` is called from inside
    /// a subsystem.
    pub fn run(&mut self) {
        for subsystem in &self.subsystems {
            subsystem.borrow_mut().periodic();
        }
        self.cycles += 1;
    }

    /// Number of completed control cycles.
    #[must_use]
    pub const fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Number of registered subsystems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subsystems.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subsystems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::String, vec};

    use super::*;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Subsystem for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn periodic(&mut self) {
            self.log.borrow_mut().push(String::from(self.name));
        }
    }

    struct Idle;

    impl Subsystem for Idle {
        fn name(&self) -> &str {
            "idle"
        }
    }

    #[test]
    fn ticks_subsystems_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = Scheduler::new();
        scheduler.register(Rc::new(RefCell::new(Recorder {
            name: "intake",
            log: log.clone(),
        })));
        scheduler.register(Rc::new(RefCell::new(Recorder {
            name: "drivetrain",
            log: log.clone(),
        })));

        scheduler.run();
        scheduler.run();

        assert_eq!(
            *log.borrow(),
            vec!["intake", "drivetrain", "intake", "drivetrain"]
        );
        assert_eq!(scheduler.cycles(), 2);
    }

    #[test]
    fn default_periodic_is_a_no_op() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.is_empty());
        scheduler.register(Rc::new(RefCell::new(Idle)));
        scheduler.run();
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.cycles(), 1);
    }

    #[test]
    fn nominal_period_is_twenty_milliseconds() {
        assert_eq!(Scheduler::PERIOD.as_millis(), 20);
    }
}
