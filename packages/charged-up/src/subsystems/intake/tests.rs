use alloc::boxed::Box;

use charged_up_devices::{
    closed_loop::{ClosedLoopSlot, ControlType, OutputRange, PidGains, SmartMotionConfig},
    dashboard::MemoryDashboard,
    sim::{SimCompressor, SimDoubleSolenoid, SimSparkMax},
};

use super::*;
use crate::constants::robotmap::{intake, pneumatics};

struct Rig {
    rotate: SimSparkMax,
    roller: SimSparkMax,
    solenoid: SimDoubleSolenoid,
    compressor: SimCompressor,
}

impl Rig {
    fn new() -> Self {
        Self {
            rotate: SimSparkMax::new(intake::ROTATE_MOTOR_ID, intake::MOTOR_TYPE),
            roller: SimSparkMax::new(intake::ROLLER_MOTOR_ID, intake::MOTOR_TYPE),
            solenoid: SimDoubleSolenoid::new(
                pneumatics::HUB_ID,
                pneumatics::MODULE_TYPE,
                pneumatics::INTAKE_SOLENOID,
            )
            .unwrap(),
            compressor: SimCompressor::new(pneumatics::HUB_ID, pneumatics::MODULE_TYPE),
        }
    }

    fn hardware(&self) -> IntakeHardware {
        IntakeHardware {
            rotate_motor: Box::new(self.rotate.clone()),
            rotate_encoder: Box::new(self.rotate.clone()),
            rotate_pid: Box::new(self.rotate.clone()),
            roller_motor: Box::new(self.roller.clone()),
            solenoid: Box::new(self.solenoid.clone()),
            compressor: Box::new(self.compressor.clone()),
        }
    }

    fn intake(&self, config: IntakeConfig) -> Intake {
        Intake::new(self.hardware(), config, Box::new(MemoryDashboard::new())).unwrap()
    }
}

#[test]
fn construction_initializes_hardware() {
    let rig = Rig::new();
    rig.rotate.set_rotations(3.0);
    let intake = rig.intake(IntakeConfig::default());

    let rotate = rig.rotate.state();
    assert_eq!(rotate.rotations, 0.0);
    assert_eq!(rotate.factory_resets, 1);
    assert_eq!(rotate.conversion_factor, 18.0);
    assert_eq!(rotate.gains[0], PidGains::new(0.001, 0.001, 0.001));
    assert_eq!(rotate.output_ranges[0], OutputRange::new(-0.2, 0.2));
    assert_eq!(
        rotate.smart_motion[0],
        SmartMotionConfig {
            max_velocity: 100.0,
            min_output_velocity: 0.0,
            max_acceleration: 50.0,
            allowed_error: 0.0,
        }
    );
    assert!(rotate.references.is_empty());

    assert_eq!(rig.roller.state().factory_resets, 1);
    assert_eq!(rig.solenoid.state().value, SolenoidValue::Forward);
    assert!(rig.compressor.state().enabled);

    assert_eq!(intake.initial_position(), 0.0);
    assert!(intake.is_compressor_enabled());
    assert!(!intake.is_flipped());
    assert!(!intake.is_extended());
}

#[test]
fn construction_publishes_gains() {
    let rig = Rig::new();
    let intake = rig.intake(IntakeConfig::default());
    let dashboard = intake.dashboard();

    assert_eq!(dashboard.get_number(keys::P_GAIN, -1.0), 0.001);
    assert_eq!(dashboard.get_number(keys::I_GAIN, -1.0), 0.001);
    assert_eq!(dashboard.get_number(keys::D_GAIN, -1.0), 0.001);
    assert_eq!(dashboard.get_number(keys::I_ZONE, -1.0), 0.0);
    assert_eq!(dashboard.get_number(keys::FEED_FORWARD, -1.0), 0.0);
    assert_eq!(dashboard.get_number(keys::MAX_OUTPUT, -1.0), 0.2);
    assert_eq!(dashboard.get_number(keys::MIN_OUTPUT, -1.0), -0.2);
}

#[test]
fn invalid_config_touches_no_hardware() {
    let rig = Rig::new();
    let config = IntakeConfig::default().with_output_range(OutputRange::new(0.5, -0.5));
    let result = Intake::new(rig.hardware(), config, Box::new(MemoryDashboard::new()));

    assert!(matches!(result, Err(ConfigError::InvalidOutputRange { .. })));
    assert_eq!(rig.rotate.state().factory_resets, 0);
    assert!(rig.solenoid.state().history.is_empty());
    assert!(rig.compressor.state().history.is_empty());
}

#[test]
fn roller_commands_use_fixed_outputs() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    intake.run_intake_in();
    assert_eq!(rig.roller.state().output, 0.4);

    intake.run_intake_out();
    assert_eq!(rig.roller.state().output, -1.0);
}

#[test]
fn toggle_compressor_alternates() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    intake.toggle_compressor();
    assert!(!intake.is_compressor_enabled());
    assert!(!rig.compressor.state().enabled);

    intake.toggle_compressor();
    assert!(intake.is_compressor_enabled());
    assert!(rig.compressor.state().enabled);
    assert_eq!(rig.compressor.state().history, [true, false, true]);
}

#[test]
fn flip_does_not_move_the_arm_by_default() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    intake.flip_intake();
    assert!(intake.is_flipped());
    intake.periodic();
    intake.flip_intake();
    assert!(!intake.is_flipped());
    intake.periodic();

    assert!(rig.rotate.state().references.is_empty());
    assert!(rig.rotate.state().output_history.is_empty());
}

#[test]
fn drive_rotation_follows_flipped() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default().with_drive_rotation(true));

    intake.periodic();
    assert_eq!(rig.rotate.last_reference(), Some((0.0, ControlType::Position)));

    intake.flip_intake();
    intake.periodic();
    assert_eq!(rig.rotate.last_reference(), Some((90.0, ControlType::Position)));

    intake.flip_intake();
    intake.periodic();
    assert_eq!(rig.rotate.last_reference(), Some((0.0, ControlType::Position)));
}

#[test]
fn periodic_stops_the_roller() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    intake.run_intake_in();
    intake.periodic();
    assert_eq!(rig.roller.state().output, 0.0);

    intake.run_intake_out();
    intake.periodic();
    assert_eq!(rig.roller.state().output_history, [0.4, 0.0, -1.0, 0.0]);
}

#[test]
fn toggle_alternates_solenoid() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    intake.toggle();
    assert_eq!(rig.solenoid.state().value, SolenoidValue::Reverse);
    assert!(intake.is_extended());

    intake.toggle();
    assert_eq!(rig.solenoid.state().value, SolenoidValue::Forward);
    assert!(!intake.is_extended());
}

#[test]
fn dashboard_edits_ignored_without_live_tuning() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    intake.dashboard_mut().put_number(keys::P_GAIN, 0.5);
    intake.periodic();

    assert_eq!(rig.rotate.state().gains[0].p, 0.001);
    assert_eq!(intake.config().gains.p, 0.001);
}

#[test]
fn live_tuning_pushes_changed_gains() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default().with_live_tuning(true));

    intake.dashboard_mut().put_number(keys::P_GAIN, 0.5);
    intake.dashboard_mut().put_number(keys::FEED_FORWARD, 0.02);
    intake.periodic();

    let slot = ClosedLoopSlot::PRIMARY.index();
    assert_eq!(
        rig.rotate.state().gains[slot],
        PidGains::new(0.5, 0.001, 0.001).with_ff(0.02)
    );
    assert_eq!(intake.config().gains.p, 0.5);
    assert_eq!(intake.config().gains.ff, 0.02);
    assert_eq!(rig.rotate.state().output_ranges[slot], OutputRange::new(-0.2, 0.2));
}

#[test]
fn live_tuning_pushes_output_range_when_either_bound_changes() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default().with_live_tuning(true));

    intake.dashboard_mut().put_number(keys::MAX_OUTPUT, 0.5);
    intake.periodic();

    assert_eq!(rig.rotate.state().output_ranges[0], OutputRange::new(-0.2, 0.5));
    assert_eq!(intake.config().output_range, OutputRange::new(-0.2, 0.5));
}

#[test]
fn live_tuning_ignores_non_finite_values() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default().with_live_tuning(true));

    intake.dashboard_mut().put_number(keys::D_GAIN, f64::NAN);
    intake.periodic();
    intake.periodic();

    assert_eq!(rig.rotate.state().gains[0].d, 0.001);
    assert_eq!(intake.config().gains.d, 0.001);
}

#[test]
fn live_tuning_ignores_inverted_output_range() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default().with_live_tuning(true));

    intake.dashboard_mut().put_number(keys::MIN_OUTPUT, 0.5);
    intake.periodic();

    assert_eq!(rig.rotate.state().output_ranges[0], OutputRange::new(-0.2, 0.2));
    assert_eq!(intake.config().output_range, OutputRange::new(-0.2, 0.2));
    assert_eq!(intake.config().validate(), Ok(()));
}

#[test]
fn live_tuning_ignores_output_range_beyond_full_power() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default().with_live_tuning(true));

    intake.dashboard_mut().put_number(keys::MAX_OUTPUT, 5.0);
    intake.periodic();
    intake.periodic();

    assert_eq!(rig.rotate.state().output_ranges[0], OutputRange::new(-0.2, 0.2));
    assert_eq!(intake.config().output_range, OutputRange::new(-0.2, 0.2));

    // A valid edit afterwards still goes through.
    intake.dashboard_mut().put_number(keys::MAX_OUTPUT, 0.3);
    intake.periodic();
    assert_eq!(rig.rotate.state().output_ranges[0], OutputRange::new(-0.2, 0.3));
    assert_eq!(intake.config().output_range, OutputRange::new(-0.2, 0.3));
}

/// A dashboard whose connection drops every published entry.
struct Disconnected;

impl Dashboard for Disconnected {
    fn put_number(&mut self, _key: &str, _value: f64) {}

    fn get_number(&self, _key: &str, default: f64) -> f64 {
        default
    }

    fn contains_key(&self, _key: &str) -> bool {
        false
    }
}

#[test]
fn missing_dashboard_keys_keep_current_gains() {
    let rig = Rig::new();
    let mut intake = Intake::new(
        rig.hardware(),
        IntakeConfig::default().with_live_tuning(true),
        Box::new(Disconnected),
    )
    .unwrap();

    intake.periodic();

    assert!(!intake.dashboard().contains_key(keys::P_GAIN));
    assert_eq!(rig.rotate.state().gains[0], PidGains::new(0.001, 0.001, 0.001));
    assert_eq!(rig.rotate.state().output_ranges[0], OutputRange::new(-0.2, 0.2));
}

#[test]
fn device_failures_are_logged_not_fatal() {
    let rig = Rig::new();
    let mut intake = rig.intake(IntakeConfig::default());

    rig.roller.disconnect();
    rig.compressor.disconnect();
    rig.solenoid.disconnect();
    rig.rotate.disconnect();

    intake.run_intake_in();
    intake.toggle_compressor();
    intake.toggle();
    intake.periodic();

    assert!(!intake.is_compressor_enabled());
    assert!(intake.is_extended());
    assert!(rig.compressor.state().enabled);
    assert_eq!(rig.roller.state().output, 0.0);
    assert!(intake.rotation_position().is_err());
}

#[test]
fn construction_survives_missing_devices() {
    let rig = Rig::new();
    rig.rotate.disconnect();
    rig.compressor.disconnect();

    let intake = rig.intake(IntakeConfig::default());
    assert_eq!(intake.initial_position(), 0.0);
    assert!(intake.is_compressor_enabled());
    assert_eq!(rig.rotate.state().factory_resets, 0);
}

#[test]
fn reports_rotation_in_degrees() {
    let rig = Rig::new();
    let intake = rig.intake(IntakeConfig::default());

    rig.rotate.set_rotations(5.0);
    assert_eq!(intake.rotation_position().unwrap(), 90.0);
    assert_eq!(intake.name(), "intake");
}
