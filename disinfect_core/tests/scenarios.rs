//! End-to-end behavior of the device through the shared service and a manual clock.

use disinfect_core::{
    Action, DeviceError, DeviceService, DeviceState, LedStatus, ProgramRef, RunStatus, Screen,
    TickOutcome,
};
use disinfect_traits::ManualClock;

const DAY: u64 = 86_400;

fn service() -> (DeviceService, ManualClock) {
    let clock = ManualClock::new();
    (
        DeviceService::new(DeviceState::default(), clock.clone()),
        clock,
    )
}

fn select(svc: &DeviceService, id: u8) {
    svc.apply(Action::SelectProgram {
        program: ProgramRef::from(id),
    })
    .unwrap();
}

#[test]
fn half_way_through_seven_days() {
    let (svc, clock) = service();
    select(&svc, 1);
    assert_eq!(svc.snapshot().program_duration, 604_800);
    svc.apply(Action::StartProgram { program: None }).unwrap();

    clock.advance_secs(302_400);
    let s = svc.snapshot();
    assert_eq!(s.progress_percent, 50);
    assert_eq!(s.remaining_time, "3 days 12 hours 0 minutes");
    assert_eq!(s.run_status, RunStatus::Running);
}

#[test]
fn custom_program_completes_on_next_tick() {
    let (svc, clock) = service();
    select(&svc, 4);
    svc.apply(Action::SetCustomDays { days: 3 }).unwrap();
    assert_eq!(svc.snapshot().program_duration, 3 * DAY);
    svc.apply(Action::StartProgram { program: None }).unwrap();

    clock.advance_secs(3 * DAY - 1);
    assert_eq!(svc.tick(), TickOutcome::Idle);
    assert_eq!(svc.snapshot().run_status, RunStatus::Running);

    clock.advance_secs(1);
    let s = svc.snapshot();
    assert_eq!(s.progress_percent, 100);
    assert_eq!(s.remaining_time, "Expired");

    assert_eq!(svc.tick(), TickOutcome::Completed);
    let s = svc.snapshot();
    assert_eq!(s.run_status, RunStatus::Completed);
    assert!(!s.motor_active);
    assert_eq!(s.menu_state, Screen::Completed);
    assert_eq!(s.led_status, LedStatus::Completed);
}

#[test]
fn tank_fault_aborts_running_program() {
    let (svc, clock) = service();
    svc.apply(Action::StartProgram { program: None }).unwrap();
    clock.advance_secs(DAY);
    svc.apply(Action::SetTankLevel { level_ok: false }).unwrap();

    let s = svc.snapshot();
    assert_eq!(s.run_status, RunStatus::Error);
    assert!(!s.motor_active);
    assert_eq!(s.menu_state, Screen::ErrorTankLow);
    assert_eq!(s.led_status, LedStatus::Problem);

    // No progress accrues once aborted.
    clock.advance_secs(20 * DAY);
    svc.tick();
    let later = svc.snapshot();
    assert_eq!(later.progress_percent, 0);
    assert_eq!(later.run_status, RunStatus::Error);
}

#[test]
fn idle_on_start_screen_auto_starts_default() {
    let (svc, clock) = service();
    select(&svc, 3);

    assert_eq!(svc.tick(), TickOutcome::Idle); // arms the window
    clock.advance_secs(29);
    assert_eq!(svc.tick(), TickOutcome::Idle);
    clock.advance_secs(1);
    assert_eq!(svc.tick(), TickOutcome::AutoStarted);

    let s = svc.snapshot();
    assert_eq!(s.run_status, RunStatus::Running);
    assert_eq!(s.active_program, 2);
    assert_eq!(s.program_duration, 14 * DAY);
    assert_eq!(s.menu_state, Screen::Running);
}

#[test]
fn leaving_start_screen_restarts_countdown() {
    let (svc, clock) = service();
    svc.tick();
    clock.advance_secs(20);
    svc.tick();

    svc.apply(Action::Navigate {
        screen: Screen::MainMenu,
    })
    .unwrap();
    clock.advance_secs(5);
    svc.tick();
    svc.apply(Action::Navigate {
        screen: Screen::Start,
    })
    .unwrap();

    // 25 s since first arming, but the window restarts on re-entry.
    clock.advance_secs(5);
    assert_eq!(svc.tick(), TickOutcome::Idle);
    clock.advance_secs(29);
    assert_eq!(svc.tick(), TickOutcome::Idle);
    clock.advance_secs(1);
    assert_eq!(svc.tick(), TickOutcome::AutoStarted);
}

#[test]
fn no_auto_start_away_from_start_screen() {
    let (svc, clock) = service();
    svc.apply(Action::Navigate {
        screen: Screen::Settings,
    })
    .unwrap();
    for _ in 0..120 {
        clock.advance_secs(1);
        assert_eq!(svc.tick(), TickOutcome::Idle);
    }
    assert_eq!(svc.snapshot().run_status, RunStatus::Idle);
}

#[test]
fn start_with_program_is_all_or_nothing() {
    let (svc, _clock) = service();
    svc.apply(Action::SetTankLevel { level_ok: false }).unwrap();
    let err = svc
        .apply(Action::StartProgram {
            program: Some(ProgramRef::from(1)),
        })
        .unwrap_err();
    assert_eq!(err, DeviceError::TankFault);
    // Selection did not change either.
    assert_eq!(svc.snapshot().active_program, 2);

    svc.apply(Action::SetTankLevel { level_ok: true }).unwrap();
    let err = svc
        .apply(Action::StartProgram {
            program: Some(ProgramRef::from(9)),
        })
        .unwrap_err();
    assert!(matches!(err, DeviceError::UnknownProgram(_)));
    assert_eq!(svc.snapshot().run_status, RunStatus::Idle);
}

#[test]
fn stop_returns_to_main_menu() {
    let (svc, _clock) = service();
    svc.apply(Action::StartProgram { program: None }).unwrap();
    svc.apply(Action::StopProgram).unwrap();
    let s = svc.snapshot();
    assert_eq!(s.run_status, RunStatus::Idle);
    assert_eq!(s.menu_state, Screen::MainMenu);
    assert_eq!(s.remaining_time, "Ready");
}

#[test]
fn stop_is_idempotent() {
    let (svc, _clock) = service();
    svc.apply(Action::StartProgram { program: None }).unwrap();
    svc.apply(Action::StopProgram).unwrap();
    let first = svc.snapshot();
    svc.apply(Action::StopProgram).unwrap();
    assert_eq!(svc.snapshot(), first);
}

#[test]
fn unknown_action_and_screen_are_accepted() {
    let (svc, _clock) = service();
    let before = svc.snapshot();
    svc.apply(Action::Unknown).unwrap();
    assert_eq!(svc.snapshot(), before);

    svc.apply(Action::Navigate {
        screen: Screen::parse("FIRMWARE_UPDATE"),
    })
    .unwrap();
    assert_eq!(
        svc.snapshot().menu_state,
        Screen::Unrecognized("FIRMWARE_UPDATE".into())
    );
}

#[test]
fn completed_run_needs_reset() {
    let (svc, clock) = service();
    select(&svc, 1);
    svc.apply(Action::StartProgram { program: None }).unwrap();
    clock.advance_secs(7 * DAY);
    svc.tick();
    clock.advance_secs(60);
    assert_eq!(svc.tick(), TickOutcome::Idle);
    assert_eq!(svc.snapshot().run_status, RunStatus::Completed);

    svc.apply(Action::Reset).unwrap();
    let s = svc.snapshot();
    assert_eq!(s.run_status, RunStatus::Idle);
    assert_eq!(s.menu_state, Screen::MainMenu);
    assert_eq!(s.led_status, LedStatus::Normal);
}
