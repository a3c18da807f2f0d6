//! Readers on other threads only ever see whole operations.

use disinfect_core::{
    Action, DeviceService, DeviceSnapshot, DeviceState, ProgramCatalog, ProgramRef, RunStatus,
};
use disinfect_traits::ManualClock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

fn assert_consistent(s: &DeviceSnapshot, catalog: &ProgramCatalog) {
    assert_eq!(s.motor_active, s.run_status == RunStatus::Running, "{s:?}");
    assert_eq!(s.program_active, s.motor_active, "{s:?}");
    let program = catalog.get(s.active_program).unwrap();
    assert_eq!(s.program_name, program.name, "{s:?}");
    assert_eq!(
        s.program_duration,
        program.rule.duration_secs(s.custom_days),
        "{s:?}"
    );
}

#[test]
fn snapshots_never_observe_partial_changes() {
    let clock = ManualClock::new();
    let svc = DeviceService::new(DeviceState::default(), clock.clone());
    let catalog = svc.catalog();
    let done = AtomicBool::new(false);
    let seen = AtomicUsize::new(0);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    assert_consistent(&svc.snapshot(), &catalog);
                    seen.fetch_add(1, Ordering::Relaxed);
                }
            });
        }

        for i in 0..2_000u32 {
            let id = u8::try_from(i % 4 + 1).unwrap();
            svc.apply(Action::SelectProgram {
                program: ProgramRef::from(id),
            })
            .unwrap();
            svc.apply(Action::SetCustomDays {
                days: i64::from(i % 30 + 1),
            })
            .unwrap();
            let _ = svc.apply(Action::StartProgram { program: None });
            clock.advance_secs(u64::from(i % 5) * 86_400);
            svc.tick();
            match i % 3 {
                0 => {
                    svc.apply(Action::SetTankLevel { level_ok: false }).unwrap();
                    svc.apply(Action::Reset).unwrap();
                    svc.apply(Action::SetTankLevel { level_ok: true }).unwrap();
                }
                1 => svc.apply(Action::StopProgram).unwrap(),
                _ => {}
            }
        }
        done.store(true, Ordering::Release);
    });

    assert!(seen.load(Ordering::Relaxed) > 0);
    assert_consistent(&svc.snapshot(), &catalog);
}
