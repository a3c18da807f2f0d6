use disinfect_core::progress::{self, from_elapsed, Remaining};
use disinfect_core::{DeviceState, ProgramCatalog, RunStatus};
use proptest::prelude::*;
use std::time::{Duration, Instant};

prop_compose! {
    fn elapsed_within()(duration in 1u64..=365 * 86_400)(
        duration in Just(duration),
        elapsed in 0..duration,
    ) -> (u64, u64) {
        (elapsed, duration)
    }
}

proptest! {
    #[test]
    fn percent_is_floor_of_ratio((elapsed, duration) in elapsed_within()) {
        let p = from_elapsed(elapsed, duration);
        let expected = (u128::from(elapsed) * 100 / u128::from(duration)) as u8;
        prop_assert_eq!(p.percent, expected);
        prop_assert!(p.percent < 100);
        prop_assert_eq!(p.remaining.secs(), Some(duration - elapsed));
    }

    #[test]
    fn percent_never_decreases(duration in 1u64..=30 * 86_400, a in any::<u64>(), b in any::<u64>()) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = lo % (duration * 2);
        let hi = lo.max(hi % (duration * 2));
        prop_assert!(from_elapsed(lo, duration).percent <= from_elapsed(hi, duration).percent);
    }

    #[test]
    fn past_duration_is_expired(duration in 1u64..=30 * 86_400, extra in 0u64..1_000_000) {
        let p = from_elapsed(duration + extra, duration);
        prop_assert_eq!(p.percent, 100);
        prop_assert_eq!(p.remaining, Remaining::Expired);
    }

    #[test]
    fn selected_duration_follows_rule(custom in 1i64..=i64::from(u32::MAX)) {
        let mut d = DeviceState::default();
        d.set_custom_days(custom).unwrap();
        for p in ProgramCatalog::standard().iter() {
            d.select_program(p.id).unwrap();
            let expected = p.rule.duration_secs(u32::try_from(custom).unwrap());
            prop_assert_eq!(d.program_duration(), expected);
        }
        d.select_program(4).unwrap();
        prop_assert_eq!(d.program_duration(), u64::try_from(custom).unwrap() * 86_400);
    }

    #[test]
    fn motor_mirrors_running(steps in proptest::collection::vec(0u8..6, 1..40)) {
        let t0 = Instant::now();
        let mut d = DeviceState::default();
        for (i, step) in steps.into_iter().enumerate() {
            let now = t0 + Duration::from_secs(i as u64 * 3_600);
            match step {
                0 => { let _ = d.start_run(now); }
                1 => d.stop_run(),
                2 => d.set_tank_level(false),
                3 => d.set_tank_level(true),
                4 => { d.tick(now); }
                _ => d.reset(),
            }
            prop_assert_eq!(d.motor_active(), d.run_status() == RunStatus::Running);
            prop_assert!(!(d.run_status() == RunStatus::Running && !d.tank_level_ok()));
        }
    }
}

#[test]
fn idle_progress_is_ready() {
    let now = Instant::now();
    let p = progress::progress(now, None, 604_800, RunStatus::Idle);
    assert_eq!(p.remaining, Remaining::Ready);
    assert_eq!(p.percent, 0);
}
