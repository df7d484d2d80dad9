//! Tests for sprint stamina budget.

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    use crate::config::SprintConfig;
    use crate::sprint::{SprintController, SprintPhase, StaminaTickOutcome};

    const FRAME: f32 = 1.0 / 60.0;

    /// Тикаем по FRAME пока predicate не сработает; возвращает (время, outcome этого tick)
    fn run_until(
        sprint: &mut SprintController,
        start: f64,
        limit: f64,
        mut predicate: impl FnMut(&SprintController, &StaminaTickOutcome) -> bool,
    ) -> (f64, StaminaTickOutcome) {
        let mut time = start;
        loop {
            let outcome = sprint.tick(FRAME);
            time += FRAME as f64;
            if predicate(sprint, &outcome) {
                return (time, outcome);
            }
            assert!(time < limit, "condition not reached before t = {}", limit);
        }
    }

    #[test]
    fn test_full_drain_and_recovery_scenario() {
        // max 10, 1/s, шаг 0.1, cooldown 1.5, порог 10%
        let mut sprint = SprintController::new(SprintConfig::default());
        assert!(sprint.engage());
        assert_eq!(sprint.multiplier(), 1.5);

        let (emptied_at, _) = run_until(&mut sprint, 0.0, 20.0, |_, o| o.emptied);
        assert!((emptied_at - 10.0).abs() <= 2.0 * FRAME as f64, "emptied at {}", emptied_at);
        assert_eq!(sprint.current(), 0.0);
        assert_eq!(sprint.multiplier(), 1.0);
        assert!(!sprint.able_to_sprint());

        // пока не восстановилось: engage игнорируется
        assert!(!sprint.engage());

        let (recovered_at, _) = run_until(&mut sprint, emptied_at, 30.0, |_, o| o.recovered);
        // первый шаг на 11.5, порог 1.0 пересекается на 10-м (±1) шаге
        assert!(recovered_at >= 12.4 - FRAME as f64, "recovered at {}", recovered_at);
        assert!(recovered_at <= 12.5 + 2.0 * FRAME as f64, "recovered at {}", recovered_at);
        assert!(sprint.able_to_sprint());
        assert!(sprint.fraction() >= 0.1);

        let (full_at, _) = run_until(&mut sprint, recovered_at, 40.0, |s, _| s.phase() == SprintPhase::Idle);
        assert!((full_at - 21.4).abs() <= 2.0 * FRAME as f64, "full at {}", full_at);
        assert_eq!(sprint.current(), 10.0);
    }

    #[test]
    fn test_empty_and_recovered_fire_once() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();

        let mut emptied = 0;
        let mut recovered = 0;
        for _ in 0..(30 * 60) {
            let outcome = sprint.tick(FRAME);
            emptied += outcome.emptied as u32;
            recovered += outcome.recovered as u32;
        }

        assert_eq!(emptied, 1);
        assert_eq!(recovered, 1);
        assert_eq!(sprint.phase(), SprintPhase::Idle);
    }

    #[test]
    fn test_release_mid_sprint_recovers_without_notification() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();
        for _ in 0..(5 * 60) {
            sprint.tick(FRAME);
        }
        assert!(sprint.current() < 10.0);

        assert!(sprint.release());
        assert_eq!(sprint.multiplier(), 1.0);
        assert!(matches!(sprint.phase(), SprintPhase::Cooldown { .. }));

        let mut recovered = false;
        for _ in 0..(20 * 60) {
            recovered |= sprint.tick(FRAME).recovered;
        }

        // порог не пересекался, stamina всё время была доступна
        assert!(!recovered);
        assert_eq!(sprint.current(), 10.0);
        assert_eq!(sprint.phase(), SprintPhase::Idle);
    }

    #[test]
    fn test_release_below_threshold_notifies_on_crossing() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();
        // ~9.5 s бега → остаётся около 0.4
        for _ in 0..570 {
            sprint.tick(FRAME);
        }
        assert!(sprint.able_to_sprint());
        assert!(sprint.fraction() < 0.1);

        sprint.release();
        let mut recovered = 0;
        for _ in 0..(20 * 60) {
            recovered += sprint.tick(FRAME).recovered as u32;
        }
        assert_eq!(recovered, 1);
    }

    #[test]
    fn test_release_on_last_step_exhausts() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();

        // 9.95 s: последний шаг (t = 9.9) уже съел stamina, exhaust ещё не наступил
        let mut emptied = 0;
        for _ in 0..597 {
            emptied += sprint.tick(FRAME).emptied as u32;
        }
        assert_eq!(emptied, 0);
        assert!(sprint.current() <= crate::sprint::STAMINA_EPSILON);

        assert!(sprint.release());
        assert!(!sprint.able_to_sprint());
        assert_eq!(sprint.current(), 0.0);
        assert!(!sprint.engage());

        let mut recovered = 0;
        for _ in 0..(20 * 60) {
            let outcome = sprint.tick(FRAME);
            emptied += outcome.emptied as u32;
            recovered += outcome.recovered as u32;
        }

        assert_eq!(emptied, 1);
        assert_eq!(recovered, 1);
        assert_eq!(sprint.phase(), SprintPhase::Idle);
    }

    #[test]
    fn test_release_without_sprint_is_ignored() {
        let mut sprint = SprintController::new(SprintConfig::default());

        assert!(!sprint.release());
        assert_eq!(sprint.phase(), SprintPhase::Idle);
        assert_eq!(sprint.multiplier(), 1.0);
    }

    #[test]
    fn test_reengage_interrupts_recovery() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();
        for _ in 0..120 {
            sprint.tick(FRAME);
        }
        sprint.release();
        // cooldown + немного восстановления
        for _ in 0..120 {
            sprint.tick(FRAME);
        }
        assert!(matches!(sprint.phase(), SprintPhase::Recovering { .. }));
        let before = sprint.current();

        assert!(sprint.engage());
        for _ in 0..30 {
            sprint.tick(FRAME);
        }

        assert!(sprint.is_sprinting());
        assert!(sprint.current() < before);
    }

    #[test]
    fn test_long_frame_catches_up() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();

        let outcome = sprint.tick(100.0);

        assert!(outcome.emptied);
        assert!(outcome.recovered);
        assert_eq!(sprint.phase(), SprintPhase::Idle);
        assert_eq!(sprint.current(), 10.0);
    }

    #[test]
    fn test_stamina_stays_in_range_under_random_input() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut sprint = SprintController::new(SprintConfig::default());
        let mut exhaustions = 0;
        let mut emptied = 0;

        for _ in 0..20_000 {
            let was_able = sprint.able_to_sprint();
            match rng.gen_range(0..100) {
                0..=2 => {
                    sprint.engage();
                }
                3..=5 => {
                    sprint.release();
                }
                _ => {}
            }

            let delta = rng.gen_range(0.001..0.25);
            emptied += sprint.tick(delta).emptied as u32;
            exhaustions += (was_able && !sprint.able_to_sprint()) as u32;

            assert!(sprint.current() >= 0.0);
            assert!(sprint.current() <= 10.0);
            assert!(sprint.multiplier() >= 1.0);
            // множитель > 1 только во время sprint
            assert_eq!(sprint.multiplier() > 1.0, sprint.is_sprinting());
            // пустая stamina вне sprint всегда означает исчерпание
            if sprint.current() <= crate::sprint::STAMINA_EPSILON && !sprint.is_sprinting() {
                assert!(!sprint.able_to_sprint());
            }
        }

        // каждое исчерпание сообщено ровно один раз
        assert!(exhaustions > 0);
        assert_eq!(emptied, exhaustions);
    }

    #[test]
    fn test_reset_restores_full_budget() {
        let mut sprint = SprintController::new(SprintConfig::default());
        sprint.engage();
        sprint.tick(20.0);

        sprint.reset();

        assert_eq!(sprint.current(), 10.0);
        assert_eq!(sprint.phase(), SprintPhase::Idle);
        assert!(sprint.able_to_sprint());
        assert_eq!(sprint.multiplier(), 1.0);
    }
}
