//! Property tests for the adaptive difficulty engine:
//! - decisions never move more than one level
//! - decisions are reproducible from their input
//! - out-of-range performance is always rejected on the right field

use proptest::prelude::*;

use cogplay_backend::adaptive::{
    AdaptiveConfig, AdaptiveEngine, DifficultyLevel, ExerciseOutcome, PerformanceSnapshot,
    RuleId,
};

fn arb_difficulty_level() -> impl Strategy<Value = DifficultyLevel> {
    prop_oneof![
        Just(DifficultyLevel::Easy),
        Just(DifficultyLevel::Medium),
        Just(DifficultyLevel::Hard),
    ]
}

fn arb_performance() -> impl Strategy<Value = f64> {
    (0u32..=1000u32).prop_map(|v| v as f64 / 10.0)
}

fn arb_outcome() -> impl Strategy<Value = ExerciseOutcome> {
    (arb_difficulty_level(), arb_performance())
        .prop_map(|(difficulty, performance)| ExerciseOutcome::new("bubble-pop", difficulty, performance))
}

fn arb_snapshot() -> impl Strategy<Value = PerformanceSnapshot> {
    (
        arb_difficulty_level(),
        arb_performance(),
        prop::collection::vec(arb_outcome(), 0..12),
    )
        .prop_map(|(current, performance, history)| {
            PerformanceSnapshot::new("bubble-pop", current, performance).with_history(history)
        })
}

fn arb_config() -> impl Strategy<Value = AdaptiveConfig> {
    (1usize..=8, 0u32..=20, 50u32..=95, 5u32..=50).prop_map(|(window, tolerance, high, low)| {
        AdaptiveConfig {
            history_window: window,
            tolerance: tolerance as f64,
            escalate_above: high as f64,
            deescalate_below: low as f64,
            ..Default::default()
        }
    })
}

proptest! {
    #[test]
    fn prop_at_most_one_step(config in arb_config(), snapshot in arb_snapshot()) {
        let engine = AdaptiveEngine::new(config).unwrap();
        let decision = engine.decide(&snapshot).unwrap();
        prop_assert!(snapshot.current_difficulty.steps_to(decision.new_difficulty).abs() <= 1);
    }

    #[test]
    fn prop_direction_matches_rule(snapshot in arb_snapshot()) {
        let decision = AdaptiveEngine::default().decide(&snapshot).unwrap();
        let steps = snapshot.current_difficulty.steps_to(decision.new_difficulty);
        match decision.rule {
            RuleId::Escalate => prop_assert!(steps >= 0),
            RuleId::DeEscalate => prop_assert!(steps <= 0),
            RuleId::HoldErratic | RuleId::HoldSteady => prop_assert_eq!(steps, 0),
        }
    }

    #[test]
    fn prop_decide_is_reproducible(snapshot in arb_snapshot()) {
        let engine = AdaptiveEngine::default();
        let first = engine.decide(&snapshot).unwrap();
        let second = engine.clone().decide(&snapshot.clone()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_trend_window_is_bounded(config in arb_config(), snapshot in arb_snapshot()) {
        let window = config.history_window;
        let decision = AdaptiveEngine::new(config).unwrap().decide(&snapshot).unwrap();
        prop_assert!(decision.trend.samples <= window + 1);
        prop_assert_eq!(
            decision.trend.samples,
            snapshot.recent_history.len().min(window) + 1
        );
    }

    #[test]
    fn prop_out_of_range_rejected(
        current in arb_difficulty_level(),
        excess in 0.001f64..1000.0,
        above in any::<bool>(),
    ) {
        let performance = if above { 100.0 + excess } else { -excess };
        let snapshot = PerformanceSnapshot::new("bubble-pop", current, performance);
        let err = AdaptiveEngine::default().decide(&snapshot).unwrap_err();
        prop_assert_eq!(err.field, "userPerformance");
    }
}
