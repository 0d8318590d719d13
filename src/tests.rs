//! Crate-level tests for `poker_lingo`.
//!
//! Included from `lib.rs` under `#[cfg(test)]`.
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Classifier | Order independence over all 52×52 pairs; pair/suited/offsuit suffixes; grid agrees with `classify` |
//! | Charts | Toggle is an involution; resolve membership; unknown charts fold |
//! | Source | Remote success; every remote failure falls through; fallback rotation order |
//! | Progression | Reward/penalty arithmetic; bankruptcy on the fifth miss; level-up; refill; reset; gating |
//! | Fetch tickets | Stale results are discarded whichever order they resolve in |
//! | Chart drill | Chart-graded hands follow the active chart |
//! | Persistence | Session round trip; corrupt snapshots ignored; bankrupt stack restored as bankrupt |

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::training_engine::{
    deck::Deck,
    source::fallback::FallbackRotation,
    *,
};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Remote collection that is never reachable.
struct Offline;

#[async_trait]
impl ScenarioCollection for Offline {
    async fn count(&self) -> Result<u64, SourceError> {
        Err(SourceError::Unreachable("connection refused".into()))
    }

    async fn row_at(&self, _offset: u64) -> Result<Option<ScenarioRow>, SourceError> {
        Err(SourceError::Unreachable("connection refused".into()))
    }
}

/// Remote collection whose count promises rows it cannot return.
struct Hollow;

#[async_trait]
impl ScenarioCollection for Hollow {
    async fn count(&self) -> Result<u64, SourceError> {
        Ok(5)
    }

    async fn row_at(&self, _offset: u64) -> Result<Option<ScenarioRow>, SourceError> {
        Ok(None)
    }
}

fn row(id: &str, action: Action) -> ScenarioRow {
    ScenarioRow {
        id: id.into(),
        context: json!({
            "holeCards": [{"rank": "A", "suit": "spades"}, {"rank": "K", "suit": "spades"}],
            "communityCards": [],
            "potSize": 30,
            "position": "BTN"
        }),
        correct_action: action,
        chip_explanation: format!("{action} here."),
        difficulty: Difficulty::Easy,
    }
}

fn seeded(generative_enabled: bool) -> SourceConfig {
    SourceConfig { generative_enabled, rng_seed: Some(42) }
}

/// Source whose every scenario expects `action`.
fn fixed_source(action: Action) -> Arc<ScenarioSource> {
    let rows = StaticCollection::new(vec![row("r1", action)]);
    Arc::new(ScenarioSource::new(seeded(true)).with_remote(Arc::new(rows)))
}

fn engine_with(source: Arc<ScenarioSource>) -> ProgressionEngine {
    ProgressionEngine::new(source, RangeChartStore::new(), EconomyConfig::default())
}

/// Engine whose every scenario expects `Raise`.
fn raise_engine() -> ProgressionEngine {
    engine_with(fixed_source(Action::Raise))
}

// ── classifier ───────────────────────────────────────────────────────────────

#[test]
fn classify_is_order_independent_over_every_pair() {
    let cards = Deck::ordered();
    for &a in &cards {
        for &b in &cards {
            if a == b {
                continue;
            }
            assert_eq!(classify(a, b), classify(b, a), "{a} {b}");
        }
    }
}

#[test]
fn classify_suffix_follows_ranks_and_suits() {
    let cards = Deck::ordered();
    for &a in &cards {
        for &b in &cards {
            if a == b {
                continue;
            }
            let text = classify(a, b).to_string();
            if a.rank == b.rank {
                assert_eq!(text, format!("{}{}", a.rank, a.rank));
            } else if a.suit == b.suit {
                assert!(text.ends_with('s'), "{a} {b} → {text}");
            } else {
                assert!(text.ends_with('o'), "{a} {b} → {text}");
            }
            // High card first.
            assert_eq!(&text[..1], a.rank.max(b.rank).symbol());
        }
    }
}

#[test]
fn grid_agrees_with_classifier() {
    let grid = build_grid();
    for i in 0..13 {
        for j in 0..13 {
            let (ri, rj) = (Rank::DESCENDING[i], Rank::DESCENDING[j]);
            let second_suit = if i < j { Suit::Spades } else { Suit::Hearts };
            let hand = classify(Card::new(ri, Suit::Spades), Card::new(rj, second_suit));
            assert_eq!(grid[i][j], hand, "cell ({i}, {j})");
        }
    }
}

// ── range charts ─────────────────────────────────────────────────────────────

#[test]
fn toggle_twice_restores_the_chart() {
    let original = RangeChartStore::new();
    for hand in all_hands() {
        let mut store = original.clone();
        let id = range_chart::DEFAULT_CHART_ID;
        let was = store.contains(id, hand);
        assert_eq!(store.toggle(id, hand), !was);
        assert_eq!(store.toggle(id, hand), was);
        assert_eq!(store, original, "{hand}");
    }
}

#[test]
fn resolve_raises_exactly_the_members() {
    let mut store = RangeChartStore::new();
    let id = store.create("Button");
    for hand in ["A5s", "KQo", "77"] {
        store.toggle(&id, hand.parse().unwrap());
    }
    for hand in all_hands() {
        let expected = if store.contains(&id, hand) { Action::Raise } else { Action::Fold };
        assert_eq!(store.resolve(&id, hand), expected, "{hand}");
        assert_eq!(store.resolve("no-such-chart", hand), Action::Fold);
    }
    assert_eq!(store.chart(&id).unwrap().hands.len(), 3);
}

// ── scenario source ──────────────────────────────────────────────────────────

#[tokio::test]
async fn remote_tier_wins_when_available() {
    let s = fixed_source(Action::Call).fetch().await;
    assert_eq!(s.origin, Origin::Remote);
    assert_eq!(s.id, "r1");
    assert_eq!(s.correct_action, Action::Call);
}

#[tokio::test]
async fn remote_failures_fall_through_to_generation() {
    let mut malformed = row("bad", Action::Fold);
    malformed.context = json!({ "communityCards": [], "potSize": 10 });

    let remotes: Vec<Arc<dyn ScenarioCollection>> = vec![
        Arc::new(Offline),
        Arc::new(Hollow),
        Arc::new(StaticCollection::default()),
        Arc::new(StaticCollection::new(vec![malformed])),
    ];
    for remote in remotes {
        let s = ScenarioSource::new(seeded(true)).with_remote(remote).fetch().await;
        assert!(matches!(s.origin, Origin::Generated(_)), "got {:?}", s.origin);
    }
    let s = ScenarioSource::new(seeded(true)).fetch().await;
    assert!(matches!(s.origin, Origin::Generated(_)));
}

#[tokio::test]
async fn fallback_cycles_in_order_when_other_tiers_are_down() {
    let source = ScenarioSource::new(seeded(false)).with_remote(Arc::new(Offline));
    let mut previous: Option<String> = None;
    for round in 0..7 {
        let s = source.fetch().await;
        let index = round % FallbackRotation::len();
        assert_eq!(s.origin, Origin::Fallback(index));
        let base = FallbackRotation::base_id(index);
        assert!(s.id.starts_with(&format!("{base}_")), "{} vs {base}", s.id);
        if let Some(prev) = &previous {
            assert_ne!(prev, base, "same fallback entry twice in a row");
        }
        previous = Some(base.to_string());
    }
}

#[tokio::test]
async fn generated_scenarios_have_unique_ids() {
    let source = ScenarioSource::new(seeded(true));
    let mut ids = std::collections::HashSet::new();
    for _ in 0..200 {
        let s = source.fetch().await;
        assert!(s.id.starts_with("gen_"));
        assert!(ids.insert(s.id));
    }
}

#[tokio::test]
async fn same_seed_generates_same_cards() {
    let a = ScenarioSource::new(seeded(true)).fetch().await;
    let b = ScenarioSource::new(seeded(true)).fetch().await;
    assert_eq!(a.hole_cards, b.hole_cards);
    assert_eq!(a.community_cards, b.community_cards);
    assert_eq!(a.origin, b.origin);
}

// ── progression ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn correct_answers_pay_fifty_plus_ten_per_streak() {
    let mut engine = raise_engine();
    for streak in 0..6u32 {
        assert!(engine.advance_now().await);
        let before = *engine.state();
        assert_eq!(before.streak, streak);
        let outcome = engine.submit(Action::Raise).unwrap();
        assert!(outcome.correct);
        let after = *engine.state();
        assert_eq!(after.stack, before.stack + 50 + 10 * streak);
        assert_eq!(after.score, before.score + 100);
        assert_eq!(after.streak, streak + 1);
        assert_eq!(outcome.stack_delta, i64::from(50 + 10 * streak));
        assert_eq!(engine.phase(), Phase::FeedbackCorrect);
    }
}

#[tokio::test]
async fn wrong_answer_resets_streak_and_costs_two_hundred() {
    let mut engine = raise_engine();
    engine.advance_now().await;
    engine.submit(Action::Raise);
    engine.advance_now().await;
    engine.submit(Action::Raise);
    assert_eq!(engine.state().streak, 2);
    let before = engine.state().stack;

    engine.advance_now().await;
    let outcome = engine.submit(Action::Fold).unwrap();
    assert!(!outcome.correct);
    assert_eq!(outcome.correct_action, Action::Raise);
    assert_eq!(outcome.explanation, "raise here.");
    assert_eq!(engine.state().streak, 0);
    assert_eq!(engine.state().stack, before - 200);
    assert_eq!(engine.phase(), Phase::FeedbackWrong);
}

#[tokio::test]
async fn five_misses_from_a_full_stack_bankrupt_on_the_fifth() {
    let mut engine = raise_engine();
    for miss in 1..=5u32 {
        assert!(engine.advance_now().await, "miss {miss} could not advance");
        let outcome = engine.submit(Action::Fold).unwrap();
        assert_eq!(engine.state().stack, 1000 - 200 * miss);
        let last = miss == 5;
        assert_eq!(outcome.bankrupt, last);
        assert_eq!(engine.state().bankrupt, last);
    }
    assert_eq!(engine.phase(), Phase::Bankrupt);
    // Bankrupt blocks everything except refill and reset.
    assert!(engine.request_next().is_none());
    assert!(!engine.advance_now().await);
    assert!(engine.submit(Action::Raise).is_none());
}

#[tokio::test]
async fn penalty_never_takes_the_stack_below_zero() {
    let mut engine = raise_engine();
    engine.restore(ProgressionSnapshot { stack: 150, ..Default::default() });
    engine.advance_now().await;
    let outcome = engine.submit(Action::Call).unwrap();
    assert_eq!(outcome.stack_delta, -150);
    assert_eq!(engine.state().stack, 0);
    assert!(engine.state().bankrupt);
}

#[tokio::test]
async fn level_up_recomputes_threshold() {
    let mut engine = raise_engine();
    engine.restore(ProgressionSnapshot {
        stack: 1000,
        score: 0,
        streak: 0,
        xp: 490,
        level: 3,
        xp_to_next_level: 500,
    });
    engine.advance_now().await;
    let outcome = engine.submit(Action::Raise).unwrap();
    let s = engine.state();
    assert_eq!(s.xp, 540);
    assert_eq!(s.level, 4);
    assert_eq!(s.xp_to_next_level, 2000);
    assert_eq!(outcome.level_up, Some(4));
}

#[tokio::test]
async fn no_level_up_below_threshold() {
    let mut engine = raise_engine();
    engine.advance_now().await;
    let outcome = engine.submit(Action::Raise).unwrap();
    assert_eq!(outcome.level_up, None);
    assert_eq!(engine.state().level, 1);
    assert_eq!(engine.state().xp, 50);
    assert_eq!(engine.state().xp_to_next_level, 500);
}

#[tokio::test]
async fn refill_only_leaves_bankrupt() {
    let mut engine = raise_engine();
    assert!(engine.refill().is_none());

    engine.advance_now().await;
    engine.submit(Action::Raise);
    assert!(engine.refill().is_none(), "refill must not work outside Bankrupt");

    engine.restore(ProgressionSnapshot { stack: 200, streak: 0, xp: 120, level: 2, score: 700, xp_to_next_level: 1000 });
    engine.advance_now().await;
    engine.submit(Action::Fold);
    assert_eq!(engine.phase(), Phase::Bankrupt);

    let pending = engine.refill().unwrap();
    let s = *engine.state();
    assert_eq!(s.stack, 1000);
    assert_eq!(s.streak, 0);
    assert!(!s.bankrupt);
    assert_eq!((s.score, s.xp, s.level), (700, 120, 2));
    assert!(engine.is_loading());
    assert!(engine.complete(pending).await);
    assert_eq!(engine.phase(), Phase::AwaitingAction);
}

#[tokio::test]
async fn reset_restores_initial_values_from_any_phase() {
    let mut engine = raise_engine();
    engine.restore(ProgressionSnapshot { stack: 200, level: 5, xp: 2400, xp_to_next_level: 2500, score: 900, streak: 3 });
    engine.advance_now().await;
    engine.submit(Action::Fold);
    assert_eq!(engine.phase(), Phase::Bankrupt);

    let pending = engine.reset();
    assert_eq!(*engine.state(), ProgressionState::default());
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.complete(pending).await);
}

#[tokio::test]
async fn out_of_sequence_calls_are_no_ops() {
    let mut engine = raise_engine();
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(engine.submit(Action::Raise).is_none());

    engine.advance_now().await;
    assert_eq!(engine.phase(), Phase::AwaitingAction);
    assert!(engine.request_next().is_none(), "cannot skip an unanswered scenario");

    engine.submit(Action::Raise);
    let state = *engine.state();
    assert!(engine.submit(Action::Raise).is_none(), "second submit must not score");
    assert_eq!(*engine.state(), state);
}

// ── fetch tickets ────────────────────────────────────────────────────────────

#[tokio::test]
async fn newer_request_wins_when_it_resolves_first() {
    let mut engine = engine_with(Arc::new(ScenarioSource::new(seeded(true))));
    let first = engine.request_next().unwrap();
    let second = engine.request_next().unwrap();
    assert_ne!(first.ticket(), second.ticket());

    let (t2, s2) = second.resolve().await;
    let (t1, s1) = first.resolve().await;
    let winner = s2.id.clone();
    assert!(engine.deliver(t2, s2));
    assert!(!engine.deliver(t1, s1));
    assert_eq!(engine.scenario().unwrap().id, winner);
    assert!(!engine.is_loading());
}

#[tokio::test]
async fn stale_result_resolving_first_is_discarded() {
    let mut engine = engine_with(Arc::new(ScenarioSource::new(seeded(true))));
    let first = engine.request_next().unwrap();
    let second = engine.request_next().unwrap();

    let (t1, s1) = first.resolve().await;
    assert!(!engine.deliver(t1, s1));
    assert!(engine.is_loading());
    assert_eq!(engine.phase(), Phase::Idle);

    assert!(engine.complete(second).await);
    assert_eq!(engine.phase(), Phase::AwaitingAction);
}

#[tokio::test]
async fn restore_invalidates_pending_fetch() {
    let mut engine = raise_engine();
    let pending = engine.request_next().unwrap();
    engine.restore(ProgressionSnapshot::default());
    assert!(!engine.complete(pending).await);
    assert!(engine.scenario().is_none());
}

// ── chart drill ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn chart_drill_grades_against_the_active_chart() {
    let mut engine = raise_engine();
    engine.set_mode(DrillMode::ChartDrill);
    let id = engine.charts_mut().create("Everything");
    for hand in all_hands() {
        engine.charts_mut().toggle(&id, hand);
    }
    for _ in 0..20 {
        assert!(engine.advance_now().await);
        let scenario = engine.scenario().unwrap();
        assert_eq!(scenario.grading, Grading::ActiveChart);
        assert_eq!(scenario.origin, Origin::ChartDeal);
        assert_ne!(scenario.hole_cards[0], scenario.hole_cards[1]);
        let outcome = engine.submit(Action::Raise).unwrap();
        assert!(outcome.correct);
        assert!(outcome.hand.is_some());
        assert!(outcome.explanation.contains("is in Everything"));
    }
}

#[tokio::test]
async fn chart_deal_answer_comes_from_the_engine_not_the_scenario() {
    let mut engine = raise_engine();
    engine.set_mode(DrillMode::ChartDrill);
    let id = engine.charts_mut().create("Everything");
    for hand in all_hands() {
        engine.charts_mut().toggle(&id, hand);
    }
    engine.advance_now().await;
    let scenario = engine.scenario().unwrap().clone();
    assert_eq!(scenario.grading, Grading::ActiveChart);
    assert_eq!(scenario.correct_action, Action::Fold);
    assert_eq!(engine.correct_action_for(&scenario), Action::Raise);
    assert!(engine.submit(Action::Raise).unwrap().correct);
}

#[tokio::test]
async fn chart_drill_folds_everything_without_a_chart() {
    let mut engine = raise_engine();
    engine.set_mode(DrillMode::ChartDrill);
    engine.charts_mut().delete(range_chart::DEFAULT_CHART_ID);
    assert!(engine.charts().active_chart_id().is_none());
    for _ in 0..10 {
        engine.advance_now().await;
        let outcome = engine.submit(Action::Fold).unwrap();
        assert!(outcome.correct);
        assert_eq!(outcome.correct_action, Action::Fold);
    }
}

#[tokio::test]
async fn chart_drill_matches_resolve_of_classified_hand() {
    let mut engine = raise_engine();
    engine.set_mode(DrillMode::ChartDrill);
    for _ in 0..50 {
        engine.advance_now().await;
        let scenario = engine.scenario().unwrap();
        let hand = classify(scenario.hole_cards[0], scenario.hole_cards[1]);
        let expected = engine.charts().resolve(range_chart::DEFAULT_CHART_ID, hand);
        let outcome = engine.submit(expected).unwrap();
        assert!(outcome.correct, "{hand}");
        assert_eq!(outcome.hand, Some(hand));
    }
}

// ── persistence ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn session_survives_a_round_trip() {
    let store = MemoryStore::new();
    let mut engine = raise_engine();
    engine.advance_now().await;
    engine.submit(Action::Raise);
    let id = engine.charts_mut().create("Late position");
    engine.charts_mut().toggle(&id, "K9s".parse().unwrap());
    save_session(&engine, &store).unwrap();

    let mut restored = raise_engine();
    restore_session(&mut restored, &store).unwrap();
    assert_eq!(restored.snapshot(), engine.snapshot());
    assert_eq!(restored.charts(), engine.charts());
    assert_eq!(restored.phase(), Phase::Idle);
    assert!(restored.scenario().is_none());
}

#[test]
fn corrupt_snapshots_are_ignored() {
    let store = MemoryStore::new();
    store.save(persistence::PROGRESSION_KEY, "{{{").unwrap();
    store.save(persistence::RANGES_KEY, r#"{"charts": ["#).unwrap();
    let mut engine = raise_engine();
    restore_session(&mut engine, &store).unwrap();
    assert_eq!(*engine.state(), ProgressionState::default());
    assert_eq!(engine.charts(), &RangeChartStore::new());
}

#[test]
fn unreadable_hand_costs_only_that_hand() {
    let store = MemoryStore::new();
    store
        .save(
            persistence::RANGES_KEY,
            r#"{
                "charts": {"default_universal": ["AA", "KK"], "chart_1": ["A10s", "ZZ", "99"]},
                "chartNames": {"default_universal": "Universal Open", "chart_1": "Mine"},
                "activeChartId": "chart_1"
            }"#,
        )
        .unwrap();
    let mut engine = raise_engine();
    restore_session(&mut engine, &store).unwrap();

    let charts = engine.charts();
    assert_eq!(charts.active_chart_id(), Some("chart_1"));
    let mine = charts.chart("chart_1").unwrap();
    assert_eq!(mine.display_name, "Mine");
    assert_eq!(mine.hands.len(), 2);
    assert_eq!(charts.resolve_active("ATs".parse().unwrap()), Action::Raise);
    assert_eq!(charts.resolve_active("99".parse().unwrap()), Action::Raise);
    assert_eq!(charts.chart(range_chart::DEFAULT_CHART_ID).unwrap().hands.len(), 2);
}

#[test]
fn bankrupt_stack_restores_as_bankrupt() {
    let store = MemoryStore::new();
    store.save(persistence::PROGRESSION_KEY, r#"{"stack": 0, "score": 300}"#).unwrap();
    let mut engine = raise_engine();
    restore_session(&mut engine, &store).unwrap();
    assert_eq!(engine.phase(), Phase::Bankrupt);
    assert!(engine.state().bankrupt);
    assert_eq!(engine.state().score, 300);
    assert!(engine.refill().is_some());
}

#[tokio::test]
async fn custom_economy_is_honoured() {
    let config = EconomyConfig::from_json(r#"{"wrong_penalty": 500, "reward_base": 10}"#).unwrap();
    let mut engine = ProgressionEngine::new(fixed_source(Action::Fold), RangeChartStore::new(), config);
    engine.advance_now().await;
    engine.submit(Action::Fold);
    assert_eq!(engine.state().stack, 1010);
    engine.advance_now().await;
    engine.submit(Action::Raise);
    engine.advance_now().await;
    engine.submit(Action::Raise);
    assert_eq!(engine.state().stack, 10);
    assert_eq!(engine.phase(), Phase::FeedbackWrong);
}
