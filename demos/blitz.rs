//! A scripted blitz session, start to finish.
//!
//! Run with: `cargo run --example blitz`
//!
//! What it shows:
//!
//! 1. **Tiered sourcing**: a small in-memory collection stands in for the
//!    remote store. Once the first rounds are played, the remote tier is
//!    dropped and scenarios come from the archetype generator.
//! 2. **Economy**: correct answers grow the stack with the streak bonus,
//!    wrong ones cost a flat penalty until the player goes bankrupt and
//!    refills.
//! 3. **Chart drill**: the engine deals preflop hands and grades them
//!    against a freshly built range chart.
//! 4. **Persistence**: the session is saved to a [`MemoryStore`] and
//!    restored into a new engine.
//!
//! The seed is fixed, so the generated cards are the same on every run.

use std::sync::Arc;

use poker_lingo::{
    restore_session, save_session, Action, DrillMode, EconomyConfig, MemoryStore, Outcome,
    ProgressionEngine, RangeChartStore, Scenario, ScenarioSource, SourceConfig, StaticCollection,
};

const ROWS: &str = r#"[
  {
    "id": "remote_001",
    "context": {
      "holeCards": [{"rank": "K", "suit": "hearts"}, {"rank": "K", "suit": "clubs"}],
      "communityCards": [],
      "potSize": 25,
      "position": "HJ"
    },
    "correct_action": "raise",
    "chip_explanation": "Kings are the second-best hand preflop. Raise for value.",
    "difficulty": "easy"
  }
]"#;

fn print_scenario(scenario: &Scenario) {
    let board: Vec<String> = scenario.community_cards.iter().map(|c| c.to_string()).collect();
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  {}  [{:?}]  {}", scenario.id, scenario.origin, scenario.difficulty);
    println!(
        "  Hero: {}{}  Position: {}",
        scenario.hole_cards[0],
        scenario.hole_cards[1],
        scenario.position.as_deref().unwrap_or("-")
    );
    if !board.is_empty() {
        println!("  Board: {}", board.join(" "));
    }
    println!("  Pot: {}", scenario.pot_size);
}

fn print_outcome(outcome: &Outcome, engine: &ProgressionEngine) {
    let marker = if outcome.correct { "✓" } else { "✗" };
    let s = engine.state();
    println!(
        "  {marker} {} (correct: {})  Δ{:+}  stack {}  streak {}  xp {}/{}  level {}",
        outcome.submitted,
        outcome.correct_action,
        outcome.stack_delta,
        s.stack,
        s.streak,
        s.xp,
        s.xp_to_next_level,
        s.level
    );
    println!("    {}", outcome.explanation);
    if let Some(level) = outcome.level_up {
        println!("    ★ Level up! Now level {level}.");
    }
}

/// Play one round, answering correctly when `right` is set.
async fn play(engine: &mut ProgressionEngine, right: bool) {
    if !engine.advance_now().await {
        return;
    }
    let Some(scenario) = engine.scenario().cloned() else {
        return;
    };
    print_scenario(&scenario);
    let expected = engine.correct_action_for(&scenario);
    let answer = if right {
        expected
    } else {
        match expected {
            Action::Fold => Action::Raise,
            _ => Action::Fold,
        }
    };
    if let Some(outcome) = engine.submit(answer) {
        print_outcome(&outcome, engine);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = SourceConfig { rng_seed: Some(7), ..SourceConfig::default() };
    let collection = StaticCollection::from_json(ROWS).expect("demo rows are valid JSON");
    let source = Arc::new(ScenarioSource::new(config).with_remote(Arc::new(collection)));
    let mut engine = ProgressionEngine::new(source, RangeChartStore::new(), EconomyConfig::default());

    println!("\n=== Remote tier ===\n");
    for _ in 0..3 {
        play(&mut engine, true).await;
    }

    println!("\n=== Generated archetypes ===\n");
    let state = engine.snapshot();
    engine = ProgressionEngine::new(
        Arc::new(ScenarioSource::new(config)),
        engine.charts().clone(),
        EconomyConfig::default(),
    );
    engine.restore(state);
    for _ in 0..4 {
        play(&mut engine, true).await;
    }

    println!("\n=== Losing streak ===\n");
    while !engine.state().bankrupt {
        play(&mut engine, false).await;
    }
    println!("\n  Bankrupt. Refilling.");
    if let Some(pending) = engine.refill() {
        engine.complete(pending).await;
    }
    if let Some(scenario) = engine.scenario() {
        print_scenario(scenario);
    }

    println!("\n=== Chart drill ===\n");
    let chart = engine.charts_mut().create("Button open");
    for hand in ["AA", "KK", "QQ", "JJ", "TT", "AKs", "AQs", "KQs", "AKo"] {
        if let Ok(hand) = hand.parse() {
            engine.charts_mut().toggle(&chart, hand);
        }
    }
    if let Some(c) = engine.charts().chart(&chart) {
        println!("  {} covers {:.1}% of hands", c.display_name, c.coverage() * 100.0);
    }
    engine.set_mode(DrillMode::ChartDrill);
    // The refilled scenario is still on screen; answer it first.
    if let Some(outcome) = engine.submit(Action::Fold) {
        print_outcome(&outcome, &engine);
    }
    for _ in 0..3 {
        play(&mut engine, true).await;
    }

    println!("\n=== Persistence ===\n");
    let store = MemoryStore::new();
    save_session(&engine, &store).expect("memory store never fails");
    let mut restored = ProgressionEngine::new(
        Arc::new(ScenarioSource::default()),
        RangeChartStore::empty(),
        EconomyConfig::default(),
    );
    restore_session(&mut restored, &store).expect("memory store never fails");
    let s = restored.state();
    println!(
        "  Restored: stack {}  score {}  level {}  charts {}",
        s.stack,
        s.score,
        s.level,
        restored.charts().chart_ids().count()
    );
}
