//! # poker_lingo
//!
//! Scenario sourcing and progression engine for a bite-sized poker trainer.
//!
//! The player sees one decision per round (fold, call or raise), answers,
//! and earns or loses chips. This crate holds everything behind that loop
//! except presentation.
//!
//! ## How it works
//!
//! 1. A [`ScenarioSource`] supplies one [`Scenario`] per round. It asks a
//!    remote [`ScenarioCollection`] first, synthesises a scenario from one of
//!    four archetypes when that fails, and falls back to a fixed rotation of
//!    literal scenarios as a last resort. A fetch never fails.
//! 2. The [`ProgressionEngine`] presents it, grades the submitted [`Action`]
//!    and updates stack, score, streak, xp and level. A wrong answer that
//!    empties the stack makes the player bankrupt until they refill.
//! 3. In chart-drill mode the engine deals random preflop hands instead, and
//!    grades them with [`classify`] against the active chart in its
//!    [`RangeChartStore`].
//!
//! ## Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use poker_lingo::{
//!     Action, EconomyConfig, ProgressionEngine, RangeChartStore, ScenarioSource, SourceConfig,
//! };
//!
//! # async fn run() {
//! let source = Arc::new(ScenarioSource::new(SourceConfig::default()));
//! let mut engine = ProgressionEngine::new(source, RangeChartStore::new(), EconomyConfig::default());
//!
//! engine.advance_now().await;
//! let scenario = engine.scenario().unwrap();
//! println!("{} {}", scenario.hole_cards[0], scenario.hole_cards[1]);
//!
//! if let Some(outcome) = engine.submit(Action::Raise) {
//!     println!("correct: {}, stack now {}", outcome.correct, engine.state().stack);
//! }
//! # }
//! ```

pub mod training_engine;

// Convenience re-exports so callers can use `poker_lingo::ProgressionEngine`
// directly without reaching into `training_engine::`.
pub use training_engine::{
    all_hands, build_grid, classify, restore_session, save_session, Action, Archetype, Card,
    ConfigError, Difficulty, DrillMode, EconomyConfig, FetchTicket, FileStore, Grading,
    HandNotation, MemoryStore, Origin, Outcome, ParseError, PendingFetch, PersistError, Phase,
    Position, ProgressionEngine, ProgressionSnapshot, ProgressionState, Rank, RangeChart,
    RangeChartSnapshot, RangeChartStore, Scenario, ScenarioCollection, ScenarioRow,
    ScenarioSource, Shape, SnapshotStore, SourceConfig, SourceError, StaticCollection, Suit,
};

#[cfg(test)]
mod tests;
