//! Core training engine: hand notation, range charts, scenario sourcing and
//! player progression.
//!
//! ## Module overview
//!
//! | Module        | Purpose |
//! |---------------|---------|
//! | `models`      | Shared types: cards, actions, difficulty, scenarios |
//! | `deck`        | 52-card deck with Fisher-Yates shuffle and filtered dealing |
//! | `classifier`  | Two cards → `"AKs"`-style notation, the 13×13 grid |
//! | `range_chart` | Named user-editable charts and the active-chart pointer |
//! | `helpers`     | Shared builders for ids, card strings and scenarios |
//! | `source`      | Tiered scenario acquisition: remote, generated, fallback |
//! | `progression` | Stack/streak/xp state machine and fetch tickets |
//! | `config`      | Tunable economy constants |
//! | `persistence` | Snapshot storage for progression and charts |
//! | `error`       | Error types |

pub mod classifier;
pub mod config;
pub mod deck;
pub mod error;
pub mod helpers;
pub mod models;
pub mod persistence;
pub mod progression;
pub mod range_chart;
pub mod source;

// Re-export the public API surface so callers can use
// `training_engine::ProgressionEngine` without reaching into sub-modules.
pub use classifier::{all_hands, build_grid, classify, HandNotation, Shape};
pub use config::EconomyConfig;
pub use error::{ConfigError, ParseError, PersistError, SourceError};
pub use models::{
    Action, Archetype, Card, Difficulty, Grading, Origin, Position, Rank, Scenario, Suit,
};
pub use persistence::{restore_session, save_session, FileStore, MemoryStore, SnapshotStore};
pub use progression::{
    DrillMode, FetchTicket, Outcome, PendingFetch, Phase, ProgressionEngine,
    ProgressionSnapshot, ProgressionState,
};
pub use range_chart::{RangeChart, RangeChartSnapshot, RangeChartStore};
pub use source::{
    remote::{ScenarioCollection, ScenarioRow, StaticCollection},
    ScenarioSource, SourceConfig,
};
