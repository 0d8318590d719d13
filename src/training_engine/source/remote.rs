//! Remote scenario collection: the row format and the read-only interface
//! the first tier queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::training_engine::{
    error::SourceError,
    helpers::all_distinct,
    models::{Action, Card, Difficulty, Grading, Origin, Scenario},
};

/// Read-only access to a hosted table of authored scenarios.
#[async_trait]
pub trait ScenarioCollection: Send + Sync {
    /// Total number of rows.
    async fn count(&self) -> Result<u64, SourceError>;

    /// The row at `offset`, or `None` past the end.
    async fn row_at(&self, offset: u64) -> Result<Option<ScenarioRow>, SourceError>;
}

/// One row as stored remotely. `context` may be an object or a JSON string
/// holding that object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub id: String,
    pub context: Value,
    pub correct_action: Action,
    pub chip_explanation: String,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioContext {
    pub hole_cards: Vec<Card>,
    #[serde(default)]
    pub community_cards: Vec<Card>,
    pub pot_size: f64,
    #[serde(default)]
    pub position: Option<String>,
}

impl ScenarioRow {
    /// Decode and validate into a [`Scenario`]. Any shape problem is
    /// [`SourceError::Malformed`].
    pub fn into_scenario(self) -> Result<Scenario, SourceError> {
        let malformed = |msg: String| SourceError::Malformed(format!("{}: {}", self.id, msg));

        let context: ScenarioContext = match &self.context {
            Value::String(text) => serde_json::from_str(text),
            other => serde_json::from_value(other.clone()),
        }
        .map_err(|e| malformed(e.to_string()))?;

        let hole_cards: [Card; 2] = context
            .hole_cards
            .try_into()
            .map_err(|cards: Vec<Card>| malformed(format!("{} hole cards", cards.len())))?;
        if !matches!(context.community_cards.len(), 0 | 3 | 4 | 5) {
            return Err(malformed(format!("{} community cards", context.community_cards.len())));
        }
        if !context.pot_size.is_finite() || context.pot_size < 0.0 {
            return Err(malformed(format!("pot size {}", context.pot_size)));
        }
        if !all_distinct(hole_cards, &context.community_cards) {
            return Err(malformed("duplicate card".to_string()));
        }

        Ok(Scenario {
            id: self.id,
            hole_cards,
            community_cards: context.community_cards,
            pot_size: context.pot_size,
            position: context.position,
            correct_action: self.correct_action,
            explanation: self.chip_explanation,
            difficulty: self.difficulty,
            origin: Origin::Remote,
            grading: Grading::Literal,
        })
    }
}

/// In-memory collection, for seeding an offline store and for tests.
#[derive(Debug, Clone, Default)]
pub struct StaticCollection {
    rows: Vec<ScenarioRow>,
}

impl StaticCollection {
    pub fn new(rows: Vec<ScenarioRow>) -> Self {
        StaticCollection { rows }
    }

    /// Parse rows from a JSON array as exported from the hosted table.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        Ok(StaticCollection { rows: serde_json::from_str(text)? })
    }
}

#[async_trait]
impl ScenarioCollection for StaticCollection {
    async fn count(&self) -> Result<u64, SourceError> {
        Ok(self.rows.len() as u64)
    }

    async fn row_at(&self, offset: u64) -> Result<Option<ScenarioRow>, SourceError> {
        Ok(usize::try_from(offset).ok().and_then(|i| self.rows.get(i)).cloned())
    }
}
