//! Tiered scenario acquisition.
//!
//! | Tier        | Module       | Unavailable when |
//! |-------------|--------------|------------------|
//! | Remote      | `remote`     | no collection attached, unreachable, empty, row missing or malformed |
//! | Generative  | `archetypes` | disabled in [`SourceConfig`] |
//! | Fallback    | `fallback`   | never |
//!
//! Tiers run strictly one after another; the first success wins.

pub mod archetypes;
pub mod fallback;
pub mod remote;

use std::sync::{Arc, Mutex, MutexGuard};

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::training_engine::{
    deck::Deck,
    error::SourceError,
    helpers::fresh_id,
    models::{Action, Difficulty, Grading, Origin, Scenario},
};

use fallback::FallbackRotation;
use remote::ScenarioCollection;

/// The tiers that can come up empty. The fallback rotation always answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Remote,
    Generative,
}

const TIERS: [Tier; 2] = [Tier::Remote, Tier::Generative];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_generative")]
    pub generative_enabled: bool,
    /// Seed for reproducible draws; entropy when `None`.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_generative() -> bool {
    true
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig { generative_enabled: default_generative(), rng_seed: None }
    }
}

/// Produces one scenario per call. Shared between the engine and any
/// in-flight fetch, so its mutable parts sit behind locks that are never held
/// across an await.
pub struct ScenarioSource {
    remote: Option<Arc<dyn ScenarioCollection>>,
    config: SourceConfig,
    rng: Mutex<StdRng>,
    rotation: Mutex<FallbackRotation>,
}

impl ScenarioSource {
    pub fn new(config: SourceConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };
        ScenarioSource {
            remote: None,
            config,
            rng: Mutex::new(rng),
            rotation: Mutex::new(FallbackRotation::default()),
        }
    }

    /// Attach the remote collection queried by the first tier.
    pub fn with_remote(mut self, collection: Arc<dyn ScenarioCollection>) -> Self {
        self.remote = Some(collection);
        self
    }

    pub fn config(&self) -> SourceConfig {
        self.config
    }

    /// Exactly one scenario, from the first tier that can supply it.
    pub async fn fetch(&self) -> Scenario {
        for tier in TIERS {
            log::debug!("trying {tier:?} tier");
            match self.attempt(tier).await {
                Ok(scenario) => {
                    log::debug!("{tier:?} tier supplied {}", scenario.id);
                    return scenario;
                }
                Err(SourceError::Disabled) => {}
                Err(e) => log::warn!("{tier:?} tier unavailable: {e}"),
            }
        }
        let scenario = self.lock_rotation().next_scenario();
        log::debug!("fallback rotation supplied {}", scenario.id);
        scenario
    }

    async fn attempt(&self, tier: Tier) -> Result<Scenario, SourceError> {
        match tier {
            Tier::Remote => self.from_remote().await,
            Tier::Generative => self.generate(),
        }
    }

    async fn from_remote(&self) -> Result<Scenario, SourceError> {
        let remote = self.remote.as_ref().ok_or(SourceError::Disabled)?;
        let count = remote.count().await?;
        if count == 0 {
            return Err(SourceError::Empty);
        }
        let offset = self.lock_rng().gen_range(0..count);
        remote
            .row_at(offset)
            .await?
            .ok_or(SourceError::NoRow(offset))?
            .into_scenario()
    }

    fn generate(&self) -> Result<Scenario, SourceError> {
        if !self.config.generative_enabled {
            return Err(SourceError::Disabled);
        }
        let mut rng = self.lock_rng();
        let archetype = archetypes::draw(&mut *rng);
        archetype.synthesize(&mut *rng)
    }

    /// Two random distinct cards, graded against the active range chart.
    pub fn deal_chart_hand(&self) -> Scenario {
        let cards = Deck::ordered();
        let (first, mut second) = {
            let mut rng = self.lock_rng();
            (rng.gen_range(0..cards.len()), rng.gen_range(0..cards.len() - 1))
        };
        if second >= first {
            second += 1;
        }
        Scenario {
            id: fresh_id("chart"),
            hole_cards: [cards[first], cards[second]],
            community_cards: Vec::new(),
            pot_size: 0.0,
            position: None,
            correct_action: Action::Fold,
            explanation: String::new(),
            difficulty: Difficulty::Easy,
            origin: Origin::ChartDeal,
            grading: Grading::ActiveChart,
        }
    }

    fn lock_rng(&self) -> MutexGuard<'_, StdRng> {
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_rotation(&self) -> MutexGuard<'_, FallbackRotation> {
        self.rotation.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for ScenarioSource {
    fn default() -> Self {
        Self::new(SourceConfig::default())
    }
}
