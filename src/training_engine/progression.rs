//! Player progression: stack, score, streak, xp, level and bankruptcy, plus
//! the round state machine that gates when each transition is allowed.
//!
//! ```text
//! Idle ──deliver──▶ AwaitingAction ──submit──▶ FeedbackCorrect ─┐
//!  ▲                                   │                        │
//!  │                                   ├──────▶ FeedbackWrong ──┤ request_next
//!  │                                   └──────▶ Bankrupt        │
//!  └──────────── refill (Bankrupt only) ◀──┘                    │
//!  ◀────────────────────────────────────────────────────────────┘
//! ```
//!
//! Fetching is split in three steps so callers can run the await wherever
//! they like: [`ProgressionEngine::request_next`] hands out a
//! [`PendingFetch`], the caller awaits [`PendingFetch::resolve`], and
//! [`ProgressionEngine::deliver`] accepts the result only if no newer request
//! was issued in the meantime.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::training_engine::{
    classifier::{classify, HandNotation},
    config::EconomyConfig,
    models::{Action, Grading, Scenario},
    range_chart::RangeChartStore,
    source::ScenarioSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressionState {
    pub stack: u32,
    pub score: u32,
    pub streak: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next_level: u32,
    pub bankrupt: bool,
}

impl ProgressionState {
    pub fn initial(config: &EconomyConfig) -> Self {
        ProgressionState {
            stack: config.starting_stack,
            score: 0,
            streak: 0,
            xp: 0,
            level: 1,
            xp_to_next_level: config.first_level_xp,
            bankrupt: false,
        }
    }
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::initial(&EconomyConfig::default())
    }
}

/// Persisted subset of [`ProgressionState`]. Bankruptcy is not stored; it is
/// re-derived from the stack on restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressionSnapshot {
    pub stack: u32,
    pub score: u32,
    pub streak: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next_level: u32,
}

impl Default for ProgressionSnapshot {
    fn default() -> Self {
        ProgressionState::default().into()
    }
}

impl From<ProgressionState> for ProgressionSnapshot {
    fn from(s: ProgressionState) -> Self {
        ProgressionSnapshot {
            stack: s.stack,
            score: s.score,
            streak: s.streak,
            xp: s.xp,
            level: s.level,
            xp_to_next_level: s.xp_to_next_level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No scenario on screen; a fetch may be pending.
    Idle,
    AwaitingAction,
    FeedbackCorrect,
    FeedbackWrong,
    /// Stack hit zero. Only `refill` (or `reset`) leaves this phase.
    Bankrupt,
}

/// Where the next scenario comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DrillMode {
    /// Tiered chain: remote, generated, fallback.
    #[default]
    Blitz,
    /// Random preflop hands graded against the active range chart.
    ChartDrill,
}

/// Result of one graded submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub correct: bool,
    pub submitted: Action,
    pub correct_action: Action,
    /// Classified hole cards, for chart-graded scenarios.
    pub hand: Option<HandNotation>,
    pub stack_delta: i64,
    pub xp_gained: u32,
    /// New level, when this submission crossed the threshold.
    pub level_up: Option<u32>,
    pub bankrupt: bool,
    pub explanation: String,
}

/// Identifies one fetch request. Only the most recent ticket is honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket(u64);

/// An issued but not yet resolved fetch.
#[must_use = "the engine stays loading until the fetch is resolved and delivered"]
pub struct PendingFetch {
    ticket: FetchTicket,
    mode: DrillMode,
    source: Arc<ScenarioSource>,
}

impl PendingFetch {
    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }

    pub async fn resolve(self) -> (FetchTicket, Scenario) {
        let scenario = match self.mode {
            DrillMode::Blitz => self.source.fetch().await,
            DrillMode::ChartDrill => self.source.deal_chart_hand(),
        };
        (self.ticket, scenario)
    }
}

pub struct ProgressionEngine {
    config: EconomyConfig,
    state: ProgressionState,
    phase: Phase,
    scenario: Option<Scenario>,
    charts: RangeChartStore,
    source: Arc<ScenarioSource>,
    mode: DrillMode,
    generation: u64,
    pending: Option<FetchTicket>,
}

impl ProgressionEngine {
    pub fn new(source: Arc<ScenarioSource>, charts: RangeChartStore, config: EconomyConfig) -> Self {
        ProgressionEngine {
            state: ProgressionState::initial(&config),
            config,
            phase: Phase::Idle,
            scenario: None,
            charts,
            source,
            mode: DrillMode::default(),
            generation: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> &ProgressionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &EconomyConfig {
        &self.config
    }

    pub fn scenario(&self) -> Option<&Scenario> {
        self.scenario.as_ref()
    }

    pub fn charts(&self) -> &RangeChartStore {
        &self.charts
    }

    pub fn charts_mut(&mut self) -> &mut RangeChartStore {
        &mut self.charts
    }

    pub fn source(&self) -> &Arc<ScenarioSource> {
        &self.source
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    /// Takes effect from the next fetch.
    pub fn set_mode(&mut self, mode: DrillMode) {
        self.mode = mode;
    }

    /// True while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Start fetching the next scenario. Allowed while idle (first deal, or
    /// superseding a pending fetch) and after feedback; `None` otherwise.
    pub fn request_next(&mut self) -> Option<PendingFetch> {
        match self.phase {
            Phase::Idle | Phase::FeedbackCorrect | Phase::FeedbackWrong => Some(self.issue_fetch()),
            Phase::AwaitingAction | Phase::Bankrupt => None,
        }
    }

    fn issue_fetch(&mut self) -> PendingFetch {
        self.generation += 1;
        let ticket = FetchTicket(self.generation);
        if let Some(stale) = self.pending.replace(ticket) {
            log::debug!("fetch {:?} superseded by {:?}", stale, ticket);
        }
        self.phase = Phase::Idle;
        self.scenario = None;
        PendingFetch { ticket, mode: self.mode, source: Arc::clone(&self.source) }
    }

    /// Install a fetched scenario. Results for anything but the latest
    /// ticket are dropped and `false` is returned.
    pub fn deliver(&mut self, ticket: FetchTicket, scenario: Scenario) -> bool {
        if self.pending != Some(ticket) {
            log::debug!("discarding stale scenario {} from {:?}", scenario.id, ticket);
            return false;
        }
        self.pending = None;
        self.scenario = Some(scenario);
        self.phase = Phase::AwaitingAction;
        true
    }

    /// Resolve `pending` in place and deliver it.
    pub async fn complete(&mut self, pending: PendingFetch) -> bool {
        let (ticket, scenario) = pending.resolve().await;
        self.deliver(ticket, scenario)
    }

    /// `request_next` and `complete` in one call.
    pub async fn advance_now(&mut self) -> bool {
        match self.request_next() {
            Some(pending) => self.complete(pending).await,
            None => false,
        }
    }

    /// The action that would be judged correct for `scenario` right now.
    pub fn correct_action_for(&self, scenario: &Scenario) -> Action {
        match scenario.grading {
            Grading::Literal => scenario.correct_action,
            Grading::ActiveChart => {
                let [a, b] = scenario.hole_cards;
                self.charts.resolve_active(classify(a, b))
            }
        }
    }

    /// Grade `action` against the current scenario and apply the result.
    /// A no-op returning `None` unless a scenario is awaiting an action.
    pub fn submit(&mut self, action: Action) -> Option<Outcome> {
        if self.phase != Phase::AwaitingAction {
            return None;
        }
        let scenario = self.scenario.as_ref()?;
        let correct_action = self.correct_action_for(scenario);
        let hand = match scenario.grading {
            Grading::ActiveChart => Some(classify(scenario.hole_cards[0], scenario.hole_cards[1])),
            Grading::Literal => None,
        };
        let explanation = match hand {
            Some(hand) => self.chart_explanation(hand, correct_action),
            None => scenario.explanation.clone(),
        };

        let outcome = if action == correct_action {
            self.apply_correct(action, correct_action, hand, explanation)
        } else {
            self.apply_wrong(action, correct_action, hand, explanation)
        };
        Some(outcome)
    }

    fn apply_correct(
        &mut self, submitted: Action, correct_action: Action,
        hand: Option<HandNotation>, explanation: String,
    ) -> Outcome {
        let s = &mut self.state;
        let reward = self.config.reward(s.streak);
        let xp_gained = self.config.xp_gain(s.streak);
        s.stack = s.stack.saturating_add(reward);
        s.score = s.score.saturating_add(self.config.score_per_correct);
        s.xp = s.xp.saturating_add(xp_gained);
        s.streak += 1;

        let mut level_up = None;
        if s.xp >= s.xp_to_next_level {
            s.level += 1;
            s.xp_to_next_level = self.config.xp_threshold(s.level).max(s.xp_to_next_level);
            log::info!("level up: now level {}", s.level);
            level_up = Some(s.level);
        }
        self.phase = Phase::FeedbackCorrect;

        Outcome {
            correct: true,
            submitted,
            correct_action,
            hand,
            stack_delta: i64::from(reward),
            xp_gained,
            level_up,
            bankrupt: false,
            explanation,
        }
    }

    fn apply_wrong(
        &mut self, submitted: Action, correct_action: Action,
        hand: Option<HandNotation>, explanation: String,
    ) -> Outcome {
        let s = &mut self.state;
        let loss = s.stack.min(self.config.wrong_penalty);
        s.stack -= loss;
        s.streak = 0;
        if s.stack == 0 {
            s.bankrupt = true;
            self.phase = Phase::Bankrupt;
            log::info!("bankrupt");
        } else {
            self.phase = Phase::FeedbackWrong;
        }

        Outcome {
            correct: false,
            submitted,
            correct_action,
            hand,
            stack_delta: -i64::from(loss),
            xp_gained: 0,
            level_up: None,
            bankrupt: self.state.bankrupt,
            explanation,
        }
    }

    fn chart_explanation(&self, hand: HandNotation, correct_action: Action) -> String {
        let chart = self
            .charts
            .active_chart_id()
            .and_then(|id| self.charts.name(id))
            .unwrap_or("no active chart");
        match correct_action {
            Action::Raise => format!("{hand} is in {chart}. Raise."),
            _ => format!("{hand} is not in {chart}. Fold."),
        }
    }

    /// Refill a bankrupt stack and start fetching. `None` unless bankrupt.
    pub fn refill(&mut self) -> Option<PendingFetch> {
        if self.phase != Phase::Bankrupt {
            return None;
        }
        self.state.stack = self.config.refill_amount;
        self.state.streak = 0;
        self.state.bankrupt = false;
        log::info!("refilled stack to {}", self.state.stack);
        Some(self.issue_fetch())
    }

    /// Back to a brand-new game from any phase, and start fetching.
    pub fn reset(&mut self) -> PendingFetch {
        self.state = ProgressionState::initial(&self.config);
        self.issue_fetch()
    }

    pub fn snapshot(&self) -> ProgressionSnapshot {
        self.state.into()
    }

    /// Load persisted progress. Any pending fetch is invalidated and the
    /// engine returns to `Idle`, or to `Bankrupt` if the stored stack is 0.
    pub fn restore(&mut self, snapshot: ProgressionSnapshot) {
        let level = snapshot.level.max(1);
        let xp_to_next_level = if snapshot.xp_to_next_level == 0 {
            self.config.xp_threshold(level).max(1)
        } else {
            snapshot.xp_to_next_level
        };
        self.state = ProgressionState {
            stack: snapshot.stack,
            score: snapshot.score,
            streak: snapshot.streak,
            xp: snapshot.xp,
            level,
            xp_to_next_level,
            bankrupt: snapshot.stack == 0,
        };
        self.generation += 1;
        self.pending = None;
        self.scenario = None;
        self.phase = if self.state.bankrupt { Phase::Bankrupt } else { Phase::Idle };
    }
}
