//! Named, user-editable range charts and the active-chart pointer.
//!
//! A chart is the set of hands to play aggressively from a given spot; every
//! hand outside it is a fold.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::training_engine::{classifier::HandNotation, models::Action};

pub const DEFAULT_CHART_ID: &str = "default_universal";
pub const DEFAULT_CHART_NAME: &str = "Universal Open";
const DEFAULT_CHART_HANDS: [&str; 4] = ["AA", "KK", "QQ", "AKs"];

/// Total two-card starting holdings.
const TOTAL_COMBOS: f64 = 1326.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeChart {
    pub id: String,
    pub display_name: String,
    pub hands: BTreeSet<HandNotation>,
}

impl RangeChart {
    /// Fraction of all starting holdings covered by this chart.
    pub fn coverage(&self) -> f64 {
        self.hands.iter().map(|h| h.combos() as f64).sum::<f64>() / TOTAL_COMBOS
    }
}

/// Persisted form of the store. Every field defaults so an older or partial
/// snapshot merges over an empty store. Hands stay plain strings here so one
/// unreadable entry costs only that entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeChartSnapshot {
    #[serde(default)]
    pub charts: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub chart_names: HashMap<String, String>,
    #[serde(default)]
    pub active_chart_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeChartStore {
    charts: BTreeMap<String, BTreeSet<HandNotation>>,
    names: BTreeMap<String, String>,
    active: Option<String>,
}

impl Default for RangeChartStore {
    fn default() -> Self {
        let hands = DEFAULT_CHART_HANDS
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        RangeChartStore {
            charts: BTreeMap::from([(DEFAULT_CHART_ID.to_string(), hands)]),
            names: BTreeMap::from([(DEFAULT_CHART_ID.to_string(), DEFAULT_CHART_NAME.to_string())]),
            active: Some(DEFAULT_CHART_ID.to_string()),
        }
    }
}

impl RangeChartStore {
    /// The seeded store: one "Universal Open" chart, active.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with no charts at all.
    pub fn empty() -> Self {
        RangeChartStore { charts: BTreeMap::new(), names: BTreeMap::new(), active: None }
    }

    /// Create an empty chart and make it active.
    pub fn create(&mut self, name: impl Into<String>) -> String {
        let id = format!("chart_{}", Uuid::new_v4().simple());
        let name = name.into();
        log::info!("created chart {id} ({name})");
        self.charts.insert(id.clone(), BTreeSet::new());
        self.names.insert(id.clone(), name);
        self.active = Some(id.clone());
        id
    }

    /// Remove a chart. If it was active, the first remaining chart (by id)
    /// becomes active, or none.
    pub fn delete(&mut self, chart_id: &str) {
        self.names.remove(chart_id);
        if self.charts.remove(chart_id).is_some() {
            log::info!("deleted chart {chart_id}");
        }
        if self.active.as_deref() == Some(chart_id) {
            self.active = self.charts.keys().next().cloned();
        }
    }

    /// Insert `hand` if absent, remove it if present. Unknown charts are left
    /// alone. Returns whether the hand is now in the chart.
    pub fn toggle(&mut self, chart_id: &str, hand: HandNotation) -> bool {
        let Some(hands) = self.charts.get_mut(chart_id) else {
            log::warn!("toggle on unknown chart {chart_id}");
            return false;
        };
        if hands.remove(&hand) {
            false
        } else {
            hands.insert(hand);
            true
        }
    }

    /// `Raise` if the chart contains `hand`, otherwise `Fold`. An unknown
    /// chart folds everything.
    pub fn resolve(&self, chart_id: &str, hand: HandNotation) -> Action {
        match self.charts.get(chart_id) {
            Some(hands) if hands.contains(&hand) => Action::Raise,
            _ => Action::Fold,
        }
    }

    /// Resolve against the active chart, folding when there is none.
    pub fn resolve_active(&self, hand: HandNotation) -> Action {
        match &self.active {
            Some(id) => self.resolve(id, hand),
            None => Action::Fold,
        }
    }

    /// Unknown ids are ignored.
    pub fn set_active(&mut self, chart_id: &str) {
        if self.charts.contains_key(chart_id) {
            self.active = Some(chart_id.to_string());
        }
    }

    pub fn active_chart_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn name(&self, chart_id: &str) -> Option<&str> {
        self.names.get(chart_id).map(String::as_str)
    }

    pub fn rename(&mut self, chart_id: &str, name: impl Into<String>) {
        if self.charts.contains_key(chart_id) {
            self.names.insert(chart_id.to_string(), name.into());
        }
    }

    pub fn contains(&self, chart_id: &str, hand: HandNotation) -> bool {
        self.charts.get(chart_id).is_some_and(|h| h.contains(&hand))
    }

    pub fn chart(&self, chart_id: &str) -> Option<RangeChart> {
        let hands = self.charts.get(chart_id)?;
        Some(RangeChart {
            id: chart_id.to_string(),
            display_name: self.names.get(chart_id).cloned().unwrap_or_default(),
            hands: hands.clone(),
        })
    }

    pub fn chart_ids(&self) -> impl Iterator<Item = &str> {
        self.charts.keys().map(String::as_str)
    }

    /// Back to the seeded default.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn snapshot(&self) -> RangeChartSnapshot {
        RangeChartSnapshot {
            charts: self
                .charts
                .iter()
                .map(|(id, hands)| (id.clone(), hands.iter().map(ToString::to_string).collect()))
                .collect(),
            chart_names: self.names.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            active_chart_id: self.active.clone(),
        }
    }

    /// Rebuild from a snapshot. Duplicate hands collapse, unreadable hands are
    /// dropped with a warning, and an active id that names no chart is dropped.
    pub fn from_snapshot(snapshot: RangeChartSnapshot) -> Self {
        let charts: BTreeMap<_, BTreeSet<_>> = snapshot
            .charts
            .into_iter()
            .map(|(id, hands)| {
                let parsed = hands
                    .iter()
                    .filter_map(|hand| match hand.parse::<HandNotation>() {
                        Ok(hand) => Some(hand),
                        Err(e) => {
                            log::warn!("dropping hand from chart {id}: {e}");
                            None
                        }
                    })
                    .collect();
                (id, parsed)
            })
            .collect();
        let active = snapshot.active_chart_id.filter(|id| charts.contains_key(id));
        RangeChartStore {
            names: snapshot.chart_names.into_iter().collect(),
            charts,
            active,
        }
    }
}
