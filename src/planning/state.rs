use serde::{Deserialize, Serialize};

/// Record threaded through the planning stages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningState {
    /// Demand description; rewritten by the interpret stage.
    pub demand_summary: String,
    /// Priority zones, highest priority first.
    pub hot_zones: Vec<String>,
    /// Policy text consulted when generating recommendations.
    pub guidelines: String,
    /// Final recommendation document.
    pub recommendations: String,
    /// Past summaries; carried through untouched.
    pub history: Vec<String>,
}

impl PlanningState {
    /// Starts a state from a demand summary, everything else empty.
    pub fn with_demand(demand_summary: impl Into<String>) -> Self {
        Self {
            demand_summary: demand_summary.into(),
            ..Self::default()
        }
    }

    /// Returns a new state with every field present in `update` replaced.
    pub fn merge(mut self, update: StateUpdate) -> Self {
        if let Some(v) = update.demand_summary {
            self.demand_summary = v;
        }
        if let Some(v) = update.hot_zones {
            self.hot_zones = v;
        }
        if let Some(v) = update.guidelines {
            self.guidelines = v;
        }
        if let Some(v) = update.recommendations {
            self.recommendations = v;
        }
        if let Some(v) = update.history {
            self.history = v;
        }
        self
    }
}

/// Partial update returned by a stage; `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub demand_summary: Option<String>,
    pub hot_zones: Option<Vec<String>>,
    pub guidelines: Option<String>,
    pub recommendations: Option<String>,
    pub history: Option<Vec<String>>,
}
