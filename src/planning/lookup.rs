use super::state::{PlanningState, StateUpdate};

/// Policy text returned by [`StaticGuidelines`].
pub const PLANNING_POLICIES: &str = "\
Planning Policies:
- Expansion triggered when occupancy > 80%.
- High-traffic zones receive priority for DC fast-charging.
- Load balancing via dynamic pricing is recommended for peak windows.";

/// A source of planning guideline text for a free-form query.
pub trait GuidelineSource {
    fn lookup(&self, query: &str) -> String;
}

/// Returns the same policy block for every query.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticGuidelines;

impl GuidelineSource for StaticGuidelines {
    fn lookup(&self, _query: &str) -> String {
        PLANNING_POLICIES.to_string()
    }
}

pub(super) fn apply<G: GuidelineSource + ?Sized>(source: &G, state: &PlanningState) -> StateUpdate {
    StateUpdate {
        guidelines: Some(source.lookup(&state.demand_summary)),
        ..StateUpdate::default()
    }
}
