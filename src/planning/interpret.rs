use super::state::{PlanningState, StateUpdate};

/// Demand text used when the caller supplies none.
pub const DEFAULT_DEMAND: &str = "Insufficient data.";

/// Zone reported for every run until a per-zone ranking model exists.
pub const DEFAULT_HOT_ZONE: &str = "Shenzhen District TAZ 559";

/// Annotates a demand summary and picks the zones to prioritize.
///
/// Input that is blank once trailing periods are removed falls back to
/// [`DEFAULT_DEMAND`]; this stage never fails.
///
/// Returns `(summary, zones)`.
pub fn interpret(demand: &str) -> (String, Vec<String>) {
    let demand = demand.trim().trim_end_matches('.').trim_end();
    let demand = if demand.is_empty() {
        DEFAULT_DEMAND.trim_end_matches('.')
    } else {
        demand
    };
    // TODO: rank zones from per-zone demand once station coordinates are joined in.
    (
        format!(
            "Analysis Result: {demand}. System indicates peak usage is exceeding zone capacity."
        ),
        vec![DEFAULT_HOT_ZONE.to_string()],
    )
}

pub(super) fn apply(state: &PlanningState) -> StateUpdate {
    let (summary, zones) = interpret(&state.demand_summary);
    StateUpdate {
        demand_summary: Some(summary),
        hot_zones: Some(zones),
        ..StateUpdate::default()
    }
}
