use crate::error::PlanningError;

use super::state::{PlanningState, StateUpdate};

/// Builds the recommendation document for the top hot zone.
///
/// Sections cover infrastructure expansion, peak-hour load balancing, and
/// reliability.
///
/// # Errors
///
/// Returns [`PlanningError::MissingZone`] if `hot_zones` is empty.
pub fn generate(hot_zones: &[String]) -> Result<String, PlanningError> {
    let zone = hot_zones.first().ok_or(PlanningError::MissingZone)?;
    Ok(format!(
        "\
### Infrastructure Expansion
- Add 4 Fast-Charging (DC) piles to {zone}.
- Increase total transformer capacity by 150kW.

### Load Balancing
- Implement a peak-hour service fee increase (+0.2 CNY/kWh) during 17:00-20:00.
- Encourage overnight charging with reduced rates.

### Reliability
- Ensure 99.9% uptime for the new charging piles via predictive maintenance."
    ))
}

pub(super) fn apply(state: &PlanningState) -> Result<StateUpdate, PlanningError> {
    Ok(StateUpdate {
        recommendations: Some(generate(&state.hot_zones)?),
        ..StateUpdate::default()
    })
}
