//! Sequential planning workflow: interpret, look up guidelines, generate.
//!
//! The workflow is a linear state machine
//! `Start -> Interpret -> Lookup -> Generate -> End`. Each stage reads the
//! current [`PlanningState`] and returns a [`StateUpdate`] that is merged into
//! a new state value. No stage performs I/O or draws randomness, so the same
//! input always yields the same output.

pub mod generate;
pub mod interpret;
pub mod lookup;
pub mod state;

use std::fmt;

use tracing::debug;

use crate::error::PlanningError;

pub use generate::generate;
pub use interpret::{DEFAULT_DEMAND, DEFAULT_HOT_ZONE, interpret};
pub use lookup::{GuidelineSource, PLANNING_POLICIES, StaticGuidelines};
pub use state::{PlanningState, StateUpdate};

/// Position in the workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStep {
    Start,
    Interpret,
    Lookup,
    Generate,
    End,
}

impl WorkflowStep {
    /// The following step; `End` is terminal.
    pub fn next(self) -> Self {
        match self {
            Self::Start => Self::Interpret,
            Self::Interpret => Self::Lookup,
            Self::Lookup => Self::Generate,
            Self::Generate | Self::End => Self::End,
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Interpret => "interpret",
            Self::Lookup => "lookup",
            Self::Generate => "generate",
            Self::End => "end",
        };
        f.write_str(name)
    }
}

/// The three-stage planning pipeline over a pluggable guideline source.
#[derive(Debug, Clone, Default)]
pub struct PlanningWorkflow<G: GuidelineSource> {
    guidelines: G,
}

impl<G: GuidelineSource> PlanningWorkflow<G> {
    pub fn new(guidelines: G) -> Self {
        Self { guidelines }
    }

    pub fn guidelines(&self) -> &G {
        &self.guidelines
    }

    /// Runs every stage in order and returns the final state.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::MissingZone`] if generation is reached with no
    /// hot zone.
    pub fn run(&self, initial: PlanningState) -> Result<PlanningState, PlanningError> {
        let mut state = initial;
        let mut step = WorkflowStep::Start.next();
        while step != WorkflowStep::End {
            let update = self.step(step, &state)?;
            state = state.merge(update);
            debug!(%step, n_zones = state.hot_zones.len(), "workflow stage complete");
            step = step.next();
        }
        Ok(state)
    }

    /// Computes the partial update produced by a single stage.
    ///
    /// `Start` and `End` produce an empty update.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::MissingZone`] from the generate stage.
    pub fn step(
        &self,
        step: WorkflowStep,
        state: &PlanningState,
    ) -> Result<StateUpdate, PlanningError> {
        match step {
            WorkflowStep::Interpret => Ok(interpret::apply(state)),
            WorkflowStep::Lookup => Ok(lookup::apply(&self.guidelines, state)),
            WorkflowStep::Generate => generate::apply(state),
            WorkflowStep::Start | WorkflowStep::End => Ok(StateUpdate::default()),
        }
    }
}

/// Runs the workflow with the built-in static guidelines.
///
/// # Errors
///
/// Returns [`PlanningError::MissingZone`] if generation is reached with no
/// hot zone.
pub fn run_workflow(initial: PlanningState) -> Result<PlanningState, PlanningError> {
    PlanningWorkflow::new(StaticGuidelines).run(initial)
}
