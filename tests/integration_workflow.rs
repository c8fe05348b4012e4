//! Integration tests for the planning workflow and report rendering.

mod common;

use chrono::NaiveDate;

use ev_demand_planner::forecast::{DailyForecast, DemandQuery};
use ev_demand_planner::planning::{
    DEFAULT_HOT_ZONE, GuidelineSource, PlanningState, PlanningWorkflow, run_workflow,
};
use ev_demand_planner::pipeline::TrainingSet;
use ev_demand_planner::reporting::{REPORT_TITLE, render_report};

#[test]
fn default_run_recommends_for_default_zone() {
    let state = run_workflow(PlanningState::default()).expect("workflow");
    assert!(state.demand_summary.contains("Insufficient data"));
    assert_eq!(state.hot_zones, vec![DEFAULT_HOT_ZONE.to_string()]);
    assert!(!state.guidelines.is_empty());
    assert!(state.recommendations.contains("Shenzhen District TAZ 559"));
}

#[test]
fn repeated_runs_are_identical() {
    let initial = PlanningState::with_demand("Peak demand of 42.00 kWh at 19:00");
    let a = run_workflow(initial.clone()).expect("workflow");
    let b = run_workflow(initial).expect("workflow");
    assert_eq!(a, b);
}

struct Recording(std::cell::RefCell<Vec<String>>);

impl GuidelineSource for Recording {
    fn lookup(&self, query: &str) -> String {
        self.0.borrow_mut().push(query.to_string());
        "Keep a 20% capacity buffer at hot zones.".to_string()
    }
}

#[test]
fn custom_guideline_source_is_consulted_once() {
    let workflow = PlanningWorkflow::new(Recording(Default::default()));
    let state = workflow
        .run(PlanningState::with_demand("High demand at peak"))
        .expect("workflow");
    assert_eq!(state.guidelines, "Keep a 20% capacity buffer at hot zones.");
    let queries = workflow.guidelines().0.borrow();
    assert_eq!(queries.len(), 1);
    assert!(queries[0].contains("High demand at peak"));
}

#[test]
fn forecast_flows_into_report() {
    let set = TrainingSet::from_partitions(&[common::station_samples(7, 11)])
        .expect("single partition");
    let model = set.train(&common::quick_options(42)).expect("train");
    let forecast = DailyForecast::predict(&model, DemandQuery::new(18, 2, 0.5, 1.0))
        .expect("forecast");

    let state = run_workflow(PlanningState::with_demand(forecast.summary())).expect("workflow");
    assert!(state.demand_summary.contains("18:00 on Wednesday"));

    let at = NaiveDate::from_ymd_opt(2024, 3, 1)
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .expect("valid timestamp");
    let metrics = model.metrics();
    let report = render_report(
        &state.demand_summary,
        &state.recommendations,
        Some(&metrics),
        at,
    );
    assert!(report.starts_with(REPORT_TITLE));
    assert!(report.contains(&state.demand_summary));
    assert!(report.contains("Shenzhen District TAZ 559"));
    assert!(report.contains("Model validation: MAE:"));
}
