//! Active step resolution.
//!
//! The active sequence is the ordered subset of configured steps whose
//! condition holds for the current domain state. It is derived data: callers
//! recompute it after every mutation, since an answer on the current step can
//! include or exclude steps both before and after it.

use intake_config::StepDef;
use intake_state::DomainState;
use tracing::warn;

use crate::flow::Flow;

/// Whether a single step of `flow` belongs to the active sequence.
///
/// A condition that fails to evaluate excludes its step and logs a warning.
pub fn is_included(flow: &Flow, step: &StepDef, state: &DomainState) -> bool {
  let Some(outcome) = flow.conditions().evaluate(&step.id, state) else {
    return true;
  };

  match outcome {
    Ok(included) => included,
    Err(e) => {
      warn!(
        step_id = %step.id,
        condition = step.condition.as_deref().unwrap_or_default(),
        error = %e,
        "condition evaluation failed, excluding step"
      );
      false
    }
  }
}

/// Positions (in configuration order) of the steps that are currently active.
pub fn resolve_positions(flow: &Flow, state: &DomainState) -> Vec<usize> {
  flow
    .steps()
    .iter()
    .enumerate()
    .filter(|(_, step)| is_included(flow, step, state))
    .map(|(position, _)| position)
    .collect()
}

/// The active step sequence for `state`.
pub fn resolve<'a>(flow: &'a Flow, state: &DomainState) -> Vec<&'a StepDef> {
  flow
    .steps()
    .iter()
    .filter(|step| is_included(flow, step, state))
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn branching_flow() -> Flow {
    Flow::from_json_str(
      r#"{
        "flow_id": "branching",
        "name": "Branching",
        "steps": [
          { "id": "track", "section": "venture", "type": "option", "title": "Track",
            "field": "venture.track",
            "choices": [
              { "value": "startup", "label": "Startup" },
              { "value": "researcher", "label": "Researcher" }
            ] },
          { "id": "startup_details", "section": "venture", "type": "form", "title": "Startup",
            "condition": "venture.track == 'startup'", "fields": [] },
          { "id": "research_details", "section": "venture", "type": "form", "title": "Research",
            "condition": "venture.track == 'researcher'", "fields": [] },
          { "id": "team_structure", "section": "team", "type": "info", "title": "Team",
            "condition": "co_founders and co_founders | length > 0" },
          { "id": "grant", "section": "team", "type": "info", "title": "Grant",
            "condition": "eligible_for(venture.track)" },
          { "id": "review", "section": "submit", "type": "review", "title": "Review" }
        ]
      }"#,
    )
    .unwrap()
  }

  fn ids(steps: &[&StepDef]) -> Vec<String> {
    steps.iter().map(|s| s.id.clone()).collect()
  }

  #[test]
  fn test_unconditioned_steps_always_included() {
    let flow = branching_flow();
    let state = DomainState::from_value(json!({ "co_founders": [] })).unwrap();
    assert_eq!(ids(&resolve(&flow, &state)), vec!["track", "review"]);
  }

  #[test]
  fn test_mutually_exclusive_branches() {
    let flow = branching_flow();
    let mut state = DomainState::from_value(json!({ "co_founders": [] })).unwrap();

    state.set("venture.track", json!("startup")).unwrap();
    assert_eq!(
      ids(&resolve(&flow, &state)),
      vec!["track", "startup_details", "review"]
    );

    state.set("venture.track", json!("researcher")).unwrap();
    assert_eq!(
      ids(&resolve(&flow, &state)),
      vec!["track", "research_details", "review"]
    );
  }

  #[test]
  fn test_missing_collection_excludes_step() {
    let flow = branching_flow();
    let state = DomainState::new();
    assert_eq!(ids(&resolve(&flow, &state)), vec!["track", "review"]);
  }

  #[test]
  fn test_failing_condition_excludes_step() {
    // `eligible_for` is not a known function, so evaluation errors.
    let flow = branching_flow();
    let grant = flow.step("grant").unwrap();
    let state = DomainState::from_value(json!({ "venture": { "track": "startup" } })).unwrap();
    assert!(!is_included(&flow, grant, &state));
  }

  #[test]
  fn test_positions_match_steps() {
    let flow = branching_flow();
    let state = DomainState::from_value(json!({
      "venture": { "track": "researcher" },
      "co_founders": [{ "name": "Grace" }]
    }))
    .unwrap();

    assert_eq!(resolve_positions(&flow, &state), vec![0, 2, 3, 5]);
    assert_eq!(
      ids(&resolve(&flow, &state)),
      vec!["track", "research_details", "team_structure", "review"]
    );
  }

  #[test]
  fn test_resolve_is_an_ordered_subsequence_and_idempotent() {
    let flow = branching_flow();
    let states = [
      json!({}),
      json!({ "co_founders": [] }),
      json!({ "venture": { "track": "startup" }, "co_founders": [{}] }),
      json!({ "venture": { "track": "researcher" } }),
      json!({ "venture": { "track": 42 }, "co_founders": "not a list" }),
    ];

    for value in states {
      let state = DomainState::from_value(value).unwrap();
      let first = resolve_positions(&flow, &state);
      let second = resolve_positions(&flow, &state);
      assert_eq!(first, second);
      assert!(first.windows(2).all(|w| w[0] < w[1]));
      assert!(first.iter().all(|&p| p < flow.steps().len()));
    }
  }
}
