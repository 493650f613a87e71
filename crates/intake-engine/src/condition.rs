//! Step inclusion conditions.
//!
//! A condition is a minijinja expression evaluated against the whole domain
//! state, e.g. `venture.track == 'startup'` or
//! `co_founders and co_founders | length > 0`.
//!
//! Lookups through missing fields chain to `undefined`, which is falsy, so a
//! condition over a question that has not been answered yet simply excludes
//! its step.

use intake_state::DomainState;
use minijinja::{Environment, UndefinedBehavior};

fn environment<'source>() -> Environment<'source> {
  let mut env = Environment::new();
  env.set_undefined_behavior(UndefinedBehavior::Chainable);
  env
}

/// Check that an expression parses.
pub fn check(expr: &str) -> Result<(), minijinja::Error> {
  let env = environment();
  env.compile_expression(expr).map(|_| ())
}

/// Evaluate a one-off expression against the domain state.
///
/// Errors are returned to the caller; a failing condition never panics.
pub fn evaluate(expr: &str, state: &DomainState) -> Result<bool, minijinja::Error> {
  let env = environment();
  let compiled = env.compile_expression(expr)?;
  let value = compiled.eval(state.as_map())?;
  Ok(value.is_true())
}

/// The conditions of one flow, compiled once and keyed by step id.
///
/// Each condition is stored as a template that renders `1` when the
/// expression is truthy, so evaluation reuses the compiled form instead of
/// parsing the expression again.
#[derive(Debug, Clone)]
pub struct Conditions {
  env: Environment<'static>,
}

impl Conditions {
  pub fn new() -> Self {
    Self { env: environment() }
  }

  /// Compile and register the condition of `step_id`.
  pub fn insert(&mut self, step_id: &str, expr: &str) -> Result<(), minijinja::Error> {
    // The expression must parse on its own so it cannot close the tag.
    check(expr)?;
    self
      .env
      .add_template_owned(step_id.to_string(), format!("{{% if {expr} %}}1{{% endif %}}"))
  }

  /// Evaluate the condition of `step_id`, `None` when the step has none.
  pub fn evaluate(&self, step_id: &str, state: &DomainState) -> Option<Result<bool, minijinja::Error>> {
    let template = self.env.get_template(step_id).ok()?;
    Some(template.render(state.as_map()).map(|out| out == "1"))
  }
}

impl Default for Conditions {
  fn default() -> Self {
    Self::new()
  }
}
