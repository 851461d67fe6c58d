use std::path::Path;

use crate::error::FixtureError;
use crate::schema::types::SweepPlan;

/// Parse a YAML sweep plan file into a [`SweepPlan`].
///
/// # Errors
///
/// Returns [`FixtureError::Io`] if the file cannot be read,
/// or [`FixtureError::Yaml`] if the YAML is malformed.
pub fn parse_plan(path: &Path) -> Result<SweepPlan, FixtureError> {
    let content = std::fs::read_to_string(path)?;
    parse_plan_str(&content)
}

/// Parse a YAML sweep plan from a string.
pub fn parse_plan_str(yaml: &str) -> Result<SweepPlan, FixtureError> {
    let plan: SweepPlan = serde_yaml::from_str(yaml)?;
    Ok(plan)
}
