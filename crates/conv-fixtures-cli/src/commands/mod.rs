use std::path::Path;

use conv_fixtures::error::FixtureError;
use conv_fixtures::schema::{SweepPlan, parse_plan};

pub mod generate;
pub mod plan;
pub mod validate;

/// Load the plan at `path`, or the built-in plan when no path is given.
pub fn load_plan(path: Option<&Path>) -> Result<SweepPlan, FixtureError> {
    match path {
        Some(p) => parse_plan(p),
        None => Ok(SweepPlan::builtin()),
    }
}
