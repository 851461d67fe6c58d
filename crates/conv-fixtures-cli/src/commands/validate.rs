use std::path::Path;

use conv_fixtures::error::Severity;
use conv_fixtures::schema::validate_plan;

use super::load_plan;

pub fn run(path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(path)?;
    let violations = validate_plan(&plan);

    let errors = violations
        .iter()
        .filter(|v| v.severity == Severity::Error)
        .count();
    let warnings = violations
        .iter()
        .filter(|v| v.severity == Severity::Warning)
        .count();

    for v in &violations {
        println!("{v}");
    }

    println!("\n{errors} error(s), {warnings} warning(s)");

    if errors == 0 {
        println!("Plan is valid ({} combination(s)).", plan.combination_count());
        Ok(())
    } else {
        Err(format!("Plan has {errors} validation error(s)").into())
    }
}
