//! Print every combination of a sweep plan with its array shapes.
//!
//! Usage:
//!   cargo run --example sweep_shapes -- plans/sweep.yaml
//!
//! Without an argument the builtin single-combination plan is used.

use std::path::PathBuf;
use std::process;

use conv_fixtures::schema::{SweepPlan, parse_plan};
use conv_fixtures::sweep::enumerate_combinations;

fn main() {
    let plan = std::env::args().nth(1).map(PathBuf::from).map_or_else(
        SweepPlan::builtin,
        |path| {
            parse_plan(&path).unwrap_or_else(|e| {
                eprintln!("Failed to parse {}: {e}", path.display());
                process::exit(1);
            })
        },
    );

    let mut total = 0usize;
    for c in enumerate_combinations(&plan) {
        match c.shapes() {
            Ok(shapes) => {
                total += shapes.serialized_elements();
                println!(
                    "{c}\n    {:?} -> {:?} -> {:?}",
                    shapes.input, shapes.hidden, shapes.output
                );
            }
            Err(e) => println!("{c}\n    error: {e}"),
        }
    }
    println!();
    println!(
        "{} combination(s), {total} serialized value(s)",
        plan.combination_count()
    );
}
