use std::path::{Path, PathBuf};

use conv_fixtures::generate::{GenerateOptions, generate_header};

use super::load_plan;

pub fn run(
    plan_path: Option<&Path>,
    dump_dir: PathBuf,
    output: PathBuf,
    seed: Option<u64>,
    cleanup: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = load_plan(plan_path)?;
    let options = GenerateOptions {
        dump_dir,
        output,
        seed,
        cleanup,
    };

    let result = generate_header(&plan, &options)?;

    println!(
        "Generated {} ({} combination(s), {} bytes)",
        result.path.display(),
        result.combinations,
        result.bytes
    );
    println!("  base seed: {}", result.base_seed);
    if result.cleaned_up {
        println!("  removed {}", options.dump_dir.display());
    }

    Ok(())
}
