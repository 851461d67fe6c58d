use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use conv_fixtures::generate::{DEFAULT_DUMP_DIR, DEFAULT_OUTPUT};

mod commands;

/// Top-level CLI argument parser for the `convgen` command
#[derive(Parser)]
#[command(
    name = "convgen",
    about = "convgen: convolution test fixtures as a C++ header",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the `convgen` CLI
#[derive(Subcommand)]
enum Commands {
    /// Compute every combination and write the fixture header
    Generate {
        /// Sweep plan YAML (built-in plan when omitted)
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Directory holding the per-combination IR module dumps
        #[arg(long, default_value = DEFAULT_DUMP_DIR)]
        dump_dir: PathBuf,
        /// Path of the generated header
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,
        /// Base seed for the random inputs (overrides the plan's seed)
        #[arg(long)]
        seed: Option<u64>,
        /// Leave the dump directory in place after writing the header
        #[arg(long)]
        keep_dumps: bool,
    },
    /// List the combinations of a plan with their array shapes
    Plan {
        /// Sweep plan YAML (built-in plan when omitted)
        #[arg(long)]
        plan: Option<PathBuf>,
        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Validate a sweep plan
    Validate {
        /// Sweep plan YAML (built-in plan when omitted)
        #[arg(long)]
        plan: Option<PathBuf>,
    },
}

/// Dispatch a parsed CLI subcommand to its handler
fn run_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Generate {
            plan,
            dump_dir,
            output,
            seed,
            keep_dumps,
        } => commands::generate::run(plan.as_deref(), dump_dir, output, seed, !keep_dumps),
        Commands::Plan { plan, format } => match commands::plan::OutputFormat::from_str(&format) {
            Ok(fmt) => commands::plan::run(plan.as_deref(), fmt),
            Err(e) => Err(e.into()),
        },
        Commands::Validate { plan } => commands::validate::run(plan.as_deref()),
    }
}

/// Entry point: install logging, parse CLI arguments and run the selected subcommand
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    if let Err(e) = run_command(cli.command) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Write a small seeded plan into `dir` and return its path
    fn test_plan(dir: &std::path::Path) -> PathBuf {
        let path = dir.join("plan.yaml");
        std::fs::write(
            &path,
            "input_shapes: [[1, 4, 4, 1]]\nkernel_shapes: [[2, 2, 1, 1]]\nseed: 3\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn dispatch_validate_builtin() {
        let result = run_command(Commands::Validate { plan: None });
        assert!(result.is_ok());
    }

    #[test]
    fn dispatch_validate_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command(Commands::Validate {
            plan: Some(test_plan(dir.path())),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn dispatch_plan_text() {
        let result = run_command(Commands::Plan {
            plan: None,
            format: "text".to_string(),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn dispatch_plan_json() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command(Commands::Plan {
            plan: Some(test_plan(dir.path())),
            format: "json".to_string(),
        });
        assert!(result.is_ok());
    }

    #[test]
    fn dispatch_plan_unknown_format() {
        let result = run_command(Commands::Plan {
            plan: None,
            format: "xml".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn dispatch_generate() {
        let dir = tempfile::tempdir().unwrap();
        let dumps = dir.path().join("dumps");
        std::fs::create_dir(&dumps).unwrap();
        std::fs::write(dumps.join("module_0000.before_optimizations.txt"), "HloModule m").unwrap();
        let output = dir.path().join("io.h");
        let result = run_command(Commands::Generate {
            plan: Some(test_plan(dir.path())),
            dump_dir: dumps.clone(),
            output: output.clone(),
            seed: None,
            keep_dumps: false,
        });
        assert!(result.is_ok());
        assert!(output.exists());
        assert!(!dumps.exists());
    }

    #[test]
    fn dispatch_generate_missing_dumps() {
        let dir = tempfile::tempdir().unwrap();
        let result = run_command(Commands::Generate {
            plan: Some(test_plan(dir.path())),
            dump_dir: dir.path().join("absent"),
            output: dir.path().join("io.h"),
            seed: Some(1),
            keep_dumps: true,
        });
        assert!(result.is_err());
    }
}
