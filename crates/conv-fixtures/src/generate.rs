//! End-to-end generation from plan to header file on disk.
//!
//! Validates the plan, resolves every combination's dump up front,
//! computes each case, renders the header, writes it and finally removes
//! the dump directory.

use std::path::{Path, PathBuf};

use log::info;

use crate::capture::{capture_case, case_seed};
use crate::dumps::{DumpIndex, read_module_text, remove_dump_dir};
use crate::emit::FixtureHeader;
use crate::error::{FixtureError, Severity};
use crate::schema::{SweepPlan, validate_plan};
use crate::sweep::enumerate_combinations;

/// Where the PlaidML tests expect their IR dumps.
pub const DEFAULT_DUMP_DIR: &str = "tensorflow/compiler/xla/service/plaidml/tests/conv_hlo_module";

/// Where the PlaidML tests include their fixture header from.
pub const DEFAULT_OUTPUT: &str = "tensorflow/compiler/xla/service/plaidml/tests/plaidml_conv_test_io.h";

/// Knobs of one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub dump_dir: PathBuf,
    pub output: PathBuf,
    /// Overrides the plan's seed.
    pub seed: Option<u64>,
    /// Remove `dump_dir` once the header is written.
    pub cleanup: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            dump_dir: PathBuf::from(DEFAULT_DUMP_DIR),
            output: PathBuf::from(DEFAULT_OUTPUT),
            seed: None,
            cleanup: true,
        }
    }
}

/// Manifest of a generation run.
#[derive(Debug, Clone)]
pub struct GeneratedHeader {
    /// Path the header was written to.
    pub path: PathBuf,
    /// Number of combinations (entries per block).
    pub combinations: usize,
    /// Number of bytes written.
    pub bytes: usize,
    /// Base seed; combination `i` used `base_seed + i`.
    pub base_seed: u64,
    /// Whether the dump directory was removed.
    pub cleaned_up: bool,
}

/// Generate the fixture header for `plan`.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPlan`] if validation reports errors,
/// [`FixtureError::MissingDump`] / [`FixtureError::AmbiguousDump`] if the
/// dump directory does not name exactly one file per combination, and
/// [`FixtureError::Io`] if a dump cannot be read or the header cannot be
/// written. Nothing is written when any of these occur. Failing to
/// remove the dump directory is not an error.
pub fn generate_header(
    plan: &SweepPlan,
    options: &GenerateOptions,
) -> Result<GeneratedHeader, FixtureError> {
    let errors: Vec<_> = validate_plan(plan)
        .into_iter()
        .filter(|v| v.severity == Severity::Error)
        .collect();
    if let Some(first) = errors.first() {
        return Err(FixtureError::InvalidPlan {
            count: errors.len(),
            first: first.to_string(),
        });
    }

    let count = plan.combination_count();
    let dumps = DumpIndex::scan(&options.dump_dir)?.resolve_all(count)?;

    let base_seed = options
        .seed
        .or(plan.seed)
        .unwrap_or_else(rand::random::<u64>);
    info!("generating {count} combination(s) with base seed {base_seed}");

    let mut header = FixtureHeader::new();
    for (combination, dump) in enumerate_combinations(plan).zip(&dumps) {
        let module_text = read_module_text(dump)?;
        let case = capture_case(&combination, case_seed(base_seed, combination.index), module_text)?;
        header.push_case(&case);
    }

    let content = header.render();
    write_header(&options.output, &content)?;
    info!(
        "wrote {} ({} bytes, {} combination(s))",
        options.output.display(),
        content.len(),
        header.case_count()
    );

    let cleaned_up = options.cleanup && remove_dump_dir(&options.dump_dir);
    if !options.cleanup {
        info!("keeping dumps in {}", options.dump_dir.display());
    }

    Ok(GeneratedHeader {
        path: options.output.clone(),
        combinations: header.case_count(),
        bytes: content.len(),
        base_seed,
        cleaned_up,
    })
}

fn write_header(path: &Path, content: &str) -> Result<(), FixtureError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}
