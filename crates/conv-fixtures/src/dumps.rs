//! IR module dumps, one text file per combination.
//!
//! The compiler under test dumps each lowered module as a file whose name
//! carries the combination index as four digits right before a `.before`
//! marker, e.g. `module_0003.before_optimizations.txt`. The directory is
//! scanned once into an explicit index → path map so that every missing
//! or ambiguous dump is reported before any computation starts.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::error::FixtureError;

/// Marker that follows the padded index in a dump file name.
pub const BEFORE_MARKER: &str = ".before";

/// Terminator of the `R"#( ... )#"` raw string the text is embedded in.
pub const RAW_STRING_TERMINATOR: &str = ")#\"";

const INDEX_DIGITS: usize = 4;

/// Index → dump file map for one dump directory.
#[derive(Debug, Clone)]
pub struct DumpIndex {
    dir: PathBuf,
    entries: BTreeMap<usize, PathBuf>,
}

impl DumpIndex {
    /// Scan `dir` (not recursively) for dump files.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::Io`] if the directory cannot be read, or
    /// [`FixtureError::AmbiguousDump`] if two files claim the same index.
    pub fn scan(dir: &Path) -> Result<Self, FixtureError> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_ok_and(|t| t.is_file()))
            .map(|e| e.path())
            .collect();
        files.sort();

        let mut entries: BTreeMap<usize, PathBuf> = BTreeMap::new();
        for path in files {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            for index in dump_indices(name) {
                if let Some(first) = entries.get(&index) {
                    return Err(FixtureError::AmbiguousDump {
                        index,
                        first: first.clone(),
                        second: path,
                    });
                }
                debug!("dump {index:04} -> {}", path.display());
                entries.insert(index, path.clone());
            }
        }
        info!("found {} dump(s) in {}", entries.len(), dir.display());

        Ok(Self {
            dir: dir.to_path_buf(),
            entries,
        })
    }

    /// Directory the index was built from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dump file for combination `index`.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::MissingDump`] if no file carries the index.
    pub fn path_for(&self, index: usize) -> Result<&Path, FixtureError> {
        self.entries
            .get(&index)
            .map(PathBuf::as_path)
            .ok_or_else(|| FixtureError::MissingDump {
                index,
                dir: self.dir.clone(),
            })
    }

    /// Dump files for combinations `0..count`, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first index without a dump.
    pub fn resolve_all(&self, count: usize) -> Result<Vec<PathBuf>, FixtureError> {
        (0..count)
            .map(|i| self.path_for(i).map(Path::to_path_buf))
            .collect()
    }
}

/// Indices a file name claims: every `NNNN.before` occurrence whose four
/// leading characters are ASCII digits.
fn dump_indices(name: &str) -> Vec<usize> {
    let mut indices: Vec<usize> = name
        .match_indices(BEFORE_MARKER)
        .filter_map(|(at, _)| {
            let digits = name.get(at.checked_sub(INDEX_DIGITS)?..at)?;
            if digits.bytes().all(|b| b.is_ascii_digit()) {
                digits.parse().ok()
            } else {
                None
            }
        })
        .collect();
    indices.dedup();
    indices
}

/// Name of the dump file for `index` under a `prefix`/`suffix` layout.
pub fn dump_file_name(prefix: &str, index: usize, suffix: &str) -> String {
    format!("{prefix}{index:04}{BEFORE_MARKER}{suffix}")
}

/// Read a module dump verbatim.
///
/// # Errors
///
/// Returns [`FixtureError::Io`] on read failure and
/// [`FixtureError::DelimiterCollision`] if the text would terminate the
/// raw string literal it is embedded in.
pub fn read_module_text(path: &Path) -> Result<String, FixtureError> {
    let text = std::fs::read_to_string(path)?;
    if text.contains(RAW_STRING_TERMINATOR) {
        return Err(FixtureError::DelimiterCollision {
            path: path.to_path_buf(),
        });
    }
    Ok(text)
}

/// Remove the dump directory and everything in it.
///
/// Failure is logged and reported as `false`; it never aborts a run.
pub fn remove_dump_dir(dir: &Path) -> bool {
    match std::fs::remove_dir_all(dir) {
        Ok(()) => {
            info!("removed {}", dir.display());
            true
        }
        Err(e) => {
            warn!("Error: {} : {e}", dir.display());
            false
        }
    }
}
