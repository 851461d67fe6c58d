use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid plan: {count} error(s), first: {first}")]
    InvalidPlan { count: usize, first: String },

    #[error("Shape error: {0}")]
    Shape(String),

    #[error("Missing dump for combination {index:04} in {}", dir.display())]
    MissingDump { index: usize, dir: PathBuf },

    #[error("Ambiguous dump for combination {index:04}: {} and {}", first.display(), second.display())]
    AmbiguousDump {
        index: usize,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Dump {} contains the raw string terminator `)#\"`", path.display())]
    DelimiterCollision { path: PathBuf },
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub severity: Severity,
    pub rule: String,
    pub message: String,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "ERROR",
            Severity::Warning => "WARN",
            Severity::Info => "INFO",
        };
        write!(f, "[{prefix}] {}: {}", self.rule, self.message)?;
        if let Some(ref loc) = self.location {
            write!(f, " (at {loc})")?;
        }
        Ok(())
    }
}
