//! Error taxonomy for both pipelines.
//!
//! Every error is terminal for the invocation that raised it.

use std::path::PathBuf;

/// A user-supplied option could not be resolved.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown learner '{name}'; accepted values: {}", .accepted.join(", "))]
    UnknownLearner {
        name: String,
        accepted: Vec<&'static str>,
    },

    #[error("unknown base learner '{name}'; accepted values: {}", .accepted.join(", "))]
    UnknownBaseLearner {
        name: String,
        accepted: Vec<&'static str>,
    },

    #[error("no value given for {field}; accepted values: {}", .accepted.join(", "))]
    MissingValue {
        field: &'static str,
        accepted: Vec<&'static str>,
    },

    #[error("no budget given")]
    MissingBudget,
}

impl ConfigError {
    /// Names the caller may choose from, empty when the field is free text.
    pub fn accepted(&self) -> &[&'static str] {
        match self {
            Self::UnknownLearner { accepted, .. }
            | Self::UnknownBaseLearner { accepted, .. }
            | Self::MissingValue { accepted, .. } => accepted.as_slice(),
            Self::MissingBudget => &[],
        }
    }
}

/// The learner name is accepted but has no engine task mapped to it.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("learner '{learner}' is accepted but has no engine task mapped yet")]
pub struct NotImplementedError {
    pub learner: &'static str,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    NotImplemented(#[from] NotImplementedError),
}

/// An engine command was requested from an incomplete configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ComposeError {
    #[error("cannot compose a command without a budget")]
    MissingBudget,

    #[error("learner '{learner}' has no engine task to compose")]
    UnmappedLearner { learner: &'static str },

    #[error("engine setting '{field}' is empty")]
    EmptySetting { field: &'static str },
}

/// A result export could not be read as a tradeoff table.
#[derive(Debug, thiserror::Error)]
pub enum MalformedTableError {
    #[error("result table has no header row")]
    EmptyHeader,

    #[error("result table is missing required column '{column}'")]
    MissingColumn { column: String },

    #[error("row {row}: column '{column}' holds '{value}', expected a number")]
    InvalidNumber {
        column: String,
        row: usize,
        value: String,
    },

    #[error("failed to parse result table: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to open result table {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
