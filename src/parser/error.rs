use thiserror::Error;

use super::blocks::{Stage, MAX_SOURCE_LINKS};

/// Why a heading did not produce a record. Never fatal: the block is
/// dropped and extraction moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("case number {0:?} is not a positive integer")]
    InvalidCaseNumber(String),

    #[error("more than {} source links", MAX_SOURCE_LINKS)]
    TooManySourceLinks,

    #[error("expected {expected} at line {line_no}, found {found}")]
    UnexpectedLine {
        expected: Stage,
        line_no: usize,
        found: &'static str,
    },

    #[error("document ended before {expected}")]
    Truncated { expected: Stage },
}
