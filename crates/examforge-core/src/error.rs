//! Generation error types.
//!
//! Every failure here is a deterministic function of the authored
//! specifications and the generator configuration: re-running with the same
//! inputs reproduces the same error. Nothing is retried. A defect in an
//! exam specification corrupts fairness or later grading aggregation, so
//! the whole batch aborts.

use thiserror::Error;

use crate::model::ComponentKind;

/// Errors raised while realizing specifications or assigning exams.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// A specification carries a malformed ID string.
    #[error("invalid {kind} ID {id:?}: IDs must start with a letter, use only letters, digits, '_' or '-', and be at most {max_len} characters")]
    InvalidId {
        kind: ComponentKind,
        id: String,
        max_len: usize,
    },

    /// Two distinct specification objects share the same ID.
    #[error("multiple {kind} specifications with the ID {id:?} were detected")]
    IdCollision { kind: ComponentKind, id: String },

    /// A student's exam totals a different number of points than the first
    /// exam generated in the batch.
    #[error("inconsistent total point values: {first_uniqname}={expected}, {uniqname}={actual}")]
    PointTotalMismatch {
        expected: u32,
        actual: u32,
        first_uniqname: String,
        uniqname: String,
    },

    /// A skin chooser produced more than one skin for a component that is
    /// only allowed a single variant.
    #[error("{kind} {id:?} resolved {count} skins where exactly one was required (multiple skins per {kind} require allow_duplicates)")]
    MultipleSkins {
        kind: ComponentKind,
        id: String,
        count: usize,
    },

    /// Chooser pools nest deeper than the resolution guard permits.
    #[error("chooser nesting exceeded {max} levels; the specification likely contains a cycle")]
    ChooserTooDeep { max: usize },

    /// A chooser requested more components than its pool can supply.
    #[error("chooser requested {requested} of only {available} candidate {kind}s")]
    PoolExhausted {
        kind: ComponentKind,
        requested: usize,
        available: usize,
    },

    /// The generator was constructed with unusable options.
    #[error("invalid generator options: {0}")]
    InvalidOptions(String),
}

impl GenerationError {
    /// Returns `true` if this failure points at the authored specifications
    /// rather than at how the generator was configured.
    pub fn is_authoring_defect(&self) -> bool {
        !matches!(self, GenerationError::InvalidOptions(_))
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GenerationError>;
