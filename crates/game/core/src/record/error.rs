//! Ledger errors.

use super::StepId;
use crate::catalog::PropertyId;
use crate::config::ConfigError;
use crate::error::{EnchantError, ErrorSeverity};

/// Errors surfaced by [`EnchantmentRecord`](super::EnchantmentRecord) operations.
///
/// Every failing operation leaves the ledger exactly as it was.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("property '{property}' is not in the catalog")]
    InvalidPropertyReference { property: PropertyId },

    #[error("property '{property}' appears more than once in one step")]
    DuplicateProperty { property: PropertyId },

    #[error("delta {value} for property '{property}' is out of range")]
    InvalidDelta { property: PropertyId, value: i64 },

    #[error(
        "step {step}: property '{property}' would reach {value}, outside {min}..={max}"
    )]
    ValueOutOfBounds {
        step: StepId,
        property: PropertyId,
        value: i64,
        min: i32,
        max: i32,
    },

    #[error("potential {potential} leaves the representable range")]
    PotentialOverflow { potential: i64 },

    #[error("step '{step}' not found")]
    StepNotFound { step: StepId },

    #[error("index {index} is out of range for a ledger of {len} steps")]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EnchantError for RecordError {
    fn severity(&self) -> ErrorSeverity {
        use RecordError::*;
        match self {
            ValueOutOfBounds { .. } => ErrorSeverity::Recoverable,
            InvalidPropertyReference { .. }
            | DuplicateProperty { .. }
            | InvalidDelta { .. }
            | PotentialOverflow { .. }
            | StepNotFound { .. }
            | IndexOutOfRange { .. } => ErrorSeverity::Validation,
            Config(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        use RecordError::*;
        match self {
            InvalidPropertyReference { .. } => "RECORD_INVALID_PROPERTY_REFERENCE",
            DuplicateProperty { .. } => "RECORD_DUPLICATE_PROPERTY",
            InvalidDelta { .. } => "RECORD_INVALID_DELTA",
            ValueOutOfBounds { .. } => "RECORD_VALUE_OUT_OF_BOUNDS",
            PotentialOverflow { .. } => "RECORD_POTENTIAL_OVERFLOW",
            StepNotFound { .. } => "RECORD_STEP_NOT_FOUND",
            IndexOutOfRange { .. } => "RECORD_INDEX_OUT_OF_RANGE",
            Config(inner) => inner.error_code(),
        }
    }
}
