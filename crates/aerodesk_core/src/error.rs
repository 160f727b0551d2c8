//! Error types for aerodesk core.

use crate::types::EntityKind;
use serde::Serialize;
use std::fmt;
use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in aerodesk core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] aerodesk_storage::StorageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A stored row could not be decoded.
    #[error("cannot decode {table} row at line {line}: {message}")]
    Codec {
        /// Table the row belongs to.
        table: EntityKind,
        /// 1-based line number within the table file.
        line: usize,
        /// Decoder message.
        message: String,
    },

    /// A record with the given key does not exist.
    #[error("{kind} {key} not found")]
    NotFound {
        /// Entity collection searched.
        kind: EntityKind,
        /// The key that was not found.
        key: String,
    },

    /// The operation would break a uniqueness or reference rule.
    #[error("{message}")]
    Conflict {
        /// Description of the conflict.
        message: String,
    },

    /// The request itself is malformed.
    #[error("{message}")]
    Validation {
        /// Description of what is wrong.
        message: String,
    },

    /// The loaded dataset cannot satisfy the store invariants.
    #[error("invalid dataset: {message}")]
    InvalidFormat {
        /// Description of the format issue.
        message: String,
    },

    /// Another session holds the data directory.
    #[error("data directory locked: another session has exclusive access")]
    DatabaseLocked,

    /// The session is closed.
    #[error("database is closed")]
    DatabaseClosed,
}

/// Coarse error classes reported to callers of the boundary operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Unknown primary key or foreign reference.
    NotFound,
    /// Duplicate key, seat already held, record still referenced, flight full.
    Conflict,
    /// Malformed input or an operation the entity does not support.
    Validation,
    /// Persistence failure.
    Io,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotFound => "not found",
            Self::Conflict => "conflict",
            Self::Validation => "validation",
            Self::Io => "I/O",
        };
        f.write_str(name)
    }
}

impl CoreError {
    /// Creates a not found error.
    pub fn not_found(kind: EntityKind, key: impl fmt::Display) -> Self {
        Self::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    /// Creates a conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Returns the class this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::Conflict { .. } => ErrorCategory::Conflict,
            Self::Validation { .. } | Self::DatabaseClosed => ErrorCategory::Validation,
            Self::Storage(_)
            | Self::Io(_)
            | Self::Codec { .. }
            | Self::InvalidFormat { .. }
            | Self::DatabaseLocked => ErrorCategory::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity_and_key() {
        let err = CoreError::not_found(EntityKind::Flight, 42);
        assert_eq!(err.to_string(), "flight 42 not found");
        assert_eq!(err.category(), ErrorCategory::NotFound);
    }

    #[test]
    fn categories() {
        assert_eq!(
            CoreError::conflict("seat taken").category(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            CoreError::validation("bad label").category(),
            ErrorCategory::Validation
        );
        assert_eq!(
            CoreError::invalid_format("duplicate key").category(),
            ErrorCategory::Io
        );
        assert_eq!(CoreError::DatabaseLocked.category(), ErrorCategory::Io);
    }

    #[test]
    fn codec_message_points_at_line() {
        let err = CoreError::Codec {
            table: EntityKind::Booking,
            line: 3,
            message: "missing field `SeatNumber`".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot decode booking row at line 3: missing field `SeatNumber`"
        );
    }
}
