//! Success/failure results for menu and command-line callers.

use crate::error::{CoreResult, ErrorCategory};
use serde::Serialize;
use std::fmt;

/// A boolean result with a message for a person to read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    /// Whether the operation was applied.
    pub success: bool,
    /// What happened.
    pub message: String,
    /// Class of failure, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<ErrorCategory>,
}

impl Outcome {
    /// A successful outcome.
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            category: None,
        }
    }

    /// Converts a result whose success value is the message.
    pub fn from_result(result: CoreResult<String>) -> Self {
        match result {
            Ok(message) => Self::ok(message),
            Err(err) => Self {
                success: false,
                message: err.to_string(),
                category: Some(err.category()),
            },
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn failure_keeps_category() {
        let outcome = Outcome::from_result(Err(CoreError::conflict(
            "Seat 3 on flight 1 is already booked.",
        )));
        assert!(!outcome.success);
        assert_eq!(outcome.category, Some(ErrorCategory::Conflict));
        assert_eq!(outcome.to_string(), "Seat 3 on flight 1 is already booked.");
    }

    #[test]
    fn success_serializes_without_category() {
        let json = serde_json::to_value(Outcome::ok("done")).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "message": "done"}));
    }
}
