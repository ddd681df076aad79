//! Data models for Tooltrack

pub mod dashboard;
pub mod log;
pub mod tool;
pub mod user;

// Re-export commonly used types
pub use dashboard::{DashboardQuery, DashboardRow, HistoryEntry};
pub use log::{CheckoutHolder, Log, LogType};
pub use tool::{EffectiveStatus, Tool, ToolStatus};
pub use user::{Role, User, UserClaims};

use crate::error::{AppError, AppResult};

/// Trimmed value of a required text field, or a validation error naming it
pub(crate) fn required(value: Option<String>, field: &str) -> AppResult<String> {
    optional(value).ok_or_else(|| AppError::Validation(format!("Missing required field: {}", field)))
}

/// Trimmed value of an optional text field; blank becomes `None`
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required(Some("  T-100 ".into()), "qrId").unwrap(), "T-100");
    }

    #[test]
    fn test_required_rejects_blank_and_missing() {
        for value in [None, Some(String::new()), Some("   ".into())] {
            match required(value, "workerId") {
                Err(AppError::Validation(msg)) => assert!(msg.contains("workerId")),
                other => panic!("expected validation error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_optional_blank_is_none() {
        assert_eq!(optional(Some(" ".into())), None);
        assert_eq!(optional(Some("Job 42".into())), Some("Job 42".to_string()));
        assert_eq!(optional(None), None);
    }
}
