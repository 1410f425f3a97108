use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user owned by the wider platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn from_string(id: &str) -> Self {
        Self(id.to_owned())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Stable numeric codes, grouped by thousands:
/// 2xxx lookup, 3xxx concurrency, 4xxx storage, 5xxx runtime, 6xxx input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    UserNotFound = 2001,
    ConcurrencyConflict = 3001,
    Repository = 4001,
    DataIntegrity = 4003,
    Infrastructure = 5001,
    Timeout = 5003,
    Validation = 6001,
}

impl ErrorCode {
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Whether the caller may simply try again.
    pub const fn is_transient(self) -> bool {
        matches!(self, ErrorCode::ConcurrencyConflict | ErrorCode::Timeout)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Concurrent modification: {0}")]
    ConcurrencyConflict(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    #[error("Infrastructure error: {0}")]
    Infrastructure(String),

    #[error("Timed out: {0}")]
    Timeout(String),
}

impl DomainError {
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::UserNotFound(_) => ErrorCode::UserNotFound,
            DomainError::Validation(_) => ErrorCode::Validation,
            DomainError::ConcurrencyConflict(_) => ErrorCode::ConcurrencyConflict,
            DomainError::Repository(_) => ErrorCode::Repository,
            DomainError::DataIntegrity(_) => ErrorCode::DataIntegrity,
            DomainError::Infrastructure(_) => ErrorCode::Infrastructure,
            DomainError::Timeout(_) => ErrorCode::Timeout,
        }
    }

    pub fn is_transient(&self) -> bool {
        self.code().is_transient()
    }

    /// `[code] message`, for log lines.
    pub fn format_with_code(&self) -> String {
        format!("[{}] {}", self.code().code(), self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_roundtrips_through_string() {
        let id = UserId::from_string("user-42");
        assert_eq!(id.as_str(), "user-42");
        assert_eq!(id.to_string(), "user-42");
    }

    #[test]
    fn test_user_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&UserId::from_string("u7")).unwrap();
        assert_eq!(json, "\"u7\"");
    }

    #[test]
    fn test_generated_user_ids_are_unique() {
        assert_ne!(UserId::new(), UserId::new());
    }

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound("7".to_string());
        assert_eq!(err.code().code(), 2001);
        assert_eq!(err.format_with_code(), "[2001] User not found: 7");

        let err = DomainError::Repository("disk I/O".to_string());
        assert_eq!(err.code(), ErrorCode::Repository);
        assert!(!err.is_transient());
    }

    #[test]
    fn test_conflicts_and_timeouts_are_transient() {
        assert!(DomainError::ConcurrencyConflict("v3".to_string()).is_transient());
        assert!(DomainError::Timeout("load".to_string()).is_transient());
        assert!(!DomainError::Validation("bad".to_string()).is_transient());
    }
}
