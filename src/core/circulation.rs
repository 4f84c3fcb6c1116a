use std::fmt;
use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};

#[derive(Debug)]
pub enum CirculationError {
    Database {
        message: String,
        reason_code: Option<String>,
        retryable: bool,
    },
    // A concurrent writer invalidated one of the transaction preconditions
    // before it committed. The caller owns the retry; re-reading state after
    // a conflict is required before re-submitting.
    Conflict {
        message: String,
        reason_code: Option<String>,
    },
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
    Serialization {
        message: String,
    },
    Runtime {
        message: String,
        reason_code: Option<String>,
    },
}

impl CirculationError {
    pub fn database(message: &str, reason_code: Option<String>, retryable: bool) -> CirculationError {
        CirculationError::Database { message: message.to_string(), reason_code, retryable }
    }

    pub fn conflict(message: &str, reason_code: Option<String>) -> CirculationError {
        CirculationError::Conflict { message: message.to_string(), reason_code }
    }

    pub fn duplicate_key(message: &str) -> CirculationError {
        CirculationError::DuplicateKey { message: message.to_string() }
    }

    pub fn not_found(message: &str) -> CirculationError {
        CirculationError::NotFound { message: message.to_string() }
    }

    pub fn validation(message: &str, reason_code: Option<String>) -> CirculationError {
        CirculationError::Validation { message: message.to_string(), reason_code }
    }

    pub fn serialization(message: &str) -> CirculationError {
        CirculationError::Serialization { message: message.to_string() }
    }

    pub fn runtime(message: &str, reason_code: Option<String>) -> CirculationError {
        CirculationError::Runtime { message: message.to_string(), reason_code }
    }

    pub fn database_or_unavailable(message: &str, reason: Option<String>, retryable: bool) -> CirculationError {
        if retryable {
            CirculationError::conflict(
                format!("ledger store unavailable error {:?} {:?}", message, reason).as_str(), reason)
        } else if let Some(ref reason_val) = reason {
            if reason_val.as_str().contains("404") {
                CirculationError::not_found(
                    format!("not found error {:?} {:?}", message, reason).as_str())
            } else {
                CirculationError::database(
                    format!("ledger store error {:?} {:?}", message, reason).as_str(), reason, false)
            }
        } else {
            CirculationError::database(
                format!("ledger store error {:?} {:?}", message, reason).as_str(), reason, false)
        }
    }

    pub fn retryable(&self) -> bool {
        match self {
            CirculationError::Database { retryable, .. } => { *retryable }
            CirculationError::Conflict { .. } => { true }
            CirculationError::DuplicateKey { .. } => { false }
            CirculationError::NotFound { .. } => { false }
            CirculationError::Validation { .. } => { false }
            CirculationError::Serialization { .. } => { false }
            CirculationError::Runtime { .. } => { false }
        }
    }
}

impl From<std::io::Error> for CirculationError {
    fn from(err: std::io::Error) -> Self {
        CirculationError::runtime(
            format!("serde io {:?}", err).as_str(), None)
    }
}

impl From<serde_json::Error> for CirculationError {
    fn from(err: serde_json::Error) -> Self {
        CirculationError::serialization(
            format!("serde json parsing {:?}", err).as_str())
    }
}

impl From<String> for CirculationError {
    fn from(err: String) -> Self {
        CirculationError::serialization(
            format!("serde parsing {:?}", err).as_str())
    }
}

impl Display for CirculationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CirculationError::Database { message, reason_code, retryable } => {
                write!(f, "{} {:?} {}", message, reason_code, retryable)
            }
            CirculationError::Conflict { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            CirculationError::DuplicateKey { message } => {
                write!(f, "{}", message)
            }
            CirculationError::NotFound { message } => {
                write!(f, "{}", message)
            }
            CirculationError::Validation { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
            CirculationError::Serialization { message } => {
                write!(f, "{}", message)
            }
            CirculationError::Runtime { message, reason_code } => {
                write!(f, "{} {:?}", message, reason_code)
            }
        }
    }
}

/// A specialized Result type for the circulation core.
pub type CirculationResult<T> = Result<T, CirculationError>;

// It defines abstraction for paginated result
#[derive(Debug, Clone)]
pub struct PaginatedResult<T> {
    // The page number or token
    pub page: Option<String>,
    // page size
    pub page_size: usize,
    // Next page if available
    pub next_page: Option<String>,
    // list of records
    pub records: Vec<T>,
}

impl<T> PaginatedResult<T> {
    pub(crate) fn new(page: Option<&str>, page_size: usize,
                      next_page: Option<String>, records: Vec<T>) -> Self {
        PaginatedResult {
            page: page.map(str::to_string),
            page_size,
            next_page,
            records,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum AssetStatus {
    Available,
    CheckedOut,
    OnHold,
    Lost,
    Unknown,
}

impl From<String> for AssetStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Available" => AssetStatus::Available,
            "CheckedOut" => AssetStatus::CheckedOut,
            "OnHold" => AssetStatus::OnHold,
            "Lost" => AssetStatus::Lost,
            _ => AssetStatus::Unknown,
        }
    }
}

impl Display for AssetStatus {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            AssetStatus::Available => write!(f, "Available"),
            AssetStatus::CheckedOut => write!(f, "CheckedOut"),
            AssetStatus::OnHold => write!(f, "OnHold"),
            AssetStatus::Lost => write!(f, "Lost"),
            AssetStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

// Disposition is the outcome of a lifecycle operation. Missing references and
// checkout collisions are expected business outcomes that callers branch on,
// not errors.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub enum Disposition {
    Applied,
    AlreadyCheckedOut,
    InvalidReference,
}

impl Display for Disposition {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Disposition::Applied => write!(f, "Applied"),
            Disposition::AlreadyCheckedOut => write!(f, "AlreadyCheckedOut"),
            Disposition::InvalidReference => write!(f, "InvalidReference"),
        }
    }
}

impl Disposition {
    pub fn applied(&self) -> bool {
        *self == Disposition::Applied
    }
}

#[cfg(test)]
mod tests {
    use crate::core::circulation::{AssetStatus, CirculationError, Disposition};

    #[tokio::test]
    async fn test_should_create_database_error() {
        assert!(matches!(CirculationError::database("test", None, false), CirculationError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_conflict_error() {
        assert!(matches!(CirculationError::conflict("test", None), CirculationError::Conflict{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_duplicate_key_error() {
        assert!(matches!(CirculationError::duplicate_key("test"), CirculationError::DuplicateKey{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_not_found_error() {
        assert!(matches!(CirculationError::not_found("test"), CirculationError::NotFound{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_validation_error() {
        assert!(matches!(CirculationError::validation("test", None), CirculationError::Validation{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_serialization_error() {
        assert!(matches!(CirculationError::serialization("test"), CirculationError::Serialization{ message: _ }));
    }

    #[tokio::test]
    async fn test_should_create_runtime_error() {
        assert!(matches!(CirculationError::runtime("test", None), CirculationError::Runtime{ message: _, reason_code: _ }));
    }

    #[tokio::test]
    async fn test_should_create_database_or_unavailable_error() {
        assert!(matches!(CirculationError::database_or_unavailable("test", None, true), CirculationError::Conflict{ message: _, reason_code: _ }));
        assert!(matches!(CirculationError::database_or_unavailable("test", Some("404".to_string()), false), CirculationError::NotFound{ message: _ }));
        assert!(matches!(CirculationError::database_or_unavailable("test", Some("500".to_string()), false), CirculationError::Database{ message: _, reason_code: _, retryable: _ }));
        assert!(matches!(CirculationError::database_or_unavailable("test", None, false), CirculationError::Database{ message: _, reason_code: _, retryable: _ }));
    }

    #[tokio::test]
    async fn test_should_create_retryable_error() {
        assert_eq!(false, CirculationError::database("test", None, false).retryable());
        assert_eq!(true, CirculationError::database("test", None, true).retryable());
        assert_eq!(true, CirculationError::conflict("test", None).retryable());
        assert_eq!(false, CirculationError::duplicate_key("test").retryable());
        assert_eq!(false, CirculationError::not_found("test").retryable());
        assert_eq!(false, CirculationError::validation("test", None).retryable());
        assert_eq!(false, CirculationError::serialization("test").retryable());
        assert_eq!(false, CirculationError::runtime("test", None).retryable());
    }

    #[tokio::test]
    async fn test_should_format_asset_status() {
        let statuses = vec![
            AssetStatus::Available,
            AssetStatus::CheckedOut,
            AssetStatus::OnHold,
            AssetStatus::Lost,
            AssetStatus::Unknown,
        ];
        for status in statuses {
            let str = status.to_string();
            let str_status = AssetStatus::from(str);
            assert_eq!(status, str_status);
        }
    }

    #[tokio::test]
    async fn test_should_check_applied_disposition() {
        assert!(Disposition::Applied.applied());
        assert!(!Disposition::AlreadyCheckedOut.applied());
        assert!(!Disposition::InvalidReference.applied());
    }
}
