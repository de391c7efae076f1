//! Error types for atelier.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias using atelier's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for atelier operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Supplied records are inconsistent (dangling parent, duplicate id, cycle).
    #[error("Integrity error: {0}")]
    Integrity(String),

    /// Operation targets a folder outside the caller's tree
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Move would make a folder its own ancestor
    #[error("Cycle error: cannot move folder {folder_id} under {target_id} (circular reference)")]
    Cycle { folder_id: Uuid, target_id: Uuid },

    /// Folder not found (never existed or already deleted)
    #[error("Folder not found: {0}")]
    FolderNotFound(Uuid),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Nesting would exceed the configured maximum depth
    #[error("Depth exceeded: folder would sit at depth {depth}, maximum is {max_depth}")]
    DepthExceeded { depth: usize, max_depth: usize },

    /// Deleting a non-empty folder needs an explicit cascade mode
    #[error("Cascade mode required: folder {folder_id} contains {item_count} item(s)")]
    CascadeModeRequired { folder_id: Uuid, item_count: usize },

    /// Operation is not valid in the current deletion state
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// Generated response text failed the safety check
    #[error("Unsafe response: {0}")]
    UnsafeResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status code the calling layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) | Error::DepthExceeded { .. } | Error::Cycle { .. } => 400,
            Error::Forbidden(_) => 403,
            Error::FolderNotFound(_) | Error::NotFound(_) => 404,
            Error::CascadeModeRequired { .. } | Error::InvalidTransition(_) => 409,
            Error::UnsafeResponse(_) => 422,
            Error::Integrity(_)
            | Error::Config(_)
            | Error::Serialization(_)
            | Error::Io(_) => 500,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_integrity() {
        let err = Error::Integrity("dangling parent".to_string());
        assert_eq!(err.to_string(), "Integrity error: dangling parent");
    }

    #[test]
    fn test_error_display_forbidden() {
        let err = Error::Forbidden("not your folder".to_string());
        assert_eq!(err.to_string(), "Forbidden: not your folder");
    }

    #[test]
    fn test_error_display_cycle_mentions_circular() {
        let err = Error::Cycle {
            folder_id: Uuid::nil(),
            target_id: Uuid::nil(),
        };
        assert!(err.to_string().contains("circular"));
    }

    #[test]
    fn test_error_display_folder_not_found() {
        let id = Uuid::new_v4();
        let err = Error::FolderNotFound(id);
        assert_eq!(err.to_string(), format!("Folder not found: {}", id));
    }

    #[test]
    fn test_error_display_depth_exceeded() {
        let err = Error::DepthExceeded {
            depth: 6,
            max_depth: 5,
        };
        assert!(err.to_string().contains("depth 6"));
        assert!(err.to_string().contains("maximum is 5"));
    }

    #[test]
    fn test_error_display_cascade_mode_required() {
        let err = Error::CascadeModeRequired {
            folder_id: Uuid::nil(),
            item_count: 3,
        };
        assert!(err.to_string().contains("3 item(s)"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(
            Error::Cycle {
                folder_id: Uuid::nil(),
                target_id: Uuid::nil()
            }
            .status_code(),
            400
        );
        assert_eq!(Error::Forbidden("x".into()).status_code(), 403);
        assert_eq!(Error::FolderNotFound(Uuid::nil()).status_code(), 404);
        assert_eq!(
            Error::CascadeModeRequired {
                folder_id: Uuid::nil(),
                item_count: 1
            }
            .status_code(),
            409
        );
        assert_eq!(Error::UnsafeResponse("x".into()).status_code(), 422);
        assert_eq!(Error::Integrity("x".into()).status_code(), 500);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<i32>("not a number").unwrap_err();
        let err: Error = json_err.into();
        match err {
            Error::Serialization(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected Serialization error"),
        }
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("access denied"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<Error>();
        assert_sync::<Error>();
    }
}
