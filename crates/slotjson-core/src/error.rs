//! Error types for document parsing, path resolution and mutation.

use thiserror::Error;

use crate::status::Status;

/// Errors that can occur while loading, walking or mutating a document.
///
/// Every variant corresponds to exactly one [`Status`] code; hosts never see
/// the error itself, only the code produced by [`SlotError::status`].
#[derive(Error, Debug)]
pub enum SlotError {
    /// A required argument was empty or absent.
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// An argument was present but not one of the accepted values.
    #[error("malformed argument: {0}")]
    MalformedArgument(String),

    /// The document text (or a JSON fragment argument) was not valid JSON.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A path segment could not be located. `depth` is the 0-based position
    /// of the failing segment within the path.
    #[error("path segment '{segment}' not found at depth {depth}")]
    NotFound { segment: String, depth: usize },

    /// Unsupported type token, or a node whose type cannot be coerced.
    #[error("invalid type: {0}")]
    InvalidType(String),

    /// The insertion target is neither an array nor an object.
    #[error("add failed: {0}")]
    AddFailed(String),

    /// The located node could not be written back into its parent.
    #[error("set failed: {0}")]
    SetFailed(String),

    /// The located node could not be removed from its parent.
    #[error("delete failed: {0}")]
    DeleteFailed(String),
}

impl SlotError {
    /// The status code reported to the host for this failure.
    pub fn status(&self) -> Status {
        match self {
            SlotError::MissingArgument(_) | SlotError::MalformedArgument(_) => Status::ArgNeeded,
            SlotError::Parse(_) => Status::ParseError,
            SlotError::NotFound { .. } => Status::NotFound,
            SlotError::InvalidType(_) => Status::InvalidType,
            SlotError::AddFailed(_) => Status::AddFailed,
            SlotError::SetFailed(_) => Status::SetFailed,
            SlotError::DeleteFailed(_) => Status::DeleteFailed,
        }
    }
}

/// Convenience alias used throughout slotjson-core.
pub type Result<T> = std::result::Result<T, SlotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_error_maps_to_a_distinct_failure_status() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let errors = [
            SlotError::MissingArgument("path"),
            SlotError::Parse(parse_err),
            SlotError::NotFound {
                segment: "a".into(),
                depth: 0,
            },
            SlotError::InvalidType("x".into()),
            SlotError::AddFailed("x".into()),
            SlotError::SetFailed("x".into()),
            SlotError::DeleteFailed("x".into()),
        ];
        let codes: Vec<u8> = errors.iter().map(|e| e.status().code()).collect();
        assert_eq!(codes, vec![2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn malformed_argument_reports_arg_needed() {
        let err = SlotError::MalformedArgument("unsupported element type 'date'".into());
        assert_eq!(err.status(), Status::ArgNeeded);
    }

    #[test]
    fn not_found_message_names_the_segment() {
        let err = SlotError::NotFound {
            segment: "missing".into(),
            depth: 2,
        };
        assert_eq!(
            err.to_string(),
            "path segment 'missing' not found at depth 2"
        );
    }
}
