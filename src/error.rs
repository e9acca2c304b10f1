//! Error types for book store operations.
//!
//! Every error is terminal for the request that produced it: the store never
//! retries internally, and the caller decides how to reconcile.

use thiserror::Error;

use crate::book::Book;

/// Errors that can occur during book store operations.
#[derive(Debug, Error)]
pub enum BookError {
    /// No book is stored under the identifier.
    #[error("book not found: {0}")]
    NotFound(u64),

    /// The identifier is already occupied (create), or the requested status
    /// equals the current one (update). Carries the record as currently stored.
    #[error("conflict on book {id}: currently {}", .current.status)]
    Conflict { id: u64, current: Book },

    /// Malformed or invalid input. The message lists every problem found.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Wire encoding or decoding of a book failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for book store operations.
pub type Result<T> = std::result::Result<T, BookError>;

impl BookError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, BookError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, BookError::Conflict { .. })
    }

    pub fn is_bad_request(&self) -> bool {
        matches!(self, BookError::BadRequest(_))
    }

    /// The record carried by a `Conflict`, if this is one.
    pub fn conflicting_record(&self) -> Option<&Book> {
        match self {
            BookError::Conflict { current, .. } => Some(current),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for BookError {
    fn from(err: serde_json::Error) -> Self {
        BookError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::book::Status;

    #[test]
    fn test_error_display() {
        let err = BookError::NotFound(42);
        assert!(err.to_string().contains("book not found"));
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_conflict_display() {
        let mut current = Book::new();
        current.status = Status::CheckedOut;
        let err = BookError::Conflict { id: 7, current };
        assert!(err.to_string().contains("book 7"));
        assert!(err.to_string().contains("CheckedOut"));
    }

    #[test]
    fn test_conflicting_record() {
        let book = Book::new();
        let err = BookError::Conflict {
            id: 1,
            current: book.clone(),
        };
        assert!(err.is_conflict());
        assert_eq!(err.conflicting_record(), Some(&book));

        let err = BookError::BadRequest("nothing to do".to_string());
        assert!(err.is_bad_request());
        assert!(err.conflicting_record().is_none());
    }

    #[test]
    fn test_from_serde_json() {
        let err: BookError = serde_json::from_str::<Book>("{").unwrap_err().into();
        assert!(matches!(err, BookError::Serialization(_)));
    }
}
