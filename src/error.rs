use std::fmt;

/// Rejected input on a lifecycle operation. Distinguishable from storage
/// failures via `anyhow::Error::downcast_ref`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    DuplicateStudentId(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::DuplicateStudentId(code) => {
                write!(f, "student id '{}' is already registered", code)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A session with status=active already exists; at most one is allowed.
    AlreadyActive(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::AlreadyActive(id) => {
                write!(f, "session {} is still active", id)
            }
        }
    }
}

impl std::error::Error for SessionError {}
