use std::fmt;
use std::path::PathBuf;

use thiserror::Error;
use vasc_core::models::exam::ExamType;

/// Identity keys a criteria document must agree on with the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    Site,
    Version,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentityField::Site => f.write_str("site"),
            IdentityField::Version => f.write_str("version"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CriteriaError {
    #[error("criteria not found for exam type '{exam_type}' at {}", .path.display())]
    NotFound { exam_type: ExamType, path: PathBuf },

    #[error("segment template not found for exam type '{exam_type}' at {}", .path.display())]
    TemplateNotFound { exam_type: ExamType, path: PathBuf },

    #[error("criteria document {} is malformed: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error(
        "{field} mismatch: expected {expected}, found {}",
        .found.as_deref().unwrap_or("<none>")
    )]
    IdentityMismatch {
        field: IdentityField,
        expected: String,
        found: Option<String>,
    },

    #[error("failed to read criteria at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
