use thiserror::Error;
use vasc_core::models::exam::ExamType;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("criteria error: {0}")]
    Criteria(#[from] vasc_criteria::CriteriaError),

    #[error("storage error: {0}")]
    Storage(#[from] vasc_storage::StorageError),

    #[error("exam type '{0}' does not support calculation")]
    UnsupportedExamType(ExamType),
}
