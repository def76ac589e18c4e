use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("exam not found: {0}")]
    ExamNotFound(Uuid),

    #[error("segment '{segment}' not found in exam {exam_id}")]
    SegmentNotFound { exam_id: Uuid, segment: String },

    #[error("segment '{segment}' in exam {exam_id} has no measurement")]
    MeasurementMissing { exam_id: Uuid, segment: String },

    #[error("measurement {measurement_id} not found in exam {exam_id}")]
    MeasurementNotFound { exam_id: Uuid, measurement_id: Uuid },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
