use vasc_core::models::exam::Exam;
use vasc_core::models::record::SegmentMap;

use crate::error::StorageError;
use crate::store::ExamStore;

/// A segment whose calculated fields could not be written.
#[derive(Debug)]
pub struct PersistFailure {
    pub segment: String,
    pub error: StorageError,
}

/// Outcome of a write-back. Partial success is a normal result.
#[derive(Debug, Default)]
pub struct PersistReport {
    pub saved: Vec<String>,
    pub failed: Vec<PersistFailure>,
}

impl PersistReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Write each segment's derived fields onto its measurement's calculated
/// fields blob, one write per segment.
///
/// A segment that cannot be located or saved is logged and recorded in the
/// report; the remaining segments are still written. Failed writes are not
/// retried.
pub async fn persist<S>(store: &S, exam: &Exam, segments: &SegmentMap) -> PersistReport
where
    S: ExamStore + ?Sized,
{
    let mut report = PersistReport::default();

    for (key, record) in segments.iter() {
        let result = match locate(exam, key) {
            Ok(measurement_id) => {
                store
                    .save_calculated_fields(exam.id, measurement_id, &record.calculated_fields())
                    .await
            }
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::debug!(exam_id = %exam.id, segment = key, "calculated fields saved");
                report.saved.push(key.to_string());
            }
            Err(error) => {
                tracing::error!(
                    exam_id = %exam.id,
                    segment = key,
                    error = %error,
                    "failed to save calculated fields"
                );
                report.failed.push(PersistFailure {
                    segment: key.to_string(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        exam_id = %exam.id,
        saved = report.saved.len(),
        failed = report.failed.len(),
        "calculated fields persisted"
    );
    report
}

fn locate(exam: &Exam, key: &str) -> Result<uuid::Uuid, StorageError> {
    let segment = exam
        .segment(key)
        .ok_or_else(|| StorageError::SegmentNotFound {
            exam_id: exam.id,
            segment: key.to_string(),
        })?;
    segment
        .primary_measurement()
        .map(|m| m.id)
        .ok_or_else(|| StorageError::MeasurementMissing {
            exam_id: exam.id,
            segment: key.to_string(),
        })
}
