use std::future::Future;
use std::pin::Pin;

use uuid::Uuid;
use vasc_core::models::exam::Exam;
use vasc_core::models::report::PreliminaryReport;
use vasc_core::models::segment::CalculatedFields;

use crate::error::StorageError;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Durable exam storage.
pub trait ExamStore: Send + Sync {
    fn load_exam(&self, exam_id: Uuid) -> BoxFuture<'_, Result<Exam, StorageError>>;

    /// Create or replace an exam.
    fn save_exam<'a>(&'a self, exam: &'a Exam) -> BoxFuture<'a, Result<(), StorageError>>;

    /// Overwrite the calculated-fields blob of one measurement. Nothing else
    /// on the exam changes.
    fn save_calculated_fields<'a>(
        &'a self,
        exam_id: Uuid,
        measurement_id: Uuid,
        fields: &'a CalculatedFields,
    ) -> BoxFuture<'a, Result<(), StorageError>>;

    /// None = no report yet.
    fn load_preliminary_report(
        &self,
        exam_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<PreliminaryReport>, StorageError>>;

    fn save_preliminary_report<'a>(
        &'a self,
        report: &'a PreliminaryReport,
    ) -> BoxFuture<'a, Result<(), StorageError>>;
}

/// Write `fields` onto the measurement with `measurement_id`.
pub(crate) fn apply_calculated_fields(
    exam: &mut Exam,
    measurement_id: Uuid,
    fields: &CalculatedFields,
) -> Result<(), StorageError> {
    let measurement = exam
        .segments
        .iter_mut()
        .flat_map(|s| s.measurements.iter_mut())
        .find(|m| m.id == measurement_id)
        .ok_or(StorageError::MeasurementNotFound {
            exam_id: exam.id,
            measurement_id,
        })?;
    measurement.calculated_fields = Some(fields.clone());
    Ok(())
}
