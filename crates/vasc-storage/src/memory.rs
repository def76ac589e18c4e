use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;
use vasc_core::models::exam::Exam;
use vasc_core::models::report::PreliminaryReport;
use vasc_core::models::segment::CalculatedFields;

use crate::error::StorageError;
use crate::store::{apply_calculated_fields, BoxFuture, ExamStore};

/// Exams held in process memory.
#[derive(Default)]
pub struct MemoryStore {
    exams: RwLock<HashMap<Uuid, Exam>>,
    reports: RwLock<HashMap<Uuid, PreliminaryReport>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with `exams`.
    pub fn with_exams(exams: impl IntoIterator<Item = Exam>) -> Self {
        let exams = exams.into_iter().map(|e| (e.id, e)).collect();
        Self {
            exams: RwLock::new(exams),
            reports: RwLock::default(),
        }
    }
}

impl ExamStore for MemoryStore {
    fn load_exam(&self, exam_id: Uuid) -> BoxFuture<'_, Result<Exam, StorageError>> {
        Box::pin(async move {
            self.exams
                .read()
                .await
                .get(&exam_id)
                .cloned()
                .ok_or(StorageError::ExamNotFound(exam_id))
        })
    }

    fn save_exam<'a>(&'a self, exam: &'a Exam) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.exams.write().await.insert(exam.id, exam.clone());
            Ok(())
        })
    }

    fn save_calculated_fields<'a>(
        &'a self,
        exam_id: Uuid,
        measurement_id: Uuid,
        fields: &'a CalculatedFields,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut exams = self.exams.write().await;
            let exam = exams
                .get_mut(&exam_id)
                .ok_or(StorageError::ExamNotFound(exam_id))?;
            apply_calculated_fields(exam, measurement_id, fields)
        })
    }

    fn load_preliminary_report(
        &self,
        exam_id: Uuid,
    ) -> BoxFuture<'_, Result<Option<PreliminaryReport>, StorageError>> {
        Box::pin(async move { Ok(self.reports.read().await.get(&exam_id).cloned()) })
    }

    fn save_preliminary_report<'a>(
        &'a self,
        report: &'a PreliminaryReport,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            self.reports
                .write()
                .await
                .insert(report.exam_id, report.clone());
            Ok(())
        })
    }
}
