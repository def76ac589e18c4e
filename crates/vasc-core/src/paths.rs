//! Storage path conventions.
//!
//! Pure string functions. These define where criteria documents live under a
//! criteria root and how exams and reports are laid out under a data root.

use uuid::Uuid;

use crate::models::exam::ExamType;

/// Criteria document for an exam type, relative to the criteria root.
pub fn criteria_document(exam_type: ExamType) -> String {
    format!("{exam_type}/{exam_type}.json")
}

/// Segment template for an exam type, relative to the template root.
pub fn template_document(exam_type: ExamType) -> String {
    format!("{exam_type}/{exam_type}.json")
}

pub fn exam(id: Uuid) -> String {
    format!("exams/{id}.json")
}

pub const EXAMS_PREFIX: &str = "exams/";

pub fn preliminary_report(exam_id: Uuid) -> String {
    format!("reports/{exam_id}/preliminary.json")
}
