use super::{DetailField, ExamProfile, ARTERIAL_FIELDS};
use vasc_core::models::exam::ExamType;

/// Exam types shown with the shared arterial field set. No calculator
/// criteria exist for these yet.
pub struct ArterialProfile {
    exam_type: ExamType,
    name: &'static str,
}

impl ArterialProfile {
    pub const fn new(exam_type: ExamType, name: &'static str) -> Self {
        Self { exam_type, name }
    }
}

impl ExamProfile for ArterialProfile {
    fn exam_type(&self) -> ExamType {
        self.exam_type
    }

    fn name(&self) -> &str {
        self.name
    }

    fn detail_fields(&self) -> &[DetailField] {
        ARTERIAL_FIELDS
    }
}
