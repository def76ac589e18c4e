use super::{DetailField, ExamProfile};
use vasc_core::models::exam::ExamType;

/// Carotid duplex. The one exam type the stenosis calculator grades.
pub struct CarotidProfile;

impl ExamProfile for CarotidProfile {
    fn exam_type(&self) -> ExamType {
        ExamType::Carotid
    }

    fn name(&self) -> &str {
        "Carotid Duplex"
    }

    fn detail_fields(&self) -> &[DetailField] {
        &[
            DetailField::Psv,
            DetailField::Edv,
            DetailField::PlaqueMorphology,
            DetailField::ArteryDiameter,
            DetailField::ApTr,
            DetailField::Longitudinal,
            DetailField::Waveform,
            DetailField::StenosisCategory,
            DetailField::Direction,
            DetailField::IcaCcaRatio,
        ]
    }

    fn supports_calculation(&self) -> bool {
        true
    }
}
