use serde::Deserialize;
use uuid::Uuid;
use vasc_audit::AuditEvent;
use vasc_core::models::exam::{Exam, ExamType};
use vasc_criteria::TemplateDir;
use vasc_storage::ExamStore;

use crate::error::PipelineError;

/// Patient and exam metadata for a new exam. Segments come from the
/// template for `exam_type` at `site` / `version`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewExam {
    pub exam_type: ExamType,
    pub site: String,
    pub version: String,
    pub patient_name: String,
    pub mrn: String,
    #[serde(default)]
    pub dob: Option<jiff::civil::Date>,
    #[serde(default)]
    pub accession: String,
    #[serde(default)]
    pub exam_date: Option<jiff::civil::Date>,
    #[serde(default)]
    pub exam_scope: String,
    #[serde(default)]
    pub exam_extent: String,
    #[serde(default)]
    pub technique: String,
    #[serde(default)]
    pub operative_history: String,
    #[serde(default)]
    pub indication_code: String,
    #[serde(default)]
    pub reading_physician: Option<String>,
}

/// Create and store an exam with one empty measurement per template segment.
///
/// The template is identity-checked before anything is written, and the
/// exam records the version it was created against so later calculation runs
/// fetch matching criteria.
pub async fn create_exam<S>(
    store: &S,
    templates: &TemplateDir,
    request: NewExam,
    created_by: &str,
) -> Result<Exam, PipelineError>
where
    S: ExamStore + ?Sized,
{
    let template = templates.load(request.exam_type, &request.site, &request.version)?;
    let now = jiff::Timestamp::now();

    let exam = Exam {
        id: Uuid::new_v4(),
        patient_name: request.patient_name,
        mrn: request.mrn,
        dob: request.dob,
        accession: request.accession,
        exam_date: request.exam_date,
        exam_type: request.exam_type,
        exam_scope: request.exam_scope,
        exam_extent: request.exam_extent,
        technique: request.technique,
        operative_history: request.operative_history,
        indication_code: request.indication_code,
        site: template.site,
        criteria_version: template.version,
        created_by: created_by.to_string(),
        reading_physician: request.reading_physician,
        segments: template.segments.iter().map(|s| s.instantiate()).collect(),
        created_at: now,
        updated_at: now,
    };

    store.save_exam(&exam).await?;
    AuditEvent::exam_created(
        exam.id,
        created_by,
        exam.exam_type.as_str(),
        &exam.site,
        &exam.criteria_version,
        exam.segments.len(),
    )
    .emit();
    tracing::info!(
        exam_id = %exam.id,
        exam_type = %exam.exam_type,
        segments = exam.segments.len(),
        "exam created"
    );

    Ok(exam)
}
