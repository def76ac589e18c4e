use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;
use vasc_audit::AuditEvent;
use vasc_core::models::criteria::Criteria;
use vasc_core::models::exam::Exam;
use vasc_core::models::record::SegmentMap;
use vasc_core::models::report::PreliminaryReport;
use vasc_criteria::{CriteriaCache, CriteriaSource};
use vasc_storage::{persist, ExamStore, PersistReport};

use crate::error::PipelineError;

/// Annotated segments and the conclusion drawn from them.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub segments: SegmentMap,
    pub conclusion: String,
}

/// What happened to the exam's preliminary report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// Created or refreshed from the new conclusion.
    Seeded,
    /// Already edited by a technologist; left untouched.
    Preserved,
}

#[derive(Debug)]
pub struct CalculationOutcome {
    pub exam_id: Uuid,
    pub evaluation: Evaluation,
    pub persisted: PersistReport,
    pub report: ReportOutcome,
}

/// Calculate and conclude over a segment map. No storage involved.
pub fn evaluate(mut segments: SegmentMap, criteria: &Criteria) -> Evaluation {
    vasc_engine::calculate_segments(&mut segments, criteria);
    let conclusion = vasc_report::generate(&segments);
    Evaluation {
        segments,
        conclusion,
    }
}

/// Full calculation run for one stored exam.
///
/// Criteria problems abort the run before anything is written. Per-segment
/// write failures do not; they are listed in `persisted`.
pub async fn run_calculation<S, C>(
    store: &S,
    criteria: &CriteriaCache<C>,
    exam_id: Uuid,
    actor: &str,
) -> Result<CalculationOutcome, PipelineError>
where
    S: ExamStore + ?Sized,
    C: CriteriaSource,
{
    let exam = store.load_exam(exam_id).await?;
    tracing::info!(
        exam_id = %exam.id,
        exam_type = %exam.exam_type,
        site = %exam.site,
        version = %exam.criteria_version,
        "starting calculation"
    );
    AuditEvent::calculation_started(exam.id, actor, &exam.site, &exam.criteria_version).emit();

    let criteria = match prepare(&exam, criteria) {
        Ok(criteria) => criteria,
        Err(e) => {
            AuditEvent::calculation_failed(exam_id, actor, &e.to_string()).emit();
            return Err(e);
        }
    };

    let evaluation = evaluate(vasc_engine::extract(&exam), &criteria);

    let persisted = persist(store, &exam, &evaluation.segments).await;
    for key in &persisted.saved {
        let fields = evaluation
            .segments
            .get(key)
            .and_then(|r| serde_json::to_value(r.calculated_fields()).ok())
            .unwrap_or_default();
        AuditEvent::fields_saved(exam.id, key, actor, fields).emit();
    }
    for failure in &persisted.failed {
        AuditEvent::fields_failed(exam.id, &failure.segment, actor, &failure.error.to_string())
            .emit();
    }

    let report = seed_report(store, exam.id, &evaluation.conclusion, actor).await?;

    AuditEvent::calculation_completed(
        exam.id,
        actor,
        evaluation.segments.len(),
        persisted.failed.len(),
    )
    .emit();
    tracing::info!(
        exam_id = %exam.id,
        segments = evaluation.segments.len(),
        saved = persisted.saved.len(),
        failed = persisted.failed.len(),
        "calculation complete"
    );

    Ok(CalculationOutcome {
        exam_id: exam.id,
        evaluation,
        persisted,
        report,
    })
}

/// Conclusion for a stored exam, derived from its raw inputs. Nothing is
/// written.
pub async fn conclusion_for_exam<S, C>(
    store: &S,
    criteria: &CriteriaCache<C>,
    exam_id: Uuid,
) -> Result<String, PipelineError>
where
    S: ExamStore + ?Sized,
    C: CriteriaSource,
{
    let exam = store.load_exam(exam_id).await?;
    let criteria = prepare(&exam, criteria)?;
    Ok(evaluate(vasc_engine::extract(&exam), &criteria).conclusion)
}

/// Check the exam type is calculable and fetch its criteria.
fn prepare<C: CriteriaSource>(
    exam: &Exam,
    cache: &CriteriaCache<C>,
) -> Result<Arc<Criteria>, PipelineError> {
    let calculable = vasc_engine::get_profile(exam.exam_type)
        .is_some_and(|profile| profile.supports_calculation());
    if !calculable {
        return Err(PipelineError::UnsupportedExamType(exam.exam_type));
    }

    Ok(cache.get(exam.exam_type, &exam.site, &exam.criteria_version)?)
}

async fn seed_report<S>(
    store: &S,
    exam_id: Uuid,
    conclusion: &str,
    actor: &str,
) -> Result<ReportOutcome, PipelineError>
where
    S: ExamStore + ?Sized,
{
    let now = jiff::Timestamp::now();
    let report = match store.load_preliminary_report(exam_id).await? {
        Some(existing) if existing.edited => {
            tracing::info!(exam_id = %exam_id, "preliminary report edited, not overwriting");
            AuditEvent::report_preserved(exam_id, actor).emit();
            return Ok(ReportOutcome::Preserved);
        }
        Some(existing) => PreliminaryReport {
            text: conclusion.to_string(),
            updated_at: now,
            ..existing
        },
        None => PreliminaryReport::seeded(exam_id, conclusion.to_string(), now),
    };

    store.save_preliminary_report(&report).await?;
    AuditEvent::report_seeded(exam_id, actor).emit();
    Ok(ReportOutcome::Seeded)
}
