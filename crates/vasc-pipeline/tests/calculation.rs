use std::path::PathBuf;

use rust_decimal::Decimal;
use serde_json::json;
use uuid::Uuid;
use vasc_core::models::exam::{Exam, Side};
use vasc_core::models::record::{SegmentMap, SegmentRecord};
use vasc_core::models::report::PreliminaryReport;
use vasc_core::models::segment::{Measurement, Segment};
use vasc_core::models::stenosis::StenosisCategory;
use vasc_core::numeric::RawValue;
use vasc_criteria::{CriteriaCache, CriteriaDir, CriteriaError, IdentityField};
use vasc_pipeline::{
    conclusion_for_exam, evaluate, run_calculation, PipelineError, ReportOutcome,
};
use vasc_storage::{ExamStore, MemoryStore, StorageError};

fn shipped_criteria() -> CriteriaCache<CriteriaDir> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../criteria");
    CriteriaCache::new(CriteriaDir::new(root))
}

fn measurement(psv: Option<i64>, edv: Option<i64>, cca_psv: Option<i64>) -> Measurement {
    Measurement {
        psv: psv.map(RawValue::from),
        edv: edv.map(RawValue::from),
        cca_psv: cca_psv.map(RawValue::from),
        ..Measurement::new()
    }
}

fn carotid_exam(exam_type: &str, site: &str) -> Exam {
    let mut exam: Exam = serde_json::from_value(json!({
        "id": Uuid::new_v4(),
        "patient_name": "Jane Doe",
        "mrn": "MRN-001",
        "accession": "ACC-001",
        "exam_type": exam_type,
        "site": site,
        "criteria_version": "1.0.0",
        "created_by": "tech",
        "created_at": "2026-01-05T14:00:00Z",
        "updated_at": "2026-01-05T14:00:00Z"
    }))
    .unwrap();

    let mut vertebral = Measurement::new();
    vertebral.direction = Some("Retrograde".into());

    exam.segments = vec![
        Segment::new("prox_ica_right", "ica", Side::Right)
            .with_measurement(measurement(Some(300), None, Some(100))),
        Segment::new("prox_ica_left", "ica", Side::Left)
            .with_measurement(measurement(Some(200), Some(90), Some(40))),
        Segment::new("vertebral_right", "vertebral", Side::Right).with_measurement(vertebral),
        Segment::new("dist_ica_right", "ica", Side::Right),
    ];
    exam
}

const EXPECTED_CONCLUSION: &str = "\
Prox Ica Right: Findings consistent with Uncertain (PSV high, EDV not confirmatory) stenosis.
Prox Ica Left: Findings consistent with ≥70% (ICA/CCA > 4) stenosis.
Vertebral Right: Retrograde vertebral flow is consistent with subclavian steal.";

#[tokio::test]
async fn full_run_annotates_persists_and_seeds_report() {
    let exam = carotid_exam("carotid", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([exam.clone()]);
    let criteria = shipped_criteria();

    let outcome = run_calculation(&store, &criteria, exam.id, "tech").await.unwrap();

    let segments = &outcome.evaluation.segments;
    assert_eq!(segments.len(), 3);
    assert!(!segments.contains_key("dist_ica_right"));
    let right = segments.get("prox_ica_right").unwrap();
    assert_eq!(right.ica_cca_ratio, Some(Decimal::from(3)));
    assert_eq!(
        right.stenosis_category,
        Some(StenosisCategory::UncertainHighPsv)
    );

    assert_eq!(outcome.evaluation.conclusion, EXPECTED_CONCLUSION);
    assert!(outcome.persisted.is_complete());
    assert_eq!(
        outcome.persisted.saved,
        ["prox_ica_right", "prox_ica_left", "vertebral_right"]
    );
    assert_eq!(outcome.report, ReportOutcome::Seeded);

    let stored = store.load_exam(exam.id).await.unwrap();
    let left = stored
        .segment("prox_ica_left")
        .and_then(|s| s.primary_measurement())
        .and_then(|m| m.calculated_fields.clone())
        .unwrap();
    assert_eq!(left.stenosis_category, Some(StenosisCategory::SevereUpgraded));
    assert_eq!(
        left.stenosis_notes.as_deref(),
        Some("Ratio > 4 suggests upgrade to ≥70% stenosis.")
    );

    let report = store.load_preliminary_report(exam.id).await.unwrap().unwrap();
    assert_eq!(report.text, EXPECTED_CONCLUSION);
    assert!(!report.edited);
}

#[tokio::test]
async fn duplicate_segment_without_measurement_reports_nothing_unsaved() {
    let mut exam = carotid_exam("carotid", "mount_sinai_gp1c");
    exam.segments = vec![
        Segment::new("prox_ica_right", "ica", Side::Right),
        Segment::new("prox_ica_right", "ica", Side::Right)
            .with_measurement(measurement(Some(300), Some(150), None)),
    ];
    let store = MemoryStore::with_exams([exam.clone()]);

    let outcome = run_calculation(&store, &shipped_criteria(), exam.id, "tech")
        .await
        .unwrap();

    assert!(outcome.evaluation.segments.is_empty());
    assert!(outcome.persisted.is_complete());
    assert!(outcome.persisted.saved.is_empty());
    assert_eq!(
        outcome.evaluation.conclusion,
        "No significant stenosis or vertebral abnormalities identified."
    );
    let report = store.load_preliminary_report(exam.id).await.unwrap().unwrap();
    assert_eq!(report.text, outcome.evaluation.conclusion);
}

#[tokio::test]
async fn rerun_refreshes_unedited_report() {
    let exam = carotid_exam("carotid", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([exam.clone()]);
    let old = PreliminaryReport::seeded(exam.id, "stale".into(), jiff::Timestamp::UNIX_EPOCH);
    store.save_preliminary_report(&old).await.unwrap();

    let outcome = run_calculation(&store, &shipped_criteria(), exam.id, "tech")
        .await
        .unwrap();
    assert_eq!(outcome.report, ReportOutcome::Seeded);

    let report = store.load_preliminary_report(exam.id).await.unwrap().unwrap();
    assert_eq!(report.text, EXPECTED_CONCLUSION);
    assert_eq!(report.created_at, jiff::Timestamp::UNIX_EPOCH);
    assert!(report.updated_at > jiff::Timestamp::UNIX_EPOCH);
}

#[tokio::test]
async fn edited_report_is_never_overwritten() {
    let exam = carotid_exam("carotid", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([exam.clone()]);
    let mut edited = PreliminaryReport::seeded(
        exam.id,
        "Reviewed by technologist.".into(),
        jiff::Timestamp::UNIX_EPOCH,
    );
    edited.edited = true;
    store.save_preliminary_report(&edited).await.unwrap();

    let outcome = run_calculation(&store, &shipped_criteria(), exam.id, "tech")
        .await
        .unwrap();
    assert_eq!(outcome.report, ReportOutcome::Preserved);
    assert_eq!(
        store.load_preliminary_report(exam.id).await.unwrap(),
        Some(edited)
    );
}

#[tokio::test]
async fn wrong_site_aborts_before_any_write() {
    let exam = carotid_exam("carotid", "other_site");
    let store = MemoryStore::with_exams([exam.clone()]);

    let err = run_calculation(&store, &shipped_criteria(), exam.id, "tech")
        .await
        .unwrap_err();
    match err {
        PipelineError::Criteria(CriteriaError::IdentityMismatch {
            field,
            expected,
            found,
        }) => {
            assert_eq!(field, IdentityField::Site);
            assert_eq!(expected, "other_site");
            assert_eq!(found.as_deref(), Some("mount_sinai_gp1c"));
        }
        other => panic!("expected identity mismatch, got {other:?}"),
    }

    let stored = store.load_exam(exam.id).await.unwrap();
    assert!(stored
        .segments
        .iter()
        .flat_map(|s| &s.measurements)
        .all(|m| m.calculated_fields.is_none()));
    assert_eq!(store.load_preliminary_report(exam.id).await.unwrap(), None);
}

#[tokio::test]
async fn missing_criteria_document_is_fatal() {
    let exam = carotid_exam("carotid", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([exam.clone()]);
    let empty = tempfile::tempdir().unwrap();
    let criteria = CriteriaCache::new(CriteriaDir::new(empty.path()));

    let err = run_calculation(&store, &criteria, exam.id, "tech")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Criteria(CriteriaError::NotFound { .. })
    ));
}

#[tokio::test]
async fn exam_types_without_calculator_are_rejected() {
    let exam = carotid_exam("renal", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([exam.clone()]);

    let err = run_calculation(&store, &shipped_criteria(), exam.id, "tech")
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnsupportedExamType(_)));
    assert_eq!(err.to_string(), "exam type 'renal' does not support calculation");
}

#[tokio::test]
async fn unknown_exam_is_a_storage_error() {
    let store = MemoryStore::new();
    let err = run_calculation(&store, &shipped_criteria(), Uuid::new_v4(), "tech")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Storage(StorageError::ExamNotFound(_))
    ));
}

#[tokio::test]
async fn conclusion_for_exam_writes_nothing() {
    let exam = carotid_exam("carotid", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([exam.clone()]);

    let conclusion = conclusion_for_exam(&store, &shipped_criteria(), exam.id)
        .await
        .unwrap();
    assert_eq!(conclusion, EXPECTED_CONCLUSION);

    let stored = store.load_exam(exam.id).await.unwrap();
    assert!(stored.segments[0].measurements[0].calculated_fields.is_none());
    assert_eq!(store.load_preliminary_report(exam.id).await.unwrap(), None);
}

#[tokio::test]
async fn criteria_are_loaded_once_across_runs() {
    let first = carotid_exam("carotid", "mount_sinai_gp1c");
    let second = carotid_exam("carotid", "mount_sinai_gp1c");
    let store = MemoryStore::with_exams([first.clone(), second.clone()]);
    let criteria = shipped_criteria();

    run_calculation(&store, &criteria, first.id, "tech").await.unwrap();
    run_calculation(&store, &criteria, second.id, "tech").await.unwrap();
    assert_eq!(criteria.len(), 1);
}

#[test]
fn evaluate_without_findings_gives_fallback() {
    let criteria = shipped_criteria()
        .get(
            vasc_core::models::exam::ExamType::Carotid,
            "mount_sinai_gp1c",
            "1.0.0",
        )
        .unwrap();
    let segments: SegmentMap = [
        ("mid_cca_right", SegmentRecord::default().with_cca_psv(90)),
        ("prox_ica_right", SegmentRecord::default().with_psv("n/a")),
    ]
    .into_iter()
    .collect();

    let evaluation = evaluate(segments, &criteria);
    assert_eq!(
        evaluation.conclusion,
        "No significant stenosis or vertebral abnormalities identified."
    );
}
