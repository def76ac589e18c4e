use std::path::PathBuf;

use vasc_core::models::exam::{ExamType, Side};
use vasc_core::models::stenosis::StenosisCategory;
use vasc_core::numeric::RawValue;
use vasc_criteria::{CriteriaCache, CriteriaDir, CriteriaError, TemplateDir};
use vasc_pipeline::{create_exam, run_calculation, NewExam, PipelineError};
use vasc_storage::{ExamStore, FileStore};

fn repo_dir(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../..").join(name)
}

fn request(site: &str) -> NewExam {
    NewExam {
        exam_type: ExamType::Carotid,
        site: site.to_string(),
        version: "1.0.0".to_string(),
        patient_name: "Jane Doe".to_string(),
        mrn: "MRN-001".to_string(),
        dob: Some(jiff::civil::date(1950, 3, 14)),
        accession: "ACC-001".to_string(),
        exam_date: None,
        exam_scope: "bilateral".to_string(),
        exam_extent: "complete".to_string(),
        technique: String::new(),
        operative_history: String::new(),
        indication_code: "I65.23".to_string(),
        reading_physician: None,
    }
}

#[tokio::test]
async fn created_exam_round_trips_through_file_store() {
    let data = tempfile::tempdir().unwrap();
    let store = FileStore::new(data.path());
    let templates = TemplateDir::new(repo_dir("templates"));

    let exam = create_exam(&store, &templates, request("mount_sinai_gp1c"), "tech")
        .await
        .unwrap();

    assert_eq!(exam.segments.len(), 20);
    assert_eq!(exam.created_by, "tech");
    assert_eq!(exam.criteria_version, "1.0.0");
    assert!(exam.segments.iter().all(|s| s.measurements.len() == 1));

    let stored = store.load_exam(exam.id).await.unwrap();
    assert_eq!(store.list_exam_ids().await.unwrap(), [exam.id]);
    assert_eq!(stored.patient_name, "Jane Doe");
    assert_eq!(stored.dob, Some(jiff::civil::date(1950, 3, 14)));
    let ica = stored.segment("prox_ica_right").unwrap();
    assert_eq!(ica.artery, "ica");
    assert_eq!(ica.side, Side::Right);
    assert_eq!(
        ica.primary_measurement().map(|m| m.id),
        exam.segment("prox_ica_right")
            .and_then(|s| s.primary_measurement())
            .map(|m| m.id)
    );
}

#[tokio::test]
async fn created_exam_runs_through_calculation() {
    let data = tempfile::tempdir().unwrap();
    let store = FileStore::new(data.path());
    let templates = TemplateDir::new(repo_dir("templates"));
    let criteria = CriteriaCache::new(CriteriaDir::new(repo_dir("criteria")));

    let created = create_exam(&store, &templates, request("mount_sinai_gp1c"), "tech")
        .await
        .unwrap();

    let mut exam = store.load_exam(created.id).await.unwrap();
    let measurement = exam
        .segment_mut("prox_ica_right")
        .and_then(|s| s.primary_measurement_mut())
        .unwrap();
    measurement.psv = Some(RawValue::from(300));
    measurement.edv = Some(RawValue::from(150));
    store.save_exam(&exam).await.unwrap();

    let outcome = run_calculation(&store, &criteria, created.id, "tech")
        .await
        .unwrap();

    assert!(outcome.persisted.is_complete());
    assert_eq!(outcome.persisted.saved.len(), 20);
    assert_eq!(
        outcome.evaluation.conclusion,
        "Prox Ica Right: Findings consistent with 80–99% stenosis.\n\
         Vertebral Right: Normal vertebral flow pattern.\n\
         Vertebral Left: Normal vertebral flow pattern."
    );

    let stored = store.load_exam(created.id).await.unwrap();
    let fields = stored
        .segment("prox_ica_right")
        .and_then(|s| s.primary_measurement())
        .and_then(|m| m.calculated_fields.clone())
        .unwrap();
    assert_eq!(fields.stenosis_category, Some(StenosisCategory::Critical));
}

#[tokio::test]
async fn template_for_another_site_stores_nothing() {
    let data = tempfile::tempdir().unwrap();
    let store = FileStore::new(data.path());
    let templates = TemplateDir::new(repo_dir("templates"));

    let err = create_exam(&store, &templates, request("other_site"), "tech")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Criteria(CriteriaError::IdentityMismatch { .. })
    ));
    assert!(store.list_exam_ids().await.unwrap().is_empty());
}

#[tokio::test]
async fn exam_type_without_template_is_rejected() {
    let data = tempfile::tempdir().unwrap();
    let store = FileStore::new(data.path());
    let templates = TemplateDir::new(repo_dir("templates"));

    let mut renal = request("mount_sinai_gp1c");
    renal.exam_type = ExamType::Renal;
    let err = create_exam(&store, &templates, renal, "tech").await.unwrap_err();

    assert!(matches!(
        err,
        PipelineError::Criteria(CriteriaError::TemplateNotFound { .. })
    ));
}
