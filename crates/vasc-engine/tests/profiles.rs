use rust_decimal::Decimal;
use serde_json::json;
use vasc_core::models::exam::{Exam, ExamType, Side};
use vasc_core::models::segment::{CalculatedFields, Measurement, Segment};
use vasc_core::models::stenosis::StenosisCategory;
use vasc_core::numeric::RawValue;
use vasc_engine::{all_profiles, get_profile};

fn exam(exam_type: &str) -> Exam {
    serde_json::from_value(json!({
        "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
        "patient_name": "Jane Doe",
        "mrn": "MRN-001",
        "accession": "ACC-001",
        "exam_type": exam_type,
        "site": "mount_sinai_gp1c",
        "criteria_version": "1.0.0",
        "created_by": "tech",
        "created_at": "2026-01-05T14:00:00Z",
        "updated_at": "2026-01-05T14:00:00Z"
    }))
    .unwrap()
}

fn annotated_measurement() -> Measurement {
    let mut m = Measurement::new();
    m.psv = Some(RawValue::from(200));
    m.edv = Some(RawValue::from(90));
    m.direction = Some("antegrade".into());
    m.morphology = Some("smooth".into());
    m.additional_data
        .insert("artery_diameter".into(), RawValue::from(5.5));
    m.calculated_fields = Some(CalculatedFields {
        ica_cca_ratio: Some(Decimal::new(500, 2)),
        stenosis_category: Some(StenosisCategory::SevereUpgraded),
        ..CalculatedFields::default()
    });
    m
}

#[test]
fn every_exam_type_has_one_profile() {
    let profiles = all_profiles();
    assert_eq!(profiles.len(), ExamType::ALL.len());
    for exam_type in ExamType::ALL {
        assert_eq!(get_profile(exam_type).unwrap().exam_type(), exam_type);
    }
}

#[test]
fn only_carotid_is_calculated() {
    for profile in all_profiles() {
        assert_eq!(
            profile.supports_calculation(),
            profile.exam_type() == ExamType::Carotid,
            "{}",
            profile.name()
        );
    }
}

#[test]
fn carotid_view_includes_direction_and_ratio() {
    let mut exam = exam("carotid");
    exam.segments.push(
        Segment::new("prox_ica_right", "ica", Side::Right).with_measurement(annotated_measurement()),
    );

    let view = get_profile(ExamType::Carotid).unwrap().describe(&exam);
    assert_eq!(view.summary.segment_count, 1);
    assert_eq!(view.summary.mrn, "MRN-001");

    let details = &view.segments[0].details;
    assert_eq!(details["psv"], json!(200));
    assert_eq!(details["edv"], json!(90));
    assert_eq!(details["direction"], json!("antegrade"));
    assert_eq!(details["plaque_morphology"], json!("smooth"));
    assert_eq!(details["artery_diameter"], json!(5.5));
    assert_eq!(details["ica_cca_ratio"], json!(5.0));
    assert_eq!(details["stenosis_category"], json!("≥70% (ICA/CCA > 4)"));
    assert!(!details.contains_key("waveform"));
}

#[test]
fn arterial_view_omits_carotid_fields() {
    let mut exam = exam("renal");
    exam.segments.push(
        Segment::new("renal_artery_right", "renal", Side::Right)
            .with_measurement(annotated_measurement()),
    );

    let view = get_profile(ExamType::Renal).unwrap().describe(&exam);
    let details = &view.segments[0].details;
    assert!(details.contains_key("psv"));
    assert!(details.contains_key("stenosis_category"));
    assert!(!details.contains_key("direction"));
    assert!(!details.contains_key("ica_cca_ratio"));
}

#[test]
fn segment_without_measurement_has_empty_detail() {
    let mut exam = exam("aorta");
    exam.segments
        .push(Segment::new("prox_aorta", "aorta", Side::NotApplicable));

    let view = get_profile(ExamType::Aorta).unwrap().describe(&exam);
    assert_eq!(view.segments.len(), 1);
    assert!(view.segments[0].details.is_empty());
}
