use serde_json::json;
use vasc_core::models::exam::{Exam, Side};
use vasc_core::models::segment::{Measurement, Segment};
use vasc_core::numeric::RawValue;
use vasc_engine::extract;

fn exam(segments: Vec<Segment>) -> Exam {
    let mut exam: Exam = serde_json::from_value(json!({
        "id": "6f9619ff-8b86-d011-b42d-00cf4fc964ff",
        "patient_name": "Jane Doe",
        "mrn": "MRN-001",
        "accession": "ACC-001",
        "exam_type": "carotid",
        "site": "mount_sinai_gp1c",
        "criteria_version": "1.0.0",
        "created_by": "tech",
        "created_at": "2026-01-05T14:00:00Z",
        "updated_at": "2026-01-05T14:00:00Z"
    }))
    .unwrap();
    exam.segments = segments;
    exam
}

fn measurement(psv: i64) -> Measurement {
    Measurement {
        psv: Some(RawValue::from(psv)),
        ..Measurement::new()
    }
}

#[test]
fn copies_raw_inputs_only() {
    let mut m = Measurement::new();
    m.psv = Some(RawValue::from("250"));
    m.edv = Some(RawValue::from(90));
    m.cca_psv = Some(RawValue::from(83.33));
    m.direction = Some("antegrade".into());
    m.waveform = Some("triphasic".into());
    m.plaque_type = Some("calcified".into());
    m.plaque_description = Some("irregular".into());
    m.morphology = Some("heterogeneous".into());
    m.additional_data
        .insert("artery_diameter".into(), RawValue::from(5.2));
    m.calculated_fields = Some(Default::default());

    let segments = extract(&exam(vec![
        Segment::new("prox_ica_right", "ica", Side::Right).with_measurement(m),
    ]));

    let record = segments.get("prox_ica_right").unwrap();
    assert_eq!(record.psv, Some(RawValue::from("250")));
    assert_eq!(record.edv, Some(RawValue::from(90)));
    assert_eq!(record.cca_psv, Some(RawValue::from(83.33)));
    assert_eq!(record.direction.as_deref(), Some("antegrade"));
    assert_eq!(record.waveform.as_deref(), Some("triphasic"));
    assert_eq!(record.plaque_type.as_deref(), Some("calcified"));
    assert_eq!(record.plaque.as_deref(), Some("irregular"));
    assert_eq!(record.morphology.as_deref(), Some("heterogeneous"));
    assert_eq!(record.extra.get("artery_diameter"), Some(&RawValue::from(5.2)));
    assert_eq!(record.ica_cca_ratio, None);
    assert_eq!(record.stenosis_category, None);
}

#[test]
fn missing_source_fields_stay_absent() {
    let segments = extract(&exam(vec![
        Segment::new("mid_cca_left", "cca", Side::Left).with_measurement(Measurement::new()),
    ]));
    let record = segments.get("mid_cca_left").unwrap();
    assert_eq!(record.psv, None);
    assert_eq!(record.direction, None);
    assert_eq!(serde_json::to_value(record).unwrap(), json!({}));
}

#[test]
fn segments_without_measurement_are_skipped() {
    let segments = extract(&exam(vec![
        Segment::new("prox_ica_right", "ica", Side::Right).with_measurement(measurement(120)),
        Segment::new("dist_ica_right", "ica", Side::Right),
    ]));
    assert_eq!(segments.len(), 1);
    assert!(!segments.contains_key("dist_ica_right"));
}

#[test]
fn first_measurement_is_used() {
    let segments = extract(&exam(vec![
        Segment::new("prox_ica_right", "ica", Side::Right)
            .with_measurement(measurement(120))
            .with_measurement(measurement(300)),
    ]));
    assert_eq!(
        segments.get("prox_ica_right").unwrap().psv,
        Some(RawValue::from(120))
    );
}

#[test]
fn duplicate_segment_names_keep_first() {
    let segments = extract(&exam(vec![
        Segment::new("prox_ica_right", "ica", Side::Right).with_measurement(measurement(120)),
        Segment::new("prox_ica_right", "ica", Side::Right).with_measurement(measurement(300)),
        Segment::new("prox_ica_left", "ica", Side::Left).with_measurement(measurement(90)),
    ]));
    assert_eq!(segments.len(), 2);
    assert_eq!(
        segments.get("prox_ica_right").unwrap().psv,
        Some(RawValue::from(120))
    );
    assert_eq!(
        segments.keys().collect::<Vec<_>>(),
        ["prox_ica_right", "prox_ica_left"]
    );
}

#[test]
fn duplicate_name_is_claimed_by_first_occurrence_without_measurement() {
    let segments = extract(&exam(vec![
        Segment::new("prox_ica_right", "ica", Side::Right),
        Segment::new("prox_ica_right", "ica", Side::Right).with_measurement(measurement(300)),
    ]));
    assert!(segments.is_empty());
}

#[test]
fn empty_exam_gives_empty_map() {
    assert!(extract(&exam(Vec::new())).is_empty());
}
