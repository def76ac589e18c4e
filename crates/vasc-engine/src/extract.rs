use std::collections::HashSet;

use vasc_core::models::exam::Exam;
use vasc_core::models::record::{SegmentMap, SegmentRecord};
use vasc_core::models::segment::Measurement;

/// Build the calculator's working map from a stored exam.
///
/// When a segment name repeats, the first occurrence wins even if it has no
/// measurement; this matches `Exam::segment`, which the write-back uses.
/// Segments without a measurement are left out. Values are copied as stored; coercion happens
/// in the calculator.
pub fn extract(exam: &Exam) -> SegmentMap {
    let mut segments = SegmentMap::new();
    let mut seen = HashSet::new();

    for segment in &exam.segments {
        if !seen.insert(segment.name.as_str()) {
            tracing::warn!(
                exam_id = %exam.id,
                segment = %segment.name,
                "duplicate segment name, keeping first occurrence"
            );
            continue;
        }

        let Some(measurement) = segment.primary_measurement() else {
            tracing::warn!(
                exam_id = %exam.id,
                segment = %segment.name,
                "segment has no measurement, skipping"
            );
            continue;
        };

        if segment.measurements.len() > 1 {
            tracing::debug!(
                exam_id = %exam.id,
                segment = %segment.name,
                count = segment.measurements.len(),
                "multiple measurements attached, using the first"
            );
        }

        segments.insert(segment.name.clone(), record_from_measurement(measurement));
    }

    tracing::debug!(exam_id = %exam.id, segments = segments.len(), "segments extracted");
    segments
}

/// Copy the raw inputs of one measurement. Derived fields start absent.
pub fn record_from_measurement(measurement: &Measurement) -> SegmentRecord {
    SegmentRecord {
        psv: measurement.psv.clone(),
        edv: measurement.edv.clone(),
        cca_psv: measurement.cca_psv.clone(),
        direction: measurement.direction.clone(),
        waveform: measurement.waveform.clone(),
        plaque_type: measurement.plaque_type.clone(),
        plaque: measurement.plaque_description.clone(),
        morphology: measurement.morphology.clone(),
        extra: measurement.additional_data.clone(),
        ..SegmentRecord::default()
    }
}
