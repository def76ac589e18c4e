use vasc_core::models::criteria::Criteria;
use vasc_core::models::record::{SegmentMap, SegmentRecord};

use crate::ratio::apply_ratio;
use crate::stenosis::apply_stenosis;
use crate::vertebral::apply_vertebral;

/// Annotate one segment in place: ratio, then stenosis, then vertebral flow.
///
/// Every step writes (or clears) only its own derived fields, so running
/// again on the same inputs gives the same result.
pub fn calculate_segment(key: &str, record: &mut SegmentRecord, criteria: &Criteria) {
    apply_ratio(key, record);
    apply_stenosis(key, record, &criteria.stenosis_thresholds);
    apply_vertebral(key, record, &criteria.vertebral_rules);
}

/// Annotate every segment of a map in place. Segments are independent.
pub fn calculate_segments(segments: &mut SegmentMap, criteria: &Criteria) {
    for (key, record) in segments.iter_mut() {
        calculate_segment(key, record, criteria);
    }
    tracing::debug!(
        site = %criteria.site,
        version = %criteria.version,
        segments = segments.len(),
        "segments calculated"
    );
}
