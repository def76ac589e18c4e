use vasc_core::models::record::SegmentMap;

use crate::humanize::humanize_segment;

/// Conclusion used when no segment has a finding.
pub const NO_FINDINGS: &str = "No significant stenosis or vertebral abnormalities identified.";

/// Render the conclusion for an annotated segment map, one line per finding
/// in map order.
///
/// A segment contributes a stenosis line when it has a category and a
/// vertebral line when it has a comment, in that order. Empty labels and
/// comments count as absent.
pub fn generate(segments: &SegmentMap) -> String {
    let mut lines = Vec::new();

    for (key, record) in segments.iter() {
        let name = humanize_segment(key);
        if let Some(category) = record
            .stenosis_category
            .as_ref()
            .filter(|c| !c.label().is_empty())
        {
            lines.push(format!(
                "{name}: Findings consistent with {category} stenosis."
            ));
        }
        if let Some(comment) = record.vertebral_comment.as_deref().filter(|c| !c.is_empty()) {
            lines.push(format!("{name}: {comment}"));
        }
    }

    tracing::debug!(lines = lines.len(), segments = segments.len(), "conclusion generated");

    if lines.is_empty() {
        NO_FINDINGS.to_string()
    } else {
        lines.join("\n")
    }
}
