//! Stenosis grading by PSV, with EDV and the ICA/CCA ratio as tie-breakers.
//!
//! Bands are tried in order, lowest first, and the first match wins. The
//! ruleset is trusted to be contiguous; a PSV that falls between two bands
//! produces no category.

use rust_decimal::Decimal;
use vasc_core::models::criteria::StenosisThresholds;
use vasc_core::models::record::SegmentRecord;
use vasc_core::models::stenosis::StenosisCategory;
use vasc_core::numeric::coerce;

const EDV_UNCONFIRMED_60_79: &str = "Unable to confirm 60–79% due to missing or high EDV.";
const EDV_UNCONFIRMED_80_99: &str = "PSV suggests high-grade, but EDV does not confirm.";

/// A category and the notes explaining how it was reached.
#[derive(Debug, Clone, PartialEq)]
pub struct StenosisFinding {
    pub category: StenosisCategory,
    pub notes: Vec<String>,
}

impl StenosisFinding {
    fn plain(category: StenosisCategory) -> Self {
        Self {
            category,
            notes: Vec::new(),
        }
    }

    fn noted(category: StenosisCategory, note: impl Into<String>) -> Self {
        Self {
            category,
            notes: vec![note.into()],
        }
    }

    /// Notes joined into the single text field stored on the segment.
    pub fn notes_text(&self) -> Option<String> {
        if self.notes.is_empty() {
            None
        } else {
            Some(self.notes.join(" "))
        }
    }
}

/// Grade one segment. `None` when PSV is absent or lies in a gap between
/// bands.
pub fn classify_stenosis(
    psv: Option<Decimal>,
    edv: Option<Decimal>,
    ratio: Option<Decimal>,
    thresholds: &StenosisThresholds,
) -> Option<StenosisFinding> {
    let psv = psv?;

    if psv <= thresholds.band_0_19.psv_max {
        return Some(StenosisFinding::plain(StenosisCategory::Minimal));
    }
    if thresholds.band_20_39.contains(psv) {
        return Some(StenosisFinding::plain(StenosisCategory::Mild));
    }
    if thresholds.band_40_59.contains(psv) {
        return Some(StenosisFinding::plain(StenosisCategory::Moderate));
    }

    let band = &thresholds.band_60_79;
    if band.contains(psv) {
        return Some(match edv {
            Some(edv) if edv <= band.edv_max => {
                let upgrade = thresholds.upgrade_if_ratio_gt;
                match ratio {
                    Some(ratio) if ratio > upgrade => StenosisFinding::noted(
                        StenosisCategory::SevereUpgraded,
                        format!(
                            "Ratio > {} suggests upgrade to ≥70% stenosis.",
                            upgrade.normalize()
                        ),
                    ),
                    _ => StenosisFinding::plain(StenosisCategory::Severe),
                }
            }
            _ => StenosisFinding::noted(StenosisCategory::UncertainEdv, EDV_UNCONFIRMED_60_79),
        });
    }

    let band = &thresholds.band_80_99;
    if psv >= band.psv_min {
        return Some(match edv {
            Some(edv) if edv >= band.edv_min => StenosisFinding::plain(StenosisCategory::Critical),
            _ => StenosisFinding::noted(StenosisCategory::UncertainHighPsv, EDV_UNCONFIRMED_80_99),
        });
    }

    None
}

/// Set or clear `stenosis_category` and `stenosis_notes` on a record. Reads
/// the ratio, so run after [`crate::ratio::apply_ratio`].
pub fn apply_stenosis(key: &str, record: &mut SegmentRecord, thresholds: &StenosisThresholds) {
    let psv = coerce(record.psv.as_ref());
    let edv = coerce(record.edv.as_ref());

    match classify_stenosis(psv, edv, record.ica_cca_ratio, thresholds) {
        Some(finding) => {
            tracing::debug!(
                segment = key,
                category = %finding.category,
                "stenosis classified"
            );
            record.stenosis_notes = finding.notes_text();
            record.stenosis_category = Some(finding.category);
        }
        None => {
            match psv {
                None => tracing::debug!(segment = key, psv = ?record.psv, "no numeric psv, not classified"),
                Some(psv) => tracing::debug!(segment = key, %psv, "psv matches no band, not classified"),
            }
            record.stenosis_category = None;
            record.stenosis_notes = None;
        }
    }
}
