use rust_decimal::{Decimal, RoundingStrategy};
use vasc_core::models::record::SegmentRecord;
use vasc_core::numeric::{coerce, RawValue};

/// Decimal places kept on the ICA/CCA ratio.
pub const RATIO_SCALE: u32 = 2;

/// ICA/CCA peak systolic velocity ratio, rounded half-even to two places.
///
/// Absent or non-numeric inputs and a zero denominator all give `None`.
pub fn compute_ratio(psv: Option<&RawValue>, cca_psv: Option<&RawValue>) -> Option<Decimal> {
    let psv = coerce(psv)?;
    let cca_psv = coerce(cca_psv)?;
    psv.checked_div(cca_psv)
        .map(|ratio| ratio.round_dp_with_strategy(RATIO_SCALE, RoundingStrategy::MidpointNearestEven))
}

/// Set or clear `ica_cca_ratio` on a record.
pub fn apply_ratio(key: &str, record: &mut SegmentRecord) {
    record.ica_cca_ratio = compute_ratio(record.psv.as_ref(), record.cca_psv.as_ref());
    match record.ica_cca_ratio {
        Some(ratio) => tracing::debug!(segment = key, %ratio, "ratio computed"),
        None => tracing::debug!(
            segment = key,
            psv = ?record.psv,
            cca_psv = ?record.cca_psv,
            "ratio indeterminate"
        ),
    }
}
