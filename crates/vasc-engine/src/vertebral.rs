use vasc_core::models::criteria::VertebralRules;
use vasc_core::models::record::SegmentRecord;

const STEAL: &str = "Retrograde vertebral flow is consistent with subclavian steal.";
const NORMAL: &str = "Normal vertebral flow pattern.";

/// Segment keys naming a vertebral artery, in any case.
pub fn is_vertebral(key: &str) -> bool {
    key.to_lowercase().contains("vertebral")
}

/// Flow interpretation for a vertebral segment. Always yields a comment.
pub fn interpret_vertebral(
    direction: Option<&str>,
    waveform: Option<&str>,
    rules: &VertebralRules,
) -> String {
    let direction = direction.unwrap_or_default().to_lowercase();
    let waveform = waveform.unwrap_or_default().to_lowercase();

    if direction == rules.steal_direction.to_lowercase() {
        return STEAL.to_string();
    }

    let pre_steal = rules
        .pre_steal_waveforms
        .iter()
        .any(|w| w.to_lowercase() == waveform);
    if pre_steal {
        return format!(
            "{} waveform pattern indicative of pre-steal physiology.",
            waveform_label(&waveform)
        );
    }

    NORMAL.to_string()
}

/// Set `vertebral_comment` on vertebral segments; others are left alone.
pub fn apply_vertebral(key: &str, record: &mut SegmentRecord, rules: &VertebralRules) {
    if !is_vertebral(key) {
        return;
    }
    let comment = interpret_vertebral(record.direction.as_deref(), record.waveform.as_deref(), rules);
    tracing::debug!(segment = key, comment = %comment, "vertebral flow interpreted");
    record.vertebral_comment = Some(comment);
}

/// "early_systolic_deceleration" → "Early systolic deceleration"
fn waveform_label(waveform: &str) -> String {
    let spaced = waveform.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
