use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Editable clinical summary seeded from the generated conclusion.
///
/// Once a technologist edits the text (`edited = true`) later calculation runs
/// leave it alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreliminaryReport {
    pub exam_id: Uuid,
    pub text: String,
    #[serde(default)]
    pub edited: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl PreliminaryReport {
    pub fn seeded(exam_id: Uuid, text: String, now: jiff::Timestamp) -> Self {
        Self {
            exam_id,
            text,
            edited: false,
            created_at: now,
            updated_at: now,
        }
    }
}
