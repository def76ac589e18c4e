//! Segment templates: the list of segments a new exam starts with.
//!
//! ```json
//! {
//!   "site": "mount_sinai_gp1c",
//!   "version": "1.0.0",
//!   "segments": [
//!     { "id": "prox_ica_right", "label": "Proximal ICA", "vessel": "ICA", "side": "right" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::models::exam::Side;
use crate::models::segment::{Measurement, Segment};

/// A site/version-scoped exam template. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExamTemplate {
    pub site: String,
    pub version: String,
    pub segments: Vec<SegmentTemplate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTemplate {
    /// Segment key, e.g. "prox_ica_right".
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// e.g. "ICA", "CCA", "Vertebral"
    pub vessel: String,
    #[serde(default)]
    pub side: Side,
}

impl SegmentTemplate {
    /// A stored segment with one empty measurement, ready for data entry.
    pub fn instantiate(&self) -> Segment {
        Segment::new(&self.id, self.vessel.to_lowercase(), self.side)
            .with_measurement(Measurement::new())
    }
}
