//! Shape of a site/version-scoped criteria document.
//!
//! ```json
//! {
//!   "site": "mount_sinai_gp1c",
//!   "version": "1.0.0",
//!   "stenosis_thresholds": {
//!     "0_19":  { "psv_max": 104 },
//!     "20_39": { "psv_min": 105, "psv_max": 109 },
//!     "40_59": { "psv_min": 110, "psv_max": 179 },
//!     "60_79": { "psv_min": 180, "psv_max": 240, "edv_max": 134 },
//!     "80_99": { "psv_min": 241, "edv_min": 135 },
//!     "upgrade_if_ratio_gt": 4
//!   },
//!   "vertebral_rules": {
//!     "steal_direction": "retrograde",
//!     "pre_steal_waveforms": ["bidirectional", "early_systolic_deceleration"]
//!   }
//! }
//! ```
//!
//! Each band carries only the bounds the classifier reads; a document missing
//! one of them does not decode.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::numeric::exact;

/// An immutable clinical ruleset. Never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    pub site: String,
    pub version: String,
    pub stenosis_thresholds: StenosisThresholds,
    #[serde(default)]
    pub vertebral_rules: VertebralRules,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StenosisThresholds {
    #[serde(rename = "0_19")]
    pub band_0_19: PsvCeiling,
    #[serde(rename = "20_39")]
    pub band_20_39: PsvRange,
    #[serde(rename = "40_59")]
    pub band_40_59: PsvRange,
    #[serde(rename = "60_79")]
    pub band_60_79: EdvCappedRange,
    #[serde(rename = "80_99")]
    pub band_80_99: EdvConfirmedFloor,
    /// ICA/CCA ratio above which a 60–79% finding is upgraded.
    #[serde(with = "exact")]
    pub upgrade_if_ratio_gt: Decimal,
}

/// Lowest band: everything at or below `psv_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsvCeiling {
    #[serde(with = "exact")]
    pub psv_max: Decimal,
}

/// Inclusive PSV range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PsvRange {
    #[serde(with = "exact")]
    pub psv_min: Decimal,
    #[serde(with = "exact")]
    pub psv_max: Decimal,
}

impl PsvRange {
    pub fn contains(&self, psv: Decimal) -> bool {
        self.psv_min <= psv && psv <= self.psv_max
    }
}

/// Inclusive PSV range whose finding holds only when EDV is at or below
/// `edv_max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdvCappedRange {
    #[serde(with = "exact")]
    pub psv_min: Decimal,
    #[serde(with = "exact")]
    pub psv_max: Decimal,
    #[serde(with = "exact")]
    pub edv_max: Decimal,
}

impl EdvCappedRange {
    pub fn contains(&self, psv: Decimal) -> bool {
        self.psv_min <= psv && psv <= self.psv_max
    }
}

/// Open-ended top band confirmed by EDV at or above `edv_min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdvConfirmedFloor {
    #[serde(with = "exact")]
    pub psv_min: Decimal,
    #[serde(with = "exact")]
    pub edv_min: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertebralRules {
    /// Flow direction that indicates subclavian steal.
    #[serde(default = "default_steal_direction")]
    pub steal_direction: String,
    /// Waveforms that indicate pre-steal physiology.
    #[serde(default)]
    pub pre_steal_waveforms: Vec<String>,
}

fn default_steal_direction() -> String {
    "retrograde".to_string()
}

impl Default for VertebralRules {
    fn default() -> Self {
        Self {
            steal_direction: default_steal_direction(),
            pre_steal_waveforms: Vec::new(),
        }
    }
}
