use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::models::exam::Side;
use crate::models::stenosis::StenosisCategory;
use crate::numeric::RawValue;

/// A named anatomical vessel location within an exam, e.g. "prox_ica_right".
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Segment {
    pub name: String,
    /// Vessel, e.g. "ica", "cca", "vertebral".
    #[serde(default)]
    pub artery: String,
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
}

impl Segment {
    pub fn new(name: impl Into<String>, artery: impl Into<String>, side: Side) -> Self {
        Self {
            name: name.into(),
            artery: artery.into(),
            side,
            measurements: Vec::new(),
        }
    }

    pub fn with_measurement(mut self, measurement: Measurement) -> Self {
        self.measurements.push(measurement);
        self
    }

    /// The measurement record the calculator reads and writes.
    ///
    /// One measurement per segment is the modelled invariant. Storage layers
    /// that keep revisions may attach more than one; in that case the first
    /// in storage order is authoritative and the rest are ignored.
    pub fn primary_measurement(&self) -> Option<&Measurement> {
        self.measurements.first()
    }

    pub fn primary_measurement_mut(&mut self) -> Option<&mut Measurement> {
        self.measurements.first_mut()
    }
}

/// Clinical data collected for one segment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Measurement {
    pub id: Uuid,
    /// Peak systolic velocity, cm/s.
    #[serde(default)]
    pub psv: Option<RawValue>,
    /// End diastolic velocity, cm/s.
    #[serde(default)]
    pub edv: Option<RawValue>,
    /// CCA peak systolic velocity used as the ratio denominator.
    #[serde(default)]
    pub cca_psv: Option<RawValue>,
    /// e.g. antegrade, retrograde
    #[serde(default)]
    pub direction: Option<String>,
    /// e.g. triphasic, monophasic, bidirectional
    #[serde(default)]
    pub waveform: Option<String>,
    #[serde(default)]
    pub plaque_type: Option<String>,
    #[serde(default)]
    pub plaque_description: Option<String>,
    #[serde(default)]
    pub morphology: Option<String>,
    /// Attributes not modelled explicitly, e.g. aneurysm dimensions.
    #[serde(default)]
    pub additional_data: BTreeMap<String, RawValue>,
    /// Derived values written back by the persistence adapter.
    #[serde(default)]
    pub calculated_fields: Option<CalculatedFields>,
}

impl Measurement {
    /// An empty measurement with a fresh id.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            ..Self::default()
        }
    }
}

/// The derived subset of a segment record, persisted as one blob per
/// measurement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalculatedFields {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    #[ts(type = "number | null")]
    pub ica_cca_ratio: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(type = "string | null")]
    pub stenosis_category: Option<StenosisCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stenosis_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertebral_comment: Option<String>,
}

impl CalculatedFields {
    pub fn is_empty(&self) -> bool {
        self.ica_cca_ratio.is_none()
            && self.stenosis_category.is_none()
            && self.stenosis_notes.is_none()
            && self.vertebral_comment.is_none()
    }
}
