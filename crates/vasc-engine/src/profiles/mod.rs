//! Per-exam-type profiles.
//!
//! Every exam shares one summary shape. What differs by exam type is which
//! measurement fields are shown for each segment and whether the calculator
//! applies, so each type gets a profile rather than its own exam model.

pub mod arterial;
pub mod carotid;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;
use vasc_core::models::exam::{Exam, ExamSummary, ExamType, Side};
use vasc_core::models::segment::Measurement;

pub use self::arterial::ArterialProfile;
pub use self::carotid::CarotidProfile;

/// A measurement field surfaced in segment detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum DetailField {
    Psv,
    Edv,
    Direction,
    Waveform,
    PlaqueMorphology,
    /// Aneurysm dimensions, held in the measurement's extension bag.
    ArteryDiameter,
    ApTr,
    Longitudinal,
    StenosisCategory,
    IcaCcaRatio,
}

impl DetailField {
    pub fn key(&self) -> &'static str {
        match self {
            DetailField::Psv => "psv",
            DetailField::Edv => "edv",
            DetailField::Direction => "direction",
            DetailField::Waveform => "waveform",
            DetailField::PlaqueMorphology => "plaque_morphology",
            DetailField::ArteryDiameter => "artery_diameter",
            DetailField::ApTr => "ap_tr",
            DetailField::Longitudinal => "longitudinal",
            DetailField::StenosisCategory => "stenosis_category",
            DetailField::IcaCcaRatio => "ica_cca_ratio",
        }
    }

    /// The field's value on a measurement, if recorded.
    pub fn read(&self, measurement: &Measurement) -> Option<Value> {
        let calculated = measurement.calculated_fields.as_ref();
        match self {
            DetailField::Psv => to_value(measurement.psv.as_ref()),
            DetailField::Edv => to_value(measurement.edv.as_ref()),
            DetailField::Direction => measurement.direction.clone().map(Value::String),
            DetailField::Waveform => measurement.waveform.clone().map(Value::String),
            DetailField::PlaqueMorphology => measurement.morphology.clone().map(Value::String),
            DetailField::ArteryDiameter | DetailField::ApTr | DetailField::Longitudinal => {
                to_value(measurement.additional_data.get(self.key()))
            }
            DetailField::StenosisCategory => calculated
                .and_then(|c| c.stenosis_category.as_ref())
                .map(|c| Value::String(c.to_string())),
            DetailField::IcaCcaRatio => calculated
                .and_then(|c| c.ica_cca_ratio)
                .and_then(|r| r.to_string().parse::<serde_json::Number>().ok())
                .map(Value::Number),
        }
    }
}

fn to_value<T: Serialize>(value: Option<&T>) -> Option<Value> {
    value.and_then(|v| serde_json::to_value(v).ok())
}

/// Fields every arterial exam surfaces.
pub const ARTERIAL_FIELDS: &[DetailField] = &[
    DetailField::Psv,
    DetailField::Edv,
    DetailField::PlaqueMorphology,
    DetailField::ArteryDiameter,
    DetailField::ApTr,
    DetailField::Longitudinal,
    DetailField::Waveform,
    DetailField::StenosisCategory,
];

/// One segment as shown for its exam type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SegmentView {
    pub name: String,
    pub artery: String,
    pub side: Side,
    /// Only fields the profile lists and the measurement carries.
    pub details: BTreeMap<String, Value>,
}

/// An exam as shown for its exam type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamView {
    pub summary: ExamSummary,
    pub segments: Vec<SegmentView>,
}

/// Trait implemented by each supported exam type.
pub trait ExamProfile: Send + Sync {
    fn exam_type(&self) -> ExamType;

    /// Human-readable name (e.g., "Carotid Duplex").
    fn name(&self) -> &str;

    /// Measurement fields shown per segment, in display order.
    fn detail_fields(&self) -> &[DetailField];

    /// Whether the stenosis calculator applies to this exam type.
    fn supports_calculation(&self) -> bool {
        false
    }

    /// Shared summary plus per-segment detail limited to this profile's
    /// fields. Segments without a measurement appear with empty detail.
    fn describe(&self, exam: &Exam) -> ExamView {
        let segments = exam
            .segments
            .iter()
            .map(|segment| {
                let details = segment
                    .primary_measurement()
                    .map(|m| {
                        self.detail_fields()
                            .iter()
                            .filter_map(|field| field.read(m).map(|v| (field.key().to_string(), v)))
                            .collect::<BTreeMap<_, _>>()
                    })
                    .unwrap_or_default();
                SegmentView {
                    name: segment.name.clone(),
                    artery: segment.artery.clone(),
                    side: segment.side,
                    details,
                }
            })
            .collect();

        ExamView {
            summary: exam.summary(),
            segments,
        }
    }
}

/// Return all registered profiles, one per exam type.
pub fn all_profiles() -> Vec<Box<dyn ExamProfile>> {
    vec![
        Box::new(CarotidProfile),
        Box::new(ArterialProfile::new(ExamType::Renal, "Renal Artery Duplex")),
        Box::new(ArterialProfile::new(ExamType::Ivc, "IVC Duplex")),
        Box::new(ArterialProfile::new(ExamType::Aorta, "Aortoiliac Duplex")),
        Box::new(ArterialProfile::new(ExamType::Mesenteric, "Mesenteric Duplex")),
        Box::new(ArterialProfile::new(ExamType::LeArterial, "Lower Extremity Arterial Duplex")),
        Box::new(ArterialProfile::new(ExamType::LeVenous, "Lower Extremity Venous Duplex")),
    ]
}

/// Look up the profile for an exam type.
pub fn get_profile(exam_type: ExamType) -> Option<Box<dyn ExamProfile>> {
    all_profiles().into_iter().find(|p| p.exam_type() == exam_type)
}
