use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::segment::Segment;

/// The kinds of vascular exam the lab performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ExamType {
    Carotid,
    Renal,
    Ivc,
    Aorta,
    Mesenteric,
    LeArterial,
    LeVenous,
}

impl ExamType {
    pub const ALL: [ExamType; 7] = [
        ExamType::Carotid,
        ExamType::Renal,
        ExamType::Ivc,
        ExamType::Aorta,
        ExamType::Mesenteric,
        ExamType::LeArterial,
        ExamType::LeVenous,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExamType::Carotid => "carotid",
            ExamType::Renal => "renal",
            ExamType::Ivc => "ivc",
            ExamType::Aorta => "aorta",
            ExamType::Mesenteric => "mesenteric",
            ExamType::LeArterial => "le_arterial",
            ExamType::LeVenous => "le_venous",
        }
    }

    /// Display label, e.g. "LE Arterial".
    pub fn label(&self) -> &'static str {
        match self {
            ExamType::Carotid => "Carotid",
            ExamType::Renal => "Renal",
            ExamType::Ivc => "IVC",
            ExamType::Aorta => "Aorta",
            ExamType::Mesenteric => "Mesenteric",
            ExamType::LeArterial => "LE Arterial",
            ExamType::LeVenous => "LE Venous",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        ExamType::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CoreError::UnknownExamType(s.to_string()))
    }
}

/// Laterality of a segment. Midline structures (aorta, IVC) are `n/a`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Side {
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "left")]
    Left,
    #[default]
    #[serde(rename = "n/a")]
    NotApplicable,
}

impl FromStr for Side {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" => Ok(Side::Right),
            "left" => Ok(Side::Left),
            "n/a" | "" => Ok(Side::NotApplicable),
            _ => Err(CoreError::UnknownSide(s.to_string())),
        }
    }
}

/// A single vascular ultrasound exam as held by the storage layer.
///
/// The exam owns its segments exclusively; segment names are expected to be
/// unique within an exam.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Exam {
    pub id: Uuid,
    pub patient_name: String,
    pub mrn: String,
    #[serde(default)]
    pub dob: Option<jiff::civil::Date>,
    #[serde(default)]
    pub accession: String,
    #[serde(default)]
    pub exam_date: Option<jiff::civil::Date>,
    pub exam_type: ExamType,
    /// e.g. bilateral, right, left
    #[serde(default)]
    pub exam_scope: String,
    /// e.g. complete, limited
    #[serde(default)]
    pub exam_extent: String,
    #[serde(default)]
    pub technique: String,
    #[serde(default)]
    pub operative_history: String,
    /// ICD-10 code for the indication, e.g. I73.9
    #[serde(default)]
    pub indication_code: String,
    /// Clinical site whose criteria apply, e.g. "mount_sinai_gp1c".
    pub site: String,
    /// Criteria/template version the exam was created against.
    pub criteria_version: String,
    pub created_by: String,
    #[serde(default)]
    pub reading_physician: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Exam {
    /// The first segment with the given name.
    pub fn segment(&self, name: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.name == name)
    }

    pub fn segment_mut(&mut self, name: &str) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.name == name)
    }

    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            id: self.id,
            patient_name: self.patient_name.clone(),
            mrn: self.mrn.clone(),
            dob: self.dob,
            accession: self.accession.clone(),
            exam_date: self.exam_date,
            exam_type: self.exam_type,
            exam_scope: self.exam_scope.clone(),
            exam_extent: self.exam_extent.clone(),
            technique: self.technique.clone(),
            operative_history: self.operative_history.clone(),
            indication_code: self.indication_code.clone(),
            site: self.site.clone(),
            criteria_version: self.criteria_version.clone(),
            created_by: self.created_by.clone(),
            reading_physician: self.reading_physician.clone(),
            segment_count: self.segments.len(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Exam metadata shared by every exam type. Segment detail is layered on top
/// by the exam-type profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExamSummary {
    pub id: Uuid,
    pub patient_name: String,
    pub mrn: String,
    pub dob: Option<jiff::civil::Date>,
    pub accession: String,
    pub exam_date: Option<jiff::civil::Date>,
    pub exam_type: ExamType,
    pub exam_scope: String,
    pub exam_extent: String,
    pub technique: String,
    pub operative_history: String,
    pub indication_code: String,
    pub site: String,
    pub criteria_version: String,
    pub created_by: String,
    pub reading_physician: Option<String>,
    pub segment_count: usize,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}
