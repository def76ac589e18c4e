use std::fmt;

use serde::{Deserialize, Serialize};

/// Severity band or uncertainty marker assigned to a segment.
///
/// Labels are part of the persisted report text and must be reproduced
/// exactly, including the en dash in ranges. Labels produced by other rulesets
/// or older reports are carried through unchanged as [`StenosisCategory::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum StenosisCategory {
    Minimal,
    Mild,
    Moderate,
    Severe,
    /// 60–79% PSV band upgraded by an ICA/CCA ratio above threshold.
    SevereUpgraded,
    Critical,
    /// PSV in the 60–79% band but EDV missing or above the band's cap.
    UncertainEdv,
    /// PSV in the 80–99% band but EDV below the confirmation floor.
    UncertainHighPsv,
    Other(String),
}

impl StenosisCategory {
    pub fn label(&self) -> &str {
        match self {
            StenosisCategory::Minimal => "0–19%",
            StenosisCategory::Mild => "20–39%",
            StenosisCategory::Moderate => "40–59%",
            StenosisCategory::Severe => "60–79%",
            StenosisCategory::SevereUpgraded => "≥70% (ICA/CCA > 4)",
            StenosisCategory::Critical => "80–99%",
            StenosisCategory::UncertainEdv => "Uncertain (missing or high EDV)",
            StenosisCategory::UncertainHighPsv => "Uncertain (PSV high, EDV not confirmatory)",
            StenosisCategory::Other(label) => label,
        }
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(
            self,
            StenosisCategory::UncertainEdv | StenosisCategory::UncertainHighPsv
        )
    }
}

impl fmt::Display for StenosisCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<String> for StenosisCategory {
    fn from(label: String) -> Self {
        const KNOWN: [StenosisCategory; 8] = [
            StenosisCategory::Minimal,
            StenosisCategory::Mild,
            StenosisCategory::Moderate,
            StenosisCategory::Severe,
            StenosisCategory::SevereUpgraded,
            StenosisCategory::Critical,
            StenosisCategory::UncertainEdv,
            StenosisCategory::UncertainHighPsv,
        ];
        KNOWN
            .into_iter()
            .find(|c| c.label() == label)
            .unwrap_or(StenosisCategory::Other(label))
    }
}

impl From<&str> for StenosisCategory {
    fn from(label: &str) -> Self {
        StenosisCategory::from(label.to_string())
    }
}

impl From<StenosisCategory> for String {
    fn from(category: StenosisCategory) -> Self {
        match category {
            StenosisCategory::Other(label) => label,
            known => known.label().to_string(),
        }
    }
}
