use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::models::segment::CalculatedFields;
use crate::models::stenosis::StenosisCategory;
use crate::numeric::RawValue;

/// The calculator's working copy of one segment: raw inputs copied from the
/// measurement, plus the derived fields the calculator writes.
///
/// Derived fields are absent until computed. Absent fields are omitted when
/// serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SegmentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psv: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edv: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cca_psv: Option<RawValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waveform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaque_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plaque: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morphology: Option<String>,
    /// Pass-through attributes, never interpreted by the calculator.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, RawValue>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub ica_cca_ratio: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stenosis_category: Option<StenosisCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stenosis_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertebral_comment: Option<String>,
}

impl SegmentRecord {
    pub fn with_psv(mut self, psv: impl Into<RawValue>) -> Self {
        self.psv = Some(psv.into());
        self
    }

    pub fn with_edv(mut self, edv: impl Into<RawValue>) -> Self {
        self.edv = Some(edv.into());
        self
    }

    pub fn with_cca_psv(mut self, cca_psv: impl Into<RawValue>) -> Self {
        self.cca_psv = Some(cca_psv.into());
        self
    }

    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    pub fn with_waveform(mut self, waveform: impl Into<String>) -> Self {
        self.waveform = Some(waveform.into());
        self
    }

    /// Project the derived fields into the blob the storage layer persists.
    pub fn calculated_fields(&self) -> CalculatedFields {
        CalculatedFields {
            ica_cca_ratio: self.ica_cca_ratio,
            stenosis_category: self.stenosis_category.clone(),
            stenosis_notes: self.stenosis_notes.clone(),
            vertebral_comment: self.vertebral_comment.clone(),
        }
    }

    pub fn has_findings(&self) -> bool {
        self.stenosis_category.is_some() || self.vertebral_comment.is_some()
    }
}

/// Segment records keyed by segment name.
///
/// Keys are unique. Iteration follows insertion order, which is what makes the
/// generated conclusion deterministic for a given exam; lookups are by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentMap {
    entries: Vec<(String, SegmentRecord)>,
}

impl SegmentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing (in place) any record already held under
    /// the key. Returns the replaced record.
    pub fn insert(&mut self, key: impl Into<String>, record: SegmentRecord) -> Option<SegmentRecord> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, record)),
            None => {
                self.entries.push((key, record));
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&SegmentRecord> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut SegmentRecord> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, r)| r)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SegmentRecord)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut SegmentRecord)> {
        self.entries.iter_mut().map(|(k, r)| (k.as_str(), r))
    }
}

impl<K: Into<String>> FromIterator<(K, SegmentRecord)> for SegmentMap {
    fn from_iter<I: IntoIterator<Item = (K, SegmentRecord)>>(iter: I) -> Self {
        let mut map = SegmentMap::new();
        for (key, record) in iter {
            map.insert(key, record);
        }
        map
    }
}

impl IntoIterator for SegmentMap {
    type Item = (String, SegmentRecord);
    type IntoIter = std::vec::IntoIter<(String, SegmentRecord)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for SegmentMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

impl<'de> Deserialize<'de> for SegmentMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SegmentMapVisitor;

        impl<'de> Visitor<'de> for SegmentMapVisitor {
            type Value = SegmentMap;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of segment name to segment record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = SegmentMap::new();
                while let Some((key, record)) = access.next_entry::<String, SegmentRecord>()? {
                    if map.contains_key(&key) {
                        return Err(serde::de::Error::custom(format!(
                            "duplicate segment key `{key}`"
                        )));
                    }
                    map.insert(key, record);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(SegmentMapVisitor)
    }
}
