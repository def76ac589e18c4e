use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use vasc_core::models::criteria::Criteria;
use vasc_core::models::exam::ExamType;
use vasc_core::paths;

use crate::error::{CriteriaError, IdentityField};

/// Anything that can produce a validated ruleset for an exam type.
pub trait CriteriaSource: Send + Sync {
    fn load(&self, exam_type: ExamType, site: &str, version: &str) -> Result<Criteria, CriteriaError>;
}

/// Criteria documents laid out on disk as `<root>/<exam_type>/<exam_type>.json`.
#[derive(Debug, Clone)]
pub struct CriteriaDir {
    root: PathBuf,
}

impl CriteriaDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl CriteriaSource for CriteriaDir {
    fn load(&self, exam_type: ExamType, site: &str, version: &str) -> Result<Criteria, CriteriaError> {
        load(&self.root, exam_type, site, version)
    }
}

/// Read the criteria document for `exam_type` under `root` and validate its
/// identity against `site` and `version`.
pub fn load(
    root: &Path,
    exam_type: ExamType,
    site: &str,
    version: &str,
) -> Result<Criteria, CriteriaError> {
    let path = root.join(paths::criteria_document(exam_type));
    tracing::debug!(path = %path.display(), "resolved criteria path");

    let contents = read_document(&path)?
        .ok_or_else(|| CriteriaError::NotFound {
            exam_type,
            path: path.clone(),
        })?;

    let criteria = parse_document(&path, &contents, site, version)?;
    tracing::info!(
        exam_type = %exam_type,
        site = %criteria.site,
        version = %criteria.version,
        "criteria loaded"
    );
    Ok(criteria)
}

/// Parse a criteria document. Identity is checked on the raw document first,
/// site before version, so a document for another site is reported as such
/// even when its thresholds would not decode.
pub fn parse_document(
    path: &Path,
    contents: &str,
    site: &str,
    version: &str,
) -> Result<Criteria, CriteriaError> {
    parse_identified(path, contents, site, version)
}

/// File contents, or `None` when the file does not exist.
pub(crate) fn read_document(path: &Path) -> Result<Option<String>, CriteriaError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CriteriaError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Decode a site/version-scoped document after checking its identity keys.
pub(crate) fn parse_identified<T: DeserializeOwned>(
    path: &Path,
    contents: &str,
    site: &str,
    version: &str,
) -> Result<T, CriteriaError> {
    let malformed = |reason: String| CriteriaError::Malformed {
        path: path.to_path_buf(),
        reason,
    };

    let document: Value = serde_json::from_str(contents).map_err(|e| malformed(e.to_string()))?;
    if !document.is_object() {
        return Err(malformed("document is not a JSON object".to_string()));
    }

    check_identity(IdentityField::Site, site, document.get("site"))?;
    check_identity(IdentityField::Version, version, document.get("version"))?;

    serde_json::from_value(document).map_err(|e| malformed(e.to_string()))
}

fn check_identity(
    field: IdentityField,
    expected: &str,
    found: Option<&Value>,
) -> Result<(), CriteriaError> {
    // Identity values must be strings; `1` never matches "1".
    if matches!(found, Some(Value::String(s)) if s == expected) {
        return Ok(());
    }

    let found = found.map(|v| match v {
        Value::String(s) => s.clone(),
        other => format!("{other} (not a string)"),
    });

    tracing::warn!(
        field = %field,
        expected = %expected,
        found = ?found,
        "criteria identity mismatch"
    );
    Err(CriteriaError::IdentityMismatch {
        field,
        expected: expected.to_string(),
        found,
    })
}
