use std::path::{Path, PathBuf};

use vasc_core::models::exam::ExamType;
use vasc_core::models::template::ExamTemplate;
use vasc_core::paths;

use crate::error::CriteriaError;
use crate::source::{parse_identified, read_document};

/// Segment templates laid out on disk as `<root>/<exam_type>/<exam_type>.json`.
#[derive(Debug, Clone)]
pub struct TemplateDir {
    root: PathBuf,
}

impl TemplateDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn load(
        &self,
        exam_type: ExamType,
        site: &str,
        version: &str,
    ) -> Result<ExamTemplate, CriteriaError> {
        load_template(&self.root, exam_type, site, version)
    }
}

/// Read the segment template for `exam_type` under `root`. Site and version
/// are checked the same way as for criteria documents.
pub fn load_template(
    root: &Path,
    exam_type: ExamType,
    site: &str,
    version: &str,
) -> Result<ExamTemplate, CriteriaError> {
    let path = root.join(paths::template_document(exam_type));
    tracing::debug!(path = %path.display(), "resolved template path");

    let contents = read_document(&path)?.ok_or_else(|| CriteriaError::TemplateNotFound {
        exam_type,
        path: path.clone(),
    })?;

    let template: ExamTemplate = parse_identified(&path, &contents, site, version)?;
    if template.segments.is_empty() {
        return Err(CriteriaError::Malformed {
            path,
            reason: "template has no segments".to_string(),
        });
    }

    tracing::info!(
        exam_type = %exam_type,
        site = %template.site,
        version = %template.version,
        segments = template.segments.len(),
        "segment template loaded"
    );
    Ok(template)
}
