use std::fmt;

use serde::Serialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    ExamCreated,
    CalculationStarted,
    CalculationCompleted,
    CalculationFailed,
    CalculatedFieldsSaved,
    CalculatedFieldsFailed,
    ReportSeeded,
    ReportPreserved,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ExamCreated => "exam_created",
            AuditAction::CalculationStarted => "calculation_started",
            AuditAction::CalculationCompleted => "calculation_completed",
            AuditAction::CalculationFailed => "calculation_failed",
            AuditAction::CalculatedFieldsSaved => "calculated_fields_saved",
            AuditAction::CalculatedFieldsFailed => "calculated_fields_failed",
            AuditAction::ReportSeeded => "report_seeded",
            AuditAction::ReportPreserved => "report_preserved",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Exam,
    Segment,
    PreliminaryReport,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Exam => "exam",
            ResourceType::Segment => "segment",
            ResourceType::PreliminaryReport => "preliminary_report",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured audit event for exam creation or one step of a calculation run.
///
/// Segment events use `<exam_id>/<segment_key>` as the resource id.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub actor: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        resource_type: ResourceType,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_type,
            resource_id: resource_id.into(),
            actor: actor.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn exam_created(
        exam_id: Uuid,
        actor: &str,
        exam_type: &str,
        site: &str,
        version: &str,
        segments: usize,
    ) -> Self {
        Self::new(
            AuditAction::ExamCreated,
            ResourceType::Exam,
            exam_id.to_string(),
            actor,
        )
        .with_details(json!({
            "exam_type": exam_type,
            "site": site,
            "template_version": version,
            "segments": segments,
        }))
    }

    pub fn calculation_started(exam_id: Uuid, actor: &str, site: &str, version: &str) -> Self {
        Self::new(
            AuditAction::CalculationStarted,
            ResourceType::Exam,
            exam_id.to_string(),
            actor,
        )
        .with_details(json!({ "site": site, "criteria_version": version }))
    }

    pub fn calculation_completed(exam_id: Uuid, actor: &str, segments: usize, failed: usize) -> Self {
        Self::new(
            AuditAction::CalculationCompleted,
            ResourceType::Exam,
            exam_id.to_string(),
            actor,
        )
        .with_details(json!({ "segments": segments, "failed": failed }))
    }

    pub fn calculation_failed(exam_id: Uuid, actor: &str, reason: &str) -> Self {
        Self::new(
            AuditAction::CalculationFailed,
            ResourceType::Exam,
            exam_id.to_string(),
            actor,
        )
        .with_details(json!({ "reason": reason }))
    }

    pub fn fields_saved(exam_id: Uuid, segment: &str, actor: &str, fields: serde_json::Value) -> Self {
        Self::new(
            AuditAction::CalculatedFieldsSaved,
            ResourceType::Segment,
            format!("{exam_id}/{segment}"),
            actor,
        )
        .with_details(fields)
    }

    pub fn fields_failed(exam_id: Uuid, segment: &str, actor: &str, error: &str) -> Self {
        Self::new(
            AuditAction::CalculatedFieldsFailed,
            ResourceType::Segment,
            format!("{exam_id}/{segment}"),
            actor,
        )
        .with_details(json!({ "error": error }))
    }

    pub fn report_seeded(exam_id: Uuid, actor: &str) -> Self {
        Self::new(
            AuditAction::ReportSeeded,
            ResourceType::PreliminaryReport,
            exam_id.to_string(),
            actor,
        )
    }

    /// The technologist's edited report was kept as is.
    pub fn report_preserved(exam_id: Uuid, actor: &str) -> Self {
        Self::new(
            AuditAction::ReportPreserved,
            ResourceType::PreliminaryReport,
            exam_id.to_string(),
            actor,
        )
    }

    /// Emit this audit event via tracing.
    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();
        info!(
            audit.action = %self.action,
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.actor = %self.actor,
            audit.details = %details,
            "audit event"
        );
    }
}
