use std::sync::Arc;

use eyre::{eyre, Result, WrapErr};
use serde_json::json;
use uuid::Uuid;
use vasc_core::models::record::SegmentMap;
use vasc_criteria::{CriteriaCache, CriteriaDir, TemplateDir};
use vasc_pipeline::{NewExam, ReportOutcome};
use vasc_storage::{ExamStore, FileStore};

use crate::cli::{NewExamArgs, RulesetArgs};
use crate::config::VascConfig;

/// Shared handles for one invocation.
pub struct Context {
    pub config: VascConfig,
    pub criteria: CriteriaCache<CriteriaDir>,
    pub templates: TemplateDir,
    pub store: FileStore,
}

impl Context {
    pub fn new(config: VascConfig) -> Self {
        let criteria = CriteriaCache::new(CriteriaDir::new(&config.criteria_dir));
        let templates = TemplateDir::new(&config.template_dir);
        let store = FileStore::new(&config.data_dir);
        Self {
            config,
            criteria,
            templates,
            store,
        }
    }

    /// Site and version from the flags, falling back to the config.
    fn identity<'a>(&'a self, args: &'a RulesetArgs) -> Result<(&'a str, &'a str)> {
        let site = args
            .site
            .as_deref()
            .or(self.config.default_site.as_deref())
            .ok_or_else(|| eyre!("no site given; pass --site or set default_site in the config"))?;
        let version = args
            .criteria_version
            .as_deref()
            .unwrap_or(&self.config.default_version);
        Ok((site, version))
    }

    fn ruleset(&self, args: &RulesetArgs) -> Result<Arc<vasc_core::models::criteria::Criteria>> {
        let (site, version) = self.identity(args)?;
        Ok(self.criteria.get(args.exam_type, site, version)?)
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn criteria(ctx: &Context, args: &RulesetArgs) -> Result<()> {
    let criteria = ctx.ruleset(args)?;
    print_json(&*criteria)
}

pub fn evaluate(ctx: &Context, path: &std::path::Path, args: &RulesetArgs) -> Result<()> {
    let criteria = ctx.ruleset(args)?;
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read segments from {}", path.display()))?;
    let segments: SegmentMap = serde_json::from_str(&contents)
        .wrap_err_with(|| format!("invalid segment map in {}", path.display()))?;

    let evaluation = vasc_pipeline::evaluate(segments, &criteria);
    print_json(&evaluation)
}

pub async fn calculate(ctx: &Context, exam_id: Uuid, actor: Option<&str>) -> Result<()> {
    let actor = actor.unwrap_or(&ctx.config.actor);
    let outcome = vasc_pipeline::run_calculation(&ctx.store, &ctx.criteria, exam_id, actor).await?;

    if !outcome.persisted.is_complete() {
        tracing::warn!(
            exam_id = %exam_id,
            failed = outcome.persisted.failed.len(),
            "some segments were not saved"
        );
    }

    let failed: Vec<_> = outcome
        .persisted
        .failed
        .iter()
        .map(|f| json!({ "segment": f.segment, "error": f.error.to_string() }))
        .collect();
    let report = match outcome.report {
        ReportOutcome::Seeded => "seeded",
        ReportOutcome::Preserved => "preserved",
    };
    print_json(&json!({
        "exam_id": outcome.exam_id,
        "segments": outcome.evaluation.segments,
        "conclusion": outcome.evaluation.conclusion,
        "saved": outcome.persisted.saved,
        "failed": failed,
        "preliminary_report": report,
    }))
}

pub async fn conclusion(ctx: &Context, exam_id: Uuid) -> Result<()> {
    let text = vasc_pipeline::conclusion_for_exam(&ctx.store, &ctx.criteria, exam_id).await?;
    println!("{text}");
    Ok(())
}

pub async fn describe(ctx: &Context, exam_id: Uuid) -> Result<()> {
    let exam = ctx.store.load_exam(exam_id).await?;
    let profile = vasc_engine::get_profile(exam.exam_type)
        .ok_or_else(|| eyre!("no profile for exam type {}", exam.exam_type))?;
    let view = profile.describe(&exam);
    print_json(&json!({
        "profile": profile.name(),
        "supports_calculation": profile.supports_calculation(),
        "exam": view,
    }))
}

pub async fn new_exam(ctx: &Context, args: &NewExamArgs) -> Result<()> {
    let (site, version) = ctx.identity(&args.ruleset)?;
    let request = NewExam {
        exam_type: args.ruleset.exam_type,
        site: site.to_string(),
        version: version.to_string(),
        patient_name: args.patient_name.clone(),
        mrn: args.mrn.clone(),
        dob: args.dob,
        accession: args.accession.clone(),
        exam_date: args.exam_date,
        exam_scope: args.scope.clone(),
        exam_extent: args.extent.clone(),
        technique: args.technique.clone(),
        operative_history: args.operative_history.clone(),
        indication_code: args.indication.clone(),
        reading_physician: args.reading_physician.clone(),
    };
    let actor = args.actor.as_deref().unwrap_or(&ctx.config.actor);

    let exam = vasc_pipeline::create_exam(&ctx.store, &ctx.templates, request, actor).await?;
    print_json(&exam)
}
