use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use uuid::Uuid;
use vasc_core::models::exam::ExamType;

#[derive(Debug, Parser)]
#[command(name = "vasc", version, about = "Vascular ultrasound calculations and conclusions")]
pub struct Cli {
    /// Config file (default: vasc.json)
    #[arg(long, global = true, env = "VASC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Override the criteria directory
    #[arg(long, global = true)]
    pub criteria_dir: Option<PathBuf>,

    /// Override the segment template directory
    #[arg(long, global = true)]
    pub template_dir: Option<PathBuf>,

    /// Override the data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load and validate a criteria document, then print it
    Criteria(RulesetArgs),
    /// Annotate a segment map read from a JSON file; nothing is stored
    Evaluate {
        /// JSON object of segment name → measurements
        segments: PathBuf,
        #[command(flatten)]
        ruleset: RulesetArgs,
    },
    /// Run the full calculation for a stored exam
    Calculate {
        exam_id: Uuid,
        /// Recorded on audit events (default: config actor)
        #[arg(long)]
        actor: Option<String>,
    },
    /// Print the conclusion for a stored exam without writing anything
    Conclusion { exam_id: Uuid },
    /// Print a stored exam as seen by its exam-type profile
    Describe { exam_id: Uuid },
    /// Create an exam from the segment template and print it
    NewExam(NewExamArgs),
    /// Write the effective configuration to the config file
    Init,
}

#[derive(Debug, Args)]
pub struct NewExamArgs {
    #[command(flatten)]
    pub ruleset: RulesetArgs,
    #[arg(long)]
    pub patient_name: String,
    #[arg(long)]
    pub mrn: String,
    /// Date of birth, YYYY-MM-DD
    #[arg(long)]
    pub dob: Option<jiff::civil::Date>,
    #[arg(long, default_value = "")]
    pub accession: String,
    /// Exam date, YYYY-MM-DD
    #[arg(long)]
    pub exam_date: Option<jiff::civil::Date>,
    /// e.g. bilateral, right, left
    #[arg(long, default_value = "")]
    pub scope: String,
    /// e.g. complete, limited
    #[arg(long, default_value = "")]
    pub extent: String,
    #[arg(long, default_value = "")]
    pub technique: String,
    #[arg(long, default_value = "")]
    pub operative_history: String,
    /// ICD-10 indication code
    #[arg(long, default_value = "")]
    pub indication: String,
    #[arg(long)]
    pub reading_physician: Option<String>,
    /// Recorded as the exam's creator (default: config actor)
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Debug, Args)]
pub struct RulesetArgs {
    #[arg(long, default_value = "carotid", value_parser = parse_exam_type)]
    pub exam_type: ExamType,
    /// Clinical site (default: config default_site)
    #[arg(long)]
    pub site: Option<String>,
    /// Criteria version (default: config default_version)
    #[arg(long)]
    pub criteria_version: Option<String>,
}

fn parse_exam_type(s: &str) -> Result<ExamType, String> {
    s.parse().map_err(|e: vasc_core::CoreError| e.to_string())
}
