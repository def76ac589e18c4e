use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use cli::{Cli, Command};
use commands::Context;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config_path = config::config_path(cli.config.as_deref());
    let mut config = config::load_config(&config_path)?;
    config.apply_env(|key| std::env::var(key).ok());
    if let Some(dir) = cli.criteria_dir {
        config.criteria_dir = dir;
    }
    if let Some(dir) = cli.template_dir {
        config.template_dir = dir;
    }
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }

    if let Command::Init = cli.command {
        return config::save_config(&config, &config_path);
    }

    let ctx = Context::new(config);
    match &cli.command {
        Command::Criteria(args) => commands::criteria(&ctx, args),
        Command::Evaluate { segments, ruleset } => commands::evaluate(&ctx, segments, ruleset),
        Command::Calculate { exam_id, actor } => {
            commands::calculate(&ctx, *exam_id, actor.as_deref()).await
        }
        Command::Conclusion { exam_id } => commands::conclusion(&ctx, *exam_id).await,
        Command::Describe { exam_id } => commands::describe(&ctx, *exam_id).await,
        Command::NewExam(args) => commands::new_exam(&ctx, args).await,
        Command::Init => Ok(()),
    }
}

/// Human-readable logs on stderr by default, JSON lines with `--json-logs`.
/// Stdout carries command output only.
fn init_tracing(json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
