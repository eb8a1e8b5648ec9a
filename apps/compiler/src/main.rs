mod config;
mod errors;
mod explain;
mod lint;
mod llm;
mod load;
mod models;
mod pipeline;
mod render;
mod select;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::RewriteConfig;
use crate::lint::{has_errors, lint_inputs, lint_output_file, LintIssue};
use crate::llm::http::HttpRewriter;
use crate::llm::manual::ManualRewriter;
use crate::llm::noop::NoopRewriter;
use crate::llm::BulletRewriter;
use crate::load::{load_canonical_data, load_job_spec};
use crate::pipeline::{build, output_stem, BuildRequest};
use crate::render::PageMetrics;
use crate::select::select;

#[derive(Parser)]
#[command(
    name = "cv",
    version,
    about = "Compile canonical career records into a tailored, ATS-safe CV"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a CV (generic or job-targeted).
    Build {
        /// Canonical data JSON file.
        #[arg(long)]
        data: PathBuf,
        /// Optional job spec JSON file.
        #[arg(long)]
        job: Option<PathBuf>,
        /// Output directory for generated artifacts.
        #[arg(long, default_value = "out")]
        out: PathBuf,
        /// Also write the paginated plain-text rendering.
        #[arg(long, value_enum, default_value = "md")]
        format: OutputFormat,
        /// Bullet-rewrite backend.
        #[arg(long, value_enum, default_value = "none")]
        rewrite: RewriteBackend,
        /// Exchange directory for the manual backend (defaults to --out).
        #[arg(long)]
        rewrite_dir: Option<PathBuf>,
        /// Extra rewrite instructions file.
        #[arg(long)]
        instructions: Option<PathBuf>,
        /// Budget for the rewrite call, in seconds.
        #[arg(long, default_value_t = 60)]
        timeout_secs: u64,
    },
    /// Validate records and/or a rendered artifact against ATS constraints.
    Lint {
        /// Canonical data JSON file.
        #[arg(long)]
        data: Option<PathBuf>,
        /// Rendered artifact to check.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Explain deterministic selection decisions.
    Explain {
        /// Canonical data JSON file.
        #[arg(long)]
        data: PathBuf,
        /// Optional job spec JSON file.
        #[arg(long)]
        job: Option<PathBuf>,
        /// Emit the raw selection result as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Md,
    Text,
}

#[derive(Clone, Copy, ValueEnum)]
enum RewriteBackend {
    None,
    Noop,
    Manual,
    Http,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Build {
            data,
            job,
            out,
            format,
            rewrite,
            rewrite_dir,
            instructions,
            timeout_secs,
        } => {
            cmd_build(
                data,
                job,
                out,
                format,
                rewrite,
                rewrite_dir,
                instructions,
                timeout_secs,
            )
            .await
        }
        Command::Lint { data, output } => cmd_lint(data, output),
        Command::Explain { data, job, json } => cmd_explain(data, job, json),
    }
}

#[allow(clippy::too_many_arguments)]
async fn cmd_build(
    data_path: PathBuf,
    job_path: Option<PathBuf>,
    out: PathBuf,
    format: OutputFormat,
    rewrite: RewriteBackend,
    rewrite_dir: Option<PathBuf>,
    instructions_path: Option<PathBuf>,
    timeout_secs: u64,
) -> Result<()> {
    let data = load_canonical_data(&data_path)?;
    let job = match &job_path {
        Some(path) => Some(load_job_spec(path)?),
        None => None,
    };
    let instructions = match &instructions_path {
        Some(path) if path.exists() => Some(std::fs::read_to_string(path)?),
        _ => None,
    };

    let rewriter: Option<Box<dyn BulletRewriter>> = match rewrite {
        RewriteBackend::None => None,
        RewriteBackend::Noop => Some(Box::new(NoopRewriter)),
        RewriteBackend::Manual => {
            let dir = rewrite_dir.unwrap_or_else(|| out.clone());
            Some(Box::new(ManualRewriter::new(&dir)))
        }
        RewriteBackend::Http => {
            let config = RewriteConfig::from_env()?
                .context("http rewrite backend requires CV_LLM_BASE_URL and CV_LLM_MODEL")?;
            Some(Box::new(HttpRewriter::new(
                config.base_url,
                config.model,
                config.api_key,
                Duration::from_secs(config.timeout_secs),
            )))
        }
    };

    let stem = output_stem(job.as_ref());
    let outcome = build(BuildRequest {
        data,
        job,
        rewriter: rewriter.as_deref(),
        rewrite_timeout: Duration::from_secs(timeout_secs),
        instructions,
        page: PageMetrics::default(),
    })
    .await?;

    match &outcome.markdown {
        Some(markdown) => {
            std::fs::create_dir_all(&out)?;
            let md_path = out.join(format!("{stem}.md"));
            std::fs::write(&md_path, markdown)?;
            info!(path = %md_path.display(), "wrote markdown artifact");

            if matches!(format, OutputFormat::Text) {
                if let Some(document) = &outcome.document {
                    let txt_path = out.join(format!("{stem}.txt"));
                    std::fs::write(&txt_path, document.plain_text())?;
                    info!(path = %txt_path.display(), "wrote paginated text artifact");
                }
            }
        }
        None => warn!("build stopped before composition; no artifact written"),
    }

    report_issues(&outcome.issues);
    if has_errors(&outcome.issues) {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_lint(data_path: Option<PathBuf>, output_path: Option<PathBuf>) -> Result<()> {
    if data_path.is_none() && output_path.is_none() {
        bail!("nothing to lint: pass --data and/or --output");
    }

    let mut issues: Vec<LintIssue> = Vec::new();
    if let Some(path) = data_path {
        let data = load_canonical_data(&path)?;
        issues.extend(lint_inputs(&data));
    }
    if let Some(path) = output_path {
        issues.extend(lint_output_file(&path));
    }

    if issues.is_empty() {
        println!("ok: no issues found");
        return Ok(());
    }
    report_issues(&issues);
    if has_errors(&issues) {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_explain(data_path: PathBuf, job_path: Option<PathBuf>, json: bool) -> Result<()> {
    let data = load_canonical_data(&data_path)?;
    let job = match &job_path {
        Some(path) => Some(load_job_spec(path)?),
        None => None,
    };
    let selection = select(&data, job.as_ref());
    if json {
        println!("{}", serde_json::to_string_pretty(&selection)?);
    } else {
        print!("{}", explain::format_selection_explanation(&selection));
    }
    Ok(())
}

fn report_issues(issues: &[LintIssue]) {
    for issue in issues {
        match &issue.source {
            Some(source) => println!(
                "{}: [{}] {} ({source})",
                issue.severity, issue.code, issue.message
            ),
            None => println!("{}: [{}] {}", issue.severity, issue.code, issue.message),
        }
    }
}
