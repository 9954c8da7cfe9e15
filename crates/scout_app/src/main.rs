mod effects;
mod logging;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use clap::Parser;
use scout_core::{
    require_task, update, CompanySize, MemorySessionStore, Msg, PollPhase, Preferences, Stage,
    WorkflowState, WorkflowView,
};
use scout_engine::{ApiSettings, EngineHandle, ResumeFile};
use workflow_logging::flow_info;

use crate::effects::EffectRunner;

#[derive(Debug, Parser)]
#[command(name = "scout", about = "Resume-driven deep job search client")]
struct Cli {
    /// Resume file to upload (PDF, JPEG or PNG).
    resume: PathBuf,

    /// Preferred location, e.g. "Remote" or "Berlin".
    #[arg(long)]
    location: String,

    /// Company size: any, startup, small, medium or large.
    #[arg(long, default_value = "any")]
    company_size: String,

    /// Role to search for, e.g. "Software Engineer".
    #[arg(long)]
    role_type: String,

    /// Free-form extra context for the search.
    #[arg(long, default_value = "")]
    additional_info: String,

    /// Backend base URL; falls back to $SCOUT_API_URL, then localhost.
    #[arg(long)]
    api_url: Option<String>,
}

fn main() -> Result<()> {
    logging::initialize(logging::LogDestination::File);
    let cli = Cli::parse();

    let preferences = Preferences {
        location: cli.location.clone(),
        company_size: parse_company_size(&cli.company_size)?,
        role_type: cli.role_type.clone(),
        additional_info: cli.additional_info.clone(),
    };

    let file_name = cli
        .resume
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "resume".to_owned());
    let bytes = std::fs::read(&cli.resume)
        .with_context(|| format!("cannot read resume file {:?}", cli.resume))?;
    let file = ResumeFile {
        mime_type: mime_for(&cli.resume),
        file_name: file_name.clone(),
        bytes: Bytes::from(bytes),
    };

    let mut settings = ApiSettings::from_env();
    if let Some(url) = cli.api_url {
        settings.base_url = url.trim_end_matches('/').to_owned();
    }
    flow_info!("using backend at {}", settings.base_url);

    let store = Arc::new(MemorySessionStore::new());
    let engine = EngineHandle::new(settings).context("failed to set up the http client")?;
    let runner = EffectRunner::new(engine, store.clone(), file.clone());

    let mut state = WorkflowState::new();
    dispatch(&mut state, &runner, Msg::ResumeChosen {
        file_name,
        mime_type: file.mime_type.clone(),
    });
    if let Some(error) = state.view().error {
        // Local validation error; nothing was sent anywhere.
        bail!(error);
    }
    println!("Uploading resume...");

    let mut submitted_preferences = false;
    let mut entered_results = false;
    let mut last_progress = None;

    loop {
        while let Some(msg) = runner.next_msg() {
            dispatch(&mut state, &runner, msg);
        }

        if state.stage() == Stage::Preferences && !submitted_preferences {
            submitted_preferences = true;
            println!("Resume parsed. Starting job search...");
            dispatch(
                &mut state,
                &runner,
                Msg::PreferencesSubmitted(preferences.clone()),
            );
        }

        if state.stage() == Stage::Results && !entered_results {
            entered_results = true;
            // Guard: the results stage is unreachable without a stored task.
            let task_id = match require_task(store.as_ref()) {
                Ok(task_id) => task_id,
                Err(redirect) => bail!("no task to poll; restart from the {:?} stage", redirect.target),
            };
            println!("Search accepted (task {task_id}). Waiting for matches...");
        }

        let view = state.view();
        match view.phase {
            PollPhase::Succeeded | PollPhase::Failed => break,
            _ => {}
        }
        if !view.busy && view.error.is_some() {
            // Upload or launch failed; the user retries by rerunning.
            bail!(view.error.unwrap_or_default());
        }

        if view.phase == PollPhase::Polling && last_progress != Some(view.progress) {
            last_progress = Some(view.progress);
            if view.job_count > 0 {
                println!(
                    "Searching... {}% ({} matches so far)",
                    view.progress, view.job_count
                );
            } else {
                println!("Searching... {}%", view.progress);
            }
        }

        thread::sleep(Duration::from_millis(20));
    }

    render(&state.view())
}

fn dispatch(state: &mut WorkflowState, runner: &EffectRunner, msg: Msg) {
    let current = std::mem::take(state);
    let (next, effects) = update(current, msg);
    *state = next;
    runner.run(effects);
}

fn render(view: &WorkflowView) -> Result<()> {
    println!();
    if !view.followup_questions.is_empty() {
        println!("Follow-up questions to refine your search:");
        for question in &view.followup_questions {
            println!("  - {question}");
        }
        println!();
    }

    if view.job_listings.is_empty() {
        println!("No job matches found.");
    } else {
        println!("Found {} job matches:", view.job_count);
        for job in &view.job_listings {
            println!();
            println!("  {} at {} ({})", job.title, job.company, job.location);
            println!("    {}", job.description);
            println!("    apply: {}", job.apply_link);
        }
    }

    if view.phase == PollPhase::Failed {
        println!();
        // Partial matches above stay visible alongside the failure.
        bail!(view.error.clone().unwrap_or_else(|| "search failed".to_owned()));
    }
    Ok(())
}

fn parse_company_size(raw: &str) -> Result<CompanySize> {
    let size = match raw.to_ascii_lowercase().as_str() {
        "any" => CompanySize::Any,
        "startup" => CompanySize::Startup,
        "small" => CompanySize::Small,
        "medium" => CompanySize::Medium,
        "large" => CompanySize::Large,
        other => bail!("unknown company size {other:?}; use any, startup, small, medium or large"),
    };
    Ok(size)
}

/// Best-effort MIME from the file extension. Anything unrecognized is
/// passed through and rejected by the workflow's own gate.
fn mime_for(path: &Path) -> String {
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        _ => "application/octet-stream",
    }
    .to_owned()
}
