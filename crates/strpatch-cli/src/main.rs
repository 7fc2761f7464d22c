mod prompter;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use strpatch::{
    InputFormat, LengthPolicy, SessionConfig, SessionOutcome, SuspendedLauncher, process_name,
    run_session,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use prompter::CliPrompter;

#[derive(Parser)]
#[command(name = "strpatch")]
#[command(about = "Replace byte strings in a copy of an executable while holding it suspended")]
struct Args {
    /// Executable to patch
    target: Option<PathBuf>,

    /// How to treat rules whose search and replacement lengths differ (reject, overwrite)
    #[arg(long, env = "STRPATCH_LENGTH_POLICY", default_value = "reject")]
    length_policy: LengthPolicy,

    /// How search and replacement lines are read (text, hex)
    #[arg(long, env = "STRPATCH_INPUT_FORMAT", default_value = "text")]
    input_format: InputFormat,

    /// Seconds to wait before exiting when no target is given
    #[arg(long, env = "STRPATCH_USAGE_DELAY", default_value_t = 5)]
    usage_delay: u64,
}

fn main() -> Result<ExitCode> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("strpatch=info".parse()?))
        .init();

    let args = Args::parse();

    let target = match resolve_target(args.target.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            let delay = Duration::from_secs(args.usage_delay);
            return Ok(report_usage(&e, delay, &mut io::stderr()));
        }
    };

    // The held process dies with us through its job object / parent-death signal.
    ctrlc::set_handler(|| {
        warn!("Interrupted, exiting without saving");
        std::process::exit(130);
    })
    .context("Failed to set Ctrl+C handler")?;

    let output_dir = std::env::current_dir().context("Failed to read working directory")?;
    let config = SessionConfig::builder(&target)
        .output_dir(output_dir)
        .length_policy(args.length_policy)
        .input_format(args.input_format)
        .build();

    info!(
        "Editing {} (length policy: {}, input: {})",
        process_name(&target),
        config.length_policy,
        config.input_format
    );

    let mut prompter = CliPrompter::stdio();
    match run_session(&SuspendedLauncher, &mut prompter, config) {
        Ok(SessionOutcome::Saved { path, report, .. }) => {
            info!(
                "Wrote {} ({} replacements)",
                path.display(),
                report.total_replacements()
            );
            Ok(ExitCode::SUCCESS)
        }
        Ok(SessionOutcome::Abandoned) => {
            println!("Input closed, nothing saved.");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            if e.is_fatal() {
                error!("{}", e);
            } else if e.is_not_found() {
                warn!("{} is no longer readable", target.display());
            }
            eprintln!("{}", e.red());
            Ok(ExitCode::FAILURE)
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum UsageError {
    MissingTarget,
    InvalidTarget(String),
}

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UsageError::MissingTarget => write!(f, "No file dropped!"),
            UsageError::InvalidTarget(reason) => write!(f, "Invalid target path: {}", reason),
        }
    }
}

/// Make the target absolute so launching it never searches PATH.
fn resolve_target(target: Option<&Path>) -> std::result::Result<PathBuf, UsageError> {
    let target = target.ok_or(UsageError::MissingTarget)?;
    std::path::absolute(target).map_err(|e| UsageError::InvalidTarget(e.to_string()))
}

/// Print the usage diagnostic, wait so a drag-and-drop console stays
/// readable, and give the exit status. Nothing is launched.
fn report_usage(err: &UsageError, delay: Duration, out: &mut impl Write) -> ExitCode {
    writeln!(out, "{}", err.red()).ok();
    writeln!(out, "{}", Args::command().render_usage()).ok();
    out.flush().ok();
    thread::sleep(delay);
    ExitCode::FAILURE
}
