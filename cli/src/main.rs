//! Wordwalk - explore related words with GPT or Claude.
//!
//! # Flow
//!
//! ```text
//! main() -> prompt for seeds -> ExplorationLoop::run()
//!                                  |  per round: "Generating related words..."
//!                                  |  LLM queries -> pool -> TerminalSelector
//!                                  v
//!                        "Picked words: ..." | "No valid words entered. Exiting."
//! ```
//!
//! Ctrl+C at the prompt or while words are being generated ends the program
//! with a goodbye message. Inside the picker, Ctrl+C cancels the round.
//!
//! The runtime is built by hand so an interrupt can shut it down without
//! waiting on the blocked stdin read.

use std::{
    fs::{self, OpenOptions},
    future::Future,
    io::Write,
    path::PathBuf,
    process::ExitCode,
    sync::Mutex,
};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use wordwalk_engine::{
    ExplorationLoop, LlmWordProvider, Outcome, RoundEvent, TerminationReason, WordwalkConfig,
};
use wordwalk_tui::TerminalSelector;

const PROMPT: &str = "Enter up to 10 words (separated by spaces or commas): ";
const GENERATING: &str = "Generating related words...";
const NO_VALID_WORDS: &str = "No valid words entered. Exiting.";
const NO_MORE_WORDS: &str = "No more words selected. Exiting...";
const INTERRUPTED: &str = "Application interrupted by user. Goodbye!";

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // No log file: stay silent rather than interleave logs with the prompts
    // and the picker.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, std::fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.wordwalk/logs/wordwalk.log
    if let Some(config_path) = WordwalkConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("wordwalk.log"));
    }

    // Fallback: ./.wordwalk/logs/wordwalk.log
    candidates.push(PathBuf::from(".wordwalk").join("logs").join("wordwalk.log"));

    candidates
}

fn load_config() -> WordwalkConfig {
    match WordwalkConfig::load() {
        Ok(config) => config.unwrap_or_default(),
        Err(e) => {
            eprintln!("Warning: {e}. Using defaults.");
            WordwalkConfig::default()
        }
    }
}

fn build_provider(config: &WordwalkConfig) -> Result<LlmWordProvider> {
    if let Some(api) = config.api_config()? {
        tracing::info!(provider = %api.provider(), model = %api.model(), "Provider configured");
        return Ok(LlmWordProvider::new(api));
    }

    let provider = config.provider()?;
    eprintln!(
        "Warning: no API key for {} (set {}). No related words will be generated.",
        provider.display_name(),
        provider.env_var()
    );
    Ok(LlmWordProvider::unconfigured(provider))
}

/// Reads one line of seed words. End of input counts as an empty line.
async fn read_seed_line<R: AsyncRead + Unpin>(input: R) -> Result<String> {
    let mut line = String::new();
    BufReader::new(input).read_line(&mut line).await?;
    Ok(line)
}

/// Drives `work` until it completes or `interrupt` resolves first, in which
/// case `work` is dropped and `Ok(None)` is returned.
async fn until_interrupted<T>(
    work: impl Future<Output = Result<T>>,
    interrupt: impl Future<Output = ()>,
) -> Result<Option<T>> {
    tokio::select! {
        result = work => result.map(Some),
        () = interrupt => Ok(None),
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for Ctrl+C: {e}");
        std::future::pending::<()>().await;
    }
}

fn farewell(outcome: &Outcome) -> String {
    match (&outcome.reason, &outcome.picked) {
        (TerminationReason::NoValidSeeds, _) | (_, None) => NO_VALID_WORDS.to_string(),
        (TerminationReason::EmptySelection, Some(picked)) => {
            format!("{NO_MORE_WORDS}\nPicked words: {}", picked.joined())
        }
        (_, Some(picked)) => format!("Picked words: {}", picked.joined()),
    }
}

async fn run() -> Result<()> {
    let config = load_config();
    let provider = build_provider(&config)?;

    print!("{PROMPT}");
    std::io::stdout().flush()?;
    let input = read_seed_line(tokio::io::stdin()).await?;

    let mut walk = ExplorationLoop::new(
        provider,
        rand::rng(),
        TerminalSelector::new(config.ui_options()),
    )
    .with_max_rounds(config.max_rounds())
    .on_round(|event| {
        if let RoundEvent::Started { .. } = event {
            println!("{GENERATING}");
        }
    });

    let outcome = walk.run(&input).await?;
    println!("{}", farewell(&outcome));
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("An error occurred: {err}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(until_interrupted(run(), ctrl_c()));
    // An interrupted prompt leaves a stdin read parked on a blocking thread.
    runtime.shutdown_background();

    match result {
        Ok(Some(())) => ExitCode::SUCCESS,
        Ok(None) => {
            tracing::info!("Interrupted");
            println!("\n{INTERRUPTED}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err:?}");
            eprintln!("An error occurred: {err}");
            ExitCode::FAILURE
        }
    }
}
