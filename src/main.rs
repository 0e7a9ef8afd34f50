//! PageLens main entry point
//!
//! This is the command-line interface for the PageLens single-page scraper.

use anyhow::Context;
use clap::Parser;
use pagelens::config::{load_config, resolve_runtime, Config};
use pagelens::{LensError, ScrapeFailure, ScrapeRequest, ScrapeResult, Scraper};
use serde::Serialize;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// PageLens: scrape one web page into structured JSON
///
/// PageLens fetches the page over plain HTTP first and falls back to a
/// headless browser for pages that are blocked or rendered by JavaScript.
/// With a prompt, it also asks an AI service to summarize the content.
#[derive(Parser, Debug)]
#[command(name = "pagelens")]
#[command(version)]
#[command(about = "Scrape a single web page into structured JSON", long_about = None)]
struct Cli {
    /// URL of the page to scrape
    #[arg(value_name = "URL", required_unless_present = "input", conflicts_with = "input")]
    url: Option<String>,

    /// Ask for an AI summary using this prompt
    #[arg(short, long)]
    prompt: Option<String>,

    /// Read the input record ({"url": ..., "prompt": ...}) from a JSON file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the result to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the JSON record.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("pagelens=info,warn"),
            1 => EnvFilter::new("pagelens=debug,info"),
            2 => EnvFilter::new("pagelens=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Runs one scrape; every fault past argument parsing ends in a JSON record
async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let request = match read_request(&cli) {
        Ok(request) => request,
        Err(e) => {
            let failure = internal_failure("", "Could not read the input record", &e);
            return report(&failure, cli.pretty);
        }
    };

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(config) => config,
                Err(e) => {
                    let context = format!("Failed to load {}", path.display());
                    let failure = internal_failure(&request.url, &context, &e);
                    return report(&failure, cli.pretty);
                }
            }
        }
        None => Config::default(),
    };

    let runtime = resolve_runtime(config.browser.runtime, |key| std::env::var(key).ok());
    tracing::debug!("Runtime environment: {:?}", runtime);

    let scraper = match Scraper::from_config(&config, runtime) {
        Ok(scraper) => scraper,
        Err(e) => {
            let failure = internal_failure(&request.url, "Failed to set up the scraper", &e);
            return report(&failure, cli.pretty);
        }
    };

    match scraper.scrape(&request).await {
        Ok(result) => match deliver(&result, cli.output.as_deref(), cli.pretty) {
            Ok(()) => Ok(ExitCode::SUCCESS),
            Err(e) => {
                let failure = internal_failure(&request.url, "Failed to deliver the result", &e);
                report(&failure, cli.pretty)
            }
        },
        Err(failure) => report(&failure, cli.pretty),
    }
}

/// Logs a fault outside the scrape pipeline and builds the generic record
///
/// The cause only goes to the log; the record carries no detail.
fn internal_failure(url: &str, context: &str, error: &dyn Display) -> ScrapeFailure {
    tracing::error!("{}: {}", context, error);
    ScrapeFailure::internal(url)
}

/// Prints a failure record to stdout and picks the matching exit code
fn report(failure: &ScrapeFailure, pretty: bool) -> anyhow::Result<ExitCode> {
    print_json(failure, pretty).context("Failed to print the failure record")?;
    Ok(ExitCode::from(exit_status(failure)))
}

/// Writes the result to `output`, or to stdout without one
fn deliver(result: &ScrapeResult, output: Option<&Path>, pretty: bool) -> Result<(), LensError> {
    let json = to_json(result, pretty)?;
    match output {
        Some(path) => write_output(path, &json),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

/// Builds the request from `--input` or the positional URL
///
/// `--prompt` overrides any prompt in the input file.
fn read_request(cli: &Cli) -> Result<ScrapeRequest, LensError> {
    let mut request = match (&cli.input, &cli.url) {
        (Some(path), _) => {
            let content = std::fs::read_to_string(path)?;
            serde_json::from_str::<ScrapeRequest>(&content)?
        }
        (None, Some(url)) => ScrapeRequest::new(url.as_str()),
        (None, None) => ScrapeRequest::new(""),
    };

    if let Some(prompt) = &cli.prompt {
        request.prompt = Some(prompt.clone());
    }

    Ok(request)
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String, LensError> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<(), LensError> {
    println!("{}", to_json(value, pretty)?);
    Ok(())
}

fn write_output(path: &Path, json: &str) -> Result<(), LensError> {
    std::fs::write(path, json)?;
    tracing::info!("Result written to: {}", path.display());
    Ok(())
}

/// 1 for caller faults, 2 for everything else
fn exit_status(failure: &ScrapeFailure) -> u8 {
    match failure.status() {
        400..=499 => 1,
        _ => 2,
    }
}
