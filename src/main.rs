//! Takeout Harvester main entry point
//!
//! This is the command-line interface for the Takeout Harvester.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use takeout_harvester::bridge::{status_for, PageAgent, Request, Response};
use takeout_harvester::config::{load_config_or_default, Config};
use takeout_harvester::dispatcher::{BatchDispatcher, LoggingTrigger, TriggerOutcome};
use takeout_harvester::page::{build_http_client, load_page, PageSnapshot, PageSource};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Takeout Harvester: bulk downloader for Google Takeout archives
///
/// Reads a saved copy of the Takeout archive page (or fetches one), finds
/// the archive download buttons, tells downloaded and pending archives apart,
/// and triggers the pending downloads one interval apart.
#[derive(Parser, Debug)]
#[command(name = "takeout-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Bulk downloader for Google Takeout archives", long_about = None)]
struct Cli {
    /// Saved archive page (HTML file) or its http(s) URL
    #[arg(value_name = "PAGE")]
    page: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List download links (default)
    #[arg(long, conflicts_with_all = ["highlight", "download_all", "request"])]
    find: bool,

    /// Highlight download links and report how many
    #[arg(long, conflicts_with_all = ["find", "download_all", "request"])]
    highlight: bool,

    /// Trigger every download that has not been fetched yet
    #[arg(long, conflicts_with_all = ["find", "highlight", "request"])]
    download_all: bool,

    /// Run a raw bridge request, e.g. '{"action":"findLinks"}'
    #[arg(long, value_name = "JSON", conflicts_with_all = ["find", "highlight", "download_all"])]
    request: Option<String>,

    /// Print the bridge response as JSON
    #[arg(long)]
    json: bool,

    /// Refuse pages that are not the Takeout archive page
    #[arg(long)]
    strict: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match load_config_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let request = match &cli.request {
        Some(json) => Request::from_json(json)?,
        None if cli.highlight => Request::HighlightLinks,
        None if cli.download_all => Request::DownloadAll,
        None => Request::FindLinks,
    };

    let client = build_http_client()?;
    let source = PageSource::from_arg(&cli.page);
    let mut page = match load_page(&source, &client, &config.page).await {
        Ok(page) => page,
        Err(e) => {
            tracing::error!("Failed to load page: {}", e);
            return Err(e.into());
        }
    };

    handle_request(&config, &mut page, request, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("takeout_harvester=info,warn"),
            1 => EnvFilter::new("takeout_harvester=debug,info"),
            2 => EnvFilter::new("takeout_harvester=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Runs the request against the loaded page and reports the result
async fn handle_request(
    config: &Config,
    page: &mut PageSnapshot,
    request: Request,
    cli: &Cli,
) -> Result<(), Box<dyn std::error::Error>> {
    let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
    let dispatcher =
        BatchDispatcher::new(&config.dispatcher, Arc::new(LoggingTrigger)).with_outcomes(outcome_tx);
    let agent = PageAgent::new(config, dispatcher);

    let page_status = agent.page_status(page);
    if cli.strict {
        agent.check_page(page)?;
    } else if !cli.quiet && !cli.json {
        println!("{}", page_status);
    }

    if request != Request::HighlightLinks {
        agent.on_load(page);
    }

    let response = agent.handle(page, request);

    if cli.json {
        println!("{}", response.to_json()?);
    } else {
        print_response(request, &response);
    }

    if request == Request::DownloadAll {
        let reporter = tokio::spawn(report_outcomes(outcome_rx, cli.json));
        agent.wait_for_downloads().await;
        // The dispatcher holds the last sender; the outcome stream ends here
        drop(agent);
        let failed = reporter.await?;
        if failed > 0 {
            tracing::warn!("{} download(s) could not be started", failed);
        }
    }

    Ok(())
}

/// Prints the status line and, for `findLinks`, the link table
fn print_response(request: Request, response: &Response) {
    println!("{}", status_for(request, response));

    if let Response::Links(found) = response {
        for (index, link) in found.links.iter().enumerate() {
            let mark = if link.downloaded { "✓" } else { " " };
            println!("  [{}] {:>3}. {} -> {}", mark, index + 1, link.text, link.url);
        }
    }
}

/// Prints each trigger outcome as it arrives; returns the number that failed
async fn report_outcomes(mut outcomes: mpsc::UnboundedReceiver<TriggerOutcome>, json: bool) -> usize {
    let mut failed = 0;

    while let Some(outcome) = outcomes.recv().await {
        match outcome.result {
            Ok(url) if !json => println!("  → {}", url),
            Ok(_) => {}
            Err(e) => {
                failed += 1;
                tracing::error!("Task {}: {}", outcome.task.0, e);
            }
        }
    }

    failed
}
