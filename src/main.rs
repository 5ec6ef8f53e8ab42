//! Repo Lines CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use repo_lines::cli::{print_status, prompt_settings, TerminalSurface};
use repo_lines::messaging::{self, MessageSender};
use repo_lines::parser::{FixedMetadata, DEFAULT_HOST};
use repo_lines::{
    Configuration, DetectionRecord, LineCountClient, LineCountOutcome, LocalStorage, Message, Page,
    PageOptions, PageOutcome, PageScript, RepoExtractor, SettingsPanel, Timings,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "repo-lines")]
#[command(about = "Show the total lines of code of a repository page", long_about = None)]
#[command(version)]
struct Cli {
    /// Local storage file shared by all commands
    #[arg(long, global = true, env = "REPO_LINES_STORE")]
    store: Option<PathBuf>,

    /// Repository hosting site to recognise
    #[arg(long, global = true, default_value = DEFAULT_HOST)]
    host: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the repository info a page script would report for a page
    Detect {
        /// Page URL
        #[arg(short, long)]
        url: String,

        /// Saved HTML of the page, for stars and language
        #[arg(long)]
        html: Option<PathBuf>,
    },

    /// Load a page: announce it, fetch its line count and show the overlay
    Count {
        /// Page URL
        #[arg(short, long)]
        url: String,

        /// Saved HTML of the page, for stars and language
        #[arg(long)]
        html: Option<PathBuf>,

        /// Tab id recorded with the detection
        #[arg(long, default_value_t = 1)]
        tab_id: i64,

        /// Star count to send instead of scraping the page
        #[arg(long)]
        stars: Option<String>,

        /// Language to send instead of scraping the page
        #[arg(long)]
        language: Option<String>,

        /// Use the browser's delays (startup, fade, 5s display window)
        #[arg(long)]
        animate: bool,

        /// Print the per-extension breakdown returned by the server
        #[arg(long)]
        details: bool,
    },

    /// Configure the counting server URL
    Settings {
        /// Save this URL without prompting
        #[arg(long)]
        server_url: Option<String>,
    },

    /// Show the last detected repository and its tab
    Record,

    /// Check that the configured counting server is up
    Ping,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr, filtered by `RUST_LOG` (default `warn`)
fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let store_path = match cli.store {
        Some(path) => path,
        None => default_store_path()?,
    };
    let storage = LocalStorage::file(&store_path);

    match cli.command {
        Commands::Detect { url, html } => {
            let html = read_html(html.as_deref())?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to initialize async runtime")?;
            runtime.block_on(detect(&cli.host, url, html, storage))
        }

        Commands::Count {
            url,
            html,
            tab_id,
            stars,
            language,
            animate,
            details,
        } => {
            let html = read_html(html.as_deref())?;
            let metadata = (stars.is_some() || language.is_some()).then_some(FixedMetadata { stars, language });
            let options = PageOptions {
                host: cli.host,
                timings: if animate { Timings::default() } else { Timings::immediate() },
                metadata,
            };

            let runtime = tokio::runtime::Runtime::new().context("Failed to initialize async runtime")?;
            let mut surface = TerminalSurface::new();
            let outcome = runtime.block_on(repo_lines::run_page(
                Page::new(url, html, tab_id),
                storage,
                options,
                &mut surface,
            ))?;

            print_outcome(&outcome, details);
            Ok(())
        }

        Commands::Settings { server_url } => {
            let panel = SettingsPanel::new(storage).with_timings(Timings::default());
            let status = match server_url {
                Some(server_url) => panel.save(&server_url),
                None => prompt_settings(&panel)?,
            };
            print_status(&status);
            if status.is_error() {
                std::process::exit(1);
            }
            Ok(())
        }

        Commands::Record => {
            match DetectionRecord::load(&storage)? {
                Some(record) => {
                    println!("{}", "📌 Last detected repository".bold().blue());
                    println!("  - Tab: {}", record.tab_id);
                    println!("{}", serde_json::to_string_pretty(&record.current_repo)?);
                }
                None => println!("{}", "No repository detected yet.".yellow()),
            }
            Ok(())
        }

        Commands::Ping => {
            let config = Configuration::load(&storage)?;
            let runtime = tokio::runtime::Runtime::new().context("Failed to initialize async runtime")?;
            let client = LineCountClient::new()?;

            let health = runtime.block_on(client.health(&config))?;
            if health.is_ok() {
                println!(
                    "{} {}",
                    "✅ Server is up:".green().bold(),
                    health.service.as_deref().unwrap_or("unknown service")
                );
                Ok(())
            } else {
                anyhow::bail!("Server reported status '{}'", health.status)
            }
        }
    }
}

/// Answer a `getRepoInfo` request through a serving page script
async fn detect(host: &str, url: String, html: String, storage: LocalStorage) -> Result<()> {
    let (runtime, _background) = messaging::channel();
    let script = PageScript::new(Page::new(url, html, 0), storage, runtime, LineCountClient::new()?)
        .with_extractor(RepoExtractor::new(host));

    let (port, inbox) = messaging::channel();
    let request = async move {
        let reply = port.request(Message::GetRepoInfo, MessageSender::extension()).await;
        drop(port);
        reply
    };
    let (reply, ()) = tokio::join!(request, script.serve(inbox));

    println!("{}", serde_json::to_string_pretty(&reply?)?);
    Ok(())
}

fn print_outcome(outcome: &PageOutcome, details: bool) {
    match outcome {
        PageOutcome::NotARepo => {
            println!("{}", "ℹ️  Not a repository page, nothing to do.".dimmed());
        }
        PageOutcome::Displayed { repo, outcome } => {
            println!();
            println!("Repository: {}", repo.full_name().bold());
            println!("  - URL: {}", repo.url);
            println!("  - Stars: {}", repo.stars.as_deref().unwrap_or("N/A"));
            println!("  - Language: {}", repo.language.as_deref().unwrap_or("N/A"));

            if let (true, LineCountOutcome::Counted(report)) = (details, outcome) {
                if !report.file_stats.is_empty() {
                    println!();
                    println!("{}", "Breakdown:".bold());
                    for (ext, stat) in &report.file_stats {
                        println!(
                            "  - {:<8} {:<20} {:>6} files {:>10} lines",
                            ext, stat.language, stat.files, stat.lines
                        );
                    }
                }
            }
        }
    }
}

fn read_html(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read HTML file {}", path.display())),
        None => Ok(String::new()),
    }
}

fn default_store_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(dir.join("repo-lines").join("storage.json"))
}
