//! Repository line counter
//!
//! A library for detecting source-code repository pages, asking a remote
//! counting server for the repository's total lines of code, and showing the
//! figure in a transient overlay. The page script, background coordinator and
//! settings panel are independent contexts that only share [`storage`] and
//! [`messaging`] channels.

pub mod models;
pub mod parser;
pub mod storage;
pub mod messaging;
pub mod background;
pub mod client;
pub mod overlay;
pub mod page;
pub mod settings;
pub mod utils;
#[cfg(feature = "cli")]
pub mod cli;

pub use models::{Configuration, DetectionRecord, Message, RepoInfo, Repository};
pub use parser::{extract_repo_info, RepoExtractor};
pub use storage::LocalStorage;
pub use background::BackgroundCoordinator;
pub use client::{LineCountClient, LineCountOutcome};
pub use page::{Page, PageOutcome, PageScript, Timings};
pub use settings::SettingsPanel;

use anyhow::{Context, Result};
use overlay::OverlaySurface;

/// Main entry point: load `page` with a background coordinator attached to
/// `storage`, and render the overlay on `surface`
pub async fn run_page(
    page: Page,
    storage: LocalStorage,
    options: PageOptions,
    surface: &mut dyn OverlaySurface,
) -> Result<PageOutcome> {
    let client = LineCountClient::new().context("Failed to build HTTP client")?;
    let (runtime, inbox) = messaging::channel();
    let background = tokio::spawn(BackgroundCoordinator::new(storage.clone()).run(inbox));

    let mut script = PageScript::new(page, storage, runtime, client)
        .with_extractor(RepoExtractor::new(&options.host))
        .with_timings(options.timings);
    if let Some(metadata) = options.metadata {
        script = script.with_metadata(metadata);
    }

    let outcome = script.run(surface).await;

    // Closing the last port lets the coordinator drain and stop
    drop(script);
    background.await.context("Background coordinator panicked")?;

    Ok(outcome)
}

#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Hosting site to recognise
    pub host: String,
    pub timings: Timings,
    /// Overrides the metadata scraped from the page markup
    pub metadata: Option<parser::FixedMetadata>,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            host: parser::DEFAULT_HOST.to_string(),
            timings: Timings::default(),
            metadata: None,
        }
    }
}
