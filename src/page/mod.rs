//! Page script: runs once per page load on the hosting site

use crate::client::{LineCountClient, LineCountOutcome};
use crate::messaging::{Inbox, MessageSender, Port};
use crate::models::{Configuration, Message, RepoInfo, Repository};
use crate::overlay::{Overlay, OverlaySurface};
use crate::parser::{collect_metadata, LayeredMetadata, PageMetadataProvider, RepoExtractor};
use crate::storage::LocalStorage;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Delays used by the page script, overlay and settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Wait after page load before the overlay appears
    pub startup_delay: Duration,
    pub fade_in_delay: Duration,
    /// How long the result stays up once it arrives
    pub display_window: Duration,
    pub fade_duration: Duration,
    /// Auto-dismiss delay of settings panel status messages
    pub status_dismiss: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            startup_delay: Duration::from_millis(1000),
            fade_in_delay: Duration::from_millis(100),
            display_window: Duration::from_millis(5000),
            fade_duration: Duration::from_millis(300),
            status_dismiss: Duration::from_millis(2000),
        }
    }
}

impl Timings {
    /// No waiting at all
    pub fn immediate() -> Self {
        Self {
            startup_delay: Duration::ZERO,
            fade_in_delay: Duration::ZERO,
            display_window: Duration::ZERO,
            fade_duration: Duration::ZERO,
            status_dismiss: Duration::ZERO,
        }
    }
}

/// The page being looked at
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    pub html: String,
    pub tab_id: i64,
}

impl Page {
    pub fn new(url: impl Into<String>, html: impl Into<String>, tab_id: i64) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
            tab_id,
        }
    }
}

/// How a page load ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Nothing to do on this page
    NotARepo,
    Displayed {
        repo: Repository,
        outcome: LineCountOutcome,
    },
}

pub struct PageScript {
    page: Page,
    extractor: RepoExtractor,
    metadata: Box<dyn PageMetadataProvider>,
    storage: LocalStorage,
    runtime: Port,
    client: LineCountClient,
    timings: Timings,
}

impl PageScript {
    /// `runtime` is the port to the background coordinator
    pub fn new(page: Page, storage: LocalStorage, runtime: Port, client: LineCountClient) -> Self {
        let metadata = Box::new(LayeredMetadata::for_html(&page.html));
        Self {
            page,
            extractor: RepoExtractor::default(),
            metadata,
            storage,
            runtime,
            client,
            timings: Timings::default(),
        }
    }

    pub fn with_extractor(mut self, extractor: RepoExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_metadata(mut self, provider: impl PageMetadataProvider + 'static) -> Self {
        self.metadata = Box::new(provider);
        self
    }

    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.timings = timings;
        self
    }

    /// Current repository info, with stars and language when it is a repo
    pub fn repo_info(&self) -> RepoInfo {
        match self.extractor.extract(&self.page.url) {
            RepoInfo::Detected(repo) => RepoInfo::Detected(collect_metadata(repo, self.metadata.as_ref())),
            RepoInfo::NotARepo => RepoInfo::NotARepo,
        }
    }

    /// One page load: announce, fetch, show the overlay
    pub async fn run(&self, surface: &mut dyn OverlaySurface) -> PageOutcome {
        let Some(repo) = self.repo_info().into_repository() else {
            return PageOutcome::NotARepo;
        };

        self.announce(&repo);
        sleep(self.timings.startup_delay).await;

        let outcome = Overlay::present(surface, self.timings, self.fetch_line_count(&repo)).await;
        PageOutcome::Displayed { repo, outcome }
    }

    /// Answer `getRepoInfo` requests until every port is dropped
    pub async fn serve(&self, mut inbox: Inbox) {
        while let Some(envelope) = inbox.recv().await {
            if envelope.message != Message::GetRepoInfo {
                debug!(action = envelope.message.action(), "page script ignoring message");
                continue;
            }
            if !envelope.respond(self.repo_info()) {
                debug!("getRepoInfo requester went away");
            }
        }
    }

    fn announce(&self, repo: &Repository) {
        let message = Message::RepoDetected {
            repo_info: RepoInfo::Detected(repo.clone()),
        };
        if let Err(e) = self.runtime.send(message, MessageSender::tab(self.page.tab_id)) {
            warn!(error = %e, "could not announce repository");
        }
    }

    async fn fetch_line_count(&self, repo: &Repository) -> LineCountOutcome {
        match Configuration::load(&self.storage) {
            Ok(config) => self.client.count_lines(&config, repo).await,
            Err(e) => {
                warn!(error = %e, "could not read configuration");
                LineCountOutcome::Unavailable
            }
        }
    }
}
