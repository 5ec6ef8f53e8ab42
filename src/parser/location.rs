//! Repository detection from the page location

use crate::models::{RepoInfo, Repository};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Host recognised when none is configured
pub const DEFAULT_HOST: &str = "github.com";

/// Cached extractor for the default host
static DEFAULT_EXTRACTOR: OnceLock<RepoExtractor> = OnceLock::new();

/// Matches `[scheme://][www.]host/<owner>/<repo>` and captures the two segments
#[derive(Debug, Clone)]
pub struct RepoExtractor {
    host: String,
    pattern: Regex,
}

impl RepoExtractor {
    pub fn new(host: &str) -> Self {
        let host = host.trim().trim_end_matches('/').to_lowercase();
        let pattern = Regex::new(&format!(
            r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?(?i:www\.)?(?i:{})/+([^/?#]+)/+([^/?#]+)",
            regex::escape(&host)
        ))
        .expect("escaped host always forms a valid pattern");

        Self { host, pattern }
    }

    /// Inspect a page URL. Pure: only the string is examined.
    pub fn extract(&self, url: &str) -> RepoInfo {
        let url = url.trim();

        match self.pattern.captures(url) {
            Some(caps) => {
                let repo = Repository::new(&self.host, &caps[1], &caps[2]);
                debug!(url, repo = %repo, "repository page detected");
                RepoInfo::Detected(repo)
            }
            None => {
                debug!(url, "not a repository page");
                RepoInfo::NotARepo
            }
        }
    }
}

impl Default for RepoExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_HOST)
    }
}

/// Inspect a URL against the default host
pub fn extract_repo_info(url: &str) -> RepoInfo {
    DEFAULT_EXTRACTOR
        .get_or_init(RepoExtractor::default)
        .extract(url)
}
