//! Repository identity extracted from a hosting page

use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used when a page does not expose stars or language
pub const NOT_AVAILABLE: &str = "N/A";

/// A detected repository page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub owner: String,
    pub repo: String,
    /// Canonical `https://host/owner/repo`
    pub url: String,
    /// `url` with a `.git` suffix
    pub clone_url: String,
    pub stars: Option<String>,
    pub language: Option<String>,
}

impl Repository {
    pub fn new(host: &str, owner: impl Into<String>, repo: impl Into<String>) -> Self {
        let owner = owner.into();
        let repo = repo.into();
        let url = format!("https://{}/{}/{}", host, owner, repo);
        let clone_url = format!("{}.git", url);

        Self {
            owner,
            repo,
            url,
            clone_url,
            stars: None,
            language: None,
        }
    }

    pub fn with_stars(mut self, stars: impl Into<String>) -> Self {
        self.stars = Some(stars.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// `owner/repo`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

/// Result of inspecting a page. Serializes to the `{ isRepo, owner, ... }`
/// object shared between contexts; a non-repo page is exactly `{"isRepo":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "RepoInfoRecord", try_from = "RepoInfoRecord")]
pub enum RepoInfo {
    Detected(Repository),
    NotARepo,
}

impl RepoInfo {
    pub fn is_repo(&self) -> bool {
        matches!(self, RepoInfo::Detected(_))
    }

    pub fn repository(&self) -> Option<&Repository> {
        match self {
            RepoInfo::Detected(repo) => Some(repo),
            RepoInfo::NotARepo => None,
        }
    }

    pub fn into_repository(self) -> Option<Repository> {
        match self {
            RepoInfo::Detected(repo) => Some(repo),
            RepoInfo::NotARepo => None,
        }
    }
}

impl From<Repository> for RepoInfo {
    fn from(repo: Repository) -> Self {
        RepoInfo::Detected(repo)
    }
}

/// Flat wire form of [`RepoInfo`]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RepoInfoRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    clone_url: Option<String>,
    is_repo: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stars: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    language: Option<String>,
}

impl From<RepoInfo> for RepoInfoRecord {
    fn from(info: RepoInfo) -> Self {
        match info {
            RepoInfo::Detected(repo) => RepoInfoRecord {
                owner: Some(repo.owner),
                repo: Some(repo.repo),
                url: Some(repo.url),
                clone_url: Some(repo.clone_url),
                is_repo: true,
                stars: repo.stars,
                language: repo.language,
            },
            RepoInfo::NotARepo => RepoInfoRecord::default(),
        }
    }
}

impl TryFrom<RepoInfoRecord> for RepoInfo {
    type Error = String;

    fn try_from(record: RepoInfoRecord) -> Result<Self, Self::Error> {
        if !record.is_repo {
            return Ok(RepoInfo::NotARepo);
        }

        match (record.owner, record.repo, record.url, record.clone_url) {
            (Some(owner), Some(repo), Some(url), Some(clone_url)) => {
                Ok(RepoInfo::Detected(Repository {
                    owner,
                    repo,
                    url,
                    clone_url,
                    stars: record.stars,
                    language: record.language,
                }))
            }
            _ => Err("repo info with isRepo=true must carry owner, repo, url and cloneUrl".to_string()),
        }
    }
}
