//! Persisted configuration and the detection record

use super::RepoInfo;
use crate::storage::{LocalStorage, StorageError, CURRENT_REPO, SERVER_URL, TAB_ID};
use crate::utils::ensure_scheme;
use serde::{Deserialize, Serialize};

/// User configuration kept in local storage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_url: Option<String>,
}

impl Configuration {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: Some(server_url.into()),
        }
    }

    /// Read the configuration from storage
    pub fn load(storage: &LocalStorage) -> Result<Self, StorageError> {
        Ok(Self {
            server_url: storage.get(SERVER_URL)?,
        })
    }

    /// The stored server URL, treating blank values as unset
    pub fn server_url(&self) -> Option<&str> {
        self.server_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// The server URL with an explicit scheme, ready to send to
    pub fn endpoint(&self) -> Option<String> {
        self.server_url().map(normalize_server_url)
    }

    pub fn is_configured(&self) -> bool {
        self.server_url().is_some()
    }
}

/// Prefix `https://` when the address lacks an http(s) scheme
pub fn normalize_server_url(raw: &str) -> String {
    ensure_scheme(raw.trim())
}

/// The latest repository announcement and the tab it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionRecord {
    pub current_repo: RepoInfo,
    pub tab_id: i64,
}

impl DetectionRecord {
    pub fn new(current_repo: RepoInfo, tab_id: i64) -> Self {
        Self { current_repo, tab_id }
    }

    /// Write both keys in a single storage call, replacing any previous record
    pub fn store(&self, storage: &LocalStorage) -> Result<(), StorageError> {
        storage
            .batch()
            .put(CURRENT_REPO, &self.current_repo)?
            .put(TAB_ID, &self.tab_id)?
            .commit()
    }

    /// Read the record back; `None` until a repository has been announced
    pub fn load(storage: &LocalStorage) -> Result<Option<Self>, StorageError> {
        let current_repo = storage.get(CURRENT_REPO)?;
        let tab_id = storage.get(TAB_ID)?;

        Ok(match (current_repo, tab_id) {
            (Some(current_repo), Some(tab_id)) => Some(Self { current_repo, tab_id }),
            _ => None,
        })
    }
}
