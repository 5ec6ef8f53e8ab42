//! Messages exchanged between the page, background and popup contexts

use super::RepoInfo;
use serde::{Deserialize, Serialize};

/// A message tagged by its `action` field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Message {
    /// Page script → background: a repository page was loaded
    #[serde(rename = "repoDetected")]
    RepoDetected {
        #[serde(rename = "repoInfo")]
        repo_info: RepoInfo,
    },

    /// Any context → page script: reply with the current `RepoInfo`
    #[serde(rename = "getRepoInfo")]
    GetRepoInfo,

    /// Any action this crate does not know about
    #[serde(other)]
    Unknown,
}

impl Message {
    pub fn action(&self) -> &'static str {
        match self {
            Message::RepoDetected { .. } => "repoDetected",
            Message::GetRepoInfo => "getRepoInfo",
            Message::Unknown => "unknown",
        }
    }
}
