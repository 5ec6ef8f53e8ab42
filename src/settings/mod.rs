//! Settings panel: edits the counting server URL

use crate::models::Configuration;
use crate::page::Timings;
use crate::storage::{LocalStorage, SERVER_URL};
use std::fmt;
use std::time::Duration;
use tracing::{error, warn};

pub const EMPTY_INPUT_TEXT: &str = "请输入服务器地址";
pub const SAVED_TEXT: &str = "配置已保存";
pub const SAVE_FAILED_TEXT: &str = "保存失败";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Success => write!(f, "success"),
            StatusKind::Error => write!(f, "error"),
        }
    }
}

/// Transient status line shown under the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
    /// Hide the message after this long
    pub dismiss_after: Duration,
}

impl StatusMessage {
    pub fn is_error(&self) -> bool {
        self.kind == StatusKind::Error
    }

    /// Class list of the status element, e.g. `status success`
    pub fn css_class(&self) -> String {
        format!("status {}", self.kind)
    }
}

#[derive(Debug, Clone)]
pub struct SettingsPanel {
    storage: LocalStorage,
    status_dismiss: Duration,
}

impl SettingsPanel {
    pub fn new(storage: LocalStorage) -> Self {
        Self {
            storage,
            status_dismiss: Timings::default().status_dismiss,
        }
    }

    /// Take the status auto-dismiss delay from `timings`
    pub fn with_timings(mut self, timings: Timings) -> Self {
        self.status_dismiss = timings.status_dismiss;
        self
    }

    /// Value to pre-fill the input with; empty when nothing is stored
    pub fn load(&self) -> String {
        match Configuration::load(&self.storage) {
            Ok(config) => config.server_url.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not read stored server URL");
                String::new()
            }
        }
    }

    /// Persist the input. Blank input leaves the stored value untouched.
    pub fn save(&self, input: &str) -> StatusMessage {
        let server_url = input.trim();
        if server_url.is_empty() {
            return self.status(StatusKind::Error, EMPTY_INPUT_TEXT);
        }

        match self.storage.set(SERVER_URL, &server_url.to_string()) {
            Ok(()) => self.status(StatusKind::Success, SAVED_TEXT),
            Err(e) => {
                error!(error = %e, "failed to save server URL");
                self.status(StatusKind::Error, SAVE_FAILED_TEXT)
            }
        }
    }

    fn status(&self, kind: StatusKind, text: &str) -> StatusMessage {
        StatusMessage {
            kind,
            text: text.to_string(),
            dismiss_after: self.status_dismiss,
        }
    }
}
