//! Overlay surface drawn on the terminal

use crate::overlay::{OverlayFrame, OverlayState, OverlaySurface, CONNECTION_FAILED_TEXT, UNCONFIGURED_TEXT};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shows a spinner while pending and prints the result once populated
#[derive(Default)]
pub struct TerminalSurface {
    spinner: Option<ProgressBar>,
    printed: bool,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }

    fn start_spinner(&mut self, text: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.magenta} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(text.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl OverlaySurface for TerminalSurface {
    fn render(&mut self, frame: &OverlayFrame) {
        match frame.state {
            OverlayState::Pending => {
                if frame.visible && self.spinner.is_none() {
                    self.start_spinner(&frame.text);
                }
            }
            OverlayState::Populated => {
                self.stop_spinner();
                if !self.printed {
                    let line = if frame.text == UNCONFIGURED_TEXT {
                        format!("⚠️  {}", frame.text).yellow()
                    } else if frame.text == CONNECTION_FAILED_TEXT {
                        format!("❌ {}", frame.text).red()
                    } else {
                        format!("📊 {}", frame.text).green().bold()
                    };
                    println!("{}", line);
                    self.printed = true;
                }
            }
            OverlayState::Fading | OverlayState::Removed => self.stop_spinner(),
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        self.stop_spinner();
    }
}
