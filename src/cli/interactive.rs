//! Interactive settings prompt

use crate::settings::{SettingsPanel, StatusKind, StatusMessage};
use anyhow::Result;
use colored::*;
use dialoguer::{theme::ColorfulTheme, Input};

/// Ask for the server URL, pre-filled with the stored value, and save it
pub fn prompt_settings(panel: &SettingsPanel) -> Result<StatusMessage> {
    println!("{}", "Repo Lines Settings".bold().blue());
    println!("{}", "=".repeat(50).blue());
    println!();

    let current = panel.load();
    let input: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Counting server URL")
        .with_initial_text(current)
        .allow_empty(true)
        .interact_text()?;

    Ok(panel.save(&input))
}

/// Print a settings status line in the colour of its kind
pub fn print_status(status: &StatusMessage) {
    let line = match status.kind {
        StatusKind::Success => format!("✅ {}", status.text).green(),
        StatusKind::Error => format!("❌ {}", status.text).red(),
    };
    println!("{}", line);
}
