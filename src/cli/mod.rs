//! Terminal front end

pub mod interactive;
pub mod terminal;

pub use interactive::{print_status, prompt_settings};
pub use terminal::TerminalSurface;
