//! Core data models shared by every context

pub mod repo;
pub mod config;
pub mod message;

pub use repo::*;
pub use config::*;
pub use message::*;
