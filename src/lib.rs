// src/lib.rs

use std::sync::Arc;

// Re-export modules
pub mod agent;
pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod tools;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: config::Config,
    /// The agent core driving chat completions and tool dispatch
    pub agent: Arc<agent::Agent>,
}
