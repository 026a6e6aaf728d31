//! # API Module
//!
//! This module contains the HTTP handlers for the agent's server mode.
//!
//! ## Available Endpoints
//!
//! - `POST /api/chat` - run one agent turn over a posted conversation
//! - `GET /api/models` - catalog of available Gaia model domains
//! - `GET /api/health` - liveness probe

pub mod chat;
pub mod health;
pub mod models;
