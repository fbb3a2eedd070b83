//! Gemini Chat Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod config;
pub mod error;
pub mod gemini;
/// Application state management
///
/// Holds the dependencies injected into every request handler.
pub mod state;
pub mod store;
