//! API module
//!
//! Contains the HTTP request handlers, the inbound rate limiter and the
//! router that ties them together.

pub mod chat;
pub mod history;
pub mod prompts;
pub mod rate_limit;
pub mod router;
pub mod utils;

pub use router::build_router;
