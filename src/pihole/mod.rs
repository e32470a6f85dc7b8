//! Pi-hole API integration module
//!
//! Handles the auth exchange, session lifecycle, and REST API calls.

pub mod client;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use client::PiholeClient;
pub use session::{Session, SessionState};
pub use types::*;
