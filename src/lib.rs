//! PiWatch — Pi-hole terminal client
//!
//! A command-line client for Pi-hole v6 DNS filtering appliances,
//! focusing on session-authenticated API access and terminal dashboards.

pub mod cli;
pub mod config;
pub mod pihole;
pub mod render;

use anyhow::Result;

/// Application result type for consistent error handling
pub type AppResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Initialize tracing subscriber for logging
pub fn init_logging(level: &str) -> Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("piwatch={}", level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}
