//! Session credential lifecycle
//!
//! A session is created by the auth exchange and lives until its declared
//! validity window runs out. Expiry is evaluated lazily on each operation;
//! there is no background timer and no logout path.

use std::time::{Duration, Instant};

/// Safety margin before declared expiry at which a session counts as stale
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Session lifecycle state as observed by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No token held
    Unauthenticated,
    /// Token held, more than the safety margin away from expiry
    Authenticated,
    /// Token held, within the safety margin; next operation re-authenticates
    Expiring,
}

/// A live session credential returned by the auth exchange
#[derive(Debug, Clone)]
pub struct Session {
    /// Session token, attached to every authenticated call
    pub sid: String,
    /// Anti-forgery token; held but not attached to outbound requests
    pub csrf: String,
    /// Absolute expiry instant, computed as now + declared validity
    pub expires_at: Instant,
}

impl Session {
    pub fn new(sid: String, csrf: String, validity: Duration) -> Self {
        Self {
            sid,
            csrf,
            expires_at: Instant::now() + validity,
        }
    }

    /// Whether the session is within the safety margin of expiry.
    ///
    /// Inclusive: at exactly 60 seconds remaining the session is stale.
    pub fn is_stale(&self) -> bool {
        self.remaining() <= EXPIRY_MARGIN
    }

    /// Time left before declared expiry, zero once past it
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn state(&self) -> SessionState {
        if self.is_stale() {
            SessionState::Expiring
        } else {
            SessionState::Authenticated
        }
    }
}
