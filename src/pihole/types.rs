//! Pi-hole API data types and structures

use serde::{Deserialize, Serialize};

/// Which of the two exact-match domain lists an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Allow,
    Deny,
}

impl ListKind {
    /// Path segment used by the domains endpoints
    pub fn as_path(&self) -> &'static str {
        match self {
            ListKind::Allow => "allow",
            ListKind::Deny => "deny",
        }
    }
}

/// Response envelope for `POST /api/auth`
#[derive(Debug, Deserialize)]
pub struct AuthReply {
    pub session: AuthSession,
}

/// Session payload inside the auth exchange response
#[derive(Debug, Deserialize)]
pub struct AuthSession {
    pub valid: bool,
    #[serde(default)]
    pub sid: Option<String>,
    #[serde(default)]
    pub csrf: Option<String>,
    /// Declared validity window in seconds
    #[serde(default)]
    pub validity: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Statistics snapshot from `GET /api/stats/summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsSummary {
    pub queries: QueryStats,
    pub clients: ClientStats,
    pub gravity: GravityStats,
    /// System load figures when the appliance reports them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<serde_json::Value>,
    /// Server-side processing time, display only
    #[serde(default)]
    pub took: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryStats {
    pub total: u64,
    pub blocked: u64,
    pub percent_blocked: f64,
    #[serde(default)]
    pub unique_domains: u64,
    #[serde(default)]
    pub forwarded: u64,
    #[serde(default)]
    pub cached: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientStats {
    pub active: u64,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GravityStats {
    pub domains_being_blocked: u64,
    #[serde(default)]
    pub last_update: Option<i64>,
}

/// Ranked domain list from `GET /api/stats/top_domains`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopDomainsReply {
    #[serde(default)]
    pub domains: Vec<DomainCount>,
    #[serde(default)]
    pub total_queries: u64,
}

/// A single {label, count} entry, ordered by the remote system
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainCount {
    pub domain: String,
    pub count: u64,
}

/// Ranked client list from `GET /api/stats/top_clients`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopClientsReply {
    #[serde(default)]
    pub clients: Vec<ClientCount>,
    #[serde(default)]
    pub total_queries: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientCount {
    pub ip: String,
    #[serde(default)]
    pub name: Option<String>,
    pub count: u64,
}

impl ClientCount {
    /// Hostname when the appliance resolved one, IP otherwise
    pub fn label(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.ip,
        }
    }
}

/// Query log page from `GET /api/queries`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueriesReply {
    #[serde(default)]
    pub queries: Vec<QueryRecord>,
}

/// One resolved query as reported by the appliance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRecord {
    /// Unix timestamp with fractional seconds
    pub time: f64,
    #[serde(rename = "type", default)]
    pub query_type: Option<String>,
    pub domain: String,
    #[serde(default)]
    pub client: QueryClient,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryClient {
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Blocking state from `GET|POST /api/dns/blocking`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockingStatus {
    /// "enabled" or "disabled"
    pub blocking: String,
    /// Seconds until the state flips back, when time-bounded
    #[serde(default)]
    pub timer: Option<f64>,
}

impl BlockingStatus {
    pub fn is_enabled(&self) -> bool {
        self.blocking == "enabled"
    }
}

/// Body for `POST /api/dns/blocking`
#[derive(Debug, Serialize)]
pub struct BlockingRequest {
    pub blocking: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timer: Option<u64>,
}

/// Domain list page from `GET /api/domains/<kind>/exact`
#[derive(Debug, Clone, Deserialize)]
pub struct DomainListReply {
    #[serde(default)]
    pub domains: Vec<DomainEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DomainEntry {
    pub domain: String,
}

/// Result of the gravity / cache-flush maintenance actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReply {
    #[serde(default)]
    pub success: bool,
}

/// Error types for Pi-hole API operations
#[derive(Debug, thiserror::Error)]
pub enum PiholeError {
    #[error("authentication failed: {message}")]
    Authentication {
        /// Transport status when the exchange itself failed, absent when
        /// the appliance rejected the credentials in a 2xx body
        status: Option<u16>,
        message: String,
    },
    #[error("API error {status} {status_text}: {body}")]
    Api {
        status: u16,
        status_text: String,
        body: String,
    },
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
}
