//! Pi-hole REST API client implementation
//!
//! Owns the shared secret and a live session token, re-authenticating
//! transparently whenever the token is absent or inside the expiry margin.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::config::ApiConfig;

use super::session::{Session, SessionState};
use super::types::{
    ActionReply, AuthReply, BlockingRequest, BlockingStatus, DomainListReply, ListKind,
    PiholeError, QueriesReply, StatsSummary, TopClientsReply, TopDomainsReply,
};

/// Validity window assumed when the auth exchange omits one
const DEFAULT_VALIDITY_SECS: i64 = 300;

/// Pi-hole REST API client
///
/// One live session per instance. Concurrent operations each evaluate the
/// staleness check independently and may trigger redundant auth exchanges;
/// the last writer wins on the session slot and every exchange yields an
/// interchangeable token, so the race is accepted rather than locked out.
pub struct PiholeClient {
    base_url: String,
    password: String,
    client: reqwest::Client,
    session: RwLock<Option<Session>>,
}

impl PiholeClient {
    /// Create a client from API configuration, normalizing the base URL
    pub fn new(config: ApiConfig) -> Result<Self, PiholeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            password: config.password,
            client,
            session: RwLock::new(None),
        })
    }

    /// Current session lifecycle state
    pub async fn session_state(&self) -> SessionState {
        match self.session.read().await.as_ref() {
            None => SessionState::Unauthenticated,
            Some(session) => session.state(),
        }
    }

    /// Perform the auth exchange and return the resulting session
    async fn authenticate(&self) -> Result<Session, PiholeError> {
        let url = format!("{}/api/auth", self.base_url);
        debug!("Authenticating against {}", url);

        let response = self
            .client
            .post(&url)
            .json(&json!({ "password": self.password }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PiholeError::Authentication {
                status: Some(status.as_u16()),
                message: if body.is_empty() {
                    status.to_string()
                } else {
                    body
                },
            });
        }

        let reply: AuthReply = serde_json::from_str(&response.text().await?)?;
        let session = reply.session;

        if !session.valid {
            return Err(PiholeError::Authentication {
                status: None,
                message: session
                    .message
                    .unwrap_or_else(|| "invalid credentials".to_string()),
            });
        }

        let sid = session.sid.ok_or_else(|| PiholeError::Authentication {
            status: None,
            message: "auth exchange returned no session token".to_string(),
        })?;

        let validity = session.validity.unwrap_or(DEFAULT_VALIDITY_SECS).max(0) as u64;
        info!("Session established, valid for {}s", validity);

        Ok(Session::new(
            sid,
            session.csrf.unwrap_or_default(),
            Duration::from_secs(validity),
        ))
    }

    /// Ensure a non-stale session is held and return its token.
    ///
    /// This is the single suspension point where auth I/O happens before
    /// the real request. The check and the store are deliberately separate
    /// lock scopes; see the struct-level note on the accepted race.
    async fn ensure_session(&self) -> Result<String, PiholeError> {
        {
            let guard = self.session.read().await;
            if let Some(session) = guard.as_ref() {
                if !session.is_stale() {
                    return Ok(session.sid.clone());
                }
                debug!("Session within expiry margin, re-authenticating");
            }
        }

        let session = self.authenticate().await?;
        let sid = session.sid.clone();
        *self.session.write().await = Some(session);
        Ok(sid)
    }

    /// Issue an authenticated request and return the raw response
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<reqwest::Response, PiholeError> {
        let sid = self.ensure_session().await?;
        let url = format!("{}{}", self.base_url, path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json")
            .header("X-FTL-SID", sid);

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            // Read the body fully so remote diagnostic text is not lost
            let body = response.text().await.unwrap_or_default();
            return Err(PiholeError::Api {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            });
        }

        Ok(response)
    }

    /// Issue an authenticated request and decode the JSON body
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, PiholeError> {
        let response = self.send(method, path, body).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fetch the appliance-wide statistics snapshot
    pub async fn summary(&self) -> Result<StatsSummary, PiholeError> {
        self.request(Method::GET, "/api/stats/summary", None).await
    }

    /// Fetch the top blocked or permitted domains.
    ///
    /// The count is passed through verbatim, zero and negatives included;
    /// the appliance's behavior governs.
    pub async fn top_domains(
        &self,
        blocked: bool,
        count: Option<i64>,
    ) -> Result<TopDomainsReply, PiholeError> {
        let path = format!(
            "/api/stats/top_domains?blocked={}&count={}",
            blocked,
            count.unwrap_or(10)
        );
        self.request(Method::GET, &path, None).await
    }

    /// Fetch the top clients by query count
    pub async fn top_clients(&self, count: Option<i64>) -> Result<TopClientsReply, PiholeError> {
        let path = format!("/api/stats/top_clients?count={}", count.unwrap_or(10));
        self.request(Method::GET, &path, None).await
    }

    /// Fetch the most recent entries of the query log
    pub async fn recent_queries(&self, count: Option<i64>) -> Result<QueriesReply, PiholeError> {
        let path = format!("/api/queries?length={}", count.unwrap_or(100));
        self.request(Method::GET, &path, None).await
    }

    /// Get the current blocking state
    pub async fn blocking_status(&self) -> Result<BlockingStatus, PiholeError> {
        self.request(Method::GET, "/api/dns/blocking", None).await
    }

    /// Enable DNS blocking, returning the resulting status
    pub async fn enable_blocking(&self) -> Result<BlockingStatus, PiholeError> {
        let body = serde_json::to_value(BlockingRequest {
            blocking: true,
            timer: None,
        })?;
        self.request(Method::POST, "/api/dns/blocking", Some(body))
            .await
    }

    /// Disable DNS blocking, optionally for a bounded number of seconds
    pub async fn disable_blocking(
        &self,
        timer: Option<u64>,
    ) -> Result<BlockingStatus, PiholeError> {
        let body = serde_json::to_value(BlockingRequest {
            blocking: false,
            timer,
        })?;
        self.request(Method::POST, "/api/dns/blocking", Some(body))
            .await
    }

    /// Add a domain to the allow or deny list
    pub async fn add_domain(&self, kind: ListKind, domain: &str) -> Result<(), PiholeError> {
        let path = format!("/api/domains/{}/exact", kind.as_path());
        self.send(Method::POST, &path, Some(json!({ "domain": domain })))
            .await?;
        Ok(())
    }

    /// Remove a domain from the allow or deny list.
    ///
    /// The domain is percent-encoded for use as a path segment.
    pub async fn remove_domain(&self, kind: ListKind, domain: &str) -> Result<(), PiholeError> {
        let path = format!(
            "/api/domains/{}/exact/{}",
            kind.as_path(),
            urlencoding::encode(domain)
        );
        self.send(Method::DELETE, &path, None).await?;
        Ok(())
    }

    /// List the domains on the allow or deny list
    pub async fn list_domains(&self, kind: ListKind) -> Result<Vec<String>, PiholeError> {
        let path = format!("/api/domains/{}/exact", kind.as_path());
        let reply: DomainListReply = self.request(Method::GET, &path, None).await?;
        Ok(reply.domains.into_iter().map(|d| d.domain).collect())
    }

    /// Trigger a rebuild of the compiled blocklist.
    ///
    /// The appliance starts the job asynchronously; completion is not
    /// awaited.
    pub async fn update_gravity(&self) -> Result<ActionReply, PiholeError> {
        self.request(Method::POST, "/api/action/gravity", None).await
    }

    /// Flush the resolver's DNS cache
    pub async fn flush_cache(&self) -> Result<ActionReply, PiholeError> {
        self.request(Method::POST, "/api/action/flush/cache", None)
            .await
    }

    /// Attempt a full auth exchange and report reachability as a boolean.
    ///
    /// Never raises; all errors degrade to `false`.
    pub async fn probe(&self) -> bool {
        match self.authenticate().await {
            Ok(session) => {
                *self.session.write().await = Some(session);
                true
            }
            Err(err) => {
                debug!("Connectivity probe failed: {}", err);
                false
            }
        }
    }
}
