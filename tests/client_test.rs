//! HTTP-level tests for the session client, backed by wiremock

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use piwatch::config::ApiConfig;
use piwatch::pihole::{ListKind, PiholeClient, PiholeError, SessionState};

fn client_for(server: &MockServer) -> PiholeClient {
    PiholeClient::new(ApiConfig {
        base_url: server.uri(),
        password: "hunter2".to_string(),
        timeout_seconds: 5,
    })
    .expect("client should build")
}

fn auth_body(validity: i64) -> serde_json::Value {
    json!({
        "session": {
            "valid": true,
            "sid": "sid-1",
            "csrf": "csrf-1",
            "validity": validity,
            "message": null
        }
    })
}

fn summary_body() -> serde_json::Value {
    json!({
        "queries": { "total": 1000, "blocked": 150, "percent_blocked": 15.0 },
        "clients": { "active": 5, "total": 9 },
        "gravity": { "domains_being_blocked": 120000 }
    })
}

/// Mount the auth exchange with an exact expected call count
async fn mount_auth(server: &MockServer, validity: i64, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .and(body_json(json!({ "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(validity)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_summary(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .and(header("X-FTL-SID", "sid-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(summary_body()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn first_fetch_performs_exactly_one_auth_exchange() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    mount_summary(&server).await;

    let client = client_for(&server);
    assert_eq!(client.session_state().await, SessionState::Unauthenticated);

    let summary = client.summary().await.expect("summary should succeed");
    assert_eq!(summary.queries.total, 1000);
    assert_eq!(client.session_state().await, SessionState::Authenticated);
}

#[tokio::test]
async fn fresh_session_is_reused_without_reauthentication() {
    let server = MockServer::start().await;
    // Expiry far beyond the 60s margin: one exchange across three calls
    mount_auth(&server, 3600, 1).await;
    mount_summary(&server).await;

    let client = client_for(&server);
    client.summary().await.unwrap();
    client.summary().await.unwrap();
    client.summary().await.unwrap();
}

#[tokio::test]
async fn stale_session_triggers_reauthentication() {
    let server = MockServer::start().await;
    // 30s validity is inside the 60s margin, so every call finds the
    // session stale and exchanges again
    mount_auth(&server, 30, 2).await;
    mount_summary(&server).await;

    let client = client_for(&server);
    client.summary().await.unwrap();
    assert_eq!(client.session_state().await, SessionState::Expiring);
    client.summary().await.unwrap();
}

#[tokio::test]
async fn explicit_zero_count_is_passed_through_verbatim() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/stats/top_domains"))
        .and(query_param("blocked", "true"))
        .and(query_param("count", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "domains": [], "total_queries": 1000 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client.top_domains(true, Some(0)).await.unwrap();
    assert!(reply.domains.is_empty());
    assert_eq!(reply.total_queries, 1000);
}

#[tokio::test]
async fn negative_count_is_not_clamped() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/stats/top_clients"))
        .and(query_param("count", "-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "clients": [], "total_queries": 0 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.top_clients(Some(-1)).await.unwrap();
}

#[tokio::test]
async fn omitted_counts_use_documented_defaults() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/stats/top_clients"))
        .and(query_param("count", "10"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "clients": [], "total_queries": 0 })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/queries"))
        .and(query_param("length", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "queries": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client.top_clients(None).await.unwrap();
    client.recent_queries(None).await.unwrap();
}

#[tokio::test]
async fn rejected_credentials_surface_the_remote_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session": { "valid": false, "message": "password incorrect" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.summary().await.unwrap_err();
    match err {
        PiholeError::Authentication { status, message } => {
            assert_eq!(status, None);
            assert_eq!(message, "password incorrect");
        }
        other => panic!("expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn rejected_credentials_fall_back_to_default_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "session": { "valid": false } })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.summary().await.unwrap_err();
    match err {
        PiholeError::Authentication { message, .. } => {
            assert_eq!(message, "invalid credentials");
        }
        other => panic!("expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn failed_auth_transport_carries_the_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.summary().await.unwrap_err();
    match err {
        PiholeError::Authentication { status, .. } => assert_eq!(status, Some(401)),
        other => panic!("expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn api_errors_carry_status_and_raw_body() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/stats/summary"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden by ACL"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.summary().await.unwrap_err();
    match err {
        PiholeError::Api {
            status,
            status_text,
            body,
        } => {
            assert_eq!(status, 403);
            assert_eq!(status_text, "Forbidden");
            assert_eq!(body, "forbidden by ACL");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn domain_removal_percent_encodes_the_path_segment() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("DELETE"))
        .and(path("/api/domains/allow/exact/ads%20network%26co.example"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .remove_domain(ListKind::Allow, "ads network&co.example")
        .await
        .unwrap();
}

#[tokio::test]
async fn domain_add_posts_the_domain_body() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/domains/deny/exact"))
        .and(body_json(json!({ "domain": "tracker.example" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .add_domain(ListKind::Deny, "tracker.example")
        .await
        .unwrap();
}

#[tokio::test]
async fn list_domains_returns_the_domain_strings() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("GET"))
        .and(path("/api/domains/allow/exact"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "domains": [
                { "domain": "good.example", "id": 1 },
                { "domain": "fine.example", "id": 2 }
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let domains = client.list_domains(ListKind::Allow).await.unwrap();
    assert_eq!(domains, vec!["good.example", "fine.example"]);
}

#[tokio::test]
async fn blocking_toggle_round_trips_the_timer() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/dns/blocking"))
        .and(body_json(json!({ "blocking": false, "timer": 300 })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "blocking": "disabled", "timer": 300.0 })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client.disable_blocking(Some(300)).await.unwrap();
    assert!(!status.is_enabled());
    assert_eq!(status.timer, Some(300.0));
}

#[tokio::test]
async fn enable_blocking_reports_the_resulting_status() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/dns/blocking"))
        .and(body_json(json!({ "blocking": true })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "blocking": "enabled" })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let status = client.enable_blocking().await.unwrap();
    assert!(status.is_enabled());
    assert_eq!(status.timer, None);
}

#[tokio::test]
async fn maintenance_actions_report_the_success_flag() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;
    Mock::given(method("POST"))
        .and(path("/api/action/gravity"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/action/flush/cache"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.update_gravity().await.unwrap().success);
    assert!(!client.flush_cache().await.unwrap().success);
}

#[tokio::test]
async fn probe_swallows_errors_and_reports_a_boolean() {
    let server = MockServer::start().await;
    mount_auth(&server, 3600, 1).await;

    let client = client_for(&server);
    assert!(client.probe().await);
    assert_eq!(client.session_state().await, SessionState::Authenticated);

    // No listener at all: transport failure degrades to false
    let dead = PiholeClient::new(ApiConfig {
        base_url: "http://127.0.0.1:1".to_string(),
        password: "hunter2".to_string(),
        timeout_seconds: 1,
    })
    .unwrap();
    assert!(!dead.probe().await);
}

#[tokio::test]
async fn probe_reports_false_on_rejected_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "session": { "valid": false, "message": "password incorrect" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(!client.probe().await);
}

#[tokio::test]
async fn concurrent_fanout_shares_one_client() {
    let server = MockServer::start().await;
    // Stale check races are accepted: with a fresh long-lived session
    // available after the first exchange, redundant exchanges stay
    // bounded by the number of concurrent callers
    Mock::given(method("POST"))
        .and(path("/api/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(auth_body(3600)))
        .mount(&server)
        .await;
    mount_summary(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/stats/top_clients"))
        .and(header("X-FTL-SID", "sid-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "clients": [], "total_queries": 0 })),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let (summary, clients) = tokio::join!(client.summary(), client.top_clients(None));
    summary.unwrap();
    clients.unwrap();

    let exchanges = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/auth")
        .count();
    assert!((1..=2).contains(&exchanges));
}
