#![allow(clippy::unwrap_used)]
// Integration tests for `ControllerClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use wanwatch_api::{ControllerClient, ControllerPlatform, Error, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(platform: ControllerPlatform) -> (MockServer, ControllerClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client =
        ControllerClient::with_client(reqwest::Client::new(), base_url, "default".into(), platform);
    (server, client)
}

fn secret(value: &str) -> secrecy::SecretString {
    value.to_string().into()
}

// ── Authentication tests ────────────────────────────────────────────

#[tokio::test]
async fn test_login_success_unifi_os() {
    let (server, client) = setup(ControllerPlatform::UnifiOs).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "username": "admin", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.login("admin", &secret("hunter2")).await.unwrap();
}

#[tokio::test]
async fn test_login_success_classic() {
    let (server, client) = setup(ControllerPlatform::ClassicController).await;

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    client.login("admin", &secret("hunter2")).await.unwrap();
}

#[tokio::test]
async fn test_login_failure_reports_status() {
    let (server, client) = setup(ControllerPlatform::UnifiOs).await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let result = client.login("admin", &secret("wrong")).await;

    match result {
        Err(Error::Authentication { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_login_transport_failure() {
    // Nothing listens on port 9 (discard) on the loopback interface.
    let client = ControllerClient::with_client(
        reqwest::Client::new(),
        Url::parse("http://127.0.0.1:9").unwrap(),
        "default".into(),
        ControllerPlatform::UnifiOs,
    );

    let result = client.login("admin", &secret("hunter2")).await;
    assert!(matches!(result, Err(Error::Transport(_))), "got: {result:?}");
}

#[tokio::test]
async fn test_session_cookie_is_reused() {
    let server = MockServer::start().await;
    let client = ControllerClient::new(
        Url::parse(&server.uri()).unwrap(),
        "default".into(),
        ControllerPlatform::ClassicController,
        &TransportConfig::default(),
    )
    .unwrap();

    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("set-cookie", "unifises=abc123; Path=/")
                .set_body_json(json!({})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alarm"))
        .and(header("cookie", "unifises=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    client.login("admin", &secret("hunter2")).await.unwrap();
    let alarms = client.list_alarms().await.unwrap();
    assert!(alarms.is_empty());
}

// ── Alarm tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_alarms_unifi_os_path() {
    let (server, client) = setup(ControllerPlatform::UnifiOs).await;

    let envelope = json!({
        "meta": { "rc": "ok" },
        "data": [
            {
                "_id": "alm001",
                "key": "EVT_GW_WANTransition",
                "iface": "eth8",
                "state": "inactive",
                "time": 1_718_447_400_000_i64,
                "msg": "Gateway WAN transition"
            },
            {
                "_id": "alm002",
                "key": "EVT_AP_Lost_Contact",
                "time": 1_718_447_300_000_i64,
                "ap": "aa:bb:cc:dd:ee:ff"
            }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/proxy/network/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&envelope))
        .mount(&server)
        .await;

    let alarms = client.list_alarms().await.unwrap();

    assert_eq!(alarms.len(), 2);
    assert_eq!(alarms[0].key.as_deref(), Some("EVT_GW_WANTransition"));
    assert_eq!(alarms[0].iface.as_deref(), Some("eth8"));
    assert_eq!(alarms[0].state.as_deref(), Some("inactive"));
    assert_eq!(alarms[0].time, Some(1_718_447_400_000));
    assert_eq!(alarms[1].iface, None);
    assert_eq!(alarms[1].extra["ap"], "aa:bb:cc:dd:ee:ff");
}

#[tokio::test]
async fn test_list_alarms_without_meta() {
    let (server, client) = setup(ControllerPlatform::ClassicController).await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alarm"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "key": "EVT_X" }] })),
        )
        .mount(&server)
        .await;

    let alarms = client.list_alarms().await.unwrap();
    assert_eq!(alarms.len(), 1);
}

#[tokio::test]
async fn test_list_alarms_skips_undecodable_entries() {
    let (server, client) = setup(ControllerPlatform::ClassicController).await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "ok" },
            "data": [
                "not-an-object",
                { "key": "EVT_GW_WANTransition", "time": "yesterday" },
                { "key": "EVT_GW_WANTransition", "iface": "eth8", "time": 5, "state": "active" }
            ]
        })))
        .mount(&server)
        .await;

    let alarms = client.list_alarms().await.unwrap();
    assert_eq!(alarms.len(), 1);
    assert_eq!(alarms[0].time, Some(5));
}

#[tokio::test]
async fn test_list_alarms_expired_session() {
    let (server, client) = setup(ControllerPlatform::UnifiOs).await;

    Mock::given(method("GET"))
        .and(path("/proxy/network/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(401).set_body_string("login required"))
        .mount(&server)
        .await;

    let result = client.list_alarms().await;

    match result {
        Err(Error::Status { status, .. }) => assert_eq!(status, 401),
        other => panic!("expected Status error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_alarms_envelope_error() {
    let (server, client) = setup(ControllerPlatform::ClassicController).await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "meta": { "rc": "error", "msg": "api.err.LoginRequired" },
            "data": []
        })))
        .mount(&server)
        .await;

    let result = client.list_alarms().await;

    match result {
        Err(Error::Controller { message }) => assert_eq!(message, "api.err.LoginRequired"),
        other => panic!("expected Controller error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_list_alarms_unifi_os_error_body() {
    let (server, client) = setup(ControllerPlatform::UnifiOs).await;

    Mock::given(method("GET"))
        .and(path("/proxy/network/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": { "code": 401, "message": "Unauthorized" }
        })))
        .mount(&server)
        .await;

    let result = client.list_alarms().await;
    assert!(matches!(result, Err(Error::Controller { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_list_alarms_garbage_body() {
    let (server, client) = setup(ControllerPlatform::ClassicController).await;

    Mock::given(method("GET"))
        .and(path("/api/s/default/stat/alarm"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_alarms().await;
    assert!(matches!(result, Err(Error::Deserialization { .. })), "got: {result:?}");
}
