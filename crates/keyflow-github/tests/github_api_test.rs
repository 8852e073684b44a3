use keyflow_github::{
    GitHubClient, GitHubConfig, GitHubError, GpgKeyConfig, GpgKeyReconciler, KeyOutcome,
    KeyService, id,
};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const TOKEN: &str = "ghp_test";
const ARMORED: &str = "-----BEGIN PGP PUBLIC KEY BLOCK-----\n\nmQENBF...\n-----END PGP PUBLIC KEY BLOCK-----";

/// Matches requests that do not carry the given header
struct WithoutHeader(&'static str);

impl Match for WithoutHeader {
    fn matches(&self, request: &Request) -> bool {
        !request.headers.contains_key(self.0)
    }
}

fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::new(GitHubConfig::new(TOKEN).with_base_url(server.uri())).unwrap()
}

fn gpg_key_body(id: i64, key_id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": null,
        "primary_key_id": null,
        "key_id": key_id,
        "public_key": "xsBNBFayYZ...",
        "emails": [],
        "subkeys": [],
        "can_sign": true,
        "can_encrypt_comms": false,
        "can_encrypt_storage": false,
        "can_certify": true,
        "created_at": "2016-03-24T11:31:04-06:00",
        "expires_at": null,
        "revoked": false,
        "raw_key": ARMORED
    })
}

#[tokio::test]
async fn test_create_key_posts_armored_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/gpg_keys"))
        .and(header("authorization", "Bearer ghp_test"))
        .and(header("accept", "application/vnd.github+json"))
        .and(header("x-github-api-version", "2022-11-28"))
        .and(body_json(json!({ "armored_public_key": ARMORED })))
        .respond_with(ResponseTemplate::new(201).set_body_json(gpg_key_body(123, "AAAA1111")))
        .expect(1)
        .mount(&server)
        .await;

    let created = client_for(&server).create_key(ARMORED).await.unwrap();

    assert_eq!(created.id, 123);
    assert_eq!(created.key_id, "AAAA1111");
}

#[tokio::test]
async fn test_create_key_validation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/gpg_keys"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "documentation_url": "https://docs.github.com/rest"
        })))
        .mount(&server)
        .await;

    let result = client_for(&server).create_key("garbage").await;

    match result {
        Err(GitHubError::Api { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message, "Validation Failed");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unconditional_get_returns_etag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/123"))
        .and(WithoutHeader("if-none-match"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "W/\"abc\"")
                .set_body_json(gpg_key_body(123, "AAAA1111")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server).get_key(123, None).await.unwrap();

    assert_eq!(
        outcome,
        KeyOutcome::Updated {
            key_id: "AAAA1111".to_string(),
            etag: Some("W/\"abc\"".to_string()),
        }
    );
}

#[tokio::test]
async fn test_conditional_get_not_modified() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/123"))
        .and(header("if-none-match", "W/\"abc\""))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = client_for(&server)
        .get_key(123, Some("W/\"abc\""))
        .await
        .unwrap();

    assert_eq!(outcome, KeyOutcome::Unchanged);
}

#[tokio::test]
async fn test_get_missing_key_is_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let outcome = client_for(&server).get_key(999, Some("W/\"abc\"")).await.unwrap();

    assert_eq!(outcome, KeyOutcome::Absent);
}

#[tokio::test]
async fn test_get_unauthorized_is_hard_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/123"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Bad credentials" })),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).get_key(123, None).await;

    assert!(matches!(
        result,
        Err(GitHubError::Api { status: 401, message }) if message == "Bad credentials"
    ));
}

#[tokio::test]
async fn test_server_error_with_plain_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/123"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream unavailable"))
        .mount(&server)
        .await;

    let result = client_for(&server).get_key(123, None).await;

    assert!(matches!(
        result,
        Err(GitHubError::Api { status: 502, message }) if message == "upstream unavailable"
    ));
}

#[tokio::test]
async fn test_delete_key() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user/gpg_keys/123"))
        .and(header("authorization", "Bearer ghp_test"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).delete_key(123).await.unwrap();
}

#[tokio::test]
async fn test_delete_missing_key_is_error() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/user/gpg_keys/123"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let result = client_for(&server).delete_key(123).await;

    assert!(matches!(result, Err(GitHubError::Api { status: 404, .. })));
}

#[tokio::test]
async fn test_reconciler_scenario_against_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/user/gpg_keys"))
        .respond_with(ResponseTemplate::new(201).set_body_json(gpg_key_body(123, "AAAA1111")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/123"))
        .and(WithoutHeader("if-none-match"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("etag", "W/abc")
                .set_body_json(gpg_key_body(123, "AAAA1111")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user/gpg_keys/123"))
        .and(header("if-none-match", "W/abc"))
        .respond_with(ResponseTemplate::new(304))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/user/gpg_keys/123"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let reconciler = GpgKeyReconciler::new(Arc::new(client_for(&server)));

    let created = reconciler
        .create(&GpgKeyConfig {
            armored_public_key: ARMORED.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(id::decode(&created.id).unwrap(), 123);
    assert_eq!(created.etag.as_deref(), Some("W/abc"));

    let refreshed = reconciler.read(&created, false).await.unwrap().unwrap();
    assert_eq!(refreshed, created);
    assert_eq!(refreshed.key_id.as_deref(), Some("AAAA1111"));

    reconciler.delete(&refreshed).await.unwrap();
}
