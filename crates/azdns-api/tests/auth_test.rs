// Integration tests for the token credentials using wiremock.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use azdns_api::{
    ChainedTokenCredential, ClientSecretCredential, ManagedIdentityCredential, TokenCredential,
    TransportConfig,
};

const SCOPE: &str = "https://management.azure.com/.default";

// ── Helpers ─────────────────────────────────────────────────────────

fn secret(value: &str) -> SecretString {
    SecretString::from(value.to_owned())
}

fn client_secret_credential(server: &MockServer) -> ClientSecretCredential {
    ClientSecretCredential::new(
        Url::parse(&server.uri()).unwrap(),
        "tenant-0000",
        "client-0000",
        secret("s3cr3t"),
        &TransportConfig::default(),
    )
    .unwrap()
}

fn managed_identity_credential(server: &MockServer) -> ManagedIdentityCredential {
    ManagedIdentityCredential::new(
        Url::parse(&server.uri()).unwrap(),
        &TransportConfig::default(),
    )
    .unwrap()
}

// ── Service principal ───────────────────────────────────────────────

#[tokio::test]
async fn test_client_secret_grant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-0000/oauth2/v2.0/token"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=client-0000"))
        .and(body_string_contains("client_secret=s3cr3t"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            "expires_in": 3599,
            "access_token": "sp-token"
        })))
        .mount(&server)
        .await;

    let token = client_secret_credential(&server).token(SCOPE).await.unwrap();

    assert_eq!(token.token.expose_secret(), "sp-token");
    assert!(!token.expires_within(Duration::from_secs(300)));
}

#[tokio::test]
async fn test_client_secret_rejection_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tenant-0000/oauth2/v2.0/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "error": "invalid_client",
            "error_description": "AADSTS7000215: Invalid client secret provided."
        })))
        .mount(&server)
        .await;

    let err = client_secret_credential(&server)
        .token(SCOPE)
        .await
        .expect_err("rejected grant should fail");

    assert!(err.is_auth(), "expected auth error, got: {err:?}");
    assert!(err.to_string().contains("HTTP 401"));
}

// ── Managed identity ────────────────────────────────────────────────

#[tokio::test]
async fn test_managed_identity_token_from_imds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metadata/identity/oauth2/token"))
        .and(query_param("api-version", "2018-02-01"))
        .and(query_param("resource", "https://management.azure.com"))
        .and(header("Metadata", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "token_type": "Bearer",
            // IMDS serializes numbers as strings.
            "expires_in": "86400",
            "access_token": "mi-token"
        })))
        .mount(&server)
        .await;

    let token = managed_identity_credential(&server)
        .token(SCOPE)
        .await
        .unwrap();

    assert_eq!(token.token.expose_secret(), "mi-token");
}

#[tokio::test]
async fn test_imds_unreachable_is_auth_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/metadata/identity/oauth2/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string("no identity assigned"))
        .mount(&server)
        .await;

    let err = managed_identity_credential(&server)
        .token(SCOPE)
        .await
        .expect_err("IMDS rejection should fail");

    assert!(err.is_auth(), "expected auth error, got: {err:?}");
}

// ── Fallback chain ──────────────────────────────────────────────────

#[tokio::test]
async fn test_chain_falls_through_to_next_source() {
    let broken = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&broken)
        .await;

    let working = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/metadata/identity/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "expires_in": "3600",
            "access_token": "chained-token"
        })))
        .mount(&working)
        .await;

    let chain = ChainedTokenCredential::new(vec![
        Box::new(client_secret_credential(&broken)),
        Box::new(managed_identity_credential(&working)),
    ]);

    let token = chain.token(SCOPE).await.unwrap();
    assert_eq!(token.token.expose_secret(), "chained-token");
}

#[tokio::test]
async fn test_chain_aggregates_all_failures() {
    let broken = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&broken)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&broken)
        .await;

    let chain = ChainedTokenCredential::new(vec![
        Box::new(client_secret_credential(&broken)),
        Box::new(managed_identity_credential(&broken)),
    ]);

    let err = chain.token(SCOPE).await.expect_err("chain should fail");

    assert!(err.is_auth());
    assert!(
        err.to_string().contains("all credential sources failed"),
        "unexpected message: {err}"
    );
}
