// crates/nomad-provider-config/tests/client_requests.rs
// ============================================================================
// Module: Client Request Tests
// Description: Verify what the configured client puts on the wire.
// Purpose: Check token, basic auth, custom headers, and scoping parameters.
// Dependencies: nomad-provider-config, tiny_http
// ============================================================================

//! Request shaping tests for [`NomadClient`] against a local capture server.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use nomad_provider_config::ClientConfig;
use nomad_provider_config::ClientError;
use nomad_provider_config::ConfigResolver;
use nomad_provider_config::ExecutionContext;
use nomad_provider_config::HeaderEntry;
use nomad_provider_config::HttpBasicAuth;
use nomad_provider_config::MapEnv;
use nomad_provider_config::NomadClient;
use nomad_provider_config::ProviderOptions;
use nomad_provider_config::QueryOptions;
use serde_json::Value;

use crate::common::capture_server;

// ============================================================================
// SECTION: Identity
// ============================================================================

#[test]
fn token_and_custom_headers_are_sent() {
    let (address, handle) = capture_server(200, r#"["global"]"#);
    let env = MapEnv::new();
    let options = ProviderOptions {
        secret_id: "acl-secret".to_string(),
        headers: vec![
            HeaderEntry::new("x-team", "infra"),
            HeaderEntry::new("X-Team", "platform"),
        ],
        ..ProviderOptions::new(address)
    };
    let resolved = ConfigResolver::new(&env, ExecutionContext::STANDARD).resolve(&options).unwrap();

    let regions = resolved.client().regions().unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(regions, ["global"]);
    assert_eq!(captured.url, "/v1/regions");
    assert_eq!(captured.header_values("X-Nomad-Token"), ["acl-secret"]);
    assert_eq!(captured.header_values("X-Team"), ["infra", "platform"]);
}

#[test]
fn anonymous_client_sends_no_token() {
    let (address, handle) = capture_server(200, r#""10.0.0.1:4647""#);
    let config = ClientConfig {
        address,
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    let leader = client.leader().unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(leader, "10.0.0.1:4647");
    assert_eq!(captured.url, "/v1/status/leader");
    assert!(captured.header_values("X-Nomad-Token").is_empty());
    assert!(captured.header_values("Authorization").is_empty());
}

#[test]
fn basic_auth_is_sent() {
    let (address, handle) = capture_server(200, "{}");
    let config = ClientConfig {
        address,
        http_auth: HttpBasicAuth::parse("alice:secret"),
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    client.agent_self().unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(captured.header_values("Authorization"), ["Basic YWxpY2U6c2VjcmV0"]);
}

// ============================================================================
// SECTION: Scoping
// ============================================================================

#[test]
fn configured_region_and_namespace_scope_requests() {
    let (address, handle) = capture_server(200, "[]");
    let config = ClientConfig {
        address,
        region: "eu-west".to_string(),
        namespace: "batch".to_string(),
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    let _: Value = client.get_json("/v1/jobs", &QueryOptions::default()).unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(captured.url, "/v1/jobs?region=eu-west&namespace=batch");
}

#[test]
fn query_options_override_configured_scope() {
    let (address, handle) = capture_server(200, "[]");
    let config = ClientConfig {
        address,
        region: "eu-west".to_string(),
        namespace: "batch".to_string(),
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    let _: Value = client.get_json("/v1/jobs", &QueryOptions::namespace("web")).unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(captured.url, "/v1/jobs?region=eu-west&namespace=web");
}

#[test]
fn suppressed_namespace_is_not_sent() {
    let (address, handle) = capture_server(200, "[]");
    let env = MapEnv::new().with("NOMAD_NAMESPACE", "inherited");
    let resolver = ConfigResolver::new(&env, ExecutionContext::REMOTE_RUN);
    let resolved = resolver.resolve(&ProviderOptions::new(address)).unwrap();

    let _: Value = resolved.client().get_json("/v1/jobs", &QueryOptions::default()).unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(captured.url, "/v1/jobs");
}

#[test]
fn region_override_keeps_configured_namespace() {
    let (address, handle) = capture_server(200, "[]");
    let config = ClientConfig {
        address,
        region: "eu-west".to_string(),
        namespace: "batch".to_string(),
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    let _: Value = client.get_json("/v1/jobs", &QueryOptions::region("us-east")).unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(captured.url, "/v1/jobs?region=us-east&namespace=batch");
}

// ============================================================================
// SECTION: Failures
// ============================================================================

#[test]
fn non_success_status_is_reported_with_body() {
    let (address, handle) = capture_server(403, "Permission denied");
    let config = ClientConfig {
        address,
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    let err = client.regions().unwrap_err();
    handle.join().unwrap();

    match err {
        ClientError::UnexpectedStatus {
            status,
            body,
        } => {
            assert_eq!(status, 403);
            assert_eq!(body, "Permission denied");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn undecodable_body_is_reported() {
    let (address, handle) = capture_server(200, "not json");
    let config = ClientConfig {
        address,
        ..ClientConfig::default()
    };
    let client = NomadClient::new(config).unwrap();

    let err = client.regions().unwrap_err();
    handle.join().unwrap();

    assert!(matches!(err, ClientError::Decode(_)), "{err}");
}

#[test]
fn invalid_headers_are_dropped_and_valid_ones_sent() {
    let (address, handle) = capture_server(200, r#"["global"]"#);
    let mut config = ClientConfig {
        address,
        ..ClientConfig::default()
    };
    config.headers.append("X Bad", "v");
    config.headers.append("X-Broken", "line\nbreak");
    config.headers.append("X-Broken", "fine");
    config.headers.append("X-Team", "infra");
    let client = NomadClient::new(config).unwrap();

    client.regions().unwrap();
    let captured = handle.join().unwrap();

    assert_eq!(captured.header_values("X-Broken"), ["fine"]);
    assert_eq!(captured.header_values("X-Team"), ["infra"]);
    assert!(captured.header_values("X Bad").is_empty());
}
