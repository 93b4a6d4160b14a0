// crates/nomad-provider-config/tests/common/mod.rs
// ============================================================================
// Module: Shared Test Fixtures
// Description: TLS material generation and local HTTP servers for tests.
// Purpose: Exercise client construction and requests without a real agent.
// Dependencies: rcgen, rustls, tempfile, tiny_http
// ============================================================================

//! Shared fixtures for nomad-provider-config integration tests.

#![allow(
    dead_code,
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_panics_doc,
    reason = "Shared test helpers are not used by every test binary."
)]

use std::fs;
use std::io::Read;
use std::io::Write;
use std::net::SocketAddr;
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use rcgen::BasicConstraints;
use rcgen::CertificateParams;
use rcgen::DistinguishedName;
use rcgen::DnType;
use rcgen::IsCa;
use rcgen::Issuer;
use rcgen::KeyPair;
use rustls::ServerConfig;
use rustls::ServerConnection;
use rustls::StreamOwned;
use rustls::pki_types::CertificateDer;
use rustls::pki_types::PrivateKeyDer;
use rustls::pki_types::PrivatePkcs8KeyDer;
use tempfile::TempDir;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

// ============================================================================
// SECTION: TLS Fixtures
// ============================================================================

/// Ephemeral CA, server, and client material in PEM form and on disk.
pub struct TlsFixture {
    /// Keeps the files alive for the test duration.
    pub dir: TempDir,
    /// CA certificate PEM.
    pub ca_pem: String,
    /// Client certificate PEM.
    pub client_cert_pem: String,
    /// Client private key PEM.
    pub client_key_pem: String,
    /// Path of the CA certificate file.
    pub ca_file: PathBuf,
    /// Path of the client certificate file.
    pub cert_file: PathBuf,
    /// Path of the client key file.
    pub key_file: PathBuf,
    /// Server certificate for `localhost`, signed by the CA.
    server_cert: CertificateDer<'static>,
    /// Server private key in PKCS#8 DER form.
    server_key: Vec<u8>,
}

/// Generates a CA plus server and client leaf certificates.
pub fn tls_fixture() -> TlsFixture {
    let dir = tempfile::Builder::new().prefix("nomad-tls").tempdir().unwrap();

    let ca_key = KeyPair::generate().unwrap();
    let mut ca_params = CertificateParams::default();
    ca_params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    ca_params.distinguished_name = distinguished_name("Nomad Test CA");
    let ca_cert = ca_params.self_signed(&ca_key).unwrap();
    let issuer = Issuer::new(ca_params, ca_key);

    let server_key = KeyPair::generate().unwrap();
    let mut server_params =
        CertificateParams::new(vec!["localhost".to_string(), "127.0.0.1".to_string()]).unwrap();
    server_params.distinguished_name = distinguished_name("Nomad Test Server");
    server_params.is_ca = IsCa::NoCa;
    let server_cert = server_params.signed_by(&server_key, &issuer).unwrap();

    let client_key = KeyPair::generate().unwrap();
    let mut client_params = CertificateParams::default();
    client_params.distinguished_name = distinguished_name("Nomad Test Client");
    client_params.is_ca = IsCa::NoCa;
    let client_cert = client_params.signed_by(&client_key, &issuer).unwrap();

    let ca_file = dir.path().join("ca.pem");
    let cert_file = dir.path().join("client.pem");
    let key_file = dir.path().join("client-key.pem");
    fs::write(&ca_file, ca_cert.pem()).unwrap();
    fs::write(&cert_file, client_cert.pem()).unwrap();
    fs::write(&key_file, client_key.serialize_pem()).unwrap();

    TlsFixture {
        ca_pem: ca_cert.pem(),
        client_cert_pem: client_cert.pem(),
        client_key_pem: client_key.serialize_pem(),
        ca_file,
        cert_file,
        key_file,
        server_cert: server_cert.der().clone(),
        server_key: server_key.serialize_der(),
        dir,
    }
}

/// Builds a distinguished name with only a common name.
fn distinguished_name(common_name: &str) -> DistinguishedName {
    let mut name = DistinguishedName::new();
    name.push(DnType::CommonName, common_name);
    name
}

/// Starts a one-shot HTTPS server presenting the fixture's server cert.
///
/// The server answers the first request with `body` as JSON.
pub fn start_tls_server(
    fixture: &TlsFixture,
    body: &'static str,
) -> (SocketAddr, thread::JoinHandle<()>) {
    let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
    let key_der = PrivateKeyDer::from(PrivatePkcs8KeyDer::from(fixture.server_key.clone()));
    let config = ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(vec![fixture.server_cert.clone()], key_der)
        .unwrap();
    let config = Arc::new(config);

    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        if let Ok((tcp, _)) = listener.accept() {
            let conn = ServerConnection::new(config).unwrap();
            let mut stream = StreamOwned::new(conn, tcp);
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: \
                 {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    (addr, handle)
}

// ============================================================================
// SECTION: Capture Server
// ============================================================================

/// Request details recorded by the capture server.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    /// Request path including the query string.
    pub url: String,
    /// Header name/value pairs in arrival order.
    pub headers: Vec<(String, String)>,
}

impl CapturedRequest {
    /// Returns all values of a header, matching the name case-insensitively.
    pub fn header_values(&self, name: &str) -> Vec<String> {
        self.headers
            .iter()
            .filter(|(field, _)| field.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// Starts an HTTP server that answers one request with `status` and `body`.
pub fn capture_server(
    status: u16,
    body: &'static str,
) -> (String, thread::JoinHandle<CapturedRequest>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let handle = thread::spawn(move || {
        let request = server.recv().unwrap();
        let captured = CapturedRequest {
            url: request.url().to_string(),
            headers: request
                .headers()
                .iter()
                .map(|header| (header.field.to_string(), header.value.to_string()))
                .collect(),
        };
        let content_type =
            Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
        let response =
            Response::from_string(body).with_status_code(status).with_header(content_type);
        let _ = request.respond(response);
        captured
    });
    (format!("http://{addr}"), handle)
}
