//! Helpers for tests that drive a [`Client`] against a local mock server.

use std::net::TcpListener;

use crate::{Client, Config};

/// Create an unauthenticated client pointing at `base_url` (e.g. a wiremock server).
pub fn test_client(base_url: &str) -> Client {
    Client::new(Config {
        base_url: Some(base_url.to_string()),
        ..Default::default()
    })
    .expect("client")
}

/// Create a client that sends `Authorization: Bearer <token>`.
pub fn test_client_with_token(base_url: &str, token: &str) -> Client {
    Client::new(Config {
        base_url: Some(base_url.to_string()),
        token: Some(token.to_string()),
        ..Default::default()
    })
    .expect("client")
}

/// A base URL on localhost where nothing is listening.
///
/// The port is reserved by binding and released right away, so connecting
/// to it is refused.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    format!("http://{addr}")
}
