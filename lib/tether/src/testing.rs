//! Test doubles shared by unit tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use serde::Deserialize;
use tether_core::{Method, Request, Response, Target, Transport, TransportError};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct User {
    pub id: u64,
    pub name: String,
}

/// Target addressed by path only.
#[derive(Debug, Clone)]
pub(crate) struct Endpoint(pub &'static str);

impl Target for Endpoint {
    fn base_url(&self) -> Url {
        Url::parse("https://api.test").expect("valid URL")
    }

    fn path(&self) -> String {
        self.0.to_string()
    }

    fn method(&self) -> Method {
        Method::GET
    }

    fn sample_data(&self) -> Bytes {
        Bytes::from_static(br#"{"id":7,"name":"Sample"}"#)
    }
}

/// Transport answering from a fixed routing table and counting calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct Routes {
    calls: Arc<AtomicUsize>,
}

impl Routes {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

fn reply(status: u16, body: &'static str) -> Result<Response, TransportError> {
    Ok(Response::new(status, HashMap::new(), Bytes::from_static(body.as_bytes())))
}

impl Transport for Routes {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match request.url().path() {
            "/users/1" => reply(200, r#"{"id":1,"name":"Ada"}"#),
            "/users/2" => reply(200, r#"{"id":2,"name":"Grace"}"#),
            "/empty" => reply(204, ""),
            "/bad" => reply(400, ""),
            "/missing" => reply(404, r#"{"detail":"no such user","code":"E404"}"#),
            "/boom" => reply(500, "oops"),
            "/down" => Err(TransportError::connection("connection refused")),
            _ => reply(418, ""),
        }
    }
}
