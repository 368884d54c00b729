//! Reverse proxy forwarding.
//!
//! # Responsibilities
//! - Rewrite the incoming request for the target origin (path strip,
//!   Host policy, forwarding headers)
//! - Stream request and response bodies without buffering
//! - Surface upstream failures as errors, never as panics
//!
//! # Design Decisions
//! - One shared hyper client; the forwarder is stateless and Clone
//! - No retries and no component-level timeout: a development proxy
//!   should fail fast and loudly
//! - Dropping the returned future aborts the in-flight upstream call,
//!   so a disconnecting browser does not leak outbound connections

use std::net::SocketAddr;

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, Response, Uri};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;

use crate::proxy::{HostPolicy, ProxyBinding};

/// Headers that are connection-level and must not be forwarded.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Error forwarding a request to an upstream origin.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("invalid proxy origin `{origin}`: {reason}")]
    InvalidOrigin { origin: String, reason: String },

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Generic handler forwarding requests to a target origin.
///
/// Stateless across requests; one instance is shared by every proxy
/// route regardless of binding.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
}

impl Forwarder {
    /// Create a forwarder with a fresh connection pool.
    pub fn new() -> Self {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { client }
    }

    /// Forward a request according to `binding`, streaming the response
    /// back verbatim.
    ///
    /// The outbound path is the incoming path with the binding's
    /// strip-prefix removed; method, query string, body, and all
    /// end-to-end headers are preserved. Host follows the binding's
    /// policy.
    pub async fn forward(
        &self,
        binding: &ProxyBinding,
        request: Request<Body>,
        client_addr: SocketAddr,
    ) -> Result<Response<Body>, ProxyError> {
        let (parts, body) = request.into_parts();

        let path = stripped_path(parts.uri.path(), binding.strip_prefix.as_deref());
        let path_and_query = match parts.uri.query() {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        };
        let uri = Uri::builder()
            .scheme(binding.scheme.clone())
            .authority(binding.authority.clone())
            .path_and_query(path_and_query)
            .build()?;

        let mut headers = parts.headers;
        let original_host = headers.get(header::HOST).cloned();
        for name in HOP_BY_HOP {
            headers.remove(name);
        }

        match binding.host_policy {
            HostPolicy::Rewrite => {
                let target = HeaderValue::from_str(binding.authority.as_str())
                    .map_err(axum::http::Error::from)?;
                headers.insert(header::HOST, target);
            }
            HostPolicy::Preserve => {
                // Host stays as received; hyper only fills it in from
                // the URI when the header is absent.
            }
        }

        let forwarded_for = match headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
            Some(prior) => format!("{}, {}", prior, client_addr.ip()),
            None => client_addr.ip().to_string(),
        };
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_str(&forwarded_for).map_err(axum::http::Error::from)?,
        );
        if let Some(host) = original_host {
            headers.insert("x-forwarded-host", host);
        }
        headers.insert("x-forwarded-proto", HeaderValue::from_static("http"));

        let mut outbound = Request::builder()
            .method(parts.method)
            .uri(uri)
            .body(body)?;
        *outbound.headers_mut() = headers;

        tracing::debug!(
            target = %binding.authority,
            path = %outbound.uri().path(),
            "Forwarding request"
        );

        let response = self.client.request(outbound).await?;
        Ok(response.map(Body::new))
    }
}

impl Default for Forwarder {
    fn default() -> Self {
        Self::new()
    }
}

/// Remove `prefix` from the front of `path`.
///
/// The removal is exact: the remainder is returned untouched, and an
/// empty remainder becomes `/`. A path that does not carry the prefix
/// is forwarded unchanged.
pub(crate) fn stripped_path<'a>(path: &'a str, prefix: Option<&str>) -> &'a str {
    let Some(prefix) = prefix else { return path };
    match path.strip_prefix(prefix) {
        Some("") => "/",
        Some(rest) => rest,
        None => path,
    }
}
