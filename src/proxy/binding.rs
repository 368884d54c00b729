//! Proxy bindings: the immutable per-route forwarding parameters.

use std::str::FromStr;

use axum::http::uri::{Authority, Scheme};
use url::Url;

use crate::proxy::ProxyError;

/// What to send as the Host header on the outbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostPolicy {
    /// Forward the original Host header unchanged.
    Preserve,
    /// Rewrite Host to the target origin.
    Rewrite,
}

/// Forwarding parameters for one route: target origin, the path prefix
/// to strip before forwarding, and the Host policy.
///
/// Holds only immutable data; shared freely between concurrent
/// requests.
#[derive(Debug, Clone)]
pub struct ProxyBinding {
    /// Target scheme.
    pub scheme: Scheme,
    /// Target host and port.
    pub authority: Authority,
    /// Leading path segment removed before forwarding, without a
    /// trailing separator (e.g. `/context/prefix`).
    pub strip_prefix: Option<String>,
    /// Host header policy for the outbound request.
    pub host_policy: HostPolicy,
}

impl ProxyBinding {
    /// Build a binding from an origin string (`scheme://host[:port]`).
    ///
    /// The origin must carry no path, query, or fragment: the incoming
    /// request path (minus the strip-prefix) is forwarded as-is, so a
    /// path on the origin would silently be discarded.
    pub fn from_origin(
        origin: &str,
        strip_prefix: Option<String>,
        host_policy: HostPolicy,
    ) -> Result<Self, ProxyError> {
        let invalid = |reason: &str| ProxyError::InvalidOrigin {
            origin: origin.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(origin).map_err(|e| invalid(&e.to_string()))?;
        let scheme = match url.scheme() {
            "http" => Scheme::HTTP,
            "https" => Scheme::HTTPS,
            other => return Err(invalid(&format!("unsupported scheme `{}`", other))),
        };
        if url.path() != "/" && !url.path().is_empty() {
            return Err(invalid("origin must not have a path"));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("origin must not have a query or fragment"));
        }
        let host = url.host_str().ok_or_else(|| invalid("origin has no host"))?;
        let authority = match url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        };
        let authority =
            Authority::from_str(&authority).map_err(|e| invalid(&e.to_string()))?;

        Ok(Self {
            scheme,
            authority,
            strip_prefix,
            host_policy,
        })
    }

    /// Build a plain-HTTP binding to `host:port`, as used for the
    /// compiler server.
    pub fn http(
        host: &str,
        port: u16,
        strip_prefix: Option<String>,
        host_policy: HostPolicy,
    ) -> Result<Self, ProxyError> {
        let authority = format!("{}:{}", host, port);
        let authority = Authority::from_str(&authority).map_err(|e| ProxyError::InvalidOrigin {
            origin: authority.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            scheme: Scheme::HTTP,
            authority,
            strip_prefix,
            host_policy,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_origin_with_port() {
        let binding =
            ProxyBinding::from_origin("http://localhost:3000", None, HostPolicy::Rewrite).unwrap();
        assert_eq!(binding.scheme, Scheme::HTTP);
        assert_eq!(binding.authority.as_str(), "localhost:3000");
    }

    #[test]
    fn parses_origin_without_port() {
        let binding =
            ProxyBinding::from_origin("https://example.com", None, HostPolicy::Preserve).unwrap();
        assert_eq!(binding.scheme, Scheme::HTTPS);
        assert_eq!(binding.authority.as_str(), "example.com");
    }

    #[test]
    fn rejects_origin_with_path() {
        assert!(
            ProxyBinding::from_origin("http://example.com/app", None, HostPolicy::Rewrite)
                .is_err()
        );
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(
            ProxyBinding::from_origin("ftp://example.com", None, HostPolicy::Rewrite).is_err()
        );
    }

    #[test]
    fn tolerates_bare_trailing_slash() {
        assert!(
            ProxyBinding::from_origin("http://example.com/", None, HostPolicy::Rewrite).is_ok()
        );
    }
}
