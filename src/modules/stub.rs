//! Stub script rendering.
//!
//! # Responsibilities
//! - Substitute module output name and compiler port into the template
//! - Produce the script response with caching disabled
//!
//! # Design Decisions
//! - Template embedded at compile time, rendered once at startup;
//!   serving a stub does no per-request work beyond cloning bytes
//! - Caching disabled so every page load re-fetches the current stub,
//!   which is cheap and avoids stale bootstrap code mid-development

use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};

/// Bootstrap script template. Two placeholders: the module's output
/// name and the compiler server's port.
const TEMPLATE: &str = include_str!("stub.nocache.js");

/// A rendered, ready-to-serve bootstrap script for one module.
#[derive(Debug, Clone)]
pub struct StubScript {
    body: Bytes,
}

impl StubScript {
    /// Render the template for a module.
    ///
    /// The script only embeds the compiler port; the browser combines
    /// it with the host it loaded the page from, so the same stub works
    /// for every hostname the front-end is reachable under.
    pub fn render(output_name: &str, compiler_port: u16) -> Self {
        let script = TEMPLATE
            .replace("__MODULE_NAME__", output_name)
            .replace("__COMPILER_PORT__", &compiler_port.to_string());
        Self {
            body: Bytes::from(script),
        }
    }

    /// Build the HTTP response serving this stub.
    pub fn response(&self) -> Response {
        (
            [
                (
                    header::CONTENT_TYPE,
                    "application/javascript; charset=UTF-8",
                ),
                (header::CACHE_CONTROL, "no-cache"),
            ],
            self.body.clone(),
        )
            .into_response()
    }

    /// The rendered script source.
    pub fn source(&self) -> &str {
        // Bytes came from a String; always valid UTF-8
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}
