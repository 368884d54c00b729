//! Route table construction.
//!
//! # Responsibilities
//! - Compose context path, module path prefix, and module output names
//!   into one priority-ordered set of routes
//! - Parameterize each route with the immutable data its handler needs
//! - Reject configurations that would shadow a route
//!
//! # Design Decisions
//! - The table is built once, before the listener accepts anything,
//!   and is never mutated afterwards
//! - Precedence is an explicit sort (exact before prefix, longer
//!   prefix before shorter), not an artifact of registration order
//! - Route entries hold data, not closures: no hidden shared state
//!   between module handlers

use std::cmp::Reverse;
use std::collections::HashSet;

use crate::compiler::CompilerAddress;
use crate::config::{FallbackConfig, ServerConfig};
use crate::modules::{Module, StubScript};
use crate::proxy::{HostPolicy, ProxyBinding, ProxyError};

/// A path pattern. Exact patterns match one literal path; prefix
/// patterns match their literal prefix followed by anything (and, as
/// with classic servlet mappings, the prefix with its trailing
/// separator removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutePattern {
    Exact(String),
    Prefix(String),
}

impl RoutePattern {
    /// The literal text of the pattern.
    pub fn literal(&self) -> &str {
        match self {
            RoutePattern::Exact(p) | RoutePattern::Prefix(p) => p,
        }
    }
}

/// What a matched route does with the request.
#[derive(Debug, Clone)]
pub enum RouteAction {
    /// Serve a pre-rendered module bootstrap script.
    Stub(StubScript),
    /// Forward to a target origin.
    Proxy(ProxyBinding),
    /// Serve from the static base directory, after removing
    /// `strip_prefix` from the request path.
    Static { strip_prefix: Option<String> },
}

/// One (pattern, action) pair. Immutable after the table is built.
#[derive(Debug, Clone)]
pub struct Route {
    pub pattern: RoutePattern,
    pub action: RouteAction,
}

/// Error building the route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    #[error("duplicate module output name `{0}`")]
    DuplicateOutputName(String),

    #[error(transparent)]
    Proxy(#[from] ProxyError),
}

/// The ordered, immutable route table.
///
/// Shared read-only by every concurrent request; lookups take no locks.
#[derive(Debug)]
pub struct RouteTable {
    pub(crate) routes: Vec<Route>,
}

impl RouteTable {
    /// Build the table from the configuration, the resolved modules,
    /// and the compiler server's resolved address.
    ///
    /// Per module with output name `O`, two routes are produced: an
    /// exact route for the stub script at `{/CP}{/MP}/O/O.nocache.js`,
    /// and a prefix route at `{/CP}{/MP}/O/` forwarding to the compiler
    /// with `{/CP}{/MP}` stripped, so the compiler always sees paths of
    /// the form `/O/...`. A single catch-all at `{/CP}/` binds the
    /// fallback handler and sorts after every module route.
    pub fn build(
        config: &ServerConfig,
        modules: &[Module],
        compiler: &CompilerAddress,
    ) -> Result<Self, RouteError> {
        let context_root = join_segments(&[config.context_path.as_deref()]);
        let module_root = join_segments(&[
            config.context_path.as_deref(),
            config.module_path_prefix.as_deref(),
        ]);
        let module_strip = (!module_root.is_empty()).then(|| module_root.clone());

        let mut routes = Vec::with_capacity(modules.len() * 2 + 1);
        let mut seen = HashSet::new();
        for module in modules {
            if !seen.insert(module.output_name.as_str()) {
                return Err(RouteError::DuplicateOutputName(module.output_name.clone()));
            }
            let module_base = format!("{}/{}", module_root, module.output_name);
            routes.push(Route {
                pattern: RoutePattern::Exact(format!(
                    "{}/{}.nocache.js",
                    module_base, module.output_name
                )),
                action: RouteAction::Stub(StubScript::render(&module.output_name, compiler.port)),
            });
            routes.push(Route {
                pattern: RoutePattern::Prefix(format!("{}/", module_base)),
                action: RouteAction::Proxy(ProxyBinding::http(
                    &compiler.host,
                    compiler.port,
                    module_strip.clone(),
                    HostPolicy::Rewrite,
                )?),
            });
        }

        let fallback_action = match &config.fallback {
            FallbackConfig::Static { .. } => RouteAction::Static {
                strip_prefix: (!context_root.is_empty()).then(|| context_root.clone()),
            },
            FallbackConfig::Proxy {
                origin,
                preserve_host,
            } => {
                let policy = if *preserve_host {
                    HostPolicy::Preserve
                } else {
                    HostPolicy::Rewrite
                };
                RouteAction::Proxy(ProxyBinding::from_origin(origin, None, policy)?)
            }
        };
        routes.push(Route {
            pattern: RoutePattern::Prefix(format!("{}/", context_root)),
            action: fallback_action,
        });

        // Most specific first: exact patterns, then prefixes longest
        // first. The catch-all is the shortest prefix, so module routes
        // can never be shadowed by it.
        routes.sort_by_key(|route| match &route.pattern {
            RoutePattern::Exact(p) => (0, Reverse(p.len())),
            RoutePattern::Prefix(p) => (1, Reverse(p.len())),
        });

        Ok(Self { routes })
    }

    /// The routes in evaluation order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

/// Join optional normalized segments into a rooted prefix: `""` when
/// every segment is absent, otherwise `/seg` or `/seg/seg`.
fn join_segments(segments: &[Option<&str>]) -> String {
    let mut joined = String::new();
    for segment in segments.iter().flatten() {
        joined.push('/');
        joined.push_str(segment);
    }
    joined
}
