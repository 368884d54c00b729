//! Module descriptor resolution.
//!
//! A module is addressed by two names: the compiler-facing identifier
//! (dotted, like `com.example.App`) and the URL-facing output name the
//! browser requests it under. Resolution happens once at startup and
//! the result is immutable.

use std::collections::HashMap;

use crate::config::ModuleSpec;

/// A resolved module: compiler-facing identifier plus the URL-facing
/// output name derived for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    /// Compiler-facing identifier.
    pub identifier: String,
    /// URL-facing output name. Unique per server instance (enforced by
    /// the route table builder).
    pub output_name: String,
}

/// Error resolving a module descriptor.
#[derive(Debug, thiserror::Error)]
pub enum ModuleError {
    #[error("empty module identifier")]
    EmptyIdentifier,

    #[error("module `{identifier}` resolves to unusable output name `{output_name}`")]
    InvalidOutputName {
        identifier: String,
        output_name: String,
    },
}

/// Maps a module identifier to its output name.
pub trait ModuleResolver {
    /// Resolve one identifier into a full descriptor.
    fn resolve(&self, identifier: &str) -> Result<Module, ModuleError>;
}

/// Resolver applying the identifier naming convention: the output name
/// is the last dot-separated segment, unless an explicit override was
/// configured for the identifier.
#[derive(Debug, Default)]
pub struct ConventionResolver {
    overrides: HashMap<String, String>,
}

impl ConventionResolver {
    /// Build a resolver from the configured module specs, taking any
    /// explicit `identifier=output` pairs as overrides.
    pub fn from_specs(specs: &[ModuleSpec]) -> Self {
        let overrides = specs
            .iter()
            .filter_map(|s| {
                s.output_name
                    .as_ref()
                    .map(|out| (s.identifier.clone(), out.clone()))
            })
            .collect();
        Self { overrides }
    }
}

impl ModuleResolver for ConventionResolver {
    fn resolve(&self, identifier: &str) -> Result<Module, ModuleError> {
        if identifier.is_empty() {
            return Err(ModuleError::EmptyIdentifier);
        }
        let output_name = match self.overrides.get(identifier) {
            Some(explicit) => explicit.clone(),
            None => identifier
                .rsplit('.')
                .next()
                .unwrap_or(identifier)
                .to_string(),
        };
        // Output names become path segments; anything else would
        // corrupt the route table.
        let usable = !output_name.is_empty()
            && output_name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !usable {
            return Err(ModuleError::InvalidOutputName {
                identifier: identifier.to_string(),
                output_name,
            });
        }
        Ok(Module {
            identifier: identifier.to_string(),
            output_name,
        })
    }
}

/// Resolve every configured module, preserving the configured order.
pub fn resolve_all(
    specs: &[ModuleSpec],
    resolver: &impl ModuleResolver,
) -> Result<Vec<Module>, ModuleError> {
    specs
        .iter()
        .map(|spec| resolver.resolve(&spec.identifier))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convention_takes_last_segment() {
        let resolver = ConventionResolver::default();
        let module = resolver.resolve("com.example.App").unwrap();
        assert_eq!(module.output_name, "App");
    }

    #[test]
    fn bare_identifier_is_its_own_output_name() {
        let resolver = ConventionResolver::default();
        let module = resolver.resolve("tests").unwrap();
        assert_eq!(module.output_name, "tests");
    }

    #[test]
    fn explicit_override_wins() {
        let specs = vec![ModuleSpec::parse("com.example.App=app")];
        let resolver = ConventionResolver::from_specs(&specs);
        let module = resolver.resolve("com.example.App").unwrap();
        assert_eq!(module.output_name, "app");
    }

    #[test]
    fn rejects_output_name_with_separator() {
        let specs = vec![ModuleSpec::parse("com.example.App=a/b")];
        let resolver = ConventionResolver::from_specs(&specs);
        assert!(matches!(
            resolver.resolve("com.example.App"),
            Err(ModuleError::InvalidOutputName { .. })
        ));
    }

    #[test]
    fn rejects_trailing_dot() {
        let resolver = ConventionResolver::default();
        assert!(matches!(
            resolver.resolve("com.example."),
            Err(ModuleError::InvalidOutputName { .. })
        ));
    }

    #[test]
    fn resolve_all_preserves_order() {
        let specs = vec![
            ModuleSpec::parse("com.example.One"),
            ModuleSpec::parse("com.example.Two"),
        ];
        let resolver = ConventionResolver::from_specs(&specs);
        let modules = resolve_all(&specs, &resolver).unwrap();
        assert_eq!(modules[0].output_name, "One");
        assert_eq!(modules[1].output_name, "Two");
    }
}
