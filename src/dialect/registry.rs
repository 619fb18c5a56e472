//! Name to dialect lookup, assembled once at start-up and passed around explicitly.

use std::collections::BTreeMap;

use super::Dialect;
use crate::config::AdapterProperties;
use crate::error::{VsError, VsResult};
use crate::transpiler::SqlGenerator;

#[derive(Debug, Clone, Default)]
pub struct DialectRegistry {
    dialects: BTreeMap<String, Dialect>,
}

impl DialectRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in dialect.
    pub fn builtin() -> Self {
        Dialect::ALL
            .iter()
            .fold(Self::new(), |registry, dialect| registry.register(*dialect))
    }

    pub fn register(mut self, dialect: Dialect) -> Self {
        self.dialects.insert(dialect.name().to_string(), dialect);
        self
    }

    /// Look up a dialect by name, ignoring case.
    pub fn get(&self, name: &str) -> VsResult<Dialect> {
        self.dialects
            .get(&name.trim().to_uppercase())
            .copied()
            .ok_or_else(|| VsError::UnknownDialect(name.to_string()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.dialects.keys().map(String::as_str)
    }

    /// Validate `properties` for the named dialect and build its generator.
    pub fn generator(&self, name: &str, properties: &AdapterProperties) -> VsResult<Box<dyn SqlGenerator>> {
        let dialect = self.get(name)?;
        properties.validate(&dialect)?;
        tracing::debug!(dialect = %dialect, "building SQL generator");
        dialect.generator(properties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keys;

    #[test]
    fn test_builtin_names() {
        let registry = DialectRegistry::builtin();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec!["BIGQUERY", "DB2", "EXASOL", "MYSQL", "ORACLE", "POSTGRESQL", "SQLSERVER"]
        );
    }

    #[test]
    fn test_lookup_ignores_case() {
        let registry = DialectRegistry::builtin();
        assert_eq!(registry.get("postgresql").unwrap(), Dialect::Postgresql);
        let err = registry.get("SYBASE").unwrap_err();
        assert_eq!(err.to_string(), "Unknown SQL dialect: 'SYBASE'");
    }

    #[test]
    fn test_generator_validates_first() {
        let registry = DialectRegistry::builtin();
        let properties = AdapterProperties::new()
            .with(keys::CONNECTION_NAME, "C")
            .with(keys::BIGQUERY_ENABLE_IMPORT, "TRUE");
        assert!(registry.generator("MYSQL", &properties).is_err());
        assert!(registry.generator("BIGQUERY", &properties).is_ok());
    }

    #[test]
    fn test_partial_registry() {
        let registry = DialectRegistry::new().register(Dialect::Exasol);
        assert!(registry.get("EXASOL").is_ok());
        assert!(registry.get("DB2").is_err());
    }
}
