//! Environment bindings
//!
//! An environment binding maps an abstract backend identifier to the
//! concrete connection parameters injected into stage scripts: hostnames,
//! credentials, driver flags, and the sidecar service the executor has to
//! start. Bindings resolve from a static table; resolution hands out a
//! fresh value each time, so callers can never corrupt the defaults.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{PlanError, Result};

/// Identifiers accepted by [`resolve`]
pub const KNOWN_ENVIRONMENTS: &[&str] = &["mariadb10", "mssql", "none", "pgsql10", "sqlite"];

/// Concrete runtime parameters for one target backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentBinding {
    pub id: String,
    pub parameters: BTreeMap<String, String>,
}

impl EnvironmentBinding {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Look up a parameter by name
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }
}

/// Resolve an environment identifier to its binding
///
/// # Errors
/// Returns `UnknownEnvironment` when the identifier is not in the table.
pub fn resolve(environment_id: &str) -> Result<EnvironmentBinding> {
    let binding = match environment_id {
        "mariadb10" => EnvironmentBinding::new("mariadb10")
            .with_parameter("driver", "mysqli")
            .with_parameter("host", "mariadb10")
            .with_parameter("database", "func_test")
            .with_parameter("username", "root")
            .with_parameter("password", "funcp")
            .with_parameter("service", "mariadb10")
            .with_parameter("flavor", "mysql"),
        "pgsql10" => EnvironmentBinding::new("pgsql10")
            .with_parameter("driver", "pdo_pgsql")
            .with_parameter("host", "postgres10")
            .with_parameter("database", "func")
            .with_parameter("username", "func")
            .with_parameter("password", "funcp")
            .with_parameter("service", "postgres10")
            .with_parameter("flavor", "postgresql")
            .with_parameter("phpunit_excludes", "not-postgres"),
        "sqlite" => EnvironmentBinding::new("sqlite")
            .with_parameter("driver", "pdo_sqlite")
            .with_parameter("service", "sqlite")
            .with_parameter("flavor", "sqlite")
            .with_parameter("phpunit_excludes", "not-sqlite"),
        "mssql" => EnvironmentBinding::new("mssql")
            .with_parameter("driver", "sqlsrv")
            .with_parameter("host", "localhost")
            .with_parameter("port", "1433")
            .with_parameter("database", "func")
            .with_parameter("username", "SA")
            .with_parameter("password", "Test1234!")
            .with_parameter("charset", "utf-8")
            .with_parameter("phpunit_excludes", "not-mssql"),
        // Pure lint/unit stages run without a database
        "none" => EnvironmentBinding::new("none"),
        other => return Err(PlanError::UnknownEnvironment(other.to_string())),
    };

    debug!(
        environment = environment_id,
        parameters = binding.parameters.len(),
        "Resolved environment binding"
    );

    Ok(binding)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pgsql10_supplies_connection_parameters() {
        let binding = resolve("pgsql10").unwrap();

        for name in ["host", "username", "password", "driver"] {
            assert!(
                binding.parameter(name).is_some(),
                "pgsql10 binding is missing `{}`",
                name
            );
        }
        assert_eq!(binding.parameter("driver"), Some("pdo_pgsql"));
    }

    #[test]
    fn test_unknown_environment_is_rejected() {
        let err = resolve("unknown-db").unwrap_err();
        match err {
            PlanError::UnknownEnvironment(id) => assert_eq!(id, "unknown-db"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_none_binding_is_empty() {
        let binding = resolve("none").unwrap();
        assert!(binding.parameters.is_empty());
    }

    #[test]
    fn test_every_known_environment_resolves() {
        for &id in KNOWN_ENVIRONMENTS {
            assert!(resolve(id).is_ok(), "`{}` failed to resolve", id);
        }
    }

    #[test]
    fn test_resolution_hands_out_fresh_values() {
        let mut first = resolve("sqlite").unwrap();
        first.parameters.insert("driver".to_string(), "mutated".to_string());

        let second = resolve("sqlite").unwrap();
        assert_eq!(second.parameter("driver"), Some("pdo_sqlite"));
    }
}
