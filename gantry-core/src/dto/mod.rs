//! Data transfer objects for plan requests
//!
//! These types describe the JSON surface callers use to ask for a plan:
//! an ordered list of suite descriptors, each naming a suite kind, the
//! backend it targets, the PHP runtime tag, and how many shards to fan
//! out into.

use serde::{Deserialize, Serialize};

/// The suite families the catalog knows how to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuiteKind {
    ComposerValidate,
    Lint,
    LintFrontend,
    Unit,
    UnitDeprecated,
    UnitRandom,
    UnitJavascript,
    Functional,
    Acceptance,
    AcceptanceInstall,
    IntegrationAnnotations,
    IntegrationVarious,
}

/// One requested suite: what to run, against which backend, split how
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteDescriptor {
    pub kind: SuiteKind,
    /// Environment identifier, e.g. `mariadb10`; `none` for suites that
    /// run without a database
    #[serde(default = "default_environment")]
    pub environment: String,
    /// PHP runtime tag, e.g. `PHP72`, used in stage names, keys and
    /// container image tags
    pub runtime: String,
    /// Shard count for fan-out suites; single-stage suites ignore it
    #[serde(default = "default_shards")]
    pub shards: i32,
}

fn default_environment() -> String {
    "none".to_string()
}

fn default_shards() -> i32 {
    1
}

impl SuiteDescriptor {
    pub fn new(kind: SuiteKind, runtime: impl Into<String>) -> Self {
        Self {
            kind,
            environment: default_environment(),
            runtime: runtime.into(),
            shards: default_shards(),
        }
    }

    /// Target a database backend
    pub fn on(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    /// Split the suite across this many parallel stages
    pub fn sharded(mut self, shards: i32) -> Self {
        self.shards = shards;
        self
    }
}

/// Request for a full plan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Optional display name used in summaries
    #[serde(default)]
    pub name: Option<String>,
    /// Ordered suite descriptors; stage groups appear in this order
    pub suites: Vec<SuiteDescriptor>,
}
