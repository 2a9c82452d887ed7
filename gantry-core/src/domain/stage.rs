//! Stage domain types
//!
//! A stage template describes one schedulable unit of pipeline work:
//! its display name and key, the ordered steps the executor runs, the
//! capabilities the executing agent must offer, and the artifacts the
//! run produces. Templates are built in one shot by chaining and are
//! never mutated after assembly.

use serde::{Deserialize, Serialize};

use crate::domain::step::Step;

/// A capability the execution environment must satisfy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Capability key, e.g. `system.hasDocker`
    pub key: String,
    /// Exact value the capability must report; `None` means mere presence
    pub value: Option<String>,
}

impl Requirement {
    /// Require that a capability is present, whatever its value
    pub fn present(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    /// Require that a capability reports an exact value
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }
}

/// An output a stage publishes after its steps finish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    /// Glob the executor copies out of the working directory
    pub copy_pattern: String,
    /// Directory the pattern is anchored to, when not the working directory
    pub location: Option<String>,
    /// Shared artifacts are visible to later stages
    pub shared: bool,
}

impl Artifact {
    pub fn new(name: impl Into<String>, copy_pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            copy_pattern: copy_pattern.into(),
            location: None,
            shared: false,
        }
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn shared(mut self, shared: bool) -> Self {
        self.shared = shared;
        self
    }
}

/// One schedulable unit of pipeline work
///
/// Disabled stages are retained in the plan but never scheduled by the
/// CI server; the flag exists so known-broken suites stay visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageTemplate {
    pub name: String,
    pub key: String,
    pub description: Option<String>,
    pub steps: Vec<Step>,
    pub requirements: Vec<Requirement>,
    pub artifacts: Vec<Artifact>,
    pub enabled: bool,
    pub clean_working_directory: bool,
}

impl StageTemplate {
    /// Create a stage template with the given display name and key
    pub fn new(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            description: None,
            steps: Vec::new(),
            requirements: Vec::new(),
            artifacts: Vec::new(),
            enabled: true,
            clean_working_directory: false,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Append one step; steps run in insertion order within their category
    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Append several steps at once
    pub fn steps(mut self, steps: impl IntoIterator<Item = Step>) -> Self {
        self.steps.extend(steps);
        self
    }

    pub fn requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn artifact(mut self, artifact: Artifact) -> Self {
        self.artifacts.push(artifact);
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn clean_working_directory(mut self, clean: bool) -> Self {
        self.clean_working_directory = clean;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::step::StepCategory;

    #[test]
    fn test_builder_produces_finished_value() {
        let stage = StageTemplate::new("Unit PHP72", "UTPHP72")
            .description("Run unit tests PHP72")
            .step(Step::new("Run phpunit", StepCategory::Execution, "phpunit"))
            .requirement(Requirement::equals("system.hasDocker", "1.0"))
            .artifact(Artifact::new("Test Report", "test-reports/").shared(false))
            .clean_working_directory(true);

        assert_eq!(stage.key, "UTPHP72");
        assert_eq!(stage.steps.len(), 1);
        assert_eq!(stage.requirements[0].value.as_deref(), Some("1.0"));
        assert!(stage.enabled);
        assert!(stage.clean_working_directory);
    }

    #[test]
    fn test_disabled_stage_keeps_its_contents() {
        let stage = StageTemplate::new("Func mssql", "FMS01")
            .step(Step::new("Run phpunit", StepCategory::Execution, "phpunit"))
            .enabled(false);

        assert!(!stage.enabled);
        assert_eq!(stage.steps.len(), 1);
    }
}
