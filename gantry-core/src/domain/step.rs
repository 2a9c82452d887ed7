//! Step domain types

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::binding::EnvironmentBinding;
use crate::error::Result;
use crate::template::{self, SubstitutionPolicy};

/// Where a step runs within its stage
///
/// Teardown steps run after the execution steps regardless of their
/// outcome, mirroring how CI servers treat final tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepCategory {
    Setup,
    Execution,
    Teardown,
}

/// One command the executor runs on behalf of a stage
///
/// The body is opaque text handed to the external script executor. The
/// environment map is visible only to this step's process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub description: String,
    pub category: StepCategory,
    pub body: String,
    pub environment: BTreeMap<String, String>,
}

impl Step {
    /// Create a step from an already-resolved body
    pub fn new(
        description: impl Into<String>,
        category: StepCategory,
        body: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            body: body.into(),
            environment: BTreeMap::new(),
        }
    }

    /// Create a step by expanding `${name}` placeholders from a binding
    ///
    /// Uses the strict substitution policy: every placeholder in the
    /// template must be supplied by the binding.
    ///
    /// # Errors
    /// Returns `UnresolvedParameter` naming the variable and this step's
    /// description when a placeholder is not bound.
    pub fn from_template(
        description: impl Into<String>,
        category: StepCategory,
        template: &str,
        binding: &EnvironmentBinding,
    ) -> Result<Self> {
        let description = description.into();
        let body = template::expand(&description, template, binding, SubstitutionPolicy::Strict)?;
        Ok(Self {
            description,
            category,
            body,
            environment: BTreeMap::new(),
        })
    }

    /// Add an environment variable visible only to this step
    pub fn with_env(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.environment.insert(name.into(), value.into());
        self
    }
}
