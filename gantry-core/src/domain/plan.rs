//! Plan assembly
//!
//! A plan is the complete, ordered, validated set of stages handed to the
//! external CI server. Assembly is all-or-nothing: either every stage key
//! is unique and the caller gets an immutable plan, or nothing is built.
//! Stage order is the one contract the plan exposes to the executor; it
//! always equals the caller's declaration order.

use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

use crate::domain::stage::StageTemplate;
use crate::error::{PlanError, Result};

/// The complete, ordered, validated set of stages for one pipeline
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    stages: Vec<StageTemplate>,
}

impl Plan {
    /// Assemble a plan from ordered groups of stages
    ///
    /// Flattens the groups preserving inter-group and intra-group order
    /// and validates that stage keys are globally unique.
    ///
    /// # Errors
    /// Returns `DuplicateKey` carrying the offending key and the
    /// zero-based positions of both occurrences.
    pub fn assemble(stage_groups: Vec<Vec<StageTemplate>>) -> Result<Plan> {
        let stages: Vec<StageTemplate> = stage_groups.into_iter().flatten().collect();

        let mut seen: HashMap<&str, usize> = HashMap::with_capacity(stages.len());
        for (position, stage) in stages.iter().enumerate() {
            if let Some(&first) = seen.get(stage.key.as_str()) {
                return Err(PlanError::DuplicateKey {
                    key: stage.key.clone(),
                    first,
                    second: position,
                });
            }
            seen.insert(stage.key.as_str(), position);
        }

        debug!(stage_count = stages.len(), "Assembled plan");

        Ok(Plan { stages })
    }

    /// The stages in declaration order
    pub fn stages(&self) -> &[StageTemplate] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}
