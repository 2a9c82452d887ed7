//! Plan building
//!
//! Drives a plan request through binding resolution, the suite factory
//! and fan-out, and assembles the resulting stage groups into one
//! validated plan. Group order in the plan equals descriptor order in
//! the request.

use tracing::info;

use gantry_core::domain::plan::Plan;
use gantry_core::dto::{PlanRequest, SuiteDescriptor, SuiteKind};
use gantry_core::error::Result;

use crate::factory;

/// Build a validated plan from a request
///
/// # Errors
/// Any `PlanError` aborts the whole generation call; no partial plan is
/// ever returned.
pub fn build_plan(request: &PlanRequest) -> Result<Plan> {
    info!(suites = request.suites.len(), "Building plan");

    let mut groups = Vec::with_capacity(request.suites.len());
    for descriptor in &request.suites {
        groups.push(factory::suite_stages(descriptor)?);
    }

    let plan = Plan::assemble(groups)?;
    info!(stages = plan.len(), "Plan assembled");

    Ok(plan)
}

/// The standard pre-merge suite set for one runtime
///
/// This is the request a review pipeline submits for every incoming
/// patch: validation and lint first, then the unit families, the
/// functional shards per backend, acceptance, and the repository-wide
/// integration checks.
pub fn pre_merge_request(runtime: &str) -> PlanRequest {
    PlanRequest {
        name: Some(format!("Pre-merge {}", runtime)),
        suites: vec![
            SuiteDescriptor::new(SuiteKind::ComposerValidate, runtime),
            SuiteDescriptor::new(SuiteKind::Lint, runtime),
            SuiteDescriptor::new(SuiteKind::LintFrontend, runtime),
            SuiteDescriptor::new(SuiteKind::Unit, runtime),
            SuiteDescriptor::new(SuiteKind::UnitDeprecated, runtime),
            SuiteDescriptor::new(SuiteKind::UnitRandom, runtime).sharded(2),
            SuiteDescriptor::new(SuiteKind::UnitJavascript, runtime),
            SuiteDescriptor::new(SuiteKind::Functional, runtime)
                .on("mariadb10")
                .sharded(12),
            SuiteDescriptor::new(SuiteKind::Functional, runtime)
                .on("pgsql10")
                .sharded(6),
            SuiteDescriptor::new(SuiteKind::Functional, runtime)
                .on("sqlite")
                .sharded(6),
            SuiteDescriptor::new(SuiteKind::Functional, runtime)
                .on("mssql")
                .sharded(6),
            SuiteDescriptor::new(SuiteKind::Acceptance, runtime)
                .on("mariadb10")
                .sharded(3),
            SuiteDescriptor::new(SuiteKind::AcceptanceInstall, runtime).on("mariadb10"),
            SuiteDescriptor::new(SuiteKind::AcceptanceInstall, runtime).on("pgsql10"),
            SuiteDescriptor::new(SuiteKind::AcceptanceInstall, runtime).on("sqlite"),
            SuiteDescriptor::new(SuiteKind::IntegrationAnnotations, runtime),
            SuiteDescriptor::new(SuiteKind::IntegrationVarious, runtime),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::error::PlanError;
    use std::collections::HashSet;

    #[test]
    fn test_pre_merge_plan_assembles() {
        let plan = build_plan(&pre_merge_request("PHP72")).unwrap();

        // 11 fixed stages + 2 random + 12 + 6 + 6 + 6 functional + 3 acceptance
        assert_eq!(plan.len(), 46);
        assert_eq!(plan.stages()[0].key, "VC");

        let keys: HashSet<&str> = plan.stages().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys.len(), plan.len());
        assert!(keys.contains("FMYPHP7201"));
        assert!(keys.contains("FMYPHP7212"));
        assert!(keys.contains("ACINSTSQPHP72"));
    }

    #[test]
    fn test_plan_order_follows_request_order() {
        let request = PlanRequest {
            name: None,
            suites: vec![
                SuiteDescriptor::new(SuiteKind::Unit, "PHP72"),
                SuiteDescriptor::new(SuiteKind::Lint, "PHP72"),
            ],
        };

        let plan = build_plan(&request).unwrap();
        let keys: Vec<&str> = plan.stages().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["UTPHP72", "LPHP72"]);
    }

    #[test]
    fn test_repeated_suites_collide_on_keys() {
        let request = PlanRequest {
            name: None,
            suites: vec![
                SuiteDescriptor::new(SuiteKind::Unit, "PHP72"),
                SuiteDescriptor::new(SuiteKind::Unit, "PHP72"),
            ],
        };

        let err = build_plan(&request).unwrap_err();
        match err {
            PlanError::DuplicateKey { key, first, second } => {
                assert_eq!(key, "UTPHP72");
                assert_eq!((first, second), (0, 1));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_same_suite_on_two_runtimes_is_fine() {
        let request = PlanRequest {
            name: None,
            suites: vec![
                SuiteDescriptor::new(SuiteKind::Unit, "PHP72"),
                SuiteDescriptor::new(SuiteKind::Unit, "PHP73"),
            ],
        };

        let plan = build_plan(&request).unwrap();
        assert_eq!(plan.len(), 2);
    }
}
