//! Suite factory
//!
//! One parametrized dispatch keyed by `(kind, environment)` replaces the
//! per-combination stage definitions a hand-maintained CI configuration
//! accumulates. The factory resolves the environment binding, checks the
//! combination is actually defined, and hands off to the family builders.

use gantry_core::domain::binding::{self, EnvironmentBinding};
use gantry_core::domain::stage::StageTemplate;
use gantry_core::dto::{SuiteDescriptor, SuiteKind};
use gantry_core::error::{PlanError, Result};

use crate::suites::{acceptance, functional, integration, lint, unit};

/// Generate the stage group for one suite descriptor
///
/// # Errors
/// Returns `UnknownEnvironment` for identifiers outside the binding
/// table, and `InvalidArgument` for combinations the catalog does not
/// define (e.g. chunked acceptance on pgsql) or malformed shard counts.
pub fn suite_stages(descriptor: &SuiteDescriptor) -> Result<Vec<StageTemplate>> {
    let binding = binding::resolve(&descriptor.environment)?;
    let runtime = descriptor.runtime.as_str();

    match descriptor.kind {
        SuiteKind::ComposerValidate => {
            require_no_database(&binding, "composer-validate")?;
            Ok(vec![lint::composer_validate_stage(runtime)])
        }
        SuiteKind::Lint => {
            require_no_database(&binding, "lint")?;
            Ok(vec![lint::lint_stage(runtime)])
        }
        SuiteKind::LintFrontend => {
            require_no_database(&binding, "lint-frontend")?;
            Ok(vec![lint::lint_frontend_stage(runtime)])
        }
        SuiteKind::Unit => {
            require_no_database(&binding, "unit")?;
            Ok(vec![unit::unit_stage(runtime)])
        }
        SuiteKind::UnitDeprecated => {
            require_no_database(&binding, "unit-deprecated")?;
            Ok(vec![unit::unit_deprecated_stage(runtime)])
        }
        SuiteKind::UnitRandom => {
            require_no_database(&binding, "unit-random")?;
            unit::unit_random_stages(runtime, descriptor.shards)
        }
        SuiteKind::UnitJavascript => {
            require_no_database(&binding, "unit-javascript")?;
            Ok(vec![unit::unit_javascript_stage(runtime)])
        }
        SuiteKind::Functional => functional::stages(&binding, runtime, descriptor.shards),
        SuiteKind::Acceptance => acceptance::stages(&binding, runtime, descriptor.shards),
        SuiteKind::AcceptanceInstall => Ok(vec![acceptance::install_stage(&binding, runtime)?]),
        SuiteKind::IntegrationAnnotations => {
            require_no_database(&binding, "integration-annotations")?;
            Ok(vec![integration::annotations_stage(runtime)])
        }
        SuiteKind::IntegrationVarious => {
            require_no_database(&binding, "integration-various")?;
            Ok(vec![integration::various_stage(runtime)])
        }
    }
}

fn require_no_database(binding: &EnvironmentBinding, kind: &str) -> Result<()> {
    if binding.id != "none" {
        return Err(PlanError::invalid_argument(format!(
            "suite `{}` runs without a database, got environment `{}`",
            kind, binding.id
        )));
    }
    Ok(())
}
