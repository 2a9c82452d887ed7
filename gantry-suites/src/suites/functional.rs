//! Functional test stages
//!
//! Functional suites shard across parallel stages. Each shard installs
//! dependencies, starts the backend sidecars when the binding names a
//! compose service, carves the test corpus into chunks, and runs its own
//! phpunit chunk configuration. Backends without sidecars (mssql) run
//! phpunit directly on the agent with the credentials in the step
//! environment.

use gantry_core::domain::binding::EnvironmentBinding;
use gantry_core::domain::stage::StageTemplate;
use gantry_core::domain::step::{Step, StepCategory};
use gantry_core::error::{PlanError, Result};
use gantry_core::fanout::fan_out;
use gantry_core::keys;

use crate::scripts::{self, BASH_HEADER, ContainerShim, TESTING_FRAMEWORK_BUILD_PATH};
use crate::suites::common;

/// Generate the functional shard stages for one backend
pub fn stages(
    binding: &EnvironmentBinding,
    runtime: &str,
    shards: i32,
) -> Result<Vec<StageTemplate>> {
    let (prefix, family, enabled) = match binding.id.as_str() {
        "mariadb10" => ("FMY", "Func mysql", true),
        "pgsql10" => ("FPG", "Func pgsql", true),
        "sqlite" => ("FSL", "Func sqlite", true),
        // Functional tests on mssql are currently broken; the shards stay
        // in the plan but are never scheduled.
        "mssql" => ("FMS", "Func mssql", false),
        other => {
            return Err(PlanError::invalid_argument(format!(
                "functional suite is not defined for environment `{}`",
                other
            )));
        }
    };

    let base_key = format!("{}{}", prefix, runtime);
    let display_name = format!("{} {}", family, runtime);

    fan_out(&base_key, &display_name, shards, |index| {
        shard(binding, runtime, shards, index, enabled)
    })
}

fn shard(
    binding: &EnvironmentBinding,
    runtime: &str,
    shards: i32,
    index: u32,
    enabled: bool,
) -> Result<StageTemplate> {
    let has_sidecars = binding.parameter("service").is_some();

    let mut stage = StageTemplate::new("unnamed", "unkeyed")
        .description(format!(
            "Run functional tests on {} {}",
            binding.id, runtime
        ))
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(common::composer_install_step(runtime));

    if has_sidecars {
        stage = stage.step(Step::from_template(
            format!("Start database sidecars ({})", binding.id),
            StepCategory::Setup,
            &scripts::start_sidecars("functional"),
            binding,
        )?);
    }

    stage = stage
        .step(split_step(runtime, shards))
        .step(run_step(binding, runtime, index)?);

    if has_sidecars {
        stage = stage.step(Step::new(
            "Stop database sidecars",
            StepCategory::Teardown,
            scripts::stop_sidecars(),
        ));
    }

    Ok(stage
        .step(common::junit_report_step("test-reports/phpunit.xml"))
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
        .enabled(enabled))
}

/// Split the functional test corpus into one chunk configuration per shard
fn split_step(runtime: &str, shards: i32) -> Step {
    let shim = ContainerShim::new("splitFunctionalTests", runtime).command(format!(
        "./{}Scripts/splitFunctionalTests.php $*",
        TESTING_FRAMEWORK_BUILD_PATH
    ));

    Step::new(
        "Create list of test files to execute per shard",
        StepCategory::Setup,
        format!("{}{}splitFunctionalTests {} -v", BASH_HEADER, shim.render(), shards),
    )
}

fn run_step(binding: &EnvironmentBinding, runtime: &str, index: u32) -> Result<Step> {
    let description = format!(
        "Run phpunit with functional chunk {}",
        keys::format_index(index)
    );
    let excludes = match binding.parameter("phpunit_excludes") {
        Some(group) => format!("--exclude-group {} ", group),
        None => String::new(),
    };
    let chunk_config = format!("{}FunctionalTests-Job-{}.xml", TESTING_FRAMEWORK_BUILD_PATH, index);

    if binding.parameter("service").is_some() {
        let mut shim = ContainerShim::new("phpunit", runtime).join_network();
        for flag in common::db_env_flags(binding) {
            shim = shim.env(flag);
        }
        shim = shim
            .env("CMS_TESTING_REDIS_HOST=$COMPOSE_PROJECT_NAME-redis4")
            .env("CMS_TESTING_MEMCACHED_HOST=$COMPOSE_PROJECT_NAME-memcached1-5");

        let template = format!(
            "{}{}phpunit {}--log-junit test-reports/phpunit.xml -c {}",
            BASH_HEADER,
            shim.render(),
            excludes,
            chunk_config
        );
        Step::from_template(description, StepCategory::Execution, &template, binding)
    } else {
        let body = format!(
            "{}./bin/phpunit {}--log-junit test-reports/phpunit.xml -c {}",
            BASH_HEADER, excludes, chunk_config
        );
        let mut step = Step::new(description, StepCategory::Execution, body);
        for (name, value) in common::db_step_environment(binding) {
            step = step.with_env(name, value);
        }
        Ok(step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::binding;

    #[test]
    fn test_mariadb_shards_are_keyed_and_enabled() {
        let mariadb = binding::resolve("mariadb10").unwrap();
        let stages = stages(&mariadb, "PHP72", 12).unwrap();

        assert_eq!(stages.len(), 12);
        assert_eq!(stages[0].key, "FMYPHP7201");
        assert_eq!(stages[11].key, "FMYPHP7212");
        assert_eq!(stages[0].name, "Func mysql PHP72 01");
        assert!(stages.iter().all(|s| s.enabled));
    }

    #[test]
    fn test_sidecar_backends_start_and_stop_services() {
        let pgsql = binding::resolve("pgsql10").unwrap();
        let generated = stages(&pgsql, "PHP72", 2).unwrap();
        let stage = &generated[0];

        let start = stage
            .steps
            .iter()
            .find(|s| s.description.starts_with("Start database sidecars"))
            .expect("missing sidecar start step");
        assert!(start.body.contains("start_dependencies_functional_postgres10"));

        assert!(stage.steps.iter().any(|s| s.description == "Stop database sidecars"));
    }

    #[test]
    fn test_pgsql_run_step_substitutes_binding() {
        let pgsql = binding::resolve("pgsql10").unwrap();
        let generated = stages(&pgsql, "PHP72", 1).unwrap();
        let stage = &generated[0];

        let run = stage
            .steps
            .iter()
            .find(|s| s.description.starts_with("Run phpunit"))
            .expect("missing run step");
        assert!(run.body.contains("--exclude-group not-postgres"));
        assert!(run.body.contains("-e CMS_DB_HOST=postgres10"));
        assert!(run.body.contains("FunctionalTests-Job-1.xml"));
    }

    #[test]
    fn test_mssql_shards_are_disabled_and_sidecar_free() {
        let mssql = binding::resolve("mssql").unwrap();
        let stages = stages(&mssql, "PHP72", 3).unwrap();

        assert!(stages.iter().all(|s| !s.enabled));

        let stage = &stages[0];
        assert!(
            !stage
                .steps
                .iter()
                .any(|s| s.description.starts_with("Start database sidecars"))
        );

        let run = stage
            .steps
            .iter()
            .find(|s| s.description.starts_with("Run phpunit"))
            .expect("missing run step");
        assert!(run.body.contains("--exclude-group not-mssql"));
        assert_eq!(
            run.environment.get("CMS_DB_DRIVER").map(String::as_str),
            Some("sqlsrv")
        );
    }

    #[test]
    fn test_undefined_backend_is_rejected() {
        let none = binding::resolve("none").unwrap();
        let err = stages(&none, "PHP72", 2).unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
