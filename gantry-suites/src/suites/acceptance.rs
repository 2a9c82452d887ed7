//! Acceptance test stages
//!
//! Two families: the single install stages that set the CMS up from
//! scratch on one backend and load the introduction package, and the
//! chunked browser-test shards. The chunked shards only exist for
//! mariadb and are currently broken, so they are generated disabled.

use gantry_core::domain::binding::EnvironmentBinding;
use gantry_core::domain::stage::{Artifact, StageTemplate};
use gantry_core::domain::step::{Step, StepCategory};
use gantry_core::error::{PlanError, Result};
use gantry_core::fanout::fan_out;

use crate::scripts::{self, BASH_HEADER, ContainerShim, TESTING_FRAMEWORK_BUILD_PATH};
use crate::suites::common;

const REPORT_PATH: &str = "var/tests/acceptance-reports/";

/// Connection parameters forwarded to the installer, with the
/// environment variable each one becomes
const INSTALL_ENV_VARS: &[(&str, &str)] = &[
    ("host", "CMS_INSTALL_DB_HOST"),
    ("database", "CMS_INSTALL_DB_NAME"),
    ("username", "CMS_INSTALL_DB_USERNAME"),
    ("password", "CMS_INSTALL_DB_PASSWORD"),
];

fn test_report_artifact() -> Artifact {
    Artifact::new("Test Report", REPORT_PATH).shared(false)
}

/// Generate the chunked acceptance shard stages
pub fn stages(
    binding: &EnvironmentBinding,
    runtime: &str,
    shards: i32,
) -> Result<Vec<StageTemplate>> {
    if binding.id != "mariadb10" {
        return Err(PlanError::invalid_argument(format!(
            "chunked acceptance suite is only defined for environment `mariadb10`, got `{}`",
            binding.id
        )));
    }

    let base_key = format!("ACMY{}", runtime);
    let display_name = format!("Accept my {}", runtime);

    fan_out(&base_key, &display_name, shards, |index| {
        Ok(shard(binding, runtime, shards, index))
    })
}

fn shard(binding: &EnvironmentBinding, runtime: &str, shards: i32, index: u32) -> StageTemplate {
    let split_body = format!(
        "{}./{}Scripts/splitAcceptanceTests.sh {}\n",
        BASH_HEADER, TESTING_FRAMEWORK_BUILD_PATH, shards
    );

    let run_body = format!(
        "{}./bin/codecept run Acceptance -d -g AcceptanceTests-Job-{} -c {}AcceptanceTests.yml --xml reports.xml --html reports.html\n",
        BASH_HEADER, index, TESTING_FRAMEWORK_BUILD_PATH
    );
    let mut run = Step::new(
        "Run codeception acceptance chunk",
        StepCategory::Execution,
        run_body,
    );
    for (name, value) in common::db_step_environment(binding) {
        run = run.with_env(name, value);
    }

    StageTemplate::new("unnamed", "unkeyed")
        .description(format!("Run acceptance tests on {} {}", binding.id, runtime))
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(common::composer_install_step(runtime))
        .step(common::prepare_test_directories_step())
        .step(Step::new(
            "Split acceptance tests",
            StepCategory::Setup,
            split_body,
        ))
        .step(run)
        .step(Step::new(
            "Stop database sidecars",
            StepCategory::Teardown,
            scripts::stop_sidecars(),
        ))
        .step(common::junit_report_step(&format!("{}reports.xml", REPORT_PATH)))
        .artifact(test_report_artifact())
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
        // Broken since the browser-test rework; kept visible but unscheduled
        .enabled(false)
}

/// Generate the install-and-load-introduction-package stage for a backend
pub fn install_stage(binding: &EnvironmentBinding, runtime: &str) -> Result<StageTemplate> {
    let (key_prefix, short) = match binding.id.as_str() {
        "mariadb10" => ("ACINSTMY", "my"),
        "pgsql10" => ("ACINSTPG", "pg"),
        "sqlite" => ("ACINSTSQ", "sq"),
        other => {
            return Err(PlanError::invalid_argument(format!(
                "acceptance install suite is not defined for environment `{}`",
                other
            )));
        }
    };

    let mut shim = ContainerShim::new("codecept", runtime).join_network();
    for (param, var) in INSTALL_ENV_VARS {
        if binding.parameter(param).is_some() {
            shim = shim.env(format!("{}=${{{}}}", var, param));
        }
    }

    let run_template = format!(
        "{}{}codecept run Install -d -c Tests/codeception.yml --env=${{flavor}} --xml reports.xml --html reports.html\n",
        BASH_HEADER,
        shim.render()
    );
    let run = Step::from_template(
        format!("Install the CMS on {}", binding.id),
        StepCategory::Execution,
        &run_template,
        binding,
    )?;

    Ok(StageTemplate::new(
        format!("Accept inst {} {}", short, runtime),
        format!("{}{}", key_prefix, runtime),
    )
    .description(format!(
        "Install the CMS on {} and load the introduction package {}",
        binding.id, runtime
    ))
    .step(common::checkout_step())
    .step(common::cherry_pick_step())
    .step(common::composer_install_step(runtime))
    .step(common::prepare_test_directories_step())
    .step(Step::from_template(
        format!("Start database sidecars ({})", binding.id),
        StepCategory::Setup,
        &scripts::start_sidecars("acceptance_install"),
        binding,
    )?)
    .step(run)
    .step(Step::new(
        "Stop database sidecars",
        StepCategory::Teardown,
        scripts::stop_sidecars(),
    ))
    .step(common::junit_report_step(&format!("{}reports.xml", REPORT_PATH)))
    .artifact(test_report_artifact())
    .requirement(common::docker_requirement())
    .clean_working_directory(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::domain::binding;

    #[test]
    fn test_chunked_shards_are_disabled_with_padded_keys() {
        let mariadb = binding::resolve("mariadb10").unwrap();
        let generated = stages(&mariadb, "PHP72", 3).unwrap();

        let keys: Vec<&str> = generated.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["ACMYPHP7201", "ACMYPHP7202", "ACMYPHP7203"]);
        assert!(generated.iter().all(|s| !s.enabled));
        assert!(generated.iter().all(|s| !s.artifacts.is_empty()));
    }

    #[test]
    fn test_chunked_suite_requires_mariadb() {
        let pgsql = binding::resolve("pgsql10").unwrap();
        let err = stages(&pgsql, "PHP72", 3).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_install_stage_substitutes_flavor_and_credentials() {
        let mariadb = binding::resolve("mariadb10").unwrap();
        let stage = install_stage(&mariadb, "PHP72").unwrap();

        assert_eq!(stage.key, "ACINSTMYPHP72");
        assert_eq!(stage.name, "Accept inst my PHP72");

        let run = stage
            .steps
            .iter()
            .find(|s| s.description.starts_with("Install the CMS"))
            .expect("missing install step");
        assert!(run.body.contains("--env=mysql"));
        assert!(run.body.contains("-e CMS_INSTALL_DB_HOST=mariadb10"));
    }

    #[test]
    fn test_install_stage_on_sqlite_has_no_credential_flags() {
        let sqlite = binding::resolve("sqlite").unwrap();
        let stage = install_stage(&sqlite, "PHP72").unwrap();

        assert_eq!(stage.key, "ACINSTSQPHP72");
        let run = stage
            .steps
            .iter()
            .find(|s| s.description.starts_with("Install the CMS"))
            .expect("missing install step");
        assert!(run.body.contains("--env=sqlite"));
        assert!(!run.body.contains("CMS_INSTALL_DB_HOST"));
    }

    #[test]
    fn test_install_stage_rejects_mssql() {
        let mssql = binding::resolve("mssql").unwrap();
        let err = install_stage(&mssql, "PHP72").unwrap_err();
        assert!(err.is_invalid_argument());
    }
}
