//! Steps and requirements shared by every suite family

use gantry_core::domain::binding::EnvironmentBinding;
use gantry_core::domain::stage::Requirement;
use gantry_core::domain::step::{Step, StepCategory};

use crate::scripts::{self, BASH_HEADER, COMPOSER_ROOT_VERSION};

/// Database connection parameters a stage may forward to the CMS, with
/// the environment variable each one becomes, in script order
const DB_ENV_VARS: &[(&str, &str)] = &[
    ("driver", "CMS_DB_DRIVER"),
    ("host", "CMS_DB_HOST"),
    ("port", "CMS_DB_PORT"),
    ("database", "CMS_DB_NAME"),
    ("username", "CMS_DB_USERNAME"),
    ("password", "CMS_DB_PASSWORD"),
    ("charset", "CMS_DB_CHARSET"),
];

/// `docker run -e` flags forwarding the binding's connection parameters
/// as `${...}` plan-time placeholders
pub fn db_env_flags(binding: &EnvironmentBinding) -> Vec<String> {
    DB_ENV_VARS
        .iter()
        .filter(|(param, _)| binding.parameter(param).is_some())
        .map(|(param, var)| format!("{}=${{{}}}", var, param))
        .collect()
}

/// The binding's connection parameters as step-local environment entries,
/// for stages that run the CMS directly on the agent
pub fn db_step_environment(binding: &EnvironmentBinding) -> Vec<(String, String)> {
    DB_ENV_VARS
        .iter()
        .filter_map(|(param, var)| {
            binding
                .parameter(param)
                .map(|value| (var.to_string(), value.to_string()))
        })
        .collect()
}

/// Every stage runs on an agent with the container runtime
pub fn docker_requirement() -> Requirement {
    Requirement::equals("system.hasDocker", "1.0")
}

/// Check out the revision under test
pub fn checkout_step() -> Step {
    Step::new(
        "Checkout repository",
        StepCategory::Setup,
        format!(
            "{}git init .\ngit fetch --depth 1 $REPOSITORY_URL $REVISION\ngit checkout FETCH_HEAD\n",
            BASH_HEADER
        ),
    )
}

/// Cherry-pick the review patch on top of the checkout, when one is set
pub fn cherry_pick_step() -> Step {
    Step::new(
        "Apply review patch",
        StepCategory::Setup,
        format!(
            "{}if [ -n \"$CHANGE_REF\" ]; then\n    git fetch $REVIEW_REMOTE $CHANGE_REF || exit 1\n    git cherry-pick FETCH_HEAD || exit 1\nfi\n",
            BASH_HEADER
        ),
    )
}

/// Install composer dependencies inside the runtime container
pub fn composer_install_step(runtime: &str) -> Step {
    Step::new(
        "composer install",
        StepCategory::Setup,
        format!(
            "{}{}composer install -n",
            BASH_HEADER,
            scripts::composer_shim(runtime)
        ),
    )
    .with_env("COMPOSER_ROOT_VERSION", COMPOSER_ROOT_VERSION)
}

/// Create the directories test runs write into
pub fn prepare_test_directories_step() -> Step {
    Step::new(
        "Prepare test directories",
        StepCategory::Setup,
        format!("{}mkdir -p var/tests/\n", BASH_HEADER),
    )
}

/// Hand the produced JUnit files to the executor's result parser
pub fn junit_report_step(result_path: &str) -> Step {
    Step::new(
        "Parse test result files",
        StepCategory::Teardown,
        format!("ci-parse-test-results junit {}\n", result_path),
    )
}
