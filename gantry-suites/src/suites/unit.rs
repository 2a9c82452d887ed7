//! Unit test stages
//!
//! PHP unit suites run phpunit without xdebug inside the runtime
//! container; the randomized family reruns the same suite with shuffled
//! test order to shake out ordering dependencies. JavaScript unit tests
//! run through karma.

use gantry_core::domain::stage::{Artifact, StageTemplate};
use gantry_core::domain::step::{Step, StepCategory};
use gantry_core::error::Result;
use gantry_core::fanout::fan_out;

use crate::scripts::{BASH_HEADER, ContainerShim, TESTING_FRAMEWORK_BUILD_PATH};
use crate::suites::common;

const PHP_NO_XDEBUG: &str = "php -n -c /etc/php/cli-no-xdebug/php.ini";

fn phpunit_run_step(runtime: &str, call: &str) -> Step {
    let shim = ContainerShim::new("phpunit", runtime)
        .join_network()
        .command(format!("{} bin/phpunit $*", PHP_NO_XDEBUG));

    Step::new(
        "Run phpunit",
        StepCategory::Execution,
        format!("{}{}{}", BASH_HEADER, shim.render(), call),
    )
}

/// The plain unit test stage
pub fn unit_stage(runtime: &str) -> StageTemplate {
    StageTemplate::new(format!("Unit {}", runtime), format!("UT{}", runtime))
        .description(format!("Run unit tests {}", runtime))
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(common::composer_install_step(runtime))
        .step(phpunit_run_step(
            runtime,
            &format!(
                "phpunit --log-junit test-reports/phpunit.xml -c {}UnitTests.xml",
                TESTING_FRAMEWORK_BUILD_PATH
            ),
        ))
        .step(common::junit_report_step("test-reports/phpunit.xml"))
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}

/// Unit tests for deprecated code paths, kept separate so the main suite
/// stays deprecation-clean
pub fn unit_deprecated_stage(runtime: &str) -> StageTemplate {
    StageTemplate::new(
        format!("Unit deprecated {}", runtime),
        format!("UTD{}", runtime),
    )
    .description(format!("Run deprecated unit tests {}", runtime))
    .step(common::checkout_step())
    .step(common::cherry_pick_step())
    .step(common::composer_install_step(runtime))
    .step(phpunit_run_step(
        runtime,
        &format!(
            "phpunit --log-junit test-reports/phpunit.xml -c {}UnitTestsDeprecated.xml",
            TESTING_FRAMEWORK_BUILD_PATH
        ),
    ))
    .step(common::junit_report_step("test-reports/phpunit.xml"))
    .requirement(common::docker_requirement())
    .clean_working_directory(true)
}

/// Randomized-order unit test runs
pub fn unit_random_stages(runtime: &str, shards: i32) -> Result<Vec<StageTemplate>> {
    let base_key = format!("UTR{}", runtime);
    let display_name = format!("Unit {} random", runtime);

    fan_out(&base_key, &display_name, shards, |_index| {
        let shim = ContainerShim::new("phpunitRandomizer", runtime)
            .join_network()
            .command(format!("{} bin/phpunit-randomizer $*", PHP_NO_XDEBUG));

        Ok(StageTemplate::new("unnamed", "unkeyed")
            .description(format!("Run unit tests on {} in random order", runtime))
            .step(common::checkout_step())
            .step(common::cherry_pick_step())
            .step(common::composer_install_step(runtime))
            .step(Step::new(
                "Run phpunit-randomizer",
                StepCategory::Execution,
                format!(
                    "{}{}phpunitRandomizer --log-junit test-reports/phpunit.xml -c {}UnitTests.xml --order rand",
                    BASH_HEADER,
                    shim.render(),
                    TESTING_FRAMEWORK_BUILD_PATH
                ),
            ))
            .step(common::junit_report_step("test-reports/phpunit.xml"))
            .requirement(common::docker_requirement())
            .clean_working_directory(true))
    })
}

/// The JavaScript unit test stage
pub fn unit_javascript_stage(runtime: &str) -> StageTemplate {
    let yarn = ContainerShim::new("yarn", runtime)
        .export_home()
        .workdir("/Build")
        .command("yarn $*");
    let karma = ContainerShim::new("karma", runtime)
        .export_home()
        .command("./Build/node_modules/karma/bin/karma $*");

    StageTemplate::new("Unit JavaScript", "JSUT")
        .description("Run JavaScript unit tests")
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(common::composer_install_step(runtime))
        .step(Step::new(
            "yarn install in Build/ dir",
            StepCategory::Setup,
            format!("{}{}yarn install", BASH_HEADER, yarn.render()),
        ))
        .step(Step::new(
            "Run karma tests",
            StepCategory::Execution,
            format!(
                "{}{}karma start {}Configuration/JSUnit/karma.conf.js --single-run",
                BASH_HEADER,
                karma.render(),
                TESTING_FRAMEWORK_BUILD_PATH
            ),
        ))
        .step(common::junit_report_step("var/tests/*"))
        .artifact(
            Artifact::new("Coverage Report (JSUnit)", "**/*.*")
                .location("Build/target/site/coverage")
                .shared(false),
        )
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_family_keys_embed_runtime() {
        assert_eq!(unit_stage("PHP72").key, "UTPHP72");
        assert_eq!(unit_deprecated_stage("PHP72").key, "UTDPHP72");
        assert_eq!(unit_javascript_stage("PHP72").key, "JSUT");
    }

    #[test]
    fn test_unit_runs_without_xdebug() {
        let stage = unit_stage("PHP72");
        let run = stage
            .steps
            .iter()
            .find(|s| s.description == "Run phpunit")
            .expect("missing run step");
        assert!(run.body.contains("cli-no-xdebug"));
        assert!(run.body.contains("UnitTests.xml"));
    }

    #[test]
    fn test_random_runs_fan_out() {
        let generated = unit_random_stages("PHP72", 2).unwrap();

        assert_eq!(generated.len(), 2);
        assert_eq!(generated[0].key, "UTRPHP7201");
        assert_eq!(generated[1].key, "UTRPHP7202");
        assert_eq!(generated[0].name, "Unit PHP72 random 01");
        assert!(generated[0]
            .steps
            .iter()
            .any(|s| s.body.contains("--order rand")));
    }

    #[test]
    fn test_javascript_stage_publishes_coverage() {
        let stage = unit_javascript_stage("PHP72");

        let artifact = &stage.artifacts[0];
        assert_eq!(artifact.location.as_deref(), Some("Build/target/site/coverage"));
        assert!(!artifact.shared);
    }
}
