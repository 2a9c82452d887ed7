//! Lint and validation stages

use gantry_core::domain::stage::StageTemplate;
use gantry_core::domain::step::{Step, StepCategory};

use crate::scripts::{self, BASH_HEADER, COMPOSER_ROOT_VERSION, ContainerShim};
use crate::suites::common;

/// Validate composer.json before actual tests are executed
pub fn composer_validate_stage(runtime: &str) -> StageTemplate {
    StageTemplate::new("Validate composer.json", "VC")
        .description("Validate composer.json before actual tests are executed")
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(
            Step::new(
                "composer validate",
                StepCategory::Execution,
                format!(
                    "{}{}composer validate",
                    BASH_HEADER,
                    scripts::composer_shim(runtime)
                ),
            )
            .with_env("COMPOSER_ROOT_VERSION", COMPOSER_ROOT_VERSION),
        )
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}

/// `php -l` over every source file
pub fn lint_stage(runtime: &str) -> StageTemplate {
    let shim = ContainerShim::new("runLint", runtime)
        .export_home()
        .command("find . -name \\*.php -print0 | xargs -0 -n1 -P2 php -n -l >/dev/null");

    StageTemplate::new(format!("Lint {}", runtime), format!("L{}", runtime))
        .description(format!("Run php -l on source files for linting {}", runtime))
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(Step::new(
            "Run php lint",
            StepCategory::Execution,
            format!("{}{}runLint", BASH_HEADER, shim.render()),
        ))
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}

/// Frontend linting: npm lint, asset build, clean-tree verification
pub fn lint_frontend_stage(runtime: &str) -> StageTemplate {
    let yarn = ContainerShim::new("yarn", runtime)
        .export_home()
        .workdir("/Build")
        .command("yarn $*");
    let npm = ContainerShim::new("npm", runtime)
        .export_home()
        .workdir("/Build")
        .command("npm $*");

    StageTemplate::new("Lint scss ts", "LSTS")
        .description("Run npm lint, run npm run build-js")
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(Step::new(
            "yarn install in Build/ dir",
            StepCategory::Setup,
            format!("{}{}yarn install", BASH_HEADER, yarn.render()),
        ))
        .step(Step::new(
            "Run npm lint",
            StepCategory::Execution,
            format!("{}{}npm run lint", BASH_HEADER, npm.render()),
        ))
        .step(Step::new(
            "Run npm build-js",
            StepCategory::Execution,
            format!("{}{}npm run build-js", BASH_HEADER, npm.render()),
        ))
        .step(Step::new(
            "Verify working tree is clean after build-js",
            StepCategory::Execution,
            format!(
                "{}git status | grep -q \"nothing to commit, working tree clean\"",
                BASH_HEADER
            ),
        ))
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}
