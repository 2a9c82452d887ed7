//! Integration check stages
//!
//! Repository-wide consistency checks that are neither lint nor tests:
//! docblock annotations, duplicate exception codes, translation files,
//! file permissions, documentation markup, fixture formats.

use gantry_core::domain::stage::StageTemplate;
use gantry_core::domain::step::{Step, StepCategory};

use crate::scripts::{BASH_HEADER, ContainerShim};
use crate::suites::common;

/// Run a repository script directly on the agent
fn script_step(description: &str, line: &str) -> Step {
    Step::new(
        description,
        StepCategory::Execution,
        format!("{}{}\n", BASH_HEADER, line),
    )
}

/// Run a repository script inside the runtime container
fn container_script_step(description: &str, function_name: &str, runtime: &str) -> Step {
    let shim = ContainerShim::new(function_name, runtime)
        .command(format!("./Build/Scripts/{}.php $*", function_name));

    Step::new(
        description,
        StepCategory::Execution,
        format!("{}{}{}", BASH_HEADER, shim.render(), function_name),
    )
}

/// Check docblock annotations against the allowed set
pub fn annotations_stage(runtime: &str) -> StageTemplate {
    StageTemplate::new("Integration annotations", "IANNO")
        .description("Check docblock annotations by executing the annotation checker script")
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(common::composer_install_step(runtime))
        .step(container_script_step(
            "Execute annotations check script",
            "annotationChecker",
            runtime,
        ))
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}

/// The grab bag of smaller repository checks
pub fn various_stage(runtime: &str) -> StageTemplate {
    let submodule_check = "if [[ `git submodule status 2>&1 | wc -l` -ne 0 ]]; then\n    echo \"Found a submodule definition in repository\";\n    exit 99;\nfi";

    StageTemplate::new("Integration various", "CDECC")
        .description("Checks duplicate exceptions, git submodules, xlf files, permissions, rst")
        .step(common::checkout_step())
        .step(common::cherry_pick_step())
        .step(common::composer_install_step(runtime))
        .step(script_step(
            "Run duplicate exception code check script",
            "./Build/Scripts/duplicateExceptionCodeCheck.sh",
        ))
        .step(script_step(
            "Run git submodule status and verify there are none",
            submodule_check,
        ))
        .step(script_step(
            "Run permission check script",
            "./Build/Scripts/checkFilePermissions.sh",
        ))
        .step(script_step("Run xlf check", "./Build/Scripts/xlfcheck.sh"))
        .step(container_script_step(
            "Run rst check",
            "validateRstFiles",
            runtime,
        ))
        .step(script_step(
            "Run path length check",
            "./Build/Scripts/maxFilePathLength.sh",
        ))
        .step(container_script_step(
            "Run extension scanner rst reference check",
            "extensionScannerRstFileReferences",
            runtime,
        ))
        .step(container_script_step(
            "Run functional fixture csv format check",
            "checkIntegrityCsvFixtures",
            runtime,
        ))
        .step(container_script_step(
            "Run composer.json integrity check",
            "checkIntegrityComposer",
            runtime,
        ))
        .requirement(common::docker_requirement())
        .clean_working_directory(true)
}
