//! Step body template expansion
//!
//! Step bodies are written as templates with `${name}` placeholders that
//! are substituted from the resolved environment binding at plan time.
//! Only the exact `${name}` form is a placeholder: bare `$NAME` shell
//! references and parameter expansions like `${VAR#prefix}` pass through
//! untouched, so scripts can still lean on variables the executor's shell
//! supplies at run time.

use regex::Regex;
use std::sync::OnceLock;

use crate::domain::binding::EnvironmentBinding;
use crate::error::{PlanError, Result};

/// What to do with a `${name}` placeholder the binding does not supply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubstitutionPolicy {
    /// Fail construction with [`PlanError::UnresolvedParameter`]
    ///
    /// This is the default: an unbound placeholder is a defect in the
    /// suite catalog, caught while the plan is built instead of at
    /// execution time.
    #[default]
    Strict,
    /// Leave the placeholder verbatim for the executor's shell
    Deferred,
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
    })
}

/// Expand every `${name}` placeholder in a step template
///
/// # Arguments
/// * `step_description` - Description of the step being built, used in errors
/// * `template` - The raw step body
/// * `binding` - Parameters substituted into the body
/// * `policy` - How to treat placeholders the binding does not supply
///
/// # Errors
/// Under [`SubstitutionPolicy::Strict`], returns `UnresolvedParameter`
/// naming the first unbound variable and the step it appears in.
pub fn expand(
    step_description: &str,
    template: &str,
    binding: &EnvironmentBinding,
    policy: SubstitutionPolicy,
) -> Result<String> {
    let pattern = placeholder_pattern();

    let mut body = String::with_capacity(template.len());
    let mut last_end = 0;

    for captures in pattern.captures_iter(template) {
        let Some(placeholder) = captures.get(0) else {
            continue;
        };
        let name = &captures[1];

        body.push_str(&template[last_end..placeholder.start()]);
        match binding.parameter(name) {
            Some(value) => body.push_str(value),
            None => match policy {
                SubstitutionPolicy::Strict => {
                    return Err(PlanError::UnresolvedParameter {
                        variable: name.to_string(),
                        step: step_description.to_string(),
                    });
                }
                SubstitutionPolicy::Deferred => body.push_str(placeholder.as_str()),
            },
        }
        last_end = placeholder.end();
    }
    body.push_str(&template[last_end..]);

    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding() -> EnvironmentBinding {
        EnvironmentBinding::new("pgsql10")
            .with_parameter("host", "postgres10")
            .with_parameter("username", "func")
    }

    #[test]
    fn test_substitutes_bound_parameters() {
        let body = expand(
            "Run phpunit",
            "phpunit --host=${host} --user=${username}",
            &binding(),
            SubstitutionPolicy::Strict,
        )
        .unwrap();

        assert_eq!(body, "phpunit --host=postgres10 --user=func");
    }

    #[test]
    fn test_missing_parameter_fails_strict() {
        let err = expand(
            "Run phpunit",
            "phpunit --host=${host} --password=${password}",
            &binding(),
            SubstitutionPolicy::Strict,
        )
        .unwrap_err();

        match err {
            PlanError::UnresolvedParameter { variable, step } => {
                assert_eq!(variable, "password");
                assert_eq!(step, "Run phpunit");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_deferred_policy_leaves_placeholder_verbatim() {
        let body = expand(
            "Run phpunit",
            "phpunit --password=${password}",
            &binding(),
            SubstitutionPolicy::Deferred,
        )
        .unwrap();

        assert_eq!(body, "phpunit --password=${password}");
    }

    #[test]
    fn test_bare_shell_variables_pass_through() {
        let body = expand(
            "Checkout",
            "cd $PWD && docker run -u $HOST_UID img",
            &binding(),
            SubstitutionPolicy::Strict,
        )
        .unwrap();

        assert_eq!(body, "cd $PWD && docker run -u $HOST_UID img");
    }

    #[test]
    fn test_shell_parameter_expansion_is_not_a_placeholder() {
        let body = expand(
            "Apply review patch",
            "CHANGE_ID=${CHANGE_URL#https://review.example.org/}",
            &binding(),
            SubstitutionPolicy::Strict,
        )
        .unwrap();

        assert_eq!(body, "CHANGE_ID=${CHANGE_URL#https://review.example.org/}");
    }

    #[test]
    fn test_repeated_placeholder_expands_every_occurrence() {
        let body = expand(
            "Run phpunit",
            "ssh ${host} && ping ${host}",
            &binding(),
            SubstitutionPolicy::Strict,
        )
        .unwrap();

        assert_eq!(body, "ssh postgres10 && ping postgres10");
    }
}
