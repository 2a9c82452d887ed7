//! Fan-out generation
//!
//! Sharded suites split one logical test suite across N parallel stages.
//! The generator calls a stage builder once per shard and rewrites each
//! produced stage's key and display name from the shard index, so
//! uniqueness within the fan-out never depends on what the builder set.

use tracing::debug;

use crate::domain::stage::StageTemplate;
use crate::error::{PlanError, Result};
use crate::keys;

/// Generate `count` shard stages from a builder
///
/// The builder is called exactly `count` times with one-based indices in
/// ascending order. Each produced stage's `key` is overwritten with
/// `format_key(base_key, index, count)` and its `name` with the display
/// name plus the formatted index.
///
/// A `count` of zero produces an empty sequence, not an error: callers
/// treat zero-shard suites as legitimately skippable.
///
/// # Errors
/// Returns `InvalidArgument` when `count` is negative, or whatever error
/// the builder itself raises.
pub fn fan_out<F>(
    base_key: &str,
    display_name: &str,
    count: i32,
    mut stage_builder: F,
) -> Result<Vec<StageTemplate>>
where
    F: FnMut(u32) -> Result<StageTemplate>,
{
    if count < 0 {
        return Err(PlanError::invalid_argument(format!(
            "shard count must not be negative, got {}",
            count
        )));
    }

    let total = count as u32;
    let mut stages = Vec::with_capacity(total as usize);
    for index in 1..=total {
        let mut stage = stage_builder(index)?;
        stage.key = keys::format_key(base_key, index, total)?;
        stage.name = format!("{} {}", display_name, keys::format_index(index));
        stages.push(stage);
    }

    debug!(base_key, count = total, "Generated fan-out stages");

    Ok(stages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn builder(index: u32) -> Result<StageTemplate> {
        Ok(StageTemplate::new("unnamed", format!("builder-key-{}", index)))
    }

    #[test]
    fn test_generates_exactly_count_stages_with_distinct_keys() {
        let stages = fan_out("FMY", "Func mysql", 12, builder).unwrap();

        assert_eq!(stages.len(), 12);
        let keys: HashSet<&str> = stages.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(stages[0].key, "FMY01");
        assert_eq!(stages[11].key, "FMY12");
    }

    #[test]
    fn test_small_fan_out_keys_stay_padded() {
        let stages = fan_out("ACMY", "Accept my", 3, builder).unwrap();

        let keys: Vec<&str> = stages.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["ACMY01", "ACMY02", "ACMY03"]);
    }

    #[test]
    fn test_zero_count_yields_empty_sequence() {
        let stages = fan_out("FMY", "Func mysql", 0, builder).unwrap();
        assert!(stages.is_empty());
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let err = fan_out("FMY", "Func mysql", -1, builder).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_builder_runs_ascending_and_keys_are_overwritten() {
        let mut seen = Vec::new();
        let stages = fan_out("UT", "Unit", 4, |index| {
            seen.push(index);
            Ok(StageTemplate::new("unnamed", "WRONG"))
        })
        .unwrap();

        assert_eq!(seen, vec![1, 2, 3, 4]);
        assert!(stages.iter().all(|s| s.key != "WRONG"));
    }

    #[test]
    fn test_display_name_gets_index_suffix() {
        let stages = fan_out("FPG", "Func pgsql PHP72", 2, builder).unwrap();
        assert_eq!(stages[0].name, "Func pgsql PHP72 01");
        assert_eq!(stages[1].name, "Func pgsql PHP72 02");
    }

    #[test]
    fn test_builder_errors_abort_generation() {
        let result = fan_out("UT", "Unit", 3, |index| {
            if index == 2 {
                Err(PlanError::invalid_argument("builder failed"))
            } else {
                builder(index)
            }
        });

        assert!(result.is_err());
    }
}
