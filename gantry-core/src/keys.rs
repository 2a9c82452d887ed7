//! Stage key formatting
//!
//! Stage keys concatenate a base key with the one-based shard index. The
//! index is zero-padded to two digits while it is below 10 and printed
//! bare from 10 up, so base `FMY` yields `FMY01 .. FMY09, FMY10, FMY11`.
//! The padding is driven by the index alone, never by the total, which
//! keeps the formatter injective over the index for any fixed base.

use crate::error::{PlanError, Result};

/// Format a one-based shard index for use in keys and display names
pub fn format_index(index: u32) -> String {
    if index < 10 {
        format!("0{}", index)
    } else {
        index.to_string()
    }
}

/// Derive the key of one shard from its base key and position
///
/// # Arguments
/// * `base_key` - Key prefix shared by all shards of the suite
/// * `index` - One-based shard index
/// * `total` - Total number of shards being generated
///
/// # Errors
/// Returns `InvalidArgument` when `index` is zero or exceeds `total`.
pub fn format_key(base_key: &str, index: u32, total: u32) -> Result<String> {
    if index < 1 || index > total {
        return Err(PlanError::invalid_argument(format!(
            "shard index {} out of range 1..={}",
            index, total
        )));
    }

    Ok(format!("{}{}", base_key, format_index(index)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_pads_single_digit_indices() {
        assert_eq!(format_key("FMY", 1, 12).unwrap(), "FMY01");
        assert_eq!(format_key("FMY", 9, 12).unwrap(), "FMY09");
        assert_eq!(format_key("ACMY", 2, 3).unwrap(), "ACMY02");
    }

    #[test]
    fn test_double_digit_indices_are_bare() {
        assert_eq!(format_key("FMY", 10, 12).unwrap(), "FMY10");
        assert_eq!(format_key("FMY", 12, 12).unwrap(), "FMY12");
        assert_eq!(format_key("F", 100, 120).unwrap(), "F100");
    }

    #[test]
    fn test_index_zero_is_rejected() {
        let err = format_key("FMY", 0, 12).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_index_above_total_is_rejected() {
        let err = format_key("FMY", 13, 12).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_distinct_indices_never_collide() {
        let keys: HashSet<String> = (1..=120)
            .map(|i| format_key("UT", i, 120).unwrap())
            .collect();
        assert_eq!(keys.len(), 120);
    }
}
