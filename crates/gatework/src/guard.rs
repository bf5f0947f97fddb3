//! Argument guards shared by the public entry points.
//!
//! Each guard is a free function returning `Result`, so call sites compose
//! with `?` and reject bad input before any side effect.

use thiserror::Error;

/// Error produced when a caller-supplied argument fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid argument `{name}`: {reason}")]
pub struct InvalidArgument {
    name: &'static str,
    reason: String,
}

impl InvalidArgument {
    /// Name of the rejected parameter.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Why the value was rejected.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Rejects `value` when it is below `bound`.
pub fn at_least(value: i64, bound: i64, name: &'static str) -> Result<i64, InvalidArgument> {
    if value < bound {
        return Err(InvalidArgument {
            name,
            reason: format!("{value} is less than {bound}"),
        });
    }
    Ok(value)
}

/// Parses a raw concurrency cap.
///
/// `-1` means unbounded and maps to `None`; `n >= 1` maps to `Some(n)`.
/// Zero is rejected: a pool with no permits can never make progress.
pub fn concurrency_limit(raw: i32, name: &'static str) -> Result<Option<usize>, InvalidArgument> {
    at_least(i64::from(raw), -1, name)?;
    match raw {
        -1 => Ok(None),
        0 => Err(InvalidArgument {
            name,
            reason: "0 permits can never make progress".to_string(),
        }),
        n => Ok(Some(n as usize)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn at_least_passes_values_on_or_above_the_bound() {
        assert_eq!(at_least(-1, -1, "value").unwrap(), -1);
        assert_eq!(at_least(7, 0, "value").unwrap(), 7);
    }

    #[test]
    fn at_least_rejects_values_below_the_bound() {
        let err = at_least(-2, -1, "max_concurrency").unwrap_err();
        assert_eq!(err.name(), "max_concurrency");
        assert_eq!(
            err.to_string(),
            "invalid argument `max_concurrency`: -2 is less than -1"
        );
    }

    #[test]
    fn concurrency_limit_maps_the_unbounded_sentinel() {
        assert_eq!(concurrency_limit(-1, "max_concurrency").unwrap(), None);
    }

    #[test]
    fn concurrency_limit_accepts_positive_caps() {
        assert_eq!(concurrency_limit(1, "max_concurrency").unwrap(), Some(1));
        assert_eq!(concurrency_limit(64, "max_concurrency").unwrap(), Some(64));
    }

    #[test]
    fn concurrency_limit_rejects_zero_and_below_the_sentinel() {
        assert!(concurrency_limit(0, "max_concurrency").is_err());
        assert!(concurrency_limit(-2, "max_concurrency").is_err());
    }
}
