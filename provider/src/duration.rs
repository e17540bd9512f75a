//! Duration strings such as `30s`, `5m` or `1h10m`
//!
//! Accepted syntax is a sequence of decimal numbers, each with an optional
//! fraction and a mandatory unit suffix (`ns`, `us`, `µs`, `ms`, `s`, `m`, `h`).
//! A bare `0` is also accepted. Negative durations are rejected.

use crate::error::ProviderError;
use std::time::Duration;

// Unit suffixes and their length in nanoseconds
const UNITS: [(&str, f64); 8] = [
    ("ns", 1.0),
    ("us", 1e3),
    ("µs", 1e3),
    ("μs", 1e3),
    ("ms", 1e6),
    ("s", 1e9),
    ("m", 60e9),
    ("h", 3600e9),
];

fn invalid(value: &str, reason: impl Into<String>) -> ProviderError {
    ProviderError::InvalidDuration {
        value: value.to_string(),
        reason: reason.into(),
    }
}

/// Parse a duration string
pub fn parse_duration(value: &str) -> Result<Duration, ProviderError> {
    let input = value.trim();
    if input.is_empty() {
        return Err(invalid(value, "empty duration"));
    }
    if input.starts_with('-') {
        return Err(invalid(value, "negative durations are not allowed"));
    }
    let mut rest = input.strip_prefix('+').unwrap_or(input);
    if rest == "0" {
        return Ok(Duration::ZERO);
    }

    let mut total_nanos = 0.0_f64;
    while !rest.is_empty() {
        let number_len = rest
            .char_indices()
            .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
            .map_or(rest.len(), |(i, _)| i);
        let number = &rest[..number_len];
        if number.is_empty() || number == "." {
            return Err(invalid(value, format!("expected a number at {:?}", rest)));
        }
        let amount: f64 = number
            .parse()
            .map_err(|e| invalid(value, format!("bad number {:?}: {}", number, e)))?;
        rest = &rest[number_len..];

        let unit_len = rest
            .char_indices()
            .find(|(_, c)| c.is_ascii_digit() || *c == '.')
            .map_or(rest.len(), |(i, _)| i);
        let unit = &rest[..unit_len];
        let scale = UNITS
            .iter()
            .find(|(name, _)| *name == unit)
            .map(|(_, scale)| *scale)
            .ok_or_else(|| {
                if unit.is_empty() {
                    invalid(value, format!("missing unit after {}", number))
                } else {
                    invalid(value, format!("unknown unit {:?}", unit))
                }
            })?;
        rest = &rest[unit_len..];

        total_nanos += amount * scale;
    }

    Duration::try_from_secs_f64(total_nanos / 1e9).map_err(|e| invalid(value, e.to_string()))
}

/// Parse an optional duration, falling back to `default` when absent
pub fn parse_or(value: Option<&str>, default: Duration) -> Result<Duration, ProviderError> {
    value.map_or(Ok(default), parse_duration)
}

/// Parse a duration that must be longer than zero, such as a poll interval
pub fn parse_positive(value: &str) -> Result<Duration, ProviderError> {
    let duration = parse_duration(value)?;
    if duration.is_zero() {
        return Err(invalid(value, "must be greater than zero"));
    }
    Ok(duration)
}

/// Parse an optional positive duration, falling back to `default` when absent
pub fn parse_positive_or(value: Option<&str>, default: Duration) -> Result<Duration, ProviderError> {
    value.map_or(Ok(default), parse_positive)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_positive_rejects_zero() {
        assert_eq!(parse_positive("500ms").expect("500ms"), Duration::from_millis(500));
        assert!(matches!(parse_positive("0s"), Err(ProviderError::InvalidDuration { .. })));
        assert!(parse_positive("0").is_err());
        assert!(parse_positive_or(Some("0ms"), Duration::from_secs(5)).is_err());
        assert_eq!(
            parse_positive_or(None, Duration::from_secs(5)).expect("default"),
            Duration::from_secs(5)
        );
    }

    #[test]
    fn test_parse_single_units() {
        assert_eq!(parse_duration("30s").expect("30s"), Duration::from_secs(30));
        assert_eq!(parse_duration("5m").expect("5m"), Duration::from_secs(300));
        assert_eq!(parse_duration("2h").expect("2h"), Duration::from_secs(7200));
        assert_eq!(parse_duration("250ms").expect("250ms"), Duration::from_millis(250));
        assert_eq!(parse_duration("0").expect("0"), Duration::ZERO);
        assert_eq!(parse_duration("0s").expect("0s"), Duration::ZERO);
    }

    #[test]
    fn test_parse_compound_and_fractional() {
        assert_eq!(parse_duration("1h10m").expect("1h10m"), Duration::from_secs(4200));
        assert_eq!(parse_duration("1m30s").expect("1m30s"), Duration::from_secs(90));
        assert_eq!(parse_duration("1.5s").expect("1.5s"), Duration::from_millis(1500));
    }

    #[test]
    fn test_parse_rejects_malformed_input() {
        for bad in ["", "30", "-5s", "5x", "s", "1h-10m", ".s"] {
            assert!(
                matches!(parse_duration(bad), Err(ProviderError::InvalidDuration { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_parse_or_uses_default_when_absent() {
        let default = Duration::from_secs(30);
        assert_eq!(parse_or(None, default).expect("default"), default);
        assert_eq!(parse_or(Some("1s"), default).expect("explicit"), Duration::from_secs(1));
    }
}
