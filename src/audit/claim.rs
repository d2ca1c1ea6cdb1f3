//! Parsing of textual claims given on the command line

use super::types::{ClaimValue, DataPoint};
use crate::error::AnalyticsError;

fn invalid(input: &str, expected: &str) -> AnalyticsError {
    AnalyticsError::InvalidClaim {
        input: input.to_string(),
        expected: expected.to_string(),
    }
}

/// Split `name=value` on the first `=`, rejecting empty halves
fn split_pair<'a>(input: &'a str, expected: &str) -> Result<(&'a str, &'a str), AnalyticsError> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| invalid(input, expected))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(invalid(input, expected));
    }
    Ok((name, value))
}

/// Parse `metric=value`
///
/// ```
/// use traffic_audit::audit::{parse_claim, ClaimValue};
///
/// let (metric, value) = parse_claim("visits_organic=12499").unwrap();
/// assert_eq!(metric, "visits_organic");
/// assert_eq!(value, ClaimValue::Number(12499.0));
/// assert!(parse_claim("visits").is_err());
/// ```
pub fn parse_claim(input: &str) -> Result<(String, ClaimValue), AnalyticsError> {
    let (metric, value) = split_pair(input, "metric=value")?;
    Ok((metric.to_string(), ClaimValue::parse(value)))
}

/// Parse `label=value` where the value must be numeric
pub fn parse_labeled_value(input: &str) -> Result<(String, f64), AnalyticsError> {
    const EXPECTED: &str = "label=number";
    let (label, value) = split_pair(input, EXPECTED)?;
    let value: f64 = value.parse().map_err(|_| invalid(input, EXPECTED))?;
    if !value.is_finite() {
        return Err(invalid(input, EXPECTED));
    }
    Ok((label.to_string(), value))
}

/// Parse `metric=value@file` into a data point for `period`
///
/// The file is split off at the last `@`, so values may not contain one.
pub fn parse_supporting(input: &str, period: &str) -> Result<DataPoint, AnalyticsError> {
    const EXPECTED: &str = "metric=value@file";
    let (claim, file) = input
        .rsplit_once('@')
        .ok_or_else(|| invalid(input, EXPECTED))?;
    let file = file.trim();
    if file.is_empty() {
        return Err(invalid(input, EXPECTED));
    }
    let (metric, value) = split_pair(claim, EXPECTED).map_err(|_| invalid(input, EXPECTED))?;
    Ok(DataPoint::new(metric, ClaimValue::parse(value), file, period))
}
