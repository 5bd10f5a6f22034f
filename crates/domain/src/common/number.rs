//! Number conversion utilities.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads an integer from a JSON number, accepting whole floats like `2.0`.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use storyloom_domain::common::whole_number;
///
/// assert_eq!(whole_number(&json!(2.0)), Some(2));
/// assert_eq!(whole_number(&json!(-3)), Some(-3));
/// assert_eq!(whole_number(&json!(1.5)), None);
/// assert_eq!(whole_number(&json!("2")), None);
/// ```
pub fn whole_number(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}

/// Serde helper: an integer written as a JSON integer or whole float.
pub fn int_or_whole_float<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    whole_number(&value).ok_or_else(|| D::Error::custom(format!("expected a whole number, got {value}")))
}

/// Serde helper: like [`int_or_whole_float`], with `null` as absent.
pub fn opt_int_or_whole_float<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value => whole_number(&value)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {value}"))),
    }
}
