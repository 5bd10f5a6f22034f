//! String conversion utilities.

use serde::{Deserialize, Deserializer};

/// Converts an empty `String` to `None`, otherwise returns `Some(value)`.
///
/// # Examples
///
/// ```
/// use storyloom_domain::common::some_if_not_empty;
///
/// assert_eq!(some_if_not_empty("hello".to_string()), Some("hello".to_string()));
/// assert_eq!(some_if_not_empty(String::new()), None);
/// ```
pub fn some_if_not_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Serde helper: reads an optional string key, treating `""` and `null` as absent.
///
/// Editors historically cleared edges by writing `""`; the model only knows
/// "set" and "unset".
pub fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(some_if_not_empty).map(T::from))
}
