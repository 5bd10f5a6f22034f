//! Visibility conditions gating dialogue options.
//!
//! Conditions arrive as loosely-shaped JSON. Every shape the schema knows
//! becomes a typed variant; anything else is kept verbatim as
//! [`Condition::Unrecognized`] so it survives a save. Keys a known shape does
//! not use (often left behind when an author switches the type) ride along in
//! `extra`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::common::{empty_as_none, opt_int_or_whole_float};
use crate::ItemId;

/// A fine-grained visibility gate on a [`DialogueOption`](crate::DialogueOption).
///
/// Optional payload fields model what authors actually save: a `has_item`
/// condition whose item has not been picked yet is still a valid document.
/// An empty string counts as not picked.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Unconditionally satisfied
    Always { extra: Map<String, Value> },
    /// Satisfied when the item is in the player's inventory
    HasItem {
        item_id: Option<ItemId>,
        extra: Map<String, Value>,
    },
    /// Satisfied when the named stat is strictly greater than the threshold
    StatGreater {
        stat_name: Option<String>,
        stat_value: Option<i64>,
        extra: Map<String, Value>,
    },
    /// Satisfied when the named flag is set
    FlagTrue {
        flag_name: Option<String>,
        extra: Map<String, Value>,
    },
    /// A tag this schema does not know, or a known tag with a malformed payload
    Unrecognized(Value),
}

impl Default for Condition {
    fn default() -> Self {
        Self::always()
    }
}

impl Condition {
    pub fn always() -> Self {
        Self::Always { extra: Map::new() }
    }

    pub fn has_item(item_id: impl Into<ItemId>) -> Self {
        Self::HasItem {
            item_id: Some(item_id.into()),
            extra: Map::new(),
        }
    }

    pub fn stat_greater(stat_name: impl Into<String>, stat_value: i64) -> Self {
        Self::StatGreater {
            stat_name: Some(stat_name.into()),
            stat_value: Some(stat_value),
            extra: Map::new(),
        }
    }

    pub fn flag_true(flag_name: impl Into<String>) -> Self {
        Self::FlagTrue {
            flag_name: Some(flag_name.into()),
            extra: Map::new(),
        }
    }

    /// The `type` tag as written in the document.
    pub fn kind(&self) -> &str {
        match self {
            Self::Always { .. } => "always",
            Self::HasItem { .. } => "has_item",
            Self::StatGreater { .. } => "stat_greater",
            Self::FlagTrue { .. } => "flag_true",
            Self::Unrecognized(raw) => raw
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<untagged>"),
        }
    }

    /// Item referenced by this condition, if any.
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Self::HasItem { item_id, .. } => item_id.as_ref(),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ConditionRepr {
    Always {
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    #[serde(rename_all = "camelCase")]
    HasItem {
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        item_id: Option<ItemId>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    #[serde(rename_all = "camelCase")]
    StatGreater {
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        stat_name: Option<String>,
        #[serde(
            default,
            deserialize_with = "opt_int_or_whole_float",
            skip_serializing_if = "Option::is_none"
        )]
        stat_value: Option<i64>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    #[serde(rename_all = "camelCase")]
    FlagTrue {
        #[serde(
            default,
            deserialize_with = "empty_as_none",
            skip_serializing_if = "Option::is_none"
        )]
        flag_name: Option<String>,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<ConditionRepr> for Condition {
    fn from(repr: ConditionRepr) -> Self {
        match repr {
            ConditionRepr::Always { extra } => Self::Always { extra },
            ConditionRepr::HasItem { item_id, extra } => Self::HasItem { item_id, extra },
            ConditionRepr::StatGreater {
                stat_name,
                stat_value,
                extra,
            } => Self::StatGreater {
                stat_name,
                stat_value,
                extra,
            },
            ConditionRepr::FlagTrue { flag_name, extra } => Self::FlagTrue { flag_name, extra },
        }
    }
}

impl Serialize for Condition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self {
            Self::Unrecognized(raw) => return raw.serialize(serializer),
            Self::Always { extra } => ConditionRepr::Always {
                extra: extra.clone(),
            },
            Self::HasItem { item_id, extra } => ConditionRepr::HasItem {
                item_id: item_id.clone(),
                extra: extra.clone(),
            },
            Self::StatGreater {
                stat_name,
                stat_value,
                extra,
            } => ConditionRepr::StatGreater {
                stat_name: stat_name.clone(),
                stat_value: *stat_value,
                extra: extra.clone(),
            },
            Self::FlagTrue { flag_name, extra } => ConditionRepr::FlagTrue {
                flag_name: flag_name.clone(),
                extra: extra.clone(),
            },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Condition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match ConditionRepr::deserialize(&raw) {
            Ok(repr) => repr.into(),
            Err(_) => Self::Unrecognized(raw),
        })
    }
}
