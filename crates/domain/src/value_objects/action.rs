//! Declarative actions run when an option is chosen or a dialogue is entered.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::common::int_or_whole_float;
use crate::ItemId;

/// A single state mutation against the player.
///
/// Variants hold exactly the payload their interpreter needs, plus any other
/// keys the document carried in `extra`. An action whose tag is unknown, or
/// whose payload is missing or mistyped, is kept as [`Action::Unrecognized`]
/// so the document round-trips unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    AddItem {
        id: ItemId,
        extra: Map<String, Value>,
    },
    RemoveItem {
        id: ItemId,
        extra: Map<String, Value>,
    },
    StatChange {
        stat: String,
        value: i64,
        extra: Map<String, Value>,
    },
    SetFlag {
        id: String,
        extra: Map<String, Value>,
    },
    ClearFlag {
        id: String,
        extra: Map<String, Value>,
    },
    AddScore {
        value: i64,
        extra: Map<String, Value>,
    },
    Unrecognized(Value),
}

impl Action {
    pub fn add_item(id: impl Into<ItemId>) -> Self {
        Self::AddItem {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn remove_item(id: impl Into<ItemId>) -> Self {
        Self::RemoveItem {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn stat_change(stat: impl Into<String>, value: i64) -> Self {
        Self::StatChange {
            stat: stat.into(),
            value,
            extra: Map::new(),
        }
    }

    pub fn set_flag(id: impl Into<String>) -> Self {
        Self::SetFlag {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn clear_flag(id: impl Into<String>) -> Self {
        Self::ClearFlag {
            id: id.into(),
            extra: Map::new(),
        }
    }

    pub fn add_score(value: i64) -> Self {
        Self::AddScore {
            value,
            extra: Map::new(),
        }
    }

    /// The `type` tag as written in the document.
    pub fn kind(&self) -> &str {
        match self {
            Self::AddItem { .. } => "add_item",
            Self::RemoveItem { .. } => "remove_item",
            Self::StatChange { .. } => "stat_change",
            Self::SetFlag { .. } => "set_flag",
            Self::ClearFlag { .. } => "clear_flag",
            Self::AddScore { .. } => "add_score",
            Self::Unrecognized(raw) => raw
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("<untagged>"),
        }
    }

    /// Item referenced by this action, if any.
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            Self::AddItem { id, .. } | Self::RemoveItem { id, .. } => Some(id),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ActionRepr {
    AddItem {
        id: ItemId,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    RemoveItem {
        id: ItemId,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    StatChange {
        stat: String,
        #[serde(deserialize_with = "int_or_whole_float")]
        value: i64,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    SetFlag {
        id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    ClearFlag {
        id: String,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
    AddScore {
        #[serde(deserialize_with = "int_or_whole_float")]
        value: i64,
        #[serde(flatten)]
        extra: Map<String, Value>,
    },
}

impl From<ActionRepr> for Action {
    fn from(repr: ActionRepr) -> Self {
        match repr {
            ActionRepr::AddItem { id, extra } => Self::AddItem { id, extra },
            ActionRepr::RemoveItem { id, extra } => Self::RemoveItem { id, extra },
            ActionRepr::StatChange { stat, value, extra } => Self::StatChange { stat, value, extra },
            ActionRepr::SetFlag { id, extra } => Self::SetFlag { id, extra },
            ActionRepr::ClearFlag { id, extra } => Self::ClearFlag { id, extra },
            ActionRepr::AddScore { value, extra } => Self::AddScore { value, extra },
        }
    }
}

impl Serialize for Action {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let repr = match self.clone() {
            Self::Unrecognized(raw) => return raw.serialize(serializer),
            Self::AddItem { id, extra } => ActionRepr::AddItem { id, extra },
            Self::RemoveItem { id, extra } => ActionRepr::RemoveItem { id, extra },
            Self::StatChange { stat, value, extra } => ActionRepr::StatChange { stat, value, extra },
            Self::SetFlag { id, extra } => ActionRepr::SetFlag { id, extra },
            Self::ClearFlag { id, extra } => ActionRepr::ClearFlag { id, extra },
            Self::AddScore { value, extra } => ActionRepr::AddScore { value, extra },
        };
        repr.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match ActionRepr::deserialize(&raw) {
            Ok(repr) => repr.into(),
            Err(_) => Self::Unrecognized(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_every_known_kind() {
        let actions: Vec<Action> = serde_json::from_value(json!([
            {"type": "add_item", "id": "torch"},
            {"type": "remove_item", "id": "torch"},
            {"type": "stat_change", "stat": "courage", "value": -2},
            {"type": "set_flag", "id": "met_count"},
            {"type": "clear_flag", "id": "met_count"},
            {"type": "add_score", "value": 10},
        ]))
        .unwrap();

        assert_eq!(
            actions,
            vec![
                Action::add_item("torch"),
                Action::remove_item("torch"),
                Action::stat_change("courage", -2),
                Action::set_flag("met_count"),
                Action::clear_flag("met_count"),
                Action::add_score(10),
            ]
        );
    }

    #[test]
    fn add_item_without_id_is_unrecognized() {
        let action: Action = serde_json::from_value(json!({"type": "add_item"})).unwrap();
        assert!(matches!(action, Action::Unrecognized(_)));
        assert_eq!(action.kind(), "add_item");
    }

    #[test]
    fn unknown_kind_round_trips() {
        let raw = json!({"type": "play_sound", "id": "thunder.ogg"});
        let action: Action = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(action.kind(), "play_sound");
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn stale_payload_keys_survive_a_save() {
        let raw = json!({"type": "set_flag", "id": "met", "value": true});
        let action: Action = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(action, Action::SetFlag { ref id, .. } if id == "met"));
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);

        let raw = json!({"type": "add_score", "value": 5, "id": "old_item"});
        let action: Action = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(action.item_id(), None);
        assert_eq!(serde_json::to_value(&action).unwrap(), raw);
    }

    #[test]
    fn whole_float_values_are_integers() {
        let action: Action =
            serde_json::from_value(json!({"type": "stat_change", "stat": "wit", "value": 2.0}))
                .unwrap();
        assert_eq!(action, Action::stat_change("wit", 2));

        let action: Action =
            serde_json::from_value(json!({"type": "add_score", "value": 1.5})).unwrap();
        assert!(matches!(action, Action::Unrecognized(_)));
    }
}
