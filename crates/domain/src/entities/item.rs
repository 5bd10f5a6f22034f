//! Item entity - Objects the player can hold
//!
//! Items are owned by the story. Inventories, conditions, and actions refer
//! to them by [`ItemId`] and never embed them by value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use storyloom_domain::ItemId;

/// An object the player can collect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Icon reference - opaque to the engine
    #[serde(default)]
    pub icon: String,
    #[serde(rename = "type", default)]
    pub item_type: ItemType,
    /// Fields this schema does not know, carried through unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            icon: String::new(),
            item_type: ItemType::Misc,
            extra: Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }
}

/// Item category
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ItemType {
    Tool,
    Key,
    Consumable,
    Quest,
    #[default]
    Misc,
    /// Category written by a newer editor; kept verbatim
    Other(String),
}

impl ItemType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Tool => "tool",
            Self::Key => "key",
            Self::Consumable => "consumable",
            Self::Quest => "quest",
            Self::Misc => "misc",
            Self::Other(s) => s,
        }
    }
}

impl std::fmt::Display for ItemType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for ItemType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "tool" => Self::Tool,
            "key" => Self::Key,
            "consumable" => Self::Consumable,
            "quest" => Self::Quest,
            "misc" => Self::Misc,
            _ => Self::Other(s),
        }
    }
}

impl From<ItemType> for String {
    fn from(t: ItemType) -> Self {
        match t {
            ItemType::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::str::FromStr for ItemType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_type_round_trips_known_and_unknown() {
        assert_eq!(ItemType::from("key".to_string()), ItemType::Key);
        let other = ItemType::from("artifact".to_string());
        assert_eq!(other, ItemType::Other("artifact".into()));
        assert_eq!(serde_json::to_value(&other).unwrap(), json!("artifact"));
    }

    #[test]
    fn item_reads_type_field() {
        let item: Item = serde_json::from_value(json!({
            "id": "torch",
            "name": "Torch",
            "description": "",
            "icon": "",
            "type": "tool",
        }))
        .unwrap();
        assert_eq!(item.item_type, ItemType::Tool);
        assert_eq!(item.id, "torch");
    }

    #[test]
    fn builder_matches_document_shape() {
        let item = Item::new("lamp", "Oil lamp")
            .with_description("Smells of smoke")
            .with_icon("icons/lamp.png")
            .with_type(ItemType::Consumable);
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "id": "lamp",
                "name": "Oil lamp",
                "description": "Smells of smoke",
                "icon": "icons/lamp.png",
                "type": "consumable",
            })
        );
    }
}
