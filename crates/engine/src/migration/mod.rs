//! Migration pipeline - upgrades any parsed story JSON to the current schema.
//!
//! [`migrate_value`] is total and idempotent: it accepts arbitrary JSON,
//! fills defaults, translates legacy shapes, and leaves unknown keys alone.
//! Running it on its own output changes nothing.
//!
//! [`migrate`] additionally types the result. It only fails when a field has
//! a JSON type the model cannot hold (e.g. `"text": 5`), which no amount of
//! defaulting can repair.

mod steps;

use serde_json::{Map, Value};

use storyloom_domain::Story;

use crate::error::LoadError;
use steps::Step;

/// Steps in application order.
const STEPS: [(&str, Step); 7] = [
    ("assign_missing_dialogue_ids", steps::assign_missing_dialogue_ids),
    ("clear_null_lists", steps::clear_null_lists),
    ("normalize_options", steps::normalize_options),
    ("ensure_chapters", steps::ensure_chapters),
    ("ensure_items", steps::ensure_items),
    ("ensure_meta", steps::ensure_meta),
    ("rename_mini_game_targets", steps::rename_mini_game_targets),
];

/// Upgrade raw JSON in place. A non-object root is treated as `{}`.
pub fn migrate_value(raw: Value) -> Value {
    let mut root = match raw {
        Value::Object(map) => map,
        other => {
            tracing::warn!(
                found = json_type(&other),
                "Story root is not an object - starting from an empty document"
            );
            Map::new()
        }
    };

    let mut total = 0;
    for (name, step) in STEPS {
        let changed = step(&mut root);
        if changed > 0 {
            tracing::debug!(step = name, changed, "Migration step applied");
        }
        total += changed;
    }
    if total > 0 {
        tracing::info!(changes = total, "Story migrated to current schema");
    }

    Value::Object(root)
}

/// Upgrade raw JSON and type it as a [`Story`].
pub fn migrate(raw: Value) -> Result<Story, LoadError> {
    serde_json::from_value(migrate_value(raw)).map_err(LoadError::schema)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyloom_domain::{Condition, MAIN_CHAPTER_ID};

    fn legacy_fixtures() -> Vec<Value> {
        vec![
            json!({}),
            json!([]),
            json!({"dialogues": [{"id": "a", "options": [{"text": "x", "visibleIf": {"hasItem": "key1"}}]}]}),
            json!({
                "title": "Old Tale",
                "dialogues": [
                    {"id": "start", "text": "Hi", "nextDialogueId": "", "options": null},
                    {"text": "No id", "options": [{"text": "go", "actions": null}]}
                ],
                "miniGames": [{"id": "dice", "winTarget": "start", "loseTarget": ""}]
            }),
            json!({
                "meta": {"version": "3.1", "title": "T"},
                "chapters": [{"id": "ch1", "title": "One"}],
                "dialogues": [{"id": "a", "chapterId": "ch9", "options": [
                    {"text": "o", "enabled": false, "miniGame": {"id": "m", "winTarget": "a"}}
                ]}],
                "items": [{"id": "torch", "name": "Torch", "type": "relic"}],
                "theme": {"accent": "#fff"}
            }),
        ]
    }

    mod properties {
        use super::*;

        #[test]
        fn migration_is_idempotent() {
            for raw in legacy_fixtures() {
                let once = migrate_value(raw);
                let twice = migrate_value(once.clone());
                assert_eq!(once, twice);
            }
        }

        #[test]
        fn typed_migration_is_idempotent() {
            for raw in legacy_fixtures() {
                let once = migrate(raw).unwrap();
                let twice = migrate(serde_json::to_value(&once).unwrap()).unwrap();
                assert_eq!(once, twice);
            }
        }

        #[test]
        fn migration_is_total() {
            for raw in legacy_fixtures() {
                let story = migrate(raw).unwrap();
                assert!(!story.meta().version.is_empty());
                assert!(!story.chapters().is_empty());
                for dialogue in story.dialogues() {
                    assert!(story.chapter(dialogue.chapter_id.as_str()).is_some());
                }
            }
        }

        #[test]
        fn empty_object_gets_every_section() {
            let migrated = migrate_value(json!({}));
            assert_eq!(migrated["meta"], json!({"version": "3.1", "title": "Untitled"}));
            assert_eq!(migrated["items"], json!([]));
            assert_eq!(migrated["chapters"][0]["id"], json!(MAIN_CHAPTER_ID));
        }
    }

    mod legacy {
        use super::*;

        #[test]
        fn visible_if_becomes_has_item_condition() {
            let migrated = migrate_value(json!({
                "dialogues": [{"id": "a", "options": [{"text": "x", "visibleIf": {"hasItem": "key1"}}]}]
            }));
            let option = &migrated["dialogues"][0]["options"][0];
            assert_eq!(
                option["visibilityCondition"],
                json!({"type": "has_item", "itemId": "key1"})
            );
            assert!(option.get("visibleIf").is_none());
            assert_eq!(option["enabled"], json!(true));
            assert_eq!(option["visible"], json!(true));

            let story = migrate(migrated).unwrap();
            assert_eq!(
                story.dialogue("a").unwrap().options[0].visibility_condition,
                Condition::has_item("key1")
            );
        }

        #[test]
        fn legacy_title_seeds_meta() {
            let story = migrate(json!({"title": "Old Tale", "dialogues": []})).unwrap();
            assert_eq!(story.meta().title, "Old Tale");
            assert_eq!(story.meta().version, "3.1");
        }

        #[test]
        fn unknown_keys_pass_through() {
            let migrated = migrate_value(json!({
                "theme": "dark",
                "dialogues": [{"id": "a", "speaker": "Mina", "options": [{"text": "x", "sfx": "bell"}]}]
            }));
            assert_eq!(migrated["theme"], json!("dark"));
            assert_eq!(migrated["dialogues"][0]["speaker"], json!("Mina"));
            assert_eq!(migrated["dialogues"][0]["options"][0]["sfx"], json!("bell"));
        }
    }

    mod schema {
        use super::*;

        #[test]
        fn wrongly_typed_field_is_schema_error() {
            let err = migrate(json!({"dialogues": [{"id": "a", "text": 5}]})).unwrap_err();
            assert!(matches!(err, LoadError::Schema(_)));
        }

        #[test]
        fn unknown_condition_survives_typing() {
            let story = migrate(json!({"dialogues": [{"id": "a", "options": [
                {"text": "x", "visibilityCondition": {"type": "moon_phase", "phase": "full"}}
            ]}]}))
            .unwrap();
            let condition = &story.dialogue("a").unwrap().options[0].visibility_condition;
            assert_eq!(condition.kind(), "moon_phase");
            assert_eq!(
                serde_json::to_value(condition).unwrap(),
                json!({"type": "moon_phase", "phase": "full"})
            );
        }
    }
}
