//! Individual migration steps.
//!
//! Each step works on the raw JSON root object, is idempotent on its own,
//! and returns how many values it touched. Steps only add or rename; they
//! never drop narrative content.

use serde_json::{json, Map, Value};

use storyloom_domain::{CURRENT_SCHEMA_VERSION, MAIN_CHAPTER_ID, MAIN_CHAPTER_TITLE, UNTITLED};

/// Signature shared by every step.
pub(crate) type Step = fn(&mut Map<String, Value>) -> usize;

/// Missing or explicitly `null`.
fn is_absent(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).map_or(true, Value::is_null)
}

/// Missing, `null`, `false`, `0` or `""`.
fn is_falsy(map: &Map<String, Value>, key: &str) -> bool {
    match map.get(key) {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}

fn dialogues_mut(root: &mut Map<String, Value>) -> impl Iterator<Item = &mut Map<String, Value>> {
    root.get_mut("dialogues")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

fn options_mut(dialogue: &mut Map<String, Value>) -> impl Iterator<Item = &mut Map<String, Value>> {
    dialogue
        .get_mut("options")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object_mut)
}

// =============================================================================
// Dialogue identity
// =============================================================================

/// Give every dialogue without an id a deterministic, unique one.
pub(crate) fn assign_missing_dialogue_ids(root: &mut Map<String, Value>) -> usize {
    let mut taken: Vec<String> = dialogues_mut(root)
        .filter_map(|d| d.get("id").and_then(Value::as_str).map(str::to_string))
        .collect();

    let mut changed = 0;
    for (position, dialogue) in dialogues_mut(root).enumerate() {
        if !is_falsy(dialogue, "id") {
            continue;
        }
        let mut candidate = format!("d_untitled_{position}");
        let mut bump = 0;
        while taken.contains(&candidate) {
            bump += 1;
            candidate = format!("d_untitled_{position}_{bump}");
        }
        taken.push(candidate.clone());
        dialogue.insert("id".into(), Value::String(candidate));
        changed += 1;
    }
    changed
}

/// Drop list fields written as `null` so they read as empty.
pub(crate) fn clear_null_lists(root: &mut Map<String, Value>) -> usize {
    let mut changed = 0;
    for dialogue in dialogues_mut(root) {
        for key in ["options", "onEnter"] {
            if dialogue.get(key).is_some_and(Value::is_null) {
                dialogue.remove(key);
                changed += 1;
            }
        }
        for option in options_mut(dialogue) {
            if option.get("actions").is_some_and(Value::is_null) {
                option.remove("actions");
                changed += 1;
            }
        }
    }
    changed
}

// =============================================================================
// Step 1: option flags and visibility
// =============================================================================

/// Default `enabled`/`visible`, translate `visibleIf`, default the condition.
pub(crate) fn normalize_options(root: &mut Map<String, Value>) -> usize {
    let mut changed = 0;
    for dialogue in dialogues_mut(root) {
        for option in options_mut(dialogue) {
            for flag in ["enabled", "visible"] {
                if is_absent(option, flag) {
                    option.insert(flag.into(), Value::Bool(true));
                    changed += 1;
                }
            }

            if let Some(legacy) = option.remove("visibleIf") {
                changed += 1;
                if is_falsy(option, "visibilityCondition") {
                    let item = legacy
                        .get("hasItem")
                        .filter(|v| !matches!(v, Value::Null | Value::Bool(false)))
                        .filter(|v| v.as_str() != Some(""));
                    if let Some(item) = item {
                        option.insert(
                            "visibilityCondition".into(),
                            json!({ "type": "has_item", "itemId": item }),
                        );
                    }
                }
            }

            if is_falsy(option, "visibilityCondition") {
                option.insert("visibilityCondition".into(), json!({ "type": "always" }));
                changed += 1;
            }
        }
    }
    changed
}

// =============================================================================
// Step 2: chapters
// =============================================================================

/// Make every dialogue belong to a chapter that exists.
///
/// Documents without chapters get the single main chapter. Dialogues without
/// a chapter id join the main chapter; chapter ids that name no chapter get a
/// chapter synthesized for them, titled by id.
pub(crate) fn ensure_chapters(root: &mut Map<String, Value>) -> usize {
    let mut changed = 0;
    if is_absent(root, "chapters") {
        root.insert(
            "chapters".into(),
            json!([{ "id": MAIN_CHAPTER_ID, "title": MAIN_CHAPTER_TITLE }]),
        );
        changed += 1;
    }

    let mut wanted: Vec<String> = Vec::new();
    for dialogue in dialogues_mut(root) {
        if is_falsy(dialogue, "chapterId") {
            dialogue.insert("chapterId".into(), Value::String(MAIN_CHAPTER_ID.into()));
            changed += 1;
        }
        if let Some(id) = dialogue.get("chapterId").and_then(Value::as_str) {
            if !wanted.iter().any(|w| w == id) {
                wanted.push(id.to_string());
            }
        }
    }

    let Some(chapters) = root.get_mut("chapters").and_then(Value::as_array_mut) else {
        return changed;
    };

    for id in wanted {
        let exists = chapters
            .iter()
            .any(|c| c.get("id").and_then(Value::as_str) == Some(id.as_str()));
        if exists {
            continue;
        }
        let title = if id == MAIN_CHAPTER_ID {
            MAIN_CHAPTER_TITLE.to_string()
        } else {
            id.clone()
        };
        chapters.push(json!({ "id": id, "title": title }));
        changed += 1;
    }
    changed
}

// =============================================================================
// Step 3: items
// =============================================================================

pub(crate) fn ensure_items(root: &mut Map<String, Value>) -> usize {
    if is_absent(root, "items") {
        root.insert("items".into(), json!([]));
        1
    } else {
        0
    }
}

// =============================================================================
// Step 4: meta
// =============================================================================

/// Synthesize `meta`, taking the title from the legacy top-level `title`.
pub(crate) fn ensure_meta(root: &mut Map<String, Value>) -> usize {
    if !is_absent(root, "meta") {
        return 0;
    }
    let title = root
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(UNTITLED)
        .to_string();
    root.insert(
        "meta".into(),
        json!({ "version": CURRENT_SCHEMA_VERSION, "title": title }),
    );
    1
}

// =============================================================================
// Step 5: minigame outcome names
// =============================================================================

/// Rename `winTarget`/`loseTarget` to `onWinDialogueId`/`onLoseDialogueId`.
///
/// Applies to document-level definitions and to option-level links. The
/// legacy key is only copied when the new key is empty; it is always removed.
pub(crate) fn rename_mini_game_targets(root: &mut Map<String, Value>) -> usize {
    let mut changed = 0;
    if let Some(games) = root.get_mut("miniGames").and_then(Value::as_array_mut) {
        for game in games.iter_mut().filter_map(Value::as_object_mut) {
            changed += rename_targets(game);
        }
    }
    for dialogue in dialogues_mut(root) {
        for option in options_mut(dialogue) {
            if let Some(game) = option.get_mut("miniGame").and_then(Value::as_object_mut) {
                changed += rename_targets(game);
            }
        }
    }
    changed
}

fn rename_targets(game: &mut Map<String, Value>) -> usize {
    let mut changed = 0;
    for (legacy, current) in [
        ("winTarget", "onWinDialogueId"),
        ("loseTarget", "onLoseDialogueId"),
    ] {
        if let Some(target) = game.remove(legacy) {
            if is_falsy(game, current) && !target.is_null() {
                game.insert(current.into(), target);
            }
            changed += 1;
        }
    }
    changed
}
