//! Integrity report - authoring-time checks over a whole story.
//!
//! Nothing here is fatal to playback (dangling edges are silent no-ops), so
//! the report is advisory: it tells an author what to fix.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use storyloom_domain::{ChapterId, DialogueId, ItemId, LinkKind, MiniGameId, Story};

use crate::entities::GraphNavigator;

/// An edge whose target names no dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingLink {
    pub source: DialogueId,
    pub target: DialogueId,
    pub kind: LinkKind,
}

/// A document-level minigame outcome naming no dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DanglingMiniGameTarget {
    pub mini_game_id: Option<MiniGameId>,
    pub target: DialogueId,
}

/// A condition or action naming an item missing from the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownItemRef {
    pub dialogue_id: DialogueId,
    pub item_id: ItemId,
}

/// A dialogue whose chapter id names no chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnknownChapterRef {
    pub dialogue_id: DialogueId,
    pub chapter_id: ChapterId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrityReport {
    pub dangling_links: Vec<DanglingLink>,
    pub dangling_mini_game_targets: Vec<DanglingMiniGameTarget>,
    /// Dialogues unreachable from the start dialogue
    pub orphans: Vec<DialogueId>,
    pub unknown_chapters: Vec<UnknownChapterRef>,
    pub unknown_items: Vec<UnknownItemRef>,
    pub duplicate_dialogue_ids: Vec<DialogueId>,
}

impl IntegrityReport {
    pub fn build(story: &Story, start_id: &str) -> Self {
        let navigator = GraphNavigator::new(story);

        let dangling_links = navigator
            .dangling_links()
            .into_iter()
            .map(|link| DanglingLink {
                source: link.source.clone(),
                target: link.target.clone(),
                kind: link.kind,
            })
            .collect();

        let dangling_mini_game_targets = story
            .mini_games()
            .unwrap_or_default()
            .iter()
            .flat_map(|game| {
                [&game.on_win_dialogue_id, &game.on_lose_dialogue_id]
                    .into_iter()
                    .flatten()
                    .filter(move |target| !story.contains_dialogue(target.as_str()))
                    .map(move |target| DanglingMiniGameTarget {
                        mini_game_id: game.id.clone(),
                        target: target.clone(),
                    })
            })
            .collect();

        let orphans = navigator
            .orphans(start_id)
            .into_iter()
            .map(|d| d.id.clone())
            .collect();

        let unknown_chapters = story
            .unknown_chapter_refs()
            .into_iter()
            .map(|(dialogue_id, chapter_id)| UnknownChapterRef {
                dialogue_id: dialogue_id.clone(),
                chapter_id: chapter_id.clone(),
            })
            .collect();

        let mut unknown_items = Vec::new();
        for dialogue in story.dialogues() {
            let mentioned: BTreeSet<&ItemId> = dialogue
                .on_enter
                .iter()
                .filter_map(|a| a.item_id())
                .chain(dialogue.options.iter().flat_map(|o| {
                    o.visibility_condition
                        .item_id()
                        .into_iter()
                        .chain(o.actions.iter().filter_map(|a| a.item_id()))
                }))
                .collect();
            unknown_items.extend(
                mentioned
                    .into_iter()
                    .filter(|id| story.item(id.as_str()).is_none())
                    .map(|id| UnknownItemRef {
                        dialogue_id: dialogue.id.clone(),
                        item_id: id.clone(),
                    }),
            );
        }

        let duplicate_dialogue_ids = story
            .duplicate_dialogue_ids()
            .into_iter()
            .cloned()
            .collect();

        let report = Self {
            dangling_links,
            dangling_mini_game_targets,
            orphans,
            unknown_chapters,
            unknown_items,
            duplicate_dialogue_ids,
        };
        tracing::debug!(issues = report.issue_count(), "Integrity report built");
        report
    }

    pub fn issue_count(&self) -> usize {
        self.dangling_links.len()
            + self.dangling_mini_game_targets.len()
            + self.orphans.len()
            + self.unknown_chapters.len()
            + self.unknown_items.len()
            + self.duplicate_dialogue_ids.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

impl fmt::Display for IntegrityReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return writeln!(f, "No issues found");
        }
        for link in &self.dangling_links {
            writeln!(f, "dangling   {} -> {} ({})", link.source, link.target, link.kind)?;
        }
        for game in &self.dangling_mini_game_targets {
            let id = game.mini_game_id.as_ref().map_or("<no id>", |id| id.as_str());
            writeln!(f, "dangling   minigame {} -> {}", id, game.target)?;
        }
        for id in &self.orphans {
            writeln!(f, "orphan     {id}")?;
        }
        for entry in &self.unknown_chapters {
            writeln!(f, "chapter    {} in unknown chapter {}", entry.dialogue_id, entry.chapter_id)?;
        }
        for entry in &self.unknown_items {
            writeln!(f, "item       {} names unknown item {}", entry.dialogue_id, entry.item_id)?;
        }
        for id in &self.duplicate_dialogue_ids {
            writeln!(f, "duplicate  {id}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::migrate;
    use serde_json::json;

    fn story_with_problems() -> Story {
        migrate(json!({
            "chapters": [{"id": "ch1", "title": "One"}],
            "dialogues": [
                {"id": "start", "chapterId": "ch1", "nextDialogueId": "gone", "options": [
                    {"text": "go", "nextDialogueId": "mid", "actions": [{"type": "add_item", "id": "torch"}]}
                ]},
                {"id": "mid", "chapterId": "ch1", "options": [
                    {"text": "check", "visibilityCondition": {"type": "has_item", "itemId": "key"}}
                ]},
                {"id": "island", "chapterId": "ch1"}
            ],
            "items": [{"id": "torch", "name": "Torch"}],
            "miniGames": [{"id": "dice", "onWinDialogueId": "mid", "onLoseDialogueId": "nowhere"}]
        }))
        .unwrap()
    }

    #[test]
    fn finds_every_kind_of_problem() {
        let report = IntegrityReport::build(&story_with_problems(), "start");

        assert_eq!(
            report.dangling_links,
            vec![DanglingLink {
                source: "start".into(),
                target: "gone".into(),
                kind: LinkKind::Auto,
            }]
        );
        assert_eq!(report.dangling_mini_game_targets.len(), 1);
        assert_eq!(report.dangling_mini_game_targets[0].target, "nowhere");
        assert_eq!(report.orphans, vec![DialogueId::new("island")]);
        assert_eq!(report.unknown_items.len(), 1);
        assert_eq!(report.unknown_items[0].item_id, "key");
        assert!(report.unknown_chapters.is_empty());
        assert_eq!(report.issue_count(), 4);
        assert!(report.to_string().contains("orphan     island"));
    }

    #[test]
    fn template_story_is_clean() {
        let story = crate::use_cases::editor::new_story_template();
        let report = IntegrityReport::build(&story, "start");
        assert!(report.is_clean());
        assert_eq!(report.to_string(), "No issues found\n");
    }
}
