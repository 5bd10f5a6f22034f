//! Graph navigator - read-only traversal over a story's dialogue graph.
//!
//! All lookups are total: a missing id yields `None` or an empty list, never
//! an error. Mutating traversal state (the current position) is the play
//! session's job; the navigator only computes.

use std::collections::{HashSet, VecDeque};

use storyloom_domain::{
    outgoing_links, Dialogue, DialogueId, DialogueOption, Link, LinkKind, PlayerState, Story,
};

use crate::entities::actions::{ActionBatch, ActionInterpreter};

/// Where choosing an option leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionTarget<'a> {
    /// Direct edge to a dialogue
    Dialogue(&'a DialogueId),
    /// Destination decided by an external minigame result
    MiniGame {
        on_win: Option<&'a DialogueId>,
        on_lose: Option<&'a DialogueId>,
    },
    /// Neither an edge nor a minigame: choosing it goes nowhere
    Terminal,
}

/// Traversal queries over one story.
#[derive(Debug, Clone, Copy)]
pub struct GraphNavigator<'a> {
    story: &'a Story,
    interpreter: ActionInterpreter,
}

impl<'a> GraphNavigator<'a> {
    pub fn new(story: &'a Story) -> Self {
        Self {
            story,
            interpreter: ActionInterpreter::new(),
        }
    }

    pub fn story(&self) -> &'a Story {
        self.story
    }

    /// Direct lookup. `None` signals a broken or missing reference.
    pub fn find_dialogue(&self, id: &str) -> Option<&'a Dialogue> {
        let found = self.story.dialogue(id);
        if found.is_none() {
            tracing::debug!(dialogue_id = %id, "Dialogue not found");
        }
        found
    }

    /// The dialogue playback starts at: `start_id` if present, else the first.
    pub fn first_dialogue(&self, start_id: &str) -> Option<&'a Dialogue> {
        self.story.first_dialogue(start_id)
    }

    /// A minigame link wins over a direct edge when an option carries both.
    pub fn resolve_option_target(option: &DialogueOption) -> OptionTarget<'_> {
        if let Some(game) = &option.mini_game {
            return OptionTarget::MiniGame {
                on_win: game.on_win_dialogue_id.as_ref(),
                on_lose: game.on_lose_dialogue_id.as_ref(),
            };
        }
        match &option.next_dialogue_id {
            Some(target) => OptionTarget::Dialogue(target),
            None => OptionTarget::Terminal,
        }
    }

    /// Apply the side effects of arriving at `dialogue`.
    ///
    /// Marks it completed, moves to its chapter, then runs its entry actions.
    /// Entry actions run on every arrival, including repeat visits.
    pub fn enter(&self, dialogue: &Dialogue, mut player: PlayerState) -> ActionBatch {
        let mut changes = Vec::new();
        changes.extend(player.complete_dialogue(dialogue.id.clone()));
        if !dialogue.chapter_id.is_empty() {
            changes.extend(player.enter_chapter(dialogue.chapter_id.clone()));
        }

        let mut batch = self.interpreter.apply(&dialogue.on_enter, player);
        changes.append(&mut batch.changes);
        batch.changes = changes;
        batch
    }

    /// Dialogues with an automatic or option edge into `id`.
    pub fn backlinks(&self, id: &str) -> Vec<&'a Dialogue> {
        self.story.backlinks(id)
    }

    /// How `source` links to `target`: its automatic edge first, then the
    /// first option pointing there. `None` when there is no such edge.
    pub fn link_kind(&self, source: &str, target: &str) -> Option<LinkKind> {
        let source = self.story.dialogue(source)?;
        outgoing_links(source)
            .into_iter()
            .filter(|link| matches!(link.kind, LinkKind::Auto | LinkKind::Option { .. }))
            .find(|link| link.target == target)
            .map(|link| link.kind)
    }

    /// Every dialogue reachable from `start` by any edge, `start` included.
    ///
    /// Follows automatic edges, option edges and minigame outcomes. Edges to
    /// missing dialogues are not followed.
    pub fn reachable_from(&self, start: &str) -> HashSet<&'a DialogueId> {
        let mut seen = HashSet::new();
        let Some(root) = self.story.dialogue(start) else {
            return seen;
        };

        let mut queue = VecDeque::from([root]);
        seen.insert(&root.id);
        while let Some(dialogue) = queue.pop_front() {
            for link in outgoing_links(dialogue) {
                if let Some(next) = self.story.dialogue(link.target.as_str()) {
                    if seen.insert(&next.id) {
                        queue.push_back(next);
                    }
                }
            }
        }
        seen
    }

    /// Dialogues that cannot be reached from the start dialogue.
    pub fn orphans(&self, start_id: &str) -> Vec<&'a Dialogue> {
        let Some(start) = self.first_dialogue(start_id) else {
            return Vec::new();
        };
        let reachable = self.reachable_from(start.id.as_str());
        self.story
            .dialogues()
            .iter()
            .filter(|d| !reachable.contains(&d.id))
            .collect()
    }

    /// Edges whose target names no dialogue.
    pub fn dangling_links(&self) -> Vec<Link<'a>> {
        self.story
            .links()
            .into_iter()
            .filter(|link| !self.story.contains_dialogue(link.target.as_str()))
            .collect()
    }
}
