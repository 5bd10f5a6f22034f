//! Story mutation outcomes.

use crate::entities::{Dialogue, Item};
use crate::{DialogueId, LinkKind};

/// An edge that was cleared because its target was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearedLink {
    pub source: DialogueId,
    pub kind: LinkKind,
}

/// Outcome of removing a dialogue from the story.
#[derive(Debug, Clone)]
pub struct DialogueRemoved {
    pub dialogue: Dialogue,
    /// Every edge elsewhere in the story that pointed at the removed dialogue
    pub cleared_links: Vec<ClearedLink>,
}

/// Outcome of removing an item from the story catalogue.
#[derive(Debug, Clone)]
pub struct ItemRemoved {
    pub item: Item,
    /// Dialogues whose options or entry actions still name the item
    pub still_referenced_by: Vec<DialogueId>,
}
