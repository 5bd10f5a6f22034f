//! Use cases - User story orchestration.
//!
//! Each module serves one kind of caller. Use cases orchestrate across entity
//! modules and own whatever mutable state the caller works against.

pub mod editor;
pub mod integrity;
pub mod library;
pub mod playback;

pub use editor::{new_story_template, EditorSession, NEW_STORY_TITLE};
pub use integrity::{
    DanglingLink, DanglingMiniGameTarget, IntegrityReport, UnknownChapterRef, UnknownItemRef,
};
pub use library::{copy_file_name, load_story, normalize_file_name, save_story, StoryLibrary};
pub use playback::{
    ChoiceOutcome, MiniGameResolution, MiniGameResult, NavigationOutcome, PendingMiniGame,
    PlaySession, VisibleOption,
};
