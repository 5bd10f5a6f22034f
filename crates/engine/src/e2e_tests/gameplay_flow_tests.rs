//! E2E tests for playing a story from load to the last dialogue.
//!
//! Tests verify:
//! - Choosing an option runs its actions before moving on
//! - Visibility conditions follow inventory and stats as they change
//! - Minigame forks wait for a result, then branch
//! - Completion tracking stays a set across repeat visits

use storyloom_domain::{DialogueId, ItemId, PlayerStateChange};

use super::{cave_story_json, play, torch_story_json};
use crate::use_cases::{ChoiceOutcome, MiniGameResolution, MiniGameResult, NavigationOutcome};

fn visible_indices(session: &crate::use_cases::PlaySession) -> Vec<usize> {
    session.visible_options().iter().map(|o| o.index).collect()
}

#[test]
fn test_taking_the_torch() {
    let mut session = play(&torch_story_json());
    assert_eq!(session.current_dialogue_id().unwrap(), "start");

    let outcome = session.choose_option(0);
    assert!(matches!(
        outcome,
        ChoiceOutcome::Navigated { ref navigation, .. } if navigation.arrived()
    ));

    let inventory: Vec<&ItemId> = session.player().inventory().iter().collect();
    assert_eq!(inventory, vec![&ItemId::new("torch")]);
    assert_eq!(session.current_dialogue_id().unwrap(), "d2");
    let completed = session.player().completed_dialogues();
    assert!(completed.contains(&DialogueId::new("start")));
    assert!(completed.contains(&DialogueId::new("d2")));

    let items: Vec<&str> = session.player_items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(items, vec!["Torch"]);
}

#[test]
fn test_completion_is_a_set_across_revisits() {
    let mut session = play(&torch_story_json());
    session.go_to("start");
    session.go_to("d2");
    session.go_to("start");
    session.go_to("d2");

    let completed: Vec<&str> = session
        .player()
        .completed_dialogues()
        .iter()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(completed, vec!["d2", "start"]);
}

#[test]
fn test_missing_target_keeps_position() {
    let mut session = play(&torch_story_json());
    let outcome = session.go_to("nowhere");
    assert_eq!(
        outcome,
        NavigationOutcome::Missing {
            dialogue_id: DialogueId::new("nowhere")
        }
    );
    assert_eq!(session.current_dialogue_id().unwrap(), "start");
}

#[test]
fn test_gate_options_follow_inventory_and_stats() {
    let mut session = play(&cave_story_json());
    assert_eq!(session.stat("courage"), 0);

    // Empty-handed: only the way back is offered
    session.choose_option(1);
    assert_eq!(session.current_dialogue_id().unwrap(), "gate");
    assert_eq!(visible_indices(&session), vec![2]);
    assert_eq!(session.choose_option(0), ChoiceOutcome::Hidden { index: 0 });

    // Back for the key; it also raises courage past the squeeze threshold
    session.choose_option(2);
    let outcome = session.choose_option(0);
    match outcome {
        ChoiceOutcome::Navigated { action_changes, .. } => assert_eq!(
            action_changes,
            vec![
                PlayerStateChange::ItemAdded {
                    item_id: ItemId::new("key")
                },
                PlayerStateChange::StatChanged {
                    stat: "courage".to_string(),
                    from: 0,
                    to: 2
                },
            ]
        ),
        other => panic!("expected navigation, got {other:?}"),
    }
    assert_eq!(visible_indices(&session), vec![0, 1, 2]);

    // Unlocking uses up the key
    session.choose_option(0);
    assert_eq!(session.current_dialogue_id().unwrap(), "hall");
    assert!(!session.has_item("key"));
    assert_eq!(session.player().current_chapter().unwrap(), "ch2");
    assert_eq!(session.player().score(), 10);
}

#[test]
fn test_dice_with_the_troll() {
    let mut session = play(&cave_story_json());
    session.go_to("hall");
    assert_eq!(session.player().score(), 10);

    let outcome = session.choose_option(0);
    assert!(matches!(outcome, ChoiceOutcome::MiniGamePending { ref pending, .. }
        if pending.mini_game_id.as_ref().is_some_and(|id| id == "dice")));
    assert_eq!(session.current_dialogue_id().unwrap(), "hall");

    // Losing sends the player back to the entrance
    let resolution = session.resolve_mini_game(MiniGameResult::Lost);
    assert!(matches!(resolution, MiniGameResolution::Navigated(ref nav) if nav.arrived()));
    assert_eq!(session.current_dialogue_id().unwrap(), "start");

    // Entry actions run again on the second visit
    session.go_to("hall");
    assert_eq!(session.player().score(), 20);
    session.choose_option(0);
    session.resolve_mini_game(MiniGameResult::Won);
    assert_eq!(session.current_dialogue_id().unwrap(), "treasure");
    assert!(session.has_flag("rich"));
    assert_eq!(session.player().score(), 70);

    assert_eq!(
        session.resolve_mini_game(MiniGameResult::Won),
        MiniGameResolution::NothingPending
    );
}

#[test]
fn test_reset_starts_over_with_baseline_stats() {
    let mut session = play(&cave_story_json());
    session.choose_option(0);
    session.reset();

    assert_eq!(session.current_dialogue_id().unwrap(), "start");
    assert!(session.player().inventory().is_empty());
    let stats: Vec<(&str, i64)> = session
        .player()
        .stats()
        .iter()
        .map(|(name, value)| (name.as_str(), *value))
        .collect();
    assert_eq!(stats, vec![("charisma", 0), ("courage", 0), ("knowledge", 0)]);
    let completed: Vec<&str> = session
        .player()
        .completed_dialogues()
        .iter()
        .map(|id| id.as_str())
        .collect();
    assert_eq!(completed, vec!["start"]);
}
