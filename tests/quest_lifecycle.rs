//! Integration tests for the quest lifecycle
//!
//! Tests pickup/drop, the active quest limit, step predicates, the
//! exactly-once end action, and the stepless-quest error.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use textforge::errors::EngineError;
use textforge::world::Engine;

fn quest_world() -> (Engine, String) {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    let id = engine.create_player("Frank", "desc", "Zone1", "Room1");
    (engine, id)
}

#[test]
fn pickup_fires_start_action_once() {
    let (mut engine, id) = quest_world();
    engine.create_quest("Find the Gem", "Recover the lost gem.");
    engine
        .add_quest_start_action(
            "Find the Gem",
            Arc::new(|_engine, _player| Some("An old man points you east.".to_string())),
        )
        .expect("start action");

    let mut player = engine.get_player(&id).expect("player");
    let result = engine.pickup_quest(&mut player, "Find the Gem");
    assert_eq!(
        result,
        "You picked up the quest Find the Gem.\n\nAn old man points you east."
    );

    let result = engine.pickup_quest(&mut player, "Find the Gem");
    assert_eq!(result, "You already have the quest Find the Gem.");
}

#[test]
fn active_quest_limit_is_enforced() {
    let (mut engine, id) = quest_world();
    for n in 0..6 {
        engine.create_quest(&format!("Quest {}", n), "desc");
    }
    let mut player = engine.get_player(&id).expect("player");
    for n in 0..5 {
        engine.pickup_quest(&mut player, &format!("Quest {}", n));
    }
    let result = engine.pickup_quest(&mut player, "Quest 5");
    assert_eq!(
        result,
        "You can't have more than 5 active quests at a time."
    );
    assert_eq!(player.quests.len(), 5);
}

#[test]
fn steps_complete_through_predicates_and_end_fires_once() {
    let (mut engine, id) = quest_world();
    engine.create_item("Gem", "A shiny gem.", false, false);
    engine.create_quest("Find the Gem", "Recover the lost gem.");
    engine
        .add_quest_step(
            "Find the Gem",
            "Hold the gem",
            "Have the gem in your inventory.",
            Some(Arc::new(|engine: &mut Engine, player: &mut textforge::types::Player| {
                engine.has_item(player, "Gem")
            })),
        )
        .expect("step");

    let end_count = Arc::new(AtomicUsize::new(0));
    let counter = end_count.clone();
    engine
        .add_quest_end_action(
            "Find the Gem",
            Arc::new(move |_engine, _player| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some("The old man thanks you.".to_string())
            }),
        )
        .expect("end action");

    let mut player = engine.get_player(&id).expect("player");
    engine.pickup_quest(&mut player, "Find the Gem");

    assert!(!engine
        .is_quest_complete(&mut player, "Find the Gem")
        .expect("check"));
    assert_eq!(end_count.load(Ordering::SeqCst), 0);

    player.items.push(textforge::types::ItemDrop::new("Gem", 1));
    assert!(engine
        .is_quest_complete(&mut player, "Find the Gem")
        .expect("check"));
    assert_eq!(end_count.load(Ordering::SeqCst), 1);
    assert!(player.quests.is_empty());
    assert_eq!(player.quests_completed, vec!["Find the Gem".to_string()]);

    // a completed quest is no longer held, so re-checking is a no-op
    assert!(!engine
        .is_quest_complete(&mut player, "Find the Gem")
        .expect("check"));
    assert_eq!(end_count.load(Ordering::SeqCst), 1);
}

#[test]
fn quest_with_no_steps_cannot_be_evaluated() {
    let (mut engine, id) = quest_world();
    engine.create_quest("Empty Quest", "desc");
    let mut player = engine.get_player(&id).expect("player");
    engine.pickup_quest(&mut player, "Empty Quest");

    let err = engine
        .is_quest_complete(&mut player, "Empty Quest")
        .expect_err("should fail");
    assert!(matches!(err, EngineError::QuestHasNoSteps(_)));
}

#[test]
fn double_registering_a_quest_phase_is_an_error() {
    let (mut engine, _id) = quest_world();
    engine.create_quest("Find the Gem", "desc");
    engine
        .add_quest_start_action("Find the Gem", Arc::new(|_e, _p| None))
        .expect("first registration");
    let err = engine
        .add_quest_start_action("Find the Gem", Arc::new(|_e, _p| None))
        .expect_err("should fail");
    assert!(matches!(err, EngineError::QuestActionExists { .. }));
}

#[test]
fn progress_renders_a_checklist() {
    let (mut engine, id) = quest_world();
    engine.create_item("Gem", "A shiny gem.", false, false);
    engine.create_quest("Find the Gem", "Recover the lost gem.");
    engine
        .add_quest_step("Find the Gem", "Talk to the old man", "desc", None)
        .expect("step");
    engine
        .add_quest_step(
            "Find the Gem",
            "Hold the gem",
            "desc",
            Some(Arc::new(|engine: &mut Engine, player: &mut textforge::types::Player| {
                engine.has_item(player, "Gem")
            })),
        )
        .expect("step");

    let mut player = engine.get_player(&id).expect("player");
    engine.pickup_quest(&mut player, "Find the Gem");
    player.items.push(textforge::types::ItemDrop::new("Gem", 1));

    let progress = engine.get_quest_progress(&mut player, "Find the Gem");
    assert!(progress.contains("[ ] Talk to the old man"));
    assert!(progress.contains("[x] Hold the gem"));
}
