//! Integration tests for free-text command resolution
//!
//! Tests the resolver pipeline end to end:
//! - Empty input falls back to `look`
//! - Unknown input produces the stock fallback
//! - `talk to` outranks other command synonyms inside an utterance
//! - Grammatical articles are stripped from arguments
//! - Oversized input is truncated safely
//! - Dead players only get the reduced command table

use textforge::world::Engine;

fn two_room_world() -> (Engine, String) {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine
        .create_room("Zone1", "Room1", "This is room 1")
        .expect("room 1");
    engine
        .create_room("Zone1", "Room2", "This is room 2")
        .expect("room 2");
    engine
        .set_room_as_zone_starter("Zone1", "Room1")
        .expect("starter");
    engine
        .create_exit("Zone1", "Room1", "north", "Room2", false)
        .expect("exit");
    let id = engine.create_player("Frank", "A plucky adventurer.", "Zone1", "Room1");
    (engine, id)
}

#[tokio::test]
async fn empty_input_falls_back_to_look() {
    let (mut engine, id) = two_room_world();
    let response = engine.parse_command(&id, "   ").await.expect("parse");
    assert!(response.response.contains("This is room 1"));
    assert_eq!(response.exits, Some(vec!["north".to_string()]));
}

#[tokio::test]
async fn unknown_input_gets_fallback_response() {
    let (mut engine, id) = two_room_world();
    let response = engine
        .parse_command(&id, "flibber the jabberwock")
        .await
        .expect("parse");
    assert_eq!(response.response, "I don't understand that command.");
}

#[tokio::test]
async fn movement_follows_exits_and_reverses() {
    let (mut engine, id) = two_room_world();
    let response = engine.parse_command(&id, "north").await.expect("parse");
    assert!(response.response.contains("This is room 2"));

    // create_exit added the reverse automatically
    let response = engine.parse_command(&id, "south").await.expect("parse");
    assert!(response.response.contains("This is room 1"));

    let response = engine.parse_command(&id, "west").await.expect("parse");
    assert_eq!(response.response, "You can't go that way.");
}

#[tokio::test]
async fn articles_are_stripped_from_arguments() {
    let (mut engine, id) = two_room_world();
    engine.create_item("Sword", "A rusty sword.", false, false);
    engine
        .place_item("Zone1", "Room1", "Sword", 1)
        .expect("place");

    let response = engine
        .parse_command(&id, "take the sword")
        .await
        .expect("parse");
    assert_eq!(response.response, "You took the Sword.");
    let player = engine.get_player(&id).expect("player");
    assert!(engine.has_item(&player, "Sword"));
}

#[tokio::test]
async fn talk_to_outranks_take() {
    let (mut engine, id) = two_room_world();
    engine.create_item("Gem", "A shiny gem.", false, false);
    engine.place_item("Zone1", "Room1", "Gem", 1).expect("place");
    engine.create_npc("Guard", "A bored guard.");
    engine
        .create_dialog("Guard", &["take gem"], Some("Keep your hands off that."), None)
        .expect("dialog");
    engine.place_npc("Zone1", "Room1", "Guard").expect("place npc");

    let response = engine
        .parse_command(&id, "talk to Guard say take gem")
        .await
        .expect("parse");
    assert_eq!(response.response, "Keep your hands off that.");

    // the gem was never taken
    assert!(engine.get_room_item("Zone1", "Room1", "Gem").is_some());
}

#[tokio::test]
async fn oversized_input_is_truncated() {
    let (mut engine, id) = two_room_world();
    let long_input = "é".repeat(4000);
    let response = engine.parse_command(&id, &long_input).await.expect("parse");
    assert_eq!(response.response, "I don't understand that command.");
}

#[tokio::test]
async fn dead_players_get_the_reduced_table() {
    let (mut engine, id) = two_room_world();
    let mut player = engine.get_player(&id).expect("player");
    player.stats.health.current = 0;
    engine.put_player(player);

    let response = engine.parse_command(&id, "north").await.expect("parse");
    assert_eq!(response.response, "I don't understand that command.");

    let response = engine.parse_command(&id, "resurrect").await.expect("parse");
    assert_eq!(response.response, "You have been resurrected.");

    let player = engine.get_player(&id).expect("player");
    assert!(player.stats.health.is_full());
    assert_eq!(player.location.room, "Room1");
}

#[tokio::test]
async fn room_commands_run_after_the_main_table() {
    let (mut engine, id) = two_room_world();
    engine
        .add_room_command_action(
            "Zone1",
            "Room1",
            "ring bell",
            "Ring the old bell.",
            &["ring"],
            std::sync::Arc::new(|_engine, _player, _input, _command, _args| {
                Ok("The bell tolls.".to_string())
            }),
        )
        .expect("room command");

    let response = engine.parse_command(&id, "ring").await.expect("parse");
    assert_eq!(response.response, "Ring the old bell.\n\nThe bell tolls.");
}

#[tokio::test]
async fn dead_players_fall_through_to_room_commands() {
    let (mut engine, id) = two_room_world();
    engine
        .add_room_command_action(
            "Zone1",
            "Room1",
            "pray",
            "You kneel at the shrine.",
            &["pray"],
            std::sync::Arc::new(|_engine, _player, _input, _command, _args| {
                Ok("A warm light surrounds you.".to_string())
            }),
        )
        .expect("room command");

    let mut player = engine.get_player(&id).expect("player");
    player.stats.health.current = 0;
    engine.put_player(player);

    let response = engine.parse_command(&id, "pray").await.expect("parse");
    assert_eq!(
        response.response,
        "You kneel at the shrine.\n\nA warm light surrounds you."
    );
}

#[tokio::test]
async fn disabled_main_table_still_allows_room_commands() {
    let (mut engine, id) = two_room_world();
    engine
        .add_room_command_action(
            "Zone1",
            "Room1",
            "ring bell",
            "Ring the old bell.",
            &["ring"],
            std::sync::Arc::new(|_engine, _player, _input, _command, _args| {
                Ok("The bell tolls.".to_string())
            }),
        )
        .expect("room command");

    let mut player = engine.get_player(&id).expect("player");
    engine.set_flag(&mut player, "disable_main_commands");
    engine.put_player(player);

    // main-table synonyms no longer resolve
    let response = engine.parse_command(&id, "look").await.expect("parse");
    assert_eq!(response.response, "I don't understand that command.");

    // room-local commands still dispatch
    let response = engine.parse_command(&id, "ring").await.expect("parse");
    assert_eq!(response.response, "Ring the old bell.\n\nThe bell tolls.");
}
