//! Integration tests for world construction
//!
//! Tests the fail-fast construction contract:
//! - Referencing missing zones/rooms/entities errors
//! - Cardinal exits get automatic reverses, non-cardinal ones do not
//! - Hidden exits are invisible until used
//! - Placed actors are independent copies of their templates
//! - Flag-gated descriptions resolve per player

use textforge::errors::EngineError;
use textforge::types::Stats;
use textforge::world::Engine;

#[test]
fn missing_zone_is_an_error() {
    let mut engine = Engine::new();
    let err = engine
        .create_room("Nowhere", "Room1", "desc")
        .expect_err("should fail");
    assert!(matches!(err, EngineError::ZoneNotFound(_)));
}

#[test]
fn exit_to_missing_room_is_an_error() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    let err = engine
        .create_exit("Zone1", "Room1", "north", "Room2", false)
        .expect_err("should fail");
    assert!(matches!(err, EngineError::RoomNotFound { .. }));
}

#[test]
fn cardinal_exits_get_automatic_reverses() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    engine.create_room("Zone1", "Room2", "desc").expect("room");
    engine
        .create_exit("Zone1", "Room1", "north", "Room2", false)
        .expect("exit");

    let reverse = engine.get_exit("Zone1", "Room2", "south").expect("reverse");
    assert_eq!(reverse.location, "Room1");
}

#[test]
fn non_cardinal_exits_are_one_way() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    engine.create_room("Zone1", "Room2", "desc").expect("room");
    engine
        .create_exit("Zone1", "Room1", "portal", "Room2", false)
        .expect("exit");

    assert_eq!(engine.get_room("Zone1", "Room2").unwrap().exits.len(), 0);
}

#[tokio::test]
async fn hidden_exits_are_revealed_by_use() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    engine.create_room("Zone1", "Room2", "desc").expect("room");
    engine
        .create_exit("Zone1", "Room1", "north", "Room2", true)
        .expect("exit");
    let id = engine.create_player("Frank", "desc", "Zone1", "Room1");

    // hidden exits don't show up in the response decoration
    let response = engine.parse_command(&id, "look").await.expect("parse");
    assert_eq!(response.exits, None);

    // but walking through one works, and reveals it
    engine.parse_command(&id, "north").await.expect("parse");
    let exit = engine.get_exit("Zone1", "Room1", "north").expect("exit");
    assert!(!exit.hidden);
}

#[test]
fn placed_mobs_are_independent_copies() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    engine.create_room("Zone1", "Room2", "desc").expect("room");
    engine
        .set_room_as_zone_starter("Zone1", "Room1")
        .expect("starter");

    let mut stats = Stats::baseline();
    stats.health.current = 20;
    stats.health.max = 20;
    stats.physical_damage = 0;
    stats.physical_defense = 0;
    engine.create_mob("Goblin", "A goblin.", stats, Vec::new());
    engine.place_mob("Zone1", "Room1", "Goblin").expect("place");
    engine.place_mob("Zone1", "Room2", "Goblin").expect("place");

    let id = engine.create_player("Frank", "desc", "Zone1", "Room1");
    let mut player = engine.get_player(&id).expect("player");
    player.stats.critical_chance = 0.0;
    let args = vec!["goblin".to_string()];
    engine
        .attack_mob(&mut player, &args, false)
        .expect("attack");
    engine.put_player(player);

    let wounded = engine.get_room_mob("Zone1", "Room1", "Goblin").expect("mob");
    let untouched = engine.get_room_mob("Zone1", "Room2", "Goblin").expect("mob");
    let template = engine.get_mob("Goblin").expect("template");
    assert!(wounded.stats.as_ref().unwrap().health.current < 20);
    assert_eq!(untouched.stats.as_ref().unwrap().health.current, 20);
    assert_eq!(template.stats.as_ref().unwrap().health.current, 20);
}

#[test]
fn flag_gated_descriptions_resolve_per_player() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "A dark cave.").expect("room");
    engine
        .add_room_description("Zone1", "Room1", "torch_lit", "A cave lit by torchlight.")
        .expect("description");

    let id = engine.create_player("Frank", "desc", "Zone1", "Room1");
    let mut player = engine.get_player(&id).expect("player");
    assert_eq!(
        engine.get_room_description(&player),
        "A dark cave."
    );

    engine.set_flag(&mut player, "torch_lit");
    assert_eq!(
        engine.get_room_description(&player),
        "A cave lit by torchlight."
    );
}

#[tokio::test]
async fn godmode_goto_jumps_to_a_zone_starter() {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    engine
        .set_room_as_zone_starter("Zone1", "Room1")
        .expect("starter");
    engine.create_zone("Zone2");
    engine
        .create_room("Zone2", "The Forest", "A dense forest.")
        .expect("room");
    engine
        .set_room_as_zone_starter("Zone2", "The Forest")
        .expect("starter");

    let id = engine.create_player("Frank", "desc", "Zone1", "Room1");

    // without godmode the command doesn't exist
    let response = engine.parse_command(&id, "goto zone2").await.expect("parse");
    assert_eq!(response.response, "I don't understand that command.");

    let mut player = engine.get_player(&id).expect("player");
    engine.set_godmode(&mut player);
    engine.put_player(player);

    let response = engine.parse_command(&id, "goto zone2").await.expect("parse");
    assert!(response.response.contains("A dense forest."));
    let player = engine.get_player(&id).expect("player");
    assert_eq!(player.location.zone, "Zone2");
    assert_eq!(player.location.room, "The Forest");
}
