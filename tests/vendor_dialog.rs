//! Integration tests for NPC dialog and vendors
//!
//! Tests trigger matching, the "hmm..." fallback, vendor listings, and
//! the purchase/sell gold flow (unknown item rejected before gold).

use textforge::types::VendorItem;
use textforge::world::Engine;

fn npc_world() -> (Engine, String) {
    let mut engine = Engine::new();
    engine.create_zone("Zone1");
    engine.create_room("Zone1", "Room1", "desc").expect("room");
    let id = engine.create_player("Frank", "desc", "Zone1", "Room1");
    (engine, id)
}

#[tokio::test]
async fn dialog_triggers_return_canned_responses() {
    let (mut engine, id) = npc_world();
    engine.create_npc("Old Man", "A wizened old man.");
    engine
        .create_dialog("Old Man", &["hello", "hi"], Some("Greetings, traveler."), None)
        .expect("dialog");
    engine.place_npc("Zone1", "Room1", "Old Man").expect("place");

    let response = engine
        .parse_command(&id, "talk to old man say hello")
        .await
        .expect("parse");
    assert_eq!(response.response, "Greetings, traveler.");

    let response = engine
        .parse_command(&id, "talk to old man about the weather")
        .await
        .expect("parse");
    assert_eq!(response.response, "hmm...");
}

#[tokio::test]
async fn npcs_without_dialog_decline_to_talk() {
    let (mut engine, id) = npc_world();
    engine.create_npc("Hermit", "A silent hermit.");
    engine.place_npc("Zone1", "Room1", "Hermit").expect("place");

    let response = engine
        .parse_command(&id, "talk to hermit say hello")
        .await
        .expect("parse");
    assert_eq!(response.response, "Hermit does not want to talk to you.");
}

#[tokio::test]
async fn vendors_list_their_stock() {
    let (mut engine, id) = npc_world();
    engine
        .create_vendor(
            "Merchant",
            "A traveling merchant.",
            vec![
                VendorItem {
                    name: "Potion".to_string(),
                    price: 5,
                },
                VendorItem {
                    name: "Sword".to_string(),
                    price: 20,
                },
            ],
        )
        .expect("vendor");
    engine.place_npc("Zone1", "Room1", "Merchant").expect("place");

    let response = engine
        .parse_command(&id, "talk to merchant show me your items")
        .await
        .expect("parse");
    assert_eq!(
        response.response,
        "Items for sale: Potion (5 gold), Sword (20 gold)"
    );
}

#[tokio::test]
async fn purchases_check_the_item_before_the_gold() {
    let (mut engine, id) = npc_world();
    engine
        .create_vendor(
            "Merchant",
            "A traveling merchant.",
            vec![VendorItem {
                name: "Potion".to_string(),
                price: 5,
            }],
        )
        .expect("vendor");
    engine.place_npc("Zone1", "Room1", "Merchant").expect("place");

    // unknown item: rejected even though the player has no gold either
    let response = engine
        .parse_command(&id, "talk to merchant buy unicorn")
        .await
        .expect("parse");
    assert_eq!(response.response, "That item does not exist.");

    let response = engine
        .parse_command(&id, "talk to merchant buy potion")
        .await
        .expect("parse");
    assert_eq!(response.response, "You don't have enough gold to purchase Potion.");

    let mut player = engine.get_player(&id).expect("player");
    player.gold = 12;
    engine.put_player(player);

    let response = engine
        .parse_command(&id, "talk to merchant buy potion")
        .await
        .expect("parse");
    assert_eq!(response.response, "You purchased Potion for 5 gold.");
    let player = engine.get_player(&id).expect("player");
    assert_eq!(player.gold, 7);
    assert!(engine.has_item(&player, "Potion"));
}

#[tokio::test]
async fn selling_returns_the_list_price() {
    let (mut engine, id) = npc_world();
    engine
        .create_vendor(
            "Merchant",
            "A traveling merchant.",
            vec![VendorItem {
                name: "Potion".to_string(),
                price: 5,
            }],
        )
        .expect("vendor");
    engine.place_npc("Zone1", "Room1", "Merchant").expect("place");

    let response = engine
        .parse_command(&id, "talk to merchant sell potion")
        .await
        .expect("parse");
    assert_eq!(response.response, "You don't have that item.");

    let mut player = engine.get_player(&id).expect("player");
    player.items.push(textforge::types::ItemDrop::new("Potion", 1));
    engine.put_player(player);

    let response = engine
        .parse_command(&id, "talk to merchant sell potion")
        .await
        .expect("parse");
    assert_eq!(response.response, "You sold Potion for 5 gold.");
    let player = engine.get_player(&id).expect("player");
    assert_eq!(player.gold, 5);
    assert!(player.items.is_empty());
}

#[tokio::test]
async fn objects_can_be_looked_at_and_examined() {
    let (mut engine, id) = npc_world();
    engine
        .create_and_place_room_object(
            "Zone1",
            "Room1",
            "Fireplace",
            "A roaring fireplace.",
            Some(vec![textforge::types::Dialog {
                name: "Fireplace".to_string(),
                trigger: vec!["fireplace".to_string()],
                response: Some("Something glints behind the logs.".to_string()),
            }]),
        )
        .expect("object");

    let response = engine
        .parse_command(&id, "look at the fireplace")
        .await
        .expect("parse");
    assert_eq!(response.response, "A roaring fireplace.");

    let response = engine
        .parse_command(&id, "examine fireplace")
        .await
        .expect("parse");
    assert_eq!(response.response, "Something glints behind the logs.");
}
