//! World data model.
//!
//! Every type here is plain serializable data: rooms hold *copies* of the
//! actors placed in them, so the whole world can be deep-cloned for
//! per-player instancing and snapshotted for save/load. Behavior callbacks
//! never live on these types; they go in the
//! [`WorldActions`](crate::actions::WorldActions) side table keyed by entity
//! name, because callbacks are process code and cannot be cloned or
//! persisted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One description variant, gated by a player flag. The `"default"` flag is
/// the fallback; the first variant whose flag the player carries wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Description {
    pub flag: String,
    pub text: String,
}

impl Description {
    pub fn default_text(text: impl Into<String>) -> Vec<Description> {
        vec![Description {
            flag: "default".to_string(),
            text: text.into(),
        }]
    }
}

/// A current/max resource pair (health, stamina, magicka).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stat {
    pub current: i32,
    pub max: i32,
}

impl Stat {
    pub fn new(current: i32, max: i32) -> Self {
        Self { current, max }
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

/// Level progression: the level reached and experience earned toward it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub level: u32,
    pub xp: f64,
}

/// Combat stats shared by players, NPCs, and mobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub health: Stat,
    pub stamina: Stat,
    pub magicka: Stat,
    pub physical_damage: i32,
    pub physical_defense: i32,
    pub spell_damage: i32,
    pub spell_defense: i32,
    /// Chance in [0, 1] that an attack deals double damage.
    pub critical_chance: f64,
    pub progress: Level,
}

impl Stats {
    /// The flat 10-across-the-board statline used for freshly created
    /// players and NPCs.
    pub fn baseline() -> Self {
        Self {
            health: Stat::new(10, 10),
            stamina: Stat::new(10, 10),
            magicka: Stat::new(10, 10),
            physical_damage: 10,
            physical_defense: 10,
            spell_damage: 10,
            spell_defense: 5,
            critical_chance: 0.1,
            progress: Level { level: 1, xp: 0.0 },
        }
    }
}

/// A named stack of items: quantities are always positive, zero-quantity
/// entries are removed from whichever list held them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemDrop {
    pub name: String,
    pub quantity: u32,
}

impl ItemDrop {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// An item definition. Room and player inventories reference items by name
/// through [`ItemDrop`]; the definition carries the behavior gates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    pub usable: bool,
    /// Consumable items lose one quantity per use.
    #[serde(default)]
    pub consumable: bool,
}

/// A crafting recipe: consume the ingredient multiset, gain the crafted item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    pub ingredients: Vec<ItemDrop>,
    pub crafted_item: ItemDrop,
}

/// One dialog entry on an actor: any trigger phrase matches it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dialog {
    pub name: String,
    pub trigger: Vec<String>,
    #[serde(default)]
    pub response: Option<String>,
}

/// An item a vendor offers, with its gold price.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VendorItem {
    pub name: String,
    pub price: i32,
}

/// A non-player actor: NPC, mob, or room object. Stats are optional; an
/// actor without stats cannot fight or be fought.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub stats: Option<Stats>,
    #[serde(default)]
    pub items: Vec<ItemDrop>,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub dialog: Option<Vec<Dialog>>,
    #[serde(default)]
    pub vendor_items: Option<Vec<VendorItem>>,
    #[serde(default)]
    pub killable: bool,
}

/// Where a player currently stands.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub zone: String,
    pub room: String,
}

/// Validation type for a question in a question sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum QuestionType {
    /// Any input is accepted.
    String,
    /// Input must parse as a number.
    Number,
    /// Input must be one of yes/true/no/false (case-insensitive).
    Boolean,
}

/// One question in a sequence, plus the recorded answer once given.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub data_type: QuestionType,
    #[serde(default)]
    pub answer: Option<String>,
}

/// An ordered set of questions asked one at a time, overriding normal
/// command parsing until every question is answered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestionSequence {
    pub name: String,
    pub questions: Vec<Question>,
}

/// Payload carried by a player session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum SessionPayload {
    Text(String),
    Questions(QuestionSequence),
}

/// A player-scoped interactive sub-dialog. Sessions are data and persist
/// with the player; their completion callbacks live in the action registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub name: String,
    pub payload: SessionPayload,
}

/// The player: an actor with location, wealth, quest and recipe knowledge,
/// private zone instances, and active sessions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    pub stats: Stats,
    pub score: i32,
    pub gold: i32,
    pub location: Location,
    #[serde(default)]
    pub flags: Vec<String>,
    #[serde(default)]
    pub items: Vec<ItemDrop>,
    #[serde(default)]
    pub quests: Vec<String>,
    #[serde(default)]
    pub quests_completed: Vec<String>,
    #[serde(default)]
    pub known_recipes: Vec<String>,
    /// Player-private cloned zones for instanced content.
    #[serde(default)]
    pub instance: Vec<Zone>,
    #[serde(default)]
    pub sessions: Vec<Session>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// An exit between two rooms in the same zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Exit {
    pub direction: String,
    pub location: String,
    pub hidden: bool,
}

/// A navigable room. Actor lists hold independent copies of the world
/// templates: damaging a mob in one room never touches the template or any
/// other room's copy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    #[serde(default)]
    pub zone_start: bool,
    #[serde(default)]
    pub instance: bool,
    #[serde(default)]
    pub items: Vec<ItemDrop>,
    #[serde(default)]
    pub npcs: Vec<Actor>,
    #[serde(default)]
    pub mobs: Vec<Actor>,
    #[serde(default)]
    pub objects: Vec<Actor>,
    #[serde(default)]
    pub exits: Vec<Exit>,
}

/// A named map area: an ordered list of rooms, at most one of which is the
/// zone starter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Zone {
    pub name: String,
    pub rooms: Vec<Room>,
}

/// One step of a quest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuestStep {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    pub complete: bool,
}

/// A quest. `complete` is denormalized; the source of truth is "all steps
/// complete".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Quest {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
    pub complete: bool,
    #[serde(default)]
    pub steps: Option<Vec<QuestStep>>,
}

/// An achievement definition. Whether a player has earned it is evaluated
/// by a predicate in the action registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub descriptions: Vec<Description>,
}

/// The entity store: flat collections forming the world graph. Cheap to
/// clone (no callbacks anywhere inside).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct World {
    pub zones: Vec<Zone>,
    pub items: Vec<Item>,
    pub recipes: Vec<Recipe>,
    pub npcs: Vec<Actor>,
    pub mobs: Vec<Actor>,
    pub players: Vec<Player>,
    pub quests: Vec<Quest>,
    pub achievements: Vec<Achievement>,
    pub level_data: Vec<Level>,
}

/// Snapshot persisted by the save command: the whole player plus the whole
/// world. Registry callbacks are process code and are re-bound by the
/// running program after a load, never deserialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerProgress {
    pub player: Player,
    pub world: World,
    pub saved_at: DateTime<Utc>,
}

/// Structured resolver output: the response text plus a summary of what the
/// player's current room contains, for transports that render panels.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommandResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exits: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npcs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobs: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objects: Option<Vec<String>>,
}

impl CommandResponse {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            exits: None,
            npcs: None,
            mobs: None,
            objects: None,
        }
    }

    /// Serialize for the transport boundary.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}
