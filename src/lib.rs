//! # Textforge - A Text Adventure World Engine
//!
//! Textforge is an embeddable engine for building text adventure and MUD
//! style games. The hosting application builds a world out of zones,
//! rooms, items, NPCs, mobs, and quests, registers callbacks for the
//! interactive parts, and then feeds raw player input to the resolver one
//! line at a time.
//!
//! ## Features
//!
//! - **Free-Text Command Resolution**: Input is tokenized and expanded into every contiguous phrase, so multi-word commands, item names, and NPC names all match naturally.
//! - **Data/Behavior Split**: World entities are plain serializable data; all callbacks live in a registry keyed by entity name, which keeps save files portable and room instancing cheap.
//! - **Quests and Achievements**: Step-based quests with completion predicates, plus achievement checks swept on every command.
//! - **NPCs, Vendors, and Dialog**: Trigger-phrase dialog with optional parser actions, and vendors with buy/sell wiring out of the box.
//! - **Combat and Progression**: Stat-based combat with critical hits, loot drops, and a geometric experience table.
//! - **Per-Player Instancing**: Zones and rooms can be cloned per player so one player's changes never leak to another.
//! - **Question Sequences**: Session-backed prompts that capture typed, validated answers before normal parsing resumes.
//! - **Persistence**: Named save slots over sled with full player-plus-world snapshots.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use textforge::world::Engine;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), textforge::errors::EngineError> {
//!     let mut engine = Engine::new();
//!     engine.create_zone("Village");
//!     engine.create_room("Village", "Square", "A quiet village square.")?;
//!     engine.set_room_as_zone_starter("Village", "Square")?;
//!
//!     let player_id = engine.create_player("Ferris", "A curious adventurer.", "Village", "Square");
//!     let response = engine.parse_command(&player_id, "look").await?;
//!     println!("{}", response.response);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`world`] - The [`Engine`](world::Engine), entity store, and world construction
//! - [`resolver`] - Free-text command parsing and the built-in command tables
//! - [`actions`] - The callback registry and action type aliases
//! - [`types`] - Serializable world data types
//! - [`combat`] - Attack resolution and health helpers
//! - [`inventory`] - Take/drop/use/show and crafting
//! - [`quest`] - Quest lifecycle and progress rendering
//! - [`dialog`] - NPC conversation, vendors, and object examination
//! - [`session`] - Player sessions and question sequences
//! - [`achievement`] - Achievement checks
//! - [`spawn`] - Tick-driven spawn location timers
//! - [`instance`] - Per-player zone and room instancing
//! - [`storage`] - Save-slot persistence over sled
//! - [`config`] - Engine configuration
//! - [`errors`] - The crate error type

pub mod achievement;
pub mod actions;
pub mod combat;
pub mod combinations;
pub mod config;
pub mod dialog;
pub mod errors;
pub mod instance;
pub mod inventory;
pub mod quest;
pub mod resolver;
pub mod session;
pub mod spawn;
pub mod storage;
pub mod types;
pub mod world;

pub use config::EngineConfig;
pub use errors::EngineError;
pub use types::CommandResponse;
pub use world::Engine;
