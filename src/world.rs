//! The engine core: entity store ownership and world construction.
//!
//! `Engine` owns the [`World`] (pure data) and the [`WorldActions`]
//! registry (behavior), plus the built-in command tables. It is a plain
//! value owned by the caller; "reset" constructs fresh state rather than
//! mutating a global.
//!
//! Construction methods follow a fail-fast contract: referencing an entity
//! that does not exist is a content-authoring bug and returns an
//! [`EngineError`], which world-building code is expected to propagate.
//! In-session soft failures are plain strings returned to the player.

use log::{debug, info};
use rand::Rng;
use uuid::Uuid;

use crate::actions::{
    ActionFn, AsyncCommandAction, CommandAction, CommandFn, DecisionFn, WorldActions,
};
use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::types::{
    Actor, Description, Dialog, Exit, Item, ItemDrop, Level, Location, Player, Quest, QuestStep,
    Recipe, Room, Stats, VendorItem, World, Zone,
};

/// Where a player's current room lives: the shared world template or the
/// player's private instance. Indices are resolved once and dereferenced
/// at the point of mutation so world and player borrows stay disjoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoomSlot {
    World { zone: usize, room: usize },
    Instance { zone: usize, room: usize },
}

pub(crate) fn slot_room_mut<'a>(
    world: &'a mut World,
    instance: &'a mut [Zone],
    slot: RoomSlot,
) -> &'a mut Room {
    match slot {
        RoomSlot::World { zone, room } => &mut world.zones[zone].rooms[room],
        RoomSlot::Instance { zone, room } => &mut instance[zone].rooms[room],
    }
}

/// The text-adventure engine: world graph, action registry, and command
/// tables, resolved one command at a time.
pub struct Engine {
    pub config: EngineConfig,
    pub world: World,
    pub actions: WorldActions,
    pub(crate) main_commands: Vec<CommandAction>,
    pub(crate) async_commands: Vec<AsyncCommandAction>,
    pub(crate) dead_commands: Vec<CommandAction>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut engine = Self {
            config,
            world: World::default(),
            actions: WorldActions::new(),
            main_commands: Vec::new(),
            async_commands: Vec::new(),
            dead_commands: Vec::new(),
        };
        engine.world.level_data = calculate_level_experience(1.0, 1.2, 50);
        engine.main_commands = crate::resolver::main_command_actions();
        engine.async_commands = crate::resolver::async_command_actions();
        engine.dead_commands = crate::resolver::player_dead_command_actions();
        engine
    }

    /// Discard all world data. The action registry is untouched; use
    /// [`reset_world_actions`](Self::reset_world_actions) for that side.
    pub fn reset_world(&mut self) {
        self.world = World {
            level_data: calculate_level_experience(1.0, 1.2, 50),
            ..World::default()
        };
    }

    /// Discard all registered actions. World data is untouched.
    pub fn reset_world_actions(&mut self) {
        self.actions.reset();
    }

    ////////////
    // PLAYER //
    ////////////

    /// Create a player, insert it into the world, and return its id.
    pub fn create_player(
        &mut self,
        name: &str,
        description: &str,
        zone_name: &str,
        room_name: &str,
    ) -> String {
        let player = Player {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            stats: Stats::baseline(),
            score: 0,
            gold: 0,
            location: Location {
                zone: zone_name.to_string(),
                room: room_name.to_string(),
            },
            flags: Vec::new(),
            items: Vec::new(),
            quests: Vec::new(),
            quests_completed: Vec::new(),
            known_recipes: Vec::new(),
            instance: Vec::new(),
            sessions: Vec::new(),
            email: None,
            achievements: Vec::new(),
        };
        let id = player.id.clone();
        info!("created player {} ({})", player.name, id);
        self.world.players.push(player);
        id
    }

    /// Fetch a working copy of a player. Mutate it and write it back with
    /// [`put_player`](Self::put_player).
    pub fn get_player(&self, id: &str) -> Result<Player, EngineError> {
        self.world
            .players
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| EngineError::PlayerNotFound(id.to_string()))
    }

    /// Write a working copy back into the world, replacing the stored
    /// player with the same id (or inserting if absent, e.g. after a load
    /// replaced the world).
    pub fn put_player(&mut self, player: Player) {
        if let Some(slot) = self.world.players.iter_mut().find(|p| p.id == player.id) {
            *slot = player;
        } else {
            self.world.players.push(player);
        }
    }

    pub fn remove_player(&mut self, id: &str) {
        self.world.players.retain(|p| p.id != id);
    }

    //////////
    // ZONE //
    //////////

    pub fn create_zone(&mut self, name: &str) {
        self.world.zones.push(Zone {
            name: name.to_string(),
            rooms: Vec::new(),
        });
    }

    pub fn remove_zone(&mut self, name: &str) {
        self.world
            .zones
            .retain(|z| !z.name.eq_ignore_ascii_case(name));
    }

    pub fn get_zone(&self, name: &str) -> Option<&Zone> {
        self.world
            .zones
            .iter()
            .find(|z| z.name.eq_ignore_ascii_case(name))
    }

    pub fn get_zone_mut(&mut self, name: &str) -> Option<&mut Zone> {
        self.world
            .zones
            .iter_mut()
            .find(|z| z.name.eq_ignore_ascii_case(name))
    }

    fn require_zone_mut(&mut self, name: &str) -> Result<&mut Zone, EngineError> {
        let missing = EngineError::ZoneNotFound(name.to_string());
        self.get_zone_mut(name).ok_or(missing)
    }

    //////////
    // ROOM //
    //////////

    pub fn create_room(
        &mut self,
        zone_name: &str,
        name: &str,
        description: &str,
    ) -> Result<(), EngineError> {
        let zone = self.require_zone_mut(zone_name)?;
        zone.rooms.push(Room {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            zone_start: false,
            instance: false,
            items: Vec::new(),
            npcs: Vec::new(),
            mobs: Vec::new(),
            objects: Vec::new(),
            exits: Vec::new(),
        });
        Ok(())
    }

    pub fn remove_room(&mut self, zone_name: &str, room_name: &str) -> Result<(), EngineError> {
        let zone = self.require_zone_mut(zone_name)?;
        zone.rooms
            .retain(|r| !r.name.eq_ignore_ascii_case(room_name));
        Ok(())
    }

    pub fn get_room(&self, zone_name: &str, room_name: &str) -> Option<&Room> {
        self.get_zone(zone_name)?
            .rooms
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(room_name))
    }

    pub fn get_room_mut(&mut self, zone_name: &str, room_name: &str) -> Option<&mut Room> {
        self.get_zone_mut(zone_name)?
            .rooms
            .iter_mut()
            .find(|r| r.name.eq_ignore_ascii_case(room_name))
    }

    pub(crate) fn require_room_mut(
        &mut self,
        zone_name: &str,
        room_name: &str,
    ) -> Result<&mut Room, EngineError> {
        let missing = EngineError::RoomNotFound {
            zone: zone_name.to_string(),
            room: room_name.to_string(),
        };
        self.get_room_mut(zone_name, room_name).ok_or(missing)
    }

    pub fn add_room_description(
        &mut self,
        zone_name: &str,
        room_name: &str,
        flag: &str,
        description: &str,
    ) -> Result<(), EngineError> {
        let room = self.require_room_mut(zone_name, room_name)?;
        room.descriptions.push(Description {
            flag: flag.to_string(),
            text: description.to_string(),
        });
        Ok(())
    }

    pub fn set_room_as_zone_starter(
        &mut self,
        zone_name: &str,
        room_name: &str,
    ) -> Result<(), EngineError> {
        let room = self.require_room_mut(zone_name, room_name)?;
        room.zone_start = true;
        Ok(())
    }

    pub fn get_zone_starter_room(&self, zone_name: &str) -> Option<&Room> {
        self.get_zone(zone_name)?.rooms.iter().find(|r| r.zone_start)
    }

    /// Register an on-enter action for an existing room. Multiple actions
    /// accumulate and all fire on entry.
    pub fn add_room_action(
        &mut self,
        zone_name: &str,
        room_name: &str,
        action: ActionFn,
    ) -> Result<(), EngineError> {
        self.require_room_mut(zone_name, room_name)?;
        self.actions.push_room_action(zone_name, room_name, action);
        Ok(())
    }

    /// Register a room-local command on an existing room.
    pub fn add_room_command_action(
        &mut self,
        zone_name: &str,
        room_name: &str,
        name: &str,
        description: &str,
        synonyms: &[&str],
        action: CommandFn,
    ) -> Result<(), EngineError> {
        self.require_room_mut(zone_name, room_name)?;
        self.actions.push_room_command_action(
            zone_name,
            room_name,
            CommandAction::new(name, description, synonyms, action),
        );
        Ok(())
    }

    pub fn remove_room_command_action(&mut self, zone_name: &str, room_name: &str, name: &str) {
        self.actions
            .remove_room_command_action(zone_name, room_name, name);
    }

    pub fn has_room_command_action(&self, zone_name: &str, room_name: &str, name: &str) -> bool {
        self.actions
            .room_command_actions(zone_name, room_name)
            .map(|actions| actions.iter().any(|a| a.name.eq_ignore_ascii_case(name)))
            .unwrap_or(false)
    }

    //////////
    // EXIT //
    //////////

    /// Create an exit between two existing rooms. Cardinal exits get the
    /// reverse exit added automatically unless the destination already has
    /// one in that direction.
    pub fn create_exit(
        &mut self,
        zone_name: &str,
        from_room_name: &str,
        direction: &str,
        to_room_name: &str,
        hidden: bool,
    ) -> Result<(), EngineError> {
        let zone = self.require_zone_mut(zone_name)?;
        let from_idx = zone
            .rooms
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(from_room_name))
            .ok_or_else(|| EngineError::RoomNotFound {
                zone: zone_name.to_string(),
                room: from_room_name.to_string(),
            })?;
        let to_idx = zone
            .rooms
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(to_room_name))
            .ok_or_else(|| EngineError::RoomNotFound {
                zone: zone_name.to_string(),
                room: to_room_name.to_string(),
            })?;

        zone.rooms[from_idx].exits.push(Exit {
            direction: direction.to_string(),
            location: to_room_name.to_string(),
            hidden,
        });

        if let Some(reverse) = opposite_direction(direction) {
            let to_room = &mut zone.rooms[to_idx];
            let already = to_room
                .exits
                .iter()
                .any(|e| e.direction.eq_ignore_ascii_case(reverse));
            if !already {
                to_room.exits.push(Exit {
                    direction: reverse.to_string(),
                    location: from_room_name.to_string(),
                    hidden,
                });
            }
        }
        Ok(())
    }

    pub fn remove_exit(
        &mut self,
        zone_name: &str,
        from_room_name: &str,
        direction: &str,
    ) -> Result<(), EngineError> {
        let room = self.require_room_mut(zone_name, from_room_name)?;
        room.exits
            .retain(|e| !e.direction.eq_ignore_ascii_case(direction));
        Ok(())
    }

    pub fn get_exit(
        &self,
        zone_name: &str,
        from_room_name: &str,
        direction: &str,
    ) -> Result<&Exit, EngineError> {
        let room =
            self.get_room(zone_name, from_room_name)
                .ok_or_else(|| EngineError::RoomNotFound {
                    zone: zone_name.to_string(),
                    room: from_room_name.to_string(),
                })?;
        room.exits
            .iter()
            .find(|e| e.direction.eq_ignore_ascii_case(direction))
            .ok_or_else(|| EngineError::ExitNotFound {
                room: from_room_name.to_string(),
                direction: direction.to_string(),
            })
    }

    //////////
    // ITEM //
    //////////

    pub fn create_item(&mut self, name: &str, description: &str, usable: bool, consumable: bool) {
        self.world.items.push(Item {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            usable,
            consumable,
        });
    }

    /// Create an item and bind its on-use action in one call.
    pub fn create_item_with_action(
        &mut self,
        name: &str,
        description: &str,
        usable: bool,
        consumable: bool,
        action: ActionFn,
    ) {
        self.create_item(name, description, usable, consumable);
        self.actions.set_item_action(name, action);
    }

    pub fn get_item(&self, name: &str) -> Option<&Item> {
        self.world
            .items
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(name))
    }

    pub fn remove_item(&mut self, name: &str) {
        self.world
            .items
            .retain(|i| !i.name.eq_ignore_ascii_case(name));
    }

    /// Register an on-use action for an existing item.
    pub fn add_item_action(&mut self, name: &str, action: ActionFn) -> Result<(), EngineError> {
        if self.get_item(name).is_none() {
            return Err(EngineError::EntityNotFound {
                kind: "Item",
                name: name.to_string(),
            });
        }
        self.actions.set_item_action(name, action);
        Ok(())
    }

    /// Put an item stack into a room. Both the room and the item
    /// definition must exist.
    pub fn place_item(
        &mut self,
        zone_name: &str,
        room_name: &str,
        item_name: &str,
        quantity: u32,
    ) -> Result<(), EngineError> {
        if self.get_item(item_name).is_none() {
            return Err(EngineError::EntityNotFound {
                kind: "Item",
                name: item_name.to_string(),
            });
        }
        let room = self.require_room_mut(zone_name, room_name)?;
        room.items.push(ItemDrop::new(item_name, quantity));
        Ok(())
    }

    pub fn get_room_item(
        &self,
        zone_name: &str,
        room_name: &str,
        item_name: &str,
    ) -> Option<&ItemDrop> {
        self.get_room(zone_name, room_name)?
            .items
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(item_name))
    }

    /////////
    // NPC //
    /////////

    pub fn create_npc(&mut self, name: &str, description: &str) {
        self.world.npcs.push(Actor {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            stats: Some(Stats::baseline()),
            items: Vec::new(),
            flags: Vec::new(),
            dialog: None,
            vendor_items: None,
            killable: false,
        });
    }

    pub fn get_npc(&self, name: &str) -> Option<&Actor> {
        self.world
            .npcs
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    pub fn get_npc_mut(&mut self, name: &str) -> Option<&mut Actor> {
        self.world
            .npcs
            .iter_mut()
            .find(|n| n.name.eq_ignore_ascii_case(name))
    }

    /// Remove an NPC template and every placed copy of it.
    pub fn remove_npc(&mut self, name: &str) {
        for zone in &mut self.world.zones {
            for room in &mut zone.rooms {
                room.npcs.retain(|n| !n.name.eq_ignore_ascii_case(name));
            }
        }
        self.world
            .npcs
            .retain(|n| !n.name.eq_ignore_ascii_case(name));
    }

    /// Place a copy of an NPC template into a room. The room receives an
    /// independent clone; the template stays untouched.
    pub fn place_npc(
        &mut self,
        zone_name: &str,
        room_name: &str,
        npc_name: &str,
    ) -> Result<(), EngineError> {
        let npc = self
            .get_npc(npc_name)
            .cloned()
            .ok_or_else(|| EngineError::EntityNotFound {
                kind: "NPC",
                name: npc_name.to_string(),
            })?;
        let room = self.require_room_mut(zone_name, room_name)?;
        room.npcs.push(npc);
        Ok(())
    }

    pub fn get_room_npc(
        &self,
        zone_name: &str,
        room_name: &str,
        npc_name: &str,
    ) -> Option<&Actor> {
        self.get_room(zone_name, room_name)?
            .npcs
            .iter()
            .find(|n| n.name.eq_ignore_ascii_case(npc_name))
    }

    /// Attach a dialog entry to an NPC, optionally backed by a parser
    /// action in the registry.
    pub fn create_dialog(
        &mut self,
        npc_name: &str,
        trigger: &[&str],
        response: Option<&str>,
        action: Option<CommandFn>,
    ) -> Result<(), EngineError> {
        let npc = self
            .get_npc_mut(npc_name)
            .ok_or_else(|| EngineError::EntityNotFound {
                kind: "NPC",
                name: npc_name.to_string(),
            })?;
        let trigger: Vec<String> = trigger.iter().map(|t| t.to_lowercase()).collect();
        npc.dialog.get_or_insert_with(Vec::new).push(Dialog {
            name: npc_name.to_string(),
            trigger: trigger.clone(),
            response: response.map(|r| r.to_string()),
        });
        if let Some(action) = action {
            self.actions.push_dialog_action(
                npc_name,
                crate::actions::DialogAction { trigger, action },
            );
        }
        Ok(())
    }

    /////////
    // MOB //
    /////////

    pub fn create_mob(&mut self, name: &str, description: &str, stats: Stats, items: Vec<ItemDrop>) {
        self.world.mobs.push(Actor {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            stats: Some(stats),
            items,
            flags: Vec::new(),
            dialog: None,
            vendor_items: None,
            killable: true,
        });
    }

    pub fn get_mob(&self, name: &str) -> Option<&Actor> {
        self.world
            .mobs
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Place an independent copy of a mob template into a room.
    pub fn place_mob(
        &mut self,
        zone_name: &str,
        room_name: &str,
        mob_name: &str,
    ) -> Result<(), EngineError> {
        let mob = self
            .get_mob(mob_name)
            .cloned()
            .ok_or_else(|| EngineError::EntityNotFound {
                kind: "Mob",
                name: mob_name.to_string(),
            })?;
        let room = self.require_room_mut(zone_name, room_name)?;
        room.mobs.push(mob);
        Ok(())
    }

    pub fn get_room_mob(
        &self,
        zone_name: &str,
        room_name: &str,
        mob_name: &str,
    ) -> Option<&Actor> {
        self.get_room(zone_name, room_name)?
            .mobs
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(mob_name))
    }

    ////////////
    // VENDOR //
    ////////////

    /// Create a vendor NPC with its standard `items` and `purchase`/`buy`
    /// and `sell` dialogs pre-wired.
    pub fn create_vendor(
        &mut self,
        name: &str,
        description: &str,
        vendor_items: Vec<VendorItem>,
    ) -> Result<(), EngineError> {
        self.world.npcs.push(Actor {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            stats: Some(Stats::baseline()),
            items: Vec::new(),
            flags: Vec::new(),
            dialog: Some(Vec::new()),
            vendor_items: Some(vendor_items),
            killable: false,
        });
        crate::dialog::wire_vendor_dialogs(self, name)
    }

    /////////////////
    // ROOM OBJECT //
    /////////////////

    /// Create an interactable object directly inside a room. Objects never
    /// have stats; they exist to be looked at and examined.
    pub fn create_and_place_room_object(
        &mut self,
        zone_name: &str,
        room_name: &str,
        name: &str,
        description: &str,
        dialog: Option<Vec<Dialog>>,
    ) -> Result<(), EngineError> {
        let room = self.require_room_mut(zone_name, room_name)?;
        room.objects.push(Actor {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            stats: None,
            items: Vec::new(),
            flags: Vec::new(),
            dialog,
            vendor_items: None,
            killable: false,
        });
        Ok(())
    }

    pub fn get_room_object(
        &self,
        zone_name: &str,
        room_name: &str,
        object_name: &str,
    ) -> Option<&Actor> {
        self.get_room(zone_name, room_name)?
            .objects
            .iter()
            .find(|o| o.name.eq_ignore_ascii_case(object_name))
    }

    //////////////
    // CRAFTING //
    //////////////

    pub fn create_recipe(
        &mut self,
        name: &str,
        description: &str,
        ingredients: Vec<ItemDrop>,
        crafted_item: ItemDrop,
    ) {
        self.world.recipes.push(Recipe {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            ingredients,
            crafted_item,
        });
    }

    pub fn get_recipe(&self, name: &str) -> Option<&Recipe> {
        self.world
            .recipes
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(name))
    }

    ///////////
    // QUEST //
    ///////////

    pub fn create_quest(&mut self, name: &str, description: &str) {
        self.world.quests.push(Quest {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            complete: false,
            steps: None,
        });
    }

    pub fn get_quest(&self, name: &str) -> Option<&Quest> {
        self.world
            .quests
            .iter()
            .find(|q| q.name.eq_ignore_ascii_case(name))
    }

    pub fn get_quest_mut(&mut self, name: &str) -> Option<&mut Quest> {
        self.world
            .quests
            .iter_mut()
            .find(|q| q.name.eq_ignore_ascii_case(name))
    }

    /// Add a step to an existing quest, optionally with its completion
    /// predicate.
    pub fn add_quest_step(
        &mut self,
        quest_name: &str,
        name: &str,
        description: &str,
        action: Option<DecisionFn>,
    ) -> Result<(), EngineError> {
        let quest = self
            .get_quest_mut(quest_name)
            .ok_or_else(|| EngineError::EntityNotFound {
                kind: "Quest",
                name: quest_name.to_string(),
            })?;
        quest.steps.get_or_insert_with(Vec::new).push(QuestStep {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
            complete: false,
        });
        if let Some(action) = action {
            self.actions.set_quest_step_action(name, action);
        }
        Ok(())
    }

    pub fn get_quest_step(&self, quest_name: &str, step_name: &str) -> Option<&QuestStep> {
        self.get_quest(quest_name)?
            .steps
            .as_ref()?
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(step_name))
    }

    ///////////
    // FLAGS //
    ///////////

    /// Set a flag on a player. If a flag action is registered for it, the
    /// action fires once, on the transition from unset to set.
    pub fn set_flag(&mut self, player: &mut Player, flag: &str) -> Option<String> {
        if player.flags.iter().any(|f| f == flag) {
            return None;
        }
        player.flags.push(flag.to_string());
        debug!("flag {} set on {}", flag, player.name);
        let action = self.actions.flag_action(flag)?;
        action(self, player)
    }

    pub fn has_flag(&self, player: &Player, flag: &str) -> bool {
        player.flags.iter().any(|f| f == flag)
    }

    pub fn remove_flag(&mut self, player: &mut Player, flag: &str) {
        player.flags.retain(|f| f != flag);
    }

    /// Register an action fired when the named flag is set. Re-registering
    /// replaces the previous action silently.
    pub fn add_flag_action(&mut self, flag: &str, action: ActionFn) {
        self.actions.set_flag_action(flag, action);
    }

    pub fn set_godmode(&mut self, player: &mut Player) {
        self.set_flag(player, "godmode");
    }

    pub fn remove_godmode(&mut self, player: &mut Player) {
        self.remove_flag(player, "godmode");
    }

    //////////////////
    // DESCRIPTIONS //
    //////////////////

    /// Resolve an entity's description for a player: the first variant
    /// whose flag the player carries wins, otherwise the `"default"` one.
    pub fn get_description(&self, player: &Player, descriptions: &[Description]) -> Option<String> {
        descriptions
            .iter()
            .find(|d| d.flag != "default" && player.flags.iter().any(|f| *f == d.flag))
            .or_else(|| descriptions.iter().find(|d| d.flag == "default"))
            .map(|d| d.text.clone())
    }

    ////////////////
    // NAVIGATION //
    ////////////////

    /// Locate the player's current room, preferring the player's private
    /// instance of the zone over the shared template.
    pub(crate) fn current_room_slot(&self, player: &Player) -> Option<RoomSlot> {
        let zone_name = &player.location.zone;
        let room_name = &player.location.room;
        if let Some((zi, zone)) = player
            .instance
            .iter()
            .enumerate()
            .find(|(_, z)| z.name.eq_ignore_ascii_case(zone_name))
        {
            if let Some(ri) = zone
                .rooms
                .iter()
                .position(|r| r.name.eq_ignore_ascii_case(room_name))
            {
                return Some(RoomSlot::Instance { zone: zi, room: ri });
            }
        }
        let zi = self
            .world
            .zones
            .iter()
            .position(|z| z.name.eq_ignore_ascii_case(zone_name))?;
        let ri = self.world.zones[zi]
            .rooms
            .iter()
            .position(|r| r.name.eq_ignore_ascii_case(room_name))?;
        Some(RoomSlot::World { zone: zi, room: ri })
    }

    pub fn get_players_zone<'a>(&'a self, player: &'a Player) -> Option<&'a Zone> {
        player
            .instance
            .iter()
            .find(|z| z.name.eq_ignore_ascii_case(&player.location.zone))
            .or_else(|| self.get_zone(&player.location.zone))
    }

    pub fn get_players_room<'a>(&'a self, player: &'a Player) -> Option<&'a Room> {
        self.get_players_zone(player)?
            .rooms
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(&player.location.room))
    }

    pub fn set_players_room(&mut self, player: &mut Player, zone_name: &str, room_name: &str) {
        if self.get_room(zone_name, room_name).is_some() {
            player.location = Location {
                zone: zone_name.to_string(),
                room: room_name.to_string(),
            };
        }
    }

    /// Move the player to the starter room of a zone.
    pub fn set_players_room_to_zone_start(
        &mut self,
        player: &mut Player,
        zone_name: &str,
    ) -> Result<(), EngineError> {
        let room = self
            .get_zone_starter_room(zone_name)
            .ok_or_else(|| EngineError::NoStarterRoom(zone_name.to_string()))?;
        player.location = Location {
            zone: zone_name.to_string(),
            room: room.name.clone(),
        };
        Ok(())
    }

    ////////////////
    // EXPERIENCE //
    ////////////////

    /// Grant experience and apply any level-ups the table allows.
    pub fn add_experience(&mut self, player: &mut Player, xp: f64) {
        player.stats.progress.xp += xp;
        while let Some(next) = self
            .world
            .level_data
            .iter()
            .find(|l| l.level == player.stats.progress.level + 1)
        {
            if player.stats.progress.xp >= next.xp {
                player.stats.progress.level = next.level;
                info!("{} reached level {}", player.name, next.level);
            } else {
                break;
            }
        }
    }

    /// Uniform random integer in `[0, upper]`.
    pub fn get_random_number(&self, upper: u32) -> u32 {
        rand::thread_rng().gen_range(0..=upper)
    }
}

/// The reverse of a cardinal direction, if it has one. Non-cardinal exits
/// ("portal", "trapdoor") get no automatic reverse.
pub fn opposite_direction(direction: &str) -> Option<&'static str> {
    match direction.to_lowercase().as_str() {
        "north" => Some("south"),
        "south" => Some("north"),
        "east" => Some("west"),
        "west" => Some("east"),
        _ => None,
    }
}

/// Geometric experience table: `xp(level) = start * growth^(level-1)`.
pub fn calculate_level_experience(start: f64, growth_rate: f64, num_levels: u32) -> Vec<Level> {
    (1..=num_levels)
        .map(|level| Level {
            level,
            xp: start * growth_rate.powi(level as i32 - 1),
        })
        .collect()
}

/// Capitalize the first letter of each space-separated word.
pub fn to_title_case(input: &str) -> String {
    input
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
