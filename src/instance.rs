//! Per-player instanced zones and rooms.
//!
//! An instance is a deep clone of world-template content that lives on the
//! player record. Navigation and room mutation prefer the instance over
//! the shared template, so changes a player makes inside an instance are
//! invisible to everyone else. Re-instancing replaces the previous
//! instance wholesale.

use log::debug;

use crate::errors::EngineError;
use crate::types::{Actor, Description, Dialog, ItemDrop, Player, Room, Zone};
use crate::world::Engine;

impl Engine {
    /// Clone an entire zone into the player's instance set, replacing any
    /// previous instance of that zone.
    pub fn create_zone_instance(
        &mut self,
        player: &mut Player,
        zone_name: &str,
    ) -> Result<(), EngineError> {
        let mut zone = self
            .get_zone(zone_name)
            .cloned()
            .ok_or_else(|| EngineError::ZoneNotFound(zone_name.to_string()))?;
        for room in &mut zone.rooms {
            room.instance = true;
        }
        player
            .instance
            .retain(|z| !z.name.eq_ignore_ascii_case(zone_name));
        debug!("instanced zone {} for {}", zone.name, player.name);
        player.instance.push(zone);
        Ok(())
    }

    /// Clone a single room into the player's instance of its zone,
    /// creating the instance zone shell if needed. An existing instance of
    /// the room is replaced.
    pub fn create_room_instance(
        &mut self,
        player: &mut Player,
        zone_name: &str,
        room_name: &str,
    ) -> Result<(), EngineError> {
        let mut room = self
            .get_room(zone_name, room_name)
            .cloned()
            .ok_or_else(|| EngineError::RoomNotFound {
                zone: zone_name.to_string(),
                room: room_name.to_string(),
            })?;
        room.instance = true;

        let zone_idx = match player
            .instance
            .iter()
            .position(|z| z.name.eq_ignore_ascii_case(zone_name))
        {
            Some(idx) => idx,
            None => {
                player.instance.push(Zone {
                    name: zone_name.to_string(),
                    rooms: Vec::new(),
                });
                player.instance.len() - 1
            }
        };
        let zone = &mut player.instance[zone_idx];
        zone.rooms
            .retain(|r| !r.name.eq_ignore_ascii_case(room_name));
        zone.rooms.push(room);
        Ok(())
    }

    pub fn get_instance_zone<'a>(&self, player: &'a Player, zone_name: &str) -> Option<&'a Zone> {
        player
            .instance
            .iter()
            .find(|z| z.name.eq_ignore_ascii_case(zone_name))
    }

    pub fn get_instance_room<'a>(
        &self,
        player: &'a Player,
        zone_name: &str,
        room_name: &str,
    ) -> Option<&'a Room> {
        self.get_instance_zone(player, zone_name)?
            .rooms
            .iter()
            .find(|r| r.name.eq_ignore_ascii_case(room_name))
    }

    fn require_instance_room_mut<'a>(
        player: &'a mut Player,
        zone_name: &str,
        room_name: &str,
    ) -> Result<&'a mut Room, EngineError> {
        player
            .instance
            .iter_mut()
            .find(|z| z.name.eq_ignore_ascii_case(zone_name))
            .and_then(|z| {
                z.rooms
                    .iter_mut()
                    .find(|r| r.name.eq_ignore_ascii_case(room_name))
            })
            .ok_or_else(|| EngineError::RoomNotFound {
                zone: zone_name.to_string(),
                room: room_name.to_string(),
            })
    }

    /// Put an item stack into an instanced room. The item definition must
    /// exist in the world.
    pub fn place_item_in_instance(
        &mut self,
        player: &mut Player,
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
        let room = Self::require_instance_room_mut(player, zone_name, room_name)?;
        room.items.push(ItemDrop::new(item_name, quantity));
        Ok(())
    }

    /// Place an independent copy of an NPC template into an instanced room.
    pub fn place_npc_in_instance(
        &mut self,
        player: &mut Player,
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
        let room = Self::require_instance_room_mut(player, zone_name, room_name)?;
        room.npcs.push(npc);
        Ok(())
    }

    /// Place an independent copy of a mob template into an instanced room.
    pub fn place_mob_in_instance(
        &mut self,
        player: &mut Player,
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
        let room = Self::require_instance_room_mut(player, zone_name, room_name)?;
        room.mobs.push(mob);
        Ok(())
    }

    /// Create an interactable object directly inside an instanced room.
    pub fn create_and_place_instance_object(
        &mut self,
        player: &mut Player,
        zone_name: &str,
        room_name: &str,
        name: &str,
        description: &str,
        dialog: Option<Vec<Dialog>>,
    ) -> Result<(), EngineError> {
        let room = Self::require_instance_room_mut(player, zone_name, room_name)?;
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
}
