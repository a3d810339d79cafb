//! Attack resolution, health mutation, and defeat handling.
//!
//! Damage law: attacker damage is `physical_damage`, doubled when the
//! critical roll lands under `critical_chance`; damage dealt is that minus
//! the defender's `physical_defense`, floored at zero; health is floored at
//! zero. Combat is only defined between actors that carry stats; anything
//! else is a content bug and errors out rather than silently doing nothing.

use log::debug;
use rand::Rng;

use crate::combinations::generate_combinations;
use crate::errors::EngineError;
use crate::types::{Actor, Player, Stats};
use crate::world::{slot_room_mut, Engine};

/// Anything that can take part in combat: a name plus optional stats.
pub trait Combatant {
    fn combatant_name(&self) -> &str;
    fn stats(&self) -> Option<&Stats>;
    fn stats_mut(&mut self) -> Option<&mut Stats>;
}

impl Combatant for Player {
    fn combatant_name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> Option<&Stats> {
        Some(&self.stats)
    }

    fn stats_mut(&mut self) -> Option<&mut Stats> {
        Some(&mut self.stats)
    }
}

impl Combatant for Actor {
    fn combatant_name(&self) -> &str {
        &self.name
    }

    fn stats(&self) -> Option<&Stats> {
        self.stats.as_ref()
    }

    fn stats_mut(&mut self) -> Option<&mut Stats> {
        self.stats.as_mut()
    }
}

/// Current health of an actor; zero when it has no stats.
pub fn actor_health(actor: &dyn Combatant) -> i32 {
    actor.stats().map(|s| s.health.current).unwrap_or(0)
}

pub fn is_health_full(actor: &dyn Combatant) -> bool {
    actor.stats().map(|s| s.health.is_full()).unwrap_or(false)
}

/// Add health, clamped to max. Errors if the actor has no stats.
pub fn add_health(actor: &mut dyn Combatant, amount: i32) -> Result<i32, EngineError> {
    let name = actor.combatant_name().to_string();
    let stats = actor.stats_mut().ok_or(EngineError::MissingStats(name))?;
    stats.health.current = (stats.health.current + amount).clamp(0, stats.health.max);
    Ok(stats.health.current)
}

pub fn set_health_to_max(actor: &mut dyn Combatant) -> Result<(), EngineError> {
    let name = actor.combatant_name().to_string();
    let stats = actor.stats_mut().ok_or(EngineError::MissingStats(name))?;
    stats.health.current = stats.health.max;
    Ok(())
}

/// Raise an actor's maximum health. Errors for statless actors.
pub fn increase_max_health(actor: &mut dyn Combatant, amount: i32) -> Result<(), EngineError> {
    let name = actor.combatant_name().to_string();
    let stats = actor.stats_mut().ok_or(EngineError::MissingStats(name))?;
    stats.health.max += amount;
    Ok(())
}

/// Restore all resources to max. Errors for statless actors.
pub fn resurrect(actor: &mut dyn Combatant) -> Result<String, EngineError> {
    let name = actor.combatant_name().to_string();
    let stats = actor.stats_mut().ok_or(EngineError::MissingStats(name))?;
    stats.health.current = stats.health.max;
    stats.stamina.current = stats.stamina.max;
    stats.magicka.current = stats.magicka.max;
    Ok("You have been resurrected.".to_string())
}

/// One attack from `attacker` against `defender` using the supplied
/// critical roll in `[0, 1)`. Returns the narration; errors if either side
/// lacks stats.
pub fn attack_with_roll(
    attacker: &mut dyn Combatant,
    defender: &mut dyn Combatant,
    roll: f64,
) -> Result<String, EngineError> {
    let attacker_name = attacker.combatant_name().to_string();
    let defender_name = defender.combatant_name().to_string();

    let attacker_stats = attacker
        .stats()
        .ok_or_else(|| EngineError::MissingStats(attacker_name.clone()))?;
    let critical = roll < attacker_stats.critical_chance;
    let attacker_damage = if critical {
        attacker_stats.physical_damage * 2
    } else {
        attacker_stats.physical_damage
    };

    let defender_stats = defender
        .stats_mut()
        .ok_or_else(|| EngineError::MissingStats(defender_name.clone()))?;
    let damage_dealt = (attacker_damage - defender_stats.physical_defense).max(0);
    defender_stats.health.current = (defender_stats.health.current - damage_dealt).max(0);
    let defender_health = defender_stats.health.current;

    debug!(
        "{} hit {} for {} (critical: {})",
        attacker_name, defender_name, damage_dealt, critical
    );

    let mut result = format!(
        "{} attacks {} for {} damage.\n{} health: {}",
        attacker_name, defender_name, damage_dealt, defender_name, defender_health
    );
    if defender_health <= 0 {
        result.push_str(&format!("\n{} has been defeated!", defender_name));
    }
    Ok(result)
}

/// One attack with a fresh random critical roll.
pub fn attack(
    attacker: &mut dyn Combatant,
    defender: &mut dyn Combatant,
) -> Result<String, EngineError> {
    let roll = rand::thread_rng().gen::<f64>();
    attack_with_roll(attacker, defender, roll)
}

impl Engine {
    /// Resolve `attack <mob>`: the player strikes, the mob strikes back if
    /// asked and still standing, and a defeated mob drops its loot into
    /// the room and is removed.
    pub fn attack_mob(
        &mut self,
        player: &mut Player,
        args: &[String],
        should_mob_attack: bool,
    ) -> Result<String, EngineError> {
        let possible_mobs = generate_combinations(args);
        let Some(slot) = self.current_room_slot(player) else {
            return Ok("That mob does not exist.".to_string());
        };

        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        let Some(mob_idx) = room.mobs.iter().position(|mob| {
            possible_mobs
                .iter()
                .any(|p| mob.name.eq_ignore_ascii_case(p))
        }) else {
            return Ok("That mob does not exist.".to_string());
        };

        // Take the mob out of the room so player and mob borrows stay
        // independent; put it back unless it dies.
        let mut mob = room.mobs.swap_remove(mob_idx);

        let mut result = attack(player, &mut mob)?;
        if should_mob_attack && actor_health(&mob) > 0 && actor_health(player) > 0 {
            result.push('\n');
            result.push_str(&attack(&mut mob, player)?);
        }

        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        if actor_health(&mob) <= 0 {
            if !mob.items.is_empty() {
                result.push_str(&format!(
                    "\n{} dropped: {}",
                    mob.name,
                    mob.items
                        .iter()
                        .map(|i| i.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
            }
            for drop in mob.items.drain(..) {
                if let Some(existing) = room
                    .items
                    .iter_mut()
                    .find(|i| i.name.eq_ignore_ascii_case(&drop.name))
                {
                    existing.quantity += drop.quantity;
                } else {
                    room.items.push(drop);
                }
            }
        } else {
            room.mobs.push(mob);
        }

        Ok(result)
    }

    /// The dead-player `resurrect` command: restore resources and return
    /// the player to their zone's starter room when it has one.
    pub fn resurrect_player(&mut self, player: &mut Player) -> Result<String, EngineError> {
        let message = resurrect(player)?;
        let zone = player.location.zone.clone();
        if self.get_zone_starter_room(&zone).is_some() {
            self.set_players_room_to_zone_start(player, &zone)?;
        }
        Ok(message)
    }
}
