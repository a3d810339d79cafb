//! Achievements: named predicates swept on every resolved command.
//!
//! Each achievement pairs a world entity with a check in the action
//! registry. The sweep runs the check for every achievement the player
//! has not earned yet; earned achievements are recorded on the player so
//! a check never fires twice for the same player.

use log::info;

use crate::actions::DecisionFn;
use crate::types::{Achievement, Description, Player};
use crate::world::Engine;

impl Engine {
    /// Create an achievement and register its check in one call.
    pub fn add_achievement(&mut self, name: &str, description: &str, check: DecisionFn) {
        self.world.achievements.push(Achievement {
            id: name.to_string(),
            name: name.to_string(),
            descriptions: Description::default_text(description),
        });
        self.actions.set_achievement_check(name, check);
    }

    pub fn get_achievement(&self, name: &str) -> Option<&Achievement> {
        self.world
            .achievements
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
    }

    pub fn has_achievement(&self, player: &Player, name: &str) -> bool {
        player
            .achievements
            .iter()
            .any(|a| a.eq_ignore_ascii_case(name))
    }

    /// Run every unearned achievement's check against the player,
    /// returning one unlock line per newly earned achievement.
    pub fn sweep_achievements(&mut self, player: &mut Player) -> Vec<String> {
        let pending: Vec<String> = self
            .world
            .achievements
            .iter()
            .filter(|a| !self.has_achievement(player, &a.name))
            .map(|a| a.name.clone())
            .collect();

        let mut unlocked = Vec::new();
        for name in pending {
            let Some(check) = self.actions.achievement_check(&name) else {
                continue;
            };
            if check(self, player) {
                player.achievements.push(name.clone());
                info!("{} earned achievement {}", player.name, name);
                unlocked.push(format!("Achievement unlocked: {}!", name));
            }
        }
        unlocked
    }
}
