//! Quest lifecycle: pickup, drop, step evaluation, and completion.
//!
//! A quest is complete iff every step is complete; incomplete steps
//! consult their registered predicate when one exists. The end-of-quest
//! action fires exactly once, on the transition into fully-complete, and
//! the quest moves from `player.quests` to `player.quests_completed` at
//! that same moment. Re-checking a completed quest is a no-op.

use log::info;

use crate::errors::EngineError;
use crate::types::Player;
use crate::world::Engine;

impl Engine {
    /// Register a quest start action. The quest must exist; a second start
    /// action is a content-authoring error.
    pub fn add_quest_start_action(
        &mut self,
        quest_name: &str,
        action: crate::actions::ActionFn,
    ) -> Result<(), EngineError> {
        if self.get_quest(quest_name).is_none() {
            return Err(EngineError::EntityNotFound {
                kind: "Quest",
                name: quest_name.to_string(),
            });
        }
        self.actions.set_quest_start(quest_name, action)
    }

    /// Register a quest end action, same contract as the start action.
    pub fn add_quest_end_action(
        &mut self,
        quest_name: &str,
        action: crate::actions::ActionFn,
    ) -> Result<(), EngineError> {
        if self.get_quest(quest_name).is_none() {
            return Err(EngineError::EntityNotFound {
                kind: "Quest",
                name: quest_name.to_string(),
            });
        }
        self.actions.set_quest_end(quest_name, action)
    }

    /// Add a quest to the player's active list, firing its start action.
    pub fn pickup_quest(&mut self, player: &mut Player, quest_name: &str) -> String {
        if player.quests.len() >= self.config.active_quest_limit {
            return format!(
                "You can't have more than {} active quests at a time.",
                self.config.active_quest_limit
            );
        }
        let Some(quest) = self.get_quest(quest_name).cloned() else {
            return "The quest does not exist.".to_string();
        };
        if player.quests.iter().any(|q| q == &quest.name) {
            return format!("You already have the quest {}.", quest.name);
        }

        player.quests.push(quest.name.clone());
        let mut result = format!("You picked up the quest {}.", quest.name);
        let start = self
            .actions
            .quest_action(&quest.name)
            .and_then(|qa| qa.start.clone());
        if let Some(start) = start {
            if let Some(output) = start(self, player) {
                result.push_str("\n\n");
                result.push_str(&output);
            }
        }
        result
    }

    /// Remove a quest from the player's active list, firing its end action.
    pub fn drop_quest(&mut self, player: &mut Player, quest_name: &str) -> String {
        let Some(quest) = self.get_quest(quest_name).cloned() else {
            return format!("The quest {} does not exist.", quest_name);
        };
        if !player.quests.iter().any(|q| q == &quest.name) {
            return format!("You don't have the quest {}.", quest.name);
        }

        player.quests.retain(|q| q != &quest.name);
        let mut result = format!("You dropped the quest {}.", quest.name);
        let end = self
            .actions
            .quest_action(&quest.name)
            .and_then(|qa| qa.end.clone());
        if let Some(end) = end {
            if let Some(output) = end(self, player) {
                result.push_str("\n\n");
                result.push_str(&output);
            }
        }
        result
    }

    /// Evaluate quest completeness for a player holding it.
    ///
    /// Steps not yet complete consult their registered predicate; a step
    /// with no predicate stays incomplete until marked directly. On the
    /// transition to fully-complete the end action fires and the quest
    /// moves to `quests_completed`. A quest with no steps cannot be
    /// evaluated and errors, since that is a content bug.
    pub fn is_quest_complete(
        &mut self,
        player: &mut Player,
        quest_name: &str,
    ) -> Result<bool, EngineError> {
        let Some(quest) = self.get_quest(quest_name).cloned() else {
            return Ok(false);
        };
        if !player.quests.iter().any(|q| q == &quest.name) {
            return Ok(false);
        }
        let steps = match &quest.steps {
            Some(steps) if !steps.is_empty() => steps.clone(),
            _ => return Err(EngineError::QuestHasNoSteps(quest.name.clone())),
        };

        let mut all_complete = true;
        for step in &steps {
            let step_done = if step.complete {
                true
            } else if let Some(check) = self.actions.quest_step_action(&step.name) {
                let done = check(self, player);
                if done {
                    self.mark_quest_step_complete(&quest.name, &step.name);
                }
                done
            } else {
                false
            };
            if !step_done {
                all_complete = false;
            }
        }

        if all_complete {
            let end = self
                .actions
                .quest_action(&quest.name)
                .and_then(|qa| qa.end.clone());
            if let Some(end) = end {
                end(self, player);
            }
            if !player.quests_completed.iter().any(|q| q == &quest.name) {
                player.quests.retain(|q| q != &quest.name);
                player.quests_completed.push(quest.name.clone());
                if let Some(stored) = self.get_quest_mut(&quest.name) {
                    stored.complete = true;
                }
                info!("{} completed quest {}", player.name, quest.name);
            }
        }
        Ok(all_complete)
    }

    pub(crate) fn mark_quest_step_complete(&mut self, quest_name: &str, step_name: &str) {
        if let Some(quest) = self.get_quest_mut(quest_name) {
            if let Some(steps) = quest.steps.as_mut() {
                if let Some(step) = steps
                    .iter_mut()
                    .find(|s| s.name.eq_ignore_ascii_case(step_name))
                {
                    step.complete = true;
                }
            }
        }
    }

    /// Render a quest's step checklist for the player, evaluating step
    /// predicates along the way.
    pub fn get_quest_progress(&mut self, player: &mut Player, quest_name: &str) -> String {
        let Some(quest) = self.get_quest(quest_name).cloned() else {
            return format!("The quest {} does not exist.", quest_name);
        };
        if !player.quests.iter().any(|q| q == &quest.name) {
            return format!("You don't have the quest {}.", quest_name);
        }

        let description = self
            .get_description(player, &quest.descriptions)
            .unwrap_or_default();
        let mut result = format!("Quest: {}\n\n{}\n\n", quest.name, description);
        if let Some(steps) = &quest.steps {
            for step in steps {
                let mut complete = step.complete;
                if !complete {
                    if let Some(check) = self.actions.quest_step_action(&step.name) {
                        complete = check(self, player);
                        if complete {
                            self.mark_quest_step_complete(&quest.name, &step.name);
                        }
                    }
                }
                result.push_str(&format!(
                    "{} {}\n",
                    if complete { "[x]" } else { "[ ]" },
                    step.name
                ));
            }
        }
        result
    }

    /// List the player's active quests with their descriptions.
    pub fn show_quests(&self, player: &Player) -> String {
        if player.quests.is_empty() {
            return "You have no quests.".to_string();
        }
        player
            .quests
            .iter()
            .filter_map(|name| {
                let quest = self.get_quest(name)?;
                let text = self.get_description(player, &quest.descriptions)?;
                Some(format!("{} - {}", quest.name, text))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
