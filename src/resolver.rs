//! Free-text command resolution.
//!
//! Input is lowercased, truncated, tokenized, and expanded into every
//! contiguous token phrase; a command matches when any of its synonyms
//! appears among those phrases. Matching order is the table order below,
//! with `talk to` ahead of everything else so an utterance addressed to an
//! NPC ("talk to guard say take gem") never falls into `take`.
//!
//! Dispatch priority per command: the main table, then the async
//! built-ins, then commands local to the player's current room. Dead
//! players search a reduced main table but still fall through to the
//! later steps. A room can opt out of the global tables entirely with
//! the `disable_main_commands` flag on the player.

use std::sync::Arc;

use log::debug;

use crate::actions::{
    AsyncCommandAction, CommandAction, CommandFn, CommandFuture,
};
use crate::combinations::{combinations_contain, generate_combinations};
use crate::errors::EngineError;
use crate::types::{CommandResponse, Description, Player};
use crate::world::{slot_room_mut, Engine};

const ARTICLES: [&str; 3] = ["the", "a", "an"];

/// Drop the matched synonym's words and grammatical articles from the
/// token list, leaving the command's arguments.
fn filter_args(tokens: &[String], synonym: &str) -> Vec<String> {
    let synonym_words: Vec<&str> = synonym.split_whitespace().collect();
    tokens
        .iter()
        .filter(|t| {
            !synonym_words.iter().any(|w| w.eq_ignore_ascii_case(t))
                && !ARTICLES.iter().any(|a| a.eq_ignore_ascii_case(t))
        })
        .cloned()
        .collect()
}

/// First command whose synonyms intersect the phrase list, with the
/// matched synonym. Handles are cloned out so the caller holds no borrow
/// on the table while dispatching.
fn find_command(commands: &[CommandAction], combos: &[String]) -> Option<(String, CommandFn)> {
    for command in commands {
        for synonym in &command.synonyms {
            if combinations_contain(combos, synonym) {
                return Some((synonym.clone(), command.action.clone()));
            }
        }
    }
    None
}

fn find_async_command(
    commands: &[AsyncCommandAction],
    combos: &[String],
) -> Option<(String, crate::actions::AsyncCommandFn)> {
    for command in commands {
        for synonym in &command.synonyms {
            if combinations_contain(combos, synonym) {
                return Some((synonym.clone(), command.action.clone()));
            }
        }
    }
    None
}

impl Engine {
    /// Resolve one line of player input to a response.
    ///
    /// This is the engine's single entry point for play: it loads a
    /// working copy of the player, routes to an active question sequence
    /// or the command tables, sweeps achievements, decorates the response
    /// with what is visible in the room, and writes the player back.
    pub async fn parse_command(
        &mut self,
        player_id: &str,
        input: &str,
    ) -> Result<CommandResponse, EngineError> {
        let mut player = self.get_player(player_id)?;

        if self.has_active_question_sequence(&player) {
            let response = self.process_question_sequence(&mut player, input);
            self.put_player(player);
            return Ok(CommandResponse {
                response,
                exits: None,
                npcs: None,
                mobs: None,
                objects: None,
            });
        }

        let trimmed = input.trim();
        let input: String = if trimmed.is_empty() {
            "look".to_string()
        } else {
            trimmed
                .chars()
                .take(self.config.input_character_limit)
                .collect()
        };
        let input = input.to_lowercase();
        let tokens: Vec<String> = input.split_whitespace().map(|t| t.to_string()).collect();
        let combos = generate_combinations(&tokens);
        // An utterance addressed to an NPC must never leak its free-form
        // tail into other command synonyms.
        let talk = combos
            .iter()
            .any(|c| c == "talk to" || c.starts_with("talk to "));
        let combos: Vec<String> = if talk {
            combos.into_iter().filter(|c| c.contains("talk to")).collect()
        } else {
            combos
        };
        debug!("{} input: {}", player.name, input);

        let unlocked = self.sweep_achievements(&mut player);

        let mut response = self.dispatch(&mut player, &input, &tokens, &combos).await?;
        if !unlocked.is_empty() {
            response = format!("{}\n\n{}", unlocked.join("\n"), response);
        }

        let mut command_response = CommandResponse {
            response,
            exits: None,
            npcs: None,
            mobs: None,
            objects: None,
        };
        if let Some(room) = self.get_players_room(&player) {
            let exits: Vec<String> = room
                .exits
                .iter()
                .filter(|e| !e.hidden)
                .map(|e| e.direction.clone())
                .collect();
            let npcs: Vec<String> = room.npcs.iter().map(|n| n.name.clone()).collect();
            let mobs: Vec<String> = room.mobs.iter().map(|m| m.name.clone()).collect();
            let objects: Vec<String> = room.objects.iter().map(|o| o.name.clone()).collect();
            command_response.exits = (!exits.is_empty()).then_some(exits);
            command_response.npcs = (!npcs.is_empty()).then_some(npcs);
            command_response.mobs = (!mobs.is_empty()).then_some(mobs);
            command_response.objects = (!objects.is_empty()).then_some(objects);
        }

        self.put_player(player);
        Ok(command_response)
    }

    async fn dispatch(
        &mut self,
        player: &mut Player,
        input: &str,
        tokens: &[String],
        combos: &[String],
    ) -> Result<String, EngineError> {
        if !self.has_flag(player, "disable_main_commands") {
            // Dead players search a reduced table; a miss still falls
            // through to the async and room-local steps.
            let table = if player.stats.health.current <= 0 {
                &self.dead_commands
            } else {
                &self.main_commands
            };
            let main_match = find_command(table, combos);
            if let Some((synonym, action)) = main_match {
                let args = filter_args(tokens, &synonym);
                return action(self, player, input, &synonym, &args);
            }

            let async_match = find_async_command(&self.async_commands, combos);
            if let Some((synonym, action)) = async_match {
                let args = filter_args(tokens, &synonym);
                return action(self, player, input, &synonym, &args).await;
            }
        }

        let room_match = self
            .actions
            .room_command_actions(&player.location.zone, &player.location.room)
            .and_then(|actions| {
                actions.iter().find_map(|a| {
                    a.synonyms
                        .iter()
                        .find(|s| combinations_contain(combos, s))
                        .map(|s| {
                            let description = a
                                .descriptions
                                .first()
                                .map(|d| d.text.clone())
                                .unwrap_or_default();
                            (s.clone(), description, a.action.clone())
                        })
                })
            });
        if let Some((synonym, description, action)) = room_match {
            let args = filter_args(tokens, &synonym);
            let output = action(self, player, input, &synonym, &args)?;
            return Ok(format!("{}\n\n{}", description, output));
        }

        Ok("I don't understand that command.".to_string())
    }

    ////////////////
    // NAVIGATION //
    ////////////////

    /// Move the player through an exit. Hidden exits are revealed by being
    /// used.
    pub fn switch_room(&mut self, player: &mut Player, direction: &str) -> String {
        let Some(slot) = self.current_room_slot(player) else {
            return "You can't go that way.".to_string();
        };
        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        let Some(exit) = room
            .exits
            .iter_mut()
            .find(|e| e.direction.eq_ignore_ascii_case(direction))
        else {
            return "You can't go that way.".to_string();
        };
        exit.hidden = false;
        player.location.room = exit.location.clone();
        self.describe_room_with_actions(player)
    }

    /// Room description plus the output of every on-enter action.
    pub(crate) fn describe_room_with_actions(&mut self, player: &mut Player) -> String {
        let mut result = self.get_room_description(player);
        let actions = self
            .actions
            .room_actions(&player.location.zone, &player.location.room)
            .cloned()
            .unwrap_or_default();
        for action in actions {
            if let Some(output) = action(self, player) {
                result.push_str("\n\n");
                result.push_str(&output);
            }
        }
        result
    }

    pub fn get_room_description(&self, player: &Player) -> String {
        match self.get_players_room(player) {
            Some(room) => self
                .get_description(player, &room.descriptions)
                .unwrap_or_default(),
            None => "You are nowhere.".to_string(),
        }
    }

    /// Teleport by zone or room name. Godmode only; without it the command
    /// is indistinguishable from an unknown one.
    pub fn goto(&mut self, player: &mut Player, args: &[String]) -> Result<String, EngineError> {
        if !self.has_flag(player, "godmode") {
            return Ok("I don't understand that command.".to_string());
        }
        let combos = generate_combinations(args);

        let zone_match = self
            .world
            .zones
            .iter()
            .find(|z| combos.iter().any(|c| z.name.eq_ignore_ascii_case(c)))
            .map(|z| z.name.clone());
        if let Some(zone_name) = zone_match {
            self.set_players_room_to_zone_start(player, &zone_name)?;
            return Ok(self.describe_room_with_actions(player));
        }

        let zone_name = player.location.zone.clone();
        let room_match = self
            .get_zone(&zone_name)
            .and_then(|z| {
                z.rooms
                    .iter()
                    .find(|r| combos.iter().any(|c| r.name.eq_ignore_ascii_case(c)))
            })
            .map(|r| r.name.clone());
        if let Some(room_name) = room_match {
            self.set_players_room(player, &zone_name, &room_name);
            return Ok(self.describe_room_with_actions(player));
        }

        Ok("That room or zone does not exist.".to_string())
    }

    /////////////
    // LOOKING //
    /////////////

    /// `look` on its own describes the room; `look self` the player;
    /// `look at <object>` a room object.
    pub fn look(&mut self, player: &mut Player, input: &str, args: &[String]) -> String {
        if args.is_empty() {
            return self.get_room_description(player);
        }
        if args.len() == 1 && args[0].eq_ignore_ascii_case("self") {
            return self.look_self(player);
        }
        let filtered: Vec<String> = args
            .iter()
            .filter(|a| !a.eq_ignore_ascii_case("at"))
            .cloned()
            .collect();
        self.look_at_or_examine_object(player, input, &filtered)
    }

    pub fn look_self(&self, player: &Player) -> String {
        let description = self
            .get_description(player, &player.descriptions)
            .unwrap_or_else(|| "You are a nondescript adventurer.".to_string());
        if player.items.is_empty() {
            return description;
        }
        let inventory = player
            .items
            .iter()
            .map(|i| format!("{} ({})", i.name, i.quantity))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{}\n\nInventory: {}", description, inventory)
    }

    /// `inspect`: reveal the room's item stacks and mobs.
    pub fn inspect_room(&self, player: &Player) -> String {
        let Some(room) = self.get_players_room(player) else {
            return "You inspect the room and found nothing.".to_string();
        };
        let mut sections = Vec::new();
        if !room.items.is_empty() {
            let items = room
                .items
                .iter()
                .map(|i| format!("{} ({})", i.name, i.quantity))
                .collect::<Vec<_>>()
                .join(", ");
            sections.push(format!("Items: {}", items));
        }
        if !room.mobs.is_empty() {
            let mobs = room
                .mobs
                .iter()
                .map(|m| m.name.clone())
                .collect::<Vec<_>>()
                .join(", ");
            sections.push(format!("Mobs: {}", mobs));
        }
        if sections.is_empty() {
            return "You inspect the room and found nothing.".to_string();
        }
        format!("You inspect the room and found:\n\n{}", sections.join("\n\n"))
    }

    /// `map`: where the visible exits lead.
    pub fn get_map(&self, player: &Player) -> String {
        let exits: Vec<String> = self
            .get_players_room(player)
            .map(|room| {
                room.exits
                    .iter()
                    .filter(|e| !e.hidden)
                    .map(|e| format!("{}: {}", e.direction, e.location))
                    .collect()
            })
            .unwrap_or_default();
        if exits.is_empty() {
            return "You see no obvious places to go.".to_string();
        }
        format!("Nearby rooms:\n{}", exits.join("\n"))
    }

    /// Command listing for the table the player currently has access to.
    pub fn get_help(&self, player: &Player) -> String {
        let commands = if player.stats.health.current <= 0 {
            &self.dead_commands
        } else {
            &self.main_commands
        };
        let lines = commands
            .iter()
            .map(|c| {
                format!(
                    "{} - {}",
                    c.name,
                    c.descriptions.first().map(|d| d.text.as_str()).unwrap_or("")
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        format!("Commands:\n\n{}", lines)
    }
}

/// The built-in command table for living players, in match-priority order.
pub(crate) fn main_command_actions() -> Vec<CommandAction> {
    vec![
        CommandAction::new(
            "talk to",
            "Talk to an NPC: talk to <npc> <phrase>.",
            &["talk to", "tt"],
            Arc::new(|engine: &mut Engine, player: &mut Player, input: &str, command: &str, args: &[String]| {
                engine.talk_to_npc(player, input, command, args)
            }),
        ),
        CommandAction::new(
            "movement",
            "Move in a direction: north, south, east, or west.",
            &["north", "south", "east", "west"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, command: &str, _args: &[String]| {
                Ok(engine.switch_room(player, command))
            }),
        ),
        CommandAction::new(
            "take",
            "Take an item from the room: take <item> or take all.",
            &["take", "get"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                Ok(engine.take_item(player, args))
            }),
        ),
        CommandAction::new(
            "use",
            "Use an item in your inventory: use <item>.",
            &["use"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                Ok(engine.use_item(player, args))
            }),
        ),
        CommandAction::new(
            "drop",
            "Drop an item: drop <item> or drop all.",
            &["drop"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                Ok(engine.drop_item(player, args))
            }),
        ),
        CommandAction::new(
            "look",
            "Look around, at yourself, or at an object: look, look self, look at <object>.",
            &["look", "l"],
            Arc::new(|engine: &mut Engine, player: &mut Player, input: &str, _command: &str, args: &[String]| {
                Ok(engine.look(player, input, args))
            }),
        ),
        CommandAction::new(
            "ls",
            "Look at yourself and your inventory.",
            &["ls"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok(engine.look_self(player))
            }),
        ),
        CommandAction::new(
            "examine",
            "Examine an object closely: examine <object>.",
            &["examine", "x"],
            Arc::new(|engine: &mut Engine, player: &mut Player, input: &str, _command: &str, args: &[String]| {
                Ok(engine.look_at_or_examine_object(player, input, args))
            }),
        ),
        CommandAction::new(
            "inspect",
            "Inspect the room for items and mobs.",
            &["inspect", "i"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok(engine.inspect_room(player))
            }),
        ),
        CommandAction::new(
            "map",
            "Show where the exits from this room lead.",
            &["map"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok(engine.get_map(player))
            }),
        ),
        CommandAction::new(
            "show",
            "Show an item, all items, or your quests: show <item>, show all, show quests.",
            &["show"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                Ok(engine.show_item(player, args))
            }),
        ),
        CommandAction::new(
            "attack",
            "Attack a mob: attack <mob>.",
            &["attack"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                engine.attack_mob(player, args, true)
            }),
        ),
        CommandAction::new(
            "craft",
            "Craft an item from a known recipe: craft <recipe>.",
            &["craft"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                Ok(engine.craft_recipe(player, args))
            }),
        ),
        CommandAction::new(
            "goto",
            "Teleport to a zone or room.",
            &["goto"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
                engine.goto(player, args)
            }),
        ),
        CommandAction::new(
            "help",
            "List available commands.",
            &["help"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok(engine.get_help(player))
            }),
        ),
        CommandAction::new(
            "quit",
            "Leave the game.",
            &["quit"],
            Arc::new(|_engine: &mut Engine, _player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok("You quit the game.".to_string())
            }),
        ),
    ]
}

/// Commands available to a dead player.
pub(crate) fn player_dead_command_actions() -> Vec<CommandAction> {
    vec![
        CommandAction::new(
            "resurrect",
            "Rise again at the start of the zone.",
            &["resurrect", "rez"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                engine.resurrect_player(player)
            }),
        ),
        CommandAction::new(
            "help",
            "List available commands.",
            &["help"],
            Arc::new(|engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok(engine.get_help(player))
            }),
        ),
        CommandAction::new(
            "quit",
            "Leave the game.",
            &["quit"],
            Arc::new(|_engine: &mut Engine, _player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
                Ok("You quit the game.".to_string())
            }),
        ),
    ]
}

fn save_entry<'a>(
    engine: &'a mut Engine,
    player: &'a mut Player,
    _input: &'a str,
    _command: &'a str,
    args: &'a [String],
) -> CommandFuture<'a> {
    Box::pin(async move {
        let slot = args.first().cloned().unwrap_or_else(|| "default".to_string());
        engine.save_player_progress(player, &slot).await
    })
}

fn load_entry<'a>(
    engine: &'a mut Engine,
    player: &'a mut Player,
    _input: &'a str,
    _command: &'a str,
    args: &'a [String],
) -> CommandFuture<'a> {
    Box::pin(async move {
        let slot = args.first().cloned().unwrap_or_else(|| "default".to_string());
        engine.load_player_progress(player, &slot).await
    })
}

/// The async built-in command table (persistence).
pub(crate) fn async_command_actions() -> Vec<AsyncCommandAction> {
    vec![
        AsyncCommandAction {
            name: "save".to_string(),
            descriptions: Description::default_text("Save your progress: save [slot]."),
            synonyms: vec!["save".to_string()],
            action: Arc::new(save_entry),
        },
        AsyncCommandAction {
            name: "load".to_string(),
            descriptions: Description::default_text("Load saved progress: load [slot]."),
            synonyms: vec!["load".to_string()],
            action: Arc::new(load_entry),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<String> {
        input.split_whitespace().map(|t| t.to_string()).collect()
    }

    #[test]
    fn filter_args_strips_synonym_and_articles() {
        let args = filter_args(&tokens("take the sword"), "take");
        assert_eq!(args, vec!["sword".to_string()]);
    }

    #[test]
    fn filter_args_strips_multiword_synonym() {
        let args = filter_args(&tokens("talk to guard say hello"), "talk to");
        assert_eq!(
            args,
            vec!["guard".to_string(), "say".to_string(), "hello".to_string()]
        );
    }

    #[test]
    fn talk_to_outranks_take() {
        let commands = main_command_actions();
        let combos = generate_combinations(&tokens("talk to guard say take gem"));
        let (synonym, _) = find_command(&commands, &combos).unwrap();
        assert_eq!(synonym, "talk to");
    }

    #[test]
    fn unknown_input_matches_nothing() {
        let commands = main_command_actions();
        let combos = generate_combinations(&tokens("flibber the jabberwock"));
        assert!(find_command(&commands, &combos).is_none());
    }
}
