//! NPC conversation, vendors, and room-object examination.
//!
//! Dialog is trigger-based: each dialog entry carries lowercased trigger
//! phrases matched against the combinations generated from the player's
//! arguments. A matched trigger prefers its registered parser action over
//! the canned response; with neither, the NPC has nothing to say.
//!
//! Vendors are NPCs whose `items`, `purchase`/`buy`, and `sell` dialogs
//! are wired at creation time to the trading methods below.

use std::sync::Arc;

use crate::combinations::{combinations_contain, generate_combinations};
use crate::errors::EngineError;
use crate::inventory::{decrement_item, merge_item};
use crate::types::{ItemDrop, Player};
use crate::world::Engine;

/// Strip an entity's name words and the matched trigger words out of the
/// argument list, leaving whatever the trigger phrase applies to.
fn filter_dialog_args(args: &[String], entity_name: &str, trigger: &[String]) -> Vec<String> {
    let name_words: Vec<String> = entity_name
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();
    args.iter()
        .filter(|arg| {
            let lowered = arg.to_lowercase();
            !name_words.contains(&lowered) && !trigger.iter().any(|t| t == &lowered)
        })
        .cloned()
        .collect()
}

impl Engine {
    /// Resolve `talk to <npc> <trigger...>` against the NPCs in the
    /// player's current room.
    pub fn talk_to_npc(
        &mut self,
        player: &mut Player,
        input: &str,
        command: &str,
        args: &[String],
    ) -> Result<String, EngineError> {
        let possible_triggers = generate_combinations(args);
        let npc = self
            .get_players_room(player)
            .and_then(|room| {
                room.npcs.iter().find(|npc| {
                    possible_triggers
                        .iter()
                        .any(|p| npc.name.eq_ignore_ascii_case(p))
                })
            })
            .cloned();
        let Some(npc) = npc else {
            return Ok("That NPC does not exist.".to_string());
        };
        let Some(dialogs) = npc.dialog.clone() else {
            return Ok(format!("{} does not want to talk to you.", npc.name));
        };

        let matched = dialogs.iter().find(|dialog| {
            dialog
                .trigger
                .iter()
                .any(|t| combinations_contain(&possible_triggers, t))
        });
        let Some(dialog) = matched else {
            return Ok("hmm...".to_string());
        };

        let action = self.actions.dialog_actions(&npc.name).and_then(|actions| {
            actions
                .iter()
                .find(|a| {
                    a.trigger
                        .iter()
                        .any(|t| combinations_contain(&possible_triggers, t))
                })
                .map(|a| (a.trigger.clone(), a.action.clone()))
        });
        if let Some((trigger, action)) = action {
            let filtered = filter_dialog_args(args, &npc.name, &trigger);
            return action(self, player, input, command, &filtered);
        }
        if let Some(response) = &dialog.response {
            return Ok(response.clone());
        }
        Ok("hmm...".to_string())
    }

    /// Buy one of an item from a vendor's stock. Unknown items are
    /// rejected before gold is checked.
    pub fn purchase_from_vendor(
        &mut self,
        player: &mut Player,
        vendor_name: &str,
        item_name: &str,
    ) -> String {
        let Some(vendor_item) = self
            .get_npc(vendor_name)
            .and_then(|npc| npc.vendor_items.as_ref())
            .and_then(|items| {
                items
                    .iter()
                    .find(|i| i.name.eq_ignore_ascii_case(item_name))
            })
            .cloned()
        else {
            return "That item does not exist.".to_string();
        };

        if player.gold < vendor_item.price {
            return format!("You don't have enough gold to purchase {}.", vendor_item.name);
        }
        player.gold -= vendor_item.price;
        merge_item(&mut player.items, ItemDrop::new(&vendor_item.name, 1));
        format!(
            "You purchased {} for {} gold.",
            vendor_item.name, vendor_item.price
        )
    }

    /// Sell one of an item back to a vendor at its list price. Vendors
    /// only deal in items they stock.
    pub fn sell_to_vendor(
        &mut self,
        player: &mut Player,
        vendor_name: &str,
        item_name: &str,
    ) -> String {
        let Some(vendor_item) = self
            .get_npc(vendor_name)
            .and_then(|npc| npc.vendor_items.as_ref())
            .and_then(|items| {
                items
                    .iter()
                    .find(|i| i.name.eq_ignore_ascii_case(item_name))
            })
            .cloned()
        else {
            return "That item does not exist.".to_string();
        };

        if !self.has_item(player, &vendor_item.name) {
            return "You don't have that item.".to_string();
        }
        decrement_item(&mut player.items, &vendor_item.name);
        player.gold += vendor_item.price;
        format!("You sold {} for {} gold.", vendor_item.name, vendor_item.price)
    }

    /// `look at <object>` / `examine <object>` for room objects. Examine
    /// consults the object's dialog triggers for a closer look.
    pub fn look_at_or_examine_object(
        &mut self,
        player: &mut Player,
        input: &str,
        args: &[String],
    ) -> String {
        let possible_triggers = generate_combinations(args);
        let object = self
            .get_players_room(player)
            .and_then(|room| {
                room.objects.iter().find(|obj| {
                    possible_triggers
                        .iter()
                        .any(|p| obj.name.eq_ignore_ascii_case(p))
                })
            })
            .cloned();
        let Some(object) = object else {
            return "That object does not exist.".to_string();
        };

        if input.to_lowercase().contains("examine") {
            if let Some(dialogs) = &object.dialog {
                let matched = dialogs.iter().find(|dialog| {
                    dialog
                        .trigger
                        .iter()
                        .any(|t| combinations_contain(&possible_triggers, t))
                });
                return match matched.and_then(|d| d.response.clone()) {
                    Some(response) => response,
                    None => "There's nothing more to examine.".to_string(),
                };
            }
            return "There's nothing more to examine.".to_string();
        }

        self.get_description(player, &object.descriptions)
            .unwrap_or_else(|| "There's nothing more to look at.".to_string())
    }
}

/// Attach the standard trading dialogs to a freshly created vendor.
pub(crate) fn wire_vendor_dialogs(
    engine: &mut Engine,
    vendor_name: &str,
) -> Result<(), EngineError> {
    let name = vendor_name.to_string();
    engine.create_dialog(
        vendor_name,
        &["items"],
        None,
        Some(Arc::new(move |engine: &mut Engine, _player: &mut Player, _input: &str, _command: &str, _args: &[String]| {
            let listing = engine
                .get_npc(&name)
                .and_then(|npc| npc.vendor_items.as_ref())
                .map(|items| {
                    items
                        .iter()
                        .map(|i| format!("{} ({} gold)", i.name, i.price))
                        .collect::<Vec<_>>()
                        .join(", ")
                })
                .unwrap_or_default();
            if listing.is_empty() {
                Ok("I have nothing for sale.".to_string())
            } else {
                Ok(format!("Items for sale: {}", listing))
            }
        })),
    )?;

    let name = vendor_name.to_string();
    engine.create_dialog(
        vendor_name,
        &["purchase", "buy"],
        None,
        Some(Arc::new(move |engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
            let item_name = args.join(" ");
            if item_name.is_empty() {
                return Ok("You must specify an item to purchase.".to_string());
            }
            Ok(engine.purchase_from_vendor(player, &name, &item_name))
        })),
    )?;

    let name = vendor_name.to_string();
    engine.create_dialog(
        vendor_name,
        &["sell"],
        None,
        Some(Arc::new(move |engine: &mut Engine, player: &mut Player, _input: &str, _command: &str, args: &[String]| {
            let item_name = args.join(" ");
            if item_name.is_empty() {
                return Ok("You must specify an item to sell.".to_string());
            }
            Ok(engine.sell_to_vendor(player, &name, &item_name))
        })),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dialog_args_drop_name_and_trigger_words() {
        let args: Vec<String> = ["guard", "purchase", "iron", "sword"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let trigger = vec!["purchase".to_string(), "buy".to_string()];
        let filtered = filter_dialog_args(&args, "Guard", &trigger);
        assert_eq!(filtered, vec!["iron".to_string(), "sword".to_string()]);
    }
}
