//! Inventory commands and crafting.
//!
//! Player inventories are named multisets: taking a stack merges
//! quantities, and any stack that reaches zero quantity is removed. All
//! failures here are player-facing soft strings, never errors; the player
//! just mistyped something.

use crate::combinations::{combinations_contain, generate_combinations};
use crate::types::{ItemDrop, Player};
use crate::world::{slot_room_mut, Engine};

/// Merge a stack into an item list, stacking with an existing entry.
pub(crate) fn merge_item(items: &mut Vec<ItemDrop>, drop: ItemDrop) {
    if let Some(existing) = items
        .iter_mut()
        .find(|i| i.name.eq_ignore_ascii_case(&drop.name))
    {
        existing.quantity += drop.quantity;
    } else {
        items.push(drop);
    }
}

/// Remove one of the named item, dropping the stack when it hits zero.
pub(crate) fn decrement_item(items: &mut Vec<ItemDrop>, name: &str) {
    if let Some(idx) = items.iter().position(|i| i.name.eq_ignore_ascii_case(name)) {
        items[idx].quantity -= 1;
        if items[idx].quantity == 0 {
            items.remove(idx);
        }
    }
}

impl Engine {
    pub fn has_item(&self, player: &Player, item_name: &str) -> bool {
        player
            .items
            .iter()
            .any(|i| i.name.eq_ignore_ascii_case(item_name))
    }

    pub fn has_item_in_quantity(&self, player: &Player, item_name: &str, quantity: u32) -> bool {
        player
            .items
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(item_name))
            .map(|i| i.quantity >= quantity)
            .unwrap_or(false)
    }

    pub fn remove_player_item(&self, player: &mut Player, item_name: &str) {
        decrement_item(&mut player.items, item_name);
    }

    /// Drop loot stacks into the player's current room, merging
    /// quantities with stacks already there.
    pub fn add_item_drops_to_room(&mut self, player: &mut Player, drops: Vec<ItemDrop>) {
        if let Some(slot) = self.current_room_slot(player) {
            let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
            for drop in drops {
                merge_item(&mut room.items, drop);
            }
        }
    }

    /// `take <item>` / `take all`: move matched room stacks into the
    /// player's inventory.
    pub fn take_item(&mut self, player: &mut Player, args: &[String]) -> String {
        let possible_items = generate_combinations(args);
        if combinations_contain(&possible_items, "all") {
            return self.take_all_items(player);
        }

        let Some(slot) = self.current_room_slot(player) else {
            return "That item does not exist.".to_string();
        };
        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        let Some(idx) = room.items.iter().position(|item| {
            possible_items
                .iter()
                .any(|p| item.name.eq_ignore_ascii_case(p))
        }) else {
            return "That item does not exist.".to_string();
        };

        let room_item = room.items.remove(idx);
        let name = room_item.name.clone();
        merge_item(&mut player.items, room_item);
        format!("You took the {}.", name)
    }

    pub fn take_all_items(&mut self, player: &mut Player) -> String {
        let Some(slot) = self.current_room_slot(player) else {
            return "That item does not exist.".to_string();
        };
        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        let drops: Vec<ItemDrop> = room.items.drain(..).collect();
        for drop in drops {
            merge_item(&mut player.items, drop);
        }
        "You took all items.".to_string()
    }

    /// `drop <item>` / `drop all`: move inventory stacks into the room.
    pub fn drop_item(&mut self, player: &mut Player, args: &[String]) -> String {
        let possible_items = generate_combinations(args);
        if combinations_contain(&possible_items, "all") {
            return self.drop_all_items(player);
        }

        let Some(idx) = player.items.iter().position(|item| {
            possible_items
                .iter()
                .any(|p| item.name.eq_ignore_ascii_case(p))
        }) else {
            return "That item does not exist.".to_string();
        };
        let Some(slot) = self.current_room_slot(player) else {
            return "That item does not exist.".to_string();
        };

        let player_item = player.items.remove(idx);
        let name = player_item.name.clone();
        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        merge_item(&mut room.items, player_item);
        format!("You dropped the {}.", name)
    }

    pub fn drop_all_items(&mut self, player: &mut Player) -> String {
        if player.items.is_empty() {
            return "You have no items to drop.".to_string();
        }
        let Some(slot) = self.current_room_slot(player) else {
            return "You have no items to drop.".to_string();
        };
        let drops: Vec<ItemDrop> = player.items.drain(..).collect();
        let room = slot_room_mut(&mut self.world, &mut player.instance, slot);
        for drop in drops {
            merge_item(&mut room.items, drop);
        }
        "You dropped all your items.".to_string()
    }

    /// `use <item>`: run the item's registered action if any, then consume
    /// one quantity when the item is consumable. The
    /// `prevent_item_consumption` flag suppresses consumption once (used
    /// when re-learning an already-known recipe).
    pub fn use_item(&mut self, player: &mut Player, args: &[String]) -> String {
        let possible_items = generate_combinations(args);
        let Some(player_item) = player
            .items
            .iter()
            .find(|item| {
                possible_items
                    .iter()
                    .any(|p| item.name.eq_ignore_ascii_case(p))
            })
            .cloned()
        else {
            return "That item does not exist.".to_string();
        };

        let Some(definition) = self.get_item(&player_item.name).cloned() else {
            return "That item does not exist.".to_string();
        };
        if !definition.usable {
            return "You can't use that item.".to_string();
        }

        let mut result = "You used the item but nothing happened.".to_string();
        if let Some(action) = self.actions.item_action(&definition.name) {
            if let Some(output) = action(self, player) {
                result = output;
            }
        }

        if self.has_flag(player, "prevent_item_consumption") {
            self.remove_flag(player, "prevent_item_consumption");
        } else if definition.consumable {
            decrement_item(&mut player.items, &definition.name);
        }

        result
    }

    /// `show <item|all|quests>`: describe inventory contents.
    pub fn show_item(&mut self, player: &mut Player, args: &[String]) -> String {
        let possible_items = generate_combinations(args);
        if combinations_contain(&possible_items, "all") {
            return self.show_all_items(player);
        }
        if combinations_contain(&possible_items, "quests") {
            return self.show_quests(player);
        }

        let Some(player_item) = player.items.iter().find(|item| {
            possible_items
                .iter()
                .any(|p| item.name.eq_ignore_ascii_case(p))
        }) else {
            return "That item does not exist.".to_string();
        };
        match self
            .get_item(&player_item.name)
            .map(|i| i.descriptions.clone())
            .and_then(|d| self.get_description(player, &d))
        {
            Some(description) => description,
            None => "That item does not exist.".to_string(),
        }
    }

    pub fn show_all_items(&self, player: &Player) -> String {
        if player.items.is_empty() {
            return "You have no items to show.".to_string();
        }
        let descriptions: Vec<String> = player
            .items
            .iter()
            .filter_map(|item| {
                let definition = self.get_item(&item.name)?;
                let text = self.get_description(player, &definition.descriptions)?;
                Some(format!("{} - {}", definition.name, text))
            })
            .collect();
        if descriptions.is_empty() {
            return "You have no items to show.".to_string();
        }
        descriptions.join("\n\n")
    }

    //////////////
    // CRAFTING //
    //////////////

    /// Teach the player a recipe. Re-learning a known recipe sets
    /// `prevent_item_consumption` so the recipe scroll survives the `use`
    /// that triggered the lesson.
    pub fn learn_recipe(&mut self, player: &mut Player, recipe_name: &str) -> String {
        let Some(recipe) = self.get_recipe(recipe_name).cloned() else {
            return "That recipe does not exist.".to_string();
        };
        if player.known_recipes.iter().any(|r| r == &recipe.name) {
            self.set_flag(player, "prevent_item_consumption");
            return "You already know that recipe.".to_string();
        }
        player.known_recipes.push(recipe.name.clone());
        format!("You learned the recipe for {}.", recipe.name)
    }

    /// `craft <recipe>`: consume the ingredient multiset, gain the crafted
    /// item.
    pub fn craft_recipe(&mut self, player: &mut Player, args: &[String]) -> String {
        let possible_names = generate_combinations(args);
        let Some(recipe) = possible_names
            .iter()
            .find_map(|name| self.get_recipe(name))
            .cloned()
        else {
            return "You don't know how to craft that.".to_string();
        };
        if !player
            .known_recipes
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&recipe.name))
        {
            return "You don't know how to craft that.".to_string();
        }

        let has_ingredients = recipe
            .ingredients
            .iter()
            .all(|i| self.has_item_in_quantity(player, &i.name, i.quantity));
        if !has_ingredients {
            return "You don't have the ingredients to craft that.".to_string();
        }

        for ingredient in &recipe.ingredients {
            for _ in 0..ingredient.quantity {
                decrement_item(&mut player.items, &ingredient.name);
            }
        }
        merge_item(&mut player.items, recipe.crafted_item.clone());
        format!("{} has been crafted.", recipe.crafted_item.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_stacks_same_name() {
        let mut items = vec![ItemDrop::new("Potion", 2)];
        merge_item(&mut items, ItemDrop::new("potion", 3));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 5);
    }

    #[test]
    fn decrement_removes_empty_stack() {
        let mut items = vec![ItemDrop::new("Key", 1)];
        decrement_item(&mut items, "key");
        assert!(items.is_empty());
    }
}
