use super::inventory::{apply_stat_effect, has_item, is_full, remove_one};
use super::types::{EquipmentSlot, Item, ItemEffect};
use crate::character::Character;
use crate::core::constants::INVENTORY_CAPACITY;
use crate::core::{GameError, GameResult};
use crate::data::ItemCatalog;
use log::debug;
use serde::{Deserialize, Serialize};

/// Item ids occupying each equipment slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<String>,
    pub armor: Option<String>,
}

impl Equipment {
    pub fn new() -> Self {
        Self {
            weapon: None,
            armor: None,
        }
    }

    pub fn get(&self, slot: EquipmentSlot) -> &Option<String> {
        match slot {
            EquipmentSlot::Weapon => &self.weapon,
            EquipmentSlot::Armor => &self.armor,
        }
    }

    pub fn set(&mut self, slot: EquipmentSlot, item_id: Option<String>) {
        match slot {
            EquipmentSlot::Weapon => self.weapon = item_id,
            EquipmentSlot::Armor => self.armor = item_id,
        }
    }

    pub fn iter_equipped(&self) -> impl Iterator<Item = &str> {
        [&self.weapon, &self.armor]
            .into_iter()
            .filter_map(|item| item.as_deref())
    }
}

impl Default for Equipment {
    fn default() -> Self {
        Self::new()
    }
}

fn equippable_effect(item: &Item) -> GameResult<ItemEffect> {
    let effect = item.parse_effect()?;
    if !effect.is_equippable() {
        return Err(GameError::UnsupportedEquipmentEffect {
            item_id: item.id.clone(),
            effect: effect.to_string(),
        });
    }
    Ok(effect)
}

fn reverse(character: &Character, effect: &ItemEffect) -> GameResult<ItemEffect> {
    effect.reversed().ok_or_else(|| GameError::StatOutOfRange {
        stat: effect.stat,
        current: character.stat(effect.stat),
        delta: effect.delta,
    })
}

/// Result of a successful equip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EquipOutcome {
    pub equipped: String,
    /// The item that was in the slot before and went back to the inventory.
    pub replaced: Option<String>,
}

/// Moves `item_id` from the inventory into `slot` and applies its effect.
///
/// An item already in the slot has its effect reversed and returns to the
/// inventory; this swap never fails on capacity since the inventory size is
/// unchanged overall.
pub fn equip(
    character: &mut Character,
    item_id: &str,
    catalog: &ItemCatalog,
    slot: EquipmentSlot,
) -> GameResult<EquipOutcome> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = catalog
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    if item.item_type != slot.accepts() {
        return Err(GameError::WrongItemType {
            item_id: item_id.to_string(),
            expected: slot.accepts(),
            found: item.item_type,
        });
    }
    let effect = equippable_effect(item)?;

    // Staged on a copy so a failing stat change leaves the character untouched.
    let mut staged = character.clone();
    let replaced = staged.equipment.get(slot).clone();
    if let Some(old_id) = &replaced {
        let old = catalog
            .get(old_id)
            .ok_or_else(|| GameError::ItemNotFound(old_id.clone()))?;
        let reversed = reverse(&staged, &old.parse_effect()?)?;
        apply_stat_effect(&mut staged, &reversed)?;
        staged.inventory.push(old_id.clone());
    }
    apply_stat_effect(&mut staged, &effect)?;
    remove_one(&mut staged.inventory, item_id);
    staged.equipment.set(slot, Some(item_id.to_string()));
    *character = staged;

    debug!(
        "{} equipped {} in {} slot (replaced {:?})",
        character.name,
        item_id,
        slot.name(),
        replaced
    );

    Ok(EquipOutcome {
        equipped: item_id.to_string(),
        replaced,
    })
}

/// Empties `slot`, reversing the item's effect and returning it to the
/// inventory. Returns `Ok(None)` when the slot was already empty.
pub fn unequip(
    character: &mut Character,
    slot: EquipmentSlot,
    catalog: &ItemCatalog,
) -> GameResult<Option<String>> {
    let Some(item_id) = character.equipment.get(slot).clone() else {
        return Ok(None);
    };
    if is_full(character) {
        return Err(GameError::InventoryFull {
            capacity: INVENTORY_CAPACITY,
        });
    }
    let item = catalog
        .get(&item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.clone()))?;
    let reversed = reverse(character, &item.parse_effect()?)?;

    let mut staged = character.clone();
    apply_stat_effect(&mut staged, &reversed)?;
    staged.inventory.push(item_id.clone());
    staged.equipment.set(slot, None);
    *character = staged;

    debug!("{} unequipped {}", character.name, item_id);
    Ok(Some(item_id))
}
