//! Inventory bookkeeping and stat effects from items.

use super::types::{ItemEffect, ItemType};
use crate::character::{Character, Stat};
use crate::core::constants::INVENTORY_CAPACITY;
use crate::core::{GameError, GameResult};
use crate::data::ItemCatalog;
use log::debug;

pub fn is_full(character: &Character) -> bool {
    character.inventory.len() >= INVENTORY_CAPACITY
}

pub fn add_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    if is_full(character) {
        return Err(GameError::InventoryFull {
            capacity: INVENTORY_CAPACITY,
        });
    }
    character.inventory.push(item_id.to_string());
    Ok(())
}

/// Removes one instance of `item_id`.
pub fn remove_item(character: &mut Character, item_id: &str) -> GameResult<()> {
    if remove_one(&mut character.inventory, item_id) {
        Ok(())
    } else {
        Err(GameError::ItemNotFound(item_id.to_string()))
    }
}

pub(crate) fn remove_one(inventory: &mut Vec<String>, item_id: &str) -> bool {
    match inventory.iter().position(|id| id == item_id) {
        Some(index) => {
            inventory.remove(index);
            true
        }
        None => false,
    }
}

pub fn has_item(character: &Character, item_id: &str) -> bool {
    character.inventory.iter().any(|id| id == item_id)
}

pub fn count_item(character: &Character, item_id: &str) -> usize {
    character.inventory.iter().filter(|id| *id == item_id).count()
}

pub fn space_remaining(character: &Character) -> usize {
    INVENTORY_CAPACITY.saturating_sub(character.inventory.len())
}

/// Empties the inventory, returning what it held.
pub fn clear_inventory(character: &mut Character) -> Vec<String> {
    std::mem::take(&mut character.inventory)
}

/// Applies a signed stat change and returns the change that actually landed.
///
/// Health is clamped into `0..=max_health`. Other stats take the raw delta
/// and fail with `StatOutOfRange` rather than wrap or go negative. Lowering
/// max health pulls current health down with it.
pub fn apply_stat_effect(character: &mut Character, effect: &ItemEffect) -> GameResult<i64> {
    let current = character.stat(effect.stat);
    let out_of_range = || GameError::StatOutOfRange {
        stat: effect.stat,
        current,
        delta: effect.delta,
    };
    let target = i64::from(current)
        .checked_add(effect.delta)
        .ok_or_else(out_of_range)?;

    if effect.stat == Stat::Health {
        let target = target.clamp(0, i64::from(character.max_health));
        character.health = target as u32;
        return Ok(target - i64::from(current));
    }

    let value = u32::try_from(target).map_err(|_| out_of_range())?;
    character.set_stat(effect.stat, value);

    if effect.stat == Stat::MaxHealth && character.health > character.max_health {
        character.health = character.max_health;
    }

    Ok(effect.delta)
}

/// Consumes one unit of a consumable and applies its effect.
/// Returns a description of what happened.
pub fn use_consumable(
    character: &mut Character,
    item_id: &str,
    catalog: &ItemCatalog,
) -> GameResult<String> {
    if !has_item(character, item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = catalog
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    if item.item_type != ItemType::Consumable {
        return Err(GameError::WrongItemType {
            item_id: item_id.to_string(),
            expected: ItemType::Consumable,
            found: item.item_type,
        });
    }
    let effect = item.parse_effect()?;

    let mut staged = character.clone();
    let applied = apply_stat_effect(&mut staged, &effect)?;
    remove_one(&mut staged.inventory, item_id);
    *character = staged;

    debug!("{} consumed {} ({})", character.name, item_id, effect);

    let message = if effect.stat == Stat::Health {
        format!(
            "{} used {} and restored {} HP.",
            character.name, item.name, applied
        )
    } else {
        format!(
            "{} used {} and gained {} {}.",
            character.name, item.name, applied, effect.stat
        )
    };
    Ok(message)
}
