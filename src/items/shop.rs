//! Gold transfers and the buy/sell economy.

use super::inventory::{is_full, remove_one};
use super::types::Item;
use crate::character::Character;
use crate::core::constants::{INVENTORY_CAPACITY, SELL_PRICE_DIVISOR};
use crate::core::{GameError, GameResult};
use crate::data::ItemCatalog;
use log::debug;

/// Applies a signed gold change and returns the new total.
/// Fails without changing anything if the total would go negative.
pub fn add_gold(character: &mut Character, delta: i64) -> GameResult<u64> {
    let invalid = || GameError::InvalidTransaction {
        gold: character.gold,
        delta,
    };
    let new_total = if delta >= 0 {
        character.gold.checked_add(delta as u64).ok_or_else(invalid)?
    } else {
        character
            .gold
            .checked_sub(delta.unsigned_abs())
            .ok_or_else(invalid)?
    };
    character.gold = new_total;
    Ok(new_total)
}

/// Deducts `amount` gold, returning the new total.
pub fn spend_gold(character: &mut Character, amount: u64) -> GameResult<u64> {
    if amount > character.gold {
        return Err(GameError::InvalidTransaction {
            gold: character.gold,
            delta: -(amount.min(i64::MAX as u64) as i64),
        });
    }
    character.gold -= amount;
    Ok(character.gold)
}

pub fn sell_price(item: &Item) -> u64 {
    item.cost / SELL_PRICE_DIVISOR
}

/// Buys one `item_id`. Returns the gold left afterwards.
pub fn purchase(
    character: &mut Character,
    item_id: &str,
    catalog: &ItemCatalog,
) -> GameResult<u64> {
    let item = catalog
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;
    if character.gold < item.cost {
        return Err(GameError::InsufficientGold {
            cost: item.cost,
            gold: character.gold,
        });
    }
    if is_full(character) {
        return Err(GameError::InventoryFull {
            capacity: INVENTORY_CAPACITY,
        });
    }

    character.gold -= item.cost;
    character.inventory.push(item_id.to_string());
    debug!("{} bought {} for {}", character.name, item_id, item.cost);
    Ok(character.gold)
}

/// Sells one `item_id` for half its cost, rounded down. Returns the price.
pub fn sell(character: &mut Character, item_id: &str, catalog: &ItemCatalog) -> GameResult<u64> {
    if !character.inventory.iter().any(|id| id == item_id) {
        return Err(GameError::ItemNotFound(item_id.to_string()));
    }
    let item = catalog
        .get(item_id)
        .ok_or_else(|| GameError::ItemNotFound(item_id.to_string()))?;

    let price = sell_price(item);
    remove_one(&mut character.inventory, item_id);
    character.gold = character.gold.saturating_add(price);
    debug!("{} sold {} for {}", character.name, item_id, price);
    Ok(price)
}
