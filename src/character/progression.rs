//! Experience, leveling, healing, and death/revival.

use super::types::Character;
use crate::core::combat_math::{capped_heal, is_alive};
use crate::core::constants::*;
use crate::core::{GameError, GameResult};
use log::debug;

/// XP required to advance past `level`.
pub fn xp_for_next_level(level: u32) -> u64 {
    level as u64 * XP_PER_LEVEL
}

/// Adds experience and resolves every level-up it pays for.
///
/// Each level-up deducts the current threshold, raises max health, strength
/// and magic, and fully restores health. Returns the number of levels gained.
pub fn gain_experience(character: &mut Character, amount: u64) -> GameResult<u32> {
    if is_dead(character) {
        return Err(GameError::CharacterDead(character.name.clone()));
    }

    character.experience = character.experience.saturating_add(amount);

    let mut levelups = 0;
    loop {
        let xp_needed = xp_for_next_level(character.level);
        if character.experience < xp_needed {
            break;
        }

        character.experience -= xp_needed;
        character.level += 1;
        character.max_health = character.max_health.saturating_add(LEVEL_UP_MAX_HEALTH);
        character.strength = character.strength.saturating_add(LEVEL_UP_STRENGTH);
        character.magic = character.magic.saturating_add(LEVEL_UP_MAGIC);
        character.health = character.max_health;
        levelups += 1;
    }

    if levelups > 0 {
        debug!(
            "{} gained {} level(s), now level {}",
            character.name, levelups, character.level
        );
    }

    Ok(levelups)
}

/// Restores up to `amount` health without exceeding max health.
/// Returns the amount actually healed.
pub fn heal(character: &mut Character, amount: u32) -> u32 {
    let healed = capped_heal(character.health, character.max_health, amount);
    character.health += healed;
    healed
}

pub fn is_dead(character: &Character) -> bool {
    !is_alive(character.health)
}

/// Brings a dead character back at half max health (rounded down, at least 1).
/// Returns false and leaves the character untouched if it is alive.
pub fn revive(character: &mut Character) -> bool {
    if !is_dead(character) {
        return false;
    }

    character.health = (character.max_health / 2).max(1);
    debug!("{} revived with {} health", character.name, character.health);
    true
}
