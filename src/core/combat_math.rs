//! Pure combat math shared by the battle loop and special abilities.

use crate::core::constants::{DEFENSE_DIVISOR, MIN_ATTACK_DAMAGE};

/// Damage from a basic attack.
///
/// The defender's strength absorbs a quarter of its value (floor division),
/// and every hit lands for at least one point.
pub fn calculate_damage(attacker_strength: u32, defender_strength: u32) -> u32 {
    attacker_strength
        .saturating_sub(defender_strength / DEFENSE_DIVISOR)
        .max(MIN_ATTACK_DAMAGE)
}

/// Apply damage to HP, returning remaining HP (minimum 0).
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

/// Healing that actually lands, never past `max_hp`.
pub fn capped_heal(current_hp: u32, max_hp: u32, amount: u32) -> u32 {
    amount.min(max_hp.saturating_sub(current_hp))
}

pub fn is_alive(current_hp: u32) -> bool {
    current_hp > 0
}
