use crate::character::Stat;
use crate::core::constants::MAX_EFFECT_DELTA;
use crate::core::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Weapon,
    Armor,
    Consumable,
}

impl ItemType {
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::Weapon => "weapon",
            ItemType::Armor => "armor",
            ItemType::Consumable => "consumable",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ItemType {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weapon" => Ok(ItemType::Weapon),
            "armor" => Ok(ItemType::Armor),
            "consumable" => Ok(ItemType::Consumable),
            other => Err(GameError::InvalidDataFormat(format!(
                "invalid item type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentSlot {
    Weapon,
    Armor,
}

impl EquipmentSlot {
    pub fn all() -> [EquipmentSlot; 2] {
        [EquipmentSlot::Weapon, EquipmentSlot::Armor]
    }

    /// The only item type this slot accepts.
    pub fn accepts(&self) -> ItemType {
        match self {
            EquipmentSlot::Weapon => ItemType::Weapon,
            EquipmentSlot::Armor => ItemType::Armor,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentSlot::Weapon => "weapon",
            EquipmentSlot::Armor => "armor",
        }
    }
}

/// A parsed `stat:delta` effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemEffect {
    pub stat: Stat,
    pub delta: i64,
}

impl ItemEffect {
    /// Parses strings such as `strength:5` or `health: -10`. The delta must
    /// lie within `-MAX_EFFECT_DELTA..=MAX_EFFECT_DELTA`.
    pub fn parse(effect: &str) -> GameResult<Self> {
        let (stat, value) = effect
            .split_once(':')
            .ok_or_else(|| GameError::MalformedEffect(effect.to_string()))?;
        let delta = value
            .trim()
            .parse::<i64>()
            .map_err(|_| GameError::MalformedEffect(effect.to_string()))?;
        if !(-MAX_EFFECT_DELTA..=MAX_EFFECT_DELTA).contains(&delta) {
            return Err(GameError::MalformedEffect(effect.to_string()));
        }
        let stat = stat.parse::<Stat>()?;
        Ok(Self { stat, delta })
    }

    /// The opposite change, or `None` when the delta has no negation.
    pub fn reversed(&self) -> Option<Self> {
        Some(Self {
            stat: self.stat,
            delta: self.delta.checked_neg()?,
        })
    }

    /// Whether equipping and then unequipping this effect restores the
    /// character exactly. Health is clamped and a lower max health drags
    /// health down with it, so neither can be undone.
    pub fn is_equippable(&self) -> bool {
        match self.stat {
            Stat::Health => false,
            Stat::MaxHealth => self.delta >= 0,
            _ => true,
        }
    }
}

impl fmt::Display for ItemEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.stat, self.delta)
    }
}

/// A catalog item. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub item_type: ItemType,
    /// Raw `stat:delta` string, parsed on use.
    pub effect: String,
    pub cost: u64,
    pub description: String,
}

impl Item {
    pub fn parse_effect(&self) -> GameResult<ItemEffect> {
        ItemEffect::parse(&self.effect)
    }
}
