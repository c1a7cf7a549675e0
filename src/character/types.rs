use crate::core::constants::{INVENTORY_CAPACITY, STARTING_GOLD, STARTING_LEVEL};
use crate::core::{GameError, GameResult};
use crate::items::{EquipmentSlot, Equipment};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// The four playable archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
    Cleric,
}

/// Starting stats granted by a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseStats {
    pub health: u32,
    pub strength: u32,
    pub magic: u32,
}

impl CharacterClass {
    pub fn all() -> [CharacterClass; 4] {
        [
            CharacterClass::Warrior,
            CharacterClass::Mage,
            CharacterClass::Rogue,
            CharacterClass::Cleric,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Warrior => "Warrior",
            CharacterClass::Mage => "Mage",
            CharacterClass::Rogue => "Rogue",
            CharacterClass::Cleric => "Cleric",
        }
    }

    pub fn base_stats(&self) -> BaseStats {
        match self {
            CharacterClass::Warrior => BaseStats {
                health: 120,
                strength: 15,
                magic: 5,
            },
            CharacterClass::Mage => BaseStats {
                health: 80,
                strength: 8,
                magic: 20,
            },
            CharacterClass::Rogue => BaseStats {
                health: 90,
                strength: 12,
                magic: 10,
            },
            CharacterClass::Cleric => BaseStats {
                health: 100,
                strength: 10,
                magic: 15,
            },
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CharacterClass {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CharacterClass::all()
            .into_iter()
            .find(|class| class.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::InvalidClass(s.to_string()))
    }
}

/// A character stat an item effect can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Health,
    MaxHealth,
    Strength,
    Magic,
}

impl Stat {
    pub fn name(&self) -> &'static str {
        match self {
            Stat::Health => "health",
            Stat::MaxHealth => "max_health",
            Stat::Strength => "strength",
            Stat::Magic => "magic",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Stat {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "health" => Ok(Stat::Health),
            "max_health" => Ok(Stat::MaxHealth),
            "strength" => Ok(Stat::Strength),
            "magic" => Ok(Stat::Magic),
            _ => Err(GameError::UnknownStat(s.to_string())),
        }
    }
}

/// The player character. Owned by a single session; engines borrow it
/// mutably for the duration of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub class: CharacterClass,
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub experience: u64,
    pub gold: u64,
    pub inventory: Vec<String>,
    pub equipment: Equipment,
    pub active_quests: Vec<String>,
    pub completed_quests: Vec<String>,
}

impl Character {
    /// Creates a level 1 character with the class's base stats.
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let base = class.base_stats();
        Self {
            name: name.into(),
            class,
            level: STARTING_LEVEL,
            health: base.health,
            max_health: base.health,
            strength: base.strength,
            magic: base.magic,
            experience: 0,
            gold: STARTING_GOLD,
            inventory: Vec::new(),
            equipment: Equipment::new(),
            active_quests: Vec::new(),
            completed_quests: Vec::new(),
        }
    }

    /// Creates a character from a class name such as `"warrior"`.
    pub fn create(name: impl Into<String>, class_name: &str) -> GameResult<Self> {
        let class = class_name.parse::<CharacterClass>()?;
        Ok(Self::new(name, class))
    }

    pub fn stat(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Health => self.health,
            Stat::MaxHealth => self.max_health,
            Stat::Strength => self.strength,
            Stat::Magic => self.magic,
        }
    }

    pub(crate) fn set_stat(&mut self, stat: Stat, value: u32) {
        match stat {
            Stat::Health => self.health = value,
            Stat::MaxHealth => self.max_health = value,
            Stat::Strength => self.strength = value,
            Stat::Magic => self.magic = value,
        }
    }

    pub fn equipped(&self, slot: EquipmentSlot) -> Option<&str> {
        self.equipment.get(slot).as_deref()
    }

    /// Checks the record invariants a reloaded character must satisfy.
    pub fn validate(&self) -> GameResult<()> {
        let invalid = |msg: String| Err(GameError::InvalidSaveData(msg));

        if self.name.trim().is_empty() {
            return invalid("name is empty".to_string());
        }
        if self.level == 0 {
            return invalid("level must be at least 1".to_string());
        }
        if self.health > self.max_health {
            return invalid(format!(
                "health {} exceeds max_health {}",
                self.health, self.max_health
            ));
        }
        if self.inventory.len() > INVENTORY_CAPACITY {
            return invalid(format!(
                "inventory holds {} items, capacity is {}",
                self.inventory.len(),
                INVENTORY_CAPACITY
            ));
        }

        let mut active = HashSet::new();
        for id in &self.active_quests {
            if !active.insert(id.as_str()) {
                return invalid(format!("duplicate active quest {}", id));
            }
        }
        let mut completed = HashSet::new();
        for id in &self.completed_quests {
            if !completed.insert(id.as_str()) {
                return invalid(format!("duplicate completed quest {}", id));
            }
            if active.contains(id.as_str()) {
                return invalid(format!("quest {} is both active and completed", id));
            }
        }

        Ok(())
    }
}
