use crate::character::CharacterClass;
use crate::core::{GameError, GameResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fixed enemy archetypes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Goblin,
    Orc,
    Dragon,
}

/// Base stats and rewards for one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyStats {
    pub health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u64,
    pub gold_reward: u64,
}

impl EnemyKind {
    pub fn all() -> [EnemyKind; 3] {
        [EnemyKind::Goblin, EnemyKind::Orc, EnemyKind::Dragon]
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Goblin => "Goblin",
            EnemyKind::Orc => "Orc",
            EnemyKind::Dragon => "Dragon",
        }
    }

    pub fn stats(&self) -> EnemyStats {
        match self {
            EnemyKind::Goblin => EnemyStats {
                health: 50,
                strength: 8,
                magic: 2,
                xp_reward: 25,
                gold_reward: 10,
            },
            EnemyKind::Orc => EnemyStats {
                health: 80,
                strength: 12,
                magic: 5,
                xp_reward: 50,
                gold_reward: 25,
            },
            EnemyKind::Dragon => EnemyStats {
                health: 200,
                strength: 25,
                magic: 15,
                xp_reward: 200,
                gold_reward: 100,
            },
        }
    }

    /// Archetype matched to a character level: 1-2 goblin, 3-5 orc, 6+ dragon.
    pub fn for_level(level: u32) -> EnemyKind {
        match level {
            0..=2 => EnemyKind::Goblin,
            3..=5 => EnemyKind::Orc,
            _ => EnemyKind::Dragon,
        }
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EnemyKind {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EnemyKind::all()
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| GameError::UnknownEnemy(s.to_string()))
    }
}

/// An opponent for the length of one battle. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    pub strength: u32,
    pub magic: u32,
    pub xp_reward: u64,
    pub gold_reward: u64,
}

impl Enemy {
    pub fn new(kind: EnemyKind) -> Self {
        let stats = kind.stats();
        Self {
            name: kind.name().to_string(),
            kind,
            health: stats.health,
            max_health: stats.health,
            strength: stats.strength,
            magic: stats.magic,
            xp_reward: stats.xp_reward,
            gold_reward: stats.gold_reward,
        }
    }

    /// Builds an enemy from an archetype name such as `"orc"`.
    pub fn for_archetype(name: &str) -> GameResult<Self> {
        Ok(Self::new(name.parse()?))
    }

    pub fn for_level(level: u32) -> Self {
        Self::new(EnemyKind::for_level(level))
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }
}

/// XP and gold paid out at the end of a battle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rewards {
    pub xp: u64,
    pub gold: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleState {
    Active,
    PlayerWon,
    EnemyWon,
    Escaped,
}

impl BattleState {
    pub fn is_over(&self) -> bool {
        !matches!(self, BattleState::Active)
    }
}

/// What the player does on their half of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleAction {
    Attack,
    Special,
    Escape,
}

/// Class abilities, one per class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialAbility {
    /// Warrior: twice strength.
    PowerStrike,
    /// Mage: twice magic.
    Fireball,
    /// Rogue: triple strength, lands half the time.
    CriticalStrike,
    /// Cleric: restores health to self.
    Heal,
}

impl SpecialAbility {
    pub fn for_class(class: CharacterClass) -> SpecialAbility {
        match class {
            CharacterClass::Warrior => SpecialAbility::PowerStrike,
            CharacterClass::Mage => SpecialAbility::Fireball,
            CharacterClass::Rogue => SpecialAbility::CriticalStrike,
            CharacterClass::Cleric => SpecialAbility::Heal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SpecialAbility::PowerStrike => "Power Strike",
            SpecialAbility::Fireball => "Fireball",
            SpecialAbility::CriticalStrike => "Critical Strike",
            SpecialAbility::Heal => "Heal",
        }
    }
}

/// Result of one special ability use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityOutcome {
    Damage { ability: SpecialAbility, amount: u32 },
    Missed { ability: SpecialAbility },
    Healed { amount: u32 },
}

impl fmt::Display for AbilityOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbilityOutcome::Damage { ability, amount } => {
                write!(f, "{} deals {} damage!", ability.name(), amount)
            }
            AbilityOutcome::Missed { ability } => write!(f, "{} missed!", ability.name()),
            AbilityOutcome::Healed { amount } => write!(f, "Heal restores {} health!", amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BattleEvent {
    PlayerAttack { damage: u32 },
    Ability(AbilityOutcome),
    EscapeFailed,
    Escaped,
    EnemyAttack { damage: u32 },
    EnemyDefeated { rewards: Rewards },
    PlayerDefeated,
}

impl fmt::Display for BattleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleEvent::PlayerAttack { damage } => write!(f, "You attack for {} damage!", damage),
            BattleEvent::Ability(outcome) => write!(f, "{}", outcome),
            BattleEvent::EscapeFailed => f.write_str("You failed to escape!"),
            BattleEvent::Escaped => f.write_str("You successfully escaped!"),
            BattleEvent::EnemyAttack { damage } => write!(f, "The enemy hits you for {} damage!", damage),
            BattleEvent::EnemyDefeated { rewards } => write!(
                f,
                "Victory! Gained {} XP and {} gold.",
                rewards.xp, rewards.gold
            ),
            BattleEvent::PlayerDefeated => f.write_str("You have been defeated..."),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archetype_table() {
        let goblin = Enemy::new(EnemyKind::Goblin);
        assert_eq!(goblin.name, "Goblin");
        assert_eq!((goblin.health, goblin.max_health), (50, 50));
        assert_eq!((goblin.strength, goblin.magic), (8, 2));
        assert_eq!((goblin.xp_reward, goblin.gold_reward), (25, 10));

        let dragon = Enemy::new(EnemyKind::Dragon);
        assert_eq!(dragon.health, 200);
        assert_eq!(dragon.strength, 25);
        assert_eq!(dragon.gold_reward, 100);
    }

    #[test]
    fn test_for_archetype() {
        assert_eq!(Enemy::for_archetype("orc").unwrap().kind, EnemyKind::Orc);
        assert_eq!(Enemy::for_archetype("DRAGON").unwrap().kind, EnemyKind::Dragon);
        assert!(matches!(
            Enemy::for_archetype("slime"),
            Err(GameError::UnknownEnemy(_))
        ));
    }

    #[test]
    fn test_kind_for_level() {
        assert_eq!(EnemyKind::for_level(1), EnemyKind::Goblin);
        assert_eq!(EnemyKind::for_level(2), EnemyKind::Goblin);
        assert_eq!(EnemyKind::for_level(3), EnemyKind::Orc);
        assert_eq!(EnemyKind::for_level(5), EnemyKind::Orc);
        assert_eq!(EnemyKind::for_level(6), EnemyKind::Dragon);
        assert_eq!(EnemyKind::for_level(40), EnemyKind::Dragon);
    }

    #[test]
    fn test_ability_per_class() {
        assert_eq!(
            SpecialAbility::for_class(CharacterClass::Rogue),
            SpecialAbility::CriticalStrike
        );
        assert_eq!(SpecialAbility::for_class(CharacterClass::Cleric), SpecialAbility::Heal);
    }

    #[test]
    fn test_battle_state_is_over() {
        assert!(!BattleState::Active.is_over());
        assert!(BattleState::Escaped.is_over());
        assert!(BattleState::PlayerWon.is_over());
    }
}
