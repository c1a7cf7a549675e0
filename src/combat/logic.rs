//! Turn-based battle resolution.
//!
//! A round is the player's action followed, if the enemy still stands, by
//! the enemy's basic attack. Chance rolls draw from a caller-supplied RNG.

use super::types::*;
use crate::character::{heal, is_dead, Character};
use crate::core::combat_math::{apply_damage, calculate_damage};
use crate::core::constants::*;
use crate::core::{GameError, GameResult};
use log::debug;
use rand::Rng;

/// Anything that can trade basic attacks.
pub trait Combatant {
    fn display_name(&self) -> &str;
    fn attack_strength(&self) -> u32;
    fn current_health(&self) -> u32;
    fn take_damage(&mut self, amount: u32);
}

impl Combatant for Character {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn attack_strength(&self) -> u32 {
        self.strength
    }

    fn current_health(&self) -> u32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) {
        self.health = apply_damage(self.health, amount);
    }
}

impl Combatant for Enemy {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn attack_strength(&self) -> u32 {
        self.strength
    }

    fn current_health(&self) -> u32 {
        self.health
    }

    fn take_damage(&mut self, amount: u32) {
        self.health = apply_damage(self.health, amount);
    }
}

/// Basic attack. Returns the damage dealt.
pub fn apply_basic_attack<A, D>(attacker: &A, defender: &mut D) -> u32
where
    A: Combatant + ?Sized,
    D: Combatant + ?Sized,
{
    let damage = calculate_damage(attacker.attack_strength(), defender.attack_strength());
    defender.take_damage(damage);
    damage
}

/// Uses the character's class ability against `enemy`.
pub fn use_special_ability(
    character: &mut Character,
    enemy: &mut Enemy,
    rng: &mut impl Rng,
) -> AbilityOutcome {
    let ability = SpecialAbility::for_class(character.class);
    match ability {
        SpecialAbility::PowerStrike => {
            let amount = character.strength.saturating_mul(POWER_STRIKE_MULTIPLIER);
            enemy.take_damage(amount);
            AbilityOutcome::Damage { ability, amount }
        }
        SpecialAbility::Fireball => {
            let amount = character.magic.saturating_mul(FIREBALL_MULTIPLIER);
            enemy.take_damage(amount);
            AbilityOutcome::Damage { ability, amount }
        }
        SpecialAbility::CriticalStrike => {
            if rng.gen_bool(CRITICAL_STRIKE_CHANCE) {
                let amount = character.strength.saturating_mul(CRITICAL_STRIKE_MULTIPLIER);
                enemy.take_damage(amount);
                AbilityOutcome::Damage { ability, amount }
            } else {
                AbilityOutcome::Missed { ability }
            }
        }
        SpecialAbility::Heal => AbilityOutcome::Healed {
            amount: heal(character, CLERIC_HEAL_AMOUNT),
        },
    }
}

pub fn attempt_escape(rng: &mut impl Rng) -> bool {
    rng.gen_bool(ESCAPE_CHANCE)
}

pub fn can_fight(character: &Character) -> bool {
    !is_dead(character)
}

pub fn victory_rewards(enemy: &Enemy) -> Rewards {
    Rewards {
        xp: enemy.xp_reward,
        gold: enemy.gold_reward,
    }
}

/// Supplies the player's action for each round.
pub trait BattleController {
    fn choose_action(&mut self, character: &Character, enemy: &Enemy, turn: u32) -> BattleAction;
}

impl<F> BattleController for F
where
    F: FnMut(&Character, &Enemy, u32) -> BattleAction,
{
    fn choose_action(&mut self, character: &Character, enemy: &Enemy, turn: u32) -> BattleAction {
        self(character, enemy, turn)
    }
}

/// How a finished battle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BattleOutcome {
    pub state: BattleState,
    pub rewards: Rewards,
    pub turns: u32,
    pub events: Vec<BattleEvent>,
}

/// One battle between a character and an enemy.
///
/// The battle owns the enemy. The character is lent to each round so the
/// caller keeps ownership between rounds.
#[derive(Debug, Clone)]
pub struct Battle {
    pub enemy: Enemy,
    pub state: BattleState,
    pub turn: u32,
    pub events: Vec<BattleEvent>,
}

impl Battle {
    pub fn start(character: &Character, enemy: Enemy) -> GameResult<Self> {
        if !can_fight(character) {
            return Err(GameError::CharacterDead(character.name.clone()));
        }
        debug!("{} engages a {}", character.name, enemy.name);
        Ok(Self {
            enemy,
            state: BattleState::Active,
            turn: 1,
            events: Vec::new(),
        })
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    /// Rewards owed for the current state. Zero unless the player won.
    pub fn rewards(&self) -> Rewards {
        match self.state {
            BattleState::PlayerWon => victory_rewards(&self.enemy),
            _ => Rewards::default(),
        }
    }

    /// Plays one full round and returns the state it leaves the battle in.
    pub fn play_round(
        &mut self,
        character: &mut Character,
        action: BattleAction,
        rng: &mut impl Rng,
    ) -> GameResult<BattleState> {
        if self.is_over() {
            return Err(GameError::CombatNotActive);
        }

        match action {
            BattleAction::Attack => {
                let damage = apply_basic_attack(&*character, &mut self.enemy);
                self.events.push(BattleEvent::PlayerAttack { damage });
            }
            BattleAction::Special => {
                let outcome = use_special_ability(character, &mut self.enemy, rng);
                self.events.push(BattleEvent::Ability(outcome));
            }
            BattleAction::Escape => {
                if attempt_escape(rng) {
                    self.events.push(BattleEvent::Escaped);
                    return Ok(self.finish(character, BattleState::Escaped));
                }
                // A failed escape still gives the enemy its attack.
                self.events.push(BattleEvent::EscapeFailed);
            }
        }

        if !self.enemy.is_alive() {
            let rewards = victory_rewards(&self.enemy);
            self.events.push(BattleEvent::EnemyDefeated { rewards });
            return Ok(self.finish(character, BattleState::PlayerWon));
        }

        let damage = apply_basic_attack(&self.enemy, character);
        self.events.push(BattleEvent::EnemyAttack { damage });

        if is_dead(character) {
            self.events.push(BattleEvent::PlayerDefeated);
            return Ok(self.finish(character, BattleState::EnemyWon));
        }

        self.turn += 1;
        Ok(self.state)
    }

    /// Plays rounds until the battle ends. The controller decides each
    /// action, so a controller that never makes progress never ends.
    pub fn run(
        mut self,
        character: &mut Character,
        controller: &mut impl BattleController,
        rng: &mut impl Rng,
    ) -> GameResult<BattleOutcome> {
        while !self.is_over() {
            let action = controller.choose_action(character, &self.enemy, self.turn);
            self.play_round(character, action, rng)?;
        }

        Ok(BattleOutcome {
            state: self.state,
            rewards: self.rewards(),
            turns: self.turn,
            events: self.events,
        })
    }

    fn finish(&mut self, character: &Character, state: BattleState) -> BattleState {
        self.state = state;
        debug!(
            "battle between {} and {} ended after {} turn(s): {:?}",
            character.name, self.enemy.name, self.turn, state
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::CharacterClass;
    use rand::rngs::mock::StepRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn lucky() -> StepRng {
        StepRng::new(0, 0)
    }

    fn unlucky() -> StepRng {
        StepRng::new(u64::MAX, 0)
    }

    #[test]
    fn test_basic_attack_damage() {
        let hero = Character::new("Hero", CharacterClass::Warrior);
        let mut goblin = Enemy::new(EnemyKind::Goblin);
        assert_eq!(apply_basic_attack(&hero, &mut goblin), 13);
        assert_eq!(goblin.health, 37);
    }

    #[test]
    fn test_basic_attack_floors_health_at_zero() {
        let dragon = Enemy::new(EnemyKind::Dragon);
        let mut mage = Character::new("Mage", CharacterClass::Mage);
        mage.health = 5;
        assert_eq!(apply_basic_attack(&dragon, &mut mage), 23);
        assert_eq!(mage.health, 0);
    }

    #[test]
    fn test_power_strike() {
        let mut hero = Character::new("Hero", CharacterClass::Warrior);
        let mut orc = Enemy::new(EnemyKind::Orc);
        let outcome = use_special_ability(&mut hero, &mut orc, &mut unlucky());
        assert_eq!(
            outcome,
            AbilityOutcome::Damage {
                ability: SpecialAbility::PowerStrike,
                amount: 30
            }
        );
        assert_eq!(orc.health, 50);
    }

    #[test]
    fn test_fireball_uses_magic() {
        let mut mage = Character::new("Mage", CharacterClass::Mage);
        let mut goblin = Enemy::new(EnemyKind::Goblin);
        use_special_ability(&mut mage, &mut goblin, &mut unlucky());
        assert_eq!(goblin.health, 10);
    }

    #[test]
    fn test_critical_strike_hit_and_miss() {
        let mut rogue = Character::new("Rogue", CharacterClass::Rogue);
        let mut dragon = Enemy::new(EnemyKind::Dragon);

        let hit = use_special_ability(&mut rogue, &mut dragon, &mut lucky());
        assert!(matches!(hit, AbilityOutcome::Damage { amount: 36, .. }));
        assert_eq!(dragon.health, 164);

        let miss = use_special_ability(&mut rogue, &mut dragon, &mut unlucky());
        assert!(matches!(miss, AbilityOutcome::Missed { .. }));
        assert_eq!(dragon.health, 164);
    }

    #[test]
    fn test_cleric_heal_is_capped() {
        let mut cleric = Character::new("Cleric", CharacterClass::Cleric);
        let mut goblin = Enemy::new(EnemyKind::Goblin);
        cleric.health = 90;
        let outcome = use_special_ability(&mut cleric, &mut goblin, &mut lucky());
        assert_eq!(outcome, AbilityOutcome::Healed { amount: 10 });
        assert_eq!(cleric.health, 100);
        assert_eq!(goblin.health, 50);
    }

    #[test]
    fn test_start_while_dead() {
        let mut hero = Character::new("Hero", CharacterClass::Warrior);
        hero.health = 0;
        assert!(matches!(
            Battle::start(&hero, Enemy::new(EnemyKind::Goblin)),
            Err(GameError::CharacterDead(_))
        ));
    }

    #[test]
    fn test_warrior_beats_goblin_with_attacks() {
        let mut hero = Character::new("Hero", CharacterClass::Warrior);
        let battle = Battle::start(&hero, Enemy::new(EnemyKind::Goblin)).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut controller = |_: &Character, _: &Enemy, _: u32| BattleAction::Attack;

        let outcome = battle.run(&mut hero, &mut controller, &mut rng).unwrap();

        assert_eq!(outcome.state, BattleState::PlayerWon);
        assert_eq!(outcome.rewards, Rewards { xp: 25, gold: 10 });
        assert_eq!(outcome.turns, 4);
        assert_eq!(hero.health, 105);
        assert_eq!(outcome.events.len(), 8);
        assert!(matches!(
            outcome.events.last(),
            Some(BattleEvent::EnemyDefeated { .. })
        ));
    }

    #[test]
    fn test_enemy_wins_with_no_rewards() {
        let mut mage = Character::new("Mage", CharacterClass::Mage);
        let battle = Battle::start(&mage, Enemy::new(EnemyKind::Dragon)).unwrap();
        let mut controller = |_: &Character, _: &Enemy, _: u32| BattleAction::Attack;

        let outcome = battle.run(&mut mage, &mut controller, &mut unlucky()).unwrap();

        assert_eq!(outcome.state, BattleState::EnemyWon);
        assert_eq!(outcome.rewards, Rewards::default());
        assert_eq!(outcome.turns, 4);
        assert_eq!(mage.health, 0);
    }

    #[test]
    fn test_escape_success_skips_enemy_turn() {
        let mut hero = Character::new("Hero", CharacterClass::Rogue);
        let mut battle = Battle::start(&hero, Enemy::new(EnemyKind::Orc)).unwrap();

        let state = battle
            .play_round(&mut hero, BattleAction::Escape, &mut lucky())
            .unwrap();

        assert_eq!(state, BattleState::Escaped);
        assert_eq!(hero.health, hero.max_health);
        assert_eq!(battle.rewards(), Rewards::default());
    }

    #[test]
    fn test_failed_escape_still_takes_a_hit() {
        let mut hero = Character::new("Hero", CharacterClass::Rogue);
        let mut battle = Battle::start(&hero, Enemy::new(EnemyKind::Orc)).unwrap();

        let state = battle
            .play_round(&mut hero, BattleAction::Escape, &mut unlucky())
            .unwrap();

        assert_eq!(state, BattleState::Active);
        assert_eq!(hero.health, 90 - 9);
        assert_eq!(battle.turn, 2);
        assert_eq!(
            battle.events,
            vec![BattleEvent::EscapeFailed, BattleEvent::EnemyAttack { damage: 9 }]
        );
    }

    #[test]
    fn test_round_after_battle_ends() {
        let mut hero = Character::new("Hero", CharacterClass::Warrior);
        let mut battle = Battle::start(&hero, Enemy::new(EnemyKind::Goblin)).unwrap();
        battle
            .play_round(&mut hero, BattleAction::Escape, &mut lucky())
            .unwrap();

        assert!(matches!(
            battle.play_round(&mut hero, BattleAction::Attack, &mut lucky()),
            Err(GameError::CombatNotActive)
        ));
    }

    #[test]
    fn test_victory_rewards_and_can_fight() {
        assert_eq!(
            victory_rewards(&Enemy::new(EnemyKind::Orc)),
            Rewards { xp: 50, gold: 25 }
        );
        let mut hero = Character::new("Hero", CharacterClass::Warrior);
        assert!(can_fight(&hero));
        hero.health = 0;
        assert!(!can_fight(&hero));
    }
}
