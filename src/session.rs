//! A play session: one character plus the catalogs it is played against.
//!
//! The session is the single owner of its character. Every engine call
//! borrows the character mutably for the length of the call and the
//! catalogs immutably.

use crate::character::{self, Character};
use crate::combat::{Battle, BattleController, BattleOutcome, BattleState, Enemy, Rewards};
use crate::core::constants::REVIVE_COST;
use crate::core::{GameError, GameResult};
use crate::data::{load_items, load_quests, ItemCatalog, QuestCatalog, ITEMS_FILE, QUESTS_FILE};
use crate::items::{self, EquipOutcome, EquipmentSlot};
use crate::quest::{self, Quest, QuestReward};
use log::{debug, info};
use rand::Rng;
use std::path::Path;

/// Loads both catalogs from `data_dir` and checks the quest prerequisites.
pub fn load_catalogs(data_dir: &Path) -> GameResult<(QuestCatalog, ItemCatalog)> {
    let quests = load_quests(&data_dir.join(QUESTS_FILE))?;
    quest::validate_prerequisites(&quests)?;
    let items = load_items(&data_dir.join(ITEMS_FILE))?;
    Ok((quests, items))
}

#[derive(Debug, Clone)]
pub struct GameSession {
    character: Character,
    quests: QuestCatalog,
    items: ItemCatalog,
    revive_cost: u64,
}

impl GameSession {
    pub fn new(character: Character, quests: QuestCatalog, items: ItemCatalog) -> Self {
        Self {
            character,
            quests,
            items,
            revive_cost: REVIVE_COST,
        }
    }

    pub fn with_revive_cost(mut self, revive_cost: u64) -> Self {
        self.revive_cost = revive_cost;
        self
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn into_character(self) -> Character {
        self.character
    }

    pub fn quests(&self) -> &QuestCatalog {
        &self.quests
    }

    pub fn items(&self) -> &ItemCatalog {
        &self.items
    }

    pub fn revive_cost(&self) -> u64 {
        self.revive_cost
    }

    // Progression

    pub fn gain_experience(&mut self, amount: u64) -> GameResult<u32> {
        character::gain_experience(&mut self.character, amount)
    }

    pub fn heal(&mut self, amount: u32) -> u32 {
        character::heal(&mut self.character, amount)
    }

    pub fn is_dead(&self) -> bool {
        character::is_dead(&self.character)
    }

    /// Charges the revive cost and revives. Returns false, charging
    /// nothing, if the character is alive.
    pub fn revive_for_gold(&mut self) -> GameResult<bool> {
        if !self.is_dead() {
            return Ok(false);
        }
        if self.character.gold < self.revive_cost {
            return Err(GameError::InsufficientGold {
                cost: self.revive_cost,
                gold: self.character.gold,
            });
        }
        items::spend_gold(&mut self.character, self.revive_cost)?;
        Ok(character::revive(&mut self.character))
    }

    // Equipment and economy

    pub fn equip(&mut self, item_id: &str, slot: EquipmentSlot) -> GameResult<EquipOutcome> {
        items::equip(&mut self.character, item_id, &self.items, slot)
    }

    pub fn unequip(&mut self, slot: EquipmentSlot) -> GameResult<Option<String>> {
        items::unequip(&mut self.character, slot, &self.items)
    }

    pub fn purchase(&mut self, item_id: &str) -> GameResult<u64> {
        items::purchase(&mut self.character, item_id, &self.items)
    }

    pub fn sell(&mut self, item_id: &str) -> GameResult<u64> {
        items::sell(&mut self.character, item_id, &self.items)
    }

    pub fn use_consumable(&mut self, item_id: &str) -> GameResult<String> {
        items::use_consumable(&mut self.character, item_id, &self.items)
    }

    // Quests

    pub fn accept_quest(&mut self, quest_id: &str) -> GameResult<()> {
        quest::accept_quest(&mut self.character, quest_id, &self.quests)
    }

    pub fn complete_quest(&mut self, quest_id: &str) -> GameResult<QuestReward> {
        quest::complete_quest(&mut self.character, quest_id, &self.quests)
    }

    pub fn abandon_quest(&mut self, quest_id: &str) -> GameResult<()> {
        quest::abandon_quest(&mut self.character, quest_id)
    }

    pub fn available_quests(&self) -> Vec<&Quest> {
        quest::available_quests(&self.character, &self.quests)
    }

    pub fn active_quests(&self) -> Vec<&Quest> {
        quest::active_quests(&self.character, &self.quests)
    }

    pub fn prerequisite_chain(&self, quest_id: &str) -> GameResult<Vec<String>> {
        quest::prerequisite_chain(quest_id, &self.quests)
    }

    pub fn completion_percentage(&self) -> f64 {
        quest::completion_percentage(&self.character, &self.quests)
    }

    // Combat

    /// Pays out battle rewards: experience first, then gold.
    pub fn claim_victory(&mut self, rewards: Rewards) -> GameResult<u32> {
        let levelups = character::gain_experience(&mut self.character, rewards.xp)?;
        self.character.gold = self.character.gold.saturating_add(rewards.gold);
        debug!(
            "{} claimed {} xp and {} gold",
            self.character.name, rewards.xp, rewards.gold
        );
        Ok(levelups)
    }

    /// Fights `enemy` to the end, paying out rewards on a win.
    pub fn fight(
        &mut self,
        enemy: Enemy,
        controller: &mut impl BattleController,
        rng: &mut impl Rng,
    ) -> GameResult<BattleOutcome> {
        let battle = Battle::start(&self.character, enemy)?;
        let outcome = battle.run(&mut self.character, controller, rng)?;
        if outcome.state == BattleState::PlayerWon {
            self.claim_victory(outcome.rewards)?;
        }
        info!(
            "{} battle ended: {:?} after {} turn(s)",
            self.character.name, outcome.state, outcome.turns
        );
        Ok(outcome)
    }

    /// Fights an enemy picked for the character's level.
    pub fn explore(
        &mut self,
        controller: &mut impl BattleController,
        rng: &mut impl Rng,
    ) -> GameResult<BattleOutcome> {
        let enemy = Enemy::for_level(self.character.level);
        self.fight(enemy, controller, rng)
    }
}
