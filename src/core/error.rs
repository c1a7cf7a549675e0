//! Error types shared by every engine.
//!
//! Every failure is local and recoverable. Engines check all preconditions
//! before mutating, so a returned error means the character is unchanged.

use crate::character::Stat;
use crate::items::ItemType;
use thiserror::Error;

pub type GameResult<T> = Result<T, GameError>;

fn format_cycle_path(path: &[String]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.join(" -> ")
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid character class: {0}")]
    InvalidClass(String),

    #[error("{0} is dead")]
    CharacterDead(String),

    /// Gold would become negative.
    #[error("invalid transaction: {gold} gold cannot absorb a change of {delta}")]
    InvalidTransaction { gold: u64, delta: i64 },

    #[error("inventory is full ({capacity} slots)")]
    InventoryFull { capacity: usize },

    #[error("item not found: {0}")]
    ItemNotFound(String),

    #[error("item {item_id} is a {found}, expected {expected}")]
    WrongItemType {
        item_id: String,
        expected: ItemType,
        found: ItemType,
    },

    /// Equipment effects must be exactly reversible on unequip.
    #[error("item {item_id} cannot be equipped with effect {effect}")]
    UnsupportedEquipmentEffect { item_id: String, effect: String },

    #[error("malformed item effect: {0:?}")]
    MalformedEffect(String),

    #[error("unknown stat: {0}")]
    UnknownStat(String),

    /// A signed delta would push a stat below zero or past its integer range.
    #[error("{stat} cannot change by {delta} from {current}")]
    StatOutOfRange { stat: Stat, current: u32, delta: i64 },

    #[error("insufficient gold: need {cost}, have {gold}")]
    InsufficientGold { cost: u64, gold: u64 },

    #[error("quest not found: {0}")]
    QuestNotFound(String),

    #[error("quest {quest_id} requires level {required}, character is level {level}")]
    InsufficientLevel {
        quest_id: String,
        required: u32,
        level: u32,
    },

    #[error("quest {quest_id} requires {prerequisite} to be completed first")]
    PrerequisiteNotMet {
        quest_id: String,
        prerequisite: String,
    },

    #[error("quest already completed: {0}")]
    AlreadyCompleted(String),

    #[error("quest already active: {0}")]
    AlreadyActive(String),

    #[error("quest not active: {0}")]
    NotActive(String),

    /// Contains the quest ids on the loop, first id repeated at the end.
    #[error("prerequisite cycle detected: {}", format_cycle_path(.path))]
    PrerequisiteCycle { path: Vec<String> },

    #[error("unknown enemy type: {0}")]
    UnknownEnemy(String),

    #[error("battle is no longer active")]
    CombatNotActive,

    #[error("invalid character name: {0}")]
    InvalidName(String),

    #[error("no save found for character: {0}")]
    CharacterNotFound(String),

    #[error("invalid save data: {0}")]
    InvalidSaveData(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid data format: {0}")]
    InvalidDataFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
