//! Chronicles - rules engine for a text-driven single-player RPG.
//!
//! Characters level up, fight archetype enemies, trade and equip items,
//! and work through quests gated by level and prerequisite chains. The
//! `chronicles` binary wraps this library in a terminal menu.

pub mod build_info;
pub mod character;
pub mod combat;
pub mod config;
pub mod core;
pub mod data;
pub mod items;
pub mod quest;
pub mod session;

pub use character::{Character, CharacterClass, SaveStore, Stat};
pub use combat::{Battle, BattleAction, BattleOutcome, BattleState, Enemy, EnemyKind, Rewards};
pub use config::Config;
pub use crate::core::{GameError, GameResult};
pub use data::{ItemCatalog, QuestCatalog};
pub use items::{EquipmentSlot, Item, ItemType};
pub use quest::{Quest, QuestReward, QuestStatus};
pub use session::GameSession;
