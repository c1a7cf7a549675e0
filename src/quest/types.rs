use serde::{Deserialize, Serialize};

/// A quest definition. Immutable once loaded into a catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub reward_xp: u64,
    pub reward_gold: u64,
    pub required_level: u32,
    /// Quest that must be completed first; `None` for a chain root.
    pub prerequisite: Option<String>,
}

/// Where a character stands with one quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestStatus {
    NotStarted,
    Active,
    Completed,
}

/// XP and gold granted by completing a quest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestReward {
    pub xp: u64,
    pub gold: u64,
}
