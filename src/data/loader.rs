//! Loads quest and item catalogs from `KEY: value` block files.
//!
//! Blocks are separated by blank lines. Keys are case-insensitive; unknown
//! keys are skipped. Every required field must be present exactly once.

use super::catalog::{ItemCatalog, QuestCatalog};
use crate::core::constants::NO_PREREQUISITE;
use crate::core::{GameError, GameResult};
use crate::items::{Item, ItemEffect, ItemType};
use crate::quest::Quest;
use log::{debug, info};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const QUESTS_FILE: &str = "quests.txt";
pub const ITEMS_FILE: &str = "items.txt";

pub const DEFAULT_QUESTS: &str = "\
QUEST_ID: first_quest
TITLE: The Beginning
DESCRIPTION: Start your journey by clearing the goblins from the road.
REWARD_XP: 100
REWARD_GOLD: 50
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: goblin_warren
TITLE: The Goblin Warren
DESCRIPTION: Follow the survivors back to their warren and end the raids.
REWARD_XP: 150
REWARD_GOLD: 75
REQUIRED_LEVEL: 2
PREREQUISITE: first_quest

QUEST_ID: lost_tome
TITLE: The Lost Tome
DESCRIPTION: Recover a spellbook stolen from the village library.
REWARD_XP: 120
REWARD_GOLD: 40
REQUIRED_LEVEL: 1
PREREQUISITE: NONE

QUEST_ID: orc_stronghold
TITLE: Siege of the Stronghold
DESCRIPTION: Break the orc war band gathering in the hills.
REWARD_XP: 400
REWARD_GOLD: 200
REQUIRED_LEVEL: 4
PREREQUISITE: goblin_warren

QUEST_ID: dragon_lair
TITLE: Into the Dragon's Lair
DESCRIPTION: Face the dragon that commands the orc armies.
REWARD_XP: 1000
REWARD_GOLD: 500
REQUIRED_LEVEL: 6
PREREQUISITE: orc_stronghold
";

pub const DEFAULT_ITEMS: &str = "\
ITEM_ID: sword_basic
NAME: Basic Sword
TYPE: weapon
EFFECT: strength:5
COST: 50
DESCRIPTION: A simple sword to start your adventure.

ITEM_ID: oak_staff
NAME: Oak Staff
TYPE: weapon
EFFECT: magic:8
COST: 120
DESCRIPTION: A staff carved from a lightning-struck oak.

ITEM_ID: leather_armor
NAME: Leather Armor
TYPE: armor
EFFECT: max_health:15
COST: 60
DESCRIPTION: Boiled leather that turns aside a glancing blow.

ITEM_ID: chain_mail
NAME: Chain Mail
TYPE: armor
EFFECT: max_health:30
COST: 150
DESCRIPTION: Heavy rings of iron.

ITEM_ID: potion_small
NAME: Small Healing Potion
TYPE: consumable
EFFECT: health:20
COST: 10
DESCRIPTION: Restores a small amount of health.

ITEM_ID: strength_tonic
NAME: Strength Tonic
TYPE: consumable
EFFECT: strength:2
COST: 80
DESCRIPTION: Permanently hardens the drinker's muscles.
";

/// One parsed block: upper-cased keys to trimmed values.
type Block = HashMap<String, String>;

fn split_blocks(text: &str) -> GameResult<Vec<Block>> {
    let mut blocks = Vec::new();
    let mut current = Block::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            continue;
        }

        let (key, value) = line.split_once(':').ok_or_else(|| {
            GameError::InvalidDataFormat(format!("line {}: missing ':' in {:?}", line_no + 1, line))
        })?;
        let key = key.trim().to_ascii_uppercase();
        if current.insert(key.clone(), value.trim().to_string()).is_some() {
            return Err(GameError::InvalidDataFormat(format!(
                "line {}: duplicate field {}",
                line_no + 1,
                key
            )));
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }

    Ok(blocks)
}

fn field<'a>(block: &'a Block, key: &str) -> GameResult<&'a str> {
    block
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| GameError::InvalidDataFormat(format!("missing required field {}", key)))
}

fn numeric_field<N: std::str::FromStr>(block: &Block, key: &str) -> GameResult<N> {
    let raw = field(block, key)?;
    raw.parse::<N>().map_err(|_| {
        GameError::InvalidDataFormat(format!("{} must be a non-negative integer, got {:?}", key, raw))
    })
}

/// Ids end up in comma-joined save lists, so they may not contain commas.
fn id_field<'a>(block: &'a Block, key: &str) -> GameResult<&'a str> {
    let id = field(block, key)?;
    if id.is_empty() {
        return Err(GameError::InvalidDataFormat(format!("empty {}", key)));
    }
    if id.contains(',') {
        return Err(GameError::InvalidDataFormat(format!(
            "{} {:?} must not contain ','",
            key, id
        )));
    }
    Ok(id)
}

fn parse_quest_block(block: &Block) -> GameResult<Quest> {
    let id = id_field(block, "QUEST_ID")?;
    let required_level: u32 = numeric_field(block, "REQUIRED_LEVEL")?;
    if required_level == 0 {
        return Err(GameError::InvalidDataFormat(format!(
            "quest {}: REQUIRED_LEVEL must be at least 1",
            id
        )));
    }
    let prerequisite = field(block, "PREREQUISITE")?;
    let prerequisite = if prerequisite.is_empty() || prerequisite.eq_ignore_ascii_case(NO_PREREQUISITE)
    {
        None
    } else {
        Some(prerequisite.to_string())
    };

    Ok(Quest {
        id: id.to_string(),
        title: field(block, "TITLE")?.to_string(),
        description: field(block, "DESCRIPTION")?.to_string(),
        reward_xp: numeric_field(block, "REWARD_XP")?,
        reward_gold: numeric_field(block, "REWARD_GOLD")?,
        required_level,
        prerequisite,
    })
}

fn parse_item_block(block: &Block) -> GameResult<Item> {
    let id = id_field(block, "ITEM_ID")?;
    let effect = field(block, "EFFECT")?;
    let parsed = ItemEffect::parse(effect).map_err(|e| {
        GameError::InvalidDataFormat(format!("item {}: {}", id, e))
    })?;
    let item_type = field(block, "TYPE")?.parse::<ItemType>()?;
    if item_type != ItemType::Consumable && !parsed.is_equippable() {
        return Err(GameError::InvalidDataFormat(format!(
            "item {}: {} cannot carry effect {}",
            id, item_type, parsed
        )));
    }

    Ok(Item {
        id: id.to_string(),
        name: field(block, "NAME")?.to_string(),
        item_type,
        effect: effect.to_string(),
        cost: numeric_field(block, "COST")?,
        description: field(block, "DESCRIPTION")?.to_string(),
    })
}

pub fn parse_quests(text: &str) -> GameResult<QuestCatalog> {
    let quests = split_blocks(text)?
        .iter()
        .map(parse_quest_block)
        .collect::<GameResult<Vec<_>>>()?;
    QuestCatalog::from_entries(quests)
}

pub fn parse_items(text: &str) -> GameResult<ItemCatalog> {
    let items = split_blocks(text)?
        .iter()
        .map(parse_item_block)
        .collect::<GameResult<Vec<_>>>()?;
    ItemCatalog::from_entries(items)
}

pub fn load_quests(path: &Path) -> GameResult<QuestCatalog> {
    let text = fs::read_to_string(path)?;
    let catalog = parse_quests(&text)?;
    debug!("loaded {} quests from {}", catalog.len(), path.display());
    Ok(catalog)
}

pub fn load_items(path: &Path) -> GameResult<ItemCatalog> {
    let text = fs::read_to_string(path)?;
    let catalog = parse_items(&text)?;
    debug!("loaded {} items from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// Writes the starter quest and item files into `dir` unless they exist.
/// Returns the number of files written.
pub fn write_default_data(dir: &Path) -> GameResult<usize> {
    fs::create_dir_all(dir)?;
    let mut written = 0;
    for (name, contents) in [(QUESTS_FILE, DEFAULT_QUESTS), (ITEMS_FILE, DEFAULT_ITEMS)] {
        let path = dir.join(name);
        if !path.exists() {
            fs::write(&path, contents)?;
            info!("wrote default data file {}", path.display());
            written += 1;
        }
    }
    Ok(written)
}
