//! Flat-text character saves.
//!
//! One file per character, `{name}_save.txt`, holding one `KEY: value`
//! line per field. List fields are comma-joined.

use super::types::{Character, CharacterClass};
use crate::core::constants::{MAX_NAME_LENGTH, SAVE_FILE_SUFFIX};
use crate::core::{GameError, GameResult};
use crate::items::EquipmentSlot;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FIELD_ORDER: [&str; 14] = [
    "NAME",
    "CLASS",
    "LEVEL",
    "HEALTH",
    "MAX_HEALTH",
    "STRENGTH",
    "MAGIC",
    "EXPERIENCE",
    "GOLD",
    "INVENTORY",
    "ACTIVE_QUESTS",
    "COMPLETED_QUESTS",
    "EQUIPPED_WEAPON",
    "EQUIPPED_ARMOR",
];

/// Fields older saves may omit.
const OPTIONAL_FIELDS: [&str; 2] = ["EQUIPPED_WEAPON", "EQUIPPED_ARMOR"];

pub fn validate_name(name: &str) -> GameResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(GameError::InvalidName("name cannot be empty".to_string()));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(GameError::InvalidName(format!(
            "name must be {} characters or less",
            MAX_NAME_LENGTH
        )));
    }

    let valid_chars = trimmed
        .chars()
        .all(|c| c.is_alphanumeric() || c == ' ' || c == '-' || c == '_');

    if !valid_chars {
        return Err(GameError::InvalidName(
            "name can only contain letters, numbers, spaces, hyphens, and underscores"
                .to_string(),
        ));
    }

    Ok(())
}

/// File-system safe form of a character name.
pub fn sanitize_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

fn join_list(ids: &[String]) -> String {
    ids.join(",")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders a character in save-file form.
pub fn serialize_character(character: &Character) -> String {
    let equipped = |slot| character.equipped(slot).unwrap_or("").to_string();
    let values = [
        character.name.clone(),
        character.class.to_string(),
        character.level.to_string(),
        character.health.to_string(),
        character.max_health.to_string(),
        character.strength.to_string(),
        character.magic.to_string(),
        character.experience.to_string(),
        character.gold.to_string(),
        join_list(&character.inventory),
        join_list(&character.active_quests),
        join_list(&character.completed_quests),
        equipped(EquipmentSlot::Weapon),
        equipped(EquipmentSlot::Armor),
    ];

    FIELD_ORDER
        .iter()
        .zip(values.iter())
        .map(|(key, value)| format!("{}: {}\n", key, value))
        .collect()
}

fn field<'a>(fields: &HashMap<&str, &'a str>, key: &str) -> GameResult<&'a str> {
    match fields.get(key) {
        Some(value) => Ok(*value),
        None if OPTIONAL_FIELDS.contains(&key) => Ok(""),
        None => Err(GameError::InvalidSaveData(format!("missing field {}", key))),
    }
}

fn number<N: FromStr>(key: &str, value: &str) -> GameResult<N> {
    value
        .parse()
        .map_err(|_| GameError::InvalidSaveData(format!("{} is not a valid number: {:?}", key, value)))
}

/// Rebuilds a character from save-file text and checks its invariants.
pub fn deserialize_character(text: &str) -> GameResult<Character> {
    let mut fields: HashMap<&str, &str> = HashMap::new();

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let (key, value) = line
            .split_once(':')
            .ok_or_else(|| GameError::InvalidSaveData(format!("line without a key: {:?}", line)))?;
        let key = key.trim();
        let Some(known) = FIELD_ORDER.iter().find(|k| k.eq_ignore_ascii_case(key)) else {
            return Err(GameError::InvalidSaveData(format!("unknown field {}", key)));
        };
        fields.insert(*known, value.trim());
    }

    let optional_id = |value: &str| (!value.is_empty()).then(|| value.to_string());

    let class: CharacterClass = field(&fields, "CLASS")?
        .parse()
        .map_err(|e: GameError| GameError::InvalidSaveData(e.to_string()))?;

    let mut character = Character::new(field(&fields, "NAME")?, class);
    character.level = number("LEVEL", field(&fields, "LEVEL")?)?;
    character.health = number("HEALTH", field(&fields, "HEALTH")?)?;
    character.max_health = number("MAX_HEALTH", field(&fields, "MAX_HEALTH")?)?;
    character.strength = number("STRENGTH", field(&fields, "STRENGTH")?)?;
    character.magic = number("MAGIC", field(&fields, "MAGIC")?)?;
    character.experience = number("EXPERIENCE", field(&fields, "EXPERIENCE")?)?;
    character.gold = number("GOLD", field(&fields, "GOLD")?)?;
    character.inventory = split_list(field(&fields, "INVENTORY")?);
    character.active_quests = split_list(field(&fields, "ACTIVE_QUESTS")?);
    character.completed_quests = split_list(field(&fields, "COMPLETED_QUESTS")?);
    character
        .equipment
        .set(EquipmentSlot::Weapon, optional_id(field(&fields, "EQUIPPED_WEAPON")?));
    character
        .equipment
        .set(EquipmentSlot::Armor, optional_id(field(&fields, "EQUIPPED_ARMOR")?));

    character.validate()?;
    Ok(character)
}

/// Directory of character saves.
#[derive(Debug, Clone)]
pub struct SaveStore {
    dir: PathBuf,
}

impl SaveStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn save_path(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}{}", sanitize_name(name), SAVE_FILE_SUFFIX))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.save_path(name).is_file()
    }

    /// Writes the character, replacing any earlier save under the same name.
    pub fn save(&self, character: &Character) -> GameResult<PathBuf> {
        validate_name(&character.name)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.save_path(&character.name);
        fs::write(&path, serialize_character(character))?;
        debug!("saved {} to {}", character.name, path.display());
        Ok(path)
    }

    pub fn load(&self, name: &str) -> GameResult<Character> {
        let path = self.save_path(name);
        if !path.is_file() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }
        let text = fs::read_to_string(&path)?;
        let character = deserialize_character(&text)?;
        debug!("loaded {} from {}", character.name, path.display());
        Ok(character)
    }

    /// Names of every readable save, sorted. Unreadable files are skipped.
    pub fn list(&self) -> GameResult<Vec<String>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_save = path
                .file_name()
                .and_then(|f| f.to_str())
                .is_some_and(|f| f.ends_with(SAVE_FILE_SUFFIX));
            if !is_save {
                continue;
            }

            match fs::read_to_string(&path)
                .map_err(GameError::from)
                .and_then(|text| deserialize_character(&text))
            {
                Ok(character) => names.push(character.name),
                Err(e) => warn!("skipping unreadable save {}: {}", path.display(), e),
            }
        }

        names.sort();
        Ok(names)
    }

    pub fn delete(&self, name: &str) -> GameResult<()> {
        let path = self.save_path(name);
        if !path.is_file() {
            return Err(GameError::CharacterNotFound(name.to_string()));
        }
        fs::remove_file(&path)?;
        debug!("deleted save {}", path.display());
        Ok(())
    }
}
