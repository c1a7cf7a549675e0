// Progression
pub const XP_PER_LEVEL: u64 = 100;
pub const LEVEL_UP_MAX_HEALTH: u32 = 10;
pub const LEVEL_UP_STRENGTH: u32 = 2;
pub const LEVEL_UP_MAGIC: u32 = 2;
pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_GOLD: u64 = 100;

// Inventory and shop
pub const INVENTORY_CAPACITY: usize = 20;
pub const SELL_PRICE_DIVISOR: u64 = 2;
pub const REVIVE_COST: u64 = 50;
/// Largest magnitude an item effect may carry; any u32 stat can absorb it.
pub const MAX_EFFECT_DELTA: i64 = u32::MAX as i64;

// Combat
pub const DEFENSE_DIVISOR: u32 = 4;
pub const MIN_ATTACK_DAMAGE: u32 = 1;
pub const ESCAPE_CHANCE: f64 = 0.5;
pub const CRITICAL_STRIKE_CHANCE: f64 = 0.5;
pub const POWER_STRIKE_MULTIPLIER: u32 = 2;
pub const FIREBALL_MULTIPLIER: u32 = 2;
pub const CRITICAL_STRIKE_MULTIPLIER: u32 = 3;
pub const CLERIC_HEAL_AMOUNT: u32 = 30;

// Quests
pub const NO_PREREQUISITE: &str = "NONE";

// Save files
pub const SAVE_FILE_SUFFIX: &str = "_save.txt";
pub const MAX_NAME_LENGTH: usize = 16;
