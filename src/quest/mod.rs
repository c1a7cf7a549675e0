//! Quest records and the quest engine.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
