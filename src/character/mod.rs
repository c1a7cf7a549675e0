//! The player character: creation, progression, and saves.

pub mod progression;
pub mod save;
pub mod types;

pub use progression::*;
pub use save::*;
pub use types::*;
