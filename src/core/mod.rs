//! Constants, shared math, and the error type.

pub mod combat_math;
pub mod constants;
pub mod error;

pub use constants::*;
pub use error::{GameError, GameResult};
