//! Item records, inventory, equipment slots, and the shop.

pub mod equipment;
pub mod inventory;
pub mod shop;
pub mod types;

pub use equipment::*;
pub use inventory::*;
pub use shop::*;
pub use types::*;
