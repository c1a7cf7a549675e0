//! Quest and item catalogs and the text loader that fills them.

pub mod catalog;
pub mod loader;

pub use catalog::*;
pub use loader::*;
