//! Reusable widgets.

pub mod card_tile;

pub use card_tile::{CardTile, TileStatus};
