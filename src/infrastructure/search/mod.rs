//! Card search API adapters.

pub mod scryfall;

pub use scryfall::{SCRYFALL_API_BASE, ScryfallClient};
