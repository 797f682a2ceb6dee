//! Entity module - record types persisted in the JSON data files.
//! Field names and shapes match the files written by earlier bot versions.

pub mod account;
pub mod item;
pub mod listing;

pub use account::{Account, AccountKey};
pub use item::{ItemRecord, Rarity, Wear};
pub use listing::{ListingRecord, MarketBook};
