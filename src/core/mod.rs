/// Opening a case: debit, draw, append
pub mod case_open;
/// Strongly-typed case catalog and lookups
pub mod catalog;
/// Locked facade exposing every economy operation
pub mod economy;
/// Coinflip bets and slots
pub mod games;
/// Readable unique ids
pub mod ids;
/// Selling and display ordering of inventory items
pub mod inventory;
/// Net-worth ranking
pub mod leaderboard;
/// Balance lookups and grants
pub mod ledger;
/// The cross-guild marketplace
pub mod market;
/// Weighted random item selection
pub mod selector;
