//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for case names, item ids and listing ids
pub mod autocomplete;
