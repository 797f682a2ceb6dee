//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Case opening, inventory and leaderboard commands
pub mod case;

/// Balance, grants and gambling commands
pub mod economy;

/// General utility commands
pub mod general;

/// Marketplace commands
pub mod market;

// Export commands
pub use case::*;
pub use economy::*;
pub use general::*;
pub use market::*;
