//! Unified error type for the economy core, storage and bot layers.

use thiserror::Error;

/// Every failure the crate can report.
///
/// Domain rejections (unknown ids, insufficient funds, self trades...) are
/// recoverable and shown to the user as-is. The remaining variants are
/// infrastructure faults.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Case '{name}' not found")]
    CaseNotFound { name: String },

    #[error("Item '{id}' not found in your inventory")]
    ItemNotFound { id: String },

    #[error("Listing '{id}' not found")]
    ListingNotFound { id: String },

    #[error("Insufficient funds: you have {current} coins but need {required}")]
    InsufficientFunds { current: u64, required: u64 },

    #[error("You cannot buy your own listing")]
    SelfTrade,

    #[error("Only the seller can remove listing '{id}'")]
    NotOwner { id: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Please wait {remaining_secs}s before playing again")]
    Cooldown { remaining_secs: u64 },

    #[error("Failed to save data: {message}")]
    Persistence { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// True for rejections caused by the request itself rather than by the bot.
    #[must_use]
    pub const fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::CaseNotFound { .. }
                | Self::ItemNotFound { .. }
                | Self::ListingNotFound { .. }
                | Self::InsufficientFunds { .. }
                | Self::SelfTrade
                | Self::NotOwner { .. }
                | Self::InvalidInput { .. }
                | Self::Cooldown { .. }
        )
    }

    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
