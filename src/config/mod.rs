/// Case catalog loading and normalization from JSON
pub mod catalog;

/// Application settings from config.toml
pub mod settings;

pub use settings::AppConfig;
