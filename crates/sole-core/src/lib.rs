pub mod app_config;
pub mod config;
pub mod sneakers;
pub mod users;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use sneakers::{
    format_price, LowestResellPrice, ResellLinks, ResellPrices, SearchSource, Sneaker,
    SneakerSearchResult, SneakerSource, Variant, PRICE_UNAVAILABLE,
};
pub use users::{User, UserProfile};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid source '{0}': expected 'stockx' or 'goat'")]
    InvalidSource(String),
    #[error("invalid search source '{0}': expected 'stockx', 'goat' or 'both'")]
    InvalidSearchSource(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
