use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Reads `.env` (if present) and then the process environment.
///
/// # Errors
///
/// [`ConfigError::MissingEnvVar`] when production runs without
/// `KICKS_API_KEY`, [`ConfigError::InvalidEnvVar`] for unparsable values.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Same as [`load_app_config`] but skips `.env`.
///
/// # Errors
///
/// See [`load_app_config`].
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Parses `var` as `T`, falling back to `default` when it is unset.
fn parse_var<T, F>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let text = |var: &str, default: &str| lookup(var).unwrap_or_else(|_| default.to_string());

    let env = parse_environment(&text("SOLE_ENV", "development"));

    let kicks_api_key = lookup("KICKS_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());
    if kicks_api_key.is_none() && env == Environment::Production {
        return Err(ConfigError::MissingEnvVar("KICKS_API_KEY".to_string()));
    }

    let kicks_base_url = text("KICKS_API_BASE_URL", "https://api.kicks.dev");

    let bind_addr = parse_var(&lookup, "SOLE_BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?;
    let log_level = text("SOLE_LOG_LEVEL", "info");

    let request_timeout_secs: u64 = parse_var(&lookup, "SOLE_REQUEST_TIMEOUT_SECS", 15)?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SOLE_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    let user_agent = text("SOLE_USER_AGENT", "solesociety/0.1 (sneaker-tracker)");

    let search_limit = parse_var(&lookup, "SOLE_SEARCH_LIMIT", 20_u32)?;
    let curated_limit = parse_var(&lookup, "SOLE_CURATED_LIMIT", 10_u32)?;
    let curated_brand = text("SOLE_CURATED_BRAND", "Nike");
    let liked_fetch_concurrency = parse_var(&lookup, "SOLE_LIKED_CONCURRENCY", 8_usize)?;
    let users_path = PathBuf::from(text("SOLE_USERS_PATH", "./data/users.json"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        kicks_api_key,
        kicks_base_url,
        request_timeout_secs,
        user_agent,
        search_limit,
        curated_limit,
        curated_brand,
        liked_fetch_concurrency,
        users_path,
    })
}

/// Anything other than `production` or `test` is development.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
