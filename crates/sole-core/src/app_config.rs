use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Provider-issued token, sent verbatim as the `Authorization` header.
    pub kicks_api_key: Option<String>,
    pub kicks_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub search_limit: u32,
    pub curated_limit: u32,
    pub curated_brand: String,
    pub liked_fetch_concurrency: usize,
    pub users_path: PathBuf,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field(
                "kicks_api_key",
                &self.kicks_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("kicks_base_url", &self.kicks_base_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("search_limit", &self.search_limit)
            .field("curated_limit", &self.curated_limit)
            .field("curated_brand", &self.curated_brand)
            .field("liked_fetch_concurrency", &self.liked_fetch_concurrency)
            .field("users_path", &self.users_path)
            .finish()
    }
}
