//! Local user repository: accounts, liked sneakers, shoe size and the
//! current-user pointer.

mod password;
mod store;

pub use store::UserStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error("user store I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("user store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
