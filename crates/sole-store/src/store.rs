use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{RwLock, RwLockReadGuard};
use uuid::Uuid;

use sole_core::{User, UserProfile};

use crate::password::{generate_salt, hash_password, verify_password};
use crate::StoreError;

/// Everything the store persists.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreState {
    #[serde(default)]
    users: Vec<User>,
    #[serde(default)]
    current_user_id: Option<String>,
}

impl StoreState {
    fn find(&self, user_id: &str) -> Result<&User, StoreError> {
        self.users
            .iter()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }

    fn find_mut(&mut self, user_id: &str) -> Result<&mut User, StoreError> {
        self.users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| StoreError::UserNotFound(user_id.to_string()))
    }

    fn find_by_username(&self, username: &str) -> Option<&User> {
        let wanted = username.to_lowercase();
        self.users
            .iter()
            .find(|u| u.username.to_lowercase() == wanted)
    }
}

/// User repository held in memory, optionally mirrored to a JSON file.
///
/// File-backed stores reload the file before every operation, so handles in
/// other processes see each other's writes. Mutations are applied to a copy
/// of the freshly loaded state, written to disk, and only then made visible,
/// so a failed write leaves the store unchanged.
pub struct UserStore {
    path: Option<PathBuf>,
    state: RwLock<StoreState>,
}

impl UserStore {
    /// A store that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(StoreState::default()),
        }
    }

    /// Opens the store backed by `path`. A missing file starts empty; the
    /// file is created on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, or
    /// [`StoreError::Serialize`] if it is not a valid store document.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let state = load(&path).await?;
        tracing::debug!(path = %path.display(), users = state.users.len(), "user store loaded");

        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    /// Creates an account. Usernames are unique ignoring case and stored
    /// trimmed.
    ///
    /// # Errors
    ///
    /// [`StoreError::EmptyUsername`], [`StoreError::EmptyPassword`],
    /// [`StoreError::UsernameTaken`], or a persistence error.
    pub async fn register(&self, username: &str, password: &str) -> Result<UserProfile, StoreError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(StoreError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(StoreError::EmptyPassword);
        }

        let profile = self
            .mutate(|state| {
                if state.find_by_username(username).is_some() {
                    return Err(StoreError::UsernameTaken(username.to_string()));
                }
                let salt = generate_salt();
                let user = User {
                    id: Uuid::new_v4().to_string(),
                    username: username.to_string(),
                    password_hash: hash_password(&salt, password),
                    password_salt: salt,
                    liked_style_ids: Vec::new(),
                    shoe_size: None,
                    created_at: Utc::now(),
                };
                let profile = user.profile();
                state.users.push(user);
                Ok(profile)
            })
            .await?;

        tracing::info!(user_id = %profile.id, username = %profile.username, "user registered");
        Ok(profile)
    }

    /// Checks credentials. The username match ignores case.
    ///
    /// # Errors
    ///
    /// [`StoreError::InvalidCredentials`] for an unknown user or a wrong
    /// password; the two are not distinguished.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<UserProfile, StoreError> {
        let state = self.snapshot().await;
        match state.find_by_username(username.trim()) {
            Some(user) if verify_password(&user.password_salt, password, &user.password_hash) => {
                Ok(user.profile())
            }
            _ => {
                tracing::debug!(username, "authentication rejected");
                Err(StoreError::InvalidCredentials)
            }
        }
    }

    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if no user has `user_id`.
    pub async fn get(&self, user_id: &str) -> Result<UserProfile, StoreError> {
        self.snapshot().await.find(user_id).map(User::profile)
    }

    /// The signed-in user, if the pointer refers to an existing account.
    pub async fn current_user(&self) -> Option<UserProfile> {
        let state = self.snapshot().await;
        state
            .current_user_id
            .as_deref()
            .and_then(|id| state.find(id).ok())
            .map(User::profile)
    }

    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] or a persistence error.
    pub async fn set_current_user(&self, user_id: &str) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.find(user_id)?;
            state.current_user_id = Some(user_id.to_string());
            Ok(())
        })
        .await
    }

    /// # Errors
    ///
    /// Returns a persistence error if the file cannot be written.
    pub async fn clear_current_user(&self) -> Result<(), StoreError> {
        self.mutate(|state| {
            state.current_user_id = None;
            Ok(())
        })
        .await
    }

    /// Likes `style_id`, or unlikes it if already liked. Returns the new
    /// liked state.
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] or a persistence error.
    pub async fn toggle_like(&self, user_id: &str, style_id: &str) -> Result<bool, StoreError> {
        let liked = self
            .mutate(|state| {
                let user = state.find_mut(user_id)?;
                if user.has_liked(style_id) {
                    user.liked_style_ids.retain(|id| id != style_id);
                    Ok(false)
                } else {
                    user.liked_style_ids.push(style_id.to_string());
                    Ok(true)
                }
            })
            .await?;
        tracing::debug!(user_id, style_id, liked, "like toggled");
        Ok(liked)
    }

    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if no user has `user_id`.
    pub async fn is_liked(&self, user_id: &str, style_id: &str) -> Result<bool, StoreError> {
        Ok(self.snapshot().await.find(user_id)?.has_liked(style_id))
    }

    /// Liked ids in the order they were liked.
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] if no user has `user_id`.
    pub async fn liked_style_ids(&self, user_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .snapshot()
            .await
            .find(user_id)?
            .liked_style_ids
            .clone())
    }

    /// Sets or clears the preferred shoe size. A blank size clears it.
    ///
    /// # Errors
    ///
    /// [`StoreError::UserNotFound`] or a persistence error.
    pub async fn set_shoe_size(
        &self,
        user_id: &str,
        size: Option<&str>,
    ) -> Result<UserProfile, StoreError> {
        let size = size.map(str::trim).filter(|s| !s.is_empty());
        self.mutate(|state| {
            let user = state.find_mut(user_id)?;
            user.shoe_size = size.map(str::to_string);
            Ok(user.profile())
        })
        .await
    }

    /// Current state for reads. A file that cannot be reloaded leaves the
    /// last known state in place.
    async fn snapshot(&self) -> RwLockReadGuard<'_, StoreState> {
        let mut guard = self.state.write().await;
        if let Some(path) = &self.path {
            match load(path).await {
                Ok(state) => *guard = state,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "user store reload failed; using cached state");
                }
            }
        }
        guard.downgrade()
    }

    async fn mutate<T>(
        &self,
        apply: impl FnOnce(&mut StoreState) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.state.write().await;
        if let Some(path) = &self.path {
            *guard = load(path).await?;
        }
        let mut next = guard.clone();
        let out = apply(&mut next)?;
        if let Some(path) = &self.path {
            persist(path, &next).await?;
        }
        *guard = next;
        Ok(out)
    }
}

/// Reads the store file. A missing file is an empty store.
async fn load(path: &Path) -> Result<StoreState, StoreError> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "user store file missing; starting empty");
            Ok(StoreState::default())
        }
        Err(e) => Err(io_error(path, e)),
    }
}

/// Writes the state to a sibling temp file and renames it over `path`.
async fn persist(path: &Path, state: &StoreState) -> Result<(), StoreError> {
    let bytes = serde_json::to_vec_pretty(state)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| io_error(parent, e))?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, &bytes)
        .await
        .map_err(|e| io_error(&tmp, e))?;
    tokio::fs::rename(&tmp, path)
        .await
        .map_err(|e| io_error(path, e))?;
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        source,
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
