//! Account commands backed by the local user store.

use std::sync::Arc;

use anyhow::Context;
use serde_json::json;

use sole_core::UserProfile;
use sole_kicks::{fetch_liked, KicksClient};
use sole_store::UserStore;

use crate::output;

/// The signed-in user, or an error telling the caller to log in.
async fn require_current(store: &UserStore) -> anyhow::Result<UserProfile> {
    store
        .current_user()
        .await
        .context("no user signed in; run `login` first")
}

fn render_profile(profile: &UserProfile, json: bool) -> anyhow::Result<()> {
    if json {
        output::print_json(profile)
    } else {
        output::print_profile(profile);
        Ok(())
    }
}

/// Creates the account and signs it in.
pub(crate) async fn run_register(
    store: &UserStore,
    username: &str,
    password: &str,
    json: bool,
) -> anyhow::Result<()> {
    let profile = store.register(username, password).await?;
    store.set_current_user(&profile.id).await?;
    render_profile(&profile, json)
}

pub(crate) async fn run_login(
    store: &UserStore,
    username: &str,
    password: &str,
    json: bool,
) -> anyhow::Result<()> {
    let profile = store.authenticate(username, password).await?;
    store.set_current_user(&profile.id).await?;
    tracing::info!(user_id = %profile.id, "signed in");
    render_profile(&profile, json)
}

pub(crate) async fn run_logout(store: &UserStore) -> anyhow::Result<()> {
    store.clear_current_user().await?;
    println!("signed out");
    Ok(())
}

pub(crate) async fn run_whoami(store: &UserStore, json: bool) -> anyhow::Result<()> {
    match store.current_user().await {
        Some(profile) => render_profile(&profile, json),
        None if json => output::print_json(&serde_json::Value::Null),
        None => {
            println!("not signed in");
            Ok(())
        }
    }
}

pub(crate) async fn run_like(store: &UserStore, style_id: &str, json: bool) -> anyhow::Result<()> {
    let user = require_current(store).await?;
    let liked = store.toggle_like(&user.id, style_id).await?;
    if json {
        output::print_json(&json!({ "styleID": style_id, "liked": liked }))
    } else {
        println!("{} {style_id}", if liked { "liked" } else { "unliked" });
        Ok(())
    }
}

pub(crate) async fn run_liked(
    kicks: &Arc<KicksClient>,
    store: &UserStore,
    concurrency: usize,
    json: bool,
) -> anyhow::Result<()> {
    let user = require_current(store).await?;
    let ids = store.liked_style_ids(&user.id).await?;
    let sneakers = fetch_liked(kicks.as_ref(), &ids, concurrency).await;

    if json {
        return output::print_json(&sneakers);
    }
    if sneakers.is_empty() {
        println!("no liked sneakers");
        return Ok(());
    }
    if sneakers.len() < ids.len() {
        eprintln!(
            "warning: {} of {} liked items could not be loaded",
            ids.len() - sneakers.len(),
            ids.len()
        );
    }
    for sneaker in &sneakers {
        println!();
        output::print_sneaker(sneaker);
    }
    Ok(())
}

pub(crate) async fn run_set_size(
    store: &UserStore,
    size: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let user = require_current(store).await?;
    let profile = store.set_shoe_size(&user.id, size).await?;
    render_profile(&profile, json)
}
