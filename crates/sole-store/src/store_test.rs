use super::*;

async fn store_with_user() -> (UserStore, UserProfile) {
    let store = UserStore::in_memory();
    let user = store
        .register("sneakerhead", "jumpman23")
        .await
        .expect("register");
    (store, user)
}

// -----------------------------------------------------------------------
// registration and login
// -----------------------------------------------------------------------

#[tokio::test]
async fn register_returns_profile_without_likes() {
    let (_, user) = store_with_user().await;
    assert_eq!(user.username, "sneakerhead");
    assert!(user.liked_style_ids.is_empty());
    assert!(user.shoe_size.is_none());
    assert!(!user.id.is_empty());
}

#[tokio::test]
async fn register_rejects_duplicate_username_ignoring_case() {
    let (store, _) = store_with_user().await;
    let err = store
        .register("  SneakerHead ", "other")
        .await
        .expect_err("duplicate");
    assert!(matches!(err, StoreError::UsernameTaken(ref name) if name == "SneakerHead"));
}

#[tokio::test]
async fn register_rejects_blank_fields() {
    let store = UserStore::in_memory();
    assert!(matches!(
        store.register("   ", "pw").await,
        Err(StoreError::EmptyUsername)
    ));
    assert!(matches!(
        store.register("name", "").await,
        Err(StoreError::EmptyPassword)
    ));
}

#[tokio::test]
async fn authenticate_checks_password() {
    let (store, user) = store_with_user().await;

    let ok = store
        .authenticate("SNEAKERHEAD", "jumpman23")
        .await
        .expect("valid login");
    assert_eq!(ok.id, user.id);

    assert!(matches!(
        store.authenticate("sneakerhead", "wrong").await,
        Err(StoreError::InvalidCredentials)
    ));
    assert!(matches!(
        store.authenticate("nobody", "jumpman23").await,
        Err(StoreError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn get_unknown_user_is_not_found() {
    let store = UserStore::in_memory();
    assert!(matches!(
        store.get("missing").await,
        Err(StoreError::UserNotFound(ref id)) if id == "missing"
    ));
}

// -----------------------------------------------------------------------
// current user pointer
// -----------------------------------------------------------------------

#[tokio::test]
async fn current_user_round_trip() {
    let (store, user) = store_with_user().await;
    assert!(store.current_user().await.is_none());

    store.set_current_user(&user.id).await.expect("set");
    assert_eq!(store.current_user().await.map(|u| u.id), Some(user.id.clone()));

    store.clear_current_user().await.expect("clear");
    assert!(store.current_user().await.is_none());
}

#[tokio::test]
async fn set_current_user_requires_existing_user() {
    let store = UserStore::in_memory();
    assert!(matches!(
        store.set_current_user("ghost").await,
        Err(StoreError::UserNotFound(_))
    ));
}

// -----------------------------------------------------------------------
// likes and shoe size
// -----------------------------------------------------------------------

#[tokio::test]
async fn toggle_like_adds_then_removes() {
    let (store, user) = store_with_user().await;

    assert!(store.toggle_like(&user.id, "jordan-4-bred").await.expect("like"));
    assert!(store.is_liked(&user.id, "jordan-4-bred").await.expect("is_liked"));

    assert!(!store.toggle_like(&user.id, "jordan-4-bred").await.expect("unlike"));
    assert!(!store.is_liked(&user.id, "jordan-4-bred").await.expect("is_liked"));
}

#[tokio::test]
async fn liked_ids_keep_insertion_order() {
    let (store, user) = store_with_user().await;
    for id in ["c", "a", "b"] {
        store.toggle_like(&user.id, id).await.expect("like");
    }
    store.toggle_like(&user.id, "a").await.expect("unlike");
    store.toggle_like(&user.id, "a").await.expect("relike");

    assert_eq!(
        store.liked_style_ids(&user.id).await.expect("ids"),
        vec!["c", "b", "a"]
    );
}

#[tokio::test]
async fn toggle_like_for_unknown_user_fails() {
    let store = UserStore::in_memory();
    assert!(matches!(
        store.toggle_like("ghost", "x").await,
        Err(StoreError::UserNotFound(_))
    ));
}

#[tokio::test]
async fn shoe_size_set_and_cleared() {
    let (store, user) = store_with_user().await;

    let updated = store
        .set_shoe_size(&user.id, Some(" 10.5 "))
        .await
        .expect("set size");
    assert_eq!(updated.shoe_size.as_deref(), Some("10.5"));

    let cleared = store.set_shoe_size(&user.id, Some("")).await.expect("clear");
    assert!(cleared.shoe_size.is_none());
}

// -----------------------------------------------------------------------
// persistence
// -----------------------------------------------------------------------

#[tokio::test]
async fn missing_file_starts_empty() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = UserStore::open(dir.path().join("users.json"))
        .await
        .expect("open");
    assert!(store.current_user().await.is_none());
    assert!(!dir.path().join("users.json").exists());
}

#[tokio::test]
async fn mutations_survive_reopen() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("users.json");

    let user_id = {
        let store = UserStore::open(&path).await.expect("open");
        let user = store.register("collector", "pw").await.expect("register");
        store.toggle_like(&user.id, "dunk-low-panda").await.expect("like");
        store.set_shoe_size(&user.id, Some("9")).await.expect("size");
        store.set_current_user(&user.id).await.expect("current");
        user.id
    };

    let reopened = UserStore::open(&path).await.expect("reopen");
    let user = reopened.current_user().await.expect("current user persisted");
    assert_eq!(user.id, user_id);
    assert_eq!(user.liked_style_ids, vec!["dunk-low-panda"]);
    assert_eq!(user.shoe_size.as_deref(), Some("9"));
    reopened
        .authenticate("collector", "pw")
        .await
        .expect("password hash persisted");

    let raw = std::fs::read_to_string(&path).expect("read file");
    assert!(!raw.contains("\"pw\""));
}

#[tokio::test]
async fn corrupt_file_is_rejected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    std::fs::write(&path, "not json").expect("write");
    assert!(matches!(
        UserStore::open(&path).await,
        Err(StoreError::Serialize(_))
    ));
}

#[tokio::test]
async fn failed_validation_does_not_write() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let store = UserStore::open(&path).await.expect("open");
    let _ = store.set_current_user("ghost").await;
    assert!(!path.exists());
}

#[tokio::test]
async fn handles_on_one_file_keep_each_others_writes() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("users.json");
    let first = UserStore::open(&path).await.expect("open first");
    let second = UserStore::open(&path).await.expect("open second");

    let alice = first.register("alice", "pw-a").await.expect("register alice");
    let bob = second.register("bob", "pw-b").await.expect("register bob");
    first.toggle_like(&alice.id, "jordan-4-bred").await.expect("like");

    assert!(matches!(
        second.register("ALICE", "other").await,
        Err(StoreError::UsernameTaken(_))
    ));
    assert_eq!(
        second.liked_style_ids(&alice.id).await.expect("alice visible"),
        vec!["jordan-4-bred"]
    );

    let reopened = UserStore::open(&path).await.expect("reopen");
    reopened.authenticate("alice", "pw-a").await.expect("alice kept");
    reopened.authenticate("bob", "pw-b").await.expect("bob kept");
    assert_eq!(reopened.get(&bob.id).await.expect("bob").username, "bob");
}
