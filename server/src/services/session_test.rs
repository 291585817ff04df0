use super::*;

// =============================================================================
// bytes_to_hex
// =============================================================================

#[test]
fn bytes_to_hex_empty() {
    assert_eq!(bytes_to_hex(&[]), "");
}

#[test]
fn bytes_to_hex_leading_zero() {
    assert_eq!(bytes_to_hex(&[0x0a]), "0a");
}

#[test]
fn bytes_to_hex_multi_byte() {
    assert_eq!(bytes_to_hex(&[0xde, 0xad, 0xbe, 0xef]), "deadbeef");
}

// =============================================================================
// generate_token
// =============================================================================

#[test]
fn generate_token_is_64_hex_chars() {
    let token = generate_token();
    assert_eq!(token.len(), 64);
    assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn generate_token_two_calls_differ() {
    assert_ne!(generate_token(), generate_token());
}

// =============================================================================
// hash_token
// =============================================================================

#[test]
fn hash_token_is_stable_hex() {
    let a = hash_token("abc123");
    assert_eq!(a, hash_token("abc123"));
    assert_ne!(a, hash_token("abc124"));
    assert_eq!(a.len(), 64);
    assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn hash_token_ignores_surrounding_whitespace() {
    assert_eq!(hash_token(" abc123\n"), hash_token("abc123"));
}

#[test]
fn hash_token_known_vector() {
    assert_eq!(hash_token("abc"), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
}

// =============================================================================
// Live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn create_validate_and_delete_session() {
    use crate::state::test_helpers::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let user = seed_user(&pool, "session-owner@example.com", shared::Role::User).await;

    let token = create_session(&pool, user.id, 1).await.expect("create_session");
    let found = validate_session(&pool, &token).await.expect("validate_session");
    assert_eq!(found.map(|u| u.id), Some(user.id));

    delete_session(&pool, &token).await.expect("delete_session");
    assert!(validate_session(&pool, &token).await.expect("validate").is_none());
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn rotate_session_invalidates_old_token_once() {
    use crate::state::test_helpers::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let user = seed_user(&pool, "rotate@example.com", shared::Role::User).await;
    let old = create_session(&pool, user.id, 1).await.expect("create_session");

    let new = rotate_session(&pool, &old, 1)
        .await
        .expect("rotate_session")
        .expect("old token was live");
    assert_ne!(new, old);
    assert!(validate_session(&pool, &old).await.expect("validate").is_none());
    assert!(validate_session(&pool, &new).await.expect("validate").is_some());

    // A second rotation with the consumed token fails.
    assert!(rotate_session(&pool, &old, 1).await.expect("rotate").is_none());
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn delete_user_sessions_revokes_all_tokens() {
    use crate::state::test_helpers::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let user = seed_user(&pool, "many-tabs@example.com", shared::Role::User).await;
    let a = create_session(&pool, user.id, 1).await.expect("create_session");
    let b = create_session(&pool, user.id, 1).await.expect("create_session");

    assert_eq!(delete_user_sessions(&pool, user.id).await.expect("delete"), 2);
    assert!(validate_session(&pool, &a).await.expect("validate").is_none());
    assert!(validate_session(&pool, &b).await.expect("validate").is_none());
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn sessions_table_holds_only_token_digests() {
    use crate::state::test_helpers::{integration_pool, seed_user};

    let pool = integration_pool().await;
    let user = seed_user(&pool, "digest@example.com", shared::Role::User).await;
    let token = create_session(&pool, user.id, 1).await.expect("create_session");

    let stored: Vec<String> = sqlx::query("SELECT token_hash FROM sessions WHERE user_id = $1")
        .bind(user.id)
        .fetch_all(&pool)
        .await
        .expect("select")
        .iter()
        .map(|row| row.get("token_hash"))
        .collect();
    assert_eq!(stored, vec![hash_token(&token)]);
    assert!(!stored.contains(&token));
}
