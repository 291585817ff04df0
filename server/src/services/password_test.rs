use super::*;

// =============================================================================
// normalize_email
// =============================================================================

#[test]
fn normalize_email_trims_and_lowercases() {
    assert_eq!(normalize_email("  Grace@Example.COM "), Some("grace@example.com".to_owned()));
}

#[test]
fn normalize_email_rejects_invalid_values() {
    assert_eq!(normalize_email(""), None);
    assert_eq!(normalize_email("grace"), None);
    assert_eq!(normalize_email("@example.com"), None);
    assert_eq!(normalize_email("grace@"), None);
    assert_eq!(normalize_email("a@b@c"), None);
}

// =============================================================================
// validate_password / validate_new_password
// =============================================================================

#[test]
fn validate_password_enforces_bounds() {
    assert_eq!(validate_password("short"), Err(PasswordError::TooShort));
    assert_eq!(validate_password("exactly8"), Ok(()));
    assert_eq!(validate_password(&"x".repeat(MAX_PASSWORD_LEN)), Ok(()));
    assert_eq!(validate_password(&"x".repeat(MAX_PASSWORD_LEN + 1)), Err(PasswordError::TooLong));
}

#[test]
fn validate_password_counts_characters_not_bytes() {
    // Seven multi-byte characters are still too short.
    assert_eq!(validate_password("ééééééé"), Err(PasswordError::TooShort));
    assert_eq!(validate_password("éééééééé"), Ok(()));
}

#[test]
fn validate_new_password_reports_mismatch_first() {
    assert_eq!(validate_new_password("abc", "abd"), Err(PasswordError::Mismatch));
    assert_eq!(validate_new_password("abc", "abc"), Err(PasswordError::TooShort));
    assert_eq!(validate_new_password("longenough", "longenough"), Ok(()));
}

#[test]
fn password_error_messages_are_user_facing() {
    assert_eq!(PasswordError::TooShort.to_string(), "Password must be at least 8 characters");
    assert_eq!(PasswordError::Mismatch.to_string(), "Passwords do not match");
}

// =============================================================================
// hash_password / verify_password
// =============================================================================

#[test]
fn hash_then_verify_accepts_correct_password() {
    let hash = hash_password("correct horse").unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(verify_password("correct horse", &hash));
}

#[test]
fn verify_rejects_wrong_password() {
    let hash = hash_password("correct horse").unwrap();
    assert!(!verify_password("battery staple", &hash));
}

#[test]
fn hashes_are_salted() {
    let a = hash_password("same input").unwrap();
    let b = hash_password("same input").unwrap();
    assert_ne!(a, b);
}

#[test]
fn verify_rejects_malformed_hash() {
    assert!(!verify_password("anything", "not-a-phc-string"));
    assert!(!verify_password("anything", ""));
}

#[tokio::test]
async fn blocking_wrappers_agree_with_sync_versions() {
    let hash = hash_password_blocking("from the pool".to_owned()).await.unwrap();
    assert!(verify_password_blocking("from the pool".to_owned(), hash.clone()).await);
    assert!(!verify_password_blocking("nope".to_owned(), hash).await);
}

#[test]
fn decoy_hash_is_real_argon2() {
    assert!(DECOY_HASH.starts_with("$argon2id$"));
    assert!(PasswordHash::new(&DECOY_HASH).is_ok());
}

#[test]
fn decoy_hash_rejects_ordinary_passwords() {
    assert!(!verify_password("hunter22", &DECOY_HASH));
}
