use super::*;

#[test]
fn validate_reset_input_returns_trimmed_token() {
    assert_eq!(validate_reset_input("new-password", "new-password", Some(" abc ")), Ok("abc".to_owned()));
}

#[test]
fn validate_reset_input_requires_token() {
    assert_eq!(validate_reset_input("new-password", "new-password", None), Err(MISSING_TOKEN));
    assert_eq!(validate_reset_input("new-password", "new-password", Some("  ")), Err(MISSING_TOKEN));
}

#[test]
fn validate_reset_input_rejects_mismatch() {
    assert_eq!(validate_reset_input("new-password", "other", Some("abc")), Err("Passwords do not match"));
}

#[test]
fn validate_reset_input_requires_password() {
    assert_eq!(validate_reset_input("", "", Some("abc")), Err("Enter a new password."));
}
