use super::*;
use shared::{Role, User};

fn signed_in() -> SessionState {
    SessionState {
        token: Some("t-1".to_owned()),
        user: Some(User {
            id: uuid::Uuid::nil(),
            name: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
            role: Role::User,
            created_at: "2024-01-01T00:00:00Z".to_owned(),
        }),
        loading: false,
    }
}

#[test]
fn should_redirect_unauth_when_not_loading_and_user_missing() {
    let state = SessionState { loading: false, ..SessionState::default() };
    assert!(should_redirect_unauth(&state));
    assert!(!should_redirect_home(&state));
}

#[test]
fn should_not_redirect_while_loading() {
    let state = SessionState::initial();
    assert!(!should_redirect_unauth(&state));
    assert!(!should_redirect_home(&state));
}

#[test]
fn should_not_redirect_when_user_exists() {
    let state = signed_in();
    assert!(!should_redirect_unauth(&state));
    assert!(should_redirect_home(&state));
}

#[test]
fn token_without_user_is_not_signed_in() {
    let state = SessionState { user: None, ..signed_in() };
    assert!(should_redirect_unauth(&state));
}
