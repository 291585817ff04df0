use std::cell::RefCell;
use std::rc::Rc;

use futures::executor::block_on;
use shared::{ErrorBody, Role, User};

use super::*;
use crate::state::session::{SessionState, StoredTokenWrite, stored_token_write};

/// In-memory store that records every dispatched action.
#[derive(Default)]
struct Recorder {
    state: RefCell<SessionState>,
    actions: RefCell<Vec<SessionAction>>,
}

impl Recorder {
    fn signed_in(token: &str) -> Self {
        let recorder = Self::default();
        recorder.dispatch(SessionAction::SetToken(Some(token.to_owned())));
        recorder.dispatch(SessionAction::SetUser(Some(user())));
        recorder.actions.borrow_mut().clear();
        recorder
    }

    fn actions(&self) -> Vec<SessionAction> {
        self.actions.borrow().clone()
    }
}

impl Dispatch for Recorder {
    fn dispatch(&self, action: SessionAction) {
        self.actions.borrow_mut().push(action.clone());
        self.state.borrow_mut().apply(action);
    }

    fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }
}

/// A tab whose token writes go to a `localStorage` shared with other tabs,
/// following the same rule as `SessionStore`.
struct Tab {
    state: RefCell<SessionState>,
    storage: Rc<RefCell<Option<String>>>,
}

impl Tab {
    fn open(storage: &Rc<RefCell<Option<String>>>) -> Self {
        let tab = Self { state: RefCell::default(), storage: Rc::clone(storage) };
        let stored = storage.borrow().clone();
        tab.dispatch(SessionAction::SetToken(stored));
        tab
    }
}

impl Dispatch for Tab {
    fn dispatch(&self, action: SessionAction) {
        if let SessionAction::SetToken(token) = &action {
            let previous = self.token();
            let stored = self.storage.borrow().clone();
            match stored_token_write(token.as_deref(), previous.as_deref(), stored.as_deref()) {
                StoredTokenWrite::Save(token) => *self.storage.borrow_mut() = Some(token),
                StoredTokenWrite::Remove => *self.storage.borrow_mut() = None,
                StoredTokenWrite::Keep => {}
            }
        }
        self.state.borrow_mut().apply(action);
    }

    fn token(&self) -> Option<String> {
        self.state.borrow().token.clone()
    }
}

fn user() -> User {
    User {
        id: uuid::Uuid::nil(),
        name: "Ada".to_owned(),
        email: "ada@example.com".to_owned(),
        role: Role::User,
        created_at: "2024-01-01T00:00:00Z".to_owned(),
    }
}

fn login_response(token: &str) -> LoginResponse {
    LoginResponse { token: token.to_owned(), user: user() }
}

fn server_error(status: u16, error: &str) -> ApiError {
    ApiError::Server(ErrorBody { status, error: error.to_owned() })
}

// =============================================================
// login / signup
// =============================================================

#[test]
fn complete_login_dispatches_token_then_user_verbatim() {
    let store = Recorder::default();
    let response = complete_login(&store, Ok(login_response("t-1"))).unwrap();

    assert_eq!(response, login_response("t-1"));
    assert_eq!(
        store.actions(),
        vec![SessionAction::SetToken(Some("t-1".to_owned())), SessionAction::SetUser(Some(user()))]
    );
    assert!(store.state.borrow().is_signed_in());
}

#[test]
fn complete_login_failure_returns_payload_and_dispatches_nothing() {
    let store = Recorder::default();
    let err = complete_login(&store, Err(server_error(401, "Invalid email or password"))).unwrap_err();

    assert_eq!(err, server_error(401, "Invalid email or password"));
    assert!(store.actions().is_empty());
}

#[test]
fn sign_in_without_browser_surfaces_transport_error() {
    let store = Recorder::default();
    let body = LoginRequest { email: "ada@example.com".to_owned(), password: "pw".to_owned() };
    let err = block_on(sign_in(&store, &body)).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(store.actions().is_empty());
}

// =============================================================
// sign out
// =============================================================

#[test]
fn sign_out_clears_token_and_user_from_any_state() {
    for store in [Recorder::default(), Recorder::signed_in("t-1")] {
        sign_out(&store);
        assert_eq!(store.actions(), vec![SessionAction::SetToken(None), SessionAction::SetUser(None)]);
        assert_eq!(store.state.borrow().token, None);
        assert_eq!(store.state.borrow().user, None);
    }
}

#[test]
fn sign_out_and_revoke_clears_even_when_request_fails() {
    let store = Recorder::signed_in("t-1");
    block_on(sign_out_and_revoke(&store));
    assert!(!store.state.borrow().is_signed_in());
}

// =============================================================
// refresh
// =============================================================

#[test]
fn refresh_without_token_clears_session() {
    let store = Recorder::default();
    store.dispatch(SessionAction::SetUser(Some(user())));

    let result = block_on(refresh_token(&store)).unwrap();
    assert_eq!(result, None);
    assert_eq!(store.state.borrow().user, None);
    assert_eq!(store.state.borrow().token, None);
}

#[test]
fn complete_refresh_replaces_token_and_user() {
    let store = Recorder::signed_in("old");
    complete_refresh(&store, Ok(login_response("new"))).unwrap();

    assert_eq!(
        store.actions(),
        vec![SessionAction::SetUser(Some(user())), SessionAction::SetToken(Some("new".to_owned()))]
    );
    assert_eq!(store.state.borrow().token.as_deref(), Some("new"));
}

#[test]
fn refresh_failure_leaves_session_untouched() {
    let store = Recorder::signed_in("old");
    let err = block_on(refresh_token(&store)).unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(store.actions().is_empty());
    assert_eq!(store.state.borrow().token.as_deref(), Some("old"));
}

// =============================================================
// storage sync
// =============================================================

#[test]
fn storage_cleared_elsewhere_signs_out() {
    for stored in [None, Some(String::new()), Some("  ".to_owned())] {
        let store = Recorder::signed_in("t-1");
        assert!(!storage_changed(&store, stored));
        assert!(!store.state.borrow().is_signed_in());
        assert_eq!(store.state.borrow().token, None);
    }
}

#[test]
fn storage_token_from_other_tab_is_adopted() {
    let store = Recorder::signed_in("t-1");
    assert!(storage_changed(&store, Some("t-2".to_owned())));
    assert_eq!(store.state.borrow().token.as_deref(), Some("t-2"));
    assert!(store.state.borrow().user.is_some());
}

#[test]
fn storage_same_token_reports_no_change() {
    let store = Recorder::signed_in("t-1");
    assert!(!storage_changed(&store, Some("t-1".to_owned())));
    assert_eq!(store.actions(), vec![SessionAction::SetToken(Some("t-1".to_owned()))]);
}

// =============================================================
// concurrent restore across tabs
// =============================================================

#[test]
fn losing_refresh_race_adopts_winner_token_and_keeps_storage() {
    let storage = Rc::new(RefCell::new(Some("t-1".to_owned())));
    let tab_a = Tab::open(&storage);
    let tab_b = Tab::open(&storage);

    // A rotates t-1 first; B's refresh of t-1 is then rejected.
    complete_refresh(&tab_a, Ok(login_response("t-2"))).unwrap();
    assert_eq!(storage.borrow().as_deref(), Some("t-2"));

    let stored = storage.borrow().clone();
    let adopted = refresh_rejected(&tab_b, Some("t-1"), stored);

    assert_eq!(adopted.as_deref(), Some("t-2"));
    assert_eq!(tab_b.token().as_deref(), Some("t-2"));
    assert_eq!(storage.borrow().as_deref(), Some("t-2"));
    assert!(tab_a.state.borrow().is_signed_in());
}

#[test]
fn losing_tab_signing_out_before_winner_saves_does_not_sign_out_winner() {
    let storage = Rc::new(RefCell::new(Some("t-1".to_owned())));
    let tab_a = Tab::open(&storage);
    let tab_b = Tab::open(&storage);

    // B sees its 401 before A has stored the rotated token.
    let stored = storage.borrow().clone();
    assert_eq!(refresh_rejected(&tab_b, Some("t-1"), stored), None);
    let cleared_event = storage.borrow().clone();
    assert_eq!(cleared_event, None);

    complete_refresh(&tab_a, Ok(login_response("t-2"))).unwrap();

    // A handles B's stale clear after its own write.
    let current = storage.borrow().clone();
    let synced = crate::util::storage::latest_stored_token(cleared_event, current);
    assert!(!storage_changed(&tab_a, synced));
    assert_eq!(tab_a.token().as_deref(), Some("t-2"));
    assert_eq!(storage.borrow().as_deref(), Some("t-2"));

    // B then receives A's write and rejoins.
    assert!(storage_changed(&tab_b, Some("t-2".to_owned())));
    assert_eq!(tab_b.token().as_deref(), Some("t-2"));
}

#[test]
fn rejected_token_still_stored_signs_out_and_clears() {
    let storage = Rc::new(RefCell::new(Some("t-1".to_owned())));
    let tab = Tab::open(&storage);

    let stored = storage.borrow().clone();
    assert_eq!(refresh_rejected(&tab, Some("t-1"), stored), None);
    assert_eq!(tab.token(), None);
    assert_eq!(*storage.borrow(), None);
}

#[test]
fn sign_out_leaves_token_another_tab_stored() {
    let storage = Rc::new(RefCell::new(Some("t-1".to_owned())));
    let tab = Tab::open(&storage);
    *storage.borrow_mut() = Some("t-2".to_owned());

    sign_out(&tab);
    assert_eq!(tab.token(), None);
    assert_eq!(storage.borrow().as_deref(), Some("t-2"));
}
