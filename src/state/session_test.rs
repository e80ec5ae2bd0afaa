use super::*;
use crate::storage::{KeyValueStore, MemoryStorage};

fn backends() -> (Arc<MemoryStorage>, Arc<MemoryStorage>, SessionStore) {
    let persistent = Arc::new(MemoryStorage::new());
    let session = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(persistent.clone(), session.clone());
    (persistent, session, store)
}

fn payload(token: &str) -> AuthPayload {
    AuthPayload {
        token: token.to_owned(),
        email: owned("fan@example.com"),
        username: owned("fan"),
    }
}

fn get(store: &MemoryStorage, key: &str) -> Option<String> {
    store.get_item(key).unwrap()
}

fn put(store: &MemoryStorage, key: &str, value: &str) {
    store.set_item(key, value).unwrap();
}

fn owned(value: &str) -> Option<String> {
    Some(value.to_owned())
}

fn unavailable_store() -> SessionStore {
    let persistent = Arc::new(MemoryStorage::unavailable());
    SessionStore::new(persistent, Arc::new(MemoryStorage::unavailable()))
}

// =============================================================
// Initial state
// =============================================================

#[test]
fn new_store_is_logged_out() {
    let (_, _, store) = backends();
    assert!(!store.is_logged_in());
    assert!(store.user().is_none());
    assert!(!store.remember());
    assert_eq!(store.load_policy(), LoadPolicy::RememberGated);
}

// =============================================================
// save_auth
// =============================================================

#[test]
fn save_with_remember_writes_persistent_only() {
    let (persistent, session, mut store) = backends();
    store.save_auth(payload("T1"), true);

    assert!(store.is_logged_in());
    assert!(store.remember());
    assert_eq!(store.token(), Some("T1"));
    assert_eq!(get(&persistent, StorageKeys::TOKEN), owned("T1"));
    let email = get(&persistent, StorageKeys::EMAIL);
    assert_eq!(email, owned("fan@example.com"));
    assert_eq!(get(&persistent, StorageKeys::USERNAME), owned("fan"));
    assert_eq!(get(&persistent, StorageKeys::REMEMBER_ME), owned("true"));
    assert!(session.is_empty());
}

#[test]
fn save_without_remember_writes_session_only() {
    let (persistent, session, mut store) = backends();
    store.save_auth(payload("T2"), false);

    assert!(store.is_logged_in());
    assert!(!store.remember());
    assert_eq!(get(&session, StorageKeys::TOKEN), owned("T2"));
    assert_eq!(get(&persistent, StorageKeys::TOKEN), None);
    assert_eq!(get(&persistent, StorageKeys::REMEMBER_ME), None);
}

#[test]
fn save_removes_stale_entries_from_other_backend() {
    let (persistent, session, mut store) = backends();
    store.save_auth(payload("OLD"), true);
    store.save_auth(payload("NEW"), false);

    assert_eq!(get(&persistent, StorageKeys::TOKEN), None);
    assert_eq!(get(&persistent, StorageKeys::EMAIL), None);
    assert_eq!(get(&persistent, StorageKeys::REMEMBER_ME), None);
    assert_eq!(get(&session, StorageKeys::TOKEN), owned("NEW"));
    assert_eq!(store.token(), Some("NEW"));
}

#[test]
fn save_skips_absent_optional_fields() {
    let (_, session, mut store) = backends();
    let payload = AuthPayload {
        token: "T".to_owned(),
        email: None,
        username: None,
    };
    store.save_auth(payload, false);

    assert_eq!(get(&session, StorageKeys::EMAIL), None);
    assert_eq!(get(&session, StorageKeys::USERNAME), None);
    assert_eq!(store.email(), None);
    assert_eq!(store.username(), None);
    assert!(store.is_logged_in());
}

#[test]
fn save_with_empty_token_stays_logged_out() {
    let (_, session, mut store) = backends();
    store.save_auth(payload(""), false);

    assert!(!store.is_logged_in());
    assert_eq!(get(&session, StorageKeys::TOKEN), None);
}

#[test]
fn payload_deserializes_login_response() {
    let body = r#"{"token":"jwt","username":"fan","email":"fan@example.com","type":"Bearer"}"#;
    let parsed: AuthPayload = serde_json::from_str(body).unwrap();
    assert_eq!(parsed, payload("jwt"));

    let token_only: AuthPayload = serde_json::from_str(r#"{"token":"jwt"}"#).unwrap();
    assert_eq!(token_only.email, None);
}

// =============================================================
// clear_auth
// =============================================================

#[test]
fn clear_removes_all_keys_from_both_backends() {
    let (persistent, session, mut store) = backends();
    store.save_auth(payload("T1"), true);
    store.mark_profile_completed(true);
    store.set_redirect_after_login("/MyBookingsPage");
    for key in StorageKeys::SESSION {
        session.set_item(key, "stale").unwrap();
    }

    store.clear_auth();

    assert!(!store.is_logged_in());
    assert!(!store.remember());
    assert!(persistent.is_empty());
    assert!(session.is_empty());
}

#[test]
fn clear_is_idempotent() {
    let (persistent, session, mut store) = backends();
    store.clear_auth();
    store.clear_auth();
    assert!(!store.is_logged_in());
    assert!(persistent.is_empty());
    assert!(session.is_empty());
}

#[test]
fn cleared_session_is_not_resurrected_by_load() {
    let (_, _, mut store) = backends();
    store.save_auth(payload("T1"), true);
    store.clear_auth();
    store.load_from_storage();
    assert!(!store.is_logged_in());
}

// =============================================================
// load_from_storage (remember-gated)
// =============================================================

#[test]
fn load_with_remember_reads_persistent_backend() {
    let (persistent, session, mut store) = backends();
    put(&persistent, StorageKeys::REMEMBER_ME, "true");
    put(&persistent, StorageKeys::TOKEN, "T1");
    put(&session, StorageKeys::TOKEN, "SESSION");

    store.load_from_storage();

    assert_eq!(store.token(), Some("T1"));
    assert!(store.remember());
}

#[test]
fn load_without_remember_reads_session_backend() {
    let (persistent, session, mut store) = backends();
    put(&persistent, StorageKeys::TOKEN, "PERSISTENT");
    put(&session, StorageKeys::TOKEN, "T2");
    put(&session, StorageKeys::USERNAME, "fan");

    store.load_from_storage();

    assert_eq!(store.token(), Some("T2"));
    assert_eq!(store.username(), Some("fan"));
    assert!(!store.remember());
}

#[test]
fn load_non_true_remember_flag_selects_session_backend() {
    let (persistent, session, mut store) = backends();
    put(&persistent, StorageKeys::REMEMBER_ME, "yes");
    put(&persistent, StorageKeys::TOKEN, "PERSISTENT");
    put(&session, StorageKeys::TOKEN, "T2");

    store.load_from_storage();

    assert_eq!(store.token(), Some("T2"));
    assert!(!store.remember());
}

#[test]
fn load_tokenless_record_yields_no_user() {
    let (persistent, _, mut store) = backends();
    put(&persistent, StorageKeys::REMEMBER_ME, "true");
    put(&persistent, StorageKeys::EMAIL, "leak@example.com");

    store.load_from_storage();

    assert!(!store.is_logged_in());
    assert_eq!(store.email(), None);
    assert!(store.remember());
}

#[test]
fn load_treats_empty_fields_as_absent() {
    let (_, session, mut store) = backends();
    put(&session, StorageKeys::TOKEN, "T");
    put(&session, StorageKeys::EMAIL, "");

    store.load_from_storage();

    assert_eq!(store.token(), Some("T"));
    assert_eq!(store.email(), None);
}

#[test]
fn load_logs_out_when_storage_was_cleared_externally() {
    let (_, session, mut store) = backends();
    store.save_auth(payload("T2"), false);
    session.clear();

    store.load_from_storage();

    assert!(!store.is_logged_in());
}

// =============================================================
// load_from_storage (persistent-first)
// =============================================================

#[test]
fn persistent_first_prefers_persistent_token() {
    let (persistent, session, store) = backends();
    let mut store = store.with_load_policy(LoadPolicy::PersistentFirst);
    put(&persistent, StorageKeys::TOKEN, "P");
    put(&session, StorageKeys::TOKEN, "S");

    store.load_from_storage();

    assert_eq!(store.token(), Some("P"));
    assert!(store.remember());
}

#[test]
fn persistent_first_falls_back_to_session() {
    let (_, session, store) = backends();
    let mut store = store.with_load_policy(LoadPolicy::PersistentFirst);
    put(&session, StorageKeys::TOKEN, "S");

    store.load_from_storage();

    assert_eq!(store.token(), Some("S"));
    assert!(!store.remember());
}

// =============================================================
// Storage failures
// =============================================================

#[test]
fn unavailable_storage_never_panics_and_stays_logged_out() {
    let mut store = unavailable_store();

    store.load_from_storage();
    assert!(!store.is_logged_in());

    store.clear_auth();
    assert!(!store.is_logged_in());

    assert!(store.should_complete_profile());
    assert_eq!(store.take_redirect_after_login(), None);
}

#[test]
fn save_updates_memory_even_when_storage_fails() {
    let mut store = unavailable_store();
    store.save_auth(payload("T"), true);
    assert_eq!(store.token(), Some("T"));
}

#[test]
fn load_failure_resets_previous_login() {
    let persistent = Arc::new(MemoryStorage::unavailable());
    let session = Arc::new(MemoryStorage::new());
    let mut store = SessionStore::new(persistent, session);
    store.save_auth(payload("T"), false);
    assert!(store.is_logged_in());

    store.load_from_storage();

    assert!(!store.is_logged_in());
}

// =============================================================
// Profile flag and redirect intent
// =============================================================

#[test]
fn should_complete_profile_unless_flag_is_exactly_true() {
    let (persistent, _, store) = backends();
    assert!(store.should_complete_profile());

    for value in ["false", "TRUE", "1", "", "true "] {
        put(&persistent, StorageKeys::PROFILE_COMPLETED, value);
        assert!(store.should_complete_profile(), "value {value:?}");
    }

    put(&persistent, StorageKeys::PROFILE_COMPLETED, "true");
    assert!(!store.should_complete_profile());
}

#[test]
fn mark_profile_completed_round_trips_through_flag() {
    let (_, _, store) = backends();
    store.mark_profile_completed(true);
    assert!(!store.should_complete_profile());
    store.mark_profile_completed(false);
    assert!(store.should_complete_profile());
}

#[test]
fn redirect_intent_is_taken_once() {
    let (persistent, _, store) = backends();
    store.set_redirect_after_login("/MyEventsPage");

    assert_eq!(store.redirect_after_login(), owned("/MyEventsPage"));
    assert_eq!(store.take_redirect_after_login(), owned("/MyEventsPage"));
    assert_eq!(store.take_redirect_after_login(), None);
    assert_eq!(get(&persistent, StorageKeys::REDIRECT_AFTER_LOGIN), None);
}

// =============================================================
// Scenarios
// =============================================================

#[test]
fn remembered_login_survives_reopen() {
    let (persistent, session, mut store) = backends();
    store.save_auth(payload("T1"), true);

    session.clear();
    let mut reopened = SessionStore::new(persistent, session);
    reopened.load_from_storage();

    assert!(reopened.is_logged_in());
    assert_eq!(reopened.token(), Some("T1"));
    assert!(reopened.remember());
}

#[test]
fn tab_scoped_login_is_lost_on_tab_close() {
    let (persistent, session, mut store) = backends();
    store.save_auth(payload("T2"), false);

    session.clear();
    let mut reopened = SessionStore::new(persistent, session);
    reopened.load_from_storage();

    assert!(!reopened.is_logged_in());
}
