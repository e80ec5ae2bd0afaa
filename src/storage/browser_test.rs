#![cfg(not(feature = "hydrate"))]

use super::*;

fn is_unavailable<T>(result: StorageResult<T>) -> bool {
    matches!(result, Err(StorageError::Unavailable(_)))
}

#[test]
fn constructors_map_to_expected_kind() {
    assert_eq!(BrowserStorage::persistent().kind(), StorageKind::Persistent);
    assert_eq!(BrowserStorage::session().kind(), StorageKind::Session);
}

#[test]
fn every_operation_is_unavailable_outside_browser() {
    let storage = BrowserStorage::persistent();
    assert!(is_unavailable(storage.get_item("jwt_token")));
    assert!(is_unavailable(storage.set_item("jwt_token", "t")));
    assert!(is_unavailable(storage.remove_item("jwt_token")));
}
