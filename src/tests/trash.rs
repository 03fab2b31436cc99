use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_trash_and_normal_listings_are_exclusive() {
    let mut app = helper::setup_test_app().await;

    let kept = helper::create_note(&mut app, &helper::note_payload("kept", "2024-01-01")).await;
    let trashed =
        helper::create_note(&mut app, &helper::note_payload("trashed", "2024-01-02")).await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, trashed.id, false).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // the normal listing loses the note, the trash listing gains it
    let ids = helper::list_note_ids(&mut app, "").await;
    assert_eq!(vec![kept.id], ids);

    let ids = helper::list_note_ids(&mut app, "?showDeleted=true").await;
    assert_eq!(vec![trashed.id], ids);

    // trashed notes carry their deletion timestamp
    let (status_code, notes) = helper::list_notes(&mut app, "?showDeleted=true").await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(notes.unwrap().iter().all(|note| note.deleted_at.is_some()));

    // a single fetch still finds the trashed note
    let (status_code, note, _) = helper::single_note(&mut app, trashed.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(note.unwrap().deleted_at.is_some());
}

#[tokio::test]
async fn test_archived_note_lands_in_the_same_trash() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, &helper::note_payload("archived", "2024-01-01")).await;

    let toggle = serde_json::from_value(json!({ "is_archived": true })).unwrap();
    let (status_code, _, _) = helper::maybe_update_note(&mut app, note.id, &toggle).await;
    assert_eq!(StatusCode::OK, status_code);

    let (status_code, _) = helper::maybe_delete_note(&mut app, note.id, false).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // the archived flag does not hide a note from the trash listing
    let ids = helper::list_note_ids(&mut app, "?showDeleted=true").await;
    assert_eq!(vec![note.id], ids);
}

#[tokio::test]
async fn test_restore() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, &helper::note_payload("note", "2024-01-01")).await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, note.id, false).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // restore clears the marker
    let (status_code, restored, _) = helper::maybe_restore_note(&mut app, note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(None, restored.unwrap().deleted_at);

    // and the note is back in the normal listing
    let ids = helper::list_note_ids(&mut app, "").await;
    assert_eq!(vec![note.id], ids);

    let ids = helper::list_note_ids(&mut app, "?showDeleted=true").await;
    assert_eq!(Vec::<i64>::new(), ids);
}

#[tokio::test]
async fn test_restore_of_an_active_note_is_a_no_match() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, &helper::note_payload("active", "2024-01-01")).await;

    let (status_code, _, error) = helper::maybe_restore_note(&mut app, note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note is not in the trash".to_string()), error);

    // the note is untouched
    let (status_code, fetched, _) = helper::single_note(&mut app, note.id).await;
    assert_eq!(StatusCode::OK, status_code);
    assert_eq!(note, fetched.unwrap());

    // restoring an unknown note is a plain not-found
    let (status_code, _, error) = helper::maybe_restore_note(&mut app, 42).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);
}

#[tokio::test]
async fn test_permanent_delete_is_terminal() {
    let mut app = helper::setup_test_app().await;

    let note = helper::create_note(&mut app, &helper::note_payload("doomed", "2024-01-01")).await;

    let (status_code, _) = helper::maybe_delete_note(&mut app, note.id, false).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    let (status_code, _) = helper::maybe_delete_note(&mut app, note.id, true).await;
    assert_eq!(StatusCode::NO_CONTENT, status_code);

    // gone from every listing, including the trash
    let ids = helper::list_note_ids(&mut app, "").await;
    assert_eq!(Vec::<i64>::new(), ids);

    let ids = helper::list_note_ids(&mut app, "?showDeleted=true").await;
    assert_eq!(Vec::<i64>::new(), ids);

    let (status_code, _, error) = helper::single_note(&mut app, note.id).await;
    assert_eq!(StatusCode::NOT_FOUND, status_code);
    assert_eq!(Some("Note not found".to_string()), error);
}
