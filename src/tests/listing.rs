use axum::http::StatusCode;
use serde_json::json;

use crate::tests::helper;

#[tokio::test]
async fn test_archived_visibility() {
    let mut app = helper::setup_test_app().await;

    let kept = helper::create_note(&mut app, &helper::note_payload("kept", "2024-01-01")).await;
    let archived =
        helper::create_note(&mut app, &helper::note_payload("archived", "2024-01-02")).await;

    let toggle = serde_json::from_value(json!({ "is_archived": true })).unwrap();
    let (status_code, _, _) = helper::maybe_update_note(&mut app, archived.id, &toggle).await;
    assert_eq!(StatusCode::OK, status_code);

    // excluded by default
    let ids = helper::list_note_ids(&mut app, "").await;
    assert_eq!(vec![kept.id], ids);

    // included on request, newest date first
    let ids = helper::list_note_ids(&mut app, "?showArchived=true").await;
    assert_eq!(vec![archived.id, kept.id], ids);

    // no archived note in an explicit showArchived=false listing
    let (status_code, notes) = helper::list_notes(&mut app, "?showArchived=false").await;
    assert_eq!(StatusCode::OK, status_code);
    assert!(notes.unwrap().iter().all(|note| !note.is_archived));
}

#[tokio::test]
async fn test_pinned_first_then_date_then_creation() {
    let mut app = helper::setup_test_app().await;

    // two notes on the same day, one older note, one pinned oldest note
    let early = helper::create_note(&mut app, &helper::note_payload("early", "2024-03-10")).await;
    let late = helper::create_note(&mut app, &helper::note_payload("late", "2024-03-10")).await;
    let older = helper::create_note(&mut app, &helper::note_payload("older", "2024-03-01")).await;

    let mut payload = helper::note_payload("pinned", "2024-02-01");
    payload.insert("is_pinned".to_string(), json!(true));
    let pinned = helper::create_note(&mut app, &payload).await;

    // pinned first despite its old date, then date desc, created_at desc
    let ids = helper::list_note_ids(&mut app, "").await;
    assert_eq!(vec![pinned.id, late.id, early.id, older.id], ids);

    // range views suppress the pinned prefix
    let ids = helper::list_note_ids(&mut app, "?ignorePinned=true").await;
    assert_eq!(vec![late.id, early.id, older.id, pinned.id], ids);
}

#[tokio::test]
async fn test_sort_by_updated_and_alpha() {
    let mut app = helper::setup_test_app().await;

    let banana = helper::create_note(&mut app, &helper::note_payload("banana", "2024-01-01")).await;
    let apple = helper::create_note(&mut app, &helper::note_payload("apple", "2024-01-02")).await;
    let cherry = helper::create_note(&mut app, &helper::note_payload("cherry", "2024-01-03")).await;

    // touching the oldest note puts it on top of the updated sort
    let edit = serde_json::from_value(json!({ "content": "banana" })).unwrap();
    let (status_code, _, _) = helper::maybe_update_note(&mut app, banana.id, &edit).await;
    assert_eq!(StatusCode::OK, status_code);

    let ids = helper::list_note_ids(&mut app, "?sortBy=updated").await;
    assert_eq!(vec![banana.id, cherry.id, apple.id], ids);

    let ids = helper::list_note_ids(&mut app, "?sortBy=alpha").await;
    assert_eq!(vec![apple.id, banana.id, cherry.id], ids);

    // unknown sort keys are malformed
    let (status_code, _) = helper::list_notes(&mut app, "?sortBy=upside-down").await;
    assert_eq!(StatusCode::BAD_REQUEST, status_code);
}

#[tokio::test]
async fn test_date_filters() {
    let mut app = helper::setup_test_app().await;

    let first = helper::create_note(&mut app, &helper::note_payload("first", "2024-01-01")).await;
    let second = helper::create_note(&mut app, &helper::note_payload("second", "2024-01-15")).await;
    let third = helper::create_note(&mut app, &helper::note_payload("third", "2024-02-01")).await;

    // single day
    let ids = helper::list_note_ids(&mut app, "?date=2024-01-15").await;
    assert_eq!(vec![second.id], ids);

    // inclusive range
    let ids = helper::list_note_ids(&mut app, "?startDate=2024-01-01&endDate=2024-01-31").await;
    assert_eq!(vec![second.id, first.id], ids);

    // open-ended range
    let ids = helper::list_note_ids(&mut app, "?startDate=2024-01-10").await;
    assert_eq!(vec![third.id, second.id], ids);

    // an end date alone is ignored
    let ids = helper::list_note_ids(&mut app, "?endDate=2024-01-31").await;
    assert_eq!(vec![third.id, second.id, first.id], ids);
}

#[tokio::test]
async fn test_search_and_tag_filters() {
    let mut app = helper::setup_test_app().await;

    let mut payload = helper::note_payload("<p>Groceries for the week</p>", "2024-01-01");
    payload.insert("tags".to_string(), json!(["errands", "home"]));
    let groceries = helper::create_note(&mut app, &payload).await;

    let mut payload = helper::note_payload("<p>Standup notes</p>", "2024-01-02");
    payload.insert("tags".to_string(), json!(["work"]));
    let standup = helper::create_note(&mut app, &payload).await;

    // case-insensitive substring on the content
    let ids = helper::list_note_ids(&mut app, "?search=GROCERIES").await;
    assert_eq!(vec![groceries.id], ids);

    // exact tag membership
    let ids = helper::list_note_ids(&mut app, "?tag=work").await;
    assert_eq!(vec![standup.id], ids);

    // a prefix of a tag is not a match
    let ids = helper::list_note_ids(&mut app, "?tag=wor").await;
    assert_eq!(Vec::<i64>::new(), ids);

    // empty filter values are no filter at all
    let ids = helper::list_note_ids(&mut app, "?search=&tag=").await;
    assert_eq!(vec![standup.id, groceries.id], ids);
}
