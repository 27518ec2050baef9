//! Board repository behaviour over the in-memory document store.

use domains::{ContentUpdate, DocumentStore, NewBoard, BOARDS_COLLECTION};
use integration_tests::fixtures::board_service;
use serde_json::json;

fn new_board(name: &str, class_code: Option<&str>, tags: Option<&str>) -> NewBoard {
    NewBoard {
        board_name: name.into(),
        class_code: class_code.map(str::to_owned),
        tags: tags.map(str::to_owned),
    }
}

#[tokio::test]
async fn created_boards_have_unique_ids_and_equal_timestamps() {
    let (service, _) = board_service();

    let mut ids = Vec::new();
    for name in ["Algebra", "Algebra", "Geometry"] {
        let board = service.create_board("u1", new_board(name, None, None)).await.unwrap();
        assert_eq!(board.user_id, "u1");
        assert_eq!(board.created_at, board.updated_at);
        ids.push(board.board_id);
    }

    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3, "duplicate names still get distinct ids");
}

#[tokio::test]
async fn listing_is_scoped_to_owner_and_newest_first() {
    let (service, _) = board_service();
    service.create_board("u1", new_board("First", None, None)).await.unwrap();
    service.create_board("u2", new_board("Other", None, None)).await.unwrap();
    service.create_board("u1", new_board("Second", None, None)).await.unwrap();
    service.create_board("u1", new_board("Third", None, None)).await.unwrap();

    // Touching the oldest board moves it to the front.
    service
        .save_board_content("u1", "First", ContentUpdate::default())
        .await
        .unwrap();

    let boards = service.get_user_boards("u1").await.unwrap();
    let names: Vec<_> = boards.iter().map(|b| b.board_name.as_str()).collect();
    assert_eq!(names, ["First", "Third", "Second"]);
    assert!(boards.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));

    assert!(service.get_user_boards("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn algebra_scenario_search_hits_and_misses() {
    let (service, _) = board_service();
    service
        .create_board("u1", new_board("Algebra", Some("M1"), Some("math,algebra")))
        .await
        .unwrap();

    let boards = service.get_user_boards("u1").await.unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].board_name, "Algebra");

    let hits = service.search_user_boards("u1", Some("math")).await.unwrap();
    assert_eq!(hits, boards);

    assert!(service.search_user_boards("u1", Some("bio")).await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_search_equals_listing_and_filtered_search_keeps_order() {
    let (service, _) = board_service();
    service.create_board("u1", new_board("Cells", Some("BIO-101"), None)).await.unwrap();
    service.create_board("u1", new_board("Algebra", Some("M1"), Some("Math"))).await.unwrap();
    service.create_board("u1", new_board("Genetics", None, Some("biology"))).await.unwrap();
    service.create_board("u1", new_board("Calculus", Some("M2"), Some("math"))).await.unwrap();

    let listing = service.get_user_boards("u1").await.unwrap();
    assert_eq!(service.search_user_boards("u1", None).await.unwrap(), listing);
    assert_eq!(service.search_user_boards("u1", Some("")).await.unwrap(), listing);

    let hits = service.search_user_boards("u1", Some("BIO")).await.unwrap();
    let names: Vec<_> = hits.iter().map(|b| b.board_name.as_str()).collect();
    assert_eq!(names, ["Genetics", "Cells"]);

    // Every hit appears in the listing in the same relative order.
    let positions: Vec<_> = hits
        .iter()
        .map(|hit| listing.iter().position(|b| b.board_id == hit.board_id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn save_then_get_applies_defaults() {
    let (service, _) = board_service();
    service
        .save_board_content(
            "u1",
            "Math101",
            ContentUpdate {
                image: Some(json!("data:image/png;base64,AAAA")),
                drawing: None,
                writing: Some(json!([{"text": "x", "font": "serif"}])),
                writing_window: Some(json!({"x": 0, "y": 0, "w": 200, "h": 100})),
            },
        )
        .await
        .unwrap();

    let content = service.get_board_content("u1", "Math101").await.unwrap();
    assert_eq!(content.image, Some(json!("data:image/png;base64,AAAA")));
    assert_eq!(content.drawing, json!([]));
    assert_eq!(content.writing, json!([{"text": "x", "font": "serif"}]));
    assert_eq!(content.writing_window, Some(json!({"x": 0, "y": 0, "w": 200, "h": 100})));
}

#[tokio::test]
async fn second_save_updates_the_same_board() {
    let (service, store) = board_service();

    service
        .save_board_content(
            "u1",
            "Algebra",
            ContentUpdate {
                drawing: Some(json!([{"x": 1, "y": 2}])),
                image: Some(json!("data:thumb")),
                ..ContentUpdate::default()
            },
        )
        .await
        .unwrap();
    let first = service.get_user_boards("u1").await.unwrap().remove(0);

    service
        .save_board_content(
            "u1",
            "Algebra",
            ContentUpdate {
                drawing: Some(json!([{"x": 3, "y": 4}])),
                ..ContentUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.len(BOARDS_COLLECTION), 1);
    let second = service.get_user_boards("u1").await.unwrap().remove(0);
    assert_eq!(second.board_id, first.board_id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at > first.updated_at);
    assert_eq!(second.drawing, json!([{"x": 3, "y": 4}]));

    // A falsy image clears the stored thumbnail field entirely.
    let raw = store.get(BOARDS_COLLECTION, &second.board_id).await.unwrap().unwrap();
    assert!(raw.field("image").is_none());
    assert_eq!(second.image, None);
}

#[tokio::test]
async fn save_targets_existing_board_created_from_dashboard() {
    let (service, store) = board_service();
    let created = service
        .create_board("u1", new_board("Algebra", Some("M1"), Some("math")))
        .await
        .unwrap();

    service
        .save_board_content(
            "u1",
            "Algebra",
            ContentUpdate {
                writing: Some(json!([{"text": "hello"}])),
                ..ContentUpdate::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.len(BOARDS_COLLECTION), 1);
    let board = service.get_user_boards("u1").await.unwrap().remove(0);
    assert_eq!(board.board_id, created.board_id);
    assert_eq!(board.class_code.as_deref(), Some("M1"));
    assert_eq!(board.tags.as_deref(), Some("math"));
    assert_eq!(board.writing, json!([{"text": "hello"}]));
}

#[tokio::test]
async fn save_under_another_owner_does_not_touch_existing_board() {
    let (service, store) = board_service();
    service.create_board("u1", new_board("Algebra", None, None)).await.unwrap();

    service
        .save_board_content("u2", "Algebra", ContentUpdate::default())
        .await
        .unwrap();

    assert_eq!(store.len(BOARDS_COLLECTION), 2);
    assert_eq!(service.get_user_boards("u1").await.unwrap().len(), 1);
    assert_eq!(service.get_user_boards("u2").await.unwrap().len(), 1);
}

#[tokio::test]
async fn names_are_keys_exactly_as_sent() {
    let (service, store) = board_service();
    service.create_board("u1", new_board(" Algebra ", None, None)).await.unwrap();
    service.create_board("u1", new_board("", None, None)).await.unwrap();

    service
        .save_board_content("u1", " Algebra ", ContentUpdate::default())
        .await
        .unwrap();
    service
        .save_board_content("u1", "", ContentUpdate::default())
        .await
        .unwrap();
    assert_eq!(store.len(BOARDS_COLLECTION), 2);

    service
        .save_board_content("u1", "Algebra", ContentUpdate::default())
        .await
        .unwrap();
    assert_eq!(store.len(BOARDS_COLLECTION), 3);
}

#[tokio::test]
async fn content_of_unknown_board_is_empty_payload() {
    let (service, _) = board_service();
    let content = service.get_board_content("u1", "Nothing").await.unwrap();

    assert_eq!(
        serde_json::to_value(content).unwrap(),
        json!({"image": null, "drawing": [], "writing": [], "writingWindow": null})
    );
}

#[tokio::test]
async fn delete_by_non_owner_leaves_board_in_place() {
    let (service, store) = board_service();
    let board = service.create_board("u1", new_board("Algebra", None, None)).await.unwrap();

    assert!(!service.delete_board(&board.board_id, "u2").await.unwrap());
    assert!(!service.delete_board("no-such-board", "u2").await.unwrap());

    let remaining = service.get_user_boards("u1").await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].board_id, board.board_id);
    assert_eq!(store.len(BOARDS_COLLECTION), 1);

    assert!(service.delete_board(&board.board_id, "u1").await.unwrap());
    assert!(service.get_user_boards("u1").await.unwrap().is_empty());
    assert!(!service.delete_board(&board.board_id, "u1").await.unwrap());
}
