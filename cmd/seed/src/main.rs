//! Seeds the file-backed store with a demo profile and boards, then prints a
//! development bearer token for that profile.
//!
//! Usage: `seed [subject-id] [display-name]`

use std::sync::Arc;

use anyhow::Context;
use auth_adapters::TokenIssuer;
use chrono::Duration;
use configs::Settings;
use domains::{to_document, ContentUpdate, DocumentStore, NewBoard, SystemClock, UserProfile, USERS_COLLECTION};
use secrecy::ExposeSecret;
use serde_json::json;
use services::BoardService;
use storage_adapters::FileDocumentStore;
use tracing::info;

const DEFAULT_DATA_PATH: &str = "data/boards.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let settings = Settings::load().context("failed to load configuration")?;

    let mut args = std::env::args().skip(1);
    let subject = args.next().unwrap_or_else(|| "demo-user".into());
    let name = args.next().unwrap_or_else(|| "Demo User".into());
    let email = format!("{subject}@example.com");

    let path = settings
        .store
        .data_path
        .clone()
        .unwrap_or_else(|| DEFAULT_DATA_PATH.into());
    let store = Arc::new(FileDocumentStore::open(&path).await?);

    let profile = UserProfile {
        name,
        email: Some(email.clone()),
    };
    store
        .set(USERS_COLLECTION, &subject, to_document(&profile)?)
        .await?;

    let boards = BoardService::new(store.clone(), Arc::new(SystemClock));
    for (board_name, class_code, tags) in [
        ("Algebra", "M1", "math,algebra"),
        ("Cell Biology", "BIO-101", "biology,cells"),
        ("Essay Outline", "ENG-2", "writing"),
    ] {
        boards
            .create_board(
                &subject,
                NewBoard {
                    board_name: board_name.into(),
                    class_code: Some(class_code.into()),
                    tags: Some(tags.into()),
                },
            )
            .await?;
    }
    boards
        .save_board_content(
            &subject,
            "Algebra",
            ContentUpdate {
                drawing: Some(json!([{"x": 10, "y": 20}, {"x": 30, "y": 40}])),
                writing: Some(json!([{"text": "x^2 + 1", "color": "#222", "size": 18}])),
                ..ContentUpdate::default()
            },
        )
        .await?;
    info!(%path, %subject, "seeded profile and boards");

    let token = TokenIssuer::new(
        settings.auth.jwt_secret.expose_secret().as_bytes(),
        settings.auth.issuer.as_deref(),
    )
    .issue(&subject, Some(&email), Duration::days(30))?;

    println!("{token}");
    Ok(())
}
