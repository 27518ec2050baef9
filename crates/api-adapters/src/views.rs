//! Askama page models for the dashboard and search views.

use askama::Template;
use domains::{Board, CallerIdentity};
use serde_json::Value;

/// One row of a board listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCard {
    pub board_id: String,
    pub board_name: String,
    pub class_code: String,
    pub tags: String,
    pub image: Option<String>,
    pub updated_at: String,
    pub open_href: String,
}

impl From<&Board> for BoardCard {
    fn from(board: &Board) -> Self {
        Self {
            board_id: board.board_id.clone(),
            board_name: board.board_name.clone(),
            class_code: board.class_code.clone().unwrap_or_default(),
            tags: board.tags.clone().unwrap_or_default(),
            image: board
                .image
                .as_ref()
                .and_then(Value::as_str)
                .filter(|i| !i.is_empty())
                .map(str::to_owned),
            updated_at: board.updated_at.format("%Y-%m-%d %H:%M").to_string(),
            open_href: whiteboard_href(&[("name", board.board_name.as_str())]),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    pub greeting: String,
    pub query: String,
    pub boards: Vec<BoardCard>,
    pub empty_message: &'static str,
    pub load_failed: bool,
}

impl DashboardPage {
    pub fn new(caller: &CallerIdentity, boards: &[Board], load_failed: bool) -> Self {
        Self {
            greeting: greeting(caller),
            query: String::new(),
            boards: boards.iter().map(BoardCard::from).collect(),
            empty_message: "No boards yet. Create one above.",
            load_failed,
        }
    }
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchPage {
    pub greeting: String,
    pub query: String,
    pub boards: Vec<BoardCard>,
    pub empty_message: &'static str,
}

impl SearchPage {
    pub fn new(caller: &CallerIdentity, boards: &[Board], query: Option<&str>) -> Self {
        Self {
            greeting: greeting(caller),
            query: query.unwrap_or_default().to_owned(),
            boards: boards.iter().map(BoardCard::from).collect(),
            empty_message: "No boards match your search.",
        }
    }
}

/// `/whiteboard?…` with form-encoded parameters.
pub fn whiteboard_href(params: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    format!("/whiteboard?{query}")
}

fn greeting(caller: &CallerIdentity) -> String {
    caller
        .display_name
        .clone()
        .or_else(|| caller.email.clone())
        .unwrap_or_else(|| caller.subject_id.clone())
}
