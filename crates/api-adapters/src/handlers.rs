//! # Handlers
//!
//! This module coordinates the flow between HTTP requests and the board
//! service. Every handler behind the gate receives the resolved caller as an
//! `Extension<CallerIdentity>`.

use askama::Template;
use axum::extract::{Extension, Form, Json, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use domains::{CallerIdentity, ContentUpdate, NewBoard};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

use crate::error::ApiError;
use crate::metrics::{Operation, Outcome};
use crate::state::AppState;
use crate::views::{whiteboard_href, DashboardPage, SearchPage};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBoardForm {
    #[serde(default)]
    pub board_name: String,
    #[serde(default)]
    pub class_code: Option<String>,
    #[serde(default)]
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SaveBoardRequest {
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub content: ContentUpdate,
}

#[derive(Debug, Deserialize)]
pub struct BoardNameQuery {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteBoardRequest {
    #[serde(default)]
    pub board_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(header::CONTENT_TYPE, "application/openmetrics-text; version=1.0.0; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Renders the dashboard. A store failure still renders the page, with an
/// empty listing and an error banner.
pub async fn dashboard(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
) -> Result<Html<String>, ApiError> {
    let page = match state.boards.get_user_boards(&caller.subject_id).await {
        Ok(boards) => {
            state.metrics.record(Operation::ListBoards, Outcome::Ok);
            DashboardPage::new(&caller, &boards, false)
        }
        Err(e) => {
            error!(error = %e, "error fetching boards");
            state.metrics.record(Operation::ListBoards, Outcome::Error);
            DashboardPage::new(&caller, &[], true)
        }
    };
    Ok(Html(page.render()?))
}

/// Creates a board and sends the browser to the whiteboard for it.
pub async fn create_board(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Form(form): Form<CreateBoardForm>,
) -> Redirect {
    let data = NewBoard {
        board_name: form.board_name,
        class_code: form.class_code.filter(|c| !c.is_empty()),
        tags: form.tags.filter(|t| !t.is_empty()),
    };

    match state.boards.create_board(&caller.subject_id, data.clone()).await {
        Ok(board) => {
            state.metrics.record(Operation::CreateBoard, Outcome::Ok);
            info!(board_id = %board.board_id, "board created");
            Redirect::to(&whiteboard_href(&[
                ("name", data.board_name.as_str()),
                ("class", data.class_code.as_deref().unwrap_or_default()),
                ("tags", data.tags.as_deref().unwrap_or_default()),
            ]))
        }
        Err(e) => {
            error!(error = %e, "error creating board");
            state.metrics.record(Operation::CreateBoard, Outcome::Error);
            Redirect::to("/dashboard")
        }
    }
}

/// Saves whiteboard content under the board name, creating the board if
/// the caller has none by that name.
pub async fn save_board(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(request): Json<SaveBoardRequest>,
) -> Response {
    match state
        .boards
        .save_board_content(&caller.subject_id, &request.name, request.content)
        .await
    {
        Ok(()) => {
            state.metrics.record(Operation::SaveBoard, Outcome::Ok);
            Json(json!({ "success": true })).into_response()
        }
        Err(e) => {
            error!(error = %e, "error saving board");
            state.metrics.record(Operation::SaveBoard, Outcome::Error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "save_failed" })),
            )
                .into_response()
        }
    }
}

/// Full editable content of a board, or the empty payload.
pub async fn get_board_data(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(params): Query<BoardNameQuery>,
) -> Response {
    let name = params.name.unwrap_or_default();

    match state.boards.get_board_content(&caller.subject_id, &name).await {
        Ok(content) => {
            state.metrics.record(Operation::GetBoardData, Outcome::Ok);
            Json(content).into_response()
        }
        Err(e) => {
            error!(error = %e, "error fetching board data");
            state.metrics.record(Operation::GetBoardData, Outcome::Error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(domains::BoardContent::default()),
            )
                .into_response()
        }
    }
}

/// Deletes one of the caller's boards. Someone else's board and a missing
/// board both answer `success: false`.
pub async fn delete_board(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Json(request): Json<DeleteBoardRequest>,
) -> Response {
    match state.boards.delete_board(&request.board_id, &caller.subject_id).await {
        Ok(deleted) => {
            let outcome = if deleted { Outcome::Ok } else { Outcome::Refused };
            state.metrics.record(Operation::DeleteBoard, outcome);
            Json(json!({ "success": deleted })).into_response()
        }
        Err(e) => {
            error!(error = %e, "error deleting board");
            state.metrics.record(Operation::DeleteBoard, Outcome::Error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": "delete_failed" })),
            )
                .into_response()
        }
    }
}

pub async fn search(
    State(state): State<AppState>,
    Extension(caller): Extension<CallerIdentity>,
    Query(params): Query<SearchQuery>,
) -> Result<Html<String>, ApiError> {
    let query = params.query.as_deref();

    let boards = state
        .boards
        .search_user_boards(&caller.subject_id, query)
        .await
        .map_err(|e| {
            error!(error = %e, "error searching boards");
            state.metrics.record(Operation::SearchBoards, Outcome::Error);
            ApiError::SearchFailed(e)
        })?;

    state.metrics.record(Operation::SearchBoards, Outcome::Ok);
    Ok(Html(SearchPage::new(&caller, &boards, query).render()?))
}
