//! # Board Service
//!
//! All board persistence and search logic. Every operation is scoped to the
//! owning subject id passed in by the caller; ownership is never inferred.

use std::sync::Arc;

use domains::{
    empty_sequence, to_document, Board, BoardContent, Clock, ContentUpdate, Direction,
    DocumentStore, FieldValue, NewBoard, Patch, Query, Result, Snapshot, BOARDS_COLLECTION,
};
use serde_json::Value;
use tracing::{debug, instrument};

pub struct BoardService {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
}

impl BoardService {
    pub fn new(store: Arc<dyn DocumentStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Creates a board with a fresh id and `createdAt == updatedAt`.
    ///
    /// The name is stored exactly as given. Names are not checked for
    /// uniqueness here, even though the save and fetch paths treat
    /// `(userId, boardName)` as a key.
    #[instrument(skip(self, data), fields(board_name = %data.board_name))]
    pub async fn create_board(&self, user_id: &str, data: NewBoard) -> Result<Board> {
        let board_id = self.store.allocate_id(BOARDS_COLLECTION);
        let now = self.clock.now();
        let board = Board {
            board_id: board_id.clone(),
            user_id: user_id.to_owned(),
            board_name: data.board_name,
            class_code: data.class_code,
            tags: data.tags,
            image: None,
            drawing: empty_sequence(),
            writing: empty_sequence(),
            writing_window: None,
            created_at: now,
            updated_at: now,
        };

        self.store
            .set(BOARDS_COLLECTION, &board_id, to_document(&board)?)
            .await?;
        debug!(%board_id, "board created");
        Ok(board)
    }

    /// All boards owned by `user_id`, most recently updated first.
    #[instrument(skip(self))]
    pub async fn get_user_boards(&self, user_id: &str) -> Result<Vec<Board>> {
        let query = Query::new()
            .where_eq("userId", user_id)
            .order_by("updatedAt", Direction::Desc);

        self.store
            .query(BOARDS_COLLECTION, &query)
            .await?
            .iter()
            .map(decode_board)
            .collect()
    }

    /// Case-insensitive substring search over name, class code and tags.
    ///
    /// An empty or absent query returns the full listing. Matches keep the
    /// listing's recency order.
    #[instrument(skip(self))]
    pub async fn search_user_boards(&self, user_id: &str, query: Option<&str>) -> Result<Vec<Board>> {
        let boards = self.get_user_boards(user_id).await?;
        let needle = match query {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return Ok(boards),
        };

        let matches: Vec<Board> = boards
            .into_iter()
            .filter(|board| board_matches(board, &needle))
            .collect();
        debug!(count = matches.len(), "search complete");
        Ok(matches)
    }

    /// Upserts board content keyed by `(user_id, name)`.
    ///
    /// The lookup and the write are separate store calls, so two concurrent
    /// saves of a new name can both take the create branch. An update always
    /// moves `updatedAt` forward, by at least 1µs past the stored value.
    #[instrument(skip(self, update))]
    pub async fn save_board_content(&self, user_id: &str, name: &str, update: ContentUpdate) -> Result<()> {
        let content = update.normalized();
        let now = self.clock.now();

        match self.find_by_name(user_id, name).await? {
            Some(existing) => {
                let mut patch = Patch::new();
                patch.insert(
                    "image".into(),
                    match content.image {
                        Some(image) => FieldValue::Set(image),
                        None => FieldValue::Delete,
                    },
                );
                patch.insert("drawing".into(), FieldValue::Set(content.drawing));
                patch.insert("writing".into(), FieldValue::Set(content.writing));
                patch.insert(
                    "writingWindow".into(),
                    FieldValue::Set(content.writing_window.unwrap_or(Value::Null)),
                );
                let previous = existing.field("updatedAt").and_then(Value::as_i64);
                let stamp = match previous {
                    Some(prev) => now.timestamp_micros().max(prev.saturating_add(1)),
                    None => now.timestamp_micros(),
                };
                patch.insert("updatedAt".into(), FieldValue::Set(stamp.into()));

                self.store.update(BOARDS_COLLECTION, &existing.id, patch).await?;
                debug!(board_id = %existing.id, "board content updated");
            }
            None => {
                let board_id = self.store.allocate_id(BOARDS_COLLECTION);
                let board = Board {
                    board_id: board_id.clone(),
                    user_id: user_id.to_owned(),
                    board_name: name.to_owned(),
                    class_code: None,
                    tags: None,
                    image: content.image,
                    drawing: content.drawing,
                    writing: content.writing,
                    writing_window: content.writing_window,
                    created_at: now,
                    updated_at: now,
                };

                self.store
                    .set(BOARDS_COLLECTION, &board_id, to_document(&board)?)
                    .await?;
                debug!(%board_id, "board created from save");
            }
        }
        Ok(())
    }

    /// Stored content for `(user_id, name)`, or the empty payload when no
    /// such board exists.
    #[instrument(skip(self))]
    pub async fn get_board_content(&self, user_id: &str, name: &str) -> Result<BoardContent> {
        match self.find_by_name(user_id, name).await? {
            Some(snapshot) => Ok(BoardContent::from(&decode_board(&snapshot)?)),
            None => Ok(BoardContent::default()),
        }
    }

    /// Hard-deletes a board if and only if `user_id` owns it.
    ///
    /// A board owned by someone else yields the same `false` as a missing one.
    #[instrument(skip(self))]
    pub async fn delete_board(&self, board_id: &str, user_id: &str) -> Result<bool> {
        let owned = match self.store.get(BOARDS_COLLECTION, board_id).await? {
            Some(snapshot) => snapshot.field("userId").and_then(Value::as_str) == Some(user_id),
            None => false,
        };

        if !owned {
            debug!("delete refused");
            return Ok(false);
        }

        self.store.delete(BOARDS_COLLECTION, board_id).await?;
        debug!("board deleted");
        Ok(true)
    }

    async fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Snapshot>> {
        let query = Query::new()
            .where_eq("userId", user_id)
            .where_eq("boardName", name)
            .limit(1);

        Ok(self.store.query(BOARDS_COLLECTION, &query).await?.into_iter().next())
    }
}

/// `needle` must already be lower-cased.
fn board_matches(board: &Board, needle: &str) -> bool {
    let haystacks = [
        Some(board.board_name.as_str()),
        board.class_code.as_deref(),
        board.tags.as_deref(),
    ];
    haystacks
        .into_iter()
        .any(|field| field.unwrap_or_default().to_lowercase().contains(needle))
}

fn decode_board(snapshot: &Snapshot) -> Result<Board> {
    let mut board: Board = snapshot.decode()?;
    if board.board_id.is_empty() {
        board.board_id = snapshot.id.clone();
    }
    Ok(board)
}
