use std::sync::Arc;

use services::{AccessGate, BoardService};

use crate::metrics::Metrics;

/// Where unauthenticated callers are sent and where tokens are looked for.
#[derive(Debug, Clone)]
pub struct GateOptions {
    pub login_path: String,
    pub cookie_names: Vec<String>,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            login_path: "/auth/login".into(),
            cookie_names: vec!["authToken".into(), "idToken".into()],
        }
    }
}

/// State shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub boards: Arc<BoardService>,
    pub gate: Arc<AccessGate>,
    pub options: Arc<GateOptions>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(boards: BoardService, gate: AccessGate, options: GateOptions) -> Self {
        Self {
            boards: Arc::new(boards),
            gate: Arc::new(gate),
            options: Arc::new(options),
            metrics: Arc::new(Metrics::new()),
        }
    }
}
