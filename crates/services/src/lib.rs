//! # services
//!
//! Application logic that sits between the presentation adapters and the
//! domain ports: the board repository and the access gate.

pub mod access_gate;
pub mod board_service;

pub use access_gate::AccessGate;
pub use board_service::BoardService;
