//! # api-adapters
//!
//! The web routing and rendering layer for the board service. The axum
//! surface is compiled with the `web-axum` feature; page models and metrics
//! are always available.

pub mod metrics;
pub mod views;

#[cfg(feature = "web-axum")]
pub mod error;
#[cfg(feature = "web-axum")]
pub mod handlers;
#[cfg(feature = "web-axum")]
pub mod middleware;
#[cfg(feature = "web-axum")]
pub mod router;
#[cfg(feature = "web-axum")]
pub mod state;

#[cfg(feature = "web-axum")]
pub use router::router;
#[cfg(feature = "web-axum")]
pub use state::{AppState, GateOptions};
