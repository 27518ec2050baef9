//! Shared fixtures for the integration test suites under `tests/`.

pub mod fixtures;
