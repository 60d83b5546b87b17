//! HTTP API.

pub mod handlers;

pub use handlers::AppState;
