//! MediNutri API crate - axum HTTP server, route handlers, SSE chat streams.
//!
//! A thin transport over the engine: chat endpoints stream answer frames as
//! server-sent events, and the lookup endpoints expose interaction checks,
//! name search, autocomplete, drug safety profiles, and dataset stats.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
