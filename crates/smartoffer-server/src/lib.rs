//! Smart Offer server: HTTP API and CLI helpers around the extractor,
//! remote extraction, thumbnails and export.

pub mod cli;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
