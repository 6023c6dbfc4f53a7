//! JSON HTTP API over the metalens analyzer
//!
//! `POST /api/analyze` runs an analysis and stores it,
//! `GET /api/recent-analyses` and `GET /api/analyses/latest` read the store back.

pub mod config;
pub mod errors;
pub mod routes;
pub mod state;

pub use config::Config;
pub use errors::AppError;
pub use routes::build_router;
pub use state::AppState;
