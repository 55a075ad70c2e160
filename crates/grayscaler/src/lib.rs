//! HTTP surface for the Grayscaler pipeline.
//!
//! - `GET /` and `GET /health` for liveness
//! - `POST /process` with `source_image` and `dest_image` multipart uploads
//! - processed images served as static files under the configured route

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
