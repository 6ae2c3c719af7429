//! strap-api - HTTP layer for strap history ingestion
//!
//! Serves `POST /parser/parse-history`: a multipart upload of a captured
//! history stream comes in, a JSON array of `{timestamp, heart_rate,
//! rr_intervals}` goes out. Staging and decoding are delegated to
//! [`strap_core::HistoryIngest`].
//!
//! # Usage
//!
//! ```ignore
//! use strap_api::{create_router, AppState};
//! use strap_core::TempDirStaging;
//! use strap_proto::WhoopHistoryDecoder;
//!
//! let state = AppState::new(
//!     Arc::new(TempDirStaging::system()),
//!     Arc::new(WhoopHistoryDecoder::new()),
//! );
//! let router = create_router(state);
//! ```

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with the given state
///
/// CORS admits any origin, method and header, with credentials. A wildcard
/// cannot be combined with credentials, so the request's own values are
/// mirrored back instead.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        // Health check
        .route("/health", get(|| async { "OK" }))
        .nest("/parser", parser_router())
        // Middleware
        .layer(DefaultBodyLimit::max(state.upload_limit()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Routes mounted under `/parser`
pub fn parser_router() -> Router<AppState> {
    Router::new().route("/parse-history", post(handlers::parser::parse_history))
}
