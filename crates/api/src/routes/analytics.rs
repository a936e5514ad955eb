//! Route definitions for the `/analytics` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::analytics;
use crate::state::AppState;

/// Routes mounted at `/analytics`.
///
/// ```text
/// GET /forms/{form_id}/analytics/summary   -> form_summary
/// GET /questions/{question_id}/analytics   -> question_analytics
/// GET /forms/{form_id}/export              -> export_responses
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/forms/{form_id}/analytics/summary",
            get(analytics::form_summary),
        )
        .route(
            "/questions/{question_id}/analytics",
            get(analytics::question_analytics),
        )
        .route("/forms/{form_id}/export", get(analytics::export_responses))
}
