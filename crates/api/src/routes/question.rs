//! Route definitions for the `/questions` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::question;
use crate::state::AppState;

/// Routes mounted at `/questions`.
///
/// ```text
/// GET    /forms/{form_id}/questions          -> list_by_form
/// POST   /forms/{form_id}/questions          -> create
/// PUT    /forms/{form_id}/questions/reorder  -> reorder
/// PUT    /{id}                               -> update
/// DELETE /{id}                               -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/forms/{form_id}/questions",
            get(question::list_by_form).post(question::create),
        )
        .route(
            "/forms/{form_id}/questions/reorder",
            put(question::reorder),
        )
        .route("/{id}", put(question::update).delete(question::delete))
}
