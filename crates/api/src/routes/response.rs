//! Route definitions for the `/responses` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::response;
use crate::state::AppState;

/// Routes mounted at `/responses`.
///
/// ```text
/// GET    /forms/{form_id}/responses  -> list_by_form
/// POST   /forms/{form_id}/responses  -> submit (no auth)
/// GET    /{id}                       -> get_by_id
/// DELETE /{id}                       -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/forms/{form_id}/responses",
            get(response::list_by_form).post(response::submit),
        )
        .route("/{id}", get(response::get_by_id).delete(response::delete))
}
