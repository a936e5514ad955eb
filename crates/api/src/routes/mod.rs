pub mod analytics;
pub mod auth;
pub mod form;
pub mod health;
pub mod question;
pub mod response;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                                    register (public)
/// /auth/login                                       login (public)
/// /auth/logout                                      logout (requires auth)
///
/// /forms                                            list, create
/// /forms/{id}                                       get, update, delete
/// /forms/{id}/publish                               publish / unpublish (PUT)
/// /forms/public/{id}                                published form (public)
///
/// /questions/forms/{form_id}/questions              list, create
/// /questions/forms/{form_id}/questions/reorder      atomic reorder (PUT)
/// /questions/{id}                                   update, delete
///
/// /responses/forms/{form_id}/responses              list, submit (submit is public)
/// /responses/{id}                                   get, delete
///
/// /analytics/forms/{form_id}/analytics/summary      response summary
/// /analytics/questions/{question_id}/analytics      answer distribution
/// /analytics/forms/{form_id}/export                 xlsx download
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/forms", form::router())
        .nest("/questions", question::router())
        .nest("/responses", response::router())
        .nest("/analytics", analytics::router())
}
