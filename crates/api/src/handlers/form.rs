//! Handlers for the `/forms` resource.
//!
//! All routes except [`get_public`] are scoped to the caller: a form owned by
//! someone else answers exactly like a missing one.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use formflow_core::types::DbId;
use formflow_db::models::form::{
    CreateForm, Form, FormWithQuestions, FormWithResponseCount, SetPublished, UpdateForm,
};
use formflow_db::models::question::Question;
use formflow_db::repositories::{FormRepo, QuestionRepo};
use serde::Serialize;

use crate::error::{not_found, AppResult};
use crate::extract::{AppJson, AppPath, ValidatedJson};
use crate::handlers::auth::MessageResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `GET /forms`.
#[derive(Debug, Serialize)]
pub struct FormList {
    pub forms: Vec<FormWithResponseCount>,
}

/// Body of `PUT /forms/{id}/publish`.
#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub form_id: DbId,
    pub is_published: bool,
    pub message: String,
}

/// What a respondent needs to render a published form.
#[derive(Debug, Serialize)]
pub struct PublicForm {
    pub form_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub questions: Vec<PublicQuestion>,
}

/// A question as shown to respondents.
#[derive(Debug, Serialize)]
pub struct PublicQuestion {
    pub question_id: DbId,
    pub question_text: String,
    pub is_required: bool,
    pub display_order: i32,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        Self {
            question_id: q.id,
            question_text: q.question_text,
            is_required: q.is_required,
            display_order: q.display_order,
        }
    }
}

/// Load a form the caller owns or fail with an opaque 404.
pub async fn ensure_owned_form(state: &AppState, form_id: DbId, user_id: DbId) -> AppResult<Form> {
    FormRepo::find_owned(&state.pool, form_id, user_id)
        .await?
        .ok_or_else(|| not_found("Form", form_id))
}

/// POST /api/v1/forms
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<CreateForm>,
) -> AppResult<(StatusCode, Json<Form>)> {
    let form = FormRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(form_id = form.id, user_id = auth.user_id, "Form created");
    Ok((StatusCode::CREATED, Json(form)))
}

/// GET /api/v1/forms
pub async fn list(State(state): State<AppState>, auth: AuthUser) -> AppResult<Json<FormList>> {
    let forms = FormRepo::list_for_owner(&state.pool, auth.user_id).await?;
    Ok(Json(FormList { forms }))
}

/// GET /api/v1/forms/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<FormWithQuestions>> {
    let form = ensure_owned_form(&state, id, auth.user_id).await?;
    let questions = QuestionRepo::list_for_form(&state.pool, id).await?;
    Ok(Json(FormWithQuestions { form, questions }))
}

/// PUT /api/v1/forms/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateForm>,
) -> AppResult<Json<Form>> {
    let form = FormRepo::update_owned(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| not_found("Form", id))?;
    Ok(Json(form))
}

/// DELETE /api/v1/forms/{id}
///
/// Removes the form with all of its questions, responses and answers.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !FormRepo::delete_owned(&state.pool, id, auth.user_id).await? {
        return Err(not_found("Form", id));
    }
    tracing::info!(form_id = id, user_id = auth.user_id, "Form deleted");
    Ok(Json(MessageResponse {
        message: "Form deleted successfully".into(),
    }))
}

/// PUT /api/v1/forms/{id}/publish
pub async fn set_published(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<SetPublished>,
) -> AppResult<Json<PublishResponse>> {
    let form = FormRepo::set_published(&state.pool, id, auth.user_id, input.is_published)
        .await?
        .ok_or_else(|| not_found("Form", id))?;

    tracing::info!(form_id = id, is_published = form.is_published, "Form publication changed");

    let verb = if form.is_published { "published" } else { "unpublished" };
    Ok(Json(PublishResponse {
        form_id: form.id,
        is_published: form.is_published,
        message: format!("Form {verb} successfully"),
    }))
}

/// GET /api/v1/forms/public/{id}
///
/// Unauthenticated view of a published form for respondents.
pub async fn get_public(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<PublicForm>> {
    let form = FormRepo::find_published(&state.pool, id)
        .await?
        .ok_or_else(|| not_found("Form", id))?;
    let questions = QuestionRepo::list_for_form(&state.pool, id).await?;

    Ok(Json(PublicForm {
        form_id: form.id,
        title: form.title,
        description: form.description,
        questions: questions.into_iter().map(PublicQuestion::from).collect(),
    }))
}
