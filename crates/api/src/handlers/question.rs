//! Handlers for the `/questions` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use formflow_core::error::CoreError;
use formflow_core::question_order::validate_reorder;
use formflow_core::types::DbId;
use formflow_db::models::question::{
    AppendOutcome, CreateQuestion, Question, ReorderItem, ReorderOutcome, UpdateQuestion,
};
use formflow_db::repositories::QuestionRepo;
use serde::Serialize;

use crate::error::{not_found, AppError, AppResult};
use crate::extract::{AppJson, AppPath, ValidatedJson};
use crate::handlers::auth::MessageResponse;
use crate::handlers::form::ensure_owned_form;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `GET /questions/forms/{form_id}/questions`.
#[derive(Debug, Serialize)]
pub struct QuestionList {
    pub questions: Vec<Question>,
}

/// Body of a successful reorder.
#[derive(Debug, Serialize)]
pub struct ReorderResponse {
    pub message: &'static str,
    pub questions: Vec<Question>,
}

async fn ensure_owned_question(state: &AppState, id: DbId, user_id: DbId) -> AppResult<Question> {
    QuestionRepo::find_owned(&state.pool, id, user_id)
        .await?
        .ok_or_else(|| not_found("Question", id))
}

/// POST /api/v1/questions/forms/{form_id}/questions
pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(form_id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<CreateQuestion>,
) -> AppResult<(StatusCode, Json<Question>)> {
    ensure_owned_form(&state, form_id, auth.user_id).await?;
    let question = match QuestionRepo::create(&state.pool, form_id, &input).await? {
        AppendOutcome::Created(question) => question,
        AppendOutcome::OrdersExhausted => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Form {form_id} has used every display order; no more questions can be appended"
            ))));
        }
    };
    tracing::info!(
        form_id,
        question_id = question.id,
        display_order = question.display_order,
        "Question added"
    );
    Ok((StatusCode::CREATED, Json(question)))
}

/// GET /api/v1/questions/forms/{form_id}/questions
pub async fn list_by_form(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(form_id): AppPath<DbId>,
) -> AppResult<Json<QuestionList>> {
    ensure_owned_form(&state, form_id, auth.user_id).await?;
    let questions = QuestionRepo::list_for_form(&state.pool, form_id).await?;
    Ok(Json(QuestionList { questions }))
}

/// PUT /api/v1/questions/{id}
pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
    ValidatedJson(input): ValidatedJson<UpdateQuestion>,
) -> AppResult<Json<Question>> {
    ensure_owned_question(&state, id, auth.user_id).await?;
    let question = QuestionRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found("Question", id))?;
    Ok(Json(question))
}

/// DELETE /api/v1/questions/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    ensure_owned_question(&state, id, auth.user_id).await?;
    if !QuestionRepo::delete(&state.pool, id).await? {
        return Err(not_found("Question", id));
    }
    Ok(Json(MessageResponse {
        message: "Question deleted successfully".into(),
    }))
}

/// PUT /api/v1/questions/forms/{form_id}/questions/reorder
///
/// Applies the whole batch or nothing.
pub async fn reorder(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(form_id): AppPath<DbId>,
    AppJson(items): AppJson<Vec<ReorderItem>>,
) -> AppResult<Json<ReorderResponse>> {
    ensure_owned_form(&state, form_id, auth.user_id).await?;

    let pairs: Vec<(DbId, i32)> = items
        .iter()
        .map(|item| (item.question_id, item.display_order))
        .collect();
    validate_reorder(&pairs)?;

    match QuestionRepo::reorder(&state.pool, form_id, &items).await? {
        ReorderOutcome::Applied => {}
        ReorderOutcome::UnknownQuestion(question_id) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Question {question_id} does not belong to form {form_id}; no changes were applied"
            ))));
        }
    }

    tracing::info!(form_id, count = items.len(), "Questions reordered");

    let questions = QuestionRepo::list_for_form(&state.pool, form_id).await?;
    Ok(Json(ReorderResponse {
        message: "Questions reordered successfully",
        questions,
    }))
}
