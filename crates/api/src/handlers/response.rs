//! Handlers for the `/responses` resource.
//!
//! Submission is public; everything else is restricted to the form owner.

use std::collections::HashMap;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use formflow_core::error::CoreError;
use formflow_core::submission::{validate_submission, QuestionRule};
use formflow_core::types::{DbId, Timestamp};
use formflow_db::models::response::{AnswerDetail, ResponseWithAnswers, SubmitResponse};
use formflow_db::repositories::{FormRepo, QuestionRepo, ResponseRepo};
use serde::Serialize;
use validator::ValidateEmail;

use crate::error::{not_found, AppError, AppResult};
use crate::extract::{validate_body, AppJson, AppPath};
use crate::handlers::auth::MessageResponse;
use crate::handlers::form::ensure_owned_form;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of a successful submission.
#[derive(Debug, Serialize)]
pub struct SubmitResult {
    pub response_id: DbId,
    pub submitted_at: Timestamp,
    pub message: &'static str,
}

/// Body of `GET /responses/forms/{form_id}/responses`.
#[derive(Debug, Serialize)]
pub struct ResponseList {
    pub responses: Vec<ResponseWithAnswers>,
}

/// POST /api/v1/responses/forms/{form_id}/responses
///
/// The form, its questions and the new rows are all handled on one
/// transaction. Nothing is written unless every check passes. The form is
/// resolved before the body is validated, so a draft or missing form is a
/// 404 whatever was sent.
pub async fn submit(
    State(state): State<AppState>,
    AppPath(form_id): AppPath<DbId>,
    AppJson(input): AppJson<SubmitResponse>,
) -> AppResult<(StatusCode, Json<SubmitResult>)> {
    let mut tx = state.pool.begin().await?;

    FormRepo::lock_published(&mut *tx, form_id)
        .await?
        .ok_or_else(|| not_found("Form", form_id))?;

    validate_body(&input)?;
    let respondent_email = normalize_respondent_email(input.respondent_email.as_deref())?;

    let rules: Vec<QuestionRule> = QuestionRepo::lock_for_form(&mut *tx, form_id)
        .await?
        .into_iter()
        .map(|q| QuestionRule {
            id: q.id,
            is_required: q.is_required,
        })
        .collect();

    let pairs: Vec<(DbId, &str)> = input
        .answers
        .iter()
        .map(|a| (a.question_id, a.text_answer.as_str()))
        .collect();
    validate_submission(&rules, &pairs)?;

    let response = ResponseRepo::insert_with_answers(
        &mut *tx,
        form_id,
        respondent_email.as_deref(),
        &input.answers,
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        form_id,
        response_id = response.id,
        answers = input.answers.len(),
        "Response submitted"
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResult {
            response_id: response.id,
            submitted_at: response.submitted_at,
            message: "Response submitted successfully",
        }),
    ))
}

/// GET /api/v1/responses/forms/{form_id}/responses
pub async fn list_by_form(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(form_id): AppPath<DbId>,
) -> AppResult<Json<ResponseList>> {
    ensure_owned_form(&state, form_id, auth.user_id).await?;

    let responses = ResponseRepo::list_for_form(&state.pool, form_id).await?;
    let answers = ResponseRepo::answers_for_form(&state.pool, form_id).await?;
    let mut by_response = group_by_response(answers);

    let responses = responses
        .into_iter()
        .map(|response| {
            let answers = by_response.remove(&response.id).unwrap_or_default();
            ResponseWithAnswers { response, answers }
        })
        .collect();

    Ok(Json(ResponseList { responses }))
}

/// GET /api/v1/responses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<ResponseWithAnswers>> {
    let response = ResponseRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found("Response", id))?;
    let answers = ResponseRepo::answers_for_response(&state.pool, id).await?;
    Ok(Json(ResponseWithAnswers { response, answers }))
}

/// DELETE /api/v1/responses/{id}
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(id): AppPath<DbId>,
) -> AppResult<Json<MessageResponse>> {
    ResponseRepo::find_owned(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| not_found("Response", id))?;
    if !ResponseRepo::delete(&state.pool, id).await? {
        return Err(not_found("Response", id));
    }
    tracing::info!(response_id = id, "Response deleted");
    Ok(Json(MessageResponse {
        message: "Response deleted successfully".into(),
    }))
}

/// Blank emails are treated as absent; anything else must look like an address.
fn normalize_respondent_email(email: Option<&str>) -> AppResult<Option<String>> {
    match email.map(str::trim) {
        None | Some("") => Ok(None),
        Some(email) if email.validate_email() => Ok(Some(email.to_string())),
        Some(_) => Err(AppError::Core(CoreError::Validation(
            "respondent_email must be a valid email address".into(),
        ))),
    }
}

fn group_by_response(answers: Vec<AnswerDetail>) -> HashMap<DbId, Vec<AnswerDetail>> {
    let mut grouped: HashMap<DbId, Vec<AnswerDetail>> = HashMap::new();
    for answer in answers {
        grouped.entry(answer.response_id).or_default().push(answer);
    }
    grouped
}
