//! Handlers for the `/analytics` resource: summaries, per-question
//! distributions and the spreadsheet export. All are owner-only.

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use formflow_core::analytics::{summarize_responses, QuestionAnalytics, ResponseSummary};
use formflow_core::export::{build_export_table, ExportAnswer, ExportQuestion, ExportResponse};
use formflow_core::spreadsheet::{write_xlsx, XLSX_CONTENT_TYPE};
use formflow_core::types::DbId;
use formflow_db::begin_snapshot;
use formflow_db::repositories::{QuestionRepo, ResponseRepo};

use crate::error::{not_found, AppResult};
use crate::extract::AppPath;
use crate::handlers::form::ensure_owned_form;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/v1/analytics/forms/{form_id}/analytics/summary
pub async fn form_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(form_id): AppPath<DbId>,
) -> AppResult<Json<ResponseSummary>> {
    ensure_owned_form(&state, form_id, auth.user_id).await?;
    let submissions = ResponseRepo::submission_times(&state.pool, form_id).await?;
    Ok(Json(summarize_responses(&submissions)))
}

/// GET /api/v1/analytics/questions/{question_id}/analytics
pub async fn question_analytics(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(question_id): AppPath<DbId>,
) -> AppResult<Json<QuestionAnalytics>> {
    let question = QuestionRepo::find_owned(&state.pool, question_id, auth.user_id)
        .await?
        .ok_or_else(|| not_found("Question", question_id))?;
    let answers = ResponseRepo::answer_texts_for_question(&state.pool, question_id).await?;
    Ok(Json(QuestionAnalytics::from_answers(
        question.id,
        question.question_text,
        &answers,
    )))
}

/// GET /api/v1/analytics/forms/{form_id}/export
///
/// Streams an `.xlsx` workbook with one row per response. Questions,
/// responses and answers are read from a single snapshot.
pub async fn export_responses(
    State(state): State<AppState>,
    auth: AuthUser,
    AppPath(form_id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_form(&state, form_id, auth.user_id).await?;

    let mut tx = begin_snapshot(&state.pool).await?;
    let questions: Vec<ExportQuestion> = QuestionRepo::list_for_form(&mut *tx, form_id)
        .await?
        .into_iter()
        .map(|q| ExportQuestion {
            id: q.id,
            question_text: q.question_text,
            display_order: q.display_order,
        })
        .collect();
    let responses: Vec<ExportResponse> = ResponseRepo::list_for_form(&mut *tx, form_id)
        .await?
        .into_iter()
        .map(|r| ExportResponse {
            id: r.id,
            respondent_email: r.respondent_email,
            submitted_at: r.submitted_at,
        })
        .collect();
    let answers: Vec<ExportAnswer> = ResponseRepo::answers_for_form(&mut *tx, form_id)
        .await?
        .into_iter()
        .map(|a| ExportAnswer {
            response_id: a.response_id,
            question_id: a.question_id,
            text_answer: a.text_answer,
        })
        .collect();
    tx.commit().await?;

    let table = build_export_table(&questions, &responses, &answers);
    let bytes = write_xlsx(&table)?;

    tracing::info!(
        form_id,
        rows = table.rows.len(),
        bytes = bytes.len(),
        "Responses exported"
    );

    Ok((
        [
            (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
            (header::CONTENT_DISPOSITION, export_disposition(form_id)),
        ],
        bytes,
    ))
}

fn export_disposition(form_id: DbId) -> String {
    format!("attachment; filename=\"form_{form_id}_responses.xlsx\"")
}
