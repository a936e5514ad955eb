//! Response and answer models and the public submission DTO.

use formflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A response row from the `responses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Response {
    #[serde(rename = "response_id")]
    pub id: DbId,
    pub form_id: DbId,
    pub respondent_email: Option<String>,
    pub submitted_at: Timestamp,
}

/// An answer joined with its question's current text.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AnswerDetail {
    #[serde(skip)]
    pub response_id: DbId,
    pub question_id: DbId,
    pub question_text: String,
    pub text_answer: String,
}

/// A response with all of its answers.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseWithAnswers {
    #[serde(flatten)]
    pub response: Response,
    pub answers: Vec<AnswerDetail>,
}

/// Public submission body.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitResponse {
    pub respondent_email: Option<String>,
    #[validate(length(max = 1000, message = "at most 1000 answers per submission"))]
    pub answers: Vec<SubmitAnswer>,
}

/// One answer inside a submission.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SubmitAnswer {
    pub question_id: DbId,
    pub text_answer: String,
}
