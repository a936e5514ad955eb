//! Question entity model and DTOs.

use formflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A question row from the `questions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    #[serde(rename = "question_id")]
    pub id: DbId,
    pub form_id: DbId,
    pub question_text: String,
    pub is_required: bool,
    pub display_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a question. The display order is assigned by the server.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestion {
    #[validate(length(min = 1, max = 2000, message = "question_text must be 1-2000 characters"))]
    pub question_text: String,
    #[serde(default)]
    pub is_required: bool,
}

/// DTO for updating a question. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateQuestion {
    #[validate(length(min = 1, max = 2000, message = "question_text must be 1-2000 characters"))]
    pub question_text: Option<String>,
    pub is_required: Option<bool>,
}

/// One entry of a reorder batch.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ReorderItem {
    pub question_id: DbId,
    pub display_order: i32,
}

/// Result of appending a question to a form.
#[derive(Debug, Clone)]
pub enum AppendOutcome {
    /// The question was inserted with the next display order.
    Created(Question),
    /// The form's display orders already reach `i32::MAX`; nothing was inserted.
    OrdersExhausted,
}

/// Result of applying a reorder batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// Every item was applied and committed.
    Applied,
    /// The batch named a question that is not part of the form; nothing was applied.
    UnknownQuestion(DbId),
}
