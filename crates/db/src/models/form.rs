//! Form entity model and DTOs.

use formflow_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::models::question::Question;

/// A form row from the `forms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Form {
    #[serde(rename = "form_id")]
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_published: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A form annotated with how many responses it has collected.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FormWithResponseCount {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub form: Form,
    pub response_count: i64,
}

/// A form together with its questions in display order.
#[derive(Debug, Clone, Serialize)]
pub struct FormWithQuestions {
    #[serde(flatten)]
    pub form: Form,
    pub questions: Vec<Question>,
}

/// DTO for creating a new form. Forms start unpublished.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateForm {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
}

/// DTO for updating an existing form. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateForm {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
}

/// DTO for toggling publication. Omitting the flag publishes the form.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPublished {
    #[serde(default = "default_published")]
    pub is_published: bool,
}

fn default_published() -> bool {
    true
}
