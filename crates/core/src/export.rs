//! Flattening responses into a row-per-response, column-per-question table.
//!
//! Column layout is fixed: `Response ID`, `Respondent Email`, `Submitted At`,
//! then one column per question in display order, headed by the question's
//! current text. Questions are not versioned, so renaming a question renames
//! its column for every historical response too.

use std::collections::HashMap;

use crate::types::{DbId, Timestamp};

/// Headers that lead every export, in order.
pub const LEADING_HEADERS: [&str; 3] = ["Response ID", "Respondent Email", "Submitted At"];

/// A question column source.
#[derive(Debug, Clone)]
pub struct ExportQuestion {
    pub id: DbId,
    pub question_text: String,
    pub display_order: i32,
}

/// A response row source.
#[derive(Debug, Clone)]
pub struct ExportResponse {
    pub id: DbId,
    pub respondent_email: Option<String>,
    pub submitted_at: Timestamp,
}

/// A single answer cell source.
#[derive(Debug, Clone)]
pub struct ExportAnswer {
    pub response_id: DbId,
    pub question_id: DbId,
    pub text_answer: String,
}

/// One spreadsheet cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Number(i64),
    Text(String),
}

impl Cell {
    fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }
}

/// A fully materialized export: one header row and one row per response.
///
/// Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Build the export table for a form.
///
/// Questions are ordered by `(display_order, id)` and responses by
/// `(submitted_at, id)` regardless of input order. Unanswered cells and a
/// missing respondent email become empty strings. Answers whose question is
/// not among `questions` are ignored.
pub fn build_export_table(
    questions: &[ExportQuestion],
    responses: &[ExportResponse],
    answers: &[ExportAnswer],
) -> ExportTable {
    let mut questions: Vec<&ExportQuestion> = questions.iter().collect();
    questions.sort_by_key(|q| (q.display_order, q.id));

    let mut responses: Vec<&ExportResponse> = responses.iter().collect();
    responses.sort_by_key(|r| (r.submitted_at, r.id));

    let by_cell: HashMap<(DbId, DbId), &str> = answers
        .iter()
        .map(|a| ((a.response_id, a.question_id), a.text_answer.as_str()))
        .collect();

    let headers = LEADING_HEADERS
        .iter()
        .map(|h| h.to_string())
        .chain(questions.iter().map(|q| q.question_text.clone()))
        .collect();

    let rows = responses
        .iter()
        .map(|response| {
            let mut row = Vec::with_capacity(LEADING_HEADERS.len() + questions.len());
            row.push(Cell::Number(response.id));
            row.push(Cell::text(
                response.respondent_email.clone().unwrap_or_default(),
            ));
            row.push(Cell::text(response.submitted_at.to_rfc3339()));
            for question in &questions {
                let value = by_cell
                    .get(&(response.id, question.id))
                    .copied()
                    .unwrap_or_default();
                row.push(Cell::text(value));
            }
            row
        })
        .collect();

    ExportTable { headers, rows }
}
