//! Repository for the `responses` and `answers` tables.
//!
//! Responses are written once by a public submission and are immutable
//! afterwards; the only mutation is deletion by the form owner.

use formflow_core::types::{DbId, Timestamp};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::response::{AnswerDetail, Response, SubmitAnswer};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, form_id, respondent_email, submitted_at";

/// Provides submission writes and owner-side reads for responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert a response and all of its answers on the caller's transaction.
    ///
    /// `submitted_at` is assigned by the database. Answers are inserted in one
    /// statement, in the order given, so their ids follow submission order.
    pub async fn insert_with_answers(
        conn: &mut PgConnection,
        form_id: DbId,
        respondent_email: Option<&str>,
        answers: &[SubmitAnswer],
    ) -> Result<Response, sqlx::Error> {
        let query = format!(
            "INSERT INTO responses (form_id, respondent_email)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        let response = sqlx::query_as::<_, Response>(&query)
            .bind(form_id)
            .bind(respondent_email)
            .fetch_one(&mut *conn)
            .await?;

        if !answers.is_empty() {
            let question_ids: Vec<DbId> = answers.iter().map(|a| a.question_id).collect();
            let texts: Vec<String> = answers.iter().map(|a| a.text_answer.clone()).collect();

            sqlx::query(
                "INSERT INTO answers (response_id, form_id, question_id, text_answer)
                 SELECT $1, $2, a.question_id, a.text_answer
                 FROM UNNEST($3::BIGINT[], $4::TEXT[]) WITH ORDINALITY
                      AS a(question_id, text_answer, position)
                 ORDER BY a.position",
            )
            .bind(response.id)
            .bind(form_id)
            .bind(&question_ids)
            .bind(&texts)
            .execute(&mut *conn)
            .await?;
        }

        Ok(response)
    }

    /// List a form's responses, oldest first.
    pub async fn list_for_form<'e>(
        executor: impl PgExecutor<'e>,
        form_id: DbId,
    ) -> Result<Vec<Response>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM responses WHERE form_id = $1 ORDER BY submitted_at, id"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(form_id)
            .fetch_all(executor)
            .await
    }

    /// Find a response whose parent form belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Response>, sqlx::Error> {
        sqlx::query_as::<_, Response>(
            "SELECT r.id, r.form_id, r.respondent_email, r.submitted_at
             FROM responses r
             JOIN forms f ON f.id = r.form_id
             WHERE r.id = $1 AND f.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Delete a response and, by cascade, its answers.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM responses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All answers to a form, with current question text, in insertion order.
    pub async fn answers_for_form<'e>(
        executor: impl PgExecutor<'e>,
        form_id: DbId,
    ) -> Result<Vec<AnswerDetail>, sqlx::Error> {
        sqlx::query_as::<_, AnswerDetail>(
            "SELECT a.response_id, a.question_id, q.question_text, a.text_answer
             FROM answers a
             JOIN questions q ON q.id = a.question_id
             WHERE a.form_id = $1
             ORDER BY a.id",
        )
        .bind(form_id)
        .fetch_all(executor)
        .await
    }

    /// Answers of a single response, in question display order.
    pub async fn answers_for_response(
        pool: &PgPool,
        response_id: DbId,
    ) -> Result<Vec<AnswerDetail>, sqlx::Error> {
        sqlx::query_as::<_, AnswerDetail>(
            "SELECT a.response_id, a.question_id, q.question_text, a.text_answer
             FROM answers a
             JOIN questions q ON q.id = a.question_id
             WHERE a.response_id = $1
             ORDER BY q.display_order, q.id",
        )
        .bind(response_id)
        .fetch_all(pool)
        .await
    }

    /// `(response_id, submitted_at)` for every response to a form.
    pub async fn submission_times(
        pool: &PgPool,
        form_id: DbId,
    ) -> Result<Vec<(DbId, Timestamp)>, sqlx::Error> {
        sqlx::query_as("SELECT id, submitted_at FROM responses WHERE form_id = $1")
            .bind(form_id)
            .fetch_all(pool)
            .await
    }

    /// Answer texts for a question in insertion order.
    pub async fn answer_texts_for_question(
        pool: &PgPool,
        question_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT text_answer FROM answers WHERE question_id = $1 ORDER BY id")
                .bind(question_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(text,)| text).collect())
    }
}
