//! Repository for the `questions` table.

use formflow_core::question_order::next_display_order;
use formflow_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::question::{
    AppendOutcome, CreateQuestion, Question, ReorderItem, ReorderOutcome, UpdateQuestion,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, form_id, question_text, is_required, display_order, created_at, updated_at";

/// Provides CRUD and ordering operations for questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Append a question to a form, assigning the next display order.
    ///
    /// Locks the form row while reading and advancing its order counter, so
    /// concurrent appends to the same form are serialized. Returns
    /// [`AppendOutcome::OrdersExhausted`] without writing when no order is left.
    pub async fn create(
        pool: &PgPool,
        form_id: DbId,
        input: &CreateQuestion,
    ) -> Result<AppendOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let (last_assigned,): (i32,) =
            sqlx::query_as("SELECT last_display_order FROM forms WHERE id = $1 FOR UPDATE")
                .bind(form_id)
                .fetch_one(&mut *tx)
                .await?;

        let (current_max,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(display_order) FROM questions WHERE form_id = $1")
                .bind(form_id)
                .fetch_one(&mut *tx)
                .await?;

        let Some(display_order) = next_display_order(last_assigned, current_max) else {
            tx.rollback().await?;
            return Ok(AppendOutcome::OrdersExhausted);
        };

        sqlx::query("UPDATE forms SET last_display_order = $2 WHERE id = $1")
            .bind(form_id)
            .bind(display_order)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO questions (form_id, question_text, is_required, display_order)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let question = sqlx::query_as::<_, Question>(&query)
            .bind(form_id)
            .bind(&input.question_text)
            .bind(input.is_required)
            .bind(display_order)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(AppendOutcome::Created(question))
    }

    /// List a form's questions in presentation order.
    ///
    /// Accepts the pool or a transaction, so exports can read it inside a
    /// snapshot.
    pub async fn list_for_form<'e>(
        executor: impl PgExecutor<'e>,
        form_id: DbId,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions WHERE form_id = $1 ORDER BY display_order, id"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(form_id)
            .fetch_all(executor)
            .await
    }

    /// List a form's questions and share-lock them for the rest of the
    /// caller's transaction, so their existence and required flags cannot
    /// change underneath a submission being validated.
    pub async fn lock_for_form(
        conn: &mut PgConnection,
        form_id: DbId,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM questions WHERE form_id = $1 ORDER BY display_order, id FOR SHARE"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(form_id)
            .fetch_all(conn)
            .await
    }

    /// Find a question whose parent form belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Question>, sqlx::Error> {
        sqlx::query_as::<_, Question>(
            "SELECT q.id, q.form_id, q.question_text, q.is_required, q.display_order,
                    q.created_at, q.updated_at
             FROM questions q
             JOIN forms f ON f.id = q.form_id
             WHERE q.id = $1 AND f.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Update a question's text or required flag. Only non-`None` fields apply.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateQuestion,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "UPDATE questions SET
                question_text = COALESCE($2, question_text),
                is_required = COALESCE($3, is_required)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&input.question_text)
            .bind(input.is_required)
            .fetch_optional(pool)
            .await
    }

    /// Delete a question and, by cascade, its answers.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM questions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a reorder batch to a form's questions as one transaction.
    ///
    /// If any item names a question outside the form, the transaction is
    /// rolled back and [`ReorderOutcome::UnknownQuestion`] is returned. The
    /// `(form_id, display_order)` uniqueness check is deferred to commit, so
    /// swaps succeed while a batch that collides with an unlisted question
    /// fails the commit with a unique violation and leaves nothing applied.
    pub async fn reorder(
        pool: &PgPool,
        form_id: DbId,
        items: &[ReorderItem],
    ) -> Result<ReorderOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for item in items {
            let result = sqlx::query(
                "UPDATE questions SET display_order = $3 WHERE id = $1 AND form_id = $2",
            )
            .bind(item.question_id)
            .bind(form_id)
            .bind(item.display_order)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                tx.rollback().await?;
                return Ok(ReorderOutcome::UnknownQuestion(item.question_id));
            }
        }

        // Keep the append counter ahead of any order the batch raised.
        sqlx::query(
            "UPDATE forms SET last_display_order = GREATEST(
                last_display_order,
                (SELECT COALESCE(MAX(display_order), 0) FROM questions WHERE form_id = $1)
             )
             WHERE id = $1",
        )
        .bind(form_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(ReorderOutcome::Applied)
    }
}
