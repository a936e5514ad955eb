//! Repository for the `forms` table.
//!
//! Every owner-facing method filters on `user_id` as well as `id`, so a form
//! owned by someone else is indistinguishable from a missing one.

use formflow_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::form::{CreateForm, Form, FormWithResponseCount, UpdateForm};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, title, description, is_published, created_at, updated_at";

/// Provides ownership-scoped CRUD operations for forms.
pub struct FormRepo;

impl FormRepo {
    /// Insert a new, unpublished form owned by `user_id`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateForm,
    ) -> Result<Form, sqlx::Error> {
        let query = format!(
            "INSERT INTO forms (user_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List the owner's forms, newest first, each with its response count.
    pub async fn list_for_owner(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<FormWithResponseCount>, sqlx::Error> {
        sqlx::query_as::<_, FormWithResponseCount>(
            "SELECT f.id, f.user_id, f.title, f.description, f.is_published,
                    f.created_at, f.updated_at,
                    COUNT(r.id) AS response_count
             FROM forms f
             LEFT JOIN responses r ON r.form_id = f.id
             WHERE f.user_id = $1
             GROUP BY f.id
             ORDER BY f.created_at DESC, f.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Find a form by ID if it belongs to `user_id`.
    pub async fn find_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Find a form by ID only if it is published.
    pub async fn find_published(pool: &PgPool, id: DbId) -> Result<Option<Form>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM forms WHERE id = $1 AND is_published = true");
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a published form and hold a share lock on it until the caller's
    /// transaction ends, so it cannot be unpublished or deleted mid-submission.
    pub async fn lock_published(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM forms WHERE id = $1 AND is_published = true FOR SHARE"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Update an owned form. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if the form does not exist or is not owned by `user_id`.
    pub async fn update_owned(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        input: &UpdateForm,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET
                title = COALESCE($3, title),
                description = COALESCE($4, description)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(user_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Publish or unpublish an owned form.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        is_published: bool,
    ) -> Result<Option<Form>, sqlx::Error> {
        let query = format!(
            "UPDATE forms SET is_published = $3
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Form>(&query)
            .bind(id)
            .bind(user_id)
            .bind(is_published)
            .fetch_optional(pool)
            .await
    }

    /// Permanently delete an owned form. Returns `true` if a row was removed.
    ///
    /// Questions, responses and answers go with it through `ON DELETE CASCADE`.
    pub async fn delete_owned(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM forms WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
