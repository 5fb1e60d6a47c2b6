//! Queries on `users`, including the login bookkeeping columns.

use nexus_core::types::{DbId, Timestamp};
use sqlx::{PgExecutor, PgPool};

use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::client_repo::ClientRepo;

const COLUMNS: &str = "id, email, password_hash, name, phone, role_id, supervisor_id, \
                       theme, email_notifications, push_notifications, sms_notifications, \
                       last_login_at, failed_login_count, locked_until, created_at, updated_at";

/// Insert a user row through any executor, so client creation can run it
/// inside its own transaction.
pub(crate) async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    input: &CreateUser,
) -> Result<User, sqlx::Error> {
    let query = format!(
        "INSERT INTO users (email, password_hash, name, phone, role_id, supervisor_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, User>(&query)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&input.name)
        .bind(&input.phone)
        .bind(input.role_id)
        .bind(input.supervisor_id)
        .fetch_one(executor)
        .await
}

pub struct UserRepo;

impl UserRepo {
    /// Insert a user with no client profile. A taken email violates
    /// `uq_users_email`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        insert(pool, input).await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by email. Emails are stored normalised (lowercase).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List users, newest first, optionally restricted to one role.
    pub async fn list(
        pool: &PgPool,
        role_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE ($1::BIGINT IS NULL OR role_id = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(role_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Update a user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                email = COALESCE($2, email),
                name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                role_id = COALESCE($5, role_id),
                supervisor_id = COALESCE($6, supervisor_id),
                theme = COALESCE($7, theme),
                email_notifications = COALESCE($8, email_notifications),
                push_notifications = COALESCE($9, push_notifications),
                sms_notifications = COALESCE($10, sms_notifications)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.role_id)
            .bind(input.supervisor_id)
            .bind(&input.theme)
            .bind(input.email_notifications)
            .bind(input.push_notifications)
            .bind(input.sms_notifications)
            .fetch_optional(pool)
            .await
    }

    /// Count a failed login and, once `max_attempts` consecutive failures
    /// are reached, lock the account until `lock_until`. A lock that has
    /// already expired starts the count over. Returns the new count.
    pub async fn record_failed_login(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
        lock_until: Timestamp,
    ) -> Result<i32, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE users u SET
                failed_login_count = s.next_count,
                locked_until = CASE
                    WHEN s.next_count >= $2 THEN $3
                    WHEN s.lock_expired THEN NULL
                    ELSE u.locked_until
                END
             FROM (
                SELECT id,
                       COALESCE(locked_until <= NOW(), FALSE) AS lock_expired,
                       CASE WHEN locked_until <= NOW() THEN 1
                            ELSE failed_login_count + 1
                       END AS next_count
                FROM users
                WHERE id = $1
             ) s
             WHERE u.id = s.id
             RETURNING u.failed_login_count",
        )
        .bind(id)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_one(pool)
        .await
    }

    /// Reset the failure count, clear any lock and stamp `last_login_at`.
    pub async fn record_successful_login(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE users SET
                failed_login_count = 0,
                locked_until = NULL,
                last_login_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Update a user's password hash and clear any lockout.
    ///
    /// Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &PgPool,
        id: DbId,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE users SET
                password_hash = $2,
                failed_login_count = 0,
                locked_until = NULL
             WHERE id = $1",
        )
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user together with everything that points at them.
    ///
    /// Assignments (`leads.operator_id`, `claims.operator_id`, subordinates'
    /// `supervisor_id`) are cleared, the user's comments are removed, and a
    /// client profile, if any, is deleted with its claims. Attachments and
    /// activity log rows keep their content but lose the user reference.
    ///
    /// Returns `true` if the user existed.
    pub async fn delete_with_dependents(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for statement in [
            "UPDATE leads SET operator_id = NULL WHERE operator_id = $1",
            "UPDATE claims SET operator_id = NULL WHERE operator_id = $1",
            "UPDATE users SET supervisor_id = NULL WHERE supervisor_id = $1",
            "UPDATE attachments SET uploaded_by = NULL WHERE uploaded_by = $1",
            "UPDATE activity_logs SET user_id = NULL WHERE user_id = $1",
            "DELETE FROM comments WHERE user_id = $1",
        ] {
            sqlx::query(statement).bind(id).execute(&mut *tx).await?;
        }

        let client_id: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM clients WHERE user_id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some((client_id,)) = client_id {
            ClientRepo::delete_in_tx(&mut tx, client_id).await?;
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
