//! Repository for the `activity_logs` table.

use nexus_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::activity_log::{ActivityLog, NewActivity};

const COLUMNS: &str =
    "id, user_id, action, entity_type, entity_id, details, created_at, updated_at";

/// Append-only access to the activity log.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry. Accepts a pool or an open transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &NewActivity,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (user_id, action, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(input.user_id)
            .bind(input.action)
            .bind(input.entity_type)
            .bind(input.entity_id)
            .bind(&input.details)
            .fetch_one(executor)
            .await
    }

    /// Entries for one entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
