//! Repository for the `events` table.

use alumni_core::types::DbId;
use sqlx::PgPool;

use crate::models::event::{CreateEvent, Event};

const COLUMNS: &str = "id, event_type, source_entity_type, source_entity_id, actor_user_id, \
    payload, occurred_at, created_at";

/// Provides insert and lookup for persisted events.
pub struct EventRepo;

impl EventRepo {
    /// Insert an event, returning its ID.
    pub async fn insert(pool: &PgPool, input: &CreateEvent<'_>) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO events
                (event_type, source_entity_type, source_entity_id, actor_user_id, payload, occurred_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.event_type)
        .bind(input.source_entity_type)
        .bind(input.source_entity_id)
        .bind(input.actor_user_id)
        .bind(input.payload)
        .bind(input.occurred_at)
        .fetch_one(pool)
        .await
    }

    /// Events about one entity, oldest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<Event>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM events
             WHERE source_entity_type = $1 AND source_entity_id = $2
             ORDER BY occurred_at ASC, id ASC"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }
}
