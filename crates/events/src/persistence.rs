//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and writes every received [`PlatformEvent`] to the `events` table. Each
//! event is then handed downstream together with its row id, so consumers
//! such as the [`MatchNotifier`](crate::notifier::MatchNotifier) can link
//! back to it. It exits when the bus sender is dropped, which in turn
//! closes the downstream channel.

use alumni_core::types::DbId;
use alumni_db::models::event::CreateEvent;
use alumni_db::repositories::EventRepo;
use alumni_db::DbPool;
use tokio::sync::{broadcast, mpsc};

use crate::bus::PlatformEvent;

/// An event after the persistence attempt. `event_id` is `None` when the
/// insert failed.
#[derive(Debug, Clone)]
pub struct PersistedEvent {
    pub event_id: Option<DbId>,
    pub event: PlatformEvent,
}

/// Background service that persists platform events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop until the channel closes.
    ///
    /// When `downstream` is given, every event is forwarded after its insert.
    pub async fn run(
        pool: DbPool,
        mut receiver: broadcast::Receiver<PlatformEvent>,
        downstream: Option<mpsc::Sender<PersistedEvent>>,
    ) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let event_id = match Self::persist(&pool, &event).await {
                        Ok(id) => Some(id),
                        Err(e) => {
                            tracing::error!(
                                error = %e,
                                event_type = %event.event_type,
                                "Failed to persist event"
                            );
                            None
                        }
                    };
                    if let Some(tx) = &downstream {
                        if tx.send(PersistedEvent { event_id, event }).await.is_err() {
                            tracing::warn!("Downstream event consumer is gone");
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `events` table.
    pub async fn persist(pool: &DbPool, event: &PlatformEvent) -> Result<DbId, sqlx::Error> {
        EventRepo::insert(
            pool,
            &CreateEvent {
                event_type: &event.event_type,
                source_entity_type: event.source_entity_type.as_deref(),
                source_entity_id: event.source_entity_id,
                actor_user_id: event.actor_user_id,
                payload: &event.payload,
                occurred_at: event.timestamp,
            },
        )
        .await
    }
}
