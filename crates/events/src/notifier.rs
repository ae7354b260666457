//! Turns match lifecycle events into in-app notifications.
//!
//! [`MatchNotifier`] consumes events after [`EventPersistence`] has stored
//! them and, for each match event, writes one `notifications` row per
//! affected user, linked to the stored event. Who is notified and with what
//! text is decided by [`notifications_for`], which is pure.
//!
//! [`EventPersistence`]: crate::persistence::EventPersistence

use alumni_core::types::DbId;
use alumni_db::repositories::NotificationRepo;
use alumni_db::DbPool;
use tokio::sync::mpsc;

use crate::bus::PlatformEvent;
use crate::persistence::PersistedEvent;
use crate::{
    EVENT_MATCH_ACCEPTED, EVENT_MATCH_EXHAUSTED, EVENT_MATCH_EXPIRED, EVENT_MATCH_PROPOSED,
    EVENT_MATCH_REJECTED,
};

/// A notification to deliver: recipient and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingNotification {
    pub user_id: DbId,
    pub message: String,
}

/// Decide who hears about an event. Unknown event types notify nobody.
pub fn notifications_for(event: &PlatformEvent) -> Vec<OutgoingNotification> {
    let mentor = event.payload_id("mentor_user_id");
    let mentee = event.payload_id("mentee_user_id");

    let mut out = Vec::new();
    let mut push = |user: Option<DbId>, message: String| {
        if let Some(user_id) = user {
            out.push(OutgoingNotification { user_id, message });
        }
    };

    match event.event_type.as_str() {
        EVENT_MATCH_PROPOSED => {
            let score = event
                .payload
                .get("match_score")
                .and_then(serde_json::Value::as_i64)
                .unwrap_or(0);
            push(
                mentor,
                format!("You have a new mentee match request ({score}% match)."),
            );
        }
        EVENT_MATCH_ACCEPTED => {
            push(mentee, "Your mentor accepted your match request.".to_string());
        }
        EVENT_MATCH_REJECTED => {
            push(
                mentee,
                "Your match request was declined. We are trying your next preference.".to_string(),
            );
        }
        EVENT_MATCH_EXPIRED => {
            push(
                mentee,
                "Your mentor did not respond in time. We are trying your next preference."
                    .to_string(),
            );
            push(
                mentor,
                "A mentee match request expired before you responded.".to_string(),
            );
        }
        EVENT_MATCH_EXHAUSTED => {
            push(
                mentee,
                "No mentor is currently available for you. Program staff will follow up."
                    .to_string(),
            );
        }
        _ => {}
    }
    out
}

/// Background service writing notification rows for match events.
pub struct MatchNotifier {
    pool: DbPool,
}

impl MatchNotifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Run the notification loop until the persistence service stops.
    pub async fn run(self, mut receiver: mpsc::Receiver<PersistedEvent>) {
        while let Some(persisted) = receiver.recv().await {
            self.deliver(persisted.event_id, &persisted.event).await;
        }
        tracing::info!("Event stream closed, match notifier shutting down");
    }

    /// Write the notification rows for one event. Returns how many were
    /// written.
    pub async fn deliver(&self, event_id: Option<DbId>, event: &PlatformEvent) -> usize {
        let mut written = 0;
        for note in notifications_for(event) {
            match NotificationRepo::create(
                &self.pool,
                event_id,
                note.user_id,
                &event.event_type,
                &note.message,
            )
            .await
            {
                Ok(_) => written += 1,
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        user_id = note.user_id,
                        event_type = %event.event_type,
                        "Failed to create notification"
                    );
                }
            }
        }
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn match_event(event_type: &str) -> PlatformEvent {
        PlatformEvent::new(event_type).with_payload(serde_json::json!({
            "mentor_user_id": 40,
            "mentee_user_id": 20,
            "match_score": 82,
        }))
    }

    #[test]
    fn proposal_notifies_mentor_with_score() {
        let notes = notifications_for(&match_event(EVENT_MATCH_PROPOSED));
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].user_id, 40);
        assert!(notes[0].message.contains("82%"));
    }

    #[test]
    fn accept_and_reject_notify_mentee() {
        for kind in [EVENT_MATCH_ACCEPTED, EVENT_MATCH_REJECTED] {
            let notes = notifications_for(&match_event(kind));
            assert_eq!(notes.len(), 1);
            assert_eq!(notes[0].user_id, 20);
        }
    }

    #[test]
    fn expiry_notifies_both_sides() {
        let notes = notifications_for(&match_event(EVENT_MATCH_EXPIRED));
        let users: Vec<DbId> = notes.iter().map(|n| n.user_id).collect();
        assert_eq!(users, vec![20, 40]);
    }

    #[test]
    fn unknown_event_notifies_nobody() {
        assert!(notifications_for(&match_event("program.created")).is_empty());
    }

    #[test]
    fn missing_recipient_is_skipped() {
        let event = PlatformEvent::new(EVENT_MATCH_ACCEPTED);
        assert!(notifications_for(&event).is_empty());
    }
}
