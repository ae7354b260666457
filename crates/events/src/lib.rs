//! Match lifecycle events and notification fan-out.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`] -- the canonical domain event envelope.
//! - [`EventPersistence`] -- background service that durably writes every
//!   event to the `events` table and forwards it with its row id.
//! - [`MatchNotifier`] -- downstream of persistence; turns match events into
//!   per-user notification rows linked to the stored event.

pub mod bus;
pub mod notifier;
pub mod persistence;

pub use bus::{EventBus, PlatformEvent};
pub use notifier::MatchNotifier;
pub use persistence::{EventPersistence, PersistedEvent};

/// A new pending match was proposed to a mentor.
pub const EVENT_MATCH_PROPOSED: &str = "match.proposed";
/// A mentor accepted a match.
pub const EVENT_MATCH_ACCEPTED: &str = "match.accepted";
/// A mentor rejected a match.
pub const EVENT_MATCH_REJECTED: &str = "match.rejected";
/// A pending match passed its deadline unanswered.
pub const EVENT_MATCH_EXPIRED: &str = "match.expired";
/// No eligible mentor remained for a registration.
pub const EVENT_MATCH_EXHAUSTED: &str = "match.exhausted";

/// Entity type used as `source_entity_type` for match events.
pub const ENTITY_MATCH: &str = "match_record";
/// Entity type used as `source_entity_type` for registration events.
pub const ENTITY_REGISTRATION: &str = "mentee_registration";
