//! Read model over participant-slot events: one row per
//! (slot, participant) pair, answering "which slots is this participant
//! available or booked in."
//!
//! The row set is a cache, not a source of truth. Every event overwrites
//! its row, so duplicate delivery is absorbed, and replaying the whole
//! stream into an empty store rebuilds an identical row set.

mod row;
mod store;

use std::fmt;

use crate::bus::{PublishError, Subscriber};
use crate::domain::AvailabilityStatus;
use crate::participant_slot::ParticipantSlotEvent;

pub use row::SlotRow;
pub use store::SlotRowStore;

/// Error type for view operations.
#[derive(Debug)]
pub enum ViewError {
    /// Row (de)serialization failed.
    Serde(String),
    /// Row storage failed.
    Storage(&'static str),
    /// Polling or acknowledging the event stream failed.
    Bus(PublishError),
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewError::Serde(msg) => write!(f, "row serialization error: {}", msg),
            ViewError::Storage(msg) => write!(f, "row storage error: {}", msg),
            ViewError::Bus(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ViewError {}

impl From<PublishError> for ViewError {
    fn from(err: PublishError) -> Self {
        ViewError::Bus(err)
    }
}

/// Consumes participant-slot events and maintains the queryable rows.
pub struct ParticipantSlotsView<S> {
    subscriber: S,
    rows: SlotRowStore,
}

impl<S: Subscriber> ParticipantSlotsView<S> {
    pub fn new(subscriber: S) -> Self {
        ParticipantSlotsView {
            subscriber,
            rows: SlotRowStore::new(),
        }
    }

    /// Process at most one event; returns whether one was processed.
    /// Undecodable payloads are skipped and acknowledged.
    pub fn run_once(&self) -> Result<bool, ViewError> {
        let Some(event) = self.subscriber.poll(0)? else {
            return Ok(false);
        };

        match event.decode::<ParticipantSlotEvent>() {
            Ok(slot_event) => self.update_row(&slot_event)?,
            Err(err) => {
                tracing::warn!(
                    event_type = %event.event_type,
                    error = %err,
                    "undecodable participant-slot event skipped"
                );
            }
        }

        self.subscriber.ack(&event.id)?;
        Ok(true)
    }

    /// Overwrite the one row this event maps to. Last write wins; the
    /// update carries everything the row needs, so applying the same
    /// event twice is a no-op.
    fn update_row(&self, event: &ParticipantSlotEvent) -> Result<(), ViewError> {
        let row = match event {
            ParticipantSlotEvent::MarkedAvailable { .. } => SlotRow {
                slot_id: event.slot_id().to_string(),
                participant_id: event.participant_id().to_string(),
                participant_type: event.participant_type(),
                booking_id: String::new(),
                status: AvailabilityStatus::Available,
            },
            ParticipantSlotEvent::UnmarkedAvailable { .. } => {
                // Withdrawal does not disturb a recorded booking ID.
                let existing_booking_id = self
                    .rows
                    .get(event.slot_id(), event.participant_id())?
                    .map(|row| row.booking_id)
                    .unwrap_or_default();
                SlotRow {
                    slot_id: event.slot_id().to_string(),
                    participant_id: event.participant_id().to_string(),
                    participant_type: event.participant_type(),
                    booking_id: existing_booking_id,
                    status: AvailabilityStatus::Unavailable,
                }
            }
            ParticipantSlotEvent::Booked { booking_id, .. } => SlotRow {
                slot_id: event.slot_id().to_string(),
                participant_id: event.participant_id().to_string(),
                participant_type: event.participant_type(),
                booking_id: booking_id.clone(),
                status: AvailabilityStatus::Booked,
            },
            ParticipantSlotEvent::Canceled { .. } => SlotRow {
                slot_id: event.slot_id().to_string(),
                participant_id: event.participant_id().to_string(),
                participant_type: event.participant_type(),
                booking_id: String::new(),
                status: AvailabilityStatus::Available,
            },
        };

        self.rows.upsert(&row)
    }

    /// All slots the participant has state in.
    pub fn slots_by_participant(&self, participant_id: &str) -> Result<Vec<SlotRow>, ViewError> {
        self.rows
            .find(|row| row.participant_id == participant_id)
    }

    /// The participant's slots filtered by status.
    pub fn slots_by_participant_and_status(
        &self,
        participant_id: &str,
        status: AvailabilityStatus,
    ) -> Result<Vec<SlotRow>, ViewError> {
        self.rows
            .find(|row| row.participant_id == participant_id && row.status == status)
    }

    pub fn rows(&self) -> &SlotRowStore {
        &self.rows
    }
}
