use tracing::{error, info, warn};

use super::ParticipantSlotEvent;
use crate::domain::{AvailabilityStatus, ParticipantType, Rejection};
use crate::entity::{Entity, EventRecord, PayloadError};
use crate::repository::Aggregate;

/// State of one participant within one timeslot. `None` at the
/// aggregate level means absent: no event has ever been recorded for
/// this identity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParticipantSlotState {
    pub slot_id: String,
    pub participant_id: String,
    pub participant_type: ParticipantType,
    pub status: AvailabilityStatus,
}

/// Aggregate tracking one participant's bookability within one slot.
///
/// Commands arrive from the relay, which derives this aggregate's
/// identity from slot events. Redelivered commands are absorbed: marks
/// against an already-available or booked slot are skipped, and repeated
/// book/cancel commands are rejected without appending events — so the
/// final state after N deliveries equals the state after one.
#[derive(Debug, Default)]
pub struct ParticipantSlot {
    entity: Entity,
    state: Option<ParticipantSlotState>,
}

impl ParticipantSlot {
    pub fn with_id(id: impl Into<String>) -> Self {
        ParticipantSlot {
            entity: Entity::with_id(id),
            state: None,
        }
    }

    pub fn state(&self) -> Option<&ParticipantSlotState> {
        self.state.as_ref()
    }

    pub fn status(&self) -> Option<AvailabilityStatus> {
        self.state.as_ref().map(|state| state.status)
    }

    fn is_unavailable(&self) -> bool {
        match &self.state {
            None => true,
            Some(state) => state.status == AvailabilityStatus::Unavailable,
        }
    }

    /// Mark this participant available. Effectful only from absent or
    /// unavailable; otherwise the command is skipped and still reported
    /// as success.
    pub fn mark_available(
        &mut self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
    ) {
        if self.is_unavailable() {
            self.raise(ParticipantSlotEvent::MarkedAvailable {
                slot_id: slot_id.to_string(),
                participant_id: participant_id.to_string(),
                participant_type,
            });
            return;
        }

        warn!(
            status = %self.state.as_ref().map(|s| s.status.value()).unwrap_or("absent"),
            "command to mark participant slot available that was already in status skipped"
        );
    }

    /// Withdraw availability. Absent state means there is nothing to
    /// unmark — that is a success with no event. Any recorded state,
    /// including booked, transitions to unavailable.
    pub fn unmark_available(
        &mut self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
    ) {
        if self.state.is_none() {
            warn!(
                participant_id,
                slot_id, "command to unmark unavailable participant skipped"
            );
            return;
        }

        info!(participant_id, slot_id, "unmarking availability");
        self.raise(ParticipantSlotEvent::UnmarkedAvailable {
            slot_id: slot_id.to_string(),
            participant_id: participant_id.to_string(),
            participant_type,
        });
    }

    /// Reserve this participant under a booking. Only an available
    /// participant can be booked.
    pub fn book(
        &mut self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
        booking_id: &str,
    ) -> Result<(), Rejection> {
        if self.is_unavailable() {
            return Err(Rejection::NotAvailable);
        }
        if self.status() == Some(AvailabilityStatus::Booked) {
            return Err(Rejection::AlreadyBooked);
        }

        self.raise(ParticipantSlotEvent::Booked {
            slot_id: slot_id.to_string(),
            participant_id: participant_id.to_string(),
            participant_type,
            booking_id: booking_id.to_string(),
        });
        Ok(())
    }

    /// Release this participant's share of a booking. Cancellation
    /// restores availability at this level — unlike the slot aggregate,
    /// which leaves its availability set untouched.
    pub fn cancel(
        &mut self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
        booking_id: &str,
    ) -> Result<(), Rejection> {
        if self.is_unavailable() {
            return Err(Rejection::CancelUnavailable);
        }
        if self.status() != Some(AvailabilityStatus::Booked) {
            error!(
                participant_id,
                slot_id, "cancel ignored for non booked participant"
            );
            return Err(Rejection::CancelNotBooked);
        }

        self.raise(ParticipantSlotEvent::Canceled {
            slot_id: slot_id.to_string(),
            participant_id: participant_id.to_string(),
            participant_type,
            booking_id: booking_id.to_string(),
        });
        Ok(())
    }

    fn raise(&mut self, event: ParticipantSlotEvent) {
        self.entity.digest(event.name(), &event);
        self.apply(&event);
    }

    fn apply(&mut self, event: &ParticipantSlotEvent) {
        let status = match event {
            ParticipantSlotEvent::MarkedAvailable { .. } => AvailabilityStatus::Available,
            ParticipantSlotEvent::UnmarkedAvailable { .. } => AvailabilityStatus::Unavailable,
            ParticipantSlotEvent::Booked { .. } => AvailabilityStatus::Booked,
            ParticipantSlotEvent::Canceled { .. } => AvailabilityStatus::Available,
        };

        // Each event carries the identity fields, so the fold is total
        // even when the first recorded event is not a MarkedAvailable.
        self.state = Some(ParticipantSlotState {
            slot_id: event.slot_id().to_string(),
            participant_id: event.participant_id().to_string(),
            participant_type: event.participant_type(),
            status,
        });
    }
}

impl Aggregate for ParticipantSlot {
    type ReplayError = PayloadError;

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn replay_event(&mut self, event: &EventRecord) -> Result<(), Self::ReplayError> {
        let event: ParticipantSlotEvent = event.decode()?;
        self.apply(&event);
        Ok(())
    }
}
