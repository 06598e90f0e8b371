use tracing::info;

use super::SlotEvent;
use crate::domain::{Participant, ParticipantType, Rejection, Timeslot};
use crate::entity::{Entity, EventRecord, PayloadError};
use crate::repository::Aggregate;

/// Aggregate owning the canonical availability/booking state of one
/// timeslot. Commands validate against the current snapshot and append
/// events; `apply` is the single fold shared by the write path and
/// replay.
#[derive(Debug, Default)]
pub struct BookingSlot {
    entity: Entity,
    state: Timeslot,
}

impl BookingSlot {
    pub fn with_id(slot_id: impl Into<String>) -> Self {
        BookingSlot {
            entity: Entity::with_id(slot_id),
            state: Timeslot::new(),
        }
    }

    pub fn slot_id(&self) -> &str {
        self.entity.id()
    }

    /// Current snapshot. Pure read; appends nothing.
    pub fn slot(&self) -> &Timeslot {
        &self.state
    }

    /// Record that a participant is open for booking in this slot.
    /// Always succeeds; marking twice leaves one availability entry.
    pub fn mark_available(&mut self, participant: Participant) {
        info!(
            slot_id = %self.entity.id(),
            participant_id = %participant.id,
            "marking participant available"
        );
        self.raise(SlotEvent::ParticipantMarkedAvailable {
            slot_id: self.entity.id().to_string(),
            participant_id: participant.id,
            participant_type: participant.participant_type,
        });
    }

    /// Withdraw a participant's availability. Always succeeds; the event
    /// is appended even when the participant was never marked, and the
    /// fold treats the removal as a no-op.
    pub fn unmark_available(&mut self, participant: Participant) {
        self.raise(SlotEvent::ParticipantUnmarkedAvailable {
            slot_id: self.entity.id().to_string(),
            participant_id: participant.id,
            participant_type: participant.participant_type,
        });
    }

    /// Reserve a student, instructor, and aircraft together under one
    /// booking ID. All three must currently be available; on success
    /// exactly three `ParticipantBooked` events are appended as one
    /// batch, never fewer.
    pub fn book(
        &mut self,
        student_id: &str,
        aircraft_id: &str,
        instructor_id: &str,
        booking_id: &str,
    ) -> Result<(), Rejection> {
        let participants = [
            Participant::new(student_id, ParticipantType::Student),
            Participant::new(instructor_id, ParticipantType::Instructor),
            Participant::new(aircraft_id, ParticipantType::Aircraft),
        ];

        let all_available = participants
            .iter()
            .all(|participant| self.state.is_available(participant));
        if !all_available {
            return Err(Rejection::NotAllParticipantsAvailable);
        }

        for participant in participants {
            self.raise(SlotEvent::ParticipantBooked {
                slot_id: self.entity.id().to_string(),
                participant_id: participant.id,
                participant_type: participant.participant_type,
                booking_id: booking_id.to_string(),
            });
        }
        Ok(())
    }

    /// Release every participant reserved under `booking_id` (0 to 3).
    /// An unknown booking ID yields an empty batch and is still a
    /// success.
    pub fn cancel(&mut self, booking_id: &str) {
        info!(booking_id, "cancelling booking");
        let participants: Vec<Participant> = self
            .state
            .find_booking(booking_id)
            .into_iter()
            .map(|booking| booking.participant.clone())
            .collect();

        for participant in participants {
            self.raise(SlotEvent::ParticipantCanceled {
                slot_id: self.entity.id().to_string(),
                participant_id: participant.id,
                participant_type: participant.participant_type,
                booking_id: booking_id.to_string(),
            });
        }
    }

    fn raise(&mut self, event: SlotEvent) {
        self.entity.digest(event.name(), &event);
        self.apply(&event);
    }

    fn apply(&mut self, event: &SlotEvent) {
        match event {
            SlotEvent::ParticipantMarkedAvailable { .. } => {
                self.state.mark_available(event.participant());
            }
            SlotEvent::ParticipantUnmarkedAvailable { .. } => {
                self.state.unmark_available(&event.participant());
            }
            SlotEvent::ParticipantBooked { booking_id, .. } => {
                self.state.book(event.participant(), booking_id.clone());
            }
            SlotEvent::ParticipantCanceled { booking_id, .. } => {
                self.state.cancel(&event.participant(), booking_id);
            }
        }
    }
}

impl Aggregate for BookingSlot {
    type ReplayError = PayloadError;

    fn entity(&self) -> &Entity {
        &self.entity
    }

    fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    fn replay_event(&mut self, event: &EventRecord) -> Result<(), Self::ReplayError> {
        let event: SlotEvent = event.decode()?;
        self.apply(&event);
        Ok(())
    }
}
