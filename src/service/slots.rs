use std::sync::Arc;

use super::{ServiceError, SlotRepository};
use crate::domain::{Participant, Timeslot};
use crate::repository::{hydrate, Aggregate, Repository};
use crate::slot::BookingSlot;

/// Commands and queries against timeslot aggregates. Each command holds
/// the slot's single-writer lock for exactly one load-commit cycle; the
/// caller gets an answer as soon as the slot's own events are durable,
/// before any relayed effects have run.
#[derive(Clone)]
pub struct SlotService {
    repo: Arc<SlotRepository>,
}

impl SlotService {
    pub fn new(repo: Arc<SlotRepository>) -> Self {
        SlotService { repo }
    }

    pub fn repo(&self) -> &SlotRepository {
        &self.repo
    }

    /// Mark a participant as available for booking within the slot.
    pub fn mark_available(
        &self,
        slot_id: &str,
        participant: Participant,
    ) -> Result<(), ServiceError> {
        let mut slot = self.load(slot_id)?;
        slot.mark_available(participant);
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    /// Withdraw a participant's availability mark.
    pub fn unmark_available(
        &self,
        slot_id: &str,
        participant: Participant,
    ) -> Result<(), ServiceError> {
        let mut slot = self.load(slot_id)?;
        slot.unmark_available(participant);
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    /// Reserve all three participants for the slot under one booking ID.
    pub fn book_reservation(
        &self,
        slot_id: &str,
        student_id: &str,
        aircraft_id: &str,
        instructor_id: &str,
        booking_id: &str,
    ) -> Result<(), ServiceError> {
        let mut slot = self.load(slot_id)?;
        if let Err(rejection) = slot.book(student_id, aircraft_id, instructor_id, booking_id) {
            self.repo.abort(slot_id)?;
            return Err(rejection.into());
        }
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    /// Cancel a booking. Unknown booking IDs are a no-op success.
    pub fn cancel_booking(&self, slot_id: &str, booking_id: &str) -> Result<(), ServiceError> {
        let mut slot = self.load(slot_id)?;
        slot.cancel(booking_id);
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    /// Current snapshot of the slot. Never-touched slots read as empty.
    pub fn get_slot(&self, slot_id: &str) -> Result<Timeslot, ServiceError> {
        match self.repo.peek(slot_id)? {
            Some(entity) => {
                let slot: BookingSlot = hydrate(entity)?;
                Ok(slot.slot().clone())
            }
            None => Ok(Timeslot::new()),
        }
    }

    fn load(&self, slot_id: &str) -> Result<BookingSlot, ServiceError> {
        match self.repo.get(slot_id)? {
            Some(entity) => match hydrate(entity) {
                Ok(slot) => Ok(slot),
                Err(err) => {
                    self.repo.abort(slot_id)?;
                    Err(err.into())
                }
            },
            None => Ok(BookingSlot::with_id(slot_id)),
        }
    }
}
