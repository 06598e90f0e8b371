use std::sync::Arc;

use super::{ServiceError, SlotRepository};
use crate::domain::{AvailabilityStatus, ParticipantType};
use crate::participant_slot::ParticipantSlot;
use crate::repository::{hydrate, Aggregate, Repository};

/// Commands and queries against participant-slot aggregates, keyed by
/// the derived identity `"{slot_id}-{participant_id}"`. Invoked by the
/// relay rather than by end users.
#[derive(Clone)]
pub struct ParticipantSlotService {
    repo: Arc<SlotRepository>,
}

impl ParticipantSlotService {
    pub fn new(repo: Arc<SlotRepository>) -> Self {
        ParticipantSlotService { repo }
    }

    pub fn repo(&self) -> &SlotRepository {
        &self.repo
    }

    /// Derived aggregate identity. Participant IDs are globally unique,
    /// so the participant type is not part of the key.
    pub fn derive_id(slot_id: &str, participant_id: &str) -> String {
        format!("{}-{}", slot_id, participant_id)
    }

    pub fn mark_available(
        &self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
    ) -> Result<(), ServiceError> {
        let id = Self::derive_id(slot_id, participant_id);
        let mut slot = self.load(&id)?;
        slot.mark_available(slot_id, participant_id, participant_type);
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    pub fn unmark_available(
        &self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
    ) -> Result<(), ServiceError> {
        let id = Self::derive_id(slot_id, participant_id);
        let mut slot = self.load(&id)?;
        slot.unmark_available(slot_id, participant_id, participant_type);
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    pub fn book(
        &self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
        booking_id: &str,
    ) -> Result<(), ServiceError> {
        let id = Self::derive_id(slot_id, participant_id);
        let mut slot = self.load(&id)?;
        if let Err(rejection) = slot.book(slot_id, participant_id, participant_type, booking_id) {
            self.repo.abort(&id)?;
            return Err(rejection.into());
        }
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    pub fn cancel(
        &self,
        slot_id: &str,
        participant_id: &str,
        participant_type: ParticipantType,
        booking_id: &str,
    ) -> Result<(), ServiceError> {
        let id = Self::derive_id(slot_id, participant_id);
        let mut slot = self.load(&id)?;
        if let Err(rejection) = slot.cancel(slot_id, participant_id, participant_type, booking_id) {
            self.repo.abort(&id)?;
            return Err(rejection.into());
        }
        self.repo.commit(slot.entity_mut())?;
        Ok(())
    }

    /// Current status of a participant within a slot; `None` when no
    /// event was ever recorded for the pair.
    pub fn status(
        &self,
        slot_id: &str,
        participant_id: &str,
    ) -> Result<Option<AvailabilityStatus>, ServiceError> {
        let id = Self::derive_id(slot_id, participant_id);
        match self.repo.peek(&id)? {
            Some(entity) => {
                let slot: ParticipantSlot = hydrate(entity)?;
                Ok(slot.status())
            }
            None => Ok(None),
        }
    }

    fn load(&self, id: &str) -> Result<ParticipantSlot, ServiceError> {
        match self.repo.get(id)? {
            Some(entity) => match hydrate(entity) {
                Ok(slot) => Ok(slot),
                Err(err) => {
                    self.repo.abort(id)?;
                    Err(err.into())
                }
            },
            None => Ok(ParticipantSlot::with_id(id)),
        }
    }
}
