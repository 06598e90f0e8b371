use serde::{Deserialize, Serialize};

use crate::domain::{AvailabilityStatus, ParticipantType};

/// One queryable row: a participant's standing within one slot.
/// `booking_id` is empty while no booking is active.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRow {
    pub slot_id: String,
    pub participant_id: String,
    pub participant_type: ParticipantType,
    pub booking_id: String,
    pub status: AvailabilityStatus,
}

impl SlotRow {
    /// Storage key, matching the participant-slot aggregate identity.
    pub fn key(&self) -> String {
        format!("{}-{}", self.slot_id, self.participant_id)
    }
}
