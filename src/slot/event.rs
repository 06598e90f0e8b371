use serde::{Deserialize, Serialize};

use crate::domain::{Participant, ParticipantType};

/// Events appended to a timeslot's log. Every event carries the slot ID
/// and the full participant identity so downstream consumers can derive
/// the participant-slot aggregate key without extra lookups.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SlotEvent {
    ParticipantMarkedAvailable {
        slot_id: String,
        participant_id: String,
        participant_type: ParticipantType,
    },
    ParticipantUnmarkedAvailable {
        slot_id: String,
        participant_id: String,
        participant_type: ParticipantType,
    },
    ParticipantBooked {
        slot_id: String,
        participant_id: String,
        participant_type: ParticipantType,
        booking_id: String,
    },
    ParticipantCanceled {
        slot_id: String,
        participant_id: String,
        participant_type: ParticipantType,
        booking_id: String,
    },
}

impl SlotEvent {
    /// Stable event name recorded alongside the payload.
    pub fn name(&self) -> &'static str {
        match self {
            SlotEvent::ParticipantMarkedAvailable { .. } => "ParticipantMarkedAvailable",
            SlotEvent::ParticipantUnmarkedAvailable { .. } => "ParticipantUnmarkedAvailable",
            SlotEvent::ParticipantBooked { .. } => "ParticipantBooked",
            SlotEvent::ParticipantCanceled { .. } => "ParticipantCanceled",
        }
    }

    pub fn slot_id(&self) -> &str {
        match self {
            SlotEvent::ParticipantMarkedAvailable { slot_id, .. }
            | SlotEvent::ParticipantUnmarkedAvailable { slot_id, .. }
            | SlotEvent::ParticipantBooked { slot_id, .. }
            | SlotEvent::ParticipantCanceled { slot_id, .. } => slot_id,
        }
    }

    pub fn participant_id(&self) -> &str {
        match self {
            SlotEvent::ParticipantMarkedAvailable { participant_id, .. }
            | SlotEvent::ParticipantUnmarkedAvailable { participant_id, .. }
            | SlotEvent::ParticipantBooked { participant_id, .. }
            | SlotEvent::ParticipantCanceled { participant_id, .. } => participant_id,
        }
    }

    pub fn participant_type(&self) -> ParticipantType {
        match self {
            SlotEvent::ParticipantMarkedAvailable {
                participant_type, ..
            }
            | SlotEvent::ParticipantUnmarkedAvailable {
                participant_type, ..
            }
            | SlotEvent::ParticipantBooked {
                participant_type, ..
            }
            | SlotEvent::ParticipantCanceled {
                participant_type, ..
            } => *participant_type,
        }
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.participant_id(), self.participant_type())
    }
}
