//! Relays slot events into participant-slot commands.
//!
//! This is the only link between the two aggregate families: no
//! cross-aggregate transaction exists. The relay is stateless — the
//! target identity is a pure function of each event — and leans on the
//! participant-slot aggregate's idempotent command handling to stay safe
//! under at-least-once redelivery.

use std::fmt;

use tracing::warn;

use crate::bus::{PublishError, Subscriber};
use crate::service::{ParticipantSlotService, ServiceError};
use crate::slot::SlotEvent;

/// Infrastructure failure inside the relay. Business rejections from
/// the target aggregate never surface here; they are logged and the
/// event acknowledged.
#[derive(Debug)]
pub enum RelayError {
    Service(ServiceError),
    Bus(PublishError),
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Service(err) => write!(f, "{}", err),
            RelayError::Bus(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RelayError {}

impl From<ServiceError> for RelayError {
    fn from(err: ServiceError) -> Self {
        RelayError::Service(err)
    }
}

impl From<PublishError> for RelayError {
    fn from(err: PublishError) -> Self {
        RelayError::Bus(err)
    }
}

/// Target aggregate identity for a slot event: `"{slot_id}-{participant_id}"`.
/// Total and deterministic, so replays always land on the same identity.
pub fn participant_slot_id(event: &SlotEvent) -> String {
    ParticipantSlotService::derive_id(event.slot_id(), event.participant_id())
}

/// Subscribes to the slot event stream and issues the corresponding
/// command against the derived participant-slot aggregate.
pub struct SlotToParticipantRelay<S> {
    subscriber: S,
    participant_slots: ParticipantSlotService,
}

impl<S: Subscriber> SlotToParticipantRelay<S> {
    pub fn new(subscriber: S, participant_slots: ParticipantSlotService) -> Self {
        SlotToParticipantRelay {
            subscriber,
            participant_slots,
        }
    }

    /// Process at most one event; returns whether one was processed.
    ///
    /// A business rejection from the target aggregate is logged and the
    /// event acknowledged: rejections only arise from redelivery (the
    /// command already took effect) and retrying one can never succeed.
    pub fn run_once(&self) -> Result<bool, RelayError> {
        let Some(event) = self.subscriber.poll(0)? else {
            return Ok(false);
        };

        let outcome = match event.decode::<SlotEvent>() {
            Ok(slot_event) => self.dispatch(&slot_event),
            Err(err) => {
                // Foreign or corrupt payloads cannot be dispatched;
                // surface them in the log and move on.
                warn!(event_type = %event.event_type, error = %err, "undecodable slot event skipped");
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {}
            Err(ServiceError::Rejected(rejection)) => {
                warn!(
                    event_type = %event.event_type,
                    rejection = %rejection,
                    "relayed command rejected; acknowledging event"
                );
            }
            Err(err) => return Err(err.into()),
        }

        self.subscriber.ack(&event.id)?;
        Ok(true)
    }

    fn dispatch(&self, event: &SlotEvent) -> Result<(), ServiceError> {
        match event {
            SlotEvent::ParticipantBooked { booking_id, .. } => self.participant_slots.book(
                event.slot_id(),
                event.participant_id(),
                event.participant_type(),
                booking_id,
            ),
            SlotEvent::ParticipantCanceled { booking_id, .. } => self.participant_slots.cancel(
                event.slot_id(),
                event.participant_id(),
                event.participant_type(),
                booking_id,
            ),
            SlotEvent::ParticipantMarkedAvailable { .. } => {
                self.participant_slots.mark_available(
                    event.slot_id(),
                    event.participant_id(),
                    event.participant_type(),
                )
            }
            SlotEvent::ParticipantUnmarkedAvailable { .. } => {
                self.participant_slots.unmark_available(
                    event.slot_id(),
                    event.participant_id(),
                    event.participant_type(),
                )
            }
        }
    }
}
