//! Wires the whole pipeline together over in-memory infrastructure:
//! two queued repositories, two buses, the outbox workers feeding them,
//! the relay, and the view.

use std::fmt;
use std::sync::Arc;

use crate::bus::InMemoryQueue;
use crate::outbox::OutboxWorker;
use crate::relay::{RelayError, SlotToParticipantRelay};
use crate::repository::{HashMapRepository, Queueable, RepositoryError};
use crate::service::{ParticipantSlotService, ServiceError, SlotRepository, SlotService};
use crate::view::{ParticipantSlotsView, ViewError};

/// Failure in one of the pipeline's stages.
#[derive(Debug)]
pub enum AppError {
    Service(ServiceError),
    Relay(RelayError),
    View(ViewError),
    Repository(RepositoryError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Service(err) => write!(f, "{}", err),
            AppError::Relay(err) => write!(f, "{}", err),
            AppError::View(err) => write!(f, "{}", err),
            AppError::Repository(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        AppError::Service(err)
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        AppError::Relay(err)
    }
}

impl From<ViewError> for AppError {
    fn from(err: ViewError) -> Self {
        AppError::View(err)
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        AppError::Repository(err)
    }
}

/// The assembled scheduling pipeline.
///
/// Slot commands return as soon as the slot's own events are committed;
/// everything downstream — relayed participant-slot commands and view
/// rows — is delivered asynchronously by the outbox workers. [`settle`]
/// stands in for the platform's background delivery: it pumps every
/// stage until nothing moves, after which the derived state is
/// consistent with the source aggregates.
///
/// [`settle`]: FlightApp::settle
pub struct FlightApp {
    slot_repo: Arc<SlotRepository>,
    participant_repo: Arc<SlotRepository>,
    slot_bus: InMemoryQueue,
    participant_bus: InMemoryQueue,
    slots: SlotService,
    participant_slots: ParticipantSlotService,
    slot_outbox: OutboxWorker<InMemoryQueue>,
    participant_outbox: OutboxWorker<InMemoryQueue>,
    relay: SlotToParticipantRelay<InMemoryQueue>,
    view: ParticipantSlotsView<InMemoryQueue>,
}

impl Default for FlightApp {
    fn default() -> Self {
        Self::new()
    }
}

impl FlightApp {
    pub fn new() -> Self {
        let slot_repo = Arc::new(HashMapRepository::new().queued());
        let participant_repo = Arc::new(HashMapRepository::new().queued());
        let slot_bus = InMemoryQueue::new();
        let participant_bus = InMemoryQueue::new();

        let slots = SlotService::new(Arc::clone(&slot_repo));
        let participant_slots = ParticipantSlotService::new(Arc::clone(&participant_repo));
        let relay =
            SlotToParticipantRelay::new(slot_bus.new_subscriber(), participant_slots.clone());
        let view = ParticipantSlotsView::new(participant_bus.new_subscriber());

        let slot_outbox = OutboxWorker::new(slot_bus.clone()).with_worker_id("slot-outbox");
        let participant_outbox =
            OutboxWorker::new(participant_bus.clone()).with_worker_id("participant-slot-outbox");

        FlightApp {
            slot_repo,
            participant_repo,
            slot_bus,
            participant_bus,
            slots,
            participant_slots,
            slot_outbox,
            participant_outbox,
            relay,
            view,
        }
    }

    /// Commands and queries against timeslots.
    pub fn slots(&self) -> &SlotService {
        &self.slots
    }

    /// Commands and queries against derived participant slots.
    pub fn participant_slots(&self) -> &ParticipantSlotService {
        &self.participant_slots
    }

    /// The participant-slots read model.
    pub fn view(&self) -> &ParticipantSlotsView<InMemoryQueue> {
        &self.view
    }

    /// The slot aggregates' event bus. Exposed so tests can simulate
    /// broker redelivery by republishing events.
    pub fn slot_bus(&self) -> &InMemoryQueue {
        &self.slot_bus
    }

    /// The participant-slot aggregates' event bus.
    pub fn participant_bus(&self) -> &InMemoryQueue {
        &self.participant_bus
    }

    /// A fresh view over the full participant-slot stream, for
    /// rebuild-from-scratch checks. Drive it with `run_once` (or
    /// [`settle`](FlightApp::settle) the app first so the stream is
    /// complete).
    pub fn rebuild_view(&self) -> ParticipantSlotsView<InMemoryQueue> {
        ParticipantSlotsView::new(self.participant_bus.new_subscriber())
    }

    /// Pump outbox → relay → outbox → view until every stage reports no
    /// work. Callers observe the pipeline's eventually consistent state
    /// deterministically after this returns.
    pub fn settle(&self) -> Result<(), AppError> {
        loop {
            let mut worked = false;

            let drained = self.slot_outbox.drain(self.slot_repo.inner())?;
            worked |= drained.completed > 0;

            while self.relay.run_once()? {
                worked = true;
            }

            let drained = self.participant_outbox.drain(self.participant_repo.inner())?;
            worked |= drained.completed > 0;

            while self.view.run_once()? {
                worked = true;
            }

            if !worked {
                return Ok(());
            }
        }
    }
}
