//! Event-sourced scheduling for flight-training sessions.
//!
//! A training flight needs three resources at once — a student, an
//! instructor, and an aircraft. Each must be marked available for a
//! timeslot before a booking can reserve all three together, and a
//! cancellation releases all three.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  commands  ┌──────────────────┐
//! │ SlotService  │───────────▶│   BookingSlot    │  per-slot event log
//! └──────────────┘            └────────┬─────────┘
//!                                      │ outbox → bus (at-least-once)
//!                                      ▼
//!                             ┌──────────────────┐
//!                             │ SlotToParticipant│  derives "{slot}-{participant}"
//!                             │      Relay       │  and issues commands
//!                             └────────┬─────────┘
//!                                      ▼
//!                             ┌──────────────────┐
//!                             │ ParticipantSlot  │  per-(slot, participant) log
//!                             └────────┬─────────┘
//!                                      │ outbox → bus
//!                                      ▼
//!                             ┌──────────────────┐
//!                             │ ParticipantSlots │  queryable rows keyed by
//!                             │       View       │  (slot, participant)
//!                             └──────────────────┘
//! ```
//!
//! The [`slot::BookingSlot`] aggregate is the source of truth; the
//! [`participant_slot::ParticipantSlot`] aggregate and the
//! [`view::ParticipantSlotsView`] are derived, eventually consistent
//! views fed by relayed events. [`app::FlightApp`] wires the whole
//! pipeline together over in-memory infrastructure.

pub mod app;
pub mod bus;
pub mod domain;
pub mod entity;
pub mod outbox;
pub mod participant_slot;
pub mod relay;
pub mod repository;
pub mod service;
pub mod slot;
pub mod view;

pub use app::{AppError, FlightApp};
pub use domain::{AvailabilityStatus, Booking, Participant, ParticipantType, Rejection, Timeslot};
pub use entity::{Entity, EventRecord, PayloadError};
pub use repository::{
    hydrate, Aggregate, HashMapRepository, Queueable, QueuedRepository, Repository,
    RepositoryError,
};
pub use service::{ParticipantSlotService, ServiceError, SlotService};
