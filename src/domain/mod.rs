//! Domain value types: participants, bookings, and timeslot state.

mod error;
mod participant;
mod timeslot;

pub use error::Rejection;
pub use participant::{AvailabilityStatus, ParseEnumError, Participant, ParticipantType};
pub use timeslot::{Booking, Timeslot};
