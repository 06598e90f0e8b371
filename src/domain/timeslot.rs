use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Participant;

/// One participant's share of a reservation. A completed reservation
/// produces exactly three `Booking` records sharing a `booking_id`, one
/// per participant type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Booking {
    pub participant: Participant,
    pub booking_id: String,
}

impl Booking {
    pub fn new(participant: Participant, booking_id: impl Into<String>) -> Self {
        Booking {
            participant,
            booking_id: booking_id.into(),
        }
    }
}

/// Canonical state of one timeslot: who has opted in, and which
/// participants are reserved under which booking.
///
/// A participant never appears in `available` and `bookings` at the same
/// time — booking consumes the availability mark.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    pub available: HashSet<Participant>,
    pub bookings: HashSet<Booking>,
}

impl Timeslot {
    pub fn new() -> Self {
        Timeslot::default()
    }

    /// Idempotent set insert.
    pub fn mark_available(&mut self, participant: Participant) {
        self.available.insert(participant);
    }

    /// No-op when the participant was never marked.
    pub fn unmark_available(&mut self, participant: &Participant) {
        self.available.remove(participant);
    }

    /// Reserve a participant under a booking, consuming its availability
    /// mark.
    pub fn book(&mut self, participant: Participant, booking_id: impl Into<String>) {
        self.available.remove(&participant);
        self.bookings.insert(Booking::new(participant, booking_id));
    }

    /// Release one participant's share of a booking. The availability
    /// mark is not restored.
    pub fn cancel(&mut self, participant: &Participant, booking_id: &str) {
        self.bookings.retain(|booking| {
            !(booking.booking_id == booking_id && &booking.participant == participant)
        });
    }

    /// All bookings recorded under the given booking ID (0 to 3).
    pub fn find_booking(&self, booking_id: &str) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|booking| booking.booking_id == booking_id)
            .collect()
    }

    pub fn is_available(&self, participant: &Participant) -> bool {
        self.available.contains(participant)
    }
}
