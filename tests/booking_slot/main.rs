//! Integration tests for the timeslot aggregate behind its service:
//! availability marking, atomic triple booking, and cancellation.

use std::sync::Arc;

use flightbook::outbox::OutboxRepository;
use flightbook::{
    hydrate, slot::BookingSlot, HashMapRepository, Participant, ParticipantType, Queueable,
    Rejection, SlotService,
};

fn service() -> SlotService {
    SlotService::new(Arc::new(HashMapRepository::new().queued()))
}

fn mark_crew(service: &SlotService, slot_id: &str) {
    service
        .mark_available(slot_id, Participant::new("sofia", ParticipantType::Student))
        .unwrap();
    service
        .mark_available(
            slot_id,
            Participant::new("mr-reyes", ParticipantType::Instructor),
        )
        .unwrap();
    service
        .mark_available(slot_id, Participant::new("cenizo", ParticipantType::Aircraft))
        .unwrap();
}

#[test]
fn unmark_without_prior_mark_is_a_no_op_success() {
    let service = service();
    service
        .unmark_available(
            "test-pilot",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();

    let slot = service.get_slot("test-pilot").unwrap();
    assert!(slot.available.is_empty());
    assert!(slot.bookings.is_empty());
}

#[test]
fn booking_reserves_all_three_participants_under_one_id() {
    let service = service();
    mark_crew(&service, "test-pilot");

    service
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();

    let slot = service.get_slot("test-pilot").unwrap();
    assert!(slot.available.is_empty());
    assert_eq!(slot.bookings.len(), 3);
    assert!(slot.bookings.iter().all(|b| b.booking_id == "B1"));

    let types: Vec<ParticipantType> = slot
        .bookings
        .iter()
        .map(|b| b.participant.participant_type)
        .collect();
    assert!(types.contains(&ParticipantType::Student));
    assert!(types.contains(&ParticipantType::Instructor));
    assert!(types.contains(&ParticipantType::Aircraft));
}

#[test]
fn booking_fails_when_any_participant_was_never_marked() {
    let service = service();
    service
        .mark_available(
            "test-pilot",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();
    service
        .mark_available(
            "test-pilot",
            Participant::new("mr-reyes", ParticipantType::Instructor),
        )
        .unwrap();

    let err = service
        .book_reservation("test-pilot", "sofia", "unavailable-id", "mr-reyes", "B1")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not all of the requested participants are available for the training flight"
    );
    assert_eq!(err.rejection(), Some(&Rejection::NotAllParticipantsAvailable));

    // No booked events reached the log or the outbox.
    let slot = service.get_slot("test-pilot").unwrap();
    assert!(slot.bookings.is_empty());
    assert_eq!(slot.available.len(), 2);
    let outbox = service.repo().inner().peek_outbox().unwrap();
    assert!(outbox.iter().all(|r| r.event_type == "ParticipantMarkedAvailable"));
}

#[test]
fn booking_emits_its_three_events_as_one_batch() {
    let service = service();
    mark_crew(&service, "test-pilot");
    service
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();

    let outbox = service.repo().inner().peek_outbox().unwrap();
    let booked: Vec<_> = outbox
        .iter()
        .filter(|r| r.event_type == "ParticipantBooked")
        .collect();
    assert_eq!(booked.len(), 3);
    // The batch occupies consecutive log sequences of the same aggregate.
    let mut sequences: Vec<u64> = booked.iter().map(|r| r.sequence).collect();
    sequences.sort_unstable();
    assert_eq!(sequences, vec![4, 5, 6]);
}

#[test]
fn cancel_releases_the_booking_without_restoring_availability() {
    let service = service();
    mark_crew(&service, "test-pilot");
    service
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();

    service.cancel_booking("test-pilot", "B1").unwrap();

    let slot = service.get_slot("test-pilot").unwrap();
    assert!(slot.bookings.is_empty());
    assert!(slot.available.is_empty());
}

#[test]
fn cancel_of_unknown_booking_id_succeeds_and_changes_nothing() {
    let service = service();
    mark_crew(&service, "test-pilot");

    service.cancel_booking("test-pilot", "missing").unwrap();

    let slot = service.get_slot("test-pilot").unwrap();
    assert_eq!(slot.available.len(), 3);
    assert!(slot.bookings.is_empty());
}

#[test]
fn cancel_leaves_other_bookings_untouched() {
    let service = service();
    mark_crew(&service, "test-pilot");
    service
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();

    service
        .mark_available(
            "test-pilot",
            Participant::new("maria", ParticipantType::Student),
        )
        .unwrap();
    service
        .mark_available(
            "test-pilot",
            Participant::new("ms-ortiz", ParticipantType::Instructor),
        )
        .unwrap();
    service
        .mark_available(
            "test-pilot",
            Participant::new("husky", ParticipantType::Aircraft),
        )
        .unwrap();
    service
        .book_reservation("test-pilot", "maria", "husky", "ms-ortiz", "B2")
        .unwrap();

    service.cancel_booking("test-pilot", "B1").unwrap();

    let slot = service.get_slot("test-pilot").unwrap();
    assert_eq!(slot.bookings.len(), 3);
    assert!(slot.bookings.iter().all(|b| b.booking_id == "B2"));
}

#[test]
fn slots_are_independent_aggregates() {
    let service = service();
    mark_crew(&service, "test-pilot");
    service
        .mark_available(
            "night-vfr",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();

    service
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();

    // Booking on test-pilot consumed nothing on night-vfr.
    let other = service.get_slot("night-vfr").unwrap();
    assert_eq!(other.available.len(), 1);
    assert!(other.bookings.is_empty());
}

#[test]
fn rehydrating_from_the_persisted_log_matches_the_live_snapshot() {
    let service = service();
    mark_crew(&service, "test-pilot");
    service
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();
    service.cancel_booking("test-pilot", "B1").unwrap();

    let live = service.get_slot("test-pilot").unwrap();
    let entity = service.repo().peek("test-pilot").unwrap().unwrap();
    let replayed: BookingSlot = hydrate(entity).unwrap();
    assert_eq!(replayed.slot(), &live);
}
