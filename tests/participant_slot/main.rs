//! Integration tests for the derived participant-slot aggregate behind
//! its service: the status state machine and idempotence under
//! at-least-once command delivery.

use std::sync::Arc;

use flightbook::{
    hydrate, participant_slot::ParticipantSlot, AvailabilityStatus, HashMapRepository,
    ParticipantSlotService, ParticipantType, Queueable, Rejection,
};

const SLOT: &str = "test-pilot";
const PID: &str = "sofia";
const PTYPE: ParticipantType = ParticipantType::Student;

fn service() -> ParticipantSlotService {
    ParticipantSlotService::new(Arc::new(HashMapRepository::new().queued()))
}

#[test]
fn unmark_before_any_state_is_a_no_op_success() {
    let service = service();
    service.unmark_available(SLOT, PID, PTYPE).unwrap();

    assert_eq!(service.status(SLOT, PID).unwrap(), None);
    assert!(service.repo().peek(&format!("{}-{}", SLOT, PID)).unwrap().is_none());
}

#[test]
fn full_lifecycle_walks_the_status_machine() {
    let service = service();

    service.mark_available(SLOT, PID, PTYPE).unwrap();
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Available)
    );

    service.book(SLOT, PID, PTYPE, "B1").unwrap();
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Booked)
    );

    service.cancel(SLOT, PID, PTYPE, "B1").unwrap();
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Available)
    );

    service.unmark_available(SLOT, PID, PTYPE).unwrap();
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Unavailable)
    );
}

#[test]
fn book_is_rejected_until_marked_available() {
    let service = service();
    let err = service.book(SLOT, PID, PTYPE, "B1").unwrap_err();
    assert_eq!(err.to_string(), "Requested participant is not available");

    service.mark_available(SLOT, PID, PTYPE).unwrap();
    service.unmark_available(SLOT, PID, PTYPE).unwrap();
    let err = service.book(SLOT, PID, PTYPE, "B1").unwrap_err();
    assert_eq!(err.rejection(), Some(&Rejection::NotAvailable));
}

#[test]
fn cancel_is_rejected_unless_booked() {
    let service = service();
    let err = service.cancel(SLOT, PID, PTYPE, "B1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to cancel unavailable participant slot"
    );

    service.mark_available(SLOT, PID, PTYPE).unwrap();
    let err = service.cancel(SLOT, PID, PTYPE, "B1").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Failed to cancel available but not booked participant slot"
    );
}

#[test]
fn redelivered_mark_commands_are_absorbed() {
    let service = service();
    service.mark_available(SLOT, PID, PTYPE).unwrap();
    service.mark_available(SLOT, PID, PTYPE).unwrap();

    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Available)
    );
    let entity = service.repo().peek("test-pilot-sofia").unwrap().unwrap();
    assert_eq!(entity.events().len(), 1);
}

#[test]
fn redelivered_book_and_cancel_commands_do_not_change_final_state() {
    let service = service();
    service.mark_available(SLOT, PID, PTYPE).unwrap();

    service.book(SLOT, PID, PTYPE, "B1").unwrap();
    assert_eq!(
        service.book(SLOT, PID, PTYPE, "B1").unwrap_err().rejection(),
        Some(&Rejection::AlreadyBooked)
    );
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Booked)
    );

    service.cancel(SLOT, PID, PTYPE, "B1").unwrap();
    assert_eq!(
        service
            .cancel(SLOT, PID, PTYPE, "B1")
            .unwrap_err()
            .rejection(),
        Some(&Rejection::CancelNotBooked)
    );
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Available)
    );

    // One Booked and one Canceled beyond the initial mark — redeliveries
    // appended nothing.
    let entity = service.repo().peek("test-pilot-sofia").unwrap().unwrap();
    assert_eq!(entity.events().len(), 3);
}

#[test]
fn unmark_while_booked_withdraws_the_participant() {
    let service = service();
    service.mark_available(SLOT, PID, PTYPE).unwrap();
    service.book(SLOT, PID, PTYPE, "B1").unwrap();

    service.unmark_available(SLOT, PID, PTYPE).unwrap();
    assert_eq!(
        service.status(SLOT, PID).unwrap(),
        Some(AvailabilityStatus::Unavailable)
    );
}

#[test]
fn rehydrating_from_the_persisted_log_matches_live_status() {
    let service = service();
    service.mark_available(SLOT, PID, PTYPE).unwrap();
    service.book(SLOT, PID, PTYPE, "B1").unwrap();
    service.cancel(SLOT, PID, PTYPE, "B1").unwrap();

    let entity = service.repo().peek("test-pilot-sofia").unwrap().unwrap();
    let replayed: ParticipantSlot = hydrate(entity).unwrap();
    assert_eq!(replayed.status(), Some(AvailabilityStatus::Available));
    assert_eq!(
        replayed.status(),
        service.status(SLOT, PID).unwrap()
    );
}

#[test]
fn identities_are_per_slot_and_participant_pair() {
    let service = service();
    service.mark_available("test-pilot", "sofia", PTYPE).unwrap();
    service.mark_available("night-vfr", "sofia", PTYPE).unwrap();

    service.book("test-pilot", "sofia", PTYPE, "B1").unwrap();

    assert_eq!(
        service.status("test-pilot", "sofia").unwrap(),
        Some(AvailabilityStatus::Booked)
    );
    assert_eq!(
        service.status("night-vfr", "sofia").unwrap(),
        Some(AvailabilityStatus::Available)
    );
}
