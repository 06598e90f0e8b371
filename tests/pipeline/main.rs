//! End-to-end pipeline tests: slot commands flow through the outbox and
//! relay into participant-slot aggregates and on into the view, with
//! at-least-once delivery simulated at the bus.

use flightbook::bus::Publisher;
use flightbook::{AvailabilityStatus, FlightApp, Participant, ParticipantType};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mark_crew(app: &FlightApp, slot_id: &str) {
    app.slots()
        .mark_available(slot_id, Participant::new("sofia", ParticipantType::Student))
        .unwrap();
    app.slots()
        .mark_available(
            slot_id,
            Participant::new("mr-reyes", ParticipantType::Instructor),
        )
        .unwrap();
    app.slots()
        .mark_available(slot_id, Participant::new("cenizo", ParticipantType::Aircraft))
        .unwrap();
}

#[test]
fn availability_marks_propagate_to_participant_slots_and_view() {
    init_tracing();
    let app = FlightApp::new();
    mark_crew(&app, "test-pilot");
    app.settle().unwrap();

    for participant in ["sofia", "mr-reyes", "cenizo"] {
        assert_eq!(
            app.participant_slots()
                .status("test-pilot", participant)
                .unwrap(),
            Some(AvailabilityStatus::Available)
        );
        let rows = app.view().slots_by_participant(participant).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].slot_id, "test-pilot");
        assert_eq!(rows[0].status, AvailabilityStatus::Available);
        assert!(rows[0].booking_id.is_empty());
    }
}

#[test]
fn booking_propagates_to_every_derived_state() {
    init_tracing();
    let app = FlightApp::new();
    mark_crew(&app, "test-pilot");
    app.slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();
    app.settle().unwrap();

    // Source of truth: the slot snapshot.
    let slot = app.slots().get_slot("test-pilot").unwrap();
    assert!(slot.available.is_empty());
    assert_eq!(slot.bookings.len(), 3);

    // Derived aggregate and view agree.
    for participant in ["sofia", "mr-reyes", "cenizo"] {
        assert_eq!(
            app.participant_slots()
                .status("test-pilot", participant)
                .unwrap(),
            Some(AvailabilityStatus::Booked)
        );
        let rows = app
            .view()
            .slots_by_participant_and_status(participant, AvailabilityStatus::Booked)
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].booking_id, "B1");
    }
}

#[test]
fn derived_state_lags_until_the_pipeline_settles() {
    let app = FlightApp::new();
    app.slots()
        .mark_available(
            "test-pilot",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();

    // The slot command committed, but nothing downstream has run yet.
    assert_eq!(app.slots().get_slot("test-pilot").unwrap().available.len(), 1);
    assert_eq!(
        app.participant_slots().status("test-pilot", "sofia").unwrap(),
        None
    );
    assert!(app.view().slots_by_participant("sofia").unwrap().is_empty());

    app.settle().unwrap();
    assert_eq!(
        app.participant_slots().status("test-pilot", "sofia").unwrap(),
        Some(AvailabilityStatus::Available)
    );
}

#[test]
fn cancellation_restores_participants_but_not_the_slot_marks() {
    init_tracing();
    let app = FlightApp::new();
    mark_crew(&app, "test-pilot");
    app.slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();
    app.slots().cancel_booking("test-pilot", "B1").unwrap();
    app.settle().unwrap();

    // Slot level: bookings gone, availability not restored.
    let slot = app.slots().get_slot("test-pilot").unwrap();
    assert!(slot.bookings.is_empty());
    assert!(slot.available.is_empty());

    // Participant level: cancellation restored availability.
    for participant in ["sofia", "mr-reyes", "cenizo"] {
        assert_eq!(
            app.participant_slots()
                .status("test-pilot", participant)
                .unwrap(),
            Some(AvailabilityStatus::Available)
        );
        let rows = app.view().slots_by_participant(participant).unwrap();
        assert_eq!(rows[0].status, AvailabilityStatus::Available);
        assert!(rows[0].booking_id.is_empty());
    }
}

#[test]
fn unmarking_withdraws_the_participant_downstream() {
    let app = FlightApp::new();
    app.slots()
        .mark_available(
            "test-pilot",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();
    app.slots()
        .unmark_available(
            "test-pilot",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();
    app.settle().unwrap();

    assert_eq!(
        app.participant_slots().status("test-pilot", "sofia").unwrap(),
        Some(AvailabilityStatus::Unavailable)
    );
    let rows = app
        .view()
        .slots_by_participant_and_status("sofia", AvailabilityStatus::Unavailable)
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[test]
fn rejected_bookings_leave_no_trace_downstream() {
    let app = FlightApp::new();
    app.slots()
        .mark_available(
            "test-pilot",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();

    let err = app
        .slots()
        .book_reservation("test-pilot", "sofia", "unavailable-id", "mr-reyes", "B1")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not all of the requested participants are available for the training flight"
    );
    app.settle().unwrap();

    assert_eq!(
        app.participant_slots()
            .status("test-pilot", "unavailable-id")
            .unwrap(),
        None
    );
    assert!(app
        .view()
        .slots_by_participant("unavailable-id")
        .unwrap()
        .is_empty());
}

#[test]
fn broker_redelivery_of_slot_events_changes_nothing() {
    init_tracing();
    let app = FlightApp::new();
    mark_crew(&app, "test-pilot");
    app.slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();
    app.settle().unwrap();

    // Redeliver the whole slot stream: the relay processes every event a
    // second time.
    for event in app.slot_bus().events() {
        app.slot_bus().publish(event).unwrap();
    }
    app.settle().unwrap();

    for participant in ["sofia", "mr-reyes", "cenizo"] {
        assert_eq!(
            app.participant_slots()
                .status("test-pilot", participant)
                .unwrap(),
            Some(AvailabilityStatus::Booked)
        );
        // Exactly one mark + one book per participant; redeliveries
        // appended no events.
        let entity = app
            .participant_slots()
            .repo()
            .peek(&format!("test-pilot-{}", participant))
            .unwrap()
            .unwrap();
        assert_eq!(entity.events().len(), 2);

        let rows = app.view().slots_by_participant(participant).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, AvailabilityStatus::Booked);
    }
}

#[test]
fn view_rebuild_from_the_full_stream_matches_the_live_view() {
    let app = FlightApp::new();
    mark_crew(&app, "test-pilot");
    app.slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();
    app.slots().cancel_booking("test-pilot", "B1").unwrap();
    app.slots()
        .mark_available(
            "night-vfr",
            Participant::new("sofia", ParticipantType::Student),
        )
        .unwrap();
    app.settle().unwrap();

    let rebuilt = app.rebuild_view();
    while rebuilt.run_once().unwrap() {}

    for participant in ["sofia", "mr-reyes", "cenizo"] {
        let mut live = app.view().slots_by_participant(participant).unwrap();
        let mut replayed = rebuilt.slots_by_participant(participant).unwrap();
        live.sort_by(|a, b| a.slot_id.cmp(&b.slot_id));
        replayed.sort_by(|a, b| a.slot_id.cmp(&b.slot_id));
        assert_eq!(live, replayed);
    }
}

#[test]
fn a_second_booking_can_reuse_participants_after_remarking() {
    let app = FlightApp::new();
    mark_crew(&app, "test-pilot");
    app.slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B1")
        .unwrap();
    app.slots().cancel_booking("test-pilot", "B1").unwrap();
    app.settle().unwrap();

    // Slot-level availability was consumed, so a direct rebook fails.
    assert!(app
        .slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B2")
        .is_err());

    // Opting back in makes the crew bookable again.
    mark_crew(&app, "test-pilot");
    app.slots()
        .book_reservation("test-pilot", "sofia", "cenizo", "mr-reyes", "B2")
        .unwrap();
    app.settle().unwrap();

    assert_eq!(
        app.participant_slots().status("test-pilot", "sofia").unwrap(),
        Some(AvailabilityStatus::Booked)
    );
    let rows = app
        .view()
        .slots_by_participant_and_status("sofia", AvailabilityStatus::Booked)
        .unwrap();
    assert_eq!(rows[0].booking_id, "B2");
}
