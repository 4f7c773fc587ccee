use railbook_client::MemoryBackend;
use railbook_core::{BackendError, BookingDraft, Gender, SeatLabel};
use railbook_order::{BookingError, BookingSession, CancelOutcome, Confirmation};
use railbook_wizard::{Step, WizardOptions};
use std::sync::Arc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("railbook=debug")
        .with_test_writer()
        .try_init();
}

fn seat(label: &str) -> SeatLabel {
    label.parse().unwrap()
}

fn fill_passengers(session: &mut BookingSession) {
    for (index, passenger) in session.draft_mut().passengers.iter_mut().enumerate() {
        passenger.name = format!("Passenger {}", index + 1);
        passenger.age = Some(30 + index as u8);
        passenger.gender = Some(Gender::Other);
        passenger.phone = "9876543210".to_string();
        passenger.email = format!("p{}@example.com", index + 1);
    }
}

/// Drive a fresh session to the summary step: Ahmedabad → Vadodara,
/// berths 1U and 2U, one Breakfast Special each.
async fn session_at_summary(backend: Arc<MemoryBackend>) -> BookingSession {
    let mut session = BookingSession::start(backend, WizardOptions::default()).await;

    session.select_boarding(Some(1));
    session.select_dropping(Some(3));
    session.go_to(Step::Seats).unwrap();

    assert!(session.toggle_seat(seat("1U")));
    assert!(session.toggle_seat(seat("2U")));
    session.go_to(Step::Meals).unwrap();

    assert!(session.toggle_meal(3));
    session.go_to(Step::Passengers).unwrap();

    fill_passengers(&mut session);
    session.go_to(Step::Summary).unwrap();
    session
}

#[tokio::test]
async fn test_full_booking_flow() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let mut session = session_at_summary(backend).await;

    assert_eq!(session.catalog().stations().len(), 5);
    assert_eq!(session.catalog().meals().len(), 4);

    // (200 - 50) per seat * 2 seats, plus the 100-rupee meal per seat
    let fare = session.fare();
    assert_eq!(fare.seat_fare, 300);
    assert_eq!(fare.meal_fare, 200);
    assert_eq!(fare.total, 500);
    assert_eq!(session.draft().total_amount, 500);

    let prediction = session.request_prediction().await;
    assert!(!prediction.is_fallback());
    assert!(prediction.percentage() <= 100);
    assert!(!prediction.message().is_empty());

    // Prediction settles the same total the summary displayed
    assert_eq!(session.draft().total_amount, 500);

    let confirmation = session.confirm_booking().await.unwrap();
    assert!(confirmation.booking_id.starts_with("BK"));
    assert_eq!(confirmation.total_amount, 500);
    assert_eq!(session.step(), Step::Success);

    // Success page carries the last-displayed prediction unchanged
    assert_eq!(session.last_prediction(), Some(&prediction));

    // Server occupancy now owns the chosen berths; the local selection
    // was reconciled away
    assert!(session.seat_map().is_booked(seat("1U")));
    assert!(session.seat_map().is_booked(seat("2U")));
    assert!(session.draft().selected_seats.is_empty());

    session.back_to_home();
    assert_eq!(session.step(), Step::Route);
    // Draft survives by default
    assert_eq!(session.draft().boarding_point, Some(1));

    let bookings = session.show_bookings().await.unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].booking_id, confirmation.booking_id);
    assert_eq!(bookings[0].seats, vec![seat("1U"), seat("2U")]);
    assert_eq!(bookings[0].total_amount, 500);
    assert_eq!(bookings[0].passenger_name, "Passenger 1");
    assert!(bookings[0].can_cancel());
}

#[tokio::test]
async fn test_cancel_flow_frees_seats_and_suppresses_cancel_action() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let mut session = session_at_summary(backend).await;

    session.request_prediction().await;
    let confirmation = session.confirm_booking().await.unwrap();
    session.back_to_home();
    session.show_bookings().await.unwrap();

    // Declining the prompt sends nothing
    let outcome = session
        .cancel_booking(&confirmation.booking_id, Confirmation::Declined)
        .await
        .unwrap();
    assert_eq!(outcome, CancelOutcome::Aborted);
    assert!(session.bookings()[0].can_cancel());
    assert!(session.seat_map().is_booked(seat("1U")));

    // Confirmed cancellation refunds, frees the berths, refreshes the list
    let outcome = session
        .cancel_booking(&confirmation.booking_id, Confirmation::Confirmed)
        .await
        .unwrap();
    match outcome {
        CancelOutcome::Cancelled(receipt) => assert_eq!(receipt.refund_amount, 500),
        CancelOutcome::Aborted => panic!("confirmed cancellation must reach the backend"),
    }
    assert!(!session.seat_map().is_booked(seat("1U")));
    assert!(!session.seat_map().is_booked(seat("2U")));
    assert!(!session.bookings()[0].can_cancel());

    // Cancelling again is a business failure, not a crash
    let error = session
        .cancel_booking(&confirmation.booking_id, Confirmation::Confirmed)
        .await
        .unwrap_err();
    match error {
        BookingError::Backend(BackendError::Service { message }) => {
            assert_eq!(message, "Booking already cancelled");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_predictor_outage_degrades_to_fallback() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    backend.set_predictor_down(true);
    let mut session = session_at_summary(backend.clone()).await;

    let prediction = session.request_prediction().await;
    assert!(prediction.is_fallback());
    assert!((75..95).contains(&prediction.percentage()));
    assert_eq!(prediction.message(), "High probability of confirmation");

    // Once the predictor is reachable again, the real path resumes
    backend.set_predictor_down(false);
    assert!(!session.request_prediction().await.is_fallback());
}

#[tokio::test]
async fn test_failed_submission_keeps_the_session_on_summary() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let mut session = session_at_summary(backend.clone()).await;

    // Another traveller grabs 1U between summary and confirm
    let mut rival = BookingDraft::new();
    rival.boarding_point = Some(1);
    rival.dropping_point = Some(2);
    rival.selected_seats = vec![seat("1U")];
    use railbook_core::BackendService;
    backend.book(&rival).await.unwrap();

    let error = session.confirm_booking().await.unwrap_err();
    match error {
        BookingError::Backend(BackendError::Service { message }) => {
            assert_eq!(message, "Seat 1U is already booked");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Still on summary with the draft intact, ready for a retry
    assert_eq!(session.step(), Step::Summary);
    assert_eq!(session.draft().selected_seats, vec![seat("1U"), seat("2U")]);
}

#[tokio::test]
async fn test_confirm_outside_summary_is_rejected() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let mut session = BookingSession::start(backend, WizardOptions::default()).await;

    let error = session.confirm_booking().await.unwrap_err();
    assert!(matches!(error, BookingError::Wizard(_)));
    assert_eq!(session.step(), Step::Route);
}

#[tokio::test]
async fn test_home_reset_is_configurable() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let options = WizardOptions { reset_draft_on_home: true };
    let mut session = BookingSession::start(backend, options).await;

    session.select_boarding(Some(1));
    session.select_dropping(Some(4));
    session.go_to(Step::Seats).unwrap();
    session.toggle_seat(seat("7L"));

    session.back_to_home();
    assert_eq!(session.draft(), &BookingDraft::default());
}

#[tokio::test]
async fn test_route_availability_probe() {
    init_tracing();
    let backend = Arc::new(MemoryBackend::new());
    let mut session = BookingSession::start(backend, WizardOptions::default()).await;

    // Requires a drafted segment
    assert!(session.route_availability().await.is_err());

    session.select_boarding(Some(1));
    session.select_dropping(Some(5));
    let availability = session.route_availability().await.unwrap();
    assert_eq!(availability.price_per_seat, 750);
    assert_eq!(availability.route, "Ahmedabad to Mumbai");
    // 32 berths minus the 5 pre-booked ones
    assert_eq!(availability.available_seats, 27);
}
