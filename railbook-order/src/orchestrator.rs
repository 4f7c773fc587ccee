use crate::prediction::Prediction;
use railbook_catalog::FareBreakdown;
use railbook_core::{
    BackendError, BackendService, BookingConfirmation, BookingDraft, BookingRecord, CancelReceipt,
    PredictionRequest,
};
use railbook_wizard::TransitionError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Explicit user acknowledgment gating the destructive cancel call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Confirmed,
    Declined,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    /// User declined the confirmation prompt; nothing was sent.
    Aborted,
    Cancelled(CancelReceipt),
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("Another submission is already in flight")]
    SubmissionInFlight,

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Wizard(#[from] TransitionError),
}

/// Drives the final submission and cancel/refund flows against the
/// collaborator, with a guard against overlapping submissions: the UI
/// stays responsive while a call is pending, so a second confirm or
/// cancel must be rejected rather than raced.
pub struct BookingOrchestrator {
    backend: Arc<dyn BackendService>,
    in_flight: AtomicBool,
}

impl BookingOrchestrator {
    pub fn new(backend: Arc<dyn BackendService>) -> Self {
        Self {
            backend,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Ask the predictor for a confirmation estimate. Any backend failure
    /// degrades to a locally synthesized estimate; this never errors.
    pub async fn request_prediction(
        &self,
        draft: &BookingDraft,
        fare: &FareBreakdown,
    ) -> Prediction {
        let request = PredictionRequest {
            selected_seats: draft.selected_seats.clone(),
            boarding_point: draft.source.clone(),
            dropping_point: draft.desti.clone(),
            selected_meals: draft.selected_meals.clone(),
            total_amount: fare.total,
        };

        match self.backend.predict(&request).await {
            Ok(response) => Prediction::from_server(response.prediction_percentage, response.message),
            Err(error) => {
                tracing::warn!(%error, "predictor unavailable, synthesizing local estimate");
                Prediction::fallback()
            }
        }
    }

    /// Submit the draft. Holds the submission slot for the duration of
    /// the call.
    pub async fn confirm_booking(
        &self,
        draft: &BookingDraft,
    ) -> Result<BookingConfirmation, BookingError> {
        let _slot = self.acquire_slot()?;
        let confirmation = self.backend.book(draft).await?;
        tracing::info!(booking_id = %confirmation.booking_id, "booking submitted");
        Ok(confirmation)
    }

    /// Cancel a booking. A declined confirmation aborts locally without
    /// touching the backend.
    pub async fn cancel_booking(
        &self,
        booking_id: &str,
        confirmation: Confirmation,
    ) -> Result<CancelOutcome, BookingError> {
        if confirmation == Confirmation::Declined {
            return Ok(CancelOutcome::Aborted);
        }

        let _slot = self.acquire_slot()?;
        let receipt = self.backend.cancel(booking_id).await?;
        tracing::info!(booking_id, refund = receipt.refund_amount, "booking cancelled");
        Ok(CancelOutcome::Cancelled(receipt))
    }

    pub async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BackendError> {
        self.backend.list_bookings().await
    }

    fn acquire_slot(&self) -> Result<SubmissionSlot<'_>, BookingError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(BookingError::SubmissionInFlight);
        }
        Ok(SubmissionSlot { flag: &self.in_flight })
    }
}

/// Releases the submission slot when the call completes, whichever way.
struct SubmissionSlot<'a> {
    flag: &'a AtomicBool,
}

impl Drop for SubmissionSlot<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use railbook_core::{
        BookingDetail, Meal, PredictionResponse, RouteAvailability, SeatLabel, Station,
    };
    use tokio::sync::Notify;

    /// Backend whose submissions block until the test releases them.
    struct GatedBackend {
        entered: Notify,
        release: Notify,
    }

    impl GatedBackend {
        fn new() -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl BackendService for GatedBackend {
        async fn load_stations(&self) -> Result<Vec<Station>, BackendError> {
            Ok(Vec::new())
        }

        async fn load_meals(&self) -> Result<Vec<Meal>, BackendError> {
            Ok(Vec::new())
        }

        async fn load_seats(&self) -> Result<Vec<SeatLabel>, BackendError> {
            Ok(Vec::new())
        }

        async fn check_availability(
            &self,
            _boarding: u32,
            _dropping: u32,
        ) -> Result<RouteAvailability, BackendError> {
            Err(BackendError::Transport("not wired".to_string()))
        }

        async fn predict(
            &self,
            _request: &PredictionRequest,
        ) -> Result<PredictionResponse, BackendError> {
            Err(BackendError::Transport("predictor offline".to_string()))
        }

        async fn book(&self, _draft: &BookingDraft) -> Result<BookingConfirmation, BackendError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(BookingConfirmation {
                booking_id: "BK1".to_string(),
                total_amount: 0,
                message: None,
            })
        }

        async fn cancel(&self, _booking_id: &str) -> Result<CancelReceipt, BackendError> {
            Err(BackendError::Transport("cancel must not be reached".to_string()))
        }

        async fn list_bookings(&self) -> Result<Vec<BookingRecord>, BackendError> {
            Ok(Vec::new())
        }

        async fn get_booking(&self, _booking_id: &str) -> Result<BookingDetail, BackendError> {
            Err(BackendError::Transport("not wired".to_string()))
        }
    }

    #[tokio::test]
    async fn test_overlapping_submissions_are_rejected() {
        let backend = Arc::new(GatedBackend::new());
        let orchestrator = Arc::new(BookingOrchestrator::new(backend.clone()));
        let draft = BookingDraft::new();

        let first = tokio::spawn({
            let orchestrator = orchestrator.clone();
            let draft = draft.clone();
            async move { orchestrator.confirm_booking(&draft).await }
        });

        // Wait until the first submission holds the slot
        backend.entered.notified().await;

        let second = orchestrator.confirm_booking(&draft).await;
        assert!(matches!(second, Err(BookingError::SubmissionInFlight)));

        let cancel = orchestrator
            .cancel_booking("BK1", Confirmation::Confirmed)
            .await;
        assert!(matches!(cancel, Err(BookingError::SubmissionInFlight)));

        backend.release.notify_one();
        let outcome = first.await.unwrap();
        assert_eq!(outcome.unwrap().booking_id, "BK1");

        // Slot released after completion
        backend.release.notify_one();
        let third = tokio::spawn({
            let orchestrator = orchestrator.clone();
            let draft = draft.clone();
            async move { orchestrator.confirm_booking(&draft).await }
        });
        backend.entered.notified().await;
        assert!(third.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_declined_cancel_never_reaches_backend() {
        let orchestrator = BookingOrchestrator::new(Arc::new(GatedBackend::new()));
        let outcome = orchestrator
            .cancel_booking("BK1", Confirmation::Declined)
            .await
            .unwrap();
        assert_eq!(outcome, CancelOutcome::Aborted);
    }

    #[tokio::test]
    async fn test_prediction_falls_back_without_throwing() {
        let orchestrator = BookingOrchestrator::new(Arc::new(GatedBackend::new()));
        let draft = BookingDraft::new();
        let fare = FareBreakdown { seat_fare: 0, meal_fare: 0, total: 0 };

        let prediction = orchestrator.request_prediction(&draft, &fare).await;
        assert!(prediction.is_fallback());
        assert!((75..95).contains(&prediction.percentage()));
        assert!(!prediction.message().is_empty());
    }
}
