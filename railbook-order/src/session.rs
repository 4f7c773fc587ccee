use crate::orchestrator::{BookingError, BookingOrchestrator, CancelOutcome, Confirmation};
use crate::prediction::Prediction;
use railbook_catalog::{CatalogCache, FareBreakdown, FareEngine, SeatMap, SeatView};
use railbook_core::{
    BackendError, BackendService, BookingConfirmation, BookingDraft, BookingRecord,
    RouteAvailability, SeatLabel,
};
use railbook_wizard::{Step, TransitionError, View, Wizard, WizardOptions};
use std::sync::Arc;
use uuid::Uuid;

/// One user's wizard session: owns the draft (through the wizard), the
/// catalog, the seat map, and the orchestrator, threading them through a
/// single object instead of ambient globals.
///
/// All mutating entry points are `&mut self`, so the session upholds the
/// serial-interaction model by construction.
pub struct BookingSession {
    session_id: Uuid,
    backend: Arc<dyn BackendService>,
    catalog: CatalogCache,
    seat_map: SeatMap,
    wizard: Wizard,
    orchestrator: BookingOrchestrator,
    last_prediction: Option<Prediction>,
    bookings: Vec<BookingRecord>,
}

impl BookingSession {
    /// Fetch the catalog and seat occupancy and open the wizard on the
    /// first step. Either fetch may fail without failing the session.
    pub async fn start(backend: Arc<dyn BackendService>, options: WizardOptions) -> Self {
        let session_id = Uuid::new_v4();
        tracing::info!(%session_id, "starting booking session");

        let catalog = CatalogCache::load(backend.as_ref()).await;
        let mut seat_map = SeatMap::new();
        match backend.load_seats().await {
            Ok(booked) => seat_map.refresh(booked),
            Err(error) => {
                tracing::warn!(%error, "seat occupancy unavailable at startup");
            }
        }

        Self {
            session_id,
            backend: backend.clone(),
            catalog,
            seat_map,
            wizard: Wizard::new(options),
            orchestrator: BookingOrchestrator::new(backend),
            last_prediction: None,
            bookings: Vec::new(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn catalog(&self) -> &CatalogCache {
        &self.catalog
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seat_map
    }

    pub fn draft(&self) -> &BookingDraft {
        self.wizard.draft()
    }

    pub fn draft_mut(&mut self) -> &mut BookingDraft {
        self.wizard.draft_mut()
    }

    pub fn wizard(&self) -> &Wizard {
        &self.wizard
    }

    pub fn step(&self) -> Step {
        self.wizard.step()
    }

    pub fn view(&self) -> View {
        self.wizard.view()
    }

    pub fn last_prediction(&self) -> Option<&Prediction> {
        self.last_prediction.as_ref()
    }

    pub fn bookings(&self) -> &[BookingRecord] {
        &self.bookings
    }

    /// Record the boarding halt by catalog id; an unknown id clears it.
    pub fn select_boarding(&mut self, id: Option<u32>) {
        let station = id.and_then(|id| self.catalog.station(id)).cloned();
        self.wizard.set_boarding(station.as_ref());
    }

    pub fn select_dropping(&mut self, id: Option<u32>) {
        let station = id.and_then(|id| self.catalog.station(id)).cloned();
        self.wizard.set_dropping(station.as_ref());
    }

    pub fn toggle_seat(&mut self, label: SeatLabel) -> bool {
        self.seat_map.toggle(self.wizard.draft_mut(), label)
    }

    pub fn toggle_meal(&mut self, meal_id: u32) -> bool {
        self.wizard.toggle_meal(meal_id)
    }

    pub fn seat_views(&self) -> Vec<SeatView> {
        self.seat_map.render(self.wizard.draft())
    }

    /// Deterministic fare for the current draft. The same computation
    /// backs the summary display and the prediction request.
    pub fn fare(&self) -> FareBreakdown {
        FareEngine::compute(self.wizard.draft(), &self.catalog)
    }

    /// Guarded step navigation. Entering the summary also settles the
    /// draft total from the fare engine.
    pub fn go_to(&mut self, target: Step) -> Result<(), TransitionError> {
        self.wizard.go_to(target)?;
        if target == Step::Summary {
            let fare = self.fare();
            self.wizard.draft_mut().total_amount = fare.total;
        }
        Ok(())
    }

    pub fn back_to_home(&mut self) {
        self.wizard.back_to_home();
    }

    /// Probe remaining capacity and per-seat price for the drafted
    /// segment.
    pub async fn route_availability(&self) -> Result<RouteAvailability, BookingError> {
        match (self.draft().boarding_point, self.draft().dropping_point) {
            (Some(boarding), Some(dropping)) => {
                Ok(self.backend.check_availability(boarding, dropping).await?)
            }
            _ => Err(BackendError::Service {
                message: "Boarding and dropping points required".to_string(),
            }
            .into()),
        }
    }

    /// Fetch an estimate for the current draft, remembering it so the
    /// success step can carry it over unchanged. Never errors; transport
    /// failure degrades to the local fallback.
    pub async fn request_prediction(&mut self) -> Prediction {
        let fare = self.fare();
        self.wizard.draft_mut().total_amount = fare.total;

        let prediction = self
            .orchestrator
            .request_prediction(self.wizard.draft(), &fare)
            .await;
        self.last_prediction = Some(prediction.clone());
        prediction
    }

    /// Submit the draft from the summary step. On success the seat map is
    /// reloaded (occupancy changed server-side), the draft reconciled,
    /// and the wizard moves to the terminal step; the last-displayed
    /// prediction is carried over unchanged. On failure the wizard stays
    /// on the summary and the draft survives for a retry.
    pub async fn confirm_booking(&mut self) -> Result<BookingConfirmation, BookingError> {
        if self.wizard.view() != View::Step(Step::Summary) {
            return Err(TransitionError::NotOnSummary.into());
        }

        let confirmation = self.orchestrator.confirm_booking(self.wizard.draft()).await?;
        self.reload_seats().await;
        self.wizard.complete_booking(&confirmation)?;
        Ok(confirmation)
    }

    /// Cancel a booking after an explicit confirmation. On success the
    /// refund is surfaced, the seat map reloaded, and the bookings list
    /// refreshed; a declined prompt or a failure mutates nothing.
    pub async fn cancel_booking(
        &mut self,
        booking_id: &str,
        confirmation: Confirmation,
    ) -> Result<CancelOutcome, BookingError> {
        let outcome = self
            .orchestrator
            .cancel_booking(booking_id, confirmation)
            .await?;

        if matches!(outcome, CancelOutcome::Cancelled(_)) {
            self.reload_seats().await;
            if let Err(error) = self.refresh_bookings().await {
                tracing::warn!(%error, "bookings list refresh failed after cancellation");
            }
        }
        Ok(outcome)
    }

    /// Open the bookings list view (first step only) with a fresh fetch.
    /// A failed fetch leaves the wizard where it was.
    pub async fn show_bookings(&mut self) -> Result<&[BookingRecord], BookingError> {
        self.wizard.show_bookings()?;
        if let Err(error) = self.refresh_bookings().await {
            self.wizard.close_bookings();
            return Err(error.into());
        }
        Ok(&self.bookings)
    }

    async fn refresh_bookings(&mut self) -> Result<(), BackendError> {
        self.bookings = self.orchestrator.list_bookings().await?;
        Ok(())
    }

    /// Pull the authoritative occupancy list and evict any local
    /// selection it invalidated. Tolerates a failed fetch: stale local
    /// occupancy is better than losing the session.
    async fn reload_seats(&mut self) {
        match self.backend.load_seats().await {
            Ok(booked) => {
                self.seat_map.refresh(booked);
                self.seat_map.reconcile(self.wizard.draft_mut());
            }
            Err(error) => {
                tracing::warn!(%error, "seat occupancy reload failed");
            }
        }
    }
}
