use railbook_core::{BackendService, Meal, Station};

/// Immutable-per-session station and meal lists, fetched once at startup.
///
/// A failed fetch leaves the affected list empty rather than failing the
/// session; dropdowns simply stay empty. Lookups return `None` for stale
/// ids, because selected ids can outlive a catalog reload.
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    stations: Vec<Station>,
    meals: Vec<Meal>,
}

impl CatalogCache {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_parts(stations: Vec<Station>, meals: Vec<Meal>) -> Self {
        Self { stations, meals }
    }

    /// Fetch both lists from the collaborator, tolerating each failure
    /// independently.
    pub async fn load(backend: &dyn BackendService) -> Self {
        let stations = match backend.load_stations().await {
            Ok(stations) => stations,
            Err(error) => {
                tracing::warn!(%error, "station catalog unavailable, continuing with empty list");
                Vec::new()
            }
        };

        let meals = match backend.load_meals().await {
            Ok(meals) => meals,
            Err(error) => {
                tracing::warn!(%error, "meal catalog unavailable, continuing with empty list");
                Vec::new()
            }
        };

        Self { stations, meals }
    }

    pub fn station(&self, id: u32) -> Option<&Station> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn meal(&self, id: u32) -> Option<&Meal> {
        self.meals.iter().find(|m| m.id == id)
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn meals(&self) -> &[Meal] {
        &self.meals
    }
}
