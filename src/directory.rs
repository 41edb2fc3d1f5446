//! In-memory cache of the state/city reference data.
//!
//! Fetched once per session. Directory fetch failures must not block the
//! rest of the console, so they degrade to empty lists with a warning.

use tracing::warn;

use crate::{
    client::ServiceClient,
    errors::ConsoleError,
    models::{City, State},
};

#[derive(Debug, Clone, Default)]
pub struct LocationDirectory {
    states: Vec<State>,
    cities: Vec<City>,
}

impl LocationDirectory {
    /// Fetches both directories. Fail-soft: an error on either fetch yields
    /// an empty list for that directory and a non-fatal warning.
    pub async fn load(client: &ServiceClient) -> Self {
        let states = match client.list_states().await {
            Ok(states) => states,
            Err(e) => {
                warn!(error = %e, "Failed to load state directory; continuing with an empty list");
                Vec::new()
            }
        };
        let cities = match client.list_cities().await {
            Ok(cities) => cities,
            Err(e) => {
                warn!(error = %e, "Failed to load city directory; continuing with an empty list");
                Vec::new()
            }
        };
        Self { states, cities }
    }

    pub fn from_parts(states: Vec<State>, cities: Vec<City>) -> Self {
        Self { states, cities }
    }

    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    /// Cities belonging to `state_id`, optionally narrowed by a
    /// case-insensitive substring match on the city name. An empty query
    /// returns the state's full city set.
    pub fn cities_for_state(&self, state_id: i64, query: &str) -> Vec<City> {
        let needle = query.trim().to_lowercase();
        self.cities
            .iter()
            .filter(|c| c.state_id == state_id)
            .filter(|c| needle.is_empty() || c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn contains_city(&self, state_id: i64, city_id: i64) -> bool {
        self.cities
            .iter()
            .any(|c| c.state_id == state_id && c.id == city_id)
    }

    pub fn city(&self, city_id: i64) -> Option<&City> {
        self.cities.iter().find(|c| c.id == city_id)
    }

    pub fn state(&self, state_id: i64) -> Option<&State> {
        self.states.iter().find(|s| s.id == state_id)
    }
}

/// A cascading state/city pair.
///
/// Changing the state and clearing a now-invalid city is one transition;
/// there is no observable moment where the pair disagrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationSelection {
    state_id: Option<i64>,
    city_id: Option<i64>,
}

impl LocationSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a selection from an already-validated record, e.g. when a
    /// saved order is loaded back into the editing form.
    pub fn restored(state_id: i64, city_id: Option<i64>) -> Self {
        Self {
            state_id: Some(state_id),
            city_id,
        }
    }

    pub fn state_id(&self) -> Option<i64> {
        self.state_id
    }

    pub fn city_id(&self) -> Option<i64> {
        self.city_id
    }

    /// Selects a state, keeping the current city only if it belongs to the
    /// new state's city set.
    pub fn select_state(&mut self, directory: &LocationDirectory, state_id: Option<i64>) {
        let retained_city = match (state_id, self.city_id) {
            (Some(state), Some(city)) if directory.contains_city(state, city) => Some(city),
            _ => None,
        };
        self.state_id = state_id;
        self.city_id = retained_city;
    }

    /// Selects a city; it must belong to the currently selected state.
    pub fn select_city(
        &mut self,
        directory: &LocationDirectory,
        city_id: i64,
    ) -> Result<(), ConsoleError> {
        let state_id = self.state_id.ok_or_else(|| {
            ConsoleError::Validation("Select a state before selecting a city.".to_string())
        })?;
        if !directory.contains_city(state_id, city_id) {
            return Err(ConsoleError::Validation(format!(
                "City {} does not belong to the selected state.",
                city_id
            )));
        }
        self.city_id = Some(city_id);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.state_id = None;
        self.city_id = None;
    }
}
