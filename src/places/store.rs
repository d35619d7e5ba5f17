//! Cached view of the places API.

use tracing::{debug, warn};

use super::client::{NewPlace, PlacesClient};
use super::model::{Place, Review};
use crate::error::Result;

/// Keeps the last fetched list of places and forwards writes to the API.
#[derive(Debug, Clone)]
pub struct PlacesStore {
    client: PlacesClient,
    places: Vec<Place>,
    sorting: String,
}

impl PlacesStore {
    pub fn new(client: PlacesClient) -> Self {
        Self {
            client,
            places: Vec::new(),
            sorting: String::new(),
        }
    }

    pub fn client(&self) -> &PlacesClient {
        &self.client
    }

    /// Places from the last successful [`load`](Self::load).
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    /// Sorting used by the last successful load.
    pub fn sorting(&self) -> &str {
        &self.sorting
    }

    pub fn cached(&self, id: &str) -> Option<&Place> {
        self.places.iter().find(|p| p.id == id)
    }

    /// Fetch the list with `sorting` and replace the cache.
    ///
    /// On failure the previous list stays in place.
    pub async fn load(&mut self, sorting: &str) -> Result<&[Place]> {
        let places = self.client.get_places(sorting).await?;
        debug!(count = places.len(), sorting, "places loaded");
        self.places = places;
        self.sorting = sorting.to_string();
        Ok(&self.places)
    }

    /// Fetch one place and refresh its cached copy if there is one.
    pub async fn place(&mut self, id: &str) -> Result<Place> {
        let place = self.client.get_place(id).await?;
        if let Some(slot) = self.places.iter_mut().find(|p| p.id == id) {
            *slot = place.clone();
        }
        Ok(place)
    }

    /// Create a place, then reload the list with the current sorting.
    pub async fn create_place(&mut self, place: NewPlace) -> Result<()> {
        self.client.create_place(place).await?;
        let sorting = self.sorting.clone();
        if let Err(e) = self.load(&sorting).await {
            warn!(error = %e, "place created but list reload failed");
        }
        Ok(())
    }

    /// Post a review and append it to the cached place.
    pub async fn add_review(&mut self, place_id: &str, rating: u8, description: &str) -> Result<Review> {
        let review = self.client.add_review(place_id, rating, description).await?;
        if let Some(place) = self.places.iter_mut().find(|p| p.id == place_id) {
            place.reviews.push(review.clone());
        }
        Ok(review)
    }
}
