//! Places domain: data model, REST client and cached store.

mod client;
mod model;
mod store;

pub use client::{ImageUpload, NewPlace, PlacesClient};
pub use model::{Category, NewReview, Place, Review};
pub use store::PlacesStore;
