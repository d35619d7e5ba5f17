//! REST client for the places API.
//!
//! | Call            | Request                                   |
//! |-----------------|-------------------------------------------|
//! | `get_places`    | `GET /places?{sorting}`                   |
//! | `get_place`     | `GET /places/{id}`                        |
//! | `create_place`  | `POST /places` (multipart form)           |
//! | `add_review`    | `POST /places/{id}/reviews` (JSON body)   |

use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use super::model::{Category, NewReview, Place, Review};
use crate::config::Config;
use crate::error::{Error, Result};

/// Image attached to a new place.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields of the create-place form.
///
/// An image with no bytes ends the image list: it and every image after it
/// are left out, and the rest of the form is still posted. This departs
/// from the web client, which dropped the whole request in that case.
#[derive(Debug, Clone, Default)]
pub struct NewPlace {
    pub name: String,
    pub address: String,
    pub categories: Vec<Category>,
    pub description: String,
    pub images: Vec<ImageUpload>,
}

impl NewPlace {
    /// Build the multipart form.
    ///
    /// Categories and images repeat their field name. Images are taken up
    /// to the first empty one; see [`NewPlace`].
    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new()
            .text("name", self.name)
            .text("address", self.address)
            .text("description", self.description);

        for category in self.categories {
            form = form.text("category", String::from(category));
        }

        for image in self.images {
            if image.bytes.is_empty() {
                break;
            }
            let mut part = Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(mime) = image.mime {
                part = part.mime_str(&mime)?;
            }
            form = form.part("images", part);
        }

        Ok(form)
    }
}

#[derive(Debug, Clone)]
pub struct PlacesClient {
    http: Client,
    base_url: String,
}

impl PlacesClient {
    /// Client with reqwest's default settings.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client using the configured base URL and request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            http,
            base_url: config.api.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// List places. `sorting` is passed through as the raw query string.
    pub async fn get_places(&self, sorting: &str) -> Result<Vec<Place>> {
        let url = if sorting.is_empty() {
            self.url("/places")
        } else {
            self.url(&format!("/places?{sorting}"))
        };
        debug!(%url, "fetching places");

        let response = check(self.http.get(&url).send().await?)?;
        decode(response).await
    }

    /// Fetch one place with its reviews.
    pub async fn get_place(&self, id: &str) -> Result<Place> {
        let url = self.url(&format!("/places/{id}"));

        let result = async {
            let response = check(self.http.get(&url).send().await?)?;
            decode::<Place>(response).await
        }
        .await;

        if let Err(e) = &result {
            error!(id, error = %e, "failed to fetch place");
        }
        result
    }

    pub async fn create_place(&self, place: NewPlace) -> Result<()> {
        let url = self.url("/places");
        debug!(%url, name = %place.name, "creating place");

        let form = place.into_form()?;
        check(self.http.post(&url).multipart(form).send().await?)?;
        Ok(())
    }

    /// Post a review and return it as stored by the server.
    pub async fn add_review(&self, place_id: &str, rating: u8, description: &str) -> Result<Review> {
        let url = self.url(&format!("/places/{place_id}/reviews"));
        let body = NewReview {
            rating,
            description: description.to_string(),
        };

        let result = async {
            let response = check(self.http.post(&url).json(&body).send().await?)?;
            decode::<Review>(response).await
        }
        .await;

        if let Err(e) = &result {
            error!(place_id, error = %e, "failed to add review");
        }
        result
    }
}

/// Turn non-2xx responses into [`Error::Status`].
fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            status,
            url: response.url().to_string(),
        })
    }
}

/// Read the body and parse it as JSON. Malformed bodies become [`Error::Json`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
