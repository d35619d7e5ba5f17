//! Places and reviews as served by the REST API.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A review left on a place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub rating: u8,
    pub description: String,
}

/// A place with its reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
    pub address: String,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub category: Vec<Category>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub average_rating: f64,
}

impl Place {
    /// Display labels of the place's categories, in order.
    pub fn category_labels(&self) -> Vec<&str> {
        self.category.iter().map(Category::label).collect()
    }
}

/// Body of `POST /places/{id}/reviews`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub rating: u8,
    pub description: String,
}

/// Place category. Unknown values round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Cafe,
    Park,
    Museum,
    Sport,
    Education,
    Shop,
    Entertainment,
    Hotel,
    Other(String),
}

impl Category {
    /// Wire name, e.g. `"cafe"`.
    pub fn as_str(&self) -> &str {
        match self {
            Category::Cafe => "cafe",
            Category::Park => "park",
            Category::Museum => "museum",
            Category::Sport => "sport",
            Category::Education => "education",
            Category::Shop => "shop",
            Category::Entertainment => "entertainment",
            Category::Hotel => "hotel",
            Category::Other(name) => name,
        }
    }

    /// Label shown in the UI. Unknown categories show their wire name.
    pub fn label(&self) -> &str {
        match self {
            Category::Cafe => "Кафе и рестораны",
            Category::Park => "Парки и зоны отдыха",
            Category::Museum => "Музеи и галереи",
            Category::Sport => "Спортивные объекты",
            Category::Education => "Образование",
            Category::Shop => "Магазины",
            Category::Entertainment => "Развлечения",
            Category::Hotel => "Отели и проживание",
            Category::Other(name) => name,
        }
    }
}

impl From<String> for Category {
    fn from(name: String) -> Self {
        match name.as_str() {
            "cafe" => Category::Cafe,
            "park" => Category::Park,
            "museum" => Category::Museum,
            "sport" => Category::Sport,
            "education" => Category::Education,
            "shop" => Category::Shop,
            "entertainment" => Category::Entertainment,
            "hotel" => Category::Hotel,
            _ => Category::Other(name),
        }
    }
}

impl From<&str> for Category {
    fn from(name: &str) -> Self {
        Category::from(name.to_string())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Cafe.label(), "Кафе и рестораны");
        assert_eq!(Category::Hotel.label(), "Отели и проживание");
        assert_eq!(Category::from("bakery").label(), "bakery");
        assert_eq!(Category::Museum.to_string(), "Музеи и галереи");
    }

    #[test]
    fn test_place_from_json() {
        let place: Place = serde_json::from_value(json!({
            "id": "p1",
            "name": "Central Park",
            "address": "5th Ave",
            "images": ["https://img.example.com/1.png"],
            "category": ["park", "sport", "bakery"],
            "description": "Green",
            "reviews": [{"id": "r1", "rating": 5, "description": "Lovely"}],
            "average_rating": 4.5
        }))
        .unwrap();

        assert_eq!(
            place.category,
            vec![Category::Park, Category::Sport, Category::Other("bakery".to_string())]
        );
        assert_eq!(
            place.category_labels(),
            vec!["Парки и зоны отдыха", "Спортивные объекты", "bakery"]
        );
        assert_eq!(place.reviews[0].rating, 5);
    }

    #[test]
    fn test_missing_optional_fields() {
        let place: Place = serde_json::from_value(json!({
            "id": "p2",
            "name": "Kiosk",
            "address": "Corner"
        }))
        .unwrap();

        assert!(place.images.is_empty());
        assert!(place.reviews.is_empty());
        assert_eq!(place.average_rating, 0.0);
    }

    #[test]
    fn test_category_serializes_to_wire_name() {
        let value = serde_json::to_value(vec![Category::Entertainment, Category::from("bar")]).unwrap();
        assert_eq!(value, json!(["entertainment", "bar"]));
    }
}
