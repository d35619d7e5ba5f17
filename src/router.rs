//! Application routes.
//!
//! | Route          | Path          | Name           |
//! |----------------|---------------|----------------|
//! | `Home`         | `/`           | `Home`         |
//! | `PlaceDetails` | `/place/:id`  | `PlaceDetails` |

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    PlaceDetails { id: String },
}

impl Route {
    /// Match a location against the route table.
    ///
    /// Query string and fragment are ignored, as is a trailing slash.
    /// Returns `None` for unknown paths.
    pub fn resolve(location: &str) -> Option<Route> {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);

        if path == "/" || path.is_empty() {
            return Some(Route::Home);
        }

        let mut segments = path.trim_start_matches('/').split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some("place"), Some(id), None) if !id.is_empty() => Some(Route::PlaceDetails {
                id: id.to_string(),
            }),
            _ => None,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::PlaceDetails { id } => format!("/place/{id}"),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "Home",
            Route::PlaceDetails { .. } => "PlaceDetails",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
