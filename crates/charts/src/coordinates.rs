//! Region name to plane coordinate lookup.
//!
//! The plane is a normalized world map of `width × height` units (100 × 60 by
//! default), Y growing downward.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneCoordinate {
    pub x: f64,
    pub y: f64,
    pub country: String,
}

/// Read-only placement table injected into the bubble layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoordinateTable {
    entries: HashMap<String, PlaneCoordinate>,
}

const WORLD: &[(&str, f64, f64, &str)] = &[
    // North America
    ("New York", 22.0, 18.0, "USA"),
    ("Los Angeles", 15.0, 22.0, "USA"),
    ("Chicago", 20.0, 20.0, "USA"),
    ("Toronto", 21.0, 17.0, "Canada"),
    ("Vancouver", 15.0, 15.0, "Canada"),
    ("Mexico City", 18.0, 30.0, "Mexico"),
    // Europe
    ("London", 48.0, 16.0, "UK"),
    ("Paris", 50.0, 18.0, "France"),
    ("Berlin", 52.0, 15.0, "Germany"),
    ("Madrid", 47.0, 22.0, "Spain"),
    ("Rome", 52.0, 24.0, "Italy"),
    ("Amsterdam", 50.0, 15.0, "Netherlands"),
    ("Vienna", 54.0, 18.0, "Austria"),
    ("Stockholm", 56.0, 10.0, "Sweden"),
    ("Moscow", 70.0, 12.0, "Russia"),
    // Middle East & North Africa
    ("Dubai", 72.0, 28.0, "UAE"),
    ("Abu Dhabi", 71.0, 29.0, "UAE"),
    ("Sharjah", 73.0, 28.0, "UAE"),
    ("Riyadh", 68.0, 29.0, "Saudi Arabia"),
    ("Jeddah", 65.0, 31.0, "Saudi Arabia"),
    ("Kuwait City", 69.0, 26.0, "Kuwait"),
    ("Doha", 70.0, 28.0, "Qatar"),
    ("Manama", 69.0, 27.0, "Bahrain"),
    ("Cairo", 60.0, 25.0, "Egypt"),
    ("Casablanca", 43.0, 23.0, "Morocco"),
    // Asia-Pacific
    ("Tokyo", 88.0, 20.0, "Japan"),
    ("Seoul", 84.0, 18.0, "South Korea"),
    ("Beijing", 80.0, 17.0, "China"),
    ("Shanghai", 81.0, 21.0, "China"),
    ("Hong Kong", 79.0, 27.0, "Hong Kong"),
    ("Mumbai", 74.0, 32.0, "India"),
    ("Delhi", 75.0, 26.0, "India"),
    ("Singapore", 79.0, 42.0, "Singapore"),
    ("Bangkok", 77.0, 38.0, "Thailand"),
    ("Sydney", 89.0, 52.0, "Australia"),
    ("Melbourne", 87.0, 54.0, "Australia"),
    // South America
    ("São Paulo", 33.0, 47.0, "Brazil"),
    ("Rio de Janeiro", 34.0, 45.0, "Brazil"),
    ("Buenos Aires", 30.0, 52.0, "Argentina"),
    ("Lima", 28.0, 42.0, "Peru"),
    // Africa
    ("Lagos", 51.0, 38.0, "Nigeria"),
    ("Johannesburg", 62.0, 48.0, "South Africa"),
    ("Cape Town", 59.0, 52.0, "South Africa"),
    ("Nairobi", 65.0, 42.0, "Kenya"),
];

impl CoordinateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table of major cities.
    pub fn world() -> Self {
        let mut table = Self::new();
        for &(name, x, y, country) in WORLD {
            table.insert(name, x, y, country);
        }
        table
    }

    /// Adds or replaces an entry, returning the one it replaced.
    ///
    /// Names are assumed globally unique. Replacing a name with a different
    /// country is logged, since aggregates of two distinct places would merge.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        x: f64,
        y: f64,
        country: impl Into<String>,
    ) -> Option<PlaneCoordinate> {
        let name = name.into();
        let country = country.into();
        let previous = self.entries.insert(
            name.clone(),
            PlaneCoordinate {
                x,
                y,
                country: country.clone(),
            },
        );
        if let Some(prev) = previous.as_ref().filter(|prev| prev.country != country) {
            warn!(
                region = %name,
                previous_country = %prev.country,
                %country,
                "coordinate entry replaced by a region in another country"
            );
        }
        previous
    }

    pub fn lookup(&self, region: &str) -> Option<&PlaneCoordinate> {
        self.entries.get(region)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Equirectangular projection of a latitude/longitude onto the plane.
pub fn project(latitude: f64, longitude: f64, width: f64, height: f64) -> (f64, f64) {
    let lon = longitude.clamp(-180.0, 180.0);
    let lat = latitude.clamp(-90.0, 90.0);
    let x = (lon + 180.0) / 360.0 * width;
    let y = (90.0 - lat) / 180.0 * height;
    (x, y)
}
