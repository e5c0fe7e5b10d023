//! Core data types for the neighborhood directory
//!
//! - `Coordinates`: a latitude/longitude pair
//! - `NeighborhoodRecord`: one neighborhood with its location
//! - `CollisionPolicy`: what happens when two records share a name
//! - `SelectionLists`: the option lists shown in the form selectors

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point on the map in WGS84 degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Both components are finite and inside the valid degree ranges
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A neighborhood and where it is
///
/// `city` is optional: the enriched metadata shape does not carry one, and
/// when it is present it only matters for display and the per-city policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborhoodRecord {
    pub name: String,
    pub city: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl NeighborhoodRecord {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            city: None,
            latitude,
            longitude,
        }
    }

    /// Builder method: set the city
    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// How the directory treats records that share a lookup key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Later record replaces the earlier one (logged, never silent)
    #[default]
    LastWriteWins,
    /// Duplicate names fail the load
    Reject,
    /// Records are keyed by city and name
    PerCity,
}

impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollisionPolicy::LastWriteWins => "last_write_wins",
            CollisionPolicy::Reject => "reject",
            CollisionPolicy::PerCity => "per_city",
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "last_write_wins" | "lww" => Ok(CollisionPolicy::LastWriteWins),
            "reject" => Ok(CollisionPolicy::Reject),
            "per_city" => Ok(CollisionPolicy::PerCity),
            other => Err(format!("Unknown collision policy: {}", other)),
        }
    }
}

/// Which form selector a list of options belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    City,
    Neighborhood,
    CrimeType,
}

impl SelectorKind {
    /// Form field id the selector feeds
    pub fn field(&self) -> &'static str {
        match self {
            SelectorKind::City => "cidade",
            SelectorKind::Neighborhood => "bairro",
            SelectorKind::CrimeType => "tipo_crime",
        }
    }
}

/// Options for the three selectors, in the order the server sent them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionLists {
    pub cities: Vec<String>,
    pub neighborhoods: Vec<String>,
    pub crime_types: Vec<String>,
}

impl SelectionLists {
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty() && self.neighborhoods.is_empty() && self.crime_types.is_empty()
    }

    /// Iterate the lists paired with their selector
    pub fn iter(&self) -> impl Iterator<Item = (SelectorKind, &[String])> {
        [
            (SelectorKind::City, self.cities.as_slice()),
            (SelectorKind::Neighborhood, self.neighborhoods.as_slice()),
            (SelectorKind::CrimeType, self.crime_types.as_slice()),
        ]
        .into_iter()
    }
}
