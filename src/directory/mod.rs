//! Metadata Directory
//!
//! Holds the cities, neighborhoods and crime types the form offers, and
//! resolves a neighborhood to map coordinates.
//!
//! ## Architecture
//!
//! - **MetadataSource**: where the metadata comes from (the API client in practice)
//! - **DirectoryLoader**: builds a `Directory` and the selector lists from a response
//! - **Directory**: name -> coordinates index with an explicit `CollisionPolicy`
//! - **Gazetteer**: optional CSV of coordinates for name-only metadata

mod gazetteer;
mod index;
mod loader;
mod types;

pub use gazetteer::Gazetteer;
pub use index::Directory;
pub use loader::{DirectoryLoader, LoadedMetadata, MetadataSource};
pub use types::{CollisionPolicy, Coordinates, NeighborhoodRecord, SelectionLists, SelectorKind};
