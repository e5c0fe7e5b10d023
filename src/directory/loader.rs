//! Metadata loading
//!
//! Turns a `/metadata` response into a [`Directory`] plus the selector
//! option lists.

use super::gazetteer::Gazetteer;
use super::index::Directory;
use super::types::{CollisionPolicy, NeighborhoodRecord, SelectionLists};
use crate::error::ClientResult;
use crate::http::{MetadataResponse, NeighborhoodPayload};
use async_trait::async_trait;

/// Anything that can produce selector metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn fetch(&self) -> ClientResult<MetadataResponse>;
}

/// Result of a successful metadata load
#[derive(Debug, Clone)]
pub struct LoadedMetadata {
    pub directory: Directory,
    pub selections: SelectionLists,
}

/// Builds directories from metadata responses
#[derive(Debug, Clone, Default)]
pub struct DirectoryLoader {
    policy: CollisionPolicy,
    gazetteer: Option<Gazetteer>,
}

impl DirectoryLoader {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            gazetteer: None,
        }
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Use a gazetteer to place name-only neighborhoods
    pub fn with_gazetteer(mut self, gazetteer: Gazetteer) -> Self {
        self.gazetteer = Some(gazetteer);
        self
    }

    /// Fetch metadata and build the directory
    ///
    /// No retry: a failed fetch is returned to the caller as-is.
    pub async fn load(&self, source: &dyn MetadataSource) -> ClientResult<LoadedMetadata> {
        let metadata = source.fetch().await?;
        self.build(metadata)
    }

    /// Build the directory and selector lists from a response
    pub fn build(&self, metadata: MetadataResponse) -> ClientResult<LoadedMetadata> {
        let mut directory = Directory::new(self.policy);
        let mut name_only = 0usize;
        let mut incomplete = 0usize;
        let mut unplaced = 0usize;

        for payload in metadata.bairros {
            match payload {
                NeighborhoodPayload::Record {
                    bairro,
                    latitude,
                    longitude,
                    cidade,
                } => {
                    let mut record = NeighborhoodRecord::new(bairro, latitude, longitude);
                    record.city = cidade;
                    directory.insert(record)?;
                }
                NeighborhoodPayload::Unplaced { bairro, cidade } => {
                    incomplete += 1;
                    tracing::warn!(
                        neighborhood = %bairro,
                        "Metadata entry has no usable coordinates"
                    );
                    if !self.place_from_gazetteer(&mut directory, cidade.as_deref(), &bairro)? {
                        unplaced += 1;
                    }
                    directory.list_name(bairro);
                }
                NeighborhoodPayload::Name(name) => {
                    name_only += 1;
                    if !self.place_from_gazetteer(&mut directory, None, &name)? {
                        unplaced += 1;
                    }
                    directory.list_name(name);
                }
            }
        }

        if name_only > 0 || incomplete > 0 {
            tracing::warn!(
                "Metadata listed {} neighborhoods without coordinates (deprecated shape) and {} with unusable ones, {} could not be placed",
                name_only,
                incomplete,
                unplaced
            );
        }

        let selections = SelectionLists {
            cities: metadata.cidades,
            neighborhoods: directory.names().to_vec(),
            crime_types: metadata.tipos_crime,
        };

        tracing::info!(
            "Directory loaded: {} cities, {} neighborhoods ({} placeable), {} crime types",
            selections.cities.len(),
            selections.neighborhoods.len(),
            directory.len(),
            selections.crime_types.len()
        );

        Ok(LoadedMetadata {
            directory,
            selections,
        })
    }

    /// Index gazetteer coordinates for a neighborhood that arrived without
    /// them. With a city only that row is used; otherwise every row with the
    /// name goes through the collision policy. Returns whether anything was
    /// placed.
    fn place_from_gazetteer(
        &self,
        directory: &mut Directory,
        city: Option<&str>,
        name: &str,
    ) -> ClientResult<bool> {
        let Some(gazetteer) = &self.gazetteer else {
            return Ok(false);
        };

        if let Some(record) = city.and_then(|city| gazetteer.get(Some(city), name)) {
            directory.place(record.clone())?;
            return Ok(true);
        }

        let mut placed = false;
        for record in gazetteer.records_named(name) {
            directory.place(record.clone())?;
            placed = true;
        }
        Ok(placed)
    }
}
