//! Gazetteer import
//!
//! Local CSV of neighborhood coordinates, used to place neighborhoods when
//! the metadata endpoint only returns names. Expected header:
//!
//! ```text
//! bairro,cidade,latitude,longitude
//! Boa Viagem,Recife,-8.1271,-34.9017
//! ```
//!
//! Rows are keyed by `(cidade, bairro)`, so the same neighborhood name in two
//! cities is kept twice. A repeated `(cidade, bairro)` pair replaces the
//! earlier row and is counted in [`Gazetteer::duplicates`].

use super::types::{Coordinates, NeighborhoodRecord};
use crate::error::ClientResult;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct GazetteerRow {
    bairro: String,
    #[serde(default)]
    cidade: Option<String>,
    latitude: f64,
    longitude: f64,
}

/// Neighborhood coordinates keyed by city and name
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    /// Records in file order
    entries: Vec<NeighborhoodRecord>,
    keys: HashMap<(Option<String>, String), usize>,
    /// Rows that could not be parsed
    pub rows_failed: usize,
    /// Rows that repeated an earlier `(cidade, bairro)` pair
    pub duplicates: usize,
}

impl Gazetteer {
    /// Load a gazetteer from a CSV file
    pub fn from_path(path: &Path) -> ClientResult<Self> {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;
        let gazetteer = Self::from_csv(reader);
        tracing::info!(
            "Loaded {} gazetteer entries from {:?} ({} rows skipped, {} duplicates)",
            gazetteer.len(),
            path,
            gazetteer.rows_failed,
            gazetteer.duplicates
        );
        Ok(gazetteer)
    }

    /// Load a gazetteer from any reader
    pub fn from_reader<R: Read>(reader: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        Self::from_csv(reader)
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> Self {
        let mut gazetteer = Self::default();

        for (line_num, result) in reader.deserialize::<GazetteerRow>().enumerate() {
            let row = match result {
                Ok(row) => row,
                Err(e) => {
                    tracing::warn!("Gazetteer line {}: {}", line_num + 2, e);
                    gazetteer.rows_failed += 1;
                    continue;
                }
            };

            if row.bairro.is_empty()
                || !Coordinates::new(row.latitude, row.longitude).is_valid()
            {
                tracing::warn!("Gazetteer line {}: unusable row", line_num + 2);
                gazetteer.rows_failed += 1;
                continue;
            }

            let mut record = NeighborhoodRecord::new(row.bairro, row.latitude, row.longitude);
            record.city = row.cidade.filter(|c| !c.is_empty());
            gazetteer.push(record, line_num + 2);
        }

        gazetteer
    }

    fn push(&mut self, record: NeighborhoodRecord, line: usize) {
        let key = (record.city.clone(), record.name.clone());
        match self.keys.get(&key) {
            Some(&idx) => {
                tracing::warn!(
                    neighborhood = %record.name,
                    city = record.city.as_deref().unwrap_or("-"),
                    previous = %self.entries[idx].coordinates(),
                    replacement = %record.coordinates(),
                    "Gazetteer line {}: duplicate row, keeping the later one",
                    line
                );
                self.duplicates += 1;
                self.entries[idx] = record;
            }
            None => {
                self.keys.insert(key, self.entries.len());
                self.entries.push(record);
            }
        }
    }

    /// Record for a neighborhood in a given city (`None` for rows without one)
    pub fn get(&self, city: Option<&str>, name: &str) -> Option<&NeighborhoodRecord> {
        let key = (city.map(str::to_string), name.to_string());
        self.keys.get(&key).map(|&idx| &self.entries[idx])
    }

    /// Every record carrying a neighborhood name, in file order
    pub fn records_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a NeighborhoodRecord> + 'a {
        self.entries.iter().filter(move |record| record.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
