//! Neighborhood lookup index
//!
//! Maps neighborhood names to coordinates under an explicit
//! [`CollisionPolicy`]. Records keep the position of their first
//! appearance; an overwrite only swaps the coordinates.

use super::types::{CollisionPolicy, Coordinates, NeighborhoodRecord};
use crate::error::{ClientError, ClientResult};
use std::collections::{HashMap, HashSet};

type CityKey = (Option<String>, String);

/// In-memory neighborhood directory for one session
#[derive(Debug, Clone, Default)]
pub struct Directory {
    policy: CollisionPolicy,
    /// Neighborhood names exactly as received, for the selector
    names: Vec<String>,
    /// Effective records, in first-seen order
    records: Vec<NeighborhoodRecord>,
    /// Name -> record index (latest record carrying that name)
    by_name: HashMap<String, usize>,
    /// (city, name) -> record index, only filled under `PerCity`
    by_city: HashMap<CityKey, usize>,
    /// Names that exist under more than one city (`PerCity` only)
    ambiguous: HashSet<String>,
    /// Every name indexed so far, placeable or not (`Reject` only)
    seen: HashSet<String>,
}

impl Directory {
    /// Create an empty directory
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Build a directory from records in load order
    pub fn build(
        policy: CollisionPolicy,
        records: impl IntoIterator<Item = NeighborhoodRecord>,
    ) -> ClientResult<Self> {
        let mut directory = Self::new(policy);
        for record in records {
            directory.insert(record)?;
        }
        Ok(directory)
    }

    pub fn policy(&self) -> CollisionPolicy {
        self.policy
    }

    /// Add a record, returning the one it replaced (if any)
    ///
    /// The collision policy applies before the coordinates are checked. A
    /// record with out-of-range coordinates is listed for display but not
    /// indexed, and it evicts the record it collides with, so the name
    /// resolves to NotFound rather than to stale coordinates.
    pub fn insert(
        &mut self,
        record: NeighborhoodRecord,
    ) -> ClientResult<Option<NeighborhoodRecord>> {
        self.index(record, true)
    }

    /// Index a record without listing its name in the selector
    ///
    /// Used for gazetteer matches of a name-only entry, which is listed
    /// once with [`Directory::list_name`].
    pub fn place(
        &mut self,
        record: NeighborhoodRecord,
    ) -> ClientResult<Option<NeighborhoodRecord>> {
        self.index(record, false)
    }

    /// List a neighborhood name without indexing anything for it
    pub fn list_name(&mut self, name: impl Into<String>) {
        self.names.push(name.into());
    }

    fn index(
        &mut self,
        record: NeighborhoodRecord,
        listed: bool,
    ) -> ClientResult<Option<NeighborhoodRecord>> {
        if self.policy == CollisionPolicy::Reject && !self.seen.insert(record.name.clone()) {
            return Err(ClientError::DuplicateNeighborhood { name: record.name });
        }
        if listed {
            self.names.push(record.name.clone());
        }

        if !record.coordinates().is_valid() {
            return Ok(self.drop_invalid(record));
        }

        match self.policy {
            CollisionPolicy::Reject => {
                self.push_new(record);
                Ok(None)
            }
            CollisionPolicy::LastWriteWins => match self.by_name.get(&record.name).copied() {
                Some(idx) => Ok(Some(self.overwrite(idx, record))),
                None => {
                    self.push_new(record);
                    Ok(None)
                }
            },
            CollisionPolicy::PerCity => {
                let key = (record.city.clone(), record.name.clone());
                if let Some(idx) = self.by_city.get(&key).copied() {
                    return Ok(Some(self.overwrite(idx, record)));
                }
                self.mark_if_ambiguous(&record);
                let idx = self.push_new(record);
                self.by_city.insert(key, idx);
                Ok(None)
            }
        }
    }

    fn drop_invalid(&mut self, record: NeighborhoodRecord) -> Option<NeighborhoodRecord> {
        tracing::warn!(
            neighborhood = %record.name,
            latitude = record.latitude,
            longitude = record.longitude,
            "Ignoring neighborhood with invalid coordinates"
        );

        let stale = match self.policy {
            CollisionPolicy::PerCity => {
                self.mark_if_ambiguous(&record);
                self.by_city.get(&(record.city, record.name)).copied()
            }
            _ => self.by_name.get(&record.name).copied(),
        };
        stale.map(|idx| self.evict(idx))
    }

    fn mark_if_ambiguous(&mut self, record: &NeighborhoodRecord) {
        if let Some(&existing) = self.by_name.get(&record.name) {
            if self.records[existing].city != record.city {
                self.ambiguous.insert(record.name.clone());
            }
        }
    }

    fn push_new(&mut self, record: NeighborhoodRecord) -> usize {
        let idx = self.records.len();
        self.by_name.insert(record.name.clone(), idx);
        self.records.push(record);
        idx
    }

    fn overwrite(&mut self, idx: usize, record: NeighborhoodRecord) -> NeighborhoodRecord {
        let previous = &self.records[idx];
        tracing::warn!(
            neighborhood = %record.name,
            previous = %previous.coordinates(),
            replacement = %record.coordinates(),
            "Duplicate neighborhood in metadata, keeping the later record"
        );
        std::mem::replace(&mut self.records[idx], record)
    }

    /// Remove a record that was superseded by an unplaceable one
    fn evict(&mut self, idx: usize) -> NeighborhoodRecord {
        let removed = self.records.remove(idx);
        tracing::warn!(
            neighborhood = %removed.name,
            previous = %removed.coordinates(),
            "Later record for neighborhood cannot be placed, dropping the earlier one"
        );

        self.by_name.retain(|_, i| *i != idx);
        self.by_city.retain(|_, i| *i != idx);
        for i in self.by_name.values_mut().chain(self.by_city.values_mut()) {
            if *i > idx {
                *i -= 1;
            }
        }

        // Another city may still carry the name
        if let Some(pos) = self.records.iter().rposition(|r| r.name == removed.name) {
            self.by_name.insert(removed.name.clone(), pos);
        }
        removed
    }

    /// Resolve a neighborhood to its coordinates
    ///
    /// Exact, case-sensitive match on the name. `city` only participates
    /// under `PerCity`; otherwise it is informational.
    pub fn resolve_coordinates(&self, city: &str, name: &str) -> ClientResult<Coordinates> {
        self.lookup(city, name)
            .map(NeighborhoodRecord::coordinates)
            .ok_or_else(|| ClientError::NotFound(name.to_string()))
    }

    /// Find the effective record for a neighborhood
    pub fn lookup(&self, city: &str, name: &str) -> Option<&NeighborhoodRecord> {
        let idx = match self.policy {
            CollisionPolicy::PerCity => {
                let key = (Some(city.to_string()), name.to_string());
                match self.by_city.get(&key) {
                    Some(&idx) => Some(idx),
                    None if self.ambiguous.contains(name) => None,
                    None => self.by_name.get(name).copied(),
                }
            }
            _ => self.by_name.get(name).copied(),
        }?;
        self.records.get(idx)
    }

    /// Neighborhood names in the order received
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Records that can be placed on the map
    pub fn records(&self) -> &[NeighborhoodRecord] {
        &self.records
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Number of placeable records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recife_records() -> Vec<NeighborhoodRecord> {
        vec![
            NeighborhoodRecord::new("Boa Viagem", -8.1271, -34.9017).city("Recife"),
            NeighborhoodRecord::new("Casa Forte", -8.0350, -34.9186).city("Recife"),
            NeighborhoodRecord::new("Centro", -8.0631, -34.8711).city("Recife"),
            NeighborhoodRecord::new("Centro", -7.9461, -34.8731).city("Olinda"),
        ]
    }

    #[test]
    fn test_resolve_exact_match() {
        let dir = Directory::build(CollisionPolicy::LastWriteWins, recife_records()).unwrap();

        let coords = dir.resolve_coordinates("Recife", "Casa Forte").unwrap();
        assert_eq!(coords, Coordinates::new(-8.0350, -34.9186));

        // Case-sensitive
        assert!(matches!(
            dir.resolve_coordinates("Recife", "casa forte"),
            Err(ClientError::NotFound(name)) if name == "casa forte"
        ));
    }

    #[test]
    fn test_last_write_wins() {
        let dir = Directory::build(CollisionPolicy::LastWriteWins, recife_records()).unwrap();

        // The Olinda record was loaded last, and city does not participate
        let coords = dir.resolve_coordinates("Recife", "Centro").unwrap();
        assert_eq!(coords, Coordinates::new(-7.9461, -34.8731));

        // Overwrite keeps first-seen position; names keep every entry
        assert_eq!(dir.len(), 3);
        assert_eq!(dir.records()[2].city.as_deref(), Some("Olinda"));
        assert_eq!(dir.names().len(), 4);
    }

    #[test]
    fn test_insert_returns_replaced_record() {
        let mut dir = Directory::new(CollisionPolicy::LastWriteWins);
        assert!(dir
            .insert(NeighborhoodRecord::new("Derby", -8.05, -34.90))
            .unwrap()
            .is_none());

        let replaced = dir
            .insert(NeighborhoodRecord::new("Derby", -8.06, -34.91))
            .unwrap()
            .unwrap();
        assert_eq!(replaced.latitude, -8.05);
        assert_eq!(
            dir.resolve_coordinates("", "Derby").unwrap(),
            Coordinates::new(-8.06, -34.91)
        );
    }

    #[test]
    fn test_reject_policy() {
        let result = Directory::build(CollisionPolicy::Reject, recife_records());
        assert!(matches!(
            result,
            Err(ClientError::DuplicateNeighborhood { name }) if name == "Centro"
        ));

        let unique = recife_records().into_iter().take(3);
        let dir = Directory::build(CollisionPolicy::Reject, unique).unwrap();
        assert_eq!(dir.len(), 3);
    }

    #[test]
    fn test_per_city_disambiguates() {
        let dir = Directory::build(CollisionPolicy::PerCity, recife_records()).unwrap();

        assert_eq!(
            dir.resolve_coordinates("Recife", "Centro").unwrap(),
            Coordinates::new(-8.0631, -34.8711)
        );
        assert_eq!(
            dir.resolve_coordinates("Olinda", "Centro").unwrap(),
            Coordinates::new(-7.9461, -34.8731)
        );

        // Unique names still resolve when the city is unknown
        assert!(dir.resolve_coordinates("Jaboatão", "Boa Viagem").is_ok());

        // Ambiguous name with an unknown city is not guessed
        assert!(dir.resolve_coordinates("Jaboatão", "Centro").is_err());
    }

    #[test]
    fn test_missing_and_unplaced() {
        let mut dir = Directory::build(CollisionPolicy::LastWriteWins, recife_records()).unwrap();
        dir.list_name("Ilha do Leite");

        assert!(dir.names().contains(&"Ilha do Leite".to_string()));
        assert!(!dir.contains("Ilha do Leite"));
        assert!(matches!(
            dir.resolve_coordinates("Recife", "Ilha do Leite"),
            Err(ClientError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_coordinates_not_indexed() {
        let mut dir = Directory::new(CollisionPolicy::LastWriteWins);
        dir.insert(NeighborhoodRecord::new("Nowhere", f64::NAN, 0.0))
            .unwrap();

        assert!(dir.is_empty());
        assert_eq!(dir.names(), &["Nowhere".to_string()]);
        assert!(dir.resolve_coordinates("", "Nowhere").is_err());
    }

    #[test]
    fn test_invalid_later_record_evicts_earlier() {
        let mut dir = Directory::new(CollisionPolicy::LastWriteWins);
        dir.insert(NeighborhoodRecord::new("Derby", -8.05, -34.90))
            .unwrap();
        dir.insert(NeighborhoodRecord::new("Graças", -8.04, -34.89))
            .unwrap();

        let evicted = dir
            .insert(NeighborhoodRecord::new("Derby", 95.0, -34.90))
            .unwrap()
            .unwrap();
        assert_eq!(evicted.latitude, -8.05);

        assert!(matches!(
            dir.resolve_coordinates("", "Derby"),
            Err(ClientError::NotFound(name)) if name == "Derby"
        ));
        assert!(!dir.contains("Derby"));

        // Remaining records keep resolving after the removal
        assert_eq!(
            dir.resolve_coordinates("", "Graças").unwrap(),
            Coordinates::new(-8.04, -34.89)
        );
        assert_eq!(dir.len(), 1);
        assert_eq!(dir.names().len(), 3);
    }

    #[test]
    fn test_reject_counts_invalid_records() {
        let result = Directory::build(
            CollisionPolicy::Reject,
            vec![
                NeighborhoodRecord::new("Derby", -8.05, -34.90),
                NeighborhoodRecord::new("Derby", 95.0, -34.90),
            ],
        );
        assert!(matches!(
            result,
            Err(ClientError::DuplicateNeighborhood { name }) if name == "Derby"
        ));

        // Same when the unplaceable record comes first
        let result = Directory::build(
            CollisionPolicy::Reject,
            vec![
                NeighborhoodRecord::new("Derby", f64::NAN, -34.90),
                NeighborhoodRecord::new("Derby", -8.05, -34.90),
            ],
        );
        assert!(matches!(
            result,
            Err(ClientError::DuplicateNeighborhood { .. })
        ));
    }

    #[test]
    fn test_per_city_invalid_record_evicts_only_its_city() {
        let mut records = recife_records();
        records.push(NeighborhoodRecord::new("Centro", -7.9461, 200.0).city("Olinda"));
        let dir = Directory::build(CollisionPolicy::PerCity, records).unwrap();

        assert!(matches!(
            dir.resolve_coordinates("Olinda", "Centro"),
            Err(ClientError::NotFound(_))
        ));
        assert_eq!(
            dir.resolve_coordinates("Recife", "Centro").unwrap(),
            Coordinates::new(-8.0631, -34.8711)
        );
        assert!(dir.resolve_coordinates("Recife", "Boa Viagem").is_ok());
        assert!(dir.contains("Centro"));
    }

    #[test]
    fn test_place_does_not_list() {
        let mut dir = Directory::new(CollisionPolicy::PerCity);
        dir.list_name("Centro");
        dir.place(NeighborhoodRecord::new("Centro", -8.0631, -34.8711).city("Recife"))
            .unwrap();
        dir.place(NeighborhoodRecord::new("Centro", -7.9461, -34.8731).city("Olinda"))
            .unwrap();

        assert_eq!(dir.names(), &["Centro".to_string()]);
        assert_eq!(dir.len(), 2);
        assert!(dir.resolve_coordinates("Olinda", "Centro").is_ok());
    }
}
