//! Map Presenter
//!
//! Owns the marker set. Every update clears the previous markers before
//! adding a new one, so at most one marker is ever displayed.

use super::display::ProbabilityDisplay;
use crate::directory::{Coordinates, Directory};
use crate::error::ClientResult;
use serde::Serialize;

/// Handle for a marker placed on a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MarkerId(pub u64);

/// Popup attached to a marker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Popup {
    pub title: String,
    pub body: String,
}

impl Popup {
    /// `"<neighborhood>, <city>"` over the formatted probability
    pub fn for_result(city: &str, neighborhood: &str, display: &ProbabilityDisplay) -> Self {
        Self {
            title: format!("{}, {}", neighborhood, city),
            body: format!("Crime probability: {}", display.text),
        }
    }
}

/// The map widget the presenter drives
pub trait MapView {
    fn add_marker(&mut self, at: Coordinates, popup: &Popup) -> MarkerId;

    fn remove_marker(&mut self, id: MarkerId);

    fn open_popup(&mut self, id: MarkerId);

    fn set_view(&mut self, center: Coordinates, zoom: u8);
}

/// View settings for the presenter
#[derive(Debug, Clone, PartialEq)]
pub struct MapSettings {
    /// Overview centre (Recife)
    pub default_center: Coordinates,
    pub default_zoom: u8,
    /// Zoom used when focusing a marker
    pub focus_zoom: u8,
    /// Return to the overview when a neighborhood cannot be placed
    pub reset_on_missing: bool,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: Coordinates::new(-8.0476, -34.8770),
            default_zoom: 11,
            focus_zoom: 14,
            reset_on_missing: true,
        }
    }
}

/// Places the result of a prediction on the map
#[derive(Debug, Default)]
pub struct MapPresenter {
    settings: MapSettings,
    markers: Vec<MarkerId>,
}

impl MapPresenter {
    pub fn new(settings: MapSettings) -> Self {
        Self {
            settings,
            markers: Vec::new(),
        }
    }

    pub fn settings(&self) -> &MapSettings {
        &self.settings
    }

    /// Put the map in its overview position
    pub fn init_view<M: MapView + ?Sized>(&self, map: &mut M) {
        map.set_view(self.settings.default_center, self.settings.default_zoom);
    }

    /// Show one prediction on the map
    ///
    /// Clears the previous markers, then places a marker with an open popup
    /// and focuses it. An unknown neighborhood leaves the map without a
    /// marker and returns `NotFound`.
    pub fn show_result<M: MapView + ?Sized>(
        &mut self,
        map: &mut M,
        directory: &Directory,
        city: &str,
        neighborhood: &str,
        probability: f64,
    ) -> ClientResult<Coordinates> {
        self.clear(map);

        let coords = match directory.resolve_coordinates(city, neighborhood) {
            Ok(coords) => coords,
            Err(e) => {
                tracing::error!("Coordinates for neighborhood '{}' not found", neighborhood);
                if self.settings.reset_on_missing {
                    self.init_view(map);
                }
                return Err(e);
            }
        };

        let display = ProbabilityDisplay::from_probability(probability);
        let popup = Popup::for_result(city, neighborhood, &display);
        let id = map.add_marker(coords, &popup);
        map.open_popup(id);
        self.markers.push(id);

        map.set_view(coords, self.settings.focus_zoom);
        tracing::debug!(neighborhood, %coords, marker = id.0, "Marker placed");

        Ok(coords)
    }

    /// Remove every marker this presenter placed
    pub fn clear<M: MapView + ?Sized>(&mut self, map: &mut M) {
        for id in self.markers.drain(..) {
            map.remove_marker(id);
        }
    }

    /// Markers currently tracked
    pub fn markers(&self) -> &[MarkerId] {
        &self.markers
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}
