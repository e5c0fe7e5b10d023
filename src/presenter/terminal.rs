//! Terminal rendition of the page and map
//!
//! Used by the command-line front-end. The map keeps its markers in memory
//! and can export them as GeoJSON.

use super::display::ProbabilityDisplay;
use super::map::{MapView, MarkerId, Popup};
use super::page::Page;
use crate::directory::{Coordinates, SelectorKind};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::io::Write;

/// A marker held by [`TerminalMap`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub id: MarkerId,
    pub coordinates: Coordinates,
    pub popup: Popup,
    pub open: bool,
}

/// Map that prints its changes to a writer
pub struct TerminalMap<W: Write> {
    out: W,
    markers: BTreeMap<MarkerId, PlacedMarker>,
    next_id: u64,
    center: Coordinates,
    zoom: u8,
}

impl<W: Write> TerminalMap<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            markers: BTreeMap::new(),
            next_id: 1,
            center: Coordinates::new(0.0, 0.0),
            zoom: 0,
        }
    }

    pub fn markers(&self) -> impl Iterator<Item = &PlacedMarker> {
        self.markers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Current centre and zoom
    pub fn view(&self) -> (Coordinates, u8) {
        (self.center, self.zoom)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Markers as a GeoJSON `FeatureCollection`
    pub fn to_geojson(&self) -> Value {
        let features: Vec<Value> = self
            .markers
            .values()
            .map(|m| {
                json!({
                    "type": "Feature",
                    "geometry": {
                        "type": "Point",
                        "coordinates": [m.coordinates.longitude, m.coordinates.latitude],
                    },
                    "properties": {
                        "title": m.popup.title,
                        "body": m.popup.body,
                    },
                })
            })
            .collect();

        json!({
            "type": "FeatureCollection",
            "features": features,
        })
    }

    fn emit(&mut self, line: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{}", line) {
            tracing::warn!("Failed to write map output: {}", e);
        }
    }
}

impl<W: Write> MapView for TerminalMap<W> {
    fn add_marker(&mut self, at: Coordinates, popup: &Popup) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.markers.insert(
            id,
            PlacedMarker {
                id,
                coordinates: at,
                popup: popup.clone(),
                open: false,
            },
        );
        self.emit(format_args!("marker {} at ({})", id.0, at));
        id
    }

    fn remove_marker(&mut self, id: MarkerId) {
        if self.markers.remove(&id).is_some() {
            self.emit(format_args!("marker {} removed", id.0));
        }
    }

    fn open_popup(&mut self, id: MarkerId) {
        let popup = match self.markers.get_mut(&id) {
            Some(marker) => {
                marker.open = true;
                marker.popup.clone()
            }
            None => return,
        };
        self.emit(format_args!("  {}\n  {}", popup.title, popup.body));
    }

    fn set_view(&mut self, center: Coordinates, zoom: u8) {
        self.center = center;
        self.zoom = zoom;
        self.emit(format_args!("view ({}) zoom {}", center, zoom));
    }
}

/// Page that prints selectors and results to stdout-like writers
pub struct ConsolePage<O: Write, E: Write> {
    out: O,
    err: E,
    /// Cells in the fill bar
    bar_width: usize,
}

impl ConsolePage<std::io::Stdout, std::io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdout(), std::io::stderr())
    }
}

impl<O: Write, E: Write> ConsolePage<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            bar_width: 20,
        }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

impl<O: Write, E: Write> Page for ConsolePage<O, E> {
    fn alert(&mut self, message: &str) {
        if let Err(e) = writeln!(self.err, "! {}", message) {
            tracing::warn!("Failed to write alert: {}", e);
        }
    }

    // Printed options cannot be taken back
    fn clear_selectors(&mut self) {}

    fn populate_selector(&mut self, kind: SelectorKind, options: &[String]) {
        let result = writeln!(self.out, "{} ({}):", kind.field(), options.len()).and_then(|_| {
            options
                .iter()
                .try_for_each(|option| writeln!(self.out, "  {}", option))
        });
        if let Err(e) = result {
            tracing::warn!("Failed to write selector: {}", e);
        }
    }

    fn show_probability(&mut self, display: &ProbabilityDisplay) {
        if let Err(e) = writeln!(
            self.out,
            "Crime probability: {} {}",
            display.text,
            display.bar(self.bar_width)
        ) {
            tracing::warn!("Failed to write result: {}", e);
        }
    }
}
