//! Map Presenter and page surface
//!
//! - [`MapPresenter`]: sole owner of the marker set
//! - [`MapView`] / [`Page`]: the widgets the presenter and session drive
//! - [`TerminalMap`] / [`ConsolePage`]: terminal implementations for the CLI

mod display;
mod map;
mod page;
mod terminal;

pub use display::{format_number, ProbabilityDisplay};
pub use map::{MapPresenter, MapSettings, MapView, MarkerId, Popup};
pub use page::Page;
pub use terminal::{ConsolePage, PlacedMarker, TerminalMap};
