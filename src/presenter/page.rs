//! Page surface
//!
//! The parts of the page outside the map: selectors, result panel and the
//! blocking user notification.

use super::display::ProbabilityDisplay;
use crate::directory::SelectorKind;

/// The page the session reads from and writes to
pub trait Page {
    /// Blocking notification shown to the user
    fn alert(&mut self, message: &str);

    /// Remove every option from all selectors
    fn clear_selectors(&mut self);

    /// Append options to a selector, in order
    fn populate_selector(&mut self, kind: SelectorKind, options: &[String]);

    /// Reveal the result panel with a readout and fill
    fn show_probability(&mut self, display: &ProbabilityDisplay);
}
