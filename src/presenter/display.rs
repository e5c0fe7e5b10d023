//! Result panel values

use serde::Serialize;

/// What the result panel shows for one probability
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbabilityDisplay {
    /// Readout, e.g. `"42%"`
    pub text: String,
    /// Width of the fill bar in percent, clamped to `[0, 100]`
    pub fill_percent: f64,
}

impl ProbabilityDisplay {
    pub fn from_probability(probability: f64) -> Self {
        Self {
            text: format!("{}%", format_number(probability)),
            fill_percent: if probability.is_finite() {
                probability.clamp(0.0, 100.0)
            } else {
                0.0
            },
        }
    }

    /// Fill as a CSS width value
    pub fn fill_width(&self) -> String {
        format!("{}%", format_number(self.fill_percent))
    }

    /// Fixed-width text bar, `width` cells wide
    pub fn bar(&self, width: usize) -> String {
        let filled = ((self.fill_percent / 100.0) * width as f64).round() as usize;
        let filled = filled.min(width);
        format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
    }
}

/// Shortest exact decimal form: `42.0` -> `42`, `12.34` -> `12.34`
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Also folds -0.0
        return "0".to_string();
    }
    format!("{}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_number() {
        let display = ProbabilityDisplay::from_probability(42.0);
        assert_eq!(display.text, "42%");
        assert_eq!(display.fill_percent, 42.0);
        assert_eq!(display.fill_width(), "42%");
    }

    #[test]
    fn test_zero_boundary() {
        let display = ProbabilityDisplay::from_probability(0.0);
        assert_eq!(display.text, "0%");
        assert_eq!(display.fill_percent, 0.0);
        assert_eq!(display.bar(10), "[..........]");

        assert_eq!(ProbabilityDisplay::from_probability(-0.0).text, "0%");
    }

    #[test]
    fn test_fraction_and_clamp() {
        let display = ProbabilityDisplay::from_probability(12.34);
        assert_eq!(display.text, "12.34%");

        let over = ProbabilityDisplay::from_probability(130.0);
        assert_eq!(over.text, "130%");
        assert_eq!(over.fill_percent, 100.0);
        assert_eq!(over.bar(4), "[####]");
    }

    #[test]
    fn test_bar_rounding() {
        let display = ProbabilityDisplay::from_probability(42.0);
        assert_eq!(display.bar(10), "[####......]");
    }
}
