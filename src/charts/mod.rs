//! Charts module - static chart rendering

mod income_panels;
mod salary_plot;

pub use income_panels::IncomePanels;
pub use salary_plot::SalaryPlot;

use plotters::style::RGBColor;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("failed to render chart: {0}")]
    Render(String),
}

/// House colors for the two income brackets.
pub const LOW_BRACKET_COLOR: RGBColor = RGBColor(31, 119, 180); // Blue
pub const HIGH_BRACKET_COLOR: RGBColor = RGBColor(255, 127, 14); // Orange

/// Color palette for additional series (locations, education levels)
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(231, 76, 60),  // Red
    RGBColor(46, 204, 113), // Green
    RGBColor(155, 89, 182), // Purple
    RGBColor(243, 156, 18), // Orange
    RGBColor(26, 188, 156), // Teal
    RGBColor(233, 30, 99),  // Pink
    RGBColor(0, 188, 212),  // Cyan
    RGBColor(255, 87, 34),  // Deep Orange
    RGBColor(121, 85, 72),  // Brown
    RGBColor(96, 125, 139), // Blue Grey
];

/// Color for a generic series index.
pub(crate) fn series_color(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Color for an income bracket index: the first two brackets get the house
/// colors, any further bracket falls back to the palette.
pub(crate) fn bracket_color(index: usize) -> RGBColor {
    match index {
        0 => LOW_BRACKET_COLOR,
        1 => HIGH_BRACKET_COLOR,
        i => series_color(i),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_colors_are_stable() {
        assert_eq!(bracket_color(0), LOW_BRACKET_COLOR);
        assert_eq!(bracket_color(1), HIGH_BRACKET_COLOR);
        assert_eq!(bracket_color(2), PALETTE[2]);
    }

    #[test]
    fn test_series_color_wraps() {
        assert_eq!(series_color(0), PALETTE[0]);
        assert_eq!(series_color(PALETTE.len()), PALETTE[0]);
    }
}
