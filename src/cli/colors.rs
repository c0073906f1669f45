//! To maintain a theme of colors, I will add colors here as constants so
//! the UI does not look bad at any point.
//!
//! - SLATE_BLUE: Main Color

use colored::Color;

pub(crate) const SLATE_BLUE: Color = Color::TrueColor {
    r: 106,
    g: 140,
    b: 175,
};
