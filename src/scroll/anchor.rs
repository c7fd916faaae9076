//! Scroll anchors: where on the page a trigger line sits.
//!
//! An anchor pairs a point on the element with a line in the viewport,
//! written the way web scroll-trigger code writes them:
//!
//! ```ignore
//! let start: ScrollAnchor = "top 80%".parse()?;   // element top meets 80% down the viewport
//! let end: ScrollAnchor = "bottom 20%".parse()?;
//! let sticky: ScrollAnchor = "center 100px".parse()?;
//! ```

use std::fmt;
use std::str::FromStr;

use crate::element::Rect;
use crate::error::ParseError;

/// A position along one axis, relative to a length
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Offset {
    /// Fraction of the length (`top` = 0, `center` = 0.5, `bottom` = 1)
    Fraction(f32),
    /// Absolute pixels from the start
    Pixels(f32),
}

impl Offset {
    pub fn resolve(self, length: f32) -> f32 {
        match self {
            Offset::Fraction(f) => f * length,
            Offset::Pixels(px) => px,
        }
    }

    fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "top" => return Some(Offset::Fraction(0.0)),
            "center" => return Some(Offset::Fraction(0.5)),
            "bottom" => return Some(Offset::Fraction(1.0)),
            _ => {}
        }
        if let Some(percent) = token.strip_suffix('%') {
            return percent.trim().parse::<f32>().ok().map(|p| Offset::Fraction(p / 100.0));
        }
        let px = token.strip_suffix("px").unwrap_or(token);
        px.trim().parse::<f32>().ok().map(Offset::Pixels)
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Offset::Fraction(v) if *v == 0.0 => write!(f, "top"),
            Offset::Fraction(v) if *v == 0.5 => write!(f, "center"),
            Offset::Fraction(v) if *v == 1.0 => write!(f, "bottom"),
            Offset::Fraction(v) => write!(f, "{}%", v * 100.0),
            Offset::Pixels(px) => write!(f, "{}px", px),
        }
    }
}

/// Where an element edge meets a viewport line
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollAnchor {
    pub element: Offset,
    pub viewport: Offset,
}

impl ScrollAnchor {
    pub const fn new(element: Offset, viewport: Offset) -> Self {
        Self { element, viewport }
    }

    /// Element top meets the line `fraction` of the way down the viewport
    pub const fn top_at(fraction: f32) -> Self {
        Self::new(Offset::Fraction(0.0), Offset::Fraction(fraction))
    }

    /// Element bottom meets the line `fraction` of the way down the viewport
    pub const fn bottom_at(fraction: f32) -> Self {
        Self::new(Offset::Fraction(1.0), Offset::Fraction(fraction))
    }

    /// Scroll offset at which the element point reaches the viewport line
    pub fn scroll_offset(&self, bounds: &Rect, viewport_height: f32) -> f32 {
        bounds.y + self.element.resolve(bounds.height) - self.viewport.resolve(viewport_height)
    }
}

impl FromStr for ScrollAnchor {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let (Some(element), Some(viewport), None) = (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(ParseError::Anchor(s.to_string()));
        };
        match (Offset::parse(element), Offset::parse(viewport)) {
            (Some(element), Some(viewport)) => Ok(Self::new(element, viewport)),
            _ => Err(ParseError::Anchor(s.to_string())),
        }
    }
}

impl fmt::Display for ScrollAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.element, self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keywords_and_percent() {
        let anchor: ScrollAnchor = "top 80%".parse().unwrap();
        assert_eq!(anchor, ScrollAnchor::top_at(0.8));

        let anchor: ScrollAnchor = "bottom 20%".parse().unwrap();
        assert_eq!(anchor, ScrollAnchor::bottom_at(0.2));

        let anchor: ScrollAnchor = "Center 100px".parse().unwrap();
        assert_eq!(anchor.viewport, Offset::Pixels(100.0));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for input in ["", "top", "top 80% extra", "middle 50%", "top abc%"] {
            assert_eq!(
                input.parse::<ScrollAnchor>(),
                Err(ParseError::Anchor(input.to_string()))
            );
        }
    }

    #[test]
    fn test_scroll_offset() {
        let bounds = Rect::new(0.0, 1000.0, 800.0, 200.0);
        // Top edge reaches 80% of an 800px viewport at scroll 1000 - 640
        assert_eq!(ScrollAnchor::top_at(0.8).scroll_offset(&bounds, 800.0), 360.0);
        // Bottom edge reaches 20%: 1200 - 160
        assert_eq!(ScrollAnchor::bottom_at(0.2).scroll_offset(&bounds, 800.0), 1040.0);
    }

    #[test]
    fn test_display_round_trips_keywords() {
        assert_eq!(ScrollAnchor::top_at(0.8).to_string(), "top 80%");
        assert_eq!(ScrollAnchor::bottom_at(0.5).to_string(), "bottom center");
    }
}
