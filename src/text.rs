//! Text segmentation for character-by-character reveals.
//!
//! Segmenting is a pure function of the source string. Results are cached
//! per string so repeated reveals of the same heading reuse one shared
//! slice of units.

use std::collections::HashMap;
use std::sync::Arc;

use crate::animation::{AnimationDescriptor, Ease, PropertyValues, TimingFunction};

/// Rendered in place of spaces so they keep their width when each
/// character is laid out on its own
pub const NON_BREAKING_SPACE: char = '\u{00A0}';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharKind {
    Glyph,
    /// Whitespace preserved as a non-collapsing space
    Space,
}

/// One character of a segmented text block
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharUnit {
    /// Index of the character within the source text
    pub index: usize,
    /// The character as written in the source
    pub source: char,
    pub kind: CharKind,
}

impl CharUnit {
    /// The character to render
    pub fn display(&self) -> char {
        match self.kind {
            CharKind::Glyph => self.source,
            CharKind::Space => NON_BREAKING_SPACE,
        }
    }
}

/// Splits text into characters, caching per source string
#[derive(Debug, Default)]
pub struct TextSegmenter {
    cache: HashMap<String, Arc<[CharUnit]>>,
}

impl TextSegmenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Character units for `text`, one per `char`
    pub fn segment(&mut self, text: &str) -> Arc<[CharUnit]> {
        if let Some(units) = self.cache.get(text) {
            return units.clone();
        }
        let units: Arc<[CharUnit]> = segment_chars(text).into();
        log::trace!("Segmented {:?} into {} units", text, units.len());
        self.cache.insert(text.to_string(), units.clone());
        units
    }

    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

fn segment_chars(text: &str) -> Vec<CharUnit> {
    text.chars()
        .enumerate()
        .map(|(index, source)| CharUnit {
            index,
            source,
            kind: if source.is_whitespace() {
                CharKind::Space
            } else {
                CharKind::Glyph
            },
        })
        .collect()
}

/// Default character reveal: each glyph flips up into place
pub fn char_reveal() -> AnimationDescriptor {
    AnimationDescriptor::from_to(
        PropertyValues::new().opacity(0.0).y(50.0).rotation_x(-90.0),
        PropertyValues::new().opacity(1.0).y(0.0).rotation_x(0.0),
    )
    .duration(0.8)
    .stagger(0.02)
    .timing(TimingFunction::Back(1.7, Ease::Out))
}
