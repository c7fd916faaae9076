//! Color themes and the provider that shares the active one.
//!
//! The provider is an explicit object placed in the root context. Anything
//! that depends on the theme subscribes to it; selecting another theme
//! notifies subscribers through the provider's signal.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::animation::Animatable;
use crate::error::ParseError;
use crate::reactive::{create_effect, create_signal, provide_context, use_context, Effect, Signal};

/// A color in hue/saturation/lightness, written the way CSS custom
/// properties hold it: `"200 100% 60%"`
#[derive(Clone, Copy, Debug, PartialEq, Animatable)]
pub struct Hsl {
    /// Hue in degrees
    pub h: f32,
    /// Saturation in percent
    pub s: f32,
    /// Lightness in percent
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

impl FromStr for Hsl {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Color(s.to_string());
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [h, sat, light] = parts.as_slice() else {
            return Err(invalid());
        };
        let h = h.trim_end_matches("deg").parse::<f32>().map_err(|_| invalid())?;
        let percent = |v: &str| {
            v.strip_suffix('%')
                .unwrap_or(v)
                .parse::<f32>()
                .ok()
                .filter(|p| (0.0..=100.0).contains(p))
        };
        match (percent(sat), percent(light)) {
            (Some(sat), Some(light)) => Ok(Hsl::new(h, sat, light)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Animatable)]
pub struct ThemeColors {
    pub primary: Hsl,
    pub accent: Hsl,
    pub background: Hsl,
    pub foreground: Hsl,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

impl Theme {
    pub fn new(name: impl Into<String>, colors: ThemeColors) -> Self {
        Self {
            name: name.into(),
            colors,
        }
    }

    /// Parse a theme from CSS-variable color strings
    pub fn parse(
        name: impl Into<String>,
        primary: &str,
        accent: &str,
        background: &str,
        foreground: &str,
    ) -> Result<Self, ParseError> {
        Ok(Self::new(
            name,
            ThemeColors {
                primary: primary.parse()?,
                accent: accent.parse()?,
                background: background.parse()?,
                foreground: foreground.parse()?,
            },
        ))
    }

    pub fn blue() -> Self {
        Self::new(
            "Blue",
            ThemeColors {
                primary: Hsl::new(200.0, 100.0, 60.0),
                accent: Hsl::new(200.0, 100.0, 60.0),
                background: Hsl::new(222.0, 84.0, 4.9),
                foreground: Hsl::new(210.0, 40.0, 98.0),
            },
        )
    }

    pub fn black() -> Self {
        Self::new(
            "Black",
            ThemeColors {
                primary: Hsl::new(0.0, 0.0, 20.0),
                accent: Hsl::new(0.0, 0.0, 40.0),
                background: Hsl::new(0.0, 0.0, 0.0),
                foreground: Hsl::new(0.0, 0.0, 100.0),
            },
        )
    }

    /// Custom property assignments for this theme, e.g. `("--primary", "200 100% 60%")`
    pub fn css_variables(&self) -> Vec<(&'static str, String)> {
        vec![
            ("--primary", self.colors.primary.to_string()),
            ("--accent", self.colors.accent.to_string()),
            ("--background", self.colors.background.to_string()),
            ("--foreground", self.colors.foreground.to_string()),
        ]
    }

    /// Colors part way between two themes, for cross-fading
    pub fn blend(from: &Theme, to: &Theme, t: f32) -> ThemeColors {
        ThemeColors::lerp(&from.colors, &to.colors, t)
    }
}

/// Shares the selected theme with subscribers
#[derive(Clone)]
pub struct ThemeProvider {
    themes: Arc<[Theme]>,
    selected: Signal<usize>,
}

impl ThemeProvider {
    /// A provider over `themes`, starting with the first
    pub fn new(themes: Vec<Theme>) -> Self {
        let themes: Arc<[Theme]> = if themes.is_empty() {
            vec![Theme::blue()].into()
        } else {
            themes.into()
        };
        Self {
            themes,
            selected: create_signal(0),
        }
    }

    pub fn with_presets() -> Self {
        Self::new(vec![Theme::blue(), Theme::black()])
    }

    /// Place this provider in the root context
    pub fn provide(self) -> Self {
        provide_context(self.clone());
        self
    }

    /// The provider placed in the root context, if any
    pub fn from_context() -> Option<Self> {
        use_context::<Self>()
    }

    pub fn themes(&self) -> &[Theme] {
        &self.themes
    }

    pub fn selected_index(&self) -> usize {
        self.selected.get()
    }

    /// The active theme; reading it inside an effect subscribes to changes
    pub fn current(&self) -> Theme {
        let index = self.selected.get();
        self.themes
            .get(index)
            .or_else(|| self.themes.first())
            .cloned()
            .unwrap_or_else(Theme::blue)
    }

    /// Switch themes. Returns `false` when `index` is out of range.
    pub fn select(&self, index: usize) -> bool {
        if index >= self.themes.len() {
            log::debug!("Ignoring unknown theme index {}", index);
            return false;
        }
        if self.selected.get_untracked() != index {
            log::info!("Theme changed to {}", self.themes[index].name);
        }
        self.selected.set(index);
        true
    }

    pub fn select_by_name(&self, name: &str) -> bool {
        match self.themes.iter().position(|t| t.name.eq_ignore_ascii_case(name)) {
            Some(index) => self.select(index),
            None => false,
        }
    }

    /// Run `f` with the active theme now and after every change
    pub fn subscribe(&self, mut f: impl FnMut(&Theme) + 'static) -> Effect {
        let provider = self.clone();
        create_effect(move || {
            let theme = provider.current();
            f(&theme);
        })
    }
}
