use crate::reactive::{create_signal, Signal};

/// The visible window onto the document
///
/// `scroll_y` is the document offset of the viewport's top edge.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn scrolled_to(mut self, scroll_y: f32) -> Self {
        self.scroll_y = scroll_y;
        self
    }

    pub fn resized(mut self, width: f32, height: f32) -> Self {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self
    }

    /// Document offset of the viewport's bottom edge
    pub fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 800.0)
    }
}

/// Shared scroll source read by every trigger observer
pub fn create_viewport(initial: Viewport) -> Signal<Viewport> {
    create_signal(initial)
}
