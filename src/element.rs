//! Element store shared between the host layout and the animation engine.
//!
//! The host owns the real document; this store mirrors the small part of it
//! the controller needs: where each element sits on the page, whether it is
//! still mounted, and the visual values the animations write.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::{Property, PropertyValues, Transform};

/// Unique identifier for an animatable element
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ElementId(u64);

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

impl ElementId {
    /// Generate a new unique element ID
    pub fn next() -> Self {
        ElementId(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Axis-aligned rectangle in document coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

#[derive(Debug, Default)]
struct ElementState {
    /// Layout box; `None` until the host has laid the element out
    bounds: Option<Rect>,
    values: PropertyValues,
    mounted: bool,
    /// Character elements created when this element's text was segmented
    children: Vec<ElementId>,
    /// Text content, for character elements
    text: Option<String>,
}

/// All elements known to a controller
#[derive(Debug, Default)]
pub struct Elements {
    elements: HashMap<ElementId, ElementState>,
}

impl Elements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new mounted element
    pub fn create(&mut self) -> ElementId {
        let id = ElementId::next();
        self.elements.insert(
            id,
            ElementState {
                mounted: true,
                ..ElementState::default()
            },
        );
        id
    }

    /// Create a text child of `parent` (used by text segmentation)
    pub fn create_text_child(&mut self, parent: ElementId, text: String) -> ElementId {
        let id = self.create();
        if let Some(state) = self.elements.get_mut(&id) {
            state.text = Some(text);
        }
        if let Some(parent_state) = self.elements.get_mut(&parent) {
            parent_state.children.push(id);
        }
        id
    }

    /// Mark an element and its text children as unmounted
    ///
    /// Values stay readable so a host can still paint the last frame.
    pub fn unmount(&mut self, id: ElementId) {
        let children = match self.elements.get_mut(&id) {
            Some(state) => {
                state.mounted = false;
                std::mem::take(&mut state.children)
            }
            None => return,
        };
        for child in children {
            self.unmount(child);
        }
    }

    /// Drop an element entirely
    pub fn remove(&mut self, id: ElementId) {
        if let Some(state) = self.elements.remove(&id) {
            for child in state.children {
                self.remove(child);
            }
        }
    }

    /// Drop every text child of `parent`
    pub fn remove_children(&mut self, parent: ElementId) {
        let children = match self.elements.get_mut(&parent) {
            Some(state) => std::mem::take(&mut state.children),
            None => return,
        };
        for child in children {
            self.remove(child);
        }
    }

    pub fn is_mounted(&self, id: ElementId) -> bool {
        self.elements.get(&id).is_some_and(|s| s.mounted)
    }

    pub fn set_bounds(&mut self, id: ElementId, bounds: Rect) {
        if let Some(state) = self.elements.get_mut(&id) {
            state.bounds = Some(bounds);
        }
    }

    /// Layout box of a mounted, laid-out element
    pub fn bounds(&self, id: ElementId) -> Option<Rect> {
        self.elements
            .get(&id)
            .filter(|s| s.mounted)
            .and_then(|s| s.bounds)
    }

    /// Current animated values (empty for unknown elements)
    pub fn values(&self, id: ElementId) -> PropertyValues {
        self.elements
            .get(&id)
            .map(|s| s.values.clone())
            .unwrap_or_default()
    }

    /// Current value of one property, falling back to its initial value
    pub fn value(&self, id: ElementId, property: Property) -> f32 {
        self.elements
            .get(&id)
            .map(|s| s.values.get_or_initial(property))
            .unwrap_or_else(|| property.initial_value())
    }

    /// Write animated values; unmounted or unknown elements are ignored
    pub fn write(&mut self, id: ElementId, values: &PropertyValues) -> bool {
        match self.elements.get_mut(&id) {
            Some(state) if state.mounted => {
                state.values.merge(values);
                true
            }
            _ => false,
        }
    }

    /// Paint transform for an element's current values
    pub fn transform(&self, id: ElementId) -> Transform {
        self.elements
            .get(&id)
            .map(|s| Transform::from_values(&s.values))
            .unwrap_or_default()
    }

    pub fn children(&self, id: ElementId) -> &[ElementId] {
        self.elements
            .get(&id)
            .map(|s| s.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn text(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).and_then(|s| s.text.as_deref())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
