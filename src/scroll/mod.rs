//! Scroll observation.
//!
//! The [`Viewport`] is the single scroll source for a controller, held in a
//! signal. Each bound unit gets a [`TriggerObserver`] that runs inside an
//! effect reading that signal, so scrolling, resizing and relayout all
//! re-evaluate every observer without any observer owning the scroll
//! position.

mod anchor;
mod trigger;
mod viewport;

pub use anchor::{Offset, ScrollAnchor};
pub use trigger::{
    scrub_progress, Action, Crossing, ScrollDirection, ToggleActions, TriggerEvent, TriggerKind,
    TriggerObserver, TriggerRule, Zone,
};
pub use viewport::{create_viewport, Viewport};
