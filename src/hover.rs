//! Pointer hover and ambient micro-interactions.
//!
//! Hover effects are stateless: each pointer enter or leave starts a fresh
//! tween from whatever the element shows right now, replacing any hover
//! tween still running on it. Ambient loops such as [`drift`] run until
//! replaced, cancelled, or their element unmounts.

use crate::animation::{Ease, Property, PropertyValues, TimingFunction, Transition};
use crate::element::{ElementId, Elements};
use crate::engine::{PlaybackEngine, TweenId};

const DRIFT_PEAK_OPACITY: f32 = 0.5;

#[derive(Clone, Debug)]
pub struct HoverEffect {
    scale: f32,
    /// Vertical offset while hovered (negative lifts)
    lift: f32,
    transition: Transition,
}

impl HoverEffect {
    pub fn new(scale: f32) -> Self {
        Self {
            scale,
            lift: 0.0,
            transition: Transition::new(0.3, TimingFunction::Power(2, Ease::Out)),
        }
    }

    /// Cards and skill chips
    pub fn card() -> Self {
        Self::new(1.05)
    }

    /// Navigation links react a little faster
    pub fn nav() -> Self {
        Self::new(1.05).duration(0.2)
    }

    /// Timeline entries grow and lift slightly
    pub fn lift_card() -> Self {
        Self::new(1.05).lift(-5.0)
    }

    pub fn lift(mut self, y: f32) -> Self {
        self.lift = y;
        self
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.transition.duration = duration.max(0.0);
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.transition.timing = timing;
        self
    }

    pub fn scale_factor(&self) -> f32 {
        self.scale
    }

    pub fn enter(
        &self,
        engine: &mut PlaybackEngine,
        elements: &Elements,
        element: ElementId,
    ) -> TweenId {
        let mut target = PropertyValues::new().scale(self.scale);
        if self.lift != 0.0 {
            target = target.y(self.lift);
        }
        engine.animate_to(elements, element, target, self.transition.clone())
    }

    pub fn leave(
        &self,
        engine: &mut PlaybackEngine,
        elements: &Elements,
        element: ElementId,
    ) -> TweenId {
        let mut target = PropertyValues::new().scale(1.0);
        if self.lift != 0.0 {
            target = target.y(0.0);
        }
        engine.animate_to(elements, element, target, self.transition.clone())
    }
}

impl Default for HoverEffect {
    fn default() -> Self {
        Self::card()
    }
}

/// Briefly grow an element and settle back, e.g. to acknowledge a theme switch
pub fn pulse(engine: &mut PlaybackEngine, elements: &Elements, element: ElementId) -> TweenId {
    let transition = Transition::new(0.3, TimingFunction::Power(2, Ease::Out))
        .repeat(1)
        .yoyo(true);
    engine.animate_to(elements, element, PropertyValues::new().scale(1.2), transition)
}

/// Float a background particle up by `rise` and back every `period`
/// seconds, brightening towards the top, forever
pub fn drift(
    engine: &mut PlaybackEngine,
    elements: &Elements,
    element: ElementId,
    rise: f32,
    period: f32,
    delay: f32,
) -> TweenId {
    let transition = Transition::new(period.max(0.0) / 2.0, TimingFunction::EaseInOut)
        .delay(delay.max(0.0))
        .yoyo(true)
        .repeat_forever();
    let base_y = elements.value(element, Property::Y);
    let target = PropertyValues::new()
        .y(base_y - rise)
        .opacity(DRIFT_PEAK_OPACITY);
    engine.animate_to(elements, element, target, transition)
}
