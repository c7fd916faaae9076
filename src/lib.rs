//! Scroll-driven reveal animations.
//!
//! A [`Controller`] watches how the page scrolls past bound elements and
//! animates them into view: headings fade up, groups cascade in with a
//! stagger, text flips in character by character, progress bars fill, and
//! scroll-linked units follow the scrollbar. Scrolling back up reverses
//! replayable units to their start state.
//!
//! The crate is headless. The host reports scroll position, viewport size,
//! element geometry and frame time; animated values are written into the
//! controller's [`Elements`](element::Elements) store for the host to paint.
//!
//! ```ignore
//! let mut controller = Controller::new();
//! let heading = controller.create_element();
//! controller.set_bounds(heading, Rect::new(0.0, 1200.0, 800.0, 60.0));
//!
//! let fade = controller.config().descriptor(
//!     PropertyValues::new().opacity(0.0).y(20.0),
//!     PropertyValues::new().opacity(1.0).y(0.0),
//! );
//! controller.reveal(heading, fade, RevealOptions::title());
//!
//! controller.scroll_to(700.0);
//! controller.tick(1.0 / 60.0);
//! ```

extern crate self as reveal;

pub mod animation;
pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod hover;
pub mod reactive;
pub mod scroll;
pub mod text;
pub mod theme;

use std::cell::{Ref, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use animation::{AnimationDescriptor, Property};
use config::{ControllerConfig, RevealOptions};
use element::{ElementId, Elements, Rect};
use engine::{Direction, PlaybackEngine, PlaybackState, Role, Track, TweenId, UnitId};
use hover::HoverEffect;
use reactive::{
    create_effect, create_signal, dispose_owner, on_cleanup, with_owner, Effect, OwnerId,
    ReadSignal, Signal,
};
use scroll::{create_viewport, TriggerEvent, TriggerKind, TriggerObserver, TriggerRule, Viewport};
use text::TextSegmenter;

pub mod prelude {
    pub use crate::animation::{
        Animatable, AnimationDescriptor, Ease, Property, PropertySet, PropertyValues,
        TimingFunction, Transform, Transition,
    };
    pub use crate::config::{ControllerConfig, ReplayPolicy, RevealOptions};
    pub use crate::element::{ElementId, Elements, Rect};
    pub use crate::engine::{Direction, PlaybackState, Role, Track, UnitId};
    pub use crate::error::ParseError;
    pub use crate::hover::HoverEffect;
    pub use crate::reactive::{batch, create_effect, create_signal, Effect, ReadSignal, Signal};
    pub use crate::scroll::{ScrollAnchor, ToggleActions, Viewport};
    pub use crate::theme::{Hsl, Theme, ThemeProvider};
    pub use crate::Controller;
}

/// A live trigger: the rule a unit was bound with and the effect observing it
struct Binding {
    rule: TriggerRule,
    observer: Effect,
}

type Bindings = Rc<RefCell<HashMap<UnitId, Binding>>>;

/// Forget a unit's binding and stop its observer
fn detach(bindings: &Bindings, unit: UnitId) {
    let binding = bindings.borrow_mut().remove(&unit);
    if let Some(binding) = binding {
        binding.observer.dispose();
    }
}

/// Binds elements to scroll triggers and drives their animations
pub struct Controller {
    config: ControllerConfig,
    elements: Rc<RefCell<Elements>>,
    engine: Rc<RefCell<PlaybackEngine>>,
    viewport: Signal<Viewport>,
    /// Bumped whenever element geometry changes so observers re-measure
    layout_version: Signal<u64>,
    events: Rc<RefCell<VecDeque<TriggerEvent>>>,
    bindings: Bindings,
    segmenter: TextSegmenter,
    /// Character reveal per text element, with the text it was built from
    text_units: HashMap<ElementId, (String, UnitId)>,
}

impl Controller {
    pub fn new() -> Self {
        Self::with_config(ControllerConfig::default())
    }

    pub fn with_config(config: ControllerConfig) -> Self {
        let viewport = create_viewport(config.viewport);
        Self {
            config,
            elements: Rc::new(RefCell::new(Elements::new())),
            engine: Rc::new(RefCell::new(PlaybackEngine::new())),
            viewport,
            layout_version: create_signal(0),
            events: Rc::new(RefCell::new(VecDeque::new())),
            bindings: Rc::new(RefCell::new(HashMap::new())),
            segmenter: TextSegmenter::new(),
            text_units: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn elements(&self) -> Ref<'_, Elements> {
        self.elements.borrow()
    }

    pub fn engine(&self) -> Ref<'_, PlaybackEngine> {
        self.engine.borrow()
    }

    /// Read-only handle to the shared scroll source
    pub fn viewport(&self) -> ReadSignal<Viewport> {
        self.viewport.read_only()
    }

    pub fn create_element(&mut self) -> ElementId {
        self.elements.borrow_mut().create()
    }

    /// Current value of an element's property
    pub fn value(&self, element: ElementId, property: Property) -> f32 {
        self.elements.borrow().value(element, property)
    }

    pub fn state(&self, unit: UnitId) -> Option<PlaybackState> {
        self.engine.borrow().state(unit)
    }

    // Host input

    pub fn scroll_to(&mut self, scroll_y: f32) {
        self.viewport.update(|v| v.scroll_y = scroll_y);
        self.dispatch();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.update(|v| *v = v.resized(width, height));
        self.dispatch();
    }

    pub fn set_bounds(&mut self, element: ElementId, bounds: Rect) {
        self.relayout(|elements| elements.set_bounds(element, bounds));
    }

    /// Apply several geometry changes, then re-measure every trigger once
    pub fn relayout(&mut self, f: impl FnOnce(&mut Elements)) {
        {
            let mut elements = self.elements.borrow_mut();
            f(&mut *elements);
        }
        self.layout_version.update(|v| *v += 1);
        self.dispatch();
    }

    /// Remove an element from the page
    ///
    /// Its tweens stop, and units left without any mounted target are
    /// dropped the next time they would play.
    pub fn unmount(&mut self, element: ElementId) {
        self.elements.borrow_mut().unmount(element);
        self.engine.borrow_mut().cancel_element(element);
        self.layout_version.update(|v| *v += 1);
        self.dispatch();
    }

    /// Advance running animations by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let mut elements = self.elements.borrow_mut();
        self.engine.borrow_mut().tick(&mut elements, dt);
    }

    pub fn has_active_animations(&self) -> bool {
        self.engine.borrow().has_active_animations()
    }

    // Scopes

    /// Run `f` in a new scope; bindings made inside belong to it
    pub fn scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> (T, OwnerId) {
        let (result, owner) = with_owner(|| f(self));
        log::info!("Mounted scope {}", owner);
        (result, owner)
    }

    /// Detach every observer and cancel every unit bound inside a scope
    pub fn unmount_scope(&mut self, scope: OwnerId) {
        log::info!("Unmounting scope {}", scope);
        dispose_owner(scope);
    }

    // Bindings

    /// Bind a unit built from `tracks` to the scroll position of `trigger`
    ///
    /// The start state is rendered immediately. If the trigger is already
    /// inside its zone, the unit starts playing right away.
    pub fn bind(
        &mut self,
        role: Role,
        trigger: ElementId,
        tracks: Vec<Track>,
        options: &RevealOptions,
    ) -> UnitId {
        let unit = {
            let mut elements = self.elements.borrow_mut();
            self.engine.borrow_mut().register(&mut elements, role, tracks)
        };
        let rule = options.trigger_rule(&self.config);
        log::info!(
            "Bound {:?} unit {:?} to {:?} ({}, start \"{}\")",
            role,
            unit,
            trigger,
            rule.policy,
            rule.start
        );

        let observer = self.observe(unit, trigger, rule);
        self.bindings.borrow_mut().insert(
            unit,
            Binding {
                rule,
                observer,
            },
        );

        let bindings = self.bindings.clone();
        let engine = self.engine.clone();
        on_cleanup(move || {
            detach(&bindings, unit);
            engine.borrow_mut().remove_unit(unit);
        });

        self.dispatch();
        unit
    }

    /// Reveal a single element when it scrolls into view
    pub fn reveal(
        &mut self,
        element: ElementId,
        descriptor: AnimationDescriptor,
        options: RevealOptions,
    ) -> UnitId {
        let track = Track::single(element, options.apply(descriptor));
        self.bind(Role::Title, element, vec![track], &options)
    }

    /// Reveal `targets` in order when `trigger` scrolls into view
    pub fn reveal_group(
        &mut self,
        trigger: ElementId,
        targets: Vec<ElementId>,
        descriptor: AnimationDescriptor,
        options: RevealOptions,
    ) -> UnitId {
        let track = Track::new(targets, options.apply(descriptor));
        self.bind(Role::GroupItem, trigger, vec![track], &options)
    }

    /// Fill a progress bar to `length` along `property` (width or height)
    pub fn fill(
        &mut self,
        trigger: ElementId,
        bar: ElementId,
        property: Property,
        length: f32,
        options: RevealOptions,
    ) -> UnitId {
        let descriptor = self.config.descriptor(
            [(property, 0.0)].into_iter().collect(),
            [(property, length)].into_iter().collect(),
        );
        let track = Track::single(bar, options.apply(descriptor));
        self.bind(Role::ProgressFill, trigger, vec![track], &options)
    }

    /// Several tracks played on one timeline
    pub fn timeline(
        &mut self,
        trigger: ElementId,
        tracks: Vec<Track>,
        options: RevealOptions,
    ) -> UnitId {
        self.bind(Role::TimelineNode, trigger, tracks, &options)
    }

    /// Split `element`'s text into characters and reveal them in sequence
    ///
    /// Character elements are created on the first call only; calling again
    /// with the same text returns the existing unit.
    pub fn reveal_text(
        &mut self,
        element: ElementId,
        text: &str,
        options: RevealOptions,
    ) -> UnitId {
        if let Some((existing_text, unit)) = self.text_units.get(&element) {
            if existing_text == text && self.engine.borrow().contains(*unit) {
                return *unit;
            }
        }
        if let Some((_, previous)) = self.text_units.remove(&element) {
            self.remove_unit(previous);
            self.elements.borrow_mut().remove_children(element);
        }

        let units = self.segmenter.segment(text);
        let children: Vec<ElementId> = {
            let mut elements = self.elements.borrow_mut();
            units
                .iter()
                .map(|unit| elements.create_text_child(element, unit.display().to_string()))
                .collect()
        };
        log::debug!("Split {:?} into {} characters", element, children.len());

        let track = Track::new(children, options.apply(text::char_reveal()));
        let unit = self.bind(Role::Character, element, vec![track], &options);
        self.text_units.insert(element, (text.to_string(), unit));
        unit
    }

    /// Play `tracks` right away, without waiting for a scroll trigger
    ///
    /// Inside a scope the unit is cancelled when the scope unmounts.
    pub fn play_on_mount(&mut self, tracks: Vec<Track>) -> UnitId {
        let unit = {
            let mut elements = self.elements.borrow_mut();
            let mut engine = self.engine.borrow_mut();
            let unit = engine.register(&mut elements, Role::Intro, tracks);
            engine.play(&mut elements, unit, Direction::Forward);
            unit
        };
        log::info!("Playing intro unit {:?}", unit);

        let engine = self.engine.clone();
        on_cleanup(move || engine.borrow_mut().remove_unit(unit));
        unit
    }

    /// Drop a unit and stop observing its trigger
    pub fn remove_unit(&mut self, unit: UnitId) {
        detach(&self.bindings, unit);
        self.engine.borrow_mut().remove_unit(unit);
    }

    // Micro-interactions

    pub fn hover_enter(&mut self, element: ElementId, effect: &HoverEffect) -> TweenId {
        let elements = self.elements.borrow();
        effect.enter(&mut self.engine.borrow_mut(), &elements, element)
    }

    pub fn hover_leave(&mut self, element: ElementId, effect: &HoverEffect) -> TweenId {
        let elements = self.elements.borrow();
        effect.leave(&mut self.engine.borrow_mut(), &elements, element)
    }

    pub fn pulse(&mut self, element: ElementId) -> TweenId {
        let elements = self.elements.borrow();
        hover::pulse(&mut self.engine.borrow_mut(), &elements, element)
    }

    /// Float a background particle up and down forever
    pub fn drift(&mut self, element: ElementId, rise: f32, period: f32, delay: f32) -> TweenId {
        let elements = self.elements.borrow();
        hover::drift(&mut self.engine.borrow_mut(), &elements, element, rise, period, delay)
    }

    /// Stop every tween on an element, leaving its current values
    pub fn cancel_tweens(&mut self, element: ElementId) {
        self.engine.borrow_mut().cancel_element(element);
    }

    fn observe(&self, unit: UnitId, trigger: ElementId, rule: TriggerRule) -> Effect {
        let viewport = self.viewport();
        let layout_version = self.layout_version.clone();
        let elements = self.elements.clone();
        let events = self.events.clone();
        let mut observer = TriggerObserver::new(unit, rule);

        create_effect(move || {
            let current = viewport.get();
            layout_version.get();
            let bounds = elements.borrow().bounds(trigger);
            let fired = observer.evaluate(&current, bounds);
            if !fired.is_empty() {
                events.borrow_mut().extend(fired);
            }
        })
    }

    /// Hand queued trigger events to the engine, in the order they fired
    fn dispatch(&mut self) {
        loop {
            let Some(event) = self.events.borrow_mut().pop_front() else {
                break;
            };
            let Some(rule) = self.bindings.borrow().get(&event.unit).map(|b| b.rule) else {
                continue;
            };
            let mut elements = self.elements.borrow_mut();
            let mut engine = self.engine.borrow_mut();
            match event.kind {
                TriggerKind::Toggle { crossing, scroll } => {
                    let action = rule.actions.action_for(crossing, scroll);
                    log::debug!(
                        "Unit {:?}: {:?}/{:?} -> {}",
                        event.unit,
                        crossing,
                        scroll,
                        action
                    );
                    engine.apply_action(&mut elements, event.unit, action);
                }
                TriggerKind::Progress(progress) => {
                    engine.scrub(&mut elements, event.unit, progress);
                }
            }
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::PropertyValues;
    use crate::reactive::runtime::with_runtime;

    fn observer_id(controller: &Controller, unit: UnitId) -> Option<usize> {
        controller
            .bindings
            .borrow()
            .get(&unit)
            .map(|b| b.observer.id())
    }

    #[test]
    fn test_replaced_text_unit_stops_observing_inside_scope() {
        let mut controller = Controller::new();
        let heading = controller.create_element();
        controller.set_bounds(heading, Rect::new(0.0, 1000.0, 800.0, 60.0));

        let ((first, first_observer, second), scope) = controller.scope(|c| {
            let first = c.reveal_text(heading, "Hello", RevealOptions::title());
            let observer = observer_id(c, first);
            let second = c.reveal_text(heading, "World", RevealOptions::title());
            (first, observer, second)
        });
        let Some(first_observer) = first_observer else {
            panic!("first text unit had no observer");
        };

        assert_ne!(first, second);
        assert!(!with_runtime(|rt| rt.is_effect_alive(first_observer)));
        assert!(observer_id(&controller, first).is_none());
        assert!(observer_id(&controller, second).is_some());

        controller.scroll_to(600.0);
        assert_eq!(controller.state(second), Some(PlaybackState::PlayingForward));
        assert_eq!(controller.state(first), None);

        controller.unmount_scope(scope);
        assert!(observer_id(&controller, second).is_none());
    }

    #[test]
    fn test_viewport_handle_follows_host_input() {
        let mut controller = Controller::new();
        let viewport = controller.viewport();

        controller.scroll_to(320.0);
        controller.resize(1024.0, 600.0);
        let current = viewport.get_untracked();
        assert_eq!(current.scroll_y, 320.0);
        assert_eq!(current.height, 600.0);
    }

    #[test]
    fn test_removed_unit_stops_observing_inside_scope() {
        let mut controller = Controller::new();
        let title = controller.create_element();
        controller.set_bounds(title, Rect::new(0.0, 1000.0, 800.0, 60.0));
        let fade = controller.config().descriptor(
            PropertyValues::new().opacity(0.0),
            PropertyValues::new().opacity(1.0),
        );

        let (unit, scope) = controller.scope(|c| c.reveal(title, fade, RevealOptions::title()));
        let Some(observer) = observer_id(&controller, unit) else {
            panic!("unit had no observer");
        };
        controller.remove_unit(unit);

        assert!(!with_runtime(|rt| rt.is_effect_alive(observer)));
        assert!(!controller.engine().contains(unit));
        controller.unmount_scope(scope);
    }
}
