//! Playback engine: drives descriptors over time or scroll position.
//!
//! Every animatable unit owns a single playhead measured in seconds. Playing
//! forward moves the playhead towards the unit's total duration, reversing
//! moves it back to zero, and scrubbing sets it directly. Because each
//! target's values are a pure function of the playhead, reversing restores
//! the start state exactly and repeated scroll cycles always look the same.
//!
//! Property ownership is tracked per `(element, property)`: whichever unit or
//! tween started running most recently owns the pair, and only the owner
//! writes it. A new request therefore always wins and never queues behind an
//! older one.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::animation::{
    AnimationDescriptor, Property, PropertySet, PropertyValues, Transition, Tween,
};
use crate::element::{ElementId, Elements};
use crate::scroll::Action;

/// Unique identifier for an animatable unit
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct UnitId(u64);

static NEXT_UNIT_ID: AtomicU64 = AtomicU64::new(1);

impl UnitId {
    pub fn next() -> Self {
        UnitId(NEXT_UNIT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Handle to a free-standing tween started with [`PlaybackEngine::animate_to`]
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct TweenId(u64);

/// What a unit represents on the page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Title,
    GroupItem,
    ProgressFill,
    TimelineNode,
    Character,
    /// Plays once on page load, without a scroll trigger
    Intro,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackState {
    /// Showing the start state, ready to play
    Pending,
    PlayingForward,
    /// Forward playback finished; showing the end state
    Settled,
    PlayingReverse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Reverse,
}

/// One descriptor applied to an ordered group of targets, starting `offset`
/// seconds into the unit's timeline
#[derive(Clone, Debug)]
pub struct Track {
    targets: Vec<ElementId>,
    descriptor: AnimationDescriptor,
    offset: f32,
}

impl Track {
    pub fn new(targets: Vec<ElementId>, descriptor: AnimationDescriptor) -> Self {
        Self {
            targets,
            descriptor,
            offset: 0.0,
        }
    }

    pub fn single(target: ElementId, descriptor: AnimationDescriptor) -> Self {
        Self::new(vec![target], descriptor)
    }

    /// Start this track `offset` seconds after the unit starts
    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = offset.max(0.0);
        self
    }

    pub fn targets(&self) -> &[ElementId] {
        &self.targets
    }

    pub fn descriptor(&self) -> &AnimationDescriptor {
        &self.descriptor
    }

    fn end_time(&self) -> f32 {
        self.offset + self.descriptor.total_duration(self.targets.len())
    }
}

#[derive(Debug)]
struct ResolvedTrack {
    track: Track,
    starts: Vec<PropertyValues>,
    ends: Vec<PropertyValues>,
}

#[derive(Debug)]
struct Unit {
    role: Role,
    tracks: Vec<ResolvedTrack>,
    state: PlaybackState,
    playhead: f32,
    duration: f32,
    properties: PropertySet,
    /// Pairs taken over by a tween during the current playback
    preempted: HashSet<(ElementId, Property)>,
}

impl Unit {
    fn targets(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.tracks
            .iter()
            .flat_map(|t| t.track.targets.iter().copied())
    }

    fn target_pairs(&self) -> Vec<(ElementId, Property)> {
        self.tracks
            .iter()
            .flat_map(|t| {
                let properties = t.track.descriptor.properties();
                t.track
                    .targets
                    .iter()
                    .flat_map(move |target| properties.properties().map(move |p| (*target, p)))
            })
            .collect()
    }
}

/// Who currently owns an `(element, property)` pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Driver {
    Unit(UnitId),
    Tween(TweenId),
}

#[derive(Debug)]
struct FreeTween {
    element: ElementId,
    tween: Tween<PropertyValues>,
}

/// How a unit's values are sampled from its playhead
#[derive(Clone, Copy, PartialEq)]
enum Sampling {
    Eased,
    /// Scroll-linked: progress maps straight onto the values
    Linear,
}

#[derive(Debug, Default)]
pub struct PlaybackEngine {
    units: BTreeMap<UnitId, Unit>,
    /// Units that need per-frame updates
    active: BTreeSet<UnitId>,
    tweens: BTreeMap<TweenId, FreeTween>,
    next_tween: u64,
    claims: HashMap<(ElementId, Property), Driver>,
}

impl PlaybackEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a unit and render its start state immediately.
    ///
    /// Start values that the descriptors leave implicit are read from the
    /// elements' current values now, so they are fixed for the unit's life.
    pub fn register(&mut self, elements: &mut Elements, role: Role, tracks: Vec<Track>) -> UnitId {
        let id = UnitId::next();
        let mut properties = PropertySet::empty();
        let resolved: Vec<ResolvedTrack> = tracks
            .into_iter()
            .map(|track| {
                properties |= track.descriptor.properties();
                let (starts, ends) = track
                    .targets
                    .iter()
                    .enumerate()
                    .map(|(index, target)| {
                        let current = elements.values(*target);
                        (
                            track.descriptor.resolve_start(index, &current),
                            track.descriptor.resolve_end(index, &current),
                        )
                    })
                    .unzip();
                ResolvedTrack {
                    track,
                    starts,
                    ends,
                }
            })
            .collect();

        let duration = resolved
            .iter()
            .map(|t| t.track.end_time())
            .fold(0.0f32, f32::max);

        let unit = Unit {
            role,
            tracks: resolved,
            state: PlaybackState::Pending,
            playhead: 0.0,
            duration,
            properties,
            preempted: HashSet::new(),
        };
        log::debug!(
            "Registered {:?} unit {:?}: {} targets, {:.3}s",
            role,
            id,
            unit.targets().count(),
            duration
        );
        self.units.insert(id, unit);
        self.apply(elements, id, Sampling::Eased);
        id
    }

    /// Start playing a unit forward or in reverse from wherever it is now.
    ///
    /// Any in-flight playback of the unit is replaced; nothing is queued.
    pub fn play(&mut self, elements: &mut Elements, id: UnitId, direction: Direction) {
        if !self.prune_if_unmounted(elements, id) {
            return;
        }
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };

        let next = match (direction, unit.state) {
            (Direction::Forward, PlaybackState::Settled) => return,
            (Direction::Reverse, PlaybackState::Pending) => return,
            (Direction::Forward, _) => PlaybackState::PlayingForward,
            (Direction::Reverse, _) => PlaybackState::PlayingReverse,
        };
        log::debug!("Unit {:?}: {:?} -> {:?}", id, unit.state, next);
        unit.state = next;
        self.claim_unit(id);
        self.active.insert(id);
        // Zero-length units finish without waiting for a frame
        self.advance_unit(elements, id, 0.0);
    }

    /// Jump to the start and play forward
    pub fn restart(&mut self, elements: &mut Elements, id: UnitId) {
        self.reset(elements, id);
        self.play(elements, id, Direction::Forward);
    }

    /// Stop and show the start state
    pub fn reset(&mut self, elements: &mut Elements, id: UnitId) {
        self.jump(elements, id, 0.0, PlaybackState::Pending);
    }

    /// Stop and show the end state
    pub fn complete(&mut self, elements: &mut Elements, id: UnitId) {
        let duration = self.units.get(&id).map_or(0.0, |u| u.duration);
        self.jump(elements, id, duration, PlaybackState::Settled);
    }

    /// Stop where the unit is
    pub fn pause(&mut self, id: UnitId) {
        self.active.remove(&id);
        self.release(Driver::Unit(id));
    }

    /// Perform a toggle action
    pub fn apply_action(&mut self, elements: &mut Elements, id: UnitId, action: Action) {
        match action {
            Action::Play => self.play(elements, id, Direction::Forward),
            Action::Reverse => self.play(elements, id, Direction::Reverse),
            Action::Restart => self.restart(elements, id),
            Action::Reset => self.reset(elements, id),
            Action::Complete => self.complete(elements, id),
            Action::Pause => self.pause(id),
            Action::None => {}
        }
    }

    /// Set a scroll-linked unit's progress directly.
    ///
    /// `progress` is clamped to `[0, 1]` and mapped linearly onto the values:
    /// no easing, no time-based playback, so the unit tracks scrolling
    /// exactly.
    pub fn scrub(&mut self, elements: &mut Elements, id: UnitId, progress: f32) {
        if !self.prune_if_unmounted(elements, id) {
            return;
        }
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        let progress = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        let playhead = progress * unit.duration;
        unit.state = if progress <= 0.0 {
            PlaybackState::Pending
        } else if progress >= 1.0 {
            PlaybackState::Settled
        } else if playhead >= unit.playhead {
            PlaybackState::PlayingForward
        } else {
            PlaybackState::PlayingReverse
        };
        unit.playhead = playhead;
        self.active.remove(&id);
        self.claim_unit(id);
        self.apply(elements, id, Sampling::Linear);
    }

    /// Tween an element from its current values to `target`.
    ///
    /// The tween takes ownership of the properties it animates; whatever
    /// was driving them before stops writing them.
    pub fn animate_to(
        &mut self,
        elements: &Elements,
        element: ElementId,
        target: PropertyValues,
        transition: Transition,
    ) -> TweenId {
        let id = TweenId(self.next_tween);
        self.next_tween += 1;

        let mut tween = Tween::new(elements.values(element), transition);
        for property in target.keys().properties() {
            let previous = self.claims.insert((element, property), Driver::Tween(id));
            if let Some(Driver::Unit(unit)) = previous {
                if let Some(unit) = self.units.get_mut(&unit) {
                    unit.preempted.insert((element, property));
                }
            }
        }
        tween.animate_to(target);
        self.tweens.insert(id, FreeTween { element, tween });
        self.prune_tweens();
        id
    }

    /// Advance every running unit and tween by `dt` seconds
    pub fn tick(&mut self, elements: &mut Elements, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let active: Vec<UnitId> = self.active.iter().copied().collect();
        for id in active {
            if self.prune_if_unmounted(elements, id) {
                self.advance_unit(elements, id, dt);
            }
        }

        let mut finished = Vec::new();
        for (id, free) in self.tweens.iter_mut() {
            if !elements.is_mounted(free.element) {
                finished.push(*id);
                continue;
            }
            if free.tween.advance(dt).is_changed() {
                let owned = owned_values(
                    &self.claims,
                    Driver::Tween(*id),
                    free.element,
                    free.tween.current(),
                );
                elements.write(free.element, &owned);
            }
            if !free.tween.is_animating() {
                finished.push(*id);
            }
        }
        for id in finished {
            self.tweens.remove(&id);
            self.release(Driver::Tween(id));
        }
    }

    /// Remove a unit, leaving its elements showing their current values
    pub fn remove_unit(&mut self, id: UnitId) {
        if self.units.remove(&id).is_some() {
            log::debug!("Removed unit {:?}", id);
        }
        self.active.remove(&id);
        self.release(Driver::Unit(id));
    }

    /// Cancel every tween running on an element
    pub fn cancel_element(&mut self, element: ElementId) {
        let ids: Vec<TweenId> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.element == element)
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.tweens.remove(&id);
            self.release(Driver::Tween(id));
        }
    }

    pub fn state(&self, id: UnitId) -> Option<PlaybackState> {
        self.units.get(&id).map(|u| u.state)
    }

    pub fn role(&self, id: UnitId) -> Option<Role> {
        self.units.get(&id).map(|u| u.role)
    }

    pub fn playhead(&self, id: UnitId) -> Option<f32> {
        self.units.get(&id).map(|u| u.playhead)
    }

    pub fn duration(&self, id: UnitId) -> Option<f32> {
        self.units.get(&id).map(|u| u.duration)
    }

    pub fn properties(&self, id: UnitId) -> PropertySet {
        self.units
            .get(&id)
            .map_or(PropertySet::empty(), |u| u.properties)
    }

    /// When each target of a unit starts animating, relative to playback start
    pub fn start_times(&self, id: UnitId) -> Vec<(ElementId, f32)> {
        let Some(unit) = self.units.get(&id) else {
            return Vec::new();
        };
        unit.tracks
            .iter()
            .flat_map(|t| {
                t.track.targets.iter().enumerate().map(move |(i, target)| {
                    (*target, t.track.offset + t.track.descriptor.start_offset(i))
                })
            })
            .collect()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.units.contains_key(&id)
    }

    /// Whether a unit is registered for per-frame updates
    pub fn is_active(&self, id: UnitId) -> bool {
        self.active.contains(&id)
    }

    /// Whether anything still needs frames
    pub fn has_active_animations(&self) -> bool {
        !self.active.is_empty() || !self.tweens.is_empty()
    }

    pub fn unit_count(&self) -> usize {
        self.units.len()
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.len()
    }

    /// The animation currently allowed to write a property of an element
    pub fn driver(&self, element: ElementId, property: Property) -> Option<Driver> {
        self.claims.get(&(element, property)).copied()
    }

    /// Number of running animations that write `property` of `element`
    pub fn active_drivers(&self, element: ElementId, property: Property) -> usize {
        let key = (element, property);
        let units = self
            .active
            .iter()
            .filter(|id| {
                self.claims.get(&key) == Some(&Driver::Unit(**id))
                    && self.units.get(*id).is_some_and(|u| {
                        u.properties.contains(property.flag()) && u.targets().any(|t| t == element)
                    })
            })
            .count();
        let tweens = self
            .tweens
            .iter()
            .filter(|(id, t)| {
                t.element == element
                    && t.tween.target().get(property).is_some()
                    && self.claims.get(&key) == Some(&Driver::Tween(**id))
            })
            .count();
        units + tweens
    }

    fn jump(&mut self, elements: &mut Elements, id: UnitId, playhead: f32, state: PlaybackState) {
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        unit.playhead = playhead;
        unit.state = state;
        self.active.remove(&id);
        self.claim_unit(id);
        self.apply(elements, id, Sampling::Eased);
        self.release(Driver::Unit(id));
    }

    fn advance_unit(&mut self, elements: &mut Elements, id: UnitId, dt: f32) {
        let Some(unit) = self.units.get_mut(&id) else {
            self.active.remove(&id);
            return;
        };
        let done = match unit.state {
            PlaybackState::PlayingForward => {
                unit.playhead = (unit.playhead + dt).min(unit.duration);
                if unit.playhead >= unit.duration {
                    unit.state = PlaybackState::Settled;
                    true
                } else {
                    false
                }
            }
            PlaybackState::PlayingReverse => {
                unit.playhead = (unit.playhead - dt).max(0.0);
                if unit.playhead <= 0.0 {
                    unit.state = PlaybackState::Pending;
                    true
                } else {
                    false
                }
            }
            PlaybackState::Pending | PlaybackState::Settled => true,
        };
        self.apply(elements, id, Sampling::Eased);
        if done {
            log::debug!("Unit {:?} finished in state {:?}", id, self.state(id));
            self.active.remove(&id);
            self.release(Driver::Unit(id));
        }
    }

    /// Write a unit's values for its current playhead
    fn apply(&self, elements: &mut Elements, id: UnitId, sampling: Sampling) {
        let Some(unit) = self.units.get(&id) else {
            return;
        };
        for resolved in &unit.tracks {
            let descriptor = &resolved.track.descriptor;
            let count = resolved.track.targets.len();
            let elapsed = unit.playhead - resolved.track.offset;
            for (index, target) in resolved.track.targets.iter().enumerate() {
                let progress = match unit.state {
                    PlaybackState::Pending => 0.0,
                    PlaybackState::Settled => descriptor.final_progress(),
                    _ => descriptor.target_progress(index, count, elapsed),
                };
                let t = match sampling {
                    Sampling::Eased => descriptor.timing_function().evaluate(progress),
                    Sampling::Linear => progress,
                };
                let sampled =
                    AnimationDescriptor::sample(&resolved.starts[index], &resolved.ends[index], t);
                let values: PropertyValues = sampled
                    .iter()
                    .filter(|(property, _)| !unit.preempted.contains(&(*target, *property)))
                    .collect();
                let owned = owned_values(&self.claims, Driver::Unit(id), *target, &values);
                elements.write(*target, &owned);
            }
        }
    }

    /// Drop a unit whose targets are all gone. Returns whether it is still usable.
    fn prune_if_unmounted(&mut self, elements: &Elements, id: UnitId) -> bool {
        let Some(unit) = self.units.get(&id) else {
            return false;
        };
        let any_mounted = unit.targets().any(|t| elements.is_mounted(t));
        // An empty group has nothing to prune and nothing to animate
        if !any_mounted && unit.targets().next().is_some() {
            log::debug!("Unit {:?} has no mounted targets, cancelling", id);
            self.remove_unit(id);
            return false;
        }
        true
    }

    fn claim_unit(&mut self, id: UnitId) {
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        unit.preempted.clear();
        for pair in unit.target_pairs() {
            self.claims.insert(pair, Driver::Unit(id));
        }
        self.prune_tweens();
    }

    fn release(&mut self, driver: Driver) {
        self.claims.retain(|_, owner| *owner != driver);
    }

    /// Drop tweens that no longer own any property
    fn prune_tweens(&mut self) {
        let claims = &self.claims;
        self.tweens.retain(|id, free| {
            free.tween
                .target()
                .keys()
                .properties()
                .any(|p| claims.get(&(free.element, p)) == Some(&Driver::Tween(*id)))
        });
    }
}

/// The subset of `values` that `driver` may write on `element`
fn owned_values(
    claims: &HashMap<(ElementId, Property), Driver>,
    driver: Driver,
    element: ElementId,
    values: &PropertyValues,
) -> PropertyValues {
    values
        .iter()
        .filter(|(property, _)| {
            claims
                .get(&(element, *property))
                .map_or(true, |owner| *owner == driver)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::TimingFunction;

    fn fade_up(duration: f32) -> AnimationDescriptor {
        AnimationDescriptor::from_to(
            PropertyValues::new().opacity(0.0).y(20.0),
            PropertyValues::new().opacity(1.0).y(0.0),
        )
        .duration(duration)
        .timing(TimingFunction::Linear)
    }

    fn setup(count: usize) -> (Elements, Vec<ElementId>) {
        let mut elements = Elements::new();
        let ids = (0..count).map(|_| elements.create()).collect();
        (elements, ids)
    }

    #[test]
    fn test_register_applies_start_state() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::Title,
            vec![Track::single(ids[0], fade_up(0.6))],
        );

        assert_eq!(engine.state(unit), Some(PlaybackState::Pending));
        assert_eq!(elements.value(ids[0], Property::Opacity), 0.0);
        assert_eq!(elements.value(ids[0], Property::Y), 20.0);
        assert!(!engine.is_active(unit));
    }

    #[test]
    fn test_play_forward_settles() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::Title,
            vec![Track::single(ids[0], fade_up(0.6))],
        );

        engine.play(&mut elements, unit, Direction::Forward);
        assert_eq!(engine.state(unit), Some(PlaybackState::PlayingForward));
        assert!(engine.is_active(unit));

        engine.tick(&mut elements, 0.3);
        assert!((elements.value(ids[0], Property::Opacity) - 0.5).abs() < 1e-5);

        engine.tick(&mut elements, 0.3);
        assert_eq!(engine.state(unit), Some(PlaybackState::Settled));
        assert_eq!(elements.value(ids[0], Property::Opacity), 1.0);
        assert!(!engine.is_active(unit));
    }

    #[test]
    fn test_reverse_restores_start_exactly() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let descriptor =
            fade_up(0.6).timing(TimingFunction::Back(1.7, crate::animation::Ease::Out));
        let unit = engine.register(
            &mut elements,
            Role::Title,
            vec![Track::single(ids[0], descriptor)],
        );

        for _ in 0..3 {
            engine.play(&mut elements, unit, Direction::Forward);
            for _ in 0..7 {
                engine.tick(&mut elements, 0.1);
            }
            engine.play(&mut elements, unit, Direction::Reverse);
            for _ in 0..7 {
                engine.tick(&mut elements, 0.1);
            }
            assert_eq!(engine.state(unit), Some(PlaybackState::Pending));
            assert_eq!(elements.value(ids[0], Property::Opacity), 0.0);
            assert_eq!(elements.value(ids[0], Property::Y), 20.0);
        }
    }

    #[test]
    fn test_reverse_mid_flight_has_no_snap() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::Title,
            vec![Track::single(ids[0], fade_up(1.0))],
        );

        engine.play(&mut elements, unit, Direction::Forward);
        engine.tick(&mut elements, 0.4);
        let before = elements.value(ids[0], Property::Opacity);

        engine.play(&mut elements, unit, Direction::Reverse);
        assert_eq!(elements.value(ids[0], Property::Opacity), before);
        engine.tick(&mut elements, 0.1);
        assert!(elements.value(ids[0], Property::Opacity) < before);
        assert_eq!(engine.state(unit), Some(PlaybackState::PlayingReverse));
    }

    #[test]
    fn test_stagger_start_times() {
        let (mut elements, ids) = setup(5);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::GroupItem,
            vec![Track::new(ids.clone(), fade_up(0.6).stagger(0.1))],
        );

        let times = engine.start_times(unit);
        assert_eq!(times.len(), 5);
        for (i, (target, time)) in times.iter().enumerate() {
            assert_eq!(*target, ids[i]);
            assert!((time - i as f32 * 0.1).abs() < 1e-6);
        }

        engine.play(&mut elements, unit, Direction::Forward);
        engine.tick(&mut elements, 0.15);
        // Item 2 must not have moved before 0.2s
        assert_eq!(elements.value(ids[2], Property::Opacity), 0.0);
        assert!(elements.value(ids[0], Property::Opacity) > 0.0);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let (mut elements, ids) = setup(3);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::GroupItem,
            vec![Track::new(ids.clone(), fade_up(0.0))],
        );

        engine.play(&mut elements, unit, Direction::Forward);
        assert_eq!(engine.state(unit), Some(PlaybackState::Settled));
        for id in &ids {
            assert_eq!(elements.value(*id, Property::Opacity), 1.0);
        }
    }

    #[test]
    fn test_empty_group_is_noop() {
        let mut elements = Elements::new();
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::GroupItem,
            vec![Track::new(Vec::new(), fade_up(0.6))],
        );
        engine.play(&mut elements, unit, Direction::Forward);
        engine.tick(&mut elements, 1.0);
        assert_eq!(engine.duration(unit), Some(0.0));
    }

    #[test]
    fn test_unmounted_target_cancels_without_error() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::Title,
            vec![Track::single(ids[0], fade_up(1.0))],
        );

        engine.play(&mut elements, unit, Direction::Forward);
        engine.tick(&mut elements, 0.2);
        elements.unmount(ids[0]);
        engine.tick(&mut elements, 0.2);

        assert!(!engine.contains(unit));
        assert!(!engine.has_active_animations());
        // Playing a removed unit is a no-op
        engine.play(&mut elements, unit, Direction::Reverse);
    }

    #[test]
    fn test_scrub_is_linear_and_clamped() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let descriptor = AnimationDescriptor::from_to(
            PropertyValues::new().height(0.0),
            PropertyValues::new().height(600.0),
        )
        .duration(2.0)
        .timing(TimingFunction::Power(2, crate::animation::Ease::Out));
        let unit = engine.register(
            &mut elements,
            Role::ProgressFill,
            vec![Track::single(ids[0], descriptor)],
        );

        engine.scrub(&mut elements, unit, 0.25);
        assert_eq!(elements.value(ids[0], Property::Height), 150.0);
        assert_eq!(engine.state(unit), Some(PlaybackState::PlayingForward));

        engine.scrub(&mut elements, unit, 1.5);
        assert_eq!(elements.value(ids[0], Property::Height), 600.0);
        assert_eq!(engine.state(unit), Some(PlaybackState::Settled));

        engine.scrub(&mut elements, unit, 0.5);
        assert_eq!(engine.state(unit), Some(PlaybackState::PlayingReverse));

        engine.scrub(&mut elements, unit, -1.0);
        assert_eq!(elements.value(ids[0], Property::Height), 0.0);
        assert_eq!(engine.state(unit), Some(PlaybackState::Pending));
        assert!(!engine.is_active(unit));
    }

    #[test]
    fn test_new_tween_preempts_previous() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let transition = Transition::new(0.3, TimingFunction::Linear);

        let first = engine.animate_to(
            &elements,
            ids[0],
            PropertyValues::new().scale(1.05),
            transition.clone(),
        );
        engine.tick(&mut elements, 0.1);
        let second =
            engine.animate_to(&elements, ids[0], PropertyValues::new().scale(1.0), transition);

        assert_eq!(engine.driver(ids[0], Property::Scale), Some(Driver::Tween(second)));
        assert_ne!(first, second);
        assert_eq!(engine.tween_count(), 1);
        assert_eq!(engine.active_drivers(ids[0], Property::Scale), 1);

        engine.tick(&mut elements, 0.3);
        assert_eq!(elements.value(ids[0], Property::Scale), 1.0);
        assert_eq!(engine.active_drivers(ids[0], Property::Scale), 0);
    }

    #[test]
    fn test_unit_play_takes_over_tween_property() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let descriptor = AnimationDescriptor::from_to(
            PropertyValues::new().scale(0.9),
            PropertyValues::new().scale(1.0),
        )
        .duration(0.6);
        let unit = engine.register(
            &mut elements,
            Role::GroupItem,
            vec![Track::single(ids[0], descriptor)],
        );

        engine.animate_to(
            &elements,
            ids[0],
            PropertyValues::new().scale(1.05),
            Transition::default(),
        );
        engine.play(&mut elements, unit, Direction::Forward);

        assert_eq!(engine.driver(ids[0], Property::Scale), Some(Driver::Unit(unit)));
        assert_eq!(engine.tween_count(), 0);
        assert_eq!(engine.active_drivers(ids[0], Property::Scale), 1);
    }

    #[test]
    fn test_finished_tween_keeps_property_from_running_unit() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let descriptor = AnimationDescriptor::from_to(
            PropertyValues::new().opacity(0.0).scale(0.9),
            PropertyValues::new().opacity(1.0).scale(1.0),
        )
        .duration(0.8);
        let unit = engine.register(
            &mut elements,
            Role::GroupItem,
            vec![Track::single(ids[0], descriptor)],
        );

        engine.play(&mut elements, unit, Direction::Forward);
        engine.tick(&mut elements, 0.1);
        let transition = Transition::new(0.3, TimingFunction::Linear);
        engine.animate_to(&elements, ids[0], PropertyValues::new().scale(1.05), transition);

        for _ in 0..120 {
            engine.tick(&mut elements, 1.0 / 60.0);
        }

        assert_eq!(engine.state(unit), Some(PlaybackState::Settled));
        assert_eq!(elements.value(ids[0], Property::Scale), 1.05);
        assert_eq!(elements.value(ids[0], Property::Opacity), 1.0);
    }

    #[test]
    fn test_replay_reclaims_preempted_property() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let descriptor = AnimationDescriptor::from_to(
            PropertyValues::new().scale(0.9),
            PropertyValues::new().scale(1.0),
        )
        .duration(0.6);
        let unit = engine.register(
            &mut elements,
            Role::GroupItem,
            vec![Track::single(ids[0], descriptor)],
        );

        engine.play(&mut elements, unit, Direction::Forward);
        engine.animate_to(
            &elements,
            ids[0],
            PropertyValues::new().scale(1.05),
            Transition::new(0.1, TimingFunction::Linear),
        );
        engine.tick(&mut elements, 0.2);
        engine.play(&mut elements, unit, Direction::Reverse);
        for _ in 0..60 {
            engine.tick(&mut elements, 1.0 / 60.0);
        }

        assert_eq!(engine.state(unit), Some(PlaybackState::Pending));
        assert_eq!(elements.value(ids[0], Property::Scale), 0.9);
    }

    #[test]
    fn test_tracks_with_offsets() {
        let (mut elements, ids) = setup(3);
        let mut engine = PlaybackEngine::new();
        let nav = Track::single(ids[0], fade_up(0.8));
        let items = Track::new(vec![ids[1], ids[2]], fade_up(0.5).stagger(0.1)).offset(0.5);
        let unit = engine.register(&mut elements, Role::TimelineNode, vec![nav, items]);

        assert!((engine.duration(unit).unwrap_or_default() - 1.1).abs() < 1e-6);
        let times = engine.start_times(unit);
        assert!((times[1].1 - 0.5).abs() < 1e-6);
        assert!((times[2].1 - 0.6).abs() < 1e-6);

        engine.play(&mut elements, unit, Direction::Forward);
        engine.tick(&mut elements, 0.4);
        assert_eq!(elements.value(ids[1], Property::Opacity), 0.0);
        engine.tick(&mut elements, 1.0);
        assert_eq!(engine.state(unit), Some(PlaybackState::Settled));
        assert_eq!(elements.value(ids[2], Property::Opacity), 1.0);
    }

    #[test]
    fn test_reset_and_complete_actions() {
        let (mut elements, ids) = setup(1);
        let mut engine = PlaybackEngine::new();
        let unit = engine.register(
            &mut elements,
            Role::Title,
            vec![Track::single(ids[0], fade_up(0.6))],
        );

        engine.apply_action(&mut elements, unit, Action::Complete);
        assert_eq!(engine.state(unit), Some(PlaybackState::Settled));
        assert_eq!(elements.value(ids[0], Property::Opacity), 1.0);

        engine.apply_action(&mut elements, unit, Action::Reset);
        assert_eq!(engine.state(unit), Some(PlaybackState::Pending));
        assert_eq!(elements.value(ids[0], Property::Opacity), 0.0);

        engine.apply_action(&mut elements, unit, Action::Restart);
        assert_eq!(engine.state(unit), Some(PlaybackState::PlayingForward));
        engine.apply_action(&mut elements, unit, Action::Pause);
        assert!(!engine.is_active(unit));
    }
}
