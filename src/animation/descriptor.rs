//! Declarative description of one visual unit's animation.
//!
//! A descriptor says what to animate (start and end values), for how long,
//! with which curve, and how a group of targets is staggered. It is built
//! once with the consuming builder methods and never mutated afterwards;
//! the [`PlaybackEngine`](crate::engine::PlaybackEngine) interprets it.

use super::{iteration_time, Animatable, PropertySet, PropertyValues, Repeat, TimingFunction};

/// Starting values for the targets of a descriptor
#[derive(Clone, Debug, PartialEq)]
pub enum StartState {
    /// Every target starts from the same values
    Uniform(PropertyValues),
    /// Target `i` starts from entry `i % len` (e.g. alternating sides)
    Indexed(Vec<PropertyValues>),
}

impl StartState {
    /// Start values for the target at `index`
    pub fn for_index(&self, index: usize) -> Option<&PropertyValues> {
        match self {
            StartState::Uniform(values) => Some(values),
            StartState::Indexed(list) if list.is_empty() => None,
            StartState::Indexed(list) => list.get(index % list.len()),
        }
    }

    fn keys(&self) -> PropertySet {
        match self {
            StartState::Uniform(values) => values.keys(),
            StartState::Indexed(list) => list
                .iter()
                .fold(PropertySet::empty(), |set, values| set | values.keys()),
        }
    }
}

impl Default for StartState {
    fn default() -> Self {
        StartState::Uniform(PropertyValues::new())
    }
}

#[derive(Clone, Debug)]
pub struct AnimationDescriptor {
    from: StartState,
    to: PropertyValues,
    duration: f32,
    delay: f32,
    stagger: f32,
    timing: TimingFunction,
    repeat: u32,
    yoyo: bool,
}

impl AnimationDescriptor {
    /// Animate towards `to`. Properties without an explicit start value
    /// start from whatever the element shows when the unit is mounted.
    pub fn new(to: PropertyValues) -> Self {
        Self {
            from: StartState::default(),
            to,
            duration: 0.5,
            delay: 0.0,
            stagger: 0.0,
            timing: TimingFunction::default(),
            repeat: 0,
            yoyo: false,
        }
    }

    /// Shorthand for `new(to).from(from)`
    pub fn from_to(from: PropertyValues, to: PropertyValues) -> Self {
        Self::new(to).from(from)
    }

    pub fn from(mut self, from: PropertyValues) -> Self {
        self.from = StartState::Uniform(from);
        self
    }

    /// Per-target start values, cycled by target index
    pub fn from_indexed(mut self, from: Vec<PropertyValues>) -> Self {
        self.from = StartState::Indexed(from);
        self
    }

    /// Duration of one target's animation in seconds (negative clamps to 0)
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Offset between consecutive targets' start times, in seconds
    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = stagger.max(0.0);
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = count;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn start_state(&self) -> &StartState {
        &self.from
    }

    pub fn end_state(&self) -> &PropertyValues {
        &self.to
    }

    pub fn duration_secs(&self) -> f32 {
        self.duration
    }

    pub fn delay_secs(&self) -> f32 {
        self.delay
    }

    pub fn stagger_secs(&self) -> f32 {
        self.stagger
    }

    pub fn timing_function(&self) -> &TimingFunction {
        &self.timing
    }

    /// All properties this descriptor drives
    pub fn properties(&self) -> PropertySet {
        self.to.keys() | self.from.keys()
    }

    /// Start offset of target `index` relative to target 0
    pub fn stagger_offset(&self, index: usize) -> f32 {
        index as f32 * self.stagger
    }

    /// Start offset of target `index` relative to the start of playback
    pub fn start_offset(&self, index: usize) -> f32 {
        self.delay + self.stagger_offset(index)
    }

    /// Length of one iteration over `count` targets (without the delay)
    pub fn iteration_length(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        self.stagger_offset(count - 1) + self.duration
    }

    /// Total playback length over `count` targets, including delay and repeats
    pub fn total_duration(&self, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        self.delay + self.iteration_length(count) * (self.repeat as f32 + 1.0)
    }

    /// Linear progress in `[0, 1]` of target `index` at `elapsed` seconds
    /// since playback started
    pub fn target_progress(&self, index: usize, count: usize, elapsed: f32) -> f32 {
        let local = iteration_time(
            elapsed - self.delay,
            self.iteration_length(count),
            Repeat::Count(self.repeat),
            self.yoyo,
        );
        let offset = self.stagger_offset(index);
        if self.duration <= 0.0 {
            return if local >= offset && elapsed >= self.delay {
                1.0
            } else {
                0.0
            };
        }
        ((local - offset) / self.duration).clamp(0.0, 1.0)
    }

    /// Progress every target rests at once playback has finished
    pub fn final_progress(&self) -> f32 {
        if self.yoyo && self.repeat % 2 == 1 {
            0.0
        } else {
            1.0
        }
    }

    /// Resolve the concrete start values of one target
    ///
    /// `current` holds the values the element shows right now; they fill in
    /// any property the descriptor animates without an explicit start.
    pub fn resolve_start(&self, index: usize, current: &PropertyValues) -> PropertyValues {
        let mut start: PropertyValues = self
            .to
            .iter()
            .map(|(property, _)| (property, current.get_or_initial(property)))
            .collect();
        if let Some(explicit) = self.from.for_index(index) {
            start.merge(explicit);
        }
        start
    }

    /// Resolve the concrete end values of one target
    ///
    /// Properties that only have a start value animate back to what the
    /// element showed before the unit was mounted.
    pub fn resolve_end(&self, index: usize, current: &PropertyValues) -> PropertyValues {
        let mut end = PropertyValues::new();
        if let Some(explicit) = self.from.for_index(index) {
            for (property, _) in explicit.iter() {
                end.set(property, current.get_or_initial(property));
            }
        }
        end.merge(&self.to);
        end
    }

    /// Values of a target for an eased progress value
    pub fn sample(start: &PropertyValues, end: &PropertyValues, eased: f32) -> PropertyValues {
        PropertyValues::lerp(start, end, eased)
    }
}
