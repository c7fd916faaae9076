use super::{iteration_time, Animatable, Transition};

/// Result of advancing an animation, indicating whether the value changed
#[derive(Debug, Clone, PartialEq)]
pub enum AdvanceResult<T> {
    /// Value did not change (animation not running or same value)
    NoChange,
    /// Value changed to a new value
    Changed(T),
}

impl<T> AdvanceResult<T> {
    /// Returns true if the value changed
    pub fn is_changed(&self) -> bool {
        matches!(self, AdvanceResult::Changed(_))
    }
}

/// A single interpolation towards a target value
///
/// Time is supplied by the caller through [`Tween::advance`], so the same
/// tween runs identically under a real frame clock and in tests.
#[derive(Clone, Debug)]
pub struct Tween<T: Animatable> {
    /// Current interpolated value
    current: T,
    /// Value the tween is heading to
    target: T,
    /// Value when the tween started
    start: T,
    /// Seconds elapsed since the tween started (including delay)
    elapsed: f32,
    transition: Transition,
    finished: bool,
}

impl<T: Animatable> Tween<T> {
    /// A settled tween resting at `initial_value`
    pub fn new(initial_value: T, transition: Transition) -> Self {
        Self {
            current: initial_value.clone(),
            target: initial_value.clone(),
            start: initial_value,
            elapsed: 0.0,
            transition,
            finished: true,
        }
    }

    /// Start animating from the current value to a new target
    pub fn animate_to(&mut self, new_target: T) {
        // Don't restart if we're already animating to this target
        if new_target == self.target && !self.finished {
            return;
        }

        self.start = self.current.clone();
        self.target = new_target;
        self.elapsed = 0.0;
        self.finished = false;
    }

    /// Advance the tween by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> AdvanceResult<T> {
        if self.finished {
            return AdvanceResult::NoChange;
        }

        self.elapsed += dt.max(0.0);
        let active = self.elapsed - self.transition.delay;
        if active <= 0.0 && self.transition.delay > 0.0 {
            // Still in delay period
            return AdvanceResult::NoChange;
        }

        let duration = self.transition.duration;
        let t = if duration <= 0.0 {
            1.0
        } else {
            iteration_time(active, duration, self.transition.repeat, self.transition.yoyo)
                / duration
        };
        let eased = self.transition.timing.evaluate(t);
        let new_value = T::lerp(&self.start, &self.target, eased);

        if self.elapsed >= self.transition.total_duration() {
            self.finished = true;
        }

        if new_value != self.current {
            self.current = new_value.clone();
            AdvanceResult::Changed(new_value)
        } else {
            AdvanceResult::NoChange
        }
    }

    /// Check if the tween is still running
    pub fn is_animating(&self) -> bool {
        !self.finished
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
