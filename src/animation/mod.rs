mod animatable;
mod descriptor;
mod property;
mod timing;
mod transform;
mod tween;

pub use animatable::Animatable;
pub use reveal_macros::Animatable;
pub use descriptor::{AnimationDescriptor, StartState};
pub use property::{Property, PropertySet, PropertyValues};
pub use timing::{Ease, TimingFunction, DEFAULT_BACK_OVERSHOOT};
pub use transform::Transform;
pub use tween::{AdvanceResult, Tween};

/// How many times an animation runs after its first iteration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    Count(u32),
    /// Loop until cancelled
    Infinite,
}

impl Repeat {
    /// Whether a yoyo animation comes to rest on a backwards pass
    fn ends_backwards(self) -> bool {
        matches!(self, Repeat::Count(count) if count % 2 == 1)
    }
}

/// Configuration for a one-off tween towards a target value
#[derive(Clone, Debug)]
pub struct Transition {
    /// Duration of one iteration in seconds
    pub duration: f32,
    /// Timing function controlling the animation curve
    pub timing: TimingFunction,
    /// Delay before animation starts in seconds
    pub delay: f32,
    /// Extra iterations after the first
    pub repeat: Repeat,
    /// Alternate direction on every other iteration
    pub yoyo: bool,
}

impl Transition {
    /// Create a new transition with the given duration (seconds) and timing function
    pub fn new(duration: f32, timing: TimingFunction) -> Self {
        Self {
            duration,
            timing,
            delay: 0.0,
            repeat: Repeat::Count(0),
            yoyo: false,
        }
    }

    /// Set the delay before the animation starts
    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    /// Set the duration of the animation
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    /// Set the timing function
    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = timing;
        self
    }

    /// Repeat the animation `count` extra times
    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = Repeat::Count(count);
        self
    }

    /// Keep repeating until the tween is replaced or its element unmounts
    pub fn repeat_forever(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self
    }

    /// Play every other iteration backwards
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Total running time including delay and repeats
    ///
    /// Infinite for an endless loop with a positive duration.
    pub fn total_duration(&self) -> f32 {
        let duration = self.duration.max(0.0);
        let iterations = match self.repeat {
            Repeat::Count(count) => count as f32 + 1.0,
            Repeat::Infinite if duration > 0.0 => return f32::INFINITY,
            Repeat::Infinite => 1.0,
        };
        self.delay.max(0.0) + duration * iterations
    }
}

impl Default for Transition {
    fn default() -> Self {
        Self::new(0.3, TimingFunction::decelerate())
    }
}

/// Map elapsed time inside a repeating animation to time within one iteration
///
/// Returns a value in `[0, iteration]`. Past the end, the result is the
/// final resting position: the iteration end, or its start when a yoyo
/// finishes on a backwards pass.
pub(crate) fn iteration_time(elapsed: f32, iteration: f32, repeat: Repeat, yoyo: bool) -> f32 {
    let ends_backwards = yoyo && repeat.ends_backwards();
    if iteration <= 0.0 {
        return if ends_backwards { 0.0 } else { iteration.max(0.0) };
    }
    if elapsed <= 0.0 {
        return 0.0;
    }
    let cycles = match repeat {
        Repeat::Count(count) => {
            if elapsed >= iteration * (count as f32 + 1.0) {
                return if ends_backwards { 0.0 } else { iteration };
            }
            (elapsed / iteration).floor().min(count as f32)
        }
        Repeat::Infinite => (elapsed / iteration).floor(),
    };
    let local = (elapsed - cycles * iteration).clamp(0.0, iteration);
    if yoyo && cycles % 2.0 == 1.0 {
        iteration - local
    } else {
        local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_builder() {
        let t = Transition::new(0.3, TimingFunction::Linear)
            .delay(0.1)
            .repeat(1)
            .yoyo(true);
        assert_eq!(t.delay, 0.1);
        assert_eq!(t.repeat, Repeat::Count(1));
        assert!(t.yoyo);
        assert!((t.total_duration() - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_time_plain() {
        assert_eq!(iteration_time(0.5, 1.0, Repeat::Count(0), false), 0.5);
        assert_eq!(iteration_time(2.0, 1.0, Repeat::Count(0), false), 1.0);
        assert_eq!(iteration_time(-1.0, 1.0, Repeat::Count(0), false), 0.0);
    }

    #[test]
    fn test_iteration_time_yoyo() {
        // Second iteration runs backwards
        assert!((iteration_time(1.25, 1.0, Repeat::Count(1), true) - 0.75).abs() < 1e-6);
        // A yoyo with one repeat comes back to the start
        assert_eq!(iteration_time(5.0, 1.0, Repeat::Count(1), true), 0.0);
        // Without yoyo, repeats restart from the beginning
        assert!((iteration_time(1.25, 1.0, Repeat::Count(1), false) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_iteration_time_infinite() {
        assert!((iteration_time(10.25, 1.0, Repeat::Infinite, false) - 0.25).abs() < 1e-4);
        assert!((iteration_time(11.25, 1.0, Repeat::Infinite, true) - 0.75).abs() < 1e-4);
        let endless = Transition::new(2.0, TimingFunction::Linear).repeat_forever();
        assert_eq!(endless.total_duration(), f32::INFINITY);
    }
}
