use std::fmt;
use std::str::FromStr;

use crate::animation::{AnimationDescriptor, Ease, PropertyValues, TimingFunction};
use crate::error::ParseError;
use crate::scroll::{ScrollAnchor, ToggleActions, TriggerRule, Viewport};

/// How a unit reacts to its trigger over time
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ReplayPolicy {
    /// Play on first entry, then stop listening
    Once,
    /// Play on entry, reverse when scrolled back above the start line
    #[default]
    Replay,
    /// Progress follows the scroll position through the zone
    Scrub,
}

impl FromStr for ReplayPolicy {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "once" => Ok(ReplayPolicy::Once),
            "replay" => Ok(ReplayPolicy::Replay),
            "scrub" => Ok(ReplayPolicy::Scrub),
            _ => Err(ParseError::ReplayPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for ReplayPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReplayPolicy::Once => "once",
            ReplayPolicy::Replay => "replay",
            ReplayPolicy::Scrub => "scrub",
        };
        f.write_str(name)
    }
}

/// Controller-wide defaults
#[derive(Clone, Debug)]
pub struct ControllerConfig {
    /// Start line used when a binding does not name one
    pub start: ScrollAnchor,
    /// End line for scroll-linked bindings that do not name one
    pub scrub_end: ScrollAnchor,
    pub duration: f32,
    pub timing: TimingFunction,
    pub viewport: Viewport,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            start: ScrollAnchor::top_at(0.8),
            scrub_end: ScrollAnchor::bottom_at(0.2),
            duration: 0.6,
            timing: TimingFunction::Power(1, Ease::Out),
            viewport: Viewport::default(),
        }
    }
}

impl ControllerConfig {
    /// A from/to descriptor using the default duration and timing
    pub fn descriptor(&self, from: PropertyValues, to: PropertyValues) -> AnimationDescriptor {
        AnimationDescriptor::from_to(from, to)
            .duration(self.duration)
            .timing(self.timing.clone())
    }
}

/// Per-binding options
///
/// Anchors left unset fall back to the [`ControllerConfig`] defaults; timing
/// fields left unset keep whatever the descriptor says.
#[derive(Clone, Debug, Default)]
pub struct RevealOptions {
    pub start: Option<ScrollAnchor>,
    pub end: Option<ScrollAnchor>,
    pub policy: ReplayPolicy,
    pub actions: Option<ToggleActions>,
    pub duration: Option<f32>,
    pub stagger: Option<f32>,
    pub delay: Option<f32>,
    pub timing: Option<TimingFunction>,
}

impl RevealOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section heading: fade up once per entry, reversed on the way back
    pub fn title() -> Self {
        Self::new()
    }

    /// A group of siblings revealed one after another
    pub fn group(stagger: f32) -> Self {
        Self::new().stagger(stagger).duration(0.8)
    }

    /// A progress bar filling once after `delay` seconds
    pub fn progress_fill(delay: f32) -> Self {
        Self::new()
            .policy(ReplayPolicy::Once)
            .delay(delay)
            .duration(1.0)
            .timing(TimingFunction::Power(2, Ease::Out))
    }

    /// Progress tied to scrolling through the element
    pub fn scrub() -> Self {
        Self::new()
            .policy(ReplayPolicy::Scrub)
            .timing(TimingFunction::Linear)
    }

    pub fn start(mut self, anchor: ScrollAnchor) -> Self {
        self.start = Some(anchor);
        self
    }

    pub fn end(mut self, anchor: ScrollAnchor) -> Self {
        self.end = Some(anchor);
        self
    }

    pub fn policy(mut self, policy: ReplayPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn actions(mut self, actions: ToggleActions) -> Self {
        self.actions = Some(actions);
        self
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn stagger(mut self, stagger: f32) -> Self {
        self.stagger = Some(stagger);
        self
    }

    pub fn delay(mut self, delay: f32) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn timing(mut self, timing: TimingFunction) -> Self {
        self.timing = Some(timing);
        self
    }

    /// The trigger rule these options describe under `config`'s defaults
    pub fn trigger_rule(&self, config: &ControllerConfig) -> TriggerRule {
        let mut rule = TriggerRule::new(self.start.unwrap_or(config.start), self.policy);
        let end = match self.policy {
            ReplayPolicy::Scrub => Some(self.end.unwrap_or(config.scrub_end)),
            _ => self.end,
        };
        if let Some(end) = end {
            rule = rule.end(end);
        }
        if let Some(actions) = self.actions {
            rule = rule.actions(actions);
        }
        rule
    }

    /// Override the descriptor's timing with whatever these options set
    pub fn apply(&self, mut descriptor: AnimationDescriptor) -> AnimationDescriptor {
        if let Some(duration) = self.duration {
            descriptor = descriptor.duration(duration);
        }
        if let Some(stagger) = self.stagger {
            descriptor = descriptor.stagger(stagger);
        }
        if let Some(delay) = self.delay {
            descriptor = descriptor.delay(delay);
        }
        if let Some(timing) = &self.timing {
            descriptor = descriptor.timing(timing.clone());
        }
        descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replay_policy_parse() {
        assert_eq!("once".parse(), Ok(ReplayPolicy::Once));
        assert_eq!(" Scrub ".parse(), Ok(ReplayPolicy::Scrub));
        assert_eq!(
            "always".parse::<ReplayPolicy>(),
            Err(ParseError::ReplayPolicy("always".into()))
        );
        assert_eq!(ReplayPolicy::Replay.to_string(), "replay");
    }

    #[test]
    fn test_defaults_fill_rule() {
        let config = ControllerConfig::default();
        let rule = RevealOptions::title().trigger_rule(&config);
        assert_eq!(rule.start, ScrollAnchor::top_at(0.8));
        assert_eq!(rule.end, None);
        assert_eq!(rule.actions, ToggleActions::replay());
    }

    #[test]
    fn test_scrub_gets_default_end() {
        let config = ControllerConfig::default();
        let rule = RevealOptions::scrub().trigger_rule(&config);
        assert_eq!(rule.end, Some(ScrollAnchor::bottom_at(0.2)));
        assert_eq!(rule.policy, ReplayPolicy::Scrub);
    }

    #[test]
    fn test_once_uses_play_only_actions() {
        let config = ControllerConfig::default();
        let rule = RevealOptions::progress_fill(0.3).trigger_rule(&config);
        assert_eq!(rule.actions, ToggleActions::once());
    }

    #[test]
    fn test_options_override_descriptor() {
        let config = ControllerConfig::default();
        let base = config.descriptor(
            PropertyValues::new().opacity(0.0),
            PropertyValues::new().opacity(1.0),
        );
        assert_eq!(RevealOptions::title().apply(base.clone()).duration_secs(), 0.6);

        let grouped = RevealOptions::group(0.3).duration(0.2).apply(base);
        assert_eq!(grouped.duration_secs(), 0.2);
        assert_eq!(grouped.stagger_secs(), 0.3);
        assert_eq!(grouped.delay_secs(), 0.0);
    }
}
