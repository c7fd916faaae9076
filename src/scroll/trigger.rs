//! Trigger observation: turns scroll positions into enter/leave events.
//!
//! A [`TriggerObserver`] is a small state machine over one element's
//! activation zone. It is fed the current [`Viewport`] and the element's
//! layout box and reports which zone boundaries were crossed since the
//! last evaluation. Scroll-linked observers report progress through the
//! zone instead.

use std::fmt;
use std::str::FromStr;

use super::{ScrollAnchor, Viewport};
use crate::config::ReplayPolicy;
use crate::element::Rect;
use crate::engine::UnitId;
use crate::error::ParseError;

/// Which zone boundary was crossed
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossing {
    Enter,
    Leave,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollDirection {
    Down,
    Up,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TriggerKind {
    Toggle {
        crossing: Crossing,
        scroll: ScrollDirection,
    },
    /// Scroll-linked progress through the zone, in `[0, 1]`
    Progress(f32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerEvent {
    pub unit: UnitId,
    pub kind: TriggerKind,
}

/// What a unit does when a boundary is crossed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Action {
    Play,
    Reverse,
    Restart,
    Reset,
    Complete,
    Pause,
    #[default]
    None,
}

impl FromStr for Action {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "play" => Ok(Action::Play),
            "reverse" => Ok(Action::Reverse),
            "restart" => Ok(Action::Restart),
            "reset" => Ok(Action::Reset),
            "complete" => Ok(Action::Complete),
            "pause" => Ok(Action::Pause),
            "none" => Ok(Action::None),
            _ => Err(ParseError::ToggleActions(s.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Play => "play",
            Action::Reverse => "reverse",
            Action::Restart => "restart",
            Action::Reset => "reset",
            Action::Complete => "complete",
            Action::Pause => "pause",
            Action::None => "none",
        };
        f.write_str(name)
    }
}

/// Actions for the four crossings, in the order
/// enter (down), leave (down), enter back (up), leave back (up)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ToggleActions {
    pub on_enter: Action,
    pub on_leave: Action,
    pub on_enter_back: Action,
    pub on_leave_back: Action,
}

impl ToggleActions {
    pub const fn new(
        on_enter: Action,
        on_leave: Action,
        on_enter_back: Action,
        on_leave_back: Action,
    ) -> Self {
        Self {
            on_enter,
            on_leave,
            on_enter_back,
            on_leave_back,
        }
    }

    /// `play none none reverse`: reveal on the way down, hide again when
    /// scrolled back above the start line
    pub const fn replay() -> Self {
        Self::new(Action::Play, Action::None, Action::None, Action::Reverse)
    }

    /// `play none none none`
    pub const fn once() -> Self {
        Self::new(Action::Play, Action::None, Action::None, Action::None)
    }

    pub fn action_for(&self, crossing: Crossing, scroll: ScrollDirection) -> Action {
        match (crossing, scroll) {
            (Crossing::Enter, ScrollDirection::Down) => self.on_enter,
            (Crossing::Leave, ScrollDirection::Down) => self.on_leave,
            (Crossing::Enter, ScrollDirection::Up) => self.on_enter_back,
            (Crossing::Leave, ScrollDirection::Up) => self.on_leave_back,
        }
    }
}

impl Default for ToggleActions {
    fn default() -> Self {
        Self::replay()
    }
}

impl FromStr for ToggleActions {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::ToggleActions(s.to_string());
        let actions = s
            .split_whitespace()
            .map(|token| token.parse::<Action>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;
        match actions.as_slice() {
            [enter, leave, enter_back, leave_back] => {
                Ok(Self::new(*enter, *leave, *enter_back, *leave_back))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ToggleActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.on_enter, self.on_leave, self.on_enter_back, self.on_leave_back
        )
    }
}

/// When a unit's trigger fires and what it does
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriggerRule {
    pub start: ScrollAnchor,
    /// Bottom of the zone; without one the zone extends to the end of the page
    pub end: Option<ScrollAnchor>,
    pub policy: ReplayPolicy,
    pub actions: ToggleActions,
}

impl TriggerRule {
    pub fn new(start: ScrollAnchor, policy: ReplayPolicy) -> Self {
        let actions = match policy {
            ReplayPolicy::Once => ToggleActions::once(),
            _ => ToggleActions::replay(),
        };
        Self {
            start,
            end: None,
            policy,
            actions,
        }
    }

    pub fn end(mut self, end: ScrollAnchor) -> Self {
        self.end = Some(end);
        self
    }

    pub fn actions(mut self, actions: ToggleActions) -> Self {
        self.actions = actions;
        self
    }
}

/// Where the viewport is relative to an activation zone
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Zone {
    /// Scrolled above the start line
    Before,
    Inside,
    /// Scrolled past the end line
    After,
}

/// Watches one element's position against the viewport
#[derive(Debug)]
pub struct TriggerObserver {
    unit: UnitId,
    rule: TriggerRule,
    zone: Zone,
    last_progress: Option<f32>,
    detached: bool,
}

impl TriggerObserver {
    pub fn new(unit: UnitId, rule: TriggerRule) -> Self {
        Self {
            unit,
            rule,
            zone: Zone::Before,
            last_progress: None,
            detached: false,
        }
    }

    pub fn unit(&self) -> UnitId {
        self.unit
    }

    pub fn rule(&self) -> &TriggerRule {
        &self.rule
    }

    pub fn zone(&self) -> Zone {
        self.zone
    }

    /// Whether a one-shot observer has fired and stopped listening
    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Scroll offsets of the zone's start and end lines
    pub fn zone_range(&self, viewport: &Viewport, bounds: &Rect) -> (f32, Option<f32>) {
        let start = self.rule.start.scroll_offset(bounds, viewport.height);
        let end = self
            .rule
            .end
            .map(|end| end.scroll_offset(bounds, viewport.height));
        (start, end)
    }

    /// Compare the viewport against the zone and report what changed.
    ///
    /// `bounds` is `None` while the element is not laid out or no longer
    /// mounted; evaluation is then skipped until geometry is available.
    pub fn evaluate(&mut self, viewport: &Viewport, bounds: Option<Rect>) -> Vec<TriggerEvent> {
        if self.detached {
            return Vec::new();
        }
        let Some(bounds) = bounds else {
            log::trace!("Trigger for {:?} deferred: element has no layout", self.unit);
            return Vec::new();
        };

        let (start, end) = self.zone_range(viewport, &bounds);
        if self.rule.policy == ReplayPolicy::Scrub {
            return self.evaluate_progress(viewport.scroll_y, start, end);
        }

        let scroll = viewport.scroll_y;
        let zone = if scroll < start {
            Zone::Before
        } else if end.is_some_and(|end| scroll >= end) {
            Zone::After
        } else {
            Zone::Inside
        };

        let mut events = Vec::new();
        while self.zone != zone && !self.detached {
            let (next, crossing, direction) = match (self.zone, zone > self.zone) {
                (Zone::Before, true) => (Zone::Inside, Crossing::Enter, ScrollDirection::Down),
                (Zone::Inside, true) => (Zone::After, Crossing::Leave, ScrollDirection::Down),
                (Zone::After, false) => (Zone::Inside, Crossing::Enter, ScrollDirection::Up),
                (Zone::Inside, false) => (Zone::Before, Crossing::Leave, ScrollDirection::Up),
                _ => break,
            };
            log::debug!(
                "Trigger {:?}: {:?}/{:?} at scroll {:.1}",
                self.unit,
                crossing,
                direction,
                scroll
            );
            self.zone = next;
            events.push(TriggerEvent {
                unit: self.unit,
                kind: TriggerKind::Toggle {
                    crossing,
                    scroll: direction,
                },
            });
            if self.rule.policy == ReplayPolicy::Once && crossing == Crossing::Enter {
                self.detached = true;
            }
        }
        events
    }

    fn evaluate_progress(
        &mut self,
        scroll: f32,
        start: f32,
        end: Option<f32>,
    ) -> Vec<TriggerEvent> {
        let progress = scrub_progress(scroll, start, end);
        if self.last_progress == Some(progress) {
            return Vec::new();
        }
        log::trace!("Trigger {:?}: progress {:.3}", self.unit, progress);
        self.last_progress = Some(progress);
        vec![TriggerEvent {
            unit: self.unit,
            kind: TriggerKind::Progress(progress),
        }]
    }
}

/// Linear position of `scroll` between `start` and `end`, clamped to `[0, 1]`
///
/// A zone without an end, or with an end at or above its start, is a
/// step: 0 before the start line and 1 from it onwards.
pub fn scrub_progress(scroll: f32, start: f32, end: Option<f32>) -> f32 {
    match end {
        Some(end) if end > start => ((scroll - start) / (end - start)).clamp(0.0, 1.0),
        _ => {
            if scroll >= start {
                1.0
            } else {
                0.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Element at y=1000, 200px tall; 800px viewport.
    // "top 80%" start = 360, "bottom 20%" end = 1040.
    fn bounds() -> Option<Rect> {
        Some(Rect::new(0.0, 1000.0, 800.0, 200.0))
    }

    fn at(scroll: f32) -> Viewport {
        Viewport::new(1280.0, 800.0).scrolled_to(scroll)
    }

    fn toggles(events: &[TriggerEvent]) -> Vec<(Crossing, ScrollDirection)> {
        events
            .iter()
            .filter_map(|e| match e.kind {
                TriggerKind::Toggle { crossing, scroll } => Some((crossing, scroll)),
                TriggerKind::Progress(_) => None,
            })
            .collect()
    }

    fn replay_observer() -> TriggerObserver {
        let rule = TriggerRule::new(ScrollAnchor::top_at(0.8), ReplayPolicy::Replay);
        TriggerObserver::new(UnitId::next(), rule)
    }

    fn bounded_rule(policy: ReplayPolicy) -> TriggerRule {
        TriggerRule::new(ScrollAnchor::top_at(0.8), policy).end(ScrollAnchor::bottom_at(0.2))
    }

    #[test]
    fn test_enter_and_leave_back() {
        let mut observer = replay_observer();

        assert!(observer.evaluate(&at(0.0), bounds()).is_empty());
        assert_eq!(
            toggles(&observer.evaluate(&at(400.0), bounds())),
            vec![(Crossing::Enter, ScrollDirection::Down)]
        );
        // No duplicate enter while inside
        assert!(observer.evaluate(&at(500.0), bounds()).is_empty());
        assert_eq!(
            toggles(&observer.evaluate(&at(100.0), bounds())),
            vec![(Crossing::Leave, ScrollDirection::Up)]
        );
    }

    #[test]
    fn test_all_four_crossings() {
        let mut observer = TriggerObserver::new(UnitId::next(), bounded_rule(ReplayPolicy::Replay));

        let mut seen = Vec::new();
        for scroll in [0.0, 400.0, 1100.0, 900.0, 100.0] {
            seen.extend(toggles(&observer.evaluate(&at(scroll), bounds())));
        }
        assert_eq!(
            seen,
            vec![
                (Crossing::Enter, ScrollDirection::Down),
                (Crossing::Leave, ScrollDirection::Down),
                (Crossing::Enter, ScrollDirection::Up),
                (Crossing::Leave, ScrollDirection::Up),
            ]
        );
    }

    #[test]
    fn test_jump_across_zone_emits_both_in_order() {
        let mut observer = TriggerObserver::new(UnitId::next(), bounded_rule(ReplayPolicy::Replay));
        observer.evaluate(&at(0.0), bounds());

        assert_eq!(
            toggles(&observer.evaluate(&at(5000.0), bounds())),
            vec![
                (Crossing::Enter, ScrollDirection::Down),
                (Crossing::Leave, ScrollDirection::Down),
            ]
        );
        assert_eq!(
            toggles(&observer.evaluate(&at(0.0), bounds())),
            vec![
                (Crossing::Enter, ScrollDirection::Up),
                (Crossing::Leave, ScrollDirection::Up),
            ]
        );
    }

    #[test]
    fn test_already_inside_on_first_evaluation() {
        let mut observer = replay_observer();
        assert_eq!(
            toggles(&observer.evaluate(&at(600.0), bounds())),
            vec![(Crossing::Enter, ScrollDirection::Down)]
        );
        assert_eq!(observer.zone(), Zone::Inside);
    }

    #[test]
    fn test_once_detaches_after_first_enter() {
        let mut observer = TriggerObserver::new(UnitId::next(), bounded_rule(ReplayPolicy::Once));

        // Even a jump past the whole zone only reports the enter
        assert_eq!(
            toggles(&observer.evaluate(&at(5000.0), bounds())),
            vec![(Crossing::Enter, ScrollDirection::Down)]
        );
        assert!(observer.is_detached());
        assert!(observer.evaluate(&at(0.0), bounds()).is_empty());
        assert!(observer.evaluate(&at(400.0), bounds()).is_empty());
    }

    #[test]
    fn test_missing_bounds_defers() {
        let mut observer = replay_observer();
        assert!(observer.evaluate(&at(600.0), None).is_empty());
        assert_eq!(observer.zone(), Zone::Before);
        // Once laid out, the pending enter is reported
        assert_eq!(observer.evaluate(&at(600.0), bounds()).len(), 1);
    }

    #[test]
    fn test_scrub_progress_monotonic_and_exact() {
        let mut observer = TriggerObserver::new(UnitId::next(), bounded_rule(ReplayPolicy::Scrub));
        let mut last = -1.0;
        let mut values = Vec::new();
        for step in 0..=30 {
            let scroll = step as f32 * 50.0;
            for event in observer.evaluate(&at(scroll), bounds()) {
                if let TriggerKind::Progress(p) = event.kind {
                    assert!(p >= last);
                    last = p;
                    values.push(p);
                }
            }
        }
        assert_eq!(values.first(), Some(&0.0));
        assert_eq!(values.last(), Some(&1.0));
        assert_eq!(scrub_progress(360.0, 360.0, Some(1040.0)), 0.0);
        assert_eq!(scrub_progress(1040.0, 360.0, Some(1040.0)), 1.0);
    }

    #[test]
    fn test_scrub_emits_only_on_change() {
        let mut observer = TriggerObserver::new(UnitId::next(), bounded_rule(ReplayPolicy::Scrub));
        assert_eq!(observer.evaluate(&at(0.0), bounds()).len(), 1);
        assert!(observer.evaluate(&at(100.0), bounds()).is_empty());
    }

    #[test]
    fn test_degenerate_range_steps() {
        assert_eq!(scrub_progress(99.0, 100.0, Some(100.0)), 0.0);
        assert_eq!(scrub_progress(100.0, 100.0, Some(50.0)), 1.0);
        assert_eq!(scrub_progress(100.0, 100.0, None), 1.0);
    }

    #[test]
    fn test_toggle_actions_parse() {
        let actions: ToggleActions = "play none none reverse".parse().unwrap();
        assert_eq!(actions, ToggleActions::replay());
        assert_eq!(
            actions.action_for(Crossing::Leave, ScrollDirection::Up),
            Action::Reverse
        );
        assert_eq!(actions.to_string(), "play none none reverse");

        let actions: ToggleActions = "Restart pause COMPLETE reset".parse().unwrap();
        assert_eq!(actions.on_enter_back, Action::Complete);

        assert!("restart pause resume reset".parse::<ToggleActions>().is_err());
        assert!("play none".parse::<ToggleActions>().is_err());
    }
}
