use thiserror::Error;

/// Errors produced while parsing string configuration.
///
/// Runtime animation operations never fail; only configuration written as
/// text (anchors, easing names, toggle actions, colors) can be rejected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid scroll anchor `{0}` (expected e.g. \"top 80%\")")]
    Anchor(String),

    #[error("unknown easing `{0}`")]
    Easing(String),

    #[error(
        "invalid toggle actions `{0}` \
         (expected four of play/reverse/restart/reset/complete/pause/none)"
    )]
    ToggleActions(String),

    #[error("unknown replay policy `{0}` (expected once, replay or scrub)")]
    ReplayPolicy(String),

    #[error("invalid HSL color `{0}` (expected \"<h> <s>% <l>%\")")]
    Color(String),
}
