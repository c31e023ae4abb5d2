use crate::constants::CANDLE_COUNT_MAX;
use crate::core::{ParamChange, SceneParameters};

/// Keyboard shortcuts understood by the front-end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    ToggleMusic,
    AddCandle,
    RemoveCandle,
    ToggleHud,
}

/// Whether a keydown on an element with `tag_name` should reach the global
/// shortcuts. Form controls keep their own keys: a focused button would
/// otherwise see Space twice (its own click plus the music shortcut).
pub fn key_reaches_shortcuts(tag_name: Option<&str>) -> bool {
    !matches!(
        tag_name.map(str::to_ascii_uppercase).as_deref(),
        Some("INPUT" | "BUTTON" | "TEXTAREA" | "SELECT")
    )
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        "m" | "M" | " " => Some(KeyAction::ToggleMusic),
        "]" => Some(KeyAction::AddCandle),
        "[" => Some(KeyAction::RemoveCandle),
        "h" | "H" => Some(KeyAction::ToggleHud),
        _ => None,
    }
}

/// Parameter edit implied by a candle shortcut, or `None` at the limits.
pub fn candle_change(params: &SceneParameters, action: KeyAction) -> Option<ParamChange> {
    let n = params.candle_count;
    match action {
        KeyAction::AddCandle if n < CANDLE_COUNT_MAX => Some(ParamChange::CandleCount(n + 1)),
        KeyAction::RemoveCandle if n > 0 => Some(ParamChange::CandleCount(n - 1)),
        _ => None,
    }
}

/// Clamp a panel edit to the ranges the settings panel offers.
pub fn clamp_to_panel_range(change: ParamChange) -> ParamChange {
    use crate::constants::{BLOOM_STRENGTH_RANGE, ROTATION_SPEED_RANGE};
    match change {
        ParamChange::RotationSpeed(v) => {
            ParamChange::RotationSpeed(v.clamp(ROTATION_SPEED_RANGE.0, ROTATION_SPEED_RANGE.1))
        }
        ParamChange::BloomStrength(v) => {
            ParamChange::BloomStrength(v.clamp(BLOOM_STRENGTH_RANGE.0, BLOOM_STRENGTH_RANGE.1))
        }
        ParamChange::CandleCount(n) => ParamChange::CandleCount(n.min(CANDLE_COUNT_MAX)),
        other => other,
    }
}
