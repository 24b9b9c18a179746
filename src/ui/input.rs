use winit::keyboard::{KeyCode, ModifiersState};

use crate::effects::EffectKind;
use crate::files::Direction;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const PAN_STEP: i32 = 10;
const FINE_PAN_STEP: i32 = 1;
const WHEEL_PAN_STEP: f32 = 50.0;
const ZOOM_STEP: f32 = 1.0;
const FINE_ZOOM_STEP: f32 = 0.1;
const FINER_ZOOM_STEP: f32 = 0.01;
const ROTATE_STEP: f32 = 5.0;
const FINE_ROTATE_STEP: f32 = 1.0;
const COARSE_ROTATE_STEP: f32 = 45.0;

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

/// Everything the user can ask the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    ScaleBy(f32),
    SetZoom(f32),
    Pan(i32, i32),
    RotateBy(f32),
    ToggleFlipHorizontal,
    ToggleFlipVertical,
    ToggleFitMode,
    ResetView,
    ApplyEffect(EffectKind),
    Navigate(Direction),
    ToggleBackground,
    CycleTitle,
    ToggleFullscreen,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        Self {
            shift: state.shift_key(),
            ctrl: state.control_key(),
            alt: state.alt_key(),
        }
    }
}

fn digit(code: KeyCode) -> Option<u8> {
    let n = match code {
        KeyCode::Digit1 => 1,
        KeyCode::Digit2 => 2,
        KeyCode::Digit3 => 3,
        KeyCode::Digit4 => 4,
        KeyCode::Digit5 => 5,
        KeyCode::Digit6 => 6,
        KeyCode::Digit7 => 7,
        KeyCode::Digit8 => 8,
        KeyCode::Digit9 => 9,
        _ => return None,
    };
    Some(n)
}

/// Map a physical key press to an action. Keys are matched by position so
/// the bindings stay put when Shift changes the produced character.
pub fn map_key(code: KeyCode, mods: Modifiers) -> Option<Action> {
    let pan = if mods.shift { FINE_PAN_STEP } else { PAN_STEP };
    let rotate = if mods.shift {
        FINE_ROTATE_STEP
    } else if mods.alt {
        COARSE_ROTATE_STEP
    } else {
        ROTATE_STEP
    };

    if let Some(n) = digit(code) {
        let unit = if mods.shift { 0.1 } else { 1.0 };
        return Some(Action::SetZoom(n as f32 * unit));
    }

    let action = match code {
        KeyCode::Escape | KeyCode::KeyQ => Action::Quit,
        KeyCode::F11 => Action::ToggleFullscreen,
        KeyCode::KeyT => Action::CycleTitle,
        KeyCode::KeyO => Action::ToggleFitMode,
        KeyCode::KeyH => Action::ToggleFlipHorizontal,
        KeyCode::KeyV => Action::ToggleFlipVertical,
        KeyCode::KeyI => Action::ApplyEffect(EffectKind::Invert),
        KeyCode::KeyC => Action::ApplyEffect(EffectKind::CycleChannels),
        KeyCode::KeyR if mods.shift => Action::ApplyEffect(EffectKind::SwapGB),
        KeyCode::KeyG if mods.shift => Action::ApplyEffect(EffectKind::SwapRB),
        KeyCode::KeyB if mods.shift => Action::ApplyEffect(EffectKind::SwapRG),
        KeyCode::KeyB => Action::ToggleBackground,
        KeyCode::Equal | KeyCode::NumpadAdd => Action::ScaleBy(ZOOM_STEP),
        KeyCode::Minus | KeyCode::NumpadSubtract => Action::ScaleBy(-ZOOM_STEP),
        KeyCode::PageUp | KeyCode::PageDown => {
            let step = if mods.shift { FINER_ZOOM_STEP } else { FINE_ZOOM_STEP };
            let sign = if code == KeyCode::PageUp { 1.0 } else { -1.0 };
            Action::ScaleBy(sign * step)
        }
        KeyCode::Digit0 => Action::ResetView,
        KeyCode::ArrowUp if !mods.ctrl => Action::Pan(0, -pan),
        KeyCode::ArrowDown if !mods.ctrl => Action::Pan(0, pan),
        KeyCode::ArrowLeft if mods.ctrl => Action::RotateBy(-rotate),
        KeyCode::ArrowRight if mods.ctrl => Action::RotateBy(rotate),
        KeyCode::ArrowLeft if mods.alt => Action::Navigate(Direction::Previous),
        KeyCode::ArrowRight if mods.alt => Action::Navigate(Direction::Next),
        KeyCode::ArrowLeft => Action::Pan(-pan, 0),
        KeyCode::ArrowRight => Action::Pan(pan, 0),
        _ => return None,
    };
    Some(action)
}

/// Scrolling pans: horizontal wheel moves right with positive `dx`, and
/// scrolling up (positive `dy`) moves the view up. Deltas are in lines.
pub fn map_wheel(dx: f32, dy: f32) -> Option<Action> {
    let x = (dx * WHEEL_PAN_STEP).round() as i32;
    let y = (-dy * WHEEL_PAN_STEP).round() as i32;
    (x != 0 || y != 0).then_some(Action::Pan(x, y))
}
