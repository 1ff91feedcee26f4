use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::ScreenPos;

bitflags! {
    /// Buttons currently held down, as reported by the host.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    pub struct MouseButtons: u8 {
        const PRIMARY   = 1;
        const SECONDARY = 1 << 1;
        const MIDDLE    = 1 << 2;
    }
}

/// Edge-aware state of one button within a tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
    JustPressed,
    JustReleased,
}

impl ButtonState {
    /// Derives the state from the button level on the previous and the current tick.
    pub const fn from_levels(was_down: bool, is_down: bool) -> Self {
        match (was_down, is_down) {
            (false, true) => Self::JustPressed,
            (true, true) => Self::Down,
            (true, false) => Self::JustReleased,
            (false, false) => Self::Up,
        }
    }

    /// Held during this tick, including the tick it was pressed on.
    pub const fn is_held(self) -> bool {
        matches!(self, Self::Down | Self::JustPressed)
    }

    pub const fn just_pressed(self) -> bool {
        matches!(self, Self::JustPressed)
    }

    pub const fn just_released(self) -> bool {
        matches!(self, Self::JustReleased)
    }
}

/// One normalized pointer sample, produced once per tick.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorEvent {
    pub x: i32,
    pub y: i32,
    pub primary: ButtonState,
    pub secondary: ButtonState,
}

impl CursorEvent {
    pub const fn new(pos: ScreenPos, primary: ButtonState, secondary: ButtonState) -> Self {
        Self {
            x: pos.0,
            y: pos.1,
            primary,
            secondary,
        }
    }

    /// Pointer at `pos` with both buttons up.
    pub const fn idle(pos: ScreenPos) -> Self {
        Self::new(pos, ButtonState::Up, ButtonState::Up)
    }

    pub const fn pos(&self) -> ScreenPos {
        (self.x, self.y)
    }
}

/// Turns level-triggered button samples into edge-aware [`CursorEvent`]s.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct InputNormalizer {
    held: MouseButtons,
}

impl InputNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buttons held as of the last sample.
    pub fn held(&self) -> MouseButtons {
        self.held
    }

    pub fn sample(&mut self, pos: ScreenPos, buttons: MouseButtons) -> CursorEvent {
        let state = |button| ButtonState::from_levels(self.held.contains(button), buttons.contains(button));
        let event = CursorEvent::new(
            pos,
            state(MouseButtons::PRIMARY),
            state(MouseButtons::SECONDARY),
        );
        if self.held != buttons {
            log::trace!("buttons {:?} -> {:?} at {:?}", self.held, buttons, pos);
        }
        self.held = buttons;
        event
    }
}
