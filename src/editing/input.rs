// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard modifiers and keys as seen by the path tool.

use kurbo::Vec2;
use serde::{Deserialize, Serialize};

/// Modifier key state at the time of an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// The platform command key (Cmd on macOS)
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        command: false,
    };

    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub const CTRL: Modifiers = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };

    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };

    pub const COMMAND: Modifiers = Modifiers {
        command: true,
        ..Modifiers::NONE
    };

    /// Check if no modifiers are held
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Keys the path tool reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Any key without a path tool binding
    #[serde(other)]
    Other,
}

impl Key {
    /// Nudge direction in screen space (y grows downwards)
    pub fn nudge_direction(self) -> Option<Vec2> {
        match self {
            Key::ArrowUp => Some(Vec2::new(0.0, -1.0)),
            Key::ArrowDown => Some(Vec2::new(0.0, 1.0)),
            Key::ArrowLeft => Some(Vec2::new(-1.0, 0.0)),
            Key::ArrowRight => Some(Vec2::new(1.0, 0.0)),
            Key::Other => None,
        }
    }
}
