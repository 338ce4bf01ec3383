//! Dual-stick host
//!
//! Splits the screen into a left and a right half, each with its own floating
//! stick. A touch in a half shows that half's stick centered under the finger
//! and drives it until the finger lifts; a short while later the stick hides
//! again. Each half also runs a quick-tap gate.
//!
//! Everything runs inside one [`actor::HostActor`] task. Pointer events, timer
//! firings and config updates are commands on a single channel, so the two
//! halves never race even though their timers run independently.

pub mod actor;
pub mod commands;
pub mod handle;
pub mod listener;
pub mod readout;


use serde::{Deserialize, Serialize};
use std::fmt;

use crate::input::geometry::Point;

pub use actor::HostActor;
pub use handle::{HostError, HostHandle};
pub use listener::{ChannelListener, ConsoleListener, HostEvent, HostListener};
pub use readout::Readout;

/// Which half of the screen (and which stick)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::Left, Side::Right];

    /// Side owning a screen x coordinate for a screen of the given width
    pub fn for_x(x: f32, screen_width: f32) -> Self {
        if x < screen_width / 2.0 {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.pad("left"),
            Side::Right => f.pad("right"),
        }
    }
}

impl std::str::FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            other => Err(format!("unknown side '{}' (expected left or right)", other)),
        }
    }
}

/// Stage of a pointer's contact with the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// A pointer sample in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Stable id for one finger (or the mouse) across its down..up sequence
    pub pointer: u64,
    pub phase: PointerPhase,
    pub position: Point,
}

impl PointerEvent {
    pub fn down(pointer: u64, x: f32, y: f32) -> Self {
        Self { pointer, phase: PointerPhase::Down, position: Point::new(x, y) }
    }

    pub fn moved(pointer: u64, x: f32, y: f32) -> Self {
        Self { pointer, phase: PointerPhase::Move, position: Point::new(x, y) }
    }

    pub fn up(pointer: u64, x: f32, y: f32) -> Self {
        Self { pointer, phase: PointerPhase::Up, position: Point::new(x, y) }
    }

    pub fn cancel(pointer: u64) -> Self {
        Self { pointer, phase: PointerPhase::Cancel, position: Point::ZERO }
    }
}
