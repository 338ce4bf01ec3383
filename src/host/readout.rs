//! Read-only views of host state

use serde::Serialize;
use std::fmt;

use super::Side;
use crate::input::geometry::{AxisValue, Point};
use crate::input::stick::StickPhase;

/// Label text for one stick: `"(px, py) vx, vy"`
///
/// `px, py` is where the stick is placed on screen, `vx, vy` its value.
/// A hidden stick reads `"(0,0) 0, 0"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readout {
    pub placement: Option<Point>,
    pub value: AxisValue,
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.placement {
            Some(p) => write!(
                f,
                "({:.1}, {:.1}) {:.1}, {:.1}",
                p.x, p.y, self.value.x, self.value.y
            ),
            None => write!(f, "(0,0) 0, 0"),
        }
    }
}

/// State of one side at a point in time
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SideSnapshot {
    pub side: Side,
    pub value: AxisValue,
    pub phase: StickPhase,
    pub visible: bool,
    pub placement: Option<Point>,
    pub invert_y_axis: bool,
    pub gate_open: bool,
    pub gate_remaining_ms: u64,
    /// Pointer currently driving this side
    pub pointer: Option<u64>,
}

impl SideSnapshot {
    pub fn readout(&self) -> Readout {
        Readout {
            placement: self.placement,
            value: self.value,
        }
    }
}

/// Both sides
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HostSnapshot {
    pub left: SideSnapshot,
    pub right: SideSnapshot,
}

impl HostSnapshot {
    pub fn side(&self, side: Side) -> &SideSnapshot {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}
