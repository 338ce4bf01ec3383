//! Commands accepted by the host actor

use tokio::sync::oneshot;

use super::readout::HostSnapshot;
use super::{PointerEvent, Side};
use crate::config::AppConfig;
use crate::input::geometry::Size;

/// Timer purposes, one slot each per side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Delayed return to center after release (hold mode)
    Return,
    /// Hide the stick after it has been released
    Hide,
    /// Quick-tap gate countdown tick
    GateTick,
}

/// Commands for the host actor
///
/// Pointer, configuration and timer commands are fire-and-forget. `Snapshot`
/// answers over a oneshot channel.
pub enum HostCommand {
    /// Pointer sample in screen coordinates
    Pointer(PointerEvent),

    /// A scheduled timer elapsed. Dropped if `epoch` is no longer current.
    TimerFired {
        side: Side,
        kind: TimerKind,
        epoch: u64,
    },

    /// Toggle Y inversion for one stick
    SetInvertY { side: Side, invert: bool },

    /// The screen (or pad window) changed size
    Resize(Size),

    /// Apply a reloaded configuration
    ApplyConfig(Box<AppConfig>),

    /// Read the current state of both sides
    Snapshot {
        response: oneshot::Sender<HostSnapshot>,
    },

    /// Cancel every timer and stop the actor
    Shutdown,
}
