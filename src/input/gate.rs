//! Quick-tap gate
//!
//! Opens for a short window each time a stick is dismissed. An engagement
//! while the gate is open is a quick tap (and restarts the window), otherwise
//! it is a normal tap. The countdown is driven externally through
//! [`QuickTapGate::tick`] so the owner decides how time advances.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default window after a dismiss during which a re-engagement is a quick tap
pub const DEFAULT_WINDOW_MS: u64 = 150;

/// Default countdown tick
pub const DEFAULT_TICK_MS: u64 = 10;

/// Gate timing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct GateConfig {
    #[serde(default = "default_window")]
    pub window_ms: u64,
    #[serde(default = "default_tick")]
    pub tick_ms: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            window_ms: DEFAULT_WINDOW_MS,
            tick_ms: DEFAULT_TICK_MS,
        }
    }
}

fn default_window() -> u64 { DEFAULT_WINDOW_MS }
fn default_tick() -> u64 { DEFAULT_TICK_MS }

/// Classification of an engagement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TapKind {
    Quick,
    Normal,
}

/// What the owner must do with the periodic countdown after a gate call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Start,
    Stop,
    Unchanged,
}

/// Per-stick gate state
#[derive(Debug, Clone)]
pub struct QuickTapGate {
    window: Duration,
    remaining: Duration,
    open: bool,
}

impl QuickTapGate {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            remaining: Duration::ZERO,
            open: false,
        }
    }

    pub fn from_config(config: &GateConfig) -> Self {
        Self::new(Duration::from_millis(config.window_ms))
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// The stick was released. Opens a closed gate; an open gate keeps its window.
    pub fn dismissed(&mut self) -> Countdown {
        if self.open || self.window.is_zero() {
            return Countdown::Unchanged;
        }
        self.open = true;
        self.remaining = self.window;
        Countdown::Start
    }

    /// The stick was engaged
    pub fn engaged(&mut self) -> TapKind {
        if self.open {
            self.remaining = self.window;
            TapKind::Quick
        } else {
            TapKind::Normal
        }
    }

    /// Advance the countdown by one tick
    pub fn tick(&mut self, elapsed: Duration) -> Countdown {
        if !self.open {
            return Countdown::Stop;
        }
        self.remaining = self.remaining.saturating_sub(elapsed);
        if self.remaining.is_zero() {
            self.close();
            return Countdown::Stop;
        }
        Countdown::Unchanged
    }

    /// Force the gate closed
    pub fn close(&mut self) {
        self.open = false;
        self.remaining = Duration::ZERO;
    }
}

impl Default for QuickTapGate {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_WINDOW_MS))
    }
}
