//! Virtual analogue stick control
//!
//! Owns the circular track, the draggable handle and the current
//! [`AxisValue`]. Pointer events go in, [`StickUpdate`]s come out
//! synchronously; every update is a value-changed notification for the owner.
//!
//! The control never sleeps or spawns. In hold mode `pointer_up` hands back a
//! [`ReturnPlan`] and the owner calls [`StickControl::complete_return`] once the
//! delay has elapsed. The plan carries an epoch so a late completion for an
//! engagement that has since been superseded is ignored.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::trace;

use super::geometry::{AxisValue, Point, Size};
use super::normalize::normalize;

/// Per-stick configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
pub struct StickConfig {
    /// Track radius in points; the control's bounds are a `2r × 2r` square
    #[serde(default = "default_radius")]
    pub radius: f32,
    #[serde(default)]
    pub invert_y_axis: bool,
    /// Keep the last value this long after release before snapping back (0 = immediate)
    #[serde(default = "default_return_delay")]
    pub return_to_center_delay_ms: u64,
    /// Duration of the handle's ease back to center
    #[serde(default = "default_return_animation")]
    pub return_animation_ms: u64,
}

impl Default for StickConfig {
    fn default() -> Self {
        Self {
            radius: default_radius(),
            invert_y_axis: false,
            return_to_center_delay_ms: default_return_delay(),
            return_animation_ms: default_return_animation(),
        }
    }
}

fn default_radius() -> f32 { 60.0 }
fn default_return_delay() -> u64 { 250 }
fn default_return_animation() -> u64 { 150 }

/// Lifecycle of a stick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StickPhase {
    /// Handle centered, value (0,0)
    Idle,
    /// Pointer down, handle follows it
    Engaged,
    /// Pointer lifted, waiting for the hold delay to elapse
    Releasing,
}

/// Handle position relative to the track center, in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HandleOffset {
    pub dx: f32,
    pub dy: f32,
}

/// One value-changed emission
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickUpdate {
    pub value: AxisValue,
    pub handle: HandleOffset,
    /// `Some` when the handle should ease to `handle` rather than jump
    pub animation: Option<Duration>,
}

/// A delayed return to center the owner has to schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnPlan {
    pub delay: Duration,
    pub epoch: u64,
}

/// Result of lifting the pointer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub update: StickUpdate,
    pub plan: Option<ReturnPlan>,
}

/// The virtual stick
#[derive(Debug, Clone)]
pub struct StickControl {
    config: StickConfig,
    bounds: Size,
    value: AxisValue,
    handle: HandleOffset,
    phase: StickPhase,
    /// Bumped on every engagement and release; a pending return only completes
    /// if it still carries the current epoch
    return_epoch: u64,
}

impl StickControl {
    pub fn new(config: StickConfig) -> Self {
        let bounds = Size::square(config.radius.max(0.0) * 2.0);
        Self {
            config,
            bounds,
            value: AxisValue::CENTER,
            handle: HandleOffset::default(),
            phase: StickPhase::Idle,
            return_epoch: 0,
        }
    }

    pub fn config(&self) -> &StickConfig {
        &self.config
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    pub fn radius(&self) -> f32 {
        self.bounds.radius()
    }

    pub fn value(&self) -> AxisValue {
        self.value
    }

    pub fn handle_offset(&self) -> HandleOffset {
        self.handle
    }

    pub fn phase(&self) -> StickPhase {
        self.phase
    }

    pub fn invert_y_axis(&self) -> bool {
        self.config.invert_y_axis
    }

    /// Takes effect on the next pointer sample
    pub fn set_invert_y_axis(&mut self, invert: bool) {
        self.config.invert_y_axis = invert;
    }

    /// Pointer went down at `local` (relative to the control's top-left).
    ///
    /// Re-engaging while a delayed return is pending cancels that return.
    pub fn pointer_down(&mut self, local: Point) -> StickUpdate {
        if self.phase == StickPhase::Releasing {
            trace!("Stick re-engaged during hold, dropping return epoch {}", self.return_epoch);
        }
        self.return_epoch += 1;
        self.phase = StickPhase::Engaged;
        self.track(local)
    }

    /// Pointer moved while down. Ignored unless engaged.
    pub fn pointer_move(&mut self, local: Point) -> Option<StickUpdate> {
        if self.phase != StickPhase::Engaged {
            return None;
        }
        Some(self.track(local))
    }

    /// Pointer lifted or the gesture was cancelled.
    ///
    /// Emits whenever the stick was engaged. Returns `None` otherwise.
    pub fn pointer_up(&mut self) -> Option<Release> {
        if self.phase != StickPhase::Engaged {
            return None;
        }

        self.return_epoch += 1;
        let delay = self.config.return_to_center_delay_ms;

        if delay == 0 {
            self.phase = StickPhase::Idle;
            return Some(Release {
                update: self.recenter(),
                plan: None,
            });
        }

        self.phase = StickPhase::Releasing;
        Some(Release {
            update: StickUpdate {
                value: self.value,
                handle: self.handle,
                animation: None,
            },
            plan: Some(ReturnPlan {
                delay: Duration::from_millis(delay),
                epoch: self.return_epoch,
            }),
        })
    }

    /// Finish a delayed return. Stale epochs are a no-op.
    pub fn complete_return(&mut self, epoch: u64) -> Option<StickUpdate> {
        if self.phase != StickPhase::Releasing || epoch != self.return_epoch {
            trace!(
                "Ignoring stale return (epoch {} vs current {})",
                epoch,
                self.return_epoch
            );
            return None;
        }
        self.phase = StickPhase::Idle;
        Some(self.recenter())
    }

    fn track(&mut self, local: Point) -> StickUpdate {
        let n = normalize(local, self.bounds, self.config.invert_y_axis);
        let radius = self.radius();

        self.value = n.value;
        self.handle = if radius > 0.0 {
            HandleOffset {
                dx: n.clamped.x - radius,
                dy: n.clamped.y - radius,
            }
        } else {
            HandleOffset::default()
        };

        StickUpdate {
            value: self.value,
            handle: self.handle,
            animation: None,
        }
    }

    fn recenter(&mut self) -> StickUpdate {
        self.value = AxisValue::CENTER;
        self.handle = HandleOffset::default();
        StickUpdate {
            value: self.value,
            handle: self.handle,
            animation: Some(Duration::from_millis(self.config.return_animation_ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn immediate() -> StickControl {
        StickControl::new(StickConfig {
            radius: 50.0,
            invert_y_axis: false,
            return_to_center_delay_ms: 0,
            return_animation_ms: 100,
        })
    }

    fn holding() -> StickControl {
        StickControl::new(StickConfig {
            radius: 50.0,
            invert_y_axis: false,
            return_to_center_delay_ms: 250,
            return_animation_ms: 150,
        })
    }

    #[test]
    fn test_engage_emits_and_positions_handle() {
        let mut stick = immediate();
        let update = stick.pointer_down(Point::new(75.0, 25.0));

        assert_eq!(stick.phase(), StickPhase::Engaged);
        assert_eq!(update.value, AxisValue::new(0.5, 0.5));
        assert_eq!(update.handle, HandleOffset { dx: 25.0, dy: -25.0 });
        assert_eq!(update.animation, None);
    }

    #[test]
    fn test_drag_clamps_handle_to_edge() {
        let mut stick = immediate();
        stick.pointer_down(Point::new(50.0, 50.0));
        let update = stick.pointer_move(Point::new(400.0, -400.0)).unwrap();

        assert_eq!(update.value, AxisValue::new(1.0, 1.0));
        assert_eq!(update.handle, HandleOffset { dx: 50.0, dy: -50.0 });
    }

    #[test]
    fn test_move_without_engage_is_ignored() {
        let mut stick = immediate();
        assert!(stick.pointer_move(Point::new(10.0, 10.0)).is_none());
        assert_eq!(stick.value(), AxisValue::CENTER);
    }

    #[test]
    fn test_immediate_release_recenters() {
        let mut stick = immediate();
        stick.pointer_down(Point::new(0.0, 0.0));
        let release = stick.pointer_up().unwrap();

        assert!(release.plan.is_none());
        assert_eq!(release.update.value, AxisValue::CENTER);
        assert_eq!(release.update.handle, HandleOffset::default());
        assert_eq!(release.update.animation, Some(Duration::from_millis(100)));
        assert_eq!(stick.phase(), StickPhase::Idle);
    }

    #[test]
    fn test_tap_matches_zero_length_drag() {
        let mut tapped = immediate();
        let down = tapped.pointer_down(Point::new(20.0, 80.0));
        let up = tapped.pointer_up().unwrap();

        let mut dragged = immediate();
        let d_down = dragged.pointer_down(Point::new(20.0, 80.0));
        let d_move = dragged.pointer_move(Point::new(20.0, 80.0)).unwrap();
        let d_up = dragged.pointer_up().unwrap();

        assert_eq!(down, d_down);
        assert_eq!(down, d_move);
        assert_eq!(up, d_up);
    }

    #[test]
    fn test_hold_mode_preserves_value_until_return() {
        let mut stick = holding();
        stick.pointer_down(Point::new(100.0, 50.0));
        let release = stick.pointer_up().unwrap();

        assert_eq!(release.update.value, AxisValue::new(1.0, 0.0));
        let plan = release.plan.unwrap();
        assert_eq!(plan.delay, Duration::from_millis(250));
        assert_eq!(stick.phase(), StickPhase::Releasing);
        assert_eq!(stick.value(), AxisValue::new(1.0, 0.0));

        let done = stick.complete_return(plan.epoch).unwrap();
        assert_eq!(done.value, AxisValue::CENTER);
        assert_eq!(done.animation, Some(Duration::from_millis(150)));
        assert_eq!(stick.phase(), StickPhase::Idle);
    }

    #[test]
    fn test_stale_return_after_reengage_is_ignored() {
        let mut stick = holding();
        stick.pointer_down(Point::new(100.0, 50.0));
        let plan = stick.pointer_up().unwrap().plan.unwrap();

        // New engagement before the hold delay elapses
        stick.pointer_down(Point::new(0.0, 50.0));
        assert!(stick.complete_return(plan.epoch).is_none());
        assert_eq!(stick.value(), AxisValue::new(-1.0, 0.0));
        assert_eq!(stick.phase(), StickPhase::Engaged);

        // The second release gets its own plan
        let second = stick.pointer_up().unwrap().plan.unwrap();
        assert_ne!(second.epoch, plan.epoch);
        assert!(stick.complete_return(second.epoch).is_some());
    }

    #[test]
    fn test_complete_return_twice_is_noop() {
        let mut stick = holding();
        stick.pointer_down(Point::new(100.0, 50.0));
        let plan = stick.pointer_up().unwrap().plan.unwrap();
        assert!(stick.complete_return(plan.epoch).is_some());
        assert!(stick.complete_return(plan.epoch).is_none());
    }

    #[test]
    fn test_up_without_down() {
        let mut stick = holding();
        assert!(stick.pointer_up().is_none());
    }

    #[test]
    fn test_runtime_invert_applies_to_next_sample() {
        let mut stick = immediate();
        let before = stick.pointer_down(Point::new(50.0, 0.0));
        assert_eq!(before.value.y, 1.0);

        stick.set_invert_y_axis(true);
        let after = stick.pointer_move(Point::new(50.0, 0.0)).unwrap();
        assert_eq!(after.value.y, -1.0);
    }

    #[test]
    fn test_zero_radius_stays_centered() {
        let mut stick = StickControl::new(StickConfig {
            radius: 0.0,
            ..StickConfig::default()
        });
        let update = stick.pointer_down(Point::new(30.0, 30.0));
        assert_eq!(update.value, AxisValue::CENTER);
        assert_eq!(update.handle, HandleOffset::default());

        let update = stick.pointer_move(Point::new(-80.0, 200.0)).unwrap();
        assert_eq!(update.value, AxisValue::CENTER);
        assert_eq!(stick.handle_offset(), HandleOffset::default());
    }

    #[test]
    fn test_non_finite_sample_rests_at_center() {
        let mut stick = immediate();
        stick.pointer_down(Point::new(90.0, 60.0));
        let update = stick.pointer_move(Point::new(f32::NAN, 60.0)).unwrap();
        assert_eq!(update.value, AxisValue::CENTER);
        assert!(update.value.in_range());
        assert_eq!(update.handle, HandleOffset::default());
    }
}
