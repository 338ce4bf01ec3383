//! Host notifications
//!
//! [`HostListener`] is the boundary between the sticks and whatever consumes
//! them (a game, the pad window, the console). All methods are called
//! synchronously from the host actor, in the order the state changed.

use colored::*;
use serde::Serialize;
use std::time::Duration;

use super::Side;
use crate::input::geometry::{AxisValue, Point};
use crate::input::stick::HandleOffset;

/// Receives stick notifications. Every method defaults to a no-op.
pub trait HostListener: Send + Sync {
    /// The stick's value changed (at least once per engage and per release)
    fn on_value_changed(&self, _side: Side, _value: AxisValue) {}

    /// The stick was engaged while its quick-tap gate was open
    fn on_quick_tap(&self, _side: Side) {}

    /// The stick was engaged while its quick-tap gate was closed
    fn on_normal_tap(&self, _side: Side) {}

    /// The stick was shown at `placement` (screen center of the track) or hidden
    fn on_visibility_changed(
        &self,
        _side: Side,
        _visible: bool,
        _placement: Option<Point>,
        _animation: Duration,
    ) {
    }

    /// The handle moved relative to the track center
    fn on_handle_moved(&self, _side: Side, _offset: HandleOffset, _animation: Option<Duration>) {}

    /// The stick's track radius or Y inversion changed at runtime
    fn on_stick_configured(&self, _side: Side, _radius: f32, _invert_y_axis: bool) {}
}

/// Owned form of every listener callback
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    ValueChanged {
        side: Side,
        value: AxisValue,
    },
    QuickTap {
        side: Side,
    },
    NormalTap {
        side: Side,
    },
    VisibilityChanged {
        side: Side,
        visible: bool,
        placement: Option<Point>,
        animation_ms: u64,
    },
    HandleMoved {
        side: Side,
        offset: HandleOffset,
        animation_ms: Option<u64>,
    },
    StickConfigured {
        side: Side,
        radius: f32,
        invert_y_axis: bool,
    },
}

impl HostEvent {
    pub fn side(&self) -> Side {
        match self {
            HostEvent::ValueChanged { side, .. }
            | HostEvent::QuickTap { side }
            | HostEvent::NormalTap { side }
            | HostEvent::VisibilityChanged { side, .. }
            | HostEvent::HandleMoved { side, .. }
            | HostEvent::StickConfigured { side, .. } => *side,
        }
    }
}

/// Forwards every callback as a [`HostEvent`] over a crossbeam channel
///
/// Used by the pad window (which polls from the UI thread) and by tests.
pub struct ChannelListener {
    tx: crossbeam::channel::Sender<HostEvent>,
}

impl ChannelListener {
    pub fn new(tx: crossbeam::channel::Sender<HostEvent>) -> Self {
        Self { tx }
    }

    /// Listener plus the receiving end of an unbounded channel
    pub fn unbounded() -> (Self, crossbeam::channel::Receiver<HostEvent>) {
        let (tx, rx) = crossbeam::channel::unbounded();
        (Self::new(tx), rx)
    }

    fn send(&self, event: HostEvent) {
        // Receiver gone means nobody is listening anymore
        let _ = self.tx.send(event);
    }
}

impl HostListener for ChannelListener {
    fn on_value_changed(&self, side: Side, value: AxisValue) {
        self.send(HostEvent::ValueChanged { side, value });
    }

    fn on_quick_tap(&self, side: Side) {
        self.send(HostEvent::QuickTap { side });
    }

    fn on_normal_tap(&self, side: Side) {
        self.send(HostEvent::NormalTap { side });
    }

    fn on_visibility_changed(
        &self,
        side: Side,
        visible: bool,
        placement: Option<Point>,
        animation: Duration,
    ) {
        self.send(HostEvent::VisibilityChanged {
            side,
            visible,
            placement,
            animation_ms: animation.as_millis() as u64,
        });
    }

    fn on_handle_moved(&self, side: Side, offset: HandleOffset, animation: Option<Duration>) {
        self.send(HostEvent::HandleMoved {
            side,
            offset,
            animation_ms: animation.map(|a| a.as_millis() as u64),
        });
    }

    fn on_stick_configured(&self, side: Side, radius: f32, invert_y_axis: bool) {
        self.send(HostEvent::StickConfigured {
            side,
            radius,
            invert_y_axis,
        });
    }
}

/// Prints notifications to stdout, colored or as JSON lines
pub struct ConsoleListener {
    json: bool,
}

impl ConsoleListener {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn print(&self, event: HostEvent) {
        if self.json {
            match serde_json::to_string(&event) {
                Ok(line) => println!("{}", line),
                Err(e) => tracing::warn!("Failed to serialize event: {}", e),
            }
            return;
        }

        let stamp = chrono::Local::now().format("%H:%M:%S%.3f").to_string();
        let side = match event.side() {
            Side::Left => "L".blue().bold(),
            Side::Right => "R".magenta().bold(),
        };
        let body = match event {
            HostEvent::ValueChanged { value, .. } => {
                format!("value {:>5.2}, {:>5.2}", value.x, value.y).normal()
            }
            HostEvent::QuickTap { .. } => "quick tap".yellow().bold(),
            HostEvent::NormalTap { .. } => "tap".green(),
            HostEvent::VisibilityChanged { visible: true, placement, .. } => {
                let at = placement.unwrap_or_default();
                format!("shown at ({:.1}, {:.1})", at.x, at.y).cyan()
            }
            HostEvent::VisibilityChanged { visible: false, .. } => "hidden".dimmed(),
            HostEvent::StickConfigured {
                radius,
                invert_y_axis,
                ..
            } => format!(
                "radius {:.0}{}",
                radius,
                if invert_y_axis { ", Y inverted" } else { "" }
            )
            .blue(),
            // Handle placement is noise on a console
            HostEvent::HandleMoved { .. } => return,
        };
        println!("{} {} {}", stamp.dimmed(), side, body);
    }
}

impl HostListener for ConsoleListener {
    fn on_value_changed(&self, side: Side, value: AxisValue) {
        self.print(HostEvent::ValueChanged { side, value });
    }

    fn on_quick_tap(&self, side: Side) {
        self.print(HostEvent::QuickTap { side });
    }

    fn on_normal_tap(&self, side: Side) {
        self.print(HostEvent::NormalTap { side });
    }

    fn on_visibility_changed(
        &self,
        side: Side,
        visible: bool,
        placement: Option<Point>,
        animation: Duration,
    ) {
        self.print(HostEvent::VisibilityChanged {
            side,
            visible,
            placement,
            animation_ms: animation.as_millis() as u64,
        });
    }

    fn on_stick_configured(&self, side: Side, radius: f32, invert_y_axis: bool) {
        self.print(HostEvent::StickConfigured {
            side,
            radius,
            invert_y_axis,
        });
    }
}

/// Delivers every callback to several listeners in order
pub struct FanoutListener {
    listeners: Vec<std::sync::Arc<dyn HostListener>>,
}

impl FanoutListener {
    pub fn new(listeners: Vec<std::sync::Arc<dyn HostListener>>) -> Self {
        Self { listeners }
    }
}

impl HostListener for FanoutListener {
    fn on_value_changed(&self, side: Side, value: AxisValue) {
        self.listeners.iter().for_each(|l| l.on_value_changed(side, value));
    }

    fn on_quick_tap(&self, side: Side) {
        self.listeners.iter().for_each(|l| l.on_quick_tap(side));
    }

    fn on_normal_tap(&self, side: Side) {
        self.listeners.iter().for_each(|l| l.on_normal_tap(side));
    }

    fn on_visibility_changed(
        &self,
        side: Side,
        visible: bool,
        placement: Option<Point>,
        animation: Duration,
    ) {
        self.listeners
            .iter()
            .for_each(|l| l.on_visibility_changed(side, visible, placement, animation));
    }

    fn on_handle_moved(&self, side: Side, offset: HandleOffset, animation: Option<Duration>) {
        self.listeners
            .iter()
            .for_each(|l| l.on_handle_moved(side, offset, animation));
    }

    fn on_stick_configured(&self, side: Side, radius: f32, invert_y_axis: bool) {
        self.listeners
            .iter()
            .for_each(|l| l.on_stick_configured(side, radius, invert_y_axis));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_listener_forwards() {
        let (listener, rx) = ChannelListener::unbounded();
        listener.on_value_changed(Side::Left, AxisValue::new(0.5, -0.5));
        listener.on_quick_tap(Side::Right);

        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(
            events,
            vec![
                HostEvent::ValueChanged { side: Side::Left, value: AxisValue::new(0.5, -0.5) },
                HostEvent::QuickTap { side: Side::Right },
            ]
        );
    }

    #[test]
    fn test_event_json_shape() {
        let event = HostEvent::QuickTap { side: Side::Left };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json, serde_json::json!({ "event": "quick_tap", "side": "left" }));
    }

    #[test]
    fn test_fanout_reaches_all() {
        let (a, rx_a) = ChannelListener::unbounded();
        let (b, rx_b) = ChannelListener::unbounded();
        let fan = FanoutListener::new(vec![std::sync::Arc::new(a), std::sync::Arc::new(b)]);
        fan.on_normal_tap(Side::Right);
        fan.on_stick_configured(Side::Left, 40.0, true);
        assert_eq!(rx_a.try_iter().count(), 2);
        let configured = HostEvent::StickConfigured {
            side: Side::Left,
            radius: 40.0,
            invert_y_axis: true,
        };
        assert_eq!(rx_b.try_iter().last(), Some(configured));
    }
}
