//! What the pad window shows, rebuilt from host events

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::config::SticksConfig;
use crate::host::readout::Readout;
use crate::host::{HostEvent, Side};
use crate::input::gate::TapKind;
use crate::input::geometry::{AxisValue, Point};
use crate::input::stick::{HandleOffset, StickConfig};

/// Recent stick values, oldest first
#[derive(Debug, Clone)]
pub struct Trail {
    points: VecDeque<AxisValue>,
    capacity: usize,
}

impl Trail {
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: AxisValue) {
        if self.points.back() == Some(&value) {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back(value);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AxisValue> {
        self.points.iter()
    }
}

/// One side as last reported by the host
#[derive(Debug, Clone)]
pub struct SideView {
    pub visible: bool,
    /// Last known placement, kept while the hide animation runs
    pub placement: Option<Point>,
    pub value: AxisValue,
    pub handle: HandleOffset,
    /// Animation for the latest handle move (`None` = jump)
    pub handle_animation: Option<Duration>,
    pub visibility_animation: Duration,
    pub last_tap: Option<(TapKind, Instant)>,
    pub trail: Trail,
    pub radius: f32,
    pub invert_y_axis: bool,
}

impl SideView {
    fn new(config: &StickConfig) -> Self {
        Self {
            visible: false,
            placement: None,
            value: AxisValue::CENTER,
            handle: HandleOffset::default(),
            handle_animation: None,
            visibility_animation: Duration::ZERO,
            last_tap: None,
            trail: Trail::new(120),
            radius: config.radius,
            invert_y_axis: config.invert_y_axis,
        }
    }

    pub fn readout(&self) -> Readout {
        Readout {
            placement: if self.visible { self.placement } else { None },
            value: self.value,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PadState {
    left: SideView,
    right: SideView,
    pub events_seen: u64,
}

impl PadState {
    /// Starts from the configured sticks; later changes arrive as events
    pub fn new(sticks: &SticksConfig) -> Self {
        Self {
            left: SideView::new(&sticks.left),
            right: SideView::new(&sticks.right),
            events_seen: 0,
        }
    }

    pub fn side(&self, side: Side) -> &SideView {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideView {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn apply(&mut self, event: HostEvent, now: Instant) {
        self.events_seen += 1;
        let view = self.side_mut(event.side());

        match event {
            HostEvent::ValueChanged { value, .. } => {
                view.value = value;
                view.trail.push(value);
            }
            HostEvent::QuickTap { .. } => view.last_tap = Some((TapKind::Quick, now)),
            HostEvent::NormalTap { .. } => view.last_tap = Some((TapKind::Normal, now)),
            HostEvent::VisibilityChanged {
                visible,
                placement,
                animation_ms,
                ..
            } => {
                view.visible = visible;
                view.visibility_animation = Duration::from_millis(animation_ms);
                if visible {
                    view.placement = placement;
                    view.trail.clear();
                }
            }
            HostEvent::HandleMoved {
                offset,
                animation_ms,
                ..
            } => {
                view.handle = offset;
                view.handle_animation = animation_ms.map(Duration::from_millis);
            }
            HostEvent::StickConfigured {
                radius,
                invert_y_axis,
                ..
            } => {
                view.radius = radius;
                view.invert_y_axis = invert_y_axis;
            }
        }
    }

    pub fn clear_trails(&mut self) {
        self.left.trail.clear();
        self.right.trail.clear();
    }
}
