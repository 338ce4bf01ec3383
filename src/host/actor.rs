//! HostActor - owns both sticks, their gates and every timer
//!
//! All state lives in this one task and is touched only while handling a
//! command, so the two sides need no locks. Timers are tokio tasks that post
//! a [`HostCommand::TimerFired`] back to the actor; every slot is cancelled
//! before it is rescheduled, and a firing whose epoch is no longer current is
//! dropped (it may have been queued just before the cancel).
//!
//! ```text
//!  pointer / config / snapshot ──► cmd_rx ──► HostActor ──► HostListener
//!                                    ▲            │
//!                                    └─ TimerFired ◄┘ (TaskSlot sleeps)
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use super::commands::{HostCommand, TimerKind};
use super::handle::HostHandle;
use super::listener::HostListener;
use super::readout::{HostSnapshot, SideSnapshot};
use super::{PointerEvent, PointerPhase, Side};
use crate::config::{AppConfig, HostConfig};
use crate::input::geometry::{Point, Size};
use crate::input::gate::{Countdown, QuickTapGate, TapKind};
use crate::input::stick::{StickConfig, StickControl, StickUpdate};
use crate::timer::TaskSlot;

type WeakSender = mpsc::WeakUnboundedSender<HostCommand>;

/// Everything belonging to one half of the screen
struct SideState {
    stick: StickControl,
    gate: QuickTapGate,
    visible: bool,
    /// Screen position of the track center while shown
    placement: Option<Point>,
    /// Pointer currently driving this side
    pointer: Option<u64>,
    /// Stick epoch of the pending hold-mode return
    pending_return: Option<u64>,
    return_timer: TaskSlot,
    hide_timer: TaskSlot,
    gate_timer: TaskSlot,
}

impl SideState {
    fn new(stick: StickConfig, gate: QuickTapGate) -> Self {
        Self {
            stick: StickControl::new(stick),
            gate,
            visible: false,
            placement: None,
            pointer: None,
            pending_return: None,
            return_timer: TaskSlot::new(),
            hide_timer: TaskSlot::new(),
            gate_timer: TaskSlot::new(),
        }
    }

    fn timer(&mut self, kind: TimerKind) -> &mut TaskSlot {
        match kind {
            TimerKind::Return => &mut self.return_timer,
            TimerKind::Hide => &mut self.hide_timer,
            TimerKind::GateTick => &mut self.gate_timer,
        }
    }

    fn cancel_all(&mut self) {
        self.return_timer.cancel_and_clear();
        self.hide_timer.cancel_and_clear();
        self.gate_timer.cancel_and_clear();
    }

    /// Screen point to stick-local coordinates (origin at the track's top-left)
    fn to_local(&self, screen: Point) -> Point {
        let center = self.placement.unwrap_or(screen);
        let r = self.stick.radius();
        Point::new(screen.x - center.x + r, screen.y - center.y + r)
    }

    fn snapshot(&self, side: Side) -> SideSnapshot {
        SideSnapshot {
            side,
            value: self.stick.value(),
            phase: self.stick.phase(),
            visible: self.visible,
            placement: self.placement,
            invert_y_axis: self.stick.invert_y_axis(),
            gate_open: self.gate.is_open(),
            gate_remaining_ms: self.gate.remaining().as_millis() as u64,
            pointer: self.pointer,
        }
    }
}

/// Actor driving the two floating sticks
pub struct HostActor {
    screen: Size,
    host: HostConfig,
    gate_tick: Duration,
    left: SideState,
    right: SideState,
    /// Which side each live pointer belongs to
    pointers: HashMap<u64, Side>,
    listener: Arc<dyn HostListener>,
    cmd_rx: mpsc::UnboundedReceiver<HostCommand>,
    /// Weak so the actor stops once every handle is dropped
    cmd_tx: WeakSender,
}

impl HostActor {
    /// Spawn the actor on the current runtime and return its handle
    pub fn spawn(config: &AppConfig, listener: Arc<dyn HostListener>) -> HostHandle {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let actor = Self::new(config, listener, cmd_rx, cmd_tx.downgrade());
        tokio::spawn(actor.run());
        HostHandle::new(cmd_tx)
    }

    fn new(
        config: &AppConfig,
        listener: Arc<dyn HostListener>,
        cmd_rx: mpsc::UnboundedReceiver<HostCommand>,
        cmd_tx: WeakSender,
    ) -> Self {
        Self {
            screen: config.screen.size(),
            host: config.host.clone(),
            gate_tick: Duration::from_millis(config.gate.tick_ms.max(1)),
            left: SideState::new(config.sticks.left.clone(), QuickTapGate::from_config(&config.gate)),
            right: SideState::new(config.sticks.right.clone(), QuickTapGate::from_config(&config.gate)),
            pointers: HashMap::new(),
            listener,
            cmd_rx,
            cmd_tx,
        }
    }

    async fn run(mut self) {
        info!(
            "Host started ({}x{}, hide after {} ms)",
            self.screen.width, self.screen.height, self.host.hide_delay_ms
        );

        while let Some(cmd) = self.cmd_rx.recv().await {
            if !self.handle(cmd) {
                break;
            }
        }

        self.left.cancel_all();
        self.right.cancel_all();
        info!("Host stopped");
    }

    /// Process one command. Returns false when the actor should stop.
    fn handle(&mut self, cmd: HostCommand) -> bool {
        match cmd {
            HostCommand::Pointer(event) => self.on_pointer(event),
            HostCommand::TimerFired { side, kind, epoch } => self.on_timer(side, kind, epoch),
            HostCommand::SetInvertY { side, invert } => {
                debug!("{} stick invert_y_axis = {}", side, invert);
                self.side_mut(side).stick.set_invert_y_axis(invert);
                self.announce_stick(side);
            }
            HostCommand::Resize(size) => {
                debug!("Screen resized to {}x{}", size.width, size.height);
                self.screen = size;
            }
            HostCommand::ApplyConfig(config) => self.apply_config(*config),
            HostCommand::Snapshot { response } => {
                let _ = response.send(HostSnapshot {
                    left: self.left.snapshot(Side::Left),
                    right: self.right.snapshot(Side::Right),
                });
            }
            HostCommand::Shutdown => {
                debug!("Host shutdown requested");
                return false;
            }
        }
        true
    }

    fn side(&self, side: Side) -> &SideState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    // =========================================================================
    // Pointer routing
    // =========================================================================

    fn on_pointer(&mut self, event: PointerEvent) {
        match event.phase {
            PointerPhase::Down => self.on_down(event.pointer, event.position),
            PointerPhase::Move => self.on_move(event.pointer, event.position),
            PointerPhase::Up | PointerPhase::Cancel => self.on_up(event.pointer, event.phase),
        }
    }

    fn on_down(&mut self, pointer: u64, position: Point) {
        if self.pointers.contains_key(&pointer) {
            trace!("Duplicate down for pointer {}, ignoring", pointer);
            return;
        }

        let side = Side::for_x(position.x, self.screen.width);
        let listener = self.listener.clone();
        let show_animation = Duration::from_millis(self.host.show_animation_ms);
        let state = self.side_mut(side);

        if let Some(owner) = state.pointer {
            debug!("{} half already driven by pointer {}, ignoring {}", side, owner, pointer);
            return;
        }
        state.pointer = Some(pointer);

        // A re-touch beats any pending hide or return
        state.hide_timer.cancel_and_clear();
        state.return_timer.cancel_and_clear();
        state.pending_return = None;

        if !state.visible {
            state.visible = true;
            state.placement = Some(position);
            debug!("{} stick shown at ({:.1}, {:.1})", side, position.x, position.y);
            listener.on_visibility_changed(side, true, Some(position), show_animation);
        }

        let local = state.to_local(position);
        let update = state.stick.pointer_down(local);
        let tap = state.gate.engaged();

        self.pointers.insert(pointer, side);
        emit(listener.as_ref(), side, update);

        match tap {
            TapKind::Quick => {
                debug!("{} quick tap", side);
                // The window restarted; restart the countdown with it
                self.start_gate_countdown(side);
                listener.on_quick_tap(side);
            }
            TapKind::Normal => {
                debug!("{} tap", side);
                listener.on_normal_tap(side);
            }
        }
    }

    fn on_move(&mut self, pointer: u64, position: Point) {
        let Some(&side) = self.pointers.get(&pointer) else {
            return;
        };
        let listener = self.listener.clone();
        let state = self.side_mut(side);

        let local = state.to_local(position);
        if let Some(update) = state.stick.pointer_move(local) {
            trace!("{} value {:.3}, {:.3}", side, update.value.x, update.value.y);
            emit(listener.as_ref(), side, update);
        }
    }

    fn on_up(&mut self, pointer: u64, phase: PointerPhase) {
        let Some(side) = self.pointers.remove(&pointer) else {
            return;
        };
        let listener = self.listener.clone();
        let tx = self.cmd_tx.clone();
        let hide_delay = Duration::from_millis(self.host.hide_delay_ms);
        let state = self.side_mut(side);
        state.pointer = None;

        debug!("{} released ({:?})", side, phase);

        if let Some(release) = state.stick.pointer_up() {
            emit(listener.as_ref(), side, release.update);
            if let Some(plan) = release.plan {
                state.pending_return = Some(plan.epoch);
                schedule_once(&mut state.return_timer, &tx, side, TimerKind::Return, plan.delay);
            }
        }

        let countdown = state.gate.dismissed();
        schedule_once(&mut state.hide_timer, &tx, side, TimerKind::Hide, hide_delay);

        if countdown == Countdown::Start {
            self.start_gate_countdown(side);
        }
    }

    fn start_gate_countdown(&mut self, side: Side) {
        let tx = self.cmd_tx.clone();
        let period = self.gate_tick;
        let state = self.side_mut(side);

        let epoch = schedule_repeating(&mut state.gate_timer, &tx, side, period);
        trace!("{} gate countdown started (epoch {})", side, epoch);
    }

    // =========================================================================
    // Timers
    // =========================================================================

    fn on_timer(&mut self, side: Side, kind: TimerKind, epoch: u64) {
        let listener = self.listener.clone();
        let hide_animation = Duration::from_millis(self.host.hide_animation_ms);
        let tick = self.gate_tick;
        let state = self.side_mut(side);

        if !state.timer(kind).is_current(epoch) {
            trace!("Dropping stale {:?} timer for {} (epoch {})", kind, side, epoch);
            return;
        }

        match kind {
            TimerKind::Return => {
                state.return_timer.clear();
                if let Some(stick_epoch) = state.pending_return.take() {
                    if let Some(update) = state.stick.complete_return(stick_epoch) {
                        debug!("{} returned to center", side);
                        emit(listener.as_ref(), side, update);
                    }
                }
            }
            TimerKind::Hide => {
                state.hide_timer.clear();
                if state.pointer.is_some() || !state.visible {
                    return;
                }
                state.visible = false;
                state.placement = None;
                debug!("{} stick hidden", side);
                listener.on_visibility_changed(side, false, None, hide_animation);
            }
            TimerKind::GateTick => {
                if state.gate.tick(tick) == Countdown::Stop {
                    state.gate_timer.cancel_and_clear();
                    trace!("{} gate closed", side);
                }
            }
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    fn apply_config(&mut self, config: AppConfig) {
        if let Err(e) = config.validate() {
            warn!("Ignoring invalid configuration: {:#}", e);
            return;
        }

        self.screen = config.screen.size();
        self.host = config.host.clone();
        let tick = Duration::from_millis(config.gate.tick_ms.max(1));
        let tick_changed = tick != self.gate_tick;
        self.gate_tick = tick;

        for side in Side::BOTH {
            let wanted = config.sticks.get(side).clone();

            let state = self.side_mut(side);
            if state.gate.window() != Duration::from_millis(config.gate.window_ms) {
                state.gate_timer.cancel_and_clear();
                state.gate = QuickTapGate::from_config(&config.gate);
            } else if tick_changed && state.gate.is_open() {
                // Running countdown still fires at the old period
                self.start_gate_countdown(side);
                debug!("{} gate countdown now ticks every {:?}", side, tick);
            }

            let state = self.side_mut(side);

            if *state.stick.config() == wanted {
                continue;
            }

            let idle = state.pointer.is_none() && state.pending_return.is_none();
            if idle {
                state.stick = StickControl::new(wanted);
                info!("{} stick reconfigured", side);
            } else {
                // Geometry can't change under a finger; only the inversion flips live
                state.stick.set_invert_y_axis(wanted.invert_y_axis);
                warn!("{} stick busy, applied invert_y_axis only", side);
            }
            self.announce_stick(side);
        }
    }

    fn announce_stick(&self, side: Side) {
        let stick = &self.side(side).stick;
        self.listener
            .on_stick_configured(side, stick.radius(), stick.invert_y_axis());
    }
}

fn emit(listener: &dyn HostListener, side: Side, update: StickUpdate) {
    listener.on_handle_moved(side, update.handle, update.animation);
    listener.on_value_changed(side, update.value);
}

fn schedule_once(slot: &mut TaskSlot, tx: &WeakSender, side: Side, kind: TimerKind, delay: Duration) -> u64 {
    let tx = tx.clone();
    slot.schedule_once(delay, move |epoch| async move {
        if let Some(tx) = tx.upgrade() {
            let _ = tx.send(HostCommand::TimerFired { side, kind, epoch });
        }
    })
}

fn schedule_repeating(slot: &mut TaskSlot, tx: &WeakSender, side: Side, period: Duration) -> u64 {
    let tx = tx.clone();
    slot.schedule_repeating(period, move |epoch| {
        let tx = tx.clone();
        async move {
            match tx.upgrade() {
                Some(tx) => tx
                    .send(HostCommand::TimerFired {
                        side,
                        kind: TimerKind::GateTick,
                        epoch,
                    })
                    .is_ok(),
                None => false,
            }
        }
    })
}
