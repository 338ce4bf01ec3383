//! The pad window: feeds mouse and touch input to the host and draws both sticks
//!
//! Input goes straight to the [`HostHandle`]; everything drawn comes back as
//! [`HostEvent`]s, so the window shows exactly what a listener would see.

use crossbeam::channel::Receiver;
use egui::{Align2, Color32, FontId, Pos2};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use super::drawing::{draw_handle, draw_midline, draw_track, draw_trail, faded, magnitude_color};
use super::state::PadState;
use crate::config::AppConfig;
use crate::host::{HostError, HostEvent, HostHandle, PointerEvent, Side};
use crate::input::gate::TapKind;
use crate::input::geometry::{Point, Size};

/// Pointer id used for the mouse; touches are offset past it
const MOUSE_POINTER: u64 = 0;

/// How long a tap label stays on screen
const TAP_FLASH: Duration = Duration::from_millis(600);

pub struct PadApp {
    host: HostHandle,
    events: Receiver<HostEvent>,
    state: PadState,
    mouse_down: bool,
    /// Once real touches arrive, egui's simulated mouse events are ignored
    touch_seen: bool,
    last_size: Option<egui::Vec2>,
}

impl PadApp {
    pub fn new(host: HostHandle, events: Receiver<HostEvent>, config: &AppConfig) -> Self {
        Self {
            host,
            events,
            state: PadState::new(&config.sticks),
            mouse_down: false,
            touch_seen: false,
            last_size: None,
        }
    }

    fn drain_host_events(&mut self) {
        let now = Instant::now();
        for event in self.events.try_iter() {
            self.state.apply(event, now);
        }
    }

    /// Translate this frame's egui input into host pointer events
    fn forward_input(&mut self, ctx: &egui::Context) -> Result<(), HostError> {
        let size = ctx.screen_rect().size();
        if self.last_size != Some(size) {
            self.last_size = Some(size);
            debug!("Pad resized to {}x{}", size.x, size.y);
            self.host.resize(Size::new(size.x, size.y))?;
        }

        let events = ctx.input(|i| i.events.clone());
        for event in events {
            match event {
                egui::Event::Touch { id, phase, pos, .. } => {
                    self.touch_seen = true;
                    let pointer = id.0.wrapping_add(1);
                    let event = match phase {
                        egui::TouchPhase::Start => PointerEvent::down(pointer, pos.x, pos.y),
                        egui::TouchPhase::Move => PointerEvent::moved(pointer, pos.x, pos.y),
                        egui::TouchPhase::End => PointerEvent::up(pointer, pos.x, pos.y),
                        egui::TouchPhase::Cancel => PointerEvent::cancel(pointer),
                    };
                    self.host.pointer(event)?;
                }
                egui::Event::PointerButton {
                    pos,
                    button: egui::PointerButton::Primary,
                    pressed,
                    ..
                } if !self.touch_seen => {
                    self.mouse_down = pressed;
                    let event = if pressed {
                        PointerEvent::down(MOUSE_POINTER, pos.x, pos.y)
                    } else {
                        PointerEvent::up(MOUSE_POINTER, pos.x, pos.y)
                    };
                    self.host.pointer(event)?;
                }
                egui::Event::PointerMoved(pos) if self.mouse_down && !self.touch_seen => {
                    self.host.pointer(PointerEvent::moved(MOUSE_POINTER, pos.x, pos.y))?;
                }
                egui::Event::PointerGone if self.mouse_down => {
                    self.mouse_down = false;
                    self.host.pointer(PointerEvent::cancel(MOUSE_POINTER))?;
                }
                _ => {}
            }
        }

        let (toggle_left, toggle_right, clear) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::L),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::C),
            )
        });
        if clear {
            self.state.clear_trails();
        }
        for (side, pressed) in [(Side::Left, toggle_left), (Side::Right, toggle_right)] {
            if pressed {
                // The host echoes the new flag back as StickConfigured
                let invert = !self.state.side(side).invert_y_axis;
                self.host.set_invert_y_axis(side, invert)?;
            }
        }

        Ok(())
    }

    fn paint_side(&self, ctx: &egui::Context, painter: &egui::Painter, side: Side, half: egui::Rect) {
        let view = self.state.side(side);
        let radius = view.radius;
        let id = egui::Id::new(("stick", side));

        let alpha = ctx.animate_bool_with_time(
            id.with("visible"),
            view.visible,
            view.visibility_animation.as_secs_f32(),
        );

        let accent = match side {
            Side::Left => Color32::from_rgb(100, 150, 255),
            Side::Right => Color32::from_rgb(255, 120, 200),
        };

        if alpha > 0.0 {
            if let Some(at) = view.placement {
                let center = to_pos(at);
                let ease = view.handle_animation.map_or(0.0, |d| d.as_secs_f32());
                let dx = ctx.animate_value_with_time(id.with("dx"), view.handle.dx, ease);
                let dy = ctx.animate_value_with_time(id.with("dy"), view.handle.dy, ease);

                draw_track(painter, center, radius, alpha);
                draw_trail(
                    painter,
                    center,
                    radius,
                    view.trail.iter(),
                    faded(Color32::from_rgba_unmultiplied(100, 255, 100, 100), alpha),
                );
                draw_handle(painter, center + egui::vec2(dx, dy), radius, accent, alpha);
            }
        }

        let readout_color = magnitude_color(view.value.magnitude());
        painter.text(
            half.left_top() + egui::vec2(12.0, 10.0),
            Align2::LEFT_TOP,
            format!("{}  {}", side, view.readout()),
            FontId::monospace(14.0),
            readout_color,
        );

        if let Some((kind, when)) = view.last_tap {
            let age = when.elapsed();
            if age < TAP_FLASH {
                let fade = 1.0 - age.as_secs_f32() / TAP_FLASH.as_secs_f32();
                let (label, color) = match kind {
                    TapKind::Quick => ("QUICK TAP", Color32::from_rgb(255, 220, 80)),
                    TapKind::Normal => ("tap", Color32::from_gray(180)),
                };
                painter.text(
                    half.left_top() + egui::vec2(12.0, 32.0),
                    Align2::LEFT_TOP,
                    label,
                    FontId::proportional(16.0),
                    faded(color, fade),
                );
            }
        }
    }
}

fn to_pos(p: Point) -> Pos2 {
    egui::pos2(p.x, p.y)
}

impl eframe::App for PadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Err(e) = self.forward_input(ctx) {
            warn!("Host is gone ({}), closing pad", e);
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }
        self.drain_host_events();

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(Color32::from_gray(18)))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let painter = ui.painter();

                draw_midline(painter, rect);
                let mid = rect.center().x;
                let left = egui::Rect::from_min_max(rect.min, egui::pos2(mid, rect.max.y));
                let right = egui::Rect::from_min_max(egui::pos2(mid, rect.min.y), rect.max);
                self.paint_side(ctx, painter, Side::Left, left);
                self.paint_side(ctx, painter, Side::Right, right);

                painter.text(
                    rect.center_bottom() - egui::vec2(0.0, 8.0),
                    Align2::CENTER_BOTTOM,
                    "L / R: invert Y    C: clear trails",
                    FontId::proportional(11.0),
                    Color32::from_rgb(150, 150, 200),
                );
            });

        // Timers in the host keep changing things between inputs
        ctx.request_repaint();
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.host.shutdown();
    }
}
