//! Drawing primitives for the pad window

use egui::{Color32, Painter, Pos2, Stroke};

use crate::input::geometry::AxisValue;

pub const TRACK_FILL: Color32 = Color32::from_gray(30);
pub const TRACK_EDGE: Color32 = Color32::from_gray(100);

/// Scale a color's alpha by `alpha` in `0..=1`
pub fn faded(color: Color32, alpha: f32) -> Color32 {
    color.gamma_multiply(alpha.clamp(0.0, 1.0))
}

pub fn draw_crosshair(painter: &Painter, center: Pos2, size: f32, color: Color32) {
    let stroke = Stroke::new(1.0, color);
    painter.line_segment(
        [egui::pos2(center.x - size, center.y), egui::pos2(center.x + size, center.y)],
        stroke,
    );
    painter.line_segment(
        [egui::pos2(center.x, center.y - size), egui::pos2(center.x, center.y + size)],
        stroke,
    );
}

/// Vertical dashed line splitting the two halves
pub fn draw_midline(painter: &Painter, rect: egui::Rect) {
    let x = rect.center().x;
    let dash = 8.0;
    let mut y = rect.top();
    while y < rect.bottom() {
        painter.line_segment(
            [egui::pos2(x, y), egui::pos2(x, (y + dash).min(rect.bottom()))],
            Stroke::new(1.0, Color32::from_gray(60)),
        );
        y += dash * 2.0;
    }
}

/// The stick's square bounding box with its inscribed circle
pub fn draw_track(painter: &Painter, center: Pos2, radius: f32, alpha: f32) {
    let rect = egui::Rect::from_center_size(center, egui::vec2(radius * 2.0, radius * 2.0));
    painter.rect_filled(rect, 4.0, faded(TRACK_FILL, alpha));
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, faded(TRACK_EDGE, alpha)));
    painter.circle_stroke(
        center,
        radius,
        Stroke::new(1.0, faded(Color32::from_rgb(80, 80, 120), alpha)),
    );
    draw_crosshair(painter, center, 4.0, faded(Color32::from_gray(60), alpha));
}

/// The draggable knob
pub fn draw_handle(painter: &Painter, pos: Pos2, radius: f32, color: Color32, alpha: f32) {
    let knob = (radius * 0.35).max(8.0);
    painter.circle_filled(pos, knob, faded(color.gamma_multiply(0.6), alpha));
    painter.circle_stroke(pos, knob, Stroke::new(2.0, faded(color, alpha)));
}

/// Value history drawn inside the track. Output Y is up, screen Y is down.
pub fn draw_trail<'a>(
    painter: &Painter,
    center: Pos2,
    radius: f32,
    points: impl Iterator<Item = &'a AxisValue>,
    color: Color32,
) {
    let screen: Vec<Pos2> = points
        .map(|v| egui::pos2(center.x + v.x * radius, center.y - v.y * radius))
        .collect();
    if screen.len() < 2 {
        return;
    }
    painter.add(egui::Shape::line(screen, Stroke::new(1.5, color)));
}

/// Green at full deflection, amber while moving, gray near rest
pub fn magnitude_color(magnitude: f32) -> Color32 {
    if magnitude > 0.95 {
        Color32::from_rgb(100, 255, 100)
    } else if magnitude > 0.1 {
        Color32::from_rgb(255, 200, 100)
    } else {
        Color32::from_gray(150)
    }
}
