use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

use crate::network::DisplayColor;

pub(super) fn display_color(color: DisplayColor) -> Color32 {
    Color32::from_rgb(color.r, color.g, color.b)
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.35 + (factor * 0.65))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(246, 244, 239));

    let center = rect.center() + pan;
    let guide = Stroke::new(1.0, Color32::from_rgba_unmultiplied(180, 176, 168, 60));
    painter.line_segment(
        [Pos2::new(rect.left(), center.y), Pos2::new(rect.right(), center.y)],
        guide,
    );
    painter.line_segment(
        [Pos2::new(center.x, rect.top()), Pos2::new(center.x, rect.bottom())],
        guide,
    );
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

pub(super) fn world_to_screen(rect: Rect, pan: Vec2, zoom: f32, world: Vec2) -> Pos2 {
    rect.center() + pan + world * zoom
}

pub(super) fn screen_to_world(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.center() - pan) / zoom
}

/// On-screen radius of a person circle.
pub(super) fn person_radius(radius: f32, zoom: f32) -> f32 {
    (radius * 1.8 * zoom.powf(0.6)).clamp(2.5, 40.0)
}

/// Word cloud font size: six points per occurrence.
pub(super) fn cloud_font_size(count: usize) -> f32 {
    (count as f32 * 6.0).clamp(9.0, 96.0)
}

/// Half extent of a cloud word, used as its collision radius.
pub(super) fn cloud_word_radius(tag: &str, count: usize) -> f32 {
    let font_size = cloud_font_size(count);
    let half_width = tag.chars().count() as f32 * font_size * 0.28;
    half_width.max(font_size * 0.5)
}
