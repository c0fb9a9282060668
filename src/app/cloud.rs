use std::collections::HashSet;

use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Vec2};

use super::ViewModel;
use super::render_utils::{cloud_font_size, dim_color, world_to_screen};

/// Screen anchor and font size of a cloud word under the current pan and zoom.
fn word_placement(rect: Rect, pan: Vec2, zoom: f32, world: Vec2, count: usize) -> (Pos2, f32) {
    let position = world_to_screen(rect, pan, zoom, world);
    let font_size = (cloud_font_size(count) * zoom).clamp(4.0, 160.0);
    (position, font_size)
}

impl ViewModel {
    /// Draws tag frequencies behind the graph, panned and zoomed with it.
    ///
    /// Words whose key is in `focus_tags` stay at full strength while the rest
    /// fade.
    pub(super) fn draw_cloud(&self, painter: &Painter, rect: Rect, focus_tags: &HashSet<String>) {
        for word in &self.cloud {
            let (position, font_size) =
                word_placement(rect, self.pan, self.zoom, word.world_pos, word.count);
            if !rect.contains(position) {
                continue;
            }

            let color = if focus_tags.is_empty() {
                Color32::from_rgba_unmultiplied(word.color.r(), word.color.g(), word.color.b(), 150)
            } else if focus_tags.contains(&word.key) {
                word.color
            } else {
                dim_color(word.color, 0.3)
            };

            painter.text(
                position,
                Align2::CENTER_CENTER,
                &word.tag,
                FontId::proportional(font_size),
                color,
            );
        }
    }
}
