use std::collections::HashSet;

use eframe::egui::{self, Align2, Color32, FontId, Pos2, Sense, Stroke, Ui, vec2};

use crate::network::tag_key;

use super::super::physics::{step_cloud, step_graph};
use super::super::render_utils::{
    blend_color, circle_visible, dim_color, draw_background, person_radius, world_to_screen,
};
use super::super::{PhysicsConfig, ViewModel};

const FOCUS_COLOR: Color32 = Color32::from_rgb(226, 112, 64);
const MATCH_COLOR: Color32 = Color32::from_rgb(40, 120, 210);

impl ViewModel {
    fn physics_config(ui: &Ui) -> PhysicsConfig {
        let delta_seconds = ui
            .ctx()
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);

        PhysicsConfig {
            repulsion: 1.0,
            spring: 1.0,
            collision: 1.0,
            velocity_damping: 0.88,
            delta_seconds,
        }
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan);

        self.handle_graph_zoom(ui, rect, &response);
        self.handle_graph_pan(&response);

        if self.live_physics {
            let config = Self::physics_config(ui);
            let graph_moving = step_graph(&mut self.graph, config);
            let cloud_moving = self.show_cloud && step_cloud(&mut self.cloud, config);
            if graph_moving || cloud_moving || response.dragged() {
                ui.ctx().request_repaint();
            }
        }

        let pan = self.pan;
        let zoom = self.zoom;
        let screen_positions = self
            .graph
            .nodes
            .iter()
            .map(|node| world_to_screen(rect, pan, zoom, node.world_pos))
            .collect::<Vec<Pos2>>();
        let screen_radii = self
            .graph
            .nodes
            .iter()
            .map(|node| person_radius(node.radius, zoom))
            .collect::<Vec<f32>>();

        let hovered_index = Self::hovered_index(ui, rect, &screen_positions, &screen_radii);
        self.hovered = hovered_index.map(|index| self.graph.nodes[index].id);
        if hovered_index.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
        if response.clicked_by(egui::PointerButton::Primary) {
            self.selected = self.hovered;
        }

        let focus = self.hovered.or(self.selected);
        let neighbors = focus
            .map(|id| self.published.people.neighbors(id))
            .unwrap_or_default();
        let focus_tags = focus
            .and_then(|id| self.published.people.get(id))
            .map(|person| person.tags.iter().map(tag_key).collect::<HashSet<_>>())
            .unwrap_or_default();
        let search_active = !self.search_matches.is_empty();

        if self.show_cloud {
            self.draw_cloud(&painter, rect, &focus_tags);
        }

        let zoom_sqrt = zoom.sqrt();
        for &(from, to) in &self.graph.edges {
            let source_id = self.graph.nodes[from].id;
            let target_id = self.graph.nodes[to].id;
            let highlighted = focus.is_some_and(|id| id == source_id || id == target_id);

            let (width, color) = if highlighted {
                ((1.8 * zoom_sqrt).clamp(1.0, 3.5), FOCUS_COLOR)
            } else if focus.is_some() {
                (
                    (0.8 * zoom_sqrt).clamp(0.5, 2.0),
                    Color32::from_rgba_unmultiplied(90, 90, 90, 50),
                )
            } else {
                (
                    (1.0 * zoom_sqrt).clamp(0.6, 2.4),
                    Color32::from_rgba_unmultiplied(80, 80, 80, 120),
                )
            };
            painter.line_segment(
                [screen_positions[from], screen_positions[to]],
                Stroke::new(width, color),
            );
        }

        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = screen_positions[index];
            let radius = screen_radii[index];
            if !circle_visible(rect, position, radius) {
                continue;
            }

            let is_focus = focus == Some(node.id);
            let is_neighbor = neighbors.contains(&node.id);
            let is_match = self.search_matches.contains(&node.id);

            let color = if is_focus {
                blend_color(node.color, FOCUS_COLOR, 0.55)
            } else if is_neighbor || is_match {
                node.color
            } else if focus.is_some() || search_active {
                dim_color(node.color, 0.45)
            } else {
                node.color
            };
            painter.circle_filled(position, radius, color);

            let (stroke_width, stroke_color) = if is_match {
                (2.0, MATCH_COLOR)
            } else if is_focus {
                (2.0, Color32::from_rgba_unmultiplied(30, 30, 30, 220))
            } else {
                (1.0, Color32::from_rgba_unmultiplied(30, 30, 30, 170))
            };
            painter.circle_stroke(position, radius, Stroke::new(stroke_width, stroke_color));

            if is_focus || (is_neighbor && zoom > 0.8) || zoom > 2.2 {
                painter.text(
                    position + vec2(radius + 4.0, 0.0),
                    Align2::LEFT_CENTER,
                    format!("#{}", node.id),
                    FontId::proportional(12.0),
                    Color32::from_gray(40),
                );
            }
        }

        if let Some(person) = self.hovered.and_then(|id| self.published.people.get(id)) {
            let tags = person.tags.iter().collect::<Vec<_>>().join(", ");
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "#{}  |  following {}  |  followed by {}  |  {}",
                    person.id,
                    person.following.len(),
                    person.followed.len(),
                    if tags.is_empty() { "no tags" } else { tags.as_str() }
                ),
                FontId::proportional(13.0),
                Color32::from_gray(30),
            );
        }

        if self.graph.nodes.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No people sampled yet. Press Add.",
                FontId::proportional(16.0),
                Color32::from_gray(110),
            );
        }
    }
}
