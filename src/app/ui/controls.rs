use std::time::Instant;

use eframe::egui::{self, Align, Layout, Ui};

use crate::network::Session;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_top_bar(&mut self, ui: &mut Ui, session: &mut Session) {
        ui.horizontal(|ui| {
            ui.heading("The Social Network");
            ui.separator();

            let now = Instant::now();
            let can_add = !session.is_adding() && !self.add_latch.is_cooling_down(now);
            let add_button = ui
                .add_enabled(can_add, egui::Button::new("Add"))
                .on_hover_text("Sample another batch of follows.");
            if add_button.clicked() && self.add_latch.try_trigger(now) {
                session.request_add();
            }
            if self.add_latch.is_cooling_down(now) {
                ui.ctx().request_repaint_after(std::time::Duration::from_millis(100));
            }

            let clear_button = ui
                .button("Clear")
                .on_hover_text("Forget every sampled person, follow and tag.");
            if clear_button.clicked() {
                session.clear();
                self.sync_published(session.state());
            }

            if session.is_adding() {
                ui.spinner();
            }

            ui.separator();
            let search_response = ui.add(
                egui::TextEdit::singleline(&mut self.search)
                    .hint_text("Search tags")
                    .desired_width(180.0),
            );
            if search_response.changed() {
                self.refresh_search();
            }
            if !self.search.trim().is_empty() {
                ui.label(format!("{} matching", self.search_matches.len()));
            }

            ui.separator();
            ui.checkbox(&mut self.live_physics, "Live physics");
            ui.checkbox(&mut self.show_cloud, "Word cloud");

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let viewport = session.viewport();
                ui.label(format!(
                    "people: {}  follows: {}  tags: {}  canvas: {:.0}x{:.0} @ ({:.0}, {:.0})",
                    self.published.people.len(),
                    self.published.follows.len(),
                    self.published.tag_frequencies.len(),
                    viewport.width,
                    viewport.height,
                    viewport.center.0,
                    viewport.center.1
                ));
            });
        });
    }
}
