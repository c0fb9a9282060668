use eframe::egui::{self, RichText, Ui};

use crate::network::{PersonId, tags_matching};

use super::super::ViewModel;
use super::super::render_utils::display_color;

const TOP_TAG_ROWS: usize = 24;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Details");
        ui.add_space(6.0);

        match self.hovered.or(self.selected) {
            Some(id) => self.draw_person(ui, id),
            None => {
                ui.label("Hover or click a person to inspect them.");
            }
        }

        ui.separator();
        self.draw_tag_table(ui);
    }

    fn draw_person(&mut self, ui: &mut Ui, id: PersonId) {
        let Some(person) = self.published.people.get(id) else {
            ui.label("That person is no longer part of the network.");
            return;
        };

        ui.label(RichText::new(format!("Person #{}", person.id)).strong());
        ui.label(format!("Radius: {:.1}", person.radius));
        ui.label(format!("Following: {}", person.following.len()));
        ui.label(format!("Followed by: {}", person.followed.len()));

        ui.add_space(4.0);
        if person.tags.is_empty() {
            ui.label("No tags.");
        } else {
            ui.horizontal_wrapped(|ui| {
                for tag in person.tags.iter() {
                    ui.label(RichText::new(tag).color(display_color(person.color)));
                }
            });
        }

        let mut next_selection = None;
        ui.collapsing("Follows", |ui| {
            for &other in &person.following {
                if ui.link(format!("#{other}")).clicked() {
                    next_selection = Some(other);
                }
            }
        });
        ui.collapsing("Followed by", |ui| {
            for &other in &person.followed {
                if ui.link(format!("#{other}")).clicked() {
                    next_selection = Some(other);
                }
            }
        });

        if next_selection.is_some() {
            self.selected = next_selection;
        }
    }

    fn draw_tag_table(&self, ui: &mut Ui) {
        let query = self.search.trim();
        let rows = if query.is_empty() {
            let mut rows = self.published.tag_frequencies.iter().collect::<Vec<_>>();
            rows.sort_by(|a, b| b.count.cmp(&a.count));
            rows
        } else {
            tags_matching(&self.published.tag_frequencies, query)
        };

        ui.label(RichText::new(if query.is_empty() { "Top tags" } else { "Matching tags" }).strong());
        if rows.is_empty() {
            ui.label("No tags yet.");
            return;
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            egui::Grid::new("tag_table").striped(true).show(ui, |ui| {
                for entry in rows.into_iter().take(TOP_TAG_ROWS) {
                    ui.label(RichText::new(&entry.tag).color(display_color(entry.color)));
                    ui.label(entry.count.to_string());
                    ui.end_row();
                }
            });
        });
    }
}
