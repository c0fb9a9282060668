use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2};

use crate::network::{NetworkState, Session};

use super::super::{AddLatch, RenderGraph, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(published: Arc<NetworkState>, cooldown: Duration) -> Self {
        Self {
            published,
            search: String::new(),
            search_matches: HashSet::new(),
            hovered: None,
            selected: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            live_physics: true,
            show_cloud: true,
            graph: RenderGraph::default(),
            cloud: Vec::new(),
            add_latch: AddLatch::new(cooldown),
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, session: &mut Session) {
        self.sync_published(session.state());

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, session));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        let canvas = egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
        let canvas_rect = canvas.response.rect;
        session.resize(canvas_rect.width(), canvas_rect.height());
    }
}
