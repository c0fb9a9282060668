use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui::{Color32, Context, Vec2};

use crate::network::{NetworkState, PersonId, Session};

mod cloud;
mod graph;
mod physics;
mod render_utils;
mod ui;

pub struct FollowCloudApp {
    session: Session,
    view: ViewModel,
}

struct ViewModel {
    published: Arc<NetworkState>,
    search: String,
    search_matches: HashSet<PersonId>,
    hovered: Option<PersonId>,
    selected: Option<PersonId>,
    pan: Vec2,
    zoom: f32,
    live_physics: bool,
    show_cloud: bool,
    graph: RenderGraph,
    cloud: Vec<CloudWord>,
    add_latch: AddLatch,
}

#[derive(Default)]
struct RenderGraph {
    nodes: Vec<RenderNode>,
    edges: Vec<(usize, usize)>,
    index_by_id: HashMap<PersonId, usize>,
}

struct RenderNode {
    id: PersonId,
    world_pos: Vec2,
    velocity: Vec2,
    radius: f32,
    color: Color32,
}

struct CloudWord {
    key: String,
    tag: String,
    count: usize,
    color: Color32,
    world_pos: Vec2,
    velocity: Vec2,
}

#[derive(Clone, Copy)]
struct PhysicsConfig {
    repulsion: f32,
    spring: f32,
    collision: f32,
    velocity_damping: f32,
    delta_seconds: f32,
}

/// Suppresses repeated Add clicks for a fixed cooldown after each accepted one.
struct AddLatch {
    cooldown: Duration,
    armed_at: Option<Instant>,
}

impl AddLatch {
    fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            armed_at: None,
        }
    }

    fn try_trigger(&mut self, now: Instant) -> bool {
        if self.is_cooling_down(now) {
            return false;
        }
        self.armed_at = Some(now);
        true
    }

    fn is_cooling_down(&self, now: Instant) -> bool {
        self.armed_at
            .is_some_and(|armed_at| now.saturating_duration_since(armed_at) < self.cooldown)
    }
}

impl FollowCloudApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, mut session: Session, cooldown: Duration) -> Self {
        let view = ViewModel::new(session.state(), cooldown);
        session.request_add();
        Self { session, view }
    }
}

impl eframe::App for FollowCloudApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.session.poll();
        if self.session.is_adding() {
            ctx.request_repaint_after(Duration::from_millis(30));
        }

        self.view.show(ctx, &mut self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_blocks_until_cooldown_elapses() {
        let start = Instant::now();
        let mut latch = AddLatch::new(Duration::from_millis(1000));

        assert!(latch.try_trigger(start));
        assert!(!latch.try_trigger(start + Duration::from_millis(10)));
        assert!(!latch.try_trigger(start + Duration::from_millis(999)));
        assert!(latch.try_trigger(start + Duration::from_millis(1000)));
        assert!(!latch.try_trigger(start + Duration::from_millis(1500)));
    }

    #[test]
    fn zero_cooldown_never_blocks() {
        let start = Instant::now();
        let mut latch = AddLatch::new(Duration::ZERO);
        assert!(latch.try_trigger(start));
        assert!(latch.try_trigger(start));
    }
}
