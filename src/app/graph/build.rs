use std::collections::HashMap;
use std::sync::Arc;

use eframe::egui::{Vec2, vec2};

use crate::network::{NetworkState, Person, people_matching};
use crate::util::stable_pair;

use super::super::render_utils::display_color;
use super::super::{CloudWord, RenderGraph, RenderNode, ViewModel};

fn jitter(key: u64, spread: f32) -> Vec2 {
    let (jx, jy) = stable_pair(key);
    vec2(jx, jy) * spread
}

impl RenderGraph {
    /// Where a newly sampled person first appears: next to an already placed
    /// neighbor if there is one, otherwise near the origin.
    fn spawn_position(&self, person: &Person) -> Vec2 {
        person
            .following
            .iter()
            .chain(&person.followed)
            .find_map(|id| self.index_by_id.get(id))
            .map(|&index| self.nodes[index].world_pos + jitter(person.id, 24.0))
            .unwrap_or_else(|| jitter(person.id, 120.0))
    }

    fn sync_people(&mut self, state: &NetworkState) {
        for person in state.people.values() {
            if let Some(&index) = self.index_by_id.get(&person.id) {
                self.nodes[index].radius = person.radius;
                continue;
            }

            let world_pos = self.spawn_position(person);
            self.index_by_id.insert(person.id, self.nodes.len());
            self.nodes.push(RenderNode {
                id: person.id,
                world_pos,
                velocity: Vec2::ZERO,
                radius: person.radius,
                color: display_color(person.color),
            });
        }

        let mut edges = state
            .follows
            .iter()
            .filter_map(|follow| {
                let source = *self.index_by_id.get(&follow.source)?;
                let target = *self.index_by_id.get(&follow.target)?;
                (source != target).then_some((source, target))
            })
            .collect::<Vec<_>>();
        edges.sort_unstable();
        edges.dedup();
        self.edges = edges;
    }
}

impl ViewModel {
    /// Brings render caches in line with newly published state, keeping the
    /// positions of everything already on screen.
    pub(in crate::app) fn sync_published(&mut self, state: Arc<NetworkState>) {
        if Arc::ptr_eq(&self.published, &state) {
            return;
        }

        if state.people.is_empty() {
            self.graph = RenderGraph::default();
            self.cloud.clear();
            self.hovered = None;
            self.selected = None;
        } else {
            self.graph.sync_people(&state);
            self.sync_cloud(&state);
        }

        self.search_matches = people_matching(&state.people, &self.search);
        self.published = state;
    }

    fn sync_cloud(&mut self, state: &NetworkState) {
        let mut previous = self
            .cloud
            .drain(..)
            .map(|word| (word.key.clone(), word))
            .collect::<HashMap<_, _>>();

        self.cloud = state
            .tag_frequencies
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let key = entry.key();
                match previous.remove(&key) {
                    Some(mut word) => {
                        word.count = entry.count;
                        word
                    }
                    None => CloudWord {
                        tag: entry.tag.clone(),
                        count: entry.count,
                        color: display_color(entry.color),
                        world_pos: jitter(index as u64 ^ 0x9e37_79b9, 80.0),
                        velocity: Vec2::ZERO,
                        key,
                    },
                }
            })
            .collect();
    }

    pub(in crate::app) fn refresh_search(&mut self) {
        self.search_matches = people_matching(&self.published.people, &self.search);
    }
}
