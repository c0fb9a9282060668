use eframe::egui::{Vec2, vec2};

use super::render_utils::cloud_word_radius;
use super::{CloudWord, PhysicsConfig, RenderGraph};

fn fallback_direction(i: usize, j: usize) -> Vec2 {
    let angle = ((i as f32) * 0.618_034 + (j as f32) * 0.414_214) * std::f32::consts::TAU;
    vec2(angle.cos(), angle.sin())
}

/// Applies `forces` to velocities and positions. Returns whether anything moved.
fn integrate(
    forces: &[Vec2],
    velocities: &mut [Vec2],
    positions: &mut [Vec2],
    config: PhysicsConfig,
) -> bool {
    let time_step_scale = (config.delta_seconds * 60.0).clamp(0.25, 3.0);
    let damping = config
        .velocity_damping
        .clamp(0.7, 0.97)
        .powf(time_step_scale);
    let max_force = 180.0;
    let max_speed = 14.0;

    let mut any_motion = false;
    for ((force, velocity), position) in forces.iter().zip(velocities).zip(positions) {
        let mut force = *force;
        let force_magnitude = force.length();
        if force_magnitude > max_force {
            force = force / force_magnitude * max_force;
        }

        let mut next = (*velocity + (force * (0.055 * time_step_scale))) * damping;
        let speed = next.length();
        if speed > max_speed {
            next = next / speed * max_speed;
        }
        if speed < 0.02 && force_magnitude < 0.08 {
            next = Vec2::ZERO;
        }

        *velocity = next;
        *position += next * time_step_scale;
        any_motion |= next.length_sq() > 0.000_001;
    }

    any_motion
}

/// Charge, collision, follow springs and a pull towards the origin.
pub(super) fn step_graph(graph: &mut RenderGraph, config: PhysicsConfig) -> bool {
    let node_count = graph.nodes.len();
    if node_count == 0 {
        return false;
    }

    let mut forces = vec![Vec2::ZERO; node_count];
    let repulsion_strength = 16_000.0 * config.repulsion.clamp(0.2, 3.0);
    let spring_strength = 0.02 * config.spring.clamp(0.2, 3.0);
    let collision_strength = 1.6 * config.collision.clamp(0.2, 3.0);
    let softening = 400.0;
    let center_pull = 0.004;

    for i in 0..node_count {
        for j in (i + 1)..node_count {
            let delta = graph.nodes[i].world_pos - graph.nodes[j].world_pos;
            let distance_sq = delta.length_sq();
            let distance = distance_sq.sqrt();
            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                fallback_direction(i, j)
            };

            let repulsion = repulsion_strength / (distance_sq + softening);
            forces[i] += direction * repulsion;
            forces[j] -= direction * repulsion;

            let min_distance = (graph.nodes[i].radius + graph.nodes[j].radius) * 2.6;
            if distance < min_distance {
                let overlap_push = (min_distance - distance) * collision_strength;
                forces[i] += direction * overlap_push;
                forces[j] -= direction * overlap_push;
            }
        }
    }

    for &(from, to) in &graph.edges {
        if from >= node_count || to >= node_count || from == to {
            continue;
        }

        let delta = graph.nodes[from].world_pos - graph.nodes[to].world_pos;
        let distance = delta.length();
        if distance <= 0.0001 {
            continue;
        }
        let direction = delta / distance;

        let preferred = 60.0 + (graph.nodes[from].radius + graph.nodes[to].radius) * 4.0;
        let correction = direction * ((distance - preferred) * spring_strength);
        forces[from] -= correction;
        forces[to] += correction;
    }

    for (force, node) in forces.iter_mut().zip(&graph.nodes) {
        *force -= node.world_pos * center_pull;
    }

    let mut velocities = graph.nodes.iter().map(|node| node.velocity).collect::<Vec<_>>();
    let mut positions = graph.nodes.iter().map(|node| node.world_pos).collect::<Vec<_>>();
    let moving = integrate(&forces, &mut velocities, &mut positions, config);
    for ((node, velocity), position) in graph.nodes.iter_mut().zip(velocities).zip(positions) {
        node.velocity = velocity;
        node.world_pos = position;
    }

    moving
}

/// Pulls words to the origin and pushes overlapping words apart.
pub(super) fn step_cloud(words: &mut [CloudWord], config: PhysicsConfig) -> bool {
    let word_count = words.len();
    if word_count == 0 {
        return false;
    }

    let radii = words
        .iter()
        .map(|word| cloud_word_radius(&word.tag, word.count))
        .collect::<Vec<_>>();
    let mut forces = vec![Vec2::ZERO; word_count];
    let collision_strength = 0.9 * config.collision.clamp(0.2, 3.0);
    let center_pull = 0.02;

    for i in 0..word_count {
        for j in (i + 1)..word_count {
            let delta = words[i].world_pos - words[j].world_pos;
            let distance = delta.length();
            let min_distance = radii[i] + radii[j];
            if distance >= min_distance {
                continue;
            }

            let direction = if distance > 0.0001 {
                delta / distance
            } else {
                fallback_direction(i, j)
            };
            let overlap_push = (min_distance - distance) * collision_strength;
            forces[i] += direction * overlap_push;
            forces[j] -= direction * overlap_push;
        }
    }

    for (force, word) in forces.iter_mut().zip(words.iter()) {
        *force -= word.world_pos * center_pull;
    }

    let mut velocities = words.iter().map(|word| word.velocity).collect::<Vec<_>>();
    let mut positions = words.iter().map(|word| word.world_pos).collect::<Vec<_>>();
    let moving = integrate(&forces, &mut velocities, &mut positions, config);
    for ((word, velocity), position) in words.iter_mut().zip(velocities).zip(positions) {
        word.velocity = velocity;
        word.world_pos = position;
    }

    moving
}
