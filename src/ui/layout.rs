//! Incremental force-directed placement for the viewer surface.
//!
//! The simulation advances a few iterations per frame so a relayout visibly
//! animates. Pinned nodes exert forces but never move.

use eframe::egui;

// Constants for the force-directed algorithm
const REPULSION_STRENGTH: f32 = 40000.0;
const ATTRACTION_STRENGTH: f32 = 0.06;
const DAMPING: f32 = 0.8;
/// Preferred distance between linked node centers.
const IDEAL_LINK_LENGTH: f32 = 120.0;
/// Cap on per-iteration movement, keeps early iterations from flinging nodes away.
const MAX_STEP: f32 = 40.0;

/// Whether a layout pass is still moving nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutProgress {
    /// No pass running
    Idle,
    /// Nodes are still moving
    Running,
    /// The pass finished during this call
    Settled,
}

/// State of the current force-directed pass.
#[derive(Debug, Default)]
pub struct ForceLayout {
    velocities: Vec<egui::Vec2>,
    remaining: usize,
}

impl ForceLayout {
    /// Starts a pass over `node_count` nodes, running at most `max_iterations`.
    pub fn start(&mut self, node_count: usize, max_iterations: usize) {
        self.velocities = vec![egui::Vec2::ZERO; node_count];
        self.remaining = max_iterations;
    }

    /// Stops any running pass without reporting it as settled.
    pub fn stop(&mut self) {
        self.remaining = 0;
    }

    /// Whether a pass is in progress.
    pub fn is_running(&self) -> bool {
        self.remaining > 0
    }

    /// Runs up to `iterations` steps. Positions are updated in place for every node
    /// whose `pinned` flag is false.
    pub fn advance(
        &mut self,
        positions: &mut [egui::Pos2],
        pinned: &[bool],
        links: &[(usize, usize)],
        iterations: usize,
        settle_threshold: f32,
    ) -> LayoutProgress {
        if !self.is_running() {
            return LayoutProgress::Idle;
        }
        if self.velocities.len() != positions.len() {
            self.velocities = vec![egui::Vec2::ZERO; positions.len()];
        }
        for _ in 0..iterations.min(self.remaining) {
            self.remaining -= 1;
            let moved = self.step(positions, pinned, links);
            if moved < settle_threshold {
                self.remaining = 0;
            }
            if self.remaining == 0 {
                return LayoutProgress::Settled;
            }
        }
        LayoutProgress::Running
    }

    /// One simulation step; returns the total distance moved.
    fn step(&mut self, positions: &mut [egui::Pos2], pinned: &[bool], links: &[(usize, usize)]) -> f32 {
        let n = positions.len();
        let mut forces = vec![egui::Vec2::ZERO; n];

        // Repulsion between all pairs of nodes
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[i] - positions[j];
                let distance = delta.length().max(1.0);
                let direction = if delta.length_sq() > 0.0 {
                    delta / distance
                } else {
                    // Coincident nodes: push apart along a fixed, index-dependent axis
                    egui::Vec2::angled(i as f32 * 0.618 + j as f32)
                };
                let force = direction * (REPULSION_STRENGTH / (distance * distance));
                forces[i] += force;
                forces[j] -= force;
            }
        }

        // Spring attraction along links
        for &(from, to) in links {
            let delta = positions[to] - positions[from];
            let distance = delta.length().max(1.0);
            let displacement = distance - IDEAL_LINK_LENGTH;
            let force = delta / distance * displacement * ATTRACTION_STRENGTH;
            forces[from] += force;
            forces[to] -= force;
        }

        let mut moved = 0.0;
        for i in 0..n {
            if pinned.get(i).copied().unwrap_or(false) {
                self.velocities[i] = egui::Vec2::ZERO;
                continue;
            }
            let mut velocity = (self.velocities[i] + forces[i]) * DAMPING;
            if velocity.length() > MAX_STEP {
                velocity = velocity.normalized() * MAX_STEP;
            }
            self.velocities[i] = velocity;
            positions[i] += velocity;
            moved += velocity.length();
        }
        moved
    }
}

/// Deterministic starting placement: nodes evenly spaced on a circle around the origin.
pub fn seed_positions(node_count: usize) -> Vec<egui::Pos2> {
    if node_count == 1 {
        return vec![egui::Pos2::ZERO];
    }
    let radius = 40.0 * (node_count as f32).sqrt() + 60.0;
    (0..node_count)
        .map(|i| {
            let angle = i as f32 / node_count as f32 * std::f32::consts::TAU;
            egui::pos2(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}
