//! A single sediment-carrying droplet.

use glam::Vec3;

use crate::terrain::MeshAdjacency;

use super::config::ErosionConfig;

/// Whether the droplet keeps going after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Terminated,
}

/// What one step did to the terrain.
///
/// `eroded` was removed from the terrain and added to the droplet;
/// `deposited` was removed from the droplet and added to the terrain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepResult {
    pub outcome: StepOutcome,
    pub eroded: f32,
    pub deposited: f32,
}

impl StepResult {
    fn new(outcome: StepOutcome) -> Self {
        Self {
            outcome,
            eroded: 0.0,
            deposited: 0.0,
        }
    }
}

/// Ephemeral erosion agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Droplet {
    /// Vertex the droplet currently sits on.
    pub vertex: usize,
    /// Carried sediment.
    pub sediment: f32,
    /// Remaining steps.
    pub lifespan: u32,
}

impl Droplet {
    /// Creates a droplet with no sediment at `vertex`.
    pub fn new(vertex: usize, lifespan: u32) -> Self {
        Self {
            vertex,
            sediment: 0.0,
            lifespan,
        }
    }

    /// Moves up to `amount` of carried sediment onto vertex `v`.
    fn deposit(&mut self, vertices: &mut [Vec3], v: usize, amount: f32, result: &mut StepResult) {
        let amount = amount.clamp(0.0, self.sediment);
        vertices[v].y += amount;
        self.sediment -= amount;
        result.deposited += amount;
    }

    fn deposit_all(&mut self, vertices: &mut [Vec3], v: usize, result: &mut StepResult) {
        vertices[v].y += self.sediment;
        result.deposited += self.sediment;
        self.sediment = 0.0;
    }

    /// Lowest neighbor of `v`; ties keep the first one found.
    fn lowest_neighbor(vertices: &[Vec3], adjacency: &MeshAdjacency, v: usize) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for &n in adjacency.neighbors(v) {
            let h = vertices[n as usize].y;
            match best {
                Some((_, bh)) if h >= bh => {}
                _ => best = Some((n as usize, h)),
            }
        }
        best.map(|(n, _)| n)
    }

    /// Advances the droplet by one step.
    ///
    /// The droplet targets its lowest neighbor. Flat ground with nothing
    /// carried ends it immediately; an exhausted lifespan drops everything.
    /// In a basin (every neighbor higher) it fills the basin to the lowest
    /// rim plus `basin_margin`, or drops everything and stops if it carries
    /// too little. Otherwise it erodes the current vertex by the height
    /// difference, limited by its free capacity. It then deposits a
    /// lifespan-dependent share of its load, loses one lifespan step and
    /// moves to the target.
    pub fn step(&mut self, vertices: &mut [Vec3], adjacency: &MeshAdjacency, config: &ErosionConfig) -> StepResult {
        let mut result = StepResult::new(StepOutcome::Continue);
        let cur = self.vertex;

        let Some(target) = Self::lowest_neighbor(vertices, adjacency, cur) else {
            self.deposit_all(vertices, cur, &mut result);
            result.outcome = StepOutcome::Terminated;
            return result;
        };

        let diff = vertices[cur].y - vertices[target].y;

        if diff == 0.0 && self.sediment == 0.0 {
            result.outcome = StepOutcome::Terminated;
            return result;
        }

        if self.lifespan == 0 {
            self.deposit_all(vertices, cur, &mut result);
            result.outcome = StepOutcome::Terminated;
            return result;
        }

        if diff < 0.0 {
            let needed = -diff * (1.0 + config.basin_margin);
            if self.sediment < needed {
                self.deposit_all(vertices, cur, &mut result);
                result.outcome = StepOutcome::Terminated;
                return result;
            }
            self.deposit(vertices, cur, needed, &mut result);
        } else {
            let room = (config.sediment_capacity - self.sediment).max(0.0);
            let amount = diff.min(room);
            vertices[cur].y -= amount;
            self.sediment += amount;
            result.eroded += amount;
        }

        let life = self.lifespan as f32;
        let settle = self.sediment / (life + config.deposit_bias);
        self.deposit(vertices, cur, settle, &mut result);
        let evaporate = self.sediment / (life + config.evaporation_bias);
        self.deposit(vertices, cur, evaporate, &mut result);

        self.lifespan -= 1;
        self.vertex = target;
        result
    }
}
