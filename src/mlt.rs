//! Metropolis light transport over per-pixel path chains.
//!
//! Each pixel runs a Markov chain whose state is a [`Path`]. A proposal
//! deletes a random number of trailing vertices and re-traces them; the
//! candidate is accepted with probability `min(1, L(y) / L(x))` where `L` is
//! luminance. The proposal is assumed symmetric for every deletion strategy;
//! this has not been derived for the discrete or Gaussian rules.
//!
//! The pixel estimate mixes both states of every proposal:
//! `a * color(x) + (1 - a) * color(y)` is added whether or not the candidate
//! is accepted.

use clap::ValueEnum;
use glam::Vec3A;
use log::trace;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::Deserialize;

use crate::material::{luminance, Color};
use crate::path::Path;
use crate::random::random_f32;
use crate::scene::Scene;

/// Rule for drawing how many trailing vertices a mutation deletes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeletionStrategy {
    /// Never mutate; every round contributes the current colour.
    Never,
    /// Discretised rule: 1 (p = 1/4), 2 (p = 1/2), otherwise a geometric tail
    /// starting at 3. Paths shorter than three vertices are never mutated.
    #[default]
    Discrete,
    /// Normal distribution centred at half the bounce limit.
    Gaussian,
}

impl DeletionStrategy {
    /// Draw a deletion length for a path of `path_len` vertices.
    ///
    /// Values `<= 0` mean "no mutation this round".
    pub fn sample<R: Rng + ?Sized>(&self, path_len: usize, max_bounces: usize, rng: &mut R) -> i32 {
        match self {
            DeletionStrategy::Never => 0,
            DeletionStrategy::Discrete => {
                if path_len < 3 {
                    return 0;
                }
                discrete_length(random_f32(rng))
            }
            DeletionStrategy::Gaussian => {
                let mean = max_bounces as f32 / 2.0;
                let std_dev = (max_bounces as f32 / 4.0).max(f32::MIN_POSITIVE);
                match Normal::new(mean, std_dev) {
                    Ok(normal) => normal.sample(rng).round() as i32,
                    Err(_) => 0,
                }
            }
        }
    }
}

/// Map a uniform draw in [0, 1) to the discrete deletion length.
pub fn discrete_length(d: f32) -> i32 {
    if d <= 0.25 {
        1
    } else if d <= 0.75 {
        2
    } else {
        (3.0 - (1.0 - 4.0 * (d - 0.75)).log2()).floor() as i32
    }
}

/// Acceptance probability of moving from luminance `current` to `candidate`.
///
/// A black current state always accepts, which also keeps the ratio finite.
pub fn acceptance(current: f32, candidate: f32) -> f32 {
    if current.is_nan() || current <= 0.0 {
        return 1.0;
    }
    let ratio = candidate / current;
    if ratio.is_nan() {
        1.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Mutation parameters of a render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationSettings {
    /// Number of mutation rounds per pixel.
    pub mutations: u32,
    /// Deletion-length rule.
    pub deletion: DeletionStrategy,
}

/// Counters of one chain run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChainStats {
    /// Rounds that actually proposed a candidate.
    pub proposed: u32,
    /// Proposals that were accepted.
    pub accepted: u32,
}

/// Chain state for one pixel.
#[derive(Debug, Clone)]
pub struct MarkovChain {
    current: Path,
    color: Color,
    luminance: f32,
    accumulated: Color,
    contributions: u32,
    stats: ChainStats,
}

impl MarkovChain {
    /// Start a chain at `seed` whose estimate is `color`.
    ///
    /// The seed colour counts as the first contribution.
    pub fn new(seed: Path, color: Color) -> Self {
        Self {
            current: seed,
            color,
            luminance: luminance(color),
            accumulated: color,
            contributions: 1,
            stats: ChainStats::default(),
        }
    }

    /// Current accepted path.
    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Colour of the current state.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Proposal and acceptance counters so far.
    pub fn stats(&self) -> ChainStats {
        self.stats
    }

    /// Contribute the current colour without proposing.
    pub fn hold(&mut self) {
        self.accumulated += self.color;
        self.contributions += 1;
    }

    /// Metropolis step towards `candidate` with the uniform `acceptance_draw`.
    ///
    /// Returns true if the candidate became the current state.
    pub fn step(&mut self, candidate: Path, acceptance_draw: f32) -> bool {
        let candidate_color = candidate.radiance();
        let candidate_luminance = luminance(candidate_color);
        let a = acceptance(self.luminance, candidate_luminance);

        self.accumulated += a * self.color + (1.0 - a) * candidate_color;
        self.contributions += 1;
        self.stats.proposed += 1;

        if acceptance_draw < a {
            self.current = candidate;
            self.color = candidate_color;
            self.luminance = candidate_luminance;
            self.stats.accepted += 1;
            true
        } else {
            false
        }
    }

    /// Propose a mutation of the current path, or `None` for a held round.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        deletion: DeletionStrategy,
        scene: &Scene,
        rng: &mut R,
    ) -> Option<Path> {
        let len = self.current.len();
        let drawn = deletion.sample(len, self.current.max_bounces(), rng);
        if drawn <= 0 {
            return None;
        }
        // Never delete the whole path
        let deleted = (drawn as usize).min(len.saturating_sub(1));
        Some(self.current.regenerate(len - deleted, scene, rng))
    }

    /// Run `settings.mutations` rounds.
    pub fn run<R: Rng + ?Sized>(&mut self, settings: &MutationSettings, scene: &Scene, rng: &mut R) {
        for _ in 0..settings.mutations {
            match self.propose(settings.deletion, scene, rng) {
                Some(candidate) => {
                    let draw = random_f32(rng);
                    self.step(candidate, draw);
                }
                None => self.hold(),
            }
        }
        trace!(
            "chain finished: {}/{} proposals accepted",
            self.stats.accepted,
            self.stats.proposed
        );
    }

    /// Mean of all contributions, with non-finite channels zeroed.
    pub fn estimate(&self) -> Color {
        sanitize(self.accumulated / self.contributions as f32)
    }
}

/// Replace NaN or infinite channels with zero.
pub fn sanitize(color: Color) -> Color {
    let finite = |c: f32| if c.is_finite() { c } else { 0.0 };
    Vec3A::new(finite(color.x), finite(color.y), finite(color.z))
}
