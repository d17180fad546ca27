//! Seeded random streams.
//!
//! Movement draws randomness in exactly one place: the push direction when
//! two agents sit on the same point.  Each agent owns its stream, derived
//! from the run seed and its id, so adding or removing one agent never
//! shifts the draws of another and a replay with the same seed and the same
//! orders reproduces every position.

use rand::rngs::SmallRng;
use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::{Rng, SeedableRng};

use crate::{AgentId, WorldPoint};

/// SplitMix64 finalizer over `seed + id`.  Neighbouring ids land far apart.
fn stream_seed(seed: u64, agent: AgentId) -> u64 {
    let mut z = seed.wrapping_add((agent.0 as u64 + 1).wrapping_mul(0x9e37_79b9_7f4a_7c15));
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// One agent's private stream.
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(seed: u64, agent: AgentId) -> Self {
        AgentRng(SmallRng::seed_from_u64(stream_seed(seed, agent)))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Direction drawn uniformly on the unit circle.
    pub fn unit_vector(&mut self) -> WorldPoint {
        let angle = self.0.gen_range(0.0..std::f32::consts::TAU);
        WorldPoint::new(angle.cos(), angle.sin())
    }
}

/// Run-wide stream for scenario setup: spawn spots, random orders.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }
}
