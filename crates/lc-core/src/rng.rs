//! Deterministic per-chooser random streams.
//!
//! # Determinism strategy
//!
//! Every chooser gets its own `SmallRng` for every pipeline stage, seeded by:
//!
//!   seed = run_seed XOR (person_id * MIXING_CONSTANT) XOR stream
//!
//! where `stream` is a stable hash of the stage's trace label, e.g.
//! `workplace_location.i2.sample.work_low`.  This means:
//!
//! - The draws a chooser consumes never depend on how many choosers came
//!   before it, so results are identical for any chunk size and whether or
//!   not segments run in parallel.
//! - Each iteration and stage gets fresh draws (different label → different
//!   stream), yet re-running with the same seed reproduces them exactly.

use std::hash::{Hash, Hasher};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rustc_hash::FxHasher;

use crate::PersonId;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

// ── StreamKey ─────────────────────────────────────────────────────────────────

/// Identifies one random stream (one stage of one iteration of one model).
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct StreamKey(pub u64);

impl StreamKey {
    /// Derive a key from a trace label.  FxHash is stable for a given build,
    /// unlike `std`'s randomly keyed `DefaultHasher`.
    pub fn from_label(label: &str) -> Self {
        let mut hasher = FxHasher::default();
        label.hash(&mut hasher);
        StreamKey(hasher.finish())
    }
}

// ── ChooserRng ────────────────────────────────────────────────────────────────

/// Per-chooser deterministic RNG for one stream.
///
/// Cheap to construct; the sampler and simulator create one per chooser per
/// stage and drop it immediately afterwards.
pub struct ChooserRng(SmallRng);

impl ChooserRng {
    /// Seed deterministically from the run seed, a person and a stream.
    pub fn new(run_seed: u64, person: PersonId, stream: StreamKey) -> Self {
        let seed = run_seed ^ (person.0 as u64).wrapping_mul(MIXING_CONSTANT) ^ stream.0;
        ChooserRng(SmallRng::seed_from_u64(seed))
    }

    /// One uniform draw in `[0, 1)`.
    #[inline]
    pub fn uniform(&mut self) -> f64 {
        self.0.r#gen::<f64>()
    }
}

// ── RandomStreams ─────────────────────────────────────────────────────────────

/// Factory for [`ChooserRng`]s sharing one run seed.
#[derive(Copy, Clone, Debug)]
pub struct RandomStreams {
    pub seed: u64,
}

impl RandomStreams {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// RNG for `person` on the stream named by `stream`.
    #[inline]
    pub fn chooser(&self, person: PersonId, stream: StreamKey) -> ChooserRng {
        ChooserRng::new(self.seed, person, stream)
    }
}
