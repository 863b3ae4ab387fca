//! Seeded deterministic randomization.
//!
//! Every sampling decision during assignment flows through a [`Randomizer`]
//! constructed from a seed string, so identical inputs always produce
//! identical exams. The seed string is digested with SHA-256 into the
//! 64-bit state of a SplitMix64 stream; SplitMix64 is portable and has no
//! cross-version stability caveats, which is what keeps old exams
//! regenerable.
//!
//! Seeds are derived per decision: a base identity (the student's uniqname,
//! or `"common"` when consistent randomization is enabled) combined with a
//! decision-scope suffix, so unrelated decisions for the same student are
//! uncorrelated yet individually reproducible.

use sha2::{Digest, Sha256};

/// Base seed used for every student when consistent randomization is on.
pub const COMMON_SEED: &str = "common";

/// A deterministic source of sampling decisions, or the sentinel
/// choose-all policy that bypasses sampling entirely.
#[derive(Debug, Clone)]
pub enum Randomizer {
    Seeded(SeededStream),
    /// Always returns the full pool in declared order. Used for answer-key
    /// and other non-randomized generation.
    ChooseAll,
}

/// SplitMix64 stream seeded from a string digest.
#[derive(Debug, Clone)]
pub struct SeededStream {
    state: u64,
}

impl SeededStream {
    fn new(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        SeededStream {
            state: u64::from_le_bytes(bytes),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform value in `0..bound` via multiply-high extraction, which
    /// avoids modulo bias without rejection loops.
    fn next_below(&mut self, bound: usize) -> usize {
        debug_assert!(bound > 0);
        ((self.next_u64() as u128 * bound as u128) >> 64) as usize
    }
}

impl Randomizer {
    /// Creates a seeded randomizer. Identical seed strings yield identical
    /// decision streams.
    pub fn new(seed: &str) -> Self {
        Randomizer::Seeded(SeededStream::new(seed))
    }

    /// The sentinel non-randomizing policy.
    pub fn choose_all() -> Self {
        Randomizer::ChooseAll
    }

    pub fn is_choose_all(&self) -> bool {
        matches!(self, Randomizer::ChooseAll)
    }

    /// Selects `k` elements without replacement, in selection order, via a
    /// Fisher–Yates shuffle truncated at `k`.
    ///
    /// Contract: `k <= pool.len()`. Pool-size sufficiency is an
    /// authoring-time guarantee checked by chooser resolution before this
    /// is called.
    ///
    /// Under choose-all the full pool is returned in declared order and
    /// `k` is ignored.
    pub fn sample_without_replacement<T: Clone>(&mut self, pool: &[T], k: usize) -> Vec<T> {
        match self {
            Randomizer::ChooseAll => pool.to_vec(),
            Randomizer::Seeded(stream) => {
                assert!(
                    k <= pool.len(),
                    "sample of {k} requested from a pool of {}",
                    pool.len()
                );
                let mut indices: Vec<usize> = (0..pool.len()).collect();
                for i in 0..k {
                    let j = i + stream.next_below(indices.len() - i);
                    indices.swap(i, j);
                }
                indices.truncate(k);
                indices.into_iter().map(|i| pool[i].clone()).collect()
            }
        }
    }

    /// Returns the whole pool in a seed-determined order (declared order
    /// under choose-all).
    pub fn shuffle<T: Clone>(&mut self, pool: &[T]) -> Vec<T> {
        self.sample_without_replacement(pool, pool.len())
    }

    /// Selects a single element, or `None` from an empty pool.
    pub fn pick_one<T: Clone>(&mut self, pool: &[T]) -> Option<T> {
        if pool.is_empty() {
            return None;
        }
        self.sample_without_replacement(pool, 1).into_iter().next()
    }
}

/// Randomizer for choosing which sections appear on a student's exam.
pub fn section_choice_randomizer(base_seed: &str, exam_id: &str) -> Randomizer {
    Randomizer::new(&format!("{base_seed}-{exam_id}"))
}

/// Randomizer for choosing a section's skin.
pub fn section_skin_randomizer(base_seed: &str, exam_id: &str, section_id: &str) -> Randomizer {
    Randomizer::new(&section_scope_seed(base_seed, exam_id, section_id))
}

/// Randomizer for choosing which questions appear within a section.
pub fn question_choice_randomizer(base_seed: &str, exam_id: &str, section_id: &str) -> Randomizer {
    Randomizer::new(&section_scope_seed(base_seed, exam_id, section_id))
}

/// Randomizer for choosing a question's skin.
pub fn question_skin_randomizer(base_seed: &str, exam_id: &str, question_id: &str) -> Randomizer {
    Randomizer::new(&format!("{base_seed}-{exam_id}-q-{question_id}"))
}

fn section_scope_seed(base_seed: &str, exam_id: &str, section_id: &str) -> String {
    format!("{base_seed}-{exam_id}-s-{section_id}")
}
