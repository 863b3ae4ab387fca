//! Chooser resolution: pools of candidates resolved into concrete
//! component lists.
//!
//! A chooser pairs a candidate pool with a selection count. Pool entries
//! may themselves be choosers, so resolution recursively flattens the pool
//! into a candidate list before sampling. Resolution is a pure function of
//! (pool, count, randomizer state): no retries, no backtracking.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{GenerationError, Result};
use crate::model::ComponentKind;
use crate::randomizer::Randomizer;
use crate::skins::Skin;

/// Recursion limit for nested pools. Specifications are authored as finite
/// trees; hitting this means something is wrong with the authoring tool,
/// not the student.
pub const MAX_CHOOSER_DEPTH: usize = 32;

/// A resolvable component handle: cheap to clone, with a stable identity
/// token for duplicate detection.
pub trait ComponentRef: Clone {
    /// Component kind named in errors.
    const KIND: ComponentKind;

    /// Stable object-identity token of the underlying specification.
    fn identity(&self) -> usize;
}

impl ComponentRef for Arc<Skin> {
    const KIND: ComponentKind = ComponentKind::Skin;

    fn identity(&self) -> usize {
        Arc::as_ptr(self) as usize
    }
}

/// One slot in a chooser pool (or in an exam/section component list): a
/// realized component, or a nested chooser.
#[derive(Debug, Clone)]
pub enum PoolEntry<C> {
    Component(C),
    Chooser(Chooser<C>),
}

/// A candidate pool plus a selection count.
#[derive(Debug, Clone)]
pub struct Chooser<C> {
    /// Number of components to select.
    pub choose: usize,
    /// Candidates in declared order.
    pub pool: Vec<PoolEntry<C>>,
}

impl<C: ComponentRef> Chooser<C> {
    /// A degenerate chooser that always yields exactly `component`.
    pub fn fixed(component: C) -> Self {
        Chooser {
            choose: 1,
            pool: vec![PoolEntry::Component(component)],
        }
    }

    /// Resolves this chooser into an ordered component list.
    ///
    /// Nested choosers are flattened recursively; their selections join the
    /// outer candidate list. Unless `allow_duplicates` is set, candidates
    /// reachable through more than one pool path are de-duplicated by
    /// specification identity before sampling, so one specification can be
    /// selected at most once per resolution.
    pub fn resolve(&self, rand: &mut Randomizer, allow_duplicates: bool) -> Result<Vec<C>> {
        self.resolve_at_depth(rand, allow_duplicates, 0)
    }

    fn resolve_at_depth(
        &self,
        rand: &mut Randomizer,
        allow_duplicates: bool,
        depth: usize,
    ) -> Result<Vec<C>> {
        if depth >= MAX_CHOOSER_DEPTH {
            return Err(GenerationError::ChooserTooDeep {
                max: MAX_CHOOSER_DEPTH,
            });
        }

        let mut candidates: Vec<C> = Vec::with_capacity(self.pool.len());
        for entry in &self.pool {
            match entry {
                PoolEntry::Component(c) => candidates.push(c.clone()),
                PoolEntry::Chooser(nested) => {
                    candidates.extend(nested.resolve_at_depth(rand, allow_duplicates, depth + 1)?);
                }
            }
        }

        if !allow_duplicates {
            let mut seen = HashSet::with_capacity(candidates.len());
            candidates.retain(|c| seen.insert(c.identity()));
        }

        if rand.is_choose_all() {
            return Ok(candidates);
        }

        if self.choose > candidates.len() {
            return Err(GenerationError::PoolExhausted {
                kind: C::KIND,
                requested: self.choose,
                available: candidates.len(),
            });
        }

        tracing::debug!(
            kind = %C::KIND,
            choose = self.choose,
            candidates = candidates.len(),
            "resolving chooser"
        );
        Ok(rand.sample_without_replacement(&candidates, self.choose))
    }
}

impl<C: ComponentRef> PoolEntry<C> {
    /// Resolves one slot: a plain component yields itself; a chooser
    /// resolves its pool.
    pub fn resolve(&self, rand: &mut Randomizer, allow_duplicates: bool) -> Result<Vec<C>> {
        match self {
            PoolEntry::Component(c) => Ok(vec![c.clone()]),
            PoolEntry::Chooser(chooser) => chooser.resolve(rand, allow_duplicates),
        }
    }
}
