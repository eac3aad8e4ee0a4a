//! The action-space abstraction.
//!
//! Every phase exposes its legal actions as an [`ActionSpace`]: a
//! countable, indexable, restartable, sample-able collection. Small
//! spaces are materialized lists; the Place phase's space is
//! combinatorially huge, so it stays virtual and answers indexing by
//! unranking a (combination, composition) pair instead of enumerating.

use std::collections::HashSet;

use rand::Rng;
use thiserror::Error;

use crate::combinatorics::{
    choose, unrank_combination, unrank_composition, Combinations, Compositions, RankError,
};
use crate::game::Action;

/// Errors raised by action-space indexing and sampling.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpaceError {
    #[error("action index {index} out of range for a space of {len}")]
    OutOfRange { index: u128, len: u128 },

    #[error("cannot sample {requested} distinct actions from a space of {len}")]
    InsufficientActions { requested: usize, len: u128 },
}

impl From<RankError> for SpaceError {
    fn from(err: RankError) -> Self {
        let RankError::OutOfRange { rank, count } = err;
        SpaceError::OutOfRange { index: rank, len: count }
    }
}

/// The virtual Place-phase space: every way to pick `n` territories from
/// the owned set and compose the full reinforcement count into `n`
/// positive parts, for `n` in `1..=min(owned, reinforcements)`.
///
/// Canonical order: `n` ascending, combinations lexicographic over the
/// sorted owned list, compositions innermost in their pinned order.
#[derive(Debug, Clone)]
pub struct PlaceSpace {
    territories: Vec<String>,
    reinforcements: u32,
}

impl PlaceSpace {
    /// `territories` must be sorted; the space's canonical order is
    /// defined over that ordering.
    pub fn new(territories: Vec<String>, reinforcements: u32) -> Self {
        debug_assert!(territories.windows(2).all(|w| w[0] <= w[1]));
        PlaceSpace {
            territories,
            reinforcements,
        }
    }

    fn max_parts(&self) -> usize {
        self.territories.len().min(self.reinforcements as usize)
    }

    /// Block size for a fixed part count `n`: C(owned, n) choices of
    /// territory times C(reinforcements - 1, n - 1) allocations.
    fn block_len(&self, parts: usize) -> u128 {
        choose(self.territories.len() as u64, parts as u64)
            * Compositions::new(self.reinforcements, parts).size()
    }

    pub fn len(&self) -> u128 {
        (1..=self.max_parts()).map(|n| self.block_len(n)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Random access by ordinal without enumerating predecessors.
    pub fn get(&self, index: u128) -> Result<Action, SpaceError> {
        let mut offset = index;
        for parts in 1..=self.max_parts() {
            let block = self.block_len(parts);
            if offset < block {
                let compositions = Compositions::new(self.reinforcements, parts).size();
                let combination_rank = offset / compositions;
                let composition_rank = offset % compositions;
                let territories =
                    unrank_combination(&self.territories, parts, combination_rank)?;
                let troops =
                    unrank_composition(self.reinforcements, parts, composition_rank)?;
                return Ok(Action::Place { territories, troops });
            }
            offset -= block;
        }
        Err(SpaceError::OutOfRange {
            index,
            len: self.len(),
        })
    }

    fn iter(&self) -> PlaceIter<'_> {
        PlaceIter {
            space: self,
            parts: 0,
            combinations: Combinations::new(0, 1),
            current_combination: None,
            compositions: Compositions::new(0, 0),
        }
    }
}

/// Lazy enumeration of a [`PlaceSpace`] in canonical order.
#[derive(Debug)]
pub struct PlaceIter<'a> {
    space: &'a PlaceSpace,
    parts: usize,
    combinations: Combinations,
    current_combination: Option<Vec<usize>>,
    compositions: Compositions,
}

impl PlaceIter<'_> {
    /// Moves to the next part count, resetting both inner enumerators.
    fn open_block(&mut self) -> bool {
        while self.parts < self.space.max_parts() {
            self.parts += 1;
            self.combinations = Combinations::new(self.space.territories.len(), self.parts);
            if let Some(combination) = self.combinations.next() {
                self.current_combination = Some(combination);
                self.compositions = Compositions::new(self.space.reinforcements, self.parts);
                return true;
            }
        }
        false
    }
}

impl Iterator for PlaceIter<'_> {
    type Item = Action;

    fn next(&mut self) -> Option<Action> {
        loop {
            if self.current_combination.is_none() && !self.open_block() {
                return None;
            }
            if let Some(troops) = self.compositions.next() {
                let combination = self.current_combination.as_ref()?;
                let territories = combination
                    .iter()
                    .map(|&i| self.space.territories[i].clone())
                    .collect();
                return Some(Action::Place { territories, troops });
            }
            // Combination exhausted its allocations; advance it and
            // restart the composition enumerator.
            match self.combinations.next() {
                Some(combination) => {
                    self.current_combination = Some(combination);
                    self.compositions =
                        Compositions::new(self.space.reinforcements, self.parts);
                }
                None => self.current_combination = None,
            }
        }
    }
}

/// The legal actions of one state, exposed uniformly across phases.
#[derive(Debug, Clone)]
pub enum ActionSpace {
    /// A materialized list (PrePlace, PreAssign, Attack, Fortify,
    /// Terminal).
    Listed(Vec<Action>),
    /// The virtual Place space.
    Place(PlaceSpace),
}

impl ActionSpace {
    pub fn empty() -> Self {
        ActionSpace::Listed(Vec::new())
    }

    pub fn from_actions(actions: Vec<Action>) -> Self {
        ActionSpace::Listed(actions)
    }

    /// Total number of legal actions.
    pub fn len(&self) -> u128 {
        match self {
            ActionSpace::Listed(actions) => actions.len() as u128,
            ActionSpace::Place(space) => space.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The `index`-th action in canonical order.
    pub fn get(&self, index: u128) -> Result<Action, SpaceError> {
        match self {
            ActionSpace::Listed(actions) => usize::try_from(index)
                .ok()
                .and_then(|i| actions.get(i))
                .cloned()
                .ok_or(SpaceError::OutOfRange {
                    index,
                    len: actions.len() as u128,
                }),
            ActionSpace::Place(space) => space.get(index),
        }
    }

    /// Restartable lazy enumeration in canonical order.
    pub fn iter(&self) -> Actions<'_> {
        match self {
            ActionSpace::Listed(actions) => Actions::Listed(actions.iter()),
            ActionSpace::Place(space) => Actions::Place(space.iter()),
        }
    }

    /// Draws `n` distinct actions uniformly at random.
    ///
    /// Listed spaces use a partial Fisher-Yates shuffle. The Place space
    /// draws uniform ranks and unranks them directly, so no part of the
    /// space is materialized.
    pub fn sample(&self, n: usize, rng: &mut impl Rng) -> Result<Vec<Action>, SpaceError> {
        let len = self.len();
        if n as u128 > len {
            return Err(SpaceError::InsufficientActions { requested: n, len });
        }
        match self {
            ActionSpace::Listed(actions) => {
                let mut indices: Vec<usize> = (0..actions.len()).collect();
                for i in 0..n {
                    let j = rng.gen_range(i..indices.len());
                    indices.swap(i, j);
                }
                Ok(indices[..n].iter().map(|&i| actions[i].clone()).collect())
            }
            ActionSpace::Place(space) => {
                let mut seen = HashSet::new();
                let mut picked = Vec::with_capacity(n);
                while picked.len() < n {
                    let rank = rng.gen_range(0..len);
                    if seen.insert(rank) {
                        picked.push(space.get(rank)?);
                    }
                }
                Ok(picked)
            }
        }
    }
}

impl<'a> IntoIterator for &'a ActionSpace {
    type Item = Action;
    type IntoIter = Actions<'a>;

    fn into_iter(self) -> Actions<'a> {
        self.iter()
    }
}

/// Iterator over an [`ActionSpace`].
#[derive(Debug)]
pub enum Actions<'a> {
    Listed(std::slice::Iter<'a, Action>),
    Place(PlaceIter<'a>),
}

impl Iterator for Actions<'_> {
    type Item = Action;

    fn next(&mut self) -> Option<Action> {
        match self {
            Actions::Listed(iter) => iter.next().cloned(),
            Actions::Place(iter) => iter.next(),
        }
    }
}
