//! Exact combinatorics for action-space enumeration.
//!
//! Binomial coefficients, lazy enumeration of integer compositions and
//! index combinations, and rank-based random access into both via the
//! combinatorial number system. The Place phase builds its action space
//! on top of these primitives.

use thiserror::Error;

/// Error raised when a rank falls outside the enumerated space.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankError {
    #[error("rank {rank} out of range for a space of {count}")]
    OutOfRange { rank: u128, count: u128 },
}

/// Exact binomial coefficient C(n, k).
///
/// Returns 0 when k > n. Uses the multiplicative formula; each partial
/// product is an exact integer because any i+1 consecutive integers
/// contain a multiple of (i+1)!.
pub fn choose(n: u64, k: u64) -> u128 {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        result = result * u128::from(n - i) / u128::from(i + 1);
    }
    result
}

/// Lazy, restartable enumeration of the positive-integer compositions of
/// `total` into exactly `parts` parts.
///
/// Ordering is lexicographic with the first part ascending: the first
/// element is fixed and the remainder is composed recursively, so
/// `Compositions::new(3, 2)` yields `[1, 2]` then `[2, 1]`. There are
/// C(total-1, parts-1) compositions in all.
#[derive(Debug, Clone)]
pub struct Compositions {
    total: u32,
    parts: usize,
    next: Option<Vec<u32>>,
}

impl Compositions {
    pub fn new(total: u32, parts: usize) -> Self {
        let next = if parts == 0 || (total as usize) < parts {
            None
        } else {
            // Smallest composition in order: all ones, remainder last.
            let mut first = vec![1u32; parts];
            first[parts - 1] = total - (parts as u32 - 1);
            Some(first)
        };
        Compositions { total, parts, next }
    }

    /// Number of compositions this enumerator will yield.
    pub fn size(&self) -> u128 {
        if self.parts == 0 || self.total == 0 {
            return 0;
        }
        choose(u64::from(self.total) - 1, self.parts as u64 - 1)
    }

    /// Advances `current` to its lexicographic successor in place.
    /// Returns false once the last composition has been reached.
    fn advance(&self, current: &mut [u32]) -> bool {
        let k = self.parts;
        // Find the rightmost part that can grow while leaving at least one
        // troop for every later part.
        for i in (0..k - 1).rev() {
            let prefix: u32 = current[..=i].iter().sum();
            let after = (k - 1 - i) as u32;
            if self.total - (prefix + 1) >= after {
                current[i] += 1;
                for part in current.iter_mut().take(k - 1).skip(i + 1) {
                    *part = 1;
                }
                let used: u32 = current[..k - 1].iter().sum();
                current[k - 1] = self.total - used;
                return true;
            }
        }
        false
    }
}

impl Iterator for Compositions {
    type Item = Vec<u32>;

    fn next(&mut self) -> Option<Vec<u32>> {
        let current = self.next.take()?;
        if self.parts > 1 {
            let mut successor = current.clone();
            if self.advance(&mut successor) {
                self.next = Some(successor);
            }
        }
        Some(current)
    }
}

/// Lazy lexicographic enumeration of the k-element index combinations of
/// `0..n`, as sorted index vectors.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    k: usize,
    next: Option<Vec<usize>>,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        let next = if k > n {
            None
        } else {
            Some((0..k).collect())
        };
        Combinations { n, k, next }
    }

    pub fn size(&self) -> u128 {
        choose(self.n as u64, self.k as u64)
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let current = self.next.take()?;
        if self.k > 0 {
            let mut successor = current.clone();
            // Rightmost index that has not hit its ceiling.
            let mut i = self.k;
            while i > 0 {
                i -= 1;
                if successor[i] < self.n - self.k + i {
                    successor[i] += 1;
                    for j in i + 1..self.k {
                        successor[j] = successor[j - 1] + 1;
                    }
                    self.next = Some(successor);
                    break;
                }
            }
        }
        Some(current)
    }
}

/// Returns the `rank`-th k-combination of `items` in lexicographic order
/// without enumerating its predecessors.
///
/// At each position the rank is compared against the number of
/// combinations that include the current item; the item is taken when the
/// rank falls inside that block.
pub fn unrank_combination<T: Clone>(items: &[T], k: usize, rank: u128) -> Result<Vec<T>, RankError> {
    let count = choose(items.len() as u64, k as u64);
    if rank >= count {
        return Err(RankError::OutOfRange { rank, count });
    }
    let mut rank = rank;
    let mut picked = Vec::with_capacity(k);
    let mut remaining = k;
    for (i, item) in items.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        let with_this = choose((items.len() - i - 1) as u64, remaining as u64 - 1);
        if rank < with_this {
            picked.push(item.clone());
            remaining -= 1;
        } else {
            rank -= with_this;
        }
    }
    Ok(picked)
}

/// Returns the `rank`-th composition of `total` into `parts` positive
/// parts, in the same order `Compositions` enumerates them.
pub fn unrank_composition(total: u32, parts: usize, rank: u128) -> Result<Vec<u32>, RankError> {
    let count = Compositions::new(total, parts).size();
    if rank >= count {
        return Err(RankError::OutOfRange { rank, count });
    }
    let mut rank = rank;
    let mut composition = Vec::with_capacity(parts);
    let mut remaining = total;
    let mut parts_left = parts;
    while parts_left > 0 {
        if parts_left == 1 {
            composition.push(remaining);
            break;
        }
        // Compositions with first part f form a block of
        // C(remaining - f - 1, parts_left - 2) entries.
        for f in 1..=remaining - (parts_left as u32 - 1) {
            let block = choose(u64::from(remaining - f) - 1, parts_left as u64 - 2);
            if rank < block {
                composition.push(f);
                remaining -= f;
                parts_left -= 1;
                break;
            }
            rank -= block;
        }
    }
    Ok(composition)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn choose_known_values() {
        assert_eq!(choose(0, 0), 1);
        assert_eq!(choose(1, 0), 1);
        assert_eq!(choose(4, 2), 6);
        assert_eq!(choose(10, 3), 120);
        assert_eq!(choose(0, 1), 0);
        assert_eq!(choose(2, 4), 0);
        assert_eq!(choose(42, 21), 538257874440);
    }

    #[test]
    fn compositions_of_three() {
        let all: BTreeSet<Vec<u32>> = (1..=3)
            .flat_map(|k| Compositions::new(3, k))
            .collect();
        let expected: BTreeSet<Vec<u32>> = [
            vec![3],
            vec![2, 1],
            vec![1, 2],
            vec![1, 1, 1],
        ]
        .into_iter()
        .collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn compositions_order_is_first_part_ascending() {
        let order: Vec<Vec<u32>> = Compositions::new(5, 3).collect();
        assert_eq!(
            order,
            vec![
                vec![1, 1, 3],
                vec![1, 2, 2],
                vec![1, 3, 1],
                vec![2, 1, 2],
                vec![2, 2, 1],
                vec![3, 1, 1],
            ]
        );
    }

    #[test]
    fn compositions_count_matches_choose() {
        for total in 1..15u32 {
            for parts in 1..=total as usize {
                let enumerated = Compositions::new(total, parts).count() as u128;
                assert_eq!(enumerated, choose(u64::from(total) - 1, parts as u64 - 1));
            }
        }
    }

    #[test]
    fn compositions_total_is_two_to_the_n_minus_one() {
        for total in 1..15u32 {
            let count: usize = (1..=total as usize)
                .map(|parts| Compositions::new(total, parts).count())
                .sum();
            assert_eq!(count, 1usize << (total - 1));
        }
    }

    #[test]
    fn compositions_parts_all_positive_and_sum() {
        for total in 1..12u32 {
            for parts in 1..=total as usize {
                for comp in Compositions::new(total, parts) {
                    assert_eq!(comp.len(), parts);
                    assert!(comp.iter().all(|&p| p >= 1));
                    assert_eq!(comp.iter().sum::<u32>(), total);
                }
            }
        }
    }

    #[test]
    fn compositions_infeasible_is_empty() {
        assert_eq!(Compositions::new(2, 3).size(), 0);
        assert!(Compositions::new(2, 3).next().is_none());
        assert!(Compositions::new(4, 0).next().is_none());
    }

    #[test]
    fn combinations_lexicographic() {
        let all: Vec<Vec<usize>> = Combinations::new(4, 2).collect();
        assert_eq!(
            all,
            vec![
                vec![0, 1],
                vec![0, 2],
                vec![0, 3],
                vec![1, 2],
                vec![1, 3],
                vec![2, 3],
            ]
        );
        assert_eq!(Combinations::new(4, 2).size(), 6);
    }

    #[test]
    fn combinations_edge_sizes() {
        assert_eq!(Combinations::new(3, 0).collect::<Vec<_>>(), vec![Vec::<usize>::new()]);
        assert_eq!(Combinations::new(3, 3).collect::<Vec<_>>(), vec![vec![0, 1, 2]]);
        assert!(Combinations::new(2, 3).next().is_none());
    }

    #[test]
    fn unrank_combination_round_trips() {
        let items: Vec<u32> = (0..7).collect();
        for k in 0..=items.len() {
            let count = choose(items.len() as u64, k as u64);
            let mut seen = BTreeSet::new();
            for rank in 0..count {
                let combo = unrank_combination(&items, k, rank).unwrap();
                assert_eq!(combo.len(), k);
                assert!(seen.insert(combo));
            }
            let enumerated: BTreeSet<Vec<u32>> = Combinations::new(items.len(), k)
                .map(|idx| idx.into_iter().map(|i| items[i]).collect())
                .collect();
            assert_eq!(seen, enumerated);
        }
    }

    #[test]
    fn unrank_combination_matches_enumeration_order() {
        let items: Vec<char> = vec!['a', 'b', 'c', 'd', 'e'];
        for (rank, idx) in Combinations::new(items.len(), 3).enumerate() {
            let expected: Vec<char> = idx.into_iter().map(|i| items[i]).collect();
            assert_eq!(unrank_combination(&items, 3, rank as u128).unwrap(), expected);
        }
    }

    #[test]
    fn unrank_combination_out_of_range() {
        let items = [1, 2, 3];
        assert_eq!(
            unrank_combination(&items, 2, 3),
            Err(RankError::OutOfRange { rank: 3, count: 3 })
        );
    }

    #[test]
    fn unrank_composition_matches_enumeration_order() {
        for total in 1..10u32 {
            for parts in 1..=total as usize {
                for (rank, comp) in Compositions::new(total, parts).enumerate() {
                    assert_eq!(
                        unrank_composition(total, parts, rank as u128).unwrap(),
                        comp
                    );
                }
            }
        }
    }

    #[test]
    fn unrank_composition_out_of_range() {
        assert_eq!(
            unrank_composition(4, 2, 3),
            Err(RankError::OutOfRange { rank: 3, count: 3 })
        );
    }
}
