//! Round-robin striping of a lazily enumerated index space.

use std::iter::StepBy;
use std::ops::Range;

use crate::error::{EngineError, Result};
use crate::fusion::{Anyon, MAX_RANK};

/// The slice of work owned by one worker: every position congruent to
/// `worker_id` modulo `worker_count`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Partition {
    worker_id: usize,
    worker_count: usize,
}

impl Partition {
    /// Creates a partition descriptor.
    ///
    /// # Errors
    ///
    /// Returns `PartitionOutOfRange` unless `worker_id < worker_count`.
    pub fn new(worker_id: usize, worker_count: usize) -> Result<Self> {
        if worker_id >= worker_count {
            return Err(EngineError::PartitionOutOfRange {
                worker_id,
                worker_count,
            });
        }
        Ok(Self {
            worker_id,
            worker_count,
        })
    }

    /// The partition that owns everything.
    #[must_use]
    pub const fn whole() -> Self {
        Self {
            worker_id: 0,
            worker_count: 1,
        }
    }

    /// Returns the worker id.
    #[must_use]
    pub const fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Returns the number of workers.
    #[must_use]
    pub const fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// The positions in `0..total` owned by this worker, in increasing order.
    #[must_use]
    pub fn positions(&self, total: u64) -> StepBy<Range<u64>> {
        let start = (self.worker_id as u64).min(total);
        (start..total).step_by(self.worker_count)
    }

    /// The indices of a slice of length `len` owned by this worker.
    #[must_use]
    pub fn indices(&self, len: usize) -> StepBy<Range<usize>> {
        (self.worker_id.min(len)..len).step_by(self.worker_count)
    }
}

/// Positions `i < total` with `i % worker_count == worker_id`.
///
/// # Errors
///
/// Returns `PartitionOutOfRange` unless `worker_id < worker_count`.
pub fn assign(total: u64, worker_id: usize, worker_count: usize) -> Result<StepBy<Range<u64>>> {
    Partition::new(worker_id, worker_count).map(|p| p.positions(total))
}

/// The Cartesian power `basis^N`, enumerated lexicographically.
///
/// Position `i` maps to the base-`radix` digits of `i`, most significant
/// first, so tuple lookup never walks earlier positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndexSpace<const N: usize> {
    radix: u64,
    total: u64,
}

impl<const N: usize> IndexSpace<N> {
    /// Creates the index space over a basis of `radix` elements.
    ///
    /// # Errors
    ///
    /// Returns `IndexSpaceTooLarge` if `radix^N` overflows `u64` or a label
    /// below `radix` does not fit an [`Anyon`].
    pub fn new(radix: usize) -> Result<Self> {
        let too_large = || EngineError::IndexSpaceTooLarge { radix, arity: N };
        if radix > MAX_RANK {
            return Err(too_large());
        }
        let r = u64::try_from(radix).map_err(|_| too_large())?;
        let n = u32::try_from(N).map_err(|_| too_large())?;
        let total = r.checked_pow(n).ok_or_else(too_large)?;
        Ok(Self { radix: r, total })
    }

    /// Returns `radix^N`.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// The tuple at position `pos`.
    ///
    /// Positions at or beyond [`total`](Self::total) wrap modulo it.
    #[must_use]
    pub fn tuple_at(&self, mut pos: u64) -> [Anyon; N] {
        let mut tuple = [Anyon(0); N];
        if self.radix == 0 {
            return tuple;
        }
        for slot in tuple.iter_mut().rev() {
            // `new` bounds the radix by MAX_RANK
            *slot = Anyon(u16::try_from(pos % self.radix).unwrap_or(u16::MAX));
            pos /= self.radix;
        }
        tuple
    }

    /// The tuples owned by `partition`, in position order.
    pub fn tuples(&self, partition: Partition) -> impl Iterator<Item = [Anyon; N]> + '_ {
        partition.positions(self.total).map(|pos| self.tuple_at(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_rejects_bad_descriptors() {
        assert!(matches!(
            Partition::new(3, 3),
            Err(EngineError::PartitionOutOfRange { worker_id: 3, worker_count: 3 })
        ));
        assert!(Partition::new(0, 0).is_err());
        assert!(assign(10, 0, 0).is_err());
        assert!(Partition::new(2, 3).is_ok());
    }

    #[test]
    fn test_positions_stay_in_residue_class() {
        let p = Partition::new(1, 4).unwrap();
        let got: Vec<u64> = p.positions(11).collect();
        assert_eq!(got, vec![1, 5, 9]);
        assert_eq!(p.positions(0).count(), 0);
        assert_eq!(Partition::new(5, 8).unwrap().positions(3).count(), 0);
    }

    #[test]
    fn test_indices_match_positions() {
        let p = Partition::new(2, 3).unwrap();
        let idx: Vec<usize> = p.indices(9).collect();
        assert_eq!(idx, vec![2, 5, 8]);
        assert_eq!(Partition::whole().indices(3).count(), 3);
    }

    #[test]
    fn test_tuple_at_is_lexicographic() {
        let space = IndexSpace::<3>::new(2).unwrap();
        assert_eq!(space.total(), 8);
        assert_eq!(space.tuple_at(0), [Anyon(0), Anyon(0), Anyon(0)]);
        assert_eq!(space.tuple_at(1), [Anyon(0), Anyon(0), Anyon(1)]);
        assert_eq!(space.tuple_at(6), [Anyon(1), Anyon(1), Anyon(0)]);

        let all: Vec<_> = space.tuples(Partition::whole()).collect();
        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);
    }

    #[test]
    fn test_large_positions_are_direct() {
        let space = IndexSpace::<9>::new(10).unwrap();
        assert_eq!(space.total(), 1_000_000_000);
        let t = space.tuple_at(987_654_321);
        let digits: Vec<u16> = t.iter().map(|a| a.0).collect();
        assert_eq!(digits, vec![9, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn test_index_space_overflow() {
        assert!(matches!(
            IndexSpace::<9>::new(200_000),
            Err(EngineError::IndexSpaceTooLarge { radix: 200_000, arity: 9 })
        ));
        assert_eq!(IndexSpace::<6>::new(0).unwrap().total(), 0);
    }

    #[test]
    fn test_labels_beyond_anyon_range_are_rejected() {
        assert!(matches!(
            IndexSpace::<1>::new(MAX_RANK + 1),
            Err(EngineError::IndexSpaceTooLarge { arity: 1, .. })
        ));
        let widest = IndexSpace::<2>::new(MAX_RANK).unwrap();
        assert_eq!(widest.tuple_at(widest.total() - 1), [Anyon(u16::MAX); 2]);
    }
}
