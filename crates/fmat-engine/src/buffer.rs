//! Worker-local result buffers and the parent-side merge.

use std::collections::BTreeSet;
use std::mem;

use fmat_poly::SparsePoly;
use fmat_rings::Q;

use crate::fusion::Anyon;

/// One item produced by an operation.
#[derive(Clone, Debug, PartialEq)]
pub enum WorkerOutput {
    /// A reduced equation.
    Equation(SparsePoly<Q>),
    /// A pentagon whose numeric residual exceeded the tolerance.
    Deviation {
        /// The pentagon index tuple.
        tuple: [Anyon; 9],
        /// `lhs - rhs`; NaN when a value was unknown.
        residual: f64,
    },
}

/// Results accumulated by one worker during a round.
#[derive(Clone, Debug, Default)]
pub struct ResultBuffer {
    items: Vec<WorkerOutput>,
}

impl ResultBuffer {
    /// Creates an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item.
    pub fn push(&mut self, item: WorkerOutput) {
        self.items.push(item);
    }

    /// Appends an equation.
    pub fn push_equation(&mut self, eq: SparsePoly<Q>) {
        self.items.push(WorkerOutput::Equation(eq));
    }

    /// Returns the number of buffered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Takes every item out, dropping zero equations.
    pub fn drain(&mut self) -> Vec<WorkerOutput> {
        let mut items = mem::take(&mut self.items);
        items.retain(|item| !matches!(item, WorkerOutput::Equation(eq) if eq.is_zero()));
        items
    }

    /// Discards every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// The merged results of one round across all workers.
///
/// Equations are deduplicated by structural equality, so the merge does
/// not depend on worker order.
#[derive(Clone, Debug, Default)]
pub struct MergedResults {
    /// Distinct equations in canonical order.
    pub equations: BTreeSet<SparsePoly<Q>>,
    /// Deviations, sorted by index tuple.
    pub deviations: Vec<([Anyon; 9], f64)>,
}

impl MergedResults {
    /// Creates an empty result set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one worker's drained output.
    pub fn merge(&mut self, items: Vec<WorkerOutput>) {
        for item in items {
            match item {
                WorkerOutput::Equation(eq) if eq.is_zero() => {}
                WorkerOutput::Equation(eq) => {
                    self.equations.insert(eq);
                }
                WorkerOutput::Deviation { tuple, residual } => {
                    self.deviations.push((tuple, residual));
                }
            }
        }
        self.deviations.sort_by(|a, b| a.0.cmp(&b.0));
    }

    /// Returns true if nothing was merged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.equations.is_empty() && self.deviations.is_empty()
    }

    /// The equations as a vector in canonical order.
    #[must_use]
    pub fn equations_vec(&self) -> Vec<SparsePoly<Q>> {
        self.equations.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fmat_poly::Var;

    #[test]
    fn test_drain_discards_zero_and_clears() {
        let mut buffer = ResultBuffer::new();
        buffer.push_equation(SparsePoly::zero());
        buffer.push_equation(SparsePoly::var(Var(0)));
        buffer.push(WorkerOutput::Deviation {
            tuple: [Anyon(1); 9],
            residual: 0.5,
        });
        assert_eq!(buffer.len(), 3);

        let drained = buffer.drain();
        assert_eq!(drained.len(), 2);
        assert!(buffer.is_empty());
        assert!(buffer.drain().is_empty());
    }

    #[test]
    fn test_merge_deduplicates() {
        let x0 = SparsePoly::<Q>::var(Var(0));
        let x1 = SparsePoly::<Q>::var(Var(1));

        let mut forward = MergedResults::new();
        forward.merge(vec![WorkerOutput::Equation(x0.clone()), WorkerOutput::Equation(x1.clone())]);
        forward.merge(vec![WorkerOutput::Equation(x0.clone())]);

        let mut backward = MergedResults::new();
        backward.merge(vec![WorkerOutput::Equation(x0.clone())]);
        backward.merge(vec![WorkerOutput::Equation(x1), WorkerOutput::Equation(x0)]);

        assert_eq!(forward.equations.len(), 2);
        assert_eq!(forward.equations, backward.equations);
    }

    #[test]
    fn test_deviations_sorted() {
        let mut merged = MergedResults::new();
        merged.merge(vec![WorkerOutput::Deviation { tuple: [Anyon(2); 9], residual: 1.0 }]);
        merged.merge(vec![WorkerOutput::Deviation { tuple: [Anyon(1); 9], residual: f64::NAN }]);
        assert_eq!(merged.deviations[0].0, [Anyon(1); 9]);
        assert!(!merged.is_empty());
    }
}
