//! The closed set of worker operations and their execution.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use fmat_poly::{MonomialOrder, SparsePoly};
use fmat_rings::Q;

use crate::buffer::ResultBuffer;
use crate::config::EngineConfig;
use crate::equations::{hexagon, pentagon};
use crate::error::{EngineError, Result};
use crate::factory::{Factory, StateUpdate};
use crate::local_basis::compute_basis;
use crate::partition::{IndexSpace, Partition};
use crate::reduce::{reduce, reduce_checked, ReductionParams};
use crate::verify::verify_pentagons;

/// The name of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// `generate-hexagons`
    GenerateHexagons,
    /// `generate-pentagons`
    GeneratePentagons,
    /// `update-and-reduce`
    UpdateAndReduce,
    /// `compute-local-basis`
    ComputeLocalBasis,
    /// `broadcast-update`
    BroadcastUpdate,
    /// `verify`
    Verify,
}

impl OperationKind {
    /// Every operation kind.
    pub const ALL: [Self; 6] = [
        Self::GenerateHexagons,
        Self::GeneratePentagons,
        Self::UpdateAndReduce,
        Self::ComputeLocalBasis,
        Self::BroadcastUpdate,
        Self::Verify,
    ];

    /// Returns the operation name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::GenerateHexagons => "generate-hexagons",
            Self::GeneratePentagons => "generate-pentagons",
            Self::UpdateAndReduce => "update-and-reduce",
            Self::ComputeLocalBasis => "compute-local-basis",
            Self::BroadcastUpdate => "broadcast-update",
            Self::Verify => "verify",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OperationKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| EngineError::UnknownOperation(s.to_string()))
    }
}

/// An operation together with its round-specific arguments.
///
/// Large arguments are shared behind `Arc`, so sending one operation to
/// every worker copies only pointers.
#[derive(Clone, Debug)]
pub enum Operation {
    /// Generate the hexagon equations of a partition of `basis^6`.
    GenerateHexagons {
        /// Positions owned by the worker.
        partition: Partition,
    },
    /// Generate the pentagon equations of a partition of `basis^9`.
    GeneratePentagons {
        /// Positions owned by the worker.
        partition: Partition,
        /// Skip equations whose left-hand side vanishes.
        prune: bool,
    },
    /// Reduce a striped share of equations against the current state.
    UpdateAndReduce {
        /// Every equation of the round.
        equations: Arc<Vec<SparsePoly<Q>>>,
        /// Indices owned by the worker.
        partition: Partition,
    },
    /// Compute Gröbner bases of a striped share of batches.
    ComputeLocalBasis {
        /// Every batch of the round.
        batches: Arc<Vec<Vec<SparsePoly<Q>>>>,
        /// Indices owned by the worker.
        partition: Partition,
        /// Term order of the bases.
        order: MonomialOrder,
    },
    /// Overwrite the factory state.
    BroadcastUpdate(Arc<StateUpdate>),
    /// Check pentagons numerically on a partition of `basis^9`.
    Verify {
        /// Positions owned by the worker.
        partition: Partition,
        /// Largest accepted `|lhs - rhs|`.
        tolerance: f64,
        /// Positions between progress reports.
        progress_interval: u64,
    },
}

impl Operation {
    /// Returns the kind of this operation.
    #[must_use]
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::GenerateHexagons { .. } => OperationKind::GenerateHexagons,
            Self::GeneratePentagons { .. } => OperationKind::GeneratePentagons,
            Self::UpdateAndReduce { .. } => OperationKind::UpdateAndReduce,
            Self::ComputeLocalBasis { .. } => OperationKind::ComputeLocalBasis,
            Self::BroadcastUpdate(_) => OperationKind::BroadcastUpdate,
            Self::Verify { .. } => OperationKind::Verify,
        }
    }

    /// Returns the partition, if the operation is striped.
    #[must_use]
    pub fn partition(&self) -> Option<Partition> {
        match self {
            Self::GenerateHexagons { partition }
            | Self::GeneratePentagons { partition, .. }
            | Self::UpdateAndReduce { partition, .. }
            | Self::ComputeLocalBasis { partition, .. }
            | Self::Verify { partition, .. } => Some(*partition),
            Self::BroadcastUpdate(_) => None,
        }
    }

    /// Returns a copy with the partition replaced.
    #[must_use]
    pub fn with_partition(&self, new: Partition) -> Self {
        let mut op = self.clone();
        match &mut op {
            Self::GenerateHexagons { partition }
            | Self::GeneratePentagons { partition, .. }
            | Self::UpdateAndReduce { partition, .. }
            | Self::ComputeLocalBasis { partition, .. }
            | Self::Verify { partition, .. } => *partition = new,
            Self::BroadcastUpdate(_) => {}
        }
        op
    }

    /// The number of work items the whole round covers.
    ///
    /// # Errors
    ///
    /// Returns `IndexSpaceTooLarge` if a tuple space overflows.
    pub fn work_size(&self, rank: usize) -> Result<u64> {
        Ok(match self {
            Self::GenerateHexagons { .. } => IndexSpace::<6>::new(rank)?.total(),
            Self::GeneratePentagons { .. } | Self::Verify { .. } => IndexSpace::<9>::new(rank)?.total(),
            Self::UpdateAndReduce { equations, .. } => equations.len() as u64,
            Self::ComputeLocalBasis { batches, .. } => batches.len() as u64,
            Self::BroadcastUpdate(_) => 0,
        })
    }
}

/// Reduces `eq` and appends it unless it vanished.
fn push_reduced(
    eq: &SparsePoly<Q>,
    params: &ReductionParams<'_>,
    check: bool,
    buffer: &mut ResultBuffer,
) -> Result<()> {
    if eq.is_zero() {
        return Ok(());
    }
    let reduced = if check {
        reduce_checked(eq, params)?
    } else {
        reduce(eq, params)
    };
    if !reduced.is_zero() {
        buffer.push_equation(reduced.poly);
    }
    Ok(())
}

/// Runs one operation against a factory, appending results to `buffer`.
///
/// Returns the number of items appended.
///
/// # Errors
///
/// Propagates reduction, index-space and broadcast errors.
pub fn execute(
    factory: &mut Factory,
    op: &Operation,
    buffer: &mut ResultBuffer,
    config: &EngineConfig,
) -> Result<usize> {
    let before = buffer.len();
    let check = config.check_reductions;

    match op {
        Operation::GenerateHexagons { partition } => {
            let space = IndexSpace::<6>::new(factory.basis().len())?;
            let params = ReductionParams::from_factory(factory);
            for tuple in space.tuples(*partition) {
                push_reduced(&hexagon(factory, tuple), &params, check, buffer)?;
            }
        }
        Operation::GeneratePentagons { partition, prune } => {
            let space = IndexSpace::<9>::new(factory.basis().len())?;
            let params = ReductionParams::from_factory(factory);
            for tuple in space.tuples(*partition) {
                push_reduced(&pentagon(factory, tuple, *prune), &params, check, buffer)?;
            }
        }
        Operation::UpdateAndReduce { equations, partition } => {
            let params = ReductionParams::from_factory(factory);
            for i in partition.indices(equations.len()) {
                push_reduced(&equations[i], &params, check, buffer)?;
            }
        }
        Operation::ComputeLocalBasis {
            batches,
            partition,
            order,
        } => {
            let params = ReductionParams::from_factory(factory);
            for i in partition.indices(batches.len()) {
                let batch: Vec<SparsePoly<Q>> = batches[i]
                    .iter()
                    .map(|eq| reduce(eq, &params).poly)
                    .filter(|eq| !eq.is_zero())
                    .collect();
                for g in compute_basis(&batch, *order, factory.solver()) {
                    push_reduced(&g, &params, check, buffer)?;
                }
            }
        }
        Operation::BroadcastUpdate(update) => factory.apply_update(update)?,
        Operation::Verify {
            partition,
            tolerance,
            progress_interval,
        } => {
            verify_pentagons(factory, *partition, *tolerance, *progress_interval, buffer)?;
        }
    }

    Ok(buffer.len() - before)
}
