//! Numeric verification of pentagon equations.
//!
//! Violations are reported as data, never as errors: each pentagon whose
//! residual is not within the tolerance becomes a deviation in the result
//! buffer. Unknown values evaluate to NaN and always count as misses.

use tracing::info;

use crate::buffer::{ResultBuffer, WorkerOutput};
use crate::error::Result;
use crate::equations::NumericFvars;
use crate::factory::Factory;
use crate::partition::{IndexSpace, Partition};

/// The summary of one worker's verification sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VerificationReport {
    /// Positions examined.
    pub checked: u64,
    /// Pentagons outside the tolerance.
    pub misses: u64,
}

impl VerificationReport {
    /// Adds another report to this one.
    pub fn absorb(&mut self, other: Self) {
        self.checked += other.checked;
        self.misses += other.misses;
    }
}

/// Checks every pentagon of `partition` and records the misses.
///
/// # Errors
///
/// Returns `IndexSpaceTooLarge` if `basis^9` does not fit a `u64`.
pub fn verify_pentagons(
    factory: &Factory,
    partition: Partition,
    tolerance: f64,
    progress_interval: u64,
    buffer: &mut ResultBuffer,
) -> Result<VerificationReport> {
    let space = IndexSpace::<9>::new(factory.basis().len())?;
    let numeric = NumericFvars::new(factory);
    let interval = progress_interval.max(1);
    let worker = partition.worker_id();
    let mut report = VerificationReport::default();

    for pos in partition.positions(space.total()) {
        let tuple = space.tuple_at(pos);
        let residual = numeric.pentagon_residual(tuple);
        if residual.is_nan() || residual.abs() > tolerance {
            buffer.push(WorkerOutput::Deviation { tuple, residual });
            report.misses += 1;
        }

        report.checked += 1;
        if report.checked % interval == 0 {
            info!(worker, checked = report.checked, total = space.total(), "verifying pentagons");
        }
    }

    info!(worker, checked = report.checked, misses = report.misses, "pentagon verification done");
    Ok(report)
}
