//! The parent side: rounds over the pool with a serial fallback.

use std::sync::Arc;

use fmat_poly::SparsePoly;
use fmat_rings::Q;
use tracing::info;

use crate::buffer::{MergedResults, ResultBuffer};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::factory::{Factory, StateDigest};
use crate::local_basis::partition_equations;
use crate::operation::{execute, Operation};
use crate::partition::Partition;
use crate::pool::WorkerPool;
use crate::verify::VerificationReport;

/// Drives rounds of operations over a factory.
///
/// The parent's factory is authoritative. Mutate it through
/// [`factory_mut`](Self::factory_mut), then call
/// [`broadcast`](Self::broadcast) before the next round so that every
/// worker sees the same state.
#[derive(Debug)]
pub struct Engine {
    factory: Factory,
    config: EngineConfig,
    buffer: ResultBuffer,
    pool: Option<WorkerPool>,
}

impl Engine {
    /// Creates an engine; no workers are started yet.
    #[must_use]
    pub fn new(factory: Factory, config: EngineConfig) -> Self {
        Self {
            factory,
            config,
            buffer: ResultBuffer::new(),
            pool: None,
        }
    }

    /// Returns the parent's factory.
    #[must_use]
    pub fn factory(&self) -> &Factory {
        &self.factory
    }

    /// Returns the parent's factory for mutation.
    pub fn factory_mut(&mut self) -> &mut Factory {
        &mut self.factory
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the worker pool, if started.
    #[must_use]
    pub fn pool(&self) -> Option<&WorkerPool> {
        self.pool.as_ref()
    }

    /// Forks the worker pool from the current factory.
    ///
    /// Does nothing with a single worker or when a pool is already running.
    ///
    /// # Errors
    ///
    /// Returns `WorkerSpawn` if a worker cannot be started.
    pub fn start_pool(&mut self) -> Result<()> {
        if self.pool.is_none() && self.config.worker_count > 1 {
            self.pool = Some(WorkerPool::fork(&self.factory, &self.config)?);
        }
        Ok(())
    }

    /// Runs one round, in the parent when the work is small.
    fn run_round(&mut self, op: &Operation) -> Result<MergedResults> {
        let size = op.work_size(self.factory.basis().len())?;
        let (merged, workers) = match &self.pool {
            Some(pool) if size >= self.config.serial_threshold => (pool.map_reduce(op)?, pool.worker_count()),
            _ => {
                let whole = op.with_partition(Partition::whole());
                self.buffer.clear();
                let ran = execute(&mut self.factory, &whole, &mut self.buffer, &self.config);
                let items = self.buffer.drain();
                ran?;
                let mut merged = MergedResults::new();
                merged.merge(items);
                (merged, 1)
            }
        };

        info!(
            operation = %op.kind(),
            workers,
            size,
            equations = merged.equations.len(),
            deviations = merged.deviations.len(),
            "round complete"
        );
        Ok(merged)
    }

    /// Generates and reduces every hexagon equation.
    ///
    /// # Errors
    ///
    /// Propagates worker and reduction errors.
    pub fn generate_hexagons(&mut self) -> Result<MergedResults> {
        self.run_round(&Operation::GenerateHexagons {
            partition: Partition::whole(),
        })
    }

    /// Generates and reduces every pentagon equation.
    ///
    /// # Errors
    ///
    /// Propagates worker and reduction errors.
    pub fn generate_pentagons(&mut self) -> Result<MergedResults> {
        self.run_round(&Operation::GeneratePentagons {
            partition: Partition::whole(),
            prune: self.config.prune_pentagons,
        })
    }

    /// Reduces equations against the current state.
    ///
    /// # Errors
    ///
    /// Propagates worker and reduction errors.
    pub fn update_reduce(&mut self, equations: Vec<SparsePoly<Q>>) -> Result<MergedResults> {
        self.run_round(&Operation::UpdateAndReduce {
            equations: Arc::new(equations),
            partition: Partition::whole(),
        })
    }

    /// Splits equations into independent batches and computes the
    /// Gröbner basis of each.
    ///
    /// # Errors
    ///
    /// Propagates worker and reduction errors.
    pub fn compute_local_bases(&mut self, equations: &[SparsePoly<Q>]) -> Result<MergedResults> {
        let batches = partition_equations(equations);
        self.run_round(&Operation::ComputeLocalBasis {
            batches: Arc::new(batches),
            partition: Partition::whole(),
            order: self.config.term_order,
        })
    }

    /// Pushes the parent's state into every worker.
    ///
    /// # Errors
    ///
    /// Returns the first worker error after every worker has answered.
    pub fn broadcast(&mut self) -> Result<()> {
        if let Some(pool) = &self.pool {
            pool.broadcast(Arc::new(self.factory.state_update()))?;
            info!(operation = "broadcast-update", workers = pool.worker_count(), "round complete");
        }
        Ok(())
    }

    /// Checks every pentagon numerically against the current state.
    ///
    /// # Errors
    ///
    /// Returns `IndexSpaceTooLarge` or a worker error; numeric violations
    /// are returned as deviations.
    pub fn verify(&mut self) -> Result<(VerificationReport, MergedResults)> {
        let op = Operation::Verify {
            partition: Partition::whole(),
            tolerance: self.config.verify_tolerance,
            progress_interval: self.config.progress_interval,
        };
        let checked = op.work_size(self.factory.basis().len())?;
        let merged = self.run_round(&op)?;
        let report = VerificationReport {
            checked,
            misses: merged.deviations.len() as u64,
        };
        Ok((report, merged))
    }

    /// Returns the parent's digest followed by each worker's.
    ///
    /// # Errors
    ///
    /// Returns a worker error.
    pub fn digests(&self) -> Result<Vec<StateDigest>> {
        let mut digests = vec![self.factory.digest()];
        if let Some(pool) = &self.pool {
            digests.extend(pool.digests()?);
        }
        Ok(digests)
    }

    /// Releases the handle in every worker and stops the pool.
    ///
    /// # Errors
    ///
    /// Returns a release error; the pool is stopped regardless.
    pub fn shutdown(&mut self) -> Result<()> {
        match self.pool.take() {
            Some(mut pool) => {
                let released = pool.release();
                pool.shutdown();
                released
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fusion::FusionTable;

    #[test]
    fn test_serial_engine_without_pool() {
        let mut engine = Engine::new(
            Factory::from_table(FusionTable::cyclic(2)).unwrap(),
            EngineConfig::default().with_workers(1),
        );
        engine.start_pool().unwrap();
        assert!(engine.pool().is_none());

        let hex = engine.generate_hexagons().unwrap();
        assert_eq!(hex.equations.len(), 1);
        assert_eq!(engine.digests().unwrap().len(), 1);
        engine.shutdown().unwrap();
    }

    #[test]
    fn test_shutdown_stops_pool() {
        let mut engine = Engine::new(
            Factory::from_table(FusionTable::cyclic(2)).unwrap(),
            EngineConfig::default().with_workers(2),
        );
        engine.start_pool().unwrap();
        assert_eq!(engine.pool().map(WorkerPool::worker_count), Some(2));
        engine.shutdown().unwrap();
        assert!(engine.pool().is_none());
    }
}
