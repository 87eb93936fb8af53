//! The state a worker carries between dispatches.

use tracing::debug;

use crate::buffer::{ResultBuffer, WorkerOutput};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::factory::{Factory, StateDigest};
use crate::handle::FactoryHandle;
use crate::operation::{execute, Operation};
use crate::registry::Registry;

/// One worker: its registry of factory copies and its result buffer.
#[derive(Debug)]
pub struct WorkerContext {
    worker_id: usize,
    config: EngineConfig,
    registry: Registry,
    buffer: ResultBuffer,
}

impl WorkerContext {
    /// Creates a context for a worker of pool `pool`.
    #[must_use]
    pub fn new(worker_id: usize, pool: u32, config: EngineConfig) -> Self {
        Self {
            worker_id,
            config,
            registry: Registry::new(pool),
            buffer: ResultBuffer::new(),
        }
    }

    /// Returns the worker id.
    #[must_use]
    pub fn worker_id(&self) -> usize {
        self.worker_id
    }

    /// Returns the handle registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Registers this worker's copy of a factory under a pool handle.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle belongs to another pool.
    pub fn install(&mut self, handle: FactoryHandle, factory: Factory) -> Result<()> {
        self.registry.install(handle, factory)
    }

    /// Resolves `handle` and runs `op` on the local factory copy.
    ///
    /// Every dispatch starts a new round: results left over from an earlier
    /// round that was never collected are discarded first.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle does not resolve here, and
    /// propagates errors of the operation.
    pub fn dispatch(&mut self, handle: FactoryHandle, op: &Operation) -> Result<usize> {
        let stale = self.buffer.len();
        if stale > 0 {
            debug!(worker = self.worker_id, stale, "discarding uncollected results");
            self.buffer.clear();
        }
        let factory = self.registry.resolve_mut(handle)?;
        let appended = execute(factory, op, &mut self.buffer, &self.config)?;
        debug!(worker = self.worker_id, operation = %op.kind(), appended, "operation finished");
        Ok(appended)
    }

    /// Drains the result buffer.
    pub fn collect(&mut self) -> Vec<WorkerOutput> {
        self.buffer.drain()
    }

    /// Returns the number of buffered results.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Summarizes the local factory state.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle does not resolve here.
    pub fn digest(&self, handle: FactoryHandle) -> Result<StateDigest> {
        self.registry.resolve(handle).map(Factory::digest)
    }

    /// Drops the local factory copy.
    ///
    /// # Errors
    ///
    /// Returns `DanglingHandle` if the handle does not resolve here.
    pub fn release(&mut self, handle: FactoryHandle) -> Result<()> {
        self.registry.release(handle).map(drop)
    }

    /// Drops every factory copy and buffered result.
    pub fn teardown(&mut self) {
        self.registry.clear();
        self.buffer.clear();
    }
}
