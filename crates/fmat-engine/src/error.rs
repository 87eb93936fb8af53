//! Error types for the engine.

use fmat_poly::Var;
use thiserror::Error;

use crate::handle::FactoryHandle;

/// Errors raised by the engine.
///
/// None of these are recovered locally; they propagate to whoever drives
/// the rounds, which decides whether to retry a round or abort.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A dispatch named an operation that does not exist.
    #[error("unknown operation: {0:?}")]
    UnknownOperation(String),

    /// A handle did not resolve in the current worker.
    #[error("handle {0} does not resolve in this worker")]
    DanglingHandle(FactoryHandle),

    /// A partition descriptor with `worker_id >= worker_count`.
    #[error("worker {worker_id} out of range for {worker_count} workers")]
    PartitionOutOfRange {
        /// The offending worker id.
        worker_id: usize,
        /// The number of workers.
        worker_count: usize,
    },

    /// Reducing an already reduced equation changed it again.
    #[error("reduction of {equation} is not stable: {first} then {second}")]
    ReductionAmbiguity {
        /// The input equation.
        equation: String,
        /// Result of the first reduction.
        first: String,
        /// Result of reducing `first`.
        second: String,
    },

    /// A worker thread could not be started.
    #[error("failed to spawn worker {worker_id}")]
    WorkerSpawn {
        /// The worker that failed to start.
        worker_id: usize,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A worker thread died or hung up its channel.
    #[error("worker {worker_id} is gone")]
    WorkerLost {
        /// The lost worker.
        worker_id: usize,
    },

    /// `radix^arity` does not fit the index type.
    #[error("index space {radix}^{arity} is too large")]
    IndexSpaceTooLarge {
        /// Number of basis elements.
        radix: usize,
        /// Tuple length.
        arity: usize,
    },

    /// The fusion ring has labels beyond the range of an anyon label.
    #[error("fusion ring of rank {rank} exceeds the largest supported rank {max}")]
    RankTooLarge {
        /// Rank of the fusion rules.
        rank: usize,
        /// Largest supported rank.
        max: usize,
    },

    /// A state update whose per-variable data does not match the factory.
    #[error("state update covers {found} variables, factory has {expected}")]
    InconsistentUpdate {
        /// Variable count of the factory.
        expected: usize,
        /// Variable count of the update.
        found: usize,
    },

    /// A mutator named a variable the factory does not have.
    #[error("unknown variable {var} (factory has {count})")]
    UnknownVariable {
        /// The offending variable.
        var: Var,
        /// Variable count of the factory.
        count: usize,
    },
}

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;
