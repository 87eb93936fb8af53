//! # fmat-engine
//!
//! Parallel generation, reduction and solving of the pentagon and hexagon
//! equations of a fusion ring.
//!
//! This crate provides:
//! - A [`Factory`] holding one polynomial variable per F-symbol and what is
//!   known about each variable
//! - Hexagon and pentagon generators over lazily striped index spaces
//! - Canonical equation reduction with a monic-square fast path
//! - Local Gröbner bases over compact variable remaps
//! - A [`WorkerPool`] of threads, each owning a factory snapshot resolved
//!   through a pool-scoped [`FactoryHandle`]
//! - An [`Engine`] running rounds over the pool with a serial fallback
//!
//! ## Rounds
//!
//! ```rust,ignore
//! use fmat_engine::{Engine, EngineConfig, Factory, FusionTable};
//!
//! let mut engine = Engine::new(Factory::from_table(FusionTable::cyclic(3))?, EngineConfig::default());
//! engine.start_pool()?;
//! let hexagons = engine.generate_hexagons()?;
//! let bases = engine.compute_local_bases(&hexagons.equations_vec())?;
//! engine.factory_mut().mark_nonzero(fmat_poly::Var(0))?;
//! engine.broadcast()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod buffer;
pub mod config;
pub mod context;
pub mod driver;
pub mod equations;
pub mod error;
pub mod factory;
pub mod fusion;
pub mod handle;
pub mod local_basis;
pub mod operation;
pub mod partition;
pub mod pool;
pub mod reduce;
pub mod registry;
pub mod verify;

#[cfg(test)]
mod proptests;

pub use buffer::{MergedResults, ResultBuffer, WorkerOutput};
pub use config::EngineConfig;
pub use context::WorkerContext;
pub use driver::Engine;
pub use equations::{hexagon, pentagon, NumericFvars};
pub use error::{EngineError, Result};
pub use factory::{FSymbol, Factory, StateDigest, StateUpdate};
pub use fusion::{Anyon, FusionRules, FusionTable, MAX_RANK};
pub use handle::FactoryHandle;
pub use local_basis::{compute_basis, partition_equations, VariableRemap};
pub use operation::{execute, Operation, OperationKind};
pub use partition::{assign, IndexSpace, Partition};
pub use pool::WorkerPool;
pub use reduce::{reduce, reduce_checked, Reduced, ReductionParams, ReductionPath};
pub use registry::Registry;
pub use verify::{verify_pentagons, VerificationReport};
