//! # fmat
//!
//! Parallel generation, reduction and solving of the pentagon and hexagon
//! equations of fusion rings.
//!
//! ## Features
//!
//! - **Exact Arithmetic**: rational coefficients over big integers
//! - **Canonical Equations**: sparse polynomials with structural equality
//! - **Gröbner Bases**: Buchberger with sugar selection and rayon reduction
//! - **Worker Pool**: per-thread factory snapshots behind pool-scoped handles
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fmat::prelude::*;
//!
//! let factory = Factory::from_table(FusionTable::cyclic(3))?;
//! let mut engine = Engine::new(factory, EngineConfig::default());
//! engine.start_pool()?;
//! let hexagons = engine.generate_hexagons()?;
//! let bases = engine.compute_local_bases(&hexagons.equations_vec())?;
//! engine.shutdown()?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use fmat_engine as engine;
pub use fmat_groebner as groebner;
pub use fmat_poly as poly;
pub use fmat_rings as rings;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use fmat_engine::{
        Anyon, Engine, EngineConfig, EngineError, Factory, FusionRules, FusionTable, MergedResults,
        Operation, OperationKind, Partition, WorkerPool,
    };
    pub use fmat_groebner::{groebner_basis, BuchbergerSolver, GroebnerConfig, GroebnerSolver};
    pub use fmat_poly::{Monomial, MonomialOrder, SparsePoly, Var};
    pub use fmat_rings::{Field, Ring, Q};
}
