//! Engine configuration.

use fmat_poly::MonomialOrder;

/// Configuration for the engine and its worker pool.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Number of worker threads (at least 1).
    pub worker_count: usize,
    /// Rounds with less work than this run in the parent.
    pub serial_threshold: u64,
    /// Skip pentagon equations whose left-hand side vanishes.
    ///
    /// This is a heuristic: such equations are assumed to carry no new
    /// information, which has not been proven.
    pub prune_pentagons: bool,
    /// Numeric tolerance of the verification pass.
    pub verify_tolerance: f64,
    /// Positions between verification progress reports.
    pub progress_interval: u64,
    /// Term order for local Gröbner bases.
    pub term_order: MonomialOrder,
    /// Re-reduce every reduced equation and fail if it changes.
    pub check_reductions: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: std::thread::available_parallelism().map_or(1, usize::from),
            serial_threshold: 100,
            prune_pentagons: false,
            verify_tolerance: 5e-8,
            progress_interval: 50_000_000,
            term_order: MonomialOrder::Grevlex,
            check_reductions: false,
        }
    }
}

impl EngineConfig {
    /// Sets the number of workers.
    #[must_use]
    pub fn with_workers(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count.max(1);
        self
    }

    /// Sets the serial fallback threshold.
    #[must_use]
    pub fn with_serial_threshold(mut self, threshold: u64) -> Self {
        self.serial_threshold = threshold;
        self
    }

    /// Enables or disables pentagon pruning.
    #[must_use]
    pub fn with_prune_pentagons(mut self, prune: bool) -> Self {
        self.prune_pentagons = prune;
        self
    }

    /// Sets the verification tolerance.
    #[must_use]
    pub fn with_verify_tolerance(mut self, tolerance: f64) -> Self {
        self.verify_tolerance = tolerance;
        self
    }

    /// Sets the verification progress interval.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: u64) -> Self {
        self.progress_interval = interval.max(1);
        self
    }

    /// Sets the term order for local Gröbner bases.
    #[must_use]
    pub fn with_term_order(mut self, order: MonomialOrder) -> Self {
        self.term_order = order;
        self
    }

    /// Enables or disables reduction stability checks.
    #[must_use]
    pub fn with_check_reductions(mut self, check: bool) -> Self {
        self.check_reductions = check;
        self
    }
}
