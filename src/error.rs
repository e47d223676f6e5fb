//! Error types for the island-model engine.

use thiserror::Error;

/// Boxed error raised by a user-supplied evolve strategy.
pub type StrategyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for engine construction and evolution.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The configuration cannot describe a runnable population.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A strategy operation (generate, evaluate, crossover, mutation or stop) failed.
    ///
    /// The engine does not repair or retry: the current generation is
    /// abandoned and the engine refuses to evolve further.
    #[error("Evolve strategy failed: {0}")]
    Strategy(#[source] StrategyError),

    /// A previous strategy error left the population in an unusable state.
    #[error("Engine aborted by an earlier strategy error")]
    Aborted,

    /// The dedicated worker thread pool could not be built.
    #[error("Worker pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl EngineError {
    /// Wraps a strategy error.
    pub fn strategy<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Strategy(Box::new(err))
    }
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
