//! Engine configuration.
//!
//! [`EngineConfig`] holds every parameter of an island-model run. It is
//! copied into the engine at construction and never changes afterwards.

use crate::diagnostics::LogLevel;
use std::time::Duration;

/// Configuration for the island-model engine.
///
/// For every limit and migration interval, `0` disables the criterion.
///
/// # Defaults
///
/// ```
/// use u_archipelago::island::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.archipelago_count, 1);
/// assert_eq!(config.islands_per_archipelago, 4);
/// assert_eq!(config.solutions_per_island, 50);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use u_archipelago::island::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_archipelago_count(2)
///     .with_islands_per_archipelago(8)
///     .with_island_migration(2, 5)
///     .with_crossover_rate(0.7)
///     .with_seed(42);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Number of archipelagos.
    pub archipelago_count: usize,

    /// Number of islands in every archipelago.
    pub islands_per_archipelago: usize,

    /// Number of solutions kept in every island after selection.
    pub solutions_per_island: usize,

    /// Probability, per individual and generation, of producing a crossover child (0.0–1.0).
    pub crossover_rate: f64,

    /// Probability, per individual and generation, of producing a mutant (0.0–1.0).
    pub mutation_rate: f64,

    /// Number of solutions moved from an island to its successor on migration.
    ///
    /// Clamped to `solutions_per_island` at engine construction.
    pub island_migration_size: usize,

    /// Generations between two island migrations (0 to disable).
    pub island_migration_interval: usize,

    /// Number of solutions moved between the lead islands of neighboring archipelagos.
    ///
    /// Clamped to `solutions_per_island` at engine construction.
    pub archipelago_migration_size: usize,

    /// Generations between two archipelago migrations (0 to disable).
    pub archipelago_migration_interval: usize,

    /// Stop once the best grade stayed unchanged for more than this many
    /// consecutive generations (0 to disable).
    pub stagnation_limit: usize,

    /// Maximum number of generations (0 to disable).
    pub max_generations: usize,

    /// Wall-clock limit, checked between generations (`Duration::ZERO` to disable).
    ///
    /// The running generation is never interrupted, so the actual runtime
    /// may exceed this by one generation's worth of work.
    pub time_limit: Duration,

    /// Most verbose diagnostics level emitted.
    pub log_level: LogLevel,

    /// Random seed for reproducibility.
    ///
    /// `None` uses a random seed. A seeded run is reproducible for a fixed
    /// worker count, whether or not `parallel` is set.
    pub seed: Option<u64>,

    /// Whether islands are processed on a dedicated rayon pool.
    pub parallel: bool,

    /// Number of workers. `None` uses the platform's available parallelism.
    pub worker_count: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            archipelago_count: 1,
            islands_per_archipelago: 4,
            solutions_per_island: 50,
            crossover_rate: 0.8,
            mutation_rate: 0.2,
            island_migration_size: 2,
            island_migration_interval: 10,
            archipelago_migration_size: 2,
            archipelago_migration_interval: 50,
            stagnation_limit: 100,
            max_generations: 500,
            time_limit: Duration::ZERO,
            log_level: LogLevel::Minimal,
            seed: None,
            parallel: true,
            worker_count: None,
        }
    }
}

impl EngineConfig {
    /// Sets the number of archipelagos.
    pub fn with_archipelago_count(mut self, n: usize) -> Self {
        self.archipelago_count = n;
        self
    }

    /// Sets the number of islands per archipelago.
    pub fn with_islands_per_archipelago(mut self, n: usize) -> Self {
        self.islands_per_archipelago = n;
        self
    }

    /// Sets the number of solutions per island.
    pub fn with_solutions_per_island(mut self, n: usize) -> Self {
        self.solutions_per_island = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the island migration size and interval.
    pub fn with_island_migration(mut self, size: usize, interval: usize) -> Self {
        self.island_migration_size = size;
        self.island_migration_interval = interval;
        self
    }

    /// Sets the archipelago migration size and interval.
    pub fn with_archipelago_migration(mut self, size: usize, interval: usize) -> Self {
        self.archipelago_migration_size = size;
        self.archipelago_migration_interval = interval;
        self
    }

    /// Sets the stagnation limit (0 to disable).
    pub fn with_stagnation_limit(mut self, limit: usize) -> Self {
        self.stagnation_limit = limit;
        self
    }

    /// Sets the maximum number of generations (0 to disable).
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the wall-clock time limit (`Duration::ZERO` to disable).
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    /// Sets the diagnostics level.
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Sets the random seed for reproducibility.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enables or disables the parallel worker pool.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the number of workers.
    pub fn with_worker_count(mut self, n: usize) -> Self {
        self.worker_count = Some(n);
        self
    }

    /// Total number of islands across all archipelagos.
    pub fn island_count(&self) -> usize {
        self.archipelago_count * self.islands_per_archipelago
    }

    /// Preset for a quick run: one small archipelago, 10s limit.
    pub fn fast() -> Self {
        Self {
            islands_per_archipelago: 2,
            solutions_per_island: 30,
            max_generations: 100,
            stagnation_limit: 20,
            island_migration_interval: 5,
            archipelago_migration_interval: 0,
            time_limit: Duration::from_secs(10),
            ..Self::default()
        }
    }

    /// Preset trading solution quality against time, 30s limit.
    pub fn balanced() -> Self {
        Self {
            archipelago_count: 2,
            islands_per_archipelago: 4,
            solutions_per_island: 50,
            max_generations: 300,
            stagnation_limit: 50,
            time_limit: Duration::from_secs(30),
            ..Self::default()
        }
    }

    /// Preset for quality: several archipelagos, long stagnation window, 60s limit.
    pub fn quality() -> Self {
        Self {
            archipelago_count: 4,
            islands_per_archipelago: 8,
            solutions_per_island: 80,
            max_generations: 1000,
            stagnation_limit: 150,
            island_migration_size: 4,
            archipelago_migration_size: 4,
            time_limit: Duration::from_secs(60),
            ..Self::default()
        }
    }

    /// Returns a copy with migration sizes clamped to the island size.
    pub fn clamped(&self) -> Self {
        Self {
            island_migration_size: self.island_migration_size.min(self.solutions_per_island),
            archipelago_migration_size: self
                .archipelago_migration_size
                .min(self.solutions_per_island),
            ..self.clone()
        }
    }

    /// Validates the configuration.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    /// Oversized migrations are not an error; see [`clamped`](Self::clamped).
    pub fn validate(&self) -> Result<(), String> {
        if self.archipelago_count == 0 {
            return Err("archipelago_count must be at least 1".into());
        }
        if self.islands_per_archipelago == 0 {
            return Err("islands_per_archipelago must be at least 1".into());
        }
        if self.solutions_per_island == 0 {
            return Err("solutions_per_island must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err("crossover_rate must be within [0, 1]".into());
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err("mutation_rate must be within [0, 1]".into());
        }
        if self.worker_count == Some(0) {
            return Err("worker_count must be positive or None".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.archipelago_count, 1);
        assert_eq!(config.islands_per_archipelago, 4);
        assert_eq!(config.solutions_per_island, 50);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert!((config.mutation_rate - 0.2).abs() < 1e-10);
        assert_eq!(config.time_limit, Duration::ZERO);
        assert_eq!(config.log_level, LogLevel::Minimal);
        assert!(config.parallel);
        assert!(config.seed.is_none());
        assert!(config.worker_count.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_archipelago_count(3)
            .with_islands_per_archipelago(5)
            .with_solutions_per_island(20)
            .with_crossover_rate(0.6)
            .with_mutation_rate(0.05)
            .with_island_migration(3, 7)
            .with_archipelago_migration(1, 21)
            .with_stagnation_limit(9)
            .with_max_generations(77)
            .with_time_limit(Duration::from_millis(1500))
            .with_log_level(LogLevel::Island)
            .with_seed(42)
            .with_parallel(false)
            .with_worker_count(3);

        assert_eq!(config.archipelago_count, 3);
        assert_eq!(config.islands_per_archipelago, 5);
        assert_eq!(config.island_count(), 15);
        assert_eq!(config.solutions_per_island, 20);
        assert!((config.crossover_rate - 0.6).abs() < 1e-10);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert_eq!(config.island_migration_size, 3);
        assert_eq!(config.island_migration_interval, 7);
        assert_eq!(config.archipelago_migration_size, 1);
        assert_eq!(config.archipelago_migration_interval, 21);
        assert_eq!(config.stagnation_limit, 9);
        assert_eq!(config.max_generations, 77);
        assert_eq!(config.time_limit, Duration::from_millis(1500));
        assert_eq!(config.log_level, LogLevel::Island);
        assert_eq!(config.seed, Some(42));
        assert!(!config.parallel);
        assert_eq!(config.worker_count, Some(3));
    }

    #[test]
    fn test_clamp_rates() {
        let config = EngineConfig::default()
            .with_crossover_rate(-0.5)
            .with_mutation_rate(2.0);
        assert!((config.crossover_rate - 0.0).abs() < 1e-10);
        assert!((config.mutation_rate - 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_clamped_migration_sizes() {
        let config = EngineConfig::default()
            .with_solutions_per_island(5)
            .with_island_migration(12, 1)
            .with_archipelago_migration(6, 1)
            .clamped();
        assert_eq!(config.island_migration_size, 5);
        assert_eq!(config.archipelago_migration_size, 5);
        assert_eq!(config.island_migration_interval, 1);
    }

    #[test]
    fn test_clamped_keeps_small_sizes() {
        let config = EngineConfig::default().with_island_migration(1, 3);
        assert_eq!(config.clamped(), config);
    }

    #[test]
    fn test_validate_zero_counts() {
        assert!(EngineConfig::default().with_archipelago_count(0).validate().is_err());
        assert!(EngineConfig::default()
            .with_islands_per_archipelago(0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_solutions_per_island(0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rates_set_directly() {
        let mut config = EngineConfig::default();
        config.crossover_rate = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.mutation_rate = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_workers() {
        let config = EngineConfig::default().with_worker_count(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_oversized_migration_is_valid() {
        let config = EngineConfig::default()
            .with_solutions_per_island(3)
            .with_island_migration(10, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets_are_valid() {
        for config in [
            EngineConfig::fast(),
            EngineConfig::balanced(),
            EngineConfig::quality(),
        ] {
            assert!(config.validate().is_ok(), "{config:?}");
            assert!(config.time_limit > Duration::ZERO);
        }
        assert_eq!(EngineConfig::quality().island_count(), 32);
        assert_eq!(EngineConfig::fast().archipelago_migration_interval, 0);
    }
}
