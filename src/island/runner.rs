//! Island-model evolutionary loop.
//!
//! [`Engine`] owns the whole population and drives it generation by
//! generation: parallel crossover/mutation with truncation on every island,
//! then island migration and archipelago migration when due, then the
//! stagnation update. Stop criteria are checked between generations.

use super::config::EngineConfig;
use super::migration;
use super::population::Archipelago;
use super::termination::{StopReason, Termination};
use super::types::{EvolveStrategy, Grade, SolutionGrade};
use super::workers::WorkerPool;
use crate::diagnostics::{Diagnostics, DiagnosticsSink, LogLevel, TracingSink};
use crate::error::{EngineError, EngineResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Position of the island whose head is the global best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BestLocation {
    /// Archipelago index.
    pub archipelago: usize,
    /// Island index within the archipelago.
    pub island: usize,
}

/// Result of a complete run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolveResult<S, G> {
    /// The best solution found, with its grade.
    pub best: SolutionGrade<S, G>,

    /// Number of generations executed.
    pub generations: usize,

    /// Criterion that ended the run.
    pub stop_reason: StopReason,

    /// Wall-clock time from engine construction to the end of the run.
    pub elapsed: Duration,

    /// Best grade after initialization, then after each generation.
    pub grade_history: Vec<f64>,
}

/// Island-model GA engine.
///
/// # Usage
///
/// ```ignore
/// let config = EngineConfig::default().with_seed(42);
/// let mut engine = Engine::new(MyStrategy::new(), config)?;
/// let reason = engine.evolve()?;
/// println!("{reason}: {:?}", engine.best_solution().grade);
/// ```
pub struct Engine<St: EvolveStrategy> {
    config: EngineConfig,
    archipelagos: Vec<Archipelago<St::Solution, St::Grade>>,
    workers: WorkerPool<St>,
    diagnostics: Diagnostics,
    termination: Termination,
    best: BestLocation,
    grade_history: Vec<f64>,
    cancel: Option<Arc<AtomicBool>>,
    failed: bool,
}

impl<St: EvolveStrategy> Engine<St> {
    /// Builds and initializes an engine reporting through `tracing`.
    pub fn new(strategy: St, config: EngineConfig) -> EngineResult<Self> {
        Self::with_diagnostics(strategy, config, Arc::new(TracingSink))
    }

    /// Builds and initializes an engine reporting to `sink`.
    ///
    /// The configuration is validated, migration sizes are clamped to the
    /// island size, one strategy clone is made per worker, and every island
    /// is filled with generated solutions.
    pub fn with_diagnostics(
        strategy: St,
        config: EngineConfig,
        sink: Arc<dyn DiagnosticsSink>,
    ) -> EngineResult<Self> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        let diagnostics = Diagnostics::new(config.log_level, sink);

        let clamped = config.clamped();
        if clamped.island_migration_size != config.island_migration_size {
            diagnostics.emit(LogLevel::Minimal, || {
                format!(
                    "island_migration_size {} exceeds island size, clamped to {}",
                    config.island_migration_size, clamped.island_migration_size
                )
            });
        }
        if clamped.archipelago_migration_size != config.archipelago_migration_size {
            diagnostics.emit(LogLevel::Minimal, || {
                format!(
                    "archipelago_migration_size {} exceeds island size, clamped to {}",
                    config.archipelago_migration_size, clamped.archipelago_migration_size
                )
            });
        }
        let config = clamped;

        let worker_count = config.worker_count.unwrap_or_else(default_worker_count);
        let seed = config.seed.unwrap_or_else(rand::random);
        let workers = WorkerPool::new(&strategy, worker_count, seed, config.parallel)?;

        diagnostics.emit(LogLevel::Minimal, || {
            format!(
                "engine: {} archipelago(s) x {} island(s) x {} solution(s), {} worker(s){}, seed {}",
                config.archipelago_count,
                config.islands_per_archipelago,
                config.solutions_per_island,
                workers.len(),
                if workers.is_parallel() { " in parallel" } else { "" },
                seed
            )
        });

        let archipelagos = (0..config.archipelago_count)
            .map(|a| Archipelago::new(a, config.islands_per_archipelago))
            .collect();

        let mut engine = Self {
            config,
            archipelagos,
            workers,
            diagnostics,
            termination: Termination::start(),
            best: BestLocation::default(),
            grade_history: Vec::new(),
            cancel: None,
            failed: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Attaches a cancellation flag.
    ///
    /// When the flag is set, the run stops at the next generation boundary.
    pub fn with_cancel(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Builds an engine, evolves it until a stop criterion fires, and
    /// returns the best solution.
    pub fn run(
        strategy: St,
        config: EngineConfig,
    ) -> EngineResult<EvolveResult<St::Solution, St::Grade>> {
        let mut engine = Self::new(strategy, config)?;
        let stop_reason = engine.evolve()?;
        Ok(engine.into_result(stop_reason))
    }

    fn initialize(&mut self) -> EngineResult<()> {
        let size = self.config.solutions_per_island;
        let diagnostics = &self.diagnostics;
        for arch in &mut self.archipelagos {
            self.workers.partition(arch.islands_mut(), |worker, islands| {
                islands
                    .iter_mut()
                    .try_for_each(|island| island.fill(worker, size, diagnostics))
            })?;
            diagnostics.emit(LogLevel::MinimalPlus, || {
                format!("archipelago {} initialized", arch.index())
            });
        }

        self.refresh_best();
        let best = self.best_solution().grade.clone();
        self.grade_history.push(best.to_f64());
        self.diagnostics.emit(LogLevel::MinimalPlus, || {
            format!("initialization done, best grade {best:?}")
        });
        Ok(())
    }

    /// Evolves until a stop criterion fires.
    pub fn evolve(&mut self) -> EngineResult<StopReason> {
        loop {
            if let Some(reason) = self.check_termination()? {
                let generations = self.generation_count();
                let best = &self.best_solution().grade;
                self.diagnostics.emit(LogLevel::Minimal, || {
                    format!("stopped after {generations} generation(s): {reason}, best grade {best:?}")
                });
                return Ok(reason);
            }
            self.step()?;
        }
    }

    /// Evaluates the stop criteria in order: generation limit, time limit,
    /// stagnation limit, strategy predicate, cancellation.
    ///
    /// An error from the strategy predicate aborts the engine like an
    /// error during [`step`](Self::step).
    pub fn check_termination(&mut self) -> EngineResult<Option<StopReason>> {
        if self.failed {
            return Err(EngineError::Aborted);
        }
        let result = self.evaluate_stop_criteria();
        self.failed = result.is_err();
        result
    }

    fn evaluate_stop_criteria(&mut self) -> EngineResult<Option<StopReason>> {
        if let Some(reason) = self.termination.limit_reached(&self.config) {
            return Ok(Some(reason));
        }

        let best = head(&self.archipelagos, self.best);
        let stop = self
            .workers
            .primary()
            .strategy
            .stop(&best.solution, &best.grade)
            .map_err(EngineError::strategy)?;
        if stop {
            return Ok(Some(StopReason::StrategyStop));
        }

        if let Some(flag) = &self.cancel {
            if flag.load(Ordering::Relaxed) {
                return Ok(Some(StopReason::Cancelled));
            }
        }
        Ok(None)
    }

    /// Runs one generation.
    ///
    /// A strategy error aborts the generation midway, so islands may be left
    /// oversized and unsorted. The engine is unusable afterwards: every later
    /// `step`, `check_termination` or `evolve` returns [`EngineError::Aborted`].
    /// Read queries still work but describe the interrupted state.
    pub fn step(&mut self) -> EngineResult<()> {
        if self.failed {
            return Err(EngineError::Aborted);
        }
        let result = self.run_generation();
        self.failed = result.is_err();
        result
    }

    fn run_generation(&mut self) -> EngineResult<()> {
        let generation = self.termination.begin_generation();
        let before = self.best_solution().grade.clone();

        let crossover_rate = self.config.crossover_rate;
        let mutation_rate = self.config.mutation_rate;
        let diagnostics = &self.diagnostics;
        for arch in &mut self.archipelagos {
            self.workers.partition(arch.islands_mut(), |worker, islands| {
                islands.iter_mut().try_for_each(|island| {
                    island.evolve(worker, crossover_rate, mutation_rate, diagnostics)
                })
            })?;
        }
        self.refresh_best();

        let k = self.config.island_migration_size;
        if k > 0 && migration::is_due(generation, self.config.island_migration_interval) {
            for arch in &mut self.archipelagos {
                migration::migrate_islands(arch, k);
            }
            self.diagnostics.emit(LogLevel::Archipelago, || {
                format!("generation {generation}: island migration of {k} solution(s)")
            });
            self.refresh_best();
        }

        let k = self.config.archipelago_migration_size;
        if k > 0 && migration::is_due(generation, self.config.archipelago_migration_interval) {
            migration::migrate_archipelagos(&mut self.archipelagos, k);
            self.diagnostics.emit(LogLevel::Archipelago, || {
                format!("generation {generation}: archipelago migration of {k} solution(s)")
            });
            self.refresh_best();
        }

        if self.diagnostics.enabled(LogLevel::Archipelago) {
            for arch in &self.archipelagos {
                if let Some(i) = arch.best_island() {
                    let grade = &arch.islands()[i].members()[0].grade;
                    self.diagnostics.emit(LogLevel::Archipelago, || {
                        format!(
                            "generation {generation}: archipelago {} best grade {grade:?} on island {i}",
                            arch.index()
                        )
                    });
                }
            }
        }

        let after = self.best_solution().grade.clone();
        self.termination.record_best(&before, &after);
        self.grade_history.push(after.to_f64());

        let same = self.termination.same_best();
        self.diagnostics.emit(LogLevel::Minimal, || {
            format!("generation {generation}: best grade {after:?}, unchanged for {same}")
        });
        Ok(())
    }

    fn refresh_best(&mut self) {
        if let Some(location) = locate_best(&self.archipelagos) {
            self.best = location;
        }
    }

    /// Whether a strategy error has aborted the engine.
    pub fn is_aborted(&self) -> bool {
        self.failed
    }

    /// Number of completed generations.
    pub fn generation_count(&self) -> usize {
        self.termination.generation()
    }

    /// Consecutive generations without a change of the best grade.
    pub fn stagnation_count(&self) -> usize {
        self.termination.same_best()
    }

    /// Time since the engine was built.
    pub fn time_elapsed(&self) -> Duration {
        self.termination.elapsed()
    }

    /// The current global best.
    pub fn best_solution(&self) -> &SolutionGrade<St::Solution, St::Grade> {
        head(&self.archipelagos, self.best)
    }

    /// Where the current global best lives.
    pub fn best_location(&self) -> BestLocation {
        self.best
    }

    /// The whole population.
    pub fn archipelagos(&self) -> &[Archipelago<St::Solution, St::Grade>] {
        &self.archipelagos
    }

    /// Best grade after initialization, then after each generation.
    pub fn grade_history(&self) -> &[f64] {
        &self.grade_history
    }

    /// The effective (clamped) configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of workers.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Consumes the engine, returning its best solution.
    pub fn into_best(self) -> SolutionGrade<St::Solution, St::Grade> {
        self.best_solution().clone()
    }

    /// Consumes the engine into a run summary.
    pub fn into_result(self, stop_reason: StopReason) -> EvolveResult<St::Solution, St::Grade> {
        EvolveResult {
            best: self.best_solution().clone(),
            generations: self.generation_count(),
            stop_reason,
            elapsed: self.time_elapsed(),
            grade_history: self.grade_history,
        }
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Head of the island at `location`. Islands are never empty after initialization.
fn head<S, G: PartialOrd>(archipelagos: &[Archipelago<S, G>], location: BestLocation) -> &SolutionGrade<S, G> {
    &archipelagos[location.archipelago].islands()[location.island].members()[0]
}

/// Scans every island head for the minimum grade. Ties go to the first in
/// archipelago, then island, order.
fn locate_best<S, G: PartialOrd>(archipelagos: &[Archipelago<S, G>]) -> Option<BestLocation> {
    archipelagos
        .iter()
        .filter_map(|arch| {
            let island = arch.best_island()?;
            let front = arch.islands()[island].front()?;
            Some((
                BestLocation {
                    archipelago: arch.index(),
                    island,
                },
                front,
            ))
        })
        .min_by(|(_, a), (_, b)| a.cmp_grade(b))
        .map(|(location, _)| location)
}

// ============================================================================
// Tests
// ============================================================================
