//! Generation, time and stagnation bookkeeping.

use super::config::EngineConfig;
use std::fmt;
use std::time::{Duration, Instant};

/// Why an evolution run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopReason {
    /// `max_generations` generations were run.
    GenerationLimit,
    /// The wall-clock limit elapsed.
    TimeLimit,
    /// The best grade stayed unchanged for more than `stagnation_limit` generations.
    Stagnation,
    /// The strategy's stop predicate returned true.
    StrategyStop,
    /// The cancellation flag was raised.
    Cancelled,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StopReason::GenerationLimit => "generation limit reached",
            StopReason::TimeLimit => "time limit reached",
            StopReason::Stagnation => "best grade stagnated",
            StopReason::StrategyStop => "stopped by strategy",
            StopReason::Cancelled => "cancelled",
        })
    }
}

/// Counters driving the configured stop criteria.
#[derive(Debug, Clone)]
pub struct Termination {
    generation: usize,
    same_best: usize,
    started: Instant,
}

impl Termination {
    /// Starts the clock with all counters at zero.
    pub fn start() -> Self {
        Self {
            generation: 0,
            same_best: 0,
            started: Instant::now(),
        }
    }

    /// Number of completed generations.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Consecutive generations whose best grade equaled the previous one.
    pub fn same_best(&self) -> usize {
        self.same_best
    }

    /// Time since [`start`](Self::start).
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Advances to the next generation and returns its number (1-based).
    pub fn begin_generation(&mut self) -> usize {
        self.generation += 1;
        self.generation
    }

    /// Updates the stagnation counter from the best grade before and after a generation.
    pub fn record_best<G: PartialEq>(&mut self, before: &G, after: &G) {
        if before == after {
            self.same_best += 1;
        } else {
            self.same_best = 0;
        }
    }

    /// Checks the generation, time and stagnation limits, in that order.
    ///
    /// The generation limit compares the number of the generation about to
    /// run, so `max_generations = N` allows exactly N generations.
    pub fn limit_reached(&self, config: &EngineConfig) -> Option<StopReason> {
        if config.max_generations != 0 && self.generation + 1 > config.max_generations {
            return Some(StopReason::GenerationLimit);
        }
        if config.time_limit != Duration::ZERO && self.elapsed() >= config.time_limit {
            return Some(StopReason::TimeLimit);
        }
        if config.stagnation_limit != 0 && self.same_best > config.stagnation_limit {
            return Some(StopReason::Stagnation);
        }
        None
    }
}
