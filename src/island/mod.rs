//! Island-model Genetic Algorithm.
//!
//! A hierarchical, parallel GA: the population is split into archipelagos,
//! each made of islands of graded solutions. Islands evolve independently
//! through user-supplied operators and periodically exchange their best
//! solutions with a neighbor; archipelagos do the same through their lead
//! islands.
//!
//! # Core Traits
//!
//! - [`EvolveStrategy`]: generate, evaluate, crossover, mutate, stop
//! - [`Grade`]: comparable fitness value (lower is better)
//!
//! # Key Types
//!
//! - [`EngineConfig`]: population shape, rates, migration cadence, limits
//! - [`Engine`]: owns the population and drives the generation loop
//! - [`EvolveResult`]: final best solution with run statistics
//!
//! # Generation
//!
//! 1. Every island, in parallel: for each member, with probability
//!    `crossover_rate` cross it with a random mate, with probability
//!    `mutation_rate` mutate it; evaluate and append the offspring; sort and
//!    truncate back to `solutions_per_island`.
//! 2. Every `island_migration_interval` generations, ring migration between
//!    the islands of each archipelago.
//! 3. Every `archipelago_migration_interval` generations, ring migration
//!    between the lead islands of the archipelagos.
//! 4. Stagnation update.
//!
//! # References
//!
//! - Whitley, Rana & Heckendorn (1999), "The Island Model Genetic Algorithm:
//!   On Separability, Population Size and Convergence"
//! - Cantú-Paz (2000), *Efficient and Accurate Parallel Genetic Algorithms*

mod config;
pub mod migration;
mod population;
mod runner;
mod termination;
mod types;
mod workers;

pub use config::EngineConfig;
pub use population::{Archipelago, Island};
pub use runner::{BestLocation, Engine, EvolveResult};
pub use termination::{StopReason, Termination};
pub use types::{EvolveStrategy, Grade, SolutionGrade};
pub use workers::{Worker, WorkerPool, WorkerRng};
