//! Island-model genetic algorithm engine.
//!
//! A domain-agnostic evolutionary optimizer that keeps its population as a
//! three-level tree (engine → archipelagos → islands → solutions), evolves
//! every island in parallel through pluggable operators, and periodically
//! migrates the best solutions around a ring of islands and a ring of
//! archipelagos.
//!
//! - [`island`]: the engine, its configuration and the strategy contract
//! - [`diagnostics`]: leveled progress output with pluggable sinks
//! - [`error`]: error type shared by all fallible operations
//!
//! # Quick Start
//!
//! ```ignore
//! use u_archipelago::island::{Engine, EngineConfig};
//!
//! let config = EngineConfig::default()
//!     .with_archipelago_count(2)
//!     .with_islands_per_archipelago(4)
//!     .with_seed(42);
//! let result = Engine::run(MyStrategy::new(), config)?;
//! println!("{}: {:?}", result.stop_reason, result.best.grade);
//! ```

pub mod diagnostics;
pub mod error;
pub mod island;
