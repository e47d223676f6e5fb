//! Leveled progress output.
//!
//! The engine reports progress through a [`Diagnostics`] gate: a configured
//! maximum [`LogLevel`] in front of an injected [`DiagnosticsSink`]. Messages
//! above the threshold are dropped before any formatting happens, so the
//! per-solution level costs nothing unless it is enabled.
//!
//! # Sinks
//!
//! - [`TracingSink`]: forwards lines to `tracing` events (the default)
//! - [`MemorySink`]: keeps every line in memory, useful to inspect a run
//! - [`NullSink`]: discards everything

use parking_lot::Mutex;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Verbosity of a diagnostics line, from least to most verbose.
///
/// A gate configured with level `L` lets through every message whose level
/// is `<= L`. [`LogLevel::None`] as a threshold silences the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogLevel {
    /// No output.
    None,
    /// Construction summary, one line per generation, stop reason.
    #[default]
    Minimal,
    /// Adds initialization progress.
    MinimalPlus,
    /// Adds migration events and the best of every archipelago.
    Archipelago,
    /// Adds the front of every island after each generation.
    Island,
    /// Adds every offspring produced by crossover or mutation.
    Solution,
}

impl LogLevel {
    /// All levels, least verbose first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::None,
        LogLevel::Minimal,
        LogLevel::MinimalPlus,
        LogLevel::Archipelago,
        LogLevel::Island,
        LogLevel::Solution,
    ];

    fn as_str(self) -> &'static str {
        match self {
            LogLevel::None => "none",
            LogLevel::Minimal => "minimal",
            LogLevel::MinimalPlus => "minimal-plus",
            LogLevel::Archipelago => "archipelago",
            LogLevel::Island => "island",
            LogLevel::Solution => "solution",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        LogLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| format!("unknown log level: {s}"))
    }
}

/// Consumer of leveled text lines.
///
/// Sinks are shared by every worker during the parallel phases and must be
/// thread-safe.
pub trait DiagnosticsSink: Send + Sync {
    /// Receives one line that already passed the level gate.
    fn write_line(&self, level: LogLevel, line: &str);
}

/// Forwards lines to `tracing`.
///
/// `Minimal` and `MinimalPlus` become `INFO` events, `Archipelago` becomes
/// `DEBUG`, `Island` and `Solution` become `TRACE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn write_line(&self, level: LogLevel, line: &str) {
        match level {
            LogLevel::None => {}
            LogLevel::Minimal | LogLevel::MinimalPlus => {
                tracing::info!(target: "u_archipelago", verbosity = %level, "{line}")
            }
            LogLevel::Archipelago => {
                tracing::debug!(target: "u_archipelago", verbosity = %level, "{line}")
            }
            LogLevel::Island | LogLevel::Solution => {
                tracing::trace!(target: "u_archipelago", verbosity = %level, "{line}")
            }
        }
    }
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn write_line(&self, _level: LogLevel, _line: &str) {}
}

/// Keeps every received line in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of all lines received so far.
    pub fn lines(&self) -> Vec<(LogLevel, String)> {
        self.lines.lock().clone()
    }

    /// Number of lines received at exactly `level`.
    pub fn count(&self, level: LogLevel) -> usize {
        self.lines.lock().iter().filter(|(l, _)| *l == level).count()
    }

    /// Removes and returns all lines.
    pub fn drain(&self) -> Vec<(LogLevel, String)> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl DiagnosticsSink for MemorySink {
    fn write_line(&self, level: LogLevel, line: &str) {
        self.lines.lock().push((level, line.to_owned()));
    }
}

/// Level gate in front of a sink.
#[derive(Clone)]
pub struct Diagnostics {
    max: LogLevel,
    sink: Arc<dyn DiagnosticsSink>,
}

impl Diagnostics {
    /// Creates a gate letting through messages up to `max`.
    pub fn new(max: LogLevel, sink: Arc<dyn DiagnosticsSink>) -> Self {
        Self { max, sink }
    }

    /// A gate that lets nothing through.
    pub fn silent() -> Self {
        Self::new(LogLevel::None, Arc::new(NullSink))
    }

    /// Configured threshold.
    pub fn max_level(&self) -> LogLevel {
        self.max
    }

    /// Whether a message at `level` would reach the sink.
    #[inline]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && level <= self.max
    }

    /// Emits the line built by `message` if `level` is enabled.
    ///
    /// `message` is not called when the level is filtered out.
    #[inline]
    pub fn emit<F>(&self, level: LogLevel, message: F)
    where
        F: FnOnce() -> String,
    {
        if self.enabled(level) {
            self.sink.write_line(level, &message());
        }
    }
}

impl fmt::Debug for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Diagnostics").field("max", &self.max).finish()
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(LogLevel::default(), Arc::new(TracingSink))
    }
}
