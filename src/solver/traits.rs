//! Solver traits and types
//!
//! # Design
//!
//! - `RunLimit` says when a run ends (simulated time, event count, or both)
//! - `SolverConfiguration` wraps the limit with the seed, the sampling
//!   interval and free-form metadata
//! - `SimulationResult` carries the sampled trajectory, the final lattice,
//!   per-process event counts and why the run stopped
//! - `Solver` is the single entry point implemented by schedulers

use std::collections::HashMap;
use std::fmt;

use crate::error::KmcError;
use crate::lattice::Lattice;
use crate::output::properties::SurfaceProperties;

use super::scenario::Scenario;

// =================================================================================================
// Run limit
// =================================================================================================

/// When a run ends
///
/// # Examples
///
/// ```rust
/// use kmc_rs::solver::RunLimit;
///
/// let limit = RunLimit::TimeOrSteps { end_time: 1.0e-3, max_steps: 100_000 };
/// assert!(limit.validate().is_ok());
/// assert!(limit.reached(0.5e-3, 100_000));
/// assert!(!limit.reached(0.5e-3, 10));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum RunLimit {
    /// Until simulated time reaches `end_time` (s)
    Time { end_time: f64 },

    /// Until `max_steps` events have been executed
    Steps { max_steps: usize },

    /// Whichever comes first
    TimeOrSteps { end_time: f64, max_steps: usize },
}

impl RunLimit {
    /// Get name identifier
    pub fn name(&self) -> &str {
        match self {
            RunLimit::Time { .. } => "Time",
            RunLimit::Steps { .. } => "Steps",
            RunLimit::TimeOrSteps { .. } => "TimeOrSteps",
        }
    }

    /// End time, if the limit has one
    pub fn end_time(&self) -> Option<f64> {
        match self {
            RunLimit::Time { end_time } | RunLimit::TimeOrSteps { end_time, .. } => Some(*end_time),
            RunLimit::Steps { .. } => None,
        }
    }

    /// Maximum event count, if the limit has one
    pub fn max_steps(&self) -> Option<usize> {
        match self {
            RunLimit::Steps { max_steps } | RunLimit::TimeOrSteps { max_steps, .. } => Some(*max_steps),
            RunLimit::Time { .. } => None,
        }
    }

    /// Which limit, if any, a run at `time` after `step` events has hit
    pub fn stop_reason(&self, time: f64, step: usize) -> Option<StopReason> {
        if self.end_time().is_some_and(|end| time >= end) {
            return Some(StopReason::EndTime);
        }
        if self.max_steps().is_some_and(|max| step >= max) {
            return Some(StopReason::MaxSteps);
        }
        None
    }

    /// Whether a run at `time` after `step` events is over
    pub fn reached(&self, time: f64, step: usize) -> bool {
        self.stop_reason(time, step).is_some()
    }

    /// Validate that parameters are physically meaningful
    pub fn validate(&self) -> Result<(), String> {
        if let Some(end_time) = self.end_time() {
            if !(end_time.is_finite() && end_time > 0.0) {
                return Err(format!("End time must be positive, got {}", end_time));
            }
        }
        if self.max_steps() == Some(0) {
            return Err("Maximum steps must be greater than 0".to_string());
        }
        Ok(())
    }
}

// =================================================================================================
// Solver configuration
// =================================================================================================

/// Configuration of a KMC run
///
/// # Examples
///
/// ```rust
/// use kmc_rs::solver::SolverConfiguration;
///
/// let config = SolverConfiguration::time_evolution(1.0e-3)
///     .with_seed(42)
///     .with_report_interval(1.0e-4);
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Clone, Debug)]
pub struct SolverConfiguration {
    /// When the run ends
    pub limit: RunLimit,

    /// Random seed; `None` or `Some(0)` seeds from the clock
    pub seed: Option<u64>,

    /// Sampling interval in simulated seconds; `None` samples only the
    /// initial and final states
    pub report_interval: Option<f64>,

    /// Free-form entries copied into the result
    pub metadata: HashMap<String, String>,
}

impl SolverConfiguration {
    /// Create a new configuration with a given limit
    pub fn new(limit: RunLimit) -> Self {
        Self {
            limit,
            seed: None,
            report_interval: None,
            metadata: HashMap::new(),
        }
    }

    /// Run until `end_time` seconds of simulated time
    pub fn time_evolution(end_time: f64) -> Self {
        Self::new(RunLimit::Time { end_time })
    }

    /// Run `max_steps` events
    pub fn steps(max_steps: usize) -> Self {
        Self::new(RunLimit::Steps { max_steps })
    }

    /// Run until `end_time` or `max_steps`, whichever comes first
    pub fn time_or_steps(end_time: f64, max_steps: usize) -> Self {
        Self::new(RunLimit::TimeOrSteps { end_time, max_steps })
    }

    /// Builder pattern: set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder pattern: sample every `interval` simulated seconds
    pub fn with_report_interval(mut self, interval: f64) -> Self {
        self.report_interval = Some(interval);
        self
    }

    /// Builder pattern: add a metadata entry
    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), KmcError> {
        self.limit.validate().map_err(KmcError::configuration)?;

        if let Some(interval) = self.report_interval {
            if !(interval.is_finite() && interval > 0.0) {
                return Err(KmcError::configuration(format!(
                    "Report interval must be positive, got {}",
                    interval
                )));
            }
        }

        Ok(())
    }
}

// =================================================================================================
// Results
// =================================================================================================

/// Why a run ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// Simulated time reached the end time
    EndTime,

    /// The event budget is spent
    MaxSteps,

    /// Eligible events exist but all of them have a zero rate
    ZeroTotalRate,

    /// No process is eligible anywhere
    NoEligibleEvents,
}

impl StopReason {
    /// The run ended because it could not progress
    pub fn is_stalled(&self) -> bool {
        matches!(self, StopReason::ZeroTotalRate | StopReason::NoEligibleEvents)
    }
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StopReason::EndTime => "end time reached",
            StopReason::MaxSteps => "maximum number of steps reached",
            StopReason::ZeroTotalRate => "total rate is zero",
            StopReason::NoEligibleEvents => "no eligible events",
        };
        f.write_str(text)
    }
}

/// Surface state at one sampled instant
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// Simulated time (s)
    pub time: f64,

    /// Events executed so far
    pub step: usize,

    /// Height statistics
    pub surface: SurfaceProperties,

    /// Net monolayers per second since the start
    pub growth_rate: f64,

    /// Events executed so far, per process
    pub events: Vec<u64>,

    /// Fraction of sites labelled with each process's species
    pub coverage: Vec<f64>,
}

/// Outcome of a run
#[derive(Clone, Debug)]
pub struct SimulationResult {
    /// Sampled trajectory, initial state first
    pub samples: Vec<Sample>,

    /// Lattice at the end of the run
    pub lattice: Lattice,

    /// Process names, in event-count order
    pub process_names: Vec<String>,

    /// Events executed, per process
    pub event_counts: Vec<u64>,

    /// Final simulated time (s)
    pub time: f64,

    /// Events executed
    pub steps: usize,

    pub stop_reason: StopReason,

    /// Seed the random source used
    pub seed: u64,

    /// Diagnostics (solver, seed, limits...)
    pub metadata: HashMap<String, String>,
}

impl SimulationResult {
    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Last sample (the final state)
    pub fn last_sample(&self) -> Option<&Sample> {
        self.samples.last()
    }

    /// Sum of all event counts
    pub fn total_events(&self) -> u64 {
        self.event_counts.iter().sum()
    }

    /// Events executed by the process called `name`
    pub fn events_of(&self, name: &str) -> Option<u64> {
        self.process_names
            .iter()
            .position(|n| n == name)
            .map(|i| self.event_counts[i])
    }

    /// Add a metadata entry
    pub fn add_metadata(&mut self, key: &str, value: &str) {
        self.metadata.insert(key.to_string(), value.to_string());
    }
}

// =================================================================================================
// Solver trait
// =================================================================================================

/// Event scheduler
pub trait Solver {
    /// Run `scenario` under `config`
    ///
    /// The scenario is left untouched; the run works on a copy of its
    /// lattice, returned in the result.
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult, KmcError>;

    /// Solver name
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_validation() {
        assert!(RunLimit::Time { end_time: 1.0 }.validate().is_ok());
        assert!(RunLimit::Time { end_time: 0.0 }.validate().is_err());
        assert!(RunLimit::Time { end_time: f64::INFINITY }.validate().is_err());
        assert!(RunLimit::Steps { max_steps: 0 }.validate().is_err());
    }

    #[test]
    fn test_stop_reasons() {
        let limit = RunLimit::TimeOrSteps {
            end_time: 2.0,
            max_steps: 10,
        };
        assert_eq!(limit.stop_reason(2.5, 3), Some(StopReason::EndTime));
        assert_eq!(limit.stop_reason(1.0, 10), Some(StopReason::MaxSteps));
        assert_eq!(limit.stop_reason(1.0, 9), None);

        let steps = RunLimit::Steps { max_steps: 5 };
        assert!(!steps.reached(1.0e9, 4));
    }

    #[test]
    fn test_configuration_builders() {
        let config = SolverConfiguration::steps(100)
            .with_seed(7)
            .with_report_interval(0.5)
            .with_metadata("run", "test");

        assert_eq!(config.limit.name(), "Steps");
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.metadata.get("run").map(String::as_str), Some("test"));
        assert!(config.validate().is_ok());

        let bad = SolverConfiguration::steps(100).with_report_interval(-1.0);
        assert!(matches!(bad.validate(), Err(KmcError::Configuration(_))));
    }

    #[test]
    fn test_stalled_reasons() {
        assert!(StopReason::ZeroTotalRate.is_stalled());
        assert!(StopReason::NoEligibleEvents.is_stalled());
        assert!(!StopReason::EndTime.is_stalled());
    }
}
