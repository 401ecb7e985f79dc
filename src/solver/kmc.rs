//! BKL kinetic Monte Carlo scheduler
//!
//! # Algorithm
//!
//! Per step:
//!
//! 1. Sum the rates of every live (process, eligible site) pair into `R`.
//! 2. Draw `r ~ U[0, 1)` and scan the cumulative rates for the first pair
//!    whose cumulative rate exceeds `r·R`.
//! 3. Perform that event and collect the affected sites.
//! 4. Refresh cached coordination and the event table for the affected
//!    sites only.
//! 5. Advance time by `-ln(U) / R` with `U ~ U(0, 1]`.
//!
//! A run with no eligible pair, or a zero total rate, cannot progress: it
//! stops with a [`StopReason`] instead of dividing by zero.
//!
//! # Example
//!
//! ```rust
//! use kmc_rs::input::InputReader;
//! use kmc_rs::solver::{KmcSolver, Scenario, Solver, SolverConfiguration, StopReason};
//!
//! let input = InputReader::new().parse_str("
//!     build_lattice SimpleCubic 8 8 10 Cu
//!     nspecies 1
//!     Cu 63.546
//!     nprocesses 1
//!     Cu + * -> Cu*, 1.0
//!     temperature 500
//! ").unwrap();
//!
//! let scenario = Scenario::from_input(&input).unwrap();
//! let config = SolverConfiguration::steps(64).with_seed(42);
//! let result = KmcSolver::new().solve(&scenario, &config).unwrap();
//!
//! assert_eq!(result.steps, 64);
//! assert_eq!(result.stop_reason, StopReason::MaxSteps);
//! ```

use std::collections::BTreeMap;

use crate::error::KmcError;
use crate::lattice::Lattice;
use crate::output::properties::{self, SurfaceProperties};
use crate::physics::Conditions;
use crate::processes::{AffectedSites, Process};

use super::random::RandomSource;
use super::traits::{Sample, SimulationResult, Solver, SolverConfiguration, StopReason};
use super::{Scenario, validate_total_rate};

// =================================================================================================
// Event table
// =================================================================================================

/// Live (process, site) pairs and their rates
///
/// One ordered map per process, keyed by site identity, so the selection
/// scan visits pairs in a reproducible order.
#[derive(Debug, Clone, Default)]
pub struct EventTable {
    entries: Vec<BTreeMap<usize, f64>>,
}

impl EventTable {
    /// Evaluate every process at every site
    pub fn build(processes: &[Process], lattice: &Lattice, conditions: &Conditions) -> Self {
        let mut table = Self {
            entries: vec![BTreeMap::new(); processes.len()],
        };
        for id in 0..lattice.size() {
            table.refresh_site(processes, lattice, conditions, id);
        }
        table
    }

    /// Re-evaluate the given sites only
    pub fn update(
        &mut self,
        processes: &[Process],
        lattice: &Lattice,
        conditions: &Conditions,
        sites: &AffectedSites,
    ) {
        for &id in sites {
            self.refresh_site(processes, lattice, conditions, id);
        }
    }

    fn refresh_site(&mut self, processes: &[Process], lattice: &Lattice, conditions: &Conditions, id: usize) {
        for (process, entries) in processes.iter().zip(self.entries.iter_mut()) {
            if process.is_eligible(lattice, id) {
                let rate = process.rate(lattice, id, conditions);
                debug_assert!(rate >= 0.0 || rate.is_nan(), "{}: negative rate {}", process.name(), rate);
                entries.insert(id, rate);
            } else {
                entries.remove(&id);
            }
        }
    }

    /// Number of live pairs
    pub fn len(&self) -> usize {
        self.entries.iter().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(BTreeMap::is_empty)
    }

    /// Eligible sites of one process
    pub fn eligible_count(&self, process: usize) -> usize {
        self.entries.get(process).map_or(0, BTreeMap::len)
    }

    /// Summed rate of one process
    pub fn process_rate(&self, process: usize) -> f64 {
        self.entries.get(process).map_or(0.0, |e| e.values().sum())
    }

    /// Summed rate of every pair
    pub fn total_rate(&self) -> f64 {
        (0..self.entries.len()).map(|p| self.process_rate(p)).sum()
    }

    /// All pairs in scan order: process first, then site
    pub fn pairs(&self) -> impl Iterator<Item = ((usize, usize), f64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .flat_map(|(p, entries)| entries.iter().map(move |(&site, &rate)| ((p, site), rate)))
    }

    /// Pair selected by a cumulative target in `[0, total)`
    pub fn select(&self, target: f64) -> Option<(usize, usize)> {
        select_event(self.pairs(), target)
    }
}

/// First pair whose cumulative rate exceeds `target`
///
/// Zero-rate pairs are never selected. If rounding leaves `target` at or
/// above the final cumulative rate, the last pair with a positive rate
/// is returned.
///
/// # Example
///
/// ```rust
/// use kmc_rs::solver::select_event;
///
/// let pairs = vec![((0, 3), 1.0), ((1, 3), 0.0), ((1, 4), 2.0)];
/// assert_eq!(select_event(pairs.clone(), 0.5), Some((0, 3)));
/// assert_eq!(select_event(pairs.clone(), 1.0), Some((1, 4)));
/// assert_eq!(select_event(pairs, 99.0), Some((1, 4)));
/// ```
pub fn select_event<I>(pairs: I, target: f64) -> Option<(usize, usize)>
where
    I: IntoIterator<Item = ((usize, usize), f64)>,
{
    let mut cumulative = 0.0;
    let mut last_positive = None;

    for (pair, rate) in pairs {
        if rate <= 0.0 {
            continue;
        }
        cumulative += rate;
        last_positive = Some(pair);
        if cumulative > target {
            return Some(pair);
        }
    }

    last_positive
}

// =================================================================================================
// Scheduler
// =================================================================================================

/// Sequential BKL scheduler
#[derive(Debug, Clone, Copy, Default)]
pub struct KmcSolver;

impl KmcSolver {
    /// Create a new scheduler
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::solver::{KmcSolver, Solver};
    ///
    /// let solver = KmcSolver::new();
    /// assert_eq!(solver.name(), "BKL kinetic Monte Carlo");
    /// ```
    pub fn new() -> Self {
        Self
    }
}

/// Mutable state of one run
struct Run<'s> {
    processes: &'s [Process],
    conditions: &'s Conditions,
    lattice: Lattice,
    table: EventTable,
    random: RandomSource,
    events: Vec<u64>,
    net_columns: i64,
    time: f64,
    step: usize,
}

impl Run<'_> {
    /// Execute one event; `None` when the run cannot progress
    fn advance(&mut self) -> Result<Option<StopReason>, KmcError> {
        let total = self.table.total_rate();
        validate_total_rate(total, self.step)?;

        if self.table.is_empty() {
            return Ok(Some(StopReason::NoEligibleEvents));
        }
        if total <= 0.0 {
            return Ok(Some(StopReason::ZeroTotalRate));
        }

        let target = self.random.uniform() * total;
        let Some((p, site)) = self.table.select(target) else {
            return Ok(Some(StopReason::ZeroTotalRate));
        };

        let process = &self.processes[p];
        log::trace!("step {}: {} at site {}", self.step, process.name(), site);

        let affected = process.perform(&mut self.lattice, site, &mut self.random)?;
        self.lattice.refresh_neighbour_counts(&affected);
        self.table
            .update(self.processes, &self.lattice, self.conditions, &affected);

        self.events[p] += 1;
        self.net_columns += process.height_change();
        self.step += 1;

        let dt = -self.random.uniform_open().ln() / total;
        debug_assert!(dt.is_finite() && dt >= 0.0, "invalid time increment {}", dt);
        self.time += dt;

        Ok(None)
    }

    fn sample(&self) -> Sample {
        Sample {
            time: self.time,
            step: self.step,
            surface: SurfaceProperties::measure(&self.lattice),
            growth_rate: properties::growth_rate(self.net_columns, self.lattice.size(), self.time),
            events: self.events.clone(),
            coverage: self
                .processes
                .iter()
                .map(|p| properties::coverage(&self.lattice, p.species()))
                .collect(),
        }
    }
}

impl Solver for KmcSolver {
    fn solve(&self, scenario: &Scenario, config: &SolverConfiguration) -> Result<SimulationResult, KmcError> {
        // ====== Step 1: Validation ======

        config.validate()?;
        scenario.validate()?;

        // ====== Step 2: Setup ======

        let random = RandomSource::from_seed_or_time(config.seed);
        log::info!("Random seed: {}", random.seed());

        let lattice = scenario.lattice.clone();
        let table = EventTable::build(&scenario.processes, &lattice, &scenario.conditions);
        log::info!(
            "{} processes, {} live events, total rate {:.6e} 1/s",
            scenario.processes.len(),
            table.len(),
            table.total_rate()
        );

        let mut run = Run {
            processes: &scenario.processes,
            conditions: &scenario.conditions,
            lattice,
            table,
            random,
            events: vec![0; scenario.processes.len()],
            net_columns: 0,
            time: 0.0,
            step: 0,
        };

        let mut samples = vec![run.sample()];
        let mut next_report = config.report_interval;

        // ====== Step 3: Event loop ======

        let stop_reason = loop {
            if let Some(reason) = config.limit.stop_reason(run.time, run.step) {
                break reason;
            }

            if let Some(reason) = run.advance()? {
                log::warn!("Simulation stopped at step {} (t = {:.6e} s): {}", run.step, run.time, reason);
                break reason;
            }

            if let (Some(interval), Some(at)) = (config.report_interval, next_report.as_mut()) {
                if run.time >= *at {
                    let sample = run.sample();
                    log::debug!(
                        "t = {:.6e} s, step {}, roughness {:.4}, RMS {:.4}, growth rate {:.4e} ML/s",
                        sample.time,
                        sample.step,
                        sample.surface.roughness,
                        sample.surface.rms,
                        sample.growth_rate
                    );
                    samples.push(sample);
                    *at = ((run.time / interval).floor() + 1.0) * interval;
                }
            }
        };

        if samples.last().is_none_or(|s| s.step != run.step) {
            samples.push(run.sample());
        }

        log::info!(
            "Simulation finished after {} events at t = {:.6e} s: {}",
            run.step,
            run.time,
            stop_reason
        );

        // ====== Step 4: Build Result ======

        let mut result = SimulationResult {
            samples,
            lattice: run.lattice,
            process_names: scenario.process_names(),
            event_counts: run.events,
            time: run.time,
            steps: run.step,
            stop_reason,
            seed: run.random.seed(),
            metadata: config.metadata.clone(),
        };

        result.add_metadata("solver", self.name());
        result.add_metadata("seed", &result.seed.to_string());
        result.add_metadata("limit", config.limit.name());
        result.add_metadata("stop reason", &stop_reason.to_string());
        result.add_metadata("temperature", &scenario.conditions.temperature.to_string());
        result.add_metadata("pressure", &scenario.conditions.pressure.to_string());

        Ok(result)
    }

    fn name(&self) -> &str {
        "BKL kinetic Monte Carlo"
    }
}

// =================================================================================================
// Tests
// =================================================================================================
