//! Top-level input reader
//!
//! Reads the line-oriented input format:
//!
//! ```text
//! build_lattice <TYPE> <X> <Y> <INITIAL_HEIGHT> [LABEL]
//! nspecies <N>
//! <symbol> <molecular_weight>                  (N lines)
//! nprocesses <N>
//! <reactants> -> <products>, <energetics...>   (N lines)
//! pressure <value>
//! temperature <value>
//! time <value>
//! steps <x> <y> <z>
//! debug <on|off>
//! ```
//!
//! Keywords may appear in any order; unknown keywords are ignored. Process
//! lines are compiled once the whole file has been read, so species may be
//! declared after the processes that use them.
//!
//! # Errors
//!
//! Fatal conditions return `Err`. Recoverable ones (bad species or process
//! line, bad block count, malformed steps) are logged, collected in
//! [`SimulationInput::warnings`] and the offending line is skipped.

use std::fs;
use std::path::Path;

use super::error::ParseError;
use super::lexer::{self, SourceLine};
use super::numeric;
use super::reaction::ReactionCompiler;
use super::registry::Registry;
use crate::lattice::{LatticeConfig, LatticeType, StepProfile};

// ====== Keywords ======

const BUILD_LATTICE: &str = "build_lattice";
const NSPECIES: &str = "nspecies";
const NPROCESSES: &str = "nprocesses";
const PRESSURE: &str = "pressure";
const TEMPERATURE: &str = "temperature";
const TIME: &str = "time";
const STEPS: &str = "steps";
const DEBUG: &str = "debug";

// =================================================================================================
// Simulation input
// =================================================================================================

/// Everything read from one input description
#[derive(Debug, Default)]
pub struct SimulationInput {
    /// Lattice definition (`build_lattice`, `steps`)
    pub lattice: Option<LatticeConfig>,

    /// Declared species and compiled processes
    pub registry: Registry,

    /// Pressure (Pa)
    pub pressure: Option<f64>,

    /// Temperature (K)
    pub temperature: Option<f64>,

    /// Simulated end time (s)
    pub end_time: Option<f64>,

    /// `debug on`
    pub debug: bool,

    /// Recoverable problems met while reading
    pub warnings: Vec<ParseError>,
}

impl SimulationInput {
    /// Species whose deposition raises the film
    ///
    /// The lattice background species when it is declared, otherwise the
    /// only declared species if there is exactly one.
    pub fn growth_species(&self) -> Vec<String> {
        if let Some(lattice) = &self.lattice {
            if !lattice.label.is_empty() && self.registry.contains_species(&lattice.label) {
                return vec![lattice.label.clone()];
            }
        }

        if self.registry.species_count() == 1 {
            return self.registry.species_symbols().map(str::to_string).collect();
        }

        Vec::new()
    }

    fn recover(&mut self, error: ParseError) {
        log::warn!("{}", error);
        self.warnings.push(error);
    }
}

// =================================================================================================
// Reader
// =================================================================================================

/// Reader for the input format
#[derive(Debug, Clone, Copy, Default)]
pub struct InputReader;

impl InputReader {
    pub fn new() -> Self {
        Self
    }

    /// Read and parse an input file
    ///
    /// # Errors
    ///
    /// [`ParseError::CannotOpen`] if the file cannot be read, or any fatal
    /// error of [`parse_str`](Self::parse_str).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Result<SimulationInput, ParseError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ParseError::CannotOpen {
            path: path.display().to_string(),
            source,
        })?;

        log::info!("Reading input file {}", path.display());
        self.parse_str(&source)
    }

    /// Parse an input description held in memory
    ///
    /// # Example
    ///
    /// ```rust
    /// use kmc_rs::input::InputReader;
    ///
    /// let input = InputReader::new().parse_str("
    ///     build_lattice SimpleCubic 4 4 10
    ///     nspecies 1
    ///     A 12.0
    ///     nprocesses 1
    ///     A + * -> A*, 1.0e13 71128
    ///     temperature 500
    ///     time 1.0
    /// ").unwrap();
    ///
    /// assert_eq!(input.registry.processes()[0].name, "Adsorption0");
    /// assert_eq!(input.temperature, Some(500.0));
    /// ```
    pub fn parse_str(&self, source: &str) -> Result<SimulationInput, ParseError> {
        let lines = lexer::tokenize(source);
        let mut input = SimulationInput::default();
        let mut process_lines: Vec<&SourceLine> = Vec::new();
        let mut steps: Option<StepProfile> = None;

        let mut i = 0;
        while i < lines.len() {
            let line = &lines[i];
            let tokens = line.tokens();
            let at = |e: ParseError| e.at_line(line.number);

            match line.keyword() {
                BUILD_LATTICE => {
                    input.lattice = Some(parse_lattice(&tokens).map_err(at)?);
                }
                NSPECIES => {
                    match block(&lines, i, &tokens).map_err(at) {
                        Ok(body) => {
                            for species_line in body {
                                if let Err(e) = parse_species(&mut input.registry, species_line) {
                                    input.recover(e.at_line(species_line.number));
                                }
                            }
                            i += body.len();
                        }
                        Err(e) => input.recover(e),
                    }
                }
                NPROCESSES => {
                    match block(&lines, i, &tokens).map_err(at) {
                        Ok(body) => {
                            process_lines.extend(body.iter());
                            i += body.len();
                        }
                        Err(e) => input.recover(e),
                    }
                }
                PRESSURE => {
                    input.pressure = Some(parse_value(&tokens, ParseError::Pressure).map_err(at)?);
                }
                TEMPERATURE => {
                    input.temperature = Some(parse_value(&tokens, ParseError::Temperature).map_err(at)?);
                }
                TIME => {
                    input.end_time = Some(parse_value(&tokens, ParseError::Time).map_err(at)?);
                }
                STEPS => match parse_steps(&tokens) {
                    Ok(profile) => steps = profile,
                    Err(e) => input.recover(at(e)),
                },
                DEBUG => {
                    input.debug = parse_debug(&tokens).map_err(at)?;
                }
                other => {
                    log::debug!("line {}: ignoring unknown keyword '{}'", line.number, other);
                }
            }

            i += 1;
        }

        // ====== Compile processes ======

        let compiler = ReactionCompiler::new(&input.registry);
        let mut compiled = Vec::with_capacity(process_lines.len());
        let mut failures = Vec::new();

        for (ordinal, line) in process_lines.iter().enumerate() {
            match compiler.compile(&line.text, ordinal) {
                Ok(descriptor) => compiled.push(descriptor),
                Err(e) => failures.push(e.at_line(line.number)),
            }
        }

        for descriptor in compiled {
            input.registry.register_process(descriptor);
        }
        for failure in failures {
            input.recover(failure);
        }

        if let (Some(lattice), Some(profile)) = (input.lattice.as_mut(), steps) {
            lattice.steps = Some(profile);
        }

        log::info!(
            "Read {} species and {} processes ({} warnings)",
            input.registry.species_count(),
            input.registry.processes().len(),
            input.warnings.len()
        );

        Ok(input)
    }
}

// =================================================================================================
// Keyword parsers
// =================================================================================================

/// `build_lattice TYPE X Y H [LABEL]`
fn parse_lattice(tokens: &[&str]) -> Result<LatticeConfig, ParseError> {
    let tag = tokens
        .get(1)
        .ok_or_else(|| ParseError::MissingValue(BUILD_LATTICE.to_string()))?;

    let lattice_type = LatticeType::from_tag(tag).ok_or_else(|| ParseError::UnknownLattice(tag.to_string()))?;

    let dimension = |index: usize, error: ParseError| -> Result<usize, ParseError> {
        tokens
            .get(index)
            .and_then(|t| numeric::parse_integer(t))
            .and_then(|v| usize::try_from(v).ok())
            .ok_or(error)
    };

    let size_x = dimension(2, ParseError::DimensionX)?;
    let size_y = dimension(3, ParseError::DimensionY)?;
    let height = dimension(4, ParseError::Height)?;
    let height = i32::try_from(height).map_err(|_| ParseError::Height)?;

    let mut config = LatticeConfig::new(lattice_type, size_x, size_y, height);
    if let Some(label) = tokens.get(5) {
        config = config.with_label(*label);
    }

    Ok(config)
}

/// The `N` lines following a block header
fn block<'l>(lines: &'l [SourceLine], header: usize, tokens: &[&str]) -> Result<&'l [SourceLine], ParseError> {
    let keyword = tokens.first().copied().unwrap_or_default();
    let value = tokens.get(1).copied().unwrap_or_default();

    let count = numeric::parse_integer(value)
        .and_then(|v| usize::try_from(v).ok())
        .ok_or_else(|| ParseError::Count {
            keyword: keyword.to_string(),
            value: value.to_string(),
        })?;

    let available = lines.len() - header - 1;
    if count > available {
        return Err(ParseError::TruncatedBlock {
            keyword: keyword.to_string(),
            expected: count,
            found: available,
        });
    }

    Ok(&lines[header + 1..header + 1 + count])
}

/// `<symbol> <molecular_weight>`
fn parse_species(registry: &mut Registry, line: &SourceLine) -> Result<(), ParseError> {
    let tokens = line.tokens();

    let (symbol, weight) = match tokens.as_slice() {
        [symbol, weight, ..] => (*symbol, *weight),
        [symbol] => return Err(ParseError::SpeciesFields(symbol.to_string())),
        [] => return Err(ParseError::SpeciesFields(String::new())),
    };

    let molecular_weight = numeric::parse_number(weight).ok_or_else(|| ParseError::MolecularWeight {
        symbol: symbol.to_string(),
        value: weight.to_string(),
    })?;

    registry.add_species(symbol, molecular_weight)
}

/// Single numeric value after a keyword
fn parse_value(tokens: &[&str], error: ParseError) -> Result<f64, ParseError> {
    match tokens.get(1) {
        None => Err(ParseError::MissingValue(tokens[0].to_string())),
        Some(token) => numeric::parse_number(token).ok_or(error),
    }
}

/// `steps x y z`: `x` steps along X rising `y` each; all zeros means a flat surface
fn parse_steps(tokens: &[&str]) -> Result<Option<StepProfile>, ParseError> {
    let malformed = || ParseError::Steps(tokens[1..].join(" "));

    let values: Vec<i64> = tokens[1..]
        .iter()
        .take(3)
        .map(|t| numeric::parse_integer(t))
        .collect::<Option<Vec<_>>>()
        .ok_or_else(malformed)?;

    let [count, height, depth] = values[..] else {
        return Err(malformed());
    };

    if count == 0 && height == 0 && depth == 0 {
        return Ok(None);
    }

    let count = usize::try_from(count).ok().filter(|c| *c > 0).ok_or_else(malformed)?;
    let height = i32::try_from(height).map_err(|_| malformed())?;
    let depth = i32::try_from(depth).map_err(|_| malformed())?;

    Ok(Some(StepProfile { count, height, depth }))
}

/// `debug on|off`
fn parse_debug(tokens: &[&str]) -> Result<bool, ParseError> {
    let value = tokens
        .get(1)
        .ok_or_else(|| ParseError::MissingValue(DEBUG.to_string()))?;

    match value.to_ascii_lowercase().as_str() {
        "on" => Ok(true),
        "off" => Ok(false),
        _ => Err(ParseError::DebugMode(value.to_string())),
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::reaction::Category;

    const FULL_INPUT: &str = "
# Copper PVD
build_lattice FCC 10 10 20 Cu
nspecies 1
Cu 63.546
nprocesses 2
Cu + * -> Cu*, 1.0e2
Cu* -> Cu + *, 1.0e13 80000
pressure 101325
temperature 500
time 1.0e-3
steps 0 0 0
debug off
";

    #[test]
    fn test_full_input() {
        let input = InputReader::new().parse_str(FULL_INPUT).unwrap();

        let lattice = input.lattice.as_ref().unwrap();
        assert_eq!(lattice.lattice_type, LatticeType::Fcc);
        assert_eq!((lattice.size_x, lattice.size_y, lattice.initial_height), (10, 10, 20));
        assert_eq!(lattice.label, "Cu");
        assert!(lattice.steps.is_none());

        assert_eq!(input.registry.species("Cu").unwrap().molecular_weight, 63.546);

        let processes = input.registry.processes();
        assert_eq!(processes.len(), 2);
        assert_eq!(processes[0].name, "Adsorption0");
        assert_eq!(processes[1].name, "Desorption1");
        assert_eq!(processes[1].category, Category::Desorption);

        assert_eq!(input.pressure, Some(101325.0));
        assert_eq!(input.temperature, Some(500.0));
        assert_eq!(input.end_time, Some(1.0e-3));
        assert!(!input.debug);
        assert!(input.warnings.is_empty());
        assert_eq!(input.growth_species(), vec!["Cu".to_string()]);
    }

    #[test]
    fn test_concrete_adsorption_scenario() {
        let input = InputReader::new()
            .parse_str("nspecies 1\nA 12.0\nnprocesses 1\nA + * -> A*, 1.0e13 71128\n")
            .unwrap();

        let process = &input.registry.processes()[0];
        assert_eq!(process.category, Category::Adsorption);
        assert_eq!(process.species, vec!["A".to_string()]);
        assert_eq!(process.energetics, vec![1.0e13, 71128.0]);
    }

    #[test]
    fn test_processes_before_species() {
        let input = InputReader::new()
            .parse_str("nprocesses 1\nA + * -> A*, 1.0\nnspecies 1\nA 12.0\n")
            .unwrap();

        assert_eq!(input.registry.processes()[0].species, vec!["A".to_string()]);
    }

    #[test]
    fn test_unknown_keyword_ignored() {
        let input = InputReader::new().parse_str("frobnicate 3\ntemperature 300\n").unwrap();
        assert_eq!(input.temperature, Some(300.0));
        assert!(input.warnings.is_empty());
    }

    #[test]
    fn test_fatal_fields() {
        let reader = InputReader::new();

        let err = reader.parse_str("build_lattice FCC x 10 20").unwrap_err();
        assert!(matches!(err, ParseError::AtLine { ref source, .. } if matches!(**source, ParseError::DimensionX)));
        assert!(err.is_fatal());

        let err = reader.parse_str("build_lattice FCC 10 y 20").unwrap_err();
        assert!(err.to_string().contains("The y dimension of lattice is not a number."));

        let err = reader.parse_str("build_lattice FCC 10 10 h").unwrap_err();
        assert!(err.to_string().contains("The height must be a number."));

        let err = reader.parse_str("build_lattice HCP 10 10 10").unwrap_err();
        assert!(err.to_string().contains("Unresolvable lattice type"));

        let err = reader.parse_str("pressure high").unwrap_err();
        assert!(err.to_string().contains("Could not read pressure"));

        let err = reader.parse_str("temperature").unwrap_err();
        assert!(err.is_fatal());

        let err = reader.parse_str("time soon").unwrap_err();
        assert!(err.to_string().contains("simulation time"));

        let err = reader.parse_str("debug maybe").unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_cannot_open_file() {
        let err = InputReader::new().read_file("/nonexistent/input.kmc").unwrap_err();
        assert!(matches!(err, ParseError::CannotOpen { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_bad_species_line_is_skipped() {
        let input = InputReader::new()
            .parse_str("nspecies 3\nA 12.0\nB heavy\nC\nnprocesses 1\nA + * -> A*, 1.0\n")
            .unwrap();

        assert!(input.registry.contains_species("A"));
        assert!(!input.registry.contains_species("B"));
        assert!(!input.registry.contains_species("C"));
        assert_eq!(input.warnings.len(), 2);
        assert!(input.warnings.iter().all(|w| !w.is_fatal()));
        assert_eq!(input.registry.processes().len(), 1);
    }

    #[test]
    fn test_bad_process_line_is_skipped() {
        let input = InputReader::new()
            .parse_str("nspecies 1\nA 12.0\nnprocesses 3\nA + * A*, 1.0\nA* -> A + *, 2.0\nA + * -> A*\n")
            .unwrap();

        let names: Vec<&str> = input.registry.processes().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Desorption1"]);
        assert_eq!(input.warnings.len(), 2);
    }

    #[test]
    fn test_bad_count_is_recoverable() {
        let input = InputReader::new().parse_str("nspecies many\ntemperature 300\n").unwrap();
        assert_eq!(input.warnings.len(), 1);
        assert_eq!(input.temperature, Some(300.0));
    }

    #[test]
    fn test_truncated_block() {
        let input = InputReader::new().parse_str("nspecies 4\nA 1.0\n").unwrap();
        assert!(matches!(
            input.warnings[0],
            ParseError::AtLine { ref source, .. } if matches!(**source, ParseError::TruncatedBlock { .. })
        ));
    }

    #[test]
    fn test_steps_attach_to_lattice() {
        let input = InputReader::new()
            .parse_str("steps 5 1 0\nbuild_lattice SimpleCubic 10 4 10\n")
            .unwrap();

        let steps = input.lattice.unwrap().steps.unwrap();
        assert_eq!(steps, StepProfile { count: 5, height: 1, depth: 0 });
    }

    #[test]
    fn test_malformed_steps_are_recoverable() {
        let input = InputReader::new().parse_str("steps a b\n").unwrap();
        assert_eq!(input.warnings.len(), 1);
    }

    #[test]
    fn test_debug_is_case_insensitive() {
        let input = InputReader::new().parse_str("debug ON\n").unwrap();
        assert!(input.debug);
    }

    #[test]
    fn test_growth_species_needs_declaration() {
        let input = InputReader::new()
            .parse_str("build_lattice FCC 4 4 10 Si\nnspecies 2\nH 1.0\nSiH4 32.1\n")
            .unwrap();
        assert!(input.growth_species().is_empty());
    }
}
