//! Physical constants (SI)

// =================================================================================================
// Fundamental constants
// =================================================================================================

/// Avogadro's number (1/mol)
pub const AVOGADRO: f64 = 6.022141793e23;

/// Boltzmann constant (J/K)
pub const BOLTZMANN: f64 = 1.3806503e-23;

/// Molar gas constant (J/(mol·K))
pub const GAS_CONSTANT: f64 = 8.3145;

/// π
pub const PI: f64 = std::f64::consts::PI;

// =================================================================================================
// Conversions
// =================================================================================================

/// Convert a molar energy (J/mol) into an energy per particle (J)
pub fn per_particle(molar_energy: f64) -> f64 {
    molar_energy / AVOGADRO
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_gas_constant_consistency() {
        // R = kB * Na within the precision of the tabulated values
        assert_relative_eq!(BOLTZMANN * AVOGADRO, GAS_CONSTANT, max_relative = 1e-4);
    }

    #[test]
    fn test_per_particle() {
        assert_relative_eq!(per_particle(AVOGADRO), 1.0);
    }
}
