//! Operating conditions of a run

use crate::error::KmcError;

use super::constants::BOLTZMANN;

/// Gas-phase conditions above the surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conditions {
    /// Temperature (K)
    pub temperature: f64,

    /// Pressure (Pa)
    pub pressure: f64,
}

impl Conditions {
    pub fn new(temperature: f64, pressure: f64) -> Self {
        Self { temperature, pressure }
    }

    /// kB·T (J)
    pub fn thermal_energy(&self) -> f64 {
        BOLTZMANN * self.temperature
    }

    /// Temperature must be positive, pressure non-negative
    pub fn validate(&self) -> Result<(), KmcError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(KmcError::configuration(format!(
                "Temperature must be positive, got {} K",
                self.temperature
            )));
        }
        if !(self.pressure.is_finite() && self.pressure >= 0.0) {
            return Err(KmcError::configuration(format!(
                "Pressure must be non-negative, got {} Pa",
                self.pressure
            )));
        }
        Ok(())
    }
}
