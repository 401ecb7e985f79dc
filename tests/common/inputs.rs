//! Input descriptions shared by the integration tests

/// Cu growth on Cu: adsorption and hopping, both in height mode
pub const GROWTH: &str = "
# Cu(100) homoepitaxy
build_lattice SimpleCubic 8 8 10 Cu

nspecies 1
Cu 63.546

nprocesses 2
Cu + * -> Cu*, 20.0
Cu* -> *Cu, 1.0e12 120000

pressure 0
temperature 600
time 1.0
";

/// Hopping only: the amount of material is conserved
pub const DIFFUSION_ONLY: &str = "
build_lattice SimpleCubic 6 6 10 Cu
nspecies 1
Cu 63.546
nprocesses 1
Cu* -> *Cu, 5.0
temperature 500
";

/// A 2x2 film two layers thick that can only evaporate
pub const EVAPORATION: &str = "
build_lattice SimpleCubic 2 2 2 Cu
nspecies 1
Cu 63.546
nprocesses 1
Cu* -> Cu + *, 1.0
temperature 500
";

/// Hydrogen covering a silicon surface, one site at a time
pub const ADSORBATE_LAYER: &str = "
build_lattice SimpleCubic 4 4 10 Si
nspecies 2
Si 28.0855
H 1.008
nprocesses 1
H + * -> H*, 1.0
temperature 300
";

/// Single-species growth description with the given lattice and rates
pub fn growth_input(size_x: usize, size_y: usize, adsorption: f64, desorption: f64) -> String {
    format!(
        "build_lattice SimpleCubic {} {} 10 Cu\n\
         nspecies 1\n\
         Cu 63.546\n\
         nprocesses 2\n\
         Cu + * -> Cu*, {}\n\
         Cu* -> Cu + *, {}\n\
         temperature 500\n",
        size_x, size_y, adsorption, desorption
    )
}
