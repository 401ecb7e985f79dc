//! Time-series plots of a run
//!
//! SVG line plots of the sampled surface statistics against simulated time.

use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use crate::solver::{Sample, SimulationResult};

use super::config::PlotConfig;

/// Draw one `(x, y)` series on any drawing area
fn draw_on_area<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    points: &[(f64, f64)],
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>>
where
    <DB as DrawingBackend>::ErrorType: 'static,
{
    let max_time = points.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
    let max_value = points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
    let min_value = points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);

    // 10% margins; a flat series still gets a visible band
    let span = (max_value - min_value).max(max_value.abs() * 1e-3).max(1e-9);
    let y_min = min_value - 0.1 * span;
    let y_max = max_value + 0.1 * span;
    let x_max = if max_time > 0.0 { max_time } else { 1.0 };

    root.fill(&config.background)?;

    let mut chart = ChartBuilder::on(root)
        .caption(&config.title, ("sans-serif", 40.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..x_max, y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&config.xlabel).y_desc(&config.ylabel);

    if config.show_grid {
        mesh.draw()?;
    } else {
        mesh.disable_x_mesh().disable_y_mesh().draw()?;
    }

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        config.line_color.stroke_width(config.line_width),
    ))?;

    root.present()?;
    Ok(())
}

/// Plot raw `(time, value)` points to an SVG file
///
/// # Errors
///
/// Fails on an empty series, a non-finite value, an invalid
/// configuration or a drawing error.
pub fn plot_series<P: AsRef<Path>>(
    points: &[(f64, f64)],
    output_path: P,
    config: &PlotConfig,
) -> Result<(), Box<dyn Error>> {
    config.validate()?;

    if points.is_empty() {
        return Err("Cannot plot an empty series".into());
    }
    if points.iter().any(|(t, v)| !t.is_finite() || !v.is_finite()) {
        return Err("Series contains non-finite values".into());
    }

    let root = SVGBackend::new(output_path.as_ref(), (config.width, config.height)).into_drawing_area();
    draw_on_area(&root, points, config)?;

    log::info!("Plot written to {}", output_path.as_ref().display());
    Ok(())
}

fn extract(result: &SimulationResult, value: impl Fn(&Sample) -> f64) -> Vec<(f64, f64)> {
    result.samples.iter().map(|s| (s.time, value(s))).collect()
}

/// Roughness versus time
///
/// Uses [`PlotConfig::roughness`] when no configuration is given.
pub fn plot_roughness<P: AsRef<Path>>(
    result: &SimulationResult,
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let config = config.cloned().unwrap_or_else(|| PlotConfig::roughness("Surface roughness"));
    plot_series(&extract(result, |s| s.surface.roughness), output_path, &config)
}

/// RMS roughness versus time
pub fn plot_rms<P: AsRef<Path>>(
    result: &SimulationResult,
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let config = config.cloned().unwrap_or_else(|| PlotConfig::rms("RMS roughness"));
    plot_series(&extract(result, |s| s.surface.rms), output_path, &config)
}

/// Mean height versus time
pub fn plot_mean_height<P: AsRef<Path>>(
    result: &SimulationResult,
    output_path: P,
    config: Option<&PlotConfig>,
) -> Result<(), Box<dyn Error>> {
    let config = config.cloned().unwrap_or_else(|| PlotConfig::mean_height("Mean film height"));
    plot_series(&extract(result, |s| s.surface.mean_height), output_path, &config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_svg_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roughness.svg");
        let points = vec![(0.0, 1.0), (0.5, 1.2), (1.0, 1.5)];

        plot_series(&points, &path, &PlotConfig::roughness("test")).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_plot_flat_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.svg");
        let points = vec![(0.0, 10.0), (1.0, 10.0)];

        assert!(plot_series(&points, &path, &PlotConfig::mean_height("flat")).is_ok());
    }

    #[test]
    fn test_plot_series_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.svg");

        assert!(plot_series(&[], &path, &PlotConfig::default()).is_err());
        assert!(plot_series(&[(0.0, f64::NAN)], &path, &PlotConfig::default()).is_err());
    }
}
