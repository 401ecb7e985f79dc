//! Plot configuration shared across visualization functions

use plotters::prelude::*;

/// Configuration for customizing plots
///
/// # Example
///
/// ```rust
/// use kmc_rs::output::visualization::PlotConfig;
///
/// let mut config = PlotConfig::roughness("Cu(111) at 500 K");
/// config.width = 1920;
/// config.height = 1080;
/// assert_eq!(config.xlabel, "Time (s)");
/// ```
#[derive(Clone, Debug)]
pub struct PlotConfig {
    /// Image width in pixels (default: 1024)
    pub width: u32,

    /// Image height in pixels (default: 768)
    pub height: u32,

    /// Plot title (default: "Plot")
    pub title: String,

    /// X-axis label (default: "Time (s)")
    pub xlabel: String,

    /// Y-axis label
    pub ylabel: String,

    /// Line color (default: RED)
    pub line_color: RGBColor,

    /// Background color (default: WHITE)
    pub background: RGBColor,

    /// Line width in pixels (default: 2)
    pub line_width: u32,

    /// Show grid lines (default: true)
    pub show_grid: bool,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
            title: "Plot".to_string(),
            xlabel: "Time (s)".to_string(),
            ylabel: String::new(),
            line_color: RED,
            background: WHITE,
            line_width: 2,
            show_grid: true,
        }
    }
}

impl PlotConfig {
    /// Roughness versus time
    pub fn roughness(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ylabel: "Roughness".to_string(),
            ..Default::default()
        }
    }

    /// RMS roughness versus time
    pub fn rms(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ylabel: "RMS roughness".to_string(),
            line_color: MAGENTA,
            ..Default::default()
        }
    }

    /// Mean film height versus time
    pub fn mean_height(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ylabel: "Mean height (ML)".to_string(),
            line_color: BLUE,
            ..Default::default()
        }
    }

    /// Validate dimensions
    pub fn validate(&self) -> Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("Plot size must be positive, got {}x{}", self.width, self.height));
        }
        Ok(())
    }
}

// =================================================================================================
// Tests
// =================================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_config_default() {
        let config = PlotConfig::default();
        assert_eq!(config.width, 1024);
        assert_eq!(config.height, 768);
        assert_eq!(config.xlabel, "Time (s)");
        assert!(config.show_grid);
    }

    #[test]
    fn test_presets() {
        let config = PlotConfig::roughness("Growth");
        assert_eq!(config.title, "Growth");
        assert_eq!(config.ylabel, "Roughness");

        let config = PlotConfig::mean_height(format!("T = {} K", 500));
        assert_eq!(config.title, "T = 500 K");
        assert_eq!(config.line_color, BLUE);
    }

    #[test]
    fn test_validate() {
        let mut config = PlotConfig::default();
        assert!(config.validate().is_ok());
        config.width = 0;
        assert!(config.validate().is_err());
    }
}
