use serde::{Deserialize, Serialize};

use crate::error::{CampaignError, CampaignResult};

/// Root application configuration. Loaded from environment variables
/// with the prefix `CAMPAIGN_INSIGHTS__` and an optional TOML config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub weekly: WeeklyConfig,
    #[serde(default)]
    pub bubble: BubbleConfig,
    #[serde(default)]
    pub line: LineConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyConfig {
    /// Number of most recent weeks kept by the time-series reducer.
    #[serde(default = "default_weekly_window")]
    pub window: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BubbleConfig {
    #[serde(default = "default_min_radius")]
    pub min_radius: f64,
    #[serde(default = "default_max_radius")]
    pub max_radius: f64,
    /// Radius given to every bubble when all values are equal.
    #[serde(default = "default_flat_radius")]
    pub flat_radius: f64,
    /// Colour intensity given to every bubble when all values are equal.
    #[serde(default = "default_flat_intensity")]
    pub flat_intensity: f64,
    #[serde(default = "default_plane_width")]
    pub plane_width: f64,
    #[serde(default = "default_plane_height")]
    pub plane_height: f64,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    /// Place regions missing from the coordinate table by lat/lon when known.
    #[serde(default = "default_project_lat_lon")]
    pub project_lat_lon: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineConfig {
    #[serde(default = "default_line_left")]
    pub left: f64,
    #[serde(default = "default_line_top")]
    pub top: f64,
    #[serde(default = "default_line_width")]
    pub width: f64,
    #[serde(default = "default_line_height")]
    pub height: f64,
    /// Space above and below the plot area, split evenly around `top`.
    #[serde(default = "default_line_vertical_margin")]
    pub vertical_margin: f64,
    #[serde(default = "default_line_padding_ratio")]
    pub padding_ratio: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Blue,
    #[default]
    Green,
    Red,
    Purple,
}

impl std::str::FromStr for ColorScheme {
    type Err = CampaignError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blue" => Ok(Self::Blue),
            "green" => Ok(Self::Green),
            "red" => Ok(Self::Red),
            "purple" => Ok(Self::Purple),
            other => Err(CampaignError::Config(format!(
                "unknown color scheme: {other}"
            ))),
        }
    }
}

// Default functions
fn default_weekly_window() -> usize {
    12
}
fn default_min_radius() -> f64 {
    2.0
}
fn default_max_radius() -> f64 {
    8.0
}
fn default_flat_radius() -> f64 {
    4.0
}
fn default_flat_intensity() -> f64 {
    0.5
}
fn default_plane_width() -> f64 {
    100.0
}
fn default_plane_height() -> f64 {
    60.0
}
fn default_project_lat_lon() -> bool {
    true
}
fn default_line_left() -> f64 {
    10.0
}
fn default_line_top() -> f64 {
    40.0
}
fn default_line_width() -> f64 {
    85.0
}
fn default_line_height() -> f64 {
    300.0
}
fn default_line_vertical_margin() -> f64 {
    80.0
}
fn default_line_padding_ratio() -> f64 {
    0.1
}

impl Default for WeeklyConfig {
    fn default() -> Self {
        Self {
            window: default_weekly_window(),
        }
    }
}

impl Default for BubbleConfig {
    fn default() -> Self {
        Self {
            min_radius: default_min_radius(),
            max_radius: default_max_radius(),
            flat_radius: default_flat_radius(),
            flat_intensity: default_flat_intensity(),
            plane_width: default_plane_width(),
            plane_height: default_plane_height(),
            color_scheme: ColorScheme::default(),
            project_lat_lon: default_project_lat_lon(),
        }
    }
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            left: default_line_left(),
            top: default_line_top(),
            width: default_line_width(),
            height: default_line_height(),
            vertical_margin: default_line_vertical_margin(),
            padding_ratio: default_line_padding_ratio(),
        }
    }
}

impl LineConfig {
    /// Height of the drawable area once the vertical margin is removed.
    pub fn plot_height(&self) -> f64 {
        self.height - self.vertical_margin
    }
}

impl AppConfig {
    /// Load configuration from environment variables and an optional config file.
    pub fn load(path: Option<&str>) -> CampaignResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }
        let builder = builder.add_source(
            config::Environment::with_prefix("CAMPAIGN_INSIGHTS")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> CampaignResult<()> {
        if self.weekly.window == 0 {
            return Err(CampaignError::Config(
                "weekly.window must be at least 1".into(),
            ));
        }
        let bubble = &self.bubble;
        if bubble.min_radius < 0.0 || bubble.min_radius > bubble.max_radius {
            return Err(CampaignError::Config(format!(
                "bubble radius range is inverted: {}..{}",
                bubble.min_radius, bubble.max_radius
            )));
        }
        if !(bubble.min_radius..=bubble.max_radius).contains(&bubble.flat_radius) {
            return Err(CampaignError::Config(format!(
                "bubble.flat_radius {} outside {}..{}",
                bubble.flat_radius, bubble.min_radius, bubble.max_radius
            )));
        }
        if !(0.0..=1.0).contains(&bubble.flat_intensity) {
            return Err(CampaignError::Config(
                "bubble.flat_intensity must be within 0..1".into(),
            ));
        }
        if bubble.plane_width <= 0.0 || bubble.plane_height <= 0.0 {
            return Err(CampaignError::Config("bubble plane must be non-empty".into()));
        }
        let line = &self.line;
        if line.width <= 0.0 || line.plot_height() <= 0.0 {
            return Err(CampaignError::Config(format!(
                "line plot must be non-empty: width {} height {}",
                line.width,
                line.plot_height()
            )));
        }
        if line.padding_ratio < 0.0 {
            return Err(CampaignError::Config(
                "line.padding_ratio must not be negative".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.weekly.window, 12);
        assert_eq!(config.bubble.min_radius, 2.0);
        assert_eq!(config.bubble.max_radius, 8.0);
        assert_eq!(config.line.plot_height(), 220.0);
    }

    #[test]
    fn test_inverted_radius_rejected() {
        let mut config = AppConfig::default();
        config.bubble.min_radius = 9.0;
        assert!(matches!(config.validate(), Err(CampaignError::Config(_))));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = AppConfig::default();
        config.weekly.window = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_color_scheme_parse() {
        assert_eq!("Purple".parse::<ColorScheme>().unwrap(), ColorScheme::Purple);
        assert!("teal".parse::<ColorScheme>().is_err());
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let bubble: BubbleConfig = serde_json::from_str(r#"{"max_radius": 10.0}"#).unwrap();
        assert_eq!(bubble.max_radius, 10.0);
        assert_eq!(bubble.min_radius, 2.0);
        assert_eq!(bubble.color_scheme, ColorScheme::Green);
    }

    #[test]
    fn test_default_color_scheme_is_green() {
        assert_eq!(AppConfig::default().bubble.color_scheme, ColorScheme::Green);
    }
}
