//! Configuration types for schema diagram layout and rendering.
//!
//! All types implement [`serde::Deserialize`] with defaults on every field,
//! so a configuration file only needs to name the values it changes.
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Force simulation and canvas parameters.
//! - [`StyleConfig`] - Colors and fonts used by the SVG renderer.
//!
//! # Example
//!
//! ```
//! # use schemaviz::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(config.validate().is_ok());
//! assert_eq!(config.layout().iterations(), 100);
//! ```

use std::str::FromStr;

use color::DynamicColor;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use schemaviz_core::geometry::Size;

use crate::layout::ForceConfig;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its two sections.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self { layout, style }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the layout configuration for modification.
    pub fn layout_mut(&mut self) -> &mut LayoutConfig {
        &mut self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Validates both sections.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first rejected value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.layout.validate()?;
        self.style.validate()
    }
}

/// Force simulation and canvas parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    iterations: usize,
    canvas_width: f64,
    canvas_height: f64,
    min_distance: f64,
    /// Seed for initial placement; `None` draws one from the OS.
    seed: Option<u64>,
    initial_temperature: Option<f64>,
    convergence_threshold: Option<f64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            canvas_width: 1920.0,
            canvas_height: 1080.0,
            min_distance: 0.1,
            seed: None,
            initial_temperature: None,
            convergence_threshold: None,
        }
    }
}

impl LayoutConfig {
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn canvas(&self) -> Size {
        Size::new(self.canvas_width, self.canvas_height)
    }

    pub fn min_distance(&self) -> f64 {
        self.min_distance
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn initial_temperature(&self) -> Option<f64> {
        self.initial_temperature
    }

    pub fn convergence_threshold(&self) -> Option<f64> {
        self.convergence_threshold
    }

    pub fn set_iterations(&mut self, iterations: usize) -> &mut Self {
        self.iterations = iterations;
        self
    }

    pub fn set_canvas(&mut self, canvas: Size) -> &mut Self {
        self.canvas_width = canvas.width();
        self.canvas_height = canvas.height();
        self
    }

    pub fn set_min_distance(&mut self, min_distance: f64) -> &mut Self {
        self.min_distance = min_distance;
        self
    }

    pub fn set_seed(&mut self, seed: Option<u64>) -> &mut Self {
        self.seed = seed;
        self
    }

    pub fn set_initial_temperature(&mut self, temperature: Option<f64>) -> &mut Self {
        self.initial_temperature = temperature;
        self
    }

    pub fn set_convergence_threshold(&mut self, threshold: Option<f64>) -> &mut Self {
        self.convergence_threshold = threshold;
        self
    }

    /// The simulation parameters of this configuration.
    pub fn force_config(&self) -> ForceConfig {
        ForceConfig {
            iterations: self.iterations,
            min_distance: self.min_distance,
            initial_temperature: self.initial_temperature,
            convergence_threshold: self.convergence_threshold,
        }
    }

    /// Checks that the iteration count is positive and that every number is
    /// finite and positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::Invalid(
                "layout.iterations must be greater than zero".to_string(),
            ));
        }

        let required = [
            ("canvas_width", Some(self.canvas_width)),
            ("canvas_height", Some(self.canvas_height)),
            ("min_distance", Some(self.min_distance)),
            ("initial_temperature", self.initial_temperature),
            ("convergence_threshold", self.convergence_threshold),
        ];
        for (key, value) in required {
            if let Some(value) = value.filter(|v| !(v.is_finite() && *v > 0.0)) {
                return Err(ConfigError::Invalid(format!(
                    "layout.{key} must be a positive number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// Colors and fonts used by the SVG renderer.
///
/// Colors are CSS color strings (`"#ff0000"`, `"rgb(0, 0, 255)"`, `"white"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Background color; `None` leaves the document transparent.
    background_color: Option<String>,
    class_fill: String,
    scalar_fill: String,
    directive_fill: String,
    stroke_color: String,
    font_family: String,
    font_size: f64,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: Some("white".to_string()),
            class_fill: "#dae8fc".to_string(),
            scalar_fill: "#d5e8d4".to_string(),
            directive_fill: "#ffe6cc".to_string(),
            stroke_color: "#333333".to_string(),
            font_family: "Helvetica, Arial, sans-serif".to_string(),
            font_size: 12.0,
        }
    }
}

impl StyleConfig {
    pub fn background_color(&self) -> Option<&str> {
        self.background_color.as_deref()
    }

    pub fn class_fill(&self) -> &str {
        &self.class_fill
    }

    pub fn scalar_fill(&self) -> &str {
        &self.scalar_fill
    }

    pub fn directive_fill(&self) -> &str {
        &self.directive_fill
    }

    pub fn stroke_color(&self) -> &str {
        &self.stroke_color
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Checks that every color parses and the font size is positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let colors = [
            ("background_color", self.background_color.as_deref()),
            ("class_fill", Some(self.class_fill.as_str())),
            ("scalar_fill", Some(self.scalar_fill.as_str())),
            ("directive_fill", Some(self.directive_fill.as_str())),
            ("stroke_color", Some(self.stroke_color.as_str())),
        ];
        for (key, value) in colors {
            if let Some(value) = value {
                DynamicColor::from_str(value).map_err(|err| {
                    ConfigError::Invalid(format!("style.{key}: invalid color `{value}`: {err}"))
                })?;
            }
        }

        if !(self.font_size.is_finite() && self.font_size > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "style.font_size must be a positive number, got {}",
                self.font_size
            )));
        }
        Ok(())
    }
}
