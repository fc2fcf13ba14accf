//! Schemaviz - force-directed diagrams of GraphQL schemas
//!
//! This library reads a GraphQL schema (SDL text or a JSON schema document),
//! lays its types out with a force-directed simulation and renders the result
//! as Mermaid, draw.io or SVG.

pub mod config;
pub mod export;
pub mod layout;

mod error;

pub use schemaviz_core::{geometry, graph, schema};

pub use error::SchemavizError;
pub use layout::{Layout, LayoutError};

use std::{fmt, str::FromStr};

use log::{debug, info, trace};

use config::AppConfig;
use layout::LayoutDriver;
use schema::Schema;

/// Output formats a [`DiagramBuilder`] can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Mermaid,
    Drawio,
    Svg,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            OutputFormat::Mermaid => "mermaid",
            OutputFormat::Drawio => "drawio",
            OutputFormat::Svg => "svg",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mermaid" => Ok(OutputFormat::Mermaid),
            "drawio" => Ok(OutputFormat::Drawio),
            "svg" => Ok(OutputFormat::Svg),
            other => Err(format!(
                "unknown output format `{other}`, expected mermaid, drawio or svg"
            )),
        }
    }
}

/// Builder for reading, laying out and rendering schema diagrams.
///
/// # Examples
///
/// ```rust
/// use schemaviz::{DiagramBuilder, config::AppConfig};
///
/// let source = "type Query { me: User } type User { id: ID! }";
///
/// let mut config = AppConfig::default();
/// config.layout_mut().set_seed(Some(42));
/// let builder = DiagramBuilder::new(config);
///
/// // Parse SDL into schema descriptors
/// let schema = builder.parse(source).expect("Failed to parse");
///
/// // Render with computed positions
/// let svg = builder.render_svg(&schema).expect("Failed to render");
/// assert!(svg.contains("<svg"));
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Debug, Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including layout and style settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse GraphQL SDL into a schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemavizError::Parse`] carrying every diagnostic together
    /// with the source text.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use schemaviz::DiagramBuilder;
    ///
    /// let schema = DiagramBuilder::default()
    ///     .parse("scalar DateTime")
    ///     .expect("Failed to parse schema");
    /// assert_eq!(schema.scalars.len(), 1);
    /// ```
    pub fn parse(&self, source: &str) -> Result<Schema, SchemavizError> {
        info!("Parsing schema SDL");
        let schema = schemaviz_parser::parse(source)
            .map_err(|err| SchemavizError::new_parse_error(err, source))?;
        debug!(entities = schema.entity_count(); "Schema parsed successfully");
        trace!(schema:?; "Parsed schema");
        Ok(schema)
    }

    /// Read a schema serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SchemavizError::Json`] if the document does not describe a
    /// schema.
    pub fn parse_json(&self, source: &str) -> Result<Schema, SchemavizError> {
        info!("Reading schema JSON");
        let schema: Schema = serde_json::from_str(source)?;
        debug!(entities = schema.entity_count(); "Schema read successfully");
        Ok(schema)
    }

    /// Compute node positions for `schema`.
    ///
    /// The configuration is validated first. A new driver is created for
    /// each call, so a configured seed makes every call return the same
    /// layout.
    ///
    /// # Errors
    ///
    /// Returns [`SchemavizError::Config`] for an invalid configuration and
    /// [`SchemavizError::Layout`] for layout failures, including an empty
    /// schema.
    pub fn layout(&self, schema: &Schema) -> Result<Layout, SchemavizError> {
        self.config.validate()?;
        let mut driver = LayoutDriver::new(self.config.layout());
        let layout = driver.layout(schema)?;
        info!(
            nodes = layout.nodes().count(),
            iterations = layout.iterations();
            "Layout calculated"
        );
        Ok(layout)
    }

    /// Render `schema` as Mermaid `classDiagram` text.
    ///
    /// Mermaid positions nodes itself, so no layout is computed.
    ///
    /// # Errors
    ///
    /// Returns [`SchemavizError::Export`] if rendering fails.
    pub fn render_mermaid(&self, schema: &Schema) -> Result<String, SchemavizError> {
        Ok(export::mermaid::render(schema)?)
    }

    /// Lay out `schema` and render it as a draw.io document.
    ///
    /// # Errors
    ///
    /// Returns layout, configuration or export errors.
    pub fn render_drawio(&self, schema: &Schema) -> Result<String, SchemavizError> {
        let layout = self.layout(schema)?;
        Ok(export::drawio::render(&layout, schema)?)
    }

    /// Lay out `schema` and render it as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns layout, configuration or export errors.
    pub fn render_svg(&self, schema: &Schema) -> Result<String, SchemavizError> {
        let layout = self.layout(schema)?;
        let svg = export::svg::render(&layout, schema, self.config.style())?;
        info!("SVG rendered successfully");
        Ok(svg)
    }

    /// Render `schema` in `format`.
    ///
    /// # Errors
    ///
    /// See the format-specific render methods.
    pub fn render(&self, schema: &Schema, format: OutputFormat) -> Result<String, SchemavizError> {
        debug!(format:% = format; "Rendering schema");
        match format {
            OutputFormat::Mermaid => self.render_mermaid(schema),
            OutputFormat::Drawio => self.render_drawio(schema),
            OutputFormat::Svg => self.render_svg(schema),
        }
    }
}
