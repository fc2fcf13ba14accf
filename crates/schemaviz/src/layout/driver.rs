//! Layout driver: from schema descriptors to a positioned layout.
//!
//! The driver builds the complete node set up front (classes, then scalars,
//! then directives), places every node uniformly at random inside the canvas
//! and runs the force simulation once over the whole graph.

use std::collections::HashMap;

use log::{debug, info};
use rand::{Rng, SeedableRng, rngs::StdRng};

use schemaviz_core::{
    geometry::{Bounds, Point, Size},
    graph::{Edge, Graph, Node, NodeKind},
    schema::Schema,
};

use super::{LayoutError, force::Engine};
use crate::config::LayoutConfig;

/// Prefix of scalar node identities.
const SCALAR_ID_PREFIX: &str = "scalar_";
/// Prefix of directive node identities.
const DIRECTIVE_ID_PREFIX: &str = "directive_";

/// Identity of the node for a scalar named `name`.
pub fn scalar_id(name: &str) -> String {
    format!("{SCALAR_ID_PREFIX}{name}")
}

/// Identity of the node for a directive named `name` (without `@`).
pub fn directive_id(name: &str) -> String {
    format!("{DIRECTIVE_ID_PREFIX}{name}")
}

/// Builds graphs from schemas and lays them out.
///
/// The driver owns its random number generator, so two drivers created with
/// the same seed produce identical layouts for identical schemas.
#[derive(Debug, Clone)]
pub struct LayoutDriver {
    engine: Engine,
    canvas: Size,
    rng: StdRng,
}

impl LayoutDriver {
    /// Creates a driver from a layout configuration.
    ///
    /// The configuration is validated when a layout is computed, not here.
    pub fn new(config: &LayoutConfig) -> Self {
        let rng = match config.seed() {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            engine: Engine::with_config(config.force_config()),
            canvas: config.canvas(),
            rng,
        }
    }

    /// The canvas used for initial placement.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Builds the graph for `schema` with random initial positions.
    ///
    /// Relation endpoints are resolved from display names (`User`,
    /// `DateTime`, `@auth`) to node identities. Names that match no entity
    /// are kept verbatim and produce dangling edges.
    ///
    /// # Errors
    ///
    /// - [`LayoutError::InvalidConfig`] if the canvas is not positive.
    /// - [`LayoutError::Graph`] if two entities map to the same identity.
    pub fn build_graph(&mut self, schema: &Schema) -> Result<Graph, LayoutError> {
        let width = self.canvas.width();
        let height = self.canvas.height();
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(LayoutError::InvalidConfig(format!(
                "canvas must have positive finite dimensions, got {width}x{height}"
            )));
        }

        let mut nodes = Vec::with_capacity(schema.entity_count());
        for class in &schema.classes {
            nodes.push(Node::new(
                class.name.clone(),
                class.name.clone(),
                NodeKind::Class {
                    kind: class.kind,
                    field_count: class.fields.len(),
                },
            ));
        }
        for scalar in &schema.scalars {
            nodes.push(Node::new(
                scalar_id(&scalar.name),
                scalar.name.clone(),
                NodeKind::Scalar,
            ));
        }
        for directive in &schema.directives {
            nodes.push(Node::new(
                directive_id(&directive.name),
                directive.display_name(),
                NodeKind::Directive {
                    argument_count: directive.arguments.len(),
                },
            ));
        }

        let mut graph = Graph::new();
        let mut name_index: HashMap<String, String> = HashMap::new();
        for node in nodes {
            let position = Point::new(
                self.rng.random_range(0.0..width),
                self.rng.random_range(0.0..height),
            );
            name_index
                .entry(node.name().to_string())
                .or_insert_with(|| node.id().to_string());
            graph.add_node(node.with_position(position))?;
        }

        let resolve = |name: &str| {
            name_index
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        };
        for relation in &schema.relations {
            graph.add_edge(Edge::new(
                resolve(&relation.from),
                resolve(&relation.to),
                relation.label.clone(),
                relation.style,
            ));
        }

        debug!(
            nodes = graph.len(),
            edges = graph.edges().len();
            "Built schema graph"
        );
        Ok(graph)
    }

    /// Lays out `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError::EmptyGraph`] for a schema without entities,
    /// before any random number is drawn. Graph construction and simulation
    /// errors are passed through.
    pub fn layout(&mut self, schema: &Schema) -> Result<Layout, LayoutError> {
        if schema.is_empty() {
            return Err(LayoutError::EmptyGraph);
        }
        self.engine.config().validate()?;

        let mut graph = self.build_graph(schema)?;
        let report = self.engine.simulate(&mut graph, self.canvas)?;

        info!(
            nodes = graph.len(),
            edges = graph.edges().len(),
            iterations = report.iterations();
            "Layout complete"
        );

        Ok(Layout {
            graph,
            canvas: self.canvas,
            iterations: report.iterations(),
            ideal_edge_length: report.ideal_edge_length(),
        })
    }
}

/// A finished layout: final node positions and sizes, edges and canvas.
#[derive(Debug, Clone)]
pub struct Layout {
    graph: Graph,
    canvas: Size,
    iterations: usize,
    ideal_edge_length: f64,
}

impl Layout {
    /// Positioned nodes in insertion order (classes, scalars, directives).
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    /// Edges exactly as built, dangling ones included.
    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    /// The canvas used for initial placement.
    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Iterations the simulation ran.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn ideal_edge_length(&self) -> f64 {
        self.ideal_edge_length
    }

    /// Tight bounding box of all nodes at their final positions.
    pub fn bounds(&self) -> Bounds {
        self.graph
            .nodes()
            .map(Node::bounds)
            .reduce(|acc, bounds| acc.merge(&bounds))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use schemaviz_core::{
        graph::NodeCategory,
        schema::{
            ArgumentDef, ClassDef, ClassKind, DirectiveDef, EdgeStyle, FieldDef, RelationDef,
            ScalarDef,
        },
    };

    use super::*;

    fn seeded(seed: u64) -> LayoutDriver {
        let mut config = LayoutConfig::default();
        config.set_seed(Some(seed));
        LayoutDriver::new(&config)
    }

    fn sample_schema() -> Schema {
        Schema {
            classes: vec![
                ClassDef {
                    name: "User".to_string(),
                    kind: ClassKind::Object,
                    fields: vec![
                        FieldDef::new("id", "ID!", true),
                        FieldDef::new("createdAt", "DateTime", false),
                    ],
                },
                ClassDef {
                    name: "UserFilter".to_string(),
                    kind: ClassKind::Input,
                    fields: vec![FieldDef::new("name", "String", false)],
                },
            ],
            scalars: vec![ScalarDef {
                name: "DateTime".to_string(),
                description: None,
            }],
            directives: vec![DirectiveDef {
                name: "auth".to_string(),
                description: None,
                arguments: vec![ArgumentDef {
                    name: "role".to_string(),
                    type_name: "String".to_string(),
                    required: true,
                    default_value: None,
                }],
                locations: vec!["FIELD_DEFINITION".to_string()],
            }],
            relations: vec![
                RelationDef::new("User", "DateTime", "has", EdgeStyle::Plain),
                RelationDef::new("@auth", "UserFilter", "uses", EdgeStyle::Directive),
                RelationDef::new("User", "Nowhere", "has", EdgeStyle::Plain),
            ],
        }
    }

    #[test]
    fn test_build_graph_orders_and_sizes_nodes() {
        let graph = seeded(1).build_graph(&sample_schema()).unwrap();

        let ids: Vec<_> = graph.nodes().map(Node::id).collect();
        assert_eq!(ids, ["User", "UserFilter", "scalar_DateTime", "directive_auth"]);

        let user = graph.node("User").unwrap();
        assert_approx_eq!(f64, user.size().height(), 70.0);
        let auth = graph.node("directive_auth").unwrap();
        assert_eq!(auth.name(), "@auth");
        assert_eq!(auth.category(), NodeCategory::Directive);
        assert_approx_eq!(f64, auth.size().height(), 110.0);

        for node in graph.nodes() {
            let p = node.position();
            assert!((0.0..1920.0).contains(&p.x()) && (0.0..1080.0).contains(&p.y()));
        }
    }

    #[test]
    fn test_build_graph_resolves_display_names() {
        let graph = seeded(1).build_graph(&sample_schema()).unwrap();
        let edges = graph.edges();

        assert_eq!(edges[0].to(), "scalar_DateTime");
        assert_eq!(edges[1].from(), "directive_auth");
        assert_eq!(edges[1].style(), EdgeStyle::Directive);
        assert_eq!(edges[2].to(), "Nowhere");
        assert_eq!(graph.dangling_edges().count(), 1);
    }

    #[test]
    fn test_duplicate_identity_is_an_error() {
        let mut schema = sample_schema();
        schema.classes.push(ClassDef {
            name: "scalar_DateTime".to_string(),
            kind: ClassKind::Object,
            fields: vec![],
        });

        let err = seeded(1).build_graph(&schema).unwrap_err();
        assert!(matches!(err, LayoutError::Graph(_)));
    }

    #[test]
    fn test_layout_keeps_edges_and_bounds_cover_nodes() {
        let layout = seeded(3).layout(&sample_schema()).unwrap();

        assert_eq!(layout.nodes().count(), 4);
        assert_eq!(layout.edges().len(), 3);
        assert_eq!(layout.iterations(), 100);

        let bounds = layout.bounds();
        for node in layout.nodes() {
            assert!(node.position().is_finite());
            let b = node.bounds();
            assert!(b.min_x() >= bounds.min_x() && b.max_x() <= bounds.max_x());
            assert!(b.min_y() >= bounds.min_y() && b.max_y() <= bounds.max_y());
        }
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let mut config = LayoutConfig::default();
        config.set_iterations(0).set_seed(Some(1));

        let err = LayoutDriver::new(&config).layout(&sample_schema()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidConfig(_)));
    }
}
