//! The graph model the layout engine operates on.
//!
//! This module provides:
//! - [`Node`]: a positioned, sized diagram entity with a unique identity
//! - [`NodeKind`]: the closed set of node variants and their size formulas
//! - [`Edge`]: a directed relation between two node identities
//! - [`Graph`]: insertion-ordered node storage plus an ordered edge list
//!
//! The graph performs no validation beyond identity uniqueness. Edges may
//! reference identities that are not in the node set; such *dangling* edges
//! are kept as-is and consumers decide how to treat them.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    geometry::{Bounds, Point, Size},
    schema::{ClassKind, EdgeStyle},
};

// =============================================================================
// Node sizing constants
// =============================================================================

/// Width of a class box.
pub const CLASS_WIDTH: f64 = 200.0;
/// Height of the title band of a class box.
pub const CLASS_HEADER_HEIGHT: f64 = 30.0;
/// Height of one field or argument row.
pub const FIELD_HEIGHT: f64 = 20.0;
/// Width of a scalar ellipse.
pub const SCALAR_WIDTH: f64 = 80.0;
/// Height of a scalar ellipse.
pub const SCALAR_HEIGHT: f64 = 80.0;
/// Width of a directive hexagon.
pub const DIRECTIVE_WIDTH: f64 = 160.0;
/// Height of a directive hexagon without argument rows.
pub const DIRECTIVE_HEIGHT: f64 = 90.0;

/// Errors raised while constructing a [`Graph`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("duplicate node identity `{0}`")]
    DuplicateNode(String),
}

// =============================================================================
// Nodes
// =============================================================================

/// Coarse category of a node, as exposed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeCategory {
    Class,
    Scalar,
    Directive,
}

impl NodeCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeCategory::Class => "class",
            NodeCategory::Scalar => "scalar",
            NodeCategory::Directive => "directive",
        }
    }
}

impl fmt::Display for NodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Node variants, each carrying only what its size formula needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Class { kind: ClassKind, field_count: usize },
    Scalar,
    Directive { argument_count: usize },
}

impl NodeKind {
    pub fn category(self) -> NodeCategory {
        match self {
            NodeKind::Class { .. } => NodeCategory::Class,
            NodeKind::Scalar => NodeCategory::Scalar,
            NodeKind::Directive { .. } => NodeCategory::Directive,
        }
    }

    /// Size used for layout and rendering.
    ///
    /// - classes: header plus one row per field
    /// - scalars: fixed
    /// - directives: base hexagon plus one row per argument
    pub fn size(self) -> Size {
        match self {
            NodeKind::Class { field_count, .. } => Size::new(
                CLASS_WIDTH,
                CLASS_HEADER_HEIGHT + field_count as f64 * FIELD_HEIGHT,
            ),
            NodeKind::Scalar => Size::new(SCALAR_WIDTH, SCALAR_HEIGHT),
            NodeKind::Directive { argument_count } => Size::new(
                DIRECTIVE_WIDTH,
                DIRECTIVE_HEIGHT + argument_count as f64 * FIELD_HEIGHT,
            ),
        }
    }
}

/// A diagram entity with identity, size and position.
///
/// The position is the node's center.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    name: String,
    kind: NodeKind,
    size: Size,
    position: Point,
}

impl Node {
    /// Creates a node sized by its kind, positioned at the origin.
    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            size: kind.size(),
            position: Point::default(),
        }
    }

    /// Overrides the size derived from the kind.
    ///
    /// Non-positive or non-finite sizes are ignored so the node keeps a
    /// strictly positive size.
    pub fn with_size(mut self, size: Size) -> Self {
        if size.is_positive() {
            self.size = size;
        }
        self
    }

    pub fn with_position(mut self, position: Point) -> Self {
        self.position = position;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Display name (`User`, `DateTime`, `@auth`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn category(&self) -> NodeCategory {
        self.kind.category()
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    /// Bounding box of the node at its current position.
    pub fn bounds(&self) -> Bounds {
        Bounds::new_from_center(self.position, self.size)
    }
}

// =============================================================================
// Edges
// =============================================================================

/// A directed relation between two node identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    from: String,
    to: String,
    label: String,
    style: EdgeStyle,
}

impl Edge {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        label: impl Into<String>,
        style: EdgeStyle,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            label: label.into(),
            style,
        }
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn style(&self) -> EdgeStyle {
        self.style
    }
}

// =============================================================================
// Graph
// =============================================================================

/// Insertion-ordered nodes keyed by identity, plus an ordered edge list.
///
/// Iteration follows insertion order, which keeps seeded layouts
/// reproducible.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: IndexMap<String, Node>,
    edges: Vec<Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if a node with the same identity
    /// exists; the graph is left unchanged.
    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.nodes.contains_key(node.id()) {
            return Err(GraphError::DuplicateNode(node.id().to_string()));
        }
        self.nodes.insert(node.id().to_string(), node);
        Ok(())
    }

    /// Appends an edge without checking its endpoints.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Insertion index of the node with the given identity.
    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.get_index_of(id)
    }

    /// Mutable node at an insertion index.
    pub fn node_at_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.nodes.get_index_mut(index).map(|(_, node)| node)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges with at least one endpoint missing from the node set.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges
            .iter()
            .filter(|edge| !self.contains_node(edge.from()) || !self.contains_node(edge.to()))
    }

    /// Current node positions, in insertion order.
    pub fn positions(&self) -> Vec<Point> {
        self.nodes.values().map(Node::position).collect()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    fn class(id: &str, field_count: usize) -> Node {
        Node::new(
            id,
            id,
            NodeKind::Class {
                kind: ClassKind::Object,
                field_count,
            },
        )
    }

    #[test]
    fn test_graph_new() {
        let graph = Graph::new();

        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert_eq!(graph.nodes().count(), 0);
        assert!(graph.edges().is_empty());
    }

    #[test]
    fn test_node_sizes_follow_kind() {
        let user = class("User", 3);
        assert_approx_eq!(f64, user.size().width(), 200.0);
        assert_approx_eq!(f64, user.size().height(), 90.0);

        let scalar = Node::new("scalar_DateTime", "DateTime", NodeKind::Scalar);
        assert_eq!(scalar.size(), Size::new(80.0, 80.0));
        assert_eq!(scalar.category(), NodeCategory::Scalar);

        let directive = Node::new(
            "directive_auth",
            "@auth",
            NodeKind::Directive { argument_count: 2 },
        );
        assert_eq!(directive.size(), Size::new(160.0, 130.0));
        assert_eq!(directive.category().to_string(), "directive");
    }

    #[test]
    fn test_with_size_rejects_degenerate_sizes() {
        let node = class("A", 0).with_size(Size::new(50.0, 30.0));
        assert_eq!(node.size(), Size::new(50.0, 30.0));

        let node = class("A", 0).with_size(Size::new(0.0, 30.0));
        assert_eq!(node.size(), Size::new(200.0, 30.0));
    }

    #[test]
    fn test_add_node_preserves_insertion_order() {
        let mut graph = Graph::new();
        graph.add_node(class("Zeta", 0)).unwrap();
        graph.add_node(class("Alpha", 0)).unwrap();
        graph.add_node(class("Mid", 0)).unwrap();

        let ids: Vec<_> = graph.nodes().map(Node::id).collect();
        assert_eq!(ids, ["Zeta", "Alpha", "Mid"]);
        assert_eq!(graph.node_index("Alpha"), Some(1));
    }

    #[test]
    fn test_duplicate_node_is_rejected() {
        let mut graph = Graph::new();
        graph
            .add_node(class("User", 1).with_position(Point::new(1.0, 2.0)))
            .unwrap();

        let err = graph.add_node(class("User", 5)).unwrap_err();
        assert_eq!(err, GraphError::DuplicateNode("User".to_string()));
        assert_eq!(err.to_string(), "duplicate node identity `User`");

        // The original node is untouched.
        assert_eq!(graph.len(), 1);
        let kept = graph.node("User").unwrap();
        assert_eq!(kept.position(), Point::new(1.0, 2.0));
        assert_approx_eq!(f64, kept.size().height(), 50.0);
    }

    #[test]
    fn test_dangling_edges() {
        let mut graph = Graph::new();
        graph.add_node(class("User", 0)).unwrap();
        graph.add_node(class("Post", 0)).unwrap();
        graph.add_edge(Edge::new("User", "Post", "has", EdgeStyle::Plain));
        graph.add_edge(Edge::new("User", "Missing", "has", EdgeStyle::Plain));
        graph.add_edge(Edge::new("Ghost", "Post", "uses", EdgeStyle::Dependency));

        assert_eq!(graph.edges().len(), 3);
        let dangling: Vec<_> = graph.dangling_edges().map(Edge::to).collect();
        assert_eq!(dangling, ["Missing", "Post"]);
    }

    #[test]
    fn test_positions_and_mutation() {
        let mut graph = Graph::new();
        graph.add_node(class("A", 0)).unwrap();
        graph.add_node(class("B", 0)).unwrap();

        graph
            .node_at_mut(1)
            .unwrap()
            .set_position(Point::new(5.0, 6.0));
        assert_eq!(graph.positions(), vec![Point::new(0.0, 0.0), Point::new(5.0, 6.0)]);

        let bounds = graph.node("B").unwrap().bounds();
        assert_approx_eq!(f64, bounds.min_x(), -95.0);
    }
}
