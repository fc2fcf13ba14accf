//! SVG export.
//!
//! Classes are drawn as rectangles with a header band and one row per field,
//! scalars as ellipses and directives as hexagons. Edges are straight lines
//! clipped to the rectangles of their endpoints and drawn beneath the nodes.

use log::{debug, trace};
use svg::{self, node::element as svg_element};

use schemaviz_core::{
    geometry::{Bounds, Point},
    graph::{CLASS_HEADER_HEIGHT, DIRECTIVE_HEIGHT, Edge, FIELD_HEIGHT, Node, NodeCategory},
    schema::{EdgeStyle, Schema},
};

use super::Error;
use crate::{config::StyleConfig, layout::Layout};

/// Space between the diagram content and the document edge.
const MARGIN: f64 = 40.0;
/// Horizontal inset of text rows and hexagon corners.
const INSET: f64 = 8.0;
const ARROW_MARKER_ID: &str = "schemaviz-arrow";
const DASH_ARRAY: &str = "6,4";

/// Renders a laid-out schema as an SVG document string.
///
/// # Errors
///
/// Returns [`Error::Io`] if serializing the document fails and
/// [`Error::Render`] if the output is not valid UTF-8.
pub fn render(layout: &Layout, schema: &Schema, style: &StyleConfig) -> Result<String, Error> {
    let document = SvgRenderer::new(schema, style).render(layout);

    let mut buffer = Vec::new();
    svg::write(&mut buffer, &document)?;
    let output = String::from_utf8(buffer).map_err(|err| Error::Render(err.to_string()))?;

    debug!(bytes = output.len(); "Rendered SVG document");
    Ok(output)
}

struct SvgRenderer<'a> {
    schema: &'a Schema,
    style: &'a StyleConfig,
}

impl<'a> SvgRenderer<'a> {
    fn new(schema: &'a Schema, style: &'a StyleConfig) -> Self {
        Self { schema, style }
    }

    fn render(&self, layout: &Layout) -> svg::Document {
        let content_bounds = layout.bounds();
        let width = content_bounds.width() + 2.0 * MARGIN;
        let height = content_bounds.height() + 2.0 * MARGIN;

        let mut doc = svg::Document::new()
            .set("viewBox", format!("0 0 {width} {height}"))
            .set("width", width)
            .set("height", height);

        if let Some(background) = self.style.background_color() {
            doc = doc.add(
                svg_element::Rectangle::new()
                    .set("x", 0)
                    .set("y", 0)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", background),
            );
        }
        doc = doc.add(self.marker_definitions());

        let mut main_group = svg_element::Group::new().set(
            "transform",
            format!(
                "translate({}, {})",
                MARGIN - content_bounds.min_x(),
                MARGIN - content_bounds.min_y()
            ),
        );

        for edge in layout.edges() {
            let (Some(source), Some(target)) = (layout.node(edge.from()), layout.node(edge.to()))
            else {
                trace!(from = edge.from(), to = edge.to(); "Skipping dangling edge");
                continue;
            };
            if source.id() == target.id() {
                continue;
            }
            main_group = main_group.add(self.render_edge(edge, source, target));
        }

        for node in layout.nodes() {
            main_group = main_group.add(self.render_node(node));
        }

        doc.add(main_group)
    }

    fn marker_definitions(&self) -> svg_element::Definitions {
        let arrow_head = svg_element::Path::new()
            .set("d", "M 0 0 L 10 5 L 0 10 z")
            .set("fill", self.style.stroke_color());
        let marker = svg_element::Marker::new()
            .set("id", ARROW_MARKER_ID)
            .set("viewBox", "0 0 10 10")
            .set("refX", 10)
            .set("refY", 5)
            .set("markerWidth", 8)
            .set("markerHeight", 8)
            .set("orient", "auto-start-reverse")
            .add(arrow_head);
        svg_element::Definitions::new().add(marker)
    }

    fn text(&self, content: &str, position: Point, anchor: &str) -> svg_element::Text {
        svg_element::Text::new(content)
            .set("x", position.x())
            .set("y", position.y())
            .set("text-anchor", anchor)
            .set("dominant-baseline", "central")
            .set("font-family", self.style.font_family())
            .set("font-size", self.style.font_size())
    }

    fn render_edge(&self, edge: &Edge, source: &Node, target: &Node) -> svg_element::Group {
        let start = source.bounds().boundary_toward(target.position());
        let end = target.bounds().boundary_toward(source.position());

        let mut line = svg_element::Line::new()
            .set("x1", start.x())
            .set("y1", start.y())
            .set("x2", end.x())
            .set("y2", end.y())
            .set("stroke", self.style.stroke_color())
            .set("stroke-width", 1.5)
            .set("marker-end", format!("url(#{ARROW_MARKER_ID})"));
        if matches!(edge.style(), EdgeStyle::Dependency | EdgeStyle::Directive) {
            line = line.set("stroke-dasharray", DASH_ARRAY);
        }

        let group = svg_element::Group::new().set("class", "edge").add(line);
        if edge.label().is_empty() {
            return group;
        }
        group.add(
            self.text(edge.label(), start.midpoint(end), "middle")
                .set("font-size", self.style.font_size() * 0.9)
                .set("fill", self.style.stroke_color()),
        )
    }

    fn render_node(&self, node: &Node) -> svg_element::Group {
        let bounds = node.bounds();
        let group = svg_element::Group::new()
            .set("class", node.category().as_str())
            .set("id", node.id());

        match node.category() {
            NodeCategory::Class => self.render_class(group, node, bounds),
            NodeCategory::Scalar => self.render_scalar(group, node, bounds),
            NodeCategory::Directive => self.render_directive(group, node, bounds),
        }
    }

    fn render_class(
        &self,
        group: svg_element::Group,
        node: &Node,
        bounds: Bounds,
    ) -> svg_element::Group {
        let class = self.schema.class(node.name());
        let title = match class.and_then(|class| class.kind.stereotype()) {
            Some(stereotype) => format!("«{stereotype}» {}", node.name()),
            None => node.name().to_string(),
        };

        let header_bottom = bounds.min_y() + CLASS_HEADER_HEIGHT;
        let mut group = group
            .add(
                svg_element::Rectangle::new()
                    .set("x", bounds.min_x())
                    .set("y", bounds.min_y())
                    .set("width", bounds.width())
                    .set("height", bounds.height())
                    .set("fill", self.style.class_fill())
                    .set("stroke", self.style.stroke_color()),
            )
            .add(
                svg_element::Line::new()
                    .set("x1", bounds.min_x())
                    .set("y1", header_bottom)
                    .set("x2", bounds.max_x())
                    .set("y2", header_bottom)
                    .set("stroke", self.style.stroke_color()),
            )
            .add(
                self.text(
                    &title,
                    Point::new(bounds.center().x(), bounds.min_y() + CLASS_HEADER_HEIGHT / 2.0),
                    "middle",
                )
                .set("font-weight", "bold"),
            );

        let fields = class.map(|class| class.fields.as_slice()).unwrap_or_default();
        for (i, field) in fields.iter().enumerate() {
            let y = header_bottom + (i as f64 + 0.5) * FIELD_HEIGHT;
            group = group.add(self.text(
                &field.to_string(),
                Point::new(bounds.min_x() + INSET, y),
                "start",
            ));
        }
        group
    }

    fn render_scalar(
        &self,
        group: svg_element::Group,
        node: &Node,
        bounds: Bounds,
    ) -> svg_element::Group {
        let center = bounds.center();
        group
            .add(
                svg_element::Ellipse::new()
                    .set("cx", center.x())
                    .set("cy", center.y())
                    .set("rx", bounds.width() / 2.0)
                    .set("ry", bounds.height() / 2.0)
                    .set("fill", self.style.scalar_fill())
                    .set("stroke", self.style.stroke_color()),
            )
            .add(self.text(node.name(), center, "middle"))
    }

    fn render_directive(
        &self,
        group: svg_element::Group,
        node: &Node,
        bounds: Bounds,
    ) -> svg_element::Group {
        let corner = (bounds.width() / 4.0).min(2.0 * INSET);
        let center_y = bounds.center().y();
        let points = [
            (bounds.min_x() + corner, bounds.min_y()),
            (bounds.max_x() - corner, bounds.min_y()),
            (bounds.max_x(), center_y),
            (bounds.max_x() - corner, bounds.max_y()),
            (bounds.min_x() + corner, bounds.max_y()),
            (bounds.min_x(), center_y),
        ]
        .iter()
        .map(|(x, y)| format!("{x},{y}"))
        .collect::<Vec<_>>()
        .join(" ");

        let directive = node
            .name()
            .strip_prefix('@')
            .and_then(|name| self.schema.directive(name));

        let mut group = group
            .add(
                svg_element::Polygon::new()
                    .set("points", points)
                    .set("fill", self.style.directive_fill())
                    .set("stroke", self.style.stroke_color()),
            )
            .add(
                self.text(
                    node.name(),
                    Point::new(bounds.center().x(), bounds.min_y() + DIRECTIVE_HEIGHT / 3.0),
                    "middle",
                )
                .set("font-weight", "bold"),
            );

        let Some(directive) = directive else {
            return group;
        };

        if !directive.locations.is_empty() {
            group = group.add(self.text(
                &format!("on {}", directive.locations.join(" | ")),
                Point::new(bounds.center().x(), bounds.min_y() + DIRECTIVE_HEIGHT * 2.0 / 3.0),
                "middle",
            ));
        }
        for (i, argument) in directive.arguments.iter().enumerate() {
            let y = bounds.min_y() + DIRECTIVE_HEIGHT + (i as f64 + 0.5) * FIELD_HEIGHT;
            group = group.add(self.text(
                &argument.to_string(),
                Point::new(bounds.min_x() + corner + INSET, y),
                "start",
            ));
        }
        group
    }
}

#[cfg(test)]
mod tests {
    use schemaviz_core::schema::{
        ClassDef, ClassKind, DirectiveDef, FieldDef, RelationDef, ScalarDef,
    };

    use super::*;
    use crate::{config::LayoutConfig, layout::LayoutDriver};

    fn schema() -> Schema {
        Schema {
            classes: vec![
                ClassDef {
                    name: "Query".to_string(),
                    kind: ClassKind::Object,
                    fields: vec![FieldDef::new("users", "[User!]!", true)],
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
                arguments: vec![],
                locations: vec!["OBJECT".to_string()],
            }],
            relations: vec![
                RelationDef::new("Query", "UserFilter", "uses", EdgeStyle::Dependency),
                RelationDef::new("Query", "DateTime", "has", EdgeStyle::Plain),
                RelationDef::new("Query", "User", "has", EdgeStyle::Plain),
            ],
        }
    }

    fn render_default(schema: &Schema) -> String {
        let mut config = LayoutConfig::default();
        config.set_seed(Some(11)).set_iterations(30);
        let layout = LayoutDriver::new(&config).layout(schema).expect("layout");
        render(&layout, schema, &StyleConfig::default()).expect("render")
    }

    #[test]
    fn test_svg_contains_every_node_shape() {
        let output = render_default(&schema());

        assert!(output.starts_with("<svg"));
        assert!(output.contains(r#"id="Query""#));
        assert!(output.contains(r#"id="scalar_DateTime""#));
        assert!(output.contains(r#"id="directive_auth""#));
        assert!(output.contains("<ellipse"));
        assert!(output.contains("<polygon"));
        assert!(output.contains("«input» UserFilter"));
        assert!(output.contains("on OBJECT"));
    }

    #[test]
    fn test_edges_skip_dangling_and_dash_dependencies() {
        let output = render_default(&schema());

        // Two resolvable edges, the third targets an unknown type.
        assert_eq!(output.matches("<line").count() - 2, 2);
        assert_eq!(output.matches(DASH_ARRAY).count(), 1);
        assert!(output.contains(ARROW_MARKER_ID));
    }

    #[test]
    fn test_transparent_background() {
        let schema = schema();
        let mut config = LayoutConfig::default();
        config.set_seed(Some(1)).set_iterations(5);
        let layout = LayoutDriver::new(&config).layout(&schema).expect("layout");

        let style: StyleConfig =
            serde_json::from_str(r#"{"background_color": null}"#).expect("style");
        let output = render(&layout, &schema, &style).expect("render");
        assert!(!output.contains(r#"fill="white""#));
        assert!(render_default(&schema).contains(r#"fill="white""#));
    }
}
