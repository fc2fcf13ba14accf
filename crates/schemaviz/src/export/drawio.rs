//! draw.io (`mxfile`) export.
//!
//! Every node becomes a vertex cell and every drawn edge an edge cell. Class
//! fields and directive arguments are child cells stacked under the header.
//!
//! Cell ids live in separate namespaces so a type name can never clash with
//! another cell: classes are `c_<id>`, scalars and directives keep their
//! `scalar_`/`directive_` node identities, rows are `f<i>_<cell>` or
//! `a<i>_<cell>` and edges are `edge_<i>`.

use std::fmt::Write as _;

use log::{debug, warn};

use schemaviz_core::{
    geometry::{Bounds, Point, Size},
    graph::{CLASS_HEADER_HEIGHT, DIRECTIVE_HEIGHT, FIELD_HEIGHT, Node, NodeCategory},
    schema::{EdgeStyle, Schema},
};

use super::{Error, EscapeXml};
use crate::layout::Layout;

/// Distance between the page origin and the top-left of the diagram.
const MARGIN: f64 = 40.0;

const CLASS_STYLE: &str = "swimlane;fontStyle=1;align=center;verticalAlign=top;childLayout=stackLayout;horizontal=1;startSize=30;horizontalStack=0;resizeParent=1;resizeParentMax=0;resizeLast=0;collapsible=1;marginBottom=0;";
const ROW_STYLE: &str = "text;strokeColor=none;fillColor=none;align=left;verticalAlign=top;spacingLeft=4;spacingRight=4;overflow=hidden;rotatable=0;points=[[0,0.5],[1,0.5]];portConstraint=eastwest;";
const SCALAR_STYLE: &str = "ellipse;whiteSpace=wrap;html=1;aspect=fixed;fillColor=#f5f5f5;";
const DIRECTIVE_STYLE: &str = "shape=hexagon;perimeter=hexagonPerimeter2;whiteSpace=wrap;html=1;fixedSize=1;fillColor=#fff2cc;strokeColor=#d6b656;";
const EDGE_STYLE: &str = "edgeStyle=orthogonalEdgeStyle;rounded=1;orthogonalLoop=1;jettySize=auto;html=1;";

/// The draw.io cell id of `node`.
fn cell_id(node: &Node) -> String {
    match node.category() {
        NodeCategory::Class => format!("c_{}", node.id()),
        NodeCategory::Scalar | NodeCategory::Directive => node.id().to_string(),
    }
}

/// A vertex cell with its geometry.
struct Vertex<'a> {
    id: &'a str,
    value: &'a str,
    style: &'a str,
    parent: &'a str,
    bounds: Bounds,
}

fn write_vertex(out: &mut String, vertex: &Vertex<'_>) -> std::fmt::Result {
    writeln!(
        out,
        r#"                <mxCell id="{}" value="{}" style="{}" parent="{}" vertex="1">"#,
        EscapeXml(vertex.id),
        EscapeXml(vertex.value),
        vertex.style,
        EscapeXml(vertex.parent),
    )?;
    writeln!(
        out,
        r#"                    <mxGeometry x="{}" y="{}" width="{}" height="{}" as="geometry"/>"#,
        vertex.bounds.min_x(),
        vertex.bounds.min_y(),
        vertex.bounds.width(),
        vertex.bounds.height(),
    )?;
    writeln!(out, "                </mxCell>")
}

/// Writes one child row per entry of `rows`, starting `top` below the parent.
fn write_rows(
    out: &mut String,
    parent: &str,
    prefix: char,
    width: f64,
    top: f64,
    rows: impl Iterator<Item = String>,
) -> std::fmt::Result {
    for (i, row) in rows.enumerate() {
        let id = format!("{prefix}{i}_{parent}");
        write_vertex(
            out,
            &Vertex {
                id: &id,
                value: &row,
                style: ROW_STYLE,
                parent,
                bounds: Bounds::new_from_top_left(
                    Point::new(0.0, top + i as f64 * FIELD_HEIGHT),
                    Size::new(width, FIELD_HEIGHT),
                ),
            },
        )?;
    }
    Ok(())
}

fn write_node(out: &mut String, node: &Node, schema: &Schema, offset: Point) -> std::fmt::Result {
    let bounds = node.bounds().translate(offset);
    let width = bounds.width();
    let id = cell_id(node);

    match node.category() {
        NodeCategory::Class => {
            write_vertex(
                out,
                &Vertex {
                    id: &id,
                    value: node.name(),
                    style: CLASS_STYLE,
                    parent: "1",
                    bounds,
                },
            )?;
            let rows: Vec<String> = schema
                .class(node.name())
                .map(|class| class.fields.iter().map(ToString::to_string).collect())
                .unwrap_or_default();
            write_rows(out, &id, 'f', width, CLASS_HEADER_HEIGHT, rows.into_iter())
        }
        NodeCategory::Scalar => write_vertex(
            out,
            &Vertex {
                id: &id,
                value: node.name(),
                style: SCALAR_STYLE,
                parent: "1",
                bounds,
            },
        ),
        NodeCategory::Directive => {
            let directive = node
                .name()
                .strip_prefix('@')
                .and_then(|name| schema.directive(name));
            let value = match directive {
                Some(directive) => {
                    format!("{}\non {}", node.name(), directive.locations.join(", "))
                }
                None => node.name().to_string(),
            };
            write_vertex(
                out,
                &Vertex {
                    id: &id,
                    value: &value,
                    style: DIRECTIVE_STYLE,
                    parent: "1",
                    bounds,
                },
            )?;
            let rows: Vec<String> = directive
                .map(|directive| directive.arguments.iter().map(ToString::to_string).collect())
                .unwrap_or_default();
            write_rows(out, &id, 'a', width, DIRECTIVE_HEIGHT, rows.into_iter())
        }
    }
}

/// Renders a laid-out schema as a draw.io document.
///
/// Positions are translated so the diagram's bounding box starts at a
/// fixed margin from the page origin. Edges whose endpoints are not both
/// nodes of the layout are left out.
pub fn render(layout: &Layout, schema: &Schema) -> Result<String, Error> {
    let bounds = layout.bounds();
    let offset = Point::new(MARGIN - bounds.min_x(), MARGIN - bounds.min_y());

    let mut out = String::new();
    writeln!(out, "<mxfile>")?;
    writeln!(out, r#"    <diagram name="GraphQL Schema">"#)?;
    writeln!(out, "        <mxGraphModel>")?;
    writeln!(out, "            <root>")?;
    writeln!(out, r#"                <mxCell id="0"/>"#)?;
    writeln!(out, r#"                <mxCell id="1" parent="0"/>"#)?;

    for node in layout.nodes() {
        write_node(&mut out, node, schema, offset)?;
    }

    let mut skipped = 0usize;
    for (i, edge) in layout.edges().iter().enumerate() {
        let (Some(from), Some(to)) = (layout.node(edge.from()), layout.node(edge.to())) else {
            skipped += 1;
            continue;
        };
        let style = match edge.style() {
            EdgeStyle::Plain => EDGE_STYLE.to_string(),
            EdgeStyle::Dependency | EdgeStyle::Directive => format!("{EDGE_STYLE}dashed=1;"),
        };
        writeln!(
            out,
            r#"                <mxCell id="edge_{i}" value="{}" style="{style}" parent="1" source="{}" target="{}" edge="1">"#,
            EscapeXml(edge.label()),
            EscapeXml(&cell_id(from)),
            EscapeXml(&cell_id(to)),
        )?;
        writeln!(out, r#"                    <mxGeometry relative="1" as="geometry"/>"#)?;
        writeln!(out, "                </mxCell>")?;
    }
    if skipped > 0 {
        warn!(skipped; "Omitted edges with unknown endpoints from draw.io output");
    }

    writeln!(out, "            </root>")?;
    writeln!(out, "        </mxGraphModel>")?;
    writeln!(out, "    </diagram>")?;
    writeln!(out, "</mxfile>")?;

    debug!(bytes = out.len(); "Rendered draw.io document");
    Ok(out)
}
