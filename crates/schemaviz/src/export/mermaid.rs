//! Mermaid `classDiagram` export.

use std::fmt::Write as _;

use log::debug;

use schemaviz_core::schema::{EdgeStyle, FieldDef, Schema};

use super::Error;
use crate::layout::driver::directive_id;

/// Class identifier Mermaid uses for an entity referred to by `name`.
///
/// Directive display names (`@auth`) are not valid Mermaid identifiers, so
/// directives are declared under their node identity with a label.
fn class_ref(schema: &Schema, name: &str) -> String {
    name.strip_prefix('@')
        .filter(|directive| schema.directive(directive).is_some())
        .map(directive_id)
        .unwrap_or_else(|| name.to_string())
}

fn arrow(label: &str, style: EdgeStyle) -> &'static str {
    match (label, style) {
        ("implements", _) => "..|>",
        (_, EdgeStyle::Plain) => "-->",
        (_, EdgeStyle::Dependency | EdgeStyle::Directive) => "..>",
    }
}

fn write_member(out: &mut String, field: &FieldDef) -> std::fmt::Result {
    if field.type_name.is_empty() {
        writeln!(out, "    {}", field.name)
    } else {
        writeln!(out, "    +{} {}", field.name, field.type_name)
    }
}

/// Renders `schema` as Mermaid `classDiagram` text.
///
/// Directives come first, then scalars, classes and relations, each in
/// schema order.
pub fn render(schema: &Schema) -> Result<String, Error> {
    let mut out = String::from("classDiagram\n");

    for directive in &schema.directives {
        writeln!(
            out,
            "class {}[\"{}\"] {{",
            directive_id(&directive.name),
            directive.display_name()
        )?;
        writeln!(out, "    <<directive>>")?;
        for argument in &directive.arguments {
            writeln!(out, "    +{argument}")?;
        }
        writeln!(out, "    +on {}", directive.locations.join(", "))?;
        writeln!(out, "}}")?;
    }

    for scalar in &schema.scalars {
        writeln!(out, "class {} {{\n    <<scalar>>\n}}", scalar.name)?;
    }

    for class in &schema.classes {
        writeln!(out, "class {} {{", class.name)?;
        if let Some(stereotype) = class.kind.stereotype() {
            writeln!(out, "    <<{stereotype}>>")?;
        }
        for field in &class.fields {
            write_member(&mut out, field)?;
        }
        writeln!(out, "}}")?;
    }

    for relation in &schema.relations {
        writeln!(
            out,
            "{} {} {} : {}",
            class_ref(schema, &relation.from),
            arrow(&relation.label, relation.style),
            class_ref(schema, &relation.to),
            relation.label
        )?;
    }

    debug!(bytes = out.len(); "Rendered mermaid diagram");
    Ok(out)
}
