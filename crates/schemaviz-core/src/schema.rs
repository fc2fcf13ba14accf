//! Schema descriptors: the typed output of a schema provider.
//!
//! A [`Schema`] is an ordered collection of entity descriptors (classes,
//! scalars, directives) and the relations between them. It carries exactly
//! the information the layout driver needs to size nodes, plus the per-row
//! details renderers display. Nothing here knows about positions.
//!
//! Relations refer to entities by *display name*: a class by its type name,
//! a scalar by its scalar name and a directive by `@name`.
//!
//! Every type implements [`serde::Serialize`] and [`serde::Deserialize`] so a
//! schema can be produced by tools other than the SDL parser.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Names of the scalars every GraphQL schema has implicitly.
pub const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Returns `true` if `name` is one of the [`BUILTIN_SCALARS`].
pub fn is_builtin_scalar(name: &str) -> bool {
    BUILTIN_SCALARS.contains(&name)
}

/// The flavour of a class-like entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    #[default]
    Object,
    Input,
    Interface,
    Enum,
    Union,
}

impl ClassKind {
    /// Stereotype text shown by renderers, if the kind has one.
    pub fn stereotype(self) -> Option<&'static str> {
        match self {
            ClassKind::Object => None,
            ClassKind::Input => Some("input"),
            ClassKind::Interface => Some("interface"),
            ClassKind::Enum => Some("enumeration"),
            ClassKind::Union => Some("union"),
        }
    }
}

/// Rendering hint attached to a relation.
///
/// The layout engine ignores it; renderers choose line styles from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// A solid association line.
    #[default]
    Plain,
    /// A dashed dependency line (input types, arguments).
    Dependency,
    /// A dashed line originating from a directive.
    Directive,
}

/// A field of an object, interface or input type, a value of an enum or a
/// member of a union.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    /// Rendered type reference, e.g. `[User!]!`. Empty for enum values.
    #[serde(default)]
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            required,
        }
    }
}

impl fmt::Display for FieldDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.type_name.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}: {}", self.name, self.type_name)
        }
    }
}

/// An argument of a directive definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentDef {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub default_value: Option<String>,
}

impl fmt::Display for ArgumentDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.type_name)?;
        if let Some(default) = &self.default_value {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// An object, interface, input, enum or union type.
///
/// Enum values and union members are listed as fields without a type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

/// A custom scalar type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A directive definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectiveDef {
    /// Directive name without the leading `@`.
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<ArgumentDef>,
    #[serde(default)]
    pub locations: Vec<String>,
}

impl DirectiveDef {
    /// The name relations use to refer to this directive (`@name`).
    pub fn display_name(&self) -> String {
        format!("@{}", self.name)
    }
}

/// A directed relation between two entities, by display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationDef {
    pub from: String,
    pub to: String,
    pub label: String,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl RelationDef {
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
}

/// The complete output of a schema provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub classes: Vec<ClassDef>,
    #[serde(default)]
    pub scalars: Vec<ScalarDef>,
    #[serde(default)]
    pub directives: Vec<DirectiveDef>,
    #[serde(default)]
    pub relations: Vec<RelationDef>,
}

impl Schema {
    /// Total number of entities (classes, scalars and directives).
    pub fn entity_count(&self) -> usize {
        self.classes.len() + self.scalars.len() + self.directives.len()
    }

    /// Returns `true` if the schema declares no entities at all.
    pub fn is_empty(&self) -> bool {
        self.entity_count() == 0
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|class| class.name == name)
    }

    pub fn directive(&self, name: &str) -> Option<&DirectiveDef> {
        self.directives.iter().find(|directive| directive.name == name)
    }
}
