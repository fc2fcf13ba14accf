//! Syntax tree produced by the [`parser`](super::parser).
//!
//! Names borrow from the source text; every name keeps its span so later
//! phases can point diagnostics at it.

use std::fmt;

use crate::span::{Span, Spanned};

/// A parsed SDL document.
#[derive(Debug, Clone, Default)]
pub struct Document<'src> {
    pub definitions: Vec<Definition<'src>>,
}

#[derive(Debug, Clone)]
pub enum Definition<'src> {
    /// `type`, `interface` or `input`.
    Object(ObjectDefinition<'src>),
    Enum(EnumDefinition<'src>),
    Scalar(ScalarDefinition<'src>),
    Union(UnionDefinition<'src>),
    Directive(DirectiveDefinition<'src>),
    Schema(SchemaDefinition<'src>),
}

/// Which keyword introduced an [`ObjectDefinition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Type,
    Interface,
    Input,
}

#[derive(Debug, Clone)]
pub struct ObjectDefinition<'src> {
    pub kind: ObjectKind,
    pub description: Option<String>,
    pub name: Spanned<&'src str>,
    pub implements: Vec<Spanned<&'src str>>,
    pub fields: Vec<FieldDefinition<'src>>,
}

#[derive(Debug, Clone)]
pub struct FieldDefinition<'src> {
    pub description: Option<String>,
    pub name: Spanned<&'src str>,
    /// Field arguments; always empty for input fields.
    pub arguments: Vec<InputValueDefinition<'src>>,
    pub ty: TypeRef<'src>,
    /// Default value of an input field, rendered back to SDL.
    pub default_value: Option<String>,
}

/// An argument definition: `name: Type = default`.
#[derive(Debug, Clone)]
pub struct InputValueDefinition<'src> {
    pub description: Option<String>,
    pub name: Spanned<&'src str>,
    pub ty: TypeRef<'src>,
    /// Default value rendered back to SDL (`10`, `"x"`, `[A, B]`).
    pub default_value: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EnumDefinition<'src> {
    pub description: Option<String>,
    pub name: Spanned<&'src str>,
    pub values: Vec<Spanned<&'src str>>,
}

#[derive(Debug, Clone)]
pub struct ScalarDefinition<'src> {
    pub description: Option<String>,
    pub name: Spanned<&'src str>,
}

#[derive(Debug, Clone)]
pub struct UnionDefinition<'src> {
    pub description: Option<String>,
    pub name: Spanned<&'src str>,
    pub members: Vec<Spanned<&'src str>>,
}

#[derive(Debug, Clone)]
pub struct DirectiveDefinition<'src> {
    pub description: Option<String>,
    /// Name without the leading `@`.
    pub name: Spanned<&'src str>,
    pub arguments: Vec<InputValueDefinition<'src>>,
    pub repeatable: bool,
    pub locations: Vec<Spanned<&'src str>>,
}

/// `schema { query: Query ... }`; accepted and otherwise ignored.
#[derive(Debug, Clone)]
pub struct SchemaDefinition<'src> {
    pub span: Span,
    pub operations: Vec<(Spanned<&'src str>, Spanned<&'src str>)>,
}

/// A type reference: `Named`, `[T]` or `T!`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef<'src> {
    Named(Spanned<&'src str>),
    List(Box<TypeRef<'src>>),
    NonNull(Box<TypeRef<'src>>),
}

impl<'src> TypeRef<'src> {
    /// The named type at the core of the reference (`User` in `[User!]!`).
    pub fn base(&self) -> Spanned<&'src str> {
        match self {
            TypeRef::Named(name) => *name,
            TypeRef::List(inner) | TypeRef::NonNull(inner) => inner.base(),
        }
    }

    pub fn base_name(&self) -> &'src str {
        *self.base().inner()
    }

    /// Whether the outermost wrapper is `!`.
    pub fn is_non_null(&self) -> bool {
        matches!(self, TypeRef::NonNull(_))
    }
}

impl fmt::Display for TypeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named(name) => write!(f, "{}", name.inner()),
            TypeRef::List(inner) => write!(f, "[{inner}]"),
            TypeRef::NonNull(inner) => write!(f, "{inner}!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> TypeRef<'_> {
        TypeRef::Named(Spanned::new(name, Span::default()))
    }

    #[test]
    fn test_type_ref_display_and_base() {
        let ty = TypeRef::NonNull(Box::new(TypeRef::List(Box::new(TypeRef::NonNull(
            Box::new(named("User")),
        )))));

        assert_eq!(ty.to_string(), "[User!]!");
        assert_eq!(ty.base_name(), "User");
        assert!(ty.is_non_null());
        assert!(!named("User").is_non_null());
    }
}
