//! Elaboration: turning the syntax tree into schema descriptors.
//!
//! The [`Builder`] runs two passes over a [`Document`]. The first registers
//! every declared type and directive name so the second can classify the
//! type each field, argument and member refers to, and derive relations
//! from it.

use indexmap::{IndexMap, map::Entry};
use log::{debug, info, trace, warn};

use schemaviz_core::schema::{
    ArgumentDef, ClassDef, ClassKind, DirectiveDef, EdgeStyle, FieldDef, RelationDef, ScalarDef,
    Schema, is_builtin_scalar,
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    parser_types::{
        Definition, DirectiveDefinition, Document, EnumDefinition, FieldDefinition,
        InputValueDefinition, ObjectDefinition, ObjectKind, ScalarDefinition, TypeRef,
        UnionDefinition,
    },
    span::{Span, Spanned},
};

/// Locations a directive definition may name after `on`.
const DIRECTIVE_LOCATIONS: [&str; 19] = [
    "QUERY",
    "MUTATION",
    "SUBSCRIPTION",
    "FIELD",
    "FRAGMENT_DEFINITION",
    "FRAGMENT_SPREAD",
    "INLINE_FRAGMENT",
    "VARIABLE_DEFINITION",
    "SCHEMA",
    "SCALAR",
    "OBJECT",
    "FIELD_DEFINITION",
    "ARGUMENT_DEFINITION",
    "INTERFACE",
    "UNION",
    "ENUM",
    "ENUM_VALUE",
    "INPUT_OBJECT",
    "INPUT_FIELD_DEFINITION",
];

/// What a declared type name turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeclaredKind {
    Class(ClassKind),
    Scalar,
}

impl From<ObjectKind> for ClassKind {
    fn from(kind: ObjectKind) -> Self {
        match kind {
            ObjectKind::Type => ClassKind::Object,
            ObjectKind::Interface => ClassKind::Interface,
            ObjectKind::Input => ClassKind::Input,
        }
    }
}

#[derive(Default)]
pub struct Builder<'a> {
    diagnostics: DiagnosticCollector,
    /// Declared type names in declaration order, with the span of the first declaration.
    types: IndexMap<&'a str, (DeclaredKind, Span)>,
    directives: IndexMap<&'a str, Span>,
    schema: Schema,
}

impl<'a> Builder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elaborate `document` into a [`Schema`].
    ///
    /// Duplicate definitions, duplicate fields or arguments and unknown
    /// directive locations are all reported together. Warnings are logged
    /// and do not fail the build.
    pub fn build(mut self, document: &Document<'a>) -> Result<Schema, ParseError> {
        debug!(definitions = document.definitions.len(); "Elaborating schema document");

        let accepted: Vec<&Definition<'a>> = document
            .definitions
            .iter()
            .filter(|definition| self.register(definition))
            .collect();

        for definition in accepted {
            match definition {
                Definition::Object(object) => self.build_object(object),
                Definition::Enum(enumeration) => self.build_enum(enumeration),
                Definition::Scalar(scalar) => self.build_scalar(scalar),
                Definition::Union(union) => self.build_union(union),
                Definition::Directive(directive) => self.build_directive(directive),
                Definition::Schema(schema) => {
                    debug!(operations = schema.operations.len(); "Ignoring schema definition");
                }
            }
        }

        let warnings = self.diagnostics.finish()?;
        for warning in &warnings {
            warn!("{warning}");
        }

        info!(
            classes = self.schema.classes.len(),
            scalars = self.schema.scalars.len(),
            directives = self.schema.directives.len(),
            relations = self.schema.relations.len();
            "Schema elaborated"
        );
        Ok(self.schema)
    }

    /// Record the definition's name; returns `false` for a duplicate.
    fn register(&mut self, definition: &Definition<'a>) -> bool {
        let (name, kind) = match definition {
            Definition::Object(object) => (object.name, DeclaredKind::Class(object.kind.into())),
            Definition::Enum(e) => (e.name, DeclaredKind::Class(ClassKind::Enum)),
            Definition::Union(u) => (u.name, DeclaredKind::Class(ClassKind::Union)),
            Definition::Scalar(s) => (s.name, DeclaredKind::Scalar),
            Definition::Directive(directive) => return self.register_directive(directive.name),
            Definition::Schema(_) => return true,
        };

        match self.types.entry(*name.inner()) {
            Entry::Vacant(entry) => {
                entry.insert((kind, name.span()));
                true
            }
            Entry::Occupied(entry) => {
                let first = entry.get().1;
                self.diagnostics.emit(
                    Diagnostic::error(format!("type `{}` is defined more than once", name.inner()))
                        .with_code(ErrorCode::E301)
                        .with_label(name.span(), "duplicate definition")
                        .with_secondary_label(first, "first defined here")
                        .with_help("rename or remove one of the definitions"),
                );
                false
            }
        }
    }

    fn register_directive(&mut self, name: Spanned<&'a str>) -> bool {
        match self.directives.entry(*name.inner()) {
            Entry::Vacant(entry) => {
                entry.insert(name.span());
                true
            }
            Entry::Occupied(entry) => {
                let first = *entry.get();
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "directive `@{}` is defined more than once",
                        name.inner()
                    ))
                    .with_code(ErrorCode::E302)
                    .with_label(name.span(), "duplicate definition")
                    .with_secondary_label(first, "first defined here"),
                );
                false
            }
        }
    }

    /// Classify the base type of `ty`. `None` for builtin scalars and
    /// undeclared names; the latter also produce a warning.
    fn resolve(&mut self, ty: &TypeRef<'a>) -> Option<DeclaredKind> {
        let base = ty.base();
        if is_builtin_scalar(base.inner()) {
            return None;
        }
        let kind = self.types.get(base.inner()).map(|(kind, _)| *kind);
        if kind.is_none() {
            self.diagnostics.emit(
                Diagnostic::warning(format!("type `{}` is not defined", base.inner()))
                    .with_label(base.span(), "undefined type"),
            );
        }
        kind
    }

    fn check_unique<'n>(
        &mut self,
        owner: &str,
        what: &str,
        names: impl IntoIterator<Item = &'n Spanned<&'a str>>,
    ) where
        'a: 'n,
    {
        let mut seen: IndexMap<&str, Span> = IndexMap::new();
        for name in names {
            if let Some(first) = seen.get(name.inner()) {
                self.diagnostics.emit(
                    Diagnostic::error(format!(
                        "{what} `{}` is declared more than once in `{owner}`",
                        name.inner()
                    ))
                    .with_code(ErrorCode::E303)
                    .with_label(name.span(), "duplicate")
                    .with_secondary_label(*first, "first declared here"),
                );
            } else {
                seen.insert(*name.inner(), name.span());
            }
        }
    }

    fn relate(&mut self, from: impl Into<String>, to: &str, label: &str, style: EdgeStyle) {
        let relation = RelationDef::new(from, to, label, style);
        trace!(from = relation.from.as_str(), to = relation.to.as_str(), label; "Relation");
        self.schema.relations.push(relation);
    }

    fn build_object(&mut self, object: &ObjectDefinition<'a>) {
        let class_name = *object.name.inner();
        let kind = ClassKind::from(object.kind);
        debug!(name = class_name, kind:?; "Building class");

        self.check_unique(class_name, "field", object.fields.iter().map(|field| &field.name));

        let fields = object.fields.iter().map(field_def).collect();
        self.schema.classes.push(ClassDef {
            name: class_name.to_string(),
            kind,
            fields,
        });

        for interface in &object.implements {
            self.relate(class_name, interface.inner(), "implements", EdgeStyle::Plain);
        }

        for field in &object.fields {
            self.check_unique(
                class_name,
                "argument",
                field.arguments.iter().map(|argument| &argument.name),
            );
            if kind == ClassKind::Input {
                self.build_input_field_relation(class_name, field);
            } else {
                self.build_output_field_relations(class_name, field);
            }
        }
    }

    fn build_output_field_relations(&mut self, class_name: &str, field: &FieldDefinition<'a>) {
        let target = field.ty.base_name();
        match self.resolve(&field.ty) {
            Some(DeclaredKind::Class(ClassKind::Input)) => {
                self.relate(class_name, target, "uses", EdgeStyle::Dependency);
            }
            Some(_) => self.relate(class_name, target, "has", EdgeStyle::Plain),
            // Undeclared types still get an edge; it stays dangling in the graph.
            None if !is_builtin_scalar(target) => {
                self.relate(class_name, target, "has", EdgeStyle::Plain);
            }
            None => {}
        }

        for argument in &field.arguments {
            if self.resolve(&argument.ty) == Some(DeclaredKind::Class(ClassKind::Input)) {
                self.relate(
                    class_name,
                    argument.ty.base_name(),
                    "uses",
                    EdgeStyle::Dependency,
                );
            }
        }
    }

    fn build_input_field_relation(&mut self, class_name: &str, field: &FieldDefinition<'a>) {
        if matches!(
            self.resolve(&field.ty),
            Some(DeclaredKind::Class(ClassKind::Object | ClassKind::Input))
        ) {
            self.relate(class_name, field.ty.base_name(), "uses", EdgeStyle::Dependency);
        }
    }

    fn build_enum(&mut self, enumeration: &EnumDefinition<'a>) {
        let name = *enumeration.name.inner();
        self.check_unique(name, "enum value", &enumeration.values);
        self.schema.classes.push(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Enum,
            fields: enumeration
                .values
                .iter()
                .map(|value| FieldDef::new(*value.inner(), "", false))
                .collect(),
        });
    }

    fn build_union(&mut self, union: &UnionDefinition<'a>) {
        let name = *union.name.inner();
        self.check_unique(name, "member", &union.members);
        self.schema.classes.push(ClassDef {
            name: name.to_string(),
            kind: ClassKind::Union,
            fields: union
                .members
                .iter()
                .map(|member| FieldDef::new(*member.inner(), "", false))
                .collect(),
        });

        for member in &union.members {
            self.relate(name, member.inner(), "member", EdgeStyle::Plain);
        }
    }

    fn build_scalar(&mut self, scalar: &ScalarDefinition<'a>) {
        if is_builtin_scalar(scalar.name.inner()) {
            self.diagnostics.emit(
                Diagnostic::warning(format!(
                    "`{}` is a builtin scalar and is not drawn",
                    scalar.name.inner()
                ))
                .with_label(scalar.name.span(), "builtin scalar"),
            );
            return;
        }
        self.schema.scalars.push(ScalarDef {
            name: scalar.name.inner().to_string(),
            description: scalar.description.clone(),
        });
    }

    fn build_directive(&mut self, directive: &DirectiveDefinition<'a>) {
        let name = *directive.name.inner();
        let display_name = format!("@{name}");
        debug!(name; "Building directive");

        self.check_unique(
            &display_name,
            "argument",
            directive.arguments.iter().map(|argument| &argument.name),
        );

        for location in &directive.locations {
            if !DIRECTIVE_LOCATIONS.contains(location.inner()) {
                self.diagnostics.emit(
                    Diagnostic::error(format!("unknown directive location `{}`", location.inner()))
                        .with_code(ErrorCode::E300)
                        .with_label(location.span(), "not a directive location")
                        .with_help(format!(
                            "valid locations are {}",
                            DIRECTIVE_LOCATIONS.join(", ")
                        )),
                );
            }
        }

        for argument in &directive.arguments {
            if matches!(
                self.resolve(&argument.ty),
                Some(
                    DeclaredKind::Class(ClassKind::Object | ClassKind::Input) | DeclaredKind::Scalar
                )
            ) {
                self.relate(
                    display_name.as_str(),
                    argument.ty.base_name(),
                    "uses",
                    EdgeStyle::Directive,
                );
            }
        }

        self.schema.directives.push(DirectiveDef {
            name: name.to_string(),
            description: directive.description.clone(),
            arguments: directive.arguments.iter().map(argument_def).collect(),
            locations: directive
                .locations
                .iter()
                .map(|location| location.inner().to_string())
                .collect(),
        });
    }
}

fn field_def(field: &FieldDefinition<'_>) -> FieldDef {
    FieldDef::new(
        *field.name.inner(),
        field.ty.to_string(),
        field.ty.is_non_null(),
    )
}

fn argument_def(argument: &InputValueDefinition<'_>) -> ArgumentDef {
    ArgumentDef {
        name: argument.name.inner().to_string(),
        type_name: argument.ty.to_string(),
        required: argument.ty.is_non_null(),
        default_value: argument.default_value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::tokenize, parser::build_document};

    fn elaborate(source: &str) -> Result<Schema, ParseError> {
        let tokens = tokenize(source).expect("valid tokens");
        let document = build_document(&tokens).expect("valid document");
        Builder::new().build(&document)
    }

    fn relations(schema: &Schema) -> Vec<(String, String, String, EdgeStyle)> {
        schema
            .relations
            .iter()
            .map(|r| (r.from.clone(), r.to.clone(), r.label.clone(), r.style))
            .collect()
    }

    fn rel(
        from: &str,
        to: &str,
        label: &str,
        style: EdgeStyle,
    ) -> (String, String, String, EdgeStyle) {
        (from.to_string(), to.to_string(), label.to_string(), style)
    }

    #[test]
    fn test_object_field_relations() {
        let schema = elaborate(
            r#"
            type Query {
                user(filter: UserFilter, id: ID!): User
                count: Int
                created: DateTime
                search: SearchResult
            }
            type User { name: String }
            input UserFilter { name: String }
            scalar DateTime
            union SearchResult = User
            "#,
        )
        .expect("valid schema");

        assert_eq!(
            relations(&schema),
            vec![
                rel("Query", "User", "has", EdgeStyle::Plain),
                rel("Query", "UserFilter", "uses", EdgeStyle::Dependency),
                rel("Query", "DateTime", "has", EdgeStyle::Plain),
                rel("Query", "SearchResult", "has", EdgeStyle::Plain),
                rel("SearchResult", "User", "member", EdgeStyle::Plain),
            ]
        );
    }

    #[test]
    fn test_field_of_input_type_is_a_dependency() {
        let schema =
            elaborate("type Mutation { draft: PostInput } input PostInput { title: String! }")
                .expect("valid schema");
        assert_eq!(
            relations(&schema),
            vec![rel("Mutation", "PostInput", "uses", EdgeStyle::Dependency)]
        );
    }

    #[test]
    fn test_input_field_relations() {
        let schema = elaborate(
            r#"
            input PostFilter { author: AuthorFilter, status: Status, tag: String, owner: User }
            input AuthorFilter { name: String }
            enum Status { DRAFT PUBLISHED }
            type User { id: ID }
            "#,
        )
        .expect("valid schema");

        assert_eq!(
            relations(&schema),
            vec![
                rel("PostFilter", "AuthorFilter", "uses", EdgeStyle::Dependency),
                rel("PostFilter", "User", "uses", EdgeStyle::Dependency),
            ]
        );
        assert_eq!(schema.classes[0].kind, ClassKind::Input);
        assert_eq!(schema.classes[0].fields.len(), 4);
    }

    #[test]
    fn test_implements_and_union_members() {
        let schema = elaborate(
            "interface Node { id: ID! } type User implements Node { id: ID! } union Any = User | Node",
        )
        .expect("valid schema");

        assert_eq!(
            relations(&schema),
            vec![
                rel("User", "Node", "implements", EdgeStyle::Plain),
                rel("Any", "User", "member", EdgeStyle::Plain),
                rel("Any", "Node", "member", EdgeStyle::Plain),
            ]
        );
        let any = schema.class("Any").expect("union class");
        assert_eq!(any.kind, ClassKind::Union);
        assert_eq!(any.fields[1].to_string(), "Node");
    }

    #[test]
    fn test_directive_relations_and_arguments() {
        let schema = elaborate(
            r#"
            "Caches a field"
            directive @cache(ttl: Duration = 60, scope: CacheScope, name: String = "x") on FIELD_DEFINITION
            scalar Duration
            input CacheScope { key: String }
            "#,
        )
        .expect("valid schema");

        assert_eq!(
            relations(&schema),
            vec![
                rel("@cache", "Duration", "uses", EdgeStyle::Directive),
                rel("@cache", "CacheScope", "uses", EdgeStyle::Directive),
            ]
        );
        let cache = schema.directive("cache").expect("directive");
        assert_eq!(cache.description.as_deref(), Some("Caches a field"));
        assert_eq!(cache.arguments[0].to_string(), "ttl: Duration = 60");
        assert_eq!(cache.arguments[2].default_value.as_deref(), Some("\"x\""));
        assert_eq!(cache.locations, ["FIELD_DEFINITION"]);
    }

    #[test]
    fn test_builtin_scalars_never_relate() {
        let schema = elaborate("type A { a: String, b: [Int!]!, c: Float, d: Boolean, e: ID }")
            .expect("valid schema");
        assert!(schema.relations.is_empty());
        assert_eq!(schema.classes[0].fields[1].type_name, "[Int!]!");
        assert!(schema.classes[0].fields[1].required);
    }

    #[test]
    fn test_undeclared_type_keeps_dangling_relation() {
        let schema = elaborate("type A { b: Missing }").expect("warnings do not fail");
        assert_eq!(relations(&schema), vec![rel("A", "Missing", "has", EdgeStyle::Plain)]);
    }

    #[test]
    fn test_enum_values_become_rows() {
        let schema = elaborate("enum Role { ADMIN USER }").expect("valid schema");
        let role = &schema.classes[0];
        assert_eq!(role.kind, ClassKind::Enum);
        let values: Vec<_> = role.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(values, ["ADMIN", "USER"]);
    }

    #[test]
    fn test_duplicate_type_reports_e301() {
        let err = elaborate("type User { id: ID } scalar User").expect_err("duplicate");
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E301));
        assert_eq!(diag.labels().len(), 2);
        assert_eq!(diag.labels()[0].span(), Span::new(28..32));
    }

    #[test]
    fn test_all_errors_are_collected() {
        let err = elaborate(
            r#"
            directive @a on FIELD
            directive @a on BOGUS
            type T { x: Int x: Int }
            "#,
        )
        .expect_err("several errors");

        let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
        assert!(codes.contains(&ErrorCode::E302));
        assert!(codes.contains(&ErrorCode::E303));
        // The duplicate directive is skipped before its locations are checked.
        assert!(!codes.contains(&ErrorCode::E300));
    }

    #[test]
    fn test_unknown_directive_location() {
        let err = elaborate("directive @a on FIELD | NOWHERE").expect_err("bad location");
        assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E300));
    }

    #[test]
    fn test_schema_definition_is_ignored() {
        let schema = elaborate("schema { query: Query } type Query { ok: Boolean }")
            .expect("valid schema");
        assert_eq!(schema.entity_count(), 1);
    }
}
