use schemaviz_core::schema::{ClassKind, EdgeStyle};
use schemaviz_parser::{error::ErrorCode, parse};

const BLOG_SCHEMA: &str = r#"
    """
    Entry point
    """
    type Query {
        posts(filter: PostFilter, first: Int = 20): [Post!]!
        node(id: ID!): Node
    }

    interface Node { id: ID! }

    type Post implements Node @key(fields: "id") {
        id: ID!
        title: String!
        author: Author
        publishedAt: DateTime
        status: Status
    }

    type Author implements Node { id: ID! posts: [Post] }

    input PostFilter { author: AuthorFilter status: Status = PUBLISHED }
    input AuthorFilter { name: String }

    enum Status { DRAFT PUBLISHED }

    scalar DateTime

    union SearchResult = Post | Author

    directive @key(fields: String!) repeatable on OBJECT | INTERFACE
    directive @since(date: DateTime) on FIELD_DEFINITION
"#;

#[test]
fn test_blog_schema_entities() {
    let schema = parse(BLOG_SCHEMA).expect("Failed to parse");

    let classes: Vec<_> = schema
        .classes
        .iter()
        .map(|class| (class.name.as_str(), class.kind))
        .collect();
    assert_eq!(
        classes,
        vec![
            ("Query", ClassKind::Object),
            ("Node", ClassKind::Interface),
            ("Post", ClassKind::Object),
            ("Author", ClassKind::Object),
            ("PostFilter", ClassKind::Input),
            ("AuthorFilter", ClassKind::Input),
            ("Status", ClassKind::Enum),
            ("SearchResult", ClassKind::Union),
        ]
    );

    assert_eq!(schema.scalars.len(), 1);
    assert_eq!(schema.scalars[0].name, "DateTime");

    let directives: Vec<_> = schema.directives.iter().map(|d| d.display_name()).collect();
    assert_eq!(directives, ["@key", "@since"]);
    assert_eq!(schema.entity_count(), 11);

    let post_filter = schema.class("PostFilter").expect("PostFilter");
    assert_eq!(post_filter.fields[1].to_string(), "status: Status");
}

#[test]
fn test_blog_schema_relations() {
    let schema = parse(BLOG_SCHEMA).expect("Failed to parse");

    let relations: Vec<_> = schema
        .relations
        .iter()
        .map(|r| format!("{} -{}-> {} ({:?})", r.from, r.label, r.to, r.style))
        .collect();

    assert_eq!(
        relations,
        vec![
            "Query -has-> Post (Plain)",
            "Query -uses-> PostFilter (Dependency)",
            "Query -has-> Node (Plain)",
            "Post -implements-> Node (Plain)",
            "Post -has-> Author (Plain)",
            "Post -has-> DateTime (Plain)",
            "Post -has-> Status (Plain)",
            "Author -implements-> Node (Plain)",
            "Author -has-> Post (Plain)",
            "PostFilter -uses-> AuthorFilter (Dependency)",
            "SearchResult -member-> Post (Plain)",
            "SearchResult -member-> Author (Plain)",
            "@since -uses-> DateTime (Directive)",
        ]
    );
    assert!(
        schema
            .relations
            .iter()
            .filter(|r| r.from.starts_with('@'))
            .all(|r| r.style == EdgeStyle::Directive)
    );
}

#[test]
fn test_empty_source_is_an_empty_schema() {
    let schema = parse("# nothing here\n").expect("Failed to parse");
    assert!(schema.is_empty());
    assert!(schema.relations.is_empty());
}

#[test]
fn test_lexical_errors_are_collected() {
    let err = parse("type A { a: String ~ }\n\"unterminated").expect_err("lexical errors");
    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E002, ErrorCode::E001]);
}

#[test]
fn test_syntax_error_has_span() {
    let source = "type A {\n  b: [String\n}";
    let err = parse(source).expect_err("syntax error");
    let diag = &err.diagnostics()[0];

    assert_eq!(diag.code(), Some(ErrorCode::E100));
    let span = diag.labels()[0].span();
    assert_eq!(&source[span.start()..span.end()], "}");
}

#[test]
fn test_semantic_errors_are_collected() {
    let err = parse(
        r#"
        type A { x: Int }
        enum A { X }
        directive @d(a: Int, a: Int) on FIELD
        "#,
    )
    .expect_err("semantic errors");

    let codes: Vec<_> = err.diagnostics().iter().filter_map(|d| d.code()).collect();
    assert_eq!(codes, [ErrorCode::E301, ErrorCode::E303]);
    assert!(err.to_string().starts_with("error[E301]"));
}
