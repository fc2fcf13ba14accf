//! Parser for SDL tokens.
//!
//! This module turns the token stream from the [`lexer`](super::lexer) into
//! the syntax tree defined in [`parser_types`](super::parser_types). The
//! public entry point is [`build_document`].
//!
//! Applied directives (`@deprecated(reason: "...")`) are accepted wherever
//! SDL allows them and then dropped.

use winnow::{
    Parser,
    combinator::{alt, delimited, eof, opt, peek, preceded, repeat, separated},
    error::{ContextError, ErrMode},
    stream::{Stream, TokenSlice},
    token::any,
};

use crate::{
    error::{Diagnostic, ErrorCode},
    parser_types::{
        Definition, DirectiveDefinition, Document, EnumDefinition, FieldDefinition,
        InputValueDefinition, ObjectDefinition, ObjectKind, ScalarDefinition, SchemaDefinition,
        TypeRef, UnionDefinition,
    },
    span::{Span, Spanned},
    tokens::{PositionedToken, Token},
};

/// Context type for parser errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Context {
    /// What the parser expected at the failure point
    Label(&'static str),
    /// Remaining token count (`eof_offset()`) where a committed construct began
    StartOffset(usize),
}

type Input<'src> = TokenSlice<'src, PositionedToken<'src>>;
type Error = ErrMode<ContextError<Context>>;
type IResult<O> = std::result::Result<O, Error>;

/// Runs `f`, turning any failure into a committed error that remembers
/// where the construct started.
fn cut_err<'src, O, F>(input: &mut Input<'src>, f: F) -> IResult<O>
where
    F: FnOnce(&mut Input<'src>) -> IResult<O>,
{
    let start_remaining = input.eof_offset();

    match f(input) {
        Ok(o) => Ok(o),
        Err(ErrMode::Backtrack(mut e)) | Err(ErrMode::Cut(mut e)) => {
            e.push(Context::StartOffset(start_remaining));
            Err(ErrMode::Cut(e))
        }
        Err(e) => Err(e),
    }
}

fn error_with_label(label: &'static str) -> ContextError<Context> {
    let mut e = ContextError::new();
    e.push(Context::Label(label));
    e
}

/// Parse one whitespace, newline, comment or comma token
fn trivia<'src>(input: &mut Input<'src>) -> IResult<()> {
    any.verify(|token: &PositionedToken<'_>| token.is_trivia())
        .void()
        .parse_next(input)
}

fn trivia0<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(0.., trivia).parse_next(input)
}

/// Parse a punctuator, returning its span
fn symbol<'src>(
    expected: Token<'static>,
    label: &'static str,
) -> impl Parser<Input<'src>, Span, Error> {
    preceded(
        trivia0,
        any.verify_map(move |token: &PositionedToken<'_>| {
            (token.token == expected).then_some(token.span)
        }),
    )
    .context(Context::Label(label))
}

/// Parse a name
fn name<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    preceded(
        trivia0,
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::Name(name) => Some(Spanned::new(*name, token.span)),
            _ => None,
        }),
    )
    .context(Context::Label("name"))
    .parse_next(input)
}

/// Parse a specific keyword, returning its span
fn keyword<'src>(expected: &'static str) -> impl Parser<Input<'src>, Span, Error> {
    preceded(
        trivia0,
        any.verify_map(move |token: &PositionedToken<'_>| match &token.token {
            Token::Name(name) if *name == expected => Some(token.span),
            _ => None,
        }),
    )
    .context(Context::Label(expected))
}

/// Parse an optional description string
fn description<'src>(input: &mut Input<'src>) -> IResult<Option<String>> {
    opt(preceded(
        trivia0,
        any.verify_map(|token: &PositionedToken<'_>| match &token.token {
            Token::StringValue(text) | Token::BlockString(text) => Some(text.clone()),
            _ => None,
        }),
    ))
    .parse_next(input)
}

/// Parse a type reference: `Name`, `[Type]`, `Type!`
fn type_ref<'src>(input: &mut Input<'src>) -> IResult<TypeRef<'src>> {
    let inner = if opt(symbol(Token::LeftBracket, "`[`")).parse_next(input)?.is_some() {
        cut_err(input, |input| {
            let inner = type_ref(input)?;
            symbol(Token::RightBracket, "`]`").parse_next(input)?;
            Ok(TypeRef::List(Box::new(inner)))
        })?
    } else {
        name.map(TypeRef::Named)
            .context(Context::Label("type"))
            .parse_next(input)?
    };

    let non_null = opt(symbol(Token::Bang, "`!`")).parse_next(input)?;
    Ok(if non_null.is_some() {
        TypeRef::NonNull(Box::new(inner))
    } else {
        inner
    })
}

/// Parse a constant or variable value, rendered back to SDL text
fn value<'src>(input: &mut Input<'src>) -> IResult<String> {
    alt((
        preceded(
            trivia0,
            any.verify_map(|token: &PositionedToken<'_>| match &token.token {
                Token::StringValue(text) | Token::BlockString(text) => Some(format!("\"{text}\"")),
                Token::Number(number) => Some(number.to_string()),
                Token::Name(name) => Some(name.to_string()),
                _ => None,
            }),
        ),
        preceded(symbol(Token::Dollar, "`$`"), name).map(|name| format!("${}", name.inner())),
        delimited(
            symbol(Token::LeftBracket, "`[`"),
            repeat(0.., value),
            symbol(Token::RightBracket, "`]`"),
        )
        .map(|items: Vec<String>| format!("[{}]", items.join(", "))),
        delimited(
            symbol(Token::LeftBrace, "`{`"),
            repeat(0.., (name, symbol(Token::Colon, "`:`"), value)),
            symbol(Token::RightBrace, "`}`"),
        )
        .map(|fields: Vec<(Spanned<&str>, Span, String)>| {
            let fields: Vec<String> = fields
                .iter()
                .map(|(key, _, value)| format!("{}: {value}", key.inner()))
                .collect();
            format!("{{{}}}", fields.join(", "))
        }),
    ))
    .context(Context::Label("value"))
    .parse_next(input)
}

/// Parse applied arguments: `(reason: "old")`
fn applied_arguments<'src>(input: &mut Input<'src>) -> IResult<()> {
    symbol(Token::LeftParen, "`(`").parse_next(input)?;
    cut_err(input, |input| {
        let () = repeat(0.., (name, symbol(Token::Colon, "`:`"), value)).parse_next(input)?;
        symbol(Token::RightParen, "`)`").parse_next(input)?;
        Ok(())
    })
}

/// Parse and drop zero or more applied directives
fn directives<'src>(input: &mut Input<'src>) -> IResult<()> {
    repeat(
        0..,
        (
            symbol(Token::At, "`@`"),
            name,
            opt(applied_arguments),
        ),
    )
    .parse_next(input)
}

/// Parse an argument or input field definition: `name: Type = default @dir`
fn input_value<'src>(input: &mut Input<'src>) -> IResult<InputValueDefinition<'src>> {
    let description = description(input)?;
    let name = name(input)?;
    cut_err(input, |input| {
        symbol(Token::Colon, "`:`").parse_next(input)?;
        let ty = type_ref(input)?;
        let default_value = opt(preceded(symbol(Token::Equals, "`=`"), value)).parse_next(input)?;
        directives(input)?;
        Ok(InputValueDefinition {
            description,
            name,
            ty,
            default_value,
        })
    })
}

/// Parse argument definitions: `(a: Int, b: String = "x")`
fn arguments_definition<'src>(input: &mut Input<'src>) -> IResult<Vec<InputValueDefinition<'src>>> {
    symbol(Token::LeftParen, "`(`").parse_next(input)?;
    cut_err(input, |input| {
        let arguments = repeat(1.., input_value).parse_next(input)?;
        symbol(Token::RightParen, "`)`").parse_next(input)?;
        Ok(arguments)
    })
}

/// Parse an output field definition: `name(args): Type @dir`
fn field_definition<'src>(input: &mut Input<'src>) -> IResult<FieldDefinition<'src>> {
    let description = description(input)?;
    let name = name(input)?;
    cut_err(input, |input| {
        let arguments = opt(arguments_definition)
            .parse_next(input)?
            .unwrap_or_default();
        symbol(Token::Colon, "`:`").parse_next(input)?;
        let ty = type_ref(input)?;
        directives(input)?;
        Ok(FieldDefinition {
            description,
            name,
            arguments,
            ty,
            default_value: None,
        })
    })
}

/// Parse an input object field, which may carry a default value
fn input_field_definition<'src>(input: &mut Input<'src>) -> IResult<FieldDefinition<'src>> {
    input_value
        .map(|value| FieldDefinition {
            description: value.description,
            name: value.name,
            arguments: Vec::new(),
            ty: value.ty,
            default_value: value.default_value,
        })
        .parse_next(input)
}

/// Parse an optional `{ ... }` block of items
fn braced_items<'src, O, P>(input: &mut Input<'src>, item: P) -> IResult<Vec<O>>
where
    P: Parser<Input<'src>, O, Error>,
{
    if opt(symbol(Token::LeftBrace, "`{`")).parse_next(input)?.is_none() {
        return Ok(Vec::new());
    }
    cut_err(input, |input| {
        let items = repeat(0.., item).parse_next(input)?;
        symbol(Token::RightBrace, "`}`").parse_next(input)?;
        Ok(items)
    })
}

/// Parse `implements A & B`
fn implements<'src>(input: &mut Input<'src>) -> IResult<Vec<Spanned<&'src str>>> {
    if opt(keyword("implements")).parse_next(input)?.is_none() {
        return Ok(Vec::new());
    }
    cut_err(input, |input| {
        opt(symbol(Token::Ampersand, "`&`")).parse_next(input)?;
        separated(1.., name, symbol(Token::Ampersand, "`&`")).parse_next(input)
    })
}

/// Parse `type`, `interface` and `input` definitions
fn object_definition<'src>(
    input: &mut Input<'src>,
    kind: ObjectKind,
    description: Option<String>,
) -> IResult<Definition<'src>> {
    let word = match kind {
        ObjectKind::Type => "type",
        ObjectKind::Interface => "interface",
        ObjectKind::Input => "input",
    };
    keyword(word).parse_next(input)?;

    cut_err(input, |input| {
        let name = name(input)?;
        let implements = if kind == ObjectKind::Input {
            Vec::new()
        } else {
            implements(input)?
        };
        directives(input)?;
        let fields = if kind == ObjectKind::Input {
            braced_items(input, input_field_definition)?
        } else {
            braced_items(input, field_definition)?
        };
        Ok(Definition::Object(ObjectDefinition {
            kind,
            description,
            name,
            implements,
            fields,
        }))
    })
}

fn enum_value<'src>(input: &mut Input<'src>) -> IResult<Spanned<&'src str>> {
    let _ = description(input)?;
    let value = name(input)?;
    directives(input)?;
    Ok(value)
}

fn enum_definition<'src>(
    input: &mut Input<'src>,
    description: Option<String>,
) -> IResult<Definition<'src>> {
    keyword("enum").parse_next(input)?;
    cut_err(input, |input| {
        let name = name(input)?;
        directives(input)?;
        let values = braced_items(input, enum_value)?;
        Ok(Definition::Enum(EnumDefinition {
            description,
            name,
            values,
        }))
    })
}

fn scalar_definition<'src>(
    input: &mut Input<'src>,
    description: Option<String>,
) -> IResult<Definition<'src>> {
    keyword("scalar").parse_next(input)?;
    cut_err(input, |input| {
        let name = name(input)?;
        directives(input)?;
        Ok(Definition::Scalar(ScalarDefinition { description, name }))
    })
}

/// Parse `union Name = A | B`
fn union_definition<'src>(
    input: &mut Input<'src>,
    description: Option<String>,
) -> IResult<Definition<'src>> {
    keyword("union").parse_next(input)?;
    cut_err(input, |input| {
        let union_name = name(input)?;
        directives(input)?;
        let members = if opt(symbol(Token::Equals, "`=`")).parse_next(input)?.is_some() {
            opt(symbol(Token::Pipe, "`|`")).parse_next(input)?;
            separated(1.., name, symbol(Token::Pipe, "`|`")).parse_next(input)?
        } else {
            Vec::new()
        };
        Ok(Definition::Union(UnionDefinition {
            description,
            name: union_name,
            members,
        }))
    })
}

/// Parse `directive @name(args) repeatable on A | B`
fn directive_definition<'src>(
    input: &mut Input<'src>,
    description: Option<String>,
) -> IResult<Definition<'src>> {
    keyword("directive").parse_next(input)?;
    cut_err(input, |input| {
        symbol(Token::At, "`@`").parse_next(input)?;
        let directive_name = name(input)?;
        let arguments = opt(arguments_definition)
            .parse_next(input)?
            .unwrap_or_default();
        let repeatable = opt(keyword("repeatable")).parse_next(input)?.is_some();
        keyword("on").parse_next(input)?;
        opt(symbol(Token::Pipe, "`|`")).parse_next(input)?;
        let locations = separated(1.., name, symbol(Token::Pipe, "`|`")).parse_next(input)?;
        Ok(Definition::Directive(DirectiveDefinition {
            description,
            name: directive_name,
            arguments,
            repeatable,
            locations,
        }))
    })
}

/// Parse `schema { query: Query }`
fn schema_definition<'src>(input: &mut Input<'src>) -> IResult<Definition<'src>> {
    let start = keyword("schema").parse_next(input)?;
    cut_err(input, |input| {
        directives(input)?;
        symbol(Token::LeftBrace, "`{`").parse_next(input)?;
        let operations = repeat(
            1..,
            (name, symbol(Token::Colon, "`:`"), name).map(|(operation, _, ty)| (operation, ty)),
        )
        .parse_next(input)?;
        let end = symbol(Token::RightBrace, "`}`").parse_next(input)?;
        Ok(Definition::Schema(SchemaDefinition {
            span: start.union(end),
            operations,
        }))
    })
}

/// Parse one type system definition, dispatching on its keyword
fn definition<'src>(input: &mut Input<'src>) -> IResult<Definition<'src>> {
    let description = description(input)?;
    let word = peek(name).parse_next(input)?;

    match *word.inner() {
        "type" => object_definition(input, ObjectKind::Type, description),
        "interface" => object_definition(input, ObjectKind::Interface, description),
        "input" => object_definition(input, ObjectKind::Input, description),
        "enum" => enum_definition(input, description),
        "scalar" => scalar_definition(input, description),
        "union" => union_definition(input, description),
        "directive" => directive_definition(input, description),
        "schema" => schema_definition(input),
        _ => Err(ErrMode::Backtrack(error_with_label("type system definition"))),
    }
}

fn document<'src>(input: &mut Input<'src>) -> IResult<Document<'src>> {
    let definitions = repeat(0.., definition).parse_next(input)?;
    (trivia0, eof)
        .void()
        .context(Context::Label("type system definition"))
        .parse_next(input)?;
    Ok(Document { definitions })
}

/// Convert a parser error into a diagnostic pointing at the offending token.
fn convert_error(
    error: Error,
    tokens: &[PositionedToken<'_>],
    current_remaining: usize,
) -> Diagnostic {
    let context = match error {
        ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        ErrMode::Incomplete(_) => ContextError::new(),
    };

    let expected = context.context().find_map(|ctx| match ctx {
        Context::Label(label) => Some(*label),
        Context::StartOffset(_) => None,
    });
    let start_remaining = context
        .context()
        .filter_map(|ctx| match ctx {
            Context::StartOffset(remaining) => Some(*remaining),
            Context::Label(_) => None,
        })
        .last();

    let position = tokens.len().saturating_sub(current_remaining);
    let offending = tokens[position.min(tokens.len())..]
        .iter()
        .find(|token| !token.is_trivia());
    let expected_text = expected.map(|label| format!("expected {label}"));

    let mut diagnostic = match offending {
        Some(token) => {
            let message = match &expected_text {
                Some(text) => format!("{text}, found `{}`", token.token),
                None => format!("unexpected token `{}`", token.token),
            };
            Diagnostic::error(message)
                .with_code(ErrorCode::E100)
                .with_label(token.span, "unexpected token")
        }
        None => {
            let end = tokens.last().map(|token| token.span.end()).unwrap_or(0);
            let message = match &expected_text {
                Some(text) => format!("{text}, found end of input"),
                None => "unexpected end of input".to_string(),
            };
            Diagnostic::error(message)
                .with_code(ErrorCode::E101)
                .with_label(Span::new(end..end), "input ends here")
                .with_help("the definition is incomplete")
        }
    };

    let start = start_remaining
        .map(|remaining| tokens.len().saturating_sub(remaining))
        .and_then(|index| tokens[index.min(tokens.len())..].iter().find(|t| !t.is_trivia()))
        .filter(|start| offending.is_none_or(|token| token.span != start.span));
    if let Some(start) = start {
        diagnostic = diagnostic.with_secondary_label(start.span, "in this definition");
    }

    diagnostic
}

/// Parse a token stream into a document.
///
/// # Errors
///
/// Returns a [`Diagnostic`] for the first syntax error.
pub fn build_document<'src>(
    tokens: &'src [PositionedToken<'src>],
) -> Result<Document<'src>, Diagnostic> {
    let mut token_slice = TokenSlice::new(tokens);

    document.parse_next(&mut token_slice).map_err(|e| {
        let current_remaining = token_slice.eof_offset();
        convert_error(e, tokens, current_remaining)
    })
}
