//! Lexical analyzer for GraphQL SDL.
//!
//! The lexer converts source text into a stream of [`Token`]s. Whitespace,
//! newlines, commas and `#` comments are kept as tokens so spans stay exact;
//! the parser skips them.
//!
//! The public entry point is [`tokenize`], which recovers from errors and
//! collects every diagnostic in a single pass.

use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, cut_err, not, opt, peek, preceded, repeat, terminated},
    error::{AddContext, ContextError, ErrMode, ModalResult},
    stream::{LocatingSlice, Location, Stream},
    token::{any, literal, none_of, one_of, take_while},
};

use crate::{
    error::{Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    span::Span,
    tokens::{PositionedToken, Token},
};

/// Diagnostic details attached to winnow errors via `.context()`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LexerDiagnostic {
    pub code: ErrorCode,
    pub message: &'static str,
    pub help: Option<&'static str>,
    /// The error span covers from `start` to the error position.
    pub start: usize,
}

type Input<'a> = LocatingSlice<&'a str>;
type IResult<'a, O> = ModalResult<O, ContextError<LexerDiagnostic>>;

const BLOCK_QUOTE: &str = "\"\"\"";
const ESCAPED_BLOCK_QUOTE: &str = "\\\"\"\"";

fn is_name_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Parse a `\uXXXX` escape after the backslash.
fn string_escape_unicode<'a>(input: &mut Input<'a>, escape_start: usize) -> IResult<'a, char> {
    preceded(
        'u',
        cut_err(
            take_while(4, |c: char| c.is_ascii_hexdigit())
                .verify_map(|hex: &str| u32::from_str_radix(hex, 16).ok().and_then(char::from_u32))
                .context(LexerDiagnostic {
                    code: ErrorCode::E004,
                    message: "invalid unicode escape",
                    help: Some("use `\\uXXXX` with exactly four hex digits"),
                    start: escape_start,
                }),
        ),
    )
    .parse_next(input)
}

/// Parse a single-character escape after the backslash.
fn string_escape_char<'a>(input: &mut Input<'a>) -> IResult<'a, char> {
    one_of(['"', '\\', '/', 'b', 'f', 'n', 'r', 't'])
        .map(|c| match c {
            'b' => '\u{08}',
            'f' => '\u{0C}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            other => other,
        })
        .parse_next(input)
}

/// Parse an escape sequence starting with backslash.
fn string_escape<'a>(input: &mut Input<'a>) -> IResult<'a, char> {
    let escape_start = input.current_token_start();

    '\\'.parse_next(input)?;

    match string_escape_unicode(input, escape_start) {
        Ok(ch) => return Ok(ch),
        Err(ErrMode::Backtrack(_)) => {}
        Err(e) => return Err(e),
    }

    if let Ok(ch) = string_escape_char(input) {
        return Ok(ch);
    }

    Err(ErrMode::Cut(ContextError::new().add_context(
        input,
        &input.checkpoint(),
        LexerDiagnostic {
            code: ErrorCode::E003,
            message: "invalid escape sequence",
            help: Some("valid escapes: `\\\"`, `\\\\`, `\\/`, `\\b`, `\\f`, `\\n`, `\\r`, `\\t`, `\\uXXXX`"),
            start: escape_start,
        },
    )))
}

/// Parse a `"..."` string literal.
fn string_literal<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let string_char = none_of(['"', '\\', '\n', '\r']);
    let string_content =
        repeat(0.., alt((string_escape, string_char))).fold(String::new, |mut acc, ch| {
            acc.push(ch);
            acc
        });

    let start_pos = input.current_token_start();

    '"'.parse_next(input)?;

    cut_err(terminated(string_content, '"'))
        .context(LexerDiagnostic {
            code: ErrorCode::E001,
            message: "unterminated string literal",
            help: Some("add closing `\"` before the end of the line"),
            start: start_pos,
        })
        .parse_next(input)
        .map(Token::StringValue)
}

/// Parse a `"""..."""` block string. Only `\"""` is an escape inside it.
fn block_string<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    let start_pos = input.current_token_start();

    literal(BLOCK_QUOTE).parse_next(input)?;

    let content = repeat(
        0..,
        alt((
            literal(ESCAPED_BLOCK_QUOTE),
            preceded(not(literal(BLOCK_QUOTE)), any).take(),
        )),
    )
    .fold(String::new, |mut acc, chunk: &str| {
        if chunk == ESCAPED_BLOCK_QUOTE {
            acc.push_str(BLOCK_QUOTE);
        } else {
            acc.push_str(chunk);
        }
        acc
    });

    cut_err(terminated(content, literal(BLOCK_QUOTE)))
        .context(LexerDiagnostic {
            code: ErrorCode::E005,
            message: "unterminated block string",
            help: Some("add closing `\"\"\"`"),
            start: start_pos,
        })
        .parse_next(input)
        .map(|raw| Token::BlockString(block_string_value(&raw)))
}

/// Removes the common indentation and surrounding blank lines of a block
/// string.
fn block_string_value(raw: &str) -> String {
    fn indent(line: &str) -> usize {
        line.len() - line.trim_start_matches([' ', '\t']).len()
    }
    fn is_blank(line: &str) -> bool {
        line.trim_matches([' ', '\t']).is_empty()
    }

    let lines: Vec<&str> = raw.lines().collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter(|line| !is_blank(line))
        .map(|line| indent(line))
        .min()
        .unwrap_or(0);

    let mut lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                *line
            } else {
                line.get(common_indent..).unwrap_or("")
            }
        })
        .collect();

    while lines.first().is_some_and(|line| is_blank(line)) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|line| is_blank(line)) {
        lines.pop();
    }

    lines.join("\n")
}

/// Parse an integer or float literal.
fn number<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    terminated(
        (
            opt('-'),
            digit1,
            opt(('.', digit1)),
            opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
        )
            .take(),
        // `12abc` and `1.` are not numbers
        peek(not(one_of(|c: char| is_name_continue(c) || c == '.'))),
    )
    .map(Token::Number)
    .parse_next(input)
}

/// Parse `#` comment up to the end of the line
fn comment<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    preceded('#', take_while(0.., |c: char| c != '\n' && c != '\r'))
        .map(Token::Comment)
        .parse_next(input)
}

/// Parse names: `[_A-Za-z][_0-9A-Za-z]*`
fn name<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., is_name_continue)
        .verify(|s: &str| s.chars().next().is_some_and(|c| !c.is_ascii_digit()))
        .map(Token::Name)
        .parse_next(input)
}

fn punctuator<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    alt((
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        '['.value(Token::LeftBracket),
        ']'.value(Token::RightBracket),
        ':'.value(Token::Colon),
        '!'.value(Token::Bang),
        '='.value(Token::Equals),
        '@'.value(Token::At),
        '|'.value(Token::Pipe),
        '&'.value(Token::Ampersand),
        '$'.value(Token::Dollar),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse whitespace other than newlines (the BOM counts as whitespace)
fn whitespace<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    take_while(1.., |c: char| matches!(c, ' ' | '\t' | '\r' | '\u{FEFF}'))
        .value(Token::Whitespace)
        .parse_next(input)
}

fn newline<'a>(input: &mut Input<'a>) -> IResult<'a, Token<'a>> {
    '\n'.value(Token::Newline).parse_next(input)
}

/// Parse a single token with position tracking
fn positioned_token<'a>(input: &mut Input<'a>) -> IResult<'a, PositionedToken<'a>> {
    let start_pos = input.current_token_start();

    let token = alt((
        comment,
        block_string, // Must come before string_literal
        string_literal,
        number, // Must come before name
        name,
        punctuator,
        newline,
        whitespace,
    ))
    .parse_next(input)?;

    let end_pos = input.current_token_start();
    Ok(PositionedToken::new(token, Span::new(start_pos..end_pos)))
}

/// Lexer that accumulates tokens and diagnostics during tokenization.
struct Lexer<'a> {
    tokens: Vec<PositionedToken<'a>>,
    diagnostics: DiagnosticCollector,
}

impl<'a> Lexer<'a> {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            diagnostics: DiagnosticCollector::new(),
        }
    }

    /// Tokenize the input, collecting tokens and errors.
    fn tokenize(&mut self, mut input: Input<'a>) {
        while !input.is_empty() {
            match positioned_token(&mut input) {
                Ok(token) => self.tokens.push(token),
                Err(e) => {
                    let error_pos = input.current_token_start();
                    self.diagnostics.emit(Self::convert_err_mode(e, error_pos));

                    if !input.is_empty() {
                        input.next_token();
                    }
                }
            }
        }
    }

    fn finish(self) -> Result<Vec<PositionedToken<'a>>, ParseError> {
        self.diagnostics.finish().map(|_| self.tokens)
    }

    /// Convert an ErrMode and error position to a Diagnostic.
    ///
    /// Falls back to E002 (unexpected character) if no diagnostic context is
    /// attached.
    fn convert_err_mode(
        err: ErrMode<ContextError<LexerDiagnostic>>,
        error_pos: usize,
    ) -> Diagnostic {
        let context_error = match err {
            ErrMode::Backtrack(ctx) | ErrMode::Cut(ctx) => ctx,
            ErrMode::Incomplete(_) => ContextError::new(),
        };

        if let Some(LexerDiagnostic {
            code,
            message,
            help,
            start,
        }) = context_error.context().next()
        {
            let span = Span::new(*start..error_pos);

            let mut diag = Diagnostic::error(*message)
                .with_code(*code)
                .with_label(span, code.description());
            if let Some(h) = help {
                diag = diag.with_help(*h);
            }
            return diag;
        }

        let span = Span::new(error_pos..error_pos.saturating_add(1));
        Diagnostic::error("unexpected character")
            .with_code(ErrorCode::E002)
            .with_label(span, ErrorCode::E002.description())
    }
}

/// Split SDL source into tokens, collecting every lexical error.
///
/// # Errors
///
/// Returns a [`ParseError`] holding one diagnostic per lexical error.
pub fn tokenize(input: &str) -> Result<Vec<PositionedToken<'_>>, ParseError> {
    let mut lexer = Lexer::new();
    lexer.tokenize(LocatingSlice::new(input));
    lexer.finish()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn single_token(input: &str) -> Token<'_> {
        let mut located = LocatingSlice::new(input);
        let positioned = positioned_token(&mut located)
            .unwrap_or_else(|e| panic!("failed to lex {input:?}: {e:?}"));
        positioned.token
    }

    fn meaningful(input: &str) -> Vec<Token<'_>> {
        tokenize(input)
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .filter(|t| !t.is_trivia())
            .collect()
    }

    fn error_codes(input: &str) -> Vec<ErrorCode> {
        tokenize(input)
            .unwrap_err()
            .diagnostics()
            .iter()
            .filter_map(|d| d.code())
            .collect()
    }

    #[test]
    fn test_names() {
        assert_eq!(single_token("User"), Token::Name("User"));
        assert_eq!(single_token("_private"), Token::Name("_private"));
        assert_eq!(single_token("field2"), Token::Name("field2"));
        assert_eq!(single_token("type"), Token::Name("type"));
    }

    #[test]
    fn test_punctuators() {
        let tokens = meaningful("{ } ( ) [ ] : ! = @ | & $");
        assert_eq!(
            tokens,
            vec![
                Token::LeftBrace,
                Token::RightBrace,
                Token::LeftParen,
                Token::RightParen,
                Token::LeftBracket,
                Token::RightBracket,
                Token::Colon,
                Token::Bang,
                Token::Equals,
                Token::At,
                Token::Pipe,
                Token::Ampersand,
                Token::Dollar,
            ]
        );
    }

    #[test]
    fn test_commas_are_trivia() {
        let tokens = tokenize("a, b").unwrap();
        assert_eq!(tokens[1].token, Token::Comma);
        assert!(tokens[1].is_trivia());
        assert_eq!(meaningful("a, b"), vec![Token::Name("a"), Token::Name("b")]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(single_token("42"), Token::Number("42"));
        assert_eq!(single_token("-7"), Token::Number("-7"));
        assert_eq!(single_token("3.25"), Token::Number("3.25"));
        assert_eq!(single_token("1e10"), Token::Number("1e10"));
        assert_eq!(single_token("6.02E-23"), Token::Number("6.02E-23"));
    }

    #[test]
    fn test_number_followed_by_name_is_an_error() {
        let codes = error_codes("12abc");
        assert!(!codes.is_empty());
        assert!(codes.iter().all(|code| *code == ErrorCode::E002));
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(
            single_token(r#""hello world""#),
            Token::StringValue("hello world".to_string())
        );
        assert_eq!(single_token(r#""""#), Token::StringValue(String::new()));
        assert_eq!(
            single_token(r#""a\"b\\c\ndA""#),
            Token::StringValue("a\"b\\c\ndA".to_string())
        );
    }

    #[test]
    fn test_block_strings() {
        let source = "\"\"\"\n    The user.\n\n      Indented line.\n    \"\"\"";
        assert_eq!(
            single_token(source),
            Token::BlockString("The user.\n\n  Indented line.".to_string())
        );

        assert_eq!(
            single_token(r#""""say \""" twice""""#),
            Token::BlockString("say \"\"\" twice".to_string())
        );
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("# a comment\ntype").unwrap();
        assert_eq!(tokens[0].token, Token::Comment(" a comment"));
        assert_eq!(tokens[1].token, Token::Newline);
        assert_eq!(tokens[2].token, Token::Name("type"));
    }

    #[test]
    fn test_span_tracking() {
        let tokens = tokenize("type User").unwrap();
        assert_eq!(tokens[0].span, Span::new(0..4));
        assert_eq!(tokens[2].span, Span::new(5..9));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("type A { name: \"oops\n }").unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.code(), Some(ErrorCode::E001));
        assert_eq!(diag.labels()[0].span().start(), 15);
        assert!(diag.help().is_some());
    }

    #[test]
    fn test_unterminated_block_string() {
        assert_eq!(error_codes("\"\"\"never closed"), vec![ErrorCode::E005]);
    }

    #[test]
    fn test_invalid_escapes() {
        assert_eq!(error_codes(r#""bad \q""#)[0], ErrorCode::E003);
        assert_eq!(error_codes(r#""bad \u00G1""#)[0], ErrorCode::E004);
    }

    #[test]
    fn test_multiple_errors_are_collected() {
        let err = tokenize("type ? User ~ {}").unwrap_err();
        assert_eq!(err.diagnostics().len(), 2);
        assert!(
            err.diagnostics()
                .iter()
                .all(|d| d.code() == Some(ErrorCode::E002))
        );
    }

    proptest! {
        #[test]
        fn prop_names_round_trip(name in "[_A-Za-z][_0-9A-Za-z]{0,20}") {
            let tokens = tokenize(&name).unwrap();
            prop_assert_eq!(tokens.len(), 1);
            prop_assert_eq!(&tokens[0].token, &Token::Name(name.as_str()));
        }

        #[test]
        fn prop_spans_cover_input(source in "[a-z{}():!=@ \n,#0-9]{0,60}") {
            if let Ok(tokens) = tokenize(&source) {
                let mut expected_start = 0;
                for token in &tokens {
                    prop_assert_eq!(token.span.start(), expected_start);
                    expected_start = token.span.end();
                }
                prop_assert_eq!(expected_start, source.len());
            }
        }
    }
}
