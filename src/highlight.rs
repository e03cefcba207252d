use std::sync::OnceLock;

use regex::Regex;

use crate::block::{CodeBlock, Token, TokenKind};

const KEYWORDS: &[&str] = &[
    "using", "namespace", "class", "struct", "interface", "enum", "public", "private",
    "protected", "internal", "sealed", "abstract", "static", "const", "readonly", "volatile",
    "virtual", "override", "async", "await", "extern", "unsafe", "partial", "void", "bool",
    "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "long", "ulong",
    "short", "ushort", "string", "object", "dynamic", "var", "if", "else", "switch", "case",
    "default", "break", "continue", "for", "foreach", "while", "do", "goto", "return", "yield",
    "throw", "try", "catch", "finally", "checked", "unchecked", "lock", "fixed", "sizeof",
    "typeof", "is", "as", "new", "this", "base", "value", "out", "ref", "in", "params",
    "operator", "implicit", "explicit", "where", "get", "set", "add", "remove", "event",
    "delegate", "stackalloc",
];

const BUILTIN_TYPES: &[&str] = &[
    "Console", "Math", "String", "Int32", "Double", "Single", "Decimal", "Boolean", "Char",
    "Byte", "SByte", "Int16", "UInt16", "Int64", "UInt64", "Object", "Array", "List",
    "Dictionary", "HashSet", "Queue", "Stack", "Tuple", "ValueTuple", "Task", "ValueTask",
    "DateTime", "TimeSpan", "Guid", "Regex", "StringBuilder", "Stream", "File", "Directory",
    "Path", "Environment", "Convert", "Activator",
];

fn re_block_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)/\*.*?\*/")
            .expect("re_block_comment: pattern is valid and should always compile")
    })
}

fn re_preprocessor() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*#.*$")
            .expect("re_preprocessor: pattern is valid and should always compile")
    })
}

fn re_line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"//.*$").expect("re_line_comment: pattern is valid and should always compile")
    })
}

fn re_string() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#""[^"]*"|'[^']*'"#)
            .expect("re_string: pattern is valid and should always compile")
    })
}

fn re_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b\d+(\.\d+)?([eE][+-]?\d+)?[fFmMdD]?\b")
            .expect("re_number: pattern is valid and should always compile")
    })
}

fn re_identifier() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b[A-Za-z_][A-Za-z0-9_]*\b")
            .expect("re_identifier: pattern is valid and should always compile")
    })
}

/// Classify `code` into tokens.
///
/// Classification narrows in passes: block comments over the whole snippet,
/// then per line preprocessor directives, line comments, string literals,
/// numbers and identifiers. Each pass only sees text the previous passes left
/// unclassified, so a number inside a string is never highlighted as a number.
///
/// Never fails. Concatenating the text of the returned tokens reproduces
/// `code` exactly.
pub fn tokenize(code: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    split_matches(
        code,
        re_block_comment(),
        TokenKind::Comment,
        &mut tokens,
        tokenize_lines,
    );
    tokens
}

/// Tokenize `code` into a code block carrying the background flag for the renderer.
pub fn highlight(code: &str, with_background: bool) -> CodeBlock {
    CodeBlock {
        tokens: tokenize(code),
        with_background,
    }
}

/// Emit every match of `re` in `text` as a `kind` token and hand the text
/// between matches to `rest`.
fn split_matches(
    text: &str,
    re: &Regex,
    kind: TokenKind,
    out: &mut Vec<Token>,
    rest: fn(&str, &mut Vec<Token>),
) {
    let mut last = 0;
    for m in re.find_iter(text) {
        if m.start() > last {
            rest(&text[last..m.start()], out);
        }
        out.push(Token::new(m.as_str(), kind));
        last = m.end();
    }
    if last < text.len() {
        rest(&text[last..], out);
    }
}

fn tokenize_lines(text: &str, out: &mut Vec<Token>) {
    let mut rest = text;
    while !rest.is_empty() {
        let (content, ending, tail) = next_line(rest);
        tokenize_line(content, out);
        if !ending.is_empty() {
            out.push(Token::new(ending, TokenKind::PlainText));
        }
        rest = tail;
    }
}

/// Split off the first line as (content, terminator, remainder). The
/// terminator is `\r\n`, `\n`, a lone `\r`, or empty at end of text.
fn next_line(text: &str) -> (&str, &str, &str) {
    match text.find(['\r', '\n']) {
        Some(i) => {
            let len = if text[i..].starts_with("\r\n") { 2 } else { 1 };
            (&text[..i], &text[i..i + len], &text[i + len..])
        }
        None => (text, "", ""),
    }
}

fn tokenize_line(line: &str, out: &mut Vec<Token>) {
    if line.is_empty() {
        return;
    }

    if re_preprocessor().is_match(line) {
        out.push(Token::new(line, TokenKind::Preprocessor));
        return;
    }

    match re_line_comment().find(line) {
        Some(comment) => {
            tokenize_segment(&line[..comment.start()], out);
            out.push(Token::new(comment.as_str(), TokenKind::Comment));
        }
        None => tokenize_segment(line, out),
    }
}

fn tokenize_segment(segment: &str, out: &mut Vec<Token>) {
    split_matches(
        segment,
        re_string(),
        TokenKind::StringLiteral,
        out,
        tokenize_without_strings,
    );
}

fn tokenize_without_strings(text: &str, out: &mut Vec<Token>) {
    split_matches(
        text,
        re_number(),
        TokenKind::NumberLiteral,
        out,
        tokenize_identifiers,
    );
}

fn tokenize_identifiers(text: &str, out: &mut Vec<Token>) {
    let mut last = 0;
    for m in re_identifier().find_iter(text) {
        if m.start() > last {
            out.push(Token::new(&text[last..m.start()], TokenKind::Operator));
        }
        out.push(Token::new(m.as_str(), classify_identifier(m.as_str())));
        last = m.end();
    }
    if last < text.len() {
        out.push(Token::new(&text[last..], TokenKind::Operator));
    }
}

fn classify_identifier(identifier: &str) -> TokenKind {
    if KEYWORDS.contains(&identifier) {
        TokenKind::Keyword
    } else if BUILTIN_TYPES.contains(&identifier) {
        TokenKind::TypeName
    } else {
        TokenKind::PlainText
    }
}
