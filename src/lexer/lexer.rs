use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN,
};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

/// Handles a pattern that matched at the cursor. Returns `None` for input
/// that produces no token (whitespace, comments).
pub type RegexHandler = fn(&mut Lexer, &Regex) -> Option<Token>;

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler,
}

lazy_static! {
    /// Patterns are tried in order; the first one matching at the cursor wins.
    /// Compound operators are listed before their single-character prefixes.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        RegexPattern { regex: Regex::new("^\\s+").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("^//[^\n]*").unwrap(), handler: skip_handler },
        RegexPattern { regex: Regex::new("(?s)^\"((?:[^\"\\\\]|\\\\.?)*)(\"?)").unwrap(), handler: string_handler },
        RegexPattern { regex: Regex::new("^==").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Equals, "==") },
        RegexPattern { regex: Regex::new("^!=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "!=") },
        RegexPattern { regex: Regex::new("^<=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=") },
        RegexPattern { regex: Regex::new("^>=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=") },
        RegexPattern { regex: Regex::new("^\\|\\|").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Or, "||") },
        RegexPattern { regex: Regex::new("^&&").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::And, "&&") },
        RegexPattern { regex: Regex::new("^\\+=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::PlusEquals, "+=") },
        RegexPattern { regex: Regex::new("^-=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::MinusEquals, "-=") },
        RegexPattern { regex: Regex::new("^\\*=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::StarEquals, "*=") },
        RegexPattern { regex: Regex::new("^/=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::SlashEquals, "/=") },
        RegexPattern { regex: Regex::new("^\\.\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..") },
        RegexPattern { regex: Regex::new("^=").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=") },
        RegexPattern { regex: Regex::new("^!").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Not, "!") },
        RegexPattern { regex: Regex::new("^\\+").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Plus, "+") },
        RegexPattern { regex: Regex::new("^-").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dash, "-") },
        RegexPattern { regex: Regex::new("^\\*").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Star, "*") },
        RegexPattern { regex: Regex::new("^/").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Slash, "/") },
        RegexPattern { regex: Regex::new("^%").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Percent, "%") },
        RegexPattern { regex: Regex::new("^<").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Less, "<") },
        RegexPattern { regex: Regex::new("^>").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Greater, ">") },
        RegexPattern { regex: Regex::new("^\\(").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(") },
        RegexPattern { regex: Regex::new("^\\)").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")") },
        RegexPattern { regex: Regex::new("^\\[").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[") },
        RegexPattern { regex: Regex::new("^\\]").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]") },
        RegexPattern { regex: Regex::new("^\\{").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{") },
        RegexPattern { regex: Regex::new("^\\}").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}") },
        RegexPattern { regex: Regex::new("^\\.").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Dot, ".") },
        RegexPattern { regex: Regex::new("^\\?").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Question, "?") },
        RegexPattern { regex: Regex::new("^:").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Colon, ":") },
        RegexPattern { regex: Regex::new("^;").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";") },
        RegexPattern { regex: Regex::new("^,").unwrap(), handler: MK_DEFAULT_HANDLER!(TokenKind::Comma, ",") },
        RegexPattern { regex: Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*").unwrap(), handler: symbol_handler },
        RegexPattern { regex: Regex::new("^[0-9]+(\\.[0-9]*)?").unwrap(), handler: number_handler },
    ];
}

/// Scans source text into tokens one at a time.
///
/// The lexer only holds a cursor into the source. Unrecognised input is
/// reported, skipped and turned into an `Error` token so scanning can go on.
pub struct Lexer {
    source: String,
    pub(crate) pos: usize,
    file: Rc<String>,
    errors: Vec<Error>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            source,
            pos: 0,
            file: file_name,
            errors: vec![],
        }
    }

    pub fn advance_n(&mut self, n: usize) {
        self.pos += n;
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self, offset: usize) -> Position {
        Position(offset as u32, Rc::clone(&self.file))
    }

    pub fn span_from(&self, start: usize) -> Span {
        Span {
            start: self.position(start),
            end: self.position(self.pos),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Lexical errors reported so far.
    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn take_errors(&mut self) -> Vec<Error> {
        std::mem::take(&mut self.errors)
    }

    fn report(&mut self, error: Error) {
        let (line, _, column) = crate::get_line_at_position(&self.source, error.get_position().0);
        debug!(line, column = column + 1, "lexical error: {}", error.get_error());
        self.errors.push(error);
    }

    /// Returns the next token, or `EOF` once the input is exhausted.
    pub fn consume(&mut self) -> Token {
        'scan: loop {
            if self.at_eof() {
                return MK_TOKEN!(TokenKind::EOF, String::from("EOF"), self.span_from(self.pos));
            }

            for pattern in PATTERNS.iter() {
                if pattern.regex.is_match(self.remainder()) {
                    match (pattern.handler)(self, &pattern.regex) {
                        Some(token) => return token,
                        None => continue 'scan,
                    }
                }
            }

            // Nothing matched: report and skip a single character.
            let start = self.pos;
            let unexpected = self.remainder().chars().next().unwrap_or_default();
            self.advance_n(unexpected.len_utf8());
            self.report(Error::new(
                ErrorImpl::UnrecognisedToken {
                    token: unexpected.to_string(),
                },
                self.position(start),
            ));

            return MK_TOKEN!(TokenKind::Error, unexpected.to_string(), self.span_from(start));
        }
    }
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) -> Option<Token> {
    let matched = regex.find(lexer.remainder()).map_or(0, |m| m.end());
    lexer.advance_n(matched);
    None
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) -> Option<Token> {
    let start = lexer.pos;
    let mut matched = regex.find(lexer.remainder())?.as_str().to_string();

    // `1..5` is a range, not the float `1.` followed by `.5`.
    if matched.ends_with('.') && lexer.remainder()[matched.len()..].starts_with('.') {
        matched.pop();
    }

    let kind = if matched.contains('.') {
        TokenKind::Float
    } else {
        TokenKind::Int
    };

    lexer.advance_n(matched.len());
    Some(MK_TOKEN!(kind, matched, lexer.span_from(start)))
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) -> Option<Token> {
    let start = lexer.pos;
    let (length, raw, terminated) = {
        let captures = regex.captures(lexer.remainder())?;
        let whole = captures.get(0)?;
        let body = captures.get(1).map_or("", |m| m.as_str());
        let closing = captures.get(2).is_some_and(|m| !m.as_str().is_empty());
        (whole.end(), body.to_string(), closing)
    };

    lexer.advance_n(length);
    let value = unescape(&raw);

    if !terminated {
        lexer.report(Error::new(
            ErrorImpl::UnterminatedString {
                partial: value.clone(),
            },
            lexer.position(start),
        ));
    }

    Some(MK_TOKEN!(TokenKind::String, value, lexer.span_from(start)))
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) -> Option<Token> {
    let start = lexer.pos;
    let value = regex.find(lexer.remainder())?.as_str().to_string();
    let kind = RESERVED_LOOKUP
        .get(value.as_str())
        .copied()
        .unwrap_or(TokenKind::Identifier);

    lexer.advance_n(value.len());
    Some(MK_TOKEN!(kind, value, lexer.span_from(start)))
}

fn unescape(raw: &str) -> String {
    let mut result = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }

        match chars.peek() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some('"') => result.push('"'),
            Some('0') => result.push('\0'),
            Some('x') => {
                chars.next();
                let mut hex = String::new();
                while hex.len() < 2 {
                    match chars.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            hex.push(*c);
                            chars.next();
                        }
                        _ => break,
                    }
                }

                match u8::from_str_radix(&hex, 16) {
                    Ok(byte) => result.push(byte as char),
                    Err(_) => {
                        result.push_str("\\x");
                        result.push_str(&hex);
                    }
                }
                continue;
            }
            // Unknown escape or a lone trailing backslash is kept as written.
            _ => {
                result.push(ch);
                continue;
            }
        }
        chars.next();
    }

    result
}

/// Scans the whole source.
///
/// Error tokens are left out of the returned stream, which always ends in
/// `EOF`. Every lexical error is returned alongside so the caller can
/// decide whether to go on.
pub fn tokenize(source: String, file: Option<String>) -> (Vec<Token>, Vec<Error>) {
    let mut lex = Lexer::new(source, file);
    let mut tokens = vec![];

    loop {
        let token = lex.consume();
        match token.kind {
            TokenKind::EOF => {
                tokens.push(token);
                break;
            }
            TokenKind::Error => continue,
            _ => tokens.push(token),
        }
    }

    (tokens, lex.take_errors())
}
