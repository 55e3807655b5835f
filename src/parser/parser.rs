//! Parser implementation for building the Abstract Syntax Tree.
//!
//! The parser owns the token stream and a shared handle to the `Grammar`
//! it dispatches through. Handlers are plain functions that take the
//! parser, consume tokens and return a node or the first error.

use std::rc::Rc;

use tracing::debug;

use crate::{
    ast::statements::BlockStmt,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, Span,
};

use super::{lookups::Grammar, stmt::parse_stmt};

/// Parsing state: the token stream, a cursor into it and the grammar the
/// handlers are looked up in.
pub struct Parser {
    /// Always terminated by an `EOF` token.
    tokens: Vec<Token>,
    /// Index of the current token
    pos: usize,
    /// Handler tables shared with other parsers
    grammar: Rc<Grammar>,
}

impl Parser {
    /// Creates a parser positioned at the first token.
    ///
    /// # Arguments
    ///
    /// * `tokens` - Token stream; an `EOF` token is appended if it is missing
    /// * `file` - Source file name, used for the position of an appended `EOF`
    /// * `grammar` - Registry the statement, expression and type handlers come from
    ///
    /// # Returns
    ///
    /// A parser ready to hand to `parse_stmt` or any registered handler.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>, grammar: Rc<Grammar>) -> Self {
        if tokens.last().map(|token| token.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map(|token| token.span.end.clone())
                .unwrap_or_else(|| Position(0, Rc::clone(&file)));
            tokens.push(Token {
                kind: TokenKind::EOF,
                value: String::from("EOF"),
                span: Span::new(end.clone(), end),
            });
        }

        Parser {
            tokens,
            pos: 0,
            grammar,
        }
    }

    /// Returns the current token without advancing. Past the end this is the `EOF` token.
    pub fn current_token(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Kind of the token after the current one.
    pub fn peek_kind(&self) -> TokenKind {
        self.tokens
            .get(self.pos + 1)
            .map(|token| token.kind)
            .unwrap_or(TokenKind::EOF)
    }

    /// Advances to the next token and returns the previous one. `EOF` is never stepped over.
    pub fn advance(&mut self) -> &Token {
        let index = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[index]
    }

    /// Expects a token of the specified kind, with an optional custom error.
    ///
    /// # Arguments
    ///
    /// * `expected_kind` - The kind the current token must have
    /// * `error` - Error to return on mismatch instead of `UnexpectedToken`
    ///
    /// # Returns
    ///
    /// The consumed token, or the error positioned at the current token.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            return Err(error.unwrap_or_else(|| {
                Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )
            }));
        }

        Ok(self.advance().clone())
    }

    /// Expects a token of the specified kind, failing with `UnexpectedToken`.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Builds an `UnexpectedTokenDetailed` error for the current token.
    ///
    /// # Arguments
    ///
    /// * `message` - What the handler expected to find instead
    pub fn unexpected(&self, message: &str) -> Error {
        Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: self.current_token().value.clone(),
                message: message.to_string(),
            },
            self.get_position(),
        )
    }

    /// Whether any token other than `EOF` remains.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Returns the grammar handlers are dispatched through.
    pub fn get_grammar(&self) -> &Rc<Grammar> {
        &self.grammar
    }

    /// Start of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }

    /// End of the last consumed token.
    pub fn last_end(&self) -> Position {
        match self.pos.checked_sub(1) {
            Some(index) => self.tokens[index].span.end.clone(),
            None => self.get_position(),
        }
    }

    /// Span from `start` to the end of the last consumed token.
    pub fn span_from(&self, start: Position) -> Span {
        Span::new(start, self.last_end())
    }
}

/// Parses a whole program with the default grammar.
///
/// # Arguments
///
/// * `tokens` - Output of `tokenize`
/// * `file` - Source file name carried by positions
///
/// # Returns
///
/// The parser (with its final state) next to the root block, or the first
/// error encountered. No partial tree is produced on error.
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<BlockStmt, Error>) {
    parse_with_grammar(tokens, file, Rc::new(Grammar::new()))
}

/// Same as [`parse`], dispatching through `grammar` instead of the default one.
pub fn parse_with_grammar(
    tokens: Vec<Token>,
    file: Rc<String>,
    grammar: Rc<Grammar>,
) -> (Parser, Result<BlockStmt, Error>) {
    let mut parser = Parser::new(tokens, Rc::clone(&file), grammar);

    let mut body = vec![];

    while parser.has_tokens() {
        match parse_stmt(&mut parser) {
            Ok(stmt) => body.push(stmt),
            Err(error) => {
                debug!(error = %error, "parse aborted");
                return (parser, Err(error));
            }
        }
    }

    let block = Ok(BlockStmt {
        body,
        span: Span::new(Position(0, Rc::clone(&file)), parser.last_end()),
    });

    (parser, block)
}
