use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("int", TokenKind::IntType);
        map.insert("float", TokenKind::FloatType);
        map.insert("bool", TokenKind::BoolType);
        map.insert("string", TokenKind::StringType);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map.insert("let", TokenKind::Let);
        map.insert("const", TokenKind::Const);
        map.insert("function", TokenKind::Function);
        map.insert("class", TokenKind::Class);
        map.insert("new", TokenKind::New);
        map.insert("this", TokenKind::This);
        map.insert("import", TokenKind::Import);
        map.insert("from", TokenKind::From);
        map.insert("return", TokenKind::Return);
        map.insert("if", TokenKind::If);
        map.insert("else", TokenKind::Else);
        map.insert("for", TokenKind::For);
        map
    };
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Error,
    Int,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    Not,        // !
    NotEquals,  // !=

    Less,
    LessEquals,
    Greater,
    GreaterEquals,

    Or,
    And,

    Dot,
    DotDot,
    Semicolon,
    Colon,
    Question,
    Comma,

    PlusEquals,
    MinusEquals,
    SlashEquals,
    StarEquals,

    Plus,
    Dash,
    Slash,
    Star,
    Percent,

    // Reserved
    IntType,
    FloatType,
    BoolType,
    StringType,
    True,
    False,
    Let,
    Const,
    Function,
    Class,
    New,
    This,
    Import,
    From,
    Return,
    If,
    Else,
    For,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Int,
            TokenKind::Float,
        ]) {
            write!(f, "{} ({})", self.kind, self.value)
        } else {
            write!(f, "{} ()", self.kind)
        }
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }
}
