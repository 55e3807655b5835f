use crate::{lexer::tokens::Token, Span};

use super::{
    ast::{Expr, Stmt},
    statements::Parameter,
    types::Type,
};

// LITERALS

/// Integer literal.
#[derive(Debug, Clone, PartialEq)]
pub struct IntExpr {
    pub value: i64,
    pub span: Span,
}

/// Float literal.
#[derive(Debug, Clone, PartialEq)]
pub struct FloatExpr {
    pub value: f64,
    pub span: Span,
}

/// String literal, escapes already decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct StringExpr {
    pub value: String,
    pub span: Span,
}

/// `true` or `false`.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanExpr {
    pub value: bool,
    pub span: Span,
}

/// An identifier, including `this`.
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolExpr {
    pub value: String,
    pub span: Span,
}

// COMPLEX

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub left: Box<Expr>,
    pub operator: Token,
    pub right: Box<Expr>,
    pub span: Span,
}

/// `-x` or `!x`.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExpr {
    pub operator: Token,
    pub right_expr: Box<Expr>,
    pub span: Span,
}

/// `=` and the compound assignments `+= -= *= /=`.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpr {
    pub assignee: Box<Expr>,
    pub operator: Token,
    pub value: Box<Expr>,
    pub span: Span,
}

/// `object.property`
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: String,
    pub span: Span,
}

/// `object[property]`
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedExpr {
    pub object: Box<Expr>,
    pub property: Box<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
    pub span: Span,
}

/// `lower..upper`
#[derive(Debug, Clone, PartialEq)]
pub struct RangeExpr {
    pub lower: Box<Expr>,
    pub upper: Box<Expr>,
    pub span: Span,
}

/// Anonymous function: `function (a: int): int { ... }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub parameters: Vec<Parameter>,
    pub return_type: Option<Type>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `[1, 2, 3]`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteralExpr {
    pub contents: Vec<Expr>,
    pub span: Span,
}

/// `[]int{1, 2, 3}`
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayInstantiationExpr {
    pub underlying: Type,
    pub contents: Vec<Expr>,
    pub span: Span,
}

/// `new Point { x: 1, y: 2 }`
#[derive(Debug, Clone, PartialEq)]
pub struct StructInstantiationExpr {
    pub name: String,
    pub fields: Vec<(String, Expr)>,
    pub span: Span,
}

/// Constructor application: `new Point(1, 2)`
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub name: String,
    pub arguments: Vec<Expr>,
    pub span: Span,
}
