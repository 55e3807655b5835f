use std::fmt::{self, Display, Formatter};

use crate::Span;

use super::{
    expressions::{
        ArrayInstantiationExpr, ArrayLiteralExpr, AssignmentExpr, BinaryExpr, BooleanExpr,
        CallExpr, ComputedExpr, FloatExpr, FunctionExpr, IntExpr, MemberExpr, NewExpr, PrefixExpr,
        RangeExpr, StringExpr, StructInstantiationExpr, SymbolExpr,
    },
    statements::{
        BlockStmt, ClassDeclStmt, ExpressionStmt, FnDeclStmt, ForStmt, IfStmt, ImportStmt,
        Parameter, ReturnStmt, VarDeclStmt,
    },
};

/// Statement node.
///
/// The set of statements is closed; consumers match on it exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(BlockStmt),
    Expression(ExpressionStmt),
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    ClassDecl(ClassDeclStmt),
    If(IfStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Import(ImportStmt),
}

impl Stmt {
    pub fn get_span(&self) -> &Span {
        match self {
            Stmt::Block(stmt) => &stmt.span,
            Stmt::Expression(stmt) => &stmt.span,
            Stmt::VarDecl(stmt) => &stmt.span,
            Stmt::FnDecl(stmt) => &stmt.span,
            Stmt::ClassDecl(stmt) => &stmt.span,
            Stmt::If(stmt) => &stmt.span,
            Stmt::For(stmt) => &stmt.span,
            Stmt::Return(stmt) => &stmt.span,
            Stmt::Import(stmt) => &stmt.span,
        }
    }
}

/// Expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Int(IntExpr),
    Float(FloatExpr),
    String(StringExpr),
    Boolean(BooleanExpr),
    Symbol(SymbolExpr),
    Binary(BinaryExpr),
    Prefix(PrefixExpr),
    Assignment(AssignmentExpr),
    Member(MemberExpr),
    Computed(ComputedExpr),
    Call(CallExpr),
    Range(RangeExpr),
    Function(FunctionExpr),
    ArrayLiteral(ArrayLiteralExpr),
    ArrayInstantiation(ArrayInstantiationExpr),
    StructInstantiation(StructInstantiationExpr),
    New(NewExpr),
}

impl Expr {
    pub fn get_span(&self) -> &Span {
        match self {
            Expr::Int(expr) => &expr.span,
            Expr::Float(expr) => &expr.span,
            Expr::String(expr) => &expr.span,
            Expr::Boolean(expr) => &expr.span,
            Expr::Symbol(expr) => &expr.span,
            Expr::Binary(expr) => &expr.span,
            Expr::Prefix(expr) => &expr.span,
            Expr::Assignment(expr) => &expr.span,
            Expr::Member(expr) => &expr.span,
            Expr::Computed(expr) => &expr.span,
            Expr::Call(expr) => &expr.span,
            Expr::Range(expr) => &expr.span,
            Expr::Function(expr) => &expr.span,
            Expr::ArrayLiteral(expr) => &expr.span,
            Expr::ArrayInstantiation(expr) => &expr.span,
            Expr::StructInstantiation(expr) => &expr.span,
            Expr::New(expr) => &expr.span,
        }
    }
}

fn write_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for item in items {
        write!(f, " {}", item)?;
    }
    Ok(())
}

fn write_parameters(f: &mut Formatter<'_>, parameters: &[Parameter]) -> fmt::Result {
    write!(f, "(")?;
    for (i, parameter) in parameters.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}: {}", parameter.name, parameter.ty)?;
    }
    write!(f, ")")
}

/// S-expression rendering: `1 + 2 * 3` displays as `(+ 1 (* 2 3))`.
impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Int(expr) => write!(f, "{}", expr.value),
            Expr::Float(expr) => write!(f, "{:?}", expr.value),
            Expr::String(expr) => write!(f, "{:?}", expr.value),
            Expr::Boolean(expr) => write!(f, "{}", expr.value),
            Expr::Symbol(expr) => write!(f, "{}", expr.value),
            Expr::Binary(expr) => {
                write!(f, "({} {} {})", expr.operator.value, expr.left, expr.right)
            }
            Expr::Prefix(expr) => write!(f, "({} {})", expr.operator.value, expr.right_expr),
            Expr::Assignment(expr) => {
                write!(f, "({} {} {})", expr.operator.value, expr.assignee, expr.value)
            }
            Expr::Member(expr) => write!(f, "(. {} {})", expr.object, expr.property),
            Expr::Computed(expr) => write!(f, "([] {} {})", expr.object, expr.property),
            Expr::Call(expr) => {
                write!(f, "(call {}", expr.callee)?;
                write_separated(f, &expr.arguments)?;
                write!(f, ")")
            }
            Expr::Range(expr) => write!(f, "(.. {} {})", expr.lower, expr.upper),
            Expr::Function(expr) => {
                write!(f, "(function ")?;
                write_parameters(f, &expr.parameters)?;
                if let Some(return_type) = &expr.return_type {
                    write!(f, ": {}", return_type)?;
                }
                write_separated(f, &expr.body)?;
                write!(f, ")")
            }
            Expr::ArrayLiteral(expr) => {
                write!(f, "[")?;
                for (i, item) in expr.contents.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Expr::ArrayInstantiation(expr) => {
                write!(f, "([]{}", expr.underlying)?;
                write_separated(f, &expr.contents)?;
                write!(f, ")")
            }
            Expr::StructInstantiation(expr) => {
                write!(f, "(struct {}", expr.name)?;
                for (name, value) in &expr.fields {
                    write!(f, " ({} {})", name, value)?;
                }
                write!(f, ")")
            }
            Expr::New(expr) => {
                write!(f, "(new {}", expr.name)?;
                write_separated(f, &expr.arguments)?;
                write!(f, ")")
            }
        }
    }
}

impl Display for BlockStmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        write_separated(f, &self.body)?;
        write!(f, " }}")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block(block) => write!(f, "{}", block),
            Stmt::Expression(stmt) => write!(f, "{};", stmt.expression),
            Stmt::VarDecl(stmt) => {
                let keyword = if stmt.is_constant { "const" } else { "let" };
                write!(f, "({} {}", keyword, stmt.identifier)?;
                if let Some(explicit_type) = &stmt.explicit_type {
                    write!(f, ": {}", explicit_type)?;
                }
                if let Some(value) = &stmt.assigned_value {
                    write!(f, " {}", value)?;
                }
                write!(f, ")")
            }
            Stmt::FnDecl(stmt) => {
                write!(f, "(function {} ", stmt.identifier)?;
                write_parameters(f, &stmt.parameters)?;
                if let Some(return_type) = &stmt.return_type {
                    write!(f, ": {}", return_type)?;
                }
                write!(f, " {})", stmt.body)
            }
            Stmt::ClassDecl(stmt) => write!(f, "(class {} {})", stmt.name, stmt.body),
            Stmt::If(stmt) => {
                write!(f, "(if {} {}", stmt.condition, stmt.then_body)?;
                if let Some(else_body) = &stmt.else_body {
                    write!(f, " else {}", else_body)?;
                }
                write!(f, ")")
            }
            Stmt::For(stmt) => {
                write!(f, "(for")?;
                match &stmt.init {
                    Some(init) => write!(f, " {}", init)?,
                    None => write!(f, " _")?,
                }
                match &stmt.condition {
                    Some(condition) => write!(f, " {}", condition)?,
                    None => write!(f, " _")?,
                }
                match &stmt.post {
                    Some(post) => write!(f, " {}", post)?,
                    None => write!(f, " _")?,
                }
                write!(f, " {})", stmt.body)
            }
            Stmt::Return(stmt) => match &stmt.value {
                Some(value) => write!(f, "(return {})", value),
                None => write!(f, "(return)"),
            },
            Stmt::Import(stmt) => match &stmt.from {
                Some(from) => write!(f, "(import {} {:?})", stmt.identifier, from),
                None => write!(f, "(import {})", stmt.identifier),
            },
        }
    }
}
