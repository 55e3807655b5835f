//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into an Abstract Syntax Tree. It uses a Pratt parser for expressions
//! with proper operator precedence and handles:
//!
//! - Statement parsing (variable declarations, functions, classes, control flow)
//! - Expression parsing (binary ops, calls, member access, literals)
//! - Type parsing for type annotations
//!
//! Every handler lives in a `Grammar` registry keyed by token kind. The
//! registry is built once and shared, so differently configured parsers
//! can coexist.

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;
pub mod types;

#[cfg(test)]
mod tests;
