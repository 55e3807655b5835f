//! Type checking and semantic analysis module.
//!
//! A single depth-first pass over the AST that stops at the first error.
//! It verifies:
//!
//! - Expression and assignment type correctness
//! - Declarations, constants and redeclarations
//! - Function signatures, arguments and return types
//! - Class members, `this` access and struct instantiation
//! - Imports against a fixed module allow-list
//!
//! Each function and class body is checked against its own symbol table,
//! swapped in for the duration of the body.

pub mod type_checker;

#[cfg(test)]
mod tests;
