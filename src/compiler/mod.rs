//! Bytecode generation.
//!
//! Lowers integer arithmetic programs into the flat byte format run by
//! [`crate::vm::vm::Vm`]. Every expression statement leaves its result on
//! the stack and is followed by a `print`.

pub mod compiler;
pub mod expr;
pub mod stmt;

#[cfg(test)]
mod tests;
