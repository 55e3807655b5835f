//! Stack based virtual machine.
//!
//! Bytecode is a flat byte sequence: one byte per opcode, with `push`
//! followed by a single operand byte. Values live on a reference counted
//! heap and the stack holds handles into it.

pub mod bytecode;
pub mod heap;
pub mod vm;
