//! Error types and error handling for the toolchain.
//!
//! This module defines the error types used throughout every pass. It includes:
//!
//! - Error structures with source position information
//! - Specific error variants for lexing, parsing, type checking and the VM
//! - Error names and suggestions used when rendering diagnostics

pub mod errors;

#[cfg(test)]
mod tests;
