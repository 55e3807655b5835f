use tracing::debug;

use crate::{ast::statements::BlockStmt, errors::errors::Error, vm::bytecode::Opcode};

use super::stmt::gen_statement;

/// Accumulates bytecode while walking the AST.
#[derive(Debug, Default)]
pub struct Compiler {
    code: Vec<u8>,
}

impl Compiler {
    pub fn new() -> Self {
        Compiler::default()
    }

    pub fn emit(&mut self, opcode: Opcode) {
        self.code.push(opcode as u8);
    }

    pub fn emit_with_operand(&mut self, opcode: Opcode, operand: u8) {
        self.code.push(opcode as u8);
        self.code.push(operand);
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn finish(self) -> Vec<u8> {
        self.code
    }
}

/// Compiles a program into bytecode, stopping at the first construct
/// that has no bytecode form.
pub fn compile(block: &BlockStmt) -> Result<Vec<u8>, Error> {
    let mut compiler = Compiler::new();

    for statement in block.iter() {
        gen_statement(&mut compiler, statement)?;
    }

    debug!(bytes = compiler.code().len(), "compiled program");
    Ok(compiler.finish())
}
