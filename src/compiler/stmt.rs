use crate::{
    ast::ast::Stmt,
    errors::errors::{Error, ErrorImpl},
    vm::bytecode::Opcode,
};

use super::{compiler::Compiler, expr::gen_expression};

pub fn gen_statement(compiler: &mut Compiler, statement: &Stmt) -> Result<(), Error> {
    match statement {
        Stmt::Expression(expression_stmt) => {
            gen_expression(compiler, &expression_stmt.expression)?;
            compiler.emit(Opcode::Print);
        }
        Stmt::Block(block) => {
            for statement in block.iter() {
                gen_statement(compiler, statement)?;
            }
        }
        _ => {
            let construct = match statement {
                Stmt::VarDecl(_) => "variable declaration",
                Stmt::FnDecl(_) => "function declaration",
                Stmt::ClassDecl(_) => "class declaration",
                Stmt::If(_) => "if statement",
                Stmt::For(_) => "for loop",
                Stmt::Return(_) => "return statement",
                Stmt::Import(_) => "import",
                Stmt::Expression(_) | Stmt::Block(_) => "statement",
            };

            return Err(Error::new(
                ErrorImpl::UnsupportedInstruction {
                    construct: construct.to_string(),
                },
                statement.get_span().start.clone(),
            ));
        }
    }

    Ok(())
}
