use crate::{
    ast::ast::Expr,
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    vm::bytecode::Opcode,
};

use super::compiler::Compiler;

pub fn gen_expression(compiler: &mut Compiler, expression: &Expr) -> Result<(), Error> {
    match expression {
        Expr::Int(int) => {
            let operand = u8::try_from(int.value).map_err(|_| {
                Error::new(
                    ErrorImpl::OperandOutOfRange {
                        operand: int.value.to_string(),
                    },
                    int.span.start.clone(),
                )
            })?;
            compiler.emit_with_operand(Opcode::Push, operand);
        }
        Expr::Binary(binary) => {
            let opcode = match binary.operator.kind {
                TokenKind::Plus => Opcode::Add,
                TokenKind::Dash => Opcode::Sub,
                TokenKind::Star => Opcode::Mul,
                TokenKind::Slash => Opcode::Div,
                TokenKind::Percent => Opcode::Mod,
                _ => {
                    return Err(Error::new(
                        ErrorImpl::UnsupportedInstruction {
                            construct: format!("operator `{}`", binary.operator.value),
                        },
                        binary.operator.span.start.clone(),
                    ))
                }
            };

            gen_expression(compiler, &binary.left)?;
            gen_expression(compiler, &binary.right)?;
            compiler.emit(opcode);
        }
        _ => {
            return Err(Error::new(
                ErrorImpl::UnsupportedInstruction {
                    construct: construct_name(expression).to_string(),
                },
                expression.get_span().start.clone(),
            ))
        }
    }

    Ok(())
}

fn construct_name(expression: &Expr) -> &'static str {
    match expression {
        Expr::Int(_) => "integer literal",
        Expr::Float(_) => "float literal",
        Expr::String(_) => "string literal",
        Expr::Boolean(_) => "boolean literal",
        Expr::Symbol(_) => "symbol",
        Expr::Binary(_) => "binary expression",
        Expr::Prefix(_) => "prefix expression",
        Expr::Assignment(_) => "assignment",
        Expr::Member(_) => "member access",
        Expr::Computed(_) => "computed member access",
        Expr::Call(_) => "call",
        Expr::Range(_) => "range",
        Expr::Function(_) => "function literal",
        Expr::ArrayLiteral(_) => "array literal",
        Expr::ArrayInstantiation(_) => "array instantiation",
        Expr::StructInstantiation(_) => "struct instantiation",
        Expr::New(_) => "constructor application",
    }
}
