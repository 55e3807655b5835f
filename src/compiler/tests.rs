use std::rc::Rc;

use test_case::test_case;

use super::compiler::compile;
use crate::{
    ast::statements::BlockStmt,
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    vm::bytecode::{assemble, Opcode},
};

fn parse_program(source: &str) -> BlockStmt {
    let (tokens, errors) = tokenize(source.to_string(), Some("test.cx".to_string()));
    assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);

    let (_, result) = parse(tokens, Rc::new("test.cx".to_string()));
    result.unwrap()
}

fn compile_source(source: &str) -> Result<Vec<u8>, Error> {
    compile(&parse_program(source))
}

#[test_case("5;", "push 5; print" ; "literal")]
#[test_case("5 + 3;", "push 5; push 3; add; print" ; "addition")]
#[test_case("1 + 2 * 3;", "push 1; push 2; push 3; mul; add; print" ; "precedence")]
#[test_case("(1 + 2) * 3;", "push 1; push 2; add; push 3; mul; print" ; "grouping")]
#[test_case("8 - 3 - 2;", "push 8; push 3; sub; push 2; sub; print" ; "left associative")]
#[test_case("9 / 3; 9 % 4;", "push 9; push 3; div; print; push 9; push 4; mod; print" ; "one print per statement")]
#[test_case("{ 1; { 2; } }", "push 1; print; push 2; print" ; "nested blocks")]
#[test_case("", "" ; "empty program")]
fn test_compiles_to(source: &str, assembly: &str) {
    assert_eq!(compile_source(source).unwrap(), assemble(assembly).unwrap());
}

#[test]
fn test_operand_boundaries() {
    assert_eq!(
        compile_source("0; 255;").unwrap(),
        vec![
            Opcode::Push as u8,
            0,
            Opcode::Print as u8,
            Opcode::Push as u8,
            255,
            Opcode::Print as u8
        ]
    );

    let error = compile_source("1 + 256;").unwrap_err();
    assert_eq!(
        error.get_error(),
        &ErrorImpl::OperandOutOfRange {
            operand: "256".to_string()
        }
    );
    assert_eq!(error.get_position().0, 4);
}

#[test_case("let x = 1;", "variable declaration" ; "declaration")]
#[test_case("x;", "symbol" ; "symbol")]
#[test_case("-1;", "prefix expression" ; "negative literal")]
#[test_case("1.5 + 2;", "float literal" ; "float")]
#[test_case("\"a\";", "string literal" ; "string")]
#[test_case("f(1);", "call" ; "call")]
#[test_case("if true { }", "if statement" ; "if")]
#[test_case("1 < 2;", "operator `<`" ; "comparison")]
#[test_case("1 + [2];", "array literal" ; "nested unsupported operand")]
fn test_unsupported(source: &str, construct: &str) {
    assert_eq!(
        compile_source(source).unwrap_err().get_error(),
        &ErrorImpl::UnsupportedInstruction {
            construct: construct.to_string()
        }
    );
}

#[test]
fn test_stops_at_first_unsupported_statement() {
    let error = compile_source("1; let x = 2; 3 < 4;").unwrap_err();

    assert_eq!(error.get_position().0, 3);
}
