//! End-to-end tests for the whole pipeline.
//!
//! Source programs are tokenized, parsed, type checked, compiled to
//! bytecode and executed with output captured in memory.

use std::rc::Rc;

use calyx::{
    ast::statements::BlockStmt,
    compiler::compiler::compile,
    errors::errors::Error,
    format_error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::type_checker::type_check,
    vm::{bytecode::assemble, vm::Vm},
};
use test_case::test_case;

fn front_end(source: &str) -> Result<BlockStmt, Error> {
    let (tokens, errors) = tokenize(source.to_string(), Some("main.cx".to_string()));
    if let Some(error) = errors.into_iter().next() {
        return Err(error);
    }

    let (_, result) = parse(tokens, Rc::new("main.cx".to_string()));
    let block = result?;

    match type_check(&block) {
        (_, Some(error)) => Err(error),
        (_, None) => Ok(block),
    }
}

fn run_bytecode(code: Vec<u8>) -> Result<String, Error> {
    let mut vm = Vm::new(code, Vec::new());
    vm.run()?;

    Ok(String::from_utf8(vm.into_output()).unwrap())
}

fn run_source(source: &str) -> Result<String, Error> {
    let block = front_end(source)?;
    run_bytecode(compile(&block)?)
}

#[test_case("5 + 3;", "8\n" ; "addition")]
#[test_case("1 + 2 * 3;", "7\n" ; "precedence")]
#[test_case("(1 + 2) * 3;", "9\n" ; "grouping")]
#[test_case("8 - 3 - 2;", "3\n" ; "left associative subtraction")]
#[test_case("100 / 7; 100 % 7;", "14\n2\n" ; "division and modulo")]
#[test_case("3 - 10;", "-7\n" ; "negative result")]
#[test_case("255 * 255 * 255;", "16581375\n" ; "large intermediate")]
fn test_run_source(source: &str, expected: &str) {
    assert_eq!(run_source(source).unwrap(), expected);
}

#[test]
fn test_source_and_assembly_agree() {
    let from_source = run_source("5 * 5 * 5;").unwrap();
    let from_assembly = run_bytecode(assemble("push 5\npush 3\npower\nprint").unwrap()).unwrap();

    assert_eq!(from_source, "125\n");
    assert_eq!(from_assembly, from_source);
}

#[test]
fn test_runtime_error_stops_execution() {
    let error = run_source("1; 4 / 0; 2;").unwrap_err();

    assert_eq!(error.get_error_name(), "DivisionByZero");
}

#[test_case("let x = #;", "UnrecognisedToken" ; "lexical")]
#[test_case("let x = ;", "MissingNudHandler" ; "grammar")]
#[test_case("let x: int = true;", "TypeMatchError" ; "types")]
#[test_case("let x = 1;", "UnsupportedInstruction" ; "codegen")]
#[test_case("300;", "OperandOutOfRange" ; "operand")]
fn test_pipeline_errors(source: &str, error_name: &str) {
    assert_eq!(run_source(source).unwrap_err().get_error_name(), error_name);
}

#[test]
fn test_front_end_accepts_full_language() {
    let source = r#"
        import math;

        class Counter {
            let count: int = 0;
            function get(): int { return this.count; }
        }

        function sum(xs: []int): int {
            let total = 0;
            for let i = 0; i < 3; i += 1 {
                total += xs[i];
            }
            return total;
        }

        let c = new Counter { count: 2 };
        let n: int = c.get() + sum([1, 2, 3]);
        if n > 5 { n = 5; } else { n = 0; }
    "#;

    assert!(front_end(source).is_ok());
}

#[test]
fn test_error_report_points_at_offending_token() {
    let source = "let a = 1;\nlet b: string = a;";
    let error = front_end(source).unwrap_err();
    let report = format_error(&error, source);

    assert!(report.starts_with("Error: TypeMatchError"));
    assert!(report.contains("-> main.cx:2:"));
    assert!(report.contains("let b: string = a;"));
}
