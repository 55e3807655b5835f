//! Unit tests for the type checker.
//!
//! Programs go through the real lexer and parser first, then are checked.

use std::rc::Rc;

use test_case::test_case;

use super::type_checker::{type_check, ReturnContext, SymbolTable, TypeChecker};
use crate::{
    ast::{statements::BlockStmt, types::Type},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Position,
};

fn parse_program(source: &str) -> BlockStmt {
    let (tokens, errors) = tokenize(source.to_string(), Some("test.cx".to_string()));
    assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);

    let (_, result) = parse(tokens, Rc::new("test.cx".to_string()));
    result.unwrap()
}

fn check(source: &str) -> (TypeChecker, Option<Error>) {
    type_check(&parse_program(source))
}

fn check_error(source: &str) -> Error {
    let (_, error) = check(source);
    error.unwrap_or_else(|| panic!("expected `{}` to fail type checking", source))
}

fn assert_checks(source: &str) {
    let (_, error) = check(source);
    assert!(error.is_none(), "unexpected error: {:?}", error);
}

#[test]
fn test_return_type_mismatch_then_fixed() {
    let error = check_error("function f(): int { return \"hello\"; }");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::ReturnTypeMatchError {
            expected: "int".to_string(),
            received: "string".to_string(),
        }
    );

    assert_checks("function f(): string { return \"hello\"; }");
}

#[test]
fn test_function_declaration_registers_signature() {
    let (type_checker, error) = check("function add(a: int, b: int): int { return a + b; }");
    assert!(error.is_none());

    let symbol = type_checker.symbol_table.get("add").unwrap();
    assert_eq!(
        symbol.ty,
        Type::Function {
            parameters: vec![Type::int(), Type::int()],
            return_type: Box::new(Type::int()),
        }
    );
    // Function bodies do not leak into the caller's table.
    assert!(type_checker.symbol_table.get("a").is_none());
    assert_eq!(type_checker.return_context, ReturnContext::TopLevel);
}

#[test_case("let x = 1; let y: int = x + 2;" ; "arithmetic")]
#[test_case("let x: float = 1.5 * 2.0;" ; "float arithmetic")]
#[test_case("let ok: bool = 1 < 2;" ; "comparison yields bool")]
#[test_case("let s = \"a\" + \"b\";" ; "string concatenation")]
#[test_case("let n = -5; let b = !true;" ; "prefix operators")]
#[test_case("let x = 1; x = 2; x += 3;" ; "assignment")]
#[test_case("let xs = [1, 2, 3]; let first: int = xs[0];" ; "list indexing")]
#[test_case("let xs: []string = []string{\"a\", \"b\"};" ; "array instantiation")]
#[test_case("let r: []int = 0..10;" ; "range is a list of int")]
#[test_case("let f = function (a: int): int { return a; }; let v: int = f(1);" ; "function literal call")]
#[test_case("function noop() { return; } noop();" ; "bare return without declared type")]
#[test_case("if 1 < 2 { let a = 1; } else { let b = 2; }" ; "if else")]
#[test_case("for let i = 0; i < 10; i += 1 { }" ; "three clause loop")]
#[test_case("let running = true; for running { running = false; }" ; "bare condition loop")]
#[test_case("import math; import json;" ; "known modules")]
#[test_case("for let i = 0; i < 3; i += 1 { } for let i = 0; i < 3; i += 1 { }" ; "loops reuse a counter name")]
#[test_case("if true { let x = 1; } else { let x = 2; }" ; "sibling branches declare the same name")]
#[test_case("{ let x = 1; } { let x = \"s\"; let y: string = x; }" ; "redeclaration takes the new type")]
#[test_case("function add(a: int, b: int): int { return a + b; } function add(a: int, b: int): int { return a + b; }" ; "function declared twice")]
#[test_case("class P { } class P { }" ; "class declared twice")]
fn test_valid_programs(source: &str) {
    assert_checks(source);
}

#[test_case("let x: int = \"no\";", "TypeMatchError" ; "annotation mismatch")]
#[test_case("let x = 1 + \"a\";", "TypeMatchError" ; "binary operand mismatch")]
#[test_case("let x = -true;", "TypeMatchError" ; "negating a bool")]
#[test_case("let x = !1;", "TypeMatchError" ; "not on an int")]
#[test_case("y = 1;", "VariableNotDeclared" ; "assignment to unknown")]
#[test_case("let a = b;", "VariableNotDeclared" ; "unknown symbol")]
#[test_case("const a = 1; a = 2;", "AssignToConstant" ; "constant reassignment")]
#[test_case("1 = 2;", "InvalidAssignmentTarget" ; "literal assignee")]
#[test_case("let x = 1; x = \"s\";", "TypeMatchError" ; "assignment mismatch")]
#[test_case("if 1 { }", "ConditionNotBoolean" ; "if condition")]
#[test_case("for ; 5; { }", "ConditionNotBoolean" ; "loop condition")]
#[test_case("return 1;", "ReturnOutsideFunction" ; "top level return")]
#[test_case("function f(): int { return; }", "ReturnTypeMatchError" ; "bare return with declared type")]
#[test_case("function f() { return 1; }", "ReturnTypeMatchError" ; "value from void function")]
#[test_case("let x = 1; x(2);", "NotCallable" ; "calling an int")]
#[test_case("function f(a: int) { } f(1, 2);", "UnexpectedArguments" ; "too many arguments")]
#[test_case("function f(a: int) { } f();", "MissingArguments" ; "too few arguments")]
#[test_case("function f(a: int) { } f(\"a\");", "ArgumentTypeMatchError" ; "argument type")]
#[test_case("let x = 1; let y = x[0];", "NotAList" ; "indexing an int")]
#[test_case("let xs = [1]; let y = xs[\"a\"];", "TypeMatchError" ; "string index")]
#[test_case("let x = [];", "EmptyArrayLiteral" ; "empty literal")]
#[test_case("let xs = [1, \"a\"];", "TypeMatchError" ; "mixed literal")]
#[test_case("let xs = []int{1, 2.5};", "TypeMatchError" ; "instantiation element")]
#[test_case("let r = 0..\"a\";", "TypeMatchError" ; "range bound")]
#[test_case("let x = this;", "ThisOutsideClass" ; "this at top level")]
#[test_case("let x = this.y;", "ThisOutsideClass" ; "this member at top level")]
#[test_case("let x = 1; let y = x.z;", "NotAStruct" ; "member on int")]
#[test_case("let x: Nope = 1;", "UnknownType" ; "unknown annotation")]
#[test_case("let p = new Nope(1);", "UnknownType" ; "unknown class")]
#[test_case("import math; import math;", "ModuleAlreadyImported" ; "double import")]
#[test_case("import sockets;", "UnknownModule" ; "unknown module")]
fn test_invalid_programs(source: &str, error_name: &str) {
    assert_eq!(check_error(source).get_error_name(), error_name);
}

#[test]
fn test_function_body_has_its_own_table() {
    // Globals are not visible inside a function body.
    let error = check_error("let g = 1; function f(): int { return g; }");
    assert_eq!(
        error.get_error(),
        &ErrorImpl::VariableNotDeclared {
            variable: "g".to_string()
        }
    );

    // Parameters may shadow outer names.
    assert_checks("let a = \"s\"; function f(a: int): int { return a; }");
}

#[test]
fn test_class_members() {
    let source = "
        class Point {
            let x: int = 0;
            let y = 1.5;
            function sum(): int { return this.x; }
        }
        let p = new Point { x: 3, y: 2.0 };
        let x: int = p.x;
        let y: float = p.y;
        let s: int = p.sum();
    ";

    let (type_checker, error) = check(source);
    assert!(error.is_none(), "unexpected error: {:?}", error);

    let point = type_checker.class_types.get("Point").unwrap();
    assert_eq!(point.get_member_type("x"), Some(&Type::int()));
    assert_eq!(point.get_member_type("y"), Some(&Type::float()));
    assert!(matches!(point.get_member_type("sum"), Some(Type::Function { .. })));
}

#[test]
fn test_class_annotations_resolve_to_struct() {
    assert_checks(
        "
        class Point { let x: int = 0; }
        function origin(p: Point): int { return p.x; }
        let p: Point = new Point(1, 2);
        let x: int = origin(p);
        ",
    );
}

#[test_case("class P { function f(): int { return this.missing; } }", "UnknownProperty" ; "this member missing")]
#[test_case("class P { let x: int = 0; } let p = new P { z: 1 };", "UnknownProperty" ; "unknown field in instantiation")]
#[test_case("class P { let x: int = 0; } let p = new P { x: \"a\" };", "FieldTypeMatchError" ; "field value type")]
#[test_case("class P { let x: int = 0; } let p = new P(1); let q = p.y;", "UnknownProperty" ; "member missing")]
#[test_case("class P { let x: int = \"s\"; }", "TypeMatchError" ; "field initializer")]
fn test_invalid_classes(source: &str, error_name: &str) {
    assert_eq!(check_error(source).get_error_name(), error_name);
}

#[test]
fn test_redeclaration_replaces_constant() {
    let (type_checker, error) = check("const a = 1; let a = \"s\"; a = \"t\";");
    assert!(error.is_none(), "unexpected error: {:?}", error);

    let symbol = type_checker.symbol_table.get("a").unwrap();
    assert_eq!(symbol.ty, Type::string());
    assert!(!symbol.is_constant);
}

#[test]
fn test_method_takes_and_returns_own_class() {
    assert_checks(
        "
        class P {
            let x: int = 0;
            function id(o: P): P { return o; }
        }
        let a = new P();
        let b: P = a.id(a);
        let c = a.id(b);
        let x: int = c.x;
        let d: P = c.id(c);
        ",
    );

    let error = check_error(
        "
        class P { function id(o: P): P { return o; } }
        class Q { }
        let p = new P();
        p.id(new Q());
        ",
    );
    assert_eq!(
        error.get_error(),
        &ErrorImpl::ArgumentTypeMatchError {
            expected: "P".to_string(),
            received: "Q".to_string(),
        }
    );
}

#[test]
fn test_this_member_uses_field_declaration() {
    assert_checks("class C { let n = 5; function get(): int { return this.n; } }");

    let error = check_error("class C { let n = 5; function get(): string { return this.n; } }");
    assert_eq!(error.get_error_name(), "ReturnTypeMatchError");
}

#[test]
fn test_stops_at_first_error() {
    let error = check_error("let a: int = \"x\"; let b = missing;");

    assert_eq!(error.get_error_name(), "TypeMatchError");
    assert_eq!(error.get_position().0, 13);
}

#[test]
fn test_scope_is_restored_after_error() {
    let mut type_checker = TypeChecker::new();
    type_checker.symbol_table.declare("outer", Type::int(), false);

    let (inner, result) = type_checker.in_scope(SymbolTable::new(), |type_checker| {
        type_checker.symbol_table.declare("inner", Type::bool(), false);
        Err::<(), _>(Error::new(ErrorImpl::StackUnderflow, Position::null()))
    });

    assert!(result.is_err());
    assert!(inner.get("inner").is_some());
    assert!(type_checker.symbol_table.get("outer").is_some());
    assert!(type_checker.symbol_table.get("inner").is_none());
}
