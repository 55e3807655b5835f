//! Unit tests for the parser module.
//!
//! Expressions are compared through their S-expression rendering, which
//! makes grouping explicit. Statements are checked the same way, plus a
//! handful of structural error cases and a non-default grammar.

use std::rc::Rc;

use test_case::test_case;

use super::{
    expr::{parse_binary_expr, parse_primary_expr},
    lookups::{BindingPower, Grammar},
    parser::{parse, parse_with_grammar},
};
use crate::{
    ast::{
        ast::{Expr, Stmt},
        statements::BlockStmt,
        types::Type,
    },
    errors::errors::{Error, ErrorImpl},
    lexer::{lexer::tokenize, tokens::TokenKind},
};

fn parse_source(source: &str) -> Result<BlockStmt, Error> {
    let (tokens, errors) = tokenize(source.to_string(), Some("test.cx".to_string()));
    assert!(errors.is_empty(), "unexpected lexical errors: {:?}", errors);

    let (_, result) = parse(tokens, Rc::new("test.cx".to_string()));
    result
}

fn render(source: &str) -> String {
    let block = parse_source(source).unwrap();
    assert_eq!(block.body.len(), 1);
    block.body[0].to_string()
}

#[test_case("1 + 2 * 3;", "(+ 1 (* 2 3));" ; "multiplication binds tighter")]
#[test_case("8 - 3 - 2;", "(- (- 8 3) 2);" ; "subtraction is left associative")]
#[test_case("8 / 4 / 2;", "(/ (/ 8 4) 2);" ; "division is left associative")]
#[test_case("a = b = 3;", "(= a (= b 3));" ; "assignment is right associative")]
#[test_case("x += y = 2;", "(+= x (= y 2));" ; "compound assignment nests")]
#[test_case("(1 + 2) * 3;", "(* (+ 1 2) 3);" ; "grouping overrides precedence")]
#[test_case("-x * y;", "(* (- x) y);" ; "prefix minus binds to its operand")]
#[test_case("!a == b;", "(== (! a) b);" ; "not binds tighter than comparison")]
#[test_case("- - x;", "(- (- x));" ; "nested prefix")]
#[test_case("a + 1 < b * 2 && c;", "(&& (< (+ a 1) (* b 2)) c);" ; "logical is loosest")]
#[test_case("a || b && c;", "(&& (|| a b) c);" ; "logical operators share a level")]
#[test_case("a.b.c;", "(. (. a b) c);" ; "member chain")]
#[test_case("a.b(1);", "(call (. a b) 1);" ; "method style call")]
#[test_case("f(1, 2)(3);", "(call (call f 1 2) 3);" ; "chained calls")]
#[test_case("f();", "(call f);" ; "call without arguments")]
#[test_case("xs[i + 1];", "([] xs (+ i 1));" ; "computed member")]
#[test_case("grid[0][1];", "([] ([] grid 0) 1);" ; "nested computed member")]
#[test_case("0..10;", "(.. 0 10);" ; "range")]
#[test_case("0..n + 1;", "(.. 0 (+ n 1));" ; "range bounds are arithmetic")]
#[test_case("this.x = 5;", "(= (. this x) 5);" ; "this member assignment")]
#[test_case("[1, 2, 3];", "[1 2 3];" ; "array literal")]
#[test_case("[];", "[];" ; "empty array literal")]
#[test_case("[]int{1, 2};", "([]int 1 2);" ; "array instantiation")]
#[test_case("[][]string{};", "([][]string);" ; "nested array instantiation")]
#[test_case("new Point { x: 1, y: 2 };", "(struct Point (x 1) (y 2));" ; "struct instantiation")]
#[test_case("new Point(1, 2);", "(new Point 1 2);" ; "constructor application")]
#[test_case("\"hi\";", "\"hi\";" ; "string literal")]
#[test_case("1.5;", "1.5;" ; "float literal")]
#[test_case("true != false;", "(!= true false);" ; "boolean literals")]
fn test_expression_shape(source: &str, expected: &str) {
    assert_eq!(render(source), expected);
}

#[test]
fn test_precedence_builds_nested_binary() {
    let block = parse_source("1 + 2 * 3;").unwrap();

    let Stmt::Expression(stmt) = &block.body[0] else {
        panic!("expected an expression statement");
    };
    let Expr::Binary(outer) = &stmt.expression else {
        panic!("expected a binary expression");
    };

    assert_eq!(outer.operator.kind, TokenKind::Plus);
    assert!(matches!(*outer.left, Expr::Int(ref int) if int.value == 1));
    assert!(matches!(*outer.right, Expr::Binary(ref inner) if inner.operator.kind == TokenKind::Star));
}

#[test_case("let x: int = 5;", "(let x: int 5)" ; "annotated")]
#[test_case("let x = 5;", "(let x 5)" ; "inferred")]
#[test_case("let x: int;", "(let x: int)" ; "annotation only")]
#[test_case("const PI = 3.14;", "(const PI 3.14)" ; "constant")]
#[test_case("let grid: [][]string;", "(let grid: [][]string)" ; "nested list type")]
#[test_case("let p: Point = new Point(1, 2);", "(let p: Point (new Point 1 2))" ; "class type")]
fn test_var_decl(source: &str, expected: &str) {
    assert_eq!(render(source), expected);
}

#[test]
fn test_var_decl_list_type() {
    let block = parse_source("let xs: []int = [1];").unwrap();

    let Stmt::VarDecl(decl) = &block.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.identifier, "xs");
    assert!(!decl.is_constant);
    assert_eq!(decl.explicit_type, Some(Type::list(Type::int())));
}

#[test]
fn test_function_declaration() {
    assert_eq!(
        render("function add(a: int, b: int): int { return a + b; }"),
        "(function add (a: int b: int): int { (return (+ a b)) })"
    );
    assert_eq!(render("function hello() { }"), "(function hello () { })");
    assert_eq!(
        render("function stop() { return; }"),
        "(function stop () { (return) })"
    );
}

#[test]
fn test_function_literal_statement() {
    assert_eq!(
        render("function (a: int): int { return a; };"),
        "(function (a: int): int (return a));"
    );
    assert_eq!(
        render("let f = function (x: []float) { };"),
        "(let f (function (x: []float)))"
    );
}

#[test]
fn test_class_declaration() {
    assert_eq!(
        render("class Point { let x: int = 0; function len(): int { return this.x; } }"),
        "(class Point { (let x: int 0) (function len (): int { (return (. this x)) }) })"
    );
}

#[test]
fn test_if_else_chain() {
    assert_eq!(
        render("if a { x; } else if b { y; } else { z; }"),
        "(if a { x; } else (if b { y; } else { z; }))"
    );
    assert_eq!(render("if x > 0 { }"), "(if (> x 0) { })");
}

#[test_case("for let i = 0; i < 10; i += 1 { print(i); }", "(for (let i 0) (< i 10) (+= i 1) { (call print i); })" ; "three clauses")]
#[test_case("for i = 0; i < 3; i += 1 { }", "(for (= i 0); (< i 3) (+= i 1) { })" ; "expression init")]
#[test_case("for ;; { }", "(for _ _ _ { })" ; "empty clauses")]
#[test_case("for x < 3 x = x + 1;", "(for _ (< x 3) _ (= x (+ x 1));)" ; "bare condition and single statement body")]
#[test_case("for { }", "(for _ _ _ { })" ; "infinite")]
fn test_for_loop(source: &str, expected: &str) {
    assert_eq!(render(source), expected);
}

#[test]
fn test_import() {
    assert_eq!(render("import math;"), "(import math)");
    assert_eq!(
        render("import json from \"std/json\";"),
        "(import json \"std/json\")"
    );
}

#[test]
fn test_nested_blocks() {
    assert_eq!(
        render("{ let x = 10; { let y = 20; } }"),
        "{ (let x 10) { (let y 20) } }"
    );
}

#[test]
fn test_multiple_statements() {
    let block = parse_source("let x = 10; let y = 20; let z = x + y;").unwrap();
    assert_eq!(block.body.len(), 3);
}

#[test]
fn test_empty_program() {
    let block = parse_source("").unwrap();
    assert!(block.body.is_empty());
}

#[test]
fn test_missing_nud_is_fatal() {
    let error = parse_source("let a = 1; let b = ;").unwrap_err();

    assert_eq!(
        error.get_error(),
        &ErrorImpl::MissingNudHandler {
            token: ";".to_string()
        }
    );
    assert_eq!(error.get_position().0, 19);
}

#[test]
fn test_missing_nud_mid_expression() {
    let error = parse_source("1 + * 2;").unwrap_err();

    assert_eq!(error.get_error_name(), "MissingNudHandler");
}

#[test]
fn test_missing_semicolon() {
    let error = parse_source("let x = 42").unwrap_err();

    assert_eq!(
        error.get_error(),
        &ErrorImpl::UnexpectedToken {
            token: "EOF".to_string()
        }
    );
}

#[test_case("let = 42;" ; "missing identifier")]
#[test_case("let x;" ; "neither type nor value")]
#[test_case("const x: int;" ; "constant without value")]
#[test_case("class { }" ; "class without name")]
#[test_case("new Point;" ; "new without body")]
fn test_detailed_structural_errors(source: &str) {
    let error = parse_source(source).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedTokenDetailed");
}

#[test_case("a.1;" ; "member needs identifier")]
#[test_case("f(1, 2;" ; "unclosed call")]
#[test_case("if x { y; " ; "unclosed block")]
#[test_case("function f(a int) { }" ; "parameter without colon")]
fn test_unexpected_token(source: &str) {
    let error = parse_source(source).unwrap_err();

    assert_eq!(error.get_error_name(), "UnexpectedToken");
}

#[test]
fn test_number_out_of_range() {
    let error = parse_source("99999999999999999999;").unwrap_err();

    assert_eq!(error.get_error_name(), "NumberParseError");
}

#[test]
fn test_missing_type_handler() {
    let error = parse_source("let x: = 5;").unwrap_err();

    assert_eq!(error.get_error_name(), "MissingNudHandler");
}

#[test]
fn test_custom_grammar_is_independent() {
    // Swapped precedence: `+` binds tighter than `*`.
    let mut grammar = Grammar::empty();
    grammar.nud(TokenKind::Int, parse_primary_expr);
    grammar.led(TokenKind::Plus, BindingPower::Multiplicative, parse_binary_expr);
    grammar.led(TokenKind::Star, BindingPower::Additive, parse_binary_expr);
    let grammar = Rc::new(grammar);

    let (tokens, _) = tokenize("1 * 2 + 3;".to_string(), None);
    let (_, result) = parse_with_grammar(tokens, Rc::new("custom".to_string()), Rc::clone(&grammar));
    assert_eq!(result.unwrap().body[0].to_string(), "(* 1 (+ 2 3));");

    // The default grammar is unaffected.
    assert_eq!(render("1 * 2 + 3;"), "(+ (* 1 2) 3);");

    // Tokens the custom grammar never registered cannot start an expression.
    let (tokens, _) = tokenize("let x = 1;".to_string(), None);
    let (_, result) = parse_with_grammar(tokens, Rc::new("custom".to_string()), grammar);
    assert_eq!(result.unwrap_err().get_error_name(), "MissingNudHandler");
}

#[test]
fn test_spans_cover_statements() {
    let block = parse_source("let value = 1 + 2;").unwrap();

    let span = block.body[0].get_span();
    assert_eq!(span.start.0, 0);
    assert_eq!(span.end.0, 18);
}
