//! Unit tests for error handling.

use std::rc::Rc;

use test_case::test_case;

use crate::errors::errors::{Error, ErrorImpl, ErrorTip};
use crate::Position;

fn at(offset: u32) -> Position {
    Position(offset, Rc::new("test.cx".to_string()))
}

#[test_case(ErrorImpl::UnrecognisedToken { token: "@".to_string() }, "UnrecognisedToken")]
#[test_case(ErrorImpl::MissingNudHandler { token: ")".to_string() }, "MissingNudHandler")]
#[test_case(ErrorImpl::UnexpectedToken { token: "}".to_string() }, "UnexpectedToken")]
#[test_case(ErrorImpl::TypeMatchError { expected: "int".to_string(), received: "string".to_string() }, "TypeMatchError")]
#[test_case(ErrorImpl::UnknownModule { module: "net".to_string() }, "UnknownModule")]
#[test_case(ErrorImpl::StackUnderflow, "StackUnderflow")]
#[test_case(ErrorImpl::UnknownOpcode { opcode: 42 }, "UnknownOpcode")]
fn test_error_name(error: ErrorImpl, name: &str) {
    assert_eq!(Error::new(error, at(0)).get_error_name(), name);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::UnexpectedToken {
            token: "identifier".to_string(),
        },
        at(42),
    );

    assert_eq!(error.get_position().0, 42);
    assert_eq!(error.get_position().1.as_str(), "test.cx");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(
        ErrorImpl::UnrecognisedToken {
            token: "@".to_string(),
        },
        at(0),
    );

    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::VariableNotDeclared {
            variable: "foo".to_string(),
        },
        at(0),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Variable `foo` not declared"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_error_display() {
    let error = Error::new(ErrorImpl::DivisionByZero, at(7));
    assert_eq!(error.to_string(), "division by zero at test.cx:7");
}
