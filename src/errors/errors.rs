use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => "UnrecognisedToken",
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::MissingNudHandler { .. } => "MissingNudHandler",
            ErrorImpl::MissingLedHandler { .. } => "MissingLedHandler",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::VariableNotDeclared { .. } => "VariableNotDeclared",
            ErrorImpl::AssignToConstant { .. } => "AssignToConstant",
            ErrorImpl::InvalidAssignmentTarget => "InvalidAssignmentTarget",
            ErrorImpl::UnexpectedArguments { .. } => "UnexpectedArguments",
            ErrorImpl::MissingArguments { .. } => "MissingArguments",
            ErrorImpl::ArgumentTypeMatchError { .. } => "ArgumentTypeMatchError",
            ErrorImpl::FieldTypeMatchError { .. } => "FieldTypeMatchError",
            ErrorImpl::TypeMatchError { .. } => "TypeMatchError",
            ErrorImpl::ReturnTypeMatchError { .. } => "ReturnTypeMatchError",
            ErrorImpl::ConditionNotBoolean { .. } => "ConditionNotBoolean",
            ErrorImpl::NotCallable { .. } => "NotCallable",
            ErrorImpl::NotAStruct { .. } => "NotAStruct",
            ErrorImpl::NotAList { .. } => "NotAList",
            ErrorImpl::UnknownProperty { .. } => "UnknownProperty",
            ErrorImpl::ThisOutsideClass => "ThisOutsideClass",
            ErrorImpl::ReturnOutsideFunction => "ReturnOutsideFunction",
            ErrorImpl::EmptyArrayLiteral => "EmptyArrayLiteral",
            ErrorImpl::ExpectedExplicitValue => "ExpectedExplicitValue",
            ErrorImpl::UnknownType { .. } => "UnknownType",
            ErrorImpl::ModuleAlreadyImported { .. } => "ModuleAlreadyImported",
            ErrorImpl::UnknownModule { .. } => "UnknownModule",
            ErrorImpl::UnknownOpcode { .. } => "UnknownOpcode",
            ErrorImpl::StackUnderflow => "StackUnderflow",
            ErrorImpl::MissingOperand { .. } => "MissingOperand",
            ErrorImpl::DivisionByZero => "DivisionByZero",
            ErrorImpl::DanglingReference { .. } => "DanglingReference",
            ErrorImpl::OutputFailed { .. } => "OutputFailed",
            ErrorImpl::InvalidInstruction { .. } => "InvalidInstruction",
            ErrorImpl::OperandOutOfRange { .. } => "OperandOutOfRange",
            ErrorImpl::UnsupportedInstruction { .. } => "UnsupportedInstruction",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedToken { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString { .. } => {
                ErrorTip::Suggestion(String::from("String literal is missing its closing `\"`"))
            }
            ErrorImpl::MissingNudHandler { token } => ErrorTip::Suggestion(format!(
                "`{}` cannot start an expression",
                token
            )),
            ErrorImpl::MissingLedHandler { token } => ErrorTip::Suggestion(format!(
                "`{}` cannot continue an expression",
                token
            )),
            ErrorImpl::UnexpectedToken { token } => ErrorTip::Suggestion(format!(
                "Unexpected token: `{}`, did you miss a semicolon?",
                token
            )),
            ErrorImpl::UnexpectedTokenDetailed { token, message } => {
                ErrorTip::Suggestion(format!("Unexpected token: `{}`, {}", token, message))
            }
            ErrorImpl::NumberParseError { token } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                token
            )),
            ErrorImpl::VariableNotDeclared { variable } => {
                ErrorTip::Suggestion(format!("Variable `{}` not declared", variable))
            }
            ErrorImpl::AssignToConstant { variable } => {
                ErrorTip::Suggestion(format!("`{}` is a constant and cannot be reassigned", variable))
            }
            ErrorImpl::InvalidAssignmentTarget => ErrorTip::Suggestion(String::from(
                "Only variables, members and indexes can be assigned to",
            )),
            ErrorImpl::UnexpectedArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::MissingArguments { expected, received } => ErrorTip::Suggestion(format!(
                "Expected {} arguments, received {}",
                expected, received
            )),
            ErrorImpl::ArgumentTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::FieldTypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected field type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::TypeMatchError { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::ReturnTypeMatchError { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Function returns `{}`, but the value is `{}`",
                    expected, received
                ))
            }
            ErrorImpl::ConditionNotBoolean { received } => {
                ErrorTip::Suggestion(format!("Conditions must be `bool`, received `{}`", received))
            }
            ErrorImpl::NotCallable { type_ } => {
                ErrorTip::Suggestion(format!("`{}` is not a function", type_))
            }
            ErrorImpl::NotAStruct { type_ } => {
                ErrorTip::Suggestion(format!("`{}` is not a struct or does not have members", type_))
            }
            ErrorImpl::NotAList { type_ } => {
                ErrorTip::Suggestion(format!("`{}` cannot be indexed", type_))
            }
            ErrorImpl::UnknownProperty { property, type_ } => ErrorTip::Suggestion(format!(
                "Property `{}` does not exist on type `{}`",
                property, type_
            )),
            ErrorImpl::ThisOutsideClass => {
                ErrorTip::Suggestion(String::from("`this` can only be used inside a class"))
            }
            ErrorImpl::ReturnOutsideFunction => {
                ErrorTip::Suggestion(String::from("`return` can only be used inside a function"))
            }
            ErrorImpl::EmptyArrayLiteral => ErrorTip::Suggestion(String::from(
                "Cannot infer the element type of `[]`, use `[]T{}` instead",
            )),
            ErrorImpl::ExpectedExplicitValue => ErrorTip::Suggestion(String::from(
                "Expected explicit value when no type is given",
            )),
            ErrorImpl::UnknownType { type_ } => {
                ErrorTip::Suggestion(format!("Unknown type `{}` found", type_))
            }
            ErrorImpl::ModuleAlreadyImported { module } => {
                ErrorTip::Suggestion(format!("Module `{}` is already imported", module))
            }
            ErrorImpl::UnknownModule { module } => {
                ErrorTip::Suggestion(format!("Module `{}` does not exist", module))
            }
            ErrorImpl::UnknownOpcode { opcode } => {
                ErrorTip::Suggestion(format!("Opcode `{}` is not an instruction", opcode))
            }
            ErrorImpl::StackUnderflow => {
                ErrorTip::Suggestion(String::from("Instruction needs more values on the stack"))
            }
            ErrorImpl::MissingOperand { instruction } => {
                ErrorTip::Suggestion(format!("`{}` expects an operand byte", instruction))
            }
            ErrorImpl::DivisionByZero => ErrorTip::None,
            ErrorImpl::DanglingReference { .. } => ErrorTip::None,
            ErrorImpl::OutputFailed { .. } => ErrorTip::None,
            ErrorImpl::InvalidInstruction { instruction } => {
                ErrorTip::Suggestion(format!("`{}` is not a known instruction", instruction))
            }
            ErrorImpl::OperandOutOfRange { operand } => ErrorTip::Suggestion(format!(
                "Operand `{}` does not fit in a byte (0-255)",
                operand
            )),
            ErrorImpl::UnsupportedInstruction { construct } => {
                ErrorTip::Suggestion(format!("`{}` cannot be compiled to bytecode", construct))
            }
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}:{}", self.internal_error, self.position.1, self.position.0)
    }
}

impl std::error::Error for Error {}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    // Lexical
    #[error("unrecognised token: {token:?}")]
    UnrecognisedToken { token: String },
    #[error("unterminated string: {partial:?}")]
    UnterminatedString { partial: String },

    // Grammar lookup
    #[error("no prefix handler for token {token:?}")]
    MissingNudHandler { token: String },
    #[error("no infix handler for token {token:?}")]
    MissingLedHandler { token: String },

    // Structure
    #[error("unexpected token: {token:?}")]
    UnexpectedToken { token: String },
    #[error("unexpected token ({message:?}): {token:?}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("error parsing number: {token:?}")]
    NumberParseError { token: String },

    // Type checking
    #[error("variable {variable:?} not declared")]
    VariableNotDeclared { variable: String },
    #[error("cannot assign to constant {variable:?}")]
    AssignToConstant { variable: String },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    UnexpectedArguments { expected: usize, received: usize },
    #[error("unexpected arguments: expected {expected:?}, received {received:?}")]
    MissingArguments { expected: usize, received: usize },
    #[error("argument types do not match: expected {expected:?}, received {received:?}")]
    ArgumentTypeMatchError { expected: String, received: String },
    #[error("field types do not match: expected {expected:?}, received {received:?}")]
    FieldTypeMatchError { expected: String, received: String },
    #[error("types do not match: expected {expected:?}, received {received:?}")]
    TypeMatchError { expected: String, received: String },
    #[error("return type {received:?} does not match expected type {expected:?}")]
    ReturnTypeMatchError { expected: String, received: String },
    #[error("condition must be bool, got {received:?}")]
    ConditionNotBoolean { received: String },
    #[error("{type_} is not a function")]
    NotCallable { type_: String },
    #[error("{type_} is not a struct or does not have members")]
    NotAStruct { type_: String },
    #[error("{type_} is not a list")]
    NotAList { type_: String },
    #[error("property {property:?} does not exist on type {type_}")]
    UnknownProperty { property: String, type_: String },
    #[error("'this' used outside of class context")]
    ThisOutsideClass,
    #[error("return used outside of a function")]
    ReturnOutsideFunction,
    #[error("cannot infer the type of an empty array literal")]
    EmptyArrayLiteral,
    #[error("expected explicit value when no type is given")]
    ExpectedExplicitValue,
    #[error("unknown type {type_} found")]
    UnknownType { type_: String },
    #[error("module {module:?} is already imported")]
    ModuleAlreadyImported { module: String },
    #[error("module {module:?} does not exist")]
    UnknownModule { module: String },

    // Virtual machine
    #[error("unknown opcode {opcode}")]
    UnknownOpcode { opcode: u8 },
    #[error("stack underflow")]
    StackUnderflow,
    #[error("{instruction} is missing its operand")]
    MissingOperand { instruction: String },
    #[error("division by zero")]
    DivisionByZero,
    #[error("stack refers to evicted object {id}")]
    DanglingReference { id: usize },
    #[error("failed to write output: {message}")]
    OutputFailed { message: String },

    // Assembler and bytecode compiler
    #[error("invalid instruction {instruction:?}")]
    InvalidInstruction { instruction: String },
    #[error("operand {operand} out of range")]
    OperandOutOfRange { operand: String },
    #[error("{construct} cannot be compiled to bytecode")]
    UnsupportedInstruction { construct: String },
}
