//! Type representations.
//!
//! The same `Type` value is produced by the type parser for annotations
//! and by the type checker for inferred types:
//!
//! - `Symbol` names a primitive (`int`, `float`, `string`, `bool`) or a class
//! - `List` is a homogeneous list, written `[]T`
//! - `Function` is the signature of a declared or literal function
//! - `Struct` is the resolved shape of a class
//!
//! Equality is structural, except that structs compare by class name. A
//! class's methods can mention the class before all of its members are
//! known, so two views of the same class may list different members.

use std::fmt::Display;

pub const INT: &str = "int";
pub const FLOAT: &str = "float";
pub const STRING: &str = "string";
pub const BOOL: &str = "bool";
pub const VOID: &str = "void";

#[derive(Debug, Clone)]
pub enum Type {
    Symbol(String),
    List(Box<Type>),
    Function {
        parameters: Vec<Type>,
        return_type: Box<Type>,
    },
    Struct {
        name: String,
        members: Vec<(String, Type)>,
    },
}

impl Type {
    pub fn symbol(name: &str) -> Self {
        Type::Symbol(name.to_string())
    }

    pub fn int() -> Self {
        Type::symbol(INT)
    }

    pub fn float() -> Self {
        Type::symbol(FLOAT)
    }

    pub fn string() -> Self {
        Type::symbol(STRING)
    }

    pub fn bool() -> Self {
        Type::symbol(BOOL)
    }

    pub fn void() -> Self {
        Type::symbol(VOID)
    }

    pub fn list(underlying: Type) -> Self {
        Type::List(Box::new(underlying))
    }

    /// Type of a struct member, if this is a struct that has it.
    pub fn get_member_type(&self, member: &str) -> Option<&Type> {
        match self {
            Type::Struct { members, .. } => members
                .iter()
                .find(|(name, _)| name == member)
                .map(|(_, ty)| ty),
            _ => None,
        }
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Type::Symbol(left), Type::Symbol(right)) => left == right,
            (Type::List(left), Type::List(right)) => left == right,
            (
                Type::Function {
                    parameters: left_parameters,
                    return_type: left_return,
                },
                Type::Function {
                    parameters: right_parameters,
                    return_type: right_return,
                },
            ) => left_parameters == right_parameters && left_return == right_return,
            (Type::Struct { name: left, .. }, Type::Struct { name: right, .. }) => left == right,
            _ => false,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Symbol(name) => write!(f, "{}", name),
            Type::List(underlying) => write!(f, "[]{}", underlying),
            Type::Function {
                parameters,
                return_type,
            } => {
                write!(f, "function(")?;
                for (i, parameter) in parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", parameter)?;
                }
                write!(f, "): {}", return_type)
            }
            Type::Struct { name, .. } => write!(f, "{}", name),
        }
    }
}
