use std::{fmt::Display, rc::Rc};

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// A single VM instruction. The discriminant is the byte written to the
/// bytecode stream.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Push = 0,
    Dup = 1,
    Add = 2,
    Sub = 3,
    Mul = 4,
    Div = 5,
    Mod = 6,
    Power = 7,
    Print = 8,
}

impl Opcode {
    pub const ALL: [Opcode; 9] = [
        Opcode::Push,
        Opcode::Dup,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Mod,
        Opcode::Power,
        Opcode::Print,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Opcode::Push => "push",
            Opcode::Dup => "dup",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
            Opcode::Power => "power",
            Opcode::Print => "print",
        }
    }

    /// Looks up an opcode by mnemonic, ignoring ASCII case.
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        Opcode::ALL
            .iter()
            .copied()
            .find(|opcode| opcode.mnemonic().eq_ignore_ascii_case(mnemonic))
    }

    pub fn has_operand(&self) -> bool {
        matches!(self, Opcode::Push)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = ErrorImpl;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Opcode::ALL
            .get(byte as usize)
            .copied()
            .ok_or(ErrorImpl::UnknownOpcode { opcode: byte })
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

/// Assembles textual bytecode such as `push 5; push 3; add; print`.
///
/// Instructions are separated by `;` or newlines and blank instructions
/// are skipped. Error positions are byte offsets into `text`.
pub fn assemble(text: &str) -> Result<Vec<u8>, Error> {
    let file = Rc::new(String::from("<assembly>"));
    let mut code = Vec::new();
    let mut offset = 0;

    for segment in text.split([';', '\n']) {
        let start = offset + (segment.len() - segment.trim_start().len());
        offset += segment.len() + 1;

        let instruction = segment.trim();
        if instruction.is_empty() {
            continue;
        }

        let position = Position(start as u32, Rc::clone(&file));
        let mut parts = instruction.split_whitespace();
        let mnemonic = parts.next().unwrap_or_default();
        let operand = parts.next();

        let invalid = || {
            Error::new(
                ErrorImpl::InvalidInstruction {
                    instruction: instruction.to_string(),
                },
                position.clone(),
            )
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        let opcode = Opcode::from_mnemonic(mnemonic).ok_or_else(|| {
            Error::new(
                ErrorImpl::InvalidInstruction {
                    instruction: mnemonic.to_string(),
                },
                position.clone(),
            )
        })?;
        code.push(opcode as u8);

        match (opcode.has_operand(), operand) {
            (true, Some(operand)) => code.push(parse_operand(operand, &position)?),
            (true, None) => {
                return Err(Error::new(
                    ErrorImpl::MissingOperand {
                        instruction: opcode.to_string(),
                    },
                    position.clone(),
                ))
            }
            (false, Some(_)) => return Err(invalid()),
            (false, None) => {}
        }
    }

    Ok(code)
}

fn parse_operand(operand: &str, position: &Position) -> Result<u8, Error> {
    let value = operand.parse::<i64>().map_err(|_| {
        Error::new(
            ErrorImpl::InvalidInstruction {
                instruction: operand.to_string(),
            },
            position.clone(),
        )
    })?;

    u8::try_from(value).map_err(|_| {
        Error::new(
            ErrorImpl::OperandOutOfRange {
                operand: operand.to_string(),
            },
            position.clone(),
        )
    })
}
