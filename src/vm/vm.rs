use std::{collections::HashMap, io::Write, rc::Rc};

use tracing::{debug, trace};

use super::{
    bytecode::Opcode,
    heap::{Heap, ObjectRef},
};
use crate::{
    errors::errors::{Error, ErrorImpl},
    Position,
};

pub type InstructionHandler<W> = fn(&mut Vm<W>) -> Result<(), Error>;

/// Bytecode interpreter writing `print` output to `W`.
pub struct Vm<W: Write> {
    code: Vec<u8>,
    pc: usize,
    stack: Vec<ObjectRef>,
    heap: Heap,
    handlers: HashMap<u8, InstructionHandler<W>>,
    output: W,
    file: Rc<String>,
}

impl<W: Write> Vm<W> {
    pub fn new(code: Vec<u8>, output: W) -> Self {
        let mut vm = Vm {
            code,
            pc: 0,
            stack: Vec::new(),
            heap: Heap::new(),
            handlers: HashMap::new(),
            output,
            file: Rc::new(String::from("<bytecode>")),
        };

        vm.handler(Opcode::Push, Vm::push);
        vm.handler(Opcode::Dup, Vm::dup);
        vm.handler(Opcode::Add, |vm| vm.binary(|left, right| Ok(left.wrapping_add(right))));
        vm.handler(Opcode::Sub, |vm| vm.binary(|left, right| Ok(left.wrapping_sub(right))));
        vm.handler(Opcode::Mul, |vm| vm.binary(|left, right| Ok(left.wrapping_mul(right))));
        vm.handler(Opcode::Div, |vm| {
            vm.binary(|left, right| match right {
                0 => Err(ErrorImpl::DivisionByZero),
                _ => Ok(left.wrapping_div(right)),
            })
        });
        vm.handler(Opcode::Mod, |vm| {
            vm.binary(|left, right| match right {
                0 => Err(ErrorImpl::DivisionByZero),
                _ => Ok(left.wrapping_rem(right)),
            })
        });
        vm.handler(Opcode::Power, |vm| vm.binary(|left, right| Ok(power(left, right))));
        vm.handler(Opcode::Print, Vm::print);

        vm
    }

    /// Installs `handler` for `opcode`, replacing any previous one.
    pub fn handler(&mut self, opcode: Opcode, handler: InstructionHandler<W>) {
        self.handlers.insert(opcode as u8, handler);
    }

    /// Runs the program and drains one residual value off the stack.
    pub fn run(&mut self) -> Result<(), Error> {
        self.execute()?;

        if !self.stack.is_empty() {
            self.pop()?;
        }

        Ok(())
    }

    /// Runs the program, leaving the stack and heap as the last
    /// instruction left them.
    pub fn execute(&mut self) -> Result<(), Error> {
        while self.pc < self.code.len() {
            let opcode = self.code[self.pc];
            let handler = self.handlers.get(&opcode).copied().ok_or_else(|| {
                Error::new(ErrorImpl::UnknownOpcode { opcode }, self.position())
            })?;

            trace!(pc = self.pc, opcode, "dispatch");
            handler(self)?;
            self.pc += 1;
        }

        debug!(
            stack = self.stack.len(),
            heap = self.heap.len(),
            "execution finished"
        );
        Ok(())
    }

    pub fn push_value(&mut self, value: i64) {
        let handle = self.heap.allocate(value);
        self.stack.push(handle);
    }

    /// Pops the top handle and releases it, returning its value.
    pub fn pop(&mut self) -> Result<i64, Error> {
        let handle = self
            .stack
            .pop()
            .ok_or_else(|| Error::new(ErrorImpl::StackUnderflow, self.position()))?;
        trace!(id = handle.0, "popped");

        self.heap
            .release(handle)
            .ok_or_else(|| self.dangling(handle))
    }

    pub fn peek(&self) -> Result<ObjectRef, Error> {
        self.stack
            .last()
            .copied()
            .ok_or_else(|| Error::new(ErrorImpl::StackUnderflow, self.position()))
    }

    pub fn stack(&self) -> &[ObjectRef] {
        &self.stack
    }

    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Flushes the output and hands it back.
    pub fn finish(mut self) -> Result<W, Error> {
        match self.output.flush() {
            Ok(()) => Ok(self.output),
            Err(error) => Err(self.output_failed(error)),
        }
    }

    fn position(&self) -> Position {
        Position(self.pc as u32, Rc::clone(&self.file))
    }

    fn output_failed(&self, error: std::io::Error) -> Error {
        Error::new(
            ErrorImpl::OutputFailed {
                message: error.to_string(),
            },
            self.position(),
        )
    }

    fn dangling(&self, handle: ObjectRef) -> Error {
        Error::new(ErrorImpl::DanglingReference { id: handle.0 }, self.position())
    }

    fn value_of(&self, handle: ObjectRef) -> Result<i64, Error> {
        self.heap
            .get(handle)
            .map(|object| object.value)
            .ok_or_else(|| self.dangling(handle))
    }

    fn push(vm: &mut Self) -> Result<(), Error> {
        let operand = vm.code.get(vm.pc + 1).copied().ok_or_else(|| {
            Error::new(
                ErrorImpl::MissingOperand {
                    instruction: Opcode::Push.to_string(),
                },
                vm.position(),
            )
        })?;

        vm.pc += 1;
        vm.push_value(operand as i64);
        Ok(())
    }

    fn dup(vm: &mut Self) -> Result<(), Error> {
        let handle = vm.peek()?;

        if !vm.heap.retain(handle) {
            return Err(vm.dangling(handle));
        }
        vm.stack.push(handle);
        Ok(())
    }

    fn print(vm: &mut Self) -> Result<(), Error> {
        let value = vm.value_of(vm.peek()?)?;

        writeln!(vm.output, "{}", value).map_err(|error| vm.output_failed(error))
    }

    fn binary(&mut self, op: impl FnOnce(i64, i64) -> Result<i64, ErrorImpl>) -> Result<(), Error> {
        let right = self.pop()?;
        let left = self.pop()?;

        let value = op(left, right).map_err(|error| Error::new(error, self.position()))?;
        self.push_value(value);
        Ok(())
    }
}

/// `base` multiplied by itself `exponent` times, wrapping on overflow.
/// Exponents below one yield 1.
fn power(base: i64, exponent: i64) -> i64 {
    let mut result: i64 = 1;
    let mut base = base;
    let mut exponent = exponent.max(0) as u64;

    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exponent >>= 1;
    }

    result
}
