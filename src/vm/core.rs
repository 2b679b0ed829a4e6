use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{InfixOperator, PrefixOperator},
    bytecode::{Opcode, read_u8, read_u16},
    compiler::core::Bytecode,
    error::RuntimeError,
    interpreter::{
        builtins,
        value::{
            core::{Closure, CompiledFunction, HashPair, Value},
            ops, tensor::Tensor,
        },
    },
    vm::frame::Frame,
};

/// Capacity of the value stack.
pub const STACK_SIZE: usize = 2048;
/// Capacity of the globals array.
pub const GLOBALS_SIZE: usize = 65536;
/// Maximum call depth.
pub const MAX_FRAMES: usize = 1024;

/// The stack-based virtual machine.
///
/// One machine instance owns its constants, value stack, globals array and
/// frame stack; nothing is shared. `sp` always points at the next free stack
/// slot, so the top of the stack is `stack[sp - 1]` and the slot just
/// vacated by a pop is `stack[sp]`.
pub struct Vm {
    constants: Vec<Value>,
    stack:     Vec<Value>,
    sp:        usize,
    globals:   Vec<Value>,
    frames:    Vec<Frame>,
}

impl Vm {
    /// Creates a machine ready to run the given bytecode. The main program
    /// is wrapped in a parameterless closure occupying the first frame.
    #[must_use]
    pub fn new(bytecode: Bytecode) -> Self {
        let main_function = Rc::new(CompiledFunction { instructions:   bytecode.instructions,
                                                       num_locals:     0,
                                                       num_parameters: 0, });
        let main_closure = Rc::new(Closure { function: main_function,
                                             free:     Vec::new(), });

        let mut frames = Vec::with_capacity(MAX_FRAMES);
        frames.push(Frame::new(main_closure, 0));

        Self { constants: bytecode.constants,
               stack: vec![Value::Null; STACK_SIZE],
               sp: 0,
               globals: vec![Value::Null; GLOBALS_SIZE],
               frames }
    }

    /// Runs the main loop until the outermost frame's instructions are
    /// exhausted.
    ///
    /// Each iteration decodes the opcode under the current frame's
    /// instruction pointer, advances the pointer past the opcode and its
    /// operands, and executes the stack effect. Function frames never fall
    /// off the end of their instructions; the compiler guarantees they
    /// terminate in a return, which unwinds them here.
    ///
    /// # Errors
    /// The machine halts on the first runtime error and returns it; the
    /// stack is left as-is for inspection.
    ///
    /// # Example
    /// ```
    /// use tensora::{compile, interpreter::value::core::Value, vm::core::Vm};
    ///
    /// let mut vm = Vm::new(compile("1 + 2;").unwrap());
    /// vm.run().unwrap();
    ///
    /// assert_eq!(vm.last_popped(), Value::Integer(3));
    /// ```
    #[allow(clippy::too_many_lines)]
    pub fn run(&mut self) -> Result<(), RuntimeError> {
        loop {
            let Some(frame) = self.frames.last() else { break };
            if frame.ip >= frame.instructions().len() {
                break;
            }

            let closure = Rc::clone(&frame.closure);
            let ins = &closure.function.instructions.0;
            let ip = frame.ip;

            let op = Opcode::try_from(ins[ip])?;
            self.set_ip(ip + 1);

            match op {
                Opcode::Constant => {
                    let index = read_u16(ins, ip + 1);
                    self.set_ip(ip + 3);
                    self.push(self.constants[index].clone())?;
                },
                Opcode::Pop => {
                    self.pop()?;
                },
                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div => {
                    let right = self.pop()?;
                    let left = self.pop()?;
                    let result = ops::apply_infix(binary_operator(op), &left, &right)?;
                    self.push(result)?;
                },
                Opcode::Equal | Opcode::NotEqual | Opcode::GreaterThan => {
                    let right = self.pop()?;
                    let left = self.pop()?;
                    let result = ops::apply_infix(binary_operator(op), &left, &right)?;
                    self.push(result)?;
                },
                Opcode::True => self.push(Value::Boolean(true))?,
                Opcode::False => self.push(Value::Boolean(false))?,
                Opcode::Null => self.push(Value::Null)?,
                Opcode::Bang => {
                    let operand = self.pop()?;
                    self.push(Value::Boolean(!operand.is_truthy()))?;
                },
                Opcode::Minus => {
                    let operand = self.pop()?;
                    let result = ops::apply_prefix(PrefixOperator::Minus, &operand)?;
                    self.push(result)?;
                },
                Opcode::JumpNotTruthy => {
                    let target = read_u16(ins, ip + 1);
                    self.set_ip(ip + 3);

                    let condition = self.pop()?;
                    if !condition.is_truthy() {
                        self.set_ip(target);
                    }
                },
                Opcode::Jump => {
                    let target = read_u16(ins, ip + 1);
                    self.set_ip(target);
                },
                Opcode::SetGlobal => {
                    let index = read_u16(ins, ip + 1);
                    self.set_ip(ip + 3);
                    self.globals[index] = self.pop()?;
                },
                Opcode::GetGlobal => {
                    let index = read_u16(ins, ip + 1);
                    self.set_ip(ip + 3);
                    self.push(self.globals[index].clone())?;
                },
                Opcode::SetLocal => {
                    let index = read_u8(ins, ip + 1);
                    self.set_ip(ip + 2);

                    let bp = self.current_bp();
                    self.stack[bp + index] = self.pop()?;
                },
                Opcode::GetLocal => {
                    let index = read_u8(ins, ip + 1);
                    self.set_ip(ip + 2);

                    let bp = self.current_bp();
                    self.push(self.stack[bp + index].clone())?;
                },
                Opcode::GetBuiltin => {
                    let index = read_u8(ins, ip + 1);
                    self.set_ip(ip + 2);

                    let builtin =
                        builtins::get(index).ok_or(RuntimeError::UnknownBuiltin { index })?;
                    self.push(Value::Builtin(builtin))?;
                },
                Opcode::GetFree => {
                    let index = read_u8(ins, ip + 1);
                    self.set_ip(ip + 2);
                    self.push(closure.free[index].clone())?;
                },
                Opcode::CurrentClosure => {
                    self.push(Value::Closure(Rc::clone(&closure)))?;
                },
                Opcode::Array => {
                    let count = read_u16(ins, ip + 1);
                    self.set_ip(ip + 3);

                    let start = self.sp.checked_sub(count).ok_or(RuntimeError::StackUnderflow)?;
                    let elements = self.stack[start..self.sp].to_vec();
                    self.sp = start;
                    self.push(Value::from(elements))?;
                },
                Opcode::Hash => {
                    let count = read_u16(ins, ip + 1);
                    self.set_ip(ip + 3);

                    let start = self.sp.checked_sub(count).ok_or(RuntimeError::StackUnderflow)?;
                    let hash = self.build_hash(start)?;
                    self.sp = start;
                    self.push(hash)?;
                },
                Opcode::Index => {
                    let index = self.pop()?;
                    let left = self.pop()?;
                    let result = ops::apply_index(&left, &index)?;
                    self.push(result)?;
                },
                Opcode::Call => {
                    let argument_count = read_u8(ins, ip + 1);
                    self.set_ip(ip + 2);
                    self.execute_call(argument_count)?;
                },
                Opcode::ReturnValue => {
                    let value = self.pop()?;
                    self.pop_frame()?;
                    self.push(value)?;
                },
                Opcode::Return => {
                    self.pop_frame()?;
                    self.push(Value::Null)?;
                },
                Opcode::Closure => {
                    let constant = read_u16(ins, ip + 1);
                    let free_count = read_u8(ins, ip + 3);
                    self.set_ip(ip + 4);
                    self.push_closure(constant, free_count)?;
                },
                Opcode::Tensor => {
                    self.set_ip(ip + 3);

                    let data = self.pop()?;
                    let shape = self.pop()?;
                    let tensor = Tensor::from_values(&shape, &data)?;
                    self.push(tensor.into())?;
                },
            }
        }

        Ok(())
    }

    /// The slot just vacated by the most recent pop.
    ///
    /// Every expression statement compiles to its expression followed by a
    /// `Pop`, so after a program runs this is the value of its final
    /// expression statement.
    #[must_use]
    pub fn last_popped(&self) -> Value {
        self.stack.get(self.sp).cloned().unwrap_or(Value::Null)
    }

    /// Invokes the callable sitting below `argument_count` arguments on the
    /// stack.
    ///
    /// A closure gets a fresh frame whose base pointer covers the argument
    /// slots, with room reserved above them for its remaining locals. A
    /// builtin is invoked immediately; its arguments and the callee slot are
    /// dropped and the result takes their place.
    ///
    /// # Errors
    /// - [`RuntimeError::WrongArgumentCount`] when a closure's parameter
    ///   count does not match.
    /// - [`RuntimeError::StackOverflow`] at the frame limit.
    /// - [`RuntimeError::CallingNonFunction`] for any other callee.
    fn execute_call(&mut self, argument_count: usize) -> Result<(), RuntimeError> {
        let callee_slot = self.sp
                              .checked_sub(1 + argument_count)
                              .ok_or(RuntimeError::StackUnderflow)?;
        let callee = self.stack[callee_slot].clone();

        match callee {
            Value::Closure(callee_closure) => {
                if argument_count != callee_closure.function.num_parameters {
                    return Err(RuntimeError::WrongArgumentCount { want:
                                                                      callee_closure.function
                                                                                    .num_parameters,
                                                                  got:  argument_count, });
                }
                if self.frames.len() >= MAX_FRAMES {
                    return Err(RuntimeError::StackOverflow);
                }

                let bp = self.sp - argument_count;
                self.sp = bp + callee_closure.function.num_locals;
                self.frames.push(Frame::new(callee_closure, bp));
                Ok(())
            },
            Value::Builtin(builtin) => {
                let args = self.stack[self.sp - argument_count..self.sp].to_vec();
                let result = builtin.call(&args)?;

                // Drop the arguments and the callee, then leave the result.
                self.sp -= argument_count + 1;
                self.push(result)
            },
            _ => Err(RuntimeError::CallingNonFunction),
        }
    }

    /// Builds a closure from a constant-pool function, capturing the top
    /// `free_count` stack values in push order.
    fn push_closure(&mut self, constant: usize, free_count: usize) -> Result<(), RuntimeError> {
        let value = self.constants[constant].clone();
        let Value::CompiledFunction(function) = value else {
            return Err(RuntimeError::NotAFunction { callee: value.type_of() });
        };

        let start = self.sp.checked_sub(free_count).ok_or(RuntimeError::StackUnderflow)?;
        let free = self.stack[start..self.sp].to_vec();
        self.sp = start;

        self.push(Value::Closure(Rc::new(Closure { function, free })))
    }

    /// Collects the stack values from `start` up to `sp` into key/value
    /// pairs.
    fn build_hash(&self, start: usize) -> Result<Value, RuntimeError> {
        let mut pairs = HashMap::new();

        let mut index = start;
        while index < self.sp {
            let key = self.stack[index].clone();
            let value = self.stack[index + 1].clone();

            let hash_key = key.hash_key()?;
            pairs.insert(hash_key, HashPair { key, value });

            index += 2;
        }

        Ok(Value::Hash(Rc::new(pairs)))
    }

    /// Unwinds the current frame, resetting the stack pointer below its
    /// callee slot.
    fn pop_frame(&mut self) -> Result<(), RuntimeError> {
        let frame = self.frames.pop().ok_or(RuntimeError::StackUnderflow)?;
        self.sp = frame.bp.saturating_sub(1);
        Ok(())
    }

    fn push(&mut self, value: Value) -> Result<(), RuntimeError> {
        if self.sp >= STACK_SIZE {
            return Err(RuntimeError::StackOverflow);
        }

        self.stack[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, RuntimeError> {
        if self.sp == 0 {
            return Err(RuntimeError::StackUnderflow);
        }

        self.sp -= 1;
        Ok(self.stack[self.sp].clone())
    }

    fn current_bp(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.bp)
    }

    fn set_ip(&mut self, ip: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.ip = ip;
        }
    }
}

/// Maps an arithmetic or comparison opcode onto the shared operator
/// semantics.
const fn binary_operator(op: Opcode) -> InfixOperator {
    match op {
        Opcode::Add => InfixOperator::Add,
        Opcode::Sub => InfixOperator::Sub,
        Opcode::Mul => InfixOperator::Mul,
        Opcode::Div => InfixOperator::Div,
        Opcode::Equal => InfixOperator::Equal,
        Opcode::NotEqual => InfixOperator::NotEqual,
        _ => InfixOperator::GreaterThan,
    }
}
