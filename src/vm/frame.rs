use std::rc::Rc;

use crate::{bytecode::Instructions, interpreter::value::core::Closure};

/// One record on the virtual machine's frame stack.
///
/// A frame owns the closure being executed, the instruction pointer into its
/// bytecode, and the base pointer marking where the frame's locals begin on
/// the value stack.
#[derive(Debug)]
pub struct Frame {
    /// The closure executing in this frame.
    pub closure: Rc<Closure>,
    /// Index of the next instruction byte to execute.
    pub ip:      usize,
    /// The frame's base pointer into the value stack. Locals live at
    /// `stack[bp..bp + num_locals]`.
    pub bp:      usize,
}

impl Frame {
    /// Creates a frame that starts executing `closure` from its first
    /// instruction.
    #[must_use]
    pub const fn new(closure: Rc<Closure>, bp: usize) -> Self {
        Self { closure, ip: 0, bp }
    }

    /// The instructions of the closure this frame executes.
    #[must_use]
    pub fn instructions(&self) -> &Instructions {
        &self.closure.function.instructions
    }
}
