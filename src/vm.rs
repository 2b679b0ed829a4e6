/// The fetch/decode/dispatch loop and the machine state: value stack,
/// globals, and call frames.
pub mod core;

/// Call frames: the closure being executed, its instruction pointer, and its
/// base pointer into the value stack.
pub mod frame;
