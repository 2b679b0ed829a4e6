//! # tensora
//!
//! tensora is a small, dynamically typed scripting language with first-class
//! functions, closures, arrays, hashes, and a tensor value type. One shared
//! front end (lexer and Pratt parser) feeds two interchangeable back ends: a
//! tree-walking evaluator and a bytecode compiler with a stack virtual
//! machine. Both back ends agree on observable behavior for every construct
//! they share.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    compiler::core::{Bytecode, Compiler},
    error::Error,
    interpreter::{
        environment::Environment, evaluator::core::eval_program, parser::core::Parser,
        value::core::Value,
    },
    vm::core::Vm,
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr`, `Statement` and `Program` types that
/// represent source code as a tree. The AST is built by the parser and
/// consumed by both back ends.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source line numbers to every node.
/// - Renders nodes back to a canonical source form for diagnostics and
///   deterministic compilation.
pub mod ast;

/// Defines the virtual machine's instruction encoding.
///
/// Instructions are byte sequences: one opcode byte plus big-endian operands
/// at fixed per-opcode widths. This module owns the opcode set, the
/// assembler, operand decoding, and the disassembler.
///
/// # Responsibilities
/// - Declares every opcode with its operand widths and mnemonic.
/// - Encodes instructions (`make`) and decodes operands back out.
/// - Renders instruction sequences as human-readable disassembly.
pub mod bytecode;

/// Translates the AST into bytecode.
///
/// The compiler walks the tree emitting instructions, resolving names
/// through a scoped symbol table, patching jump targets, and assembling
/// closures with their captured free variables.
///
/// # Responsibilities
/// - Compiles every language construct to stack-machine instructions.
/// - Tracks scopes so globals, locals, free variables, builtins and function
///   self-references each load through the right opcode.
/// - Splices imported programs into the current compilation scope.
pub mod compiler;

/// Provides unified error types for every phase.
///
/// This module defines the errors raised while parsing, compiling, or
/// running code, and the top-level `Error` the entry points return. Message
/// strings are part of the language's observable surface.
///
/// # Responsibilities
/// - Defines error enums for all failure modes with fixed `Display` forms.
/// - Distinguishes rejected programs from failed executions.
/// - Supports integration with standard error handling traits.
pub mod error;

/// The shared front end and the tree-walking back end.
///
/// This module ties together lexing, parsing, runtime values, environments,
/// builtins, and the evaluator.
///
/// # Responsibilities
/// - Coordinates lexer, parser, value types and the evaluator.
/// - Owns the builtin registry both back ends resolve against.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;

/// Executes bytecode on a value stack.
///
/// The virtual machine runs the compiler's output: a fetch/decode/dispatch
/// loop over call frames, with a fixed-capacity value stack and globals
/// array.
///
/// # Responsibilities
/// - Dispatches every opcode with its exact stack effect.
/// - Manages call frames, closures, and builtin invocation.
/// - Surfaces runtime errors and halts on the first one.
pub mod vm;

/// Runs a program on the tree-walking evaluator and returns its final value.
///
/// The program's value is the value of its last expression statement; a
/// program ending in a binding yields `null`.
///
/// # Errors
/// - [`Error::Parse`] with every accumulated parser message when the source
///   is rejected.
/// - [`Error::Runtime`] when evaluation fails.
///
/// # Examples
/// ```
/// use tensora::{interpreter::value::core::Value, run_evaluator};
///
/// let result = run_evaluator("let add = fn(x, y) { x + y }; add(5, 5);").unwrap();
/// assert_eq!(result, Value::Integer(10));
///
/// // An undefined name is a runtime error.
/// assert!(run_evaluator("missing;").is_err());
/// ```
pub fn run_evaluator(source: &str) -> Result<Value, Error> {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        return Err(Error::Parse(parser.errors));
    }

    let env = Environment::new();
    let result = eval_program(&program, &env)?;

    Ok(result.unwrap_or(Value::Null))
}

/// Compiles a program to bytecode, runs it on the virtual machine, and
/// returns the value of its final expression statement.
///
/// # Errors
/// - [`Error::Parse`] with every accumulated parser message when the source
///   is rejected.
/// - [`Error::Compile`] when the program references undefined names or an
///   import cannot be read.
/// - [`Error::Runtime`] when execution fails.
///
/// # Examples
/// ```
/// use tensora::{interpreter::value::core::Value, run_compiled};
///
/// let result = run_compiled("let add = fn(x, y) { x + y }; add(5, 5);").unwrap();
/// assert_eq!(result, Value::Integer(10));
/// ```
pub fn run_compiled(source: &str) -> Result<Value, Error> {
    let mut vm = Vm::new(compile(source)?);
    vm.run()?;

    Ok(vm.last_popped())
}

/// Compiles a program to bytecode without running it.
///
/// # Errors
/// [`Error::Parse`] or [`Error::Compile`], as for [`run_compiled`].
pub fn compile(source: &str) -> Result<Bytecode, Error> {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    if !parser.errors.is_empty() {
        return Err(Error::Parse(parser.errors));
    }

    let mut compiler = Compiler::new();
    compiler.compile(&program)?;

    Ok(compiler.bytecode())
}
