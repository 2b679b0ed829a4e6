/// The builtin function registry.
///
/// Declares the host functions callable from the language (`len`, `puts`,
/// `push`, ...) behind dense, stable indices shared by the evaluator, the
/// compiler and the virtual machine.
///
/// # Responsibilities
/// - Implements the core builtins with their exact error messages.
/// - Exposes lookup by name (evaluator) and by index (virtual machine).
/// - Provides the registration hook hosts use to extend the language.
pub mod builtins;

/// Lexical environments for the tree-walking evaluator.
///
/// An environment is a frame mapping names to values plus an optional parent
/// frame. Closures share frames by reference, so bindings added to a frame
/// are visible through every capture of it.
pub mod environment;

/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator traverses the AST, evaluates expressions and statements,
/// applies functions and builtins, and produces runtime values. It is the
/// direct-interpretation back end of the language.
///
/// # Responsibilities
/// - Evaluates AST nodes, performing all supported operations.
/// - Manages the environment chain for lexical scoping and closures.
/// - Short-circuits runtime errors outward through every evaluation rule.
pub mod evaluator;

/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads the raw source text and produces a stream of tokens, each
/// carrying its kind, the matched text, and its source line. This is the
/// first stage of both back ends' shared front end.
///
/// # Responsibilities
/// - Converts the input character stream into tokens with type and source
///   location.
/// - Handles numeric and string literals, identifiers, operators, and
///   keywords.
/// - Marks unrecognizable characters as illegal tokens for the parser to
///   report.
pub mod lexer;

/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// A Pratt parser: every token kind may have one prefix and one infix parse
/// rule, and expressions extend while the next token binds more tightly than
/// the current context. Errors accumulate; parsing continues wherever
/// possible.
///
/// # Responsibilities
/// - Converts tokens into structured AST nodes (expressions, statements).
/// - Enforces the grammar, recording errors with source line information.
/// - Names functions bound by `let` so they can recurse under the compiler.
pub mod parser;

/// The value module defines the runtime data types shared by both back ends.
///
/// This module declares the `Value` enum and all supported variants, hash
/// key derivation, the operator semantics both back ends share, and the
/// tensor type.
///
/// # Responsibilities
/// - Defines the `Value` enum and the symbolic type tags used in errors.
/// - Implements inspection (textual form) for every variant.
/// - Implements prefix/infix operator application exactly once.
pub mod value;
