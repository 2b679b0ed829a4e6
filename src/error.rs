/// Parsing errors.
///
/// Defines all error types that can occur while parsing source code into an
/// AST. Parse errors are accumulated by the parser and surfaced together
/// after the whole input has been consumed.
pub mod parse_error;

/// Compilation errors.
///
/// Contains the error types raised while translating an AST into bytecode,
/// such as references to undefined names or unreadable imports.
pub mod compile_error;

/// Runtime errors.
///
/// Contains all error types that can be raised while a program executes, on
/// either back end: type mismatches, unknown operators, bad builtin
/// arguments, and virtual machine faults.
pub mod runtime_error;

pub use compile_error::CompileError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// The top-level error type returned by the crate's entry points.
///
/// Each phase of the pipeline reports through its own variant, so a host can
/// distinguish a rejected program from one that failed while running.
#[derive(Debug)]
pub enum Error {
    /// The parser rejected the source; all accumulated messages are kept.
    Parse(Vec<ParseError>),
    /// The compiler rejected the parsed program.
    Compile(CompileError),
    /// The program failed while executing.
    Runtime(RuntimeError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(errors) => {
                let messages = errors.iter()
                                     .map(ToString::to_string)
                                     .collect::<Vec<_>>()
                                     .join("\n");
                write!(f, "{messages}")
            },
            Self::Compile(e) => write!(f, "{e}"),
            Self::Runtime(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Self {
        Self::Compile(e)
    }
}

impl From<RuntimeError> for Error {
    fn from(e: RuntimeError) -> Self {
        Self::Runtime(e)
    }
}
