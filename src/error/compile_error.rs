#[derive(Debug, Clone, PartialEq, Eq)]
/// Represents all errors that can occur while compiling an AST to bytecode.
pub enum CompileError {
    /// A name was referenced that no enclosing scope defines.
    UndefinedVariable {
        /// The unresolved name.
        name: String,
    },
    /// An imported source file could not be read.
    ImportRead {
        /// The host's description of the failure.
        message: String,
    },
}

impl std::fmt::Display for CompileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndefinedVariable { name } => write!(f, "undefined variable {name}"),
            Self::ImportRead { message } => write!(f, "error reading import file: {message}"),
        }
    }
}

impl std::error::Error for CompileError {}
