use crate::{
    ast::{InfixOperator, PrefixOperator},
    interpreter::value::core::ValueType,
};

#[derive(Debug, Clone, PartialEq)]
/// Represents all errors that can be raised while a program executes.
///
/// The message strings are part of the language's observable surface; both
/// back ends must produce them verbatim, so every variant's `Display` output
/// is fixed.
pub enum RuntimeError {
    /// A name was not found in any environment frame or in the builtin
    /// registry.
    IdentifierNotFound {
        /// The unresolved name.
        name: String,
    },
    /// A prefix operator was applied to an operand it does not support.
    UnknownPrefixOperator {
        /// The operator.
        operator: PrefixOperator,
        /// The operand's type tag.
        right:    ValueType,
    },
    /// An infix operator was applied to same-typed operands it does not
    /// support.
    UnknownInfixOperator {
        /// The left operand's type tag.
        left:     ValueType,
        /// The operator.
        operator: InfixOperator,
        /// The right operand's type tag.
        right:    ValueType,
    },
    /// An infix operator was applied to operands of different types.
    TypeMismatch {
        /// The left operand's type tag.
        left:     ValueType,
        /// The operator.
        operator: InfixOperator,
        /// The right operand's type tag.
        right:    ValueType,
    },
    /// The index operator was applied to a value that cannot be indexed.
    IndexNotSupported {
        /// The receiver's type tag.
        receiver: ValueType,
    },
    /// A value that cannot be hashed was used as a hash key.
    UnusableHashKey {
        /// The key's type tag.
        key: ValueType,
    },
    /// The evaluator tried to call a value that is not callable.
    NotAFunction {
        /// The callee's type tag.
        callee: ValueType,
    },
    /// The virtual machine tried to call a value that is neither a closure
    /// nor a builtin.
    CallingNonFunction,
    /// A builtin was invoked with the wrong number of arguments.
    BuiltinArity {
        /// The number of arguments received.
        got:  usize,
        /// The number of arguments required.
        want: usize,
    },
    /// A user function was invoked with the wrong number of arguments.
    WrongArgumentCount {
        /// The number of parameters the function declares.
        want: usize,
        /// The number of arguments received.
        got:  usize,
    },
    /// A builtin received an argument of a type it does not handle.
    ArgumentNotSupported {
        /// The builtin's name.
        builtin: &'static str,
        /// The offending argument's type tag.
        got:     ValueType,
    },
    /// An array-only builtin received a non-array argument.
    ArgumentMustBeArray {
        /// The builtin's name.
        builtin: &'static str,
        /// The offending argument's type tag.
        got:     ValueType,
    },
    /// `join` received a non-array first argument.
    JoinFirstArgument {
        /// The offending argument's type tag.
        got: ValueType,
    },
    /// `join` received a non-string separator.
    JoinSecondArgument {
        /// The offending argument's type tag.
        got: ValueType,
    },
    /// `random` was called with arguments.
    RandomTakesNoArguments,
    /// `exp` was called with the wrong number of arguments.
    ExpArity,
    /// `exp` received a non-numeric argument.
    ExpArgumentNotNumeric,
    /// Element-wise tensor addition was attempted on tensors of different
    /// shapes.
    ShapeMismatch {
        /// The left tensor's shape.
        left:  Vec<i64>,
        /// The right tensor's shape.
        right: Vec<i64>,
    },
    /// A tensor literal's shape expression did not produce an integer array.
    TensorShapeNotIntegers,
    /// A tensor literal's data expression did not produce a numeric array.
    TensorDataNotNumbers,
    /// An imported source file could not be read.
    ImportRead {
        /// The host's description of the failure.
        message: String,
    },
    /// The virtual machine's value stack overflowed.
    StackOverflow,
    /// The virtual machine popped from an empty stack slot.
    StackUnderflow,
    /// The virtual machine fetched a byte that is not a known opcode.
    UnknownOpcode {
        /// The offending byte.
        opcode: u8,
    },
    /// The virtual machine referenced a builtin index outside the registry.
    UnknownBuiltin {
        /// The offending registry index.
        index: usize,
    },
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IdentifierNotFound { name } => write!(f, "identifier not found: {name}"),

            Self::UnknownPrefixOperator { operator, right } => {
                write!(f, "unknown operator: {operator}{right}")
            },
            Self::UnknownInfixOperator { left, operator, right } => {
                write!(f, "unknown operator: {left} {operator} {right}")
            },
            Self::TypeMismatch { left, operator, right } => {
                write!(f, "type mismatch: {left} {operator} {right}")
            },
            Self::IndexNotSupported { receiver } => {
                write!(f, "index operator not supported: {receiver}")
            },
            Self::UnusableHashKey { key } => write!(f, "unusable as hash key: {key}"),
            Self::NotAFunction { callee } => write!(f, "not a function: {callee}"),
            Self::CallingNonFunction => write!(f, "calling non-function and non-built-in"),

            Self::BuiltinArity { got, want } => {
                write!(f, "wrong number of arguments. got={got}, want={want}")
            },
            Self::WrongArgumentCount { want, got } => {
                write!(f, "wrong number of arguments: want={want}, got={got}")
            },
            Self::ArgumentNotSupported { builtin, got } => {
                write!(f, "argument to `{builtin}` not supported, got {got}")
            },
            Self::ArgumentMustBeArray { builtin, got } => {
                write!(f, "argument to `{builtin}` must be ARRAY, got {got}")
            },
            Self::JoinFirstArgument { got } => {
                write!(f, "first argument to `join` must be ARRAY, got {got}")
            },
            Self::JoinSecondArgument { got } => {
                write!(f, "second argument to `join` must be STRING, got {got}")
            },
            Self::RandomTakesNoArguments => write!(f, "random() takes no arguments"),
            Self::ExpArity => {
                write!(f, "wrong number of arguments. exp() requires exactly one argument.")
            },
            Self::ExpArgumentNotNumeric => write!(f, "argument to `exp` must be a number"),

            Self::ShapeMismatch { left, right } => {
                write!(f, "shapes are not equal {left:?} {right:?}")
            },
            Self::TensorShapeNotIntegers => {
                write!(f, "tensor shape must be an array of integers")
            },
            Self::TensorDataNotNumbers => write!(f, "tensor data must be an array of numbers"),

            Self::ImportRead { message } => write!(f, "error reading import file: {message}"),

            Self::StackOverflow => write!(f, "stack overflow"),
            Self::StackUnderflow => write!(f, "stack underflow"),
            Self::UnknownOpcode { opcode } => write!(f, "unknown opcode: {opcode}"),
            Self::UnknownBuiltin { index } => write!(f, "unknown builtin: {index}"),
        }
    }
}

impl std::error::Error for RuntimeError {}
