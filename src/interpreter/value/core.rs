use std::{cell::RefCell, collections::HashMap, fmt, rc::Rc};

use crate::{
    ast::Block,
    bytecode::Instructions,
    interpreter::{
        builtins::Builtin,
        environment::Env,
        value::{hash_key::HashKey, tensor::Tensor},
    },
};

/// Represents a runtime value.
///
/// This enum models every type a program can produce. Heap-backed variants
/// (strings, arrays, hashes, tensors, functions) are reference counted, so
/// cloning a value is cheap and aliases share the underlying allocation.
/// Arrays are the only variant with interior mutability: the `push` and `pop`
/// builtins modify them in place and every alias observes the change.
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit signed integer.
    Integer(i64),
    /// A 64-bit IEEE-754 float.
    Float(f64),
    /// A boolean value.
    Boolean(bool),
    /// The null value.
    Null,
    /// An immutable string.
    String(Rc<str>),
    /// An ordered, in-place mutable sequence of values.
    Array(Rc<RefCell<Vec<Value>>>),
    /// A mapping from hash keys to key/value pairs.
    Hash(Rc<HashMap<HashKey, HashPair>>),
    /// A tensor: integer shape plus flat row-major float data.
    Tensor(Rc<Tensor>),
    /// A function value produced by the evaluator, carrying its captured
    /// environment.
    Function(Rc<Function>),
    /// A unit of bytecode produced by the compiler.
    CompiledFunction(Rc<CompiledFunction>),
    /// A compiled function bundled with its captured free values.
    Closure(Rc<Closure>),
    /// A host-provided builtin function.
    Builtin(Builtin),
    /// Wraps a value propagating out of a `return` statement. Only the
    /// evaluator produces this variant; the virtual machine unwinds frames
    /// directly.
    Return(Box<Value>),
}

/// A key/value pair stored in a hash.
///
/// The original key value is kept alongside the value so inspection can
/// print the key as written, not its derived hash key.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    /// The key as evaluated.
    pub key:   Value,
    /// The associated value.
    pub value: Value,
}

/// A function value under the tree-walking evaluator.
pub struct Function {
    /// Parameter names, in declaration order.
    pub parameters: Vec<String>,
    /// The function body.
    pub body:       Block,
    /// The environment captured at the point of construction.
    pub env:        Env,
}

/// The captured environment is omitted: it routinely contains the function
/// itself, and following it would recurse forever.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
         .field("parameters", &self.parameters)
         .field("body", &self.body)
         .finish_non_exhaustive()
    }
}

/// A compiled function: instruction bytes plus the frame layout the virtual
/// machine needs to execute them.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFunction {
    /// The function body's bytecode.
    pub instructions:   Instructions,
    /// Number of local slots the frame reserves, parameters included.
    pub num_locals:     usize,
    /// Number of declared parameters.
    pub num_parameters: usize,
}

/// A compiled function together with the values it captured from enclosing
/// scopes when it was constructed.
#[derive(Debug)]
pub struct Closure {
    /// The compiled function to execute.
    pub function: Rc<CompiledFunction>,
    /// Captured free values, in the order the compiler assigned their
    /// indices.
    pub free:     Vec<Value>,
}

/// The symbolic type tag of a value, as used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// `INTEGER`
    Integer,
    /// `FLOAT`
    Float,
    /// `BOOLEAN`
    Boolean,
    /// `NULL`
    Null,
    /// `STRING`
    String,
    /// `ARRAY`
    Array,
    /// `HASH`
    Hash,
    /// `TENSOR`
    Tensor,
    /// `FUNCTION`
    Function,
    /// `COMPILED_FUNCTION`
    CompiledFunction,
    /// `CLOSURE`
    Closure,
    /// `BUILTIN`
    Builtin,
    /// `RETURN_VALUE`
    ReturnValue,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Integer => "INTEGER",
            Self::Float => "FLOAT",
            Self::Boolean => "BOOLEAN",
            Self::Null => "NULL",
            Self::String => "STRING",
            Self::Array => "ARRAY",
            Self::Hash => "HASH",
            Self::Tensor => "TENSOR",
            Self::Function => "FUNCTION",
            Self::CompiledFunction => "COMPILED_FUNCTION",
            Self::Closure => "CLOSURE",
            Self::Builtin => "BUILTIN",
            Self::ReturnValue => "RETURN_VALUE",
        };
        write!(f, "{tag}")
    }
}

impl Value {
    /// Returns the value's symbolic type tag.
    #[must_use]
    pub const fn type_of(&self) -> ValueType {
        match self {
            Self::Integer(_) => ValueType::Integer,
            Self::Float(_) => ValueType::Float,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Null => ValueType::Null,
            Self::String(_) => ValueType::String,
            Self::Array(_) => ValueType::Array,
            Self::Hash(_) => ValueType::Hash,
            Self::Tensor(_) => ValueType::Tensor,
            Self::Function(_) => ValueType::Function,
            Self::CompiledFunction(_) => ValueType::CompiledFunction,
            Self::Closure(_) => ValueType::Closure,
            Self::Builtin(_) => ValueType::Builtin,
            Self::Return(_) => ValueType::ReturnValue,
        }
    }

    /// Returns whether the value counts as true in a condition.
    ///
    /// `false` and `null` are falsy; every other value is truthy, including
    /// `0` and the empty string.
    ///
    /// # Example
    /// ```
    /// use tensora::interpreter::value::core::Value;
    ///
    /// assert!(Value::Integer(0).is_truthy());
    /// assert!(!Value::Null.is_truthy());
    /// assert!(!Value::Boolean(false).is_truthy());
    /// ```
    #[must_use]
    pub const fn is_truthy(&self) -> bool {
        match self {
            Self::Boolean(b) => *b,
            Self::Null => false,
            _ => true,
        }
    }

    /// Returns `true` if the value is the given boolean or null singleton
    /// under the language's identity rules, or shares its allocation with
    /// `other`.
    ///
    /// This is the equality the `==` and `!=` operators fall back to when the
    /// operands are not both integers or both floats: booleans and null
    /// compare as the canonical singletons they are, and heap values compare
    /// by allocation identity, so two separately constructed but equal
    /// strings are *not* equal.
    #[must_use]
    pub fn is_identical(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Null, Self::Null) => true,
            (Self::String(l), Self::String(r)) => Rc::ptr_eq(l, r),
            (Self::Array(l), Self::Array(r)) => Rc::ptr_eq(l, r),
            (Self::Hash(l), Self::Hash(r)) => Rc::ptr_eq(l, r),
            (Self::Tensor(l), Self::Tensor(r)) => Rc::ptr_eq(l, r),
            (Self::Function(l), Self::Function(r)) => Rc::ptr_eq(l, r),
            (Self::CompiledFunction(l), Self::CompiledFunction(r)) => Rc::ptr_eq(l, r),
            (Self::Closure(l), Self::Closure(r)) => Rc::ptr_eq(l, r),
            (Self::Builtin(l), Self::Builtin(r)) => l.name == r.name,
            _ => false,
        }
    }
}

/// Structural equality for host-side comparisons.
///
/// Tests compare results structurally: strings by content, arrays by
/// elements, hashes by pair sets. This is deliberately *not* the language's
/// `==` operator, which is identity-based for heap values; see
/// [`Value::is_identical`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(l), Self::Integer(r)) => l == r,
            (Self::Float(l), Self::Float(r)) => l == r,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Null, Self::Null) => true,
            (Self::String(l), Self::String(r)) => l == r,
            (Self::Array(l), Self::Array(r)) => *l.borrow() == *r.borrow(),
            (Self::Hash(l), Self::Hash(r)) => l == r,
            (Self::Tensor(l), Self::Tensor(r)) => l == r,
            (Self::Function(l), Self::Function(r)) => Rc::ptr_eq(l, r),
            (Self::CompiledFunction(l), Self::CompiledFunction(r)) => l == r,
            (Self::Closure(l), Self::Closure(r)) => Rc::ptr_eq(l, r),
            (Self::Builtin(l), Self::Builtin(r)) => l.name == r.name,
            (Self::Return(l), Self::Return(r)) => l == r,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::String(v) => write!(f, "{v}"),
            Self::Array(elements) => {
                let elements = elements.borrow()
                                       .iter()
                                       .map(ToString::to_string)
                                       .collect::<Vec<_>>()
                                       .join(", ");
                write!(f, "[{elements}]")
            },
            Self::Hash(pairs) => {
                let pairs = pairs.values()
                                 .map(|pair| format!("{}: {}", pair.key, pair.value))
                                 .collect::<Vec<_>>()
                                 .join(", ");
                write!(f, "{{{pairs}}}")
            },
            Self::Tensor(tensor) => write!(f, "{tensor}"),
            Self::Function(func) => write!(f, "Function[{:p}]", Rc::as_ptr(func)),
            Self::CompiledFunction(func) => {
                write!(f, "CompiledFunction[{:p}]", Rc::as_ptr(func))
            },
            Self::Closure(closure) => write!(f, "Closure[{:p}]", Rc::as_ptr(closure)),
            Self::Builtin(_) => write!(f, "builtin function"),
            Self::Return(value) => write!(f, "{value}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Integer(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(Rc::from(v))
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Array(Rc::new(RefCell::new(v)))
    }
}

impl From<Tensor> for Value {
    fn from(v: Tensor) -> Self {
        Self::Tensor(Rc::new(v))
    }
}
