use std::{
    cell::RefCell,
    fmt,
    rc::Rc,
    sync::{LazyLock, RwLock},
};

use crate::{error::RuntimeError, interpreter::value::core::Value};

/// The signature every builtin implements: evaluated arguments in, value or
/// runtime error out.
pub type BuiltinFn = fn(&[Value]) -> Result<Value, RuntimeError>;

/// A named host function callable from the language.
#[derive(Clone, Copy)]
pub struct Builtin {
    /// The name the function is reachable under.
    pub name: &'static str,
    /// The host implementation.
    pub func: BuiltinFn,
}

impl Builtin {
    /// Invokes the builtin with already-evaluated arguments.
    ///
    /// # Errors
    /// Whatever the builtin itself reports: arity mismatches and unsupported
    /// argument types.
    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        (self.func)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Builtin({})", self.name)
    }
}

/// The process-wide builtin registry.
///
/// Indices are dense and stable: the compiler embeds them into bytecode and
/// the virtual machine resolves `GetBuiltin` operands against the same list.
/// The registry starts with the core builtins and may be extended by the
/// host through [`register`] before any compilation; it is treated as
/// read-only afterwards.
static REGISTRY: LazyLock<RwLock<Vec<Builtin>>> = LazyLock::new(|| {
    RwLock::new(vec![Builtin { name: "len", func: len },
                     Builtin { name: "puts", func: puts },
                     Builtin { name: "first", func: first },
                     Builtin { name: "last", func: last },
                     Builtin { name: "rest", func: rest },
                     Builtin { name: "push", func: push },
                     Builtin { name: "pop", func: pop },
                     Builtin { name: "join", func: join },
                     Builtin { name: "random", func: random },
                     Builtin { name: "exp", func: exp },])
});

fn read_registry() -> std::sync::RwLockReadGuard<'static, Vec<Builtin>> {
    match REGISTRY.read() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Finds a builtin by name.
#[must_use]
pub fn lookup(name: &str) -> Option<Builtin> {
    read_registry().iter().find(|b| b.name == name).copied()
}

/// Fetches a builtin by its dense registry index.
#[must_use]
pub fn get(index: usize) -> Option<Builtin> {
    read_registry().get(index).copied()
}

/// Snapshots the registry in index order.
///
/// The compiler uses this to install one builtin symbol per entry; the
/// symbol's index is the registry index.
#[must_use]
pub fn all() -> Vec<Builtin> {
    read_registry().clone()
}

/// Registers an externally supplied builtin.
///
/// This is the extension point for hosts that ship extra functions. It must
/// be called before any compilation, since compilers snapshot the registry
/// when they are created.
pub fn register(name: &'static str, func: BuiltinFn) {
    let mut registry = match REGISTRY.write() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    registry.push(Builtin { name, func });
}

/// `len(x)`: the length of a string in bytes or of an array in elements.
///
/// # Errors
/// - `wrong number of arguments. got=N, want=1` on arity mismatch.
/// - ``argument to `len` not supported, got <TYPE>`` for any other argument.
#[allow(clippy::cast_possible_wrap)]
fn len(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::BuiltinArity { got:  args.len(),
                                                want: 1, });
    }

    match &args[0] {
        Value::String(s) => Ok(Value::Integer(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.borrow().len() as i64)),
        other => Err(RuntimeError::ArgumentNotSupported { builtin: "len",
                                                          got:     other.type_of(), }),
    }
}

/// `puts(...)`: prints each argument's inspection on its own line. Accepts
/// any number of arguments and always produces `null`.
fn puts(args: &[Value]) -> Result<Value, RuntimeError> {
    for arg in args {
        println!("{arg}");
    }
    Ok(Value::Null)
}

/// `first(arr)`: the first element of an array, or `null` when it is empty.
fn first(args: &[Value]) -> Result<Value, RuntimeError> {
    let elements = single_array_argument("first", args)?;
    let value = elements.borrow().first().cloned().unwrap_or(Value::Null);
    Ok(value)
}

/// `last(arr)`: the last element of an array, or `null` when it is empty.
fn last(args: &[Value]) -> Result<Value, RuntimeError> {
    let elements = single_array_argument("last", args)?;
    let value = elements.borrow().last().cloned().unwrap_or(Value::Null);
    Ok(value)
}

/// `rest(arr)`: a fresh array holding everything but the first element, or
/// `null` when the array is empty. The receiver is left untouched.
fn rest(args: &[Value]) -> Result<Value, RuntimeError> {
    let elements = single_array_argument("rest", args)?;
    let elements = elements.borrow();
    if elements.is_empty() {
        return Ok(Value::Null);
    }

    Ok(Value::from(elements[1..].to_vec()))
}

/// `push(arr, x)`: appends in place and returns the (now longer) array.
/// Every alias of the array observes the append.
fn push(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != 2 {
        return Err(RuntimeError::BuiltinArity { got:  args.len(),
                                                want: 2, });
    }

    let Value::Array(elements) = &args[0] else {
        return Err(RuntimeError::ArgumentMustBeArray { builtin: "push",
                                                       got:     args[0].type_of(), });
    };

    elements.borrow_mut().push(args[1].clone());
    Ok(args[0].clone())
}

/// `pop(arr)`: removes and returns the last element in place, or `null` when
/// the array is empty.
fn pop(args: &[Value]) -> Result<Value, RuntimeError> {
    let elements = single_array_argument("pop", args)?;
    let value = elements.borrow_mut().pop().unwrap_or(Value::Null);
    Ok(value)
}

/// `join(arr, sep)`: joins the elements' inspections with a separator.
fn join(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != 2 {
        return Err(RuntimeError::BuiltinArity { got:  args.len(),
                                                want: 2, });
    }

    let Value::Array(elements) = &args[0] else {
        return Err(RuntimeError::JoinFirstArgument { got: args[0].type_of() });
    };
    let Value::String(separator) = &args[1] else {
        return Err(RuntimeError::JoinSecondArgument { got: args[1].type_of() });
    };

    let joined = elements.borrow()
                         .iter()
                         .map(ToString::to_string)
                         .collect::<Vec<_>>()
                         .join(separator.as_ref());
    Ok(Value::from(joined.as_str()))
}

/// `random()`: a float drawn uniformly from `[0, 1)` by the host PRNG.
fn random(args: &[Value]) -> Result<Value, RuntimeError> {
    if !args.is_empty() {
        return Err(RuntimeError::RandomTakesNoArguments);
    }

    Ok(Value::Float(rand::random::<f64>()))
}

/// `exp(x)`: `e^x` over an integer or float, always returning a float.
#[allow(clippy::cast_precision_loss)]
fn exp(args: &[Value]) -> Result<Value, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::ExpArity);
    }

    match &args[0] {
        Value::Float(v) => Ok(Value::Float(v.exp())),
        Value::Integer(v) => Ok(Value::Float((*v as f64).exp())),
        _ => Err(RuntimeError::ExpArgumentNotNumeric),
    }
}

/// Checks the one-array-argument contract shared by `first`, `last`, `rest`
/// and `pop`.
fn single_array_argument<'a>(builtin: &'static str,
                             args: &'a [Value])
                             -> Result<&'a Rc<RefCell<Vec<Value>>>, RuntimeError> {
    if args.len() != 1 {
        return Err(RuntimeError::BuiltinArity { got:  args.len(),
                                                want: 1, });
    }

    match &args[0] {
        Value::Array(elements) => Ok(elements),
        other => Err(RuntimeError::ArgumentMustBeArray { builtin,
                                                         got: other.type_of() }),
    }
}
