use std::rc::Rc;

use crate::{
    ast::{InfixOperator, PrefixOperator},
    error::RuntimeError,
    interpreter::value::{
        core::{Value, ValueType},
        tensor::Tensor,
    },
};

/// Result type shared by the operator routines.
pub type OpResult = Result<Value, RuntimeError>;

/// Applies a prefix operator to a value.
///
/// `!` negates truthiness; `-` is defined on integers and floats only.
///
/// # Errors
/// Returns [`RuntimeError::UnknownPrefixOperator`] when `-` is applied to a
/// non-numeric operand.
///
/// # Example
/// ```
/// use tensora::{ast::PrefixOperator, interpreter::value::{core::Value, ops::apply_prefix}};
///
/// let negated = apply_prefix(PrefixOperator::Minus, &Value::Integer(5)).unwrap();
/// assert_eq!(negated, Value::Integer(-5));
///
/// let banged = apply_prefix(PrefixOperator::Bang, &Value::Null).unwrap();
/// assert_eq!(banged, Value::Boolean(true));
/// ```
pub fn apply_prefix(operator: PrefixOperator, right: &Value) -> OpResult {
    match operator {
        PrefixOperator::Bang => Ok(Value::Boolean(!right.is_truthy())),
        PrefixOperator::Minus => match right {
            Value::Integer(v) => Ok(Value::Integer(-v)),
            Value::Float(v) => Ok(Value::Float(-v)),
            _ => Err(RuntimeError::UnknownPrefixOperator { operator,
                                                           right: right.type_of() }),
        },
    }
}

/// Applies an infix operator to two values.
///
/// Dispatch order matters and is part of the language:
/// 1. two integers or two floats use numeric rules,
/// 2. `==`/`!=` on anything else compare identity,
/// 3. operands of different types are a type mismatch,
/// 4. two strings support `+` (concatenation) only,
/// 5. two tensors support element-wise arithmetic,
/// 6. anything else is an unknown operator.
///
/// Both back ends route their binary operations through this function, so
/// results and error messages cannot diverge between them.
///
/// # Errors
/// [`RuntimeError::TypeMismatch`] or [`RuntimeError::UnknownInfixOperator`]
/// per the rules above, and [`RuntimeError::ShapeMismatch`] for tensor
/// addition with unequal shapes.
pub fn apply_infix(operator: InfixOperator, left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => integer_infix(operator, *l, *r),
        (Value::Float(l), Value::Float(r)) => Ok(float_infix(operator, *l, *r)),
        _ if operator == InfixOperator::Equal => {
            Ok(Value::Boolean(left.is_identical(right)))
        },
        _ if operator == InfixOperator::NotEqual => {
            Ok(Value::Boolean(!left.is_identical(right)))
        },
        _ if left.type_of() != right.type_of() => {
            Err(RuntimeError::TypeMismatch { left: left.type_of(),
                                             operator,
                                             right: right.type_of() })
        },
        (Value::String(l), Value::String(r)) => string_infix(operator, l, r),
        (Value::Tensor(l), Value::Tensor(r)) => tensor_infix(operator, l, r),
        _ => Err(RuntimeError::UnknownInfixOperator { left: left.type_of(),
                                                      operator,
                                                      right: right.type_of() }),
    }
}

/// Integer arithmetic and comparison. Division truncates toward zero.
fn integer_infix(operator: InfixOperator, left: i64, right: i64) -> OpResult {
    use InfixOperator::{Add, Div, Equal, GreaterThan, LessThan, Mul, NotEqual, Sub};

    let value = match operator {
        Add => Value::Integer(left + right),
        Sub => Value::Integer(left - right),
        Mul => Value::Integer(left * right),
        Div => Value::Integer(left / right),
        LessThan => Value::Boolean(left < right),
        GreaterThan => Value::Boolean(left > right),
        Equal => Value::Boolean(left == right),
        NotEqual => Value::Boolean(left != right),
    };
    Ok(value)
}

/// Float arithmetic and comparison. Every operator is defined, so this cannot
/// fail.
fn float_infix(operator: InfixOperator, left: f64, right: f64) -> Value {
    use InfixOperator::{Add, Div, Equal, GreaterThan, LessThan, Mul, NotEqual, Sub};

    match operator {
        Add => Value::Float(left + right),
        Sub => Value::Float(left - right),
        Mul => Value::Float(left * right),
        Div => Value::Float(left / right),
        LessThan => Value::Boolean(left < right),
        GreaterThan => Value::Boolean(left > right),
        Equal => Value::Boolean(left == right),
        NotEqual => Value::Boolean(left != right),
    }
}

/// String operations: concatenation only.
fn string_infix(operator: InfixOperator, left: &Rc<str>, right: &Rc<str>) -> OpResult {
    if operator == InfixOperator::Add {
        let mut joined = String::with_capacity(left.len() + right.len());
        joined.push_str(left);
        joined.push_str(right);
        return Ok(Value::String(Rc::from(joined)));
    }

    Err(RuntimeError::UnknownInfixOperator { left: ValueType::String,
                                             operator,
                                             right: ValueType::String })
}

/// Applies the index operator to an already-evaluated receiver.
///
/// Array indexing is integer-based and yields `null` outside `[0, len)`;
/// hash indexing yields `null` for missing keys. Any other receiver is an
/// error. Both back ends share this rule.
///
/// # Errors
/// [`RuntimeError::IndexNotSupported`] for unindexable receivers and
/// [`RuntimeError::UnusableHashKey`] for unhashable hash keys.
#[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
pub fn apply_index(left: &Value, index: &Value) -> OpResult {
    match (left, index) {
        (Value::Array(elements), Value::Integer(i)) => {
            let elements = elements.borrow();
            if *i < 0 || *i >= elements.len() as i64 {
                return Ok(Value::Null);
            }
            Ok(elements[*i as usize].clone())
        },
        (Value::Hash(pairs), key) => {
            let hash_key = key.hash_key()?;
            Ok(pairs.get(&hash_key)
                    .map_or(Value::Null, |pair| pair.value.clone()))
        },
        _ => Err(RuntimeError::IndexNotSupported { receiver: left.type_of() }),
    }
}

/// Element-wise tensor arithmetic.
fn tensor_infix(operator: InfixOperator, left: &Rc<Tensor>, right: &Rc<Tensor>) -> OpResult {
    use InfixOperator::{Add, Div, Mul, Sub};

    let tensor = match operator {
        Add => left.add(right)?,
        Sub => left.sub(right),
        Mul => left.mul(right),
        Div => left.div(right),
        _ => {
            return Err(RuntimeError::UnknownInfixOperator { left: ValueType::Tensor,
                                                            operator,
                                                            right: ValueType::Tensor });
        },
    };
    Ok(tensor.into())
}
