use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        environment::Environment,
        evaluator::core::{EvalResult, eval_block},
        value::core::Value,
    },
};

/// Applies a callee to already-evaluated arguments.
///
/// A user function gets a fresh frame whose parent is the environment it
/// captured at construction; parameters are bound positionally and the body
/// is evaluated in that frame. A `return` from the body is unwrapped here; a
/// body that produces no value yields `null`. Builtins are invoked directly.
///
/// # Errors
/// - [`RuntimeError::WrongArgumentCount`] when the argument count does not
///   match the parameter count.
/// - [`RuntimeError::NotAFunction`] when the callee is not callable.
/// - Whatever the function body or builtin itself raises.
pub fn apply_function(callee: &Value, args: &[Value]) -> EvalResult<Value> {
    match callee {
        Value::Function(function) => {
            if args.len() != function.parameters.len() {
                return Err(RuntimeError::WrongArgumentCount { want: function.parameters.len(),
                                                              got:  args.len(), });
            }

            let frame = Environment::new_enclosed(Rc::clone(&function.env));
            for (parameter, arg) in function.parameters.iter().zip(args) {
                frame.borrow_mut().set(parameter.clone(), arg.clone());
            }

            let result = eval_block(&function.body, &frame)?;
            Ok(match result {
                Some(Value::Return(value)) => *value,
                Some(value) => value,
                None => Value::Null,
            })
        },
        Value::Builtin(builtin) => builtin.call(args),
        _ => Err(RuntimeError::NotAFunction { callee: callee.type_of() }),
    }
}
