use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::Expr,
    interpreter::{
        environment::Env,
        evaluator::core::{EvalResult, eval_expression},
        value::core::{HashPair, Value},
    },
};

/// Evaluates a hash literal's pairs in source order.
///
/// Each key must be hashable (integer, boolean or string); the derived hash
/// key maps to the original key/value pair, so later duplicates of a key
/// overwrite earlier ones.
pub fn eval_hash_literal(pairs: &[(Expr, Expr)], env: &Env) -> EvalResult<Value> {
    let mut map = HashMap::new();

    for (key_expr, value_expr) in pairs {
        let key = eval_expression(key_expr, env)?;
        let hash_key = key.hash_key()?;

        let value = eval_expression(value_expr, env)?;
        map.insert(hash_key, HashPair { key, value });
    }

    Ok(Value::Hash(Rc::new(map)))
}
