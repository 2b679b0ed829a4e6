use std::fs;

use crate::{
    error::RuntimeError,
    interpreter::{
        environment::Env,
        evaluator::core::{EvalResult, eval_program},
        parser::core::Parser,
        value::core::Value,
    },
};

/// Evaluates an `import` expression.
///
/// The referenced file is read in full, parsed, and evaluated in the
/// *current* environment, so its top-level bindings become visible to the
/// importer. The import expression's own value is the imported program's
/// last value, or `null` when the program ends in a binding.
///
/// Syntax errors in the imported file are not reported; the successfully
/// parsed prefix is evaluated. Cyclic imports are not detected.
///
/// # Errors
/// [`RuntimeError::ImportRead`] when the file cannot be read, plus any
/// runtime error the imported program raises.
pub fn eval_import(path: &str, env: &Env) -> EvalResult<Value> {
    let source =
        fs::read_to_string(path).map_err(|e| RuntimeError::ImportRead { message: e.to_string() })?;

    let mut parser = Parser::new(&source);
    let program = parser.parse_program();

    let result = eval_program(&program, env)?;
    Ok(result.unwrap_or(Value::Null))
}
