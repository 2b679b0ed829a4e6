use std::rc::Rc;

use crate::{
    ast::{Block, Expr, Program, Statement},
    error::RuntimeError,
    interpreter::{
        builtins,
        environment::Env,
        evaluator::{collection, function, import},
        value::{
            core::{Function, Value},
            ops, tensor::Tensor,
        },
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure. An error anywhere in a compound
/// expression short-circuits every enclosing evaluation rule.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Evaluates a full program against an environment.
///
/// The program's value is the value of its last evaluated statement; a
/// `return` at the top level is unwrapped and ends evaluation early.
/// Statements that bind (`let`) produce no value, so a program ending in a
/// binding yields `None`.
///
/// # Errors
/// The first runtime error aborts evaluation and is returned.
///
/// # Example
/// ```
/// use tensora::interpreter::{
///     environment::Environment,
///     evaluator::core::eval_program,
///     parser::core::Parser,
///     value::core::Value,
/// };
///
/// let program = Parser::new("let x = 2; x * 3;").parse_program();
/// let env = Environment::new();
///
/// let result = eval_program(&program, &env).unwrap();
/// assert_eq!(result, Some(Value::Integer(6)));
/// ```
pub fn eval_program(program: &Program, env: &Env) -> EvalResult<Option<Value>> {
    let mut result = None;

    for statement in &program.statements {
        match eval_statement(statement, env)? {
            Some(Value::Return(value)) => return Ok(Some(*value)),
            other => result = other,
        }
    }

    Ok(result)
}

/// Evaluates a single statement.
///
/// `let` evaluates its value and binds it into the innermost frame, producing
/// no value. `return` wraps its value so enclosing blocks unwind. Expression
/// statements produce their expression's value.
pub fn eval_statement(statement: &Statement, env: &Env) -> EvalResult<Option<Value>> {
    match statement {
        Statement::Let { name, value, .. } => {
            let value = eval_expression(value, env)?;
            env.borrow_mut().set(name.clone(), value);
            Ok(None)
        },
        Statement::Return { value, .. } => {
            let value = eval_expression(value, env)?;
            Ok(Some(Value::Return(Box::new(value))))
        },
        Statement::Expression { expr, .. } => eval_expression(expr, env).map(Some),
    }
}

/// Evaluates the statements of a block in order.
///
/// A `Return` value produced by any statement is propagated outward
/// unchanged, so nested blocks unwind until a function boundary (or the
/// program) unwraps it.
pub fn eval_block(block: &Block, env: &Env) -> EvalResult<Option<Value>> {
    let mut result = None;

    for statement in &block.statements {
        result = eval_statement(statement, env)?;
        if matches!(result, Some(Value::Return(_))) {
            return Ok(result);
        }
    }

    Ok(result)
}

/// Evaluates one expression.
///
/// This is the evaluator's dispatch point; each variant either produces a
/// value directly or delegates to the matching rule.
pub fn eval_expression(expr: &Expr, env: &Env) -> EvalResult<Value> {
    match expr {
        Expr::Integer { value, .. } => Ok(Value::Integer(*value)),
        Expr::Float { value, .. } => Ok(Value::Float(*value)),
        Expr::Boolean { value, .. } => Ok(Value::Boolean(*value)),
        Expr::String { value, .. } => Ok(Value::from(value.as_str())),
        Expr::Identifier { name, .. } => eval_identifier(name, env),
        Expr::Prefix { operator, right, .. } => {
            let right = eval_expression(right, env)?;
            ops::apply_prefix(*operator, &right)
        },
        Expr::Infix { left, operator, right, .. } => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            ops::apply_infix(*operator, &left, &right)
        },
        Expr::If { condition,
                   consequence,
                   alternative,
                   .. } => eval_if_expression(condition, consequence, alternative.as_ref(), env),
        Expr::Function { parameters, body, .. } => {
            Ok(Value::Function(Rc::new(Function { parameters: parameters.clone(),
                                                  body:       body.clone(),
                                                  env:        Rc::clone(env), })))
        },
        Expr::Call { function, arguments, .. } => {
            let callee = eval_expression(function, env)?;
            let args = eval_expressions(arguments, env)?;
            function::apply_function(&callee, &args)
        },
        Expr::Array { elements, .. } => Ok(Value::from(eval_expressions(elements, env)?)),
        Expr::Index { left, index, .. } => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            ops::apply_index(&left, &index)
        },
        Expr::Hash { pairs, .. } => collection::eval_hash_literal(pairs, env),
        Expr::Tensor { shape, data, .. } => {
            let shape = eval_expression(shape, env)?;
            let data = eval_expression(data, env)?;
            Ok(Tensor::from_values(&shape, &data)?.into())
        },
        Expr::Import { path, .. } => import::eval_import(path, env),
    }
}

/// Resolves an identifier: environment chain first, then the builtin
/// registry.
fn eval_identifier(name: &str, env: &Env) -> EvalResult<Value> {
    if let Some(value) = env.borrow().get(name) {
        return Ok(value);
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Ok(Value::Builtin(builtin));
    }

    Err(RuntimeError::IdentifierNotFound { name: name.to_string() })
}

/// Evaluates an `if` expression: the consequence when the condition is
/// truthy, the alternative otherwise, `null` when there is none. An arm
/// whose last statement produces no value also yields `null`.
fn eval_if_expression(condition: &Expr,
                      consequence: &Block,
                      alternative: Option<&Block>,
                      env: &Env)
                      -> EvalResult<Value> {
    let condition = eval_expression(condition, env)?;

    let result = if condition.is_truthy() {
        eval_block(consequence, env)?
    } else if let Some(alternative) = alternative {
        eval_block(alternative, env)?
    } else {
        None
    };

    Ok(result.unwrap_or(Value::Null))
}

/// Evaluates an expression list left to right, short-circuiting on the first
/// error.
pub(in crate::interpreter::evaluator) fn eval_expressions(expressions: &[Expr],
                                                          env: &Env)
                                                          -> EvalResult<Vec<Value>> {
    expressions.iter()
               .map(|expression| eval_expression(expression, env))
               .collect()
}
