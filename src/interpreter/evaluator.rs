use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::{BlockStatement, Expression, InfixOp, PrefixOp, Program, Statement};
use crate::value::{Function, MapPair, Value};

use super::builtins;
use super::control_flow::ControlFlow;
use super::environment::Environment;
use super::error::RuntimeError;
use super::macros::quote;

/// Evaluates a program against an environment. The result is the last
/// statement's value, or the unwrapped value of the first `return` hit at
/// the top level; statements that produce nothing (assignments, loops)
/// leave no value.
pub fn eval_program(
    program: &Program,
    env: &Rc<Environment>,
) -> Result<Option<Value>, RuntimeError> {
    let mut result = None;
    for statement in &program.statements {
        match eval_statement(statement, env)? {
            ControlFlow::Return(value) => return Ok(Some(value)),
            ControlFlow::Value(value) => result = Some(value),
            // The parser rejects break/continue outside loops, so the two
            // signals cannot reach the top level.
            ControlFlow::Next | ControlFlow::Break | ControlFlow::Continue => result = None,
        }
    }
    Ok(result)
}

fn eval_statement(
    statement: &Statement,
    env: &Rc<Environment>,
) -> Result<ControlFlow, RuntimeError> {
    match statement {
        Statement::Assign { name, value } => {
            let value = eval_expression(value, env)?;
            env.set(name.clone(), value);
            Ok(ControlFlow::Next)
        }
        Statement::Return { value } => {
            let value = match value {
                Some(expression) => eval_expression(expression, env)?,
                None => Value::Null,
            };
            Ok(ControlFlow::Return(value))
        }
        // An if at statement position passes signals through unchanged;
        // this is what lets `return`/`break`/`continue` act from inside a
        // conditional.
        Statement::Expression(Expression::If {
            condition,
            consequence,
            alternative,
        }) => eval_if(condition, consequence, alternative.as_ref(), env),
        Statement::Expression(expression) => {
            Ok(ControlFlow::Value(eval_expression(expression, env)?))
        }
        Statement::Block(block) => eval_block(block, env),
        Statement::While { condition, body } => {
            loop {
                let condition = eval_expression(condition, env)?;
                if !condition.is_truthy() {
                    break;
                }
                match eval_block(body, env)? {
                    ControlFlow::Return(value) => return Ok(ControlFlow::Return(value)),
                    ControlFlow::Break => break,
                    ControlFlow::Continue | ControlFlow::Value(_) | ControlFlow::Next => {}
                }
            }
            Ok(ControlFlow::Next)
        }
        Statement::Break => Ok(ControlFlow::Break),
        Statement::Continue => Ok(ControlFlow::Continue),
    }
}

/// Evaluates a block in a fresh scope. `Return`, `Break` and `Continue`
/// stop the block and propagate; otherwise the block's result is its last
/// statement's.
pub(crate) fn eval_block(
    block: &BlockStatement,
    env: &Rc<Environment>,
) -> Result<ControlFlow, RuntimeError> {
    let scope = Environment::extend(env);
    let mut result = ControlFlow::Next;
    for statement in &block.statements {
        match eval_statement(statement, &scope)? {
            signal @ (ControlFlow::Return(_) | ControlFlow::Break | ControlFlow::Continue) => {
                return Ok(signal)
            }
            flow => result = flow,
        }
    }
    Ok(result)
}

fn eval_if(
    condition: &Expression,
    consequence: &BlockStatement,
    alternative: Option<&BlockStatement>,
    env: &Rc<Environment>,
) -> Result<ControlFlow, RuntimeError> {
    let condition = eval_expression(condition, env)?;
    if condition.is_truthy() {
        eval_block(consequence, env)
    } else if let Some(alternative) = alternative {
        eval_block(alternative, env)
    } else {
        Ok(ControlFlow::Value(Value::Null))
    }
}

pub(crate) fn eval_expression(
    expression: &Expression,
    env: &Rc<Environment>,
) -> Result<Value, RuntimeError> {
    match expression {
        Expression::Integer(value) => Ok(Value::Integer(*value)),
        Expression::String(value) => Ok(Value::String(value.clone())),
        Expression::Boolean(value) => Ok(Value::Boolean(*value)),
        Expression::Identifier(name) => eval_identifier(name, env),
        Expression::Prefix { operator, right } => {
            let right = eval_expression(right, env)?;
            eval_prefix(*operator, right)
        }
        Expression::Infix {
            left,
            operator,
            right,
        } => {
            let left = eval_expression(left, env)?;
            let right = eval_expression(right, env)?;
            eval_infix(*operator, left, right)
        }
        // In expression position a conditional folds its signals down to a
        // plain value: a branch with no value is null.
        Expression::If {
            condition,
            consequence,
            alternative,
        } => match eval_if(condition, consequence, alternative.as_ref(), env)? {
            ControlFlow::Value(value) | ControlFlow::Return(value) => Ok(value),
            ControlFlow::Next | ControlFlow::Break | ControlFlow::Continue => Ok(Value::Null),
        },
        Expression::Function { parameters, body } => Ok(Value::Function(Rc::new(Function {
            parameters: parameters.clone(),
            body: body.clone(),
            env: Rc::clone(env),
        }))),
        Expression::Call {
            function,
            arguments,
        } => eval_call(function, arguments, env),
        Expression::Array(elements) => {
            let elements = elements
                .iter()
                .map(|element| eval_expression(element, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Value::Array(Rc::new(elements)))
        }
        Expression::Index { left, index } => {
            let left = eval_expression(left, env)?;
            let index = eval_expression(index, env)?;
            eval_index(left, index)
        }
        Expression::Map(pairs) => eval_map_literal(pairs, env),
        // Macro literals only mean something to `define_macros`; one that
        // survives to evaluation has no runtime value.
        Expression::Macro { .. } => Ok(Value::Null),
    }
}

fn eval_identifier(name: &str, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    if let Some(value) = env.get(name) {
        return Ok(value);
    }
    if let Some(builtin) = builtins::lookup(name) {
        return Ok(builtin);
    }
    Err(RuntimeError::IdentifierNotFound {
        name: name.to_string(),
    })
}

fn eval_prefix(operator: PrefixOp, right: Value) -> Result<Value, RuntimeError> {
    match operator {
        PrefixOp::Not => Ok(Value::Boolean(match right {
            Value::Boolean(value) => !value,
            Value::Null => true,
            Value::Integer(value) => value == 0,
            _ => false,
        })),
        PrefixOp::Neg => match right {
            Value::Integer(value) => Ok(Value::Integer(value.wrapping_neg())),
            other => Err(RuntimeError::UnknownPrefixOperator {
                operator,
                right: other.type_name(),
            }),
        },
    }
}

fn eval_infix(operator: InfixOp, left: Value, right: Value) -> Result<Value, RuntimeError> {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix(operator, l, r),
        _ => match operator {
            // Identity comparison; correct for booleans and null, false
            // for everything else unless both sides are the same object.
            InfixOp::Eq => Ok(Value::Boolean(left == right)),
            InfixOp::NotEq => Ok(Value::Boolean(left != right)),
            _ if left.type_name() != right.type_name() => Err(RuntimeError::TypeMismatch {
                left: left.type_name(),
                operator,
                right: right.type_name(),
            }),
            _ => Err(RuntimeError::UnknownInfixOperator {
                left: left.type_name(),
                operator,
                right: right.type_name(),
            }),
        },
    }
}

fn eval_integer_infix(operator: InfixOp, left: i64, right: i64) -> Result<Value, RuntimeError> {
    let value = match operator {
        InfixOp::Add => Value::Integer(left.wrapping_add(right)),
        InfixOp::Sub => Value::Integer(left.wrapping_sub(right)),
        InfixOp::Mul => Value::Integer(left.wrapping_mul(right)),
        InfixOp::Div => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Integer(left.wrapping_div(right))
        }
        InfixOp::Mod => {
            if right == 0 {
                return Err(RuntimeError::DivisionByZero);
            }
            Value::Integer(left.wrapping_rem(right))
        }
        InfixOp::Pow => Value::Integer(integer_pow(left, right)),
        InfixOp::Lt => Value::Boolean(left < right),
        InfixOp::Lte => Value::Boolean(left <= right),
        InfixOp::Gt => Value::Boolean(left > right),
        InfixOp::Gte => Value::Boolean(left >= right),
        InfixOp::Eq => Value::Boolean(left == right),
        InfixOp::NotEq => Value::Boolean(left != right),
    };
    Ok(value)
}

/// Exponentiation by squaring. A negative exponent fails the loop condition
/// immediately and yields 1.
fn integer_pow(mut base: i64, mut exponent: i64) -> i64 {
    let mut result = 1i64;
    while exponent > 0 {
        if exponent & 1 != 0 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exponent >>= 1;
    }
    result
}

fn eval_string_infix(operator: InfixOp, left: &str, right: &str) -> Result<Value, RuntimeError> {
    match operator {
        InfixOp::Add => Ok(Value::String(Rc::from(format!("{left}{right}")))),
        InfixOp::Lt => Ok(Value::Boolean(left < right)),
        InfixOp::Gt => Ok(Value::Boolean(left > right)),
        InfixOp::Eq => Ok(Value::Boolean(left == right)),
        InfixOp::NotEq => Ok(Value::Boolean(left != right)),
        _ => Err(RuntimeError::UnknownInfixOperator {
            left: "STRING",
            operator,
            right: "STRING",
        }),
    }
}

fn eval_call(
    function: &Expression,
    arguments: &[Expression],
    env: &Rc<Environment>,
) -> Result<Value, RuntimeError> {
    // `quote` is a special form: its argument is not evaluated.
    if let Expression::Identifier(name) = function {
        if name.as_ref() == "quote" {
            if arguments.len() != 1 {
                return Err(RuntimeError::WrongArgumentCount {
                    got: arguments.len(),
                    want: 1,
                });
            }
            return quote(&arguments[0], env);
        }
    }

    let function = eval_expression(function, env)?;
    let arguments = arguments
        .iter()
        .map(|argument| eval_expression(argument, env))
        .collect::<Result<Vec<_>, _>>()?;
    apply_function(&function, &arguments)
}

pub(crate) fn apply_function(
    function: &Value,
    arguments: &[Value],
) -> Result<Value, RuntimeError> {
    match function {
        Value::Function(function) => {
            if arguments.len() != function.parameters.len() {
                return Err(RuntimeError::WrongArgumentCount {
                    got: arguments.len(),
                    want: function.parameters.len(),
                });
            }
            let scope = Environment::extend(&function.env);
            for (parameter, argument) in function.parameters.iter().zip(arguments) {
                scope.define(parameter.clone(), argument.clone());
            }
            match eval_block(&function.body, &scope)? {
                ControlFlow::Return(value) | ControlFlow::Value(value) => Ok(value),
                ControlFlow::Next | ControlFlow::Break | ControlFlow::Continue => Ok(Value::Null),
            }
        }
        Value::Builtin(builtin) => (builtin.func)(arguments),
        other => Err(RuntimeError::NotAFunction {
            type_name: other.type_name(),
        }),
    }
}

fn eval_index(left: Value, index: Value) -> Result<Value, RuntimeError> {
    match left {
        Value::Array(elements) => match index {
            Value::Integer(subscript) => {
                if subscript < 0 || subscript >= elements.len() as i64 {
                    return Ok(Value::Null);
                }
                Ok(elements[subscript as usize].clone())
            }
            other => Err(RuntimeError::SubscriptNotSupported {
                type_name: other.type_name(),
            }),
        },
        Value::Map(pairs) => {
            let Some(key) = index.hash_key() else {
                return Err(RuntimeError::UnusableMapKey {
                    type_name: index.type_name(),
                });
            };
            Ok(pairs
                .get(&key)
                .map(|pair| pair.value.clone())
                .unwrap_or(Value::Null))
        }
        other => Err(RuntimeError::IndexNotSupported {
            type_name: other.type_name(),
        }),
    }
}

fn eval_map_literal(
    entries: &[(Expression, Expression)],
    env: &Rc<Environment>,
) -> Result<Value, RuntimeError> {
    let mut pairs = IndexMap::new();
    for (key_expression, value_expression) in entries {
        let key = eval_expression(key_expression, env)?;
        let Some(hash) = key.hash_key() else {
            return Err(RuntimeError::UnusableMapKey {
                type_name: key.type_name(),
            });
        };
        let value = eval_expression(value_expression, env)?;
        pairs.insert(hash, MapPair { key, value });
    }
    Ok(Value::Map(Rc::new(pairs)))
}
