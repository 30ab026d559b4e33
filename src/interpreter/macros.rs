//! The tree-rewriting half of the interpreter: `quote`/`unquote` and macro
//! definition and expansion. Both run over the generic AST rewriter, before
//! any ordinary evaluation happens.

use std::rc::Rc;

use crate::ast::{modify_expression, modify_program, Expression, Program, Statement};
use crate::value::{MacroDef, Value};

use super::control_flow::ControlFlow;
use super::environment::Environment;
use super::error::RuntimeError;
use super::evaluator::{eval_block, eval_expression};

/// `quote(e)`: every nested `unquote(x)` call inside `e` is replaced with
/// the AST form of evaluating `x`, then the rewritten tree is wrapped.
pub fn quote(expression: &Expression, env: &Rc<Environment>) -> Result<Value, RuntimeError> {
    let node = eval_unquote_calls(expression.clone(), env)?;
    Ok(Value::Quote(Rc::new(node)))
}

fn eval_unquote_calls(
    expression: Expression,
    env: &Rc<Environment>,
) -> Result<Expression, RuntimeError> {
    modify_expression(expression, &mut |node| {
        if !is_unquote_call(&node) {
            return Ok(node);
        }
        let Expression::Call { arguments, .. } = &node else {
            return Ok(node);
        };
        let value = eval_expression(&arguments[0], env)?;
        // Values without an AST form leave the call site untouched.
        Ok(convert_value_to_node(&value).unwrap_or(node))
    })
}

fn is_unquote_call(node: &Expression) -> bool {
    let Expression::Call {
        function,
        arguments,
    } = node
    else {
        return false;
    };
    matches!(function.as_ref(), Expression::Identifier(name) if name.as_ref() == "unquote")
        && arguments.len() == 1
}

fn convert_value_to_node(value: &Value) -> Option<Expression> {
    match value {
        Value::Integer(value) => Some(Expression::Integer(*value)),
        Value::Boolean(value) => Some(Expression::Boolean(*value)),
        // Splicing: a quoted value contributes its wrapped node.
        Value::Quote(node) => Some(node.as_ref().clone()),
        _ => None,
    }
}

/// Strips every top-level `name = macro(...) { ... }` statement out of the
/// program, binding the macro in `env` instead.
pub fn define_macros(program: &mut Program, env: &Rc<Environment>) {
    program.statements.retain(|statement| {
        let Statement::Assign {
            name,
            value: Expression::Macro { parameters, body },
        } = statement
        else {
            return true;
        };
        env.define(
            name.clone(),
            Value::Macro(Rc::new(MacroDef {
                parameters: parameters.clone(),
                body: body.clone(),
                env: Rc::clone(env),
            })),
        );
        false
    });
}

/// Rewrites every call to a macro-bound identifier: the argument ASTs are
/// quoted, the macro body runs in an environment extending its definition
/// site, and the resulting quote's node replaces the call. Anything but a
/// quote coming back is a bug in the user's macro and surfaces as a runtime
/// error.
pub fn expand_macros(program: Program, env: &Rc<Environment>) -> Result<Program, RuntimeError> {
    modify_program(program, &mut |node| {
        let Expression::Call {
            function,
            arguments,
        } = &node
        else {
            return Ok(node);
        };
        let Expression::Identifier(name) = function.as_ref() else {
            return Ok(node);
        };
        let Some(Value::Macro(def)) = env.get(name) else {
            return Ok(node);
        };

        if arguments.len() != def.parameters.len() {
            return Err(RuntimeError::WrongArgumentCount {
                got: arguments.len(),
                want: def.parameters.len(),
            });
        }

        let scope = Environment::extend(&def.env);
        for (parameter, argument) in def.parameters.iter().zip(arguments) {
            scope.define(parameter.clone(), Value::Quote(Rc::new(argument.clone())));
        }

        match eval_block(&def.body, &scope)? {
            ControlFlow::Value(Value::Quote(quoted))
            | ControlFlow::Return(Value::Quote(quoted)) => Ok(quoted.as_ref().clone()),
            ControlFlow::Value(other) | ControlFlow::Return(other) => {
                Err(RuntimeError::MacroResultNotQuote {
                    type_name: other.type_name(),
                })
            }
            ControlFlow::Next | ControlFlow::Break | ControlFlow::Continue => {
                Err(RuntimeError::MacroResultNotQuote {
                    type_name: Value::Null.type_name(),
                })
            }
        }
    })
}
