use std::rc::Rc;

use crate::value::{Builtin, Value};

use super::error::RuntimeError;

const BUILTINS: &[Builtin] = &[
    Builtin { name: "len", func: len },
    Builtin { name: "first", func: first },
    Builtin { name: "last", func: last },
    Builtin { name: "rest", func: rest },
    Builtin { name: "push", func: push },
    Builtin { name: "print", func: print },
];

/// Builtins are consulted after the environment, so a user binding with the
/// same name wins.
pub fn lookup(name: &str) -> Option<Value> {
    BUILTINS
        .iter()
        .find(|builtin| builtin.name == name)
        .copied()
        .map(Value::Builtin)
}

fn expect_arity(arguments: &[Value], want: usize) -> Result<(), RuntimeError> {
    if arguments.len() != want {
        return Err(RuntimeError::WrongArgumentCount {
            got: arguments.len(),
            want,
        });
    }
    Ok(())
}

fn expect_array<'a>(
    builtin: &'static str,
    argument: &'a Value,
) -> Result<&'a Rc<Vec<Value>>, RuntimeError> {
    match argument {
        Value::Array(elements) => Ok(elements),
        other => Err(RuntimeError::ArgumentMustBeArray {
            builtin,
            type_name: other.type_name(),
        }),
    }
}

/// String length in bytes, or array element count.
fn len(arguments: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity(arguments, 1)?;
    match &arguments[0] {
        Value::String(value) => Ok(Value::Integer(value.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.len() as i64)),
        other => Err(RuntimeError::ArgumentNotSupported {
            builtin: "len",
            type_name: other.type_name(),
        }),
    }
}

fn first(arguments: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity(arguments, 1)?;
    let elements = expect_array("first", &arguments[0])?;
    Ok(elements.first().cloned().unwrap_or(Value::Null))
}

fn last(arguments: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity(arguments, 1)?;
    let elements = expect_array("last", &arguments[0])?;
    Ok(elements.last().cloned().unwrap_or(Value::Null))
}

/// Fresh array without the first element; null on an empty array.
fn rest(arguments: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity(arguments, 1)?;
    let elements = expect_array("rest", &arguments[0])?;
    if elements.is_empty() {
        return Ok(Value::Null);
    }
    Ok(Value::Array(Rc::new(elements[1..].to_vec())))
}

/// Fresh array with the second argument appended.
fn push(arguments: &[Value]) -> Result<Value, RuntimeError> {
    expect_arity(arguments, 2)?;
    let elements = expect_array("push", &arguments[0])?;
    let mut extended = elements.as_ref().clone();
    extended.push(arguments[1].clone());
    Ok(Value::Array(Rc::new(extended)))
}

/// Writes the arguments' inspected forms, space-separated and
/// newline-terminated; strings print without their quotes.
fn print(arguments: &[Value]) -> Result<Value, RuntimeError> {
    let rendered: Vec<String> = arguments
        .iter()
        .map(|argument| match argument {
            Value::String(value) => value.to_string(),
            other => other.inspect(),
        })
        .collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_finds_builtins() {
        assert!(matches!(lookup("len"), Some(Value::Builtin(_))));
        assert!(lookup("missing").is_none());
    }

    #[test]
    fn rest_returns_a_fresh_array() {
        let original = Value::Array(Rc::new(vec![Value::Integer(1), Value::Integer(2)]));
        let rested = rest(&[original.clone()]).unwrap();
        match (&original, &rested) {
            (Value::Array(a), Value::Array(b)) => {
                assert!(!Rc::ptr_eq(a, b));
                assert_eq!(b.as_ref(), &vec![Value::Integer(2)]);
            }
            _ => panic!("expected arrays"),
        }
    }

    #[test]
    fn push_does_not_mutate_the_original() {
        let original = Rc::new(vec![Value::Integer(1)]);
        let pushed = push(&[Value::Array(Rc::clone(&original)), Value::Integer(2)]).unwrap();
        assert_eq!(original.len(), 1);
        match pushed {
            Value::Array(elements) => assert_eq!(elements.len(), 2),
            other => panic!("expected array, got {}", other.type_name()),
        }
    }
}
