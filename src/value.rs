use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

use crate::ast::{BlockStatement, Expression};
use crate::interpreter::environment::Environment;
use crate::interpreter::error::RuntimeError;

/// A runtime value. Composites are reference-shared; `==` on them compares
/// identity, which is also what the language's `==` operator does for
/// anything that is not an integer or a string.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Null,
    String(Rc<str>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Array(Rc<Vec<Value>>),
    Map(Rc<IndexMap<HashKey, MapPair>>),
    Quote(Rc<Expression>),
    Macro(Rc<MacroDef>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(left), Value::Integer(right)) => left == right,
            (Value::Boolean(left), Value::Boolean(right)) => left == right,
            (Value::Null, Value::Null) => true,
            (Value::String(left), Value::String(right)) => left == right,
            (Value::Function(left), Value::Function(right)) => Rc::ptr_eq(left, right),
            (Value::Builtin(left), Value::Builtin(right)) => left == right,
            (Value::Array(left), Value::Array(right)) => Rc::ptr_eq(left, right),
            (Value::Map(left), Value::Map(right)) => Rc::ptr_eq(left, right),
            (Value::Quote(left), Value::Quote(right)) => left == right,
            (Value::Macro(left), Value::Macro(right)) => Rc::ptr_eq(left, right),
            _ => false,
        }
    }
}

/// A user function value: parameter names, the body, and the environment the
/// literal was evaluated in (its closure).
pub struct Function {
    pub parameters: Vec<Rc<str>>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

impl fmt::Debug for Function {
    // The captured environment can reach this function again through a
    // binding, so it stays out of the debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// A macro definition captured by `define_macros`, expanded before
/// evaluation rather than applied at runtime.
pub struct MacroDef {
    pub parameters: Vec<Rc<str>>,
    pub body: BlockStatement,
    pub env: Rc<Environment>,
}

impl fmt::Debug for MacroDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MacroDef")
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

pub type BuiltinFn = fn(&[Value]) -> Result<Value, RuntimeError>;

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl PartialEq for Builtin {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Normalized map key: the value's type tag plus a 64-bit digest. Distinct
/// tags keep `1`, `true` and `"1"` from ever colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub kind: &'static str,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapPair {
    pub key: Value,
    pub value: Value,
}

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for &byte in bytes {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::Null => "NULL",
            Value::String(_) => "STRING",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
            Value::Array(_) => "ARRAY",
            Value::Map(_) => "MAP",
            Value::Quote(_) => "QUOTE",
            Value::Macro(_) => "MACRO",
        }
    }

    /// Only `false` and `null` are falsy; zero and the empty string are not.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Boolean(false) | Value::Null)
    }

    /// Integers, booleans and strings can be map keys; everything else
    /// cannot.
    pub fn hash_key(&self) -> Option<HashKey> {
        let value = match self {
            Value::Integer(value) => *value as u64,
            Value::Boolean(value) => u64::from(*value),
            Value::String(value) => fnv1a(value.as_bytes()),
            _ => return None,
        };
        Some(HashKey {
            kind: self.type_name(),
            value,
        })
    }

    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(value) => value.to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::Null => "null".to_string(),
            Value::String(value) => format!("\"{value}\""),
            Value::Function(function) => {
                format!("|{}| {}", function.parameters.join(", "), function.body)
            }
            Value::Builtin(_) => "builtin function".to_string(),
            Value::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(Value::inspect).collect();
                format!("[{}]", elements.join(", "))
            }
            Value::Map(pairs) => {
                let pairs: Vec<String> = pairs
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", pairs.join(", "))
            }
            Value::Quote(node) => format!("QUOTE({node})"),
            Value::Macro(def) => format!("macro({}) {}", def.parameters.join(", "), def.body),
        }
    }
}
