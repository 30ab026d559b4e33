use std::fmt;

use crate::ast::{InfixOp, PrefixOp};
use crate::token::{Token, TokenKind};

/// Structured parse error. Errors accumulate on the parser so one bad
/// construct does not hide the rest of the input's problems.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The parser wanted another token. Reported at most once per parse
    /// attempt, so a REPL can test `errors() == [UnexpectedEof]` to decide
    /// whether to keep reading lines.
    UnexpectedEof,
    IllegalSyntax { expected: TokenKind, got: Token },
    IllegalSymbol { symbol: String },
    NoPrefixFunction { token: Token },
    IllegalInteger { literal: String },
    IllegalBreak,
    IllegalContinue,
}

impl ParseError {
    pub fn kind(&self) -> &'static str {
        match self {
            ParseError::UnexpectedEof => "UNEXPECTED_EOF",
            ParseError::IllegalSyntax { .. } => "ILLEGAL_SYNTAX",
            ParseError::IllegalSymbol { .. } => "ILLEGAL_SYMBOL",
            ParseError::NoPrefixFunction { .. } => "NOPREFIX_FUNCTION",
            ParseError::IllegalInteger { .. } => "ILLEGAL_INTEGER",
            ParseError::IllegalBreak => "ILLEGAL_BREAK",
            ParseError::IllegalContinue => "ILLEGAL_CONTINUE",
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedEof => f.write_str("Unexpected EOF"),
            ParseError::IllegalSyntax { expected, got } => write!(
                f,
                "expected next token to be `{expected}`, got `{}` instead, at line: {}, column: {}",
                got.literal, got.line, got.column
            ),
            ParseError::IllegalSymbol { symbol } => {
                write!(f, "symbol not recognized `{symbol}`")
            }
            ParseError::NoPrefixFunction { token } => write!(
                f,
                "no prefix parse function for `{}` found, line: {}, column: {}",
                token.literal, token.line, token.column
            ),
            ParseError::IllegalInteger { literal } => {
                write!(f, "could not parse `{literal}` as integer")
            }
            ParseError::IllegalBreak => f.write_str("break should be used in loop statement"),
            ParseError::IllegalContinue => {
                f.write_str("continue should be used in loop statement")
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Runtime error. These propagate through evaluation like a return value:
/// the first one aborts the enclosing statement, block and program.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    TypeMismatch {
        left: &'static str,
        operator: InfixOp,
        right: &'static str,
    },
    UnknownInfixOperator {
        left: &'static str,
        operator: InfixOp,
        right: &'static str,
    },
    UnknownPrefixOperator {
        operator: PrefixOp,
        right: &'static str,
    },
    IdentifierNotFound {
        name: String,
    },
    NotAFunction {
        type_name: &'static str,
    },
    WrongArgumentCount {
        got: usize,
        want: usize,
    },
    ArgumentNotSupported {
        builtin: &'static str,
        type_name: &'static str,
    },
    ArgumentMustBeArray {
        builtin: &'static str,
        type_name: &'static str,
    },
    IndexNotSupported {
        type_name: &'static str,
    },
    SubscriptNotSupported {
        type_name: &'static str,
    },
    UnusableMapKey {
        type_name: &'static str,
    },
    DivisionByZero,
    MacroResultNotQuote {
        type_name: &'static str,
    },
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::TypeMismatch {
                left,
                operator,
                right,
            } => write!(f, "Type mismatch: {left} {operator} {right}"),
            RuntimeError::UnknownInfixOperator {
                left,
                operator,
                right,
            } => write!(f, "Unknown operator: {left} {operator} {right}"),
            RuntimeError::UnknownPrefixOperator { operator, right } => {
                write!(f, "Unknown operator: {operator}{right}")
            }
            RuntimeError::IdentifierNotFound { name } => {
                write!(f, "Identifier not found: {name}")
            }
            RuntimeError::NotAFunction { type_name } => {
                write!(f, "Not a function: {type_name}")
            }
            RuntimeError::WrongArgumentCount { got, want } => {
                write!(f, "Wrong number of arguments, got={got}, want={want}")
            }
            RuntimeError::ArgumentNotSupported { builtin, type_name } => {
                write!(f, "Argument to `{builtin}` not supported, got {type_name}")
            }
            RuntimeError::ArgumentMustBeArray { builtin, type_name } => {
                write!(f, "Argument to `{builtin}` must be ARRAY, got {type_name}")
            }
            RuntimeError::IndexNotSupported { type_name } => {
                write!(f, "Index operator not support: {type_name}")
            }
            RuntimeError::SubscriptNotSupported { type_name } => {
                write!(f, "Subscript not support: {type_name}")
            }
            RuntimeError::UnusableMapKey { type_name } => {
                write!(f, "unusable as map key: {type_name}")
            }
            RuntimeError::DivisionByZero => f.write_str("Division by zero"),
            RuntimeError::MacroResultNotQuote { type_name } => write!(
                f,
                "Macro body must evaluate to a quoted expression, got {type_name}"
            ),
        }
    }
}

impl std::error::Error for RuntimeError {}
