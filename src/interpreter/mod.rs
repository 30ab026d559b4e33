use std::fmt;
use std::rc::Rc;

use crate::lexer::Lexer;
use crate::value::Value;

pub mod builtins;
pub mod control_flow;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod macros;
pub mod parser;

pub use control_flow::ControlFlow;
pub use environment::Environment;
pub use error::{ParseError, RuntimeError};
pub use evaluator::eval_program;
pub use macros::{define_macros, expand_macros};
pub use parser::Parser;

/// Failure of the full source-to-value pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum RunError {
    Parse(Vec<ParseError>),
    Runtime(RuntimeError),
}

impl fmt::Display for RunError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunError::Parse(errors) => {
                let rendered: Vec<String> = errors
                    .iter()
                    .map(|error| format!("{}: {}", error.kind(), error))
                    .collect();
                f.write_str(&rendered.join("\n"))
            }
            RunError::Runtime(error) => write!(f, "{error}"),
        }
    }
}

impl std::error::Error for RunError {}

/// Runs a source string through the whole pipeline (parse, macro
/// definition, macro expansion, evaluation) against the given environment.
pub fn run(source: &str, env: &Rc<Environment>) -> Result<Option<Value>, RunError> {
    let mut parser = Parser::new();
    parser.init(Lexer::new(source));
    let mut program = parser.parse_program();
    if !parser.errors().is_empty() {
        return Err(RunError::Parse(parser.errors().to_vec()));
    }

    define_macros(&mut program, env);
    let program = expand_macros(program, env).map_err(RunError::Runtime)?;
    eval_program(&program, env).map_err(RunError::Runtime)
}
