//! Interactive read-evaluate-print loop. When the parser reports exactly
//! the unexpected-end-of-input sentinel, the loop shows a continuation
//! prompt and keeps accumulating lines before parsing again.

use owo_colors::OwoColorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use crate::config::AppConfig;
use crate::interpreter::{self, Environment, ParseError, Parser};
use crate::lexer::Lexer;

const PROMPT: &str = ">> ";
const CONTINUE_PROMPT: &str = "..";

pub fn start(config: &AppConfig) -> rustyline::Result<()> {
    let mut editor = DefaultEditor::new()?;
    let env = Environment::new();
    let mut parser = Parser::new();

    loop {
        let line = match editor.readline(PROMPT) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(error) => return Err(error),
        };

        if let Some(command) = line.strip_prefix('.') {
            match command.trim() {
                "exit" => break,
                other => println!("Unknown command: {other}"),
            }
            continue;
        }
        if line.trim().is_empty() {
            continue;
        }

        let mut source = line;
        parser.init(Lexer::new(&source));
        let mut program = parser.parse_program();

        while needs_more_input(&parser) {
            // Two dots per open block, mirroring the nesting depth.
            let prompt = format!("{CONTINUE_PROMPT}{} ", ".".repeat(parser.indent() * 2));
            match editor.readline(&prompt) {
                Ok(next_line) => {
                    source.push('\n');
                    source.push_str(&next_line);
                }
                Err(ReadlineError::Interrupted) => {
                    source.clear();
                    break;
                }
                Err(ReadlineError::Eof) => return Ok(()),
                Err(error) => return Err(error),
            }
            parser.init(Lexer::new(&source));
            program = parser.parse_program();
        }
        if source.is_empty() {
            continue;
        }

        let _ = editor.add_history_entry(&source);

        if !parser.errors().is_empty() {
            for error in parser.errors() {
                report(config, &format!("{}: {}", error.kind(), error));
            }
            continue;
        }

        interpreter::define_macros(&mut program, &env);
        let program = match interpreter::expand_macros(program, &env) {
            Ok(program) => program,
            Err(error) => {
                report(config, &error.to_string());
                continue;
            }
        };

        match interpreter::eval_program(&program, &env) {
            Ok(Some(value)) => println!("{}", value.inspect()),
            Ok(None) => {}
            Err(error) => report(config, &error.to_string()),
        }
    }

    Ok(())
}

fn needs_more_input(parser: &Parser) -> bool {
    matches!(parser.errors(), [ParseError::UnexpectedEof])
}

fn report(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{message}");
    }
}
