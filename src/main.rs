use clap::Parser;
use owo_colors::OwoColorize;

use ember::cli::{generate_completions, Args, Commands};
use ember::config::AppConfig;
use ember::interpreter::{self, Environment, RunError};
use ember::repl;

fn main() {
    let args = Args::parse();

    if let Some(Commands::Complete { shell }) = args.command {
        generate_completions(shell);
        return;
    }

    let config = AppConfig::from_args(&args);

    if let Some(code) = &args.eval {
        run_source(code, &config, true);
        return;
    }

    if let Some(script) = &args.script {
        let source = match std::fs::read_to_string(script) {
            Ok(source) => source,
            Err(error) => {
                error_message(&config, &format!("Failed to read {}: {}", script.display(), error));
                std::process::exit(1);
            }
        };
        run_source(&source, &config, false);
        return;
    }

    println!(
        "Ember {}, an expression-oriented scripting language.",
        env!("CARGO_PKG_VERSION")
    );
    println!("Type .exit or press Ctrl-D to quit.");
    if let Err(error) = repl::start(&config) {
        error_message(&config, &format!("REPL error: {error}"));
        std::process::exit(1);
    }
}

/// Runs a whole source buffer. Scripts stay silent about their final value
/// (output goes through `print`); `--eval` echoes it.
fn run_source(source: &str, config: &AppConfig, echo_result: bool) {
    let env = Environment::new();
    match interpreter::run(source, &env) {
        Ok(Some(value)) if echo_result => println!("{}", value.inspect()),
        Ok(_) => {}
        Err(RunError::Parse(errors)) => {
            for error in &errors {
                error_message(config, &format!("{}: {}", error.kind(), error));
            }
            std::process::exit(1);
        }
        Err(RunError::Runtime(error)) => {
            error_message(config, &error.to_string());
            std::process::exit(1);
        }
    }
}

fn error_message(config: &AppConfig, message: &str) {
    if config.color_enabled {
        eprintln!("{}", message.red().bold());
    } else {
        eprintln!("{message}");
    }
}
