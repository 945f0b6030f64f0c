use std::{fs, path::PathBuf, process::ExitCode};

use bol::scanner::closes_program;
use bol::Interpreter;
use clap::{Parser, Subcommand};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Completer, Editor, Helper, Highlighter, Hinter};

#[derive(Parser)]
#[command(name = "bol", about = "Run Bol programs", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
#[command(arg_required_else_help = true)]
enum Commands {
    /// Execute a Bol program
    Run {
        /// Path to the .bol file
        file: PathBuf,
    },
    /// Type programs interactively, each ending with `yeto saheb`
    Repl,
}

fn main() -> ExitCode {
    env_logger::init();

    match Cli::parse().command {
        Commands::Run { file } => run_file(file),
        Commands::Repl => match run_prompt() {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => fail(&err.to_string(), None),
        },
    }
}

fn fail(message: &str, hint: Option<&str>) -> ExitCode {
    eprintln!("\n{} {}", "✗ Chuk:".red(), message);
    if let Some(hint) = hint {
        eprintln!("  {} {}", "→".dimmed(), hint);
    }
    ExitCode::FAILURE
}

fn report(err: &bol::Error) {
    eprintln!("\n{} {}: {}\n", "✗".red(), err.kind().bold(), err);
}

fn run_file(file: PathBuf) -> ExitCode {
    if file.extension().map_or(true, |ext| ext != "bol") {
        return fail(
            &format!("wrong file extension: \"{}\"", file.display()),
            Some("Bol programs need a \".bol\" extension, e.g. maza.bol"),
        );
    }

    let content = match fs::read_to_string(&file) {
        Ok(content) => content,
        Err(err) => {
            return fail(
                &format!("cannot read \"{}\": {err}", file.display()),
                Some("does the file exist?"),
            )
        }
    };

    match bol::run(&content) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

#[derive(Helper, Completer, Hinter, Highlighter)]
struct ProgramHelper;

// Keep reading lines until the program is closed.
impl Validator for ProgramHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        if closes_program(ctx.input()) {
            Ok(ValidationResult::Valid(None))
        } else {
            Ok(ValidationResult::Incomplete)
        }
    }
}

fn run_prompt() -> rustyline::Result<()> {
    let mut rl = Editor::new()?;
    rl.set_helper(Some(ProgramHelper));

    loop {
        match rl.readline("> ") {
            Ok(program) => {
                let _ = rl.add_history_entry(program.as_str());
                // Every program hoists its own functions, so each gets a fresh interpreter.
                if let Err(err) = Interpreter::new().run(&program) {
                    report(&err);
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(err) => return Err(err),
        }
    }
}
