pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod scope;
pub mod statement;
pub mod token;
pub mod value;

pub use error::Error;
pub use interpreter::Interpreter;

/// Runs a program, printing to standard output.
pub fn run(code: &str) -> Result<(), Error> {
    Interpreter::new().run(code)
}

/// Lines printed by a captured run, plus the error that stopped it, if any.
/// Lines printed before a failure are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct Captured {
    pub lines: Vec<String>,
    pub error: Option<Error>,
}

/// Runs a program on a fresh interpreter, collecting its output instead of
/// printing it.
pub fn run_captured(code: &str) -> Captured {
    let mut lines = vec![];
    let result = Interpreter::with_output(|line| lines.push(line.to_owned())).run(code);
    Captured {
        lines,
        error: result.err(),
    }
}
