use crate::expr::{BinaryOp, UnaryOp};
use crate::token::TokenType;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("[line {line}] unterminated string")]
    UnterminatedString { line: usize },
    #[error("[line {line}] unexpected character '{ch}'")]
    UnexpectedCharacter { ch: char, line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            Self::UnterminatedString { line } | Self::UnexpectedCharacter { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("[line {line}] expected {expected} but found \"{found}\"")]
    Expected {
        expected: TokenType,
        found: Rc<str>,
        line: usize,
    },
    #[error("[line {line}] \"{found}\" cannot start a statement")]
    UnexpectedStatement { found: Rc<str>, line: usize },
    #[error("[line {line}] \"{found}\" is not an expression")]
    NotAnExpression { found: Rc<str>, line: usize },
    #[error("[line {line}] unexpected \"{found}\" after end of statement")]
    TrailingToken { found: Rc<str>, line: usize },
    #[error("[line {line}] result of calling `{callee}` must be kept, write: he ghe _ = {callee}(...)")]
    CallStatement { callee: Rc<str>, line: usize },
    #[error("[line {line}] invalid number \"{found}\"")]
    InvalidNumber { found: Rc<str>, line: usize },
}

impl ParseError {
    pub fn line(&self) -> usize {
        match self {
            Self::Expected { line, .. }
            | Self::UnexpectedStatement { line, .. }
            | Self::NotAnExpression { line, .. }
            | Self::TrailingToken { line, .. }
            | Self::CallStatement { line, .. }
            | Self::InvalidNumber { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeError {
    #[error("\"{0}\" is already declared in this scope")]
    AlreadyDeclared(Rc<str>),
    #[error("\"{0}\" is not declared, declare it first with `he ghe {0} = ...`")]
    Undeclared(Rc<str>),
    #[error("\"{0}\" not found, has it been declared?")]
    Undefined(Rc<str>),
    #[error("\"{0}\" is not a function")]
    NotAFunction(Rc<str>),
    #[error("\"{name}\" expects {expected} argument(s) but got {got}")]
    ArityMismatch {
        name: Rc<str>,
        expected: usize,
        got: usize,
    },
    #[error("'{keyword}' needs a boolean condition but got \"{found}\"")]
    ConditionNotBoolean { keyword: &'static str, found: String },
    #[error("'{op}' only works on booleans but got \"{found}\"")]
    LogicalOperand { op: BinaryOp, found: String },
    #[error("'{0}' cannot be used on booleans, only '==' and '!=' can")]
    BooleanOperator(BinaryOp),
    #[error("'{op}' cannot be used on {left} and {right}")]
    InvalidOperands {
        op: BinaryOp,
        left: &'static str,
        right: &'static str,
    },
    #[error("'{op}' only works on {expected} but got \"{found}\"")]
    InvalidOperand {
        op: UnaryOp,
        expected: &'static str,
        found: String,
    },
    #[error("division by zero")]
    DivisionByZero,
    #[error("'{0}' used outside of a loop")]
    ControlOutsideLoop(&'static str),
    #[error("'parat' used outside of a function")]
    ReturnOutsideFunction,
}

/// Any failure of the lex → parse → interpret pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lex(_) => "LexError",
            Self::Parse(_) => "ParseError",
            Self::Runtime(_) => "RuntimeError",
        }
    }

    /// Source line, when the failing stage knows it.
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Lex(e) => Some(e.line()),
            Self::Parse(e) => Some(e.line()),
            Self::Runtime(_) => None,
        }
    }
}
