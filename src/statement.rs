use crate::expr::Expr;
use std::rc::Rc;

pub type Block = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq)]
pub struct ElseIf {
    pub condition: Expr,
    pub block: Block,
}

/// A `karya` declaration. Function values share this node, so the body is
/// never copied once parsed.
#[derive(Debug, PartialEq)]
pub struct FunctionDecl {
    pub name: Rc<str>,
    pub params: Vec<Rc<str>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declare(Rc<str>, Expr),
    Assign(Rc<str>, Expr),
    Print(Expr),
    If {
        condition: Expr,
        then_block: Block,
        else_ifs: Vec<ElseIf>,
        else_block: Option<Block>,
    },
    While(Expr, Block),
    Break,
    Continue,
    Function(Rc<FunctionDecl>),
    Return(Option<Expr>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Stmt>,
}
