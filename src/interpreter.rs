use crate::error::{Error, RuntimeError};
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::parser::parse;
use crate::scanner::scan;
use crate::scope::Scope;
use crate::statement::{Program, Stmt};
use crate::value::{format_number, Val};

use log::{debug, trace};
use std::rc::Rc;

/// How a statement or block finished. Anything but `Normal` stops the
/// enclosing block and travels outwards until a loop or call consumes it.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Normal,
    Break,
    Continue,
    Return(Val),
}

type ExecResult = Result<Flow, RuntimeError>;
type EvalResult = Result<Val, RuntimeError>;

pub struct Interpreter<'o> {
    global_scope: Scope<'static>,
    output: Box<dyn FnMut(&str) + 'o>,
}

impl Default for Interpreter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'o> Interpreter<'o> {
    /// An interpreter printing to standard output.
    pub fn new() -> Interpreter<'o> {
        Self::with_output(|line| println!("{line}"))
    }

    /// An interpreter handing every printed line to `output`.
    pub fn with_output(output: impl FnMut(&str) + 'o) -> Interpreter<'o> {
        Interpreter {
            global_scope: Scope::default(),
            output: Box::new(output),
        }
    }

    /// Scans, parses and runs `code`.
    pub fn run(&mut self, code: &str) -> Result<(), Error> {
        let tokens = scan(code)?;
        let program = parse(&tokens)?;
        self.run_program(&program)?;
        Ok(())
    }

    pub fn run_program(&mut self, program: &Program) -> Result<(), RuntimeError> {
        let globals = &self.global_scope;
        let mut exec = Exec {
            globals,
            output: &mut *self.output,
        };

        // Functions are visible before their declaration in the source.
        for stmt in &program.statements {
            if let Stmt::Function(decl) = stmt {
                debug!("hoisting function `{}`", decl.name);
                globals.declare(decl.name.clone(), Val::Function(decl.clone()))?;
            }
        }

        for stmt in &program.statements {
            match exec.exec(stmt, globals)? {
                Flow::Normal => {}
                Flow::Break => return Err(RuntimeError::ControlOutsideLoop("thamb")),
                Flow::Continue => return Err(RuntimeError::ControlOutsideLoop("pudhe ja")),
                Flow::Return(_) => return Err(RuntimeError::ReturnOutsideFunction),
            }
        }
        debug!("program finished");
        Ok(())
    }

    pub fn get_global(&self, id: &str) -> Option<Val> {
        self.global_scope.try_get_here(id)
    }
}

/// Per-run state: the global scope every call is parented to, and the sink
/// printed lines go to.
struct Exec<'g, 'o> {
    globals: &'g Scope<'g>,
    output: &'o mut dyn FnMut(&str),
}

impl<'g, 'o> Exec<'g, 'o> {
    fn exec_block(&mut self, stmts: &[Stmt], scope: &Scope) -> ExecResult {
        for stmt in stmts {
            match self.exec(stmt, scope)? {
                Flow::Normal => continue,
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    fn exec(&mut self, stmt: &Stmt, scope: &Scope) -> ExecResult {
        match stmt {
            Stmt::Declare(id, expr) => {
                let val = self.eval(expr, scope)?;
                scope.declare(id.clone(), val)?;
            }
            Stmt::Assign(id, expr) => {
                let val = self.eval(expr, scope)?;
                scope.assign(id, val)?;
            }
            Stmt::Print(expr) => {
                let line = self.eval(expr, scope)?.to_string();
                (self.output)(&line);
            }
            Stmt::If {
                condition,
                then_block,
                else_ifs,
                else_block,
            } => {
                if self.condition(condition, "jr", scope)? {
                    return self.exec_block(then_block, &Scope::new_child(scope));
                }
                for clause in else_ifs {
                    if self.condition(&clause.condition, "nahitr jr", scope)? {
                        return self.exec_block(&clause.block, &Scope::new_child(scope));
                    }
                }
                if let Some(block) = else_block {
                    return self.exec_block(block, &Scope::new_child(scope));
                }
            }
            Stmt::While(condition, body) => {
                while self.condition(condition, "joparyant", scope)? {
                    match self.exec_block(body, &Scope::new_child(scope))? {
                        Flow::Break => break,
                        Flow::Normal | Flow::Continue => {}
                        ret @ Flow::Return(_) => return Ok(ret),
                    }
                }
            }
            Stmt::Break => return Ok(Flow::Break),
            Stmt::Continue => return Ok(Flow::Continue),
            // Only top-level functions exist, all bound by the hoisting pass.
            Stmt::Function(_) => {}
            Stmt::Return(Some(expr)) => return Ok(Flow::Return(self.eval(expr, scope)?)),
            Stmt::Return(None) => return Ok(Flow::Return(Val::Null)),
        }
        Ok(Flow::Normal)
    }

    fn condition(&mut self, expr: &Expr, keyword: &'static str, scope: &Scope) -> Result<bool, RuntimeError> {
        match self.eval(expr, scope)? {
            Val::Bool(b) => Ok(b),
            other => Err(RuntimeError::ConditionNotBoolean {
                keyword,
                found: other.to_string(),
            }),
        }
    }

    fn eval(&mut self, expr: &Expr, scope: &Scope) -> EvalResult {
        match expr {
            Expr::Number(x) => Ok(Val::Num(*x)),
            Expr::String(s) => Ok(Val::String(s.clone())),
            Expr::Bool(b) => Ok(Val::Bool(*b)),
            Expr::Null => Ok(Val::Null),
            Expr::Identifier(id) => scope.get(id),
            Expr::Binary(op @ (BinaryOp::And | BinaryOp::Or), l, r) => self.logical(*op, l, r, scope),
            Expr::Binary(op, l, r) => {
                let l = self.eval(l, scope)?;
                let r = self.eval(r, scope)?;
                binary(*op, l, r)
            }
            Expr::Unary(op, x) => match (op, self.eval(x, scope)?) {
                (UnaryOp::Not, Val::Bool(b)) => Ok(Val::Bool(!b)),
                (UnaryOp::Negate, Val::Num(a)) => Ok(Val::Num(-a)),
                (UnaryOp::Not, other) => Err(RuntimeError::InvalidOperand {
                    op: *op,
                    expected: "booleans",
                    found: other.to_string(),
                }),
                (UnaryOp::Negate, other) => Err(RuntimeError::InvalidOperand {
                    op: *op,
                    expected: "numbers",
                    found: other.to_string(),
                }),
            },
            Expr::Call(callee, args) => self.call(callee, args, scope),
        }
    }

    fn logical(&mut self, op: BinaryOp, l: &Expr, r: &Expr, scope: &Scope) -> EvalResult {
        // `ani` stops at the first false, `kinva` at the first true.
        let short_circuit = op == BinaryOp::Or;
        for operand in [l, r] {
            match self.eval(operand, scope)? {
                Val::Bool(b) if b == short_circuit => return Ok(Val::Bool(b)),
                Val::Bool(_) => continue,
                other => {
                    return Err(RuntimeError::LogicalOperand {
                        op,
                        found: other.to_string(),
                    })
                }
            }
        }
        Ok(Val::Bool(!short_circuit))
    }

    fn call(&mut self, callee: &Rc<str>, args: &[Expr], scope: &Scope) -> EvalResult {
        let Val::Function(func) = scope.get(callee)? else {
            return Err(RuntimeError::NotAFunction(callee.clone()));
        };

        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.eval(arg, scope)?);
        }
        if evaluated.len() != func.params.len() {
            return Err(RuntimeError::ArityMismatch {
                name: callee.clone(),
                expected: func.params.len(),
                got: evaluated.len(),
            });
        }

        // Calls see the globals, never the caller's locals.
        let frame = Scope::new_child(self.globals);
        for (param, arg) in func.params.iter().zip(evaluated) {
            frame.declare(param.clone(), arg)?;
        }
        trace!("calling `{}` at scope depth {}", func.name, frame.depth());

        match self.exec_block(&func.body, &frame)? {
            Flow::Return(val) => Ok(val),
            Flow::Normal => Ok(Val::Null),
            Flow::Break => Err(RuntimeError::ControlOutsideLoop("thamb")),
            Flow::Continue => Err(RuntimeError::ControlOutsideLoop("pudhe ja")),
        }
    }
}

fn binary(op: BinaryOp, l: Val, r: Val) -> EvalResult {
    use BinaryOp::*;

    match (op, l, r) {
        (Div, Val::Num(_), Val::Num(b)) if b == 0.0 => Err(RuntimeError::DivisionByZero),
        (op, Val::Num(a), Val::Num(b)) => Ok(match op {
            Add => Val::Num(a + b),
            Sub => Val::Num(a - b),
            Mul => Val::Num(a * b),
            Div => Val::Num(a / b),
            Equal => Val::Bool(a == b),
            NotEqual => Val::Bool(a != b),
            Less => Val::Bool(a < b),
            Greater => Val::Bool(a > b),
            LessEqual => Val::Bool(a <= b),
            GreaterEqual => Val::Bool(a >= b),
            And | Or => {
                return Err(RuntimeError::LogicalOperand {
                    op,
                    found: format_number(a),
                })
            }
        }),
        (Equal, Val::Bool(a), Val::Bool(b)) => Ok(Val::Bool(a == b)),
        (NotEqual, Val::Bool(a), Val::Bool(b)) => Ok(Val::Bool(a != b)),
        (op, Val::Bool(_), Val::Bool(_)) => Err(RuntimeError::BooleanOperator(op)),
        // Anything else added to a string-ish value concatenates display forms.
        (Add, l, r) => Ok(Val::String(format!("{l}{r}").into())),
        (Equal, l, r) => Ok(Val::Bool(l == r)),
        (NotEqual, l, r) => Ok(Val::Bool(l != r)),
        (op, l, r) => Err(RuntimeError::InvalidOperands {
            op,
            left: l.type_name(),
            right: r.type_name(),
        }),
    }
}
