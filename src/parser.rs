use crate::error::ParseError;
use crate::expr::*;
use crate::statement::*;
use crate::token::*;

use log::debug;
use std::rc::Rc;

type ExprResult = Result<Expr, ParseError>;
type StmtResult = Result<Stmt, ParseError>;

pub struct Parser<'a> {
    tokens: &'a [Token],
    index: usize,
    // Stands in for a missing end-of-input token so lookahead never runs dry.
    eof: Token,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Parser<'a> {
        let line = tokens.last().map_or(1, |t| t.line);
        Parser {
            tokens,
            index: 0,
            eof: Token::new(TokenType::Eof, "", line),
        }
    }

    fn current(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or(&self.eof)
    }

    fn check(&self, kind: TokenType) -> bool {
        self.current().kind == kind
    }

    fn check_next(&self, kind: TokenType) -> bool {
        self.tokens.get(self.index + 1).is_some_and(|t| t.kind == kind)
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if tok.kind != TokenType::Eof {
            self.index += 1;
        }
        tok
    }

    fn match_next_lits<const N: usize>(&mut self, kinds: [TokenType; N]) -> Option<TokenType> {
        let kind = self.current().kind;
        if kinds.contains(&kind) {
            self.advance();
            Some(kind)
        } else {
            None
        }
    }

    fn skip_newline(&mut self) {
        if self.check(TokenType::Newline) {
            self.advance();
        }
    }

    fn consume(&mut self, kind: TokenType) -> Result<Token, ParseError> {
        if !self.check(kind) {
            let found = self.current();
            return Err(ParseError::Expected {
                expected: kind,
                found: found.value.clone(),
                line: found.line,
            });
        }
        Ok(self.advance())
    }

    fn consume_identifier(&mut self) -> Result<Rc<str>, ParseError> {
        Ok(self.consume(TokenType::Identifier)?.value)
    }

    // A statement ends at a newline, or right before something that closes
    // the enclosing block or program.
    fn end_of_statement(&mut self) -> Result<(), ParseError> {
        let kind = self.current().kind;
        match kind {
            TokenType::Newline => {
                self.advance();
                Ok(())
            }
            TokenType::Eof | TokenType::ProgramEnd | TokenType::RightBrace => Ok(()),
            _ => {
                let tok = self.current();
                Err(ParseError::TrailingToken {
                    found: tok.value.clone(),
                    line: tok.line,
                })
            }
        }
    }

    // Parsing the actual grammar.
    pub fn parse(&mut self) -> Result<Program, ParseError> {
        self.consume(TokenType::ProgramStart)?;
        self.end_of_statement()?;

        let mut statements = vec![];
        while !self.check(TokenType::ProgramEnd) && !self.check(TokenType::Eof) {
            if self.match_next_lits([TokenType::Newline]).is_some() {
                continue;
            }
            statements.push(self.statement()?);
        }
        self.consume(TokenType::ProgramEnd)?;

        debug!("parsed {} top-level statements", statements.len());
        Ok(Program { statements })
    }

    /// Parses `{ ... }` with the opening brace still pending.
    fn block(&mut self) -> Result<Block, ParseError> {
        self.consume(TokenType::LeftBrace)?;
        self.skip_newline();

        let mut res = vec![];
        while !self.check(TokenType::RightBrace) && !self.check(TokenType::Eof) {
            if self.match_next_lits([TokenType::Newline]).is_some() {
                continue;
            }
            res.push(self.statement()?);
        }
        self.consume(TokenType::RightBrace)?;
        Ok(res)
    }

    fn statement(&mut self) -> StmtResult {
        let kind = self.current().kind;
        match kind {
            TokenType::Declare => self.declare_statement(),
            TokenType::Identifier => self.assign_statement(),
            TokenType::Print => self.print_statement(),
            TokenType::If => self.if_statement(),
            TokenType::While => self.while_statement(),
            TokenType::Break => {
                self.advance();
                self.end_of_statement()?;
                Ok(Stmt::Break)
            }
            TokenType::Continue => {
                self.advance();
                self.end_of_statement()?;
                Ok(Stmt::Continue)
            }
            TokenType::Function => self.function(),
            TokenType::Return => self.return_statement(),
            _ => {
                let tok = self.current();
                Err(ParseError::UnexpectedStatement {
                    found: tok.value.clone(),
                    line: tok.line,
                })
            }
        }
    }

    fn declare_statement(&mut self) -> StmtResult {
        self.consume(TokenType::Declare)?;
        let id = self.consume_identifier()?;
        self.consume(TokenType::Assign)?;
        let value = self.expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Declare(id, value))
    }

    fn assign_statement(&mut self) -> StmtResult {
        let name = self.consume(TokenType::Identifier)?;
        // The language has no expression statements, so a call's result
        // has nowhere to go.
        if self.check(TokenType::LeftParen) {
            return Err(ParseError::CallStatement {
                callee: name.value,
                line: name.line,
            });
        }
        self.consume(TokenType::Assign)?;
        let value = self.expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Assign(name.value, value))
    }

    fn print_statement(&mut self) -> StmtResult {
        self.consume(TokenType::Print)?;
        let value = self.expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Print(value))
    }

    fn if_statement(&mut self) -> StmtResult {
        self.consume(TokenType::If)?;
        let condition = self.expression()?;
        self.skip_newline();
        let then_block = self.block()?;

        let mut else_ifs = vec![];
        let mut else_block = None;
        loop {
            self.skip_newline();
            if self.match_next_lits([TokenType::ElseIf]).is_some() {
                let condition = self.expression()?;
                self.skip_newline();
                let block = self.block()?;
                else_ifs.push(ElseIf { condition, block });
                continue;
            }
            if self.match_next_lits([TokenType::Else]).is_some() {
                self.skip_newline();
                else_block = Some(self.block()?);
            }
            break;
        }
        self.skip_newline();

        Ok(Stmt::If {
            condition,
            then_block,
            else_ifs,
            else_block,
        })
    }

    fn while_statement(&mut self) -> StmtResult {
        self.consume(TokenType::While)?;
        let condition = self.expression()?;
        self.skip_newline();
        let body = self.block()?;
        self.skip_newline();
        Ok(Stmt::While(condition, body))
    }

    fn function(&mut self) -> StmtResult {
        self.consume(TokenType::Function)?;
        let name = self.consume_identifier()?;
        self.consume(TokenType::LeftParen)?;

        let mut params = vec![];
        if !self.check(TokenType::RightParen) {
            params.push(self.consume_identifier()?);
            while self.match_next_lits([TokenType::Comma]).is_some() {
                params.push(self.consume_identifier()?);
            }
        }
        self.consume(TokenType::RightParen)?;

        self.skip_newline();
        let body = self.block()?;
        self.skip_newline();

        Ok(Stmt::Function(Rc::new(FunctionDecl { name, params, body })))
    }

    fn return_statement(&mut self) -> StmtResult {
        self.consume(TokenType::Return)?;

        if self.check(TokenType::Newline)
            || self.check(TokenType::Eof)
            || self.check(TokenType::RightBrace)
        {
            self.skip_newline();
            return Ok(Stmt::Return(None));
        }

        let value = self.expression()?;
        self.end_of_statement()?;
        Ok(Stmt::Return(Some(value)))
    }

    pub fn expression(&mut self) -> ExprResult {
        self.logic_or()
    }

    fn logic_or(&mut self) -> ExprResult {
        let mut expr = self.logic_and()?;
        while self.match_next_lits([TokenType::Or]).is_some() {
            let right = self.logic_and()?;
            expr = Expr::binary(BinaryOp::Or, expr, right);
        }
        Ok(expr)
    }

    fn logic_and(&mut self) -> ExprResult {
        let mut expr = self.comparison()?;
        while self.match_next_lits([TokenType::And]).is_some() {
            let right = self.comparison()?;
            expr = Expr::binary(BinaryOp::And, expr, right);
        }
        Ok(expr)
    }

    // Comparisons don't chain: `a < b < c` leaves the second `<` unparsed.
    fn comparison(&mut self) -> ExprResult {
        let expr = self.term()?;
        let op = match self.match_next_lits([
            TokenType::EqualEqual,
            TokenType::BangEqual,
            TokenType::Less,
            TokenType::Greater,
            TokenType::LessEqual,
            TokenType::GreaterEqual,
        ]) {
            Some(TokenType::EqualEqual) => BinaryOp::Equal,
            Some(TokenType::BangEqual) => BinaryOp::NotEqual,
            Some(TokenType::Less) => BinaryOp::Less,
            Some(TokenType::Greater) => BinaryOp::Greater,
            Some(TokenType::LessEqual) => BinaryOp::LessEqual,
            Some(_) => BinaryOp::GreaterEqual,
            None => return Ok(expr),
        };
        let right = self.term()?;
        Ok(Expr::binary(op, expr, right))
    }

    fn term(&mut self) -> ExprResult {
        let mut expr = self.factor()?;
        while let Some(kind) = self.match_next_lits([TokenType::Plus, TokenType::Minus]) {
            let op = if kind == TokenType::Plus {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            let right = self.factor()?;
            expr = Expr::binary(op, expr, right);
        }
        Ok(expr)
    }

    fn factor(&mut self) -> ExprResult {
        let mut expr = self.unary()?;
        while let Some(kind) = self.match_next_lits([TokenType::Star, TokenType::Slash]) {
            let op = if kind == TokenType::Star {
                BinaryOp::Mul
            } else {
                BinaryOp::Div
            };
            let right = self.unary()?;
            expr = Expr::binary(op, expr, right);
        }
        Ok(expr)
    }

    fn unary(&mut self) -> ExprResult {
        if self.match_next_lits([TokenType::Not]).is_some() {
            return Ok(Expr::Unary(UnaryOp::Not, Box::new(self.unary()?)));
        }
        if self.match_next_lits([TokenType::Minus]).is_some() {
            return Ok(match self.unary()? {
                Expr::Number(x) => Expr::Number(-x),
                operand => Expr::Unary(UnaryOp::Negate, Box::new(operand)),
            });
        }
        self.primary()
    }

    fn finish_call(&mut self, callee: Rc<str>) -> ExprResult {
        self.consume(TokenType::LeftParen)?;
        let mut args = vec![];
        if !self.check(TokenType::RightParen) {
            args.push(self.expression()?);
            while self.match_next_lits([TokenType::Comma]).is_some() {
                args.push(self.expression()?);
            }
        }
        self.consume(TokenType::RightParen)?;
        Ok(Expr::Call(callee, args))
    }

    fn primary(&mut self) -> ExprResult {
        let tok = self.current().clone();
        let res = match tok.kind {
            TokenType::Number => match tok.value.parse() {
                Ok(x) => Expr::Number(x),
                Err(_) => {
                    return Err(ParseError::InvalidNumber {
                        found: tok.value,
                        line: tok.line,
                    })
                }
            },
            TokenType::String => Expr::String(tok.value.clone()),
            TokenType::True => Expr::Bool(true),
            TokenType::False => Expr::Bool(false),
            TokenType::Null => Expr::Null,
            TokenType::Identifier if self.check_next(TokenType::LeftParen) => {
                self.advance();
                return self.finish_call(tok.value);
            }
            TokenType::Identifier => Expr::Identifier(tok.value.clone()),
            TokenType::LeftParen => {
                self.advance();
                let expr = self.expression()?;
                self.consume(TokenType::RightParen)?;
                return Ok(expr);
            }
            _ => {
                return Err(ParseError::NotAnExpression {
                    found: tok.value,
                    line: tok.line,
                })
            }
        };
        self.advance();
        Ok(res)
    }
}

/// Parses a token stream produced by [`crate::scanner::scan`].
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::parse;
    use crate::error::ParseError;
    use crate::expr::{BinaryOp, Expr};
    use crate::scanner::scan;
    use crate::statement::{Program, Stmt};
    use std::rc::Rc;

    fn parse_src(code: &str) -> Result<Program, ParseError> {
        parse(&scan(code).unwrap())
    }

    fn program(body: &str) -> Program {
        parse_src(&format!("bola saheb\n{body}\nyeto saheb")).unwrap()
    }

    fn declared(body: &str) -> Expr {
        match program(body).statements.remove(0) {
            Stmt::Declare(_, value) => value,
            other => panic!("expected declaration, got {other:?}"),
        }
    }

    #[test]
    fn empty_program() {
        assert!(program("").statements.is_empty());
        assert!(parse_src("bola saheb\nyeto saheb").unwrap().statements.is_empty());
    }

    #[test]
    fn declaration() {
        assert_eq!(
            program("he ghe x = 10").statements,
            vec![Stmt::Declare("x".into(), Expr::Number(10.0))]
        );
    }

    #[test]
    fn precedence() {
        assert_eq!(declared("he ghe r = 2 + 3 * 4").to_string(), "(2 + (3 * 4))");
        assert_eq!(declared("he ghe r = (2 + 3) * 4").to_string(), "((2 + 3) * 4)");
        assert_eq!(declared("he ghe r = 1 + 2 + 3").to_string(), "((1 + 2) + 3)");
        assert_eq!(
            declared("he ghe r = x > 0 ani y < 10").to_string(),
            "((x > 0) ani (y < 10))"
        );
        assert_eq!(
            declared("he ghe r = a kinva b ani c").to_string(),
            "(a kinva (b ani c))"
        );
        assert_eq!(declared("he ghe r = nahi a == b").to_string(), "((nahi a) == b)");
    }

    #[test]
    fn comparison_does_not_chain() {
        assert!(matches!(
            parse_src("bola saheb\nhe ghe r = 1 < 2 < 3\nyeto saheb"),
            Err(ParseError::TrailingToken { line: 2, .. })
        ));
        assert_eq!(declared("he ghe r = (1 < 2) == barobr").to_string(), "((1 < 2) == barobr)");
    }

    #[test]
    fn negative_literals_fold() {
        assert_eq!(declared("he ghe r = -5"), Expr::Number(-5.0));
        assert_eq!(declared("he ghe r = - -5"), Expr::Number(5.0));
        assert_eq!(declared("he ghe r = -x").to_string(), "(-x)");
        assert_eq!(declared("he ghe r = 3 - -2").to_string(), "(3 - -2)");
    }

    #[test]
    fn calls() {
        assert_eq!(
            declared("he ghe r = add(1, x * 2)"),
            Expr::Call(
                "add".into(),
                vec![
                    Expr::Number(1.0),
                    Expr::binary(BinaryOp::Mul, Expr::Identifier("x".into()), Expr::Number(2.0)),
                ]
            )
        );
        assert_eq!(declared("he ghe r = now()"), Expr::Call("now".into(), vec![]));
    }

    #[test]
    fn if_chain() {
        let stmts = program(
            "jr x > 1 {\n he bol 1\n}\nnahitr jr x > 0 {\n he bol 2\n} nahitr jr x == 0 {\n he bol 3\n}\nnahitr\n{\n he bol 4\n}",
        )
        .statements;
        assert_eq!(stmts.len(), 1);
        match &stmts[0] {
            Stmt::If {
                then_block,
                else_ifs,
                else_block,
                ..
            } => {
                assert_eq!(then_block.len(), 1);
                assert_eq!(else_ifs.len(), 2);
                assert_eq!(else_block.as_ref().map(Vec::len), Some(1));
            }
            other => panic!("expected if, got {other:?}"),
        }
    }

    #[test]
    fn function_declaration() {
        let stmts = program("karya add(a, b) {\n parat a + b\n}\nkarya hello()\n{\n parat\n}").statements;
        match (&stmts[0], &stmts[1]) {
            (Stmt::Function(add), Stmt::Function(hello)) => {
                assert_eq!(&*add.name, "add");
                assert_eq!(add.params, vec![Rc::<str>::from("a"), Rc::from("b")]);
                assert_eq!(add.body.len(), 1);
                assert!(hello.params.is_empty());
                assert_eq!(hello.body, vec![Stmt::Return(None)]);
            }
            other => panic!("expected two functions, got {other:?}"),
        }
    }

    #[test]
    fn loop_control() {
        let stmts = program("joparyant barobr {\n thamb\n pudhe ja\n}").statements;
        assert_eq!(
            stmts,
            vec![Stmt::While(Expr::Bool(true), vec![Stmt::Break, Stmt::Continue])]
        );
    }

    #[test]
    fn call_statement_rejected() {
        match parse_src("bola saheb\ngreet(\"jag\")\nyeto saheb") {
            Err(ParseError::CallStatement { callee, line: 2 }) => assert_eq!(&*callee, "greet"),
            other => panic!("expected call statement error, got {other:?}"),
        }
    }

    #[test]
    fn errors_carry_token_and_line() {
        match parse_src("bola saheb\nhe ghe = 3\nyeto saheb") {
            Err(err @ ParseError::Expected { line: 2, .. }) => {
                assert!(err.to_string().contains("\"=\""), "{err}")
            }
            other => panic!("expected missing identifier, got {other:?}"),
        }
        assert!(matches!(
            parse_src("he bol 1"),
            Err(ParseError::Expected { line: 1, .. })
        ));
        assert!(matches!(
            parse_src("bola saheb\n+ 1\nyeto saheb"),
            Err(ParseError::UnexpectedStatement { line: 2, .. })
        ));
        assert!(matches!(
            parse_src("bola saheb\nhe bol )\nyeto saheb"),
            Err(ParseError::NotAnExpression { line: 2, .. })
        ));
        assert!(matches!(
            parse_src("bola saheb\nhe bol 1"),
            Err(ParseError::Expected { line: 2, .. })
        ));
    }
}
