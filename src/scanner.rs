use crate::error::LexError;
use crate::token::*;
use log::debug;

struct Scanner<'a> {
    str: &'a [char],
    index: usize,
    line: usize,
    tokens: Vec<Token>,
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

impl<'a> Scanner<'a> {
    fn new(str: &'a [char]) -> Self {
        Self {
            str,
            index: 0,
            line: 1,
            tokens: vec![],
        }
    }

    fn advance(&mut self) -> Option<char> {
        self.index += 1;
        self.str.get(self.index - 1).copied()
    }

    /// Consumes the next character only if it is `c`.
    fn match_next(&mut self, c: char) -> bool {
        let res = self.str.get(self.index).is_some_and(|d| c == *d);
        if res {
            self.index += 1;
        }
        res
    }

    fn peek(&self) -> Option<char> {
        self.str.get(self.index).copied()
    }

    fn peek_second(&self) -> Option<char> {
        self.str.get(self.index + 1).copied()
    }

    fn emit(&mut self, kind: TokenType, value: impl Into<std::rc::Rc<str>>) {
        self.tokens.push(Token::new(kind, value, self.line));
    }

    fn text(&self, start: usize) -> String {
        self.str[start..self.index].iter().collect()
    }

    fn string(&mut self) -> Result<(), LexError> {
        let mut value = String::new();
        loop {
            match self.advance() {
                Some('"') => break,
                Some('\n') | None => return Err(LexError::UnterminatedString { line: self.line }),
                Some('\\') if self.peek() == Some('n') => {
                    self.advance();
                    value.push('\n');
                }
                Some(c) => value.push(c),
            }
        }
        self.emit(TokenType::String, value);
        Ok(())
    }

    fn number(&mut self, start: usize) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = self.text(start);
        self.emit(TokenType::Number, text);
    }

    fn word(&mut self, start: usize) -> String {
        self.index = start;
        while self.peek().is_some_and(is_word_char) {
            self.advance();
        }
        self.text(start)
    }

    fn word_or_keyword(&mut self, start: usize) {
        let first = self.word(start);
        let after_first = self.index;

        // Two-word keywords may be separated by spaces and tabs, never newlines.
        while matches!(self.peek(), Some(' ' | '\t')) {
            self.advance();
        }
        if self.peek().is_some_and(is_word_start) {
            let second_start = self.index;
            let second = self.word(second_start);
            if let Some(kind) = TokenType::lookup_compound(&first, &second) {
                self.emit(kind, format!("{first} {second}"));
                return;
            }
        }
        self.index = after_first;

        match TokenType::lookup_keyword(&first) {
            Some(kind) => self.emit(kind, first),
            None => self.emit(TokenType::Identifier, first),
        }
    }

    fn newline(&mut self) {
        let after_token = self
            .tokens
            .last()
            .is_some_and(|t| t.kind != TokenType::Newline);
        if after_token {
            self.emit(TokenType::Newline, "\\n");
        }
        self.line += 1;
    }

    fn scan_token(&mut self, c: char) -> Result<(), LexError> {
        let start = self.index - 1;
        let (kind, text) = match c {
            '\n' => {
                self.newline();
                return Ok(());
            }
            '\r' | '\t' | ' ' => return Ok(()),
            '-' if self.peek() == Some('-') => {
                while !matches!(self.peek(), Some('\n') | None) {
                    self.advance();
                }
                return Ok(());
            }
            '"' => return self.string(),
            c if c.is_ascii_digit() => {
                self.number(start);
                return Ok(());
            }
            c if is_word_start(c) => {
                self.word_or_keyword(start);
                return Ok(());
            }
            '=' if self.match_next('=') => (TokenType::EqualEqual, "=="),
            '!' if self.match_next('=') => (TokenType::BangEqual, "!="),
            '<' if self.match_next('=') => (TokenType::LessEqual, "<="),
            '>' if self.match_next('=') => (TokenType::GreaterEqual, ">="),
            '+' => (TokenType::Plus, "+"),
            '-' => (TokenType::Minus, "-"),
            '*' => (TokenType::Star, "*"),
            '/' => (TokenType::Slash, "/"),
            '=' => (TokenType::Assign, "="),
            '<' => (TokenType::Less, "<"),
            '>' => (TokenType::Greater, ">"),
            '(' => (TokenType::LeftParen, "("),
            ')' => (TokenType::RightParen, ")"),
            '{' => (TokenType::LeftBrace, "{"),
            '}' => (TokenType::RightBrace, "}"),
            ',' => (TokenType::Comma, ","),
            ch => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    line: self.line,
                })
            }
        };
        self.emit(kind, text);
        Ok(())
    }
}

/// Tokenizes a whole source text. The returned tokens always end with a
/// single [`TokenType::Eof`].
pub fn scan(code: &str) -> Result<Vec<Token>, LexError> {
    let chars = code.chars().collect::<Vec<_>>();
    let mut scanner = Scanner::new(&chars);

    while let Some(c) = scanner.advance() {
        scanner.scan_token(c)?;
    }
    scanner.emit(TokenType::Eof, "");

    debug!("scanned {} tokens over {} lines", scanner.tokens.len(), scanner.line);
    Ok(scanner.tokens)
}

/// Whether `code` already holds a `yeto saheb` token, ignoring the words
/// inside strings and comments. Input that fails to scan counts as finished
/// so the error can be reported.
pub fn closes_program(code: &str) -> bool {
    scan(code).map_or(true, |tokens| {
        tokens.iter().any(|t| t.kind == TokenType::ProgramEnd)
    })
}

#[cfg(test)]
mod tests {
    use super::{closes_program, scan};
    use crate::error::LexError;
    use crate::token::TokenType::{self, *};

    fn kinds(code: &str) -> Vec<TokenType> {
        scan(code).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn compound_keywords() {
        assert_eq!(kinds("bola saheb"), [ProgramStart, Eof]);
        assert_eq!(kinds("yeto saheb"), [ProgramEnd, Eof]);
        assert_eq!(kinds("he ghe"), [Declare, Eof]);
        assert_eq!(kinds("he bol"), [Print, Eof]);
        assert_eq!(kinds("nahitr jr"), [ElseIf, Eof]);
        assert_eq!(kinds("pudhe ja"), [Continue, Eof]);
    }

    #[test]
    fn compound_keyword_spacing() {
        let tokens = scan("he \t  ghe x").unwrap();
        assert_eq!(tokens[0].kind, Declare);
        assert_eq!(&*tokens[0].value, "he ghe");
        assert_eq!(tokens[1].kind, Identifier);
    }

    #[test]
    fn compound_keyword_not_across_lines() {
        assert_eq!(kinds("he\nghe"), [Identifier, Newline, Identifier, Eof]);
    }

    #[test]
    fn lone_first_word() {
        assert_eq!(kinds("nahitr {"), [Else, LeftBrace, Eof]);
        assert_eq!(kinds("nahitr x"), [Else, Identifier, Eof]);
        assert_eq!(kinds("he"), [Identifier, Eof]);
        assert_eq!(kinds("bola"), [Identifier, Eof]);
    }

    #[test]
    fn keywords() {
        assert_eq!(
            kinds("jr joparyant thamb karya parat shunya barobr chuk ani kinva nahi"),
            [If, While, Break, Function, Return, Null, True, False, And, Or, Not, Eof]
        );
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("+ - * / = == != < > <= >= ( ) { } ,"),
            [
                Plus, Minus, Star, Slash, Assign, EqualEqual, BangEqual, Less, Greater, LessEqual,
                GreaterEqual, LeftParen, RightParen, LeftBrace, RightBrace, Comma, Eof
            ]
        );
    }

    #[test]
    fn numbers() {
        let tokens = scan("42 3.14").unwrap();
        assert_eq!(tokens[0].kind, Number);
        assert_eq!(&*tokens[0].value, "42");
        assert_eq!(&*tokens[1].value, "3.14");
        // A trailing dot is not part of the number.
        assert!(matches!(
            scan("5."),
            Err(LexError::UnexpectedCharacter { ch: '.', line: 1 })
        ));
    }

    #[test]
    fn strings() {
        let tokens = scan(r#""Namaskar" "a\nb""#).unwrap();
        assert_eq!(tokens[0].kind, String);
        assert_eq!(&*tokens[0].value, "Namaskar");
        assert_eq!(&*tokens[1].value, "a\nb");
    }

    #[test]
    fn unterminated_string() {
        assert_eq!(
            scan("bola saheb\n\"open"),
            Err(LexError::UnterminatedString { line: 2 })
        );
        assert_eq!(
            scan("\"split\nline\""),
            Err(LexError::UnterminatedString { line: 1 })
        );
    }

    #[test]
    fn unexpected_character() {
        assert_eq!(
            scan("\n\nx = 1 % 2"),
            Err(LexError::UnexpectedCharacter { ch: '%', line: 3 })
        );
    }

    #[test]
    fn comments_and_newlines() {
        assert_eq!(kinds("-- just a comment\nbola saheb"), [ProgramStart, Eof]);
        assert_eq!(
            kinds("\n\nbola saheb\n\n\n-- note\nyeto saheb\n"),
            [ProgramStart, Newline, ProgramEnd, Newline, Eof]
        );
        assert_eq!(kinds("x - 1 -- minus one"), [Identifier, Minus, Number, Eof]);
    }

    #[test]
    fn line_numbers() {
        let tokens = scan("bola saheb\nhe ghe").unwrap();
        assert_eq!(tokens[0].line, 1);
        assert_eq!(tokens[1].line, 1);
        assert_eq!(tokens[2].line, 2);
    }

    #[test]
    fn program_end_detection() {
        assert!(!closes_program("bola saheb\nhe bol 1"));
        assert!(closes_program("bola saheb\nhe bol 1\nyeto saheb"));
        assert!(closes_program("bola saheb\nyeto\t  saheb"));
        assert!(!closes_program("bola saheb\nhe bol \"yeto saheb\""));
        assert!(!closes_program("bola saheb\n-- yeto saheb later"));
        assert!(!closes_program("bola saheb\nyeto\nsaheb"));
        assert!(closes_program("bola saheb\nhe bol 1 % 2"));
    }
}
