use std::{fmt, rc::Rc};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenType,
    /// Raw text of the token. Compound keywords are joined by a single space,
    /// string literals hold their unescaped contents.
    pub value: Rc<str>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenType, value: impl Into<Rc<str>>, line: usize) -> Self {
        Token {
            kind,
            value: value.into(),
            line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    // Two-word keywords.
    ProgramStart,
    ProgramEnd,
    Declare,
    Print,
    ElseIf,
    Continue,

    If,
    Else,
    While,
    Break,
    Function,
    Return,
    Null,
    True,
    False,
    And,
    Or,
    Not,

    Number,
    String,
    Identifier,

    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    EqualEqual,
    BangEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,

    Newline,
    Eof,
}

impl TokenType {
    pub fn lookup_compound(first: &str, second: &str) -> Option<TokenType> {
        use TokenType::*;

        match (first, second) {
            ("bola", "saheb") => Some(ProgramStart),
            ("yeto", "saheb") => Some(ProgramEnd),
            ("he", "ghe") => Some(Declare),
            ("he", "bol") => Some(Print),
            ("nahitr", "jr") => Some(ElseIf),
            ("pudhe", "ja") => Some(Continue),
            _ => None,
        }
    }

    pub fn lookup_keyword(word: &str) -> Option<TokenType> {
        use TokenType::*;

        match word {
            "jr" => Some(If),
            "nahitr" => Some(Else),
            "joparyant" => Some(While),
            "thamb" => Some(Break),
            "karya" => Some(Function),
            "parat" => Some(Return),
            "shunya" => Some(Null),
            "barobr" => Some(True),
            "chuk" => Some(False),
            "ani" => Some(And),
            "kinva" => Some(Or),
            "nahi" => Some(Not),
            _ => None,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use TokenType::*;

        let s = match self {
            ProgramStart => "'bola saheb'",
            ProgramEnd => "'yeto saheb'",
            Declare => "'he ghe'",
            Print => "'he bol'",
            ElseIf => "'nahitr jr'",
            Continue => "'pudhe ja'",

            If => "'jr'",
            Else => "'nahitr'",
            While => "'joparyant'",
            Break => "'thamb'",
            Function => "'karya'",
            Return => "'parat'",
            Null => "'shunya'",
            True => "'barobr'",
            False => "'chuk'",
            And => "'ani'",
            Or => "'kinva'",
            Not => "'nahi'",

            Number => "number",
            String => "string",
            Identifier => "identifier",

            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            Assign => "'='",
            EqualEqual => "'=='",
            BangEqual => "'!='",
            Less => "'<'",
            Greater => "'>'",
            LessEqual => "'<='",
            GreaterEqual => "'>='",

            LeftParen => "'('",
            RightParen => "')'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Comma => "','",

            Newline => "end of line",
            Eof => "end of input",
        };
        write!(f, "{s}")
    }
}
