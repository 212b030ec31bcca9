use std::fmt::Display;

use crate::utils::prelude::SrcSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Single-character tokens
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    Comma,
    Dot,
    Minus,
    Plus,
    Semicolon,
    Slash,
    Star,

    // One or two character tokens
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    And,
    Class,
    Else,
    False,
    Fun,
    For,
    If,
    Nil,
    Or,
    Print,
    Return,
    Super,
    This,
    True,
    Var,
    While,

    Eof,
}

impl TokenKind {
    pub fn is_reserved_word(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Class
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::Fun
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Nil
                | TokenKind::Or
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::This
                | TokenKind::True
                | TokenKind::Var
                | TokenKind::While
        )
    }

    /// Kinds that can open a declaration or statement; used as resumption
    /// points after a syntax error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::For
                | TokenKind::Fun
                | TokenKind::If
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Var
                | TokenKind::While
        )
    }

    pub fn as_literal(&self) -> &'static str {
        match self {
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Minus => "-",
            TokenKind::Plus => "+",
            TokenKind::Semicolon => ";",
            TokenKind::Slash => "/",
            TokenKind::Star => "*",
            TokenKind::Bang => "!",
            TokenKind::BangEqual => "!=",
            TokenKind::Equal => "=",
            TokenKind::EqualEqual => "==",
            TokenKind::Greater => ">",
            TokenKind::GreaterEqual => ">=",
            TokenKind::Less => "<",
            TokenKind::LessEqual => "<=",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::And => "and",
            TokenKind::Class => "class",
            TokenKind::Else => "else",
            TokenKind::False => "false",
            TokenKind::Fun => "fun",
            TokenKind::For => "for",
            TokenKind::If => "if",
            TokenKind::Nil => "nil",
            TokenKind::Or => "or",
            TokenKind::Print => "print",
            TokenKind::Return => "return",
            TokenKind::Super => "super",
            TokenKind::This => "this",
            TokenKind::True => "true",
            TokenKind::Var => "var",
            TokenKind::While => "while",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Value carried by `Number` and `String` tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number { value: f64 },
    String { value: String },
}

impl Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Literal::Number { value } => write!(f, "{value:?}"),
            Literal::String { value } => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub literal: Option<Literal>,
    pub line: u32,
    pub span: SrcSpan,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: u32, span: SrcSpan) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            literal: None,
            line,
            span,
        }
    }

    pub fn with_literal(mut self, literal: Literal) -> Self {
        self.literal = Some(literal);
        self
    }

    pub fn eof(line: u32, offset: u32) -> Self {
        Self::new(TokenKind::Eof, "", line, SrcSpan::from(offset, offset))
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.literal {
            Some(literal) => write!(f, "{:?} {} {}", self.kind, self.lexeme, literal),
            None => write!(f, "{:?} {}", self.kind, self.lexeme),
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_literal())
    }
}
