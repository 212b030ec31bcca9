use tracing::debug;

use crate::{
    environment::prelude::{Value, FALSE, NIL, TRUE},
    lexer::prelude::{scan_tokens, LexicalError, Token, TokenKind},
};
use super::error::{parse_error, ParseError, ParseErrorType};
use super::ast::{Expr, Stmt};

type ParseResult<T> = Result<T, ParseError>;

/// Result of a pass that keeps going after errors.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T, E> {
    Ok(T),
    PartialFailure(T, Vec<E>),
}

impl<T, E> Outcome<T, E> {
    pub fn into_parts(self) -> (T, Vec<E>) {
        match self {
            Outcome::Ok(value) => (value, vec![]),
            Outcome::PartialFailure(value, errors) => (value, errors),
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }
}

/// Recursive descent parser over a finished token sequence.
///
/// The sequence must end with exactly one `Eof` token; `new` appends one
/// when it is missing.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(|token| token.is(TokenKind::Eof)) {
            let (line, offset) = tokens.last()
                .map(|token| (token.line, token.span.end))
                .unwrap_or((1, 0));
            tokens.push(Token::eof(line, offset));
        }

        Self {
            tokens,
            current: 0,
            errors: vec![],
        }
    }

    // program -> declaration* EOF
    pub fn parse(&mut self) -> Outcome<Vec<Stmt>, ParseError> {
        let mut statements = vec![];

        while !self.is_at_end() {
            let start = self.current;

            match self.declaration() {
                Ok(statement) => statements.push(statement),
                Err(err) => {
                    debug!(line = err.token.line, error = %err.error, "syntax error, synchronizing");
                    self.errors.push(err);
                    self.synchronize(start);
                }
            }
        }

        let errors = std::mem::take(&mut self.errors);

        match errors.is_empty() {
            true => Outcome::Ok(statements),
            false => Outcome::PartialFailure(statements, errors),
        }
    }

    fn declaration(&mut self) -> ParseResult<Stmt> {
        if self.matches(&[TokenKind::Var]) {
            return self.var_declaration();
        }

        self.statement()
    }

    // varDecl -> "var" IDENTIFIER ( "=" expression )? ";"
    fn var_declaration(&mut self) -> ParseResult<Stmt> {
        let name = self.expect_ident()?;

        let initializer = match self.matches(&[TokenKind::Equal]) {
            true => Some(self.expression()?),
            false => None,
        };

        self.expect_one(TokenKind::Semicolon, "after variable declaration")?;

        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> ParseResult<Stmt> {
        match self.peek().kind {
            TokenKind::Print => {
                self.step();
                self.print_statement()
            },
            TokenKind::LeftBrace => {
                self.step();
                Ok(Stmt::block(self.block()?))
            },
            TokenKind::If => {
                self.step();
                self.if_statement()
            },
            TokenKind::While => {
                self.step();
                self.while_statement()
            },
            TokenKind::For => {
                self.step();
                self.for_statement()
            },
            _ => self.expression_statement(),
        }
    }

    // printStmt -> "print" expression ";"
    fn print_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.expect_one(TokenKind::Semicolon, "after value")?;

        Ok(Stmt::Print { expression })
    }

    // exprStmt -> expression ";"
    fn expression_statement(&mut self) -> ParseResult<Stmt> {
        let expression = self.expression()?;
        self.expect_one(TokenKind::Semicolon, "after value")?;

        Ok(Stmt::Expression { expression })
    }

    // block -> "{" declaration* "}"
    fn block(&mut self) -> ParseResult<Vec<Stmt>> {
        let mut statements = vec![];

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.expect_one(TokenKind::RightBrace, "after block")?;

        Ok(statements)
    }

    // ifStmt -> "if" "(" expression ")" statement ( "else" statement )?
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        self.expect_one(TokenKind::LeftParen, "after 'if'")?;
        let condition = self.expression()?;
        self.expect_one(TokenKind::RightParen, "after if condition")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = match self.matches(&[TokenKind::Else]) {
            true => Some(Box::new(self.statement()?)),
            false => None,
        };

        Ok(Stmt::If { condition, then_branch, else_branch })
    }

    // whileStmt -> "while" "(" expression ")" statement
    fn while_statement(&mut self) -> ParseResult<Stmt> {
        self.expect_one(TokenKind::LeftParen, "after 'while'")?;
        let condition = self.expression()?;
        self.expect_one(TokenKind::RightParen, "after condition")?;

        let body = self.statement()?;

        Ok(Stmt::while_loop(condition, body))
    }

    // forStmt -> "for" "(" ( varDecl | exprStmt | ";" ) expression? ";" expression? ")" statement
    //
    // Desugared into:
    //   { initializer; while (condition) { body; increment; } }
    fn for_statement(&mut self) -> ParseResult<Stmt> {
        let keyword = self.previous().clone();

        self.expect_one(TokenKind::LeftParen, "after 'for'")?;

        let initializer = match self.peek().kind {
            TokenKind::Semicolon => {
                self.step();
                None
            },
            TokenKind::Var => {
                self.step();
                Some(self.var_declaration()?)
            },
            _ => Some(self.expression_statement()?),
        };

        let condition = match self.check(TokenKind::Semicolon) {
            true => None,
            false => Some(self.expression()?),
        };
        self.expect_one(TokenKind::Semicolon, "after loop condition")?;

        let increment = match self.check(TokenKind::RightParen) {
            true => None,
            false => Some(self.expression()?),
        };
        self.expect_one(TokenKind::RightParen, "after for clauses")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::block(vec![body, Stmt::Expression { expression: increment }]);
        }

        let condition = condition.unwrap_or_else(|| Expr::literal(TRUE, keyword.span));
        let mut desugared = Stmt::while_loop(condition, body);

        if let Some(initializer) = initializer {
            desugared = Stmt::block(vec![initializer, desugared]);
        }

        Ok(desugared)
    }

    // expression -> assignment
    fn expression(&mut self) -> ParseResult<Expr> {
        self.assignment()
    }

    // assignment -> IDENTIFIER "=" assignment | logic_or
    fn assignment(&mut self) -> ParseResult<Expr> {
        let expr = self.or()?;

        if self.matches(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.assignment()?;

            return match expr {
                Expr::Variable { name } => Ok(Expr::assign(name, value)),
                expr => {
                    // Reported, but the surrounding statement keeps parsing.
                    self.errors.push(ParseError {
                        error: ParseErrorType::InvalidAssignmentTarget,
                        token: equals,
                    });
                    Ok(expr)
                }
            };
        }

        Ok(expr)
    }

    // logic_or -> logic_and ( "or" logic_and )*
    fn or(&mut self) -> ParseResult<Expr> {
        let mut expr = self.and()?;

        while self.matches(&[TokenKind::Or]) {
            let operator = self.previous().clone();
            let right = self.and()?;
            expr = Expr::logical(expr, operator, right);
        }

        Ok(expr)
    }

    // logic_and -> equality ( "and" equality )*
    fn and(&mut self) -> ParseResult<Expr> {
        let mut expr = self.equality()?;

        while self.matches(&[TokenKind::And]) {
            let operator = self.previous().clone();
            let right = self.equality()?;
            expr = Expr::logical(expr, operator, right);
        }

        Ok(expr)
    }

    fn binary_level(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut expr = operand(self)?;

        while self.matches(operators) {
            let operator = self.previous().clone();
            let right = operand(self)?;
            expr = Expr::binary(expr, operator, right);
        }

        Ok(expr)
    }

    // equality -> comparison ( ( "!=" | "==" ) comparison )*
    fn equality(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[TokenKind::BangEqual, TokenKind::EqualEqual], Self::comparison)
    }

    // comparison -> term ( ( ">" | ">=" | "<" | "<=" ) term )*
    fn comparison(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            &[TokenKind::Greater, TokenKind::GreaterEqual, TokenKind::Less, TokenKind::LessEqual],
            Self::term,
        )
    }

    // term -> factor ( ( "-" | "+" ) factor )*
    fn term(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[TokenKind::Minus, TokenKind::Plus], Self::factor)
    }

    // factor -> unary ( ( "/" | "*" ) unary )*
    fn factor(&mut self) -> ParseResult<Expr> {
        self.binary_level(&[TokenKind::Slash, TokenKind::Star], Self::unary)
    }

    // unary -> ( "!" | "-" ) unary | primary
    fn unary(&mut self) -> ParseResult<Expr> {
        if self.matches(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.unary()?;
            return Ok(Expr::unary(operator, right));
        }

        self.primary()
    }

    // primary -> NUMBER | STRING | "true" | "false" | "nil" | IDENTIFIER | "(" expression ")"
    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek().clone();

        let expr = match token.kind {
            TokenKind::False => Expr::literal(FALSE, token.span),
            TokenKind::True => Expr::literal(TRUE, token.span),
            TokenKind::Nil => Expr::literal(NIL, token.span),
            TokenKind::Number | TokenKind::String => {
                let value = token.literal.clone().map(Value::from).unwrap_or(NIL);
                Expr::literal(value, token.span)
            },
            TokenKind::Identifier => Expr::Variable { name: token },
            TokenKind::LeftParen => {
                self.step();
                let expression = self.expression()?;
                self.expect_one(TokenKind::RightParen, "after expression")?;
                return Ok(Expr::grouping(expression));
            },
            _ => return parse_error(ParseErrorType::ExpectedExpression, &token),
        };

        self.step();

        Ok(expr)
    }

    /// Discards tokens until a statement boundary: just past a `;`, or
    /// before a token that starts a declaration. Always consumes at least
    /// one token when the failed declaration consumed none.
    fn synchronize(&mut self, start: usize) {
        let mut skipped = 0usize;

        if self.current == start && !self.is_at_end() {
            self.step();
            skipped += 1;
        }

        while !self.is_at_end() {
            if self.current > 0 && self.previous().is(TokenKind::Semicolon) {
                break;
            }
            if self.peek().kind.starts_statement() {
                break;
            }

            self.step();
            skipped += 1;
        }

        debug!(skipped, "synchronized");
    }

    pub fn expect_one(&mut self, kind: TokenKind, context: &'static str) -> ParseResult<Token> {
        if self.check(kind) {
            self.step();
            return Ok(self.previous().clone());
        }

        parse_error(ParseErrorType::UnexpectedToken { expected: kind, context }, self.peek())
    }

    pub fn expect_ident(&mut self) -> ParseResult<Token> {
        if self.check(TokenKind::Identifier) {
            self.step();
            return Ok(self.previous().clone());
        }

        parse_error(ParseErrorType::ExpectedVariableName, self.peek())
    }

    fn matches(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.step();
            return true;
        }

        false
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().is(kind)
    }

    pub fn step(&mut self) {
        if !self.is_at_end() {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.peek().is(TokenKind::Eof)
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }
}

/// Scans and parses `src`. Lexical errors are returned alongside; parsing
/// continues over the tokens that did scan.
pub fn parse_source(src: &str) -> (Outcome<Vec<Stmt>, ParseError>, Vec<LexicalError>) {
    let (tokens, lex_errors) = scan_tokens(src);
    let mut parser = Parser::new(tokens);

    (parser.parse(), lex_errors)
}
