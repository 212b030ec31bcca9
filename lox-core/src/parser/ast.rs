use std::fmt::Display;

use crate::{environment::prelude::Value, lexer::prelude::Token, utils::prelude::SrcSpan};

// expression -> assignment
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    // NUMBER | STRING | "true" | "false" | "nil"
    Literal {
        value: Value,
        span: SrcSpan,
    },
    // "(" expression ")"
    Grouping {
        expression: Box<Expr>,
    },
    // ("!" | "-") unary
    Unary {
        operator: Token,
        right: Box<Expr>,
    },
    Binary {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    // operator is `and` or `or`
    Logical {
        left: Box<Expr>,
        operator: Token,
        right: Box<Expr>,
    },
    Variable {
        name: Token,
    },
    // IDENTIFIER "=" assignment
    Assign {
        name: Token,
        value: Box<Expr>,
    },
}

impl Expr {
    pub fn literal(value: Value, span: SrcSpan) -> Self {
        Self::Literal { value, span }
    }

    pub fn grouping(expression: Expr) -> Self {
        Self::Grouping { expression: Box::new(expression) }
    }

    pub fn unary(operator: Token, right: Expr) -> Self {
        Self::Unary { operator, right: Box::new(right) }
    }

    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Self::Binary { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn logical(left: Expr, operator: Token, right: Expr) -> Self {
        Self::Logical { left: Box::new(left), operator, right: Box::new(right) }
    }

    pub fn assign(name: Token, value: Expr) -> Self {
        Self::Assign { name, value: Box::new(value) }
    }

    pub fn location(&self) -> SrcSpan {
        match self {
            Self::Literal { span, .. } => *span,
            Self::Grouping { expression } => expression.location(),
            Self::Unary { operator, right } => operator.span.merge(right.location()),
            Self::Binary { left, right, .. }
            | Self::Logical { left, right, .. } => left.location().merge(right.location()),
            Self::Variable { name } => name.span,
            Self::Assign { name, value } => name.span.merge(value.location()),
        }
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal { value: Value::String { value }, .. } => write!(f, "{value:?}"),
            Self::Literal { value, .. } => write!(f, "{value}"),
            Self::Grouping { expression } => write!(f, "(group {expression})"),
            Self::Unary { operator, right } => write!(f, "({} {right})", operator.lexeme),
            Self::Binary { left, operator, right }
            | Self::Logical { left, operator, right } => {
                write!(f, "({} {left} {right})", operator.lexeme)
            },
            Self::Variable { name } => write!(f, "{}", name.lexeme),
            Self::Assign { name, value } => write!(f, "(= {} {value})", name.lexeme),
        }
    }
}

// declaration -> varDecl | statement
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    // expression ";"
    Expression {
        expression: Expr,
    },
    // "print" expression ";"
    Print {
        expression: Expr,
    },
    // "var" IDENTIFIER ( "=" expression )? ";"
    Var {
        name: Token,
        initializer: Option<Expr>,
    },
    // "{" declaration* "}"
    Block {
        statements: Vec<Stmt>,
    },
    // "if" "(" expression ")" statement ( "else" statement )?
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    // "while" "(" expression ")" statement
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
}

impl Stmt {
    pub fn block(statements: Vec<Stmt>) -> Self {
        Self::Block { statements }
    }

    pub fn while_loop(condition: Expr, body: Stmt) -> Self {
        Self::While { condition, body: Box::new(body) }
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Expression { expression } => write!(f, "(; {expression})"),
            Self::Print { expression } => write!(f, "(print {expression})"),
            Self::Var { name, initializer: Some(initializer) } => {
                write!(f, "(var {} = {initializer})", name.lexeme)
            },
            Self::Var { name, initializer: None } => write!(f, "(var {})", name.lexeme),
            Self::Block { statements } => {
                write!(f, "(block")?;
                for statement in statements {
                    write!(f, " {statement}")?;
                }
                write!(f, ")")
            },
            Self::If { condition, then_branch, else_branch: Some(else_branch) } => {
                write!(f, "(if {condition} {then_branch} {else_branch})")
            },
            Self::If { condition, then_branch, else_branch: None } => {
                write!(f, "(if {condition} {then_branch})")
            },
            Self::While { condition, body } => write!(f, "(while {condition} {body})"),
        }
    }
}
