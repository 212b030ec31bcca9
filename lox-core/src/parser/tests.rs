use pretty_assertions::assert_eq;

use crate::{
    environment::prelude::{Value, TRUE},
    lexer::prelude::{scan_tokens, Token, TokenKind},
    utils::prelude::SrcSpan,
};
use super::prelude::{Expr, Outcome, ParseError, ParseErrorType, Parser, Stmt};

fn parse(src: &str) -> Outcome<Vec<Stmt>, ParseError> {
    let (tokens, lex_errors) = scan_tokens(src);
    assert!(lex_errors.is_empty(), "unexpected lexical errors: {lex_errors:?}");

    Parser::new(tokens).parse()
}

fn parse_ok(src: &str) -> Vec<String> {
    match parse(src) {
        Outcome::Ok(statements) => statements.iter().map(|stmt| stmt.to_string()).collect(),
        Outcome::PartialFailure(_, errors) => panic!("unexpected syntax errors: {errors:?}"),
    }
}

fn parse_errors(src: &str) -> (Vec<String>, Vec<String>) {
    let (statements, errors) = parse(src).into_parts();

    (
        statements.iter().map(|stmt| stmt.to_string()).collect(),
        errors.iter().map(|err| err.to_string()).collect(),
    )
}

fn token(kind: TokenKind, lexeme: &str) -> Token {
    Token::new(kind, lexeme, 1, SrcSpan::default())
}

#[test]
fn test_precedence() {
    assert_eq!(parse_ok("1 + 2 * 3 - 4 / 5;"), vec!["(; (- (+ 1 (* 2 3)) (/ 4 5)))"]);
    assert_eq!(parse_ok("-123 * (45.67);"), vec!["(; (* (- 123) (group 45.67)))"]);
    assert_eq!(parse_ok("!!true == 1 < 2;"), vec!["(; (== (! (! true)) (< 1 2)))"]);
    assert_eq!(parse_ok("1 >= 2 != 3 <= 4;"), vec!["(; (!= (>= 1 2) (<= 3 4)))"]);
}

#[test]
fn test_left_associativity() {
    assert_eq!(parse_ok("1 - 2 - 3;"), vec!["(; (- (- 1 2) 3))"]);
    assert_eq!(parse_ok("8 / 4 / 2;"), vec!["(; (/ (/ 8 4) 2))"]);
}

#[test]
fn test_logical_operators() {
    assert_eq!(parse_ok("a or b and c;"), vec!["(; (or a (and b c)))"]);
    assert_eq!(parse_ok("a and b or c and d;"), vec!["(; (or (and a b) (and c d)))"]);
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(parse_ok("a = b = 3;"), vec!["(; (= a (= b 3)))"]);
}

#[test]
fn test_literals() {
    assert_eq!(
        parse_ok("print nil; print \"hi\"; print false; print 2.5;"),
        vec!["(print nil)", "(print \"hi\")", "(print false)", "(print 2.5)"]
    );
}

#[test]
fn test_declarations() {
    assert_eq!(parse_ok("var a; var b = a;"), vec!["(var a)", "(var b = a)"]);
}

#[test]
fn test_blocks_and_control_flow() {
    assert_eq!(
        parse_ok("{ var x = 1; { print x; } }"),
        vec!["(block (var x = 1) (block (print x)))"]
    );
    assert_eq!(
        parse_ok("if (a) print 1; else print 2;"),
        vec!["(if a (print 1) (print 2))"]
    );
    assert_eq!(
        parse_ok("if (a) if (b) print 1; else print 2;"),
        vec!["(if a (if b (print 1) (print 2)))"]
    );
    assert_eq!(
        parse_ok("while (i < 3) i = i + 1;"),
        vec!["(while (< i 3) (; (= i (+ i 1))))"]
    );
}

#[test]
fn test_for_desugaring() {
    assert_eq!(
        parse_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
        vec!["(block (var i = 0) (while (< i 3) (block (print i) (; (= i (+ i 1))))))"]
    );
}

#[test]
fn test_for_without_clauses() {
    let statements = match parse("for (;;) print 1;") {
        Outcome::Ok(statements) => statements,
        Outcome::PartialFailure(_, errors) => panic!("{errors:?}"),
    };

    assert_eq!(statements.len(), 1);

    match &statements[0] {
        Stmt::While { condition: Expr::Literal { value, .. }, body } => {
            assert_eq!(*value, TRUE);
            assert_eq!(body.to_string(), "(print 1)");
        },
        other => panic!("expected a bare while loop, got {other}"),
    }
}

#[test]
fn test_for_with_expression_initializer() {
    assert_eq!(
        parse_ok("for (i = 0; i < 1;) print i;"),
        vec!["(block (; (= i 0)) (while (< i 1) (print i)))"]
    );
}

#[test]
fn test_structure() {
    let (tokens, _) = scan_tokens("-x;");
    let minus = tokens[0].clone();
    let x = tokens[1].clone();

    let statements = match Parser::new(tokens).parse() {
        Outcome::Ok(statements) => statements,
        Outcome::PartialFailure(_, errors) => panic!("{errors:?}"),
    };

    assert_eq!(statements, vec![Stmt::Expression {
        expression: Expr::unary(minus, Expr::Variable { name: x }),
    }]);
}

#[test]
fn test_missing_eof_is_appended() {
    let tokens = vec![
        token(TokenKind::Print, "print"),
        Token::new(TokenKind::Number, "1", 1, SrcSpan::default())
            .with_literal(crate::lexer::prelude::Literal::Number { value: 1.0 }),
        token(TokenKind::Semicolon, ";"),
    ];

    let statements = match Parser::new(tokens).parse() {
        Outcome::Ok(statements) => statements,
        Outcome::PartialFailure(_, errors) => panic!("{errors:?}"),
    };

    assert_eq!(statements, vec![Stmt::Print {
        expression: Expr::literal(Value::number(1.0), SrcSpan::default()),
    }]);
}

#[test]
fn test_empty_program() {
    assert_eq!(parse_ok(""), Vec::<String>::new());
}

#[test]
fn test_recovery_after_missing_semicolon() {
    let (statements, errors) = parse_errors("print 1\nprint 2;");

    assert_eq!(errors, vec!["[line 2] Error at 'print': Expect ';' after value."]);
    assert_eq!(statements, vec!["(print 2)"]);
}

#[test]
fn test_one_error_per_malformed_statement() {
    let (statements, errors) = parse_errors("var = 1;\nprint (1;\nprint 3;\n1 + ;");

    assert_eq!(errors, vec![
        "[line 1] Error at '=': Expect variable name.",
        "[line 2] Error at ';': Expect ')' after expression.",
        "[line 4] Error at ';': Expect expression.",
    ]);
    assert_eq!(statements, vec!["(print 3)"]);
}

#[test]
fn test_error_at_end() {
    let (_, errors) = parse_errors("print 1");

    assert_eq!(errors, vec!["[line 1] Error at end: Expect ';' after value."]);
}

#[test]
fn test_unclosed_block() {
    let (_, errors) = parse_errors("{ print 1;");

    assert_eq!(errors, vec!["[line 1] Error at end: Expect '}' after block."]);
}

#[test]
fn test_control_flow_messages() {
    let (_, errors) = parse_errors("if 1) print 1;\nwhile (true print 1;\nfor (var i = 0; i < 1 print i;");

    assert_eq!(errors, vec![
        "[line 1] Error at '1': Expect '(' after 'if'.",
        "[line 2] Error at 'print': Expect ')' after condition.",
        "[line 3] Error at 'print': Expect ';' after loop condition.",
    ]);
}

#[test]
fn test_invalid_assignment_target() {
    let outcome = parse("a + b = c; print 1;");

    let (statements, errors) = outcome.into_parts();

    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].error, ParseErrorType::InvalidAssignmentTarget);
    assert_eq!(errors[0].to_string(), "[line 1] Error at '=': Invalid assignment target.");

    let statements = statements.iter().map(|stmt| stmt.to_string()).collect::<Vec<_>>();
    assert_eq!(statements, vec!["(; (+ a b))", "(print 1)"]);
}

#[test]
fn test_stray_keyword_does_not_stall() {
    let (statements, errors) = parse_errors("return 1; class; print 2;");

    assert_eq!(errors, vec![
        "[line 1] Error at 'return': Expect expression.",
        "[line 1] Error at 'class': Expect expression.",
    ]);
    assert_eq!(statements, vec!["(print 2)"]);
}

#[test]
fn test_parse_is_idempotent() {
    let (tokens, _) = scan_tokens("var a = 1; { a = a * 2; } for (;a < 10;) print a;");

    let first = Parser::new(tokens.clone()).parse();
    let second = Parser::new(tokens).parse();

    assert!(first.is_ok());
    assert_eq!(first, second);
}
