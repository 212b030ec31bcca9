use crate::eval::error::RuntimeErrorType;
use crate::lexer::prelude::{Token, TokenKind};
use crate::utils::prelude::SrcSpan;

use super::prelude::{Environment, ScopeId, Value, NIL};

fn name(lexeme: &str) -> Token {
    Token::new(TokenKind::Identifier, lexeme, 1, SrcSpan::default())
}

#[test]
fn test_define_and_get() {
    let mut env = Environment::new();

    env.define("a", Value::number(1.0));

    assert_eq!(env.get(&name("a")), Ok(Value::number(1.0)));
}

#[test]
fn test_redefinition_overwrites() {
    let mut env = Environment::new();

    env.define("a", Value::number(1.0));
    env.define("a", Value::string("one"));

    assert_eq!(env.get(&name("a")), Ok(Value::string("one")));
}

#[test]
fn test_undefined_variable() {
    let env = Environment::new();

    let err = env.get(&name("missing")).unwrap_err();

    assert_eq!(err.error, RuntimeErrorType::UndefinedVariable { name: "missing".into() });
    assert_eq!(err.to_string(), "Undefined variable 'missing'.\n[line 1]");
}

#[test]
fn test_shadowing() {
    let mut env = Environment::new();
    env.define("x", Value::number(1.0));

    env.push_scope();
    env.define("x", Value::number(2.0));
    assert_eq!(env.get(&name("x")), Ok(Value::number(2.0)));

    env.pop_scope();
    assert_eq!(env.get(&name("x")), Ok(Value::number(1.0)));
}

#[test]
fn test_assign_resolves_outward() {
    let mut env = Environment::new();
    env.define("x", Value::number(1.0));

    env.push_scope();
    env.push_scope();
    assert_eq!(env.assign(&name("x"), Value::number(2.0)), Ok(()));
    env.pop_scope();
    env.pop_scope();

    assert_eq!(env.get(&name("x")), Ok(Value::number(2.0)));
}

#[test]
fn test_assign_never_creates_binding() {
    let mut env = Environment::new();

    env.push_scope();
    let err = env.assign(&name("y"), NIL).unwrap_err();
    env.pop_scope();

    assert_eq!(err.error, RuntimeErrorType::UndefinedVariable { name: "y".into() });
    assert!(!env.is_defined("y"));
}

#[test]
fn test_scope_bindings_dropped_on_pop() {
    let mut env = Environment::new();

    let id = env.push_scope();
    assert_ne!(id, ScopeId::GLOBAL);
    env.define("inner", Value::boolean(true));
    env.pop_scope();

    assert!(!env.is_defined("inner"));
    assert_eq!(env.current(), ScopeId::GLOBAL);
    assert_eq!(env.depth(), 1);
}

#[test]
fn test_global_scope_is_never_popped() {
    let mut env = Environment::new();
    env.define("g", NIL);

    env.pop_scope();

    assert_eq!(env.depth(), 1);
    assert!(env.is_defined("g"));
}
