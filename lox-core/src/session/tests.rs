use std::{io::Write, path::PathBuf, rc::Rc};

use crate::utils::prelude::{Error, ErrorEmitter, VectorErrorEmitterIO};

use super::{Session, Status};

fn session() -> (Session<Vec<u8>>, VectorErrorEmitterIO) {
    let errors = VectorErrorEmitterIO::new();
    let session = Session::new(ErrorEmitter::new(Rc::new(errors.clone())), Vec::new());

    (session, errors)
}

fn output(session: Session<Vec<u8>>) -> String {
    String::from_utf8(session.into_output()).expect("output is utf8")
}

#[test]
fn test_clean_run() {
    let (mut session, errors) = session();

    let status = session.run("var x = 1; { var x = 2; print x; } print x;");

    assert_eq!(status, Status::default());
    assert_eq!(status.exit_code(), 0);
    assert!(errors.take().is_empty());
    assert_eq!(output(session), "2\n1\n");
}

#[test]
fn test_syntax_errors_prevent_execution() {
    let (mut session, errors) = session();

    let status = session.run("print 1;\nprint 2\nprint 3;\nvar = 4;");

    assert!(status.had_error);
    assert!(!status.had_runtime_error);
    assert_eq!(status.exit_code(), 65);

    let messages = errors.take().iter().map(|err| err.to_string()).collect::<Vec<_>>();
    assert_eq!(messages, vec![
        "[line 3] Error at 'print': Expect ';' after value.",
        "[line 4] Error at '=': Expect variable name.",
    ]);
    assert_eq!(output(session), "");
}

#[test]
fn test_lexical_errors_prevent_execution() {
    let (mut session, errors) = session();

    let status = session.run("print 1; print @;");

    assert!(status.had_error);

    let errors = errors.take();
    assert!(matches!(errors[0], Error::Lex { .. }));
    assert_eq!(errors[0].to_string(), "[line 1] Error: Unexpected character.");
    assert_eq!(output(session), "");
}

#[test]
fn test_runtime_error_reported_once() {
    let (mut session, errors) = session();

    let status = session.run("print \"before\";\nprint 1 / 0;\nprint \"after\";");

    assert!(!status.had_error);
    assert!(status.had_runtime_error);
    assert_eq!(status.exit_code(), 70);

    let errors = errors.take();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].is_runtime());
    assert_eq!(errors[0].to_string(), "Cannot divide by zero.\n[line 2]");
    assert_eq!(output(session), "before\n");
}

#[test]
fn test_globals_shared_across_runs() {
    let (mut session, errors) = session();

    assert!(session.run("var count = 1;").is_ok());
    assert!(session.run("count = count + 1").had_error);
    assert!(session.run("count = count + 1;").is_ok());
    assert!(session.run("print count;").is_ok());

    assert_eq!(errors.take().len(), 1);
    assert_eq!(output(session), "2\n");
}

#[test]
fn test_pretty_diagnostic() {
    let (mut session, errors) = session();

    session.run("var a = 1;\nprint a +;");

    let errors = errors.take();
    let rendered = errors[0].pretty_string();

    assert!(rendered.contains("Syntax error: Expect expression."), "{rendered}");
    assert!(rendered.contains("print a +;"), "{rendered}");
}

#[test]
fn test_run_file() {
    let path = std::env::temp_dir().join(format!("lox-core-session-{}.lox", std::process::id()));
    {
        let mut file = std::fs::File::create(&path).expect("create temp script");
        writeln!(file, "for (var i = 0; i < 3; i = i + 1) print \"#\" + i;").expect("write temp script");
    }

    let (mut session, _) = session();
    let status = session.run_file(path.clone()).expect("script readable");
    let _ = std::fs::remove_file(&path);

    assert!(status.is_ok());
    assert_eq!(output(session), "#0\n#1\n#2\n");
}

#[test]
fn test_run_missing_file() {
    let (mut session, _) = session();

    let err = session.run_file(PathBuf::from("/definitely/not/here.lox")).unwrap_err();

    assert!(matches!(err, Error::StdIo { err: std::io::ErrorKind::NotFound, .. }));
}
