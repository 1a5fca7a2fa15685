// tests/error_handling.rs

use std::io::Write;

use poul::errors::PoulError;
use poul::fs::RealFileSystem;
use poul::fs::mock::MockFileSystem;
use poul::rules::{load_program, parse, validate_program};
use tempfile::{NamedTempFile, tempdir};

#[test]
fn rule_file_loads_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "# build\nsrc/$1.c -> out/$1.o {{\n    cc\n}}\nall {{\n    out/a.o\n}}\n").unwrap();

    let program = load_program(&RealFileSystem, file.path()).unwrap();

    assert_eq!(program.steps().len(), 1);
    assert_eq!(program.steps()[0].line, 2);
    assert!(program.template("all").is_some());
}

#[test]
fn missing_rule_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Poulfile");

    let err = load_program(&RealFileSystem, &path).unwrap_err();

    match err {
        PoulError::ConfigError(msg) => {
            assert!(msg.contains("does not exist"), "{msg}");
            assert!(msg.contains("Poulfile"), "{msg}");
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn syntax_errors_surface_through_the_loader() {
    let fs = MockFileSystem::new();
    fs.add_file("Poulfile", "\n\nsrc/$1.c -> out/$1.o\n");

    let err = load_program(&fs, "Poulfile").unwrap_err();
    assert_eq!(err.to_string(), "expected block declaration at line 3");
}

#[test]
fn check_reports_hook_cycles() {
    let program = parse("a (b) {\n}\nb (c) {\n}\nc (/ a) {\n}\nd (a) {\n}\n").unwrap();

    match validate_program(&program).unwrap_err() {
        PoulError::CyclicHook { chain } => {
            assert_eq!(chain, "templates a, b, c hook into each other");
        }
        other => panic!("expected CyclicHook, got {other:?}"),
    }
}

#[test]
fn check_reports_unknown_hooks() {
    let program = parse("release (build / ship) {\n}\nbuild {\n}\n").unwrap();

    let err = validate_program(&program).unwrap_err();
    assert!(matches!(err, PoulError::TemplateNotFound(ref msg) if msg.contains("ship")));
}

#[test]
fn check_accepts_shared_hooks() {
    let program = parse("top (l, r) {\n}\nl (base) {\n}\nr (base) {\n}\nbase {\n}\n").unwrap();
    assert!(validate_program(&program).is_ok());
}

#[test]
fn no_match_errors_are_distinguished() {
    assert!(PoulError::NoMatchingStep("x".into()).is_no_match());
    assert!(PoulError::TemplateNotFound("x".into()).is_no_match());
    assert!(!PoulError::NoExitStatus { program: "sh".into() }.is_no_match());
    assert!(!PoulError::CyclicHook { chain: "a -> a".into() }.is_no_match());
}
