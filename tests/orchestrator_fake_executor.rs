// tests/orchestrator_fake_executor.rs

mod common;
use crate::common::{init_tracing, orchestrator, orchestrator_on};

use poul::errors::PoulError;
use poul::fs::mock::MockFileSystem;
use poul::pattern::Args;
use poul_test_utils::RecordingExecutor;

fn args(pairs: &[(u32, &str)]) -> Args {
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

/// Three templates chained through hooks, each building one file.
const RELEASE_RULES: &str = r#"
prepare {
    gen/app
}

release (prepare / announce) {
    dist/app
}

announce {
    news/app
}

src/$1 -> gen/$1 {
    generate
}

gen/$1 -> dist/$1 {
    bundle
}

dist/$1 -> news/$1 {
    publish
}
"#;

#[tokio::test]
async fn build_uses_first_declared_matching_step() {
    init_tracing();
    let executor = RecordingExecutor::new();
    let orch = orchestrator(
        "src/$1.c -> out/$1 {\n first\n}\nlib/$1.c -> out/$1 {\n second\n}\n",
        executor.clone(),
    );

    let code = orch.build("out/a").await.unwrap();

    assert_eq!(code, 0);
    let invocations = executor.invocations();
    assert_eq!(invocations.len(), 1);
    assert_eq!(invocations[0].script, "first\n");
    assert_eq!(invocations[0].sources, vec!["src/a.c"]);
    assert_eq!(invocations[0].destinations, vec!["out/a"]);
    assert_eq!(invocations[0].args, args(&[(1, "a")]));
}

#[tokio::test]
async fn build_substitutes_every_source_pattern() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator("a/$1.c, b/$1.h -> out/$1 {\n link\n}\n", executor.clone());

    orch.build("./out/x").await.unwrap();

    let invocations = executor.invocations();
    assert_eq!(invocations[0].sources, vec!["a/x.c", "b/x.h"]);
    assert_eq!(invocations[0].destinations, vec!["out/x"]);
}

#[tokio::test]
async fn build_without_matching_step_is_no_match() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator("src/$1.c -> out/$1 {\n cc\n}\n", executor.clone());

    let err = orch.build("elsewhere/a").await.unwrap_err();

    assert!(matches!(err, PoulError::NoMatchingStep(ref dest) if dest == "elsewhere/a"));
    assert!(err.is_no_match());
    assert!(executor.invocations().is_empty());
}

#[tokio::test]
async fn build_multi_stops_at_first_failure() {
    let executor = RecordingExecutor::new().exit_with("two", 3);
    let orch = orchestrator(
        "a/$1 -> x/$1 {\n one\n}\nb/$1 -> y/$1 {\n two\n}\n",
        executor.clone(),
    );

    let code = orch.build_multi(&["x/1", "y/1", "x/2"]).await.unwrap();

    assert_eq!(code, 3);
    assert_eq!(executor.scripts(), vec!["one", "two"]);
}

#[tokio::test]
async fn build_multi_stops_at_first_error() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator("a/$1 -> x/$1 {\n one\n}\n", executor.clone());

    let err = orch.build_multi(&["x/1", "nope", "x/2"]).await.unwrap_err();

    assert!(err.is_no_match());
    assert_eq!(executor.scripts(), vec!["one"]);
}

#[tokio::test]
async fn compile_runs_every_matching_step_in_order() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator(
        "src/$1.c -> obj/$1.o {\n object\n}\nsrc/$1.h -> x {\n header\n}\nsrc/$1.c -> lint/$1.txt {\n lint\n}\n",
        executor.clone(),
    );

    let code = orch.compile("src/main.c").await.unwrap();

    assert_eq!(code, 0);
    let invocations = executor.invocations();
    assert_eq!(executor.scripts(), vec!["object", "lint"]);
    assert_eq!(invocations[0].sources, vec!["src/main.c"]);
    assert_eq!(invocations[0].destinations, vec!["obj/main.o"]);
    assert_eq!(invocations[1].destinations, vec!["lint/main.txt"]);
}

#[tokio::test]
async fn compile_stops_at_first_failing_step() {
    let executor = RecordingExecutor::new().exit_with("object", 2);
    let orch = orchestrator(
        "src/$1.c -> obj/$1.o {\n object\n}\nsrc/$1.c -> lint/$1.txt {\n lint\n}\n",
        executor.clone(),
    );

    assert_eq!(orch.compile("src/main.c").await.unwrap(), 2);
    assert_eq!(executor.scripts(), vec!["object"]);
}

#[tokio::test]
async fn compile_without_matching_step_is_no_match() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator("src/$1.c -> obj/$1.o {\n object\n}\n", executor.clone());

    let err = orch.compile("docs/readme.md").await.unwrap_err();
    assert!(matches!(err, PoulError::NoMatchingStep(_)));
}

#[tokio::test]
async fn compile_multi_short_circuits() {
    let executor = RecordingExecutor::new().exit_with("object", 1);
    let orch = orchestrator("src/$1.c -> obj/$1.o {\n object\n}\n", executor.clone());

    let code = orch.compile_multi(&["src/a.c", "src/b.c"]).await.unwrap();

    assert_eq!(code, 1);
    assert_eq!(executor.invocations().len(), 1);
}

#[tokio::test]
async fn launch_failure_is_an_error_not_an_exit_code() {
    let executor = RecordingExecutor::new().fail_spawn("object");
    let orch = orchestrator("src/$1.c -> obj/$1.o {\n object\n}\n", executor.clone());

    let err = orch.compile("src/a.c").await.unwrap_err();

    assert!(matches!(err, PoulError::Spawn { .. }));
    assert!(!err.is_no_match());
}

fn header_project() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("src/a.c", "int a;");
    fs.add_file("src/b.c", "int b;");
    fs.add_file("src/a.h", "");
    fs.add_file("include/common.h", "");
    fs
}

const HEADER_RULES: &str =
    "src/$1.c (src/$1.h, include/common.h) -> out/$1.o {\n cc\n}\n";

#[tokio::test]
async fn shared_dependency_recompiles_every_source() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator_on(HEADER_RULES, executor.clone(), header_project());

    let code = orch.compile_by_dependency("include/common.h").await.unwrap();

    assert_eq!(code, 0);
    let invocations = executor.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].sources, vec!["src/a.c"]);
    assert_eq!(invocations[0].destinations, vec!["out/a.o"]);
    assert_eq!(invocations[1].sources, vec!["src/b.c"]);
    assert_eq!(invocations[1].destinations, vec!["out/b.o"]);
}

#[tokio::test]
async fn captured_dependency_recompiles_every_source_of_the_step() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator_on(HEADER_RULES, executor.clone(), header_project());

    let code = orch.compile_by_dependency("./src/a.h").await.unwrap();

    // The header's `$1` is not compared with the source's.
    assert_eq!(code, 0);
    let invocations = executor.invocations();
    assert_eq!(invocations.len(), 2);
    assert_eq!(invocations[0].sources, vec!["src/a.c"]);
    assert_eq!(invocations[0].args, args(&[(1, "a")]));
    assert_eq!(invocations[1].sources, vec!["src/b.c"]);
    assert_eq!(invocations[1].args, args(&[(1, "b")]));
}

#[tokio::test]
async fn dependency_without_a_matching_header_on_disk_still_recompiles() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator_on(HEADER_RULES, executor.clone(), header_project());

    orch.compile_by_dependency("src/zzz.h").await.unwrap();

    assert_eq!(executor.invocations().len(), 2);
}

#[tokio::test]
async fn path_that_nothing_depends_on_is_no_match() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator_on(HEADER_RULES, executor.clone(), header_project());

    let unrelated = orch.compile_by_dependency("README.md").await.unwrap_err();
    assert!(matches!(unrelated, PoulError::NoMatchingStep(_)));

    assert!(executor.invocations().is_empty());
}

#[tokio::test]
async fn template_runs_prehooks_destinations_then_posthooks() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator(RELEASE_RULES, executor.clone());

    let code = orch.run_template("release").await.unwrap();

    assert_eq!(code, 0);
    assert_eq!(executor.scripts(), vec!["generate", "bundle", "publish"]);
}

#[tokio::test]
async fn failing_prehook_skips_destinations_and_posthooks() {
    let executor = RecordingExecutor::new().exit_with("generate", 4);
    let orch = orchestrator(RELEASE_RULES, executor.clone());

    let code = orch.run_template("release").await.unwrap();

    assert_eq!(code, 4);
    assert_eq!(executor.scripts(), vec!["generate"]);
}

#[tokio::test]
async fn failing_destination_skips_posthooks() {
    let executor = RecordingExecutor::new().exit_with("bundle", 9);
    let orch = orchestrator(RELEASE_RULES, executor.clone());

    assert_eq!(orch.run_template("release").await.unwrap(), 9);
    assert_eq!(executor.scripts(), vec!["generate", "bundle"]);
}

#[tokio::test]
async fn unknown_template_is_not_found() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator(RELEASE_RULES, executor.clone());

    let err = orch.run_template("deploy").await.unwrap_err();
    assert!(matches!(err, PoulError::TemplateNotFound(ref name) if name == "deploy"));
}

#[tokio::test]
async fn unknown_hook_fails_when_reached() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator("t (/ missing) {\n}\n", executor.clone());

    let err = orch.run_template("t").await.unwrap_err();
    assert!(matches!(err, PoulError::TemplateNotFound(ref name) if name == "missing"));
}

#[tokio::test]
async fn mutually_hooking_templates_fail_with_cycle() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator("a (b) {\n}\nb (/ a) {\n}\n", executor.clone());

    let err = orch.run_template("a").await.unwrap_err();

    match err {
        PoulError::CyclicHook { chain } => assert_eq!(chain, "a -> b -> a"),
        other => panic!("expected CyclicHook, got {other:?}"),
    }
}

#[tokio::test]
async fn shared_hook_in_a_diamond_is_not_a_cycle() {
    let executor = RecordingExecutor::new();
    let orch = orchestrator(
        "top (left, right) {\n}\nleft (base) {\n}\nright (base) {\n}\nbase {\n out/x\n}\nsrc/$1 -> out/$1 {\n step\n}\n",
        executor.clone(),
    );

    assert_eq!(orch.run_template("top").await.unwrap(), 0);
    assert_eq!(executor.scripts(), vec!["step", "step"]);
}
