//! Fixer pipeline integration tests
//!
//! Drives `run_fixer` over realistic `.NIOInspector` layouts with a stub
//! backend. All tests use temp directories as the project root.

use nio_fixer::fixer::{run_fixer, FixerError, FixerOptions};
use nio_fixer::inspector::InspectorError;
use nio_fixer::llm::adapters::stub::StubAdapter;
use nio_fixer::llm::types::{Mode, ModelFamily};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const OLD_RUN: &str = "2024-04-30-09-00-00";
const NEW_RUN: &str = "2024-05-01-10-00-00";

fn run_dir(project: &Path, run: &str) -> PathBuf {
    project.join(".NIOInspector").join(run)
}

// Test helper: one run with a manifest and fully populated cases
fn create_run(project: &Path, run: &str, test_ids: &[&str]) {
    let dir = run_dir(project, run);
    fs::create_dir_all(&dir).unwrap();
    let manifest: String = test_ids.iter().map(|id| format!("{}\n", id)).collect();
    fs::write(dir.join("possible-NIO-list.txt"), manifest).unwrap();

    for id in test_ids {
        let case_dir = dir.join(id.replace('#', "."));
        fs::create_dir_all(&case_dir).unwrap();
        fs::write(
            case_dir.join("buggyTestMethod"),
            "@Test\npublic void testBar() {\n    assertEquals(Foo.w, 0);\n    Foo.w = 1;\n}",
        )
        .unwrap();
        fs::write(
            case_dir.join("stacktrace1"),
            "java.lang.AssertionError: expected:<1> but was:<0>",
        )
        .unwrap();
        fs::write(case_dir.join("error_line1"), "assertEquals(Foo.w, 0);").unwrap();
        fs::write(case_dir.join("sourceCode"), "class Foo { static int w; }").unwrap();
    }
}

#[test]
fn test_end_to_end_fixed_code() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), NEW_RUN, &["com.example.FooTest#testBar"]);

    let adapter = StubAdapter::with_response("FIXED_CODE".to_string());
    let options = FixerOptions::new(project.path(), ModelFamily::Gpt4, Mode::Fix);
    let summary = run_fixer(&options, &adapter).unwrap();

    let patch = run_dir(project.path(), NEW_RUN)
        .join("com.example.FooTest.testBar")
        .join("patch.txt");
    assert_eq!(summary.written, vec![patch.clone()]);
    assert_eq!(fs::read_to_string(&patch).unwrap(), "FIXED_CODE");

    let prompt = &adapter.requests()[0].prompt;
    assert!(prompt.contains("Below is the error message in run #1:"));
    assert!(prompt.contains("And the error occurs at this line:"));
    assert!(prompt.contains("class Foo { static int w; }"));
    assert!(!prompt.contains("In your previous attempt"));
}

#[test]
fn test_minimal_case_single_trace_no_error_line() {
    let project = TempDir::new().unwrap();
    let dir = run_dir(project.path(), NEW_RUN);
    let case_dir = dir.join("pkg.Foo.testBar");
    fs::create_dir_all(&case_dir).unwrap();
    fs::write(dir.join("possible-NIO-list.txt"), "pkg.Foo#testBar\n").unwrap();
    fs::write(
        case_dir.join("buggyTestMethod"),
        "void testBar(){ assertEquals(w,0); w=1; }",
    )
    .unwrap();
    fs::write(case_dir.join("stacktrace1"), "AssertionError at line 1").unwrap();

    let adapter = StubAdapter::with_response("FIXED_CODE".to_string());
    run_fixer(
        &FixerOptions::new(project.path(), ModelFamily::Gpt4, Mode::Fix),
        &adapter,
    )
    .unwrap();

    assert_eq!(
        fs::read_to_string(case_dir.join("patch.txt")).unwrap(),
        "FIXED_CODE"
    );
    let prompt = &adapter.requests()[0].prompt;
    assert!(prompt.contains("AssertionError at line 1"));
    assert!(!prompt.contains("And the error occurs at this line:"));
    assert!(prompt.contains("Use all information above - "));
}

#[test]
fn test_missing_manifest_produces_no_result_files() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), NEW_RUN, &["a.T#x"]);
    fs::remove_file(run_dir(project.path(), NEW_RUN).join("possible-NIO-list.txt")).unwrap();

    let adapter = StubAdapter::new();
    let options = FixerOptions::new(project.path(), ModelFamily::Qwen, Mode::Fix);
    let err = run_fixer(&options, &adapter).unwrap_err();

    assert!(matches!(
        err,
        FixerError::Inspector(InspectorError::MissingManifest(_))
    ));
    let case_dir = run_dir(project.path(), NEW_RUN).join("a.T.x");
    assert!(!case_dir.join("patch.txt").exists());
    assert!(!case_dir.join("agent_response").exists());
    assert!(adapter.requests().is_empty());
}

#[test]
fn test_iteration_feeds_previous_attempt_back() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), OLD_RUN, &["a.T#x"]);
    create_run(project.path(), NEW_RUN, &["a.T#x"]);
    let old_case = run_dir(project.path(), OLD_RUN).join("a.T.x");
    fs::write(old_case.join("agent_response"), "Find Class Code: Foo").unwrap();
    fs::write(old_case.join("patch.txt"), "Foo.w = 0;").unwrap();

    let adapter = StubAdapter::with_response("Directly Fixable".to_string());
    let options = FixerOptions::new(
        project.path(),
        ModelFamily::DeepSeek,
        Mode::DecideRelevantSourceCode,
    );
    let summary = run_fixer(&options, &adapter).unwrap();
    assert_eq!(summary.run, NEW_RUN);

    let prompt = &adapter.requests()[0].prompt;
    assert!(prompt.contains("In your previous attempt"));
    assert!(prompt.contains("Find Class Code: Foo"));
    assert!(prompt.contains("Foo.w = 0;"));
    // explore mode never includes collected source
    assert!(!prompt.contains("class Foo { static int w; }"));

    let response = run_dir(project.path(), NEW_RUN).join("a.T.x/agent_response");
    assert_eq!(fs::read_to_string(response).unwrap(), "Directly Fixable");
}

#[test]
fn test_prior_attempt_needs_both_files() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), OLD_RUN, &["a.T#x"]);
    create_run(project.path(), NEW_RUN, &["a.T#x"]);
    fs::write(
        run_dir(project.path(), OLD_RUN).join("a.T.x/agent_response"),
        "Directly Fixable",
    )
    .unwrap();

    let adapter = StubAdapter::new();
    let options = FixerOptions::new(project.path(), ModelFamily::Gpt35, Mode::Fix);
    run_fixer(&options, &adapter).unwrap();
    assert!(!adapter.requests()[0].prompt.contains("In your previous attempt"));
}

#[test]
fn test_explicit_timestamp_selects_older_run() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), OLD_RUN, &["a.T#old"]);
    create_run(project.path(), NEW_RUN, &["a.T#new"]);

    let adapter = StubAdapter::with_response("patch".to_string());
    let mut options = FixerOptions::new(project.path(), ModelFamily::Gpt4, Mode::Fix);
    options.timestamp = Some(OLD_RUN.to_string());
    let summary = run_fixer(&options, &adapter).unwrap();

    assert_eq!(summary.run, OLD_RUN);
    assert!(run_dir(project.path(), OLD_RUN).join("a.T.old/patch.txt").exists());
    assert!(!run_dir(project.path(), NEW_RUN).join("a.T.new/patch.txt").exists());
}

#[test]
fn test_rerun_overwrites_result_and_applies_options() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), NEW_RUN, &["a.T#x"]);
    let patch = run_dir(project.path(), NEW_RUN).join("a.T.x/patch.txt");
    fs::write(&patch, "stale").unwrap();

    let adapter = StubAdapter::with_response("\nfresh\n".to_string());
    let mut options = FixerOptions::new(project.path(), ModelFamily::Qwen, Mode::Fix);
    options.max_tokens = 256;
    options.extra_prompt = " Do not add comments".to_string();
    run_fixer(&options, &adapter).unwrap();

    assert_eq!(fs::read_to_string(&patch).unwrap(), "fresh");
    let request = &adapter.requests()[0];
    assert_eq!(request.max_tokens, 256);
    assert_eq!(request.temperature, 0.6);
    assert!(request.prompt.ends_with(" Do not add comments"));
}

#[test]
fn test_cases_processed_in_manifest_order() {
    let project = TempDir::new().unwrap();
    create_run(project.path(), NEW_RUN, &["z.T#last", "a.T#first"]);

    let summary = run_fixer(
        &FixerOptions::new(project.path(), ModelFamily::Gpt4, Mode::Fix),
        &StubAdapter::new(),
    )
    .unwrap();

    let dir = run_dir(project.path(), NEW_RUN);
    assert_eq!(
        summary.written,
        vec![dir.join("z.T.last/patch.txt"), dir.join("a.T.first/patch.txt")]
    );
}
