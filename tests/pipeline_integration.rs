//! Pipeline integration tests
//!
//! Real tarballs go through staging, extraction, batching and the reporter.

mod common;

use common::{ranked, render_run, TarballFetcher};
use repofuncs::pipeline::BatchPlan;

const ADD_JS: &str = "function add(a, b) {\n  return a + b;\n}\n";
const HELPER_PY: &str = "def helper(x):\n    return x\n";

fn two_repos() -> TarballFetcher {
    TarballFetcher::default()
        .with_repo("acme/web", &[("src/add.js", ADD_JS), ("README.md", "# web\n")])
        .with_repo("acme/tools", &[("tool.py", HELPER_PY)])
}

#[tokio::test]
async fn test_sequential_run_output() {
    let tasks = ranked(&["acme/web", "acme/tools"]);
    let run = render_run(two_repos(), tasks, BatchPlan::chunked(2, 1), 1, 128, false).await;

    let separator = "-".repeat(80);
    let expected = [
        "[batch 1/2] repos 1-1".to_string(),
        "[acme/web] src/add.js start:1 end:3 js_function add".to_string(),
        separator.clone(),
        "[1/2] done".to_string(),
        "[batch 1/2 done] repos 1-1: 1 functions across 1 repos (0 failed)".to_string(),
        "[batch 2/2] repos 2-2".to_string(),
        "[acme/tools] tool.py start:1 end:2 python_function helper".to_string(),
        separator,
        "[2/2] done".to_string(),
        "[batch 2/2 done] repos 2-2: 1 functions across 1 repos (0 failed)".to_string(),
        "Done. Printed 2 functions across 2 repos.".to_string(),
    ];
    let lines: Vec<&str> = run.output.lines().collect();
    assert_eq!(lines, expected);

    assert_eq!(run.summary.repositories, 2);
    assert_eq!(run.summary.functions, 2);
    assert!(!run.summary.has_failures());
}

#[tokio::test]
async fn test_bodies_are_printed_when_requested() {
    let tasks = ranked(&["acme/web"]);
    let fetcher = TarballFetcher::default().with_repo("acme/web", &[("src/add.js", ADD_JS)]);
    let run = render_run(fetcher, tasks, BatchPlan::chunked(1, 25), 2, 128, true).await;

    assert!(run.output.contains(
        "[acme/web] src/add.js start:1 end:3 js_function add\nfunction add(a, b) {\n  return a + b;\n}\n"
    ));
}

#[tokio::test]
async fn test_oversized_undecodable_and_vendored_files_are_skipped() {
    let padded = format!("function big() {{\n}}\n{}", "// pad\n".repeat(300));
    assert!(padded.len() > 1024);

    let fetcher = TarballFetcher::default()
        .with_repo(
            "acme/mixed",
            &[
                ("big.js", padded.as_str()),
                ("node_modules/dep/index.js", ADD_JS),
                ("small.go", "func Small() {\n}\n"),
            ],
        )
        .with_binary("acme/mixed", "blob.py", vec![0xff, 0xfe, b'd', b'e', b'f']);

    let run = render_run(fetcher, ranked(&["acme/mixed"]), BatchPlan::chunked(1, 25), 1, 1, false).await;

    assert!(run.output.contains("[acme/mixed] small.go start:1 end:2 go_function Small"));
    assert!(!run.output.contains("big"));
    assert!(!run.output.contains("node_modules"));
    assert!(!run.output.contains("blob.py"));
    assert_eq!(run.summary.functions, 1);
}

#[tokio::test]
async fn test_failed_repository_is_reported_and_counted() {
    let tasks = ranked(&["acme/web", "acme/missing", "acme/tools"]);
    let run = render_run(two_repos(), tasks, BatchPlan::chunked(3, 25), 3, 128, false).await;

    assert!(run.output.contains("[2/3] failed [acme/missing]: "));
    assert!(run
        .output
        .contains("[batch 1/1 done] repos 1-3: 2 functions across 2 repos (1 failed)"));
    assert!(run
        .output
        .ends_with("Done. Printed 2 functions across 2 repos. 1 failed.\n"));
    assert_eq!(run.summary.failed, 1);
    assert!(run.summary.has_failures());
}

#[tokio::test]
async fn test_batch_targets_shape_the_batches() {
    let names: Vec<String> = (1..=6).map(|i| format!("acme/r{}", i)).collect();
    let fetcher = names.iter().fold(TarballFetcher::default(), |f, name| {
        f.with_repo(name, &[("main.rb", "def run\n  1\nend\n")])
    });
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();

    let plan = BatchPlan::from_targets(6, &[2, 5, 6]);
    let run = render_run(fetcher, ranked(&refs), plan, 4, 128, false).await;

    for line in [
        "[batch 1/3 done] repos 1-2: 2 functions across 2 repos (0 failed)",
        "[batch 2/3 done] repos 3-5: 3 functions across 3 repos (0 failed)",
        "[batch 3/3 done] repos 6-6: 1 functions across 1 repos (0 failed)",
    ] {
        assert!(run.output.contains(line), "missing {:?} in\n{}", line, run.output);
    }
    assert_eq!(run.summary.functions, 6);
}

#[tokio::test]
async fn test_staging_is_cleaned_after_run() {
    let tasks = ranked(&["acme/web", "acme/tools"]);
    let run = render_run(two_repos(), tasks, BatchPlan::chunked(2, 25), 2, 128, false).await;

    let leftovers: Vec<_> = std::fs::read_dir(run.staging.path()).unwrap().collect();
    assert!(leftovers.is_empty());
}
