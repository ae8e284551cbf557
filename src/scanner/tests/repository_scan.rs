//! Repository scan message sequencing and statistics

use super::helpers::{entry, task};
use crate::extract::{FunctionKind, LanguageFamily};
use crate::scanner::{scan, ArchiveEntry, FileFilter, ScanError, ScanMessage, ScanResult, ScanStats};

fn ok_entries(entries: Vec<ArchiveEntry>) -> impl Iterator<Item = ScanResult<ArchiveEntry>> {
    entries.into_iter().map(Ok)
}

#[test]
fn test_messages_in_archive_order_then_done() {
    let entries = ok_entries(vec![
        entry("b/util.go", "func A() {\n}\nfunc B() {\n}\n"),
        entry("a/app.py", "def main():\n    pass\n"),
    ]);

    let messages: Vec<ScanMessage> = scan(
        task("octo/demo", 3, 10),
        entries,
        FileFilter::new(128),
        false,
    )
    .collect::<ScanResult<_>>()
    .unwrap();

    assert_eq!(messages.len(), 4);
    let found: Vec<(String, String)> = messages
        .iter()
        .filter_map(|m| match m {
            ScanMessage::FunctionFound { path, record, .. } => {
                Some((path.clone(), record.name().to_string()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("b/util.go".to_string(), "A".to_string()),
            ("b/util.go".to_string(), "B".to_string()),
            ("a/app.py".to_string(), "main".to_string()),
        ]
    );

    match messages.last() {
        Some(ScanMessage::RepositoryDone { rank, total, stats }) => {
            assert_eq!((*rank, *total), (3, 10));
            assert_eq!(
                stats,
                &ScanStats {
                    files_scanned: 2,
                    files_skipped: 0,
                    undecodable: 0,
                    functions: 3,
                }
            );
        }
        other => panic!("expected RepositoryDone last, got {:?}", other),
    }
}

#[test]
fn test_ineligible_files_emit_nothing() {
    let mut oversized = entry("big.js", "");
    oversized.size = 2048;

    let entries = ok_entries(vec![
        entry("README.md", "# title"),
        entry("node_modules/x/index.js", "function x() {\n}\n"),
        oversized,
    ]);

    let messages: Vec<ScanMessage> = scan(
        task("octo/demo", 1, 1),
        entries,
        FileFilter::new(1),
        false,
    )
    .collect::<ScanResult<_>>()
    .unwrap();

    assert_eq!(messages.len(), 1);
    assert!(matches!(
        &messages[0],
        ScanMessage::RepositoryDone { stats, .. } if stats.files_skipped == 3 && stats.functions == 0
    ));
}

#[test]
fn test_undecodable_files_are_counted() {
    let entries = ok_entries(vec![ArchiveEntry::new("bad.c", vec![0xff, 0xfe, b'{'])]);

    let messages: Vec<ScanMessage> = scan(
        task("octo/demo", 1, 1),
        entries,
        FileFilter::new(128),
        false,
    )
    .collect::<ScanResult<_>>()
    .unwrap();

    assert!(matches!(
        &messages[0],
        ScanMessage::RepositoryDone { stats, .. } if stats.undecodable == 1 && stats.files_scanned == 0
    ));
}

#[test]
fn test_entry_error_ends_sequence() {
    let entries = vec![
        Ok(entry("a.js", "function a() {\n}\n")),
        Err(ScanError::archive("truncated")),
        Ok(entry("b.js", "function b() {\n}\n")),
    ]
    .into_iter();

    let results: Vec<_> = scan(
        task("octo/demo", 1, 1),
        entries,
        FileFilter::new(128),
        false,
    )
    .collect();

    assert_eq!(results.len(), 2);
    assert!(matches!(&results[0], Ok(ScanMessage::FunctionFound { .. })));
    assert!(matches!(&results[1], Err(ScanError::Archive { .. })));
}

#[test]
fn test_bodies_collected_when_enabled() {
    let source = "function add(a, b) {\n  return a + b;\n}\n";

    let with_body: Vec<ScanMessage> = scan(
        task("octo/demo", 1, 1),
        ok_entries(vec![entry("add.js", source)]),
        FileFilter::new(128),
        true,
    )
    .collect::<ScanResult<_>>()
    .unwrap();

    match &with_body[0] {
        ScanMessage::FunctionFound {
            repo,
            family,
            record,
            body,
            ..
        } => {
            assert_eq!(repo, "octo/demo");
            assert_eq!(*family, LanguageFamily::JavaScript);
            assert_eq!(record.kind(), FunctionKind::Function);
            assert_eq!(
                body.as_deref(),
                Some("function add(a, b) {\n  return a + b;\n}")
            );
        }
        other => panic!("expected FunctionFound, got {:?}", other),
    }

    let without_body: Vec<ScanMessage> = scan(
        task("octo/demo", 1, 1),
        ok_entries(vec![entry("add.js", source)]),
        FileFilter::new(128),
        false,
    )
    .collect::<ScanResult<_>>()
    .unwrap();
    assert!(matches!(
        &without_body[0],
        ScanMessage::FunctionFound { body: None, .. }
    ));
}

#[test]
fn test_empty_archive_yields_only_done() {
    let mut messages = scan(
        task("octo/empty", 2, 2),
        ok_entries(vec![]),
        FileFilter::new(128),
        false,
    );

    assert!(matches!(
        messages.next(),
        Some(Ok(ScanMessage::RepositoryDone { rank: 2, total: 2, .. }))
    ));
    assert!(messages.next().is_none());
    assert!(messages.next().is_none());
}
