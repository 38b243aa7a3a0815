use dupsweep::actions::{
    commit, plan_deletions, DeleteConfig, DeleteError, ErrorStage, FileError, SurvivorPolicy,
};
use dupsweep::duplicates::{DuplicateFinder, FinderConfig, FinderError};
use dupsweep::scanner::{FileEntry, HashError, ScanError};
use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn test_find_duplicates_from_files_continues_on_error() {
    let finder = DuplicateFinder::with_defaults();
    let file1 = FileEntry::new(PathBuf::from("nonexistent_1.txt"), 100, 0);
    let file2 = FileEntry::new(PathBuf::from("nonexistent_2.txt"), 100, 1);

    let (groups, summary) = finder
        .find_duplicates_from_files(vec![file1, file2])
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.failed_files, 2);
    assert_eq!(summary.scan_errors.len(), 2);

    for err in &summary.scan_errors {
        match err {
            ScanError::Hash(HashError::NotFound(_)) => {}
            _ => panic!("Expected NotFound HashError, got: {:?}", err),
        }
    }
}

#[test]
fn test_missing_file_does_not_hide_real_duplicates() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, b"real").unwrap();
    fs::write(&b, b"real").unwrap();

    let files = vec![
        FileEntry::new(a, 4, 0),
        FileEntry::new(dir.path().join("gone.txt"), 4, 1),
        FileEntry::new(b, 4, 2),
    ];

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates_from_files(files).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
    assert_eq!(summary.failed_files, 1);
    assert_eq!(FileError::from(&summary.scan_errors[0]).stage, ErrorStage::Read);
}

#[test]
fn test_root_errors_are_fatal() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("file.txt");
    fs::write(&file, b"x").unwrap();

    let finder = DuplicateFinder::with_defaults();

    match finder.find_duplicates(&dir.path().join("missing")) {
        Err(FinderError::Path(ScanError::NotFound(_))) => {}
        other => panic!("Expected NotFound, got: {:?}", other.map(|(g, _)| g.len())),
    }

    match finder.find_duplicates(&file) {
        Err(FinderError::Path(ScanError::NotADirectory(_))) => {}
        other => panic!("Expected NotADirectory, got: {:?}", other.map(|(g, _)| g.len())),
    }
}

#[test]
fn test_interrupted_scan_returns_error() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.txt"), b"dup").unwrap();

    let flag = Arc::new(AtomicBool::new(true));
    let finder = DuplicateFinder::new(FinderConfig::default().with_shutdown_flag(flag));

    assert!(matches!(
        finder.find_duplicates(dir.path()),
        Err(FinderError::Interrupted)
    ));
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_commit_continues_after_vanished_candidate() {
    let dir = tempdir().unwrap();
    for name in ["a.txt", "b.txt", "c.txt"] {
        fs::write(dir.path().join(name), b"triple").unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let plan = plan_deletions(groups, SurvivorPolicy::FirstSeen);

    // Another process removes one candidate between plan and commit
    fs::remove_file(dir.path().join("b.txt")).unwrap();

    let report = commit(&plan, &DeleteConfig::default(), None);

    assert_eq!(report.deleted_count(), 1);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].stage, ErrorStage::Delete);
    assert!(!dir.path().join("c.txt").exists());
    assert!(dir.path().join("a.txt").exists());
}

#[test]
fn test_commit_refuses_modified_candidate() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let plan = plan_deletions(groups, SurvivorPolicy::FirstSeen);

    fs::write(dir.path().join("b.txt"), b"grown since the scan").unwrap();

    let report = commit(&plan, &DeleteConfig::default(), None);

    assert_eq!(report.deleted_count(), 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].message.contains("modified"));
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_verify_refuses_same_size_different_bytes() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    let plan = plan_deletions(groups, SurvivorPolicy::FirstSeen);

    // Same length, different content: only the byte comparison can tell
    fs::write(dir.path().join("b.txt"), b"diff").unwrap();

    let report = commit(&plan, &DeleteConfig::default().with_verify(true), None);

    assert_eq!(report.deleted_count(), 0);
    assert_eq!(report.errors[0].stage, ErrorStage::Verify);
    assert!(dir.path().join("b.txt").exists());

    let err = DeleteError::ContentMismatch {
        path: dir.path().join("b.txt"),
        survivor: dir.path().join("a.txt"),
    };
    assert_eq!(FileError::from(&err).stage, ErrorStage::Verify);
}
