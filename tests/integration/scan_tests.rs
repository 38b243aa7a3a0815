use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
use dupsweep::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
    assert!(summary.scan_errors.is_empty());
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content a")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"content b")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"content c")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_hello_hello_world() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"hello").unwrap();
    fs::write(dir.path().join("b.txt"), b"hello").unwrap();
    fs::write(dir.path().join("c.txt"), b"world").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    let group = &groups[0];
    assert_eq!(group.fingerprint.size, 5);
    assert_eq!(group.fingerprint.md5, "5d41402abc4b2a76b9719d911017c592");
    assert_eq!(
        group.fingerprint.sha256,
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
    assert_eq!(group.files[0].path, dir.path().join("a.txt"));
    assert_eq!(group.files[1].path, dir.path().join("b.txt"));

    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 5);
}

#[test]
fn test_scan_does_not_modify_tree() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"same").unwrap();
    fs::write(dir.path().join("b.txt"), b"same").unwrap();

    let finder = DuplicateFinder::with_defaults();
    finder.find_duplicates(dir.path()).unwrap();

    assert!(dir.path().join("a.txt").exists());
    assert!(dir.path().join("b.txt").exists());
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    let deep = sub.join("deeper");
    fs::create_dir_all(&deep).unwrap();

    fs::write(dir.path().join("a.txt"), b"nested duplicate").unwrap();
    fs::write(sub.join("b.txt"), b"nested duplicate").unwrap();
    fs::write(deep.join("c.txt"), b"nested duplicate").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 3);
    assert_eq!(summary.duplicate_files, 2);
}

#[test]
fn test_scan_same_size_different_content() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"aaaa").unwrap();
    fs::write(dir.path().join("b.txt"), b"bbbb").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
}

#[test]
fn test_scan_multiple_groups_in_walk_order() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1.txt"), b"group one").unwrap();
    fs::write(dir.path().join("b1.txt"), b"group two").unwrap();
    fs::write(dir.path().join("c1.txt"), b"group one").unwrap();
    fs::write(dir.path().join("d1.txt"), b"group two").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].files[0].path, dir.path().join("a1.txt"));
    assert_eq!(groups[1].files[0].path, dir.path().join("b1.txt"));
    assert_eq!(summary.duplicate_groups, 2);
}

#[test]
fn test_scan_results_stable_across_thread_counts() {
    let dir = tempdir().unwrap();
    for i in 0..20 {
        fs::write(
            dir.path().join(format!("file_{:02}.txt", i)),
            format!("content {}", i % 5),
        )
        .unwrap();
    }

    let sequential = DuplicateFinder::new(FinderConfig::default().with_io_threads(1));
    let parallel = DuplicateFinder::new(FinderConfig::default().with_io_threads(8));

    let (groups_seq, _) = sequential.find_duplicates(dir.path()).unwrap();
    let (groups_par, _) = parallel.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups_seq.len(), 5);
    assert_eq!(groups_seq, groups_par);
}

#[test]
fn test_scan_with_ignore_patterns() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"dup").unwrap();
    fs::write(dir.path().join("b.tmp"), b"dup").unwrap();

    let walker_config = WalkerConfig::default().with_ignore_pattern("*.tmp");
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
fn test_scan_skip_hidden() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("visible.txt"), b"dup").unwrap();
    fs::write(dir.path().join(".hidden.txt"), b"dup").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    assert_eq!(groups.len(), 1);

    let walker_config = WalkerConfig::default().with_skip_hidden(true);
    let finder = DuplicateFinder::new(FinderConfig::default().with_walker_config(walker_config));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}
