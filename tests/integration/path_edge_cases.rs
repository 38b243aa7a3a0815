use dupsweep::dedupe::Deduplicator;
use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

#[test]
fn test_paths_with_quotes_and_spaces() {
    let dir = tempdir().unwrap();

    // Windows does not allow double quotes in filenames.
    if cfg!(not(windows)) {
        let quote_name = "file with \"quote\".txt";
        File::create(dir.path().join(quote_name))
            .unwrap()
            .write_all(b"content")
            .unwrap();
        fs::write(dir.path().join("duplicate.txt"), b"content").unwrap();

        let finder = DuplicateFinder::with_defaults();
        let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

        assert_eq!(groups.len(), 1);
        assert!(groups[0]
            .files
            .iter()
            .any(|f| f.path.to_string_lossy().contains('"')));
    }
}

#[test]
fn test_paths_with_newlines_are_deleted() {
    let dir = tempdir().unwrap();

    if cfg!(not(windows)) {
        let first = dir.path().join("a_original.txt");
        let newline = dir.path().join("b_with\nnewline.txt");
        fs::write(&first, b"content").unwrap();
        fs::write(&newline, b"content").unwrap();

        let report = Deduplicator::new(FinderConfig::default())
            .deduplicate(dir.path())
            .unwrap();

        assert_eq!(report.deleted_count(), 1);
        assert_eq!(report.deletions[0].path, newline);
        assert!(first.exists());
    }
}

#[test]
fn test_unicode_file_names() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("café.txt"), b"bonjour").unwrap();
    fs::write(dir.path().join("日本語.txt"), b"bonjour").unwrap();
    fs::write(dir.path().join("emoji_🦀.txt"), b"bonjour").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 3);
}

#[cfg(unix)]
#[test]
fn test_non_utf8_file_name() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let dir = tempdir().unwrap();
    let raw = dir.path().join(OsStr::from_bytes(b"z_invalid_\xff.bin"));
    if let Err(e) = fs::write(&raw, b"bytes") {
        eprintln!("Skipping non-UTF-8 test: filesystem rejected name: {}", e);
        return;
    }
    fs::write(dir.path().join("a_valid.bin"), b"bytes").unwrap();

    let report = Deduplicator::new(FinderConfig::default())
        .deduplicate(dir.path())
        .unwrap();

    assert_eq!(report.deleted_count(), 1);
    assert_eq!(report.deletions[0].path, raw);
    assert!(!raw.exists());
}

#[test]
fn test_extremely_long_paths() {
    let dir = tempdir().unwrap();

    let mut current_path = dir.path().to_path_buf();
    let folder_name = "a".repeat(50);

    // 6 levels of 50-char folders is well past 260 characters
    for i in 0..6 {
        current_path = current_path.join(format!("{}_{}", i, folder_name));
        if let Err(e) = fs::create_dir(&current_path) {
            eprintln!(
                "Skipping extremely long path test: failed to create dir: {}",
                e
            );
            return;
        }
    }

    let file_path = current_path.join("file.txt");
    if let Err(e) = fs::write(&file_path, b"content") {
        eprintln!(
            "Skipping extremely long path test: failed to create file: {}",
            e
        );
        return;
    }
    fs::write(dir.path().join("duplicate.txt"), b"content").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files.len(), 2);
}

#[test]
fn test_relative_root() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), b"rel").unwrap();
    fs::write(dir.path().join("b.txt"), b"rel").unwrap();

    // A root with a trailing `.` component walks the same tree
    let root = dir.path().join(".");
    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(&root).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
}
