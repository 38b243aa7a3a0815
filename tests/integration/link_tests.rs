use dupsweep::actions::{DeletionReport, SurvivorPolicy};
use dupsweep::dedupe::Deduplicator;
use dupsweep::duplicates::{DuplicateFinder, FinderConfig};
use dupsweep::scanner::WalkerConfig;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn following_config() -> FinderConfig {
    FinderConfig::default().with_walker_config(WalkerConfig::default().with_follow_symlinks(true))
}

#[test]
fn test_hardlinks_are_content_duplicates() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("a_original.txt");
    let hardlink = dir.path().join("b_hardlink.txt");

    File::create(&original)
        .unwrap()
        .write_all(b"identical content")
        .unwrap();

    if let Err(e) = fs::hard_link(&original, &hardlink) {
        eprintln!("Skipping hardlink test: failed to create hardlink: {}", e);
        return;
    }

    let report = Deduplicator::new(FinderConfig::default())
        .deduplicate(dir.path())
        .unwrap();

    // Removing one link leaves the content reachable through the other
    assert_eq!(report.deleted_count(), 1);
    assert_eq!(fs::read(&original).unwrap(), b"identical content");
    assert!(!hardlink.exists());
}

#[cfg(unix)]
#[test]
fn test_symlinks_not_followed_by_default() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let symlink = dir.path().join("symlink.txt");

    fs::write(&original, b"content").unwrap();
    std::os::unix::fs::symlink(&original, &symlink).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 1);
    assert!(groups.is_empty());
}

#[cfg(unix)]
#[test]
fn test_dedupe_never_touches_symlinks_by_default() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let symlink = dir.path().join("symlink.txt");

    fs::write(&original, b"content").unwrap();
    std::os::unix::fs::symlink(&original, &symlink).unwrap();

    let report = Deduplicator::new(FinderConfig::default())
        .deduplicate(dir.path())
        .unwrap();

    assert_eq!(report.deleted_count(), 0);
    assert!(fs::symlink_metadata(&symlink).is_ok());
}

#[cfg(unix)]
#[test]
fn test_symlinks_followed_when_enabled() {
    let dir = tempdir().unwrap();
    let original = dir.path().join("original.txt");
    let symlink = dir.path().join("symlink.txt");

    fs::write(&original, b"content").unwrap();
    std::os::unix::fs::symlink(&original, &symlink).unwrap();

    let finder = DuplicateFinder::new(following_config());
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].files[0].path, original);
}

/// Point `link` at a real file `target` inside `dir`, then dedupe with
/// links followed.
#[cfg(unix)]
fn dedupe_linked_pair(
    dir: &std::path::Path,
    link: &str,
    target: &str,
) -> (std::path::PathBuf, std::path::PathBuf, DeletionReport) {
    let real = dir.join(target);
    let alias = dir.join(link);
    fs::write(&real, b"only copy").unwrap();
    std::os::unix::fs::symlink(&real, &alias).unwrap();

    let report = Deduplicator::new(following_config()).deduplicate(dir).unwrap();
    (real, alias, report)
}

#[cfg(unix)]
#[test]
fn test_followed_link_sorting_first_keeps_target() {
    let dir = tempdir().unwrap();
    let (real, alias, report) = dedupe_linked_pair(dir.path(), "a_link.txt", "z_target.txt");

    assert_eq!(fs::read(&real).unwrap(), b"only copy");
    assert_eq!(fs::read(&alias).unwrap(), b"only copy");
    assert_eq!(report.deleted_count(), 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].path.as_deref(), Some(alias.as_path()));
}

#[cfg(unix)]
#[test]
fn test_followed_link_sorting_last_keeps_target() {
    let dir = tempdir().unwrap();
    let (real, alias, report) = dedupe_linked_pair(dir.path(), "z_link.txt", "a_target.txt");

    assert_eq!(fs::read(&real).unwrap(), b"only copy");
    assert_eq!(fs::read(&alias).unwrap(), b"only copy");
    assert_eq!(report.deleted_count(), 0);
}

#[cfg(unix)]
#[test]
fn test_followed_link_with_lexicographic_policy_keeps_target() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("z_target.txt");
    let alias = dir.path().join("a_link.txt");
    fs::write(&real, b"only copy").unwrap();
    std::os::unix::fs::symlink(&real, &alias).unwrap();

    let outcome = Deduplicator::new(following_config())
        .with_policy(SurvivorPolicy::Lexicographic)
        .run(dir.path())
        .unwrap();

    assert_eq!(outcome.plan.groups[0].survivor.path, real);
    assert_eq!(fs::read(&real).unwrap(), b"only copy");
}

#[cfg(unix)]
#[test]
fn test_file_reached_through_linked_directory_survives() {
    let dir = tempdir().unwrap();
    let real_dir = dir.path().join("z_real");
    fs::create_dir(&real_dir).unwrap();
    fs::write(real_dir.join("x"), b"only copy").unwrap();
    std::os::unix::fs::symlink(&real_dir, dir.path().join("a_alias")).unwrap();

    let report = Deduplicator::new(following_config())
        .deduplicate(dir.path())
        .unwrap();

    assert_eq!(report.deleted_count(), 0);
    assert_eq!(fs::read(real_dir.join("x")).unwrap(), b"only copy");
    assert!(report.errors[0].message.contains("same file"));
}

#[cfg(unix)]
#[test]
fn test_link_to_survivor_kept_while_real_copy_removed() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let link = dir.path().join("c_link.txt");
    fs::write(&a, b"twice").unwrap();
    fs::write(&b, b"twice").unwrap();
    std::os::unix::fs::symlink(&a, &link).unwrap();

    let report = Deduplicator::new(following_config())
        .deduplicate(dir.path())
        .unwrap();

    assert_eq!(report.deleted_count(), 1);
    assert_eq!(report.deletions[0].path, b);
    assert_eq!(fs::read(&a).unwrap(), b"twice");
    assert_eq!(fs::read(&link).unwrap(), b"twice");
}

#[cfg(unix)]
#[test]
fn test_symlink_cycle_does_not_hang() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    fs::write(sub.join("file.txt"), b"data").unwrap();
    std::os::unix::fs::symlink(&sub, sub.join("link")).unwrap();

    let finder = DuplicateFinder::new(following_config());
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}
