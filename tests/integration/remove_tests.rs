use dups::actions::{remove_duplicates, DeleteConfig};
use dups::duplicates::{DuplicateFinder, FinderConfig};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_scan_then_remove() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("b.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("c.txt"), "world\n").unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(0));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    let summary = remove_duplicates(&groups, &DeleteConfig::permanent()).unwrap();

    assert_eq!(summary.files_deleted, 1);
    assert_eq!(summary.bytes_reclaimed, 6);
    assert!(dir.path().join("a.txt").exists());
    assert!(!dir.path().join("b.txt").exists());
    assert!(dir.path().join("c.txt").exists());

    // A second pass finds nothing left to remove
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_remove_across_directories() {
    let dir = tempdir().unwrap();
    let left = dir.path().join("left");
    let right = dir.path().join("right");
    fs::create_dir(&left).unwrap();
    fs::create_dir(&right).unwrap();

    for i in 0..5 {
        let body = format!("shared payload number {}", i);
        fs::write(left.join(format!("f{}", i)), &body).unwrap();
        fs::write(right.join(format!("f{}", i)), &body).unwrap();
    }

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 5);
    assert_eq!(summary.duplicate_files, 5);

    let removed = remove_duplicates(&groups, &DeleteConfig::default()).unwrap();
    assert_eq!(removed.files_deleted, 5);
    assert_eq!(removed.bytes_reclaimed, summary.reclaimable_space);

    // "left" sorts before "right", so every retained copy lives in left/
    for i in 0..5 {
        assert!(left.join(format!("f{}", i)).exists());
        assert!(!right.join(format!("f{}", i)).exists());
    }
}

#[test]
fn test_remove_stops_at_first_failure() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a1"), "first duplicate pair").unwrap();
    fs::write(dir.path().join("a2"), "first duplicate pair").unwrap();
    fs::write(dir.path().join("b1"), "second pair of copies").unwrap();
    fs::write(dir.path().join("b2"), "second pair of copies").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 2);

    // Remove the redundant member of the second class behind the remover's back
    let vanished = groups[1].redundant()[0].path.clone();
    fs::remove_file(&vanished).unwrap();

    let err = remove_duplicates(&groups, &DeleteConfig::permanent()).unwrap_err();
    assert_eq!(err.path(), vanished.as_path());
    assert_eq!(err.partial().files_deleted, 1);
    assert_eq!(err.partial().bytes_reclaimed, 20);
    assert!(err
        .to_string()
        .starts_with("error deleting duplicate files:"));
}
