use dups::duplicates::{DuplicateFinder, FinderConfig};
use dups::scanner::Algorithm;
use std::fs::{self, File};
use std::io::Write;
use tempfile::tempdir;

fn all_sizes() -> FinderConfig {
    FinderConfig::default().with_min_size(0)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_unique_files() {
    let dir = tempdir().unwrap();

    File::create(dir.path().join("a.txt"))
        .unwrap()
        .write_all(b"content of file a")
        .unwrap();
    File::create(dir.path().join("b.txt"))
        .unwrap()
        .write_all(b"content of file b")
        .unwrap();
    File::create(dir.path().join("c.txt"))
        .unwrap()
        .write_all(b"content of file c")
        .unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_trivial_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("b.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("c.txt"), "world\n").unwrap();

    let finder = DuplicateFinder::new(all_sizes());
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
    assert_eq!(groups[0].size, 6);
    assert_eq!(groups[0].digest, "b1946ac92492d2347c6235b4d2611184");
    assert!(groups[0].contains(&dir.path().join("a.txt")));
    assert!(groups[0].contains(&dir.path().join("b.txt")));
    assert!(!groups[0].contains(&dir.path().join("c.txt")));

    assert_eq!(summary.duplicate_groups, 1);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 6);
}

#[test]
fn test_scan_size_prefilter() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("y"), vec![0u8; 100]).unwrap();
    fs::write(dir.path().join("z"), vec![0u8; 99]).unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].size, 100);
    assert!(!groups[0].contains(&dir.path().join("z")));
    // z is alone in its size bucket and is never hashed
    assert_eq!(summary.hashed_files, 2);
    assert_eq!(summary.candidate_files, 3);
}

#[test]
fn test_scan_min_size_is_exclusive() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"0123456789").unwrap();
    fs::write(dir.path().join("b"), b"0123456789").unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(10));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups.is_empty());
    assert_eq!(summary.candidate_files, 0);

    let finder = DuplicateFinder::new(FinderConfig::default().with_min_size(9));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 1);
}

#[test]
fn test_scan_nested_directories() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("subdir");
    fs::create_dir(&sub).unwrap();

    fs::write(dir.path().join("a.txt"), "nested duplicate body").unwrap();
    fs::write(sub.join("b.txt"), "nested duplicate body").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(summary.total_files, 2);
}

#[test]
fn test_scan_recursion_off() {
    let dir = tempdir().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();

    fs::write(dir.path().join("top1"), "top level content").unwrap();
    fs::write(dir.path().join("top2"), "top level content").unwrap();
    fs::write(sub.join("deep1"), "only inside sub dir").unwrap();
    fs::write(sub.join("deep2"), "only inside sub dir").unwrap();

    let finder = DuplicateFinder::new(FinderConfig::default().with_recursive(false));
    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(summary.total_files, 2);
    assert_eq!(groups.len(), 1);
    assert!(groups[0].contains(&dir.path().join("top1")));
    assert!(!groups[0].contains(&sub.join("deep1")));

    let finder = DuplicateFinder::with_defaults();
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert_eq!(groups.len(), 2);
}

#[test]
fn test_scan_retains_lexicographically_first_path() {
    let dir = tempdir().unwrap();
    for name in ["c.bin", "a.bin", "b.bin"] {
        fs::write(dir.path().join(name), "same bytes everywhere").unwrap();
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_parallel(true));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(
        groups[0].retained().unwrap().path,
        dir.path().join("a.bin")
    );
    assert_eq!(groups[0].redundant().len(), 2);
}

#[test]
fn test_scan_digest_width_per_algorithm() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("one"), "digest width check").unwrap();
    fs::write(dir.path().join("two"), "digest width check").unwrap();

    for algorithm in [Algorithm::Md5, Algorithm::Sha256] {
        let finder = DuplicateFinder::new(FinderConfig::default().with_algorithm(algorithm));
        let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
        assert_eq!(groups[0].digest.len(), algorithm.hex_width());
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_algorithm(Algorithm::XxHash));
    let (groups, _) = finder.find_duplicates(dir.path()).unwrap();
    assert!(groups[0].digest.len() <= 16);
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let err = finder
        .find_duplicates(&dir.path().join("does-not-exist"))
        .unwrap_err();
    assert!(err.to_string().starts_with("can't find path:"));
}

#[test]
fn test_scan_root_is_a_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("plain.txt");
    fs::write(&file, "not a directory").unwrap();

    let finder = DuplicateFinder::with_defaults();
    let err = finder.find_duplicates(&file).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("please provide a directory path not a file path"));
}
