use camino::Utf8PathBuf;
use photomirror_core::LocalEntry;
use photomirror_scanner::{ScanStats, Scanner, ScannerError};
use std::fs;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn utf8_root(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
}

#[test]
fn indexes_nested_tree_relative_to_root() {
    let dir = tempdir().unwrap();
    let root = utf8_root(&dir);
    fs::create_dir_all(root.join("Nature/Trees")).unwrap();
    fs::create_dir_all(root.join("Travel/Europe/Paris")).unwrap();
    fs::write(root.join("Nature/Trees/oak.jpg"), b"hello").unwrap();
    fs::write(root.join("stray.txt"), b"").unwrap();

    let (index, stats) = Scanner::index_directory(&root, None).unwrap();

    assert_eq!(index.get("Nature"), Some(&LocalEntry::Directory));
    assert_eq!(index.get("Nature/Trees"), Some(&LocalEntry::Directory));
    assert_eq!(index.get("Travel/Europe/Paris"), Some(&LocalEntry::Directory));
    assert_eq!(
        index.get("Nature/Trees/oak.jpg"),
        Some(&LocalEntry::ContentHash(
            "5d41402abc4b2a76b9719d911017c592".to_string()
        ))
    );
    assert_eq!(
        index.get("stray.txt").and_then(|e| e.content_hash()),
        Some("d41d8cd98f00b204e9800998ecf8427e")
    );
    assert_eq!(index.len(), 7);
    assert!(index.get("").is_none(), "root must not be indexed");

    assert_eq!(stats.files_hashed, 2);
    assert_eq!(stats.dirs_seen, 5);
    assert_eq!(stats.bytes_hashed, 5);
}

#[test]
fn empty_root_yields_empty_index() {
    let dir = tempdir().unwrap();
    let (index, stats) = Scanner::index_directory(&utf8_root(&dir), None).unwrap();
    assert!(index.is_empty());
    assert_eq!(stats, ScanStats::default());
}

#[test]
fn missing_root_is_a_scan_error() {
    let dir = tempdir().unwrap();
    let root = utf8_root(&dir).join("does-not-exist");
    assert!(matches!(
        Scanner::index_directory(&root, None),
        Err(ScannerError::Root { .. })
    ));
}

#[test]
fn file_as_root_is_rejected() {
    let dir = tempdir().unwrap();
    let root = utf8_root(&dir).join("file.jpg");
    fs::write(&root, b"x").unwrap();
    assert!(matches!(
        Scanner::index_directory(&root, None),
        Err(ScannerError::RootNotDir(_))
    ));
}

#[test]
fn progress_callback_sees_final_totals() {
    let dir = tempdir().unwrap();
    let root = utf8_root(&dir);
    fs::create_dir_all(root.join("A/B")).unwrap();
    fs::write(root.join("A/B/1.jpg"), b"12345").unwrap();
    fs::write(root.join("A/2.jpg"), b"123").unwrap();

    let seen: Arc<Mutex<Vec<ScanStats>>> = Arc::new(Mutex::new(Vec::new()));
    let cb = {
        let seen = seen.clone();
        Box::new(move |s: ScanStats| seen.lock().unwrap().push(s))
    };

    Scanner::index_directory(&root, Some(cb)).unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    let last = seen.last().unwrap();
    assert_eq!(last.files_hashed, 2);
    assert_eq!(last.bytes_hashed, 8);
}

#[cfg(unix)]
#[test]
fn unreadable_file_aborts_the_scan() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempdir().unwrap();
    let root = utf8_root(&dir);
    let locked = root.join("locked.jpg");
    fs::write(&locked, b"secret").unwrap();
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users bypass permission bits; nothing to assert then.
    if fs::File::open(&locked).is_ok() {
        return;
    }

    let res = Scanner::index_directory(&root, None);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o644)).unwrap();
    assert!(matches!(res, Err(ScannerError::Hash(_))));
}
