//! End-to-end behavior of entries over the local filesystem driver.

use anyfs_drivers::*;
use std::path::Path;
use tempfile::TempDir;

fn driver() -> (TempDir, LocalDriver) {
    let temp = tempfile::tempdir().unwrap();
    let driver = LocalDriver::new(temp.path()).unwrap();
    (temp, driver)
}

// =============================================================================
// Files
// =============================================================================

#[test]
fn write_read_and_list() {
    let (_temp, driver) = driver();
    driver.dir("/").touch().unwrap();

    let mut file = driver.file("/x/y.txt").unwrap();
    file.write(b"hello").unwrap();

    assert_eq!(driver.file("/x/y.txt").unwrap().read().unwrap(), b"hello");
    assert!(driver.dir("/x").entries().unwrap().contains(&"y.txt".to_string()));
}

#[test]
fn write_lands_under_root_on_host() {
    let (temp, driver) = driver();
    driver.file("/a/b.txt").unwrap().write(b"data").unwrap();

    let host = temp.path().join("a").join("b.txt");
    assert_eq!(std::fs::read(host).unwrap(), b"data");
}

#[test]
fn escaping_paths_are_clamped_to_root() {
    let (temp, driver) = driver();
    let mut file = driver.file("../../outside.txt").unwrap();
    assert_eq!(file.path(), "/outside.txt");

    file.write(b"inside").unwrap();
    assert!(temp.path().join("outside.txt").is_file());
}

#[test]
fn read_missing_file_is_not_found() {
    let (_temp, driver) = driver();
    let err = driver.file("/nope.txt").unwrap().read().unwrap_err();
    assert!(matches!(err, FsError::NotFound { ref path } if path == "/nope.txt"));
}

#[test]
fn read_directory_is_not_a_file() {
    let (_temp, driver) = driver();
    driver.mkpath("/folder").unwrap();
    let err = driver.file("/folder").unwrap().read().unwrap_err();
    assert!(matches!(err, FsError::NotAFile { ref path } if path == "/folder"));
}

#[test]
fn read_to_string_rejects_invalid_utf8() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/bin.dat").unwrap();
    file.write(&[0xff, 0xfe, 0x00]).unwrap();
    assert!(matches!(
        file.read_to_string(),
        Err(FsError::InvalidData { .. })
    ));
}

#[test]
fn append_creates_then_extends() {
    let (_temp, driver) = driver();
    let mut log = driver.file("/logs/app.log").unwrap();
    log.append(b"one\n").unwrap();
    log.append(b"two\n").unwrap();
    assert_eq!(log.read_to_string().unwrap(), "one\ntwo\n");
}

#[test]
fn touch_keeps_existing_contents() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/keep.txt").unwrap();
    file.write(b"content").unwrap();
    file.touch().unwrap();
    assert_eq!(file.read().unwrap(), b"content");

    let mut fresh = driver.file("/fresh.txt").unwrap();
    fresh.touch().unwrap();
    assert!(fresh.exists().unwrap());
    assert_eq!(fresh.read().unwrap(), b"");
}

#[test]
fn local_files_are_always_localized() {
    let (temp, driver) = driver();
    let mut file = driver.file("/direct.txt").unwrap();
    assert!(file.is_localized());
    file.localize(true).unwrap();
    assert_eq!(
        file.local_path().unwrap(),
        temp.path().canonicalize().unwrap().join("direct.txt")
    );
}

#[test]
fn metadata_reports_size_and_time() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/sized.bin").unwrap();
    file.write(&[0u8; 42]).unwrap();

    let meta = file.metadata();
    assert!(meta.is_file());
    assert_eq!(meta.size, Some(42));
    assert!(meta.modified.is_some());

    let absent = driver.file("/absent.bin").unwrap().metadata();
    assert_eq!(absent.size, None);
    assert_eq!(absent.modified, None);
}

// =============================================================================
// Directories
// =============================================================================

#[test]
fn mkpath_creates_every_level() {
    let (_temp, driver) = driver();
    driver.mkpath("/a/b/c").unwrap();
    assert!(driver.dir("/a/b/c").exists().unwrap());
    assert!(driver.is_dir("/a/b").unwrap());

    // idempotent
    driver.mkpath("/a/b/c").unwrap();
}

#[test]
fn mkpath_through_a_file_fails() {
    let (_temp, driver) = driver();
    driver.file("/blocker").unwrap().write(b"x").unwrap();
    let err = driver.mkpath("/blocker/sub").unwrap_err();
    assert!(matches!(err, FsError::NotADirectory { .. }));
}

#[test]
fn obj_entries_are_typed_and_sorted() {
    let (_temp, driver) = driver();
    let root = driver.dir("/");
    root.dir("zeta").touch().unwrap();
    root.file("alpha.txt").unwrap().write(b"a").unwrap();
    root.file("beta.txt").unwrap().write(b"b").unwrap();

    assert_eq!(root.entries().unwrap(), ["alpha.txt", "beta.txt", "zeta"]);

    let children = root.obj_entries().unwrap();
    let kinds: Vec<(&str, EntryType)> = children.iter().map(|c| (c.name(), c.kind())).collect();
    assert_eq!(
        kinds,
        [
            ("alpha.txt", EntryType::File),
            ("beta.txt", EntryType::File),
            ("zeta", EntryType::Directory),
        ]
    );
}

#[test]
fn child_lookup() {
    let (_temp, driver) = driver();
    let root = driver.dir("/");
    root.file("doc.txt").unwrap().write(b"d").unwrap();

    let child = root.child("doc.txt").unwrap().unwrap();
    assert_eq!(child.path(), "/doc.txt");
    assert!(child.into_file().is_some());
    assert!(root.child("missing").unwrap().is_none());
}

#[test]
fn listing_missing_directory_is_empty() {
    let (_temp, driver) = driver();
    assert!(driver.list_children("/ghost").unwrap().is_empty());
    assert!(driver.dir("/ghost").entries().unwrap().is_empty());
}

#[test]
fn delete_semantics() {
    let (_temp, driver) = driver();
    assert!(!driver.delete("/does/not/exist").unwrap());

    driver.file("/full/item.txt").unwrap().write(b"x").unwrap();
    let mut full = driver.dir("/full");
    assert!(!full.delete().unwrap(), "non-empty directory is refused");
    assert!(full.delete_tree().unwrap());
    assert!(!full.exists().unwrap());

    assert!(!driver.delete("/").unwrap(), "root is protected");
}

#[test]
fn exists_distinguishes_kinds() {
    let (_temp, driver) = driver();
    driver.file("/f").unwrap().write(b"").unwrap();
    driver.mkpath("/d").unwrap();

    assert!(driver.is_file("/f").unwrap());
    assert!(!driver.is_dir("/f").unwrap());
    assert!(driver.is_dir("/d").unwrap());
    assert!(!driver.is_file("/d").unwrap());
    assert!(!driver.exists("/nothing").unwrap());

    // a File handle on a directory does not exist as a file
    assert!(!driver.file("/d").unwrap().exists().unwrap());
}

// =============================================================================
// Rename, move and copy
// =============================================================================

#[test]
fn rename_moves_content() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/docs/old.txt").unwrap();
    file.write(b"kept").unwrap();

    assert_eq!(file.rename("new.txt").unwrap(), "/docs/new.txt");
    assert_eq!(file.path(), "/docs/new.txt");
    assert!(!driver.exists("/docs/old.txt").unwrap());
    assert_eq!(driver.file("/docs/new.txt").unwrap().read().unwrap(), b"kept");
}

#[test]
fn rename_rejects_paths() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/a.txt").unwrap();
    file.write(b"a").unwrap();
    for bad in ["", "sub/b.txt", "..", "."] {
        assert!(
            matches!(file.rename(bad), Err(FsError::InvalidArgument { .. })),
            "{bad:?} accepted"
        );
    }
}

#[test]
fn rename_missing_is_not_found() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/ghost.txt").unwrap();
    assert!(matches!(file.rename("other.txt"), Err(FsError::NotFound { .. })));
    assert_eq!(file.path(), "/ghost.txt");
}

#[test]
fn root_cannot_move() {
    let (_temp, driver) = driver();
    let mut root = driver.dir("/");
    assert!(matches!(root.move_to("/elsewhere"), Err(FsError::InvalidArgument { .. })));
}

#[test]
fn move_to_relative_and_absolute() {
    let (_temp, driver) = driver();
    let mut log = driver.file("/logs/app.log").unwrap();
    log.write(b"line").unwrap();

    assert_eq!(log.move_to("archive").unwrap(), "/logs/archive/app.log");
    assert!(driver.is_file("/logs/archive/app.log").unwrap());

    assert_eq!(driver.move_entry(&mut log, "/cold/2024").unwrap(), "/cold/2024/app.log");
    assert_eq!(log.read().unwrap(), b"line");
    assert!(!driver.exists("/logs/archive/app.log").unwrap());
}

#[test]
fn move_directory_with_contents() {
    let (_temp, driver) = driver();
    driver.file("/proj/src/main.rs").unwrap().write(b"fn main() {}").unwrap();

    let mut src = driver.dir("/proj/src");
    src.move_to("/backup").unwrap();
    assert_eq!(src.path(), "/backup/src");
    assert_eq!(src.entries().unwrap(), ["main.rs"]);
}

#[test]
fn copy_to_every_target_kind() {
    let (temp, driver) = driver();
    let mut source = driver.file("/in/report.csv").unwrap();
    source.write(b"a,b\n1,2\n").unwrap();

    // host path outside the driver
    let outside = tempfile::tempdir().unwrap();
    let host = outside.path().join("report.csv");
    source.copy_to(host.as_path()).unwrap();
    assert_eq!(std::fs::read(&host).unwrap(), b"a,b\n1,2\n");

    // another file entry
    let mut twin = driver.file("/out/twin.csv").unwrap();
    source.copy_to(&mut twin).unwrap();
    assert_eq!(twin.read().unwrap(), b"a,b\n1,2\n");

    // a directory keeps the source name
    let archive = driver.dir("/archive");
    source.copy_to(&archive).unwrap();
    assert!(temp.path().join("archive").join("report.csv").is_file());
}

#[test]
fn copy_from_every_source_kind() {
    let (_temp, driver) = driver();

    let outside = tempfile::tempdir().unwrap();
    let host = outside.path().join("seed.txt");
    std::fs::write(&host, b"seed").unwrap();

    let mut target = driver.file("/seed.txt").unwrap();
    target.copy_from(host.as_path()).unwrap();
    assert_eq!(target.read().unwrap(), b"seed");

    let mut other = driver.file("/other.txt").unwrap();
    other.write(b"other").unwrap();
    target.copy_from(&mut other).unwrap();
    assert_eq!(target.read().unwrap(), b"other");

    driver.file("/shelf/seed.txt").unwrap().write(b"from shelf").unwrap();
    target.copy_from(&driver.dir("/shelf")).unwrap();
    assert_eq!(target.read().unwrap(), b"from shelf");
}

#[test]
fn copy_from_missing_host_path_is_not_found() {
    let (_temp, driver) = driver();
    let mut target = driver.file("/t.txt").unwrap();
    let err = target.copy_from(Path::new("/definitely/not/here")).unwrap_err();
    assert!(matches!(err, FsError::NotFound { .. }));
}

#[test]
fn copy_onto_itself_is_a_no_op() {
    let (_temp, driver) = driver();
    let mut file = driver.file("/same.txt").unwrap();
    file.write(b"same").unwrap();
    let mut again = driver.file("/same.txt").unwrap();
    file.copy_to(&mut again).unwrap();
    assert_eq!(again.read().unwrap(), b"same");
}

// =============================================================================
// Dynamic dispatch
// =============================================================================

#[test]
fn boxed_driver_offers_the_same_entries() {
    let temp = tempfile::tempdir().unwrap();
    let driver: Box<dyn Driver> = Box::new(LocalDriver::new(temp.path()).unwrap());

    driver.file("/boxed.txt").unwrap().write(b"dyn").unwrap();
    assert_eq!(driver.dir("/").entries().unwrap(), ["boxed.txt"]);
    assert_eq!(driver.info().protocol, "NFS");
    assert!(driver.info().local);
}
