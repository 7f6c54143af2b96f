use std::fs;

use chrono::{Local, TimeZone};
use graphwright_util::{FsError, copy_if_not_exists, create_dir_if_missing_strict, create_workfolder, create_workfolder_at};

#[test]
fn workfolder_is_saved_path_task_and_timestamp() {
    let root = tempfile::tempdir().expect("tempdir");
    let saved_path = root.path().to_str().expect("utf-8 path");
    let now = Local.with_ymd_and_hms(2024, 9, 17, 8, 5, 3).single().expect("timestamp");

    let work_dir = create_workfolder_at(saved_path, "mooncake", now).expect("workfolder");
    assert_eq!(work_dir, root.path().join("mooncake").join("2024-09-17-08-05-03"));
    assert!(work_dir.is_dir());

    let again = create_workfolder_at(saved_path, "mooncake", now).expect_err("same second");
    assert!(matches!(again, FsError::AlreadyExists { .. }));
}

#[test]
fn empty_task_name_skips_the_middle_segment() {
    let root = tempfile::tempdir().expect("tempdir");
    let work_dir = create_workfolder(root.path().to_str().expect("utf-8 path"), "").expect("workfolder");
    assert_eq!(work_dir.parent(), Some(root.path()));
}

#[test]
fn workfolder_expands_home() {
    let home = tempfile::tempdir().expect("tempdir");
    let work_dir = temp_env::with_var("HOME", Some(home.path()), || create_workfolder("~/runs", "demo")).expect("workfolder");
    assert!(work_dir.starts_with(home.path().join("runs").join("demo")));
}

#[test]
fn strict_create_refuses_existing_directories() {
    let root = tempfile::tempdir().expect("tempdir");
    let nested = root.path().join("a").join("b");
    create_dir_if_missing_strict(&nested).expect("create");
    assert!(nested.is_dir());
    assert!(matches!(
        create_dir_if_missing_strict(&nested),
        Err(FsError::AlreadyExists { .. })
    ));
}

#[test]
fn copy_never_overwrites() {
    let root = tempfile::tempdir().expect("tempdir");
    let source = root.path().join("assembly.json");
    fs::write(&source, "{\"objects\": []}").expect("write");
    let destination = root.path().join("run");
    fs::create_dir(&destination).expect("mkdir");

    let copied = copy_if_not_exists(&source, &destination).expect("copy");
    assert_eq!(copied, destination.join("assembly.json"));
    assert_eq!(fs::read_to_string(&copied).expect("read"), "{\"objects\": []}");

    assert!(matches!(
        copy_if_not_exists(&source, &destination),
        Err(FsError::TargetExists { .. })
    ));
    assert!(matches!(
        copy_if_not_exists(&root.path().join("missing.json"), &destination),
        Err(FsError::SourceMissing { .. })
    ));
    assert!(matches!(
        copy_if_not_exists(&source, &source),
        Err(FsError::NotADirectory { .. })
    ));
}
