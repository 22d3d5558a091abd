//! End-to-end tests for `pkginfo patch`.

use pkginfo_cli::test_utils::{read_sdist, read_wheel, write_sdist, write_wheel};
use predicates::prelude::*;
use std::fs;

use crate::common::TestProject;

const PATCH_PYPROJECT: &str = r#"
[project]
name = "demo"
version = "1.2.3"

[tool.package-info]
patch-build-formats = "all"
properties = ["project-name", "project-version"]
"#;

#[test]
fn patches_wheel_preserving_other_entries() {
    let project = TestProject::with_git(PATCH_PYPROJECT);
    let wheel = project.path().join("dist/demo-1.2.3-py3-none-any.whl");
    fs::create_dir_all(project.path().join("dist")).unwrap();
    write_wheel(
        &wheel,
        &[
            ("demo/__init__.py", ""),
            ("demo-1.2.3.dist-info/METADATA", "Name: demo\n"),
        ],
    );

    project
        .pkginfo()
        .arg("patch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Patched"));

    let entries = read_wheel(&wheel);
    assert_eq!(entries.len(), 3);
    let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert!(names.contains(&"demo/__init__.py"));
    assert!(names.contains(&"demo-1.2.3.dist-info/METADATA"));

    let (_, body) = entries.iter().find(|(n, _)| n == "demo/package_info.py").unwrap();
    assert!(body.contains("project_version: str = \"1.2.3\""));
}

#[test]
fn patches_sdist_under_root_directory() {
    let project = TestProject::with_git(PATCH_PYPROJECT);
    let sdist = project.path().join("dist/demo-1.2.3.tar.gz");
    fs::create_dir_all(project.path().join("dist")).unwrap();
    write_sdist(
        &sdist,
        "demo-1.2.3",
        &[("PKG-INFO", "Name: demo\n"), ("demo/__init__.py", "")],
    );

    project.pkginfo().arg("patch").assert().success();

    let entries = read_sdist(&sdist);
    assert_eq!(entries.len(), 3);
    let (_, body) = entries
        .iter()
        .find(|(n, _)| n == "demo-1.2.3/demo/package_info.py")
        .unwrap();
    assert!(body.contains("project_name: str = \"demo\""));
    assert!(entries.iter().any(|(n, _)| n == "demo-1.2.3/PKG-INFO"));
}

#[test]
fn wheel_only_configuration_ignores_sdist() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "1.2.3"

        [tool.package-info]
        patch-build-formats = ["wheel"]
        properties = ["project-name"]
        "#,
    );
    fs::create_dir_all(project.path().join("dist")).unwrap();
    let wheel = project.path().join("dist/demo-1.2.3-py3-none-any.whl");
    let sdist = project.path().join("dist/demo-1.2.3.tar.gz");
    write_wheel(&wheel, &[("demo/__init__.py", "")]);
    write_sdist(&sdist, "demo-1.2.3", &[("PKG-INFO", "Name: demo\n")]);
    let sdist_before = fs::read(&sdist).unwrap();

    project.pkginfo().arg("patch").assert().success();

    assert_eq!(read_wheel(&wheel).len(), 2);
    // sdist untouched, byte for byte
    assert_eq!(fs::read(&sdist).unwrap(), sdist_before);
}

#[test]
fn replaces_existing_entry_instead_of_duplicating() {
    let project = TestProject::with_git(PATCH_PYPROJECT);
    fs::create_dir_all(project.path().join("dist")).unwrap();
    let wheel = project.path().join("dist/demo-1.2.3-py3-none-any.whl");
    write_wheel(&wheel, &[("demo/package_info.py", "stale = True\n")]);

    project.pkginfo().arg("patch").assert().success();

    let entries = read_wheel(&wheel);
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].1.contains("stale"));
    assert!(entries[0].1.contains("project_name"));
}

#[test]
fn no_configured_formats_is_a_noop() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "1.2.3"

        [tool.package-info]
        properties = ["project-name"]
        "#,
    );

    project
        .pkginfo()
        .arg("patch")
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped"));
}

#[test]
fn missing_dist_dir_fails() {
    let project = TestProject::with_git(PATCH_PYPROJECT);

    project
        .pkginfo()
        .arg("patch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn empty_dist_dir_fails() {
    let project = TestProject::with_git(PATCH_PYPROJECT);
    fs::create_dir_all(project.path().join("dist")).unwrap();

    project
        .pkginfo()
        .arg("patch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn custom_dist_dir_flag() {
    let project = TestProject::with_git(PATCH_PYPROJECT);
    fs::create_dir_all(project.path().join("build/out")).unwrap();
    let wheel = project.path().join("build/out/demo-1.2.3-py3-none-any.whl");
    write_wheel(&wheel, &[("demo/__init__.py", "")]);

    project
        .pkginfo()
        .args(["patch", "--dist-dir", "build/out"])
        .assert()
        .success();

    assert_eq!(read_wheel(&wheel).len(), 2);
}
