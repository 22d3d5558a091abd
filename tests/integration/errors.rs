//! Failure-mode tests: exit codes and user-facing error messages.

use predicates::prelude::*;

use crate::common::TestProject;

fn project_with_properties(properties: &str) -> TestProject {
    TestProject::with_git(&format!(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = {properties}
        "#
    ))
}

#[test]
fn unknown_generator_reference_fails() {
    let project = project_with_properties(r#"["bogus-thing"]"#);

    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bogus"))
        .stderr(predicate::str::contains("generator"));

    assert!(!project.exists("demo/package_info.py"));
}

#[test]
fn unknown_property_fails() {
    let project = project_with_properties(r#"["project-nonsense"]"#);

    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nonsense"));
}

#[test]
fn reference_without_generator_prefix_fails() {
    let project = project_with_properties(r#"["name"]"#);

    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name"));
}

#[test]
fn missing_manifest_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    let mut cmd = assert_cmd::Command::cargo_bin("pkginfo").unwrap();
    cmd.arg("-C")
        .arg(temp.path())
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pyproject.toml"));
}

#[test]
fn invalid_manifest_fails() {
    let project = TestProject::new("this is not [ valid toml");
    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("pyproject.toml"));
}

#[test]
fn unknown_formatter_fails() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["project-name"]
        formatters = ["magic"]
        "#,
    );

    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("magic"));
}

#[test]
fn missing_formatter_command_fails_before_writing() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["project-name"]
        formatters = ["command:definitely-not-a-binary-xyz"]
        "#,
    );

    project.pkginfo().arg("generate").assert().failure();
    assert!(!project.exists("demo/package_info.py"));
}

#[test]
fn git_property_without_repo_fails() {
    let project = TestProject::new(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["git-commit-id"]
        "#,
    );

    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("repository"));
}

#[test]
fn template_error_fails_with_cleaned_message() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["project-name"]
        template = "{{ no_such_variable }}"
        "#,
    );

    project
        .pkginfo()
        .arg("generate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("__tera_one_off").not());
}

#[test]
fn unsupported_patch_format_fails() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["project-name"]
        patch-build-formats = "egg"
        "#,
    );

    project
        .pkginfo()
        .arg("patch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("egg"));
}

#[test]
fn unknown_config_key_fails() {
    let project = TestProject::new(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        no-such-key = true
        "#,
    );

    project.pkginfo().arg("generate").assert().failure();
}
