//! End-to-end tests for `pkginfo generate`.

use predicates::prelude::*;

use crate::common::{BASIC_PYPROJECT, TestProject};

#[test]
fn generates_configured_properties_in_order() {
    let project = TestProject::with_git(BASIC_PYPROJECT);

    project.pkginfo().arg("generate").assert().success().stdout(
        predicate::str::contains("Generated git_project_with_config/package_info.py"),
    );

    let content = project.read("git_project_with_config/package_info.py");
    assert!(content.contains("class PackageInfo:"));
    assert!(content.contains("project_name: str = \"git-project-with-config\""));
    assert!(content.contains("project_version: str = \"1.2.3\""));

    let name_pos = content.find("project_name").unwrap();
    let version_pos = content.find("project_version").unwrap();
    assert!(name_pos < version_pos);
}

#[test]
fn stdout_flag_prints_without_writing() {
    let project = TestProject::with_git(BASIC_PYPROJECT);

    project
        .pkginfo()
        .args(["generate", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project_version: str = \"1.2.3\""));

    assert!(!project.exists("git_project_with_config/package_info.py"));
}

#[test]
fn default_property_set_includes_git_state() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"
        "#,
    );

    project.pkginfo().arg("generate").assert().success();

    let content = project.read("demo/package_info.py");
    assert!(content.contains("import datetime"));
    assert!(content.contains("project_name: str = \"demo\""));
    assert!(content.contains("git_commit_author_name: str = \"Test User\""));
    assert!(content.contains("git_branch_name: str | None = \"main\""));
    assert!(content.contains("git_branch_path: str | None = \"refs/heads/main\""));
    assert!(content.contains("git_commit_timestamp: datetime.datetime = "));
    // manifest is committed, so the tree is clean
    assert!(content.contains("git_is_dirty: bool = False"));
    assert!(content.contains("git_has_untracked_changes: bool = False"));
}

#[test]
fn structured_override_renames_variable() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = [
            "project-name",
            { property-name = "git-is-dirty", variable-name = "clean_me" },
        ]
        "#,
    );

    project.pkginfo().arg("generate").assert().success();

    let content = project.read("demo/package_info.py");
    assert!(content.contains("clean_me: bool = False"));
    assert!(!content.contains("git_is_dirty"));
}

#[test]
fn explicit_generator_in_override() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = [
            { property-generator = "project", property-name = "version", variable-name = "release" },
        ]
        "#,
    );

    project.pkginfo().arg("generate").assert().success();
    let content = project.read("demo/package_info.py");
    assert!(content.contains("release: str = \"0.1.0\""));
}

#[test]
fn custom_output_path() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        package-info-file-path = "src/demo/_build_info.py"
        properties = ["project-version"]
        "#,
    );

    project.pkginfo().arg("generate").assert().success();
    assert!(project.exists("src/demo/_build_info.py"));
}

#[test]
fn custom_template() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["project-version"]
        template = "VERSION = {{ properties.0.value | as_python }}\n"
        "#,
    );

    project
        .pkginfo()
        .args(["generate", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::eq("VERSION = \"0.1.0\"\n"));
}

#[test]
fn poetry_metadata_is_used_as_fallback() {
    let project = TestProject::with_git(
        r#"
        [tool.poetry]
        name = "poetry-demo"
        version = "2.0.0"
        description = "Poetry style"
        authors = ["Jane Doe <jane@example.com>"]

        [tool.package-info]
        properties = ["project-name", "project-version", "project-authors"]
        "#,
    );

    project.pkginfo().arg("generate").assert().success();

    let content = project.read("poetry_demo/package_info.py");
    assert!(content.contains("project_name: str = \"poetry-demo\""));
    assert!(content.contains("project_version: str = \"2.0.0\""));
    assert!(content.contains("project_authors: list[str] = [\"Jane Doe <jane@example.com>\"]"));
}

#[test]
fn output_is_deterministic_except_generation_stamp() {
    let project = TestProject::with_git(BASIC_PYPROJECT);

    let first = project.pkginfo().args(["generate", "--stdout"]).output().unwrap();
    let second = project.pkginfo().args(["generate", "--stdout"]).output().unwrap();

    let strip_stamp = |bytes: &[u8]| -> Vec<String> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .filter(|line| !line.starts_with("\"\"\"Auto-generated"))
            .map(str::to_string)
            .collect()
    };
    assert_eq!(strip_stamp(&first.stdout), strip_stamp(&second.stdout));
}

#[cfg(unix)]
#[test]
fn formatter_chain_runs_on_output() {
    let project = TestProject::with_git(
        r#"
        [project]
        name = "demo"
        version = "0.1.0"

        [tool.package-info]
        properties = ["project-name"]
        formatters = ["noop", "command:tr a-z A-Z"]
        template = "name = {{ properties.0.value | as_python }}\n"
        "#,
    );

    project
        .pkginfo()
        .args(["generate", "--stdout"])
        .assert()
        .success()
        .stdout(predicate::eq("NAME = \"DEMO\"\n"));
}

#[test]
fn generate_without_git_repo_skips_git_generator() {
    // git generator is configured but lazy; project-only properties work
    // without a repository
    let project = TestProject::new(BASIC_PYPROJECT);
    project.pkginfo().arg("generate").assert().success();
    assert!(project.exists("git_project_with_config/package_info.py"));
}
