use crate::common::file::{FileSpec, write_file};
use crate::common::redirect_temp_dir;
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const AUTHOR_NAME: &str = "fake_user";
pub const AUTHOR_EMAIL: &str = "fake_email@email.com";
pub const AUTHOR_DATE: &str = "2023-01-01 12:00:00 +0000"; // %Y-%m-%d %H:%M:%S %z
pub const AUTHOR_TIMESTAMP: &str = "1672574400";

#[fixture]
pub fn repository_dir() -> TempDir {
    redirect_temp_dir();
    TempDir::new().expect("Failed to create temp dir")
}

/// A repository holding one commit of three files: `1.txt`, `a/2.txt` and
/// `a/b/3.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    let file1 = FileSpec::new(repository_dir.path().join("1.txt"), "one".to_string());
    write_file(file1);

    let file2 = FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two".to_string(),
    );
    write_file(file2);

    let file3 = FileSpec::new(
        repository_dir.path().join("a").join("b").join("3.txt"),
        "three".to_string(),
    );
    write_file(file3);

    run_kit_command(repository_dir.path(), &["add", "."])
        .assert()
        .success();

    kit_commit(repository_dir.path(), "Initial commit")
        .assert()
        .success();

    repository_dir
}

#[fixture]
pub fn repository_with_multiple_commits(repository_dir: TempDir) -> TempDir {
    run_kit_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    for (index, message) in ["First commit", "Second commit", "Third commit", "Fourth commit"]
        .iter()
        .enumerate()
    {
        let file = FileSpec::new(
            repository_dir.path().join(format!("file{}.txt", index + 1)),
            format!("content {}", index + 1),
        );
        write_file(file);

        run_kit_command(repository_dir.path(), &["add", "."])
            .assert()
            .success();
        kit_commit(repository_dir.path(), message).assert().success();
    }

    repository_dir
}

pub fn run_kit_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("kit").expect("Failed to find kit binary");
    cmd.envs(vec![("NO_PAGER", "1")]);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn kit_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_kit_command(dir, &["commit", "-m", message]);
    cmd.envs(vec![
        ("KIT_AUTHOR_NAME", AUTHOR_NAME),
        ("KIT_AUTHOR_EMAIL", AUTHOR_EMAIL),
        ("KIT_AUTHOR_DATE", AUTHOR_DATE),
    ]);
    cmd
}

/// Run a kit command and return whatever it printed to stdout
pub fn kit_stdout(dir: &Path, args: &[&str]) -> String {
    let output = run_kit_command(dir, args)
        .output()
        .expect("Failed to run kit command");
    assert!(
        output.status.success(),
        "kit {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("kit output was not UTF-8")
}

/// Get the current HEAD commit SHA, following a symbolic ref if needed
pub fn get_head_commit_sha(dir: &Path) -> Result<String, Box<dyn std::error::Error>> {
    let head_path = dir.join(".kit").join("HEAD");
    let head_content = std::fs::read_to_string(head_path)?;

    // HEAD contains either a commit SHA or a ref like "ref: refs/heads/master"
    if let Some(ref_path) = head_content.strip_prefix("ref: ") {
        let ref_file = dir.join(".kit").join(ref_path.trim());
        let commit_sha = std::fs::read_to_string(ref_file)?;
        Ok(commit_sha.trim().to_string())
    } else {
        Ok(head_content.trim().to_string())
    }
}

/// Read the SHA a ref file points at, e.g. `refs/heads/feature`
pub fn get_ref_sha(dir: &Path, ref_path: &str) -> Result<String, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(dir.join(".kit").join(ref_path))?;
    Ok(content.trim().to_string())
}

/// Get the parent commit SHA of a given commit by using kit cat-file
pub fn get_parent_commit_sha(
    dir: &Path,
    commit_sha: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let raw_commit = kit_stdout(dir, &["cat-file", "-p", commit_sha]);

    for line in raw_commit.lines() {
        if let Some(oid) = line.strip_prefix("parent ") {
            return Ok(oid.to_string());
        }
    }

    Err("No parent found".into())
}

/// Get the Nth ancestor of a commit
pub fn get_ancestor_commit_sha(
    dir: &Path,
    commit_sha: &str,
    generations: usize,
) -> Result<String, Box<dyn std::error::Error>> {
    let mut current = commit_sha.to_string();
    for _ in 0..generations {
        current = get_parent_commit_sha(dir, &current)?;
    }
    Ok(current)
}

/// Get the tree SHA a commit snapshots by using kit cat-file
pub fn get_commit_tree_sha(
    dir: &Path,
    commit_sha: &str,
) -> Result<String, Box<dyn std::error::Error>> {
    let raw_commit = kit_stdout(dir, &["cat-file", "-p", commit_sha]);

    for line in raw_commit.lines() {
        if let Some(oid) = line.strip_prefix("tree ") {
            return Ok(oid.to_string());
        }
    }

    Err("No tree found".into())
}
