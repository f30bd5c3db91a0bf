use assert_fs::TempDir;
use predicates::prelude::{PredicateBooleanExt, predicate};
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{
    get_ancestor_commit_sha, get_head_commit_sha, init_repository_dir, kit_commit,
    repository_with_multiple_commits, run_kit_command,
};
use common::file::{FileSpec, write_file};

fn read_head_file(dir: &std::path::Path) -> String {
    std::fs::read_to_string(dir.join(".kit").join("HEAD"))
        .expect("Failed to read HEAD")
        .trim()
        .to_string()
}

#[rstest]
fn switching_to_a_branch_updates_head(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["branch", "feature"])
        .assert()
        .success();

    run_kit_command(init_repository_dir.path(), &["checkout", "feature"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Switched to branch 'feature'"));

    assert_eq!(
        read_head_file(init_repository_dir.path()),
        "ref: refs/heads/feature"
    );
}

#[rstest]
fn checking_out_the_current_branch_reports_already_on_it(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["checkout", "master"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Already on 'master'"));

    assert_eq!(
        read_head_file(init_repository_dir.path()),
        "ref: refs/heads/master"
    );
}

#[rstest]
fn checking_out_a_branch_restores_committed_contents(init_repository_dir: TempDir) {
    write_file(FileSpec::new(
        init_repository_dir.path().join("1.txt"),
        "dirty".to_string(),
    ));

    run_kit_command(init_repository_dir.path(), &["checkout", "master"])
        .assert()
        .success();

    let content = std::fs::read_to_string(init_repository_dir.path().join("1.txt")).unwrap();
    assert_eq!(content, "one");
}

#[rstest]
fn checking_out_a_commit_detaches_head(repository_with_multiple_commits: TempDir) {
    let tip_sha = get_head_commit_sha(repository_with_multiple_commits.path()).unwrap();
    let first_sha =
        get_ancestor_commit_sha(repository_with_multiple_commits.path(), &tip_sha, 3).unwrap();

    write_file(FileSpec::new(
        repository_with_multiple_commits.path().join("file1.txt"),
        "dirty".to_string(),
    ));

    run_kit_command(repository_with_multiple_commits.path(), &["checkout", &first_sha])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "Note: checking out '{}'.",
            first_sha
        )))
        .stderr(predicate::str::contains("You are in 'detached HEAD' state."))
        .stderr(predicate::str::contains("kit branch <new-branch-name>"))
        .stderr(predicate::str::contains(format!(
            "HEAD is now at {} First commit",
            &first_sha[..7]
        )));

    assert_eq!(
        read_head_file(repository_with_multiple_commits.path()),
        first_sha
    );

    let content =
        std::fs::read_to_string(repository_with_multiple_commits.path().join("file1.txt")).unwrap();
    assert_eq!(content, "content 1");
}

#[rstest]
fn moving_between_detached_positions_reports_the_previous_one(
    repository_with_multiple_commits: TempDir,
) {
    let tip_sha = get_head_commit_sha(repository_with_multiple_commits.path()).unwrap();
    let first_sha =
        get_ancestor_commit_sha(repository_with_multiple_commits.path(), &tip_sha, 3).unwrap();
    let second_sha =
        get_ancestor_commit_sha(repository_with_multiple_commits.path(), &tip_sha, 2).unwrap();

    run_kit_command(repository_with_multiple_commits.path(), &["checkout", &first_sha])
        .assert()
        .success();

    run_kit_command(repository_with_multiple_commits.path(), &["checkout", &second_sha])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "Previous HEAD position was {} First commit",
            &first_sha[..7]
        )))
        .stderr(predicate::str::contains(format!(
            "HEAD is now at {} Second commit",
            &second_sha[..7]
        )))
        // the detachment notice is only shown when leaving a branch
        .stderr(predicate::str::contains("Note: checking out").not());
}

#[rstest]
fn returning_to_a_branch_reattaches_head(repository_with_multiple_commits: TempDir) {
    let tip_sha = get_head_commit_sha(repository_with_multiple_commits.path()).unwrap();
    let first_sha =
        get_ancestor_commit_sha(repository_with_multiple_commits.path(), &tip_sha, 3).unwrap();

    run_kit_command(repository_with_multiple_commits.path(), &["checkout", &first_sha])
        .assert()
        .success();

    run_kit_command(repository_with_multiple_commits.path(), &["checkout", "master"])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "Previous HEAD position was {} First commit",
            &first_sha[..7]
        )))
        .stderr(predicate::str::contains("Switched to branch 'master'"));

    assert_eq!(
        read_head_file(repository_with_multiple_commits.path()),
        "ref: refs/heads/master"
    );
}

#[rstest]
fn checking_out_a_revision_expression_works(repository_with_multiple_commits: TempDir) {
    let tip_sha = get_head_commit_sha(repository_with_multiple_commits.path()).unwrap();
    let second_sha =
        get_ancestor_commit_sha(repository_with_multiple_commits.path(), &tip_sha, 2).unwrap();

    run_kit_command(repository_with_multiple_commits.path(), &["checkout", "master~2"])
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "HEAD is now at {} Second commit",
            &second_sha[..7]
        )));

    assert_eq!(
        read_head_file(repository_with_multiple_commits.path()),
        second_sha
    );
}

#[rstest]
fn checking_out_a_tag_detaches_head(init_repository_dir: TempDir) {
    let head_sha = get_head_commit_sha(init_repository_dir.path()).unwrap();
    run_kit_command(init_repository_dir.path(), &["tag", "v1"])
        .assert()
        .success();

    run_kit_command(init_repository_dir.path(), &["checkout", "v1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Note: checking out 'v1'."))
        .stderr(predicate::str::contains(format!(
            "HEAD is now at {} Initial commit",
            &head_sha[..7]
        )));

    assert_eq!(read_head_file(init_repository_dir.path()), head_sha);
}

#[rstest]
fn checking_out_an_unknown_target_fails(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["checkout", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "pathspec 'nope' did not match any file(s) known to kit",
        ));
}

#[cfg(unix)]
#[rstest]
fn checking_out_restores_the_executable_bit(init_repository_dir: TempDir) {
    use std::os::unix::fs::PermissionsExt;

    let script_path = init_repository_dir.path().join("run.sh");
    write_file(FileSpec::new(script_path.clone(), "#!/bin/sh\n".to_string()));
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

    run_kit_command(init_repository_dir.path(), &["add", "run.sh"])
        .assert()
        .success();
    kit_commit(init_repository_dir.path(), "Add script")
        .assert()
        .success();

    std::fs::remove_file(&script_path).unwrap();

    run_kit_command(init_repository_dir.path(), &["checkout", "master"])
        .assert()
        .success();

    let mode = std::fs::metadata(&script_path).unwrap().permissions().mode();
    assert_ne!(mode & 0o111, 0, "expected an executable mode, got {mode:o}");
}
