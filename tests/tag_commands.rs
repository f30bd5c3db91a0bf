use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;

mod common;

use common::command::{
    get_ancestor_commit_sha, get_head_commit_sha, get_ref_sha, init_repository_dir, kit_stdout,
    repository_with_multiple_commits, run_kit_command,
};

#[rstest]
fn listing_tags_prints_their_names_in_order(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["tag", "v1"])
        .assert()
        .success();
    run_kit_command(init_repository_dir.path(), &["tag", "alpha"])
        .assert()
        .success();

    let listing = kit_stdout(init_repository_dir.path(), &["tag"]);
    assert_eq!(listing, "alpha\nv1\n");
}

#[rstest]
fn tags_point_at_head_by_default(init_repository_dir: TempDir) {
    let head_sha = get_head_commit_sha(init_repository_dir.path()).unwrap();

    run_kit_command(init_repository_dir.path(), &["tag", "v1"])
        .assert()
        .success();

    let tag_sha = get_ref_sha(init_repository_dir.path(), "refs/tags/v1").unwrap();
    assert_eq!(tag_sha, head_sha);
}

#[rstest]
fn tags_can_point_at_an_explicit_target(repository_with_multiple_commits: TempDir) {
    let tip_sha = get_head_commit_sha(repository_with_multiple_commits.path()).unwrap();
    let first_sha =
        get_ancestor_commit_sha(repository_with_multiple_commits.path(), &tip_sha, 3).unwrap();

    run_kit_command(
        repository_with_multiple_commits.path(),
        &["tag", "v0", &first_sha],
    )
    .assert()
    .success();

    let tag_sha = get_ref_sha(repository_with_multiple_commits.path(), "refs/tags/v0").unwrap();
    assert_eq!(tag_sha, first_sha);
}

#[rstest]
fn tag_messages_are_accepted_but_tags_stay_lightweight(init_repository_dir: TempDir) {
    let head_sha = get_head_commit_sha(init_repository_dir.path()).unwrap();

    run_kit_command(
        init_repository_dir.path(),
        &["tag", "-m", "first release", "v1"],
    )
    .assert()
    .success();

    // the ref file holds the commit hash itself, no tag object is written
    let tag_sha = get_ref_sha(init_repository_dir.path(), "refs/tags/v1").unwrap();
    assert_eq!(tag_sha, head_sha);

    let object_type = kit_stdout(init_repository_dir.path(), &["cat-file", "-t", &tag_sha]);
    assert_eq!(object_type, "commit\n");
}

#[rstest]
fn creating_a_tag_twice_fails(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["tag", "v1"])
        .assert()
        .success();

    run_kit_command(init_repository_dir.path(), &["tag", "v1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("tag 'v1' already exists"));
}

#[test]
fn tagging_an_unborn_head_fails() -> Result<(), Box<dyn std::error::Error>> {
    common::redirect_temp_dir();
    let dir = assert_fs::TempDir::new()?;
    run_kit_command(dir.path(), &["init"]).assert().success();

    run_kit_command(dir.path(), &["tag", "v1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to resolve 'HEAD' as a valid ref.",
        ));

    Ok(())
}

#[rstest]
fn invalid_tag_names_are_rejected(init_repository_dir: TempDir) {
    run_kit_command(init_repository_dir.path(), &["tag", "release..1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid ref name: release..1"));
}
