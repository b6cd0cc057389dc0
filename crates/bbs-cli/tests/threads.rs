//! Integration tests for `bbs threads`, `bbs show`, and the board overview commands.


use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

use fixtures::{bbs_home, position};

#[test]
fn test_threads_lists_pinned_first() {
    let home = bbs_home();

    let output = cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("threads")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();

    let pinned = position(&stdout, "[重要] サイトメンテナンスのお知らせ");
    let regular = position(&stdout, "Laravel 11の新機能まとめ");
    assert!(pinned < regular);
}

#[test]
fn test_threads_filtered_by_category() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .args(["threads", "--category", "news"])
        .assert()
        .success()
        .stdout(predicate::str::contains("サイトメンテナンス"))
        .stdout(predicate::str::contains("Laravel 11の新機能まとめ").not());
}

#[test]
fn test_threads_unknown_category_fails() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .args(["threads", "--category", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown category 'nope'"))
        .stderr(predicate::str::contains("tech"));
}

#[test]
fn test_show_thread_with_posts() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .args(["show", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Laravelの学習方法について教えてください"))
        .stdout(predicate::str::contains("#1 佐藤花子"));
}

#[test]
fn test_show_missing_thread() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .args(["show", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("スレッドが見つかりません"));
}

#[test]
fn test_categories_and_stats() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("質問 (question)"));

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("総スレッド数"));
}

#[test]
fn test_user_profile() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .args(["user", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("鈴木美咲"))
        .stdout(predicate::str::contains("鈴木美咲さんのスレッド"));

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .args(["user", "42"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ユーザーが見つかりません"));
}

#[test]
fn test_bad_dataset_fails() {
    let home = bbs_home();
    let data = home.path().join("board.json");
    fs::write(&data, "{ not json").unwrap();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("--data")
        .arg(&data)
        .arg("threads")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load dataset"));
}
