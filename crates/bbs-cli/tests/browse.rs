//! Integration tests for the interactive session.


use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

use fixtures::bbs_home;

#[test]
fn test_browse_is_default_and_exits_on_eof() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::str::contains("Laravel BBS | ゲスト"))
        .stdout(predicate::str::contains("最新のスレッド"));
}

#[test]
fn test_browse_search_then_open() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("browse")
        .write_stdin("search Eloquent\nopen 3\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("検索結果（1件）"))
        .stdout(predicate::str::contains("← スレッド一覧に戻る"));
}

#[test]
fn test_browse_login_and_reply() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("browse")
        .write_stdin("login yamada@example.com secret\nopen 1\nreply-to 2 同感です\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Laravel BBS | 山田太郎"))
        .stdout(predicate::str::contains("返信を投稿しました"));
}

#[test]
fn test_browse_delete_of_foreign_post_is_rejected() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("browse")
        .write_stdin("login yamada@example.com secret\nopen 1\ndelete 1\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("! post 1 belongs to another user"));
}

#[test]
fn test_browse_reports_bad_commands_and_continues() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("browse")
        .write_stdin("frobnicate\nreply hello\nhelp\nquit\n")
        .assert()
        .success()
        .stderr(predicate::str::contains("Unknown command 'frobnicate'"))
        .stderr(predicate::str::contains("Open a thread first"))
        .stdout(predicate::str::contains("reply-to"));
}

#[test]
fn test_browse_create_thread_requires_login() {
    let home = bbs_home();

    cargo_bin_cmd!("bbs")
        .env("BBS_HOME", home.path())
        .arg("browse")
        .write_stdin("new\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("アカウントにログイン"));
}
