use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn phpini() -> Command {
    Command::cargo_bin("phpini").expect("binary builds")
}

#[test]
fn prints_document_unchanged_without_edits() {
    let fixture = fixture_path("example.php.ini");
    let source = fs::read_to_string(&fixture).expect("fixture reads");

    phpini()
        .arg(&fixture)
        .assert()
        .success()
        .stdout(source);
}

#[test]
fn lists_extensions_after_enabling() {
    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--enable", "mbstring", "--enable", "exif", "--enable", "unknown"])
        .arg("--list-extensions")
        .assert()
        .success()
        .stdout("mbstring\nexif\nunknown\n");
}

#[test]
fn gets_values_with_default() {
    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--set", "memory_limit=127M", "--get", "memory_limit"])
        .assert()
        .success()
        .stdout("127M\n");

    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--get", "date.timezone", "--default", "UTC"])
        .assert()
        .success()
        .stdout("UTC\n");
}

#[test]
fn reports_changes_as_json() {
    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--set", "memory_limit=127M", "--enable", "unknown"])
        .args(["--changes", "--format", "json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("\"kind\": \"modified\"")
                .and(predicate::str::contains("\"after\": \"memory_limit = 127M\""))
                .and(predicate::str::contains("\"kind\": \"added\"")),
        );
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let out = dir.path().join("example.php.out");

    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--set", "memory_limit=127M", "--enable", "mbstring"])
        .arg("--output")
        .arg(&out)
        .assert()
        .success()
        .stdout("");

    let saved = fs::read_to_string(&out).expect("output reads");
    assert!(saved.contains("\nmemory_limit = 127M\n"));
    assert!(saved.contains("\nextension=mbstring\n"));
}

#[test]
fn edits_in_place() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("php.ini");
    fs::write(&path, "extension=curl\n").expect("write");

    phpini()
        .arg(&path)
        .args(["--disable", "curl", "--in-place"])
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&path).expect("read"), ";extension=curl\n");
}

#[test]
fn missing_file_fails() {
    phpini()
        .arg("/definitely/not/here/php.ini")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load"));
}

#[test]
fn rejects_malformed_set() {
    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--set", "memory_limit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn refuses_values_spanning_lines() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("php.ini");
    fs::write(&path, "a = 1\n").expect("write");

    phpini()
        .arg(&path)
        .args(["--set", "a=1\nextension=evil", "--in-place"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot apply --set"));

    assert_eq!(fs::read_to_string(&path).expect("read"), "a = 1\n");
}

#[test]
fn refuses_empty_extension_name() {
    phpini()
        .arg(fixture_path("example.php.ini"))
        .args(["--enable", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot enable extension"));
}

#[cfg(not(windows))]
#[test]
fn reads_user_config_file() {
    let config_home = tempfile::tempdir().expect("temp dir");
    let config_dir = config_home.path().join("phpini");
    fs::create_dir_all(&config_dir).expect("mkdir");
    fs::write(
        config_dir.join("config.toml"),
        "[format]\nsetting_separator = \"=\"\n",
    )
    .expect("write config");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("php.ini");
    fs::write(&path, "engine = On\n").expect("write");

    phpini()
        .env("XDG_CONFIG_HOME", config_home.path())
        .arg(&path)
        .args(["--set", "precision=14"])
        .assert()
        .success()
        .stdout("engine = On\nprecision=14\n");
}

#[test]
fn prints_non_utf8_bytes_unchanged() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("php.ini");
    let source: &[u8] = b"; caf\xe9\nmemory_limit = 1024M\n";
    fs::write(&path, source).expect("write");

    phpini().arg(&path).assert().success().stdout(source);
}
