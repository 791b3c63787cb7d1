//! Integration tests that spawn the real `gamecache` binary against a
//! throwaway data directory. None of them touch the network.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn gamecache(datadir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gamecache"))
        .arg("--datadir")
        .arg(datadir)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("GAMECACHE_LOG")
        .output()
        .expect("failed to run gamecache")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

#[test]
fn settings_round_trip() {
    let tmp_dir = TempDir::new().unwrap();

    let output = gamecache(tmp_dir.path(), &["settings", "set", "pga_cache_path", "/mnt/pga"]);
    assert!(output.status.success(), "{}", stdout(&output));

    let output = gamecache(tmp_dir.path(), &["settings", "get", "pga_cache_path"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("/mnt/pga"));

    let output = gamecache(tmp_dir.path(), &["settings", "get", "unknown_key"]);
    assert!(!output.status.success());
}

#[test]
fn install_from_local_files_with_checksum() {
    let tmp_dir = TempDir::new().unwrap();
    let source = tmp_dir.path().join("media").join("setup.exe");
    fs::create_dir_all(source.parent().unwrap()).unwrap();
    fs::write(&source, b"hello\n").unwrap();

    let script = tmp_dir.path().join("quake.toml");
    fs::write(
        &script,
        format!(
            r#"
game_slug = "quake"
files = [{{ setup = {{ url = "{}", filename = "setup.exe", checksum = "md5:b1946ac92492d2347c6235b4d2611184" }} }}]
"#,
            source.display()
        ),
    )
    .unwrap();

    let output = gamecache(tmp_dir.path(), &["install", script.to_str().unwrap()]);
    assert!(output.status.success(), "{}", stdout(&output));
    assert!(stdout(&output).contains("[setup]"));

    let cached = tmp_dir
        .path()
        .join("cache")
        .join("installer")
        .join("quake")
        .join("setup.exe");
    assert_eq!(fs::read(cached).unwrap(), b"hello\n");
}

#[test]
fn install_rejects_bad_checksum() {
    let tmp_dir = TempDir::new().unwrap();
    let source = tmp_dir.path().join("setup.exe");
    fs::write(&source, b"tampered").unwrap();

    let script = tmp_dir.path().join("quake.json");
    fs::write(
        &script,
        format!(
            r#"{{"game_slug": "quake", "files": [{{"setup": {{"url": "{}", "filename": "setup.exe", "checksum": "md5:abcdef"}}}}]}}"#,
            source.display()
        ),
    )
    .unwrap();

    let output = gamecache(tmp_dir.path(), &["install", script.to_str().unwrap()]);
    assert!(!output.status.success());
    let shown = stdout(&output);
    assert!(shown.contains("md5:abcdef"), "{shown}");
    assert!(shown.contains("corrupted"), "{shown}");
}

#[test]
fn invalid_game_configuration_fails() {
    let tmp_dir = TempDir::new().unwrap();

    let output = gamecache(
        tmp_dir.path(),
        &["game", "--name", "Portal", "--runner", "steam"],
    );
    assert!(!output.status.success());

    let output = gamecache(
        tmp_dir.path(),
        &["game", "--name", "Quake III: Arena", "--runner", "linux"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("quake-iii-arena"));
}
