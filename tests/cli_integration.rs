use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::process::Stdio;
use std::time::Duration;

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn schema_describes_config() {
    let mut cmd = Command::cargo_bin("javlabot").unwrap();
    cmd.arg("schema");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("critical_mass"))
        .stdout(predicate::str::contains("triggers"));
}

#[test]
fn check_prints_effective_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("javlabot.toml");
    std::fs::write(&path, "host = \"irc.example.net\"\ntriggers = [\"Jävla\"]\n").unwrap();

    let mut cmd = Command::cargo_bin("javlabot").unwrap();
    cmd.arg("check")
        .arg("--config")
        .arg(&path)
        .arg("--critical-mass")
        .arg("4");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("irc.example.net:6667"))
        .stdout(predicate::str::contains("critical mass: 4"))
        .stdout(predicate::str::contains("triggers:      javla"));
}

#[test]
fn check_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("javlabot").unwrap();
    cmd.current_dir(dir.path())
        .args(["check", "--format", "json", "--channels", "#a,#b"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["channels"], serde_json::json!(["#a", "#b"]));
}

#[test]
fn invalid_config_exits_with_config_code() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("javlabot.toml");
    std::fs::write(&path, "channels = [\"no-hash\"]\n").unwrap();

    let mut cmd = Command::cargo_bin("javlabot").unwrap();
    cmd.arg("check").arg("--config").arg(&path);
    cmd.assert()
        .code(2)
        .stderr(predicate::str::contains("invalid channel"));
}

#[test]
fn connect_failure_exits_with_connect_code() {
    // Bind then drop to get a port nothing listens on.
    let port = TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();

    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("javlabot").unwrap();
    cmd.current_dir(dir.path())
        .args(["run", "--host", "127.0.0.1", "--port", &port.to_string()]);
    cmd.assert()
        .code(3)
        .stderr(predicate::str::contains("could not connect"));
}

fn read_line(reader: &mut BufReader<TcpStream>) -> String {
    let mut line = String::new();
    reader.read_line(&mut line).unwrap();
    line.trim_end().to_string()
}

#[test]
fn talks_to_a_server_and_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let dir = tempfile::tempdir().unwrap();

    let mut child = std::process::Command::new(assert_cmd::cargo::cargo_bin("javlabot"))
        .current_dir(dir.path())
        .args(["run", "--host", "127.0.0.1", "--port", &port.to_string()])
        .args(["--critical-mass", "1"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    let (conn, _) = listener.accept().unwrap();
    conn.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    let mut writer = conn.try_clone().unwrap();
    let mut reader = BufReader::new(conn);

    assert_eq!(read_line(&mut reader), "NICK javlabot");
    assert_eq!(read_line(&mut reader), "USER javlabot 0 * :JävlaBot");

    writer.write_all(b"PING :abc\r\n").unwrap();
    assert_eq!(read_line(&mut reader), "PONG abc");

    writer.write_all(b":irc.test 001 javlabot :Welcome\r\n").unwrap();
    assert_eq!(read_line(&mut reader), "JOIN #javla");

    writer
        .write_all(b":alice!~a@host PRIVMSG #javla :one\r\n:alice!~a@host PRIV")
        .unwrap();
    writer.write_all(b"MSG #javla :two\r\n").unwrap();
    assert_eq!(read_line(&mut reader), "PRIVMSG #javla :jävla alice");

    writer.write_all(b"ERROR :Closing Link: javlabot (bye)\r\n").unwrap();
    let (conn, _) = listener.accept().unwrap();
    conn.set_read_timeout(Some(Duration::from_secs(10))).unwrap();
    let mut reader = BufReader::new(conn);
    assert_eq!(read_line(&mut reader), "NICK javlabot");

    // With nothing left to reconnect to, the bot gives up.
    drop(listener);
    drop(reader);
    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(3));
}
