//! End to end checks of the `savedump` binary against saves written to a
//! temporary directory

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Scratch directory that is removed when dropped
struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let dir =
            std::env::temp_dir().join(format!("savedump-cli-{}-{}", std::process::id(), name));
        std::fs::create_dir_all(&dir).unwrap();
        TempDir(dir)
    }

    fn join(&self, file: &str) -> PathBuf {
        self.0.join(file)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

/// World coordinates, unknown block, position and direction
fn preamble(position_be: bool) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 1..=5i32 {
        data.extend_from_slice(&i.to_be_bytes());
    }
    data.extend_from_slice(&[0; 5]);
    for f in [0.5f32, 1.5, 2.5, 3.5, 4.5] {
        if position_be {
            data.extend_from_slice(&f.to_be_bytes());
        } else {
            data.extend_from_slice(&f.to_le_bytes());
        }
    }
    data.extend_from_slice(&7i32.to_be_bytes());
    data
}

fn push_string(data: &mut Vec<u8>, s: &[u8]) {
    data.extend_from_slice(&(s.len() as u16).to_be_bytes());
    data.extend_from_slice(s);
}

fn sample_save() -> Vec<u8> {
    let mut data = preamble(false);
    data.extend_from_slice(&[0, 0]);
    push_string(&mut data, b"Sword");
    data.push(1);
    data.extend_from_slice(&0i16.to_be_bytes());
    data
}

fn savedump<P: AsRef<Path>>(args: &[&str], paths: &[P]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_savedump"));
    cmd.env_remove("RUST_LOG").args(args);
    for path in paths {
        cmd.arg(path.as_ref());
    }
    cmd.output().unwrap()
}

const SAMPLE_OUTPUT: &str = "WorldX : 1\nWorldY : 2\nWorldXa : 3\nWorldYa : 4\nWorldZa : 5\n\
x offset : 0.5\ny offset : 1.5\nX : 2.5\nY : 3.5\nZ : 4.5\nPlayer Direction : 7\n\
Control Byte : 0\nControl Byte : 0\nInventory Type : Sword\nInvExplored : 1\nInvCount : 0\n";

#[test]
fn test_no_arguments_exits_with_one() {
    let output = savedump::<&str>(&[], &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no input files specified"));
}

#[test]
fn test_files_are_printed_back_to_back() {
    let dir = TempDir::new("back-to-back");
    let save = dir.join("save.dat");
    std::fs::write(&save, sample_save()).unwrap();

    let output = savedump(&[], &[&save, &save]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout, format!("{}{}", SAMPLE_OUTPUT, SAMPLE_OUTPUT));
}

#[test]
fn test_load_failure_does_not_stop_other_files() {
    let dir = TempDir::new("load-failure");
    let save = dir.join("save.dat");
    let empty = dir.join("empty.dat");
    let missing = dir.join("missing.dat");
    std::fs::write(&save, sample_save()).unwrap();
    std::fs::write(&empty, b"").unwrap();

    let output = savedump(&[], &[&missing, &empty, &save]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout).unwrap(), SAMPLE_OUTPUT);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains(&format!("failed: {}", missing.display())));
    assert!(stderr.contains(&format!("failed: {}", empty.display())));
}

#[test]
fn test_truncated_save_prints_partial_fields() {
    let dir = TempDir::new("truncated");
    let save = dir.join("short.dat");
    std::fs::write(&save, &sample_save()[..10]).unwrap();

    let output = savedump(&[], &[&save]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "WorldX : 1\nWorldY : 2\n"
    );
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed: "));
}

#[test]
fn test_strict_reports_failures_in_exit_code() {
    let dir = TempDir::new("strict");
    let save = dir.join("short.dat");
    std::fs::write(&save, &sample_save()[..10]).unwrap();

    let output = savedump(&["--strict"], &[&save]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_offsets_show_unknown_block() {
    let dir = TempDir::new("offsets");
    let save = dir.join("save.dat");
    std::fs::write(&save, sample_save()).unwrap();

    let output = savedump(&["--offsets"], &[&save]);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("        20: Unknown Block : <5 bytes skipped>\n"));
    assert!(stdout.contains("        25: x offset : 0.5\n"));
}

#[test]
fn test_decode_flags_reach_the_decoder() {
    let dir = TempDir::new("decode-flags");
    let save = dir.join("save.dat");

    let mut data = preamble(true);
    data.push(1);
    data.extend_from_slice(&1i32.to_be_bytes());
    data.push(0);
    push_string(&mut data, b"gold");
    data.push(1);
    data.extend_from_slice(&2.5f64.to_le_bytes());
    data.push(1);
    data.extend_from_slice(&42i32.to_be_bytes());
    push_string(&mut data, b"bag");
    data.push(0);
    data.extend_from_slice(&2i16.to_be_bytes());
    push_string(&mut data, b"Axe");
    data.extend_from_slice(&3i32.to_be_bytes());
    push_string(&mut data, b"Rope");
    data.extend_from_slice(&9i32.to_be_bytes());
    std::fs::write(&save, data).unwrap();

    let output = savedump(
        &[
            "--layout",
            "minimal",
            "--all-items",
            "--position-endian",
            "big",
            "--table-value-endian",
            "little",
        ],
        &[&save],
    );
    assert!(output.status.success());
    assert!(output.stderr.is_empty());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("x offset : 0.5\ny offset : 1.5\nX : 2.5\n"));
    assert!(stdout.ends_with(
        "Control Byte : 1\n\
         Player Table Length : 1\n  \
         Type : 0\n    \
         Name : gold\n    \
         Value : 2.5\n\
         Control Byte : 1\n  \
         Player ID : 42\n\
         Inventory Type : bag\n\
         InvExplored : 0\n\
         InvCount : 2\n  \
         Item : Axe\n  \
         Uses? : 3\n  \
         Item : Rope\n  \
         Uses? : 9\n"
    ));
}

#[test]
fn test_invalid_layout_is_rejected() {
    let output = savedump::<&str>(&["--layout", "huge", "save.dat"], &[]);
    assert_eq!(output.status.code(), Some(2));
}

#[cfg(feature = "json")]
#[test]
fn test_json_output() {
    let dir = TempDir::new("json");
    let save = dir.join("save.dat");
    std::fs::write(&save, sample_save()).unwrap();

    let output = savedump(&["--json"], &[&save]);
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with(
        r#"[{"label":"WorldX","depth":0,"offset":0,"value":{"kind":"Int32","value":1}},"#
    ));
    assert!(stdout.contains(
        r#"{"label":"Unknown Block","depth":0,"offset":20,"value":{"kind":"Skipped","value":5}}"#
    ));
    assert!(stdout.ends_with(
        r#"{"label":"InvCount","depth":0,"offset":59,"value":{"kind":"Int16","value":0}}]
"#
    ));
}

#[cfg(feature = "json")]
#[test]
fn test_json_conflicts_with_offsets() {
    let output = savedump::<&str>(&["--json", "--offsets", "save.dat"], &[]);
    assert_eq!(output.status.code(), Some(2));
}
