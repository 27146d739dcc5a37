use std::fs;
use std::path::Path;
use std::process::Command;

fn acqdev() -> Command {
    Command::new(env!("CARGO_BIN_EXE_acqdev"))
}

const MANIFEST: &str = r#"{
    "channels": [
        {"name": "SAP", "encoding": "<i2", "header_offset": 24,
         "scale": 1.0, "offset": 0.0, "samples_per_second": 100.0, "sample_size": 2},
        {"name": "HR", "encoding": "<f8", "header_offset": 28,
         "scale": 1.0, "offset": 0.0, "samples_per_second": 100.0, "sample_size": 8}
    ]
}"#;

fn write_fixture(dir: &Path, name: &str, records: usize, tail: usize) -> std::path::PathBuf {
    let src = dir.join(name);
    let mut bytes = vec![0u8; 32];
    for i in 0..records {
        bytes.extend_from_slice(&(i as i16).to_le_bytes());
        bytes.extend_from_slice(&(i as f64 * 2.0).to_le_bytes());
    }
    bytes.extend(std::iter::repeat_n(0xFFu8, tail));
    fs::write(&src, bytes).unwrap();
    let mut sidecar = src.as_os_str().to_owned();
    sidecar.push(".layout.json");
    fs::write(sidecar, MANIFEST).unwrap();
    src
}

#[test]
fn wrong_argument_count_exits_1() {
    let status = acqdev().arg("only-one.acq").status().unwrap();
    assert_eq!(status.code(), Some(1));
    let status = acqdev().status().unwrap();
    assert_eq!(status.code(), Some(1));
}

#[test]
fn bad_source_extension_exits_2() {
    let dir = tempfile::tempdir().unwrap();
    let status = acqdev()
        .arg(dir.path().join("rec.txt"))
        .arg(dir.path().join("out.csv"))
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(2));
}

#[test]
fn salvages_and_appends_csv_extension() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path(), "rec.acq", 12, 3);
    let report = dir.path().join("report.json");
    let out = acqdev()
        .arg(&src)
        .arg(dir.path().join("export"))
        .arg("--chunk-records")
        .arg("5")
        .arg("--report")
        .arg(&report)
        .arg("--deterministic")
        .output()
        .unwrap();
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("block_sz_bytes = 10"));
    assert!(stdout.contains("data_offset = 32"));

    let csv = fs::read_to_string(dir.path().join("export.csv")).unwrap();
    assert_eq!(csv.lines().count(), 13);
    assert_eq!(csv.lines().nth(4), Some("3,0.03,3,6"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(json["records"], 12);
    assert_eq!(json["dropped_tail_bytes"], 3);
    assert_eq!(json["recovered_at"], 0);
}

#[test]
fn dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path(), "rec.acq", 4, 0);
    let status = acqdev()
        .arg(&src)
        .arg(dir.path().join("out.csv"))
        .arg("--dry-run")
        .status()
        .unwrap();
    assert!(status.success());
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn recovery_failure_exits_3_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path(), "rec.acq", 0, 0);
    let status = acqdev()
        .arg(&src)
        .arg(dir.path().join("out.csv"))
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(3));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn unwritable_report_exits_3_without_csv() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path(), "rec.acq", 6, 0);
    let status = acqdev()
        .arg(&src)
        .arg(dir.path().join("out.csv"))
        .arg("--report")
        .arg(dir.path().join("missing").join("r.json"))
        .status()
        .unwrap();
    assert_eq!(status.code(), Some(3));
    assert!(!dir.path().join("out.csv").exists());
}

#[test]
fn in_memory_read_gives_the_same_csv() {
    let dir = tempfile::tempdir().unwrap();
    let src = write_fixture(dir.path(), "rec.acq", 9, 2);
    for (name, extra) in [("a.csv", None), ("b.csv", Some("--in-memory"))] {
        let mut cmd = acqdev();
        cmd.arg(&src).arg(dir.path().join(name));
        if let Some(flag) = extra {
            cmd.arg(flag);
        }
        assert!(cmd.status().unwrap().success());
    }
    assert_eq!(
        fs::read(dir.path().join("a.csv")).unwrap(),
        fs::read(dir.path().join("b.csv")).unwrap()
    );
}
