use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::tempdir;

use super::*;
use crate::types::Direction;

fn make_test_path(dir: &Path, name: &str) -> PathBuf {
    dir.join(name)
}

fn sample_replay() -> CaveReplay {
    let mut replay = CaveReplay::new(2, 777);
    replay.checksum = 0xDEAD_BEEF;
    replay.player_name = "player one".to_string();
    replay.recorded_with = "cavern 0.1.0".to_string();
    replay.success = true;
    replay
}

fn right() -> Movement {
    Movement { direction: Direction::Right, fire: false, suicide: false }
}

fn fire_down() -> Movement {
    Movement { direction: Direction::Down, fire: true, suicide: false }
}

#[test]
fn schema_roundtrip_header_and_records() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "roundtrip.jsonl");

    let mut writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();
    writer.append(right(), 3).unwrap();
    writer.append(fire_down(), 1).unwrap();
    writer.append(Movement::default(), 2).unwrap();

    let loaded = load_replay_from_file(&path).unwrap();
    assert_eq!(loaded.cave_name, "Cave A");
    assert_eq!(loaded.replay.level, 2);
    assert_eq!(loaded.replay.seed, 777);
    assert_eq!(loaded.replay.checksum, 0xDEAD_BEEF);
    assert_eq!(loaded.replay.player_name, "player one");
    assert!(loaded.replay.success);

    // Runs expand into one packed byte per frame.
    let expected = vec![
        right().pack(),
        right().pack(),
        right().pack(),
        fire_down().pack(),
        Movement::default().pack(),
        Movement::default().pack(),
    ];
    assert_eq!(loaded.replay.movements(), expected.as_slice());

    assert_eq!(loaded.next_seq, 3);
    assert_ne!(loaded.last_sha256_hex, INITIAL_HASH);
}

#[test]
fn hash_chain_detects_tampered_record() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "tampered.jsonl");

    let mut writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();
    writer.append(right(), 1).unwrap();
    writer.append(fire_down(), 1).unwrap();

    // Flip the second record's run count in the file.
    let content = fs::read_to_string(&path).unwrap();
    let mut lines: Vec<String> = content.lines().map(String::from).collect();
    assert!(lines.len() >= 3, "expected header + 2 records");
    lines[2] = lines[2].replace("\"count\":1", "\"count\":9");
    fs::write(&path, lines.join("\n") + "\n").unwrap();

    let result = load_replay_from_file(&path);
    assert!(
        matches!(result, Err(ReplayLoadError::HashChainBroken { line: 3 })),
        "expected hash chain broken at line 3, got: {result:?}"
    );
}

#[test]
fn hash_chain_detects_deleted_record() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "deleted.jsonl");

    let mut writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();
    for _ in 0..3 {
        writer.append(right(), 1).unwrap();
    }

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4); // header + 3 records
    let tampered = format!("{}\n{}\n{}\n", lines[0], lines[1], lines[3]);
    fs::write(&path, tampered).unwrap();

    let result = load_replay_from_file(&path);
    assert!(
        matches!(
            result,
            Err(ReplayLoadError::HashChainBroken { .. })
                | Err(ReplayLoadError::InvalidRecord { .. })
        ),
        "expected chain corruption error, got: {result:?}"
    );
}

#[test]
fn truncated_last_line_returns_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "truncated.jsonl");

    let mut writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();
    writer.append(right(), 1).unwrap();

    let mut file = OpenOptions::new().append(true).open(&path).unwrap();
    write!(file, "{{\"seq\":1,\"cou").unwrap(); // no newline, truncated JSON

    let result = load_replay_from_file(&path);
    assert!(
        matches!(result, Err(ReplayLoadError::IncompleteLine { line: 3 })),
        "expected incomplete line at line 3, got: {result:?}"
    );
}

#[test]
fn empty_file_returns_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "empty.jsonl");
    fs::write(&path, "").unwrap();

    let result = load_replay_from_file(&path);
    assert!(
        matches!(result, Err(ReplayLoadError::EmptyFile)),
        "expected EmptyFile error, got: {result:?}"
    );
}

#[test]
fn header_only_file_loads_empty_replay() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "header_only.jsonl");

    let _writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();

    let loaded = load_replay_from_file(&path).unwrap();
    assert_eq!(loaded.replay.seed, 777);
    assert!(loaded.replay.is_empty());
    assert_eq!(loaded.next_seq, 0);
    assert_eq!(loaded.last_sha256_hex, INITIAL_HASH);
}

#[test]
fn zero_count_record_is_rejected_by_writer_and_loader() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "zero_count.jsonl");

    let mut writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();
    assert!(writer.append(right(), 0).is_err());
}

#[test]
fn resume_appends_continue_hash_chain() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "resume.jsonl");

    let mut writer = ReplayWriter::create(&path, "Cave A", &sample_replay()).unwrap();
    writer.append(right(), 2).unwrap();
    drop(writer);

    let loaded = load_replay_from_file(&path).unwrap();
    assert_eq!(loaded.replay.len(), 2);

    let mut writer = ReplayWriter::resume(&path, loaded.last_sha256_hex, loaded.next_seq).unwrap();
    writer.append(fire_down(), 1).unwrap();
    drop(writer);

    let reloaded = load_replay_from_file(&path).unwrap();
    assert_eq!(reloaded.replay.len(), 3);
    assert_eq!(reloaded.next_seq, 2);
}

#[test]
fn invalid_header_returns_error() {
    let dir = tempdir().unwrap();
    let path = make_test_path(dir.path(), "bad_header.jsonl");
    fs::write(&path, "not valid json\n").unwrap();

    let result = load_replay_from_file(&path);
    assert!(
        matches!(result, Err(ReplayLoadError::InvalidHeader { line: 1, .. })),
        "expected invalid header error, got: {result:?}"
    );
}
