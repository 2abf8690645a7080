use cavern_core::bdcff::{decode_movements, encode_movements};
use cavern_core::content::showcase_cave;
use cavern_core::replay_file::{ReplayWriter, load_replay_from_file};
use cavern_core::{
    CaveObject, CaveRendered, CaveReplay, Coord, Direction, Element, Movement, ObjectKind,
    check_replays,
};
use tempfile::tempdir;

fn recorded_replay(level: usize, seed: u32) -> CaveReplay {
    let mut replay = CaveReplay::new(level, seed);
    replay.player_name = "integration".to_string();
    for _ in 0..10 {
        replay.store_movement(Movement {
            direction: Direction::Right,
            fire: false,
            suicide: false,
        });
    }
    replay.store_movement(Movement { direction: Direction::Down, fire: true, suicide: false });
    replay
}

#[test]
fn replay_without_checksum_adopts_the_rendered_one() {
    let mut cave = showcase_cave();
    cave.replays.push(recorded_replay(0, 42));

    let wrong = check_replays(&mut cave, false, false);
    assert_eq!(wrong, 0);
    let expected = CaveRendered::new(&cave, 0, 42).checksum();
    assert_eq!(cave.replays[0].checksum, expected);
    assert!(!cave.replays[0].wrong_checksum);
}

#[test]
fn editing_the_cave_invalidates_recorded_replays() {
    let mut cave = showcase_cave();
    cave.replays.push(recorded_replay(1, 7));
    check_replays(&mut cave, false, false);
    assert!(!cave.replays[0].wrong_checksum);

    // Any edit that changes the materialized grid breaks the recording.
    cave.add_object(CaveObject::new(ObjectKind::Point {
        start: Coord::new(20, 10),
        element: Element::Diamond,
    }));
    let wrong = check_replays(&mut cave, false, false);
    assert_eq!(wrong, 1);
    assert!(cave.replays[0].wrong_checksum);

    // Repair adopts the new grid's checksum.
    let wrong = check_replays(&mut cave, false, true);
    assert_eq!(wrong, 1);
    assert!(!cave.replays[0].wrong_checksum);
    assert_eq!(check_replays(&mut cave, false, false), 0);
}

#[test]
fn mismatching_replays_can_be_removed() {
    let mut cave = showcase_cave();
    let mut stale = recorded_replay(0, 5);
    stale.checksum = 1; // never matches a real checksum of this cave
    cave.replays.push(stale);
    cave.replays.push(recorded_replay(0, 5));

    let wrong = check_replays(&mut cave, true, false);
    assert_eq!(wrong, 1);
    assert_eq!(cave.replays.len(), 1);
    assert!(!cave.replays[0].wrong_checksum);
}

#[test]
fn movement_text_round_trips_through_the_codec() {
    let replay = recorded_replay(0, 1);
    let text = encode_movements(replay.movements());
    let decoded = decode_movements(&text).unwrap();
    assert_eq!(decoded, replay.movements());
    assert_eq!(encode_movements(&decoded), text);
}

#[test]
fn replay_survives_a_file_round_trip_and_still_verifies() {
    let mut cave = showcase_cave();
    let mut replay = recorded_replay(2, 99);
    replay.checksum = CaveRendered::new(&cave, 2, 99).checksum();

    let dir = tempdir().unwrap();
    let path = dir.path().join("showcase.replay.jsonl");
    let mut writer = ReplayWriter::create(&path, &cave.base.name, &replay).unwrap();
    // Write the packed movements as runs, the way a recorder would.
    let mut movements = replay.movements().iter().copied();
    if let Some(mut current) = movements.next() {
        let mut count = 1_u8;
        for byte in movements {
            if byte == current && count < u8::MAX {
                count += 1;
            } else {
                writer.append(Movement::unpack(current).unwrap(), count).unwrap();
                current = byte;
                count = 1;
            }
        }
        writer.append(Movement::unpack(current).unwrap(), count).unwrap();
    }
    drop(writer);

    let loaded = load_replay_from_file(&path).unwrap();
    assert_eq!(loaded.cave_name, cave.base.name);
    assert_eq!(loaded.replay.movements(), replay.movements());
    assert_eq!(loaded.replay.checksum, replay.checksum);

    cave.replays.push(loaded.replay);
    let wrong = check_replays(&mut cave, false, false);
    assert_eq!(wrong, 0);
}
