use std::fs;

use tempfile::tempdir;
use wavetuner_core::{Logger, WaveLogger};

#[test]
fn picks_the_smallest_free_counter() {
    let dir = tempdir().expect("tempdir");
    let first = WaveLogger::create_in(dir.path()).expect("first log");
    let second = WaveLogger::create_in(dir.path()).expect("second log");

    let name1 = first.path().file_name().unwrap().to_string_lossy().into_owned();
    let name2 = second.path().file_name().unwrap().to_string_lossy().into_owned();
    assert!(name1.starts_with("waveLog-"), "name: {name1}");
    assert!(name1.ends_with("-1.txt"), "name: {name1}");
    assert!(name2.ends_with("-2.txt"), "name: {name2}");
}

#[test]
fn messages_carry_a_utc_prefix_and_are_flushed() {
    let dir = tempdir().expect("tempdir");
    let logger = WaveLogger::create_in(dir.path()).expect("log");
    logger.log("Waveform L1_wave.py tuned");
    logger.debug_and_log("second line");

    // Flushed after every write; readable without dropping the logger.
    let text = fs::read_to_string(logger.path()).expect("read log");
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('<'), "line: {}", lines[0]);
    assert!(lines[0].contains(" Z> Waveform L1_wave.py tuned"), "line: {}", lines[0]);
    assert!(lines[1].contains(" Z> second line"));
}
