use std::fs;
use std::path::PathBuf;

use rstest::rstest;
use tempfile::tempdir;
use wavetuner_core::{GainEditError, GainFileEditor};

fn write_script(dir: &tempfile::TempDir, content: &str) -> PathBuf {
    let path = dir.path().join("wave.py");
    fs::write(&path, content).expect("write script");
    path
}

#[test]
fn rewrites_only_the_gain_argument() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(
        &dir,
        "#!/usr/bin/env python3\nself.usrp.set_gain(  12 ,  0 )\nprint('hi')\n",
    );
    let editor = GainFileEditor::default();
    editor.edit_gain(&path, 17, 0).expect("edit");
    let text = fs::read_to_string(&path).expect("read");
    // Whitespace and the channel argument survive byte-for-byte.
    assert!(text.contains("self.usrp.set_gain(  17 ,  0 )"), "got: {text}");
    assert!(text.contains("print('hi')"));
}

#[test]
fn editing_twice_is_idempotent() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(&dir, "x = 1\nself.radio.set_gain(3, 1)\n");
    let editor = GainFileEditor::default();
    editor.edit_gain(&path, 42, 1).expect("first edit");
    let first = fs::read_to_string(&path).expect("read");
    editor.edit_gain(&path, 42, 1).expect("second edit");
    let second = fs::read_to_string(&path).expect("read");
    assert_eq!(first, second);
}

#[rstest]
#[case(-11)]
#[case(61)]
fn out_of_range_gain_is_rejected_and_file_untouched(#[case] gain: i32) {
    let dir = tempdir().expect("tempdir");
    let path = write_script(&dir, "self.usrp.set_gain(0, 0)\n");
    let before = fs::read_to_string(&path).expect("read");
    let editor = GainFileEditor::default();
    let err = editor.edit_gain(&path, gain, 0).expect_err("should reject");
    assert!(matches!(err, GainEditError::GainOutOfRange { .. }));
    assert_eq!(fs::read_to_string(&path).expect("read"), before);
}

#[test]
fn bounds_are_configurable() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(&dir, "self.usrp.set_gain(0, 0)\n");
    let editor = GainFileEditor::with_bounds(0, 10);
    assert!(editor.edit_gain(&path, -1, 0).is_err());
    assert!(editor.edit_gain(&path, 10, 0).is_ok());
}

#[test]
fn invalid_channel_is_rejected() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(&dir, "self.usrp.set_gain(0, 0)\n");
    let err = GainFileEditor::default()
        .edit_gain(&path, 5, 2)
        .expect_err("should reject");
    assert!(matches!(err, GainEditError::ChannelOutOfRange(2)));
}

#[test]
fn missing_call_site_is_reported() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(&dir, "print('no gain here')\n");
    let err = GainFileEditor::default()
        .edit_gain(&path, 5, 0)
        .expect_err("should reject");
    assert!(matches!(err, GainEditError::NoCandidate(_)));
}

#[test]
fn differing_channel_arguments_pick_the_matching_call() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(
        &dir,
        "self.usrp.set_gain(1, 0)\nself.usrp.set_gain(2, 1)\n",
    );
    GainFileEditor::default()
        .edit_gain(&path, 30, 1)
        .expect("edit");
    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("set_gain(1, 0)"));
    assert!(text.contains("set_gain(30, 1)"));
}

#[rstest]
#[case(0, "self.usrp.set_gain(9, 0)", "self.usrp_tx_b.set_gain(5, 0)")]
#[case(1, "self.usrp.set_gain(5, 0)", "self.usrp_tx_b.set_gain(9, 0)")]
fn same_channel_calls_fall_back_to_token_count(
    #[case] channel: u8,
    #[case] expect_edited: &str,
    #[case] expect_kept: &str,
) {
    let dir = tempdir().expect("tempdir");
    // Same channel argument on both calls, differing identifier shapes:
    // channel 0 edits the short name, channel 1 the long one.
    let path = write_script(
        &dir,
        "self.usrp.set_gain(5, 0)\nself.usrp_tx_b.set_gain(5, 0)\n",
    );
    GainFileEditor::default()
        .edit_gain(&path, 9, channel)
        .expect("edit");
    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains(expect_edited), "got: {text}");
    assert!(text.contains(expect_kept), "got: {text}");
}

#[test]
fn numeric_identifier_suffix_selects_the_channel() {
    let dir = tempdir().expect("tempdir");
    // Identical channel args and token counts; last tokens are 0 and 1.
    let path = write_script(
        &dir,
        "self.tx_0.set_gain(5, 0)\nself.tx_1.set_gain(5, 0)\n",
    );
    GainFileEditor::default()
        .edit_gain(&path, 8, 1)
        .expect("edit");
    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("self.tx_0.set_gain(5, 0)"));
    assert!(text.contains("self.tx_1.set_gain(8, 0)"));
}

#[test]
fn positional_fallback_when_nothing_distinguishes_calls() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(
        &dir,
        "self.tx_a.set_gain(5, 0)\nself.tx_b.set_gain(5, 0)\n",
    );
    GainFileEditor::default()
        .edit_gain(&path, 7, 1)
        .expect("edit");
    let text = fs::read_to_string(&path).expect("read");
    assert!(text.contains("self.tx_a.set_gain(5, 0)"));
    assert!(text.contains("self.tx_b.set_gain(7, 0)"));
}

#[test]
fn extract_channel_reads_the_first_call() {
    let dir = tempdir().expect("tempdir");
    let path = write_script(&dir, "setup()\nself.usrp.set_gain(12.5, 1)\n");
    assert_eq!(GainFileEditor::extract_channel(&path), 1);

    let bare = write_script(&dir, "nothing here\n");
    assert_eq!(GainFileEditor::extract_channel(&bare), 0);
}
