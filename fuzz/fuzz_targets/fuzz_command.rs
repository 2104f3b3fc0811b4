#![no_main]

use labref::game::{Command, MAX_ANNOTATION_CHARS, parse_command, truncate_annotation};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(line) = std::str::from_utf8(data) else {
        return;
    };
    let Some(command) = parse_command(line) else {
        return;
    };

    // A parsed line keeps its keyword, and its annotation fits on screen
    // once shortened.
    let keyword = line.split_whitespace().next().unwrap_or_default();
    let expected = match &command {
        Command::Goto { .. } => "GOTO",
        Command::Connect { .. } => "CONNECT",
        Command::Wait { .. } => "WAIT",
    };
    assert!(keyword.eq_ignore_ascii_case(expected));
    if let Some(text) = command.annotation() {
        assert!(!text.is_empty());
        assert!(truncate_annotation(text).chars().count() <= MAX_ANNOTATION_CHARS + 1);
    }
});
