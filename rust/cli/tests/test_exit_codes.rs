//! Exit codes and stream discipline: results on stdout, diagnostics on stderr.

fn run(args: &[&str]) -> (i32, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let mut argv = vec!["librarian"];
    argv.extend_from_slice(args);
    let code = librarian_cli::run(argv, &mut out, &mut err);
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

#[test]
fn help_goes_to_stdout_with_zero() {
    let (code, out, err) = run(&["--help"]);
    assert_eq!(code, 0);
    assert!(out.contains("classify"));
    assert!(err.is_empty());
}

#[test]
fn unknown_command_lists_commands_on_stderr() {
    let (code, out, err) = run(&["play"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Commands:"));
    assert!(err.contains("resolve"));
}

#[test]
fn texture_prints_tag_array() {
    let (code, out, _) = run(&["texture", "--board", "Ah Kh 2h"]);
    assert_eq!(code, 0);
    let tags: Vec<String> = serde_json::from_str(&out).unwrap();
    assert_eq!(tags.len(), 3);
    assert!(tags.contains(&"monotone".to_string()));
    assert!(tags.contains(&"A-high".to_string()));
    assert!(tags.contains(&"broadway_present".to_string()));
}

#[test]
fn empty_board_has_no_tags() {
    let (code, out, _) = run(&["texture", "--board", ""]);
    assert_eq!(code, 0);
    assert_eq!(out.trim(), "[]");
}

#[test]
fn malformed_board_exits_two() {
    let (code, out, err) = run(&["texture", "--board", "Ah 1h 2h"]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.starts_with("Error: "));
    assert!(err.contains("1h"));
}

#[test]
fn malformed_sequence_exits_two() {
    let (code, _, err) = run(&[
        "survivors",
        "--sequence",
        "1f2",
        "--positions",
        "6",
        "--player",
        "hero",
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("Malformed sequence"));
}

#[test]
fn missing_hand_file_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.jsonl");
    let library = dir.path().join("library.sqlite");
    let (code, _, err) = run(&[
        "classify",
        "--input",
        missing.to_str().unwrap(),
        "--library",
        library.to_str().unwrap(),
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("Failed to read"));
    assert_eq!(err.matches("Error: ").count(), 1, "stderr: {err}");
}

#[test]
fn missing_library_snapshot_is_reported_once() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("library.json");
    let library = dir.path().join("library.sqlite");
    let (code, out, err) = run(&[
        "import",
        "--input",
        missing.to_str().unwrap(),
        "--library",
        library.to_str().unwrap(),
    ]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Failed to read"));
    assert_eq!(err.matches("Error: ").count(), 1, "stderr: {err}");
}

#[test]
fn file_of_only_garbage_exits_two() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("hands.jsonl");
    std::fs::write(&input, "garbage\n{\n").unwrap();
    let library = dir.path().join("library.sqlite");
    let (code, _, err) = run(&[
        "classify",
        "--input",
        input.to_str().unwrap(),
        "--library",
        library.to_str().unwrap(),
    ]);
    assert_eq!(code, 2);
    assert!(err.contains("Invalid record"));
    assert_eq!(err.matches("Error: ").count(), 1, "stderr: {err}");
}
