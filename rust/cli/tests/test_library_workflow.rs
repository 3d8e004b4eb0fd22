//! End-to-end runs of init → import → classify/resolve against a temporary library.

use serde_json::{Value, json};
use std::path::{Path, PathBuf};

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

fn snapshot() -> Value {
    json!({
        "documents": [
            {"id": 1, "title": "3bet pots", "path": "/study/3bet.pdf"},
            {"id": 2, "title": "Monotone c-betting", "path": "/study/monotone.pdf"},
            {"id": 3, "title": "BTN vs BB chart", "path": "/charts/btn_bb.png"}
        ],
        "tags": [
            {"id": 1, "name": "3bet pots"},
            {"id": 2, "name": "monotone flops"}
        ],
        "tag_rules": [
            {"id": 1, "tag_id": 1, "preflop_pattern": "r.*r"},
            {"id": 2, "tag_id": 2, "board_texture": "monotone"},
            {"id": 3, "tag_id": 2, "preflop_pattern": "(["}
        ],
        "tag_documents": [
            {"tag_id": 1, "document_id": 1},
            {"tag_id": 2, "document_id": 2}
        ],
        "spots": [
            {"id": 1, "name": "BTN open, BB call"}
        ],
        "spot_rules": [
            {"id": 1, "spot_id": 1, "condition_type": "action_sequence",
             "condition_params": {"street": "preflop", "pattern": "1f2f3f4r5f6c"}}
        ],
        "spot_documents": [
            {"spot_id": 1, "document_id": 3, "is_default": true}
        ],
        "spot_profiles": [
            {"spot_id": 1, "profile_name": "Zoom 6-max"}
        ]
    })
}

struct Workspace {
    dir: tempfile::TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn write(&self, name: &str, content: &str) -> String {
        let path = self.path(name);
        std::fs::write(&path, content).unwrap();
        path.to_string_lossy().into_owned()
    }

    fn library(&self) -> String {
        self.path("db/library.sqlite").to_string_lossy().into_owned()
    }

    fn imported(self) -> Self {
        let lib = self.write("library.json", &snapshot().to_string());
        let (code, _, err) = run(&["import", "--input", &lib, "--library", &self.library()]);
        assert_eq!(code, 0, "import failed: {err}");
        self
    }
}

fn json_lines(s: &str) -> Vec<Value> {
    s.lines().map(|l| serde_json::from_str(l).unwrap()).collect()
}

#[test]
fn init_creates_library_and_seeds_profiles() {
    let ws = Workspace::new();
    let (code, out, _) = run(&["init", "--library", &ws.library()]);
    assert_eq!(code, 0);
    assert!(Path::new(&ws.library()).exists());
    let report: Value = serde_json::from_str(&out).unwrap();
    let profiles = report["profiles"].as_array().unwrap();
    assert_eq!(profiles.len(), 7);
    assert!(profiles.contains(&json!("Zoom 6-max")));

    let (again, _, _) = run(&["init", "--library", &ws.library()]);
    assert_eq!(again, 0);
}

#[test]
fn import_reports_row_counts() {
    let ws = Workspace::new();
    let lib = ws.write("library.json", &snapshot().to_string());
    let (code, out, _) = run(&["import", "--input", &lib, "--library", &ws.library()]);
    assert_eq!(code, 0);
    let summary: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(summary["tag_rules"], 3);
    assert_eq!(summary["spots"], 1);
}

#[test]
fn classify_writes_one_line_per_hand() {
    let ws = Workspace::new().imported();
    let hands = [
        json!({"hand_id": "h1", "preflop": "1r2r1c", "flop_cards": ["Ah", "Kh", "2h"]}),
        json!({"hand_id": "h2", "preflop": "1f2c", "raw_text": "*** FLOP *** [8c 5d 2h]"}),
        json!({"preflop": "1r2c"}),
    ];
    let content: String = hands.iter().map(|h| format!("{h}\n")).collect();
    let input = ws.write("hands.jsonl", &content);

    let (code, out, err) = run(&["classify", "--input", &input, "--library", &ws.library()]);
    assert_eq!(code, 0, "stderr: {err}");
    let lines = json_lines(&out);
    assert_eq!(lines.len(), 3);

    assert_eq!(lines[0]["hand"], "h1");
    assert_eq!(lines[0]["tag_names"], json!(["3bet pots", "monotone flops"]));
    assert_eq!(lines[0]["documents"].as_array().unwrap().len(), 2);

    assert_eq!(lines[1]["tags"], json!([]));
    assert_eq!(lines[2]["hand"], "line 3");
}

#[test]
fn classify_reads_zstd_compressed_hands() {
    let ws = Workspace::new().imported();
    let plain = format!("{}\n", json!({"hand_id": "z1", "preflop": "1r2r"}));
    let compressed = zstd::stream::encode_all(plain.as_bytes(), 0).unwrap();
    let input = ws.path("hands.jsonl.zst");
    std::fs::write(&input, compressed).unwrap();

    let (code, out, _) = run(&[
        "classify",
        "--input",
        input.to_str().unwrap(),
        "--library",
        &ws.library(),
    ]);
    assert_eq!(code, 0);
    assert_eq!(json_lines(&out)[0]["tag_names"], json!(["3bet pots"]));
}

#[test]
fn classify_skips_unparseable_lines_with_a_warning() {
    let ws = Workspace::new().imported();
    let input = ws.write(
        "hands.jsonl",
        "{\"hand_id\":\"ok\",\"preflop\":\"1r2r\"}\nnot json\n",
    );
    let (code, out, err) = run(&["classify", "--input", &input, "--library", &ws.library()]);
    assert_eq!(code, 0);
    assert_eq!(json_lines(&out).len(), 1);
    assert!(err.contains("Skipping line 2"));
}

#[test]
fn classify_without_library_fails() {
    let ws = Workspace::new();
    let input = ws.write("hands.jsonl", "{\"preflop\":\"1r2r\"}\n");
    let (code, out, err) = run(&["classify", "--input", &input, "--library", &ws.library()]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("librarian init"));
}

#[test]
fn resolve_attaches_default_document() {
    let ws = Workspace::new().imported();
    let input = ws.write(
        "hands.jsonl",
        "{\"hand_id\":\"a\",\"preflop\":\"1f2f3f4r5f6c\"}\n{\"hand_id\":\"b\",\"preflop\":\"1f2f3f4r5f6c6f\"}\n",
    );
    let (code, out, err) = run(&["resolve", "--input", &input, "--library", &ws.library()]);
    assert_eq!(code, 0, "stderr: {err}");
    let lines = json_lines(&out);
    assert_eq!(lines[0]["spot"]["spot"]["name"], "BTN open, BB call");
    assert_eq!(lines[0]["spot"]["default_document"]["id"], 3);
    assert_eq!(lines[1]["spot"], Value::Null);
}

#[test]
fn resolve_respects_profile() {
    let ws = Workspace::new().imported();
    let input = ws.write("hands.jsonl", "{\"preflop\":\"1f2f3f4r5f6c\"}\n");

    let (_, zoom, _) = run(&[
        "resolve", "--input", &input, "--library", &ws.library(), "--profile", "zoom 6-max",
    ]);
    assert_eq!(json_lines(&zoom)[0]["spot"]["spot"]["id"], 1);

    let (_, spingo, _) = run(&[
        "resolve", "--input", &input, "--library", &ws.library(), "--profile", "Spingo",
    ]);
    assert_eq!(json_lines(&spingo)[0]["spot"], Value::Null);
}

#[test]
fn resolve_rejects_unknown_profile() {
    let ws = Workspace::new().imported();
    let input = ws.write("hands.jsonl", "{\"preflop\":\"1f2f3f4r5f6c\"}\n");
    let (code, out, err) = run(&[
        "resolve", "--input", &input, "--library", &ws.library(), "--profile", "Pot Limit Omaha",
    ]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("Unknown game profile 'Pot Limit Omaha'"));
}

#[test]
fn resolve_reports_ambiguous_catalog() {
    let ws = Workspace::new();
    let mut lib = snapshot();
    lib["spots"].as_array_mut().unwrap().push(json!({"id": 2, "name": "duplicate"}));
    lib["spot_rules"].as_array_mut().unwrap().push(json!({
        "id": 2, "spot_id": 2, "condition_type": "action_sequence",
        "condition_params": {"pattern": "1f2f3f4r5f6c"}
    }));
    let lib_path = ws.write("library.json", &lib.to_string());
    let (code, _, _) = run(&["import", "--input", &lib_path, "--library", &ws.library()]);
    assert_eq!(code, 0);

    let input = ws.write("hands.jsonl", "{\"hand_id\":\"x\",\"preflop\":\"1f2f3f4r5f6c\"}\n");
    let (code, out, err) = run(&["resolve", "--input", &input, "--library", &ws.library()]);
    assert_eq!(code, 2);
    assert!(out.is_empty());
    assert!(err.contains("BTN open, BB call"));
    assert!(err.contains("duplicate"));
}

#[test]
fn import_with_unknown_profile_changes_nothing() {
    let ws = Workspace::new();
    let mut lib = snapshot();
    lib["spot_profiles"][0]["profile_name"] = json!("Pot Limit Omaha");
    let lib_path = ws.write("library.json", &lib.to_string());
    let (code, _, err) = run(&["import", "--input", &lib_path, "--library", &ws.library()]);
    assert_eq!(code, 2);
    assert!(err.contains("Pot Limit Omaha"));

    let input = ws.write("hands.jsonl", "{\"preflop\":\"1r2r\"}\n");
    let (code, out, _) = run(&["classify", "--input", &input, "--library", &ws.library()]);
    assert_eq!(code, 0);
    assert_eq!(json_lines(&out)[0]["tags"], json!([]));
}
