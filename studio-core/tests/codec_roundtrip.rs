//! Integration tests for the JSONL record codec.
//!
//! Exercises: decode, decode_bytes, encode, encode_bytes, key translation,
//! metadata classification and parse-error reporting.

use serde_json::json;
use studio_core::codec::{self, camel_to_snake, snake_to_camel};
use studio_core::types::{Commit, Metadata, Modification, Sample};
use studio_core::StudioError;

const METADATA_LINE: &str =
    r#"{"type":"metadata","timestamp":1604543330,"index":1,"filename":"data.jsonl"}"#;
const SAMPLE_LINE: &str = r#"{"commit":{"hash":"a1b2c3","message":"Fix off-by-one in pager","modifications":[{"old_filepath":"src/pager.py","new_filepath":"src/pager.py","old_content":"n = len(x) + 1\n","new_content":"n = len(x)\n"}]},"repository":"acme/pager","labels":["fix"]}"#;
const ADDED_FILE_LINE: &str = r#"{"commit":{"hash":"d4e5f6","message":"Add readme","modifications":[{"new_filepath":"README.md","new_content":"hello\n"}]},"repository":"acme/pager","labels":[]}"#;

fn sample(hash: &str, labels: &[&str]) -> Sample {
    Sample {
        commit: Commit {
            hash: hash.to_owned(),
            message: format!("commit {hash}"),
            modifications: vec![Modification {
                old_filepath: Some("lib/util.py".to_owned()),
                new_filepath: Some("lib/util.py".to_owned()),
                old_content: Some("def f():\n    return 1\n".to_owned()),
                new_content: Some("def f():\n    return 2\n".to_owned()),
                ..Modification::default()
            }],
            ..Commit::default()
        },
        repository: "acme/util".to_owned(),
        labels: labels.iter().map(|l| (*l).to_owned()).collect(),
        ..Sample::default()
    }
}

#[test]
fn key_translation_helpers() {
    assert_eq!(snake_to_camel("old_filepath"), "oldFilepath");
    assert_eq!(snake_to_camel("new_content"), "newContent");
    assert_eq!(snake_to_camel("hash"), "hash");
    assert_eq!(snake_to_camel("_private_key"), "_privateKey");
    assert_eq!(camel_to_snake("oldFilepath"), "old_filepath");
    assert_eq!(camel_to_snake("type"), "type");
    assert_eq!(camel_to_snake("_privateKey"), "_private_key");
}

#[test]
fn capitals_in_wire_keys_are_normalised() {
    assert_eq!(snake_to_camel("URL"), "url");
    assert_eq!(snake_to_camel("HTTP_code"), "httpCode");
    assert_eq!(snake_to_camel("CVE_id"), "cveId");
    assert_eq!(snake_to_camel("HTTPCode"), "httpCode");
    assert_eq!(snake_to_camel("alreadyCamel"), "alreadyCamel");
    assert_eq!(snake_to_camel("sha256_sum"), "sha256Sum");
    assert_eq!(snake_to_camel("trailing_"), "trailing");

    for wire in ["URL", "HTTP_code", "CVE_id", "__dunder_Key", "v2_api", "x$_y", "a__b"] {
        let once = snake_to_camel(wire);
        assert_eq!(
            snake_to_camel(&camel_to_snake(&once)),
            once,
            "{wire} should settle after one decode"
        );
    }
}

#[test]
fn decode_translates_keys_and_classifies_metadata() {
    let decoded = codec::decode([METADATA_LINE, SAMPLE_LINE, "", ADDED_FILE_LINE]).unwrap();

    let metadata = decoded.metadata.expect("metadata line should be classified");
    assert_eq!(metadata.timestamp, Some(1_604_543_330));
    assert_eq!(metadata.index, Some(1));
    assert_eq!(metadata.filename.as_deref(), Some("data.jsonl"));

    assert_eq!(decoded.samples.len(), 2, "blank line should be skipped");
    let first = &decoded.samples[0];
    assert_eq!(first.commit.hash, "a1b2c3");
    assert_eq!(first.labels, vec!["fix".to_owned()]);
    let m = &first.commit.modifications[0];
    assert_eq!(m.old_filepath.as_deref(), Some("src/pager.py"));
    assert_eq!(m.new_content.as_deref(), Some("n = len(x)\n"));
    assert!(m.extra.is_empty(), "all wire keys should map to known fields");

    let added = &decoded.samples[1].commit.modifications[0];
    assert_eq!(added.old_content, None);
    assert_eq!(added.display_path(), "README.md");
}

#[test]
fn decode_without_metadata_line() {
    let decoded = codec::decode([SAMPLE_LINE]).unwrap();
    assert!(decoded.metadata.is_none());
    assert_eq!(decoded.samples.len(), 1);
}

#[test]
fn first_metadata_line_wins() {
    let later = r#"{"type":"metadata","timestamp":null,"index":null,"filename":"other.jsonl"}"#;
    let decoded = codec::decode([METADATA_LINE, SAMPLE_LINE, later]).unwrap();
    assert_eq!(decoded.metadata.unwrap().filename.as_deref(), Some("data.jsonl"));
    assert_eq!(decoded.samples.len(), 1, "metadata lines are never samples");
}

#[test]
fn malformed_line_reports_its_ordinal() {
    let err = codec::decode([METADATA_LINE, "", SAMPLE_LINE, "{\"commit\": {"]).unwrap_err();
    match err {
        StudioError::Parse { line, .. } => assert_eq!(line, 4),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn object_without_sample_shape_is_a_parse_error() {
    let err = codec::decode([SAMPLE_LINE, r#"{"repository":"acme/x"}"#]).unwrap_err();
    assert!(
        matches!(err, StudioError::Parse { line: 2, .. }),
        "missing commit should fail on line 2, got {err:?}"
    );
}

#[test]
fn decode_bytes_handles_crlf_and_trailing_newline() {
    let text = format!("{METADATA_LINE}\r\n{SAMPLE_LINE}\r\n\r\n");
    let decoded = codec::decode_bytes(text.as_bytes()).unwrap();
    assert!(decoded.metadata.is_some());
    assert_eq!(decoded.samples.len(), 1);
}

#[test]
fn invalid_utf8_is_a_parse_error() {
    let mut bytes = SAMPLE_LINE.as_bytes().to_vec();
    bytes.push(b'\n');
    bytes.extend_from_slice(b"{\"commit\":\"\xff\"}\n");
    let err = codec::decode_bytes(&bytes).unwrap_err();
    assert!(matches!(err, StudioError::Parse { line: 2, .. }), "got {err:?}");
}

#[test]
fn encode_writes_metadata_first_with_snake_case_keys() {
    let metadata = Metadata {
        timestamp: Some(10),
        index: Some(0),
        filename: Some("data.jsonl".to_owned()),
        ..Metadata::default()
    };
    let lines = codec::encode(&metadata, &[sample("abc", &[])]).unwrap();

    assert_eq!(lines.len(), 2);
    let head: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
    assert_eq!(head["type"], "metadata");
    assert_eq!(head["filename"], "data.jsonl");
    assert!(lines[1].contains("\"old_filepath\""));
    assert!(!lines[1].contains("oldFilepath"));
}

#[test]
fn encode_then_decode_is_identity() {
    let mut with_extra = sample("e1", &["feat"]);
    with_extra
        .extra
        .insert("reviewNotes".to_owned(), json!({ "seenBy": ["ana"], "score": 3 }));
    with_extra.commit.modifications[0]
        .extra
        .insert("changeType".to_owned(), json!("MODIFY"));

    let metadata = Metadata {
        timestamp: Some(1_700_000_000),
        index: Some(2),
        filename: Some("batch_07.jsonl".to_owned()),
        ..Metadata::default()
    };
    let samples = vec![sample("a0", &[]), with_extra, sample("c2", &["fix"])];

    let bytes = codec::encode_bytes(&metadata, &samples).unwrap();
    let text = String::from_utf8(bytes.clone()).unwrap();
    assert!(text.contains("\"review_notes\""), "extra keys go back to snake_case");
    assert!(text.contains("\"seen_by\""));

    let decoded = codec::decode_bytes(&bytes).unwrap();
    assert_eq!(decoded.metadata, Some(metadata));
    assert_eq!(decoded.samples, samples);
}

#[test]
fn decoded_wire_keys_survive_a_save() {
    let line = r#"{"commit":{"hash":"f00","message":"Bump","modifications":[{"new_filepath":"a.txt","new_content":"x\n","HTTP_code":200,"_score_2":1}],"CVE_id":"CVE-2024-1"},"repository":"acme/web","labels":[],"URL":"https://example.test","meta":{"Nested_KEY":{"a1B":true},"_tag":["x"]}}"#;
    let first = codec::decode([METADATA_LINE, line]).unwrap();

    let extra = &first.samples[0].extra;
    assert!(extra.contains_key("url"), "got {extra:?}");
    assert!(first.samples[0].commit.extra.contains_key("cveId"));

    let bytes = codec::encode_bytes(first.metadata.as_ref().unwrap(), &first.samples).unwrap();
    let second = codec::decode_bytes(&bytes).unwrap();
    assert_eq!(second, first);

    let again = codec::encode_bytes(second.metadata.as_ref().unwrap(), &second.samples).unwrap();
    assert_eq!(again, bytes, "a second save writes the same document");
}

#[test]
fn empty_session_round_trips() {
    let metadata = Metadata::default();
    let bytes = codec::encode_bytes(&metadata, &[]).unwrap();
    let decoded = codec::decode_bytes(&bytes).unwrap();
    assert_eq!(decoded.metadata, Some(metadata));
    assert!(decoded.samples.is_empty());
}
