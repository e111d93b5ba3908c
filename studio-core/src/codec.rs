//! JSONL record codec.
//!
//! The wire format is one JSON object per line with snake_case keys. Decoding
//! translates every key (recursively, through nested objects and arrays) to
//! camelCase before the object is classified: an object whose `type` field is
//! `"metadata"` is the session metadata, anything else is a sample. Encoding
//! does the reverse and always emits the metadata line first.
//!
//! Only keys are translated. String values, including file contents, pass
//! through untouched.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::StudioError;
use crate::types::{Metadata, Sample};

/// Output of [`decode`]: every sample in input order plus the metadata, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub samples: Vec<Sample>,
    pub metadata: Option<Metadata>,
}

/// Splits the part of a key after its leading underscores into words.
///
/// Underscores separate words, and so do case changes: a capital starts a
/// new word unless it continues a run of capitals (`HTTPCode` is `HTTP`,
/// `Code`).
fn words(rest: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for segment in rest.split('_').filter(|s| !s.is_empty()) {
        let chars: Vec<(usize, char)> = segment.char_indices().collect();
        let mut start = 0;
        for (pos, &(at, ch)) in chars.iter().enumerate().skip(1) {
            if !ch.is_uppercase() {
                continue;
            }
            let prev = chars[pos - 1].1;
            let next_lower = chars.get(pos + 1).is_some_and(|&(_, c)| c.is_lowercase());
            if !prev.is_uppercase() || next_lower {
                out.push(&segment[start..at]);
                start = at;
            }
        }
        out.push(&segment[start..]);
    }
    out
}

/// Converts a snake_case key to camelCase (`old_filepath` -> `oldFilepath`).
///
/// Every word is lowercased before the join, so capitals in the input are
/// normalised (`URL` -> `url`, `HTTP_code` -> `httpCode`). The output is a
/// fixed point of `camel_to_snake` followed by `snake_to_camel`. Leading
/// underscores are kept.
pub fn snake_to_camel(key: &str) -> String {
    let rest = key.trim_start_matches('_');
    let mut out = String::with_capacity(key.len());
    out.push_str(&key[..key.len() - rest.len()]);

    for (i, word) in words(rest).into_iter().enumerate() {
        let lower = word.to_lowercase();
        let mut chars = lower.chars();
        if i > 0 {
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
            }
        }
        out.extend(chars);
    }
    out
}

/// Converts a camelCase key to snake_case (`oldFilepath` -> `old_filepath`).
pub fn camel_to_snake(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, ch) in key.chars().enumerate() {
        if ch.is_uppercase() {
            if i > 0 && !out.ends_with('_') {
                out.push('_');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// Rewrites every object key in `value` with `rename`, descending into
/// nested objects and arrays.
pub fn translate_keys(value: Value, rename: fn(&str) -> String) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (rename(&k), translate_keys(v, rename)))
                .collect::<Map<String, Value>>(),
        ),
        Value::Array(items) => {
            Value::Array(items.into_iter().map(|v| translate_keys(v, rename)).collect())
        }
        other => other,
    }
}

fn is_metadata(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some("metadata")
}

/// Decodes JSONL lines into samples and metadata.
///
/// Blank lines are skipped. The first metadata line wins; later ones are
/// ignored. Any line that is not valid JSON, or does not decode into the
/// record it was classified as, aborts the whole decode with
/// [`StudioError::Parse`] carrying the line's 1-based ordinal.
///
/// # Errors
///
/// Returns `StudioError::Parse` on the first bad line.
pub fn decode<I, L>(lines: I) -> Result<Decoded, StudioError>
where
    I: IntoIterator<Item = L>,
    L: AsRef<[u8]>,
{
    let mut decoded = Decoded::default();

    for (ordinal, line) in lines.into_iter().enumerate() {
        let line_no = ordinal + 1;
        let raw = line.as_ref().trim_ascii();
        if raw.is_empty() {
            continue;
        }

        let parse = |source| StudioError::Parse { line: line_no, source };
        let value: Value = serde_json::from_slice(raw).map_err(parse)?;
        let value = translate_keys(value, snake_to_camel);

        if is_metadata(&value) {
            if decoded.metadata.is_some() {
                debug!(line = line_no, "ignoring repeated metadata line");
                continue;
            }
            decoded.metadata = Some(serde_json::from_value(value).map_err(parse)?);
        } else {
            decoded.samples.push(serde_json::from_value(value).map_err(parse)?);
        }
    }

    Ok(decoded)
}

/// Decodes a whole JSONL document held in memory.
///
/// # Errors
///
/// Returns `StudioError::Parse` on the first bad line.
pub fn decode_bytes(bytes: &[u8]) -> Result<Decoded, StudioError> {
    decode(bytes.split(|b| *b == b'\n'))
}

fn encode_record<T: serde::Serialize>(record: &T) -> Result<String, StudioError> {
    let value = serde_json::to_value(record).map_err(StudioError::Encode)?;
    serde_json::to_string(&translate_keys(value, camel_to_snake)).map_err(StudioError::Encode)
}

/// Encodes metadata and samples as JSONL lines, metadata first.
///
/// `decode(encode(m, s))` yields `m` and `s` back unchanged.
///
/// # Errors
///
/// Returns `StudioError::Encode` if a record fails to serialize.
pub fn encode(metadata: &Metadata, samples: &[Sample]) -> Result<Vec<String>, StudioError> {
    let mut lines = Vec::with_capacity(samples.len() + 1);
    lines.push(encode_record(metadata)?);
    for sample in samples {
        lines.push(encode_record(sample)?);
    }
    Ok(lines)
}

/// Encodes a full JSONL document, newline-terminated.
///
/// # Errors
///
/// Returns `StudioError::Encode` if a record fails to serialize.
pub fn encode_bytes(metadata: &Metadata, samples: &[Sample]) -> Result<Vec<u8>, StudioError> {
    let mut out = Vec::new();
    for line in encode(metadata, samples)? {
        out.extend_from_slice(line.as_bytes());
        out.push(b'\n');
    }
    Ok(out)
}
