//! Best-effort spec text parser — line-by-line classification.
//!
//! Recovers a structured mapping from spec text without a schema. Each line
//! is classified by syntactic cues alone (leading `%`, capitalization,
//! trailing digits, a plural `s` before the colon); anything that matches
//! no predicate is ignored, so malformed or hand-edited input never fails
//! to parse — it only under-extracts.

use crate::keys;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::LazyLock;

// A block header is a bare lowercase word after the sigil. `%setup -q`
// inside a body is NOT a header: anchoring the whole line keeps block
// bodies containing macro invocations from being truncated.
static RE_BLOCK_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^%[a-z][a-z_]*$").unwrap());

// `Source0:`, `Patch12:` — letters then 1-2 digits immediately before the
// colon.
static RE_INDEXED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z]+[0-9]{1,2}:").unwrap());

// `Requires:`, `BuildRequires:` — key ends in `s` immediately before the
// colon.
static RE_LIST: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z][A-Za-z]+s:").unwrap());

/// One recovered entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParsedValue {
    /// Single `Key: value` line.
    Scalar(String),
    /// Merged separated-list line or accumulated indexed lines.
    List(Vec<String>),
    /// Block body lines, stored verbatim (blank lines skipped).
    Lines(Vec<String>),
}

/// Structured mapping recovered from spec text, in first-seen key order.
///
/// A separate type from [`crate::model::Spec`]: no pre-registered layout,
/// shape is inferred from the text alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSpec {
    entries: Vec<(String, ParsedValue)>,
}

impl ParsedSpec {
    pub fn get(&self, key: &str) -> Option<&ParsedValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParsedValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert or replace. A later entry under an existing key shadows the
    /// earlier value in place.
    fn insert(&mut self, key: String, value: ParsedValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }
}

impl Serialize for ParsedSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parse spec text into a [`ParsedSpec`] in one left-to-right pass.
///
/// Classification per line, first match wins: block header, indexed line,
/// separated-list line, scalar directive line; everything else (prose,
/// blanks, `#` comments) is skipped. Never fails.
pub fn parse(content: &str) -> ParsedSpec {
    let lines: Vec<&str> = content.trim().lines().collect();
    let mut spec = ParsedSpec::default();
    let mut idx = 0;

    while idx < lines.len() {
        let line = lines[idx];

        if is_block_header(line) {
            idx = consume_block(&mut spec, &lines, idx);
        } else if is_indexed_line(line) {
            idx = consume_indexed_run(&mut spec, &lines, idx);
        } else if is_list_line(line) {
            if let Some((key, value)) = split_directive(line) {
                if value.contains(' ') {
                    let items = value.split(' ').map(String::from).collect();
                    spec.insert(key, ParsedValue::List(items));
                } else {
                    spec.insert(key, ParsedValue::Scalar(value));
                }
            }
            idx += 1;
        } else if is_directive_line(line) {
            if let Some((key, value)) = split_directive(line) {
                spec.insert(key, ParsedValue::Scalar(value));
            }
            idx += 1;
        } else {
            idx += 1;
        }
    }

    spec
}

/// Collect a block body up to the next directive or header. Blank lines in
/// the span are skipped, not stored; a block left with no body lines is
/// dropped entirely.
fn consume_block(spec: &mut ParsedSpec, lines: &[&str], start: usize) -> usize {
    let key = lines[start][1..].to_string();
    let mut body = Vec::new();
    let mut idx = start + 1;
    while idx < lines.len() {
        let line = lines[idx];
        if is_block_header(line) || is_directive_line(line) {
            break;
        }
        if !line.trim().is_empty() {
            body.push(line.to_string());
        }
        idx += 1;
    }
    if !body.is_empty() {
        spec.insert(key, ParsedValue::Lines(body));
    }
    idx
}

/// Collect a contiguous run of indexed lines. Values accumulate under the
/// pluralized, digit-stripped key; a run mixing key stems collects each
/// stem separately. A later non-contiguous run under the same plural key
/// replaces the earlier collection — interleaved runs fragment and the
/// last fragment wins.
fn consume_indexed_run(spec: &mut ParsedSpec, lines: &[&str], start: usize) -> usize {
    let mut collected: Vec<(String, Vec<String>)> = Vec::new();
    let mut idx = start;
    while idx < lines.len() && is_indexed_line(lines[idx]) {
        if let Some((key, value)) = split_directive(lines[idx]) {
            let stem = key.trim_end_matches(|c: char| c.is_ascii_digit());
            let plural = keys::pluralize(stem);
            match collected.iter_mut().find(|(k, _)| *k == plural) {
                Some((_, items)) => items.push(value),
                None => collected.push((plural, vec![value])),
            }
        }
        idx += 1;
    }
    for (key, items) in collected {
        spec.insert(key, ParsedValue::List(items));
    }
    idx
}

fn is_directive_line(line: &str) -> bool {
    line.contains(':') && line.chars().next().is_some_and(char::is_uppercase)
}

fn is_block_header(line: &str) -> bool {
    RE_BLOCK_HEADER.is_match(line)
}

fn is_indexed_line(line: &str) -> bool {
    is_directive_line(line) && RE_INDEXED.is_match(line)
}

fn is_list_line(line: &str) -> bool {
    is_directive_line(line) && RE_LIST.is_match(line)
}

/// Split at the first colon: canonical key, trimmed value.
fn split_directive(line: &str) -> Option<(String, String)> {
    let (key, value) = line.split_once(':')?;
    Some((keys::canonical_key(key), value.trim().to_string()))
}
