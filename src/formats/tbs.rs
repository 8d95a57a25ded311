//! Extractor for The Business Standard election portal.
//!
//! The portal embeds the full results payload as one JSON object inside
//! a `<script>` tag, assigned to a settings key (`election2026`). The
//! payload has two top-level objects keyed by seat id: `constituencies`
//! (seat metadata plus an `election_results` object keyed by candidate
//! `diid`) and `candidates` (lists of candidate descriptors carrying
//! `diid`, `party` and a name under one of several keys).

use std::collections::HashMap;

use scraper::{Html, Selector};
use serde_json::Value;

use super::{Extraction, ExtractionError, ExtractionResult};
use crate::model::VoteRecord;

pub const DEFAULT_PAYLOAD_KEY: &str = "election2026";

/// Keys the portal has been seen using for a candidate's name.
const CANDIDATE_NAME_KEYS: [&str; 5] = [
    "candidate_name",
    "name",
    "candidate",
    "full_name",
    "candidateName",
];

/// Extract one `VoteRecord` per candidate entry in the document's
/// embedded payload. Entries missing a vote count or a party name are
/// skipped and counted; zero usable records is an error.
pub fn extract(document: &str, payload_key: &str) -> ExtractionResult<Extraction> {
    let payload = locate_payload(document, payload_key)?;
    let data: Value = serde_json::from_str(&payload)?;
    let (records, skipped) = walk_payload(&data);
    if records.is_empty() {
        return Err(ExtractionError::NoRecords { skipped });
    }
    Ok(Extraction { records, skipped })
}

/// Slice the payload object out of the document: find the script tag
/// mentioning the quoted key, then brace-match from the opening brace
/// after the key's colon.
fn locate_payload(document: &str, payload_key: &str) -> ExtractionResult<String> {
    let marker = format!("\"{}\"", payload_key);
    let script = find_script(document, &marker)
        .ok_or_else(|| ExtractionError::PayloadNotFound(payload_key.to_string()))?;
    // The marker is known to be present; the colon and brace may not be.
    let start = script
        .find(&marker)
        .ok_or_else(|| ExtractionError::PayloadNotFound(payload_key.to_string()))?;
    let colon = script[start..]
        .find(':')
        .map(|i| start + i)
        .ok_or(ExtractionError::UnterminatedPayload)?;
    let brace = script[colon..]
        .find('{')
        .map(|i| colon + i)
        .ok_or(ExtractionError::UnterminatedPayload)?;
    let end = object_end(&script, brace).ok_or(ExtractionError::UnterminatedPayload)?;
    Ok(script[brace..=end].to_string())
}

fn find_script(document: &str, marker: &str) -> Option<String> {
    let html = Html::parse_document(document);
    let selector = Selector::parse("script").unwrap();
    html.select(&selector)
        .map(|script| script.text().collect::<String>())
        .find(|text| text.contains(marker))
}

/// Byte offset of the brace closing the object opened at `start`.
/// String-aware: braces inside JSON string literals do not count.
fn object_end(s: &str, start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, &b) in s.as_bytes().iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn walk_payload(data: &Value) -> (Vec<VoteRecord>, usize) {
    let empty = serde_json::Map::new();
    let constituencies = data
        .get("constituencies")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let candidates_by_seat = data
        .get("candidates")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for (seat_id, seat_info) in constituencies {
        let seat_number = seat_info.get("seat_number").and_then(as_u32);
        let seat_name = seat_info
            .get("seat_name")
            .and_then(Value::as_str)
            .unwrap_or("")
            .trim()
            .to_string();
        // An empty list here means the seat has no results yet.
        let results = match seat_info.get("election_results").and_then(Value::as_object) {
            Some(map) => map,
            None => continue,
        };
        let candidates = candidate_lookup(candidates_by_seat.get(seat_id));
        for (diid, result) in results {
            let votes = match result.get("votes").and_then(Value::as_u64) {
                Some(v) => v,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let candidate = candidates.get(diid.as_str()).copied();
            let party = candidate
                .and_then(|c| c.get("party"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|p| !p.is_empty());
            let party = match party {
                Some(p) => p.to_string(),
                None => {
                    skipped += 1;
                    continue;
                }
            };
            records.push(VoteRecord {
                seat_id: seat_id.clone(),
                seat_number,
                seat_name: seat_name.clone(),
                party,
                candidate: candidate_name(candidate),
                votes,
            });
        }
    }
    (records, skipped)
}

/// Candidate descriptors for one seat, keyed by their `diid` rendered
/// as a string (the portal is inconsistent about number vs string).
fn candidate_lookup(list: Option<&Value>) -> HashMap<String, &Value> {
    let mut lookup = HashMap::new();
    if let Some(entries) = list.and_then(Value::as_array) {
        for entry in entries {
            if let Some(diid) = entry.get("diid").and_then(id_string) {
                lookup.insert(diid, entry);
            }
        }
    }
    lookup
}

fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn as_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn candidate_name(candidate: Option<&Value>) -> String {
    if let Some(c) = candidate {
        for key in CANDIDATE_NAME_KEYS {
            if let Some(name) = c.get(key).and_then(Value::as_str) {
                let name = name.trim();
                if !name.is_empty() {
                    return name.to_string();
                }
            }
        }
    }
    "Unknown".to_string()
}
