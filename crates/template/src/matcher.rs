//! Record extraction.
//!
//! Records are matched back to back from the start of the text.  For one
//! record the matcher tries windows that end just after each occurrence of
//! the schema's terminator, earliest first, so a greedy multi-line field can
//! never run into the next record.  Windows ending before the earliest place
//! every field boundary could fit are skipped.  Inside a window, fields are assigned by
//! backtracking: single-line fields try the nearest trailing boundary first,
//! multi-line fields the farthest.

use tracing::warn;

use crate::marker::LineMode;
use crate::record::{FieldValue, Record};
use crate::schema::{Schema, Segment};

pub(crate) fn parse_records(schema: &Schema, text: &str) -> Vec<Record> {
    let mut records = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        match match_record(schema, text, pos) {
            Some((record, end)) if end > pos => {
                records.push(record);
                pos = end;
            }
            _ => break,
        }
    }

    let tail = &text[pos..];
    if !tail.trim().is_empty() {
        warn!(
            offset = pos,
            unparsed_bytes = tail.len(),
            records = records.len(),
            "text after the last matching record was ignored"
        );
    }
    records
}

fn match_record(schema: &Schema, text: &str, pos: usize) -> Option<(Record, usize)> {
    if !text[pos..].starts_with(schema.lead()) {
        return None;
    }
    let body_start = pos + schema.lead().len();
    let terminator = schema.terminator();

    if terminator.is_empty() {
        let record = assign(schema.segments(), text, body_start, text.len())?;
        return Some((record, text.len()));
    }

    let mut search = last_field_start(schema.segments(), text, body_start)?;
    while search <= text.len() {
        let Some(found) = text[search..].find(terminator) else {
            break;
        };
        let term_start = search + found;
        if let Some(record) = assign(schema.segments(), text, body_start, term_start) {
            return Some((record, term_start + terminator.len()));
        }
        search = term_start + next_char_len(text, term_start);
    }
    None
}

/// Where the last field starts when every boundary takes its nearest
/// occurrence.  No assignment can place the terminator earlier.
fn last_field_start(segments: &[Segment], text: &str, start: usize) -> Option<usize> {
    let mut cursor = start;
    if let Some((_, inner)) = segments.split_last() {
        for segment in inner {
            let found = text[cursor..].find(segment.trailing.as_str())?;
            cursor += found + segment.trailing.len();
        }
    }
    Some(cursor)
}

/// Assigns every field a span inside `[start, end)`; `end` is where the
/// terminator begins.
fn assign(segments: &[Segment], text: &str, start: usize, end: usize) -> Option<Record> {
    let mut spans = Vec::with_capacity(segments.len());
    if !fill(segments, text, 0, start, end, &mut spans) {
        return None;
    }

    let mut record = Record::new();
    for (segment, (from, to)) in segments.iter().zip(spans) {
        record.set(
            segment.field.name.clone(),
            FieldValue::Text(text[from..to].to_string()),
        );
    }
    Some(record)
}

fn fill(
    segments: &[Segment],
    text: &str,
    index: usize,
    cursor: usize,
    end: usize,
    spans: &mut Vec<(usize, usize)>,
) -> bool {
    if cursor > end {
        return false;
    }
    let segment = &segments[index];

    // The last field always runs up to the terminator.
    if index + 1 == segments.len() {
        spans.push((cursor, end));
        return true;
    }

    let boundary = segment.trailing.as_str();
    for value_end in candidate_ends(text, cursor, end, boundary, segment.field.mode) {
        spans.push((cursor, value_end));
        if fill(segments, text, index + 1, value_end + boundary.len(), end, spans) {
            return true;
        }
        spans.pop();
    }
    false
}

/// Offsets in `[cursor, end]` where `boundary` starts and still fits before
/// `end`, ordered by the field's preference.
fn candidate_ends(
    text: &str,
    cursor: usize,
    end: usize,
    boundary: &str,
    mode: LineMode,
) -> Vec<usize> {
    let Some(last_start) = end.checked_sub(boundary.len()) else {
        return Vec::new();
    };

    let mut offsets = Vec::new();
    if boundary.is_empty() {
        offsets.extend((cursor..=end).filter(|&at| text.is_char_boundary(at)));
    } else {
        // Overlapping occurrences count, so the search restarts one char later.
        let mut from = cursor;
        while from <= last_start {
            let Some(found) = text[from..end].find(boundary) else {
                break;
            };
            let at = from + found;
            offsets.push(at);
            from = at + next_char_len(text, at);
        }
    }

    if mode == LineMode::Multi {
        offsets.reverse();
    }
    offsets
}

fn next_char_len(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use crate::defaults::{DEFAULT_BASE_TEMPLATE, DEFAULT_INTERFACE_TEMPLATE};
    use crate::record::{ParseResult, Record};
    use crate::schema::Schema;

    fn note(name: &str, tags: &str, text: &str) -> Record {
        Record::new()
            .with("name", name)
            .with("tags", tags)
            .with("text", text)
    }

    #[test]
    fn single_record_round_trips_unwrapped() {
        let schema = Schema::compile(DEFAULT_BASE_TEMPLATE).unwrap();
        let record = note("go", "lang", "a language\nwith goroutines");
        let text = schema.stringify(&record);
        assert_eq!(schema.parse(&text), ParseResult::One(record));
    }

    #[test]
    fn many_records_round_trip_in_order() {
        let schema = Schema::compile(DEFAULT_BASE_TEMPLATE).unwrap();
        let base = vec![
            note("go", "", "lang"),
            note("goroutine", "go", "concurrency primitive"),
            note("", "misc, inbox", "unnamed\n\nwith a blank line"),
        ];
        let text = schema.stringify_all(&base);
        assert_eq!(schema.parse(&text), ParseResult::Many(base));
    }

    #[test]
    fn non_conforming_text_is_empty() {
        let schema = Schema::compile(DEFAULT_BASE_TEMPLATE).unwrap();
        assert_eq!(schema.parse("no separators here"), ParseResult::Empty);
        assert_eq!(schema.parse(""), ParseResult::Empty);
    }

    #[test]
    fn multiline_field_keeps_preceding_delimiter() {
        let schema = Schema::compile("<><title>: <m><body>;\n").unwrap();
        let parsed = schema.parse("todo: buy: milk; eggs;\n");
        let ParseResult::One(record) = parsed else {
            panic!("expected one record");
        };
        assert_eq!(record.text("title"), "todo");
        assert_eq!(record.text("body"), "buy: milk; eggs");
    }

    #[test]
    fn multiline_field_is_greedy_up_to_the_last_boundary() {
        let schema = Schema::compile("<><a>\n<m><body>\n--\n<><b>\n==\n").unwrap();
        let text = "x\nfirst\n--\nsecond\n--\ny\n==\nz\nthird\n--\nw\n==\n";
        let records = schema.parse(text).into_vec();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].text("body"), "first\n--\nsecond");
        assert_eq!(records[0].text("b"), "y");
        assert_eq!(records[1].text("a"), "z");
        assert_eq!(records[1].text("body"), "third");
    }

    #[test]
    fn single_line_field_is_lazy() {
        let schema = Schema::compile("<><key>=<><value>\n").unwrap();
        let ParseResult::One(record) = schema.parse("a=b=c\n") else {
            panic!("expected one record");
        };
        assert_eq!(record.text("key"), "a");
        assert_eq!(record.text("value"), "b=c");
    }

    #[test]
    fn interface_text_with_many_lines_parses_as_one_record() {
        let schema = Schema::compile(DEFAULT_INTERFACE_TEMPLATE).unwrap();
        let record = Record::new()
            .with("text", "first line\nsecond line\n\nthird")
            .with("name", "rust")
            .with("tags", "lang, systems")
            .with("command", "add\nNEW RECORD NAMED \"rust\"\nWAS PUSHED TO BASE")
            .with("tags_used", "lang, systems");
        let text = schema.stringify(&record);
        assert_eq!(schema.parse(&text), ParseResult::One(record));
    }

    #[test]
    fn broken_interface_is_detected() {
        let schema = Schema::compile(DEFAULT_INTERFACE_TEMPLATE).unwrap();
        let text = schema.stringify(&schema.defaults());
        let damaged = text.replace("== name ==", "== nmae ==");
        assert_eq!(schema.parse(&damaged), ParseResult::Empty);
    }

    #[test]
    fn trailing_garbage_keeps_leading_records() {
        let schema = Schema::compile(DEFAULT_BASE_TEMPLATE).unwrap();
        let mut text = schema.stringify(&note("a", "", "alpha"));
        text.push_str("dangling text without separator");
        assert_eq!(schema.parse(&text).len(), 1);
    }

    #[test]
    fn lead_literal_must_match() {
        let schema = Schema::compile("# <><name>\n").unwrap();
        assert_eq!(schema.parse("# one\n# two\n").len(), 2);
        assert!(schema.parse("one\n").is_empty());
    }

    #[test]
    fn long_interface_text_parses_in_one_pass() {
        let schema = Schema::compile(DEFAULT_INTERFACE_TEMPLATE).unwrap();
        let body = (0..20_000)
            .map(|line| format!("- node number {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        let record = Record::new()
            .with("text", body)
            .with("name", "")
            .with("tags", "")
            .with("command", "tree\n20000 ROWS")
            .with("tags_used", "any tag");
        let text = schema.stringify(&record);

        let started = Instant::now();
        let parsed = schema.parse(&text);
        assert!(
            started.elapsed() < Duration::from_secs(2),
            "parse took {:?}",
            started.elapsed()
        );
        assert_eq!(parsed, ParseResult::One(record));
    }

    #[test]
    fn overlapping_boundaries_are_all_candidates() {
        let schema = Schema::compile("<><a>==<><b>\n").unwrap();
        let ParseResult::One(record) = schema.parse("x===y\n") else {
            panic!("expected one record");
        };
        assert_eq!(record.text("a"), "x");
        assert_eq!(record.text("b"), "=y");
    }

    #[test]
    fn handles_multibyte_text() {
        let schema = Schema::compile(DEFAULT_BASE_TEMPLATE).unwrap();
        let record = note("заметка", "тег", "текст — с тире\nи ещё строка");
        let text = schema.stringify(&record);
        assert_eq!(schema.parse(&text), ParseResult::One(record));
    }
}
