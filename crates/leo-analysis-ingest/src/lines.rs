//! Line source and record tokenizers shared by the scalar parser, the
//! definition scanner and the sampling engine.

use leo_analysis_abstract::{SamplePoint, SeriesDescriptor, SeriesId};
use std::io::{self, BufRead};

pub(crate) enum Line<'a> {
    Text(&'a str),
    /// Bytes that are not valid UTF-8.
    Undecodable,
}

/// Reads one line at a time into a reused buffer, with single-line push-back.
pub(crate) struct LineReader<R> {
    inner: R,
    buf: Vec<u8>,
    lines_read: u64,
    replay: bool,
}

impl<R: BufRead> LineReader<R> {
    pub(crate) fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
            lines_read: 0,
            replay: false,
        }
    }

    pub(crate) fn next_line(&mut self) -> io::Result<Option<Line<'_>>> {
        if self.replay {
            self.replay = false;
        } else {
            self.buf.clear();
            if self.inner.read_until(b'\n', &mut self.buf)? == 0 {
                return Ok(None);
            }
            self.lines_read += 1;
        }

        Ok(Some(match std::str::from_utf8(&self.buf) {
            Ok(text) => Line::Text(text.trim_end_matches(['\n', '\r'])),
            Err(_) => Line::Undecodable,
        }))
    }

    /// Hand the line just returned by `next_line` out again on the next call.
    pub(crate) fn unread(&mut self) {
        debug_assert!(!self.replay, "only one line can be pushed back");
        self.replay = true;
    }

    /// Physical lines consumed from the stream; a replayed line counts once.
    pub(crate) fn lines_read(&self) -> u64 {
        self.lines_read
    }
}

/// Whitespace separated fields; a field opening with `"` runs to the next `"`.
pub(crate) struct Fields<'a> {
    rest: &'a str,
}

impl<'a> Fields<'a> {
    pub(crate) fn new(line: &'a str) -> Self {
        Self { rest: line }
    }
}

impl<'a> Iterator for Fields<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let rest = self.rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if rest.is_empty() {
            self.rest = rest;
            return None;
        }

        if let Some(quoted) = rest.strip_prefix('"') {
            return match quoted.find('"') {
                Some(end) => {
                    self.rest = &quoted[end + 1..];
                    Some(&quoted[..end])
                }
                None => {
                    self.rest = "";
                    Some(quoted)
                }
            };
        }

        let end = rest
            .find(|c: char| c.is_ascii_whitespace())
            .unwrap_or(rest.len());
        self.rest = &rest[end..];
        Some(&rest[..end])
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum ScalarLine<'a> {
    Record {
        entity: &'a str,
        statistic: &'a str,
        value: f64,
    },
    Malformed,
    Other,
}

/// `scalar <entity> <statistic> <value>`
pub(crate) fn parse_scalar(line: &str) -> ScalarLine<'_> {
    let mut fields = Fields::new(line);
    if fields.next() != Some("scalar") {
        return ScalarLine::Other;
    }
    let (Some(entity), Some(statistic), Some(raw)) = (fields.next(), fields.next(), fields.next())
    else {
        return ScalarLine::Malformed;
    };
    match raw.parse::<f64>() {
        Ok(value) => ScalarLine::Record {
            entity,
            statistic,
            value,
        },
        Err(_) => ScalarLine::Malformed,
    }
}

/// One `<id> <eventNumber> <timestamp> <value>` line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DataRecord {
    pub(crate) id: SeriesId,
    pub(crate) event: u64,
    pub(crate) point: SamplePoint,
}

#[derive(Debug, PartialEq)]
pub(crate) enum VectorLine {
    Definition(SeriesDescriptor),
    Data(DataRecord),
    MalformedDefinition,
    MalformedData,
    Other,
}

impl VectorLine {
    pub(crate) fn is_data_shaped(&self) -> bool {
        matches!(self, VectorLine::Data(_) | VectorLine::MalformedData)
    }
}

pub(crate) fn parse_vector_line(line: &str) -> VectorLine {
    if line.starts_with(|c: char| c.is_ascii_digit()) {
        return match parse_data(line) {
            Some(record) => VectorLine::Data(record),
            None => VectorLine::MalformedData,
        };
    }

    let mut fields = Fields::new(line);
    if fields.next() != Some("vector") {
        return VectorLine::Other;
    }
    let (Some(id), Some(entity), Some(name)) = (fields.next(), fields.next(), fields.next()) else {
        return VectorLine::MalformedDefinition;
    };
    match id.parse::<SeriesId>() {
        Ok(id) => VectorLine::Definition(SeriesDescriptor::new(id, entity, name)),
        Err(_) => VectorLine::MalformedDefinition,
    }
}

fn parse_data(line: &str) -> Option<DataRecord> {
    let mut fields = line.split_ascii_whitespace();
    let id = fields.next()?.parse().ok()?;
    let event = fields.next()?.parse().ok()?;
    let timestamp = fields.next()?.parse().ok()?;
    let value = fields.next()?.parse().ok()?;
    Some(DataRecord {
        id,
        event,
        point: SamplePoint::new(timestamp, value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect_text<R: BufRead>(reader: &mut LineReader<R>) -> Vec<String> {
        let mut out = Vec::new();
        while let Some(line) = reader.next_line().unwrap() {
            match line {
                Line::Text(text) => out.push(text.to_string()),
                Line::Undecodable => out.push("<undecodable>".to_string()),
            }
        }
        out
    }

    #[test]
    fn test_reader_strips_line_endings() {
        let mut reader = LineReader::new(Cursor::new("a\r\nb\n\nc"));
        assert_eq!(collect_text(&mut reader), ["a", "b", "", "c"]);
        assert_eq!(reader.lines_read(), 4);
    }

    #[test]
    fn test_reader_unread_replays_without_recounting() {
        let mut reader = LineReader::new(Cursor::new("first\nsecond\n"));
        assert!(matches!(reader.next_line().unwrap(), Some(Line::Text("first"))));
        reader.unread();
        assert!(matches!(reader.next_line().unwrap(), Some(Line::Text("first"))));
        assert!(matches!(reader.next_line().unwrap(), Some(Line::Text("second"))));
        assert_eq!(reader.lines_read(), 2);
        assert!(reader.next_line().unwrap().is_none());
    }

    #[test]
    fn test_reader_flags_invalid_utf8() {
        let bytes: &[u8] = b"ok\n\xff\xfe\nok again\n";
        let mut reader = LineReader::new(Cursor::new(bytes));
        assert_eq!(collect_text(&mut reader), ["ok", "<undecodable>", "ok again"]);
    }

    #[test]
    fn test_fields_honour_quotes() {
        let fields: Vec<&str> =
            Fields::new("vector 3  LEONetwork.sat[1] \"hop count\"\tETV").collect();
        assert_eq!(fields, ["vector", "3", "LEONetwork.sat[1]", "hop count", "ETV"]);

        let unterminated: Vec<&str> = Fields::new("a \"b c").collect();
        assert_eq!(unterminated, ["a", "b c"]);
    }

    #[test]
    fn test_parse_scalar_shapes() {
        assert_eq!(
            parse_scalar("scalar LEONetwork.istanbul PacketsSent 1200"),
            ScalarLine::Record {
                entity: "LEONetwork.istanbul",
                statistic: "PacketsSent",
                value: 1200.0
            }
        );
        assert_eq!(
            parse_scalar("  scalar A x -1.5e3"),
            ScalarLine::Record {
                entity: "A",
                statistic: "x",
                value: -1500.0
            }
        );
        assert_eq!(parse_scalar("scalar A x"), ScalarLine::Malformed);
        assert_eq!(parse_scalar("scalar A x abc"), ScalarLine::Malformed);
        assert_eq!(parse_scalar("attr configname General"), ScalarLine::Other);
        assert_eq!(parse_scalar("scalars A x 1"), ScalarLine::Other);
        assert_eq!(parse_scalar(""), ScalarLine::Other);
    }

    #[test]
    fn test_parse_vector_definitions() {
        assert_eq!(
            parse_vector_line("vector 7 LEONetwork.istanbul endToEndDelay ETV"),
            VectorLine::Definition(SeriesDescriptor::new(
                7,
                "LEONetwork.istanbul",
                "endToEndDelay"
            ))
        );
        assert_eq!(
            parse_vector_line("vector x LEONetwork.istanbul endToEndDelay"),
            VectorLine::MalformedDefinition
        );
        assert_eq!(
            parse_vector_line("vector 7 LEONetwork.istanbul"),
            VectorLine::MalformedDefinition
        );
        assert_eq!(parse_vector_line("version 2"), VectorLine::Other);
    }

    #[test]
    fn test_parse_vector_data() {
        assert_eq!(
            parse_vector_line("7\t15\t0.25\t0.031"),
            VectorLine::Data(DataRecord {
                id: 7,
                event: 15,
                point: SamplePoint::new(0.25, 0.031),
            })
        );
        assert_eq!(parse_vector_line("7 15 0.25"), VectorLine::MalformedData);
        assert_eq!(parse_vector_line("7 15 abc 1"), VectorLine::MalformedData);
        assert_eq!(parse_vector_line("7 1.5 0.2 1"), VectorLine::MalformedData);
        assert_eq!(parse_vector_line("7x 15 0.2 1"), VectorLine::MalformedData);
        assert!(parse_vector_line("7 15 0.2").is_data_shaped());
    }
}
