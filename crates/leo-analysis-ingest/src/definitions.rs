use indexmap::IndexMap;
use leo_analysis_abstract::{
    IngestProgress, NoProgress, ProgressObserver, SeriesDescriptor, SeriesId, StopHandle,
};
use serde::Serialize;
use std::io::{self, BufRead};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::lines::{Line, LineReader, VectorLine, parse_vector_line};
use crate::pace::Pace;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DefinitionStats {
    /// Lines consumed before the first data line.
    pub lines_scanned: u64,
    /// Valid `vector` lines, duplicates included.
    pub definitions: u64,
    /// `vector` lines skipped for arity or a non-integer id.
    pub malformed: u64,
    /// Definitions that replaced an earlier one with the same id.
    pub duplicates: u64,
    /// Header lines that were not valid UTF-8.
    pub undecodable: u64,
}

/// Series declared in the header of a vector file, in file order.
#[derive(Debug, Clone, Default)]
pub struct DefinitionCatalog {
    descriptors: IndexMap<SeriesId, SeriesDescriptor>,
    pub stats: DefinitionStats,
}

impl DefinitionCatalog {
    pub fn get(&self, id: SeriesId) -> Option<&SeriesDescriptor> {
        self.descriptors.get(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesDescriptor> {
        self.descriptors.values()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub(crate) fn into_descriptors(self) -> IndexMap<SeriesId, SeriesDescriptor> {
        self.descriptors
    }

    fn register(&mut self, descriptor: SeriesDescriptor) {
        self.stats.definitions += 1;
        let id = descriptor.id;
        if let Some(previous) = self.descriptors.insert(id, descriptor) {
            self.stats.duplicates += 1;
            warn!(
                "Vector id {} declared twice; replacing {} {}",
                id, previous.entity, previous.name
            );
        }
    }
}

/// Read definitions up to the first data line, which is pushed back onto
/// `lines` for the sampling engine. Assumes every definition precedes every
/// data line; the engine picks up any that do not.
///
/// Each header line goes through `pace`; a stop request ends the scan with
/// the definitions read so far.
pub(crate) fn scan_definitions<R, O>(
    lines: &mut LineReader<R>,
    pace: &mut Pace<'_, O>,
) -> io::Result<DefinitionCatalog>
where
    R: BufRead,
    O: ProgressObserver + ?Sized,
{
    let mut catalog = DefinitionCatalog::default();
    let mut reached_data = false;

    while !pace.stop_requested() {
        let Some(line) = lines.next_line()? else {
            break;
        };
        match line {
            Line::Text(text) => match parse_vector_line(text) {
                VectorLine::Definition(descriptor) => catalog.register(descriptor),
                VectorLine::MalformedDefinition => {
                    catalog.stats.malformed += 1;
                    debug!("Skipping malformed vector definition: {:?}", text);
                }
                parsed if parsed.is_data_shaped() => {
                    lines.unread();
                    reached_data = true;
                    break;
                }
                _ => {}
            },
            Line::Undecodable => {
                catalog.stats.undecodable += 1;
                debug!("Skipping undecodable header line {}", lines.lines_read());
            }
        }
        pace.line_done(IngestProgress {
            lines_read: lines.lines_read(),
            records_accepted: 0,
            series_seen: catalog.len(),
        });
    }

    // The pushed-back data line belongs to the sampling pass.
    catalog.stats.lines_scanned = lines.lines_read() - u64::from(reached_data);
    info!("Found {} vector definitions", catalog.len());
    Ok(catalog)
}

/// Scan only the definition header of a vector stream.
pub fn scan_vector_definitions<R: BufRead>(reader: R) -> Result<DefinitionCatalog> {
    let mut lines = LineReader::new(reader);
    let stop = StopHandle::new();
    let mut observer = NoProgress;
    let mut pace = Pace::new(0, &mut observer, &stop);
    Ok(scan_definitions(&mut lines, &mut pace)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "\
version 2
run TurkeyCoverage-0
vector 0 LEONetwork.istanbul endToEndDelay ETV
vector 1 LEONetwork.sivas endToEndDelay ETV
vector 2 LEONetwork.sat[0] hopCount ETV
0\t12\t0.5\t0.031
vector 3 LEONetwork.sat[1] hopCount ETV
";

    #[test]
    fn test_scan_stops_at_first_data_line() {
        let catalog = scan_vector_definitions(Cursor::new(HEADER)).unwrap();
        let ids: Vec<SeriesId> = catalog.iter().map(|d| d.id).collect();
        assert_eq!(ids, [0, 1, 2]);
        assert_eq!(catalog.get(2).unwrap().name, "hopCount");
        assert!(catalog.get(3).is_none());
        assert_eq!(catalog.stats.lines_scanned, 5);
    }

    #[test]
    fn test_scan_pushes_back_data_line() {
        let mut lines = LineReader::new(Cursor::new(HEADER));
        let stop = StopHandle::new();
        scan_definitions(&mut lines, &mut Pace::new(0, &mut NoProgress, &stop)).unwrap();
        match lines.next_line().unwrap() {
            Some(Line::Text(text)) => assert_eq!(text, "0\t12\t0.5\t0.031"),
            _ => panic!("expected the first data line"),
        }
    }

    #[test]
    fn test_malformed_and_duplicate_definitions() {
        let input = "\
vector 0 A delay
vector nope B delay
vector 1 C
vector 0 D delay
";
        let catalog = scan_vector_definitions(Cursor::new(input)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(0).unwrap().entity, "D");
        assert_eq!(catalog.stats.malformed, 2);
        assert_eq!(catalog.stats.duplicates, 1);
        assert_eq!(catalog.stats.lines_scanned, 4);
    }

    #[test]
    fn test_undecodable_header_lines_are_counted() {
        let bytes: &[u8] = b"version 2\n\xff\xfe\nvector 0 A delay\n0 1 0.1 1\n";
        let catalog = scan_vector_definitions(Cursor::new(bytes)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.stats.undecodable, 1);
        assert_eq!(catalog.stats.lines_scanned, 3);
    }

    #[test]
    fn test_empty_stream_yields_empty_catalog() {
        let catalog = scan_vector_definitions(Cursor::new("")).unwrap();
        assert!(catalog.is_empty());
    }
}
