use leo_analysis_abstract::{ScalarTable, ScalarTableBuilder};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{IngestError, Result};
use crate::lines::{Line, LineReader, ScalarLine, parse_scalar};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScalarParseStats {
    pub lines_read: u64,
    /// `scalar` lines that were stored.
    pub records: u64,
    /// `scalar` lines skipped for arity or a non-numeric value.
    pub malformed: u64,
    /// Stored records that replaced an earlier value for the same pair.
    pub overwritten: u64,
}

#[derive(Debug, Clone)]
pub struct ScalarIngest {
    pub table: ScalarTable,
    pub stats: ScalarParseStats,
}

/// Parse every `scalar` line of `reader`. Only read failures are errors.
pub fn parse_scalars<R: BufRead>(reader: R) -> Result<ScalarIngest> {
    let mut lines = LineReader::new(reader);
    let mut builder = ScalarTableBuilder::new();
    let mut stats = ScalarParseStats::default();

    while let Some(line) = lines.next_line()? {
        let Line::Text(text) = line else {
            continue;
        };
        match parse_scalar(text) {
            ScalarLine::Record {
                entity,
                statistic,
                value,
            } => {
                stats.records += 1;
                if builder.record(entity, statistic, value) {
                    stats.overwritten += 1;
                }
            }
            ScalarLine::Malformed => {
                stats.malformed += 1;
                debug!("Skipping malformed scalar line: {:?}", text);
            }
            ScalarLine::Other => {}
        }
    }
    stats.lines_read = lines.lines_read();

    let table = builder.finish();
    info!(
        "Found {} modules with scalar data ({} records, {} skipped)",
        table.len(),
        stats.records,
        stats.malformed
    );
    Ok(ScalarIngest { table, stats })
}

/// Open `path` and parse it with [`parse_scalars`].
pub fn parse_scalar_file(path: &Path) -> Result<ScalarIngest> {
    info!("Parsing scalar file: {}", path.display());
    let file = File::open(path).map_err(|source| IngestError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scalars(BufReader::new(file)).map_err(|e| e.with_path(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
version 2
run TurkeyCoverage-0-20240101
attr configname TurkeyCoverage
scalar LEONetwork.istanbul Throughput_bps 2500000
scalar LEONetwork.istanbul PacketsReceived 900
scalar LEONetwork.istanbul PacketsSent 1000
scalar LEONetwork.istanbul PacketsDropped 25
scalar LEONetwork.sat[0] PacketsForwarded 4000
";

    #[test]
    fn test_parse_scalars_builds_table() {
        let ingest = parse_scalars(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(ingest.table.len(), 2);
        assert_eq!(
            ingest.table.get("LEONetwork.istanbul", "PacketsSent"),
            Some(1000.0)
        );
        assert_eq!(
            ingest.table.get("LEONetwork.sat[0]", "PacketsForwarded"),
            Some(4000.0)
        );
        assert_eq!(ingest.stats.records, 5);
        assert_eq!(ingest.stats.lines_read, 8);
    }

    #[test]
    fn test_duplicate_pair_last_wins() {
        let ingest = parse_scalars(Cursor::new("scalar A x 1.0\nscalar A x 2.0\n")).unwrap();
        assert_eq!(ingest.table.get("A", "x"), Some(2.0));
        assert_eq!(ingest.stats.overwritten, 1);
        assert_eq!(ingest.table.value_count(), 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let input = "scalar A x 1\nscalar A\nscalar A y nope\nscalar B z 3\n";
        let ingest = parse_scalars(Cursor::new(input)).unwrap();
        assert_eq!(ingest.stats.malformed, 2);
        assert_eq!(ingest.table.get("A", "x"), Some(1.0));
        assert_eq!(ingest.table.get("A", "y"), None);
        assert_eq!(ingest.table.get("B", "z"), Some(3.0));
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let ingest = parse_scalars(Cursor::new("version 2\n")).unwrap();
        assert!(ingest.table.is_empty());
        assert_eq!(ingest.stats.records, 0);
    }

    #[test]
    fn test_parsing_twice_is_identical() {
        let first = parse_scalars(Cursor::new(SAMPLE)).unwrap();
        let second = parse_scalars(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(first.table, second.table);
        assert_eq!(first.stats, second.stats);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let err = parse_scalar_file(Path::new("/definitely/not/here.sca")).unwrap_err();
        assert!(matches!(err, IngestError::Open { .. }));
        assert!(err.to_string().contains("here.sca"));
    }
}
