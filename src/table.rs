//! Loading game tables from delimited text
//!
//! A `GameTable` keeps every source row twice: the raw CSV record, so that
//! untyped columns survive to the output untouched, and the typed
//! `GameRecord` read from it by header name.

use crate::error::{ExplorerError, Result};
use crate::model::{Features, GameRecord};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One source row
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    /// 1-based data row number in the source file, counting dropped duplicates
    pub source_row: usize,
    pub raw: StringRecord,
    pub game: GameRecord,
}

/// A deduplicated table of games, in source order
#[derive(Debug, Clone, Default)]
pub struct GameTable {
    pub headers: StringRecord,
    pub rows: Vec<GameRow>,
    /// Number of exact duplicate rows dropped while loading
    pub duplicates_dropped: usize,
}

impl GameTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Read a game table from a CSV file
pub fn read_games_file(path: &Path) -> Result<GameTable> {
    let file = File::open(path)?;
    log::info!("Reading games from {}", path.display());
    read_games(file)
}

/// Read a game table from any CSV source with a header row
pub fn read_games<R: Read>(source: R) -> Result<GameTable> {
    let mut reader = ReaderBuilder::new().from_reader(source);
    let headers = reader.headers()?.clone();
    check_required_columns(&headers)?;

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    let total = records.len();
    let records = drop_duplicates(records);
    let duplicates_dropped = total - records.len();
    if duplicates_dropped > 0 {
        log::info!("Dropped {} duplicate rows", duplicates_dropped);
    }

    let mut rows = Vec::with_capacity(records.len());
    for (row_idx, raw) in records.into_iter().enumerate() {
        // The header is record 0, so data records are already 1-based
        let source_row = raw
            .position()
            .map_or(row_idx + 1, |pos| pos.record() as usize);
        let game: GameRecord = raw
            .deserialize(Some(&headers))
            .map_err(|e| ExplorerError::from(e).at_row(source_row))?;
        rows.push(GameRow {
            source_row,
            raw,
            game,
        });
    }

    log::debug!("Loaded {} games with {} columns", rows.len(), headers.len());

    Ok(GameTable {
        headers,
        rows,
        duplicates_dropped,
    })
}

fn check_required_columns(headers: &StringRecord) -> Result<()> {
    for name in GameRecord::COLUMNS {
        if !headers.iter().any(|h| h == name) {
            return Err(ExplorerError::MissingColumn(name.to_string()));
        }
    }
    Ok(())
}

/// Keep the first occurrence of every record, comparing all fields
pub fn drop_duplicates(records: Vec<StringRecord>) -> Vec<StringRecord> {
    let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.iter().map(str::to_string).collect()))
        .collect()
}

/// Where the derived columns go in an output row.
///
/// A derived column already present in the source (a previously exported
/// table) is overwritten in place; the rest are appended.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    pub headers: StringRecord,
    positions: [Option<usize>; 5],
}

impl OutputLayout {
    pub fn new(source_headers: &StringRecord) -> Self {
        let mut headers = source_headers.clone();
        let positions = Features::COLUMNS.map(|name| source_headers.iter().position(|h| h == name));
        for (name, position) in Features::COLUMNS.iter().zip(positions) {
            if position.is_none() {
                headers.push_field(name);
            }
        }
        Self { headers, positions }
    }

    /// Build an output record from a source record and its derived values
    pub fn row(&self, raw: &StringRecord, features: &Features) -> StringRecord {
        let mut fields: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        for (value, position) in features.to_fields().into_iter().zip(self.positions) {
            match position {
                Some(idx) if idx < fields.len() => fields[idx] = value,
                _ => fields.push(value),
            }
        }
        StringRecord::from(fields)
    }
}
