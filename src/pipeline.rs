//! Feature derivation over a whole table

use crate::error::Result;
use crate::model::{Features, GameRecord};
use crate::table::{GameRow, GameTable, OutputLayout};
use csv::{StringRecord, Writer};
use rayon::prelude::*;
use std::io::Write;
use std::path::Path;

/// A game together with its derived features
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedGame {
    pub row: GameRow,
    pub features: Features,
}

impl DerivedGame {
    pub fn game(&self) -> &GameRecord {
        &self.row.game
    }
}

/// The augmented table: every source row, in source order, with features
#[derive(Debug, Clone)]
pub struct DerivedTable {
    pub headers: StringRecord,
    pub games: Vec<DerivedGame>,
    /// Carried over from the source table
    pub duplicates_dropped: usize,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DerivedGame> {
        self.games.iter()
    }

    /// Header row of the written table
    pub fn output_headers(&self) -> StringRecord {
        OutputLayout::new(&self.headers).headers
    }

    /// Write the table as CSV: source columns, then the derived columns
    pub fn write_csv<W: Write>(&self, dest: W) -> Result<()> {
        let layout = OutputLayout::new(&self.headers);
        let mut writer = Writer::from_writer(dest);
        writer.write_record(&layout.headers)?;

        for derived in &self.games {
            writer.write_record(&layout.row(&derived.row.raw, &derived.features))?;
        }

        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_file(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)?;
        log::info!("Wrote {} rows to {}", self.len(), path.display());
        Ok(())
    }
}

/// Derive features for every row of a table.
///
/// Rows are processed in parallel but gathered in source order. If any row
/// has a malformed increment code the whole derivation fails, reporting the
/// first such row.
pub fn derive(table: GameTable) -> Result<DerivedTable> {
    let results: Vec<Result<Features>> = table
        .rows
        .par_iter()
        .map(|row| Features::derive(&row.game))
        .collect();

    let mut games = Vec::with_capacity(table.rows.len());
    for (row, result) in table.rows.into_iter().zip(results) {
        let features = result.map_err(|e| {
            log::warn!("Row {}: {}", row.source_row, e);
            e.at_row(row.source_row)
        })?;
        games.push(DerivedGame { row, features });
    }

    log::info!("Derived features for {} games", games.len());

    Ok(DerivedTable {
        headers: table.headers,
        games,
        duplicates_dropped: table.duplicates_dropped,
    })
}
