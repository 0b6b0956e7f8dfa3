use crate::error::Result;
use crate::pipeline::{DerivedGame, DerivedTable};
use crate::summary::{format_increment, Summary};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};
use std::path::Path;

/// Write a derived table to an Excel file: all games plus a summary sheet
pub fn write_derived_to_xlsx(table: &DerivedTable, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    let worksheet = workbook.add_worksheet();
    write_games_sheet(worksheet, table)?;

    let worksheet = workbook.add_worksheet();
    write_summary_sheet(worksheet, &Summary::new(table))?;

    workbook.save(path)?;
    log::info!("Wrote {} games to {}", table.len(), path.display());
    Ok(())
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_align(FormatAlign::Center)
        .set_border_bottom(FormatBorder::Thin)
}

/// A cell value taken from the typed record where the column is numeric
enum Cell<'a> {
    Number(f64),
    Text(&'a str),
}

fn cell<'a>(game: &'a DerivedGame, column: &str, raw: Option<&'a str>) -> Cell<'a> {
    let record = game.game();
    let features = &game.features;
    match column {
        "turns" => Cell::Number(f64::from(record.turns)),
        "white_rating" => Cell::Number(f64::from(record.white_rating)),
        "black_rating" => Cell::Number(f64::from(record.black_rating)),
        "rating_difference" => Cell::Number(f64::from(features.rating_difference)),
        "avg_rating" => Cell::Number(features.avg_rating),
        "opening" => Cell::Text(&features.opening),
        "skill_level" => Cell::Text(features.skill_level.as_str()),
        "time_control" => Cell::Text(features.time_control.as_str()),
        _ => Cell::Text(raw.unwrap_or("")),
    }
}

/// Write every game, source columns first, then the derived columns
fn write_games_sheet(sheet: &mut Worksheet, table: &DerivedTable) -> Result<()> {
    sheet.set_name("Games")?;

    let header_format = header_format();
    let number_format = Format::new().set_align(FormatAlign::Right);
    let rating_format = Format::new().set_align(FormatAlign::Right).set_num_format("0.0");

    let headers = table.output_headers();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }
    for name in ["opening_name", "opening"] {
        if let Some(col) = headers.iter().position(|h| h == name) {
            sheet.set_column_width(col as u16, 28)?;
        }
    }

    for (row_idx, game) in table.iter().enumerate() {
        let row = (row_idx + 1) as u32;

        for (col, column) in headers.iter().enumerate() {
            let col = col as u16;
            match cell(game, column, game.row.raw.get(col as usize)) {
                Cell::Number(value) if column == "avg_rating" => {
                    sheet.write_number_with_format(row, col, value, &rating_format)?;
                }
                Cell::Number(value) => {
                    sheet.write_number_with_format(row, col, value, &number_format)?;
                }
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
            }
        }
    }

    Ok(())
}

/// Write per-category counts
fn write_summary_sheet(sheet: &mut Worksheet, summary: &Summary) -> Result<()> {
    sheet.set_name("Summary")?;

    sheet.set_column_width(0, 16)?; // Category
    sheet.set_column_width(1, 16)?; // Value
    sheet.set_column_width(2, 10)?; // Games

    let header_format = header_format();
    let count_format = Format::new().set_align(FormatAlign::Right);

    sheet.write_string_with_format(0, 0, "Category", &header_format)?;
    sheet.write_string_with_format(0, 1, "Value", &header_format)?;
    sheet.write_string_with_format(0, 2, "Games", &header_format)?;

    let mut rows: Vec<(&str, String, usize)> = vec![
        ("Total", "all".to_string(), summary.games),
        ("Total", "rated".to_string(), summary.rated),
        ("Total", "duplicates dropped".to_string(), summary.duplicates_dropped),
    ];
    rows.extend(summary.skill_levels.iter().map(|(l, n)| ("Skill level", l.to_string(), *n)));
    rows.extend(summary.time_controls.iter().map(|(t, n)| ("Time control", t.to_string(), *n)));
    rows.extend(summary.winners.iter().map(|(w, n)| ("Winner", w.to_string(), *n)));
    rows.extend(
        summary
            .increments
            .iter()
            .map(|(code, n)| ("Increment", format_increment(code), *n)),
    );

    for (row_idx, (category, value, count)) in rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        sheet.write_string(row, 0, *category)?;
        sheet.write_string(row, 1, value)?;
        sheet.write_number_with_format(row, 2, *count as f64, &count_format)?;
    }

    Ok(())
}
