//! The three exploration views and their filter widgets
//!
//! Every call to [`Dashboard::render`] recomputes all views from the derived
//! table, the way a page re-runs top to bottom after any widget changes.

use crate::error::{ExplorerError, Result};
use crate::model::{SkillLevel, Winner};
use crate::pipeline::DerivedTable;
use crate::query::{
    scatter_points, skill_levels, top_openings, winner_counts, Histogram, ScatterPoint, Selection,
    ViewFilters,
};

/// The synthetic option that disables a select filter
pub const SELECT_ALL: &str = "Select all";

/// Number of openings offered by the opening selector
pub const DEFAULT_TOP_OPENINGS: usize = 20;

pub const RATING_DIFF_BINS: usize = 250;
/// Visible x-axis range of the rating difference chart; binning spans all data
pub const RATING_DIFF_RANGE: (f64, f64) = (-500.0, 500.0);

/// Option list of a single-select widget
#[derive(Debug, Clone, PartialEq)]
pub struct SelectOptions {
    pub label: &'static str,
    pub values: Vec<String>,
}

impl SelectOptions {
    pub fn new(label: &'static str, values: Vec<String>) -> Self {
        Self { label, values }
    }

    /// Values followed by the "Select all" sentinel
    pub fn options(&self) -> Vec<&str> {
        self.values
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(SELECT_ALL))
            .collect()
    }

    /// The option selected when nothing is chosen
    pub fn default_option(&self) -> &'static str {
        SELECT_ALL
    }

    /// Resolve a choice to a selection; `None` picks the default
    pub fn choose(&self, choice: Option<&str>) -> Result<Selection<String>> {
        match choice {
            None => Ok(Selection::All),
            Some(SELECT_ALL) => Ok(Selection::All),
            Some(value) if self.values.iter().any(|v| v == value) => {
                Ok(Selection::One(value.to_string()))
            }
            Some(value) => Err(ExplorerError::InvalidSelection {
                value: value.to_string(),
                options: self.options().join(", "),
            }),
        }
    }
}

/// Scatter of total turns against average rating, colored by time control
#[derive(Debug, Clone)]
pub struct TurnsVsRating {
    pub points: Vec<ScatterPoint>,
}

/// Histogram of the rating difference between the players
#[derive(Debug, Clone)]
pub struct RatingDifferential {
    pub rated_only: bool,
    pub histogram: Histogram,
}

/// Winner frequency for the selected opening and skill level
#[derive(Debug, Clone)]
pub struct WinnerFrequency {
    pub counts: [(Winner, usize); 3],
    pub games: usize,
}

/// One full pass over every view
#[derive(Debug, Clone)]
pub struct Views {
    pub turns_vs_rating: TurnsVsRating,
    pub rating_differential: RatingDifferential,
    pub winner_frequency: WinnerFrequency,
}

pub struct Dashboard<'a> {
    table: &'a DerivedTable,
    openings: Vec<String>,
    skill_levels: Vec<SkillLevel>,
}

impl<'a> Dashboard<'a> {
    pub fn new(table: &'a DerivedTable, top_n: usize) -> Self {
        Self {
            table,
            openings: top_openings(table, top_n),
            skill_levels: skill_levels(table),
        }
    }

    pub fn opening_options(&self) -> SelectOptions {
        SelectOptions::new("Select an opening", self.openings.clone())
    }

    pub fn skill_level_options(&self) -> SelectOptions {
        SelectOptions::new(
            "Select a skill level",
            self.skill_levels.iter().map(|l| l.to_string()).collect(),
        )
    }

    /// Build filters from raw widget choices, validating them against the option lists
    pub fn filters(
        &self,
        rated_only: bool,
        opening: Option<&str>,
        skill_level: Option<&str>,
    ) -> Result<ViewFilters> {
        let opening = self.opening_options().choose(opening)?;
        let skill_level = match self.skill_level_options().choose(skill_level)? {
            Selection::All => Selection::All,
            // The option list was built from SkillLevel values
            Selection::One(s) => SkillLevel::parse(&s).map(Selection::One).ok_or_else(|| {
                ExplorerError::InvalidSelection {
                    value: s,
                    options: self.skill_level_options().options().join(", "),
                }
            })?,
        };

        Ok(ViewFilters {
            rated_only,
            opening,
            skill_level,
        })
    }

    pub fn render(&self, filters: &ViewFilters) -> Views {
        Views {
            turns_vs_rating: self.turns_vs_rating(),
            rating_differential: self.rating_differential(filters.rated_only),
            winner_frequency: self.winner_frequency(filters),
        }
    }

    pub fn turns_vs_rating(&self) -> TurnsVsRating {
        TurnsVsRating {
            points: scatter_points(self.table.iter()),
        }
    }

    pub fn rating_differential(&self, rated_only: bool) -> RatingDifferential {
        let values = self
            .table
            .iter()
            .filter(|g| !rated_only || g.game().rated)
            .map(|g| f64::from(g.features.rating_difference));

        RatingDifferential {
            rated_only,
            histogram: Histogram::build(values, RATING_DIFF_BINS),
        }
    }

    pub fn winner_frequency(&self, filters: &ViewFilters) -> WinnerFrequency {
        let selected: Vec<_> = self
            .table
            .iter()
            .filter(|g| filters.opening.admits(&g.features.opening, &self.openings))
            .filter(|g| {
                filters
                    .skill_level
                    .admits(&g.features.skill_level, &self.skill_levels)
            })
            .collect();

        log::debug!("Winner frequency over {} games", selected.len());

        WinnerFrequency {
            counts: winner_counts(selected.iter().copied()),
            games: selected.len(),
        }
    }
}
