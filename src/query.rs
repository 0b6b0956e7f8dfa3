//! Filtering and grouping over a derived table

use crate::model::{SkillLevel, TimeControl, Winner};
use crate::pipeline::{DerivedGame, DerivedTable};
use std::collections::HashMap;
use std::hash::Hash;

/// A single-select filter: either everything or one value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection<T> {
    #[default]
    All,
    One(T),
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes the filter, given the values "All" stands for
    pub fn admits(&self, value: &T, all: &[T]) -> bool {
        match self {
            Selection::All => all.contains(value),
            Selection::One(selected) => selected == value,
        }
    }
}

/// The user-controlled filters of the dashboard
#[derive(Debug, Clone, Default)]
pub struct ViewFilters {
    /// Restrict the rating-difference histogram to rated games
    pub rated_only: bool,
    pub opening: Selection<String>,
    pub skill_level: Selection<SkillLevel>,
}

/// Frequency of each value, most frequent first; ties keep first-appearance order
pub fn value_counts<T, I>(values: I) -> Vec<(T, usize)>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut index: HashMap<T, usize> = HashMap::new();
    let mut counts: Vec<(T, usize)> = Vec::new();

    for value in values {
        match index.get(&value) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(value.clone(), counts.len());
                counts.push((value, 1));
            }
        }
    }

    // Stable sort keeps first appearance among equal counts
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

/// Unique values in order of first appearance
pub fn distinct_in_order<T, I>(values: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = std::collections::HashSet::new();
    values
        .into_iter()
        .filter(|v| seen.insert(v.clone()))
        .collect()
}

/// The `n` most frequently played opening families
pub fn top_openings(table: &DerivedTable, n: usize) -> Vec<String> {
    value_counts(table.iter().map(|g| g.features.opening.as_str()))
        .into_iter()
        .take(n)
        .map(|(opening, _)| opening.to_string())
        .collect()
}

/// Skill levels present in the table, in order of first appearance
pub fn skill_levels(table: &DerivedTable) -> Vec<SkillLevel> {
    distinct_in_order(table.iter().map(|g| g.features.skill_level))
}

/// Winner counts in display order white, black, draw
pub fn winner_counts<'a, I>(games: I) -> [(Winner, usize); 3]
where
    I: IntoIterator<Item = &'a DerivedGame>,
{
    let mut counts = Winner::ALL.map(|w| (w, 0));
    for game in games {
        if let Some(slot) = counts.iter_mut().find(|(w, _)| *w == game.game().winner) {
            slot.1 += 1;
        }
    }
    counts
}

/// One point of the turns vs. average rating scatter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScatterPoint {
    pub avg_rating: f64,
    pub turns: u32,
    pub time_control: TimeControl,
}

pub fn scatter_points<'a, I>(games: I) -> Vec<ScatterPoint>
where
    I: IntoIterator<Item = &'a DerivedGame>,
{
    games
        .into_iter()
        .map(|g| ScatterPoint {
            avg_rating: g.features.avg_rating,
            turns: g.game().turns,
            time_control: g.features.time_control,
        })
        .collect()
}

/// Equal-width bin counts spanning the data
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub start: f64,
    pub end: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Count `values` into `bins` bins spanning their minimum to maximum.
    ///
    /// Every value is counted; the maximum lands in the last bin. When all
    /// values are equal the single value sits in the middle of a unit span.
    pub fn build<I>(values: I, bins: usize) -> Histogram
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        let bins = bins.max(1);
        let mut counts = vec![0; bins];

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let (start, end) = if values.is_empty() {
            (0.0, 0.0)
        } else if min == max {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };

        let width = (end - start) / bins as f64;
        if width > 0.0 {
            for value in values {
                let idx = (((value - start) / width) as usize).min(bins - 1);
                counts[idx] += 1;
            }
        }

        Histogram { start, end, counts }
    }

    pub fn bin_width(&self) -> f64 {
        (self.end - self.start) / self.counts.len() as f64
    }

    /// Lower and upper edge of bin `idx`
    pub fn bin_edges(&self, idx: usize) -> (f64, f64) {
        let lo = self.start + idx as f64 * self.bin_width();
        (lo, lo + self.bin_width())
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::derive;
    use crate::table::read_games;

    fn sample() -> DerivedTable {
        let csv = "rated,turns,winner,increment_code,white_rating,black_rating,opening_name\n\
                   TRUE,20,white,10+0,1300,1300,Sicilian Defense: Najdorf\n\
                   FALSE,30,black,5+0,1700,1700,French Defense\n\
                   TRUE,40,white,3+0,1300,1320,Sicilian Defense\n\
                   TRUE,50,draw,30+0,1900,1900,French Defense: Advance\n\
                   TRUE,60,white,15+5,1500,1500,Italian Game\n";
        derive(read_games(csv.as_bytes()).unwrap()).unwrap()
    }

    #[test]
    fn test_value_counts_order() {
        let counts = value_counts(["b", "a", "a", "c", "b", "d"]);
        assert_eq!(counts, vec![("b", 2), ("a", 2), ("c", 1), ("d", 1)]);
    }

    #[test]
    fn test_top_openings() {
        let table = sample();
        assert_eq!(
            top_openings(&table, 2),
            vec!["Sicilian Defense".to_string(), "French Defense".to_string()]
        );
        assert_eq!(top_openings(&table, 20).len(), 3);
    }

    #[test]
    fn test_skill_levels_first_appearance() {
        assert_eq!(
            skill_levels(&sample()),
            vec![
                SkillLevel::Beginner,
                SkillLevel::Advanced,
                SkillLevel::Master,
                SkillLevel::Intermediate
            ]
        );
    }

    #[test]
    fn test_winner_counts_fixed_order() {
        let table = sample();
        assert_eq!(
            winner_counts(table.iter()),
            [(Winner::White, 3), (Winner::Black, 1), (Winner::Draw, 1)]
        );
        assert_eq!(
            winner_counts(table.iter().filter(|g| g.game().winner == Winner::Draw)),
            [(Winner::White, 0), (Winner::Black, 0), (Winner::Draw, 1)]
        );
    }

    #[test]
    fn test_selection_admits() {
        let all = vec!["a".to_string(), "b".to_string()];
        assert!(Selection::All.admits(&"a".to_string(), &all));
        assert!(!Selection::All.admits(&"z".to_string(), &all));
        assert!(Selection::One("z".to_string()).admits(&"z".to_string(), &all));
        assert!(!Selection::One("a".to_string()).admits(&"b".to_string(), &all));
    }

    #[test]
    fn test_histogram_bins() {
        let hist = Histogram::build([-500.0, -496.0, -495.9, 0.0, 499.0, 500.0], 250);

        assert_eq!(hist.counts.len(), 250);
        assert_eq!((hist.start, hist.end), (-500.0, 500.0));
        assert_eq!(hist.bin_width(), 4.0);
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[1], 2);
        assert_eq!(hist.counts[125], 1);
        assert_eq!(hist.counts[249], 2);
        assert_eq!(hist.total(), 6);
        assert_eq!(hist.max_count(), 2);
        assert_eq!(hist.bin_edges(125), (0.0, 4.0));
    }

    #[test]
    fn test_histogram_spans_data() {
        let hist = Histogram::build([0.0, 800.0, -1200.0], 250);
        assert_eq!((hist.start, hist.end), (-1200.0, 800.0));
        assert_eq!(hist.bin_width(), 8.0);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[150], 1);
        assert_eq!(hist.counts[249], 1);
    }

    #[test]
    fn test_histogram_degenerate() {
        let empty = Histogram::build(std::iter::empty(), 250);
        assert_eq!(empty.total(), 0);
        assert_eq!(empty.counts.len(), 250);

        let single = Histogram::build([40.0, 40.0], 10);
        assert_eq!((single.start, single.end), (39.5, 40.5));
        assert_eq!(single.total(), 2);
        assert_eq!(single.max_count(), 2);
    }

    #[test]
    fn test_scatter_points() {
        let table = sample();
        let points = scatter_points(table.iter());
        assert_eq!(points.len(), 5);
        assert_eq!(
            points[1],
            ScatterPoint {
                avg_rating: 1700.0,
                turns: 30,
                time_control: TimeControl::Blitz
            }
        );
    }
}
