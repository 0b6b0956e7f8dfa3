//! Per-category counts over a derived table

use crate::model::{IncrementCode, SkillLevel, TimeControl, Winner};
use crate::pipeline::DerivedTable;
use crate::query::{value_counts, winner_counts};

/// How many increment codes the summary lists
const TOP_INCREMENTS: usize = 5;

#[derive(Debug, Clone)]
pub struct Summary {
    pub games: usize,
    pub duplicates_dropped: usize,
    pub rated: usize,
    pub skill_levels: Vec<(SkillLevel, usize)>,
    pub time_controls: Vec<(TimeControl, usize)>,
    pub winners: [(Winner, usize); 3],
    pub increments: Vec<(IncrementCode, usize)>,
}

impl Summary {
    pub fn new(table: &DerivedTable) -> Self {
        let skill_levels = SkillLevel::ALL
            .iter()
            .map(|&level| {
                let count = table.iter().filter(|g| g.features.skill_level == level).count();
                (level, count)
            })
            .collect();

        let time_controls = TimeControl::ALL
            .iter()
            .map(|&tc| {
                let count = table.iter().filter(|g| g.features.time_control == tc).count();
                (tc, count)
            })
            .collect();

        // Every row already parsed during derivation, so these cannot fail
        let increments = value_counts(
            table
                .iter()
                .filter_map(|g| IncrementCode::parse(&g.game().increment_code).ok()),
        )
        .into_iter()
        .take(TOP_INCREMENTS)
        .collect();

        Summary {
            games: table.len(),
            duplicates_dropped: table.duplicates_dropped,
            rated: table.iter().filter(|g| g.game().rated).count(),
            skill_levels,
            time_controls,
            winners: winner_counts(table.iter()),
            increments,
        }
    }
}

/// Format an increment code the way it appears in the data
pub fn format_increment(code: &IncrementCode) -> String {
    match code.bonus {
        Some(bonus) => format!("{}+{}", code.base, bonus),
        None => code.base.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::derive;
    use crate::table::read_games;

    #[test]
    fn test_summary_counts() {
        let csv = "rated,turns,winner,increment_code,white_rating,black_rating,opening_name\n\
                   TRUE,20,white,10+0,1300,1300,Sicilian Defense\n\
                   TRUE,20,white,10+0,1300,1300,Sicilian Defense\n\
                   FALSE,30,black,5+5,1700,1700,French Defense\n\
                   TRUE,40,white,10+0,1300,1320,Sicilian Defense\n\
                   TRUE,50,draw,30+0,1900,1900,French Defense\n";
        let summary = Summary::new(&derive(read_games(csv.as_bytes()).unwrap()).unwrap());

        assert_eq!(summary.games, 4);
        assert_eq!(summary.duplicates_dropped, 1);
        assert_eq!(summary.rated, 3);
        assert_eq!(summary.skill_levels[0], (SkillLevel::Beginner, 2));
        assert_eq!(summary.skill_levels[1], (SkillLevel::Intermediate, 0));
        assert_eq!(summary.time_controls[2], (TimeControl::Rapid, 2));
        assert_eq!(summary.winners[0], (Winner::White, 2));
        assert_eq!(format_increment(&summary.increments[0].0), "10+0");
        assert_eq!(summary.increments[0].1, 2);
        assert_eq!(summary.increments.len(), 3);
    }
}
