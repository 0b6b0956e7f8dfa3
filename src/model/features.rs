//! Per-game derived features
//!
//! Each function here is a pure function of a game's source fields. The
//! only fallible one is the time-control bucketizer, which has to parse the
//! base time out of the increment code.

use super::game::GameRecord;
use crate::error::{ExplorerError, Result};
use nom::{
    character::complete::{digit1, multispace0, one_of},
    combinator::{all_consuming, map, opt, recognize},
    sequence::delimited,
    IResult, Parser,
};
use std::fmt;

/// Rating band of a game, from the average of both players' ratings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Master,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Master,
    ];

    /// Bucketize an average rating. Upper bounds are inclusive.
    pub fn from_rating(avg_rating: f64) -> SkillLevel {
        if avg_rating <= 1400.0 {
            SkillLevel::Beginner
        } else if avg_rating <= 1600.0 {
            SkillLevel::Intermediate
        } else if avg_rating <= 1800.0 {
            SkillLevel::Advanced
        } else {
            SkillLevel::Master
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
            SkillLevel::Master => "master",
        }
    }

    pub fn parse(s: &str) -> Option<SkillLevel> {
        SkillLevel::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Speed category of a game, from the base time of its increment code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimeControl {
    Bullet,
    Blitz,
    Rapid,
    Classic,
}

impl TimeControl {
    pub const ALL: [TimeControl; 4] = [
        TimeControl::Bullet,
        TimeControl::Blitz,
        TimeControl::Rapid,
        TimeControl::Classic,
    ];

    /// Bucketize a base time. Lower bounds are inclusive.
    pub fn from_base(base: i64) -> TimeControl {
        if base < 5 {
            TimeControl::Bullet
        } else if base < 10 {
            TimeControl::Blitz
        } else if base < 30 {
            TimeControl::Rapid
        } else {
            TimeControl::Classic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeControl::Bullet => "bullet",
            TimeControl::Blitz => "blitz",
            TimeControl::Rapid => "rapid",
            TimeControl::Classic => "classic",
        }
    }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A parsed increment code such as "10+5"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IncrementCode {
    pub base: i64,
    /// Per-move bonus; `None` when the code has no `+` or the bonus is not an integer
    pub bonus: Option<i64>,
}

/// An integer with optional sign and surrounding whitespace
fn integer(input: &str) -> IResult<&str, i64> {
    delimited(
        multispace0,
        map(recognize((opt(one_of("+-")), digit1)), saturating_int),
        multispace0,
    )
    .parse(input)
}

/// Digits that overflow `i64` clamp to its bounds, so a huge base is still classic
fn saturating_int(digits: &str) -> i64 {
    digits.parse().unwrap_or(if digits.starts_with('-') {
        i64::MIN
    } else {
        i64::MAX
    })
}

fn parse_integer(s: &str) -> Option<i64> {
    all_consuming(integer).parse(s).ok().map(|(_, n)| n)
}

impl IncrementCode {
    pub fn parse(code: &str) -> Result<IncrementCode> {
        Ok(IncrementCode {
            base: parse_base(code)?,
            bonus: code.split_once('+').and_then(|(_, bonus)| parse_integer(bonus)),
        })
    }
}

/// Parse the base time: everything before the first `+`, or the whole code
fn parse_base(code: &str) -> Result<i64> {
    let base = code.split('+').next().unwrap_or(code);
    parse_integer(base).ok_or_else(|| {
        ExplorerError::Parse(format!("invalid base time in increment code '{}'", code))
    })
}

/// The opening family: everything before the first `:`
pub fn normalize_opening(opening_name: &str) -> &str {
    opening_name.split(':').next().unwrap_or(opening_name)
}

pub fn skill_level(avg_rating: f64) -> SkillLevel {
    SkillLevel::from_rating(avg_rating)
}

pub fn time_control(increment_code: &str) -> Result<TimeControl> {
    parse_base(increment_code).map(TimeControl::from_base)
}

/// White's rating minus black's; positive when white is the higher rated
pub fn rating_difference(white: i32, black: i32) -> i32 {
    white - black
}

pub fn avg_rating(white: i32, black: i32) -> f64 {
    (f64::from(white) + f64::from(black)) / 2.0
}

/// The five columns derived for every game
#[derive(Debug, Clone, PartialEq)]
pub struct Features {
    pub rating_difference: i32,
    pub avg_rating: f64,
    pub opening: String,
    pub skill_level: SkillLevel,
    pub time_control: TimeControl,
}

impl Features {
    /// Column names, in the order they are appended to a table
    pub const COLUMNS: [&'static str; 5] = [
        "rating_difference",
        "avg_rating",
        "opening",
        "skill_level",
        "time_control",
    ];

    pub fn derive(game: &GameRecord) -> Result<Features> {
        let avg_rating = avg_rating(game.white_rating, game.black_rating);

        Ok(Features {
            rating_difference: rating_difference(game.white_rating, game.black_rating),
            avg_rating,
            opening: normalize_opening(&game.opening_name).to_string(),
            skill_level: skill_level(avg_rating),
            time_control: time_control(&game.increment_code)?,
        })
    }

    /// Values as written to a CSV cell, in `COLUMNS` order
    pub fn to_fields(&self) -> [String; 5] {
        [
            self.rating_difference.to_string(),
            format!("{:.1}", self.avg_rating),
            self.opening.clone(),
            self.skill_level.to_string(),
            self.time_control.to_string(),
        ]
    }
}
