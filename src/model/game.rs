use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Side that won a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Winner {
    White,
    Black,
    Draw,
}

impl Winner {
    /// Display order used by the winner frequency chart
    pub const ALL: [Winner; 3] = [Winner::White, Winner::Black, Winner::Draw];

    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::White => "white",
            Winner::Black => "black",
            Winner::Draw => "draw",
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The typed columns of one game row.
///
/// Deserialized by header name, so column order in the source file does not
/// matter and any other column is left to the raw record.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GameRecord {
    #[serde(deserialize_with = "deserialize_flag")]
    pub rated: bool,
    pub turns: u32,
    pub winner: Winner,
    pub increment_code: String,
    pub white_rating: i32,
    pub black_rating: i32,
    pub opening_name: String,
}

impl GameRecord {
    /// Column names a source file must carry
    pub const COLUMNS: [&'static str; 7] = [
        "rated",
        "turns",
        "winner",
        "increment_code",
        "white_rating",
        "black_rating",
        "opening_name",
    ];
}

/// Accept `true`/`false` in any letter case ("TRUE", "True", ...)
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(serde::de::Error::custom(format!(
            "invalid boolean '{}'",
            s
        ))),
    }
}
