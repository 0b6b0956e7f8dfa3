pub mod features;
pub mod game;

pub use features::{
    avg_rating, normalize_opening, rating_difference, skill_level, time_control, Features,
    IncrementCode, SkillLevel, TimeControl,
};
pub use game::{GameRecord, Winner};
