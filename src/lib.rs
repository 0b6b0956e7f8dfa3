pub mod chart;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod query;
pub mod summary;
pub mod table;
pub mod xlsx;

pub use error::{ExplorerError, Result};
pub use model::*;
pub use pipeline::{derive, DerivedGame, DerivedTable};
pub use table::{read_games, read_games_file, GameRow, GameTable};
