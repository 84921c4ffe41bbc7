pub mod provider;
pub mod storage;
pub mod types;

pub use provider::{DataProvider, SeasonData};
pub use storage::{get_season_path, load_season, save_season};
pub use types::{
    Game, GameId, Outcome, Pick, PickEdit, PickId, PointDomain, Pvs, Selection, Team, TeamId, User,
    Week, Winner,
};
