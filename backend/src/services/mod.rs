//! Business logic services for the Whiskey Wiz server

pub mod game;
pub mod leaderboard;
pub mod quarter;

pub use game::GameService;
pub use leaderboard::LeaderboardService;
pub use quarter::QuarterService;
