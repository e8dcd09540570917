//! HTTP handlers

pub mod game;
pub mod health;
pub mod leaderboard;
pub mod quarter;

pub use game::*;
pub use health::*;
pub use leaderboard::*;
pub use quarter::*;
