//! Domain models for the Whiskey Wiz tasting game

mod game;
mod guess;
mod quarter;
mod result;
mod rules;
mod sample;

pub use game::*;
pub use guess::*;
pub use quarter::*;
pub use result::*;
pub use rules::*;
pub use sample::*;
