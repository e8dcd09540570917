//! Shared types and scoring logic for the Whiskey Wiz tasting game
//!
//! This crate contains the data model, the scoring engine and the rule
//! validators. It is used by the backend and by the browser client (via WASM),
//! so it performs no I/O.

pub mod aggregate;
pub mod error;
pub mod models;
pub mod scoring;
pub mod types;
pub mod validation;

pub use aggregate::*;
pub use error::*;
pub use models::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
