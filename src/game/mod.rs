//! Rules of the matching game, independent of any toolkit.
//!
//! The shell feeds [`Input`]s into a [`GameController`] and applies the
//! returned [`Effect`]s to whatever it renders.

pub mod board;
pub mod card;
pub mod controller;
pub mod error;
pub mod score;

pub use board::{Board, DEFAULT_COLUMNS};
pub use card::{Card, Identity};
pub use controller::{Effect, GameController, Input, Phase};
pub use error::{GameError, Result};
pub use score::{Classification, Score, classify, compute_score};
