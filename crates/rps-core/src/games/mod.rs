//! Game rules.

mod rps;

pub use rps::{judge, Move};
