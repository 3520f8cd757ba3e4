//! Protocol types and registry events.

mod events;
mod types;

pub use events::RegistryEvent;
pub use types::{
    Game, GameId, GameResult, GameStatus, Outcome, PlayerSlot, Settlement, SettlementKind, Slot,
};
