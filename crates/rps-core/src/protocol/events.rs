//! Events appended by the registry on every successful mutation.

use super::types::{GameId, GameResult, Slot};
use crate::games::Move;
use rps_ledger::{Address, Payout};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryEvent {
    GameCreated {
        game_id: GameId,
        host: Address,
        pot: u64,
        created_at: u64,
    },
    GameJoined {
        game_id: GameId,
        guest: Address,
        pot: u64,
        start_time: u64,
    },
    MoveRevealed {
        game_id: GameId,
        slot: Slot,
        player: Address,
        #[serde(rename = "move")]
        revealed: Move,
    },
    GameSettled {
        game_id: GameId,
        result: GameResult,
        payouts: Vec<Payout>,
    },
    GameRefunded {
        game_id: GameId,
        payouts: Vec<Payout>,
    },
}

impl RegistryEvent {
    pub fn game_id(&self) -> GameId {
        match self {
            RegistryEvent::GameCreated { game_id, .. }
            | RegistryEvent::GameJoined { game_id, .. }
            | RegistryEvent::MoveRevealed { game_id, .. }
            | RegistryEvent::GameSettled { game_id, .. }
            | RegistryEvent::GameRefunded { game_id, .. } => *game_id,
        }
    }
}
