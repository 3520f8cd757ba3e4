//! Game registry: owns every game and is the only place state changes.
//!
//! Each operation checks all of its preconditions and talks to the ledger
//! before touching any game, so a rejected call leaves nothing behind.
//! Operations take `&mut self`; callers sharing a registry serialise access
//! around it, which makes the second reveal and its settlement one step.

use crate::config::RegistryConfig;
use crate::crypto::{Commitment, Salt};
use crate::error::RegistryError;
use crate::games::{judge, Move};
use crate::protocol::{
    Game, GameId, GameResult, GameStatus, Outcome, PlayerSlot, RegistryEvent, Settlement,
    SettlementKind, Slot,
};
use rps_ledger::{Address, Clock, Ledger, Payout};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct GameRegistry {
    config: RegistryConfig,
    /// Indexed by `GameId`; games are never removed
    games: Vec<Game>,
    events: Vec<RegistryEvent>,
    ledger: Arc<dyn Ledger>,
    clock: Arc<dyn Clock>,
}

impl GameRegistry {
    /// Create an empty registry. The configuration is fixed from here on.
    pub fn new(
        config: RegistryConfig,
        ledger: Arc<dyn Ledger>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, RegistryError> {
        config.validate()?;
        info!(
            entry_fee = config.entry_fee,
            refund_timeout_secs = config.refund_timeout_secs,
            scheme = ?config.commitment_scheme,
            "registry initialised"
        );
        Ok(Self {
            config,
            games: Vec::new(),
            events: Vec::new(),
            ledger,
            clock,
        })
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn entry_fee(&self) -> u64 {
        self.config.entry_fee
    }

    pub fn refund_timeout(&self) -> u64 {
        self.config.refund_timeout_secs
    }

    /// Id the next created game will receive
    pub fn next_game_id(&self) -> GameId {
        GameId::new(self.games.len() as u64)
    }

    pub fn game(&self, id: GameId) -> Option<&Game> {
        id.index().and_then(|index| self.games.get(index))
    }

    /// All games in id order
    pub fn games(&self) -> impl Iterator<Item = &Game> {
        self.games.iter()
    }

    /// Games waiting for a second player
    pub fn open_games(&self) -> impl Iterator<Item = &Game> {
        self.games
            .iter()
            .filter(|g| g.status == GameStatus::Waiting)
    }

    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Total stake currently held across unsettled games
    pub fn custody(&self) -> u64 {
        self.games.iter().map(|g| g.pot).sum()
    }

    pub fn ledger(&self) -> &Arc<dyn Ledger> {
        &self.ledger
    }

    fn lookup(&self, id: GameId) -> Result<(usize, &Game), RegistryError> {
        id.index()
            .and_then(|index| self.games.get(index).map(|g| (index, g)))
            .ok_or(RegistryError::GameNotFound(id))
    }

    fn check_stake(&self, stake: u64) -> Result<(), RegistryError> {
        if stake != self.config.entry_fee {
            return Err(RegistryError::StakeMismatch {
                expected: self.config.entry_fee,
                actual: stake,
            });
        }
        Ok(())
    }

    /// Open a new game as host, staking the entry fee
    pub fn create_game(
        &mut self,
        caller: Address,
        commitment: Commitment,
        stake: u64,
    ) -> Result<GameId, RegistryError> {
        self.check_stake(stake)?;
        self.ledger.escrow(&caller, stake)?;

        let id = self.next_game_id();
        let now = self.clock.now();
        self.games.push(Game {
            id,
            host: PlayerSlot::new(caller, commitment),
            guest: None,
            pot: stake,
            status: GameStatus::Waiting,
            start_time: 0,
            created_at: now,
            settlement: None,
        });
        self.events.push(RegistryEvent::GameCreated {
            game_id: id,
            host: caller,
            pot: stake,
            created_at: now,
        });

        info!(game_id = %id, host = %caller, pot = stake, "game created");
        Ok(id)
    }

    /// Take the guest seat of a waiting game, matching the host's stake
    pub fn join_game(
        &mut self,
        caller: Address,
        game_id: GameId,
        commitment: Commitment,
        stake: u64,
    ) -> Result<(), RegistryError> {
        let (index, game) = self.lookup(game_id)?;
        if game.status != GameStatus::Waiting {
            return Err(RegistryError::InvalidStatus {
                game_id,
                expected: GameStatus::Waiting,
                actual: game.status,
            });
        }
        self.check_stake(stake)?;
        if game.host.address == caller {
            return Err(RegistryError::SelfJoin);
        }
        let pot = game
            .pot
            .checked_add(stake)
            .ok_or(RegistryError::MathOverflow)?;

        self.ledger.escrow(&caller, stake)?;

        let now = self.clock.now();
        let game = &mut self.games[index];
        game.guest = Some(PlayerSlot::new(caller, commitment));
        game.pot = pot;
        game.status = GameStatus::InProgress;
        game.start_time = now;
        self.events.push(RegistryEvent::GameJoined {
            game_id,
            guest: caller,
            pot,
            start_time: now,
        });

        info!(game_id = %game_id, guest = %caller, pot, "game joined");
        Ok(())
    }

    /// Reveal the move behind a slot's commitment.
    ///
    /// Returns the result when this reveal was the second one; the pot has
    /// already been paid out by then.
    pub fn reveal_move(
        &mut self,
        caller: Address,
        game_id: GameId,
        slot: Slot,
        revealed: Move,
        salt: &Salt,
    ) -> Result<Option<GameResult>, RegistryError> {
        let (index, game) = self.lookup(game_id)?;
        if game.status != GameStatus::InProgress {
            return Err(RegistryError::InvalidStatus {
                game_id,
                expected: GameStatus::InProgress,
                actual: game.status,
            });
        }
        let player = game
            .player(slot)
            .ok_or(RegistryError::Unauthorized(slot))?;
        if player.address != caller {
            return Err(RegistryError::Unauthorized(slot));
        }
        if player.has_revealed() {
            return Err(RegistryError::AlreadyRevealed(slot));
        }
        if salt.is_empty() {
            return Err(RegistryError::EmptySalt);
        }
        if !self.config.commitment_scheme.verify(
            &player.commitment,
            &revealed.to_bytes(),
            salt,
            &caller,
        ) {
            warn!(game_id = %game_id, %slot, "reveal does not match commitment");
            return Err(RegistryError::CommitmentMismatch);
        }

        let settlement = match game.player(slot.other()).and_then(|p| p.revealed) {
            Some(other) => {
                let (host_move, guest_move) = match slot {
                    Slot::Host => (revealed, other),
                    Slot::Guest => (other, revealed),
                };
                let result = judge(host_move, guest_move);
                let payouts = settlement_payouts(game, result)?;
                Some((result, payouts))
            }
            None => None,
        };

        // Nothing has changed yet; a rejected release leaves the reveal undone too
        if let Some((_, payouts)) = &settlement {
            self.ledger.release(payouts)?;
        }

        let now = self.clock.now();
        let game = &mut self.games[index];
        if let Some(player) = game.player_mut(slot) {
            player.revealed = Some(revealed);
        }
        self.events.push(RegistryEvent::MoveRevealed {
            game_id,
            slot,
            player: caller,
            revealed,
        });
        info!(game_id = %game_id, %slot, "move revealed");

        let Some((result, payouts)) = settlement else {
            return Ok(None);
        };

        game.host.outcome = result.outcome_for(Slot::Host);
        if let Some(guest) = game.guest.as_mut() {
            guest.outcome = result.outcome_for(Slot::Guest);
        }
        let pot = game.pot;
        game.pot = 0;
        game.status = GameStatus::Complete;
        game.settlement = Some(Settlement {
            kind: match result.winner() {
                Some(winner) => SettlementKind::Win { winner },
                None => SettlementKind::Draw,
            },
            payouts: payouts.clone(),
            settled_at: now,
        });
        self.events.push(RegistryEvent::GameSettled {
            game_id,
            result,
            payouts,
        });

        info!(game_id = %game_id, %result, pot, "game settled");
        Ok(Some(result))
    }

    /// Return both stakes once the reveal window has elapsed without both
    /// reveals. Anyone may call this; funds only go back to the players.
    pub fn refund(&mut self, game_id: GameId) -> Result<Vec<Payout>, RegistryError> {
        let (index, game) = self.lookup(game_id)?;
        if game.status != GameStatus::InProgress {
            return Err(RegistryError::InvalidStatus {
                game_id,
                expected: GameStatus::InProgress,
                actual: game.status,
            });
        }

        let now = self.clock.now();
        let elapsed = now.saturating_sub(game.start_time);
        if elapsed < self.config.refund_timeout_secs {
            let remaining_secs = self.config.refund_timeout_secs - elapsed;
            debug!(game_id = %game_id, remaining_secs, "refund requested early");
            return Err(RegistryError::RefundTooEarly { remaining_secs });
        }
        // The second reveal settles the game in the same call, so an
        // in-progress game always has at least one move outstanding
        debug_assert!(game.revealed_moves().is_none());

        let (host, guest) = seated(game)?;
        let fee = self.config.entry_fee;
        let payouts = vec![Payout::new(host.address, fee), Payout::new(guest.address, fee)];
        debug_assert_eq!(fee * 2, game.pot);

        self.ledger.release(&payouts)?;

        let game = &mut self.games[index];
        game.host.outcome = Outcome::Draw;
        if let Some(guest) = game.guest.as_mut() {
            guest.outcome = Outcome::Draw;
        }
        game.pot = 0;
        game.status = GameStatus::Complete;
        game.settlement = Some(Settlement {
            kind: SettlementKind::Refund,
            payouts: payouts.clone(),
            settled_at: now,
        });
        self.events.push(RegistryEvent::GameRefunded {
            game_id,
            payouts: payouts.clone(),
        });

        info!(game_id = %game_id, elapsed, "game refunded");
        Ok(payouts)
    }
}

fn seated(game: &Game) -> Result<(&PlayerSlot, &PlayerSlot), RegistryError> {
    let guest = game.guest.as_ref().ok_or(RegistryError::InvalidStatus {
        game_id: game.id,
        expected: GameStatus::InProgress,
        actual: game.status,
    })?;
    Ok((&game.host, guest))
}

/// Winner takes the whole pot; a draw splits it back evenly
fn settlement_payouts(game: &Game, result: GameResult) -> Result<Vec<Payout>, RegistryError> {
    let (host, guest) = seated(game)?;
    let payouts = match result {
        GameResult::HostWins => vec![Payout::new(host.address, game.pot)],
        GameResult::GuestWins => vec![Payout::new(guest.address, game.pot)],
        GameResult::Draw => {
            let guest_share = game.pot / 2;
            vec![
                Payout::new(host.address, game.pot - guest_share),
                Payout::new(guest.address, guest_share),
            ]
        }
    };
    Ok(payouts)
}
