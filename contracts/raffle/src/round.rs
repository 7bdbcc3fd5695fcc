use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128, Uint256};
use raffle_common::RaffleState;

use crate::error::ContractError;

/// The single live raffle round.
///
/// Loaded from storage by each entry point, mutated only through the
/// methods below, then saved back. A failed method leaves `self` untouched.
#[cw_serde]
pub struct Round {
    pub state: RaffleState,
    /// Entrants in insertion order. The same address may hold several slots.
    pub players: Vec<Addr>,
    /// When the round was last (re)opened
    pub last_timestamp: Timestamp,
    /// Correlation token of the outstanding randomness request
    pub pending_request_id: Option<u64>,
    pub recent_winner: Option<Addr>,
}

impl Round {
    pub fn open(now: Timestamp) -> Self {
        Round {
            state: RaffleState::Open,
            players: Vec::new(),
            last_timestamp: now,
            pending_request_id: None,
            recent_winner: None,
        }
    }

    pub fn num_players(&self) -> u64 {
        self.players.len() as u64
    }

    /// Append `player` if the round is open and the payment covers the fee.
    /// Overpayment is kept in the pot.
    pub fn enter(
        &mut self,
        player: Addr,
        paid: Uint128,
        fee: Uint128,
    ) -> Result<(), ContractError> {
        if paid < fee {
            return Err(ContractError::NotEnoughFundsSent {
                sent: paid,
                required: fee,
            });
        }
        if self.state != RaffleState::Open {
            return Err(ContractError::RaffleNotOpen);
        }
        self.players.push(player);
        Ok(())
    }

    pub fn player_at(&self, index: u64) -> Result<&Addr, ContractError> {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.players.get(i))
            .ok_or(ContractError::PlayerIndexOutOfBounds {
                index,
                len: self.num_players(),
            })
    }

    /// Whether the round may be closed for a draw right now.
    pub fn upkeep_needed(&self, now: Timestamp, interval_seconds: u64, balance: Uint128) -> bool {
        let is_open = self.state == RaffleState::Open;
        let elapsed = now.seconds().saturating_sub(self.last_timestamp.seconds());
        let time_passed = elapsed >= interval_seconds;
        let has_players = !self.players.is_empty();
        let has_balance = !balance.is_zero();
        is_open && time_passed && has_players && has_balance
    }

    /// OPEN -> CALCULATING. Fails with the observed balance, player count
    /// and state when the round is not eligible.
    pub fn close(
        &mut self,
        now: Timestamp,
        interval_seconds: u64,
        balance: Uint128,
    ) -> Result<(), ContractError> {
        if !self.upkeep_needed(now, interval_seconds, balance) {
            return Err(ContractError::UpkeepNotNeeded {
                balance,
                num_players: self.num_players(),
                state: self.state,
            });
        }
        self.state = RaffleState::Calculating;
        Ok(())
    }

    pub fn record_request(&mut self, request_id: u64) -> Result<(), ContractError> {
        if self.state != RaffleState::Calculating {
            return Err(ContractError::NoDrawInProgress);
        }
        if let Some(pending) = self.pending_request_id {
            return Err(ContractError::RequestAlreadyPending {
                request_id: pending,
            });
        }
        self.pending_request_id = Some(request_id);
        Ok(())
    }

    /// Resolve the winner for a fulfillment of `request_id`.
    pub fn pick_winner(
        &self,
        request_id: u64,
        random_words: &[Uint256],
    ) -> Result<Addr, ContractError> {
        if self.pending_request_id != Some(request_id) {
            return Err(ContractError::InvalidRequest { request_id });
        }
        let word = random_words.first().ok_or(ContractError::NoRandomWords)?;
        let index = winner_index(*word, self.players.len())?;
        Ok(self.players[index].clone())
    }

    /// CALCULATING -> OPEN after a payout. Replaces the player list wholesale.
    pub fn reset(&mut self, winner: Addr, now: Timestamp) {
        self.recent_winner = Some(winner);
        self.players = Vec::new();
        self.pending_request_id = None;
        self.last_timestamp = now;
        self.state = RaffleState::Open;
    }
}

/// `random mod player_count`, computed on unsigned 256-bit integers.
pub fn winner_index(random: Uint256, player_count: usize) -> Result<usize, ContractError> {
    if player_count == 0 {
        return Err(ContractError::NoPlayers);
    }
    let index = random % Uint256::from(player_count as u128);

    // index < player_count, so it fits in the low 8 bytes
    let bytes = index.to_be_bytes();
    let mut low = [0u8; 8];
    low.copy_from_slice(&bytes[24..32]);
    Ok(u64::from_be_bytes(low) as usize)
}
