use std::fmt;

use cosmwasm_schema::cw_serde;

/// Lifecycle of a raffle round. The machine is cyclic: a round leaves
/// `Calculating` only by paying out, which reopens it.
#[cw_serde]
#[derive(Copy, Eq)]
pub enum RaffleState {
    Open,
    Calculating,
}

impl fmt::Display for RaffleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleState::Open => write!(f, "open"),
            RaffleState::Calculating => write!(f, "calculating"),
        }
    }
}
