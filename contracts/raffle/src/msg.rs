use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Binary, Coin, Timestamp, Uint128, Uint256};
use raffle_common::RaffleState;

use crate::state::RaffleConfig;

#[cw_serde]
pub struct InstantiateMsg {
    pub entrance_fee: Coin,
    pub interval_seconds: u64,
    pub vrf_coordinator: String,
    /// Must match the coordinator's beacon chain hash
    pub key_hash: String,
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u64,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Join the current round. Send at least the entrance fee in info.funds.
    Enter {},
    /// Close the round and request randomness if a draw is due.
    /// Anyone can call; `perform_data` is ignored.
    PerformUpkeep { perform_data: Binary },
    /// Randomness delivery. Coordinator only.
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
    /// Update fee or interval between rounds. Admin only.
    UpdateConfig {
        entrance_fee: Option<Uint128>,
        interval_seconds: Option<u64>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(RaffleConfig)]
    Config {},

    #[returns(RaffleState)]
    RaffleState {},

    #[returns(Addr)]
    Player { index: u64 },

    #[returns(u64)]
    NumberOfPlayers {},

    #[returns(Timestamp)]
    LastTimestamp {},

    #[returns(Option<Addr>)]
    RecentWinner {},

    #[returns(Coin)]
    EntranceFee {},

    #[returns(u64)]
    Interval {},

    #[returns(Option<u64>)]
    PendingRequest {},

    /// Automation poll: is a draw due right now?
    #[returns(CheckUpkeepResponse)]
    CheckUpkeep { check_data: Binary },

    #[returns(RoundInfoResponse)]
    RoundInfo {},
}

#[cw_serde]
pub struct CheckUpkeepResponse {
    pub upkeep_needed: bool,
    pub perform_data: Binary,
}

#[cw_serde]
pub struct RoundInfoResponse {
    pub state: RaffleState,
    pub num_players: u64,
    pub last_timestamp: Timestamp,
    pub pending_request_id: Option<u64>,
    pub recent_winner: Option<Addr>,
    pub pot: Coin,
}
