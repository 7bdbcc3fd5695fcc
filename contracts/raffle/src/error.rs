use cosmwasm_std::{StdError, Uint128};
use raffle_common::RaffleState;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("not enough funds sent: sent {sent}, required {required}")]
    NotEnoughFundsSent { sent: Uint128, required: Uint128 },

    #[error("unexpected denom {denom}, entrance fee is paid in {want}")]
    UnexpectedDenom { denom: String, want: String },

    #[error("raffle is not open")]
    RaffleNotOpen,

    /// Carries the values the eligibility check saw, for off-chain debugging.
    #[error("upkeep not needed: balance {balance}, players {num_players}, state {state}")]
    UpkeepNotNeeded {
        balance: Uint128,
        num_players: u64,
        state: RaffleState,
    },

    #[error("no draw in progress")]
    NoDrawInProgress,

    #[error("randomness request {request_id} is already pending")]
    RequestAlreadyPending { request_id: u64 },

    #[error("coordinator reply did not carry a request id")]
    MissingRequestId,

    #[error("only the coordinator can fulfill: have {have}, want {want}")]
    OnlyCoordinatorCanFulfill { have: String, want: String },

    #[error("invalid randomness request {request_id}")]
    InvalidRequest { request_id: u64 },

    #[error("fulfillment carried no random words")]
    NoRandomWords,

    #[error("round has no players")]
    NoPlayers,

    #[error("player index {index} out of bounds ({len} players)")]
    PlayerIndexOutOfBounds { index: u64, len: u64 },

    #[error("transfer to {winner} failed: {reason}")]
    TransferFailed { winner: String, reason: String },

    #[error("entrance fee must be a positive amount")]
    InvalidEntranceFee,

    #[error("interval must be at least one second")]
    InvalidInterval,

    #[error("callback gas limit must be positive")]
    InvalidCallbackGasLimit,

    #[error("config is locked while the round has entrants or a draw is pending")]
    ConfigLocked,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
