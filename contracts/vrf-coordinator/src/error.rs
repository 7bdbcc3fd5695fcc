use cosmwasm_std::StdError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("invalid hex input: {field}")]
    InvalidHex { field: String },

    #[error("invalid pubkey length: expected 96 bytes, got {got}")]
    InvalidPubkeyLength { got: usize },

    #[error("beacon period must be at least one second")]
    InvalidPeriod,

    #[error("BLS verification failed: {reason}")]
    VerificationFailed { reason: String },

    #[error("subscription {subscription_id} not found")]
    SubscriptionNotFound { subscription_id: u64 },

    #[error("subscription already has the maximum of {max} consumers")]
    TooManyConsumers { max: usize },

    #[error("{consumer} is not a consumer of subscription {subscription_id}")]
    InvalidConsumer {
        subscription_id: u64,
        consumer: String,
    },

    #[error("unknown key hash {key_hash}")]
    InvalidKeyHash { key_hash: String },

    #[error("invalid request confirmations {have}: must be within [{min}, {max}]")]
    InvalidRequestConfirmations { have: u16, min: u16, max: u16 },

    #[error("callback gas limit {have} exceeds maximum {want}")]
    GasLimitTooBig { have: u64, want: u64 },

    #[error("invalid number of words {have}: must be within [1, {max}]")]
    InvalidNumWords { have: u32, max: u32 },

    #[error("randomness request {request_id} not found")]
    RequestNotFound { request_id: u64 },

    #[error("beacon round {round} is before the target round {target_round}")]
    RoundTooEarly { round: u64, target_round: u64 },

    #[error("beacon round {round} is after the target round {target_round}")]
    RoundTooLate { round: u64, target_round: u64 },

    #[error("fulfillment for request {request_id} not found")]
    FulfillmentNotFound { request_id: u64 },

    #[error("callback for request {request_id} already succeeded")]
    CallbackAlreadySucceeded { request_id: u64 },

    #[error("reply payload is not a request id")]
    InvalidReplyPayload,

    #[error("unknown reply id {id}")]
    UnknownReplyId { id: u64 },
}
