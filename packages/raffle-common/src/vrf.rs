//! Wire messages shared by the randomness coordinator and its consumers.
//!
//! The coordinator's own `ExecuteMsg` embeds `RequestRandomWords` with the
//! same shape, and every consumer's `ExecuteMsg` embeds `FulfillRandomWords`,
//! so either side can serialize these types directly.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint256;

/// Event type emitted by the coordinator when it accepts a request.
/// Sub-message replies observe it with the `wasm-` prefix.
pub const RANDOM_WORDS_REQUESTED_EVENT: &str = "vrf_random_words_requested";

/// Attribute on [`RANDOM_WORDS_REQUESTED_EVENT`] carrying the assigned id.
pub const REQUEST_ID_ATTRIBUTE: &str = "request_id";

/// Sent by a consumer to the coordinator.
#[cw_serde]
pub enum CoordinatorExecuteMsg {
    RequestRandomWords {
        /// Identifies the beacon chain the words are derived from.
        key_hash: String,
        subscription_id: u64,
        /// Number of beacon rounds that must pass before fulfilment.
        request_confirmations: u16,
        callback_gas_limit: u64,
        num_words: u32,
    },
}

/// Sent by the coordinator to the consumer that made the request.
#[cw_serde]
pub enum ConsumerExecuteMsg {
    FulfillRandomWords {
        request_id: u64,
        random_words: Vec<Uint256>,
    },
}
